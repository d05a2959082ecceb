//! # Arm Driver Module
//!
//! This module provides the interface used to send command frames to the arm. The USB driver
//! talks to the real device, while the disconnected driver lets everything else run without one.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// [`ArmDriver`] implementation for the arm's USB interface.
pub mod usb;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use arm_if::CommandFrame;
use log::{trace, warn};

use crate::params::UsbParams;
pub use usb::UsbDriver;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Trait to provide a unified API for sending commands to the arm.
pub trait ArmDriver {
    /// Send a command frame to the arm.
    fn send(&mut self, frame: &CommandFrame) -> Result<(), DriverError>;

    /// Returns true if commands are actually reaching an arm.
    fn is_connected(&self) -> bool;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Driver used when no arm is connected, all frames are dropped.
#[derive(Debug, Default)]
pub struct DisconnectedDriver;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error("Could not find a USB device with ID {vendor_id:04x}:{product_id:04x}")]
    NotFound { vendor_id: u16, product_id: u16 },

    #[error("A USB error occured: {0}")]
    Usb(#[from] rusb::Error),

    #[error("Only {written} of {expected} bytes were written to the arm")]
    ShortWrite { expected: usize, written: usize },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ArmDriver for DisconnectedDriver {
    fn send(&mut self, frame: &CommandFrame) -> Result<(), DriverError> {
        // Show what would have been sent so runs without an arm can still be followed
        match CommandFrame::decode(frame.as_bytes()) {
            Ok((dirs, light)) => {
                let moving: Vec<String> = dirs
                    .iter()
                    .filter(|(_, d)| d.is_moving())
                    .map(|(id, d)| format!("{} {}", id, d))
                    .collect();
                trace!(
                    "Arm disconnected, dropping frame {}: moving {:?}, light {:?}",
                    frame, moving, light
                );
            }
            Err(e) => trace!("Arm disconnected, dropping undecodable frame {}: {}", frame, e),
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        false
    }
}

impl<D: ArmDriver + ?Sized> ArmDriver for Box<D> {
    fn send(&mut self, frame: &CommandFrame) -> Result<(), DriverError> {
        (**self).send(frame)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Open the arm, falling back to a [`DisconnectedDriver`] if it cannot be found.
pub fn open_driver(params: &UsbParams) -> Box<dyn ArmDriver> {
    match UsbDriver::open(params) {
        Ok(d) => Box::new(d),
        Err(e) => {
            warn!("Could not connect to Robotic Arm USB device: {}", e);
            warn!("Continuing in disconnected mode, commands will not be sent");
            Box::new(DisconnectedDriver)
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_device_falls_back_to_disconnected() {
        // No arm uses this ID
        let params = UsbParams {
            vendor_id: 0xffff,
            product_id: 0xfffe,
            ..UsbParams::default()
        };

        let mut driver = open_driver(&params);
        assert!(!driver.is_connected());
        assert!(driver.send(&CommandFrame::stop()).is_ok());
    }

    #[test]
    fn test_disconnected_driver_accepts_frames() {
        let mut driver = DisconnectedDriver;

        let frame = CommandFrame::from_raw([1, 2, 0, 0, 1], 1).unwrap();
        assert!(driver.send(&frame).is_ok());
        assert!(!driver.is_connected());
    }
}
