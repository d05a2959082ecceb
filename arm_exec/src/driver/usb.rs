//! [`ArmDriver`] implementation for the arm's USB interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use arm_if::CommandFrame;
use log::{debug, info, trace};
use rusb::{Context, DeviceHandle, UsbContext};
use std::time::Duration;

use super::{ArmDriver, DriverError};
use crate::params::UsbParams;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Host to device, vendor request, device recipient.
const REQUEST_TYPE: u8 = 0x40;

/// Vendor request used by the arm for command frames.
const REQUEST: u8 = 6;

const VALUE: u16 = 0x0100;

const INDEX: u16 = 0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Driver for an arm connected over USB.
pub struct UsbDriver {
    handle: DeviceHandle<Context>,

    timeout: Duration,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl UsbDriver {
    /// Open the first device matching the vendor and product IDs in `params`.
    pub fn open(params: &UsbParams) -> Result<Self, DriverError> {
        // An explicit context so hosts without libusb give an error rather than a panic
        let context = Context::new()?;

        let mut handle = context
            .open_device_with_vid_pid(params.vendor_id, params.product_id)
            .ok_or(DriverError::NotFound {
                vendor_id: params.vendor_id,
                product_id: params.product_id,
            })?;

        // Not supported on every platform, in which case there's nothing to detach anyway
        if let Err(e) = handle.set_auto_detach_kernel_driver(true) {
            debug!("Kernel driver auto-detach unavailable: {}", e);
        }

        handle.set_active_configuration(params.configuration)?;

        info!(
            "Connected to arm at {:04x}:{:04x}",
            params.vendor_id, params.product_id
        );

        Ok(Self {
            handle,
            timeout: Duration::from_millis(params.timeout_ms),
        })
    }
}

impl ArmDriver for UsbDriver {
    fn send(&mut self, frame: &CommandFrame) -> Result<(), DriverError> {
        let payload = frame.as_bytes();

        trace!("Sending frame {}", frame);

        let written =
            self.handle
                .write_control(REQUEST_TYPE, REQUEST, VALUE, INDEX, payload, self.timeout)?;

        if written != payload.len() {
            return Err(DriverError::ShortWrite {
                expected: payload.len(),
                written,
            });
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }
}
