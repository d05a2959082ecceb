//! # Arm Executable Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the arm executable, loaded from `params/arm_exec.toml`.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ArmExecParams {
    /// Minimum log level, at least `info`
    pub log_level: String,

    /// Path to the shell history file, relative to the software root
    pub history_path: String,

    /// USB interface parameters
    pub usb: UsbParams,

    /// Arm control parameters
    pub arm: ArmParams,

    /// Gamepad mapping parameters
    pub gamepad: GamepadParams,
}

/// Parameters for the USB connection to the arm.
#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct UsbParams {
    pub vendor_id: u16,

    pub product_id: u16,

    /// USB configuration to select after opening the device
    pub configuration: u8,

    /// Timeout for each control transfer
    ///
    /// Units: milliseconds
    pub timeout_ms: u64,
}

/// Parameters for controlling the arm.
#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct ArmParams {
    /// Period between checks while rewinding to the start position.
    ///
    /// Units: seconds
    pub rewind_poll_period_s: f64,
}

/// Parameters for mapping a gamepad onto the arm.
#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct GamepadParams {
    /// Stick and trigger values with a magnitude below this are ignored
    pub threshold: f64,

    /// Stick axes with a magnitude below this are snapped to zero before
    /// thresholding, covering loose or badly calibrated sticks
    pub stick_snap: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for ArmExecParams {
    fn default() -> Self {
        Self {
            log_level: String::from("info"),
            history_path: String::from("data/history.txt"),
            usb: UsbParams::default(),
            arm: ArmParams::default(),
            gamepad: GamepadParams::default(),
        }
    }
}

impl Default for UsbParams {
    fn default() -> Self {
        Self {
            vendor_id: 0x1267,
            product_id: 0x0000,
            configuration: 1,
            timeout_ms: 1000,
        }
    }
}

impl Default for ArmParams {
    fn default() -> Self {
        Self {
            rewind_poll_period_s: 0.01,
        }
    }
}

impl Default for GamepadParams {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            stick_snap: 0.2,
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
    fn test_partial_params_use_defaults() {
        let params: ArmExecParams = toml::from_str(
            r#"
            log_level = "debug"

            [usb]
            timeout_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(params.log_level, "debug");
        assert_eq!(params.usb.vendor_id, 0x1267);
        assert_eq!(params.usb.timeout_ms, 500);
        assert_eq!(params.arm.rewind_poll_period_s, 0.01);
        assert_eq!(params.gamepad.threshold, 0.2);
    }
}
