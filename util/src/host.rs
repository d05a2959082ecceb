//! Host platform (linux for example) utility functions

use std::path::PathBuf;

/// Environment variable pointing at the root of the software checkout.
pub const SW_ROOT_ENV: &str = "OWI_ARM_SW_ROOT";

/// Retrieve uname information.
#[cfg(unix)]
pub fn get_uname() -> std::io::Result<uname::Info> {
    uname::uname()
}

/// Get a short description of the host, used in the startup banner.
#[cfg(unix)]
pub fn describe() -> std::io::Result<String> {
    let info = get_uname()?;
    Ok(format!(
        "{} {} {} ({})",
        info.sysname, info.nodename, info.release, info.machine
    ))
}

/// Get a short description of the host, used in the startup banner.
#[cfg(not(unix))]
pub fn describe() -> std::io::Result<String> {
    Ok(format!("{} ({})", std::env::consts::OS, std::env::consts::ARCH))
}

/// Get the root directory of the software.
///
/// This is the value of `OWI_ARM_SW_ROOT` if it is set, otherwise the current working directory.
pub fn get_sw_root() -> std::io::Result<PathBuf> {
    match std::env::var_os(SW_ROOT_ENV) {
        Some(root) => Ok(PathBuf::from(root)),
        None => std::env::current_dir(),
    }
}
