//! Error types for the Linux GPIO backend

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinuxGpioError {
    /// Requesting the GPIO lines from the kernel failed
    #[error("failed to request GPIO lines: {0}")]
    LineRequestFailed(#[source] gpiocdev::Error),

    /// No GPIO chip device was specified
    #[error("no GPIO chip device specified")]
    NoDevice,

    /// A programmer option was malformed
    #[error("invalid programmer option: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, LinuxGpioError>;
