use std::error::Error as StdError;

use thiserror::Error;

/// Errors used in this API
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Querying the graphics environment for its screen devices failed
    #[error("Failed to list screen devices")]
    ListingDevicesFailed(#[source] Box<dyn StdError + Send + Sync>),
}

#[derive(Debug, Error)]
pub(crate) enum SysError {
    #[cfg(windows)]
    #[error("Failed to enumerate display monitors")]
    EnumDisplayMonitorsFailed(#[source] windows_core::Error),
    #[cfg(windows)]
    #[error("Failed to get monitor info")]
    GetMonitorInfoFailed(#[source] windows_core::Error),
    #[cfg(target_os = "linux")]
    #[error("Failed to connect to the X server")]
    ConnectFailed(#[source] x11rb::errors::ConnectError),
    #[cfg(target_os = "linux")]
    #[error("The connection to the X server broke while sending a request")]
    ConnectionFailed(#[source] x11rb::errors::ConnectionError),
    #[cfg(target_os = "linux")]
    #[error("The X server rejected a request")]
    RequestFailed(#[source] x11rb::errors::ReplyError),
    #[cfg(target_os = "linux")]
    #[error("The X server does not support RandR 1.5 monitors (found {major}.{minor})")]
    RandrUnsupported { major: u32, minor: u32 },
    #[cfg(not(any(windows, target_os = "linux")))]
    #[error("No display backend is available for this platform")]
    Unsupported,
}

#[cfg(target_os = "linux")]
impl From<x11rb::errors::ConnectionError> for SysError {
    fn from(e: x11rb::errors::ConnectionError) -> Self {
        Self::ConnectionFailed(e)
    }
}

#[cfg(target_os = "linux")]
impl From<x11rb::errors::ReplyError> for SysError {
    fn from(e: x11rb::errors::ReplyError) -> Self {
        Self::RequestFailed(e)
    }
}

impl From<SysError> for Error {
    fn from(e: SysError) -> Self {
        Self::ListingDevicesFailed(Box::new(e))
    }
}
