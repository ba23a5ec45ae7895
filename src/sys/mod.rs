//! Platform backends. Exactly one of them is compiled in and exported as
//! `LocalEnvironment` / `LocalScreen`.

#[cfg(windows)]
mod win32;
#[cfg(windows)]
pub use self::win32::{Win32Environment as LocalEnvironment, Win32Screen as LocalScreen};

#[cfg(target_os = "linux")]
mod x11;
#[cfg(target_os = "linux")]
pub use self::x11::{X11Environment as LocalEnvironment, X11Screen as LocalScreen};

#[cfg(not(any(windows, target_os = "linux")))]
mod unsupported;
#[cfg(not(any(windows, target_os = "linux")))]
pub use self::unsupported::{
    UnsupportedEnvironment as LocalEnvironment, UnsupportedScreen as LocalScreen,
};
