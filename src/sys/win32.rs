use std::ffi::OsString;
use std::mem::size_of;
use std::os::windows::ffi::OsStringExt;

use log::debug;
use windows::core::BOOL;
use windows::core::PCWSTR;
use windows::Win32::Foundation::LPARAM;
use windows::Win32::Foundation::RECT;
use windows::Win32::Graphics::Gdi::EnumDisplayMonitors;
use windows::Win32::Graphics::Gdi::EnumDisplaySettingsW;
use windows::Win32::Graphics::Gdi::GetMonitorInfoW;
use windows::Win32::Graphics::Gdi::DEVMODEW;
use windows::Win32::Graphics::Gdi::ENUM_CURRENT_SETTINGS;
use windows::Win32::Graphics::Gdi::HDC;
use windows::Win32::Graphics::Gdi::HMONITOR;
use windows::Win32::Graphics::Gdi::MONITORINFO;
use windows::Win32::Graphics::Gdi::MONITORINFOEXW;

use crate::config::Config;
use crate::environment::GraphicsEnvironment;
use crate::environment::NativeScreen;
use crate::error::Error;
use crate::error::SysError;
use crate::geometry::Dimension;
use crate::geometry::Rectangle;

/// The GDI view of the desktop. Windows is never headless unless configured.
#[derive(Debug)]
pub struct Win32Environment {
    headless: bool,
}

impl Win32Environment {
    pub fn open(config: &Config) -> Option<Self> {
        Some(Self {
            headless: config.headless.unwrap_or(false),
        })
    }
}

impl GraphicsEnvironment for Win32Environment {
    type Screen = Win32Screen;

    fn is_headless(&self) -> bool {
        self.headless
    }

    fn screen_devices(&self) -> Result<Vec<Win32Screen>, Error> {
        unsafe {
            enum_display_monitors()?
                .into_iter()
                .map(|hmonitor| {
                    let info = get_monitor_info(hmonitor)?;
                    Ok(Win32Screen {
                        hmonitor: hmonitor.0 as isize,
                        device_name: info.szDevice,
                        bounds: rect_to_rectangle(info.monitorInfo.rcMonitor),
                    })
                })
                .collect::<Result<_, SysError>>()
                .map_err(Into::into)
        }
    }
}

/// A logical monitor (`HMONITOR`) together with its GDI device name.
pub struct Win32Screen {
    hmonitor: isize,
    /// NUL-terminated, as handed back by `GetMonitorInfoW`.
    device_name: [u16; 32],
    /// Bounds at enumeration time, used if the monitor disappears.
    bounds: Rectangle,
}

impl std::fmt::Debug for Win32Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Win32Screen")
            .field("hmonitor", &self.hmonitor)
            .field("device_name", &wchar_to_string(&self.device_name))
            .finish()
    }
}

impl NativeScreen for Win32Screen {
    fn display_mode(&self) -> Option<Dimension> {
        let mut mode = DEVMODEW {
            dmSize: size_of::<DEVMODEW>() as u16,
            ..Default::default()
        };
        unsafe {
            EnumDisplaySettingsW(
                PCWSTR(self.device_name.as_ptr()),
                ENUM_CURRENT_SETTINGS,
                &mut mode,
            )
            .as_bool()
            .then(|| Dimension::new(mode.dmPelsWidth as i32, mode.dmPelsHeight as i32))
        }
    }

    fn id_string(&self) -> String {
        wchar_to_string(&self.device_name)
    }

    fn default_configuration_bounds(&self) -> Rectangle {
        let hmonitor = HMONITOR(self.hmonitor as *mut _);
        match unsafe { get_monitor_info(hmonitor) } {
            Ok(info) => rect_to_rectangle(info.monitorInfo.rcMonitor),
            Err(e) => {
                debug!("{}: using enumeration-time bounds ({e})", self.id_string());
                self.bounds
            }
        }
    }
}

/// Calls `EnumDisplayMonitors` and returns a list of `HMONITOR` handles.\
/// Note that a `HMONITOR` is a logical construct that may correspond to multiple physical monitors.\
/// e.g. when in "Duplicate" mode two physical monitors will belong to the same `HMONITOR`
unsafe fn enum_display_monitors() -> Result<Vec<HMONITOR>, SysError> {
    unsafe extern "system" fn enum_monitors(
        handle: HMONITOR,
        _: HDC,
        _: *mut RECT,
        data: LPARAM,
    ) -> BOOL {
        let monitors = &mut *(data.0 as *mut Vec<HMONITOR>);
        monitors.push(handle);
        true.into()
    }
    let mut hmonitors = Vec::<HMONITOR>::new();
    EnumDisplayMonitors(
        None,
        None,
        Some(enum_monitors),
        LPARAM(&mut hmonitors as *mut _ as isize),
    )
    .ok()
    .map_err(SysError::EnumDisplayMonitorsFailed)?;
    Ok(hmonitors)
}

unsafe fn get_monitor_info(hmonitor: HMONITOR) -> Result<MONITORINFOEXW, SysError> {
    let mut info = MONITORINFOEXW::default();
    info.monitorInfo.cbSize = size_of::<MONITORINFOEXW>() as u32;
    let info_ptr = &mut info as *mut _ as *mut MONITORINFO;
    GetMonitorInfoW(hmonitor, info_ptr)
        .ok()
        .map_err(SysError::GetMonitorInfoFailed)?;
    Ok(info)
}

const fn rect_to_rectangle(rect: RECT) -> Rectangle {
    Rectangle::from_edges(rect.left, rect.top, rect.right, rect.bottom)
}

fn wchar_to_string(s: &[u16]) -> String {
    let end = s.iter().position(|&x| x == 0).unwrap_or(s.len());
    let truncated = &s[0..end];
    OsString::from_wide(truncated).to_string_lossy().into()
}
