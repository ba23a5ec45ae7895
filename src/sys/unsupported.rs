use crate::config::Config;
use crate::environment::GraphicsEnvironment;
use crate::environment::NativeScreen;
use crate::error::Error;
use crate::error::SysError;
use crate::geometry::Dimension;
use crate::geometry::Rectangle;

/// Stand-in for platforms without a windowing backend. It can never be
/// opened, so enumeration on these platforms always comes back empty.
#[derive(Debug)]
pub struct UnsupportedEnvironment {
    _private: (),
}

impl UnsupportedEnvironment {
    pub fn open(_config: &Config) -> Option<Self> {
        log::warn!("no windowing backend for this platform");
        None
    }
}

impl GraphicsEnvironment for UnsupportedEnvironment {
    type Screen = UnsupportedScreen;

    fn is_headless(&self) -> bool {
        true
    }

    fn screen_devices(&self) -> Result<Vec<UnsupportedScreen>, Error> {
        Err(SysError::Unsupported.into())
    }
}

#[derive(Debug)]
pub enum UnsupportedScreen {}

impl NativeScreen for UnsupportedScreen {
    fn display_mode(&self) -> Option<Dimension> {
        match *self {}
    }

    fn id_string(&self) -> String {
        match *self {}
    }

    fn default_configuration_bounds(&self) -> Rectangle {
        match *self {}
    }
}
