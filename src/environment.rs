//! The narrow seam between the platform's windowing API and the
//! platform-agnostic enumeration in this crate.

use crate::error::Error;
use crate::geometry::Dimension;
use crate::geometry::Rectangle;

/// One display device as the windowing subsystem sees it.
///
/// Every query goes to the live device, so answers may change between calls
/// if the user reconfigures their displays.
pub trait NativeScreen {
    /// The active display mode, or `None` if it cannot be determined.
    fn display_mode(&self) -> Option<Dimension>;

    /// Identifier of the device, e.g. `\\.\DISPLAY1` or `DP-1`.
    fn id_string(&self) -> String;

    /// Position and size of the device in desktop coordinates.
    fn default_configuration_bounds(&self) -> Rectangle;
}

/// The windowing subsystem's aggregate view of all connected displays.
pub trait GraphicsEnvironment {
    type Screen: NativeScreen;

    /// A headless environment has no displays and must not be asked for any.
    fn is_headless(&self) -> bool;

    /// All connected display devices, in the order the subsystem reports them.
    fn screen_devices(&self) -> Result<Vec<Self::Screen>, Error>;
}
