use std::env;
use std::sync::Arc;

use log::debug;
use log::warn;
use x11rb::connection::Connection;
use x11rb::protocol::randr;
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::xproto::Atom;
use x11rb::protocol::xproto::ConnectionExt as _;
use x11rb::protocol::xproto::Window;
use x11rb::rust_connection::RustConnection;

use crate::config::Config;
use crate::environment::GraphicsEnvironment;
use crate::environment::NativeScreen;
use crate::error::Error;
use crate::error::SysError;
use crate::geometry::Dimension;
use crate::geometry::Rectangle;

/// An X server seen through RandR monitors.
///
/// Without a display to talk to the environment is headless and holds no
/// connection.
pub struct X11Environment {
    session: Option<Session>,
}

#[derive(Clone)]
struct Session {
    conn: Arc<RustConnection>,
    root: Window,
}

impl X11Environment {
    /// Returns `None` when a display is configured but the server cannot be
    /// reached.
    pub fn open(config: &Config) -> Option<Self> {
        let display = config
            .display
            .clone()
            .or_else(|| env::var("DISPLAY").ok().filter(|d| !d.is_empty()));
        let headless = config.headless.unwrap_or(display.is_none());
        if headless {
            debug!("X11 environment is headless");
            return Some(Self { session: None });
        }

        match Session::connect(display.as_deref()) {
            Ok(session) => Some(Self {
                session: Some(session),
            }),
            Err(e) => {
                warn!("X11 windowing subsystem is unavailable: {e}");
                None
            }
        }
    }
}

impl Session {
    fn connect(display: Option<&str>) -> Result<Self, SysError> {
        let (conn, screen_num) = x11rb::connect(display).map_err(SysError::ConnectFailed)?;
        let root = conn.setup().roots[screen_num].root;

        let version = conn
            .randr_query_version(1, 5)?
            .reply()?;
        if (version.major_version, version.minor_version) < (1, 5) {
            return Err(SysError::RandrUnsupported {
                major: version.major_version,
                minor: version.minor_version,
            });
        }

        Ok(Self {
            conn: Arc::new(conn),
            root,
        })
    }

    fn monitors(&self) -> Result<Vec<randr::MonitorInfo>, SysError> {
        Ok(self
            .conn
            .randr_get_monitors(self.root, true)?
            .reply()?
            .monitors)
    }

    fn atom_name(&self, atom: Atom) -> Result<String, SysError> {
        let reply = self.conn.get_atom_name(atom)?.reply()?;
        Ok(String::from_utf8_lossy(&reply.name).into_owned())
    }

    /// Size of the mode driving the first lit output of a monitor.
    fn current_mode(&self, outputs: &[randr::Output]) -> Result<Option<Dimension>, SysError> {
        let timestamp = self
            .conn
            .randr_get_screen_resources_current(self.root)?
            .reply()?
            .config_timestamp;

        for &output in outputs {
            let crtc = self
                .conn
                .randr_get_output_info(output, timestamp)?
                .reply()?
                .crtc;
            if crtc == x11rb::NONE {
                continue;
            }
            let info = self.conn.randr_get_crtc_info(crtc, timestamp)?.reply()?;
            if info.mode != x11rb::NONE {
                return Ok(Some(Dimension::new(
                    i32::from(info.width),
                    i32::from(info.height),
                )));
            }
        }
        Ok(None)
    }
}

impl GraphicsEnvironment for X11Environment {
    type Screen = X11Screen;

    fn is_headless(&self) -> bool {
        self.session.is_none()
    }

    fn screen_devices(&self) -> Result<Vec<X11Screen>, Error> {
        let Some(session) = &self.session else {
            return Ok(Vec::new());
        };

        session
            .monitors()?
            .into_iter()
            .map(|monitor| {
                Ok(X11Screen {
                    id: session.atom_name(monitor.name)?,
                    session: session.clone(),
                    name: monitor.name,
                    outputs: monitor.outputs.clone(),
                    bounds: monitor_bounds(&monitor),
                })
            })
            .collect::<Result<_, SysError>>()
            .map_err(Into::into)
    }
}

/// A RandR monitor, identified by its name atom.
pub struct X11Screen {
    session: Session,
    name: Atom,
    id: String,
    outputs: Vec<randr::Output>,
    /// Bounds at enumeration time, used if the monitor disappears.
    bounds: Rectangle,
}

impl std::fmt::Debug for X11Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("X11Screen")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("outputs", &self.outputs)
            .finish()
    }
}

impl NativeScreen for X11Screen {
    fn display_mode(&self) -> Option<Dimension> {
        self.session
            .current_mode(&self.outputs)
            .unwrap_or_else(|e| {
                debug!("{}: display mode query failed: {e}", self.id);
                None
            })
    }

    fn id_string(&self) -> String {
        self.id.clone()
    }

    fn default_configuration_bounds(&self) -> Rectangle {
        let live = self.session.monitors().map(|monitors| {
            monitors
                .iter()
                .find(|m| m.name == self.name)
                .map(monitor_bounds)
        });
        match live {
            Ok(Some(bounds)) => bounds,
            Ok(None) => {
                debug!("{}: monitor is gone, using enumeration-time bounds", self.id);
                self.bounds
            }
            Err(e) => {
                debug!("{}: using enumeration-time bounds ({e})", self.id);
                self.bounds
            }
        }
    }
}

fn monitor_bounds(monitor: &randr::MonitorInfo) -> Rectangle {
    Rectangle::new(
        i32::from(monitor.x),
        i32::from(monitor.y),
        i32::from(monitor.width),
        i32::from(monitor.height),
    )
}
