use std::fmt;

use itertools::Either;
use log::debug;
use log::warn;
use serde::Deserialize;
use serde::Serialize;

use crate::environment::GraphicsEnvironment;
use crate::environment::NativeScreen;
use crate::error::Error;
use crate::geometry::Dimension;
use crate::geometry::Point;
use crate::geometry::Rectangle;

/// A display device tagged with its position in the enumeration that
/// produced it.
///
/// Only the index is fixed; size and bounds are read from the device on
/// every call.
#[derive(Debug)]
pub struct ScreenDevice<S> {
    index: usize,
    screen: S,
}

impl<S: NativeScreen> ScreenDevice<S> {
    pub(crate) const fn new(index: usize, screen: S) -> Self {
        Self { index, screen }
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    /// Current resolution, or `None` if the display mode is unknown.
    pub fn size(&self) -> Option<Dimension> {
        self.screen.display_mode()
    }

    pub fn name(&self) -> String {
        self.screen.id_string()
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    pub fn bounds(&self) -> Rectangle {
        self.screen.default_configuration_bounds()
    }

    pub const fn native(&self) -> &S {
        &self.screen
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            index: self.index,
            name: self.name(),
            size: self.size(),
            bounds: self.bounds(),
        }
    }
}

impl<S: NativeScreen> fmt::Display for ScreenDevice<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "screen {} ({})", self.index, self.name())
    }
}

/// A point-in-time copy of everything a [`ScreenDevice`] reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSnapshot {
    pub index: usize,
    pub name: String,
    pub size: Option<Dimension>,
    pub bounds: Rectangle,
}

/// Enumerates the screens of `env`.
///
/// A missing or headless environment yields no screens and is not an error;
/// only a failing device query is.
pub fn screen_devices<E: GraphicsEnvironment>(
    env: Option<&E>,
) -> Result<impl Iterator<Item = ScreenDevice<E::Screen>>, Error> {
    let screens = match env {
        None => {
            debug!("no graphics environment, skipping screen enumeration");
            return Ok(Either::Left(std::iter::empty()));
        }
        Some(env) if env.is_headless() => {
            debug!("graphics environment is headless, skipping screen enumeration");
            return Ok(Either::Left(std::iter::empty()));
        }
        Some(env) => env.screen_devices()?,
    };
    debug!("found {} screen device(s)", screens.len());

    Ok(Either::Right(
        screens
            .into_iter()
            .enumerate()
            .map(|(index, screen)| ScreenDevice::new(index, screen)),
    ))
}

/// Like [`screen_devices`], but a failing query is logged and treated as
/// "no screens".
pub fn available_screen_devices_in<E: GraphicsEnvironment>(
    env: Option<&E>,
) -> Vec<ScreenDevice<E::Screen>> {
    match screen_devices(env) {
        Ok(screens) => screens.collect(),
        Err(e) => {
            warn!("{e}: {}", source_chain(&e));
            Vec::new()
        }
    }
}

/// The screen [`best_screen_device`] picks among those of `env`.
pub fn default_screen_device_in<E: GraphicsEnvironment>(
    env: Option<&E>,
) -> Option<ScreenDevice<E::Screen>> {
    best_screen_device(available_screen_devices_in(env))
}

/// Picks the first screen that beats every earlier pick in width or in
/// height. Screens with an unknown size are never picked.
pub fn best_screen_device<S: NativeScreen>(
    screens: impl IntoIterator<Item = ScreenDevice<S>>,
) -> Option<ScreenDevice<S>> {
    let mut width = 0;
    let mut height = 0;
    let mut best = None;

    for screen in screens {
        if let Some(res) = screen.size() {
            if width < res.width || height < res.height {
                width = res.width;
                height = res.height;
                best = Some(screen);
            }
        }
    }
    best
}

fn source_chain(e: &dyn std::error::Error) -> String {
    let mut causes = Vec::new();
    let mut source = e.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    causes.join(": ")
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug)]
    struct FakeScreen {
        id: &'static str,
        mode: Rc<Cell<Option<Dimension>>>,
        bounds: Rectangle,
    }

    impl FakeScreen {
        fn new(id: &'static str, mode: Option<(i32, i32)>, bounds: Rectangle) -> Self {
            Self {
                id,
                mode: Rc::new(Cell::new(mode.map(|(w, h)| Dimension::new(w, h)))),
                bounds,
            }
        }
    }

    impl NativeScreen for FakeScreen {
        fn display_mode(&self) -> Option<Dimension> {
            self.mode.get()
        }

        fn id_string(&self) -> String {
            self.id.to_string()
        }

        fn default_configuration_bounds(&self) -> Rectangle {
            self.bounds
        }
    }

    struct FakeEnvironment {
        headless: bool,
        fail: bool,
        modes: Vec<Option<(i32, i32)>>,
    }

    impl FakeEnvironment {
        fn with_modes(modes: &[Option<(i32, i32)>]) -> Self {
            Self {
                headless: false,
                fail: false,
                modes: modes.to_vec(),
            }
        }
    }

    impl GraphicsEnvironment for FakeEnvironment {
        type Screen = FakeScreen;

        fn is_headless(&self) -> bool {
            self.headless
        }

        fn screen_devices(&self) -> Result<Vec<FakeScreen>, Error> {
            assert!(!self.headless, "headless environments must not be queried");
            if self.fail {
                return Err(Error::ListingDevicesFailed("device query failed".into()));
            }
            let mut x = 0;
            Ok(self
                .modes
                .iter()
                .map(|mode| {
                    let (w, h) = mode.unwrap_or((1024, 768));
                    let screen = FakeScreen::new("fake", *mode, Rectangle::new(x, 0, w, h));
                    x += w;
                    screen
                })
                .collect())
        }
    }

    fn sizes(screens: &[ScreenDevice<FakeScreen>]) -> Vec<Option<Dimension>> {
        screens.iter().map(ScreenDevice::size).collect()
    }

    #[test]
    fn headless_environment_has_no_screens() {
        let env = FakeEnvironment {
            headless: true,
            ..FakeEnvironment::with_modes(&[Some((800, 600))])
        };
        assert!(available_screen_devices_in(Some(&env)).is_empty());
        assert!(default_screen_device_in(Some(&env)).is_none());
    }

    #[test]
    fn missing_environment_has_no_screens() {
        assert!(available_screen_devices_in::<FakeEnvironment>(None).is_empty());
        assert!(screen_devices::<FakeEnvironment>(None).unwrap().next().is_none());
    }

    #[test]
    fn indices_follow_encounter_order() {
        let env = FakeEnvironment::with_modes(&[Some((800, 600)), None, Some((640, 480))]);
        let screens = available_screen_devices_in(Some(&env));

        assert_eq!(screens.len(), 3);
        let indices: Vec<_> = screens.iter().map(ScreenDevice::index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(
            sizes(&screens),
            vec![
                Some(Dimension::new(800, 600)),
                None,
                Some(Dimension::new(640, 480))
            ]
        );
    }

    #[test]
    fn picks_the_largest_screen() {
        let env =
            FakeEnvironment::with_modes(&[Some((800, 600)), Some((1920, 1080)), Some((640, 480))]);
        let best = default_screen_device_in(Some(&env)).unwrap();
        assert_eq!(best.index(), 1);
        assert_eq!(best.size(), Some(Dimension::new(1920, 1080)));
    }

    #[test]
    fn first_seen_wins_on_ties() {
        let env = FakeEnvironment::with_modes(&[Some((1920, 1080)), Some((1920, 1080))]);
        assert_eq!(default_screen_device_in(Some(&env)).unwrap().index(), 0);
    }

    #[test]
    fn a_taller_screen_beats_a_wider_one() {
        let env = FakeEnvironment::with_modes(&[Some((2560, 1080)), Some((1080, 1920))]);
        assert_eq!(default_screen_device_in(Some(&env)).unwrap().index(), 1);
    }

    #[test]
    fn no_best_screen_without_known_sizes() {
        assert!(best_screen_device(Vec::<ScreenDevice<FakeScreen>>::new()).is_none());

        let env = FakeEnvironment::with_modes(&[None, None]);
        assert!(default_screen_device_in(Some(&env)).is_none());
    }

    #[test]
    fn screens_with_unknown_size_are_skipped() {
        let env = FakeEnvironment::with_modes(&[None, Some((1280, 720))]);
        assert_eq!(default_screen_device_in(Some(&env)).unwrap().index(), 1);
    }

    #[test]
    fn size_is_read_on_every_call() {
        let screen = FakeScreen::new("fake", Some((800, 600)), Rectangle::new(0, 0, 800, 600));
        let mode = Rc::clone(&screen.mode);
        let device = ScreenDevice::new(0, screen);

        assert_eq!(device.size(), Some(Dimension::new(800, 600)));
        mode.set(None);
        assert_eq!(device.size(), None);
        mode.set(Some(Dimension::new(1024, 768)));
        assert_eq!(device.size(), Some(Dimension::new(1024, 768)));
    }

    #[test]
    fn contains_point_uses_bounds() {
        let env = FakeEnvironment::with_modes(&[Some((800, 600)), Some((1024, 768))]);
        let screens = available_screen_devices_in(Some(&env));

        assert!(screens[0].contains_point(Point::new(0, 0)));
        assert!(!screens[0].contains_point(Point::new(800, 0)));
        assert!(screens[1].contains_point(Point::new(800, 0)));
        assert!(!screens[1].contains_point(Point::new(900, 768)));
    }

    #[test]
    fn query_failure_is_surfaced_or_swallowed() {
        let env = FakeEnvironment {
            fail: true,
            ..FakeEnvironment::with_modes(&[Some((800, 600))])
        };
        assert!(matches!(
            screen_devices(Some(&env)),
            Err(Error::ListingDevicesFailed(_))
        ));
        assert!(available_screen_devices_in(Some(&env)).is_empty());
    }

    #[test]
    fn snapshot_copies_current_state() {
        let env = FakeEnvironment::with_modes(&[None, Some((1280, 1024))]);
        let screens = available_screen_devices_in(Some(&env));
        let snapshot = screens[1].snapshot();

        assert_eq!(
            snapshot,
            ScreenSnapshot {
                index: 1,
                name: "fake".to_string(),
                size: Some(Dimension::new(1280, 1024)),
                bounds: Rectangle::new(1024, 0, 1280, 1024),
            }
        );
        assert_eq!(screens[1].to_string(), "screen 1 (fake)");
    }
}
