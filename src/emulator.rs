//! Public handle over an emulated scrollbar.
//!
//! [`ScrollEmulator`] ties the lifecycle hooks and [`Options`] to the
//! [`ScrollSync`] doing the actual work, and exposes the operations callers
//! use once the scrollbar is in place.

use std::str::FromStr;

use crate::direction::Orientation;
use crate::event::{Event, EventResult};
use crate::geometry::HandleGeometry;
use crate::options::{OptionKey, OptionValue, Options};
use crate::platform::{ElementId, Marker, Platform};
use crate::sync::{Parts, ScrollSync};
use crate::Error;

/// Operations available by name through [`ScrollEmulator::call`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// [`ScrollEmulator::destroy`]
    Destroy,
    /// [`ScrollEmulator::recalculate`]
    Recalculate,
}

impl FromStr for Method {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "destroy" => Method::Destroy,
            "recalculate" => Method::Recalculate,
            _ => return Err(Error::NoSuchMethod(s.to_string())),
        })
    }
}

/// A trackpad-style scrollbar emulated over a host element.
///
/// Created by [`ScrollEmulator::initialize`]. The host forwards platform
/// events to [`ScrollEmulator::on_event`].
///
/// Once destroyed, every operation fails with [`Error::Destroyed`].
///
/// # Examples
///
/// ```rust
/// use trackpad_scroll::direction::Orientation;
/// use trackpad_scroll::platform::puppet::Page;
/// use trackpad_scroll::platform::{Platform, Role};
/// use trackpad_scroll::{Options, ScrollEmulator, Vec2};
///
/// let mut page = Page::new();
/// let host = page.add_element(Vec2::zero(), Vec2::new(200.0, 100.0));
/// let content = page.add_child(host, Role::Content);
/// page.set_extent(content, Orientation::Vertical, 500.0);
///
/// let mut emulator = ScrollEmulator::initialize(&mut page, host, Options::new())
///     .unwrap()
///     .unwrap();
///
/// let scroll_content = emulator.parts().unwrap().scroll_content;
/// page.set_scroll_offset(scroll_content, Orientation::Vertical, 250.0);
/// while let Some(event) = page.poll_event() {
///     emulator.on_event(&mut page, &event);
/// }
///
/// assert_eq!(emulator.geometry().unwrap().offset, 52.0);
///
/// emulator.destroy(&mut page).unwrap();
/// ```
#[derive(Debug)]
pub struct ScrollEmulator {
    host: ElementId,
    options: Options,
    sync: Option<ScrollSync>,
}

impl ScrollEmulator {
    /// Sets up the scrollbar emulation on `host`.
    ///
    /// `host` must contain an element with
    /// [`Role::Content`](crate::platform::Role::Content). It gets a
    /// horizontal scrollbar if it carries
    /// [`Marker::Horizontal`].
    ///
    /// Returns `Ok(None)` without changing anything if `host` already has an
    /// emulated scrollbar. Otherwise, runs the `on_init` callback and returns
    /// the new instance.
    pub fn initialize<P: Platform + ?Sized>(
        platform: &mut P,
        host: ElementId,
        options: Options,
    ) -> Result<Option<Self>, Error> {
        if platform.markers(host).contains(Marker::Emulated) {
            log::debug!("{:?} already has a scrollbar", host);
            return Ok(None);
        }

        let sync = ScrollSync::attach(platform, host, &options.settings)?;
        let emulator = ScrollEmulator {
            host,
            options,
            sync: Some(sync),
        };

        if let Some(ref on_init) = emulator.options.on_init {
            on_init(host);
        }

        Ok(Some(emulator))
    }

    /// Returns the host element.
    pub fn host(&self) -> ElementId {
        self.host
    }

    /// Returns `true` once [`destroy`](ScrollEmulator::destroy) was called.
    pub fn is_destroyed(&self) -> bool {
        self.sync.is_none()
    }

    fn sync(&self) -> Result<&ScrollSync, Error> {
        self.sync.as_ref().ok_or(Error::Destroyed)
    }

    fn sync_mut(&mut self) -> Result<&mut ScrollSync, Error> {
        self.sync.as_mut().ok_or(Error::Destroyed)
    }

    /// Returns the orientation chosen at initialization.
    pub fn orientation(&self) -> Result<Orientation, Error> {
        self.sync().map(ScrollSync::orientation)
    }

    /// Returns the injected elements.
    pub fn parts(&self) -> Result<Parts, Error> {
        self.sync().map(ScrollSync::parts)
    }

    /// Returns the geometry last written to the handle.
    pub fn geometry(&self) -> Result<HandleGeometry, Error> {
        self.sync().map(ScrollSync::geometry)
    }

    /// Returns `true` while the handle is shown.
    pub fn is_handle_visible(&self) -> Result<bool, Error> {
        self.sync().map(|sync| sync.flash_state().is_visible())
    }

    /// Returns `true` while the handle is being dragged.
    pub fn is_dragging(&self) -> Result<bool, Error> {
        self.sync().map(|sync| sync.drag().is_dragging())
    }

    /// Returns the value of an option.
    pub fn option(&self, key: &str) -> Result<OptionValue, Error> {
        self.sync()?;
        let key: OptionKey = key.parse()?;
        Ok(self.options.get(key))
    }

    /// Replaces the value of an option.
    ///
    /// Timing and margin changes apply from the next activity on.
    pub fn set_option(&mut self, key: &str, value: OptionValue) -> Result<(), Error> {
        self.sync()?;
        let key: OptionKey = key.parse()?;
        self.options.set(key, value)?;

        let settings = self.options.settings;
        self.sync_mut()?.set_settings(&settings);
        Ok(())
    }

    /// Gets an option if `value` is `None`, sets it otherwise.
    ///
    /// Returns the current value when getting, `None` when setting.
    pub fn option_or_set(
        &mut self,
        key: &str,
        value: Option<OptionValue>,
    ) -> Result<Option<OptionValue>, Error> {
        match value {
            Some(value) => self.set_option(key, value).map(|()| None),
            None => self.option(key).map(Some),
        }
    }

    /// Re-measures the host and content, and updates the scrollbar.
    ///
    /// Call this after the layout changed outside of the emulation.
    pub fn recalculate<P: Platform + ?Sized>(&mut self, platform: &mut P) -> Result<(), Error> {
        self.sync_mut()?.recalculate(platform);
        Ok(())
    }

    /// Removes the emulation and restores native scrolling.
    ///
    /// Runs the `on_destroy` callback after teardown.
    pub fn destroy<P: Platform + ?Sized>(&mut self, platform: &mut P) -> Result<(), Error> {
        let sync = self.sync.take().ok_or(Error::Destroyed)?;
        sync.teardown(platform);

        if let Some(ref on_destroy) = self.options.on_destroy {
            on_destroy(self.host);
        }
        Ok(())
    }

    /// Runs an operation by name.
    ///
    /// Fails with [`Error::NoSuchMethod`] for unknown names.
    pub fn call<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        method: &str,
    ) -> Result<(), Error> {
        match method.parse()? {
            Method::Destroy => self.destroy(platform),
            Method::Recalculate => self.recalculate(platform),
        }
    }

    /// Processes an event delivered by the platform.
    ///
    /// Events are ignored once destroyed.
    pub fn on_event<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        event: &Event,
    ) -> EventResult {
        match self.sync {
            Some(ref mut sync) => sync.handle_event(platform, event),
            None => EventResult::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Callback;
    use crate::platform::puppet::Page;
    use crate::platform::{Role, Target};
    use crate::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    fn page_with_host(content_size: f64) -> (Page, ElementId, ElementId) {
        let mut page = Page::new();
        let host = page.add_element(Vec2::new(0.0, 100.0), Vec2::new(200.0, 100.0));
        let content = page.add_child(host, Role::Content);
        page.set_extent(content, Orientation::Vertical, content_size);
        (page, host, content)
    }

    fn pump(page: &mut Page, emulator: &mut ScrollEmulator) {
        while let Some(event) = page.poll_event() {
            emulator.on_event(page, &event);
        }
    }

    fn pump_all(page: &mut Page, emulators: &mut [ScrollEmulator]) {
        while let Some(event) = page.poll_event() {
            for emulator in emulators.iter_mut() {
                emulator.on_event(page, &event);
            }
        }
    }

    fn counter() -> (Rc<Cell<usize>>, impl Fn(ElementId)) {
        let count = Rc::new(Cell::new(0));
        let cb = {
            let count = Rc::clone(&count);
            move |_: ElementId| count.set(count.get() + 1)
        };
        (count, cb)
    }

    #[test]
    fn hooks_run_once() {
        let (mut page, host, _) = page_with_host(500.0);
        let (inits, on_init) = counter();
        let (destroys, on_destroy) = counter();

        let options = Options::new().on_init(on_init).on_destroy(on_destroy);
        let mut emulator = ScrollEmulator::initialize(&mut page, host, options)
            .unwrap()
            .unwrap();
        assert_eq!(inits.get(), 1);
        assert_eq!(destroys.get(), 0);

        emulator.destroy(&mut page).unwrap();
        assert_eq!(inits.get(), 1);
        assert_eq!(destroys.get(), 1);
    }

    #[test]
    fn double_initialization_is_a_noop() {
        let (mut page, host, _) = page_with_host(500.0);
        let (inits, on_init) = counter();
        let on_init = Rc::new(on_init);

        let first = {
            let on_init = Rc::clone(&on_init);
            ScrollEmulator::initialize(&mut page, host, Options::new().on_init(move |h| on_init(h)))
                .unwrap()
        };
        assert!(first.is_some());

        let second = ScrollEmulator::initialize(
            &mut page,
            host,
            Options::new().on_init(move |h| on_init(h)),
        )
        .unwrap();
        assert!(second.is_none());

        assert_eq!(inits.get(), 1);
        assert_eq!(page.children(host).len(), 2);
    }

    #[test]
    fn nested_hosts_are_independent() {
        let mut page = Page::new();
        let outer = page.add_element(Vec2::zero(), Vec2::new(300.0, 200.0));
        let outer_content = page.add_child(outer, Role::Content);
        page.set_extent(outer_content, Orientation::Vertical, 800.0);

        let inner = page.add_child(outer_content, Role::Plain);
        page.resize(inner, Vec2::new(100.0, 50.0));
        let inner_content = page.add_child(inner, Role::Content);
        page.set_extent(inner_content, Orientation::Vertical, 400.0);

        let inner_emulator = ScrollEmulator::initialize(&mut page, inner, Options::new())
            .unwrap()
            .unwrap();

        let mut outer_emulator = ScrollEmulator::initialize(&mut page, outer, Options::new())
            .unwrap()
            .expect("outer host was never initialized");
        assert_eq!(outer_emulator.parts().unwrap().content, outer_content);
        assert!(outer_emulator.geometry().unwrap().visible);

        assert!(ScrollEmulator::initialize(&mut page, outer, Options::new())
            .unwrap()
            .is_none());

        outer_emulator.destroy(&mut page).unwrap();
        assert!(page.markers(inner).contains(Marker::Emulated));
        assert!(page.is_attached(inner_emulator.parts().unwrap().track));
    }

    #[test]
    fn flash_debounce() {
        let (mut page, host, _) = page_with_host(500.0);
        let mut emulator = ScrollEmulator::initialize(&mut page, host, Options::new())
            .unwrap()
            .unwrap();
        let ms = Duration::from_millis;

        // t = 0
        page.hover(host);
        pump(&mut page, &mut emulator);
        assert!(emulator.is_handle_visible().unwrap());

        // t = 500
        page.advance(ms(500));
        pump(&mut page, &mut emulator);
        page.hover(host);
        pump(&mut page, &mut emulator);

        // t = 1000: the first flash would have hidden the handle by now.
        page.advance(ms(500));
        pump(&mut page, &mut emulator);
        assert!(emulator.is_handle_visible().unwrap());

        // t = 1499
        page.advance(ms(499));
        pump(&mut page, &mut emulator);
        assert!(emulator.is_handle_visible().unwrap());

        // t = 1500
        page.advance(ms(1));
        pump(&mut page, &mut emulator);
        assert!(!emulator.is_handle_visible().unwrap());

        let handle = emulator.parts().unwrap().handle;
        assert!(!page.markers(handle).contains(Marker::Visible));
    }

    #[test]
    fn flash_delay_option() {
        let (mut page, host, _) = page_with_host(500.0);
        let mut emulator = ScrollEmulator::initialize(&mut page, host, Options::new())
            .unwrap()
            .unwrap();

        emulator
            .set_option("flashDelay", Duration::from_millis(100).into())
            .unwrap();

        page.hover(host);
        pump(&mut page, &mut emulator);
        page.advance(Duration::from_millis(100));
        pump(&mut page, &mut emulator);
        assert!(!emulator.is_handle_visible().unwrap());
    }

    #[test]
    fn negative_margin_is_rejected() {
        let mut page = Page::new();
        let host = page.add_element(Vec2::zero(), Vec2::new(200.0, 100.0));
        let content = page.add_child(host, Role::Content);
        page.set_extent(content, Orientation::Vertical, 101.0);

        let mut emulator = ScrollEmulator::initialize(&mut page, host, Options::new())
            .unwrap()
            .unwrap();
        let before = emulator.geometry().unwrap();

        assert!(matches!(
            emulator.set_option("handleMargin", (-50.0).into()),
            Err(Error::OptionType { .. })
        ));
        emulator.recalculate(&mut page).unwrap();

        let after = emulator.geometry().unwrap();
        assert_eq!(after, before);
        assert!(after.offset >= 0.0);
        assert!(after.size <= 100.0);
    }

    #[test]
    fn option_get_set() {
        let (mut page, host, _) = page_with_host(500.0);
        let mut emulator = ScrollEmulator::initialize(&mut page, host, Options::new())
            .unwrap()
            .unwrap();

        let (destroys, on_destroy) = counter();
        let result = emulator
            .option_or_set("onDestroy", Some(Callback::from_fn(on_destroy).into()))
            .unwrap();
        assert!(result.is_none());

        let value = emulator.option_or_set("onDestroy", None).unwrap().unwrap();
        value.as_callback().unwrap()(host);
        assert_eq!(destroys.get(), 1);

        assert!(matches!(
            emulator.option("nope"),
            Err(Error::NoSuchOption(_))
        ));

        emulator.destroy(&mut page).unwrap();
        assert_eq!(destroys.get(), 2);
    }

    #[test]
    fn call_by_name() {
        let (mut page, host, content) = page_with_host(500.0);
        let mut emulator = ScrollEmulator::initialize(&mut page, host, Options::new())
            .unwrap()
            .unwrap();

        page.set_extent(content, Orientation::Vertical, 1000.0);
        emulator.call(&mut page, "recalculate").unwrap();
        // ratio = 0.1: floor(0.1 * 98) - 2 = 7.
        assert_eq!(emulator.geometry().unwrap().size, 7.0);

        match emulator.call(&mut page, "explode") {
            Err(Error::NoSuchMethod(name)) => assert_eq!(name, "explode"),
            other => panic!("unexpected {:?}", other),
        }

        emulator.call(&mut page, "destroy").unwrap();
        assert!(emulator.is_destroyed());
    }

    #[test]
    fn operations_after_destroy_fail() {
        let (mut page, host, _) = page_with_host(500.0);
        let mut emulator = ScrollEmulator::initialize(&mut page, host, Options::new())
            .unwrap()
            .unwrap();
        emulator.destroy(&mut page).unwrap();

        assert!(matches!(emulator.recalculate(&mut page), Err(Error::Destroyed)));
        assert!(matches!(emulator.destroy(&mut page), Err(Error::Destroyed)));
        assert!(matches!(emulator.option("onInit"), Err(Error::Destroyed)));
        assert!(matches!(emulator.geometry(), Err(Error::Destroyed)));
        assert_eq!(
            emulator.on_event(&mut page, &Event::WindowResize),
            EventResult::Ignored
        );

        // The host can be emulated again.
        assert!(ScrollEmulator::initialize(&mut page, host, Options::new())
            .unwrap()
            .is_some());
    }

    #[test]
    fn destroy_restores_native_scrolling() {
        let (mut page, host, content) = page_with_host(500.0);
        let mut emulator = ScrollEmulator::initialize(&mut page, host, Options::new())
            .unwrap()
            .unwrap();
        let parts = emulator.parts().unwrap();

        emulator.destroy(&mut page).unwrap();

        assert_eq!(page.children(host), &[content]);
        assert!(!page.is_attached(parts.track));
        assert!(!page.is_attached(parts.scroll_content));
        assert_eq!(page.parent(content), Some(host));
        assert_eq!(page.extent(content).y, Some(100.0));
        assert!(page.overflow_scroll(content).y);
    }

    #[test]
    fn drag_round_trip() {
        let mut page = Page::new();
        let host = page.add_element(Vec2::new(0.0, 100.0), Vec2::new(200.0, 200.0));
        let content = page.add_child(host, Role::Content);
        page.set_extent(content, Orientation::Vertical, 1000.0);

        let mut emulator = ScrollEmulator::initialize(&mut page, host, Options::new())
            .unwrap()
            .unwrap();
        let parts = emulator.parts().unwrap();
        let forward = crate::geometry::handle_geometry(crate::geometry::ViewportMetrics::new(
            200.0, 1000.0, 400.0,
        ));

        // Handle at page y = 102, grabbed 4px in.
        page.press(parts.handle, Vec2::new(5.0, 106.0));
        pump(&mut page, &mut emulator);

        // A 400px scroll corresponds to 80px along the track.
        page.move_pointer(Vec2::new(5.0, 100.0 + 4.0 + 80.0));
        pump(&mut page, &mut emulator);

        assert_eq!(page.scroll_offset(parts.scroll_content).y, 400.0);
        let back = emulator.geometry().unwrap();
        assert!((back.offset - forward.offset).abs() <= 1.0);

        page.release(Vec2::zero());
        pump(&mut page, &mut emulator);
        assert!(!emulator.is_dragging().unwrap());
    }

    #[test]
    fn instances_do_not_share_drags() {
        let mut page = Page::new();
        let mut emulators = Vec::new();
        for i in 0..2u32 {
            let origin = Vec2::new(300.0 * f64::from(i), 0.0);
            let host = page.add_element(origin, Vec2::new(200.0, 100.0));
            let content = page.add_child(host, Role::Content);
            page.set_extent(content, Orientation::Vertical, 500.0);
            emulators.push(
                ScrollEmulator::initialize(&mut page, host, Options::new())
                    .unwrap()
                    .unwrap(),
            );
        }

        // The native scrollbar is only measured once for the page.
        assert_eq!(page.probe_count(), 1);

        let handle = emulators[0].parts().unwrap().handle;
        // Handle at page y = 2, grabbed 1px in.
        assert!(page.press(handle, Vec2::new(10.0, 3.0)));
        pump_all(&mut page, &mut emulators);
        assert!(page.move_pointer(Vec2::new(10.0, 50.0)));
        pump_all(&mut page, &mut emulators);
        assert!(page.release(Vec2::new(10.0, 50.0)));
        pump_all(&mut page, &mut emulators);

        let first = emulators[0].parts().unwrap().scroll_content;
        let second = emulators[1].parts().unwrap().scroll_content;
        // (50 - 0 - 1) / 100 * 500
        assert_eq!(page.scroll_offset(first).y, 245.0);
        assert_eq!(page.scroll_offset(second).y, 0.0);
        assert_eq!(page.listener_count(Target::Document), 0);
    }
}
