//! Keeps the emulated scrollbar in sync with its content.
//!
//! [`ScrollSync`] owns the injected elements, the [`FlashState`] and the
//! [`DragController`], and routes platform events to them:
//!
//! * A scroll of the container recomputes the handle geometry and flashes
//!   the handle.
//! * Hovering the host flashes the handle.
//! * Pressing the handle starts a drag; document-wide motion and release
//!   continue and end it.
//! * The flash timer hides the handle again.
//! * A window resize re-applies the layout.

use crate::direction::Orientation;
use crate::drag::{DragController, DragTarget};
use crate::event::{Event, EventKind, EventResult, PointerEvent};
use crate::flash::FlashState;
use crate::geometry::{self, HandleGeometry, ViewportMetrics};
use crate::options::Settings;
use crate::platform::{self, ElementId, ListenerId, Marker, Platform, Role, Target};
use crate::Error;

/// Elements making up an emulated scrollbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parts {
    /// The element given at initialization.
    pub host: ElementId,
    /// The scrolled content, found inside the host.
    pub content: ElementId,
    /// The injected track.
    pub track: ElementId,
    /// The injected drag handle, inside the track.
    pub handle: ElementId,
    /// The injected scrollable container, wrapping the content.
    pub scroll_content: ElementId,
}

impl Parts {
    fn drag_target(&self) -> DragTarget {
        DragTarget {
            track: self.track,
            content: self.content,
            scroll_content: self.scroll_content,
        }
    }
}

/// Orchestrates geometry, visibility and drag for one host element.
#[derive(Debug)]
pub struct ScrollSync {
    orientation: Orientation,
    parts: Parts,
    flash: FlashState,
    drag: DragController,
    listeners: Vec<ListenerId>,
    handle_margin: f64,
    geometry: HandleGeometry,
}

impl ScrollSync {
    /// Injects the scrollbar into `host` and starts listening to it.
    ///
    /// The orientation is horizontal if the host carries
    /// [`Marker::Horizontal`], vertical otherwise.
    pub fn attach<P: Platform + ?Sized>(
        platform: &mut P,
        host: ElementId,
        settings: &Settings,
    ) -> Result<Self, Error> {
        let orientation = if platform.markers(host).contains(Marker::Horizontal) {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };

        let content = platform
            .find_child(host, Role::Content)
            .ok_or(Error::MissingContent)?;

        let track = platform.create_element(Role::Track);
        let handle = platform.create_element(Role::Handle);
        platform.prepend(track, handle);
        platform.prepend(host, track);

        let scroll_content = platform.create_element(Role::ScrollContent);
        platform.wrap(content, scroll_content);

        let mut sync = ScrollSync {
            orientation,
            parts: Parts {
                host,
                content,
                track,
                handle,
                scroll_content,
            },
            flash: FlashState::new(settings.flash_delay),
            drag: DragController::new(orientation),
            listeners: Vec::new(),
            handle_margin: settings.handle_margin,
            geometry: HandleGeometry::hidden(),
        };

        sync.resize_scroll_content(platform);

        sync.listeners = vec![
            platform.listen(Target::Element(host), EventKind::PointerEnter),
            platform.listen(Target::Element(handle), EventKind::PointerDown),
            platform.listen(Target::Element(scroll_content), EventKind::Scroll),
        ];

        sync.resize_scrollbar(platform);
        platform.add_marker(host, Marker::Emulated);

        log::debug!("Attached {:?} scrollbar to {:?}", orientation, host);
        Ok(sync)
    }

    /// Returns the orientation of this scrollbar.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns the elements making up this scrollbar.
    pub fn parts(&self) -> Parts {
        self.parts
    }

    /// Returns the last geometry written to the handle.
    pub fn geometry(&self) -> HandleGeometry {
        self.geometry
    }

    /// Returns the visibility state.
    pub fn flash_state(&self) -> &FlashState {
        &self.flash
    }

    /// Returns the drag controller.
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Changes the delay before the handle hides.
    pub fn set_settings(&mut self, settings: &Settings) {
        self.flash.set_delay(settings.flash_delay);
        self.handle_margin = settings.handle_margin;
    }

    /// Measures the current metrics along the scrolling axis.
    pub fn metrics<P: Platform + ?Sized>(&self, platform: &P) -> ViewportMetrics {
        let o = self.orientation;
        ViewportMetrics::new(
            o.get(&platform.size(self.parts.track)),
            o.get(&platform.size(self.parts.content)),
            o.get(&platform.scroll_offset(self.parts.scroll_content)),
        )
    }

    /// Recomputes the handle geometry and writes it to the platform.
    ///
    /// The track is hidden when there is nothing to scroll.
    pub fn resize_scrollbar<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
    ) -> HandleGeometry {
        let metrics = self.metrics(platform);
        let geometry = geometry::handle_geometry_with_margin(metrics, self.handle_margin);
        log::trace!("{:?} -> {:?}", metrics, geometry);

        if geometry.visible {
            let o = self.orientation;
            platform.set_position(self.parts.handle, o, geometry.offset);
            platform.set_extent(self.parts.handle, o, geometry.size);
        }
        platform.set_shown(self.parts.track, geometry.visible);

        self.geometry = geometry;
        geometry
    }

    /// Sizes the scrollable container so the native scrollbar falls
    /// outside of the host.
    pub fn resize_scroll_content<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        let o = self.orientation;
        let scrollbar_width = platform::native_scrollbar_width(platform);
        let host_size = platform.size(self.parts.host);

        let main = o.get(&host_size);
        let cross = o.swap().get(&host_size);

        platform.set_extent(self.parts.scroll_content, o, main);
        platform.set_extent(self.parts.scroll_content, o.swap(), cross + scrollbar_width);
        platform.set_overflow_scroll(self.parts.scroll_content, o);

        if o == Orientation::Horizontal {
            platform.set_extent(self.parts.content, Orientation::Vertical, cross);
        }
    }

    /// Shows the handle with fresh geometry, and restarts the hide timer.
    pub fn flash<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        self.resize_scrollbar(platform);
        self.flash.flash(platform);
        platform.add_marker(self.parts.handle, Marker::Visible);
    }

    /// Called when the scrollable container scrolled.
    pub fn on_scroll<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        self.flash(platform);
    }

    /// Called when the pointer entered the host.
    pub fn on_hover_enter<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        self.flash(platform);
    }

    /// Re-applies the layout after an external change.
    ///
    /// Calling this repeatedly without any layout change in between always
    /// gives the same geometry.
    pub fn recalculate<P: Platform + ?Sized>(&mut self, platform: &mut P) -> HandleGeometry {
        self.resize_scroll_content(platform);
        self.resize_scrollbar(platform)
    }

    /// Routes a platform event.
    pub fn handle_event<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        event: &Event,
    ) -> EventResult {
        let parts = self.parts;

        match *event {
            Event::Scroll(element) if element == parts.scroll_content => {
                self.on_scroll(platform);
                EventResult::Consumed
            }
            Event::PointerEnter(element) if element == parts.host => {
                self.on_hover_enter(platform);
                EventResult::Consumed
            }
            Event::Pointer {
                target: Target::Element(element),
                position,
                event: PointerEvent::Down,
            } if element == parts.handle => {
                let handle_offset = platform.page_offset(parts.handle);
                self.drag.on_pointer_down(platform, position, handle_offset)
            }
            Event::Pointer {
                target: Target::Document,
                position,
                event: PointerEvent::Move,
            } => self
                .drag
                .on_pointer_move(platform, position, &parts.drag_target()),
            Event::Pointer {
                target: Target::Document,
                event: PointerEvent::Up,
                ..
            } => self.drag.on_pointer_up(platform),
            Event::Timer(token) => {
                if self.flash.on_timeout(token) {
                    platform.remove_marker(parts.handle, Marker::Visible);
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            Event::WindowResize => {
                self.recalculate(platform);
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    /// Removes the scrollbar and restores native scrolling on the content.
    ///
    /// The content goes back where the track was, and gets an explicit
    /// height equal to the host's, with native vertical scrolling enabled,
    /// whatever the orientation.
    pub fn teardown<P: Platform + ?Sized>(mut self, platform: &mut P) {
        self.drag.on_pointer_up(platform);
        self.flash.cancel(platform);
        platform.remove_marker(self.parts.handle, Marker::Visible);

        for listener in self.listeners.drain(..) {
            platform.unlisten(listener);
        }

        let parts = self.parts;
        let height = platform.size(parts.host).y;

        platform.insert_before(parts.content, parts.track);
        platform.remove(parts.track);
        platform.remove(parts.scroll_content);
        platform.remove_marker(parts.host, Marker::Emulated);

        platform.set_extent(parts.content, Orientation::Vertical, height);
        platform.set_overflow_scroll(parts.content, Orientation::Vertical);

        log::debug!("Detached scrollbar from {:?}", parts.host);
    }
}
