//! Dragging the scrollbar handle.
//!
//! A drag session starts with a press on the handle and ends with the next
//! release. While it lasts, pointer motion is listened to at the document
//! level, so the drag continues when the pointer leaves the narrow track.
//!
//! Each motion is mapped to a scroll offset and written to the scrollable
//! container. The handle itself is not moved here: the write makes the
//! platform deliver a scroll event, which recomputes the geometry.

use crate::direction::Orientation;
use crate::event::{EventKind, EventResult};
use crate::geometry::{self, PointerMapping};
use crate::platform::{ElementId, ListenerId, Platform, Target};
use crate::Vec2;

/// State kept between a press on the handle and the matching release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// Distance between the pointer and the start of the handle, measured
    /// on press.
    pub grab_offset: f64,
}

/// Elements involved when mapping a drag to a scroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragTarget {
    /// The track the handle moves in.
    pub track: ElementId,
    /// The scrolled content, measured for its full size.
    pub content: ElementId,
    /// The scrollable container receiving the scroll offset.
    pub scroll_content: ElementId,
}

/// Drives drag sessions along a single axis.
#[derive(Debug)]
pub struct DragController {
    orientation: Orientation,
    session: Option<DragSession>,
    listeners: Vec<ListenerId>,
}

impl DragController {
    /// Creates a new idle controller.
    pub fn new(orientation: Orientation) -> Self {
        DragController {
            orientation,
            session: None,
            listeners: Vec::new(),
        }
    }

    /// Returns `true` while a drag session is active.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Returns the current drag session.
    pub fn session(&self) -> Option<DragSession> {
        self.session
    }

    /// Starts a drag session after a press on the handle.
    ///
    /// `pointer` and `handle_page_offset` are page positions. Always consumes
    /// the event, so the platform doesn't start a text selection.
    pub fn on_pointer_down<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        pointer: Vec2,
        handle_page_offset: Vec2,
    ) -> EventResult {
        // A press without a release in between: drop the old listeners first.
        self.release_listeners(platform);

        let o = self.orientation;
        let grab_offset = o.get(&pointer) - o.get(&handle_page_offset);
        self.session = Some(DragSession { grab_offset });

        self.listeners.push(platform.listen(Target::Document, EventKind::PointerMove));
        self.listeners.push(platform.listen(Target::Document, EventKind::PointerUp));

        log::debug!("Drag started, grabbed {}px into the handle", grab_offset);
        EventResult::Consumed
    }

    /// Scrolls according to the pointer position.
    ///
    /// Ignored unless a drag session is active.
    pub fn on_pointer_move<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        pointer: Vec2,
        target: &DragTarget,
    ) -> EventResult {
        let session = match self.session {
            Some(session) => session,
            None => return EventResult::Ignored,
        };

        let o = self.orientation;
        let track_size = o.get(&platform.size(target.track));
        let content_size = o.get(&platform.size(target.content));

        let mapping = PointerMapping {
            pointer: o.get(&pointer),
            track_start: o.get(&platform.page_offset(target.track)),
            track_size,
            grab_offset: session.grab_offset,
            content_size,
        };

        let offset = match geometry::scroll_offset_from_pointer(mapping) {
            Some(offset) => offset,
            None => {
                log::warn!("Ignoring drag on an empty track");
                return EventResult::Consumed;
            }
        };

        let viewport_size = o.get(&platform.size(target.scroll_content));
        let offset = geometry::clamp_scroll_offset(offset, viewport_size, content_size);

        platform.set_scroll_offset(target.scroll_content, o, offset);
        EventResult::Consumed
    }

    /// Ends the drag session, if any.
    ///
    /// Safe to call without a matching press.
    pub fn on_pointer_up<P: Platform + ?Sized>(&mut self, platform: &mut P) -> EventResult {
        self.release_listeners(platform);

        if self.session.take().is_some() {
            log::debug!("Drag ended");
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }

    fn release_listeners<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        for listener in self.listeners.drain(..) {
            platform.unlisten(listener);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::puppet::Page;
    use crate::platform::Role;

    // A vertical page with a 100px track at page y=40, and 1000px of content.
    fn setup() -> (Page, DragTarget) {
        let mut page = Page::new();
        let host = page.add_element(Vec2::new(0.0, 40.0), Vec2::new(200.0, 100.0));

        let track = page.create_element(Role::Track);
        page.prepend(host, track);

        let scroll_content = page.create_element(Role::ScrollContent);
        page.prepend(host, scroll_content);
        page.set_extent(scroll_content, Orientation::Vertical, 100.0);
        page.set_extent(scroll_content, Orientation::Horizontal, 200.0);

        let content = page.create_element(Role::Content);
        page.prepend(scroll_content, content);
        page.set_extent(content, Orientation::Vertical, 1000.0);

        (
            page,
            DragTarget {
                track,
                content,
                scroll_content,
            },
        )
    }

    #[test]
    fn drag_maps_pointer_to_scroll() {
        let (mut page, target) = setup();
        let mut drag = DragController::new(Orientation::Vertical);

        let result =
            drag.on_pointer_down(&mut page, Vec2::new(10.0, 45.0), Vec2::new(0.0, 40.0));
        assert_eq!(result, EventResult::Consumed);
        assert_eq!(drag.session(), Some(DragSession { grab_offset: 5.0 }));
        assert_eq!(page.listener_count(Target::Document), 2);

        // Pointer at track start + 50: ((50 - 5) / 100) * 1000 = 450.
        drag.on_pointer_move(&mut page, Vec2::new(10.0, 90.0), &target);
        assert_eq!(page.scroll_offset(target.scroll_content).y, 450.0);

        drag.on_pointer_up(&mut page);
        assert!(!drag.is_dragging());
        assert_eq!(page.listener_count(Target::Document), 0);
    }

    #[test]
    fn drag_past_track_clamps() {
        let (mut page, target) = setup();
        let mut drag = DragController::new(Orientation::Vertical);

        drag.on_pointer_down(&mut page, Vec2::new(0.0, 40.0), Vec2::new(0.0, 40.0));

        drag.on_pointer_move(&mut page, Vec2::new(0.0, 500.0), &target);
        assert_eq!(page.scroll_offset(target.scroll_content).y, 900.0);

        drag.on_pointer_move(&mut page, Vec2::new(0.0, -500.0), &target);
        assert_eq!(page.scroll_offset(target.scroll_content).y, 0.0);
    }

    #[test]
    fn move_without_press_is_ignored() {
        let (mut page, target) = setup();
        let mut drag = DragController::new(Orientation::Vertical);

        let result = drag.on_pointer_move(&mut page, Vec2::new(0.0, 90.0), &target);
        assert_eq!(result, EventResult::Ignored);
        assert_eq!(page.scroll_offset(target.scroll_content).y, 0.0);
    }

    #[test]
    fn release_is_idempotent() {
        let (mut page, _) = setup();
        let mut drag = DragController::new(Orientation::Vertical);

        assert_eq!(drag.on_pointer_up(&mut page), EventResult::Ignored);

        drag.on_pointer_down(&mut page, Vec2::zero(), Vec2::zero());
        // Pressing again without releasing must not leak listeners.
        drag.on_pointer_down(&mut page, Vec2::zero(), Vec2::zero());
        assert_eq!(page.listener_count(Target::Document), 2);

        assert_eq!(drag.on_pointer_up(&mut page), EventResult::Consumed);
        assert_eq!(drag.on_pointer_up(&mut page), EventResult::Ignored);
        assert_eq!(page.listener_count(Target::Document), 0);
    }
}
