//! Define the platform trait for actual UI interaction.
//!
//! The scrollbar emulation doesn't measure or draw anything by itself: it
//! delegates this job to a platform, usually a document object model, which
//! owns the elements, their layout and the event loop.
//!
//! This module defines the [`Platform`] trait, to be implemented by actual
//! hosts, and the [`puppet`] page, an in-memory platform used for testing.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use enumset::{EnumSet, EnumSetType};
use lazy_static::lazy_static;

use crate::direction::Orientation;
use crate::event::EventKind;
use crate::Vec2;

pub mod puppet;

type HashMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;

/// Identifies an element on the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// Identifies a registered event listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub usize);

/// Identifies a single-shot timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken(pub u64);

/// Identifies a page context.
///
/// Values measured once per page, like the native scrollbar width, are
/// cached under this id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContextId(pub usize);

/// Flags carried by elements, usually rendered as style classes.
#[derive(EnumSetType, Debug)]
pub enum Marker {
    /// Set on the host before initialization to get a horizontal scrollbar.
    Horizontal,
    /// Set on the handle while it should be displayed.
    Visible,
    /// Set on a host while it carries an emulated scrollbar.
    Emulated,
}

/// Structural role of an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Element with no particular role. The host itself is usually one.
    Plain,
    /// The scrolled content, found inside the host.
    Content,
    /// The injected track the handle moves in.
    Track,
    /// The injected drag handle.
    Handle,
    /// The injected scrollable container wrapping the content.
    ScrollContent,
}

/// Where an event listener is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// A single element.
    Element(ElementId),
    /// The whole document.
    Document,
}

/// Single-shot timer scheduling.
pub trait Timers {
    /// Schedules a timer firing once after `delay`.
    ///
    /// The platform later delivers an [`Event::Timer`] with the returned
    /// token.
    ///
    /// [`Event::Timer`]: crate::event::Event::Timer
    fn set_timeout(&mut self, delay: Duration) -> TimerToken;

    /// Cancels a pending timer.
    ///
    /// Cancelling a timer that already fired is a no-op.
    fn clear_timeout(&mut self, token: TimerToken);
}

/// Trait defining the required methods to be a platform.
///
/// A platform is the interface between the scrollbar emulation and the
/// actual element tree, like a browser document.
///
/// All lengths are in pixels. Page positions are relative to the top-left
/// corner of the page.
pub trait Platform: Timers {
    /// Returns an id for the current page context.
    fn context_id(&self) -> ContextId;

    /// Finds the first descendant of `parent` with the given role.
    fn find_child(&self, parent: ElementId, role: Role) -> Option<ElementId>;

    /// Creates a new detached element.
    fn create_element(&mut self, role: Role) -> ElementId;

    /// Inserts `child` as the first child of `parent`.
    fn prepend(&mut self, parent: ElementId, child: ElementId);

    /// Replaces `element` with `wrapper`, and moves `element` inside it.
    fn wrap(&mut self, element: ElementId, wrapper: ElementId);

    /// Moves `element` right before `reference`, as its sibling.
    fn insert_before(&mut self, element: ElementId, reference: ElementId);

    /// Removes `element` and all its descendants from the tree.
    fn remove(&mut self, element: ElementId);

    /// Returns the box size of `element`.
    fn size(&self, element: ElementId) -> Vec2;

    /// Returns the page position of the top-left corner of `element`.
    fn page_offset(&self, element: ElementId) -> Vec2;

    /// Returns the current scroll offset of `element`.
    fn scroll_offset(&self, element: ElementId) -> Vec2;

    /// Scrolls `element` along the given axis.
    ///
    /// The platform clamps the offset to the valid range, and delivers a
    /// scroll event later if the offset changed.
    fn set_scroll_offset(&mut self, element: ElementId, orientation: Orientation, offset: f64);

    /// Sets the size of `element` along the given axis.
    fn set_extent(&mut self, element: ElementId, orientation: Orientation, size: f64);

    /// Positions `element` inside its parent along the given axis.
    fn set_position(&mut self, element: ElementId, orientation: Orientation, offset: f64);

    /// Shows or hides `element`.
    fn set_shown(&mut self, element: ElementId, shown: bool);

    /// Lets `element` scroll natively when its content overflows on the
    /// given axis.
    fn set_overflow_scroll(&mut self, element: ElementId, orientation: Orientation);

    /// Returns the markers carried by `element`.
    fn markers(&self, element: ElementId) -> EnumSet<Marker>;

    /// Adds a marker to `element`.
    fn add_marker(&mut self, element: ElementId, marker: Marker);

    /// Removes a marker from `element`.
    fn remove_marker(&mut self, element: ElementId, marker: Marker);

    /// Starts delivering events of the given kind happening on `target`.
    fn listen(&mut self, target: Target, kind: EventKind) -> ListenerId;

    /// Stops delivering events for the given listener.
    ///
    /// Unregistering an unknown listener is a no-op.
    fn unlisten(&mut self, listener: ListenerId);

    /// Measures the thickness of the native scrollbar.
    ///
    /// This usually builds a throw-away offscreen element, measures its
    /// inner width with and without forced overflow, and returns the
    /// difference. Prefer [`native_scrollbar_width`], which caches it.
    fn probe_scrollbar_width(&mut self) -> f64;

    /// Returns a name to identify the platform.
    ///
    /// Mostly used for debugging.
    fn name(&self) -> &str {
        "unknown"
    }
}

lazy_static! {
    static ref SCROLLBAR_WIDTHS: Mutex<HashMap<ContextId, f64>> =
        Mutex::new(HashMap::default());
}

/// Returns the native scrollbar width for the platform's page context.
///
/// The platform is only probed the first time for each context.
pub fn native_scrollbar_width<P: Platform + ?Sized>(platform: &mut P) -> f64 {
    let context = platform.context_id();

    if let Some(&width) = SCROLLBAR_WIDTHS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&context)
    {
        return width;
    }

    let width = platform.probe_scrollbar_width().max(0.0);
    log::debug!("Native scrollbar width for {:?}: {}px", context, width);

    SCROLLBAR_WIDTHS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(context, width);

    width
}

/// Drops the cached scrollbar width for a page context.
///
/// Called when a page goes away, so a reused id is measured again.
pub fn forget_scrollbar_width(context: ContextId) {
    SCROLLBAR_WIDTHS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&context);
}
