//! User-input events and their effects.
//!
//! * Every pointer, scroll, hover, resize or timer notification from the
//!   platform is an [`Event`].
//! * Handling an event returns an [`EventResult`], telling the platform
//!   whether its default action should be prevented.
//! * Configuration hooks are stored as [`Callback`]s.

use std::ops::Deref;
use std::rc::Rc;

use enum_map::Enum;

use crate::platform::{ElementId, Target, TimerToken};
use crate::Vec2;

/// Callback is a function that can be triggered by a lifecycle hook.
///
/// It receives the host element.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(ElementId)>);

impl Callback {
    /// Wraps the given function into a `Callback` object.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: 'static + Fn(ElementId),
    {
        Callback(Rc::new(f))
    }

    /// Returns a dummy callback that doesn't run anything.
    pub fn dummy() -> Self {
        Callback::from_fn(|_| ())
    }
}

impl Deref for Callback {
    type Target = dyn Fn(ElementId) + 'static;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl From<Rc<dyn Fn(ElementId)>> for Callback {
    fn from(f: Rc<dyn Fn(ElementId)>) -> Self {
        Callback(f)
    }
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Callback>")
    }
}

/// Answer to an event notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventResult {
    /// The event was ignored.
    Ignored,
    /// The event was consumed; the platform should prevent its default
    /// action (like starting a text selection).
    Consumed,
}

/// Represents a possible pointer action.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum PointerEvent {
    /// A button was pressed.
    Down,
    /// The pointer moved.
    Move,
    /// A button was released.
    Up,
}

/// Kind of events a listener can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum)]
pub enum EventKind {
    /// Button press.
    PointerDown,
    /// Pointer motion.
    PointerMove,
    /// Button release.
    PointerUp,
    /// Pointer entering an element.
    PointerEnter,
    /// Scroll offset change.
    Scroll,
}

/// Represents an event as seen by the scrollbar emulation.
#[derive(PartialEq, Clone, Debug)]
pub enum Event {
    /// A pointer event, at the given page position.
    Pointer {
        /// Where the listener receiving this event is attached.
        target: Target,
        /// Page position of the pointer.
        position: Vec2,
        /// Kind of pointer action.
        event: PointerEvent,
    },

    /// The pointer entered an element.
    PointerEnter(ElementId),

    /// An element scrolled.
    Scroll(ElementId),

    /// A timer fired.
    Timer(TimerToken),

    /// The window was resized.
    WindowResize,
}

impl Event {
    /// Returns the listener kind this event is delivered to.
    ///
    /// Timer and resize events need no listener and return `None`.
    pub fn kind(&self) -> Option<EventKind> {
        match *self {
            Event::Pointer { event, .. } => Some(match event {
                PointerEvent::Down => EventKind::PointerDown,
                PointerEvent::Move => EventKind::PointerMove,
                PointerEvent::Up => EventKind::PointerUp,
            }),
            Event::PointerEnter(_) => Some(EventKind::PointerEnter),
            Event::Scroll(_) => Some(EventKind::Scroll),
            Event::Timer(_) | Event::WindowResize => None,
        }
    }
}
