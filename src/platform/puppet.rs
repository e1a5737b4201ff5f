//! In-memory page, implementing [`Platform`].
//!
//! The puppet page keeps an element tree with a very small layout model,
//! a virtual clock, and an event queue. It never delivers anything by
//! itself: the host pulls events with [`Page::poll_event`] and forwards
//! them, the same way a browser event loop would.
//!
//! Layout rules:
//!
//! * An element's size on each axis is its explicit extent if one was set,
//!   or its parent's size on that axis, or `0` for a root element.
//! * An element's page position is its parent's page position, plus its own
//!   position inside the parent, minus the parent's scroll offset. Root
//!   elements are placed explicitly.
//! * An element can scroll up to the size of its largest child minus its
//!   own size.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crossbeam_channel::{self, Receiver, Sender};
use enum_map::EnumMap;
use enumset::EnumSet;

use crate::direction::Orientation;
use crate::event::{Event, EventKind, PointerEvent};
use crate::platform::{
    self, ContextId, ElementId, ListenerId, Marker, Platform, Role, Target, TimerToken, Timers,
};
use crate::{Vec2, XY};

/// Native scrollbar width reported by default.
pub const DEFAULT_SCROLLBAR_WIDTH: f64 = 15.0;

static NEXT_CONTEXT: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone)]
struct Node {
    role: Role,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    origin: Vec2,
    position: Vec2,
    extent: XY<Option<f64>>,
    scroll: Vec2,
    shown: bool,
    overflow_scroll: XY<bool>,
    markers: EnumSet<Marker>,
    attached: bool,
}

impl Node {
    fn new(role: Role) -> Self {
        Node {
            role,
            parent: None,
            children: Vec::new(),
            origin: Vec2::zero(),
            position: Vec2::zero(),
            extent: XY::new(None, None),
            scroll: Vec2::zero(),
            shown: true,
            overflow_scroll: XY::new(false, false),
            markers: EnumSet::new(),
            attached: true,
        }
    }
}

/// A simulated page.
pub struct Page {
    context: ContextId,
    nodes: Vec<Node>,

    listeners: EnumMap<EventKind, Vec<(ListenerId, Target)>>,
    next_listener: usize,

    now: Duration,
    timers: Vec<(Duration, TimerToken)>,
    next_timer: u64,

    event_sender: Sender<Event>,
    event_receiver: Receiver<Event>,

    scrollbar_width: f64,
    probes: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// Creates an empty page.
    pub fn new() -> Self {
        let (event_sender, event_receiver) = crossbeam_channel::unbounded();

        Page {
            context: ContextId(NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed)),
            nodes: Vec::new(),
            listeners: EnumMap::default(),
            next_listener: 0,
            now: Duration::from_millis(0),
            timers: Vec::new(),
            next_timer: 0,
            event_sender,
            event_receiver,
            scrollbar_width: DEFAULT_SCROLLBAR_WIDTH,
            probes: 0,
        }
    }

    /// Sets the width of native scrollbars on this page.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn scrollbar_width(mut self, width: f64) -> Self {
        self.scrollbar_width = width;
        self
    }

    /// Adds a root element at the given page position, with the given size.
    pub fn add_element(&mut self, origin: Vec2, size: Vec2) -> ElementId {
        let id = self.create_element(Role::Plain);
        let node = self.node_mut(id);
        node.origin = origin;
        node.extent = size.map(Some);
        id
    }

    /// Creates an element with the given role as the last child of `parent`.
    pub fn add_child(&mut self, parent: ElementId, role: Role) -> ElementId {
        let id = self.create_element(role);
        self.node_mut(id).parent = Some(parent);
        self.node_mut(parent).children.push(id);
        id
    }

    /// Sets the explicit size of an element on both axis.
    ///
    /// Simulates a layout change happening outside of the emulation.
    pub fn resize(&mut self, element: ElementId, size: Vec2) {
        self.node_mut(element).extent = size.map(Some);
    }

    /// Returns the current time on the virtual clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Moves the virtual clock forward, queuing the timers that fire.
    ///
    /// Timers fire in deadline order.
    pub fn advance(&mut self, delta: Duration) {
        let target = self.now + delta;

        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|&(_, &(deadline, _))| deadline <= target)
                .min_by_key(|&(_, &(deadline, token))| (deadline, token.0))
                .map(|(i, _)| i);

            let i = match next {
                Some(i) => i,
                None => break,
            };

            let (deadline, token) = self.timers.remove(i);
            self.now = deadline;
            self.send(Event::Timer(token));
        }

        self.now = target;
    }

    /// Returns the number of timers not fired nor cancelled yet.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Polls the page for any queued event.
    pub fn poll_event(&self) -> Option<Event> {
        self.event_receiver.try_recv().ok()
    }

    /// Presses the pointer on `element`.
    ///
    /// Returns `false` if nothing listens to presses on this element.
    pub fn press(&mut self, element: ElementId, position: Vec2) -> bool {
        self.pointer(Target::Element(element), position, PointerEvent::Down)
    }

    /// Moves the pointer anywhere on the document.
    ///
    /// Returns `false` if nothing listens to document-wide motion.
    pub fn move_pointer(&mut self, position: Vec2) -> bool {
        self.pointer(Target::Document, position, PointerEvent::Move)
    }

    /// Releases the pointer anywhere on the document.
    ///
    /// Returns `false` if nothing listens to document-wide releases.
    pub fn release(&mut self, position: Vec2) -> bool {
        self.pointer(Target::Document, position, PointerEvent::Up)
    }

    /// Moves the pointer over `element`.
    pub fn hover(&mut self, element: ElementId) -> bool {
        self.emit(Target::Element(element), Event::PointerEnter(element))
    }

    /// Queues a window resize event.
    pub fn resize_window(&mut self) {
        self.send(Event::WindowResize);
    }

    /// Returns the number of listeners attached to `target`.
    pub fn listener_count(&self, target: Target) -> usize {
        self.listeners
            .values()
            .flatten()
            .filter(|&&(_, t)| t == target)
            .count()
    }

    /// Returns the total number of registered listeners.
    pub fn total_listeners(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Returns how many times the native scrollbar was probed.
    pub fn probe_count(&self) -> usize {
        self.probes
    }

    /// Returns the parent of an element.
    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element).parent
    }

    /// Returns the children of an element, in order.
    pub fn children(&self, element: ElementId) -> &[ElementId] {
        &self.node(element).children
    }

    /// Returns `false` once an element was removed from the tree.
    pub fn is_attached(&self, element: ElementId) -> bool {
        self.node(element).attached
    }

    /// Returns `false` if an element was hidden.
    pub fn is_shown(&self, element: ElementId) -> bool {
        self.node(element).shown
    }

    /// Returns the position of an element inside its parent.
    pub fn position(&self, element: ElementId) -> Vec2 {
        self.node(element).position
    }

    /// Returns the explicit extent of an element, if any, on each axis.
    pub fn extent(&self, element: ElementId) -> XY<Option<f64>> {
        self.node(element).extent
    }

    /// Returns on which axis an element scrolls natively.
    pub fn overflow_scroll(&self, element: ElementId) -> XY<bool> {
        self.node(element).overflow_scroll
    }

    fn node(&self, element: ElementId) -> &Node {
        &self.nodes[element.0]
    }

    fn node_mut(&mut self, element: ElementId) -> &mut Node {
        &mut self.nodes[element.0]
    }

    fn send(&self, event: Event) {
        // We own the receiver, so the channel can't be disconnected.
        let _ = self.event_sender.send(event);
    }

    // Queues `event` if something listens to its kind on `target`.
    fn emit(&self, target: Target, event: Event) -> bool {
        let listened = match event.kind() {
            Some(kind) => self.listeners[kind].iter().any(|&(_, t)| t == target),
            None => true,
        };
        if listened {
            self.send(event);
        }
        listened
    }

    fn pointer(&mut self, target: Target, position: Vec2, event: PointerEvent) -> bool {
        self.emit(
            target,
            Event::Pointer {
                target,
                position,
                event,
            },
        )
    }

    fn detach(&mut self, element: ElementId) {
        if let Some(parent) = self.node_mut(element).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != element);
        }
    }

    fn set_attached(&mut self, element: ElementId, attached: bool) {
        self.node_mut(element).attached = attached;
        for child in self.node(element).children.clone() {
            self.set_attached(child, attached);
        }
    }

    fn max_scroll(&self, element: ElementId, orientation: Orientation) -> f64 {
        let own = orientation.get(&self.size(element));
        self.node(element)
            .children
            .iter()
            .map(|&c| orientation.get(&self.size(c)))
            .fold(0.0, f64::max)
            .max(own)
            - own
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        platform::forget_scrollbar_width(self.context);
    }
}

impl Timers for Page {
    fn set_timeout(&mut self, delay: Duration) -> TimerToken {
        self.next_timer += 1;
        let token = TimerToken(self.next_timer);
        self.timers.push((self.now + delay, token));
        token
    }

    fn clear_timeout(&mut self, token: TimerToken) {
        self.timers.retain(|&(_, t)| t != token);
    }
}

impl Platform for Page {
    fn context_id(&self) -> ContextId {
        self.context
    }

    fn find_child(&self, parent: ElementId, role: Role) -> Option<ElementId> {
        for &child in &self.node(parent).children {
            if self.node(child).role == role {
                return Some(child);
            }
            if let Some(found) = self.find_child(child, role) {
                return Some(found);
            }
        }
        None
    }

    fn create_element(&mut self, role: Role) -> ElementId {
        self.nodes.push(Node::new(role));
        ElementId(self.nodes.len() - 1)
    }

    fn prepend(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.insert(0, child);
        let attached = self.node(parent).attached;
        self.set_attached(child, attached);
    }

    fn wrap(&mut self, element: ElementId, wrapper: ElementId) {
        self.detach(wrapper);
        if let Some(parent) = self.node(element).parent {
            let siblings = &mut self.node_mut(parent).children;
            if let Some(slot) = siblings.iter_mut().find(|c| **c == element) {
                *slot = wrapper;
            }
            self.node_mut(wrapper).parent = Some(parent);
        }
        self.node_mut(element).parent = Some(wrapper);
        self.node_mut(wrapper).children.push(element);
    }

    fn insert_before(&mut self, element: ElementId, reference: ElementId) {
        let parent = match self.node(reference).parent {
            Some(parent) => parent,
            None => return,
        };

        self.detach(element);
        let siblings = &mut self.node_mut(parent).children;
        let index = siblings
            .iter()
            .position(|&c| c == reference)
            .unwrap_or(siblings.len());
        siblings.insert(index, element);
        self.node_mut(element).parent = Some(parent);

        let attached = self.node(parent).attached;
        self.set_attached(element, attached);
    }

    fn remove(&mut self, element: ElementId) {
        self.detach(element);
        self.set_attached(element, false);

        // Drop the listeners of removed elements, like a browser would.
        let removed: Vec<ElementId> = (0..self.nodes.len())
            .map(ElementId)
            .filter(|&e| !self.node(e).attached)
            .collect();
        for listeners in self.listeners.values_mut() {
            listeners.retain(|&(_, target)| match target {
                Target::Element(e) => !removed.contains(&e),
                Target::Document => true,
            });
        }
    }

    fn size(&self, element: ElementId) -> Vec2 {
        let node = self.node(element);
        let inherited = node.parent.map(|p| self.size(p)).unwrap_or_else(Vec2::zero);
        node.extent.zip_map(inherited, |own, parent| own.unwrap_or(parent))
    }

    fn page_offset(&self, element: ElementId) -> Vec2 {
        let node = self.node(element);
        match node.parent {
            Some(parent) => {
                self.page_offset(parent) + node.position - self.node(parent).scroll
            }
            None => node.origin,
        }
    }

    fn scroll_offset(&self, element: ElementId) -> Vec2 {
        self.node(element).scroll
    }

    fn set_scroll_offset(&mut self, element: ElementId, orientation: Orientation, offset: f64) {
        let max = self.max_scroll(element, orientation);
        let offset = if offset.is_nan() {
            0.0
        } else {
            offset.max(0.0).min(max)
        };

        let current = self.node_mut(element).scroll.get_mut(orientation);
        if *current == offset {
            return;
        }
        *current = offset;

        self.emit(Target::Element(element), Event::Scroll(element));
    }

    fn set_extent(&mut self, element: ElementId, orientation: Orientation, size: f64) {
        *self.node_mut(element).extent.get_mut(orientation) = Some(size);
    }

    fn set_position(&mut self, element: ElementId, orientation: Orientation, offset: f64) {
        *self.node_mut(element).position.get_mut(orientation) = offset;
    }

    fn set_shown(&mut self, element: ElementId, shown: bool) {
        self.node_mut(element).shown = shown;
    }

    fn set_overflow_scroll(&mut self, element: ElementId, orientation: Orientation) {
        *self.node_mut(element).overflow_scroll.get_mut(orientation) = true;
    }

    fn markers(&self, element: ElementId) -> EnumSet<Marker> {
        self.node(element).markers
    }

    fn add_marker(&mut self, element: ElementId, marker: Marker) {
        self.node_mut(element).markers.insert(marker);
    }

    fn remove_marker(&mut self, element: ElementId, marker: Marker) {
        self.node_mut(element).markers.remove(marker);
    }

    fn listen(&mut self, target: Target, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners[kind].push((id, target));
        id
    }

    fn unlisten(&mut self, listener: ListenerId) {
        for listeners in self.listeners.values_mut() {
            listeners.retain(|&(id, _)| id != listener);
        }
    }

    fn probe_scrollbar_width(&mut self) -> f64 {
        self.probes += 1;

        // Offscreen 50x50 box with a taller child.
        let probe = self.add_element(Vec2::new(-200.0, -200.0), Vec2::new(50.0, 50.0));
        let inner = self.add_child(probe, Role::Plain);
        self.set_extent(inner, Orientation::Vertical, 100.0);

        let width = self.size(inner).x;
        self.set_overflow_scroll(probe, Orientation::Vertical);
        let width_with_scrollbar = (width - self.scrollbar_width).max(0.0);

        self.remove(probe);

        width - width_with_scrollbar
    }

    fn name(&self) -> &str {
        "puppet"
    }
}
