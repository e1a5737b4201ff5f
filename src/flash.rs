//! Show/hide state of the scrollbar handle.
//!
//! Any activity (scroll, hover, drag) *flashes* the handle: it becomes
//! visible, and a hide timer is (re)started. Only the most recent activity
//! matters; a new flash replaces the pending timer instead of stacking a
//! new one.

use std::time::Duration;

use crate::platform::{TimerToken, Timers};

/// Default delay before the handle hides again.
pub const DEFAULT_FLASH_DELAY: Duration = Duration::from_millis(1000);

/// Visibility of the handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// Nothing shown.
    Hidden,
    /// Handle shown, with a hide timer pending.
    Visible,
}

/// Debounced visibility state machine.
#[derive(Debug)]
pub struct FlashState {
    visibility: Visibility,
    pending: Option<TimerToken>,
    delay: Duration,
}

impl Default for FlashState {
    fn default() -> Self {
        Self::new(DEFAULT_FLASH_DELAY)
    }
}

impl FlashState {
    /// Creates a new hidden state, hiding `delay` after each flash.
    pub fn new(delay: Duration) -> Self {
        FlashState {
            visibility: Visibility::Hidden,
            pending: None,
            delay,
        }
    }

    /// Returns the current visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Returns `true` if the handle should currently be shown.
    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// Returns the pending hide timer, if any.
    pub fn pending_timer(&self) -> Option<TimerToken> {
        self.pending
    }

    /// Returns the delay between the last flash and hiding.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Changes the hide delay.
    ///
    /// Only affects timers started after this call.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Shows the handle and restarts the hide timer.
    ///
    /// Returns `true` if the handle was hidden before.
    pub fn flash<T: Timers + ?Sized>(&mut self, timers: &mut T) -> bool {
        if let Some(token) = self.pending.take() {
            timers.clear_timeout(token);
        }
        self.pending = Some(timers.set_timeout(self.delay));
        log::trace!("Flash: hiding in {:?}", self.delay);

        let was_hidden = self.visibility == Visibility::Hidden;
        self.visibility = Visibility::Visible;
        was_hidden
    }

    /// Handles a fired timer.
    ///
    /// Returns `true` if `token` was our hide timer, in which case we are
    /// now hidden. Stale or foreign tokens are ignored.
    pub fn on_timeout(&mut self, token: TimerToken) -> bool {
        if self.pending != Some(token) {
            return false;
        }

        self.pending = None;
        self.visibility = Visibility::Hidden;
        true
    }

    /// Cancels the pending timer, if any, and hides the handle.
    pub fn cancel<T: Timers + ?Sized>(&mut self, timers: &mut T) {
        if let Some(token) = self.pending.take() {
            timers.clear_timeout(token);
        }
        self.visibility = Visibility::Hidden;
    }
}
