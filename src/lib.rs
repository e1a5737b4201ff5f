//! # Trackpad scroll
//!
//! Emulates trackpad-style scrollbars over a scrollable element.
//!
//! The native scrollbar of the content is pushed out of view, and replaced by
//! a thin handle drawn over the content. The handle only shows up briefly
//! after some activity (scroll, hover or drag), and can be dragged to scroll.
//!
//! The emulation doesn't own any element or event loop: a [`Platform`]
//! provides measurements, tree operations, timers and listeners, and the
//! host forwards every [`Event`] it receives to
//! [`ScrollEmulator::on_event`].
//!
//! [`Platform`]: crate::platform::Platform
//! [`Event`]: crate::event::Event
//!
//! ## Example
//!
//! ```rust
//! use trackpad_scroll::direction::Orientation;
//! use trackpad_scroll::platform::puppet::Page;
//! use trackpad_scroll::platform::{Platform, Role};
//! use trackpad_scroll::{Options, ScrollEmulator, Vec2};
//!
//! let mut page = Page::new();
//! let host = page.add_element(Vec2::zero(), Vec2::new(200.0, 100.0));
//! let content = page.add_child(host, Role::Content);
//! page.set_extent(content, Orientation::Vertical, 500.0);
//!
//! let options = Options::new().on_init(|host| log::info!("Ready: {:?}", host));
//! let mut emulator = ScrollEmulator::initialize(&mut page, host, options)
//!     .unwrap()
//!     .expect("host was not initialized yet");
//!
//! page.hover(host);
//! while let Some(event) = page.poll_event() {
//!     emulator.on_event(&mut page, &event);
//! }
//! assert!(emulator.is_handle_visible().unwrap());
//!
//! emulator.call(&mut page, "destroy").unwrap();
//! ```
#![deny(missing_docs)]

pub mod direction;
pub mod drag;
pub mod event;
pub mod flash;
pub mod geometry;
pub mod logger;
pub mod options;
pub mod platform;
pub mod sync;

mod emulator;
mod error;
mod vec;
mod with;
mod xy;

pub use self::emulator::{Method, ScrollEmulator};
pub use self::error::Error;
pub use self::options::{OptionKey, OptionValue, Options, Settings};
pub use self::vec::Vec2;
pub use self::with::With;
pub use self::xy::XY;
