//! Direction-related structures.
//!
//! This module defines [`Orientation`], the axis along which a scrollbar
//! operates.
//!
//! A scrollbar only ever works on a single axis. The orientation selects:
//!
//! * The size axis (`height` or `width`) used to measure the viewport,
//!   the content, the track and the handle.
//! * The offset axis (`top` or `left`) used to position the handle.
//! * The scroll axis (`scrollTop` or `scrollLeft`) read and written on the
//!   scrollable container.

use enum_map::Enum;

use crate::XY;

/// Describes a vertical or horizontal orientation for a scrollbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Enum)]
pub enum Orientation {
    /// Horizontal orientation
    Horizontal,
    /// Vertical orientation
    Vertical,
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Vertical
    }
}

impl Orientation {
    /// Returns the component of `v` corresponding to this orientation.
    ///
    /// (`Horizontal` will return the x value,
    /// and `Vertical` will return the y value.)
    pub fn get<T: Clone>(self, v: &XY<T>) -> T {
        v.get(self).clone()
    }

    /// Returns the other orientation.
    pub fn swap(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}
