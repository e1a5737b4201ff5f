//! Points and sizes on the page, in pixels.

use crate::XY;
use std::ops::{Add, Sub};

/// Simple 2D size or position, in pixels.
///
/// Page positions grow from the top-left corner of the page.
pub type Vec2 = XY<f64>;

impl XY<f64> {
    /// Returns a `Vec2` with `0` on both axis.
    pub fn zero() -> Self {
        XY::new(0.0, 0.0)
    }
}

// Allow xy + (into xy)
impl<T, O> Add<O> for XY<T>
where
    T: Add<Output = T>,
    O: Into<XY<T>>,
{
    type Output = Self;

    /// # Examples
    ///
    /// ```rust
    /// # use trackpad_scroll::XY;
    /// let xy = XY::new(1, 2);
    /// assert_eq!(xy + (2, 3), XY::new(3, 5));
    /// ```
    fn add(self, other: O) -> Self {
        self.zip_map(other.into(), Add::add)
    }
}

impl<T, O> Sub<O> for XY<T>
where
    T: Sub<Output = T>,
    O: Into<XY<T>>,
{
    type Output = Self;

    /// # Examples
    ///
    /// ```rust
    /// # use trackpad_scroll::XY;
    /// let xy = XY::new(1, 2);
    /// assert_eq!(xy - (1, 0), XY::new(0, 2));
    /// ```
    fn sub(self, other: O) -> Self {
        self.zip_map(other.into(), Sub::sub)
    }
}
