use crate::direction::Orientation;

/// A generic structure with a value for each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct XY<T> {
    /// X-axis value
    pub x: T,
    /// Y-axis value
    pub y: T,
}

impl<T> XY<T> {
    /// Creates a new `XY` from the given values.
    pub fn new(x: T, y: T) -> Self {
        XY { x, y }
    }

    /// Creates a new `XY` by applying `f` to `x` and `y`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use trackpad_scroll::XY;
    /// let xy = XY::new(1, 2);
    ///
    /// assert_eq!(xy.map(|v| v * 2), XY::new(2, 4));
    /// assert_eq!(xy.map(|v| v > 1), XY::new(false, true));
    /// ```
    pub fn map<U, F>(self, f: F) -> XY<U>
    where
        F: Fn(T) -> U,
    {
        XY::new(f(self.x), f(self.y))
    }

    /// Returns a reference to the value on the given axis.
    pub fn get(&self, o: Orientation) -> &T {
        match o {
            Orientation::Horizontal => &self.x,
            Orientation::Vertical => &self.y,
        }
    }

    /// Returns a mutable reference to the value on the given axis.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use trackpad_scroll::XY;
    /// # use trackpad_scroll::direction::Orientation;
    /// let mut xy = XY::new(1, 2);
    /// *xy.get_mut(Orientation::Horizontal) = 42;
    ///
    /// assert_eq!(xy, XY::new(42, 2));
    /// ```
    pub fn get_mut(&mut self, o: Orientation) -> &mut T {
        match o {
            Orientation::Horizontal => &mut self.x,
            Orientation::Vertical => &mut self.y,
        }
    }

    /// Returns a new `XY` by calling `f` on `self` and `other` for each axis.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use trackpad_scroll::XY;
    /// let a = XY::new(1, 2);
    /// let b = XY::new(3, 1);
    /// assert_eq!(a.zip_map(b, |a, b| a + b), XY::new(4, 3));
    /// ```
    pub fn zip_map<U, V, F>(self, other: XY<U>, f: F) -> XY<V>
    where
        F: Fn(T, U) -> V,
    {
        XY::new(f(self.x, other.x), f(self.y, other.y))
    }
}

impl<T> From<(T, T)> for XY<T> {
    fn from((x, y): (T, T)) -> Self {
        XY::new(x, y)
    }
}
