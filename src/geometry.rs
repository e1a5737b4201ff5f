//! Scrollbar handle geometry.
//!
//! Pure functions mapping between the scroll position of some content and
//! the position of the drag handle along its track:
//!
//! * [`handle_geometry`] computes where the handle should be drawn and how
//!   long it is, from the current [`ViewportMetrics`].
//! * [`scroll_offset_from_pointer`] goes the other way, from a pointer
//!   position during a drag to a scroll offset.
//!
//! Nothing here touches the platform: all inputs are measured by the caller
//! right before the call.

/// Margin, in pixels, kept free at each end of the track.
pub const HANDLE_MARGIN: f64 = 2.0;

/// Sizes measured along the scrolling axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportMetrics {
    /// Visible length: the size of the track.
    pub viewport_size: f64,
    /// Full length of the scrolled content.
    pub content_size: f64,
    /// Current scroll offset of the content.
    pub scroll_offset: f64,
}

impl ViewportMetrics {
    /// Creates new metrics from the three measured lengths.
    pub fn new(viewport_size: f64, content_size: f64, scroll_offset: f64) -> Self {
        ViewportMetrics {
            viewport_size,
            content_size,
            scroll_offset,
        }
    }

    /// Returns `true` if the content overflows the viewport.
    ///
    /// A zero-sized (or negative) viewport never overflows.
    pub fn overflows(&self) -> bool {
        self.viewport_size > 0.0 && self.content_size > self.viewport_size
    }

    /// Largest valid scroll offset.
    pub fn max_scroll_offset(&self) -> f64 {
        (self.content_size - self.viewport_size).max(0.0)
    }
}

/// Position and size of the drag handle inside its track.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandleGeometry {
    /// Distance from the start of the track.
    pub offset: f64,
    /// Length of the handle.
    pub size: f64,
    /// `false` when there is nothing to scroll.
    pub visible: bool,
}

impl HandleGeometry {
    /// Geometry of a hidden handle.
    pub fn hidden() -> Self {
        HandleGeometry::default()
    }
}

/// Computes the handle geometry using the default [`HANDLE_MARGIN`].
///
/// # Examples
///
/// ```rust
/// use trackpad_scroll::geometry::{handle_geometry, ViewportMetrics};
///
/// let geometry = handle_geometry(ViewportMetrics::new(100.0, 500.0, 0.0));
/// assert!(geometry.visible);
/// assert_eq!(geometry.offset, 2.0);
/// assert_eq!(geometry.size, 17.0);
/// ```
pub fn handle_geometry(metrics: ViewportMetrics) -> HandleGeometry {
    handle_geometry_with_margin(metrics, HANDLE_MARGIN)
}

/// Computes the handle geometry, keeping `margin` pixels free at each end.
///
/// The handle is hidden when the content fits in the viewport. Otherwise,
/// with `ratio = viewport / content`:
///
/// * `offset = round(ratio * scroll_offset) + margin`
/// * `size = floor(ratio * (viewport - margin)) - margin`, never negative.
///
/// A negative or non-finite `margin` falls back to [`HANDLE_MARGIN`].
pub fn handle_geometry_with_margin(metrics: ViewportMetrics, margin: f64) -> HandleGeometry {
    if !metrics.overflows() {
        return HandleGeometry::hidden();
    }

    let margin = if is_valid_margin(margin) {
        margin
    } else {
        HANDLE_MARGIN
    };

    // overflows() guarantees content_size > viewport_size > 0.
    let ratio = metrics.viewport_size / metrics.content_size;
    let scroll_offset = metrics.scroll_offset.max(0.0);

    let offset = round_half_up(ratio * scroll_offset) + margin;
    let size = ((ratio * (metrics.viewport_size - margin)).floor() - margin).max(0.0);

    HandleGeometry {
        offset,
        size,
        visible: true,
    }
}

/// Returns `true` if `margin` can be kept free at the ends of a track.
pub fn is_valid_margin(margin: f64) -> bool {
    margin.is_finite() && margin >= 0.0
}

/// Inputs for [`scroll_offset_from_pointer`], all along the scrolling axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerMapping {
    /// Page position of the pointer.
    pub pointer: f64,
    /// Page position of the start of the track.
    pub track_start: f64,
    /// Length of the track.
    pub track_size: f64,
    /// Distance between the pointer and the start of the handle when the
    /// drag started.
    pub grab_offset: f64,
    /// Full length of the scrolled content.
    pub content_size: f64,
}

/// Maps a pointer position during a drag to a scroll offset.
///
/// The result is a plain linear map and is *not* clamped: dragging past
/// either end of the track gives an offset outside of the valid range.
/// Use [`clamp_scroll_offset`] before writing it.
///
/// Returns `None` if the track has no length.
///
/// # Examples
///
/// ```rust
/// use trackpad_scroll::geometry::{scroll_offset_from_pointer, PointerMapping};
///
/// let offset = scroll_offset_from_pointer(PointerMapping {
///     pointer: 150.0,
///     track_start: 100.0,
///     track_size: 100.0,
///     grab_offset: 5.0,
///     content_size: 1000.0,
/// });
/// assert_eq!(offset, Some(450.0));
/// ```
pub fn scroll_offset_from_pointer(mapping: PointerMapping) -> Option<f64> {
    if mapping.track_size.is_nan() || mapping.track_size <= 0.0 {
        return None;
    }

    let drag_pos = mapping.pointer - mapping.track_start - mapping.grab_offset;
    let drag_fraction = drag_pos / mapping.track_size;

    Some(drag_fraction * mapping.content_size)
}

/// Clamps `offset` to the valid scroll range `[0, content - viewport]`.
pub fn clamp_scroll_offset(offset: f64, viewport_size: f64, content_size: f64) -> f64 {
    let max = (content_size - viewport_size).max(0.0);
    if offset.is_nan() {
        return 0.0;
    }
    offset.max(0.0).min(max)
}

// `f64::round` rounds half away from zero, which only differs from
// rounding half up on negative values.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
