//! Dropdown positioning boundary and geometry helpers.
//!
//! The controller never computes coordinates. It hands surface handles to a
//! [`Positioner`] when the dropdown appears and releases it when the widget
//! returns to idle. [`compute_position`] is the placement a host-side
//! positioner applies: bottom-start, 3px offset, flip when the space below is
//! too small, width matched to the input, height capped by the space left.

use serde::Serialize;

/// Space between the input and the dropdown.
pub const DROPDOWN_OFFSET: f64 = 3.0;

/// Minimum gap kept between the dropdown and the viewport edge.
pub const VIEWPORT_PADDING: f64 = 8.0;

/// Opaque reference to a rendered surface (input or listbox), by element id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub String);

impl SurfaceHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Continuous placement of the dropdown relative to the input.
pub trait Positioner {
    /// Start tracking the two surfaces.
    fn attach(&mut self, input: &SurfaceHandle, dropdown: &SurfaceHandle);
    /// Recompute the dropdown placement now.
    fn recompute(&mut self);
    /// Stop tracking; no observers may outlive this call.
    fn release(&mut self);
}

/// Positioner for hosts that lay the dropdown out statically.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPositioner;

impl Positioner for NoopPositioner {
    fn attach(&mut self, _input: &SurfaceHandle, _dropdown: &SurfaceHandle) {}
    fn recompute(&mut self) {}
    fn release(&mut self) {}
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Capability check used for outside-pointer detection.
pub trait HitTest {
    fn contains_point(&self, point: Point) -> bool;
}

impl HitTest for Rect {
    fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// A widget made of several surfaces (input, floating dropdown) is hit when any is.
impl HitTest for [Rect] {
    fn contains_point(&self, p: Point) -> bool {
        self.iter().any(|r| r.contains_point(p))
    }
}

impl<const N: usize> HitTest for [Rect; N] {
    fn contains_point(&self, p: Point) -> bool {
        self.as_slice().contains_point(p)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bottom,
    Top,
}

/// Where the dropdown goes and how large it may get.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub max_height: f64,
    pub side: Side,
}

/// Place a floating surface of natural height `floating_height` under (or, if it
/// does not fit and there is more room, over) `reference`, inside `viewport`.
pub fn compute_position(reference: Rect, floating_height: f64, viewport: Rect) -> Placement {
    let below = (viewport.bottom() - reference.bottom() - DROPDOWN_OFFSET - VIEWPORT_PADDING).max(0.0);
    let above = (reference.y - viewport.y - DROPDOWN_OFFSET - VIEWPORT_PADDING).max(0.0);

    let side = if floating_height > below && above > below { Side::Top } else { Side::Bottom };
    let available = match side {
        Side::Bottom => below,
        Side::Top => above,
    };
    let height = floating_height.min(available);
    let y = match side {
        Side::Bottom => reference.bottom() + DROPDOWN_OFFSET,
        Side::Top => reference.y - DROPDOWN_OFFSET - height,
    };

    Placement { x: reference.x, y, width: reference.width, max_height: available, side }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect { x: 0.0, y: 0.0, width: 1000.0, height: 800.0 };

    #[test]
    fn places_below_with_offset_and_matching_width() {
        let input = Rect::new(100.0, 50.0, 400.0, 40.0);
        let p = compute_position(input, 200.0, VIEWPORT);
        assert_eq!(p.side, Side::Bottom);
        assert_eq!(p.x, 100.0);
        assert_eq!(p.y, 93.0);
        assert_eq!(p.width, 400.0);
        assert_eq!(p.max_height, 800.0 - 90.0 - DROPDOWN_OFFSET - VIEWPORT_PADDING);
    }

    #[test]
    fn flips_above_when_below_is_cramped() {
        let input = Rect::new(100.0, 700.0, 400.0, 40.0);
        let p = compute_position(input, 300.0, VIEWPORT);
        assert_eq!(p.side, Side::Top);
        assert_eq!(p.y, 700.0 - DROPDOWN_OFFSET - 300.0);
    }

    #[test]
    fn stays_below_when_neither_side_fits_but_below_is_larger() {
        let input = Rect::new(0.0, 300.0, 100.0, 20.0);
        let p = compute_position(input, 5000.0, VIEWPORT);
        assert_eq!(p.side, Side::Bottom);
        assert!(p.max_height < 5000.0);
    }

    #[test]
    fn hit_test_covers_all_surfaces() {
        let surfaces = [Rect::new(0.0, 0.0, 100.0, 20.0), Rect::new(0.0, 23.0, 100.0, 200.0)];
        assert!(surfaces.contains_point(Point::new(50.0, 10.0)));
        assert!(surfaces.contains_point(Point::new(50.0, 150.0)));
        assert!(!surfaces.contains_point(Point::new(150.0, 10.0)));
    }
}
