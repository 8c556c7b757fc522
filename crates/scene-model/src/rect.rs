//! Space-tagged rectangles and sizes.
//!
//! Three coordinate spaces exist in the compositor and mixing them up is
//! the classic source of silent geometry bugs, so the space is part of the
//! rectangle's type:
//! - [`ScreenSpace`]: UI overlay pixels, where the user drags crop handles
//! - [`SourceSpace`]: native pixels of a frame source
//! - [`OutputSpace`]: pixels of the composed output surface

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// UI overlay pixels (the container the source preview is rendered into).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSpace;

/// Native pixels of a frame source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpace;

/// Pixels of the composed output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpace;

/// An axis-aligned rectangle tagged with its coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect<S> {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,

    #[serde(skip)]
    _space: PhantomData<S>,
}

/// Rectangle in UI overlay pixels.
pub type ScreenRect = Rect<ScreenSpace>;
/// Rectangle in source pixels.
pub type SourceRect = Rect<SourceSpace>;
/// Rectangle in output-surface pixels.
pub type OutputRect = Rect<OutputSpace>;

impl<S> Rect<S> {
    /// Create a rectangle from its left/top corner and extents.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w,
            h,
            _space: PhantomData,
        }
    }

    /// Create a rectangle at the origin with the given extents.
    pub fn at_origin(w: f64, h: f64) -> Self {
        Self::new(0.0, 0.0, w, h)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Center point.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Width-to-height ratio.
    pub fn aspect(&self) -> f64 {
        self.w / self.h
    }

    /// The extents of this rectangle, without position.
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Whether this rectangle has no drawable area.
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect<S>) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Constrain this rectangle to lie within `bounds`.
    ///
    /// Extents shrink to fit first, then the rectangle slides inside the
    /// bounds. Degenerate extents collapse toward zero instead of erroring.
    pub fn clamped_within(&self, bounds: &Rect<S>) -> Rect<S> {
        let w = self.w.clamp(0.0, bounds.w);
        let h = self.h.clamp(0.0, bounds.h);
        let x = self.x.clamp(bounds.x, bounds.right() - w);
        let y = self.y.clamp(bounds.y, bounds.bottom() - h);
        Rect::new(x, y, w, h)
    }
}

/// An untranslated extent pair, used where position is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Width-to-height ratio.
    pub fn aspect(&self) -> f64 {
        self.w / self.h
    }

    /// Place this size centered inside `dest`, in `dest`'s coordinate space.
    pub fn centered_in<S>(&self, dest: &Rect<S>) -> Rect<S> {
        Rect::new(
            dest.x + (dest.w - self.w) / 2.0,
            dest.y + (dest.h - self.h) / 2.0,
            self.w,
            self.h,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_center() {
        let r: OutputRect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 70.0);
        assert_eq!(r.center(), (60.0, 45.0));
        assert!(!r.is_empty());
    }

    #[test]
    fn test_centered_in() {
        let dest: OutputRect = Rect::at_origin(1280.0, 720.0);
        let placed = Size::new(640.0, 720.0).centered_in(&dest);
        assert_eq!(placed.x, 320.0);
        assert_eq!(placed.y, 0.0);
        assert_eq!(placed.w, 640.0);
    }

    #[test]
    fn test_clamped_within_slides_inside() {
        let bounds: ScreenRect = Rect::new(100.0, 100.0, 800.0, 450.0);
        let dragged: ScreenRect = Rect::new(850.0, 50.0, 200.0, 200.0);
        let clamped = dragged.clamped_within(&bounds);
        assert!(bounds.contains_rect(&clamped));
        assert_eq!(clamped.w, 200.0);
        assert_eq!(clamped.right(), bounds.right());
        assert_eq!(clamped.y, bounds.y);
    }

    #[test]
    fn test_clamped_within_shrinks_oversized() {
        let bounds: ScreenRect = Rect::at_origin(400.0, 300.0);
        let huge: ScreenRect = Rect::new(-50.0, -50.0, 1000.0, 1000.0);
        let clamped = huge.clamped_within(&bounds);
        assert_eq!(clamped.w, 400.0);
        assert_eq!(clamped.h, 300.0);
        assert_eq!(clamped.x, 0.0);
    }

    #[test]
    fn test_serde_omits_space_tag() {
        let r: SourceRect = Rect::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&r).unwrap();
        let back: SourceRect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
