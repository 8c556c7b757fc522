//! Aspect-ratio fit math and coordinate-space mapping.
//!
//! These are the only sanctioned conversions between screen, source, and
//! output space. All functions are pure; a non-positive dimension is
//! rejected with [`DuocastError::InvalidDimension`] and the caller skips
//! the frame.

use duocast_common::error::{DuocastError, DuocastResult};
use duocast_scene_model::rect::{Rect, ScreenRect, Size, SourceRect};
use duocast_scene_model::state::FitMode;

/// Largest size not exceeding `(max_w, max_h)` that preserves the source
/// aspect ratio. The result is untranslated; the caller centers it.
pub fn aspect_fit(src_w: f64, src_h: f64, max_w: f64, max_h: f64) -> DuocastResult<Size> {
    ensure_positive(src_w, src_h)?;
    ensure_positive(max_w, max_h)?;

    let ratio = (max_w / src_w).min(max_h / src_h);
    Ok(Size::new(src_w * ratio, src_h * ratio))
}

/// Compute the draw rectangle for a source inside `dest` under `mode`.
///
/// `Contain` letterboxes and centers on the short axis; `Cover` fills
/// `dest` and centers on the long axis, relying on the surface's clip for
/// the overflow; `Stretch` fills `dest` exactly.
pub fn fit_with_mode<S>(
    src_w: f64,
    src_h: f64,
    dest: Rect<S>,
    mode: FitMode,
) -> DuocastResult<Rect<S>> {
    ensure_positive(src_w, src_h)?;
    ensure_positive(dest.w, dest.h)?;

    // Equal aspect ratios short-circuit so callers get `dest` back
    // bit-exact under every mode.
    if src_w * dest.h == src_h * dest.w {
        return Ok(dest);
    }

    let scaled = match mode {
        FitMode::Stretch => return Ok(dest),
        FitMode::Contain => {
            let ratio = (dest.w / src_w).min(dest.h / src_h);
            Size::new(src_w * ratio, src_h * ratio)
        }
        FitMode::Cover => {
            let ratio = (dest.w / src_w).max(dest.h / src_h);
            Size::new(src_w * ratio, src_h * ratio)
        }
    };

    Ok(scaled.centered_in(&dest))
}

/// Map a rectangle in screen space to source pixel space.
///
/// `video_display_rect` is where the source is actually rendered inside
/// its container (aspect-fit plus centering); `screen_rect` is any
/// rectangle in the same screen coordinates. The result is clamped to
/// `[0, src_w] × [0, src_h]`.
pub fn map_screen_rect_to_source(
    screen_rect: ScreenRect,
    video_display_rect: ScreenRect,
    src_w: f64,
    src_h: f64,
) -> DuocastResult<SourceRect> {
    ensure_positive(src_w, src_h)?;
    ensure_positive(video_display_rect.w, video_display_rect.h)?;

    let scale_x = src_w / video_display_rect.w;
    let scale_y = src_h / video_display_rect.h;

    let left = ((screen_rect.x - video_display_rect.x) * scale_x).clamp(0.0, src_w);
    let top = ((screen_rect.y - video_display_rect.y) * scale_y).clamp(0.0, src_h);
    let right = ((screen_rect.right() - video_display_rect.x) * scale_x).clamp(0.0, src_w);
    let bottom = ((screen_rect.bottom() - video_display_rect.y) * scale_y).clamp(0.0, src_h);

    Ok(Rect::new(
        left,
        top,
        (right - left).max(0.0),
        (bottom - top).max(0.0),
    ))
}

/// Map a rectangle in source pixel space back to screen space.
///
/// Exact inverse of [`map_screen_rect_to_source`] for rectangles inside
/// the displayed video area; used to draw a confirmed crop back onto the
/// UI overlay.
pub fn map_source_rect_to_screen(
    source_rect: SourceRect,
    video_display_rect: ScreenRect,
    src_w: f64,
    src_h: f64,
) -> DuocastResult<ScreenRect> {
    ensure_positive(src_w, src_h)?;
    ensure_positive(video_display_rect.w, video_display_rect.h)?;

    let scale_x = video_display_rect.w / src_w;
    let scale_y = video_display_rect.h / src_h;

    Ok(Rect::new(
        video_display_rect.x + source_rect.x * scale_x,
        video_display_rect.y + source_rect.y * scale_y,
        source_rect.w * scale_x,
        source_rect.h * scale_y,
    ))
}

fn ensure_positive(w: f64, h: f64) -> DuocastResult<()> {
    if w <= 0.0 || h <= 0.0 || !w.is_finite() || !h.is_finite() {
        return Err(DuocastError::invalid_dimension(w, h));
    }
    Ok(())
}
