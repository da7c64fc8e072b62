//! The drawing-surface capability the card renderer draws against.
//!
//! Coordinates are PDF points with the origin at the lower-left corner of the
//! current frame; `translate` shifts the frame and `save_state` /
//! `restore_state` push and pop transform, stroke color and line width.

use std::ops::{Deref, DerefMut};

use crate::errors::CardError;
use crate::layout::paragraph::{self, ParagraphBox, ParagraphStyle, Rgb};

/// Straight segments used to approximate each quarter-circle corner.
pub const CORNER_SEGMENTS: usize = 8;

pub trait DrawingSurface {
    /// Finishes the current page and starts a fresh one of the same size.
    fn new_page(&mut self);

    fn set_stroke_color(&mut self, color: Rgb);

    fn set_line_width(&mut self, width: f32);

    /// Strokes a rectangle with rounded corners using the current stroke state.
    fn draw_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
    ) -> Result<(), CardError>;

    /// Strokes a plain rectangle using the current stroke state.
    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<(), CardError>;

    fn save_state(&mut self);

    fn restore_state(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    /// Wraps `text` into a box `width` points wide.
    fn layout_paragraph(&self, text: &str, style: &ParagraphStyle, width: f32) -> ParagraphBox {
        paragraph::layout_paragraph(text, style, width)
    }

    /// Draws a laid-out paragraph with its bottom-left corner at (`x`, `y`).
    fn draw_paragraph(&mut self, paragraph: &ParagraphBox, x: f32, y: f32)
        -> Result<(), CardError>;

    /// Serializes every page into the output document.
    fn finalize(self) -> Result<Vec<u8>, CardError>
    where
        Self: Sized;
}

// ────────────────────────────────────────────────────────────────────────────
// Scoped graphics state
// ────────────────────────────────────────────────────────────────────────────

/// Saves the surface state on creation and restores it when dropped, so every
/// exit path (including `?`) leaves the surface as it found it.
pub struct StateGuard<'a, S: DrawingSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: DrawingSurface + ?Sized> StateGuard<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save_state();
        StateGuard { surface }
    }
}

impl<S: DrawingSurface + ?Sized> Deref for StateGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> DerefMut for StateGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> Drop for StateGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.restore_state();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Geometry helpers
// ────────────────────────────────────────────────────────────────────────────

/// Outline of a rounded rectangle as a closed polygon, counter-clockwise from
/// the bottom edge. The radius is clamped to half the shorter side.
pub fn rounded_rect_path(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Vec<(f32, f32)> {
    let r = radius.max(0.0).min(width / 2.0).min(height / 2.0);
    if r == 0.0 {
        return vec![(x, y), (x + width, y), (x + width, y + height), (x, y + height)];
    }

    // corner centres with the angle each arc starts at
    let corners = [
        (x + width - r, y + r, -90.0_f32),
        (x + width - r, y + height - r, 0.0),
        (x + r, y + height - r, 90.0),
        (x + r, y + r, 180.0),
    ];

    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (cx, cy, start) in corners {
        for step in 0..=CORNER_SEGMENTS {
            let angle = (start + 90.0 * step as f32 / CORNER_SEGMENTS as f32).to_radians();
            points.push((cx + r * angle.cos(), cy + r * angle.sin()));
        }
    }
    points
}
