//! Cut-guide jig: the sheet's outlines without any quotes.
//!
//! Printed on its own it is a template for setting up a paper cutter. Drawn
//! under a card page (`--cut-guides`) it adds the cut lines to the real sheet.
//!
//! Per cell, from the outside in:
//! - green: the cut strip, card plus `cut_gap` on every side
//! - black: the card's cut edge
//! - red: the printed border position (jig only; card pages draw their own)
//!
//! Per page: two light-gray frames at 0.1" and 0.2" from the paper edge.

use crate::errors::CardError;
use crate::layout::grid::{GridConfig, PlacementSlot, INCH};
use crate::layout::paragraph::Rgb;
use crate::render::pdf::PdfSurface;
use crate::render::surface::{DrawingSurface, StateGuard};

/// Page frames at 0.1" and 0.2" from the paper edge.
pub fn draw_page_frames<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    grid: &GridConfig,
) -> Result<(), CardError> {
    let mut s = StateGuard::new(surface);
    s.set_stroke_color(Rgb::LIGHT_GRAY);
    for step in 1..=2 {
        let margin = 0.1 * step as f32 * INCH;
        s.draw_rect(
            margin,
            margin,
            grid.page_width - 2.0 * margin,
            grid.page_height - 2.0 * margin,
        )?;
    }
    Ok(())
}

/// Outlines for one cell. `with_border` adds the red border outline.
pub fn draw_cell_guides<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    slot: &PlacementSlot,
    grid: &GridConfig,
    with_border: bool,
) -> Result<(), CardError> {
    let mut cell = StateGuard::new(surface);
    cell.translate(slot.origin_x, slot.origin_y);

    {
        let mut s = StateGuard::new(&mut *cell);
        s.set_stroke_color(Rgb::GREEN);
        s.draw_rounded_rect(
            0.0,
            0.0,
            grid.card_width + 2.0 * grid.cut_gap,
            grid.card_height + 2.0 * grid.cut_gap,
            grid.corner_radius,
        )?;
    }

    {
        let mut s = StateGuard::new(&mut *cell);
        s.set_stroke_color(Rgb::BLACK);
        s.translate(grid.cut_gap, grid.cut_gap);
        s.draw_rounded_rect(0.0, 0.0, grid.card_width, grid.card_height, grid.corner_radius)?;
    }

    if with_border {
        let mut s = StateGuard::new(&mut *cell);
        s.set_stroke_color(Rgb::RED);
        s.translate(grid.border_inset(), grid.border_inset());
        s.draw_rounded_rect(
            0.0,
            0.0,
            grid.border_width(),
            grid.border_height(),
            grid.corner_radius,
        )?;
    }

    Ok(())
}

/// Frames plus the guides of every cell on the current page.
pub fn draw_guides_page<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    grid: &GridConfig,
    with_border: bool,
) -> Result<(), CardError> {
    draw_page_frames(surface, grid)?;
    for slot in grid.cells() {
        draw_cell_guides(surface, &slot, grid, with_border)?;
    }
    Ok(())
}

/// The one-page jig as a finished PDF.
pub fn render_jig(grid: &GridConfig) -> Result<Vec<u8>, CardError> {
    let mut surface = PdfSurface::new("Card cutting jig", grid.page_width, grid.page_height)?;
    draw_guides_page(&mut surface, grid, true)?;
    surface.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::grid::default_grid_config;
    use crate::render::recording::{DrawOp, RecordingSurface};

    #[test]
    fn test_jig_page_draws_frames_and_three_outlines_per_cell() {
        let grid = default_grid_config();
        let mut surface = RecordingSurface::new();
        draw_guides_page(&mut surface, &grid, true).unwrap();

        let rects = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { .. }))
            .count();
        let rounded = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::RoundedRect { .. }))
            .count();
        assert_eq!(rects, 2);
        assert_eq!(rounded, 27);
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_card_page_guides_skip_border() {
        let grid = default_grid_config();
        let mut surface = RecordingSurface::new();
        draw_cell_guides(&mut surface, &grid.place(0), &grid, false).unwrap();
        assert_eq!(surface.stroke_colors(), vec![Rgb::GREEN, Rgb::BLACK]);
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_frames_are_inset_from_paper_edge() {
        let grid = default_grid_config();
        let mut surface = RecordingSurface::new();
        draw_page_frames(&mut surface, &grid).unwrap();
        let first = surface
            .ops()
            .iter()
            .find(|op| matches!(op, DrawOp::Rect { .. }))
            .cloned();
        match first {
            Some(DrawOp::Rect { x, y, width, .. }) => {
                assert!((x - 7.2).abs() < 1e-3);
                assert!((y - 7.2).abs() < 1e-3);
                assert!((width - (612.0 - 14.4)).abs() < 1e-3);
            }
            other => panic!("expected a frame, got {other:?}"),
        }
    }

    #[test]
    fn test_render_jig_is_a_pdf() {
        let bytes = render_jig(&default_grid_config()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
