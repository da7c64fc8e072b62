//! Grid placement engine — maps a placed index to a page and a cell origin.
//!
//! All lengths are PDF points (1pt = 1/72in). The mapping is column-major:
//! the row cycles with every card and the column advances every `rows` cards.
//! That order is visible on the printed sheet, so it must not be "fixed".
//!
//! ```text
//! row 2 | 2 5 8
//! row 1 | 1 4 7
//! row 0 | 0 3 6     PDF y grows upward, so row 0 is the bottom of the page
//! ```

use serde::{Deserialize, Serialize};

/// Points per inch.
pub const INCH: f32 = 72.0;

/// US letter.
pub const LETTER_WIDTH: f32 = 8.5 * INCH;
pub const LETTER_HEIGHT: f32 = 11.0 * INCH;

// ────────────────────────────────────────────────────────────────────────────
// Grid configuration
// ────────────────────────────────────────────────────────────────────────────

/// Physical layout of one sheet of cards.
///
/// `cut_gap` is the strip reserved around each card for the cutting guide;
/// `border_gap` is the inset from the cut edge to the printed border.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub card_width: f32,
    pub card_height: f32,
    pub cut_gap: f32,
    pub border_gap: f32,
    /// Offset of the grid from the page's lower-left corner.
    pub margin: f32,
    pub corner_radius: f32,
    pub cols: usize,
    pub rows: usize,
}

/// Returns the standard sheet: 2.5" × 3.5" cards, 3 × 3 on US letter.
pub fn default_grid_config() -> GridConfig {
    GridConfig {
        page_width: LETTER_WIDTH,
        page_height: LETTER_HEIGHT,
        card_width: 2.5 * INCH,
        card_height: 3.5 * INCH,
        cut_gap: INCH * 0.2 / 6.0,
        border_gap: INCH / 16.0,
        margin: 0.2 * INCH,
        corner_radius: 0.2 * INCH,
        cols: 3,
        rows: 3,
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        default_grid_config()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Placement
// ────────────────────────────────────────────────────────────────────────────

/// Where one card lands. Derived from `placed_index` alone and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacementSlot {
    pub placed_index: usize,
    pub page_index: usize,
    /// Column, 0-based from the left.
    pub cell_x: usize,
    /// Row, 0-based from the bottom of the page.
    pub cell_y: usize,
    pub origin_x: f32,
    pub origin_y: f32,
    /// True when a fresh page must be started before drawing this card.
    pub starts_new_page: bool,
}

impl GridConfig {
    pub fn cards_per_page(&self) -> usize {
        self.cols * self.rows
    }

    /// Horizontal distance between neighbouring cell origins.
    pub fn column_pitch(&self) -> f32 {
        10.0 * self.cut_gap + self.card_width
    }

    /// Vertical distance between neighbouring cell origins.
    pub fn row_pitch(&self) -> f32 {
        2.75 * self.cut_gap + self.card_height
    }

    /// Distance from a cell origin to the printed border's lower-left corner.
    pub fn border_inset(&self) -> f32 {
        self.border_gap + self.cut_gap
    }

    pub fn border_width(&self) -> f32 {
        self.card_width - 2.0 * self.border_gap
    }

    pub fn border_height(&self) -> f32 {
        self.card_height - 2.0 * self.border_gap
    }

    /// A new page starts before every `cards_per_page`-th card, never before the first.
    pub fn starts_new_page(&self, placed_index: usize) -> bool {
        placed_index != 0 && placed_index % self.cards_per_page() == 0
    }

    /// Number of pages a deck of `cards` occupies. An empty deck still gets one blank page.
    pub fn page_count(&self, cards: usize) -> usize {
        cards.div_ceil(self.cards_per_page()).max(1)
    }

    /// Maps a placed index (accepted cards only) to its slot.
    pub fn place(&self, placed_index: usize) -> PlacementSlot {
        debug_assert!(self.cols > 0 && self.rows > 0, "grid must have cells");

        let per_page = self.cards_per_page();
        let page_index = placed_index / per_page;
        let slot_in_page = placed_index % per_page;
        let cell_x = (slot_in_page / self.rows) % self.cols;
        let cell_y = slot_in_page % self.rows;

        let origin_x = cell_x as f32 * self.column_pitch() + self.margin - self.border_gap;
        let origin_y = cell_y as f32 * self.row_pitch() + self.margin
            - self.border_gap
            - 0.25 * self.cut_gap;

        PlacementSlot {
            placed_index,
            page_index,
            cell_x,
            cell_y,
            origin_x,
            origin_y,
            starts_new_page: self.starts_new_page(placed_index),
        }
    }

    /// Every slot of the first page, in placement order.
    pub fn cells(&self) -> impl Iterator<Item = PlacementSlot> + '_ {
        (0..self.cards_per_page()).map(move |i| self.place(i))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_default_constants() {
        let grid = default_grid_config();
        assert!(approx(grid.card_width, 180.0));
        assert!(approx(grid.card_height, 252.0));
        assert!(approx(grid.cut_gap, 2.4));
        assert!(approx(grid.border_gap, 4.5));
        assert!(approx(grid.margin, 14.4));
        assert_eq!(grid.cards_per_page(), 9);
    }

    #[test]
    fn test_first_card_origin() {
        let slot = default_grid_config().place(0);
        assert_eq!((slot.page_index, slot.cell_x, slot.cell_y), (0, 0, 0));
        // margin - border_gap, and the extra quarter cut gap on y
        assert!(approx(slot.origin_x, 9.9), "origin_x = {}", slot.origin_x);
        assert!(approx(slot.origin_y, 9.3), "origin_y = {}", slot.origin_y);
        assert!(!slot.starts_new_page);
    }

    #[test]
    fn test_mapping_is_column_major() {
        let grid = default_grid_config();
        let cells: Vec<(usize, usize)> = (0..9)
            .map(|i| {
                let s = grid.place(i);
                (s.cell_x, s.cell_y)
            })
            .collect();
        assert_eq!(
            cells,
            vec![
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 1),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2)
            ]
        );
    }

    #[test]
    fn test_origins_follow_pitches() {
        let grid = default_grid_config();
        let second_row = grid.place(1);
        let second_col = grid.place(3);
        let last = grid.place(8);
        assert!(approx(second_row.origin_y, 9.3 + 258.6));
        assert!(approx(second_col.origin_x, 9.9 + 204.0));
        assert!(approx(last.origin_x, 9.9 + 2.0 * 204.0));
        assert!(approx(last.origin_y, 9.3 + 2.0 * 258.6));
    }

    #[test]
    fn test_last_cell_fits_on_letter() {
        let grid = default_grid_config();
        let last = grid.place(8);
        let right = last.origin_x + grid.border_inset() + grid.border_width();
        let top = last.origin_y + grid.border_inset() + grid.border_height();
        assert!(right < grid.page_width, "right edge {right}");
        assert!(top < grid.page_height, "top edge {top}");
    }

    #[test]
    fn test_page_break_cadence() {
        let grid = default_grid_config();
        let breaks: Vec<usize> = (0..40).filter(|&i| grid.place(i).starts_new_page).collect();
        assert_eq!(breaks, vec![9, 18, 27, 36]);
    }

    #[test]
    fn test_page_index_and_cells_repeat_per_page() {
        let grid = default_grid_config();
        for i in 0..9 {
            let a = grid.place(i);
            let b = grid.place(i + 18);
            assert_eq!(b.page_index, 2);
            assert_eq!((a.cell_x, a.cell_y), (b.cell_x, b.cell_y));
            assert_eq!((a.origin_x, a.origin_y), (b.origin_x, b.origin_y));
        }
    }

    #[test]
    fn test_placement_is_deterministic() {
        let grid = default_grid_config();
        let first: Vec<PlacementSlot> = (0..27).map(|i| grid.place(i)).collect();
        let second: Vec<PlacementSlot> = (0..27).map(|i| grid.place(i)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_page_count() {
        let grid = default_grid_config();
        assert_eq!(grid.page_count(0), 1);
        assert_eq!(grid.page_count(1), 1);
        assert_eq!(grid.page_count(9), 1);
        assert_eq!(grid.page_count(10), 2);
        assert_eq!(grid.page_count(27), 3);
    }

    #[test]
    fn test_cells_cover_one_page() {
        let grid = default_grid_config();
        let cells: Vec<PlacementSlot> = grid.cells().collect();
        assert_eq!(cells.len(), 9);
        assert!(cells.iter().all(|c| c.page_index == 0));
    }

    #[test]
    fn test_two_by_two_grid_is_a_data_change() {
        let grid = GridConfig {
            cols: 2,
            rows: 2,
            ..default_grid_config()
        };
        assert_eq!(grid.cards_per_page(), 4);
        assert!(grid.place(4).starts_new_page);
        let s = grid.place(2);
        assert_eq!((s.cell_x, s.cell_y), (1, 0));
    }
}
