//! Card renderer — draws one quote into one grid cell.
//!
//! Local frame after the two translations: (0, 0) is the lower-left corner of
//! the printed border. Inside it:
//! - border: rounded rect, 2pt, blue for plain quotes and red for attributed ones
//! - quote: bold, centered, its box centered on `text_height + quote_lift`
//! - attribution: oblique, right-aligned, bottom edge at `attribution_y`
//!
//! Under the default geometry the two text boxes do not meet, but nothing stops
//! a long quote from running down into the attribution. `OverflowPolicy`
//! decides what happens then; the default leaves the overlap in place and logs it.

use serde::Serialize;
use tracing::warn;

use crate::deck::Quote;
use crate::errors::CardError;
use crate::layout::font_metrics::FontFace;
use crate::layout::grid::{GridConfig, PlacementSlot, INCH};
use crate::layout::paragraph::{
    apply_overflow, Alignment, OverflowPolicy, ParagraphBox, ParagraphStyle, Rgb,
};
use crate::render::surface::{DrawingSurface, StateGuard};

// ────────────────────────────────────────────────────────────────────────────
// Card style
// ────────────────────────────────────────────────────────────────────────────

/// Everything about a card's look that is not the quote itself.
#[derive(Debug, Clone, Serialize)]
pub struct CardStyle {
    pub quote: ParagraphStyle,
    pub attribution: ParagraphStyle,
    pub plain_border: Rgb,
    pub attributed_border: Rgb,
    pub border_line_width: f32,
    /// Left edge of both text boxes.
    pub text_x: f32,
    pub text_width: f32,
    pub text_height: f32,
    /// Upward bias of the quote box's center above `text_height`.
    pub quote_lift: f32,
    /// Bottom edge of the attribution box.
    pub attribution_y: f32,
    pub overflow: OverflowPolicy,
}

impl CardStyle {
    /// The standard card look for a grid.
    pub fn for_grid(grid: &GridConfig, overflow: OverflowPolicy) -> CardStyle {
        CardStyle {
            quote: ParagraphStyle {
                face: FontFace::HelveticaBold,
                font_size: 14.0,
                leading: 12.0,
                alignment: Alignment::Center,
                color: Rgb::BLACK,
            },
            attribution: ParagraphStyle {
                face: FontFace::HelveticaOblique,
                font_size: 10.0,
                leading: 12.0,
                alignment: Alignment::Right,
                color: Rgb::BLACK,
            },
            plain_border: Rgb::BLUE,
            attributed_border: Rgb::RED,
            border_line_width: 2.0,
            text_x: 0.25 * INCH,
            text_width: 2.0 * INCH - grid.border_gap - grid.cut_gap,
            text_height: 2.0 * INCH - grid.border_gap,
            quote_lift: 0.25 * INCH,
            attribution_y: 0.15 * INCH,
            overflow,
        }
    }

    /// Border color: the only visual difference between the two card kinds.
    pub fn border_color(&self, quote: &Quote) -> Rgb {
        if quote.has_attribution() {
            self.attributed_border
        } else {
            self.plain_border
        }
    }

    /// Bottom edge of a quote box of the given height.
    pub fn quote_y(&self, height: f32) -> f32 {
        self.text_height - height / 2.0 + self.quote_lift
    }

    /// Tallest quote box that stays inside the text area, under the border's
    /// top edge and clear of the attribution (when there is one).
    pub fn max_quote_height(&self, grid: &GridConfig, attribution: Option<&ParagraphBox>) -> f32 {
        let center = self.text_height + self.quote_lift;
        let mut limit = self
            .text_height
            .min(2.0 * (grid.border_height() - center));
        if let Some(attr) = attribution {
            limit = limit.min(2.0 * (center - (self.attribution_y + attr.height)));
        }
        limit.max(0.0)
    }
}

/// Attribution line as printed.
pub fn attribution_text(who: &str) -> String {
    format!("- {who}")
}

// ────────────────────────────────────────────────────────────────────────────
// Drawing
// ────────────────────────────────────────────────────────────────────────────

/// What happened while drawing one card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardOutcome {
    pub quote_height: f32,
    pub quote_font_size: f32,
    /// The quote box is taller than its allotted space (only possible with `Allow`
    /// or when `Shrink` bottoms out).
    pub overflowed: bool,
}

/// Draws `quote` into the cell at `slot`. The surface state is restored on
/// return, whether drawing succeeded or not.
pub fn draw_card<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    quote: &Quote,
    slot: &PlacementSlot,
    grid: &GridConfig,
    style: &CardStyle,
) -> Result<CardOutcome, CardError> {
    let mut s = StateGuard::new(surface);
    s.translate(slot.origin_x, slot.origin_y);
    s.translate(grid.border_inset(), grid.border_inset());

    s.set_line_width(style.border_line_width);
    s.set_stroke_color(style.border_color(quote));
    s.draw_rounded_rect(
        0.0,
        0.0,
        grid.border_width(),
        grid.border_height(),
        grid.corner_radius,
    )?;

    let attribution = quote
        .attribution()
        .map(|who| s.layout_paragraph(&attribution_text(who), &style.attribution, style.text_width));

    let max_height = style.max_quote_height(grid, attribution.as_ref());
    let laid_out = s.layout_paragraph(quote.contents(), &style.quote, style.text_width);
    let quote_box = apply_overflow(laid_out, quote.contents(), max_height, style.overflow);
    let overflowed = quote_box.height > max_height;
    if overflowed {
        warn!(
            placed_index = slot.placed_index,
            page = slot.page_index,
            lines = quote_box.line_count(),
            height = quote_box.height,
            max_height,
            policy = ?style.overflow,
            "quote does not fit its card and may collide with the attribution"
        );
    }

    s.draw_paragraph(&quote_box, style.text_x, style.quote_y(quote_box.height))?;

    if let Some(attr) = &attribution {
        s.draw_paragraph(attr, style.text_x, style.attribution_y)?;
    }

    Ok(CardOutcome {
        quote_height: quote_box.height,
        quote_font_size: quote_box.style.font_size,
        overflowed,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
