//! Paragraph layout: word-wrapped, aligned lines in a fixed-width box.
//!
//! A `ParagraphBox` is laid out once and then drawn at a position given by its
//! bottom-left corner. The first baseline sits `font_size` below the box top
//! and each following baseline is `leading` lower; box height is
//! `lines * leading`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::font_metrics::{get_metrics, FontFace};

/// Smallest font size the shrink policy will go down to.
pub const MIN_FONT_SIZE: f32 = 6.0;

/// Appended to the last kept line by the truncate policy.
pub const ELLIPSIS: &str = "...";

// ────────────────────────────────────────────────────────────────────────────
// Style
// ────────────────────────────────────────────────────────────────────────────

/// Device RGB, components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    pub const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);
    pub const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);
    pub const LIGHT_GRAY: Rgb = Rgb::new(0.75, 0.75, 0.75);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Rgb { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    pub face: FontFace,
    pub font_size: f32,
    /// Baseline-to-baseline distance.
    pub leading: f32,
    pub alignment: Alignment,
    pub color: Rgb,
}

impl ParagraphStyle {
    /// Same style at a smaller size, keeping the leading-to-size ratio.
    pub fn scaled_to(&self, font_size: f32) -> ParagraphStyle {
        ParagraphStyle {
            font_size,
            leading: self.leading * font_size / self.font_size,
            ..self.clone()
        }
    }
}

/// What to do when a paragraph is taller than the space it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Draw it anyway; it may run into neighbouring text.
    #[default]
    Allow,
    /// Step the font size down until it fits (not below `MIN_FONT_SIZE`).
    Shrink,
    /// Keep the lines that fit and mark the cut with an ellipsis.
    Truncate,
}

impl std::str::FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(OverflowPolicy::Allow),
            "shrink" => Ok(OverflowPolicy::Shrink),
            "truncate" => Ok(OverflowPolicy::Truncate),
            other => Err(format!(
                "unknown overflow policy '{other}' (expected allow, shrink or truncate)"
            )),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Laid-out paragraph
// ────────────────────────────────────────────────────────────────────────────

/// One wrapped line and its horizontal offset inside the box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphLine {
    pub text: String,
    pub offset_x: f32,
    pub width: f32,
}

/// A sized, ready-to-draw paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphBox {
    pub lines: Vec<ParagraphLine>,
    pub style: ParagraphStyle,
    pub width: f32,
    pub height: f32,
}

impl ParagraphBox {
    /// Baseline of line `index`, relative to the box's bottom edge.
    pub fn baseline(&self, index: usize) -> f32 {
        self.height - self.style.font_size - index as f32 * self.style.leading
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Wraps `text` into a box `width` points wide.
pub fn layout_paragraph(text: &str, style: &ParagraphStyle, width: f32) -> ParagraphBox {
    let metrics = get_metrics(style.face);
    let wrapped = metrics.wrap(text, style.font_size, width);
    build_box(wrapped, style, width)
}

fn build_box(wrapped: Vec<String>, style: &ParagraphStyle, width: f32) -> ParagraphBox {
    let metrics = get_metrics(style.face);
    let lines: Vec<ParagraphLine> = wrapped
        .into_iter()
        .map(|text| {
            let line_width = metrics.width_pt(&text, style.font_size);
            let offset_x = match style.alignment {
                Alignment::Left => 0.0,
                Alignment::Center => (width - line_width) / 2.0,
                Alignment::Right => width - line_width,
            };
            ParagraphLine {
                text,
                offset_x,
                width: line_width,
            }
        })
        .collect();

    let height = lines.len() as f32 * style.leading;
    ParagraphBox {
        lines,
        style: style.clone(),
        width,
        height,
    }
}

/// Applies `policy` to an already laid-out paragraph. Boxes that fit are returned as-is.
pub fn apply_overflow(
    laid_out: ParagraphBox,
    text: &str,
    max_height: f32,
    policy: OverflowPolicy,
) -> ParagraphBox {
    if laid_out.height <= max_height {
        return laid_out;
    }

    let width = laid_out.width;
    match policy {
        OverflowPolicy::Allow => laid_out,
        OverflowPolicy::Shrink => shrink_to_fit(text, &laid_out.style, width, max_height),
        OverflowPolicy::Truncate => truncate_to_fit(laid_out, width, max_height),
    }
}

fn shrink_to_fit(text: &str, style: &ParagraphStyle, width: f32, max_height: f32) -> ParagraphBox {
    let mut size = style.font_size;
    loop {
        size -= 1.0;
        if size < MIN_FONT_SIZE {
            // Still too tall at the floor size; draw at the floor and let it overflow.
            return layout_paragraph(text, &style.scaled_to(MIN_FONT_SIZE), width);
        }
        let candidate = layout_paragraph(text, &style.scaled_to(size), width);
        if candidate.height <= max_height {
            debug!(from = style.font_size, to = size, "shrunk paragraph to fit");
            return candidate;
        }
    }
}

fn truncate_to_fit(laid_out: ParagraphBox, width: f32, max_height: f32) -> ParagraphBox {
    let style = laid_out.style;
    let metrics = get_metrics(style.face);
    let keep = ((max_height / style.leading).floor() as usize).max(1);

    let mut lines: Vec<String> = laid_out
        .lines
        .into_iter()
        .take(keep)
        .map(|l| l.text)
        .collect();

    if let Some(last) = lines.last_mut() {
        let mut words: Vec<&str> = last.split(' ').collect();
        let mut truncated = format!("{}{ELLIPSIS}", words.join(" "));
        while words.len() > 1 && metrics.width_pt(&truncated, style.font_size) > width {
            words.pop();
            truncated = format!("{}{ELLIPSIS}", words.join(" "));
        }
        *last = truncated;
    }

    build_box(lines, &style, width)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
