//! In-memory surface that records every drawing call, for exact assertions on
//! colors, geometry and state balance.

use serde::Serialize;

use crate::errors::CardError;
use crate::layout::font_metrics::FontFace;
use crate::layout::paragraph::{ParagraphBox, Rgb};
use crate::render::surface::DrawingSurface;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    NewPage,
    StrokeColor(Rgb),
    LineWidth(f32),
    RoundedRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    SaveState,
    RestoreState,
    Translate {
        dx: f32,
        dy: f32,
    },
    Paragraph {
        lines: Vec<String>,
        face: FontFace,
        font_size: f32,
        x: f32,
        y: f32,
        height: f32,
    },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    depth: i32,
    fail_paragraphs: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose `draw_paragraph` always errors.
    pub fn failing_paragraphs() -> Self {
        RecordingSurface {
            fail_paragraphs: true,
            ..Self::default()
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Open `save_state` calls not yet matched by `restore_state`.
    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn stroke_colors(&self) -> Vec<Rgb> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::StrokeColor(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    pub fn page_breaks(&self) -> usize {
        self.ops.iter().filter(|op| **op == DrawOp::NewPage).count()
    }

    pub fn paragraphs(&self) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Paragraph { .. }))
            .collect()
    }
}

impl DrawingSurface for RecordingSurface {
    fn new_page(&mut self) {
        self.ops.push(DrawOp::NewPage);
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.ops.push(DrawOp::StrokeColor(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn draw_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
    ) -> Result<(), CardError> {
        self.ops.push(DrawOp::RoundedRect {
            x,
            y,
            width,
            height,
            radius,
        });
        Ok(())
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<(), CardError> {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn save_state(&mut self) {
        self.depth += 1;
        self.ops.push(DrawOp::SaveState);
    }

    fn restore_state(&mut self) {
        self.depth -= 1;
        self.ops.push(DrawOp::RestoreState);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn draw_paragraph(&mut self, paragraph: &ParagraphBox, x: f32, y: f32) -> Result<(), CardError> {
        if self.fail_paragraphs {
            return Err(CardError::Render("paragraph rejected".to_string()));
        }
        self.ops.push(DrawOp::Paragraph {
            lines: paragraph.lines.iter().map(|l| l.text.clone()).collect(),
            face: paragraph.style.face,
            font_size: paragraph.style.font_size,
            x,
            y,
            height: paragraph.height,
        });
        Ok(())
    }

    fn finalize(self) -> Result<Vec<u8>, CardError> {
        serde_json::to_vec(&self.ops).map_err(|e| CardError::Render(e.to_string()))
    }
}
