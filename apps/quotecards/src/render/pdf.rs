//! `DrawingSurface` backed by printpdf, using the built-in Helvetica faces.

use std::borrow::Cow;

use printpdf::{
    BuiltinFont, Color, CurTransMat, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Pt,
};
use tracing::debug;

use crate::errors::CardError;
use crate::layout::font_metrics::FontFace;
use crate::layout::paragraph::{ParagraphBox, Rgb};
use crate::render::surface::{rounded_rect_path, DrawingSurface};

const MM_PER_PT: f32 = 25.4 / 72.0;

fn mm(pt: f32) -> Mm {
    Mm(pt * MM_PER_PT)
}

fn pdf_color(color: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(color.r, color.g, color.b, None))
}

fn render_err(e: printpdf::Error) -> CardError {
    CardError::Render(format!("{e:?}"))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Helvetica => &self.regular,
            FontFace::HelveticaBold => &self.bold,
            FontFace::HelveticaOblique => &self.oblique,
        }
    }
}

pub struct PdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: Fonts,
    page_width: f32,
    page_height: f32,
    pages: usize,
}

impl PdfSurface {
    /// Opens a document whose first page is ready to draw on.
    pub fn new(title: &str, page_width: f32, page_height: f32) -> Result<Self, CardError> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(page_width), mm(page_height), "Page 1");
        let layer = doc.get_page(page).get_layer(layer);

        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(render_err)?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(render_err)?,
            oblique: doc
                .add_builtin_font(BuiltinFont::HelveticaOblique)
                .map_err(render_err)?,
        };

        Ok(PdfSurface {
            doc,
            layer,
            fonts,
            page_width,
            page_height,
            pages: 1,
        })
    }

    #[cfg(test)]
    pub fn page_count(&self) -> usize {
        self.pages
    }

    fn stroke_polygon(&self, points: Vec<(f32, f32)>) {
        let line = Line {
            points: points
                .into_iter()
                .map(|(x, y)| (Point::new(mm(x), mm(y)), false))
                .collect(),
            is_closed: true,
        };
        self.layer.add_line(line);
    }
}

impl DrawingSurface for PdfSurface {
    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            mm(self.page_width),
            mm(self.page_height),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        debug!(page = self.pages, "started page");
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.layer.set_outline_color(pdf_color(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.layer.set_outline_thickness(width);
    }

    fn draw_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
    ) -> Result<(), CardError> {
        self.stroke_polygon(rounded_rect_path(x, y, width, height, radius));
        Ok(())
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<(), CardError> {
        self.stroke_polygon(rounded_rect_path(x, y, width, height, 0.0));
        Ok(())
    }

    fn save_state(&mut self) {
        self.layer.save_graphics_state();
    }

    fn restore_state(&mut self) {
        self.layer.restore_graphics_state();
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.layer.set_ctm(CurTransMat::Translate(Pt(dx), Pt(dy)));
    }

    fn draw_paragraph(&mut self, paragraph: &ParagraphBox, x: f32, y: f32) -> Result<(), CardError> {
        let style = &paragraph.style;
        let font = self.fonts.get(style.face);

        self.layer.save_graphics_state();
        self.layer.set_fill_color(pdf_color(style.color));
        for (i, line) in paragraph.lines.iter().enumerate() {
            self.layer.use_text(
                builtin_text(&line.text),
                style.font_size,
                mm(x + line.offset_x),
                mm(y + paragraph.baseline(i)),
                font,
            );
        }
        self.layer.restore_graphics_state();
        Ok(())
    }

    fn finalize(self) -> Result<Vec<u8>, CardError> {
        debug!(pages = self.pages, "serializing document");
        self.doc.save_to_bytes().map_err(render_err)
    }
}

/// Maps text onto what the built-in fonts can show: typographic punctuation
/// becomes its ASCII look-alike and anything else outside ASCII becomes `?`.
pub fn builtin_text(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' => out.push(' '),
            c if c.is_ascii() => out.push(c),
            _ => out.push('?'),
        }
    }
    Cow::Owned(out)
}
