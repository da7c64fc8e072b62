// Card geometry and text layout.
// Everything here is pure: grid placement by index, AFM-based word wrap,
// and the overflow policies applied to a quote that does not fit its card.

pub mod font_metrics;
pub mod grid;
pub mod paragraph;
