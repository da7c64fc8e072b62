//! Document driver — the whole pipeline for one input, and batch mode on top.
//!
//! parse (header dropped, retired rows filtered) → shuffle once → place each
//! accepted quote by its running index → page breaks → draw → finalize.
//! Parsing finishes before the first drawing call, and output files are only
//! written after the document has been finalized, so a failed run leaves no
//! artifact behind.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::deck::{parse_deck, DeckShuffler, Quote, RandomShuffler};
use crate::errors::CardError;
use crate::layout::grid::{default_grid_config, GridConfig};
use crate::layout::paragraph::OverflowPolicy;
use crate::render::card::{draw_card, CardStyle};
use crate::render::jig::draw_guides_page;
use crate::render::pdf::PdfSurface;
use crate::render::surface::DrawingSurface;

/// Extension of discovered inputs in batch mode (compared case-insensitively).
pub const INPUT_EXTENSION: &str = "csv";
pub const OUTPUT_EXTENSION: &str = "pdf";

// ────────────────────────────────────────────────────────────────────────────
// Options and summaries
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RenderOptions {
    pub grid: GridConfig,
    pub overflow: OverflowPolicy,
    pub shuffler: Arc<dyn DeckShuffler>,
    /// Draw the cut-guide outlines under every card page.
    pub cut_guides: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            grid: default_grid_config(),
            overflow: OverflowPolicy::default(),
            shuffler: Arc::new(RandomShuffler::from_entropy()),
            cut_guides: false,
        }
    }
}

impl RenderOptions {
    pub fn card_style(&self) -> CardStyle {
        CardStyle::for_grid(&self.grid, self.overflow)
    }
}

/// Counts for one rendered document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub pages: usize,
    pub overflowed: usize,
    pub output: Option<PathBuf>,
}

/// Per-file results of a batch run. Failures do not stop the batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub rendered: Vec<RenderSummary>,
    pub failed: Vec<(PathBuf, CardError)>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Single document
// ────────────────────────────────────────────────────────────────────────────

/// Shuffles and draws an accepted deck onto `surface`.
///
/// The placed index counts accepted quotes only, so retired rows never leave
/// gaps in the grid.
pub fn render_deck<S: DrawingSurface + ?Sized>(
    mut deck: Vec<Quote>,
    options: &RenderOptions,
    surface: &mut S,
) -> Result<RenderSummary, CardError> {
    options.shuffler.shuffle(&mut deck);

    let grid = &options.grid;
    let style = options.card_style();
    let mut summary = RenderSummary {
        accepted: deck.len(),
        pages: 1,
        ..RenderSummary::default()
    };

    if options.cut_guides {
        draw_guides_page(surface, grid, false)?;
    }

    for (placed_index, quote) in deck.iter().enumerate() {
        let slot = grid.place(placed_index);
        if slot.starts_new_page {
            surface.new_page();
            summary.pages += 1;
            if options.cut_guides {
                draw_guides_page(surface, grid, false)?;
            }
        }

        let outcome = draw_card(surface, quote, &slot, grid, &style)?;
        if outcome.overflowed {
            summary.overflowed += 1;
        }
    }

    debug_assert_eq!(summary.pages, grid.page_count(summary.accepted));
    Ok(summary)
}

/// Runs the pipeline on CSV bytes against any surface and finalizes it.
pub fn render_document<S: DrawingSurface>(
    input: &[u8],
    options: &RenderOptions,
    mut surface: S,
) -> Result<(Vec<u8>, RenderSummary), CardError> {
    let deck = parse_deck(input)?;
    let rejected = deck.rejected;

    let mut summary = render_deck(deck.accepted, options, &mut surface)?;
    summary.rejected = rejected;

    let bytes = surface.finalize()?;
    Ok((bytes, summary))
}

/// Runs the pipeline on CSV bytes and returns the finished PDF.
pub fn render_pdf(
    input: &[u8],
    title: &str,
    options: &RenderOptions,
) -> Result<(Vec<u8>, RenderSummary), CardError> {
    let surface = PdfSurface::new(title, options.grid.page_width, options.grid.page_height)?;
    let (bytes, summary) = render_document(input, options, surface)?;
    info!(
        title,
        accepted = summary.accepted,
        rejected = summary.rejected,
        pages = summary.pages,
        shuffle = options.shuffler.name(),
        "rendered deck"
    );
    if summary.overflowed > 0 {
        warn!(title, cards = summary.overflowed, "some quotes overflow their cards");
    }
    Ok((bytes, summary))
}

/// Same base name, PDF extension.
pub fn output_path_for(input: &Path) -> PathBuf {
    input.with_extension(OUTPUT_EXTENSION)
}

/// Renders one CSV file to `<stem>.pdf` beside it.
pub fn render_file(input: &Path, options: &RenderOptions) -> Result<RenderSummary, CardError> {
    let output = output_path_for(input);
    if output == input {
        return Err(CardError::Render(format!(
            "refusing to overwrite input {}",
            input.display()
        )));
    }

    let bytes = fs::read(input).map_err(|e| CardError::io(input, e))?;
    let title = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cards".to_string());

    let (pdf, mut summary) = render_pdf(&bytes, &title, options)?;
    fs::write(&output, pdf).map_err(|e| CardError::io(&output, e))?;
    info!(output = %output.display(), "wrote document");

    summary.output = Some(output);
    Ok(summary)
}

// ────────────────────────────────────────────────────────────────────────────
// Batch mode
// ────────────────────────────────────────────────────────────────────────────

/// CSV files directly inside `dir`, sorted by name. Subdirectories are ignored.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, CardError> {
    let entries = fs::read_dir(dir).map_err(|e| CardError::io(dir, e))?;

    let mut inputs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CardError::io(dir, e))?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION));
        if is_csv && path.is_file() {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Renders every CSV file in `dir` independently. One file failing does not
/// affect the others; only an unreadable directory fails the call.
pub fn render_directory(dir: &Path, options: &RenderOptions) -> Result<BatchReport, CardError> {
    let inputs = discover_inputs(dir)?;
    info!(dir = %dir.display(), files = inputs.len(), "starting batch");

    let mut report = BatchReport::default();
    for input in inputs {
        match render_file(&input, options) {
            Ok(summary) => report.rendered.push(summary),
            Err(e) => {
                error!(input = %input.display(), "failed to render: {e}");
                report.failed.push((input, e));
            }
        }
    }

    info!(
        rendered = report.rendered.len(),
        failed = report.failed.len(),
        "batch finished"
    );
    Ok(report)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
