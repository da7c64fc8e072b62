use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::deck::{KeepOrder, RandomShuffler};
use crate::driver::RenderOptions;
use crate::layout::paragraph::OverflowPolicy;

#[derive(Parser, Debug)]
#[command(name = "quotecards", version, about = "Lay out quotes from CSV decks as printable cards")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a CSV file, or every CSV file in a directory, to PDF next to it.
    Render(RenderArgs),
    /// Write the cut-guide template PDF.
    Template { out: PathBuf },
    /// Run the upload service.
    Serve,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// CSV file or directory of CSV files.
    pub path: PathBuf,
    /// Seed the shuffle for reproducible output.
    #[arg(long, conflicts_with = "no_shuffle")]
    pub seed: Option<u64>,
    /// Keep cards in file order.
    #[arg(long, default_value_t = false)]
    pub no_shuffle: bool,
    /// What to do with quotes too long for their card: allow, shrink or truncate.
    #[arg(long)]
    pub overflow: Option<OverflowPolicy>,
    /// Draw the cut guides under the cards.
    #[arg(long, default_value_t = false)]
    pub cut_guides: bool,
}

impl RenderArgs {
    /// Flags override the environment-derived options; absent flags leave them alone.
    pub fn apply(&self, mut options: RenderOptions) -> RenderOptions {
        if self.no_shuffle {
            options.shuffler = Arc::new(KeepOrder);
        } else if let Some(seed) = self.seed {
            options.shuffler = Arc::new(RandomShuffler::seeded(seed));
        }
        if let Some(policy) = self.overflow {
            options.overflow = policy;
        }
        if self.cut_guides {
            options.cut_guides = true;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_args(argv: &[&str]) -> RenderArgs {
        let mut full = vec!["quotecards", "render"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Render(args) => args,
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[test]
    fn test_render_flags_parse() {
        let args = render_args(&["deck.csv", "--seed", "42", "--overflow", "shrink", "--cut-guides"]);
        assert_eq!(args.path, PathBuf::from("deck.csv"));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.overflow, Some(OverflowPolicy::Shrink));
        assert!(args.cut_guides);
        assert!(!args.no_shuffle);
    }

    #[test]
    fn test_seed_conflicts_with_no_shuffle() {
        let parsed = Cli::try_parse_from(["quotecards", "render", "d", "--seed", "1", "--no-shuffle"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unknown_overflow_is_rejected() {
        let parsed = Cli::try_parse_from(["quotecards", "render", "d", "--overflow", "squash"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_flags_override_options() {
        let args = render_args(&["d", "--no-shuffle", "--overflow", "truncate"]);
        let options = args.apply(RenderOptions::default());
        assert_eq!(options.shuffler.name(), "file-order");
        assert_eq!(options.overflow, OverflowPolicy::Truncate);
        assert!(!options.cut_guides);
    }

    #[test]
    fn test_absent_flags_keep_options() {
        let base = RenderOptions {
            overflow: OverflowPolicy::Shrink,
            cut_guides: true,
            shuffler: Arc::new(RandomShuffler::seeded(3)),
            ..RenderOptions::default()
        };
        let options = render_args(&["d"]).apply(base);
        assert_eq!(options.overflow, OverflowPolicy::Shrink);
        assert!(options.cut_guides);
        assert_eq!(options.shuffler.name(), "seeded");
    }

    #[test]
    fn test_template_and_serve_parse() {
        let cli = Cli::try_parse_from(["quotecards", "template", "jig.pdf"]).unwrap();
        assert!(matches!(cli.command, Commands::Template { out } if out == PathBuf::from("jig.pdf")));
        let cli = Cli::try_parse_from(["quotecards", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve));
    }
}
