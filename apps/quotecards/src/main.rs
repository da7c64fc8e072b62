mod cli;
mod config;
mod deck;
mod driver;
mod errors;
mod layout;
mod render;
mod routes;
mod state;

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands, RenderArgs};
use crate::config::Config;
use crate::driver::{render_directory, render_file};
use crate::render::jig::render_jig;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Render(args) => run_render(&config, &args),
        Commands::Template { out } => write_template(&config, &out),
        Commands::Serve => serve(config).await,
    }
}

fn run_render(config: &Config, args: &RenderArgs) -> Result<()> {
    let options = args.apply(config.render_options());
    info!(
        overflow = ?options.overflow,
        shuffle = options.shuffler.name(),
        cut_guides = options.cut_guides,
        "render options"
    );

    if args.path.is_dir() {
        let report = render_directory(&args.path, &options)?;
        if !report.is_clean() {
            bail!(
                "{} of {} files failed",
                report.failed.len(),
                report.failed.len() + report.rendered.len()
            );
        }
    } else {
        let summary = render_file(&args.path, &options)
            .with_context(|| format!("rendering {}", args.path.display()))?;
        info!(
            accepted = summary.accepted,
            rejected = summary.rejected,
            pages = summary.pages,
            "done"
        );
    }
    Ok(())
}

fn write_template(config: &Config, out: &Path) -> Result<()> {
    let pdf = render_jig(&config.render_options().grid)?;
    fs::write(out, pdf).with_context(|| format!("writing {}", out.display()))?;
    info!(output = %out.display(), "wrote cutting template");
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting quotecards v{}", env!("CARGO_PKG_VERSION"));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let state = AppState::new(config);
    info!(
        overflow = ?state.options.overflow,
        shuffle = state.options.shuffler.name(),
        max_upload_bytes = state.config.max_upload_bytes,
        "card settings"
    );

    let app = build_router(state).layer(TraceLayer::new_for_http());

    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
