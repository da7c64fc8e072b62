use crate::config::Config;
use crate::driver::RenderOptions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Grid, overflow policy, cut guides and the shared shuffler used for every upload.
    pub options: RenderOptions,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let options = config.render_options();
        AppState { config, options }
    }
}

/// State for handler tests: fixed seed, default grid, generous upload limit.
#[cfg(test)]
pub fn test_state() -> AppState {
    AppState::new(Config {
        port: 0,
        rust_log: "info".to_string(),
        max_upload_bytes: 1024 * 1024,
        overflow: crate::layout::paragraph::OverflowPolicy::Allow,
        shuffle_seed: Some(7),
        cut_guides: false,
    })
}
