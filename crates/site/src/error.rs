use thiserror::Error;

/// Errors surfaced while turning a post into display data.
///
/// Text transforms never fail; only the HTML rewriting stage can.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The HTML rewriter rejected the rendered document.
    #[error("HTML rewriting failed: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),
}

/// Errors emitted while loading a [`PipelineConfig`](crate::PipelineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML failed to parse or did not match the config shape.
    #[error("Config YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// JSON failed to parse or did not match the config shape.
    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
