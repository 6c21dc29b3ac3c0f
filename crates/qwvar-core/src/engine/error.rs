use thiserror::Error;

use super::config::ConfigError;
use crate::core::grid::GridError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Grid construction failed: {0}")]
    Grid(#[from] GridError),
}
