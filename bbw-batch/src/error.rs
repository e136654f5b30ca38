use bbw_core::{ConfigError, SheetError};

/// Failure setting up or running a batch of games
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BatchError {
    #[error("game {game}: {source}")]
    Sheet {
        game: usize,
        #[source]
        source: SheetError,
    },

    #[error("game {game}: {source}")]
    Config {
        game: usize,
        #[source]
        source: ConfigError,
    },
}
