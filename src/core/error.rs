use thiserror::Error;

use crate::core::types::Millis;
use crate::schedule::Task;

#[derive(Error, Debug)]
pub enum NightError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Task already scheduled: {0:?}")]
    TaskAlreadyScheduled(Task),

    #[error("Timer {task:?} fired from torn-down epoch {epoch}")]
    StaleTask { task: Task, epoch: u64 },

    #[error("No session is playing")]
    NotPlaying,

    #[error("Night did not finish within {limit_ms} ms")]
    Unfinished { limit_ms: Millis },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfinished_names_the_limit() {
        let err = NightError::Unfinished { limit_ms: 555_000 };
        assert_eq!(err.to_string(), "Night did not finish within 555000 ms");
    }
}
