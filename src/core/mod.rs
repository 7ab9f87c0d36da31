pub mod config;
pub mod error;
pub mod random;
pub mod types;

pub use config::SessionConfig;
pub use error::{NightError, Result};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
