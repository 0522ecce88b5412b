pub mod analysis;
pub mod audio;
pub mod config;
pub mod delivery;
pub mod error;
pub mod highlight;
pub mod rate;
pub mod transcript;

pub use analysis::{analyze, print_summary, AnalysisInput, AnalysisOptions, AnalysisReport};
pub use config::Config;
pub use error::{Result, SpeechlensError};
