pub mod analyzers;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod reading;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, Outcome};
pub use reading::{PowerSample, Reading};
