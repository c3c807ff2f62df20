pub mod analyzer;
pub mod input;
pub mod parser;
pub mod prompt;
pub mod providers;
pub mod retry;

pub use analyzer::{AnalysisError, Analyzer};
pub use input::{AnalyzeInput, InputError};
pub use retry::RetryPolicy;
