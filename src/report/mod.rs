pub mod json;
pub mod md;

use crate::error::EngineError;
use crate::progress::ProgressSummary;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render(summary: &ProgressSummary, format: OutputFormat) -> Result<String, EngineError> {
    match format {
        OutputFormat::Json => json::to_json(summary).map_err(EngineError::Json),
        OutputFormat::Md => Ok(md::to_markdown(summary)),
    }
}
