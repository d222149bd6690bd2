//! Check-in scoring, traffic-light classification, recurring window
//! evaluation and progress aggregation for coach/client wellness tracking.
//!
//! Everything outside `config` is pure: no I/O, no shared
//! state, derived values only.

pub mod classify;
pub mod config;
pub mod defaults;
pub mod error;
pub mod progress;
pub mod report;
pub mod scoring;
pub mod types;
pub mod window;

pub use classify::{classify, classify_optional, resolve_thresholds};
pub use defaults::Policy;
pub use error::{EngineError, Result};
pub use progress::{aggregate_progress, ProgressContext, ProgressSummary};
pub use scoring::compute_score;
pub use window::{evaluate_window, WindowEvaluation, WindowState};
