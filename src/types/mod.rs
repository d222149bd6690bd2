pub mod answer;
pub mod config;
pub mod record;
pub mod thresholds;
pub mod window;
