//! 课表展开与课次生成

mod expansion;
mod service;

pub use expansion::{clamp_window, occurrences};
pub use service::{GenerationReport, GenerationService};
