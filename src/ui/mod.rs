//! Terminal output for quality reports.
//!
//! Colors are 24-bit RGB and switch off entirely with [`Theme::plain`].

mod colors;
mod quality_gates;

pub use colors::Theme;
pub use quality_gates::{GateStatus, QualityGateRenderer};
