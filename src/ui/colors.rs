//! 24-bit RGB palette for report output.

use owo_colors::{OwoColorize, Rgb};

/// Colors used by the terminal renderers.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Passed gates and healthy scores - green (34, 197, 94)
    pub success: Rgb,
    /// Failed gates and hallucinated links - red (239, 68, 68)
    pub error: Rgb,
    /// Advisory warnings and borderline scores - yellow (234, 179, 8)
    pub warning: Rgb,
    /// Gates still running - blue (59, 130, 246)
    pub in_progress: Rgb,
    /// Secondary text - gray (107, 114, 128)
    pub muted: Rgb,
    /// Section headings and variation numbers - cyan (34, 211, 238)
    pub accent: Rgb,
    /// When false every paint call returns the text unchanged
    pub enabled: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            success: Rgb(34, 197, 94),
            error: Rgb(239, 68, 68),
            warning: Rgb(234, 179, 8),
            in_progress: Rgb(59, 130, 246),
            muted: Rgb(107, 114, 128),
            accent: Rgb(34, 211, 238),
            enabled: true,
        }
    }
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    /// A theme that emits no escape codes, for pipes and `--no-color`.
    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn paint(&self, text: &str, color: Rgb) -> String {
        if self.enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// Color for a 0-100 score relative to a pass mark.
    ///
    /// At or above the mark is success, within ten points below is a
    /// warning, anything lower is an error.
    pub fn score_color(&self, score: f64, pass_mark: f64) -> Rgb {
        if score >= pass_mark {
            self.success
        } else if score >= pass_mark - 10.0 {
            self.warning
        } else {
            self.error
        }
    }
}
