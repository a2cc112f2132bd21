//! Badge classification: reduce a coverage table to a single percentage and
//! pick a color for it.
//!
//! Two color policies are available. `Palette` maps the percentage onto a
//! smooth red-yellow-green ramp; `Thresholds` buckets it into poor / medium /
//! good using two breakpoints. Whatever the policy, a table with no
//! statements produces the fixed "failing" badge.

use crate::error::{CovshieldError, Result};
use crate::model::{BadgeSpec, CoverageSummary, CoverageTable};
use crate::palette;

pub const BADGE_LABEL: &str = "coverage";
pub const FAILING_VALUE: &str = "failing";
pub const SHIELDS_BASE_URL: &str = "https://img.shields.io/badge";

/// Alt text of the markdown image, also what the marker pattern looks for.
pub const BADGE_ALT_TEXT: &str = "Code Coverage";

/// Pattern matching the badge line written by [`render_markdown`].
pub const DEFAULT_MARKER_PATTERN: &str = r"!\[Code Coverage\]\([^)\s]*\)";

/// Continuous red-to-green palette with a fixed number of swatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalettePolicy {
    swatches: Vec<String>,
}

impl PalettePolicy {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(CovshieldError::Config(
                "palette needs at least one swatch".to_string(),
            ));
        }
        Ok(Self {
            swatches: palette::rd_yl_gn(size),
        })
    }

    /// Swatch index for a percentage on the 1-100 scale.
    pub fn index_for(&self, percent: f64) -> usize {
        if percent.is_nan() || percent < 0.5 {
            return 0;
        }
        let index = percent.round() as usize - 1;
        index.min(self.swatches.len() - 1)
    }

    pub fn color_for(&self, percent: f64) -> &str {
        &self.swatches[self.index_for(percent)]
    }
}

impl Default for PalettePolicy {
    fn default() -> Self {
        Self {
            swatches: palette::rd_yl_gn(100),
        }
    }
}

/// Three-tier classification with exclusive upper breakpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdPolicy {
    pub poor_max: f64,
    pub medium_max: f64,
    pub poor_color: String,
    pub medium_color: String,
    pub good_color: String,
}

impl ThresholdPolicy {
    pub fn new(poor_max: f64, medium_max: f64) -> Result<Self> {
        if poor_max.is_nan() || medium_max.is_nan() || poor_max >= medium_max {
            return Err(CovshieldError::Config(format!(
                "poor threshold ({poor_max}) must be below medium threshold ({medium_max})"
            )));
        }
        Ok(Self {
            poor_max,
            medium_max,
            ..Self::default()
        })
    }

    pub fn with_colors(
        mut self,
        poor: impl Into<String>,
        medium: impl Into<String>,
        good: impl Into<String>,
    ) -> Self {
        self.poor_color = poor.into();
        self.medium_color = medium.into();
        self.good_color = good.into();
        self
    }

    pub fn color_for(&self, percent: f64) -> &str {
        if percent < self.poor_max {
            &self.poor_color
        } else if percent < self.medium_max {
            &self.medium_color
        } else {
            &self.good_color
        }
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            poor_max: 25.0,
            medium_max: 75.0,
            poor_color: "red".to_string(),
            medium_color: "orange".to_string(),
            good_color: "green".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColorPolicy {
    Palette(PalettePolicy),
    Thresholds(ThresholdPolicy),
}

impl ColorPolicy {
    pub fn color_for(&self, percent: f64) -> &str {
        match self {
            ColorPolicy::Palette(p) => p.color_for(percent),
            ColorPolicy::Thresholds(t) => t.color_for(percent),
        }
    }
}

impl Default for ColorPolicy {
    fn default() -> Self {
        ColorPolicy::Palette(PalettePolicy::default())
    }
}

/// A color policy plus the color used when measurement failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    pub policy: ColorPolicy,
    pub failing_color: String,
}

impl Classifier {
    pub fn new(policy: ColorPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn with_failing_color(mut self, color: impl Into<String>) -> Self {
        self.failing_color = color.into();
        self
    }

    /// Badge for an already reduced summary.
    pub fn badge(&self, summary: &CoverageSummary) -> BadgeSpec {
        if summary.is_failed() {
            return BadgeSpec {
                label: BADGE_LABEL.to_string(),
                value: FAILING_VALUE.to_string(),
                color: self.failing_color.clone(),
            };
        }
        let percent = summary.overall_percent;
        BadgeSpec {
            label: BADGE_LABEL.to_string(),
            value: format!("{percent:.1}"),
            color: self.policy.color_for(percent).to_string(),
        }
    }

    /// Aggregate the table and classify it in one go.
    pub fn classify(&self, table: &CoverageTable) -> (CoverageSummary, BadgeSpec) {
        let summary = table.summary();
        let badge = self.badge(&summary);
        (summary, badge)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            policy: ColorPolicy::default(),
            failing_color: "red".to_string(),
        }
    }
}

/// shields.io URL for a badge. Measured values carry a `%` (escaped as
/// `%25`); the failing badge does not.
pub fn badge_url(badge: &BadgeSpec) -> String {
    let value = if badge.value == FAILING_VALUE {
        badge.value.clone()
    } else {
        format!("{}%25", badge.value)
    };
    format!(
        "{SHIELDS_BASE_URL}/{}-{}-{}",
        escape_segment(&badge.label),
        value,
        escape_segment(&badge.color)
    )
}

/// Escape a static-badge path segment: `-` doubles, `_` doubles, spaces
/// become `_`. Parentheses and other whitespace are percent-encoded so the
/// URL never closes the surrounding markdown link early.
fn escape_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '-' => out.push_str("--"),
            '_' => out.push_str("__"),
            ' ' => out.push('_'),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            c if c.is_whitespace() => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{b:02X}"));
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// The markdown line embedding the badge image.
pub fn render_markdown(badge: &BadgeSpec) -> String {
    format!("![{BADGE_ALT_TEXT}]({})", badge_url(badge))
}
