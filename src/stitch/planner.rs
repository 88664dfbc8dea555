use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PipelineError;
use crate::panels::Panel;

/// Width thresholds, as percentages of the original page width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StitchConfig {
    pub original_page_width: u32,
    /// Panels wider than this always stand alone
    pub wide_threshold: f64,
    /// Panels at least this wide only take a small successor
    pub mid_threshold: f64,
    /// Largest successor a mid-width panel will take
    pub small_next_threshold: f64,
    /// Largest combined width of two narrow panels
    pub combined_threshold: f64,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            original_page_width: 3000,
            wide_threshold: 65.0,
            mid_threshold: 50.0,
            small_next_threshold: 15.0,
            combined_threshold: 65.0,
        }
    }
}

impl StitchConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.original_page_width == 0 {
            return Err(PipelineError::config(
                "stitch.original_page_width must be a positive number of pixels",
            ));
        }
        let thresholds = [
            ("wide_threshold", self.wide_threshold),
            ("mid_threshold", self.mid_threshold),
            ("small_next_threshold", self.small_next_threshold),
            ("combined_threshold", self.combined_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(PipelineError::config(format!(
                    "stitch.{name} must be a non-negative percentage, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Width as a percentage of the page, for display
    pub fn percent_of_page(&self, width: u64) -> f64 {
        width as f64 / f64::from(self.original_page_width) * 100.0
    }

    // `width / page * 100 <op> threshold` is evaluated as
    // `width * 100 <op> threshold * page`, which is exact for integral
    // thresholds and keeps boundary widths on the documented side.
    fn scaled(width: u64) -> f64 {
        width as f64 * 100.0
    }

    fn limit(&self, threshold: f64) -> f64 {
        threshold * f64::from(self.original_page_width)
    }

    fn is_wide(&self, width: u64) -> bool {
        Self::scaled(width) > self.limit(self.wide_threshold)
    }

    fn is_mid(&self, width: u64) -> bool {
        Self::scaled(width) >= self.limit(self.mid_threshold)
    }

    fn is_small(&self, width: u64) -> bool {
        Self::scaled(width) <= self.limit(self.small_next_threshold)
    }

    fn fits_combined(&self, width: u64) -> bool {
        Self::scaled(width) <= self.limit(self.combined_threshold)
    }
}

/// What happens to one or two consecutive panels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StitchDecision {
    /// The panel becomes a strip on its own
    Keep { panel: Panel },
    /// The panel and its immediate successor share one strip
    Merge { first: Panel, second: Panel },
}

impl StitchDecision {
    /// Panels consumed by this decision, in reading order
    pub fn panels(&self) -> Vec<&Panel> {
        match self {
            StitchDecision::Keep { panel } => vec![panel],
            StitchDecision::Merge { first, second } => vec![first, second],
        }
    }

    /// File name of the strip this decision produces
    pub fn output_name(&self) -> String {
        match self {
            StitchDecision::Keep { panel } => panel.name.clone(),
            StitchDecision::Merge { first, second } => merged_name(&first.name, &second.name),
        }
    }

    pub fn is_merge(&self) -> bool {
        matches!(self, StitchDecision::Merge { .. })
    }
}

/// Name of the strip made from `first` and `second`
///
/// `012.jpg` + `013.jpg` gives `012_013.jpg`. The extension of `first` is
/// kept.
pub fn merged_name(first: &str, second: &str) -> String {
    let (first_stem, extension) = split_extension(first);
    let (second_stem, _) = split_extension(second);
    format!("{first_stem}_{second_stem}{extension}")
}

fn split_extension(name: &str) -> (&str, &str) {
    match Path::new(name).extension() {
        Some(ext) => {
            let dot = name.len() - ext.len() - 1;
            name.split_at(dot)
        }
        None => (name, ""),
    }
}

/// Decide, in one forward pass, which panels stand alone and which pairs
/// share a strip
///
/// Each panel appears in exactly one decision, in input order. A panel is
/// only ever paired with its immediate successor, and a merged pair is never
/// extended with a third panel.
pub fn plan(panels: &[Panel], cfg: &StitchConfig) -> Vec<StitchDecision> {
    let mut decisions = Vec::with_capacity(panels.len());
    let mut i = 0;

    while i < panels.len() {
        let current = &panels[i];
        let width = u64::from(current.width);
        let next = panels.get(i + 1);

        let partner = if cfg.is_wide(width) {
            None
        } else if cfg.is_mid(width) {
            next.filter(|n| cfg.is_small(u64::from(n.width)))
        } else {
            next.filter(|n| cfg.fits_combined(width + u64::from(n.width)))
        };

        match partner {
            Some(second) => {
                tracing::debug!(
                    "merge {} ({:.1}%) + {} ({:.1}%)",
                    current.name,
                    cfg.percent_of_page(width),
                    second.name,
                    cfg.percent_of_page(u64::from(second.width))
                );
                decisions.push(StitchDecision::Merge {
                    first: current.clone(),
                    second: second.clone(),
                });
                i += 2;
            }
            None => {
                tracing::debug!("keep {} ({:.1}%)", current.name, cfg.percent_of_page(width));
                decisions.push(StitchDecision::Keep {
                    panel: current.clone(),
                });
                i += 1;
            }
        }
    }

    decisions
}
