//! Configuration management for Comic-San
//!
//! Settings are layered with figment: the embedded `default-config.toml`,
//! then the user file, then the project file (or a file given with
//! `--config`), then `COMIC_SAN_*` environment variables. The merged result
//! is extracted into [`ComicConfig`] and validated before any phase runs.

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::stitch::StitchConfig;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "COMIC_SAN_";
const PROJECT_CONFIG: &str = "comic-san.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComicConfig {
    pub general: GeneralConfig,
    pub stitch: StitchSettings,
    pub grayscale: GrayscaleConfig,
    pub resize: ResizeConfig,
    pub parallel: ParallelConfig,
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory holding the book archive and the phase directories
    pub data_dir: PathBuf,
    /// Extension of page and panel images, without the dot
    pub image_extension: String,
    /// Extension of the input book archive, without the dot
    pub book_extension: String,
}

/// Stitching thresholds plus the montage settings used to merge panels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StitchSettings {
    pub original_page_width: u32,
    pub wide_threshold: f64,
    pub mid_threshold: f64,
    pub small_next_threshold: f64,
    pub combined_threshold: f64,
    /// Relative paths are resolved against `general.data_dir`
    pub spacer_image: PathBuf,
    pub montage_geometry: String,
}

impl StitchSettings {
    pub fn thresholds(&self) -> StitchConfig {
        StitchConfig {
            original_page_width: self.original_page_width,
            wide_threshold: self.wide_threshold,
            mid_threshold: self.mid_threshold,
            small_next_threshold: self.small_next_threshold,
            combined_threshold: self.combined_threshold,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrayscaleConfig {
    /// JPEG quality for the black & white strips (1-100)
    pub quality: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeConfig {
    pub enabled: bool,
    pub width: u32,
    pub height: u32,
}

/// Worker pool sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Maximum number of workers (0 = one per logical CPU)
    pub max_workers: usize,
    /// Percentage of logical CPUs to use (1-100)
    pub thread_percentage: u8,
}

/// Program names of the external tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    pub magick: String,
    pub segmenter: String,
    pub copy: String,
    pub unzip: String,
    pub zip: String,
}

impl ComicConfig {
    /// Load configuration from the standard locations
    pub fn load(custom_config: Option<&str>) -> Result<Self> {
        Self::from_figment(Self::figment(custom_config))
    }

    /// Build the layered figment without extracting it
    pub fn figment(custom_config: Option<&str>) -> Figment {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        // A custom config replaces the user and project files
        if let Some(custom_path) = custom_config {
            figment = figment.merge(Toml::file(custom_path));
        } else {
            figment = figment
                .merge(Toml::file(Self::user_config_path()))
                .merge(Toml::file(PROJECT_CONFIG));
        }

        // Environment variables always have highest priority
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: ComicConfig = figment
            .extract()
            .context("Failed to parse Comic-San configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make a phase meaningless
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.stitch.thresholds().validate()?;

        if self.general.image_extension.trim().is_empty() {
            return Err(PipelineError::config("general.image_extension cannot be empty"));
        }
        if self.general.book_extension.trim().is_empty() {
            return Err(PipelineError::config("general.book_extension cannot be empty"));
        }
        if !(1..=100).contains(&self.grayscale.quality) {
            return Err(PipelineError::config(format!(
                "grayscale.quality must be between 1 and 100, got {}",
                self.grayscale.quality
            )));
        }
        if self.resize.enabled && (self.resize.width == 0 || self.resize.height == 0) {
            return Err(PipelineError::config("resize.width and resize.height must be positive"));
        }
        if !(1..=100).contains(&self.parallel.thread_percentage) {
            return Err(PipelineError::config(format!(
                "parallel.thread_percentage must be between 1 and 100, got {}",
                self.parallel.thread_percentage
            )));
        }
        if self.stitch.montage_geometry.trim().is_empty() {
            return Err(PipelineError::config("stitch.montage_geometry cannot be empty"));
        }

        Ok(())
    }

    /// Spacer image path, resolved against the data directory when relative
    pub fn spacer_image(&self) -> PathBuf {
        resolve_against(&self.general.data_dir, &self.stitch.spacer_image)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/comic-san/config.toml"),
            Err(_) => "~/.config/comic-san/config.toml".to_string(),
        }
    }
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests;
