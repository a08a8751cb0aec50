use std::path::PathBuf;

use image::ImageFormat;

use crate::{
    error::ConfigError,
    render::{Color, MarkerStyle},
};

/// What the dispatcher does when a frame fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FailurePolicy {
    /// Stop at the first failed frame.
    #[default]
    Abort,
    /// Render every frame, then report the failures.
    KeepGoing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowSettings {
    pub padding: f64,
    pub quantile_low: f64,
    pub quantile_high: f64,
    /// Windows smaller than this are replaced with `degenerate_size`.
    pub min_size: f64,
    pub degenerate_size: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            padding: 1.4,
            quantile_low: 0.05,
            quantile_high: 0.95,
            min_size: 1.0,
            degenerate_size: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameStyle {
    pub size: u32,
    pub background: Color,
    pub ordinary: MarkerStyle,
    pub distinguished: MarkerStyle,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            size: 800,
            background: Color::BLACK,
            ordinary: MarkerStyle::point(Color::WHITE),
            distinguished: MarkerStyle::disc(Color::CYAN, 3.0).with_outline(Color::WHITE, 1.0),
        }
    }
}

/// Everything the pipeline can be tuned with. Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub extension: String,
    pub delimiter: char,
    pub style: FrameStyle,
    pub window: WindowSettings,
    pub workers: usize,
    pub failure_policy: FailurePolicy,
    /// Replaces the positional black hole rule when set.
    pub distinguished_ids: Option<Vec<u64>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("output_3_galaxy_collision.csv"),
            output_dir: PathBuf::from("frames"),
            extension: "png".to_string(),
            delimiter: ',',
            style: FrameStyle::default(),
            window: WindowSettings::default(),
            workers: default_workers(),
            failure_policy: FailurePolicy::default(),
            distinguished_ids: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let WindowSettings {
            padding,
            quantile_low: low,
            quantile_high: high,
            ..
        } = self.window;
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low >= high {
            return Err(ConfigError::Quantiles { low, high });
        }
        if !padding.is_finite() || padding <= 0.0 {
            return Err(ConfigError::Padding(padding));
        }
        if self.style.size == 0 {
            return Err(ConfigError::ImageSize);
        }
        if self.workers == 0 {
            return Err(ConfigError::Workers);
        }
        self.style.ordinary.validate()?;
        self.style.distinguished.validate()?;
        self.image_format()?;
        Ok(())
    }

    pub fn image_format(&self) -> Result<ImageFormat, ConfigError> {
        match ImageFormat::from_extension(&self.extension) {
            Some(format @ (ImageFormat::Png | ImageFormat::Bmp)) => Ok(format),
            _ => Err(ConfigError::Extension(self.extension.clone())),
        }
    }
}

/// One less than the available parallelism, never below one.
pub fn default_workers() -> usize {
    rayon::current_num_threads().saturating_sub(1).max(1)
}
