use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read line {line}: {source}")]
    Read {
        line: usize,
        source: std::io::Error,
    },
    #[error("line {line}: expected at least 4 columns (step, id, x, y), found {found}")]
    MissingColumns { line: usize, found: usize },
    #[error("line {line}: column `{column}` is not numeric: {value:?}")]
    NonNumeric {
        line: usize,
        column: &'static str,
        value: String,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("frame {step} ({}): {source}", .path.display())]
pub struct RenderError {
    pub step: u64,
    pub path: PathBuf,
    pub source: image::ImageError,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("quantile bounds must satisfy 0 <= low < high <= 1, got {low} and {high}")]
    Quantiles { low: f64, high: f64 },
    #[error("view padding must be positive and finite, got {0}")]
    Padding(f64),
    #[error("image size must be at least 1 pixel")]
    ImageSize,
    #[error("worker count must be at least 1")]
    Workers,
    #[error("unsupported image extension {0:?}")]
    Extension(String),
    #[error("unknown color {0:?}, expected a name or #rrggbb")]
    Color(String),
    #[error("marker radius must be finite and non-negative, got {0}")]
    MarkerRadius(f64),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("no valid particle records remain after loading")]
    EmptyDataset,
    #[error("body id {id} is too large to count the bodies")]
    BodyIdOverflow { id: u64 },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("{failed} of {total} frames failed to render")]
    FramesFailed { failed: usize, total: usize },
}
