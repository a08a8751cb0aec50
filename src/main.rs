use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use nframes::{
    config::{FailurePolicy, FrameStyle, Settings, WindowSettings, default_workers},
    render::{Color, MarkerStyle},
};

/// Turn simulation position dumps into numbered image frames.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Position table with `step,id,x,y` rows and no header
    #[arg(default_value = "output_3_galaxy_collision.csv")]
    input: PathBuf,

    #[arg(short, long, default_value = "frames")]
    output_dir: PathBuf,

    /// Image format extension (png or bmp)
    #[arg(long, default_value = "png")]
    extension: String,

    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Width and height of each frame in pixels
    #[arg(long, default_value_t = 800)]
    size: u32,

    #[arg(long, default_value = "black")]
    background: Color,

    #[arg(long, default_value = "white")]
    star_color: Color,

    /// Star marker radius in pixels, below 1 draws a single pixel
    #[arg(long, default_value_t = 0.5)]
    star_size: f64,

    #[arg(long, default_value = "cyan")]
    bh_color: Color,

    #[arg(long, default_value_t = 3.0)]
    bh_size: f64,

    #[arg(long, default_value = "white")]
    bh_edge_color: Color,

    #[arg(long, default_value_t = 1.0)]
    bh_edge_width: f64,

    #[arg(long, default_value_t = 1.4)]
    view_padding: f64,

    #[arg(long, default_value_t = 0.05)]
    quantile_low: f64,

    #[arg(long, default_value_t = 0.95)]
    quantile_high: f64,

    /// Worker threads, defaults to available parallelism minus one
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    #[arg(long, value_enum, default_value_t = FailurePolicy::Abort)]
    on_error: FailurePolicy,

    /// Black hole ids, overrides the three-galaxy layout rule
    #[arg(long, value_delimiter = ',')]
    distinguished_ids: Option<Vec<u64>>,
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Settings {
            input: args.input,
            output_dir: args.output_dir,
            extension: args.extension,
            delimiter: args.delimiter,
            style: FrameStyle {
                size: args.size,
                background: args.background,
                ordinary: MarkerStyle::disc(args.star_color, args.star_size),
                distinguished: MarkerStyle::disc(args.bh_color, args.bh_size)
                    .with_outline(args.bh_edge_color, args.bh_edge_width),
            },
            window: WindowSettings {
                padding: args.view_padding,
                quantile_low: args.quantile_low,
                quantile_high: args.quantile_high,
                ..WindowSettings::default()
            },
            workers: args.workers.unwrap_or_else(default_workers),
            failure_policy: args.on_error,
            distinguished_ids: args.distinguished_ids,
        }
    }
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn main() -> ExitCode {
    init_logger();

    let settings = Settings::from(Args::parse());
    log::debug!("{:?}", settings);

    match nframes::run(&settings) {
        Ok(report) => {
            log::info!("{} frames written to {}", report.rendered.len(), settings.output_dir.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
