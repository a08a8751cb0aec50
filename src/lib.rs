pub mod classify;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod loader;
pub mod planner;
pub mod render;
pub mod shared;

use crate::{
    classify::Classifier,
    config::{FailurePolicy, Settings},
    dispatch::{DispatchReport, Dispatcher},
    error::Error,
    render::FrameRenderer,
};

/// Load, classify, plan and render in one go.
pub fn run(settings: &Settings) -> Result<DispatchReport, Error> {
    settings.validate()?;

    log::info!("Loading data from {}...", settings.input.display());
    let dataset = loader::load_records(&settings.input, settings.delimiter)?;
    let classifier = Classifier::from_dataset(&dataset, settings.distinguished_ids.as_deref())?;
    let tasks = planner::plan_frames(&dataset, &classifier, &settings.window);

    let renderer = FrameRenderer::new(
        &settings.output_dir,
        settings.style.clone(),
        settings.image_format()?,
    );
    let report = Dispatcher::new(settings.workers, settings.failure_policy).dispatch(tasks, &renderer)?;

    if settings.failure_policy == FailurePolicy::KeepGoing && !report.failed.is_empty() {
        return Err(Error::FramesFailed {
            failed: report.failed.len(),
            total: report.total(),
        });
    }
    Ok(report)
}
