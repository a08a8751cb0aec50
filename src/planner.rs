use nalgebra::Point2;
use rayon::prelude::*;

use crate::{
    classify::Classifier,
    config::WindowSettings,
    shared::{BodyRole, Dataset, Float, ParticleRecord, RenderTask, ViewWindow},
};

/// Inclusive quantile with linear interpolation between closest ranks.
/// `sorted` must be ascending. `None` for an empty slice.
pub fn quantile<F: Float>(sorted: &[F], q: F) -> Option<F> {
    let last = sorted.len().checked_sub(1)?;
    let h = F::from(last)? * q;
    let lo = h.floor();
    let i = lo.to_usize().unwrap_or(0).min(last);
    let j = (i + 1).min(last);
    Some(sorted[i] + (h - lo) * (sorted[j] - sorted[i]))
}

fn quantile_range(values: &mut [f64], low: f64, high: f64) -> Option<(f64, f64)> {
    values.sort_by(f64::total_cmp);
    Some((quantile(values, low)?, quantile(values, high)?))
}

/// Square window around the clipped extent of `points`, or the fallback when there are none.
pub fn compute_window(points: &[Point2<f64>], settings: &WindowSettings) -> ViewWindow {
    let mut xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let mut ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let (Some((x_lo, x_hi)), Some((y_lo, y_hi))) = (
        quantile_range(&mut xs, settings.quantile_low, settings.quantile_high),
        quantile_range(&mut ys, settings.quantile_low, settings.quantile_high),
    ) else {
        return ViewWindow::FALLBACK;
    };

    let center = Point2::new((x_lo + x_hi) / 2.0, (y_lo + y_hi) / 2.0);
    let mut size = (x_hi - x_lo).max(y_hi - y_lo) * settings.padding;
    if size < settings.min_size {
        size = settings.degenerate_size;
    }
    ViewWindow::square(center, size)
}

pub fn plan_step(
    step: u64,
    records: &[ParticleRecord],
    classifier: &Classifier,
    settings: &WindowSettings,
) -> RenderTask {
    let (distinguished, ordinary): (Vec<&ParticleRecord>, Vec<&ParticleRecord>) = records
        .iter()
        .partition(|r| classifier.role(r.id) == BodyRole::Distinguished);
    let ordinary: Vec<Point2<f64>> = ordinary.into_iter().map(|r| r.position).collect();
    let distinguished = distinguished.into_iter().map(|r| r.position).collect();

    RenderTask {
        step,
        window: compute_window(&ordinary, settings),
        ordinary,
        distinguished,
    }
}

/// One task per step present in `dataset`, ordered by step.
pub fn plan_frames(
    dataset: &Dataset,
    classifier: &Classifier,
    settings: &WindowSettings,
) -> Vec<RenderTask> {
    let groups: Vec<(u64, Vec<ParticleRecord>)> = dataset.step_groups().into_iter().collect();
    let tasks: Vec<RenderTask> = groups
        .par_iter()
        .map(|(step, records)| plan_step(*step, records, classifier, settings))
        .collect();
    log::info!("Prepared {} frames for rendering...", tasks.len());
    tasks
}
