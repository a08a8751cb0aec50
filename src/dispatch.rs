use std::{
    fs,
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
};

use rayon::prelude::*;

use crate::{
    config::FailurePolicy,
    error::{Error, RenderError},
    render::{FrameRenderer, RenderedFrame},
    shared::RenderTask,
};

/// Summary of a finished dispatch. `rendered` is sorted by step.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub rendered: Vec<RenderedFrame>,
    pub failed: Vec<RenderError>,
}

impl DispatchReport {
    pub fn total(&self) -> usize {
        self.rendered.len() + self.failed.len()
    }
}

/// Creates `dir` and any missing parents. Existing directories are fine.
pub fn ensure_output_dir(dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(dir).map_err(|source| Error::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Counts completed frames and logs them in completion order.
struct Progress {
    done: AtomicUsize,
    total: usize,
    every: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total,
            every: (total / 10).max(1),
        }
    }

    fn tick(&self, step: u64) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!("Frame {} finished ({}/{})", step, done, self.total);
        if done % self.every == 0 || done == self.total {
            log::info!("Rendered {}/{} frames", done, self.total);
        }
    }
}

/// Renders independent tasks on a fixed-size pool.
pub struct Dispatcher {
    workers: usize,
    policy: FailurePolicy,
}

impl Dispatcher {
    pub fn new(workers: usize, policy: FailurePolicy) -> Self {
        Self {
            workers: workers.max(1),
            policy,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn dispatch(
        &self,
        tasks: Vec<RenderTask>,
        renderer: &FrameRenderer,
    ) -> Result<DispatchReport, Error> {
        ensure_output_dir(renderer.output_dir())?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("frame-worker-{i}"))
            .build()?;
        log::info!(
            "Rendering {} frames with {} workers into {}",
            tasks.len(),
            self.workers,
            renderer.output_dir().display()
        );

        let progress = Progress::new(tasks.len());
        let mut report = match self.policy {
            FailurePolicy::Abort => {
                let rendered = pool.install(|| {
                    tasks
                        .into_par_iter()
                        .map(|task| -> Result<RenderedFrame, RenderError> {
                            let frame = renderer.render(&task)?;
                            progress.tick(frame.step);
                            Ok(frame)
                        })
                        .collect::<Result<Vec<_>, RenderError>>()
                })?;
                DispatchReport {
                    rendered,
                    failed: Vec::new(),
                }
            }
            FailurePolicy::KeepGoing => {
                let results: Vec<Result<RenderedFrame, RenderError>> = pool.install(|| {
                    tasks
                        .into_par_iter()
                        .map(|task| {
                            let result = renderer.render(&task);
                            match &result {
                                Ok(frame) => progress.tick(frame.step),
                                Err(err) => log::error!("{}", err),
                            }
                            result
                        })
                        .collect()
                });
                let mut report = DispatchReport::default();
                for result in results {
                    match result {
                        Ok(frame) => report.rendered.push(frame),
                        Err(err) => report.failed.push(err),
                    }
                }
                report
            }
        };

        report.rendered.sort_by_key(|f| f.step);
        report.failed.sort_by_key(|e| e.step);
        if report.failed.is_empty() {
            log::info!("All frames rendered!");
        } else {
            let steps: Vec<u64> = report.failed.iter().map(|e| e.step).collect();
            log::warn!(
                "{} of {} frames failed, steps {:?}",
                report.failed.len(),
                report.total(),
                steps
            );
        }
        Ok(report)
    }
}
