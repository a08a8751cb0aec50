// This file defines the data shared between the loading, planning and rendering stages.

use std::collections::BTreeMap;

use nalgebra::Point2;

/// Scalar type used for the quantile math. Positions are stored as `f64`.
pub trait Float: num_traits::Float + Send + Sync + std::fmt::Debug + 'static {}

impl<T> Float for T where T: num_traits::Float + Send + Sync + std::fmt::Debug + 'static {}

/// One row of the position table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleRecord {
    pub step: u64,
    pub id: u64,
    pub position: Point2<f64>,
}

impl ParticleRecord {
    pub fn new(step: u64, id: u64, x: f64, y: f64) -> Self {
        Self {
            step,
            id,
            position: Point2::new(x, y),
        }
    }
}

/// All records that survived loading, plus how many rows were thrown away.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<ParticleRecord>,
    dropped: usize,
}

impl Dataset {
    pub fn new(records: Vec<ParticleRecord>, dropped: usize) -> Self {
        Self { records, dropped }
    }

    pub fn records(&self) -> &[ParticleRecord] {
        &self.records
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max_id(&self) -> Option<u64> {
        self.records.iter().map(|r| r.id).max()
    }

    /// Groups records by step. Order inside a group follows input order but
    /// nothing downstream depends on it.
    pub fn step_groups(&self) -> BTreeMap<u64, Vec<ParticleRecord>> {
        let mut groups: BTreeMap<u64, Vec<ParticleRecord>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(record.step).or_default().push(*record);
        }
        groups
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRole {
    Ordinary,
    Distinguished,
}

/// Coordinate range mapped onto the canvas for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ViewWindow {
    /// Window used when a step has no ordinary bodies.
    pub const FALLBACK: ViewWindow = ViewWindow {
        x_min: -1.0,
        x_max: 1.0,
        y_min: -1.0,
        y_max: 1.0,
    };

    pub fn square(center: Point2<f64>, size: f64) -> Self {
        let half = size / 2.0;
        Self {
            x_min: center.x - half,
            x_max: center.x + half,
            y_min: center.y - half,
            y_max: center.y + half,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Everything needed to draw a single frame. Each task owns its positions.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTask {
    pub step: u64,
    pub ordinary: Vec<Point2<f64>>,
    pub distinguished: Vec<Point2<f64>>,
    pub window: ViewWindow,
}
