use nalgebra::{Matrix3, Point2};

use crate::shared::ViewWindow;

/// Orthographic projection from simulation coordinates onto a square canvas.
/// The window's `y_max` lands on the top row.
#[derive(Debug, Clone)]
pub struct Camera {
    size: u32,
    view_proj: Matrix3<f64>,
}

impl Camera {
    pub fn new(window: &ViewWindow, size: u32) -> Self {
        let px = size as f64;
        let sx = px / window.width();
        let sy = px / window.height();
        #[rustfmt::skip]
        let view_proj = Matrix3::new(
            sx,  0.0, -window.x_min * sx,
            0.0, -sy,  window.y_max * sy,
            0.0, 0.0,  1.0,
        );
        Self { size, view_proj }
    }

    /// Continuous canvas coordinates, pixel centers sit at `i + 0.5`.
    pub fn project(&self, point: &Point2<f64>) -> Point2<f64> {
        self.view_proj.transform_point(point)
    }

    /// The pixel containing `point`, or `None` when it falls outside the canvas.
    /// Points exactly on the far edges belong to the last row or column.
    pub fn pixel(&self, point: &Point2<f64>) -> Option<(u32, u32)> {
        let p = self.project(point);
        let max = self.size as f64;
        if !(0.0..=max).contains(&p.x) || !(0.0..=max).contains(&p.y) {
            return None;
        }
        let clamp = |v: f64| (v.floor() as u32).min(self.size.saturating_sub(1));
        Some((clamp(p.x), clamp(p.y)))
    }
}
