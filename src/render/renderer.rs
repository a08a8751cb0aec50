use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use nalgebra::Point2;

use super::{Camera, MarkerStyle};
use crate::{config::FrameStyle, error::RenderError, shared::RenderTask};

/// Outcome of a single rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    pub step: u64,
    pub path: PathBuf,
    pub ordinary_drawn: usize,
    pub distinguished_drawn: usize,
}

/// Draws render tasks onto an image and writes them as `frame_{step:05}.{ext}`.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    output_dir: PathBuf,
    style: FrameStyle,
    format: ImageFormat,
    extension: String,
}

impl FrameRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, style: FrameStyle, format: ImageFormat) -> Self {
        let extension = format
            .extensions_str()
            .first()
            .copied()
            .unwrap_or("png")
            .to_string();
        Self {
            output_dir: output_dir.into(),
            style,
            format,
            extension,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn frame_path(&self, step: u64) -> PathBuf {
        self.output_dir
            .join(format!("frame_{:05}.{}", step, self.extension))
    }

    /// Returns the image with the number of ordinary and distinguished markers
    /// whose centers fall inside the window. Discs centred outside are still
    /// drawn where they overlap the canvas.
    pub fn rasterize(&self, task: &RenderTask) -> (RgbImage, usize, usize) {
        let size = self.style.size;
        let camera = Camera::new(&task.window, size);
        let mut image = RgbImage::from_pixel(size, size, self.style.background.to_rgb());

        let ordinary = draw_markers(&mut image, &camera, &task.ordinary, &self.style.ordinary);
        // Drawn last so the black holes stay on top of dense star fields.
        let distinguished = draw_markers(
            &mut image,
            &camera,
            &task.distinguished,
            &self.style.distinguished,
        );
        (image, ordinary, distinguished)
    }

    pub fn render(&self, task: &RenderTask) -> Result<RenderedFrame, RenderError> {
        let path = self.frame_path(task.step);
        let (image, ordinary_drawn, distinguished_drawn) = self.rasterize(task);
        image
            .save_with_format(&path, self.format)
            .map_err(|source| RenderError {
                step: task.step,
                path: path.clone(),
                source,
            })?;
        Ok(RenderedFrame {
            step: task.step,
            path,
            ordinary_drawn,
            distinguished_drawn,
        })
    }
}

fn draw_markers(
    image: &mut RgbImage,
    camera: &Camera,
    points: &[Point2<f64>],
    marker: &MarkerStyle,
) -> usize {
    let mut drawn = 0;
    let single_pixel = marker.radius < 1.0 && marker.outline.is_none();
    for point in points {
        let pixel = camera.pixel(point);
        if pixel.is_some() {
            drawn += 1;
        }
        match pixel {
            Some((x, y)) if single_pixel => image.put_pixel(x, y, marker.fill.to_rgb()),
            None if single_pixel => {}
            // discs just past the edge still show their visible part
            _ => draw_disc(image, camera.project(point), marker),
        }
    }
    drawn
}

/// Filled disc centred on a canvas position, with an optional ring around it.
/// Pixels are lit when their centre lies within the radius.
fn draw_disc(image: &mut RgbImage, center: Point2<f64>, marker: &MarkerStyle) {
    let (outline_color, outline_width) = marker
        .outline
        .map_or((marker.fill, 0.0), |(color, width)| (color, width));
    let fill_r = marker.radius.max(0.5);
    let outer_r = fill_r + outline_width;

    let (w, h) = image.dimensions();
    let x0 = (center.x - outer_r).floor().max(0.0) as u32;
    let y0 = (center.y - outer_r).floor().max(0.0) as u32;
    let x1 = ((center.x + outer_r).ceil().max(0.0) as u32).min(w);
    let y1 = ((center.y + outer_r).ceil().max(0.0) as u32).min(h);

    let fill: Rgb<u8> = marker.fill.to_rgb();
    let ring: Rgb<u8> = outline_color.to_rgb();
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f64 + 0.5 - center.x;
            let dy = y as f64 + 0.5 - center.y;
            let d = (dx * dx + dy * dy).sqrt();
            if d <= fill_r {
                image.put_pixel(x, y, fill);
            } else if d <= outer_r {
                image.put_pixel(x, y, ring);
            }
        }
    }
}
