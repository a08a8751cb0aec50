use std::{fmt, str::FromStr};

use image::Rgb;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const CYAN: Color = Color([0, 255, 255]);

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb(self.0)
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let rgb = match name.as_str() {
            "black" => [0, 0, 0],
            "white" => [255, 255, 255],
            "cyan" => [0, 255, 255],
            "red" => [255, 0, 0],
            "green" => [0, 128, 0],
            "blue" => [0, 0, 255],
            "yellow" => [255, 255, 0],
            "magenta" => [255, 0, 255],
            "gray" | "grey" => [128, 128, 128],
            hex => {
                let digits = hex
                    .strip_prefix('#')
                    .filter(|d| d.len() == 6 && d.is_ascii())
                    .ok_or_else(|| ConfigError::Color(s.to_string()))?;
                let channel = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 2], 16)
                        .map_err(|_| ConfigError::Color(s.to_string()))
                };
                [channel(0)?, channel(2)?, channel(4)?]
            }
        };
        Ok(Color(rgb))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// How one body category is drawn. A radius below one pixel draws a single pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub fill: Color,
    pub radius: f64,
    pub outline: Option<(Color, f64)>,
}

impl MarkerStyle {
    pub fn point(fill: Color) -> Self {
        Self {
            fill,
            radius: 0.5,
            outline: None,
        }
    }

    pub fn disc(fill: Color, radius: f64) -> Self {
        Self {
            fill,
            radius,
            outline: None,
        }
    }

    pub fn with_outline(mut self, color: Color, width: f64) -> Self {
        self.outline = Some((color, width));
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let outline = self.outline.map_or(0.0, |(_, w)| w);
        for r in [self.radius, outline] {
            if !r.is_finite() || r < 0.0 {
                return Err(ConfigError::MarkerRadius(r));
            }
        }
        Ok(())
    }
}
