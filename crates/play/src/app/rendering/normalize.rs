use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::app::env::Observation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Display size for a `rows x cols` pixel grid.
    pub fn for_grid(rows: usize, cols: usize, transpose: bool) -> Self {
        let (rows, cols) = if transpose { (cols, rows) } else { (rows, cols) };
        Self {
            width: saturating_u32(cols),
            height: saturating_u32(rows),
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Row-major RGB frame ready for a display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    size: FrameSize,
    rgb: Vec<u8>,
}

impl DisplayFrame {
    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn channels(&self) -> usize {
        3
    }

    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    /// `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let offset = (y as usize * self.size.width as usize + x as usize) * 3;
        match *self.rgb.get(offset..offset + 3)? {
            [r, g, b] => Some([r, g, b]),
            _ => None,
        }
    }
}

/// Converts an observation into an RGB frame of exactly `target` size.
///
/// `transpose` swaps the two spatial axes, for environments whose frames are
/// laid out column-major. Single-channel frames are replicated into all three
/// color channels; nothing is inferred beyond that.
pub fn normalize(observation: &Observation, transpose: bool, target: FrameSize) -> DisplayFrame {
    let native = FrameSize::for_grid(observation.height(), observation.width(), transpose);
    let image = RgbImage::from_fn(native.width, native.height, |x, y| {
        let (row, col) = if transpose {
            (x as usize, y as usize)
        } else {
            (y as usize, x as usize)
        };
        // (row, col) is always inside the frame here.
        Rgb(observation.rgb_at(row, col).unwrap_or_default())
    });

    let image = if native == target {
        image
    } else {
        imageops::resize(&image, target.width, target.height, FilterType::Nearest)
    };

    DisplayFrame {
        size: target,
        rgb: image.into_raw(),
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
