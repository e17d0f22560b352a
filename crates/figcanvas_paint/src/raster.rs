//! Raster images in the figure's pixel convention
//!
//! Buffers arrive row-major with the first row at the top. Surfaces draw in a
//! frame whose rows are flipped relative to the figure, so pixel data is
//! reversed row-wise before it is handed over.

use image::{imageops, DynamicImage, RgbImage, RgbaImage};
use thiserror::Error;

/// Raster image errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Unsupported channel depth: {0} (expected 3 or 4)")]
    UnsupportedChannels(u8),

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Surface could not create image: {0}")]
    Surface(String),
}

pub type Result<T> = std::result::Result<T, ImageError>;

/// Row-major 8-bit raster with 3 (RGB) or 4 (RGBA) channels
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap a pixel buffer, validating depth and size
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Result<Self> {
        if channels != 3 && channels != 4 {
            return Err(ImageError::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(ImageError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Rows reversed top-to-bottom and expanded to tightly packed RGBA
    pub fn to_flipped_rgba(&self) -> Result<RgbaImage> {
        let size_error = || ImageError::BufferSize {
            expected: self.width as usize * self.height as usize * self.channels as usize,
            actual: self.pixels.len(),
        };

        let mut rgba = match self.channels {
            3 => {
                let rgb = RgbImage::from_raw(self.width, self.height, self.pixels.clone())
                    .ok_or_else(size_error)?;
                DynamicImage::ImageRgb8(rgb).into_rgba8()
            }
            4 => RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
                .ok_or_else(size_error)?,
            other => return Err(ImageError::UnsupportedChannels(other)),
        };

        imageops::flip_vertical_in_place(&mut rgba);
        Ok(rgba)
    }
}
