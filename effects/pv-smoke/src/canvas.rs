//! Pixel targets the renderer can draw on

use crate::error::{Result, SmokeError};

/// An RGB8 image the renderer can read and write pixel by pixel
pub trait Canvas {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Reads the color at `(x, y)`
    ///
    /// Callers must check [`Canvas::in_bounds`] first.
    fn get_pixel(&self, x: u32, y: u32) -> [u8; 3];

    /// Writes the color at `(x, y)`
    ///
    /// Callers must check [`Canvas::in_bounds`] first.
    fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]);

    /// Whether signed coordinates address a pixel of this canvas
    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width()) && y < i64::from(self.height())
    }

    /// Blends `color` into the pixel at `(x, y)` by `ratio`
    fn mix_pixel(&mut self, x: u32, y: u32, color: [u8; 3], ratio: f64) {
        let mixed = mix(self.get_pixel(x, y), color, ratio);
        self.set_pixel(x, y, mixed);
    }
}

/// Linear interpolation from `base` towards `color`, per channel
///
/// `ratio` is clamped to `0.0..=1.0`; `0.0` keeps `base` and `1.0` yields
/// `color`. Results are rounded to the nearest channel value.
pub fn mix(base: [u8; 3], color: [u8; 3], ratio: f64) -> [u8; 3] {
    let t = if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    };

    let mut out = [0u8; 3];
    for ((o, &a), &b) in out.iter_mut().zip(&base).zip(&color) {
        let a = f64::from(a);
        let b = f64::from(b);
        *o = (a + (b - a) * t).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Owned, packed, row-major RGB8 frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rgb8Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Rgb8Frame {
    /// Create a black frame
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0])
    }

    /// Create a frame filled with one color
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * 3);
        for _ in 0..pixels {
            data.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap an existing packed RGB8 buffer
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(SmokeError::InvalidParameters(format!(
                "{width}x{height} RGB frame needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// The packed pixel data
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consume the frame, returning the packed pixel data
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Convert into an [`image::RgbImage`]
    #[cfg(feature = "image")]
    pub fn into_image(self) -> image::RgbImage {
        image::RgbImage::from_raw(self.width, self.height, self.data)
            .unwrap_or_else(|| image::RgbImage::new(0, 0))
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }
}

#[cfg(feature = "image")]
impl From<image::RgbImage> for Rgb8Frame {
    fn from(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

impl Canvas for Rgb8Frame {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        let i = self.offset(x, y);
        self.data[i..i + 3].copy_from_slice(&color);
    }
}

#[cfg(feature = "image")]
impl Canvas for image::RgbImage {
    fn width(&self) -> u32 {
        image::ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        image::ImageBuffer::height(self)
    }

    fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        image::ImageBuffer::get_pixel(self, x, y).0
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        self.put_pixel(x, y, image::Rgb(color));
    }
}
