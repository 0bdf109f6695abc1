// source.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Pixel sources for frames
use crate::error::{Error, Result};
use pix::rgb::{Rgb, SRgb8, SRgba8};
use pix::Raster;

/// Source of 24-bit RGB pixels for one frame
pub trait PixelSource {
    /// Get the width in pixels
    fn width(&self) -> u32;

    /// Get the height in pixels
    fn height(&self) -> u32;

    /// Get the RGB value of one pixel.
    ///
    /// Only called with `x < width()` and `y < height()`.
    fn rgb(&self, x: u32, y: u32) -> [u8; 3];
}

impl PixelSource for Raster<SRgb8> {
    fn width(&self) -> u32 {
        Raster::width(self)
    }

    fn height(&self) -> u32 {
        Raster::height(self)
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let p = self.pixel(x as i32, y as i32);
        [
            u8::from(Rgb::red(p)),
            u8::from(Rgb::green(p)),
            u8::from(Rgb::blue(p)),
        ]
    }
}

impl PixelSource for Raster<SRgba8> {
    fn width(&self) -> u32 {
        Raster::width(self)
    }

    fn height(&self) -> u32 {
        Raster::height(self)
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let p = self.pixel(x as i32, y as i32);
        [
            u8::from(Rgb::red(p)),
            u8::from(Rgb::green(p)),
            u8::from(Rgb::blue(p)),
        ]
    }
}

/// Borrowed buffer of packed RGB pixels (3 bytes each, row-major)
#[derive(Clone, Copy, Debug)]
pub struct RgbSlice<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> RgbSlice<'a> {
    /// Create a new RGB slice.
    ///
    /// Returns `Error::InvalidFrameData` if `data` is shorter than
    /// `width * height * 3` bytes.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        let len = width as usize * height as usize * 3;
        if data.len() < len {
            return Err(Error::InvalidFrameData);
        }
        Ok(RgbSlice {
            width,
            height,
            data: &data[..len],
        })
    }
}

impl PixelSource for RgbSlice<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Frame of RGB pixels at stream dimensions.
///
/// Pixels are packed, 3 bytes each, in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbFrame {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
}

impl RgbFrame {
    /// Create a frame from packed pixels
    pub fn with_pixels(width: u16, height: u16, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != usize::from(width) * usize::from(height) * 3 {
            return Err(Error::InvalidFrameData);
        }
        Ok(RgbFrame {
            width,
            height,
            pixels,
        })
    }

    /// Capture pixels from a source.
    ///
    /// The source is cropped or padded with black to fit `width` by
    /// `height`.
    pub fn capture<S>(source: &S, width: u16, height: u16) -> Self
    where
        S: PixelSource + ?Sized,
    {
        let src_width = source.width();
        let src_height = source.height();
        if src_width != u32::from(width) || src_height != u32::from(height) {
            warn!(
                "frame {}x{} fit to screen {}x{}",
                src_width, src_height, width, height
            );
        }
        let mut pixels =
            Vec::with_capacity(usize::from(width) * usize::from(height) * 3);
        for y in 0..u32::from(height) {
            for x in 0..u32::from(width) {
                if x < src_width && y < src_height {
                    pixels.extend_from_slice(&source.rgb(x, y));
                } else {
                    pixels.extend_from_slice(&[0, 0, 0]);
                }
            }
        }
        RgbFrame {
            width,
            height,
            pixels,
        }
    }

    /// Get the width
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get the height
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get packed RGB pixels
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rgb_slice() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let s = RgbSlice::new(2, 2, &data).unwrap();
        assert_eq!(s.rgb(0, 0), [1, 2, 3]);
        assert_eq!(s.rgb(1, 0), [4, 5, 6]);
        assert_eq!(s.rgb(0, 1), [7, 8, 9]);
        assert_eq!(s.rgb(1, 1), [10, 11, 12]);
        assert!(matches!(
            RgbSlice::new(3, 2, &data),
            Err(Error::InvalidFrameData)
        ));
    }

    #[test]
    fn raster_source() {
        let mut r = Raster::<SRgb8>::with_clear(3, 2);
        *r.pixel_mut(2, 1) = SRgb8::new(10, 20, 30);
        assert_eq!(PixelSource::width(&r), 3);
        assert_eq!(PixelSource::height(&r), 2);
        assert_eq!(r.rgb(2, 1), [10, 20, 30]);
        assert_eq!(r.rgb(0, 0), [0, 0, 0]);
    }

    #[test]
    fn raster_alpha_source() {
        let mut r = Raster::<SRgba8>::with_clear(2, 2);
        *r.pixel_mut(1, 0) = SRgba8::new(1, 2, 3, 4);
        assert_eq!(r.rgb(1, 0), [1, 2, 3]);
    }

    #[test]
    fn capture_exact() {
        let data: Vec<u8> = (0..12).collect();
        let s = RgbSlice::new(2, 2, &data).unwrap();
        let f = RgbFrame::capture(&s, 2, 2);
        assert_eq!(f.pixels(), &data[..]);
    }

    #[test]
    fn capture_crop_pad() {
        let data: Vec<u8> = (0..12).collect();
        let s = RgbSlice::new(2, 2, &data).unwrap();
        let f = RgbFrame::capture(&s, 3, 1);
        assert_eq!(f.pixels(), &[0, 1, 2, 3, 4, 5, 0, 0, 0]);
        let empty = RgbSlice::new(0, 0, &[]).unwrap();
        let f = RgbFrame::capture(&empty, 2, 1);
        assert_eq!(f.pixels(), &[0; 6]);
    }

    #[test]
    fn with_pixels() {
        assert!(RgbFrame::with_pixels(1, 1, vec![1, 2, 3]).is_ok());
        assert!(matches!(
            RgbFrame::with_pixels(2, 1, vec![1, 2, 3]),
            Err(Error::InvalidFrameData)
        ));
    }
}
