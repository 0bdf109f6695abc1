// config.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Encoder configuration
use crate::block::DisposalMethod;

/// Default screen width, when a frame reports zero width
pub const DEFAULT_WIDTH: u16 = 320;

/// Default screen height, when a frame reports zero height
pub const DEFAULT_HEIGHT: u16 = 240;

/// Animation encoder configuration.
///
/// Out of range values are clamped rather than rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct EncoderConfig {
    /// Quantizer sample factor (1 is best)
    quality: u32,
    /// Repeat count (-1 for no looping, 0 for forever)
    repeat: i32,
    /// Delay between frames, in milliseconds
    delay_ms: u32,
    /// Color to make transparent
    transparent: Option<[u8; 3]>,
    /// Disposal method override
    disposal: Option<DisposalMethod>,
    /// Screen size override
    size: Option<(u16, u16)>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            quality: 10,
            repeat: -1,
            delay_ms: 0,
            transparent: None,
            disposal: None,
            size: None,
        }
    }
}

impl EncoderConfig {
    /// Set the quality (builder)
    pub fn with_quality(mut self, quality: i32) -> Self {
        self.set_quality(quality);
        self
    }

    /// Set the quality.
    ///
    /// This is the quantizer sample factor: 1 trains on every pixel (best
    /// and slowest), the default of 10 is a good tradeoff.  Values below 1
    /// are clamped to 1.
    pub fn set_quality(&mut self, quality: i32) {
        self.quality = quality.max(1) as u32;
    }

    /// Get the quality
    pub fn quality(&self) -> u32 {
        self.quality
    }

    /// Set the repeat count (builder)
    pub fn with_repeat(mut self, repeat: i32) -> Self {
        self.set_repeat(repeat);
        self
    }

    /// Set the repeat count.
    ///
    /// * -1 Play once; no loop extension is written (values below -1 are
    ///   clamped to -1).
    /// * 0 Loop forever.
    /// * n Loop n extra times.
    pub fn set_repeat(&mut self, repeat: i32) {
        self.repeat = repeat.max(-1);
    }

    /// Get the repeat count
    pub fn repeat(&self) -> i32 {
        self.repeat
    }

    /// Get the loop count for the looping extension, if enabled
    pub fn loop_count(&self) -> Option<u16> {
        if self.repeat >= 0 {
            Some(self.repeat.min(i32::from(u16::MAX)) as u16)
        } else {
            None
        }
    }

    /// Set the frame delay in milliseconds (builder)
    pub fn with_delay_ms(mut self, delay_ms: u32) -> Self {
        self.set_delay_ms(delay_ms);
        self
    }

    /// Set the frame delay in milliseconds
    pub fn set_delay_ms(&mut self, delay_ms: u32) {
        self.delay_ms = delay_ms;
    }

    /// Get the frame delay in milliseconds
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Get the frame delay in centiseconds, rounded
    pub fn delay_cs(&self) -> u16 {
        let cs = (u64::from(self.delay_ms) + 5) / 10;
        cs.min(u64::from(u16::MAX)) as u16
    }

    /// Set the frame rate (builder)
    pub fn with_frame_rate(mut self, fps: f32) -> Self {
        self.set_frame_rate(fps);
        self
    }

    /// Set the frame rate, in frames per second.
    ///
    /// The delay becomes `round(1000 / fps)` milliseconds.  Rates which
    /// are zero, negative or not finite are ignored.
    pub fn set_frame_rate(&mut self, fps: f32) {
        if fps.is_finite() && fps > 0.0 {
            let delay = (1000.0 / f64::from(fps)).round();
            self.delay_ms = delay.min(f64::from(u32::MAX)) as u32;
        }
    }

    /// Get the frame rate, or `None` if the delay is zero
    pub fn frame_rate(&self) -> Option<f32> {
        if self.delay_ms > 0 {
            Some(1000.0 / self.delay_ms as f32)
        } else {
            None
        }
    }

    /// Set the transparent color (builder)
    pub fn with_transparent(mut self, rgb: Option<[u8; 3]>) -> Self {
        self.set_transparent(rgb);
        self
    }

    /// Set the transparent color.
    ///
    /// For each frame, the closest color actually used in that frame
    /// becomes transparent.
    pub fn set_transparent(&mut self, rgb: Option<[u8; 3]>) {
        self.transparent = rgb;
    }

    /// Get the transparent color
    pub fn transparent(&self) -> Option<[u8; 3]> {
        self.transparent
    }

    /// Set the disposal method override (builder)
    pub fn with_disposal(mut self, disposal: Option<DisposalMethod>) -> Self {
        self.set_disposal(disposal);
        self
    }

    /// Set the disposal method override.
    ///
    /// When unset, frames with transparency use `Background`, and others
    /// use `NoAction`.
    pub fn set_disposal(&mut self, disposal: Option<DisposalMethod>) {
        self.disposal = disposal;
    }

    /// Get the disposal method override
    pub fn disposal(&self) -> Option<DisposalMethod> {
        self.disposal
    }

    /// Get the disposal method for a frame
    pub fn frame_disposal(&self, transparent: bool) -> DisposalMethod {
        match (self.disposal, transparent) {
            (Some(disposal), _) => disposal,
            (None, true) => DisposalMethod::Background,
            (None, false) => DisposalMethod::NoAction,
        }
    }

    /// Set the screen size (builder)
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.size = Some(clamp_size(width, height));
        self
    }

    /// Get the screen size override
    pub fn size(&self) -> Option<(u16, u16)> {
        self.size
    }

    /// Set the screen size override (unchecked)
    pub(crate) fn set_size(&mut self, width: u16, height: u16) {
        self.size = Some(clamp_size(width, height));
    }
}

/// Clamp a screen size, replacing zero dimensions with defaults
pub(crate) fn clamp_size(width: u16, height: u16) -> (u16, u16) {
    let width = if width < 1 { DEFAULT_WIDTH } else { width };
    let height = if height < 1 { DEFAULT_HEIGHT } else { height };
    (width, height)
}
