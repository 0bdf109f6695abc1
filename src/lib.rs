// lib.rs      nqgif crate.
//
// Copyright (c) 2026  Douglas Lau
//
//! Animated GIF encoding, with each frame quantized by a NeuQuant neural
//! network to its own 256 color palette.
//!
//! Start with an [Encoder], then convert it into an [AnimEnc] to add
//! frames from any [PixelSource].
//!
//! [AnimEnc]: struct.AnimEnc.html
//! [Encoder]: struct.Encoder.html
//! [PixelSource]: trait.PixelSource.html
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub mod block;
mod config;
mod encode;
mod error;
pub mod lzw;
pub mod neuquant;
mod palette;
mod private;
mod source;

pub use crate::config::{EncoderConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use crate::encode::{AnimEnc, BlockEnc};
pub use crate::error::{Error, Result};
pub use crate::neuquant::NeuQuant;
pub use crate::palette::{
    resolve_transparent, IndexedFrame, Palette, UsedEntries, MAX_ENTRIES,
    TABLE_BYTES,
};
pub use crate::private::Encoder;
pub use crate::source::{PixelSource, RgbFrame, RgbSlice};
