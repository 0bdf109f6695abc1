// private.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Private module for top-level items
use crate::encode;
use std::io::{BufWriter, Write};

/// GIF file encoder
///
/// Can be converted to one of two encoders:
/// * [into_anim_enc] for true color animation frames
/// * [into_block_enc] for low-level [Block]s
///
/// ## Encoding Example
/// ```
/// use nqgif::Encoder;
/// use pix::{rgb::SRgb8, Raster};
/// use std::error::Error;
/// use std::io::Write;
///
/// fn encode<W: Write>(mut w: W) -> Result<(), Box<dyn Error>> {
///     let mut enc = Encoder::new(&mut w).into_anim_enc();
///     enc.set_repeat(0);
///     enc.set_delay_ms(500);
///     let mut raster = Raster::<SRgb8>::with_clear(4, 4);
///     for i in 0..4 {
///         *raster.pixel_mut(i, i) = SRgb8::new(0xFF, 0, 0);
///     }
///     enc.add_frame(&raster)?;
///     *raster.pixel_mut(0, 3) = SRgb8::new(0xFF, 0xFF, 0);
///     enc.add_frame(&raster)?;
///     enc.finish()?;
///     Ok(())
/// }
/// # encode(Vec::new()).unwrap();
/// ```
///
/// [Block]: block/enum.Block.html
/// [into_anim_enc]: struct.Encoder.html#method.into_anim_enc
/// [into_block_enc]: struct.Encoder.html#method.into_block_enc
pub struct Encoder<W: Write> {
    /// Writer for output data
    writer: W,
}

impl<W: Write> Encoder<BufWriter<W>> {
    /// Create a new GIF encoder.
    pub fn new(writer: W) -> Self {
        Self::new_unbuffered(BufWriter::new(writer))
    }
}

impl<W: Write> Encoder<W> {
    /// Create a new unbuffered GIF encoder.
    pub fn new_unbuffered(writer: W) -> Self {
        Encoder { writer }
    }

    /// Convert into a block encoder.
    pub fn into_block_enc(self) -> encode::BlockEnc<W> {
        encode::BlockEnc::new(self.writer)
    }

    /// Convert into an animation encoder.
    pub fn into_anim_enc(self) -> encode::AnimEnc<W> {
        encode::AnimEnc::new(self.into_block_enc())
    }
}
