// encode.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! GIF file encoding
use crate::block::*;
use crate::config::{clamp_size, EncoderConfig};
use crate::error::{Error, Result};
use crate::lzw::Compressor;
use crate::palette::IndexedFrame;
use crate::source::{PixelSource, RgbFrame};
use std::io::{self, Write};

/// Bits per palette index
const INDEX_BITS: u8 = 8;

/// Maximum length of a data sub-block
const SUB_BLOCK_LEN: usize = 0xFF;

/// Encoder for writing [Block]s into a GIF file.
///
/// Build with Encoder.[into_block_enc].
///
/// [Block]: block/enum.Block.html
/// [into_block_enc]: struct.Encoder.html#method.into_block_enc
pub struct BlockEnc<W: Write> {
    /// Writer for blocks
    writer: W,
}

/// Encoder state, persisting across frames
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
    /// Nothing written yet
    NotStarted,
    /// Header written
    Streaming {
        /// Next frame is the first, owning the global color table
        first_frame: bool,
        /// Screen dimensions, once fixed
        dims: Option<(u16, u16)>,
    },
    /// Trailer written
    Finished,
}

/// Encoder for writing animated GIF files from true color frames.
///
/// Each frame is quantized to its own 256 color palette.  The first
/// frame's palette becomes the global color table; following frames carry
/// a local color table.
///
/// Build with Encoder.[into_anim_enc].
///
/// [into_anim_enc]: struct.Encoder.html#method.into_anim_enc
pub struct AnimEnc<W: Write> {
    /// Block encoder
    block_enc: BlockEnc<W>,
    /// Encoder configuration
    config: EncoderConfig,
    /// Stream state
    state: StreamState,
}

impl<W: Write> BlockEnc<W> {
    /// Create a new GIF block encoder
    pub(crate) fn new(writer: W) -> Self {
        BlockEnc { writer }
    }

    /// Encode one block
    pub fn encode<B>(&mut self, block: B) -> Result<()>
    where
        B: Into<Block>,
    {
        use crate::block::Block::*;
        let w = &mut self.writer;
        match block.into() {
            Header(b) => b.format(w)?,
            LogicalScreenDesc(b) => b.format(w)?,
            GlobalColorTable(b) => b.format(w)?,
            GraphicControl(b) => b.format(w)?,
            Application(b) => b.format(w)?,
            ImageDesc(b) => b.format(w)?,
            LocalColorTable(b) => b.format(w)?,
            ImageData(b) => b.format(w)?,
            Trailer(b) => b.format(w)?,
        }
        Ok(())
    }

    /// Flush the writer
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Header {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"GIF")?;
        w.write_all(&self.version())
    }
}

impl LogicalScreenDesc {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(7);
        buf.extend_from_slice(&self.screen_width().to_le_bytes());
        buf.extend_from_slice(&self.screen_height().to_le_bytes());
        buf.push(self.flags());
        buf.push(self.background_color_idx());
        buf.push(self.pixel_aspect_ratio());
        w.write_all(&buf)
    }
}

impl ColorTable {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.colors())
    }
}

impl GraphicControl {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(8);
        buf.push(BlockCode::Extension_.signature());
        buf.push(ExtensionCode::GraphicControl_.into());
        buf.push(4); // block size
        buf.push(self.flags());
        buf.extend_from_slice(&self.delay_time_cs().to_le_bytes());
        buf.push(self.transparent_color_idx());
        buf.push(0); // block size
        w.write_all(&buf)
    }
}

impl Application {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[
            BlockCode::Extension_.signature(),
            ExtensionCode::Application_.into(),
        ])?;
        for c in self.app_data() {
            debug_assert!(c.len() <= SUB_BLOCK_LEN);
            let len = c.len() as u8;
            w.write_all(&[len])?; // block size
            w.write_all(c)?;
        }
        w.write_all(&[0]) // block size
    }
}

impl ImageDesc {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(10);
        buf.push(BlockCode::ImageDesc_.signature());
        buf.extend_from_slice(&self.left().to_le_bytes());
        buf.extend_from_slice(&self.top().to_le_bytes());
        buf.extend_from_slice(&self.width().to_le_bytes());
        buf.extend_from_slice(&self.height().to_le_bytes());
        buf.push(self.flags());
        w.write_all(&buf)
    }
}

impl ImageData {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buffer = Vec::with_capacity(self.indices().len() / 2 + 16);
        let mut compressor = Compressor::new(self.min_code_size());
        compressor.compress(self.indices(), &mut buffer);
        trace!(
            "image data: {} indices, {} bytes, {} resets",
            self.indices().len(),
            buffer.len(),
            compressor.resets()
        );
        w.write_all(&[self.min_code_size()])?;
        let mut bw = BlockWriter::new(w);
        bw.write_all(&buffer)?;
        bw.flush()?;
        w.write_all(&[0]) // block size
    }
}

/// Writer for data sub-blocks
struct BlockWriter<'a, W: Write> {
    writer: &'a mut W,
    buf: Vec<u8>,
}

impl<'a, W: Write> BlockWriter<'a, W> {
    fn new(writer: &'a mut W) -> Self {
        let buf = Vec::with_capacity(SUB_BLOCK_LEN);
        BlockWriter { writer, buf }
    }
}

impl<W: Write> Write for BlockWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let remaining = SUB_BLOCK_LEN - self.buf.len();
        let consumed = remaining.min(buf.len());
        self.buf.extend_from_slice(&buf[..consumed]);
        if self.buf.len() == SUB_BLOCK_LEN {
            self.writer.write_all(&[SUB_BLOCK_LEN as u8])?;
            self.writer.write_all(&self.buf)?;
            self.buf.clear();
        }
        Ok(consumed)
    }

    fn flush(&mut self) -> io::Result<()> {
        let len = self.buf.len();
        if len > 0 {
            self.writer.write_all(&[len as u8])?;
            self.writer.write_all(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Trailer {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[BlockCode::Trailer_.signature()])
    }
}

/// Get the screen size for a frame source
fn source_size<S>(source: &S) -> Result<(u16, u16)>
where
    S: PixelSource + ?Sized,
{
    let width = u16::try_from(source.width())?;
    let height = u16::try_from(source.height())?;
    let (w, h) = clamp_size(width, height);
    if (w, h) != (width, height) {
        warn!("frame size {}x{} invalid, using {}x{}", width, height, w, h);
    }
    Ok((w, h))
}

impl<W: Write> AnimEnc<W> {
    /// Create a new animation encoder
    pub(crate) fn new(block_enc: BlockEnc<W>) -> Self {
        AnimEnc {
            block_enc,
            config: EncoderConfig::default(),
            state: StreamState::NotStarted,
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: EncoderConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Set the quality (quantizer sample factor, clamped to at least 1)
    pub fn set_quality(&mut self, quality: i32) {
        self.config.set_quality(quality);
    }

    /// Get the quality
    pub fn quality(&self) -> u32 {
        self.config.quality()
    }

    /// Set the repeat count (-1 for none, 0 for forever).
    ///
    /// Only effective before the first frame.
    pub fn set_repeat(&mut self, repeat: i32) {
        self.config.set_repeat(repeat);
    }

    /// Get the repeat count
    pub fn repeat(&self) -> i32 {
        self.config.repeat()
    }

    /// Set the delay for following frames, in milliseconds
    pub fn set_delay_ms(&mut self, delay_ms: u32) {
        self.config.set_delay_ms(delay_ms);
    }

    /// Get the frame delay, in milliseconds
    pub fn delay_ms(&self) -> u32 {
        self.config.delay_ms()
    }

    /// Set the frame rate for following frames
    pub fn set_frame_rate(&mut self, fps: f32) {
        self.config.set_frame_rate(fps);
    }

    /// Get the frame rate
    pub fn frame_rate(&self) -> Option<f32> {
        self.config.frame_rate()
    }

    /// Set the transparent color for following frames
    pub fn set_transparent(&mut self, rgb: Option<[u8; 3]>) {
        self.config.set_transparent(rgb);
    }

    /// Get the transparent color
    pub fn transparent(&self) -> Option<[u8; 3]> {
        self.config.transparent()
    }

    /// Set the disposal method override for following frames
    pub fn set_disposal(&mut self, disposal: Option<DisposalMethod>) {
        self.config.set_disposal(disposal);
    }

    /// Get the disposal method override
    pub fn disposal(&self) -> Option<DisposalMethod> {
        self.config.disposal()
    }

    /// Set the screen size.
    ///
    /// Zero width or height is replaced with 320 or 240.  Frames of other
    /// sizes are cropped or padded to fit.
    pub fn set_size(&mut self, width: u16, height: u16) -> Result<()> {
        match self.state {
            StreamState::NotStarted => {
                self.config.set_size(width, height);
                Ok(())
            }
            StreamState::Streaming {
                first_frame: true, ..
            } => {
                self.config.set_size(width, height);
                self.state = StreamState::Streaming {
                    first_frame: true,
                    dims: self.config.size(),
                };
                Ok(())
            }
            _ => Err(Error::ScreenSizeLocked),
        }
    }

    /// Get the screen size, if fixed
    pub fn size(&self) -> Option<(u16, u16)> {
        match self.state {
            StreamState::Streaming { dims, .. } => dims,
            _ => self.config.size(),
        }
    }

    /// Start a new stream, writing the header.
    ///
    /// Called implicitly by the first [add_frame].  Calling while
    /// streaming restarts the stream.
    ///
    /// [add_frame]: #method.add_frame
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            StreamState::Finished => return Err(Error::StreamFinished),
            StreamState::Streaming { .. } => warn!("restarting stream"),
            StreamState::NotStarted => (),
        }
        self.block_enc.encode(Header::default())?;
        self.state = StreamState::Streaming {
            first_frame: true,
            dims: self.config.size(),
        };
        Ok(())
    }

    /// Quantize and encode one frame
    pub fn add_frame<S>(&mut self, source: &S) -> Result<()>
    where
        S: PixelSource + ?Sized,
    {
        self.add_frame_opt(Some(source))
    }

    /// Quantize and encode one frame, if present.
    ///
    /// An absent frame returns `Error::MissingFrame` without writing
    /// anything.
    pub fn add_frame_opt<S>(&mut self, source: Option<&S>) -> Result<()>
    where
        S: PixelSource + ?Sized,
    {
        if self.state == StreamState::Finished {
            return Err(Error::StreamFinished);
        }
        let source = source.ok_or(Error::MissingFrame)?;
        if self.state == StreamState::NotStarted {
            self.start()?;
        }
        let (first_frame, dims) = match self.state {
            StreamState::Streaming { first_frame, dims } => (first_frame, dims),
            _ => return Err(Error::StreamNotStarted),
        };
        let (width, height) = match dims {
            Some(dims) => dims,
            None => source_size(source)?,
        };
        let frame = RgbFrame::capture(source, width, height);
        let indexed = IndexedFrame::quantize(&frame, self.config.quality());
        let transparent = self
            .config
            .transparent()
            .and_then(|rgb| indexed.resolve_transparent(rgb));
        let colors = indexed.used().len();
        if first_frame {
            self.encode_preamble(&indexed, width, height)?;
        }
        self.encode_frame(indexed, first_frame, transparent, width, height)?;
        debug!(
            "frame {}x{} first: {} transparent: {:?} colors: {}",
            width, height, first_frame, transparent, colors
        );
        self.state = StreamState::Streaming {
            first_frame: false,
            dims: Some((width, height)),
        };
        Ok(())
    }

    /// Encode the blocks before the first frame
    fn encode_preamble(
        &mut self,
        indexed: &IndexedFrame,
        width: u16,
        height: u16,
    ) -> Result<()> {
        let palette = indexed.palette();
        let tbl = ColorTableConfig::with_palette(palette);
        self.block_enc.encode(
            LogicalScreenDesc::default()
                .with_screen_width(width)
                .with_screen_height(height)
                .with_color_table_config(&tbl),
        )?;
        self.block_enc
            .encode(Block::GlobalColorTable(ColorTable::with_palette(palette)))?;
        if let Some(loop_count) = self.config.loop_count() {
            self.block_enc.encode(Application::with_loop_count(loop_count))?;
        }
        Ok(())
    }

    /// Encode the blocks of one frame
    fn encode_frame(
        &mut self,
        indexed: IndexedFrame,
        first_frame: bool,
        transparent: Option<u8>,
        width: u16,
        height: u16,
    ) -> Result<()> {
        let disposal = self.config.frame_disposal(transparent.is_some());
        self.block_enc.encode(
            GraphicControl::default()
                .with_disposal_method(disposal)
                .with_delay_time_cs(self.config.delay_cs())
                .with_transparent_color(transparent),
        )?;
        let desc = ImageDesc::default().with_width(width).with_height(height);
        if first_frame {
            // global color table applies
            self.block_enc
                .encode(desc.with_color_table_config(&ColorTableConfig::default()))?;
        } else {
            let palette = indexed.palette();
            let tbl = ColorTableConfig::with_palette(palette);
            self.block_enc.encode(desc.with_color_table_config(&tbl))?;
            self.block_enc
                .encode(Block::LocalColorTable(ColorTable::with_palette(palette)))?;
        }
        self.block_enc
            .encode(ImageData::new(INDEX_BITS, indexed.into_indices()))
    }

    /// Finish the stream, writing the trailer
    pub fn finish(&mut self) -> Result<()> {
        match self.state {
            StreamState::NotStarted => Err(Error::StreamNotStarted),
            StreamState::Finished => Err(Error::StreamFinished),
            StreamState::Streaming { .. } => {
                self.block_enc.encode(Trailer::default())?;
                self.block_enc.flush()?;
                self.state = StreamState::Finished;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::RgbSlice;
    use crate::Encoder;

    /// Offset of the first block after the global color table
    const AFTER_GCT: usize = 6 + 7 + 768;

    /// Length of the looping extension
    const LOOP_EXT_LEN: usize = 19;

    /// Pixel source reporting any size, with black pixels
    struct Blank(u32, u32);

    impl PixelSource for Blank {
        fn width(&self) -> u32 {
            self.0
        }
        fn height(&self) -> u32 {
            self.1
        }
        fn rgb(&self, _x: u32, _y: u32) -> [u8; 3] {
            [0, 0, 0]
        }
    }

    fn checker(width: u32, height: u32) -> Vec<u8> {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                if (x + y) % 2 == 0 {
                    data.extend_from_slice(&[250, 20, 20]);
                } else {
                    data.extend_from_slice(&[20, 20, 250]);
                }
            }
        }
        data
    }

    fn encode_frames(
        config: EncoderConfig,
        frames: &[(u32, u32, Vec<u8>)],
    ) -> Vec<u8> {
        let mut buf = vec![];
        let mut enc = Encoder::new_unbuffered(&mut buf)
            .into_anim_enc()
            .with_config(config);
        for (w, h, data) in frames {
            enc.add_frame(&RgbSlice::new(*w, *h, data).unwrap()).unwrap();
        }
        enc.finish().unwrap();
        buf
    }

    #[test]
    fn empty_stream() {
        let mut buf = vec![];
        let mut enc = Encoder::new_unbuffered(&mut buf).into_anim_enc();
        enc.start().unwrap();
        enc.finish().unwrap();
        assert_eq!(buf, b"GIF89a;");
    }

    #[test]
    fn finish_before_start() {
        let mut buf = vec![];
        let mut enc = Encoder::new_unbuffered(&mut buf).into_anim_enc();
        assert!(matches!(enc.finish(), Err(Error::StreamNotStarted)));
        assert!(buf.is_empty());
    }

    #[test]
    fn after_finish() {
        let mut buf = vec![];
        let mut enc = Encoder::new_unbuffered(&mut buf).into_anim_enc();
        enc.add_frame(&Blank(2, 2)).unwrap();
        enc.finish().unwrap();
        assert!(matches!(enc.add_frame(&Blank(2, 2)), Err(Error::StreamFinished)));
        assert!(matches!(enc.finish(), Err(Error::StreamFinished)));
        assert!(matches!(enc.start(), Err(Error::StreamFinished)));
        let len = buf.len();
        assert_eq!(buf[len - 1], 0x3B);
        // image data terminator precedes the single trailer
        assert_eq!(buf[len - 2], 0);
    }

    #[test]
    fn missing_frame() {
        let mut buf = vec![];
        let mut enc = Encoder::new_unbuffered(&mut buf).into_anim_enc();
        assert!(matches!(
            enc.add_frame_opt::<Blank>(None),
            Err(Error::MissingFrame)
        ));
        enc.add_frame(&Blank(4, 4)).unwrap();
        enc.finish().unwrap();
        // header written once, and the frame still owns the global table
        assert_eq!(&buf[..6], b"GIF89a");
        assert_eq!(&buf[6..13], &[4, 0, 4, 0, 0xF7, 0, 0]);
        assert_eq!(buf.windows(6).filter(|w| w == b"GIF89a").count(), 1);
    }

    #[test]
    fn frame_dimensions() {
        let buf = encode_frames(
            EncoderConfig::default(),
            &[(2, 2, checker(2, 2))],
        );
        assert_eq!(&buf[6..13], &[2, 0, 2, 0, 0xF7, 0, 0]);
        let mut buf = vec![];
        let mut enc = Encoder::new_unbuffered(&mut buf).into_anim_enc();
        enc.add_frame(&Blank(0, 0)).unwrap();
        assert_eq!(enc.size(), Some((320, 240)));
        enc.finish().unwrap();
        assert_eq!(&buf[6..10], &[0x40, 0x01, 0xF0, 0x00]);
    }

    #[test]
    fn too_large() {
        let mut buf = vec![];
        let mut enc = Encoder::new_unbuffered(&mut buf).into_anim_enc();
        assert!(matches!(
            enc.add_frame(&Blank(70_000, 10)),
            Err(Error::TryFromInt(_))
        ));
    }

    #[test]
    fn screen_size() {
        let mut buf = vec![];
        let mut enc = Encoder::new_unbuffered(&mut buf).into_anim_enc();
        enc.set_size(3, 0).unwrap();
        assert_eq!(enc.size(), Some((3, 240)));
        enc.start().unwrap();
        enc.set_size(3, 1).unwrap();
        enc.add_frame(&Blank(8, 8)).unwrap();
        assert!(matches!(enc.set_size(5, 5), Err(Error::ScreenSizeLocked)));
        enc.add_frame(&Blank(1, 1)).unwrap();
        enc.finish().unwrap();
        assert_eq!(&buf[6..10], &[3, 0, 1, 0]);
        // image descriptors are always screen sized
        let desc = &buf[AFTER_GCT + 8..AFTER_GCT + 18];
        assert_eq!(desc, &[0x2C, 0, 0, 0, 0, 3, 0, 1, 0, 0x00]);
    }

    #[test]
    fn restart_stream() {
        let mut buf = vec![];
        let mut enc = Encoder::new_unbuffered(&mut buf).into_anim_enc();
        enc.add_frame(&Blank(2, 2)).unwrap();
        enc.start().unwrap();
        assert_eq!(enc.size(), None);
        enc.add_frame(&Blank(3, 3)).unwrap();
        enc.finish().unwrap();
        let first_end = AFTER_GCT + 18 + image_data_len(&buf[AFTER_GCT + 18..]);
        let second = &buf[first_end..];
        assert_eq!(&second[..6], b"GIF89a");
        // new screen, sized by the next frame, with a global table
        assert_eq!(&second[6..13], &[3, 0, 3, 0, 0xF7, 0, 0]);
        assert_eq!(&second[AFTER_GCT..AFTER_GCT + 3], &[0x21, 0xF9, 4]);
        let desc = &second[AFTER_GCT + 8..AFTER_GCT + 18];
        assert_eq!(desc, &[0x2C, 0, 0, 0, 0, 3, 0, 3, 0, 0x00]);
        let data_len = image_data_len(&second[AFTER_GCT + 18..]);
        assert_eq!(second.len(), AFTER_GCT + 18 + data_len + 1);
        assert_eq!(second[second.len() - 1], 0x3B);
    }

    #[test]
    fn loop_extension() {
        let frame = [(2, 2, checker(2, 2))];
        let buf = encode_frames(EncoderConfig::default(), &frame);
        assert_eq!(&buf[AFTER_GCT..AFTER_GCT + 3], &[0x21, 0xF9, 4]);
        assert!(!buf.windows(11).any(|w| w == b"NETSCAPE2.0"));
        let buf = encode_frames(EncoderConfig::default().with_repeat(0), &frame);
        let mut ext = vec![0x21, 0xFF, 11];
        ext.extend_from_slice(b"NETSCAPE2.0");
        ext.extend_from_slice(&[3, 1, 0, 0, 0]);
        assert_eq!(&buf[AFTER_GCT..AFTER_GCT + LOOP_EXT_LEN], &ext[..]);
        let buf = encode_frames(EncoderConfig::default().with_repeat(300), &frame);
        assert_eq!(
            &buf[AFTER_GCT + 16..AFTER_GCT + LOOP_EXT_LEN],
            &[0x2C, 0x01, 0]
        );
    }

    #[test]
    fn graphic_control() {
        let frame = [(2, 2, checker(2, 2))];
        let config = EncoderConfig::default().with_delay_ms(250);
        let buf = encode_frames(config, &frame);
        assert_eq!(
            &buf[AFTER_GCT..AFTER_GCT + 8],
            &[0x21, 0xF9, 4, 0x00, 25, 0, 0, 0]
        );
        let config = EncoderConfig::default()
            .with_disposal(Some(DisposalMethod::Keep))
            .with_frame_rate(10.0);
        let buf = encode_frames(config, &frame);
        assert_eq!(
            &buf[AFTER_GCT..AFTER_GCT + 8],
            &[0x21, 0xF9, 4, 0x04, 10, 0, 0, 0]
        );
    }

    #[test]
    fn transparency() {
        let data = checker(4, 4);
        let config = EncoderConfig::default().with_transparent(Some([255, 0, 0]));
        let buf = encode_frames(config, &[(4, 4, data.clone())]);
        let gce = &buf[AFTER_GCT..AFTER_GCT + 8];
        // background disposal, transparent flag
        assert_eq!(gce[3], 0b0000_1001);
        let frame = RgbFrame::with_pixels(4, 4, data).unwrap();
        let indexed = IndexedFrame::quantize(&frame, 10);
        assert_eq!(gce[6], indexed.indices()[0]);
        assert!(indexed.used().contains(gce[6]));
    }

    #[test]
    fn local_color_table() {
        let frames = [(2, 2, checker(2, 2)), (2, 2, checker(2, 2))];
        let buf = encode_frames(EncoderConfig::default(), &frames);
        // header + screen + global table + (control + descriptor + data)
        let first_desc = &buf[AFTER_GCT + 8..AFTER_GCT + 18];
        assert_eq!(first_desc[9], 0x00);
        let data_len = image_data_len(&buf[AFTER_GCT + 18..]);
        let second = AFTER_GCT + 18 + data_len;
        assert_eq!(&buf[second..second + 3], &[0x21, 0xF9, 4]);
        let desc = &buf[second + 8..second + 18];
        assert_eq!(desc, &[0x2C, 0, 0, 0, 0, 2, 0, 2, 0, 0x87]);
        // global and local tables match for identical frames
        assert_eq!(&buf[13..AFTER_GCT], &buf[second + 18..second + 18 + 768]);
        let lct_end = second + 18 + 768;
        let data_len = image_data_len(&buf[lct_end..]);
        assert_eq!(buf.len(), lct_end + data_len + 1);
        assert_eq!(buf[buf.len() - 1], 0x3B);
    }

    /// Get length of an image data block (code size + sub-blocks)
    fn image_data_len(buf: &[u8]) -> usize {
        assert_eq!(buf[0], 8);
        let mut pos = 1;
        while buf[pos] != 0 {
            pos += usize::from(buf[pos]) + 1;
        }
        pos + 1
    }

    #[test]
    fn sub_blocks() {
        let mut out = vec![];
        let data: Vec<u8> = (0..600).map(|i| i as u8).collect();
        {
            let mut bw = BlockWriter::new(&mut out);
            bw.write_all(&data).unwrap();
            bw.flush().unwrap();
        }
        assert_eq!(out.len(), 600 + 3);
        assert_eq!(out[0], 255);
        assert_eq!(out[256], 255);
        assert_eq!(out[512], 90);
        assert_eq!(&out[1..256], &data[..255]);
        assert_eq!(&out[513..], &data[510..]);
    }

    #[test]
    fn block_enc() {
        let mut buf = vec![];
        let mut enc = Encoder::new_unbuffered(&mut buf).into_block_enc();
        enc.encode(Header::default()).unwrap();
        enc.encode(
            LogicalScreenDesc::default()
                .with_screen_width(0x0102)
                .with_screen_height(3),
        )
        .unwrap();
        enc.encode(ImageDesc::default().with_left(1).with_top(0x0200))
            .unwrap();
        enc.encode(Trailer::default()).unwrap();
        assert_eq!(
            buf,
            [
                b'G', b'I', b'F', b'8', b'9', b'a', 0x02, 0x01, 3, 0, 0, 0, 0,
                0x2C, 1, 0, 0, 2, 0, 0, 0, 0, 0, 0x3B,
            ]
        );
    }

    fn decode(buf: &[u8]) -> (u16, u16, Vec<gif::Frame<'static>>) {
        let mut opts = gif::DecodeOptions::new();
        opts.set_color_output(gif::ColorOutput::Indexed);
        let mut dec = opts.read_info(buf).unwrap();
        let (width, height) = (dec.width(), dec.height());
        let mut frames = vec![];
        while let Some(frame) = dec.read_next_frame().unwrap() {
            frames.push(frame.clone());
        }
        (width, height, frames)
    }

    fn gradient(width: u32, height: u32, shift: u32) -> Vec<u8> {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.push(((x * 7 + shift) % 256) as u8);
                data.push(((y * 5 + shift) % 256) as u8);
                data.push(((x * y + shift) % 256) as u8);
            }
        }
        data
    }

    #[test]
    fn decode_animation() {
        let frames = [
            (64, 48, gradient(64, 48, 0)),
            (64, 48, gradient(64, 48, 40)),
            (64, 48, gradient(64, 48, 80)),
        ];
        let config = EncoderConfig::default()
            .with_repeat(0)
            .with_delay_ms(100)
            .with_quality(5);
        let buf = encode_frames(config, &frames);
        let (width, height, decoded) = decode(&buf);
        assert_eq!((width, height), (64, 48));
        assert_eq!(decoded.len(), 3);
        for (i, (frame, (w, h, data))) in
            decoded.iter().zip(frames.iter()).enumerate()
        {
            assert_eq!(frame.delay, 10);
            assert_eq!(frame.dispose, gif::DisposalMethod::Any);
            assert_eq!(frame.transparent, None);
            assert_eq!(frame.palette.is_some(), i > 0);
            let rgb = RgbFrame::with_pixels(*w as u16, *h as u16, data.clone())
                .unwrap();
            let indexed = IndexedFrame::quantize(&rgb, 5);
            assert_eq!(&frame.buffer[..], indexed.indices());
        }
    }

    #[test]
    fn decode_large_frame() {
        // noisy frame forces string table resets
        let (w, h) = (300, 200);
        let mut seed = 0x2545_F491u32;
        let data: Vec<u8> = (0..w * h * 3)
            .map(|_| {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                (seed >> 24) as u8
            })
            .collect();
        let config = EncoderConfig::default()
            .with_transparent(Some([0, 0, 0]))
            .with_quality(20);
        let buf = encode_frames(config, &[(w, h, data.clone())]);
        let (_, _, decoded) = decode(&buf);
        assert_eq!(decoded.len(), 1);
        let frame = &decoded[0];
        assert_eq!(frame.dispose, gif::DisposalMethod::Background);
        let rgb = RgbFrame::with_pixels(w as u16, h as u16, data).unwrap();
        let indexed = IndexedFrame::quantize(&rgb, 20);
        assert_eq!(&frame.buffer[..], indexed.indices());
        let t = frame.transparent.unwrap();
        assert!(indexed.used().contains(t));
    }
}
