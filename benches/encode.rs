use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nqgif::lzw::Compressor;
use nqgif::{Encoder, EncoderConfig, IndexedFrame, RgbFrame, RgbSlice};
use std::io::Cursor;

const WIDTH: u16 = 160;
const HEIGHT: u16 = 120;

fn pixels(shift: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(usize::from(WIDTH) * usize::from(HEIGHT) * 3);
    for y in 0..u32::from(HEIGHT) {
        for x in 0..u32::from(WIDTH) {
            data.push(((x * 3 + shift) % 256) as u8);
            data.push(((y * 2 + shift) % 256) as u8);
            data.push(((x ^ y) % 256) as u8);
        }
    }
    data
}

fn quantize(crit: &mut Criterion) {
    let frame = RgbFrame::with_pixels(WIDTH, HEIGHT, pixels(0)).unwrap();
    crit.bench_function("quantize", |b| {
        b.iter(|| IndexedFrame::quantize(black_box(&frame), 10))
    });
}

fn compress(crit: &mut Criterion) {
    let frame = RgbFrame::with_pixels(WIDTH, HEIGHT, pixels(0)).unwrap();
    let indexed = IndexedFrame::quantize(&frame, 10);
    crit.bench_function("compress", |b| {
        b.iter(|| {
            let mut buffer = Vec::with_capacity(32768);
            Compressor::new(8).compress(black_box(indexed.indices()), &mut buffer);
            buffer
        })
    });
}

fn encode_anim(crit: &mut Criterion) {
    let frames: Vec<Vec<u8>> = (0..4).map(|i| pixels(i * 30)).collect();
    crit.bench_function("encode_anim", |b| {
        b.iter(|| {
            let config = EncoderConfig::default().with_repeat(0).with_delay_ms(100);
            let mut enc = Encoder::new(Cursor::new(Vec::with_capacity(65536)))
                .into_anim_enc()
                .with_config(config);
            for data in &frames {
                let slice = RgbSlice::new(u32::from(WIDTH), u32::from(HEIGHT), data).unwrap();
                enc.add_frame(black_box(&slice)).unwrap();
            }
            enc.finish().unwrap();
        })
    });
}

criterion_group!(benches, quantize, compress, encode_anim);
criterion_main!(benches);
