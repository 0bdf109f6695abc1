// neuquant.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Neural-net color quantization.
//!
//! A self-organizing (Kohonen) map of 256 neurons is trained over the
//! pixels of an image by [color_quant].  Each neuron is a color; after
//! training, the neurons become the palette, sorted by green.  Lookups
//! search outward from the green index with exact tie breaking.
//!
//! [color_quant]: https://docs.rs/color_quant
use crate::palette::Palette;

/// Number of neurons (palette entries)
const NET_SIZE: usize = 256;

/// Maximum sample factor
const MAX_SAMPLE_FACTOR: u32 = 30;

/// Neural-net color quantizer.
///
/// ## Example
/// ```
/// use nqgif::NeuQuant;
///
/// // two pixels: red and blue
/// let pixels = [0xFF, 0, 0, 0, 0, 0xFF];
/// let nq = NeuQuant::new(1, &pixels);
/// let red = nq.index_of([0xFF, 0, 0]);
/// let blue = nq.index_of([0, 0, 0xFF]);
/// assert_ne!(red, blue);
/// assert_eq!(nq.palette().len(), 256);
/// ```
#[derive(Clone)]
pub struct NeuQuant {
    /// Trained colors, sorted by green
    colormap: Vec<[u8; 3]>,
    /// First candidate entry for each green value
    net_index: [usize; 256],
}

impl NeuQuant {
    /// Train a quantizer on packed RGB pixels.
    ///
    /// * `sample_factor` Pixel sampling factor, 1 (best) ..= 30 (fastest).
    /// * `pixels` Packed RGB bytes, 3 per pixel.
    pub fn new(sample_factor: u32, pixels: &[u8]) -> Self {
        let mut nq = NeuQuant {
            colormap: Vec::with_capacity(NET_SIZE),
            net_index: [0; 256],
        };
        nq.train(sample_factor, pixels);
        nq
    }

    /// Retrain on a new set of pixels
    pub fn train(&mut self, sample_factor: u32, pixels: &[u8]) {
        let sample_factor = sample_factor.clamp(1, MAX_SAMPLE_FACTOR);
        self.colormap.clear();
        if pixels.len() < 3 {
            // untrained network lies on the gray diagonal
            self.colormap.extend((0..NET_SIZE).map(|i| [i as u8; 3]));
        } else {
            let rgba: Vec<u8> = pixels
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 0xFF])
                .collect();
            trace!(
                "neuquant: {} pixels, factor {}",
                rgba.len() / 4,
                sample_factor
            );
            let nq =
                color_quant::NeuQuant::new(sample_factor as i32, NET_SIZE, &rgba);
            self.colormap.extend(
                nq.color_map_rgb()
                    .chunks_exact(3)
                    .map(|c| [c[0], c[1], c[2]]),
            );
        }
        self.colormap.sort_by_key(|c| c[1]);
        self.build_net_index();
    }

    /// Build index of first candidate entry for each green value
    fn build_net_index(&mut self) {
        let mut previous = 0;
        let mut start = 0;
        let len = self.colormap.len();
        for i in 0..len {
            let green = usize::from(self.colormap[i][1]);
            if green != previous {
                self.net_index[previous] = (start + i) >> 1;
                for j in (previous + 1)..green {
                    self.net_index[j] = i;
                }
                previous = green;
                start = i;
            }
        }
        let last = len.saturating_sub(1);
        self.net_index[previous] = (start + last) >> 1;
        for j in (previous + 1)..256 {
            self.net_index[j] = last;
        }
    }

    /// Get the trained palette (256 entries)
    pub fn palette(&self) -> Palette {
        Palette::with_colors(&self.colormap)
    }

    /// Look up the color of a palette index
    pub fn lookup(&self, index: usize) -> Option<[u8; 3]> {
        self.colormap.get(index).copied()
    }

    /// Get the palette index of the closest color.
    ///
    /// Distance is the sum of absolute channel differences; ties go to the
    /// lowest index.
    pub fn index_of(&self, rgb: [u8; 3]) -> u8 {
        let rgb = rgb.map(i32::from);
        let mut best = Best {
            dist: i32::MAX,
            index: 0,
        };
        // entries are sorted by green, so search outward from there
        let start = self.net_index[rgb[1] as usize];
        for i in start..NET_SIZE {
            if !self.check(i, Direction::Up, rgb, &mut best) {
                break;
            }
        }
        for i in (0..start).rev() {
            if !self.check(i, Direction::Down, rgb, &mut best) {
                break;
            }
        }
        best.index as u8
    }

    /// Check one colormap entry against the best match so far.
    ///
    /// Returns `false` once no entry further in that direction can match,
    /// since its green difference alone exceeds the best distance.
    fn check(
        &self,
        i: usize,
        dir: Direction,
        rgb: [i32; 3],
        best: &mut Best,
    ) -> bool {
        let c = self.colormap[i].map(i32::from);
        let dg = c[1] - rgb[1];
        let beyond = match dir {
            Direction::Up => dg,
            Direction::Down => -dg,
        };
        if beyond > best.dist {
            return false;
        }
        let mut dist = dg.abs() + (c[0] - rgb[0]).abs();
        if dist <= best.dist {
            dist += (c[2] - rgb[2]).abs();
            if dist < best.dist || (dist == best.dist && i < best.index) {
                best.dist = dist;
                best.index = i;
            }
        }
        true
    }
}

/// Search direction through the colormap
#[derive(Clone, Copy)]
enum Direction {
    Up,
    Down,
}

/// Best match of a colormap search
struct Best {
    dist: i32,
    index: usize,
}
