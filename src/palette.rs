// palette.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Palettes and indexed frames
use crate::neuquant::NeuQuant;
use crate::source::RgbFrame;

/// Maximum number of palette entries
pub const MAX_ENTRIES: usize = 256;

/// Size of a color table on the wire (always padded to 256 entries)
pub const TABLE_BYTES: usize = MAX_ENTRIES * 3;

/// Ordered palette of up to 256 RGB colors
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 3]>,
}

impl Palette {
    /// Create a palette from colors (truncated to 256 entries)
    pub fn with_colors(colors: &[[u8; 3]]) -> Self {
        let len = colors.len().min(MAX_ENTRIES);
        Palette {
            colors: colors[..len].to_vec(),
        }
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if the palette is empty
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get one entry
    pub fn entry(&self, index: usize) -> Option<[u8; 3]> {
        self.colors.get(index).copied()
    }

    /// Get all entries
    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Get the 3-bit size code: smallest `k` where `2^(k+1) >= len`
    pub fn size_code(&self) -> u8 {
        (0..7u8)
            .find(|k| (2usize << *k) >= self.len())
            .unwrap_or(7)
    }

    /// Get color table bytes, zero padded to 768
    pub fn table_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(TABLE_BYTES);
        for c in &self.colors {
            bytes.extend_from_slice(c);
        }
        bytes.resize(TABLE_BYTES, 0);
        bytes
    }
}

/// Set of palette indices assigned to at least one pixel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsedEntries {
    used: [bool; MAX_ENTRIES],
}

impl Default for UsedEntries {
    fn default() -> Self {
        UsedEntries {
            used: [false; MAX_ENTRIES],
        }
    }
}

impl UsedEntries {
    /// Mark an index as used
    pub fn insert(&mut self, index: u8) {
        self.used[usize::from(index)] = true;
    }

    /// Check if an index is used
    pub fn contains(&self, index: u8) -> bool {
        self.used[usize::from(index)]
    }

    /// Get the number of used indices
    pub fn len(&self) -> usize {
        self.used.iter().filter(|u| **u).count()
    }

    /// Check if no index is used
    pub fn is_empty(&self) -> bool {
        !self.used.iter().any(|u| *u)
    }

    /// Iterate over used indices, in order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.used
            .iter()
            .enumerate()
            .filter(|(_, u)| **u)
            .map(|(i, _)| i as u8)
    }
}

/// Frame quantized to a palette
#[derive(Clone, Debug)]
pub struct IndexedFrame {
    /// Trained palette
    palette: Palette,
    /// One palette index per pixel, row-major
    indices: Vec<u8>,
    /// Indices actually assigned to pixels
    used: UsedEntries,
}

impl IndexedFrame {
    /// Quantize a frame.
    ///
    /// * `quality` Sample factor for training (1 is best).
    pub fn quantize(frame: &RgbFrame, quality: u32) -> Self {
        let nq = NeuQuant::new(quality, frame.pixels());
        let mut used = UsedEntries::default();
        let indices: Vec<u8> = frame
            .pixels()
            .chunks_exact(3)
            .map(|px| {
                let index = nq.index_of([px[0], px[1], px[2]]);
                used.insert(index);
                index
            })
            .collect();
        IndexedFrame {
            palette: nq.palette(),
            indices,
            used,
        }
    }

    /// Get the palette
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Get the palette indices
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Take the palette indices
    pub fn into_indices(self) -> Vec<u8> {
        self.indices
    }

    /// Get the used entries
    pub fn used(&self) -> &UsedEntries {
        &self.used
    }

    /// Resolve a transparent color to the closest used palette entry.
    ///
    /// Distance is squared RGB distance; ties go to the lowest index.
    /// Returns `None` if no entry is used.
    pub fn resolve_transparent(&self, rgb: [u8; 3]) -> Option<u8> {
        resolve_transparent(&self.palette, &self.used, rgb)
    }
}

/// Find the closest used palette entry to a color
pub fn resolve_transparent(
    palette: &Palette,
    used: &UsedEntries,
    rgb: [u8; 3],
) -> Option<u8> {
    used.iter()
        .filter_map(|i| palette.entry(usize::from(i)).map(|c| (i, c)))
        .min_by_key(|(i, c)| (distance_sq(*c, rgb), *i))
        .map(|(i, _)| i)
}

/// Squared distance between two colors
fn distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = i32::from(*x) - i32::from(*y);
            (d * d) as u32
        })
        .sum()
}
