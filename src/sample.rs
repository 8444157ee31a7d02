//! Concrete sample and template types for image-based sensors.
//!
//! The coordinator is generic over both; these are what the simulated collaborators
//! and most image sensors produce.

use sha2::{Digest, Sha256};
use std::fmt;

/// Orientation and colour corrections still pending on an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageFlags {
    pub v_flipped: bool,
    pub h_flipped: bool,
    pub colors_inverted: bool,
}

impl ImageFlags {
    pub fn is_standard(&self) -> bool {
        !self.v_flipped && !self.h_flipped && !self.colors_inverted
    }
}

/// A greyscale frame as delivered by the sensor, one byte per pixel, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct RawSample {
    pub width: u32,
    pub height: u32,
    pub flags: ImageFlags,
    pub data: Vec<u8>,
}

impl RawSample {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self { width, height, flags: ImageFlags::default(), data }
    }

    pub fn with_flags(mut self, flags: ImageFlags) -> Self {
        self.flags = flags;
        self
    }

    /// An image is sane when it has a size and its buffer covers exactly that size.
    pub fn is_sane(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() as u64 == u64::from(self.width) * u64::from(self.height)
    }

    /// Applies pending flips and colour inversion, then clears the flags.
    ///
    /// Calling it on an already standard image is a no-op.
    pub fn standardize(&mut self) {
        let width = self.width as usize;
        let height = self.height as usize;
        let geometry_ok = self.is_sane();

        if self.flags.v_flipped && geometry_ok {
            for row in 0..height / 2 {
                let (top, bottom) = self.data.split_at_mut((height - row - 1) * width);
                top[row * width..(row + 1) * width].swap_with_slice(&mut bottom[..width]);
            }
            self.flags.v_flipped = false;
        }

        if self.flags.h_flipped && geometry_ok {
            for row in self.data.chunks_exact_mut(width) {
                row.reverse();
            }
            self.flags.h_flipped = false;
        }

        if self.flags.colors_inverted {
            for px in &mut self.data {
                *px = 0xff - *px;
            }
            self.flags.colors_inverted = false;
        }
    }

    /// First 12 hex characters of the SHA-256 of the pixel data. Identifies a sample in logs.
    pub fn digest12(&self) -> String {
        format!("{:x}", Sha256::digest(&self.data))[..12].to_string()
    }
}

impl fmt::Debug for RawSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSample")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("flags", &self.flags)
            .field("digest", &self.digest12())
            .finish()
    }
}

/// A single minutia: ridge ending or bifurcation at a pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Minutia {
    pub x: u32,
    pub y: u32,
    pub angle: u16,
}

/// Extracted, comparable representation of one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Identifier assigned by the extractor, stable for the lifetime of the template.
    pub id: u64,
    pub minutiae: Vec<Minutia>,
}

impl Template {
    pub fn feature_count(&self) -> u32 {
        self.minutiae.len() as u32
    }
}
