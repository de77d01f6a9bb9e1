//! Pixel mask geometry decoded from level images.
//!
//! A mask is an RGBA raster in which two reserved colours mark walls and the
//! exit. Everything the player can do in a level is decided by sampling it.

use maze_knight_core::{LevelIndex, MaskClass, MaskColor, Rect};
use thiserror::Error;

const CHANNELS: usize = 4;

/// Errors raised while constructing masks or mask libraries.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MaskError {
    /// Width or height was zero.
    #[error("mask dimensions {width}x{height} must both be non-zero")]
    EmptyDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// The byte buffer does not hold exactly `width * height` RGBA pixels.
    #[error("mask of {width}x{height} requires {expected} bytes but {actual} were provided")]
    LengthMismatch {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Byte length implied by the dimensions.
        expected: usize,
        /// Byte length provided.
        actual: usize,
    },
    /// A library was built without any masks.
    #[error("at least one mask is required")]
    NoMasks,
    /// A level schedule was empty.
    #[error("the level schedule must contain at least one entry")]
    EmptySchedule,
    /// A schedule entry referenced a mask that does not exist.
    #[error("schedule slot {slot} references mask {index} but only {available} are loaded")]
    ScheduleOutOfRange {
        /// Zero-based schedule slot.
        slot: usize,
        /// Mask index stored in the slot.
        index: usize,
        /// Number of masks available.
        available: usize,
    },
}

/// Immutable RGBA raster describing the geometry of one maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl MaskBuffer {
    /// Wraps a row-major RGBA byte buffer.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, MaskError> {
        let expected = byte_len(width, height)?;
        if pixels.len() != expected {
            return Err(MaskError::LengthMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Creates a mask filled with a single colour.
    pub fn solid(width: u32, height: u32, color: MaskColor) -> Result<Self, MaskError> {
        let expected = byte_len(width, height)?;
        let pixels = color
            .to_rgba()
            .into_iter()
            .cycle()
            .take(expected)
            .collect();
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Fills the pixels covered by `area` with `color`, clipped to the raster.
    pub fn paint(&mut self, area: Rect, color: MaskColor) {
        let left = clamp_to_axis(area.x.floor(), self.width);
        let right = clamp_to_axis(area.right().ceil(), self.width);
        let top = clamp_to_axis(area.y.floor(), self.height);
        let bottom = clamp_to_axis(area.bottom().ceil(), self.height);
        let rgba = color.to_rgba();

        for row in top..bottom {
            for column in left..right {
                let start = self.offset(column, row);
                self.pixels[start..start + CHANNELS].copy_from_slice(&rgba);
            }
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Samples the pixel containing `(x, y)`.
    ///
    /// Coordinates are floored; anything outside the raster, including
    /// non-finite input, yields `None`.
    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> Option<MaskColor> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        let column = x.floor();
        let row = y.floor();
        if column >= self.width as f32 || row >= self.height as f32 {
            return None;
        }

        let start = self.offset(column as u32, row as u32);
        let pixel = self.pixels.get(start..start + CHANNELS)?;
        Some(MaskColor::from_rgba(pixel[0], pixel[1], pixel[2], pixel[3]))
    }

    /// Classifies the pixel containing `(x, y)`.
    #[must_use]
    pub fn classify(&self, x: f32, y: f32) -> MaskClass {
        self.sample(x, y)
            .map_or(MaskClass::OutOfBounds, |color| color.class())
    }

    fn offset(&self, column: u32, row: u32) -> usize {
        (row as usize * self.width as usize + column as usize) * CHANNELS
    }
}

fn byte_len(width: u32, height: u32) -> Result<usize, MaskError> {
    if width == 0 || height == 0 {
        return Err(MaskError::EmptyDimensions { width, height });
    }
    Ok(width as usize * height as usize * CHANNELS)
}

fn clamp_to_axis(value: f32, limit: u32) -> u32 {
    if value <= 0.0 || value.is_nan() {
        0
    } else {
        (value as u32).min(limit)
    }
}

/// Unique masks plus the table mapping levels onto them.
///
/// Levels may outnumber masks; a level resolves to
/// `schedule[(level - 1) % schedule.len()]`, so an index beyond the table
/// wraps instead of failing.
#[derive(Clone, Debug)]
pub struct MaskLibrary {
    masks: Vec<MaskBuffer>,
    schedule: Vec<usize>,
}

impl MaskLibrary {
    /// Builds a library that maps level `n` onto mask `n - 1`, wrapping.
    pub fn new(masks: Vec<MaskBuffer>) -> Result<Self, MaskError> {
        let schedule = (0..masks.len()).collect();
        Self::with_schedule(masks, schedule)
    }

    /// Builds a library using an explicit level-to-mask table.
    pub fn with_schedule(masks: Vec<MaskBuffer>, schedule: Vec<usize>) -> Result<Self, MaskError> {
        if masks.is_empty() {
            return Err(MaskError::NoMasks);
        }
        if schedule.is_empty() {
            return Err(MaskError::EmptySchedule);
        }
        if let Some((slot, index)) = schedule
            .iter()
            .copied()
            .enumerate()
            .find(|(_, index)| *index >= masks.len())
        {
            return Err(MaskError::ScheduleOutOfRange {
                slot,
                index,
                available: masks.len(),
            });
        }

        Ok(Self { masks, schedule })
    }

    /// Index of the mask (and matching background art) used by `level`.
    #[must_use]
    pub fn asset_index(&self, level: LevelIndex) -> usize {
        self.schedule[level.slot() % self.schedule.len()]
    }

    /// Mask used by `level`.
    #[must_use]
    pub fn for_level(&self, level: LevelIndex) -> &MaskBuffer {
        &self.masks[self.asset_index(level)]
    }

    /// Number of unique masks. Never zero.
    #[must_use]
    pub fn mask_count(&self) -> usize {
        self.masks.len()
    }
}
