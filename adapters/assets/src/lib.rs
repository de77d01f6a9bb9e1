#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Filesystem adapter that turns level images and TOML files into world inputs.
//!
//! Mask images are decoded to exact RGBA8 so that sentinel colours survive
//! untouched. The manifest lists the masks, an optional level schedule, level
//! backgrounds and sprites; every path in it is resolved relative to the
//! manifest's own directory.

mod manifest;

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_knight_world::{layout::LevelLayout, mask::MaskBuffer};
use tracing::debug;

pub use manifest::{AssetManifest, MANIFEST_VERSION};

/// Decodes the image at `path` into a mask buffer.
pub fn load_mask(path: &Path) -> Result<MaskBuffer> {
    debug!(path = %path.display(), "loading mask");
    let image = image::open(path)
        .with_context(|| format!("failed to decode mask image {}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    MaskBuffer::from_rgba(width, height, image.into_raw())
        .with_context(|| format!("mask image {} is unusable", path.display()))
}

/// Reads and validates a layout override file.
pub fn load_layout(path: &Path) -> Result<LevelLayout> {
    debug!(path = %path.display(), "loading layout");
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file {}", path.display()))?;
    parse_layout(&contents).with_context(|| format!("invalid layout file {}", path.display()))
}

/// Parses and validates a layout from TOML.
pub fn parse_layout(contents: &str) -> Result<LevelLayout> {
    let layout: LevelLayout = toml::from_str(contents).context("layout is not valid TOML")?;
    layout.validate()?;
    Ok(layout)
}
