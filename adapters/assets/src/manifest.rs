use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use maze_knight_rendering::TextureSources;
use maze_knight_world::mask::MaskLibrary;
use serde::Deserialize;
use tracing::debug;

use crate::load_mask;

/// Manifest format revision understood by this crate.
pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    version: u32,
    masks: Vec<PathBuf>,
    #[serde(default)]
    schedule: Option<Vec<usize>>,
    #[serde(default)]
    backgrounds: Vec<PathBuf>,
    #[serde(default)]
    sprites: BTreeMap<String, PathBuf>,
}

/// Asset manifest with every path resolved against its directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetManifest {
    masks: Vec<PathBuf>,
    schedule: Option<Vec<usize>>,
    backgrounds: Vec<PathBuf>,
    sprites: Vec<(String, PathBuf)>,
}

impl AssetManifest {
    /// Reads the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading asset manifest");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read asset manifest {}", path.display()))?;
        let root = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&contents, root)
            .with_context(|| format!("invalid asset manifest {}", path.display()))
    }

    /// Parses manifest text, resolving relative paths against `root`.
    pub fn parse(contents: &str, root: &Path) -> Result<Self> {
        let file: ManifestFile = toml::from_str(contents).context("manifest is not valid TOML")?;
        if file.version != MANIFEST_VERSION {
            bail!(
                "unsupported manifest version {} (expected {MANIFEST_VERSION})",
                file.version
            );
        }
        if file.masks.is_empty() {
            bail!("manifest lists no mask images");
        }
        if !file.backgrounds.is_empty() && file.backgrounds.len() != file.masks.len() {
            bail!(
                "manifest lists {} backgrounds for {} masks",
                file.backgrounds.len(),
                file.masks.len()
            );
        }

        let resolve = |path: PathBuf| root.join(path);
        Ok(Self {
            masks: file.masks.into_iter().map(resolve).collect(),
            schedule: file.schedule,
            backgrounds: file.backgrounds.into_iter().map(resolve).collect(),
            sprites: file
                .sprites
                .into_iter()
                .map(|(name, path)| (name, resolve(path)))
                .collect(),
        })
    }

    /// Resolved mask image paths in asset-index order.
    #[must_use]
    pub fn masks(&self) -> &[PathBuf] {
        &self.masks
    }

    /// Explicit level-to-asset table, when the manifest provides one.
    #[must_use]
    pub fn schedule(&self) -> Option<&[usize]> {
        self.schedule.as_deref()
    }

    /// Decodes every mask and builds the level library.
    pub fn load_masks(&self) -> Result<MaskLibrary> {
        let masks = self
            .masks
            .iter()
            .map(|path| load_mask(path))
            .collect::<Result<Vec<_>>>()?;
        let library = match &self.schedule {
            Some(schedule) => MaskLibrary::with_schedule(masks, schedule.clone()),
            None => MaskLibrary::new(masks),
        };
        let library = library.context("failed to build the mask library")?;
        debug!(masks = library.mask_count(), "mask library ready");
        Ok(library)
    }

    /// Sprite and background files for the renderer.
    pub fn texture_sources(&self) -> Result<TextureSources> {
        TextureSources::new(self.sprites.iter().cloned(), self.backgrounds.clone())
            .context("manifest sprite table is incomplete")
    }
}
