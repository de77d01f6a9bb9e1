use std::{collections::HashMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use macroquad::{
    color::WHITE,
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use maze_knight_rendering::{SpriteKey, TextureSources};
use tracing::debug;

/// Parameters describing how a sprite should be drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawParams {
    /// Position in window pixels where the sprite's top-left corner is placed.
    pub(crate) position: Vec2,
    /// Desired size in window pixels; `None` keeps the texture's own size.
    pub(crate) size: Option<Vec2>,
    /// Factor applied to the texture's own size when `size` is `None`.
    pub(crate) scale: f32,
}

impl DrawParams {
    pub(crate) fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size: Some(size),
            scale: 1.0,
        }
    }

    pub(crate) fn natural(position: Vec2, scale: f32) -> Self {
        Self {
            position,
            size: None,
            scale,
        }
    }
}

/// Cache of textures for sprites and level backgrounds.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
    backgrounds: Vec<Texture2D>,
}

impl SpriteAtlas {
    /// Loads every configured image from disk.
    pub(crate) fn from_sources(sources: &TextureSources) -> Result<Self> {
        Self::from_sources_with_loader(sources, &mut default_loader)
    }

    fn from_sources_with_loader(
        sources: &TextureSources,
        loader: &mut impl FnMut(&Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(sources.sprites().len());
        for (key, path) in sources.sprites() {
            let texture = loader(path).with_context(|| {
                format!("failed to load sprite {} from {}", key.name(), path.display())
            })?;
            if textures.insert(*key, texture).is_some() {
                bail!("duplicate sprite entry for {}", key.name());
            }
        }

        let backgrounds = sources
            .backgrounds()
            .iter()
            .enumerate()
            .map(|(index, path)| {
                loader(path).with_context(|| {
                    format!(
                        "failed to load level background {index} from {}",
                        path.display()
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            textures,
            backgrounds,
        })
    }

    /// Draws the requested sprite, returning `false` when it is not loaded.
    pub(crate) fn draw(&self, key: SpriteKey, params: DrawParams) -> bool {
        let Some(texture) = self.textures.get(&key).copied() else {
            return false;
        };
        draw_texture(texture, params);
        true
    }

    /// Draws the background for level asset `index`, returning `false` when it is not loaded.
    pub(crate) fn draw_background(&self, index: usize, params: DrawParams) -> bool {
        let Some(texture) = self.backgrounds.get(index).copied() else {
            return false;
        };
        draw_texture(texture, params);
        true
    }

    /// Returns whether the atlas contains the provided key.
    pub(crate) fn contains(&self, key: SpriteKey) -> bool {
        self.textures.contains_key(&key)
    }
}

fn draw_texture(texture: Texture2D, params: DrawParams) {
    let dest_size = match params.size {
        Some(size) => MacroquadVec2::new(size.x, size.y),
        None => MacroquadVec2::new(texture.width(), texture.height()) * params.scale,
    };
    texture::draw_texture_ex(
        texture,
        params.position.x,
        params.position.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(dest_size),
            ..DrawTextureParams::default()
        },
    );
}

fn default_loader(path: &Path) -> Result<Texture2D> {
    debug!(path = %path.display(), "loading texture");
    let bytes =
        fs::read(path).with_context(|| format!("failed to read image at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn recorded_paths(sources: &TextureSources) -> Result<(SpriteAtlas, Vec<PathBuf>)> {
        let mut seen = Vec::new();
        let atlas = SpriteAtlas::from_sources_with_loader(sources, &mut |path: &Path| {
            seen.push(path.to_path_buf());
            Ok(Texture2D::empty())
        })?;
        Ok((atlas, seen))
    }

    fn complete_sources(backgrounds: Vec<PathBuf>) -> TextureSources {
        let sprites = SpriteKey::ALL
            .into_iter()
            .map(|key| (key.name().to_owned(), PathBuf::from(format!("{}.png", key.name()))));
        TextureSources::new(sprites, backgrounds).expect("complete sprite list")
    }

    #[test]
    fn atlas_loads_sprites_then_backgrounds_in_order() {
        let sources = complete_sources(vec![
            PathBuf::from("level1.png"),
            PathBuf::from("level2.png"),
        ]);
        let (atlas, seen) = recorded_paths(&sources).expect("atlas loads");

        assert_eq!(seen.len(), SpriteKey::ALL.len() + 2);
        assert_eq!(seen[0], PathBuf::from("Spikes.png"));
        assert_eq!(seen[seen.len() - 1], PathBuf::from("level2.png"));
        for key in SpriteKey::ALL {
            assert!(atlas.contains(key));
        }
        assert_eq!(atlas.backgrounds.len(), 2);
    }

    #[test]
    fn loader_failures_name_the_asset() {
        let sources = complete_sources(vec![PathBuf::from("missing.png")]);
        let error = SpriteAtlas::from_sources_with_loader(&sources, &mut |path| {
            if path.ends_with("missing.png") {
                bail!("no such file");
            }
            Ok(Texture2D::empty())
        })
        .expect_err("missing background must fail");

        let message = format!("{error:#}");
        assert!(message.contains("level background 0"), "{message}");
        assert!(message.contains("no such file"), "{message}");
    }

    #[test]
    fn empty_sources_produce_an_empty_atlas() {
        let (atlas, seen) = recorded_paths(&TextureSources::default()).expect("atlas loads");
        assert!(seen.is_empty());
        assert!(!atlas.contains(SpriteKey::Heart));
    }
}
