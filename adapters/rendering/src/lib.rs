#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Knight adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_knight_core::{Facing, InputState, Rect, Screen};
use std::{error::Error, fmt, path::PathBuf, time::Duration};

/// Side length of the square logical canvas every scene is authored against.
pub const LOGICAL_CANVAS_SIZE: f32 = 800.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Movement keys held and dash requested on this frame.
    pub keys: InputState,
    /// Pointer position in logical canvas coordinates, if it is over the window.
    pub pointer: Option<Vec2>,
    /// Logical canvas position of a primary click made on this frame.
    pub click: Option<Vec2>,
    /// Whether the primary pointer button is held.
    pub pointer_down: bool,
}

/// Frames in the knight's run cycle.
pub const RUN_FRAMES: usize = 4;

/// Sprites that adapters may draw in place of primitive shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Spike hazard.
    Spikes,
    /// Ghost facing left.
    GhostLeft,
    /// Ghost facing right.
    GhostRight,
    /// Knight standing still, facing left.
    KnightIdleLeft,
    /// Knight standing still, facing right.
    KnightIdleRight,
    /// First frame of the knight's left run cycle.
    KnightRunLeft1,
    /// Second frame of the knight's left run cycle.
    KnightRunLeft2,
    /// Third frame of the knight's left run cycle.
    KnightRunLeft3,
    /// Fourth frame of the knight's left run cycle.
    KnightRunLeft4,
    /// First frame of the knight's right run cycle.
    KnightRunRight1,
    /// Second frame of the knight's right run cycle.
    KnightRunRight2,
    /// Third frame of the knight's right run cycle.
    KnightRunRight3,
    /// Fourth frame of the knight's right run cycle.
    KnightRunRight4,
    /// Life indicator.
    Heart,
    /// Earned rating star.
    Star,
    /// Missing rating star.
    GreyStar,
    /// Vignette drawn over the maze.
    Darkness,
    /// Title screen backdrop.
    IntroBackground,
    /// Tutorial card backdrop.
    TutorialBackground,
    /// Completion screen backdrop.
    CompleteBackground,
    /// Game over backdrop.
    DeathBackground,
}

impl SpriteKey {
    /// Every sprite key in canonical load order.
    pub const ALL: [SpriteKey; 21] = [
        SpriteKey::Spikes,
        SpriteKey::GhostLeft,
        SpriteKey::GhostRight,
        SpriteKey::KnightIdleLeft,
        SpriteKey::KnightIdleRight,
        SpriteKey::KnightRunLeft1,
        SpriteKey::KnightRunLeft2,
        SpriteKey::KnightRunLeft3,
        SpriteKey::KnightRunLeft4,
        SpriteKey::KnightRunRight1,
        SpriteKey::KnightRunRight2,
        SpriteKey::KnightRunRight3,
        SpriteKey::KnightRunRight4,
        SpriteKey::Heart,
        SpriteKey::Star,
        SpriteKey::GreyStar,
        SpriteKey::Darkness,
        SpriteKey::IntroBackground,
        SpriteKey::TutorialBackground,
        SpriteKey::CompleteBackground,
        SpriteKey::DeathBackground,
    ];

    /// Name used for the key in asset manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spikes => "Spikes",
            Self::GhostLeft => "GhostLeft",
            Self::GhostRight => "GhostRight",
            Self::KnightIdleLeft => "KnightIdleLeft",
            Self::KnightIdleRight => "KnightIdleRight",
            Self::KnightRunLeft1 => "KnightRunLeft1",
            Self::KnightRunLeft2 => "KnightRunLeft2",
            Self::KnightRunLeft3 => "KnightRunLeft3",
            Self::KnightRunLeft4 => "KnightRunLeft4",
            Self::KnightRunRight1 => "KnightRunRight1",
            Self::KnightRunRight2 => "KnightRunRight2",
            Self::KnightRunRight3 => "KnightRunRight3",
            Self::KnightRunRight4 => "KnightRunRight4",
            Self::Heart => "Heart",
            Self::Star => "Star",
            Self::GreyStar => "GreyStar",
            Self::Darkness => "Darkness",
            Self::IntroBackground => "IntroBackground",
            Self::TutorialBackground => "TutorialBackground",
            Self::CompleteBackground => "CompleteBackground",
            Self::DeathBackground => "DeathBackground",
        }
    }

    /// Parses a manifest name back into a key.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Knight sprite for `facing`, standing when `run_frame` is `None`.
    ///
    /// Run frames wrap at [`RUN_FRAMES`].
    #[must_use]
    pub const fn knight(facing: Facing, run_frame: Option<usize>) -> Self {
        const LEFT: [SpriteKey; RUN_FRAMES] = [
            SpriteKey::KnightRunLeft1,
            SpriteKey::KnightRunLeft2,
            SpriteKey::KnightRunLeft3,
            SpriteKey::KnightRunLeft4,
        ];
        const RIGHT: [SpriteKey; RUN_FRAMES] = [
            SpriteKey::KnightRunRight1,
            SpriteKey::KnightRunRight2,
            SpriteKey::KnightRunRight3,
            SpriteKey::KnightRunRight4,
        ];
        match (facing, run_frame) {
            (Facing::Left, None) => Self::KnightIdleLeft,
            (Facing::Right, None) => Self::KnightIdleRight,
            (Facing::Left, Some(frame)) => LEFT[frame % RUN_FRAMES],
            (Facing::Right, Some(frame)) => RIGHT[frame % RUN_FRAMES],
        }
    }

    /// Backdrop drawn behind `screen`, if the screen has one.
    #[must_use]
    pub const fn backdrop(screen: Screen) -> Option<Self> {
        match screen {
            Screen::Intro | Screen::LevelSelect => Some(Self::IntroBackground),
            Screen::Tutorial => Some(Self::TutorialBackground),
            Screen::Complete => Some(Self::CompleteBackground),
            Screen::Death => Some(Self::DeathBackground),
            Screen::Playing => None,
        }
    }
}

/// Image files that back the sprite atlas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextureSources {
    sprites: Vec<(SpriteKey, PathBuf)>,
    backgrounds: Vec<PathBuf>,
}

impl TextureSources {
    /// Validates named sprite entries and pairs them with level backgrounds.
    ///
    /// An empty sprite list is accepted and means primitive rendering; a
    /// non-empty list must name every [`SpriteKey`] exactly once.
    pub fn new<I>(named_sprites: I, backgrounds: Vec<PathBuf>) -> Result<Self, RenderingError>
    where
        I: IntoIterator<Item = (String, PathBuf)>,
    {
        let mut sprites: Vec<(SpriteKey, PathBuf)> = Vec::new();
        for (name, path) in named_sprites {
            let key = SpriteKey::from_name(&name)
                .ok_or_else(|| RenderingError::UnknownSpriteKey { name: name.clone() })?;
            if sprites.iter().any(|(existing, _)| *existing == key) {
                return Err(RenderingError::DuplicateSprite { key });
            }
            sprites.push((key, path));
        }

        if !sprites.is_empty() {
            if let Some(missing) = SpriteKey::ALL
                .into_iter()
                .find(|key| sprites.iter().all(|(present, _)| present != key))
            {
                return Err(RenderingError::MissingSprite { key: missing });
            }
        }
        sprites.sort_by_key(|(key, _)| *key);

        Ok(Self {
            sprites,
            backgrounds,
        })
    }

    /// Sprite files in canonical key order.
    #[must_use]
    pub fn sprites(&self) -> &[(SpriteKey, PathBuf)] {
        &self.sprites
    }

    /// Level background files indexed by level asset index.
    #[must_use]
    pub fn backgrounds(&self) -> &[PathBuf] {
        &self.backgrounds
    }

    /// Reports whether no image files were configured at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty() && self.backgrounds.is_empty()
    }
}

/// Fill, outline and caption colours of a menu button.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonPalette {
    /// Interior colour.
    pub fill: Color,
    /// Outline colour.
    pub stroke: Color,
    /// Caption colour.
    pub text: Color,
}

impl ButtonPalette {
    /// Orange buttons used by the title and navigation menus.
    pub const TITLE: Self = Self {
        fill: Color::from_rgb_u8(255, 165, 0),
        stroke: Color::from_rgb_u8(0, 0, 0),
        text: Color::from_rgb_u8(0, 0, 0),
    };

    /// Blue buttons used by restart prompts.
    pub const RETRY: Self = Self {
        fill: Color::from_rgb_u8(0, 0, 255),
        stroke: Color::from_rgb_u8(0, 0, 0),
        text: Color::from_rgb_u8(0, 0, 0),
    };

    /// Greyed-out locked buttons.
    pub const LOCKED: Self = Self {
        fill: Color::from_rgb_u8(0x33, 0x33, 0x33),
        stroke: Color::from_rgb_u8(0x11, 0x11, 0x11),
        text: Color::from_rgb_u8(0x77, 0x77, 0x77),
    };
}

/// A menu button ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneButton {
    /// Bounds in logical canvas coordinates.
    pub rect: Rect,
    /// Caption.
    pub label: String,
    /// Colours.
    pub palette: ButtonPalette,
}

/// Large caption drawn with a drop shadow.
#[derive(Clone, Debug, PartialEq)]
pub struct Headline {
    /// Text to draw.
    pub text: String,
    /// Baseline origin of the foreground text.
    pub position: Vec2,
    /// Font size in logical pixels.
    pub size: f32,
    /// Foreground colour; the shadow is always black.
    pub color: Color,
}

/// A ghost ready to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEnemy {
    /// Screen-space bounds.
    pub bounds: Rect,
    /// Sprite orientation.
    pub facing: Facing,
}

/// The knight ready to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePlayer {
    /// Screen-space bounds.
    pub bounds: Rect,
    /// Sprite orientation.
    pub facing: Facing,
    /// Run cycle frame, or `None` while the knight stands still.
    pub run_frame: Option<usize>,
}

/// Earned and available rating stars on the completion screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StarRating {
    /// Stars earned.
    pub earned: u32,
    /// Stars available.
    pub total: u32,
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Screen being shown.
    pub screen: Screen,
    /// Camera offset, used to position the level background.
    pub camera: Vec2,
    /// Level background index, when the maze is visible.
    pub background: Option<usize>,
    /// The player, when the maze is visible.
    pub player: Option<ScenePlayer>,
    /// Hazards on the active level.
    pub hazards: Vec<Rect>,
    /// Ghosts on the active level.
    pub enemies: Vec<SceneEnemy>,
    /// Hearts shown in the HUD.
    pub hearts: u32,
    /// Completion rating, if shown.
    pub rating: Option<StarRating>,
    /// Caption for the current screen.
    pub headline: Option<Headline>,
    /// Whether a translucent veil is drawn over the backdrop.
    pub dimmed: bool,
    /// Menu buttons.
    pub buttons: Vec<SceneButton>,
}

impl Scene {
    /// Creates an empty scene for `screen`.
    #[must_use]
    pub fn empty(screen: Screen) -> Self {
        Self {
            screen,
            camera: Vec2::ZERO,
            background: None,
            player: None,
            hazards: Vec::new(),
            enemies: Vec::new(),
            hearts: 0,
            rating: None,
            headline: None,
            dimmed: false,
            buttons: Vec::new(),
        }
    }
}

/// Uniform scale and letterbox offset mapping the logical canvas onto a window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasTransform {
    /// Window pixels per logical unit.
    pub scale: f32,
    /// Window position of the logical origin.
    pub offset: Vec2,
}

impl CanvasTransform {
    /// Fits a square logical canvas of `canvas` units inside `window`, centred.
    #[must_use]
    pub fn fit(window: Vec2, canvas: f32) -> Self {
        if canvas <= f32::EPSILON {
            return Self {
                scale: 1.0,
                offset: Vec2::ZERO,
            };
        }
        let scale = (window.x / canvas).min(window.y / canvas).max(0.0);
        let offset = (window - Vec2::splat(canvas * scale)) * 0.5;
        Self { scale, offset }
    }

    /// Maps a logical position to window pixels.
    #[must_use]
    pub fn to_window(&self, logical: Vec2) -> Vec2 {
        self.offset + logical * self.scale
    }

    /// Maps window pixels back to a logical position.
    #[must_use]
    pub fn to_logical(&self, window: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }
        Some((window - self.offset) / self.scale)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
    /// Image files backing sprites and level backgrounds.
    pub textures: TextureSources,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(
        window_title: T,
        clear_color: Color,
        scene: Scene,
        textures: TextureSources,
    ) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
            textures,
        }
    }
}

/// Rendering backend capable of presenting Maze Knight scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta and
    /// per-frame input captured by the adapter, and rewrites the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// A manifest named a sprite the renderer does not know.
    UnknownSpriteKey {
        /// Offending name.
        name: String,
    },
    /// A sprite was listed twice.
    DuplicateSprite {
        /// Repeated key.
        key: SpriteKey,
    },
    /// A non-empty sprite list omitted a key.
    MissingSprite {
        /// First missing key in canonical order.
        key: SpriteKey,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSpriteKey { name } => write!(f, "unknown sprite key `{name}`"),
            Self::DuplicateSprite { key } => {
                write!(f, "sprite {} is listed more than once", key.name())
            }
            Self::MissingSprite { key } => {
                write!(f, "sprite list is missing an entry for {}", key.name())
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_sprites() -> Vec<(String, PathBuf)> {
        SpriteKey::ALL
            .into_iter()
            .rev()
            .map(|key| {
                (
                    key.name().to_owned(),
                    PathBuf::from(format!("{}.png", key.name())),
                )
            })
            .collect()
    }

    #[test]
    fn sprite_names_round_trip() {
        for key in SpriteKey::ALL {
            assert_eq!(SpriteKey::from_name(key.name()), Some(key));
        }
        assert_eq!(SpriteKey::from_name("Dragon"), None);
    }

    #[test]
    fn texture_sources_sort_sprites_into_canonical_order() {
        let sources = TextureSources::new(all_sprites(), Vec::new()).expect("complete list");
        let keys: Vec<SpriteKey> = sources.sprites().iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, SpriteKey::ALL.to_vec());
        assert!(!sources.is_empty());
    }

    #[test]
    fn texture_sources_reject_unknown_and_partial_lists() {
        let mut sprites = all_sprites();
        sprites.push(("Dragon".to_owned(), PathBuf::from("dragon.png")));
        assert_eq!(
            TextureSources::new(sprites, Vec::new()),
            Err(RenderingError::UnknownSpriteKey {
                name: "Dragon".to_owned()
            })
        );

        let partial = vec![("Heart".to_owned(), PathBuf::from("heart.png"))];
        assert_eq!(
            TextureSources::new(partial, Vec::new()),
            Err(RenderingError::MissingSprite {
                key: SpriteKey::Spikes
            })
        );
    }

    #[test]
    fn empty_sprite_list_means_primitive_rendering() {
        let sources = TextureSources::new(Vec::new(), Vec::new()).expect("empty is fine");
        assert!(sources.is_empty());
    }

    #[test]
    fn canvas_fit_letterboxes_wide_windows() {
        let transform = CanvasTransform::fit(Vec2::new(1600.0, 800.0), LOGICAL_CANVAS_SIZE);
        assert_eq!(transform.scale, 1.0);
        assert_eq!(transform.offset, Vec2::new(400.0, 0.0));
        assert_eq!(
            transform.to_logical(Vec2::new(800.0, 400.0)),
            Some(Vec2::new(400.0, 400.0))
        );
    }

    #[test]
    fn canvas_fit_scales_small_windows() {
        let transform = CanvasTransform::fit(Vec2::new(400.0, 600.0), LOGICAL_CANVAS_SIZE);
        assert_eq!(transform.scale, 0.5);
        assert_eq!(transform.offset, Vec2::new(0.0, 100.0));
        assert_eq!(
            transform.to_window(Vec2::new(300.0, 450.0)),
            Vec2::new(150.0, 325.0)
        );
    }

    #[test]
    fn knight_sprite_follows_facing_and_run_frame() {
        assert_eq!(SpriteKey::knight(Facing::Left, None), SpriteKey::KnightIdleLeft);
        assert_eq!(SpriteKey::knight(Facing::Right, None), SpriteKey::KnightIdleRight);
        assert_eq!(
            SpriteKey::knight(Facing::Left, Some(0)),
            SpriteKey::KnightRunLeft1
        );
        assert_eq!(
            SpriteKey::knight(Facing::Right, Some(3)),
            SpriteKey::KnightRunRight4
        );
        assert_eq!(
            SpriteKey::knight(Facing::Right, Some(RUN_FRAMES + 1)),
            SpriteKey::KnightRunRight2
        );
    }
}
