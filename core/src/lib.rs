#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Knight engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the session controller. The controller submits
//! [`Command`] values describing desired world mutations, the world executes
//! those commands via its `apply` entry point, and broadcasts [`Event`] values
//! describing what actually happened. Rendering adapters never touch the
//! world directly; they consume the [`SimulationSnapshot`] produced once per
//! tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Distance in world units covered by one step of ordinary movement.
pub const MOVE_STEP: f32 = 6.0;

/// Half-extent of the square region inside which enemies pursue the player.
pub const AGGRO_RADIUS: f32 = 400.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests a single fixed-size step of the player in the provided direction.
    StepPlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests a displacement of the player along an arbitrary vector.
    ShiftPlayer {
        /// Displacement of the player measured in world units.
        delta: Vec2,
    },
    /// Advances every hazard on the active level by one frame.
    AdvanceHazards,
    /// Advances every enemy on the active level one frame toward the player.
    AdvanceEnemies,
    /// Returns the camera and every entity to their origin state.
    ResetLevel,
    /// Switches the active level.
    ChangeLevel {
        /// Level that becomes active.
        level: LevelIndex,
    },
}

/// Events broadcast by the world and the session after processing a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the camera scrolled because the player moved.
    CameraScrolled {
        /// Displacement applied to the camera offset.
        delta: Vec2,
    },
    /// Reports that a requested player displacement hit the maze geometry.
    MovementBlocked {
        /// Player displacement that was rejected.
        delta: Vec2,
    },
    /// Confirms that the camera and entities returned to their origin.
    LevelReset {
        /// Level that was reset.
        level: LevelIndex,
    },
    /// Confirms that a different level became active.
    LevelChanged {
        /// Level that became active.
        level: LevelIndex,
    },
    /// Reports that a hazard or enemy touched the player.
    PlayerHit {
        /// Level on which the hit occurred.
        level: LevelIndex,
        /// Lives left after the hit was applied.
        lives_remaining: u32,
    },
    /// Reports that the player reached the exit of a level.
    ExitReached {
        /// Level whose exit was reached.
        level: LevelIndex,
    },
    /// Reports that a dash started.
    DashStarted {
        /// Unit direction of the dash.
        direction: Vec2,
    },
    /// Reports that a dash ended early because a sub-step was blocked.
    DashInterrupted,
    /// Announces that the session moved to another screen.
    ScreenChanged {
        /// Screen that became active.
        screen: Screen,
    },
    /// Announces that the player ran out of lives.
    GameOver,
    /// Announces that the final level was cleared.
    GameCompleted,
}

/// One-based index of a level within the progression.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LevelIndex(u32);

impl LevelIndex {
    /// The level every session starts on.
    pub const FIRST: Self = Self(1);

    /// Creates a level index from its one-based numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the one-based numeric value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Zero-based slot of the level, saturating at zero for invalid indices.
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.0.saturating_sub(1) as usize
    }

    /// Index of the level that follows this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for LevelIndex {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Axis-aligned rectangle expressed in world or screen units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Right edge of the rectangle.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge of the rectangle.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// The four corners in top-left, top-right, bottom-left, bottom-right order.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.right(), self.y),
            Vec2::new(self.x, self.bottom()),
            Vec2::new(self.right(), self.bottom()),
        ]
    }

    /// Returns a copy of the rectangle moved by the provided offset.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..*self
        }
    }

    /// Reports whether the two rectangles overlap.
    ///
    /// Edges that merely touch count as overlapping, matching the
    /// separating-axis test used for hazard and enemy collisions.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let separated = self.x > other.right()
            || self.right() < other.x
            || self.y > other.bottom()
            || self.bottom() < other.y;
        !separated
    }

    /// Reports whether the point lies strictly inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }
}

/// Packed `0xAARRGGBB` colour sampled from a maze mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaskColor(u32);

impl MaskColor {
    /// Opaque bright green marking impassable walls.
    pub const WALL: Self = Self(0xff33_fe00);
    /// Opaque magenta marking the level exit.
    pub const EXIT: Self = Self(0xfffe_00e9);

    /// Packs byte RGBA channels into a mask colour.
    #[must_use]
    pub const fn from_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self(
            (alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32,
        )
    }

    /// Unpacks the colour into `[red, green, blue, alpha]` bytes.
    #[must_use]
    pub const fn to_rgba(&self) -> [u8; 4] {
        [
            (self.0 >> 16) as u8,
            (self.0 >> 8) as u8,
            self.0 as u8,
            (self.0 >> 24) as u8,
        ]
    }

    /// Classifies the colour against the reserved sentinels.
    #[must_use]
    pub fn class(&self) -> MaskClass {
        if *self == Self::WALL {
            MaskClass::Wall
        } else if *self == Self::EXIT {
            MaskClass::Exit
        } else {
            MaskClass::Open
        }
    }
}

/// Classification of a single mask sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaskClass {
    /// Sample matched the wall sentinel.
    Wall,
    /// Sample matched the exit sentinel.
    Exit,
    /// Any other colour.
    Open,
    /// Sample fell outside the raster.
    OutOfBounds,
}

impl MaskClass {
    /// Reports whether a player corner may rest on a sample of this class.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Open | Self::Exit)
    }
}

/// Cardinal movement directions in screen space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing y.
    Up,
    /// Toward increasing y.
    Down,
    /// Toward decreasing x.
    Left,
    /// Toward increasing x.
    Right,
}

impl Direction {
    /// Every direction in the order movement input is resolved.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit vector pointing in the direction.
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Horizontal orientation used to pick sprites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Looking toward decreasing x.
    Left,
    /// Looking toward increasing x.
    #[default]
    Right,
}

/// Motion pattern of a hazard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    /// Never moves.
    Static,
    /// Oscillates along the x axis.
    Horizontal,
    /// Oscillates along the y axis.
    Vertical,
}

/// Coarse screens the session moves between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Title screen shown at startup.
    Intro,
    /// Static instructions screen.
    Tutorial,
    /// Grid of levels the player may jump to.
    LevelSelect,
    /// Simulation is running.
    Playing,
    /// The final level was cleared.
    Complete,
    /// The player ran out of lives.
    Death,
}

/// Keys held during a tick, as decoded by the input adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    /// Up arrow held.
    pub up: bool,
    /// Down arrow held.
    pub down: bool,
    /// Left arrow held.
    pub left: bool,
    /// Right arrow held.
    pub right: bool,
    /// Dash key pressed during this tick.
    pub dash: bool,
}

impl InputState {
    /// Reports whether the key for the provided direction is held.
    #[must_use]
    pub const fn held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Sum of held direction keys; opposite keys cancel out.
    #[must_use]
    pub fn axes(&self) -> Vec2 {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.held(*direction))
            .fold(Vec2::ZERO, |sum, direction| sum + direction.unit())
    }

    /// Reports whether any direction key is held.
    #[must_use]
    pub const fn any_direction(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Built-in game variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Linear four-level game with a tutorial screen.
    Runner,
    /// Ten-level game with level select and dash.
    MazeKnight,
}

impl Variant {
    /// Rules associated with the variant.
    #[must_use]
    pub fn rules(self) -> GameRules {
        match self {
            Self::Runner => GameRules {
                title: "RUNNER".to_owned(),
                total_levels: 4,
                starting_lives: 4,
                dash_enabled: false,
                level_select: false,
                tutorial: true,
            },
            Self::MazeKnight => GameRules {
                title: "MAZE KNIGHT".to_owned(),
                total_levels: 10,
                starting_lives: 3,
                dash_enabled: true,
                level_select: true,
                tutorial: false,
            },
        }
    }
}

/// Parameters distinguishing one game variant from another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// Title shown on the intro screen and window.
    pub title: String,
    /// Number of levels in the progression.
    pub total_levels: u32,
    /// Lives granted when a run starts.
    pub starting_lives: u32,
    /// Whether the dash ability is available.
    pub dash_enabled: bool,
    /// Whether the level-select screen is reachable.
    pub level_select: bool,
    /// Whether the tutorial screen is reachable.
    pub tutorial: bool,
}

impl GameRules {
    /// Resolves where the player goes after clearing `current`.
    #[must_use]
    pub fn advance(&self, current: LevelIndex) -> Progress {
        if current.get() >= self.total_levels {
            Progress::Complete
        } else {
            Progress::Next(current.next())
        }
    }

    /// Index of the final level.
    #[must_use]
    pub fn last_level(&self) -> LevelIndex {
        LevelIndex::new(self.total_levels.max(1))
    }
}

/// Outcome of clearing a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// Continue on the provided level.
    Next(LevelIndex),
    /// The run is over.
    Complete,
}

/// Immutable representation of a hazard used for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HazardSnapshot {
    /// Current bounds in screen space.
    pub bounds: Rect,
    /// Level the hazard belongs to.
    pub level: LevelIndex,
    /// Motion pattern.
    pub kind: HazardKind,
    /// Signed distance travelled from the origin.
    pub traveled: i32,
    /// Signed per-frame displacement.
    pub velocity: i32,
}

/// Immutable representation of an enemy used for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Current bounds in screen space.
    pub bounds: Rect,
    /// Level the enemy belongs to.
    pub level: LevelIndex,
    /// Orientation used for sprite selection.
    pub facing: Facing,
}

/// Dash state exposed to presentation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DashSnapshot {
    /// Whether a dash is in progress.
    pub active: bool,
    /// Ticks left before another dash may start.
    pub cooldown: u32,
}

/// Everything a renderer needs after a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationSnapshot {
    /// Active screen.
    pub screen: Screen,
    /// Active level.
    pub level: LevelIndex,
    /// Remaining lives.
    pub lives: u32,
    /// Highest level the player may select.
    pub max_unlocked: LevelIndex,
    /// Translation applied to the maze background.
    pub camera: Vec2,
    /// Fixed player rectangle.
    pub player: Rect,
    /// Orientation of the player sprite.
    pub player_facing: Facing,
    /// Whether a direction key was held during the tick.
    pub player_moving: bool,
    /// Hazards on the active level.
    pub hazards: Vec<HazardSnapshot>,
    /// Enemies on the active level.
    pub enemies: Vec<EnemySnapshot>,
    /// Dash state.
    pub dash: DashSnapshot,
    /// Events emitted during the tick.
    pub events: Vec<Event>,
}
