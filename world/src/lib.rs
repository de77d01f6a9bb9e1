#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Knight.
//!
//! The world owns the scrolling level, every hazard and ghost, and the
//! player's fixed screen rectangle. It mutates only through [`apply`] and is
//! observed through the [`query`] module.

pub mod enemies;
pub mod hazards;
pub mod layout;
pub mod level;
pub mod mask;

use glam::Vec2;
use maze_knight_core::{Command, Event, Rect, MOVE_STEP};

use crate::{
    enemies::EnemySet,
    hazards::HazardSet,
    layout::{LayoutError, LevelLayout},
    level::ScrollingLevel,
    mask::MaskLibrary,
};

/// Screen rectangle occupied by the player sprite.
pub const PLAYER_BOUNDS: Rect = Rect::new(250.0, 385.0, 40.0, 35.0);

/// Represents the authoritative Maze Knight world state.
#[derive(Clone, Debug)]
pub struct World {
    level: ScrollingLevel,
    hazards: HazardSet,
    enemies: EnemySet,
    player: Rect,
}

impl World {
    /// Builds a world on level 1 from decoded masks and an entity layout.
    pub fn new(masks: MaskLibrary, layout: &LevelLayout) -> Result<Self, LayoutError> {
        Ok(Self {
            level: ScrollingLevel::new(masks, Vec2::ZERO),
            hazards: HazardSet::from_specs(&layout.hazards)?,
            enemies: EnemySet::from_specs(&layout.enemies)?,
            player: PLAYER_BOUNDS,
        })
    }

    /// Replaces the player's screen rectangle.
    #[must_use]
    pub fn with_player(mut self, player: Rect) -> Self {
        self.player = player;
        self
    }

    fn move_player(&mut self, delta: Vec2, out_events: &mut Vec<Event>) {
        if !self.level.walkable(self.player.translated(delta)) {
            out_events.push(Event::MovementBlocked { delta });
            return;
        }

        let camera_delta = -delta;
        self.level.scroll(camera_delta);
        self.hazards.shift(camera_delta);
        self.enemies.shift(camera_delta);
        out_events.push(Event::CameraScrolled {
            delta: camera_delta,
        });
    }

    fn reset(&mut self) {
        self.level.reset();
        self.hazards.reset();
        self.enemies.reset();
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StepPlayer { direction } => {
            world.move_player(direction.unit() * MOVE_STEP, out_events);
        }
        Command::ShiftPlayer { delta } => world.move_player(delta, out_events),
        Command::AdvanceHazards => world.hazards.advance(world.level.level()),
        Command::AdvanceEnemies => {
            let level = world.level.level();
            world.enemies.advance(level, world.player.origin());
        }
        Command::ResetLevel => {
            world.reset();
            out_events.push(Event::LevelReset {
                level: world.level.level(),
            });
        }
        Command::ChangeLevel { level } => {
            world.level.change_level(level);
            out_events.push(Event::LevelChanged { level });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use maze_knight_core::{EnemySnapshot, HazardSnapshot, LevelIndex, Rect};

    use super::World;

    /// Current camera offset.
    #[must_use]
    pub fn camera(world: &World) -> Vec2 {
        world.level.camera()
    }

    /// Active level.
    #[must_use]
    pub fn level(world: &World) -> LevelIndex {
        world.level.level()
    }

    /// Player rectangle in screen space.
    #[must_use]
    pub fn player(world: &World) -> Rect {
        world.player
    }

    /// Index of the mask and background art used by the active level.
    #[must_use]
    pub fn asset_index(world: &World) -> usize {
        world.level.asset_index()
    }

    /// Reports whether the player could occupy `candidate`.
    #[must_use]
    pub fn walkable(world: &World, candidate: Rect) -> bool {
        world.level.walkable(candidate)
    }

    /// Reports whether any hazard or ghost on the active level touches the player.
    #[must_use]
    pub fn player_hit(world: &World) -> bool {
        let level = world.level.level();
        world.hazards.collides(level, &world.player)
            || world.enemies.collides(level, &world.player)
    }

    /// Reports whether the player's top-left corner sits on the exit.
    #[must_use]
    pub fn exit_reached(world: &World) -> bool {
        world.level.reached_exit(world.player.origin())
    }

    /// Snapshots of the hazards on the active level.
    #[must_use]
    pub fn hazard_view(world: &World) -> Vec<HazardSnapshot> {
        world.hazards.view(world.level.level())
    }

    /// Snapshots of the ghosts on the active level.
    #[must_use]
    pub fn enemy_view(world: &World) -> Vec<EnemySnapshot> {
        world.enemies.view(world.level.level())
    }
}
