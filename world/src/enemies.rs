//! Ghosts that drift toward the player once within range.

use glam::Vec2;
use maze_knight_core::{EnemySnapshot, Facing, LevelIndex, Rect, AGGRO_RADIUS};

use crate::layout::{EnemySpec, LayoutError};

/// Distance a ghost covers per axis per frame.
pub const ENEMY_SPEED: f32 = 1.0;

/// A pursuing ghost.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    bounds: Rect,
    origin: Vec2,
    level: LevelIndex,
    facing: Facing,
    speed: f32,
}

impl Enemy {
    /// Creates a ghost from a layout entry.
    pub fn from_spec(index: usize, spec: &EnemySpec) -> Result<Self, LayoutError> {
        spec.validate(index)?;
        let bounds = spec.bounds();
        Ok(Self {
            bounds,
            origin: bounds.origin(),
            level: spec.level,
            facing: Facing::default(),
            speed: ENEMY_SPEED,
        })
    }

    /// Steps toward `target` when it lies inside the aggro square.
    ///
    /// Each axis moves by exactly `speed` or not at all, so a ghost never
    /// overshoots and settles up to `speed` away from its target.
    pub fn advance_toward(&mut self, target: Vec2) {
        let delta = target - self.bounds.origin();
        if delta.x.abs() > AGGRO_RADIUS || delta.y.abs() > AGGRO_RADIUS {
            return;
        }

        if delta.x.abs() >= self.speed {
            let step = self.speed.copysign(delta.x);
            self.bounds.x += step;
            self.facing = if step < 0.0 {
                Facing::Left
            } else {
                Facing::Right
            };
        }
        if delta.y.abs() >= self.speed {
            self.bounds.y += self.speed.copysign(delta.y);
        }
    }

    /// Moves the ghost along with the camera.
    pub fn shift(&mut self, delta: Vec2) {
        self.bounds = self.bounds.translated(delta);
    }

    /// Returns the ghost to its spawn point.
    pub fn reset(&mut self) {
        self.bounds.x = self.origin.x;
        self.bounds.y = self.origin.y;
        self.facing = Facing::default();
    }

    /// Current bounds.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Level the ghost haunts.
    #[must_use]
    pub const fn level(&self) -> LevelIndex {
        self.level
    }

    /// Direction of the last horizontal step.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Captures the ghost for presentation.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            bounds: self.bounds,
            level: self.level,
            facing: self.facing,
        }
    }
}

/// Every ghost in the game, across all levels.
#[derive(Clone, Debug, Default)]
pub struct EnemySet {
    enemies: Vec<Enemy>,
}

impl EnemySet {
    /// Builds the set from layout entries.
    pub fn from_specs(specs: &[EnemySpec]) -> Result<Self, LayoutError> {
        let enemies = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| Enemy::from_spec(index, spec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { enemies })
    }

    /// Moves every ghost on `level` toward `target`.
    pub fn advance(&mut self, level: LevelIndex, target: Vec2) {
        for enemy in self.enemies.iter_mut().filter(|enemy| enemy.level == level) {
            enemy.advance_toward(target);
        }
    }

    /// Applies a camera translation to every ghost.
    pub fn shift(&mut self, delta: Vec2) {
        for enemy in &mut self.enemies {
            enemy.shift(delta);
        }
    }

    /// Reports whether any ghost on `level` overlaps `rect`.
    #[must_use]
    pub fn collides(&self, level: LevelIndex, rect: &Rect) -> bool {
        self.enemies
            .iter()
            .any(|enemy| enemy.level == level && enemy.bounds.overlaps(rect))
    }

    /// Returns every ghost to its spawn point.
    pub fn reset(&mut self) {
        self.enemies.iter_mut().for_each(Enemy::reset);
    }

    /// Iterates over every ghost in layout order.
    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    /// Snapshots of the ghosts on `level`.
    #[must_use]
    pub fn view(&self, level: LevelIndex) -> Vec<EnemySnapshot> {
        self.enemies
            .iter()
            .filter(|enemy| enemy.level == level)
            .map(Enemy::snapshot)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ghost(x: f32, y: f32) -> Enemy {
        Enemy::from_spec(
            0,
            &EnemySpec {
                level: LevelIndex::FIRST,
                x,
                y,
                width: 32.0,
                height: 40.0,
            },
        )
        .expect("valid ghost")
    }

    #[test]
    fn ghost_outside_radius_stays_put() {
        let mut enemy = ghost(1000.0, 100.0);
        enemy.advance_toward(Vec2::new(250.0, 100.0));
        assert_eq!(enemy.bounds().origin(), Vec2::new(1000.0, 100.0));

        let mut enemy = ghost(250.0, 900.0);
        enemy.advance_toward(Vec2::new(250.0, 100.0));
        assert_eq!(enemy.bounds().origin(), Vec2::new(250.0, 900.0));
    }

    #[test]
    fn ghost_on_radius_edge_pursues_both_axes() {
        let mut enemy = ghost(650.0, 0.0);
        enemy.advance_toward(Vec2::new(250.0, 385.0));
        assert_eq!(enemy.bounds().origin(), Vec2::new(649.0, 1.0));
        assert_eq!(enemy.facing(), Facing::Left);
    }

    #[test]
    fn ghost_does_not_move_on_axis_closer_than_speed() {
        let mut enemy = ghost(250.5, 300.0);
        enemy.advance_toward(Vec2::new(250.0, 385.0));
        assert_eq!(enemy.bounds().origin(), Vec2::new(250.5, 301.0));
        assert_eq!(enemy.facing(), Facing::Right);
    }

    #[test]
    fn facing_follows_horizontal_motion() {
        let mut enemy = ghost(100.0, 385.0);
        enemy.advance_toward(Vec2::new(250.0, 385.0));
        assert_eq!(enemy.facing(), Facing::Right);
        assert_eq!(enemy.bounds().origin(), Vec2::new(101.0, 385.0));
    }

    #[test]
    fn set_moves_only_current_level_and_resets() {
        let specs = [
            EnemySpec {
                level: LevelIndex::FIRST,
                x: 300.0,
                y: 385.0,
                width: 32.0,
                height: 40.0,
            },
            EnemySpec {
                level: LevelIndex::new(2),
                x: 300.0,
                y: 385.0,
                width: 32.0,
                height: 40.0,
            },
        ];
        let mut set = EnemySet::from_specs(&specs).expect("valid ghosts");
        set.advance(LevelIndex::new(2), Vec2::new(250.0, 385.0));
        set.shift(Vec2::new(6.0, 0.0));

        let xs: Vec<f32> = set.iter().map(|enemy| enemy.bounds().x).collect();
        assert_eq!(xs, vec![306.0, 305.0]);
        assert_eq!(set.view(LevelIndex::FIRST).len(), 1);

        set.reset();
        assert!(set
            .iter()
            .all(|enemy| enemy.bounds().origin() == Vec2::new(300.0, 385.0)));
    }
}
