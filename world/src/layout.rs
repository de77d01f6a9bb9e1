//! Entity placement tables for every level.
//!
//! The built-in tables match the shipped level art. A TOML file with
//! `[[hazards]]` and `[[enemies]]` arrays deserializes into the same
//! [`LevelLayout`] so levels can be re-authored without recompiling.

use maze_knight_core::{HazardKind, LevelIndex, Rect, Variant};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hazards::HAZARD_STEP;

/// Width and height shared by every ghost.
pub const GHOST_SIZE: (f32, f32) = (32.0, 40.0);

/// Errors raised when a layout entry cannot produce a well-behaved entity.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LayoutError {
    /// A moving hazard could never land exactly on its travel limit.
    #[error(
        "hazard {index} on level {level} has travel limit {limit}, which is not a positive multiple of {step}"
    )]
    UnreachableTravelLimit {
        /// Position in the hazard table.
        index: usize,
        /// Level the hazard belongs to.
        level: u32,
        /// Offending travel limit.
        limit: u32,
        /// Per-frame hazard displacement.
        step: i32,
    },
    /// An entity had a non-positive or non-finite size.
    #[error("{entity} {index} has degenerate bounds {width}x{height}")]
    DegenerateBounds {
        /// Entity table name.
        entity: &'static str,
        /// Position in the table.
        index: usize,
        /// Declared width.
        width: f32,
        /// Declared height.
        height: f32,
    },
    /// An entity referenced level zero.
    #[error("{entity} {index} references level 0; levels start at 1")]
    InvalidLevel {
        /// Entity table name.
        entity: &'static str,
        /// Position in the table.
        index: usize,
    },
}

/// Placement of a single spike hazard.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardSpec {
    /// Level the hazard belongs to.
    pub level: LevelIndex,
    /// Motion pattern.
    pub kind: HazardKind,
    /// Distance travelled before turning around.
    #[serde(default)]
    pub travel_limit: u32,
    /// Spawn x in screen space.
    pub x: f32,
    /// Spawn y in screen space.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl HazardSpec {
    /// Spawn rectangle.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), LayoutError> {
        validate_common("hazard", index, self.level, self.width, self.height)?;
        let step = HAZARD_STEP.unsigned_abs();
        let moving = !matches!(self.kind, HazardKind::Static);
        if moving && (self.travel_limit == 0 || self.travel_limit % step != 0) {
            return Err(LayoutError::UnreachableTravelLimit {
                index,
                level: self.level.get(),
                limit: self.travel_limit,
                step: HAZARD_STEP,
            });
        }
        Ok(())
    }
}

/// Placement of a single ghost.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    /// Level the ghost haunts.
    pub level: LevelIndex,
    /// Spawn x in screen space.
    pub x: f32,
    /// Spawn y in screen space.
    pub y: f32,
    /// Width.
    #[serde(default = "ghost_width")]
    pub width: f32,
    /// Height.
    #[serde(default = "ghost_height")]
    pub height: f32,
}

impl EnemySpec {
    /// Spawn rectangle.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), LayoutError> {
        validate_common("enemy", index, self.level, self.width, self.height)
    }
}

fn ghost_width() -> f32 {
    GHOST_SIZE.0
}

fn ghost_height() -> f32 {
    GHOST_SIZE.1
}

fn validate_common(
    entity: &'static str,
    index: usize,
    level: LevelIndex,
    width: f32,
    height: f32,
) -> Result<(), LayoutError> {
    if level.get() == 0 {
        return Err(LayoutError::InvalidLevel { entity, index });
    }
    let positive = |value: f32| value.is_finite() && value > 0.0;
    if !positive(width) || !positive(height) {
        return Err(LayoutError::DegenerateBounds {
            entity,
            index,
            width,
            height,
        });
    }
    Ok(())
}

/// Hazard and ghost tables for a whole game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Spike placements.
    #[serde(default)]
    pub hazards: Vec<HazardSpec>,
    /// Ghost placements.
    #[serde(default)]
    pub enemies: Vec<EnemySpec>,
}

// (travel limit, kind, level, x, y, width, height)
type HazardRow = (u32, HazardKind, u32, f32, f32, f32, f32);

const H: HazardKind = HazardKind::Horizontal;
const V: HazardKind = HazardKind::Vertical;

const SHARED_HAZARDS: [HazardRow; 24] = [
    (130, H, 1, 400.0, 390.0, 60.0, 42.0),
    (40, V, 2, 500.0, 185.0, 60.0, 42.0),
    (30, V, 2, 500.0, 620.0, 60.0, 42.0),
    (40, V, 2, 920.0, 185.0, 60.0, 42.0),
    (30, V, 2, 920.0, 620.0, 60.0, 42.0),
    (150, H, 2, 1450.0, 650.0, 60.0, 42.0),
    (150, H, 2, 1450.0, 200.0, 60.0, 42.0),
    (150, H, 2, 1700.0, 600.0, 60.0, 42.0),
    (150, H, 2, 1700.0, 250.0, 60.0, 42.0),
    (130, H, 3, 470.0, 180.0, 100.0, 45.0),
    (130, H, 3, 470.0, 400.0, 100.0, 45.0),
    (130, H, 3, 470.0, 620.0, 100.0, 45.0),
    (150, V, 3, 1615.0, 400.0, 90.0, 45.0),
    (150, V, 3, 1900.0, 400.0, 100.0, 45.0),
    (250, H, 3, 2600.0, 210.0, 100.0, 45.0),
    (200, H, 3, 2600.0, 580.0, 100.0, 45.0),
    (600, V, 4, 200.0, 500.0, 100.0, 45.0),
    (600, V, 4, 1200.0, 500.0, 100.0, 45.0),
    (400, V, 4, 1600.0, 500.0, 100.0, 45.0),
    (200, H, 4, 2200.0, 1000.0, 100.0, 45.0),
    (100, V, 4, 2850.0, 300.0, 100.0, 45.0),
    (80, V, 4, 2600.0, 900.0, 100.0, 45.0),
    (150, H, 4, 2200.0, 1380.0, 100.0, 45.0),
    (150, H, 4, 2600.0, 1500.0, 100.0, 45.0),
];

// (level, x, y)
const SHARED_GHOSTS: [(u32, f32, f32); 10] = [
    (2, 1200.0, 390.0),
    (2, 1800.0, 600.0),
    (3, 1000.0, 390.0),
    (3, 2400.0, 390.0),
    (3, 3800.0, 400.0),
    (4, 150.0, 300.0),
    (4, 1640.0, 900.0),
    (4, 1640.0, 250.0),
    (4, 2700.0, 800.0),
    (4, 2300.0, 300.0),
];

/// First level that only exists in the extended game.
const EXTENDED_FIRST_LEVEL: u32 = 5;

impl LevelLayout {
    /// Built-in layout for `variant`.
    #[must_use]
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Runner => Self::runner(),
            Variant::MazeKnight => Self::maze_knight(),
        }
    }

    /// Four-level Runner layout.
    #[must_use]
    pub fn runner() -> Self {
        Self {
            hazards: SHARED_HAZARDS.iter().map(hazard_from_row).collect(),
            enemies: SHARED_GHOSTS
                .iter()
                .map(|&(level, x, y)| ghost_at(level, x, y))
                .collect(),
        }
    }

    /// Ten-level layout. Levels 1-4 match the runner; later levels stagger
    /// a fixed pattern of spikes and ghosts so reused maze art plays
    /// differently.
    #[must_use]
    pub fn maze_knight() -> Self {
        let mut layout = Self::runner();
        for (idx, level) in (EXTENDED_FIRST_LEVEL..=10).enumerate() {
            let step = idx as f32;
            let offset_x = 200.0 * (idx % 3) as f32;
            let offset_y = 150.0 * (idx % 2) as f32;
            layout.hazards.extend([
                hazard_from_row(&(200, H, level, 600.0 + offset_x, 400.0 + offset_y, 90.0, 45.0)),
                hazard_from_row(&(160, V, level, 1100.0 + offset_x, 250.0 + offset_y, 90.0, 45.0)),
                hazard_from_row(&(140, V, level, 1700.0 + offset_x, 650.0 + offset_y, 90.0, 45.0)),
            ]);
            layout.enemies.extend([
                ghost_at(level, 800.0 + step * 180.0, 380.0 + (idx % 2) as f32 * 120.0),
                ghost_at(level, 1800.0 + step * 120.0, 520.0),
            ]);
        }
        layout
    }

    /// Checks every entry without building entities.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for (index, hazard) in self.hazards.iter().enumerate() {
            hazard.validate(index)?;
        }
        for (index, enemy) in self.enemies.iter().enumerate() {
            enemy.validate(index)?;
        }
        Ok(())
    }
}

fn hazard_from_row(&(travel_limit, kind, level, x, y, width, height): &HazardRow) -> HazardSpec {
    HazardSpec {
        level: LevelIndex::new(level),
        kind,
        travel_limit,
        x,
        y,
        width,
        height,
    }
}

fn ghost_at(level: u32, x: f32, y: f32) -> EnemySpec {
    EnemySpec {
        level: LevelIndex::new(level),
        x,
        y,
        width: GHOST_SIZE.0,
        height: GHOST_SIZE.1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_layouts_are_valid() {
        assert_eq!(LevelLayout::runner().validate(), Ok(()));
        assert_eq!(LevelLayout::maze_knight().validate(), Ok(()));
    }

    #[test]
    fn runner_only_populates_its_four_levels() {
        let layout = LevelLayout::runner();
        assert_eq!(layout.hazards.len(), 24);
        assert_eq!(layout.enemies.len(), 10);
        assert!(layout.hazards.iter().all(|hazard| hazard.level.get() <= 4));
        assert!(layout
            .hazards
            .iter()
            .any(|hazard| hazard.level == LevelIndex::FIRST));
        assert!(layout
            .enemies
            .iter()
            .all(|enemy| enemy.level != LevelIndex::FIRST));
    }

    #[test]
    fn maze_knight_populates_every_extended_level() {
        let layout = LevelLayout::maze_knight();
        for level in 5..=10 {
            let level = LevelIndex::new(level);
            let hazards = layout.hazards.iter().filter(|h| h.level == level).count();
            let enemies = layout.enemies.iter().filter(|e| e.level == level).count();
            assert_eq!((hazards, enemies), (3, 2), "level {}", level.get());
        }

        let level_six = layout
            .enemies
            .iter()
            .find(|enemy| enemy.level == LevelIndex::new(6))
            .expect("ghost on level 6");
        assert_eq!((level_six.x, level_six.y), (980.0, 500.0));
    }

    #[test]
    fn rejects_unreachable_travel_limits() {
        let mut layout = LevelLayout::default();
        layout.hazards.push(HazardSpec {
            level: LevelIndex::new(2),
            kind: HazardKind::Vertical,
            travel_limit: 35,
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        });
        assert_eq!(
            layout.validate(),
            Err(LayoutError::UnreachableTravelLimit {
                index: 0,
                level: 2,
                limit: 35,
                step: HAZARD_STEP,
            })
        );

        layout.hazards[0].kind = HazardKind::Static;
        assert_eq!(layout.validate(), Ok(()));
    }

    #[test]
    fn rejects_level_zero_and_degenerate_ghosts() {
        let mut layout = LevelLayout::default();
        layout.enemies.push(ghost_at(0, 10.0, 10.0));
        assert_eq!(
            layout.validate(),
            Err(LayoutError::InvalidLevel {
                entity: "enemy",
                index: 0,
            })
        );

        layout.enemies[0] = EnemySpec {
            width: 0.0,
            ..ghost_at(3, 10.0, 10.0)
        };
        assert!(matches!(
            layout.validate(),
            Err(LayoutError::DegenerateBounds { entity: "enemy", .. })
        ));
    }
}
