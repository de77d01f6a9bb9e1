//! Oscillating spike hazards.

use glam::Vec2;
use maze_knight_core::{HazardKind, HazardSnapshot, LevelIndex, Rect};

use crate::layout::{HazardSpec, LayoutError};

/// Distance a moving hazard covers per frame.
pub const HAZARD_STEP: i32 = 2;

/// A rectangle that ping-pongs around its origin.
///
/// Travel is tracked in whole units so `|traveled|` lands exactly on the
/// travel limit, which is where the velocity flips.
#[derive(Clone, Debug, PartialEq)]
pub struct Hazard {
    bounds: Rect,
    origin: Vec2,
    level: LevelIndex,
    kind: HazardKind,
    travel_limit: u32,
    traveled: i32,
    velocity: i32,
}

impl Hazard {
    /// Creates a hazard from a layout entry, validating its travel limit.
    pub fn from_spec(index: usize, spec: &HazardSpec) -> Result<Self, LayoutError> {
        spec.validate(index)?;
        let bounds = spec.bounds();
        Ok(Self {
            bounds,
            origin: bounds.origin(),
            level: spec.level,
            kind: spec.kind,
            travel_limit: spec.travel_limit,
            traveled: 0,
            velocity: HAZARD_STEP,
        })
    }

    /// Advances the hazard by one frame.
    pub fn advance(&mut self) {
        match self.kind {
            HazardKind::Static => return,
            HazardKind::Horizontal => self.bounds.x += self.velocity as f32,
            HazardKind::Vertical => self.bounds.y += self.velocity as f32,
        }

        self.traveled += self.velocity;
        if self.traveled.unsigned_abs() == self.travel_limit {
            self.velocity = -self.velocity;
        }
    }

    /// Moves the hazard along with the camera.
    pub fn shift(&mut self, delta: Vec2) {
        self.bounds = self.bounds.translated(delta);
    }

    /// Restores origin position, travel and direction.
    pub fn reset(&mut self) {
        self.bounds.x = self.origin.x;
        self.bounds.y = self.origin.y;
        self.traveled = 0;
        self.velocity = HAZARD_STEP;
    }

    /// Current bounds.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Level the hazard belongs to.
    #[must_use]
    pub const fn level(&self) -> LevelIndex {
        self.level
    }

    /// Signed distance travelled from the origin.
    #[must_use]
    pub const fn traveled(&self) -> i32 {
        self.traveled
    }

    /// Signed per-frame displacement.
    #[must_use]
    pub const fn velocity(&self) -> i32 {
        self.velocity
    }

    /// Captures the hazard for presentation.
    #[must_use]
    pub fn snapshot(&self) -> HazardSnapshot {
        HazardSnapshot {
            bounds: self.bounds,
            level: self.level,
            kind: self.kind,
            traveled: self.traveled,
            velocity: self.velocity,
        }
    }
}

/// Every hazard in the game, across all levels.
#[derive(Clone, Debug, Default)]
pub struct HazardSet {
    hazards: Vec<Hazard>,
}

impl HazardSet {
    /// Builds the set from layout entries.
    pub fn from_specs(specs: &[HazardSpec]) -> Result<Self, LayoutError> {
        let hazards = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| Hazard::from_spec(index, spec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { hazards })
    }

    /// Advances every hazard on `level`.
    pub fn advance(&mut self, level: LevelIndex) {
        self.hazards
            .iter_mut()
            .filter(|hazard| hazard.level == level)
            .for_each(Hazard::advance);
    }

    /// Applies a camera translation to every hazard.
    pub fn shift(&mut self, delta: Vec2) {
        for hazard in &mut self.hazards {
            hazard.shift(delta);
        }
    }

    /// Reports whether any hazard on `level` overlaps `rect`.
    #[must_use]
    pub fn collides(&self, level: LevelIndex, rect: &Rect) -> bool {
        self.hazards
            .iter()
            .any(|hazard| hazard.level == level && hazard.bounds.overlaps(rect))
    }

    /// Returns every hazard to its origin state.
    pub fn reset(&mut self) {
        self.hazards.iter_mut().for_each(Hazard::reset);
    }

    /// Iterates over every hazard in layout order.
    pub fn iter(&self) -> impl Iterator<Item = &Hazard> {
        self.hazards.iter()
    }

    /// Snapshots of the hazards on `level`.
    #[must_use]
    pub fn view(&self, level: LevelIndex) -> Vec<HazardSnapshot> {
        self.hazards
            .iter()
            .filter(|hazard| hazard.level == level)
            .map(Hazard::snapshot)
            .collect()
    }
}
