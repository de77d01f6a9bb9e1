//! Burst movement available in the extended game.

use glam::Vec2;
use maze_knight_core::DashSnapshot;

/// Frames a dash lasts when nothing interrupts it.
pub const DASH_FRAMES: u32 = 8;
/// Ticks before another dash may start, set when a dash triggers.
pub const DASH_COOLDOWN_TICKS: u32 = 20;
/// Distance covered by one dash frame.
pub const DASH_DISTANCE: f32 = 18.0;
/// Collision-checked sub-steps per dash frame.
pub const DASH_SUBSTEPS: u32 = 3;
/// Cooldown applied after losing a life.
pub const RECOVERY_COOLDOWN_TICKS: u32 = 10;

/// Dash timer and direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dash {
    direction: Vec2,
    frames_remaining: u32,
    cooldown: u32,
}

impl Dash {
    /// Reports whether a dash is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.frames_remaining > 0
    }

    /// Ticks left before a new dash may start.
    #[must_use]
    pub const fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Counts the cooldown down. The clock is frozen while a dash runs.
    pub fn cool_down(&mut self) {
        if !self.is_active() {
            self.cooldown = self.cooldown.saturating_sub(1);
        }
    }

    /// Starts a dash along `axes`, or along `last_move` when no key is held.
    ///
    /// Returns the unit direction when a dash started. Requests made while a
    /// dash runs or the cooldown is pending are ignored.
    pub fn trigger(&mut self, axes: Vec2, last_move: Vec2) -> Option<Vec2> {
        if self.is_active() || self.cooldown > 0 {
            return None;
        }

        let raw = if axes == Vec2::ZERO { last_move } else { axes };
        let direction = raw.try_normalize()?;
        *self = Self {
            direction,
            frames_remaining: DASH_FRAMES,
            cooldown: DASH_COOLDOWN_TICKS,
        };
        Some(direction)
    }

    /// Displacement of a single sub-step.
    #[must_use]
    pub fn substep(&self) -> Vec2 {
        self.direction * (DASH_DISTANCE / DASH_SUBSTEPS as f32)
    }

    /// Consumes one dash frame after all its sub-steps succeeded.
    pub fn finish_frame(&mut self) {
        self.frames_remaining = self.frames_remaining.saturating_sub(1);
    }

    /// Ends the dash early, keeping the cooldown.
    pub fn interrupt(&mut self) {
        self.frames_remaining = 0;
    }

    /// Ends any dash and imposes the post-hit cooldown.
    pub fn recover(&mut self) {
        self.frames_remaining = 0;
        self.cooldown = RECOVERY_COOLDOWN_TICKS;
    }

    /// Clears every timer.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Captures the dash for presentation.
    #[must_use]
    pub const fn snapshot(&self) -> DashSnapshot {
        DashSnapshot {
            active: self.is_active(),
            cooldown: self.cooldown,
        }
    }
}
