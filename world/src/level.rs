//! Camera-scrolled maze level.
//!
//! The player sprite never moves on screen. Moving the player means moving the
//! camera offset the other way, so walkability is tested by translating the
//! player's screen rectangle into mask-local coordinates.

use glam::Vec2;
use maze_knight_core::{LevelIndex, MaskClass, Rect};

use crate::mask::{MaskBuffer, MaskLibrary};

/// Camera offset and active mask of the current level.
#[derive(Clone, Debug)]
pub struct ScrollingLevel {
    camera: Vec2,
    origin: Vec2,
    level: LevelIndex,
    masks: MaskLibrary,
}

impl ScrollingLevel {
    /// Creates a level positioned at `origin` on the first level.
    #[must_use]
    pub fn new(masks: MaskLibrary, origin: Vec2) -> Self {
        Self {
            camera: origin,
            origin,
            level: LevelIndex::FIRST,
            masks,
        }
    }

    /// Current camera offset.
    #[must_use]
    pub const fn camera(&self) -> Vec2 {
        self.camera
    }

    /// Offset the camera returns to on reset.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Active level.
    #[must_use]
    pub const fn level(&self) -> LevelIndex {
        self.level
    }

    /// Index of the mask and background art backing the active level.
    #[must_use]
    pub fn asset_index(&self) -> usize {
        self.masks.asset_index(self.level)
    }

    /// Mask backing the active level.
    #[must_use]
    pub fn mask(&self) -> &MaskBuffer {
        self.masks.for_level(self.level)
    }

    /// Reports whether a player occupying `candidate` (screen space) is legal.
    ///
    /// Only the four corners are sampled, so a wall thinner than the player
    /// can be crossed when it falls between two corners. Existing level art
    /// relies on this.
    #[must_use]
    pub fn walkable(&self, candidate: Rect) -> bool {
        let mask = self.mask();
        candidate.corners().into_iter().all(|corner| {
            let local = corner - self.camera;
            mask.classify(local.x, local.y).is_walkable()
        })
    }

    /// Reports whether `point` (screen space) sits on an exit pixel.
    #[must_use]
    pub fn reached_exit(&self, point: Vec2) -> bool {
        let local = point + self.origin - self.camera;
        self.mask().classify(local.x, local.y) == MaskClass::Exit
    }

    /// Moves the camera by `delta`.
    pub fn scroll(&mut self, delta: Vec2) {
        self.camera += delta;
    }

    /// Returns the camera to its origin.
    pub fn reset(&mut self) {
        self.camera = self.origin;
    }

    /// Switches the active level without touching the camera.
    pub fn change_level(&mut self, level: LevelIndex) {
        self.level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_knight_core::MaskColor;

    fn corridor() -> ScrollingLevel {
        let mut mask = MaskBuffer::solid(100, 100, MaskColor::from_rgba(10, 10, 10, 255))
            .expect("mask");
        mask.paint(Rect::new(60.0, 0.0, 4.0, 100.0), MaskColor::WALL);
        mask.paint(Rect::new(0.0, 90.0, 10.0, 10.0), MaskColor::EXIT);
        let library = MaskLibrary::new(vec![mask]).expect("library");
        ScrollingLevel::new(library, Vec2::ZERO)
    }

    #[test]
    fn walkable_rejects_any_corner_on_wall() {
        let level = corridor();
        assert!(level.walkable(Rect::new(10.0, 10.0, 40.0, 35.0)));
        assert!(!level.walkable(Rect::new(21.0, 10.0, 40.0, 35.0)));
    }

    #[test]
    fn walkable_rejects_corners_outside_raster() {
        let level = corridor();
        assert!(!level.walkable(Rect::new(-1.0, 10.0, 40.0, 35.0)));
        assert!(!level.walkable(Rect::new(10.0, 70.0, 40.0, 35.0)));
    }

    #[test]
    fn corner_sampling_tunnels_through_walls_thinner_than_player() {
        let level = corridor();
        // Corners land at x = 58 and x = 65, either side of the 4-pixel wall.
        assert!(level.walkable(Rect::new(58.0, 10.0, 7.0, 35.0)));
    }

    #[test]
    fn exit_pixels_are_walkable() {
        let level = corridor();
        assert!(level.walkable(Rect::new(0.0, 90.0, 5.0, 5.0)));
    }

    #[test]
    fn scrolling_translates_samples() {
        let mut level = corridor();
        assert!(!level.reached_exit(Vec2::new(100.0, 190.0)));
        level.scroll(Vec2::new(100.0, 100.0));
        assert!(level.reached_exit(Vec2::new(100.0, 190.0)));
        assert!(!level.walkable(Rect::new(161.0, 110.0, 10.0, 10.0)));

        level.reset();
        assert_eq!(level.camera(), Vec2::ZERO);
    }
}
