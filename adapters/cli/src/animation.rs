use maze_knight_rendering::RUN_FRAMES;

/// Ticks each run frame stays on screen.
pub(crate) const TICKS_PER_RUN_FRAME: usize = 4;

const RUN_CYCLE_TICKS: usize = RUN_FRAMES * TICKS_PER_RUN_FRAME;

/// Tick counter selecting the knight's run frame.
///
/// The cycle restarts from its first frame whenever the knight stops.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RunCycle {
    timer: usize,
    moving: bool,
}

impl RunCycle {
    /// Records one simulation tick.
    pub(crate) fn advance(&mut self, moving: bool) {
        self.timer = if moving && self.moving {
            (self.timer + 1) % RUN_CYCLE_TICKS
        } else {
            0
        };
        self.moving = moving;
    }

    /// Run frame to draw, or `None` while standing.
    pub(crate) fn frame(&self) -> Option<usize> {
        self.moving.then_some(self.timer / TICKS_PER_RUN_FRAME)
    }
}
