use std::time::Duration;

/// Simulation rate used by both variants.
pub(crate) const TICKS_PER_SECOND: u32 = 60;

/// Upper bound on ticks run for a single rendered frame.
pub(crate) const MAX_CATCH_UP_TICKS: u32 = 5;

/// Accumulates wall-clock time and converts it into whole simulation ticks.
///
/// A frame that would owe more than [`MAX_CATCH_UP_TICKS`] runs the cap and
/// drops the remaining backlog, so a stalled window does not fast-forward
/// the maze when it resumes.
#[derive(Clone, Debug)]
pub(crate) struct FixedStep {
    step: Duration,
    accumulator: Duration,
    max_ticks: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(TICKS_PER_SECOND, MAX_CATCH_UP_TICKS)
    }
}

impl FixedStep {
    pub(crate) fn new(ticks_per_second: u32, max_ticks: u32) -> Self {
        Self {
            step: Duration::from_secs(1) / ticks_per_second.max(1),
            accumulator: Duration::ZERO,
            max_ticks: max_ticks.max(1),
        }
    }

    /// Adds `elapsed` to the accumulator and returns how many ticks are due.
    pub(crate) fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_ticks {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if self.accumulator >= self.step {
            self.accumulator = Duration::ZERO;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_hz_frames_tick_once() {
        let mut clock = FixedStep::default();
        let frame = Duration::from_secs(1) / 60;
        for _ in 0..120 {
            assert_eq!(clock.advance(frame), 1);
        }
    }

    #[test]
    fn short_frames_accumulate() {
        let mut clock = FixedStep::new(60, 5);
        let half = Duration::from_secs(1) / 120;
        assert_eq!(clock.advance(half), 0);
        assert_eq!(clock.advance(half), 1);
    }

    #[test]
    fn long_stall_is_capped_and_forgotten() {
        let mut clock = FixedStep::new(60, 5);
        assert_eq!(clock.advance(Duration::from_secs(2)), 5);
        assert_eq!(clock.advance(Duration::ZERO), 0);
    }

    #[test]
    fn one_second_yields_sixty_ticks() {
        let mut clock = FixedStep::new(60, 5);
        let total: u32 = (0..100)
            .map(|_| clock.advance(Duration::from_millis(10)))
            .sum();
        assert_eq!(total, 60);
    }
}
