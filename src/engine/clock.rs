/// Fixed-timestep simulation clock
///
/// Frame time is accumulated and converted into whole simulation ticks.
/// Every tick advances the world by exactly `FIXED_TIMESTEP`, which is also
/// the game delta seen by the collision solver.
use std::time::Duration;

/// Simulation tick rate (60 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of ticks per frame to prevent spiral of death
const MAX_TICKS_PER_FRAME: u32 = 5;

#[derive(Debug)]
pub struct TickClock {
    /// Frame time not yet converted into ticks
    accumulator: Duration,

    /// Ticks handed out so far
    tick_count: u64,

    paused: bool,
}

impl TickClock {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            tick_count: 0,
            paused: false,
        }
    }

    /// Feed elapsed frame time, returns the number of ticks to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            ticks += 1;
        }

        // Drop the backlog rather than replaying it next frame
        if ticks == MAX_TICKS_PER_FRAME && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::warn!(
                "Simulation falling behind, dropping {:?} of frame time",
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += ticks as u64;
        ticks
    }

    /// Seconds simulated by one tick
    pub fn game_delta(&self) -> f32 {
        FIXED_TIMESTEP
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent a tick burst
            self.accumulator = Duration::ZERO;
            log::info!("Simulation resumed");
        }
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
