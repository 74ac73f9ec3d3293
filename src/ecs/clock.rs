use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

use crate::model::SimTime;

/// Simulation clock resource tracking the current time and tick count.
///
/// Advances by `tick_secs` per tick. The `advance_clock` system moves the
/// clock forward at the end of each tick (in `SimPhase::Last`), so systems
/// see the current time before it advances.
#[derive(Resource, Debug, Clone)]
pub struct SimClock {
    pub time: SimTime,
    pub tick_count: u64,
    pub tick_secs: u64,
}

impl SimClock {
    pub fn new(start: SimTime, tick_secs: u64) -> Self {
        Self {
            time: start,
            tick_count: 0,
            tick_secs,
        }
    }

    /// Pick up a persisted clock where it left off.
    pub fn resume(time: SimTime, tick_count: u64, tick_secs: u64) -> Self {
        Self {
            time,
            tick_count,
            tick_secs,
        }
    }

    pub fn advance(&mut self) {
        self.time = self.time + self.tick_secs;
        self.tick_count += 1;
    }
}

/// Bevy system that advances the simulation clock by one tick.
pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.advance();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clock_starts_at_given_time() {
        let clock = SimClock::new(SimTime::from_secs(500), 1);
        assert_eq!(clock.time, SimTime::from_secs(500));
        assert_eq!(clock.tick_count, 0);
    }

    #[test]
    fn advance_moves_by_tick_length() {
        let mut clock = SimClock::new(SimTime::ZERO, 5);
        clock.advance();
        clock.advance();
        assert_eq!(clock.time, SimTime::from_secs(10));
        assert_eq!(clock.tick_count, 2);
    }

    #[test]
    fn resume_keeps_tick_count() {
        let mut clock = SimClock::resume(SimTime::from_secs(60), 60, 1);
        clock.advance();
        assert_eq!(clock.tick_count, 61);
        assert_eq!(clock.time.as_secs(), 61);
    }
}
