use bevy_app::App;

use crate::config::EngineConfig;
use crate::ecs::{
    ActivityLog, CommandOutcome, Daos, MissionBoard, PendingSettlements, SeasonInfo, SimClock,
    SimCommand, SimSettings, SimTick, Standings, Territories, apply_command, build_sim_app,
    install_state, snapshot_state, validate_start,
};
use crate::error::{SetupError, SimResult};
use crate::model::{
    Activity, DaoRegistry, GameState, LeaderboardEntry, Mission, MissionId, Season, SimTime,
    TerritoryRegistry,
};
use crate::scenario;
use crate::worldgen::GridConfig;

/// Single-writer owner of the simulation state.
///
/// Ticks and commands both need `&mut self`, so a command can never land
/// in the middle of a tick. Read accessors borrow the live registries and
/// never expose a mutation path.
pub struct Simulation {
    app: App,
}

/// Summary of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub now: SimTime,
    /// Non-attack missions waiting for `completeRemoteMission`.
    pub settlements_due: usize,
}

/// Check that `config` is usable and that `state` can be ticked under it.
pub fn check_setup(state: &GameState, config: &EngineConfig) -> Result<(), SetupError> {
    config.validate()?;
    state.validate().map_err(SetupError::State)
}

impl Simulation {
    pub fn new(state: GameState, config: EngineConfig) -> Result<Self, SetupError> {
        check_setup(&state, &config)?;
        Ok(Self {
            app: build_sim_app(state, config),
        })
    }

    /// Fresh session on a generated grid.
    pub fn new_session(grid: &GridConfig, config: EngineConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let state = scenario::new_session(grid, &config);
        Self::new(state, config)
    }

    pub fn tick(&mut self) -> TickReport {
        self.app.world_mut().run_schedule(SimTick);
        let world = self.app.world();
        let clock = world.resource::<SimClock>();
        TickReport {
            tick: clock.tick_count,
            now: clock.time,
            settlements_due: world.resource::<PendingSettlements>().due_count(),
        }
    }

    pub fn run_ticks(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }

    pub fn apply(&mut self, command: SimCommand) -> SimResult<CommandOutcome> {
        apply_command(self.app.world_mut(), command)
    }

    /// Would `StartMission { mission, unit }` be accepted right now?
    pub fn validate_start(&self, mission: &str, unit: Option<&str>) -> SimResult<()> {
        validate_start(self.app.world(), mission, unit)
    }

    /// Hand out every mission that fell due for settlement; each id is
    /// returned once until [`release_settlement`](Self::release_settlement).
    pub fn take_due_settlements(&mut self) -> Vec<MissionId> {
        self.app
            .world_mut()
            .resource_mut::<PendingSettlements>()
            .take_due()
    }

    /// The settlement call for `mission` finished. If the mission is still
    /// active it will be picked up again by the next tick.
    pub fn release_settlement(&mut self, mission: &str) {
        self.app
            .world_mut()
            .resource_mut::<PendingSettlements>()
            .release(mission);
    }

    pub fn settlements_in_flight(&self) -> usize {
        self.app
            .world()
            .resource::<PendingSettlements>()
            .in_flight_count()
    }

    pub fn snapshot(&self) -> GameState {
        snapshot_state(self.app.world())
    }

    /// Replace the whole state, e.g. after loading a save. Pending
    /// settlements are dropped; due missions are found again on the next
    /// tick. An unrunnable state is rejected and the current one kept.
    pub fn restore(&mut self, state: GameState) -> Result<(), SetupError> {
        state.validate().map_err(SetupError::State)?;
        let config = self.config().clone();
        install_state(self.app.world_mut(), state, &config);
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.app.world().resource::<SimSettings>().0
    }

    pub fn now(&self) -> SimTime {
        self.app.world().resource::<SimClock>().time
    }

    pub fn season(&self) -> Season {
        self.app.world().resource::<SeasonInfo>().0
    }

    pub fn territories(&self) -> &TerritoryRegistry {
        &self.app.world().resource::<Territories>().0
    }

    pub fn daos(&self) -> &DaoRegistry {
        &self.app.world().resource::<Daos>().0
    }

    pub fn active_missions(&self) -> Vec<&Mission> {
        self.app.world().resource::<MissionBoard>().0.active().collect()
    }

    pub fn mission(&self, id: &str) -> Option<&Mission> {
        self.app.world().resource::<MissionBoard>().0.get(id)
    }

    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.app.world().resource::<Standings>().0
    }

    /// Oldest first.
    pub fn activity(&self) -> Vec<Activity> {
        self.app.world().resource::<ActivityLog>().to_vec()
    }
}
