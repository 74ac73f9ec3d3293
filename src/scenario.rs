use crate::config::EngineConfig;
use crate::id::IdGenerator;
use crate::model::*;
use crate::worldgen::{self, GridConfig};

pub const PLAYER_DAO: &str = "player_dao";
pub const RIVAL_DAO: &str = "enemy_dao";
pub const TUTORIAL_ATTACK: &str = "tutorial_attack";

/// Build the opening state of a fresh session: generated grid, the player
/// and rival DAOs with their starting tiles, and the tutorial assault.
pub fn new_session(grid: &GridConfig, engine: &EngineConfig) -> GameState {
    let season = Season::first(SimTime::ZERO, engine.season_length_secs);
    let mut state = GameState::empty(season);
    state.territories = TerritoryRegistry::new(worldgen::generate_grid(grid));

    let mut player = Dao::new(PLAYER_DAO, "Your DAO", "Commander");
    player.resources = ResourcePool::uniform(1000.0);
    let mut rival = Dao::new(RIVAL_DAO, "Rival Protocol", "AI Commander");
    rival.level = 2;
    rival.resources = ResourcePool::uniform(800.0);
    rival.color = "#ef4444".to_string();
    state.daos.insert(player);
    state.daos.insert(rival);

    let ids: Vec<TerritoryId> = state.territories.iter().map(|t| t.id.clone()).collect();
    let player_tiles = grid.player_start_tiles.min(ids.len());
    let rival_tiles = grid.rival_start_tiles.min(ids.len() - player_tiles);
    for id in &ids[..player_tiles] {
        transfer_territory(&mut state.territories, &mut state.daos, id, PLAYER_DAO);
    }
    for id in &ids[ids.len() - rival_tiles..] {
        transfer_territory(&mut state.territories, &mut state.daos, id, RIVAL_DAO);
    }

    if let Some(target) = state.territories.iter().find(|t| t.owner.is_none()) {
        state.missions.push(Mission {
            id: TUTORIAL_ATTACK.to_string(),
            kind: MissionKind::Attack,
            participants: vec![PLAYER_DAO.to_string()],
            target: Some(target.id.clone()),
            duration_secs: 120,
            rewards: vec![
                MissionReward::xp(200),
                MissionReward::resource(ResourceType::Liquidity, 1000),
            ],
            cost: engine.mission_costs.for_kind(MissionKind::Attack),
            status: MissionStatus::Pending,
            start_time: None,
        });
    }

    state.leaderboard = rank_daos(&state.daos, &state.territories);
    tracing::info!(
        seed = grid.seed,
        radius = grid.radius,
        territories = state.territories.len(),
        "new session created"
    );
    state
}

/// Hand-built game states for tests and tooling.
///
/// Territories are laid out along the hex disk in insertion order, so the
/// `n`-th territory added sits at the `n`-th coordinate of `hex_disk`.
pub struct Scenario {
    state: GameState,
    id_gen: IdGenerator,
}

/// Chained mutation of one DAO inside a [`Scenario`].
pub struct DaoRef<'a> {
    scenario: &'a mut Scenario,
    id: DaoId,
}

impl<'a> DaoRef<'a> {
    fn data_mut(&mut self) -> &mut Dao {
        self.scenario
            .state
            .daos
            .get_mut(&self.id)
            .expect("DaoRef always points at an inserted DAO")
    }

    pub fn level(mut self, v: u32) -> Self { self.data_mut().level = v; self }
    pub fn resources(mut self, v: ResourcePool) -> Self { self.data_mut().resources = v; self }
    pub fn battles_won(mut self, v: u32) -> Self { self.data_mut().battles_won = v; self }

    /// Give this DAO an existing territory.
    pub fn owns(mut self, territory: &str) -> Self {
        let state = &mut self.scenario.state;
        transfer_territory(&mut state.territories, &mut state.daos, territory, &self.id)
            .expect("scenario territory must exist");
        self
    }

    /// Add a unit at the given level.
    pub fn unit(mut self, unit_type: UnitType, level: u32) -> Self {
        let id = self.scenario.id_gen.next_tagged("unit");
        let owner = self.id.clone();
        let mut unit = Unit::new(id, unit_type, owner, None);
        unit.level = level;
        self.data_mut().units.push(unit);
        self
    }

    /// Terminate the chain and return the DAO id.
    pub fn id(self) -> DaoId { self.id }
}

impl Scenario {
    pub fn new() -> Self {
        let config = EngineConfig::default();
        Self {
            state: GameState::empty(Season::first(SimTime::ZERO, config.season_length_secs)),
            id_gen: IdGenerator::new(),
        }
    }

    pub fn add_territory(
        &mut self,
        resource_type: ResourceType,
        production_rate: u32,
        defense_level: u32,
    ) -> TerritoryId {
        let index = self.state.territories.len();
        let coords = nth_disk_coord(index);
        let id = format!("hex_{index}");
        let mut tiles = std::mem::take(&mut self.state.territories).into_vec();
        tiles.push(Territory {
            id: id.clone(),
            coords,
            owner: None,
            resource_type,
            production_rate,
            defense_level,
        });
        self.state.territories = TerritoryRegistry::new(tiles);
        id
    }

    pub fn dao(&mut self, id: &str, name: &str) -> DaoRef<'_> {
        self.state.daos.insert(Dao::new(id, name, "leader"));
        DaoRef {
            scenario: self,
            id: id.to_string(),
        }
    }

    /// Add a mission that is already running since `started`.
    pub fn active_mission(
        &mut self,
        kind: MissionKind,
        dao: &str,
        target: Option<&str>,
        duration_secs: u64,
        rewards: Vec<MissionReward>,
        started: SimTime,
    ) -> MissionId {
        let id = self.id_gen.next_tagged("mission");
        self.state.missions.push(Mission {
            id: id.clone(),
            kind,
            participants: vec![dao.to_string()],
            target: target.map(String::from),
            duration_secs,
            rewards,
            cost: ResourcePool::default(),
            status: MissionStatus::Active,
            start_time: Some(started),
        });
        id
    }

    pub fn clock(&mut self, now: SimTime) -> &mut Self {
        self.state.clock = now;
        self
    }

    pub fn build(mut self) -> GameState {
        self.state.next_id = self.state.next_id.max(self.id_gen.peek());
        self.state.leaderboard = rank_daos(&self.state.daos, &self.state.territories);
        self.state
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

/// The `index`-th coordinate of an unbounded hex disk enumeration.
fn nth_disk_coord(index: usize) -> HexCoord {
    let mut radius = 0;
    while disk_size(radius) <= index {
        radius += 1;
    }
    // Rings are enumerated whole, so walk outward-only coordinates.
    let inner = if radius == 0 { 0 } else { disk_size(radius - 1) };
    hex_disk(radius)
        .into_iter()
        .filter(|c| c.radius() == radius as i32)
        .nth(index - inner)
        .unwrap_or(HexCoord::ORIGIN)
}
