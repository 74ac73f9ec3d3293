//! Async front end to the simulation.
//!
//! [`Engine`] is a cheap, cloneable handle. The [`Simulation`] itself lives
//! on a dedicated thread running a current-thread tokio runtime; requests
//! reach it over a bounded channel and are applied one at a time, never
//! during a tick. Protocol calls run on the caller's side of the channel,
//! so a slow or failing protocol never stalls the tick loop.
//!
//! [`Simulation`]: crate::simulation::Simulation

pub(crate) mod actor;
pub mod protocol;

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::config::EngineConfig;
use crate::ecs::{CommandOutcome, MissionRequest, SimCommand};
use crate::error::{ProtocolError, SetupError, SimError, SimResult};
use crate::model::{DaoId, GameState, HexCoord, MissionId, TerritoryId, UnitId, UnitType};
use crate::simulation::{TickReport, check_setup};

use actor::{Check, Request};

pub use protocol::{ProtocolClient, RewardSet, SimulatedProtocol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMode {
    /// Tick only when [`Engine::tick`] is called.
    Manual,
    /// Tick every `tick_secs` of wall-clock time.
    RealTime,
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub tick_mode: TickMode,
    /// Requests that may wait in the channel before senders block.
    pub queue_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            tick_mode: TickMode::RealTime,
            queue_depth: 64,
        }
    }
}

#[derive(Clone)]
pub struct Engine {
    requests: mpsc::Sender<Request>,
    protocol: Arc<dyn ProtocolClient>,
}

impl Engine {
    /// Start the simulation thread. The config and state are checked here,
    /// so a handle is only returned for a simulation that can run.
    pub fn spawn(
        state: GameState,
        config: EngineConfig,
        protocol: Arc<dyn ProtocolClient>,
        options: EngineOptions,
    ) -> Result<Self, SetupError> {
        check_setup(&state, &config)?;
        let (requests, rx) = mpsc::channel(options.queue_depth.max(1));
        let actor_protocol = Arc::clone(&protocol);
        std::thread::Builder::new()
            .name("dao-arena-sim".into())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        tracing::error!(error = %err, "failed to start simulation runtime");
                        return;
                    }
                };
                runtime.block_on(actor::run(state, config, actor_protocol, options.tick_mode, rx));
            })?;
        Ok(Self { requests, protocol })
    }

    async fn call<T>(&self, request: impl FnOnce(oneshot::Sender<T>) -> Request) -> SimResult<T> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(request(reply))
            .await
            .map_err(|_| SimError::EngineStopped)?;
        response.await.map_err(|_| SimError::EngineStopped)
    }

    async fn apply(&self, command: SimCommand) -> SimResult<CommandOutcome> {
        self.call(|reply| Request::Apply { command, reply }).await?
    }

    async fn validate(&self, check: Check) -> SimResult<()> {
        self.call(|reply| Request::Validate { check, reply }).await?
    }

    /// Create the DAO's identity through the protocol, then register it
    /// with the starting resource pool.
    pub async fn register_dao(&self, name: &str, leader: &str) -> SimResult<DaoId> {
        let id = self
            .protocol
            .create_entity(name)
            .await
            .inspect_err(|err| tracing::warn!(name, error = %err, "createEntity failed"))?;
        let outcome = self
            .apply(SimCommand::RegisterDao {
                id,
                name: name.to_string(),
                leader: leader.to_string(),
            })
            .await?;
        Ok(outcome.into_id())
    }

    /// Create a unit through the protocol and attach it to `dao` for free.
    pub async fn create_unit(&self, dao: &str, name: &str, kind: UnitType) -> SimResult<UnitId> {
        self.validate(Check::Dao(dao.to_string())).await?;
        let unit = self
            .protocol
            .create_unit(dao, name, kind)
            .await
            .inspect_err(|err| tracing::warn!(dao, error = %err, "createUnit failed"))?;
        let outcome = self
            .apply(SimCommand::AddUnit {
                dao: dao.to_string(),
                unit,
                unit_type: kind,
            })
            .await?;
        Ok(outcome.into_id())
    }

    /// Pay the deployment cost and add a unit. Local only.
    pub async fn deploy_unit(
        &self,
        dao: &str,
        unit_type: UnitType,
        position: Option<HexCoord>,
    ) -> SimResult<UnitId> {
        let outcome = self
            .apply(SimCommand::DeployUnit {
                dao: dao.to_string(),
                unit_type,
                position,
            })
            .await?;
        Ok(outcome.into_id())
    }

    pub async fn create_mission(&self, request: MissionRequest) -> SimResult<MissionId> {
        Ok(self.apply(SimCommand::CreateMission(request)).await?.into_id())
    }

    /// Start a pending mission: validate locally, ask the protocol, then
    /// debit the cost and activate. A refusal or protocol error leaves the
    /// mission pending.
    pub async fn start_mission(&self, mission: &str, unit: Option<&str>) -> SimResult<()> {
        self.validate(Check::Start {
            mission: mission.to_string(),
            unit: unit.map(String::from),
        })
        .await?;

        let accepted = self
            .protocol
            .start_remote_mission(mission, unit)
            .await
            .inspect_err(|err| tracing::warn!(mission, error = %err, "startRemoteMission failed"))?;
        if !accepted {
            tracing::warn!(mission, "protocol refused mission start");
            return Err(ProtocolError::Rejected {
                call: "startRemoteMission",
                reason: format!("mission {mission} refused"),
            }
            .into());
        }

        self.apply(SimCommand::StartMission {
            mission: mission.to_string(),
            unit: unit.map(String::from),
        })
        .await
        .map(|_| ())
    }

    /// Create and start a standard assault on `territory`. If the start
    /// fails the mission is left pending and its id is lost to the caller,
    /// but it can be found in the snapshot and started again.
    pub async fn initiate_battle(
        &self,
        attacker: &str,
        territory: &str,
        unit: Option<&str>,
    ) -> SimResult<MissionId> {
        let target: TerritoryId = territory.to_string();
        let mission = self
            .create_mission(MissionRequest::battle(attacker, target))
            .await?;
        self.start_mission(&mission, unit).await?;
        Ok(mission)
    }

    /// End an active mission early, without rewards.
    pub async fn recall_mission(&self, mission: &str) -> SimResult<()> {
        self.apply(SimCommand::RecallMission {
            mission: mission.to_string(),
        })
        .await
        .map(|_| ())
    }

    /// Run one tick now. Usually paired with [`TickMode::Manual`].
    pub async fn tick(&self) -> SimResult<TickReport> {
        self.call(|reply| Request::Tick { reply }).await
    }

    /// Wait until every settlement call handed out so far has finished.
    pub async fn settled(&self) -> SimResult<()> {
        self.call(|reply| Request::Settled { reply }).await
    }

    pub async fn snapshot(&self) -> SimResult<GameState> {
        self.call(|reply| Request::Snapshot { reply }).await
    }

    /// Stop the simulation thread and return the final state. Other
    /// handles get `EngineStopped` from then on.
    pub async fn shutdown(self) -> SimResult<GameState> {
        self.call(|reply| Request::Shutdown { reply }).await
    }
}
