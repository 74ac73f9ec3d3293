use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::EngineConfig;
use crate::ecs::{CommandOutcome, SimCommand};
use crate::error::{ProtocolError, RefKind, SimError, SimResult};
use crate::model::{DaoId, GameState, MissionId, UnitId};
use crate::simulation::{Simulation, TickReport};

use super::TickMode;
use super::protocol::{ProtocolClient, RewardSet};

/// Read-only checks a handle runs before making a protocol call.
#[derive(Debug)]
pub(crate) enum Check {
    Dao(DaoId),
    Start {
        mission: MissionId,
        unit: Option<UnitId>,
    },
}

pub(crate) enum Request {
    Apply {
        command: SimCommand,
        reply: oneshot::Sender<SimResult<CommandOutcome>>,
    },
    Validate {
        check: Check,
        reply: oneshot::Sender<SimResult<()>>,
    },
    Tick {
        reply: oneshot::Sender<TickReport>,
    },
    Snapshot {
        reply: oneshot::Sender<GameState>,
    },
    /// Answered once no settlement call is in flight.
    Settled {
        reply: oneshot::Sender<()>,
    },
    Shutdown {
        reply: oneshot::Sender<GameState>,
    },
}

struct SettlementResult {
    mission: MissionId,
    result: Result<RewardSet, ProtocolError>,
}

struct Actor {
    sim: Simulation,
    protocol: Arc<dyn ProtocolClient>,
    settled_tx: mpsc::UnboundedSender<SettlementResult>,
    waiters: Vec<oneshot::Sender<()>>,
}

/// Body of the simulation thread. Returns when every handle is dropped or
/// a shutdown request arrives.
pub(crate) async fn run(
    state: GameState,
    config: EngineConfig,
    protocol: Arc<dyn ProtocolClient>,
    tick_mode: TickMode,
    mut requests: mpsc::Receiver<Request>,
) {
    let period = Duration::from_secs(config.tick_secs);
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel();
    let sim = match Simulation::new(state, config) {
        Ok(sim) => sim,
        Err(err) => {
            tracing::error!(error = %err, "simulation actor could not start");
            return;
        }
    };
    let mut actor = Actor {
        sim,
        protocol,
        settled_tx,
        waiters: Vec::new(),
    };
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let realtime = tick_mode == TickMode::RealTime;
    tracing::info!(?tick_mode, "simulation actor started");

    loop {
        tokio::select! {
            request = requests.recv() => {
                let Some(request) = request else { break };
                if actor.handle(request).is_break() {
                    break;
                }
            }
            Some(settled) = settled_rx.recv() => actor.finish_settlement(settled),
            _ = interval.tick(), if realtime => {
                actor.tick();
            }
        }
    }
    tracing::info!(now = %actor.sim.now(), "simulation actor stopped");
}

impl Actor {
    fn handle(&mut self, request: Request) -> ControlFlow<()> {
        match request {
            Request::Apply { command, reply } => {
                let _ = reply.send(self.sim.apply(command));
            }
            Request::Validate { check, reply } => {
                let _ = reply.send(self.validate(check));
            }
            Request::Tick { reply } => {
                let _ = reply.send(self.tick());
            }
            Request::Snapshot { reply } => {
                let _ = reply.send(self.sim.snapshot());
            }
            Request::Settled { reply } => {
                self.waiters.push(reply);
                self.notify_if_settled();
            }
            Request::Shutdown { reply } => {
                let _ = reply.send(self.sim.snapshot());
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn validate(&self, check: Check) -> SimResult<()> {
        match check {
            Check::Dao(dao) if self.sim.daos().contains(&dao) => Ok(()),
            Check::Dao(dao) => Err(SimError::invalid_ref(RefKind::Dao, dao)),
            Check::Start { mission, unit } => self.sim.validate_start(&mission, unit.as_deref()),
        }
    }

    fn tick(&mut self) -> TickReport {
        let report = self.sim.tick();
        for mission in self.sim.take_due_settlements() {
            let protocol = Arc::clone(&self.protocol);
            let settled_tx = self.settled_tx.clone();
            tokio::spawn(async move {
                let result = protocol.complete_remote_mission(&mission).await;
                let _ = settled_tx.send(SettlementResult { mission, result });
            });
        }
        report
    }

    fn finish_settlement(&mut self, settled: SettlementResult) {
        let SettlementResult { mission, result } = settled;
        match result {
            Ok(rewards) => {
                tracing::debug!(
                    %mission,
                    xp = rewards.xp,
                    tokens = rewards.tokens,
                    "protocol confirmed mission"
                );
                let settle = SimCommand::SettleMission {
                    mission: mission.clone(),
                };
                if let Err(err) = self.sim.apply(settle) {
                    tracing::warn!(
                        %mission,
                        error = %err,
                        "confirmed mission could not be settled"
                    );
                }
            }
            Err(err) => {
                tracing::warn!(%mission, error = %err, "mission settlement failed, will retry");
            }
        }
        self.sim.release_settlement(&mission);
        self.notify_if_settled();
    }

    fn notify_if_settled(&mut self) {
        if self.sim.settlements_in_flight() > 0 {
            return;
        }
        for waiter in self.waiters.drain(..) {
            let _ = waiter.send(());
        }
    }
}
