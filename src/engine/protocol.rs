//! The identity/mission protocol the engine talks to, and a simulated
//! implementation with network-like latency and a fixed failure rate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::ProtocolError;
use crate::model::{DaoId, UnitId, UnitType};

/// What the protocol reports for a completed mission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardSet {
    pub xp: u32,
    pub tokens: u32,
    pub traits: Vec<String>,
}

/// Remote identity and mission bookkeeping.
///
/// Every call may fail independently of the simulation; a failure means
/// nothing was created or recorded remotely and the call may be retried.
#[async_trait]
pub trait ProtocolClient: Send + Sync {
    async fn create_entity(&self, name: &str) -> Result<DaoId, ProtocolError>;

    async fn create_unit(
        &self,
        entity: &str,
        name: &str,
        kind: UnitType,
    ) -> Result<UnitId, ProtocolError>;

    /// `Ok(false)` is a clean refusal; the mission must stay pending.
    async fn start_remote_mission(
        &self,
        mission: &str,
        unit: Option<&str>,
    ) -> Result<bool, ProtocolError>;

    async fn complete_remote_mission(&self, mission: &str) -> Result<RewardSet, ProtocolError>;
}

/// In-process stand-in for the protocol.
pub struct SimulatedProtocol {
    latency: Duration,
    failure_rate: f64,
    rng: Mutex<SmallRng>,
    next_id: AtomicU64,
}

impl SimulatedProtocol {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(800);
    pub const DEFAULT_FAILURE_RATE: f64 = 0.1;

    pub fn new(seed: u64, latency: Duration, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
            next_id: AtomicU64::new(1),
        }
    }

    /// No latency, never fails.
    pub fn instant(seed: u64) -> Self {
        Self::new(seed, Duration::ZERO, 0.0)
    }

    fn fails(&self) -> bool {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_bool(self.failure_rate)
    }

    fn issue(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    async fn round_trip(&self, call: &'static str) -> Result<(), ProtocolError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fails() {
            tracing::warn!(call, "simulated protocol failure");
            return Err(ProtocolError::Timeout { call });
        }
        Ok(())
    }
}

impl Default for SimulatedProtocol {
    fn default() -> Self {
        Self::new(42, Self::DEFAULT_LATENCY, Self::DEFAULT_FAILURE_RATE)
    }
}

#[async_trait]
impl ProtocolClient for SimulatedProtocol {
    async fn create_entity(&self, name: &str) -> Result<DaoId, ProtocolError> {
        self.round_trip("createEntity").await?;
        let id = self.issue("profile");
        tracing::debug!(%id, name, "entity created");
        Ok(id)
    }

    async fn create_unit(
        &self,
        entity: &str,
        name: &str,
        kind: UnitType,
    ) -> Result<UnitId, ProtocolError> {
        self.round_trip("createUnit").await?;
        let id = self.issue("char");
        tracing::debug!(%id, entity, name, %kind, "unit created");
        Ok(id)
    }

    async fn start_remote_mission(
        &self,
        mission: &str,
        unit: Option<&str>,
    ) -> Result<bool, ProtocolError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let accepted = !self.fails();
        tracing::debug!(mission, unit = unit.unwrap_or("-"), accepted, "remote mission start");
        Ok(accepted)
    }

    async fn complete_remote_mission(&self, mission: &str) -> Result<RewardSet, ProtocolError> {
        self.round_trip("completeRemoteMission").await?;
        tracing::debug!(mission, "remote mission completed");
        Ok(RewardSet {
            xp: 100,
            tokens: 50,
            traits: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn instant_protocol_always_succeeds() {
        let protocol = SimulatedProtocol::instant(1);
        let a = protocol.create_entity("Alpha").await.unwrap();
        let b = protocol.create_unit(&a, "scout", UnitType::Degen).await.unwrap();
        assert_ne!(a, b);
        assert!(protocol.start_remote_mission("mission_1", Some(&b)).await.unwrap());
        assert_eq!(
            protocol.complete_remote_mission("mission_1").await.unwrap().xp,
            100
        );
    }

    #[tokio::test]
    async fn certain_failure_reports_timeout() {
        let protocol = SimulatedProtocol::new(1, Duration::ZERO, 1.0);
        assert_eq!(
            protocol.create_entity("Alpha").await.unwrap_err(),
            ProtocolError::Timeout {
                call: "createEntity"
            }
        );
        assert!(!protocol.start_remote_mission("mission_1", None).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_simulated() {
        let protocol = SimulatedProtocol::new(1, Duration::from_millis(800), 0.0);
        let started = tokio::time::Instant::now();
        protocol.create_entity("Alpha").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(800));
    }
}
