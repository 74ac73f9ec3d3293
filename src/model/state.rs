use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::activity::Activity;
use super::dao::DaoRegistry;
use super::leaderboard::LeaderboardEntry;
use super::mission::MissionLog;
use super::territory::TerritoryRegistry;
use super::timestamp::SimTime;
use super::DaoId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub number: u32,
    pub start: SimTime,
    pub end: SimTime,
}

impl Season {
    pub fn first(start: SimTime, length_secs: u64) -> Self {
        Self {
            number: 1,
            start,
            end: start + length_secs,
        }
    }

    pub fn length_secs(&self) -> u64 {
        self.end.since(self.start)
    }

    /// The season immediately following this one, of the same length, or
    /// of `fallback_secs` if this one is empty.
    pub fn next(&self, fallback_secs: u64) -> Self {
        let length = match self.length_secs() {
            0 => fallback_secs.max(1),
            length => length,
        };
        Self {
            number: self.number + 1,
            start: self.end,
            end: self.end + length,
        }
    }
}

/// Complete, self-contained simulation state.
///
/// This is both the read-only snapshot handed to renderers and the unit of
/// persistence: restoring one resumes the tick loop without re-running grid
/// generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub season: Season,
    pub clock: SimTime,
    pub tick_count: u64,
    /// Next value of the shared id counter.
    pub next_id: u64,
    pub territories: TerritoryRegistry,
    pub daos: DaoRegistry,
    pub missions: MissionLog,
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub activity: Vec<Activity>,
}

impl GameState {
    pub fn empty(season: Season) -> Self {
        Self {
            clock: season.start,
            season,
            tick_count: 0,
            next_id: 1,
            territories: TerritoryRegistry::default(),
            daos: DaoRegistry::default(),
            missions: MissionLog::default(),
            leaderboard: Vec::new(),
            activity: Vec::new(),
        }
    }

    /// Reject states the tick loop cannot run: an empty season window, a
    /// coordinate off the cube plane, or a territory owned by an unknown DAO.
    pub fn validate(&self) -> Result<(), String> {
        if self.season.end <= self.season.start {
            return Err(format!(
                "season {} has no length ({} to {})",
                self.season.number, self.season.start, self.season.end
            ));
        }
        for tile in self.territories.iter() {
            if !tile.coords.is_valid() {
                return Err(format!(
                    "territory {} has invalid coordinates ({}, {}, {})",
                    tile.id, tile.coords.q, tile.coords.r, tile.coords.s
                ));
            }
            if let Some(owner) = &tile.owner
                && !self.daos.contains(owner)
            {
                return Err(format!("territory {} owned by unknown dao {owner}", tile.id));
            }
        }
        Ok(())
    }
}

/// Hand `territory` to `new_owner`, keeping both DAOs' back-references in
/// step with the owner field. Returns the previous owner, or `None` if the
/// territory or the new owner does not exist (nothing changes then).
pub fn transfer_territory(
    territories: &mut TerritoryRegistry,
    daos: &mut DaoRegistry,
    territory: &str,
    new_owner: &str,
) -> Option<Option<DaoId>> {
    if !daos.contains(new_owner) {
        return None;
    }
    let tile = territories.get_mut(territory)?;
    let previous = tile.owner.replace(new_owner.to_string());

    if let Some(loser) = previous.as_deref().and_then(|id| daos.get_mut(id)) {
        loser.territories.retain(|t| t != territory);
    }
    if let Some(winner) = daos.get_mut(new_owner)
        && !winner.territories.iter().any(|t| t == territory)
    {
        winner.territories.push(territory.to_string());
    }
    Some(previous)
}

/// Recompute every DAO's territory list from the owner fields.
pub fn rebuild_back_references(territories: &TerritoryRegistry, daos: &mut DaoRegistry) {
    for dao in daos.iter_mut() {
        dao.territories = territories
            .owned_by(&dao.id)
            .map(|t| t.id.clone())
            .collect();
    }
}

/// Check that every DAO's territory list equals the set of territories whose
/// owner is that DAO, and that no territory names an unknown owner.
pub fn verify_ownership(territories: &TerritoryRegistry, daos: &DaoRegistry) -> Result<(), String> {
    for dao in daos.iter() {
        let listed: BTreeSet<&str> = dao.territories.iter().map(String::as_str).collect();
        let owned: BTreeSet<&str> = territories.owned_by(&dao.id).map(|t| t.id.as_str()).collect();
        if listed != owned || listed.len() != dao.territories.len() {
            return Err(format!(
                "dao {} lists {:?} but owns {:?}",
                dao.id, listed, owned
            ));
        }
    }
    for tile in territories.iter() {
        if let Some(owner) = &tile.owner
            && !daos.contains(owner)
        {
            return Err(format!("territory {} owned by unknown dao {owner}", tile.id));
        }
    }
    Ok(())
}
