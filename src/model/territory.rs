use serde::{Deserialize, Serialize};

use super::hex::HexCoord;
use super::resource::ResourceType;
use super::{DaoId, TerritoryId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    pub id: TerritoryId,
    pub coords: HexCoord,
    /// Authoritative owner. `None` means unowned.
    pub owner: Option<DaoId>,
    pub resource_type: ResourceType,
    /// Units produced per production period (one minute).
    pub production_rate: u32,
    pub defense_level: u32,
}

impl Territory {
    pub fn is_owned_by(&self, dao: &str) -> bool {
        self.owner.as_deref() == Some(dao)
    }
}

/// All territories, kept in generation order. Iteration order is the order
/// accrual and any other per-territory pass visit them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerritoryRegistry {
    territories: Vec<Territory>,
}

impl TerritoryRegistry {
    pub fn new(territories: Vec<Territory>) -> Self {
        Self { territories }
    }

    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Territory> {
        self.territories.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Territory> {
        self.territories.iter().find(|t| t.id == id)
    }

    pub fn at(&self, coords: HexCoord) -> Option<&Territory> {
        self.territories.iter().find(|t| t.coords == coords)
    }

    /// Only ownership changes go through here; see
    /// [`transfer_territory`](super::state::transfer_territory).
    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Territory> {
        self.territories.iter_mut().find(|t| t.id == id)
    }

    pub fn owned_by<'a>(&'a self, dao: &'a str) -> impl Iterator<Item = &'a Territory> + 'a {
        self.territories.iter().filter(move |t| t.is_owned_by(dao))
    }

    pub fn count_owned_by(&self, dao: &str) -> usize {
        self.owned_by(dao).count()
    }

    pub fn into_vec(self) -> Vec<Territory> {
        self.territories
    }

    pub fn as_slice(&self) -> &[Territory] {
        &self.territories
    }
}
