use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Computing,
    Liquidity,
    Community,
    Governance,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Computing,
        ResourceType::Liquidity,
        ResourceType::Community,
        ResourceType::Governance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Computing => "computing",
            ResourceType::Liquidity => "liquidity",
            ResourceType::Community => "community",
            ResourceType::Governance => "governance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One non-negative amount per resource type.
///
/// Only [`add`](Self::add) and [`spend`](Self::spend) change amounts; `add`
/// ignores negative gains so a pool never shrinks except through an
/// explicit, checked spend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    pub computing: f64,
    pub liquidity: f64,
    pub community: f64,
    pub governance: f64,
}

impl ResourcePool {
    /// The same amount of every resource.
    pub fn uniform(amount: f64) -> Self {
        Self {
            computing: amount,
            liquidity: amount,
            community: amount,
            governance: amount,
        }
    }

    pub fn new(computing: f64, liquidity: f64, community: f64, governance: f64) -> Self {
        Self {
            computing,
            liquidity,
            community,
            governance,
        }
    }

    /// A pool holding `amount` of a single resource.
    pub fn single(resource: ResourceType, amount: f64) -> Self {
        let mut pool = Self::default();
        *pool.slot_mut(resource) = amount;
        pool
    }

    pub fn get(&self, resource: ResourceType) -> f64 {
        match resource {
            ResourceType::Computing => self.computing,
            ResourceType::Liquidity => self.liquidity,
            ResourceType::Community => self.community,
            ResourceType::Governance => self.governance,
        }
    }

    fn slot_mut(&mut self, resource: ResourceType) -> &mut f64 {
        match resource {
            ResourceType::Computing => &mut self.computing,
            ResourceType::Liquidity => &mut self.liquidity,
            ResourceType::Community => &mut self.community,
            ResourceType::Governance => &mut self.governance,
        }
    }

    pub fn add(&mut self, resource: ResourceType, amount: f64) {
        if amount > 0.0 {
            *self.slot_mut(resource) += amount;
        }
    }

    /// First resource in `cost` this pool cannot cover.
    pub fn shortfall(&self, cost: &ResourcePool) -> Option<SimError> {
        ResourceType::ALL.into_iter().find_map(|resource| {
            let required = cost.get(resource);
            let available = self.get(resource);
            (available < required).then_some(SimError::InsufficientResources {
                resource,
                required,
                available,
            })
        })
    }

    pub fn can_afford(&self, cost: &ResourcePool) -> bool {
        self.shortfall(cost).is_none()
    }

    /// Debit `cost` in full, or nothing at all.
    pub fn spend(&mut self, cost: &ResourcePool) -> Result<(), SimError> {
        if let Some(err) = self.shortfall(cost) {
            return Err(err);
        }
        for resource in ResourceType::ALL {
            *self.slot_mut(resource) -= cost.get(resource);
        }
        Ok(())
    }
}
