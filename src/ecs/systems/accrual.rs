//! Resource accrual.
//!
//! Production owed for a tick is recorded in PreUpdate, before any battle
//! can move a territory, and paid out in the Accrual phase. A territory
//! captured this tick still pays its previous owner (if any) once; the
//! captor starts collecting on the next tick.

use bevy_app::App;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use crate::ecs::resources::{Daos, ProductionSnapshot, SimSettings, Territories};
use crate::ecs::schedule::{SimPhase, SimTick};

pub fn add_accrual_systems(app: &mut App) {
    app.add_systems(SimTick, record_production.in_set(SimPhase::PreUpdate));
    app.add_systems(SimTick, accrue_resources.in_set(SimPhase::Accrual));
}

pub fn record_production(
    settings: Res<SimSettings>,
    territories: Res<Territories>,
    mut snapshot: ResMut<ProductionSnapshot>,
) {
    snapshot.0.clear();
    for tile in territories.0.iter() {
        if let Some(owner) = &tile.owner {
            let gain = settings.0.gain_per_tick(tile.production_rate);
            snapshot.0.push((owner.clone(), tile.resource_type, gain));
        }
    }
}

pub fn accrue_resources(snapshot: Res<ProductionSnapshot>, mut daos: ResMut<Daos>) {
    for (owner, resource, gain) in &snapshot.0 {
        if let Some(dao) = daos.0.get_mut(owner) {
            dao.resources.add(*resource, *gain);
        }
    }
}
