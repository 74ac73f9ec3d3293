use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::model::{
    Activity, Dao, DaoRegistry, GameState, HexCoord, LeaderboardEntry, Mission, MissionKind,
    MissionLog, MissionStatus, ResourcePool, ResourceType, Season, SimTime, Territory,
    TerritoryRegistry, Unit, UnitType, rebuild_back_references,
};

/// Read the saved session back into a [`GameState`].
///
/// Rows come back in their saved order; DAO territory lists are rebuilt
/// from territory owners. A session that cannot run (for instance an empty
/// season) comes back as `sqlx::Error::Decode`.
pub async fn fetch_state(pool: &PgPool) -> Result<GameState, sqlx::Error> {
    let session = sqlx::query(
        "SELECT season_number, season_start, season_end, clock, tick_count, next_id FROM session",
    )
    .fetch_one(pool)
    .await?;
    let season = Season {
        number: session.try_get::<i32, _>("season_number")? as u32,
        start: secs(&session, "season_start")?,
        end: secs(&session, "season_end")?,
    };

    let mut units_by_dao: BTreeMap<String, Vec<Unit>> = BTreeMap::new();
    for row in sqlx::query(
        "SELECT id, dao_id, unit_type, experience, level, current_mission, q, r \
         FROM units ORDER BY seq",
    )
    .fetch_all(pool)
    .await?
    {
        let unit = unit_from_row(&row)?;
        units_by_dao.entry(unit.owner.clone()).or_default().push(unit);
    }

    let mut daos = Vec::new();
    for row in sqlx::query(
        "SELECT id, name, leader, color, level, battles_won, \
                computing, liquidity, community, governance, alliances \
         FROM daos ORDER BY seq",
    )
    .fetch_all(pool)
    .await?
    {
        let id: String = row.try_get("id")?;
        daos.push(Dao {
            units: units_by_dao.remove(&id).unwrap_or_default(),
            name: row.try_get("name")?,
            leader: row.try_get("leader")?,
            color: row.try_get("color")?,
            level: row.try_get::<i32, _>("level")? as u32,
            battles_won: row.try_get::<i32, _>("battles_won")? as u32,
            resources: ResourcePool::new(
                row.try_get("computing")?,
                row.try_get("liquidity")?,
                row.try_get("community")?,
                row.try_get("governance")?,
            ),
            alliances: json_column(&row, "alliances")?,
            territories: Vec::new(),
            id,
        });
    }

    let mut territories = Vec::new();
    for row in sqlx::query(
        "SELECT id, q, r, owner_id, resource_type, production_rate, defense_level \
         FROM territories ORDER BY seq",
    )
    .fetch_all(pool)
    .await?
    {
        let resource: String = row.try_get("resource_type")?;
        territories.push(Territory {
            id: row.try_get("id")?,
            coords: HexCoord::new(row.try_get("q")?, row.try_get("r")?),
            owner: row.try_get("owner_id")?,
            resource_type: parse_text(ResourceType::parse(&resource), "resource_type", &resource)?,
            production_rate: row.try_get::<i32, _>("production_rate")? as u32,
            defense_level: row.try_get::<i32, _>("defense_level")? as u32,
        });
    }

    let mut missions = Vec::new();
    for row in sqlx::query(
        "SELECT id, kind, participants, target_id, duration_secs, rewards, \
                cost_computing, cost_liquidity, cost_community, cost_governance, \
                status, start_time \
         FROM missions ORDER BY seq",
    )
    .fetch_all(pool)
    .await?
    {
        let kind: String = row.try_get("kind")?;
        let status: String = row.try_get("status")?;
        missions.push(Mission {
            id: row.try_get("id")?,
            kind: parse_text(MissionKind::parse(&kind), "kind", &kind)?,
            participants: json_column(&row, "participants")?,
            target: row.try_get("target_id")?,
            duration_secs: row.try_get::<i64, _>("duration_secs")? as u64,
            rewards: json_column(&row, "rewards")?,
            cost: ResourcePool::new(
                row.try_get("cost_computing")?,
                row.try_get("cost_liquidity")?,
                row.try_get("cost_community")?,
                row.try_get("cost_governance")?,
            ),
            status: parse_text(MissionStatus::parse(&status), "status", &status)?,
            start_time: row
                .try_get::<Option<i64>, _>("start_time")?
                .map(|t| SimTime::from_secs(t as u64)),
        });
    }

    let mut leaderboard = Vec::new();
    for row in sqlx::query(
        "SELECT rank, dao_id, score, territories_controlled, battles_won \
         FROM leaderboard ORDER BY rank",
    )
    .fetch_all(pool)
    .await?
    {
        leaderboard.push(LeaderboardEntry {
            dao_id: row.try_get("dao_id")?,
            score: row.try_get::<i64, _>("score")? as u64,
            territories_controlled: row.try_get::<i32, _>("territories_controlled")? as u32,
            battles_won: row.try_get::<i32, _>("battles_won")? as u32,
            rank: row.try_get::<i32, _>("rank")? as u32,
        });
    }

    let mut activity = Vec::new();
    for row in sqlx::query("SELECT at, kind, dao_id, message FROM activity ORDER BY seq")
        .fetch_all(pool)
        .await?
    {
        let kind: String = row.try_get("kind")?;
        activity.push(Activity {
            at: secs(&row, "at")?,
            kind: serde_json::from_value(serde_json::Value::String(kind))
                .map_err(|err| sqlx::Error::Decode(Box::new(err)))?,
            dao: row.try_get("dao_id")?,
            message: row.try_get("message")?,
        });
    }

    let territories = TerritoryRegistry::new(territories);
    let mut daos = DaoRegistry::new(daos);
    rebuild_back_references(&territories, &mut daos);

    let state = GameState {
        season,
        clock: secs(&session, "clock")?,
        tick_count: session.try_get::<i64, _>("tick_count")? as u64,
        next_id: session.try_get::<i64, _>("next_id")? as u64,
        territories,
        daos,
        missions: MissionLog::new(missions),
        leaderboard,
        activity,
    };
    state
        .validate()
        .map_err(|reason| sqlx::Error::Decode(reason.into()))?;
    Ok(state)
}

fn unit_from_row(row: &PgRow) -> Result<Unit, sqlx::Error> {
    let unit_type: String = row.try_get("unit_type")?;
    let q: Option<i32> = row.try_get("q")?;
    let r: Option<i32> = row.try_get("r")?;
    Ok(Unit {
        id: row.try_get("id")?,
        unit_type: parse_text(UnitType::parse(&unit_type), "unit_type", &unit_type)?,
        owner: row.try_get("dao_id")?,
        experience: row.try_get::<i32, _>("experience")? as u32,
        level: row.try_get::<i32, _>("level")? as u32,
        current_mission: row.try_get("current_mission")?,
        position: q.zip(r).map(|(q, r)| HexCoord::new(q, r)),
    })
}

fn secs(row: &PgRow, column: &str) -> Result<SimTime, sqlx::Error> {
    Ok(SimTime::from_secs(row.try_get::<i64, _>(column)? as u64))
}

fn json_column<T: DeserializeOwned>(row: &PgRow, column: &str) -> Result<T, sqlx::Error> {
    let text: String = row.try_get(column)?;
    serde_json::from_str(&text).map_err(|err| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(err),
    })
}

fn parse_text<T>(parsed: Option<T>, column: &str, value: &str) -> Result<T, sqlx::Error> {
    parsed.ok_or_else(|| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("unknown value {value:?}").into(),
    })
}
