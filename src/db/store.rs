use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::model::{GameState, HexCoord, ResourcePool};

/// Replace the saved session with `state` using COPY FROM STDIN (text format).
///
/// Every table is truncated first, so the database holds exactly one
/// session. Order respects FK constraints: daos → territories → missions →
/// units, then leaderboard and activity. The truncate and all copies run in
/// one transaction; on any error the previously saved session is untouched.
pub async fn save_state(pool: &PgPool, state: &GameState) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::raw_sql(
        "TRUNCATE session, daos, territories, missions, units, leaderboard, activity",
    )
    .execute(&mut *tx)
    .await?;

    // Session
    {
        let buf = format!(
            "{}\t{}\t{}\t{}\t{}\t{}\n",
            state.season.number,
            state.season.start.as_secs(),
            state.season.end.as_secs(),
            state.clock.as_secs(),
            state.tick_count,
            state.next_id,
        );
        copy_in(&mut tx, include_str!("../../sql/copy_session.sql"), &buf).await?;
    }

    // DAOs (before territories and units due to FK)
    {
        let mut buf = String::new();
        for (seq, dao) in state.daos.iter().enumerate() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                seq,
                escape(&dao.id),
                escape(&dao.name),
                escape(&dao.leader),
                escape(&dao.color),
                dao.level,
                dao.battles_won,
                pool_columns(&dao.resources),
                escape(&json_text(&dao.alliances)),
            ));
        }
        copy_in(&mut tx, include_str!("../../sql/copy_daos.sql"), &buf).await?;
    }

    // Territories
    {
        let mut buf = String::new();
        for (seq, tile) in state.territories.iter().enumerate() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                seq,
                escape(&tile.id),
                tile.coords.q,
                tile.coords.r,
                opt_text(tile.owner.as_deref()),
                tile.resource_type.as_str(),
                tile.production_rate,
                tile.defense_level,
            ));
        }
        copy_in(&mut tx, include_str!("../../sql/copy_territories.sql"), &buf).await?;
    }

    // Missions (before units due to FK)
    {
        let mut buf = String::new();
        for (seq, mission) in state.missions.iter().enumerate() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                seq,
                escape(&mission.id),
                mission.kind.as_str(),
                escape(&json_text(&mission.participants)),
                opt_text(mission.target.as_deref()),
                mission.duration_secs,
                escape(&json_text(&mission.rewards)),
                pool_columns(&mission.cost),
                mission.status.as_str(),
                opt_u64(mission.start_time.map(|t| t.as_secs())),
            ));
        }
        copy_in(&mut tx, include_str!("../../sql/copy_missions.sql"), &buf).await?;
    }

    // Units
    {
        let mut buf = String::new();
        let units = state.daos.iter().flat_map(|dao| dao.units.iter());
        for (seq, unit) in units.enumerate() {
            let (q, r) = position_columns(unit.position);
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                seq,
                escape(&unit.id),
                escape(&unit.owner),
                unit.unit_type.as_str(),
                unit.experience,
                unit.level,
                opt_text(unit.current_mission.as_deref()),
                q,
                r,
            ));
        }
        copy_in(&mut tx, include_str!("../../sql/copy_units.sql"), &buf).await?;
    }

    // Leaderboard
    {
        let mut buf = String::new();
        for entry in &state.leaderboard {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                entry.rank,
                escape(&entry.dao_id),
                entry.score,
                entry.territories_controlled,
                entry.battles_won,
            ));
        }
        copy_in(&mut tx, include_str!("../../sql/copy_leaderboard.sql"), &buf).await?;
    }

    // Activity
    {
        let mut buf = String::new();
        for (seq, activity) in state.activity.iter().enumerate() {
            buf.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                seq,
                activity.at.as_secs(),
                escape(&enum_str(&activity.kind)),
                opt_text(activity.dao.as_deref()),
                escape(&activity.message),
            ));
        }
        copy_in(&mut tx, include_str!("../../sql/copy_activity.sql"), &buf).await?;
    }

    tx.commit().await?;
    tracing::info!(
        territories = state.territories.len(),
        daos = state.daos.len(),
        missions = state.missions.len(),
        "saved game state to postgres"
    );
    Ok(())
}

/// Execute a COPY FROM STDIN with the given text-format payload.
async fn copy_in(
    conn: &mut PgConnection,
    statement: &str,
    data: &str,
) -> Result<(), sqlx::Error> {
    if data.is_empty() {
        return Ok(());
    }
    let mut copy = conn.copy_in_raw(statement).await?;
    copy.send(data.as_bytes()).await?;
    copy.finish().await?;
    Ok(())
}

/// Escape a string for Postgres COPY text format.
/// Backslash must be escaped first, then the special whitespace characters.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Render an optional string as a COPY text value (`\N` for NULL).
fn opt_text(v: Option<&str>) -> String {
    match v {
        Some(s) => escape(s),
        None => "\\N".to_string(),
    }
}

fn opt_u64(v: Option<u64>) -> String {
    match v {
        Some(n) => n.to_string(),
        None => "\\N".to_string(),
    }
}

fn position_columns(position: Option<HexCoord>) -> (String, String) {
    match position {
        Some(c) => (c.q.to_string(), c.r.to_string()),
        None => ("\\N".to_string(), "\\N".to_string()),
    }
}

/// The four pool amounts as adjacent tab-separated columns.
fn pool_columns(pool: &ResourcePool) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        pool.computing, pool.liquidity, pool.community, pool.governance
    )
}

fn json_text<T: Serialize + ?Sized>(val: &T) -> String {
    serde_json::to_string(val).expect("plain data serializes")
}

/// Serialize a serde enum variant to its snake_case string (strips JSON quotes).
fn enum_str<T: Serialize>(val: &T) -> String {
    let json = json_text(val);
    // serde_json wraps string enums in quotes: "\"value\""
    json[1..json.len() - 1].to_string()
}
