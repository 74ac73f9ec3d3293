use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::model::{
    DaoRegistry, GameState, MissionLog, Season, SimTime, TerritoryRegistry,
    rebuild_back_references,
};

/// Scalar session fields, written as the single line of `session.jsonl`.
#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    season: Season,
    clock: SimTime,
    tick_count: u64,
    next_id: u64,
}

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Read every non-empty line of a JSONL file. A missing file reads as empty.
fn read_jsonl<T: DeserializeOwned>(path: &Path) -> io::Result<Vec<T>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };
    let mut items = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        items.push(serde_json::from_str(&line)?);
    }
    Ok(items)
}

/// Flush a game state to JSONL files in the given output directory.
///
/// Creates the output directory if it does not exist. Writes 6 files:
/// - `session.jsonl`: season, clock, tick count, id counter (one line)
/// - `territories.jsonl`: one Territory per line, in generation order
/// - `daos.jsonl`: one Dao per line with its units and pool
/// - `missions.jsonl`: one Mission per line, in creation order
/// - `leaderboard.jsonl`: one LeaderboardEntry per line, by rank
/// - `activity.jsonl`: the activity feed, oldest first
pub fn flush_to_jsonl(state: &GameState, output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;

    let session = SessionRecord {
        season: state.season,
        clock: state.clock,
        tick_count: state.tick_count,
        next_id: state.next_id,
    };
    write_jsonl(&output_dir.join("session.jsonl"), std::iter::once(&session))?;
    write_jsonl(
        &output_dir.join("territories.jsonl"),
        state.territories.iter(),
    )?;
    write_jsonl(&output_dir.join("daos.jsonl"), state.daos.iter())?;
    write_jsonl(&output_dir.join("missions.jsonl"), state.missions.iter())?;
    write_jsonl(
        &output_dir.join("leaderboard.jsonl"),
        state.leaderboard.iter(),
    )?;
    write_jsonl(&output_dir.join("activity.jsonl"), state.activity.iter())?;

    tracing::debug!(
        dir = %output_dir.display(),
        territories = state.territories.len(),
        daos = state.daos.len(),
        missions = state.missions.len(),
        "flushed game state"
    );
    Ok(())
}

/// Read back a directory written by [`flush_to_jsonl`].
///
/// DAO territory lists are recomputed from the territory owners, so a
/// hand-edited `territories.jsonl` cannot leave them out of step. A state
/// that fails [`GameState::validate`] (off-plane coordinates, an empty
/// season, an unknown owner) is rejected as `InvalidData`.
pub fn load_from_jsonl(input_dir: &Path) -> io::Result<GameState> {
    let session: SessionRecord = read_jsonl(&input_dir.join("session.jsonl"))?
        .into_iter()
        .next()
        .ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "session.jsonl has no record")
        })?;

    let territories = TerritoryRegistry::new(read_jsonl(&input_dir.join("territories.jsonl"))?);
    let mut daos = DaoRegistry::new(read_jsonl(&input_dir.join("daos.jsonl"))?);
    rebuild_back_references(&territories, &mut daos);

    let state = GameState {
        season: session.season,
        clock: session.clock,
        tick_count: session.tick_count,
        next_id: session.next_id,
        territories,
        daos,
        missions: MissionLog::new(read_jsonl(&input_dir.join("missions.jsonl"))?),
        leaderboard: read_jsonl(&input_dir.join("leaderboard.jsonl"))?,
        activity: read_jsonl(&input_dir.join("activity.jsonl"))?,
    };
    state
        .validate()
        .map_err(|reason| io::Error::new(io::ErrorKind::InvalidData, reason))?;
    Ok(state)
}
