use serde::{Deserialize, Serialize};

use super::dao::DaoRegistry;
use super::territory::TerritoryRegistry;
use super::DaoId;

pub const SCORE_PER_LEVEL: u64 = 100;
pub const SCORE_PER_TERRITORY: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub dao_id: DaoId,
    pub score: u64,
    pub territories_controlled: u32,
    pub battles_won: u32,
    pub rank: u32,
}

pub fn score(level: u32, territories_controlled: u32) -> u64 {
    u64::from(level) * SCORE_PER_LEVEL + u64::from(territories_controlled) * SCORE_PER_TERRITORY
}

/// Rank every DAO from scratch.
///
/// Territory counts come from the territory registry's owner field, not the
/// DAOs' back-references. Sorted by score descending, ties by DAO id
/// ascending; rank is the 1-based position.
pub fn rank_daos(daos: &DaoRegistry, territories: &TerritoryRegistry) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = daos
        .iter()
        .map(|dao| {
            let controlled = territories.count_owned_by(&dao.id) as u32;
            LeaderboardEntry {
                dao_id: dao.id.clone(),
                score: score(dao.level, controlled),
                territories_controlled: controlled,
                battles_won: dao.battles_won,
                rank: 0,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.dao_id.cmp(&b.dao_id)));
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dao, HexCoord, ResourceType, Territory};

    fn territory(id: &str, owner: Option<&str>) -> Territory {
        Territory {
            id: id.into(),
            coords: HexCoord::ORIGIN,
            owner: owner.map(String::from),
            resource_type: ResourceType::Computing,
            production_rate: 10,
            defense_level: 0,
        }
    }

    fn dao(id: &str, level: u32) -> Dao {
        let mut d = Dao::new(id, id, "leader");
        d.level = level;
        d
    }

    #[test]
    fn level_outweighs_small_holdings() {
        let daos = DaoRegistry::new(vec![dao("a", 2), dao("b", 5)]);
        let territories = TerritoryRegistry::new(vec![
            territory("hex_0", Some("a")),
            territory("hex_1", Some("a")),
            territory("hex_2", Some("a")),
            territory("hex_3", None),
        ]);

        let board = rank_daos(&daos, &territories);
        assert_eq!(board[0].dao_id, "b");
        assert_eq!(board[0].score, 500);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].dao_id, "a");
        assert_eq!(board[1].score, 350);
        assert_eq!(board[1].territories_controlled, 3);
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn ties_break_by_id() {
        let daos = DaoRegistry::new(vec![dao("zeta", 1), dao("alpha", 1), dao("mid", 1)]);
        let board = rank_daos(&daos, &TerritoryRegistry::default());
        let order: Vec<&str> = board.iter().map(|e| e.dao_id.as_str()).collect();
        assert_eq!(order, vec!["alpha", "mid", "zeta"]);
        assert_eq!(board.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn battles_won_is_carried_through() {
        let mut d = dao("a", 1);
        d.battles_won = 4;
        let board = rank_daos(&DaoRegistry::new(vec![d]), &TerritoryRegistry::default());
        assert_eq!(board[0].battles_won, 4);
    }
}
