use std::collections::VecDeque;

use bevy_ecs::resource::Resource;

use crate::model::{Activity, ActivityKind, DaoId, SimTime};

/// Bounded activity feed; the oldest entry falls off once `capacity` is hit.
#[derive(Resource, Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<Activity>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn from_entries(entries: Vec<Activity>, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        for entry in entries {
            log.push_entry(entry);
        }
        log
    }

    pub fn push(
        &mut self,
        at: SimTime,
        kind: ActivityKind,
        dao: Option<&str>,
        message: impl Into<String>,
    ) {
        self.push_entry(Activity {
            at,
            kind,
            dao: dao.map(DaoId::from),
            message: message.into(),
        });
    }

    fn push_entry(&mut self, entry: Activity) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<Activity> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_entries_are_dropped_at_capacity() {
        let mut log = ActivityLog::new(3);
        for i in 0..5u64 {
            log.push(SimTime::from_secs(i), ActivityKind::UnitDeployed, None, format!("#{i}"));
        }
        assert_eq!(log.len(), 3);
        let messages: Vec<_> = log.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, ["#2", "#3", "#4"]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut log = ActivityLog::new(0);
        log.push(SimTime::ZERO, ActivityKind::DaoRegistered, Some("a"), "hello");
        assert!(log.is_empty());
    }

    #[test]
    fn restoring_trims_to_capacity() {
        let entries = (0..10u64)
            .map(|i| Activity {
                at: SimTime::from_secs(i),
                kind: ActivityKind::MissionCompleted,
                dao: None,
                message: i.to_string(),
            })
            .collect();
        let log = ActivityLog::from_entries(entries, 4);
        assert_eq!(log.len(), 4);
        assert_eq!(log.iter().next().unwrap().message, "6");
    }
}
