/// Monotonic ID generator shared across all object kinds.
/// Guarantees globally unique IDs: no two objects of any kind share a number,
/// so `dao_3` and `unit_3` never both exist.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Resume numbering after a reload.
    pub fn starting_from(start: u64) -> Self {
        Self { next: start }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Next id rendered as `{prefix}_{n}`.
    pub fn next_tagged(&mut self, prefix: &str) -> String {
        format!("{prefix}_{}", self.next_id())
    }

    /// The value the next call to [`next_id`](Self::next_id) will return.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids() {
        let mut id_gen = IdGenerator::new();
        assert_eq!(id_gen.next_id(), 1);
        assert_eq!(id_gen.next_id(), 2);
        assert_eq!(id_gen.next_id(), 3);
    }

    #[test]
    fn starting_from() {
        let mut id_gen = IdGenerator::starting_from(100);
        assert_eq!(id_gen.next_id(), 100);
        assert_eq!(id_gen.next_id(), 101);
    }

    #[test]
    fn tagged_ids_share_one_counter() {
        let mut id_gen = IdGenerator::new();
        assert_eq!(id_gen.next_tagged("unit"), "unit_1");
        assert_eq!(id_gen.next_tagged("mission"), "mission_2");
        assert_eq!(id_gen.peek(), 3);
    }
}
