use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Cube/axial hex coordinate. `s` is stored explicitly and always equals `-q - r`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

/// The six unit steps around a hex, clockwise from "up".
const DIRECTIONS: [(i32, i32); 6] = [(0, -1), (1, -1), (1, 0), (0, 1), (-1, 1), (-1, 0)];

impl HexCoord {
    pub const ORIGIN: HexCoord = HexCoord { q: 0, r: 0, s: 0 };

    /// Build from axial `(q, r)`, deriving `s`.
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Whether the cube constraint `q + r + s = 0` holds. Coordinates read
    /// back from storage are checked with this.
    pub fn is_valid(&self) -> bool {
        self.q + self.r + self.s == 0
    }

    /// Ring index: `max(|q|, |r|, |s|)`.
    pub fn radius(&self) -> i32 {
        self.q.abs().max(self.r.abs()).max(self.s.abs())
    }

    pub fn distance(&self, other: &HexCoord) -> i32 {
        ((self.q - other.q).abs() + (self.r - other.r).abs() + (self.s - other.s).abs()) / 2
    }

    pub fn neighbors(&self) -> [HexCoord; 6] {
        DIRECTIONS.map(|(dq, dr)| *self + HexCoord::new(dq, dr))
    }
}

impl Add for HexCoord {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        HexCoord::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.s)
    }
}

/// Every coordinate within `radius` of the origin, in `q`-major order:
/// for `q` in `[-N, N]`, `r` in `[max(-N, -q-N), min(N, -q+N)]`.
pub fn hex_disk(radius: u32) -> Vec<HexCoord> {
    let n = radius as i32;
    let mut coords = Vec::with_capacity(disk_size(radius));
    for q in -n..=n {
        let r1 = (-n).max(-q - n);
        let r2 = n.min(-q + n);
        for r in r1..=r2 {
            coords.push(HexCoord::new(q, r));
        }
    }
    coords
}

/// Number of hexes in a disk: `3N² + 3N + 1`.
pub fn disk_size(radius: u32) -> usize {
    let n = radius as usize;
    3 * n * n + 3 * n + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_s() {
        let c = HexCoord::new(2, -3);
        assert_eq!(c.s, 1);
        assert!(c.is_valid());
    }

    #[test]
    fn corrupt_coordinate_is_detected() {
        let c = HexCoord { q: 1, r: 1, s: 1 };
        assert!(!c.is_valid());
    }

    #[test]
    fn distance_between_opposite_corners() {
        let a = HexCoord::new(-2, 0);
        let b = HexCoord::new(2, 0);
        assert_eq!(a.distance(&b), 4);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn neighbors_are_all_one_step_away() {
        let center = HexCoord::new(1, -1);
        for n in center.neighbors() {
            assert!(n.is_valid());
            assert_eq!(center.distance(&n), 1);
        }
    }

    #[test]
    fn disk_of_radius_zero_is_origin() {
        assert_eq!(hex_disk(0), vec![HexCoord::ORIGIN]);
    }

    #[test]
    fn disk_sizes_match_closed_form() {
        for radius in 0..=6 {
            let disk = hex_disk(radius);
            assert_eq!(disk.len(), disk_size(radius));
            assert!(disk.iter().all(|c| c.is_valid() && c.radius() <= radius as i32));
        }
    }

    #[test]
    fn disk_has_no_duplicates() {
        let mut disk = hex_disk(4);
        let before = disk.len();
        disk.sort();
        disk.dedup();
        assert_eq!(disk.len(), before);
    }
}
