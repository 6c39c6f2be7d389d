use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// An event record produced by every effective mutation to the voxel set.
///
/// Hosts drain these to keep mesh instances in sync; the log also supports
/// replay and undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A cell became occupied.
    CellInserted { pos: IVec3 },
    /// A cell was cleared.
    CellRemoved { pos: IVec3 },
}

/// The set of occupied unit cells.
///
/// Membership is a hash lookup. Every cell also carries an insertion
/// sequence number so scans can run in insertion order, which is the
/// tie-break collision resolution depends on.
#[derive(Debug, Clone, Default)]
pub struct VoxelWorld {
    cells: HashMap<IVec3, u64>,
    order: BTreeMap<u64, IVec3>,
    next_seq: u64,
    /// Append-only log of effective mutations.
    event_log: Vec<WorldEvent>,
}

impl VoxelWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flat ground plane at `y = 0` covering
    /// `x, z ∈ [-width/2, width/2)`, inserted row by row along `z`.
    pub fn flat_ground(width: u32) -> Self {
        let mut world = Self::new();
        let half = (width / 2) as i32;
        let lo = -half;
        let hi = width as i32 - half;
        for x in lo..hi {
            for z in lo..hi {
                world.insert(IVec3::new(x, 0, z));
            }
        }
        tracing::debug!(width, cells = world.len(), "generated ground plane");
        world
    }

    /// Whether a cell occupies `pos`.
    pub fn contains(&self, pos: IVec3) -> bool {
        self.cells.contains_key(&pos)
    }

    /// Occupy `pos`. Returns false (and changes nothing) if already occupied.
    pub fn insert(&mut self, pos: IVec3) -> bool {
        if self.cells.contains_key(&pos) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.cells.insert(pos, seq);
        self.order.insert(seq, pos);
        self.event_log.push(WorldEvent::CellInserted { pos });
        true
    }

    /// Clear `pos`. Returns false (and changes nothing) if it was empty.
    pub fn remove(&mut self, pos: IVec3) -> bool {
        let Some(seq) = self.cells.remove(&pos) else {
            return false;
        };
        self.order.remove(&seq);
        self.event_log.push(WorldEvent::CellRemoved { pos });
        true
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Occupied cells in insertion order.
    pub fn cells(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.order.values().copied()
    }

    /// Insertion sequence of the cell at `pos`, if occupied. Lower is older.
    pub fn insertion_seq(&self, pos: IVec3) -> Option<u64> {
        self.cells.get(&pos).copied()
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Rebuild a world from a sequence of events.
    pub fn replay(events: &[WorldEvent]) -> Self {
        let mut world = Self::new();
        for event in events {
            match *event {
                WorldEvent::CellInserted { pos } => {
                    world.insert(pos);
                }
                WorldEvent::CellRemoved { pos } => {
                    world.remove(pos);
                }
            }
        }
        world
    }

    /// FNV-1a digest of the occupied cells in insertion order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &(self.cells.len() as u64).to_le_bytes());
        for pos in self.cells() {
            mix(&mut h, &pos.x.to_le_bytes());
            mix(&mut h, &pos.y.to_le_bytes());
            mix(&mut h, &pos.z.to_le_bytes());
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_starts_empty() {
        let w = VoxelWorld::new();
        assert!(w.is_empty());
        assert!(!w.contains(IVec3::ZERO));
    }

    #[test]
    fn insert_then_contains() {
        let mut w = VoxelWorld::new();
        let p = IVec3::new(2, -1, 5);
        assert!(w.insert(p));
        assert!(w.contains(p));
    }

    #[test]
    fn remove_then_not_contains() {
        let mut w = VoxelWorld::new();
        let p = IVec3::new(0, 3, 0);
        w.insert(p);
        assert!(w.remove(p));
        assert!(!w.contains(p));
    }

    #[test]
    fn double_insert_is_idempotent() {
        let mut once = VoxelWorld::new();
        once.insert(IVec3::ONE);

        let mut twice = VoxelWorld::new();
        assert!(twice.insert(IVec3::ONE));
        assert!(!twice.insert(IVec3::ONE));

        assert_eq!(twice.len(), 1);
        assert_eq!(once.state_hash(), twice.state_hash());
        assert_eq!(twice.events().len(), 1);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut w = VoxelWorld::new();
        assert!(!w.remove(IVec3::ZERO));
        assert!(w.events().is_empty());
    }

    #[test]
    fn flat_ground_spans_half_open_range() {
        let w = VoxelWorld::flat_ground(20);
        assert_eq!(w.len(), 400);
        assert!(w.contains(IVec3::new(-10, 0, -10)));
        assert!(w.contains(IVec3::new(9, 0, 9)));
        assert!(!w.contains(IVec3::new(10, 0, 0)));
        assert!(!w.contains(IVec3::new(0, 1, 0)));
    }

    #[test]
    fn cells_iterate_in_insertion_order() {
        let mut w = VoxelWorld::new();
        let order = [IVec3::new(5, 0, 0), IVec3::new(-3, 1, 0), IVec3::new(0, 0, 7)];
        for p in order {
            w.insert(p);
        }
        assert_eq!(w.cells().collect::<Vec<_>>(), order.to_vec());
    }

    #[test]
    fn reinserted_cell_moves_to_back() {
        let mut w = VoxelWorld::new();
        w.insert(IVec3::X);
        w.insert(IVec3::Y);
        w.remove(IVec3::X);
        w.insert(IVec3::X);
        assert_eq!(w.cells().collect::<Vec<_>>(), vec![IVec3::Y, IVec3::X]);
        assert!(w.insertion_seq(IVec3::Y) < w.insertion_seq(IVec3::X));
    }

    #[test]
    fn drain_events_clears_log() {
        let mut w = VoxelWorld::new();
        w.insert(IVec3::ZERO);
        w.remove(IVec3::ZERO);
        let events = w.drain_events();
        assert_eq!(
            events,
            vec![
                WorldEvent::CellInserted { pos: IVec3::ZERO },
                WorldEvent::CellRemoved { pos: IVec3::ZERO },
            ]
        );
        assert!(w.events().is_empty());
    }

    #[test]
    fn replay_equivalence() {
        let mut w = VoxelWorld::flat_ground(6);
        w.remove(IVec3::new(0, 0, 0));
        w.insert(IVec3::new(1, 1, 1));
        w.insert(IVec3::new(0, 0, 0));

        let replayed = VoxelWorld::replay(w.events());
        assert_eq!(replayed.len(), w.len());
        assert_eq!(replayed.state_hash(), w.state_hash());
    }

    #[test]
    fn state_hash_depends_on_order() {
        let mut a = VoxelWorld::new();
        a.insert(IVec3::X);
        a.insert(IVec3::Z);
        let mut b = VoxelWorld::new();
        b.insert(IVec3::Z);
        b.insert(IVec3::X);
        assert_ne!(a.state_hash(), b.state_hash());
    }
}
