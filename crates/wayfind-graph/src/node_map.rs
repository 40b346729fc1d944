//! Open-addressing vertex → node table.
//!
//! Nodes live in a dense, insertion-ordered arena; the hash table stores
//! arena positions. Slots are chosen by multiplying the vertex hash with a
//! multiplier that is re-derived on every resize, then taking the top bits.
//! Collisions are resolved by linear probing, and removal shifts the trailing
//! cluster back instead of leaving tombstones.

use std::hash::{BuildHasher, BuildHasherDefault, DefaultHasher, Hash};

use log::debug;

use crate::node::Node;

const EMPTY: u32 = u32::MAX;
const MIN_CAPACITY: usize = 8;
const SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Sizing parameters for a [`NodeMap`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeMapConfig {
    /// Number of vertices to hold before the first resize.
    pub initial_capacity: usize,
    /// Fraction of table slots that may be occupied; clamped into `(0, 1)`.
    pub load_factor: f32,
}

impl Default for NodeMapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            load_factor: 0.5,
        }
    }
}

impl NodeMapConfig {
    /// Number of vertices to make room for up front.
    pub fn with_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Fill ratio that triggers a resize. Values outside `(0, 1)` fall back
    /// to the default of 0.5.
    pub fn with_load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }
}

/// The outcome of [`NodeMap::remove`].
#[derive(Debug)]
pub struct Removal<V> {
    /// The node that was removed.
    pub node: Node<V>,
    /// Arena position the removed node occupied.
    pub index: usize,
    /// Former arena position of the node that was moved into `index`, if any.
    pub moved: Option<usize>,
}

/// Hash table from vertex to [`Node`].
///
/// Invariants: the table length is a power of two, at most one live slot
/// exists per distinct vertex, and `len() < capacity()` always holds.
#[derive(Debug, Clone)]
pub struct NodeMap<V> {
    nodes: Vec<Node<V>>,
    table: Vec<u32>,
    mask: usize,
    shift: u32,
    multiplier: u64,
    load_factor: f32,
    threshold: usize,
    hasher: BuildHasherDefault<DefaultHasher>,
}

impl<V: Hash + Eq> Default for NodeMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Hash + Eq> NodeMap<V> {
    /// Create an empty map with the default configuration.
    pub fn new() -> Self {
        Self::with_config(NodeMapConfig::default())
    }

    /// Create an empty map sized for `config.initial_capacity` vertices.
    pub fn with_config(config: NodeMapConfig) -> Self {
        let load_factor = if config.load_factor > 0.0 && config.load_factor < 1.0 {
            config.load_factor
        } else {
            NodeMapConfig::default().load_factor
        };
        let len = table_len_for(config.initial_capacity, load_factor);
        Self {
            nodes: Vec::with_capacity(config.initial_capacity),
            table: vec![EMPTY; len],
            mask: len - 1,
            shift: 64 - len.trailing_zeros(),
            multiplier: derive_multiplier(SEED, len),
            load_factor,
            threshold: threshold(len, load_factor),
            hasher: BuildHasherDefault::default(),
        }
    }

    /// Number of vertices stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Length of the slot table (always a power of two).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Return the node for `vertex`, creating it if absent.
    ///
    /// Returns the node's arena index and whether it was newly inserted.
    pub fn put(&mut self, vertex: V) -> (usize, bool) {
        let hash = self.hasher.hash_one(&vertex);
        let slot = match self.locate(&vertex, hash) {
            Ok(slot) => return (self.table[slot] as usize, false),
            Err(slot) => slot,
        };
        let slot = if self.nodes.len() >= self.threshold {
            self.resize(self.table.len() * 2);
            self.free_slot(hash)
        } else {
            slot
        };
        let idx = self.nodes.len();
        self.nodes.push(Node::new(vertex, hash));
        self.table[slot] = idx as u32;
        (idx, true)
    }

    /// Arena index of `vertex`.
    pub fn get_index(&self, vertex: &V) -> Option<usize> {
        let hash = self.hasher.hash_one(vertex);
        self.locate(vertex, hash)
            .ok()
            .map(|slot| self.table[slot] as usize)
    }

    /// The node holding `vertex`.
    pub fn get(&self, vertex: &V) -> Option<&Node<V>> {
        self.get_index(vertex).map(|i| &self.nodes[i])
    }

    /// Mutable access to the node holding `vertex`.
    pub fn get_mut(&mut self, vertex: &V) -> Option<&mut Node<V>> {
        self.get_index(vertex).map(|i| &mut self.nodes[i])
    }

    /// Whether `vertex` is present.
    #[inline]
    pub fn contains(&self, vertex: &V) -> bool {
        self.get_index(vertex).is_some()
    }

    /// Remove `vertex` and return its node.
    ///
    /// The arena stays dense: the last node is moved into the freed position
    /// and [`Removal::moved`] reports where it came from, so callers holding
    /// arena handles can rewrite them.
    pub fn remove(&mut self, vertex: &V) -> Option<Removal<V>> {
        let hash = self.hasher.hash_one(vertex);
        let slot = self.locate(vertex, hash).ok()?;
        let index = self.table[slot] as usize;
        self.delete_slot(slot);

        let last = self.nodes.len() - 1;
        let moved = if index != last {
            let s = self.slot_of(last);
            self.table[s] = index as u32;
            Some(last)
        } else {
            None
        };
        let node = self.nodes.swap_remove(index);
        Some(Removal { node, index, moved })
    }

    /// Remove every node, keeping the allocated table.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.table.fill(EMPTY);
    }

    /// Node at arena position `index`.
    #[inline]
    pub fn node(&self, index: usize) -> &Node<V> {
        &self.nodes[index]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, index: usize) -> &mut Node<V> {
        &mut self.nodes[index]
    }

    #[inline]
    pub fn nodes(&self) -> &[Node<V>] {
        &self.nodes
    }

    #[inline]
    pub(crate) fn nodes_mut(&mut self) -> &mut [Node<V>] {
        &mut self.nodes
    }

    /// Nodes in arena order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node<V>> {
        self.nodes.iter()
    }

    /// Reorder the arena so that position `i` holds the node previously at
    /// `order[i]`; every edge handle is rewritten accordingly.
    ///
    /// `order` must be a permutation of `0..len()`.
    pub(crate) fn permute(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.nodes.len());
        let mut new_of_old = vec![0usize; order.len()];
        for (new, &old) in order.iter().enumerate() {
            new_of_old[old] = new;
        }
        let mut slots: Vec<Option<Node<V>>> = self.nodes.drain(..).map(Some).collect();
        self.nodes = order.iter().filter_map(|&old| slots[old].take()).collect();
        for node in self.nodes.iter_mut() {
            for e in node.out.iter_mut() {
                e.to = new_of_old[e.to];
            }
            for s in node.inc.iter_mut() {
                *s = new_of_old[*s];
            }
        }
        self.rebuild();
    }

    // -----------------------------------------------------------------------
    // Table internals
    // -----------------------------------------------------------------------

    #[inline]
    fn place(&self, hash: u64) -> usize {
        (hash.wrapping_mul(self.multiplier) >> self.shift) as usize
    }

    /// `Ok(slot)` holding `vertex`, or `Err(slot)` of the empty slot that
    /// ends its probe sequence.
    fn locate(&self, vertex: &V, hash: u64) -> Result<usize, usize> {
        let mut pos = self.place(hash);
        loop {
            let e = self.table[pos];
            if e == EMPTY {
                return Err(pos);
            }
            let n = &self.nodes[e as usize];
            if n.hash == hash && n.vertex == *vertex {
                return Ok(pos);
            }
            pos = (pos + 1) & self.mask;
        }
    }

    fn free_slot(&self, hash: u64) -> usize {
        let mut pos = self.place(hash);
        while self.table[pos] != EMPTY {
            pos = (pos + 1) & self.mask;
        }
        pos
    }

    /// Slot currently holding arena index `index`.
    fn slot_of(&self, index: usize) -> usize {
        let mut pos = self.place(self.nodes[index].hash);
        while self.table[pos] as usize != index {
            pos = (pos + 1) & self.mask;
        }
        pos
    }

    /// Backward-shift deletion: pull later members of the cluster into the
    /// hole whenever doing so does not move them before their home slot.
    fn delete_slot(&mut self, slot: usize) {
        let mask = self.mask;
        let mut hole = slot;
        let mut i = (slot + 1) & mask;
        loop {
            let e = self.table[i];
            if e == EMPTY {
                break;
            }
            let home = self.place(self.nodes[e as usize].hash);
            if (i.wrapping_sub(home) & mask) >= (i.wrapping_sub(hole) & mask) {
                self.table[hole] = e;
                hole = i;
            }
            i = (i + 1) & mask;
        }
        self.table[hole] = EMPTY;
    }

    fn resize(&mut self, len: usize) {
        self.multiplier = derive_multiplier(self.multiplier, len);
        self.table.clear();
        self.table.resize(len, EMPTY);
        self.mask = len - 1;
        self.shift = 64 - len.trailing_zeros();
        self.threshold = threshold(len, self.load_factor);
        self.rebuild();
        debug!(
            "node map resized to {} slots ({} nodes, multiplier {:#018x})",
            len,
            self.nodes.len(),
            self.multiplier
        );
    }

    fn rebuild(&mut self) {
        self.table.fill(EMPTY);
        for i in 0..self.nodes.len() {
            let s = self.free_slot(self.nodes[i].hash);
            self.table[s] = i as u32;
        }
    }
}

fn table_len_for(capacity: usize, load_factor: f32) -> usize {
    let wanted = (capacity as f32 / load_factor).ceil() as usize;
    wanted.max(MIN_CAPACITY).next_power_of_two()
}

fn threshold(len: usize, load_factor: f32) -> usize {
    ((len as f32 * load_factor) as usize).clamp(1, len - 1)
}

/// Odd multiplier mixed from the previous one and the new table length.
fn derive_multiplier(prev: u64, len: usize) -> u64 {
    let mut z = prev ^ (len as u64).wrapping_mul(SEED);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (z ^ (z >> 31)) | 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::Hasher;

    /// Every value hashes identically, so all keys share one probe cluster.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Colliding(u32);

    impl Hash for Colliding {
        fn hash<H: Hasher>(&self, state: &mut H) {
            state.write_u8(7);
        }
    }

    #[test]
    fn put_returns_existing_node() {
        let mut m = NodeMap::new();
        assert_eq!(m.put("a"), (0, true));
        assert_eq!(m.put("b"), (1, true));
        assert_eq!(m.put("a"), (0, false));
        assert_eq!(m.len(), 2);
        assert_eq!(m.get(&"b").map(|n| *n.vertex()), Some("b"));
        assert!(!m.contains(&"c"));
    }

    #[test]
    fn capacity_stays_power_of_two_while_growing() {
        let mut m = NodeMap::with_config(NodeMapConfig::default().with_capacity(2));
        let start = m.capacity();
        for i in 0..1000 {
            m.put(i);
            assert!(m.capacity().is_power_of_two());
            assert!(m.len() < m.capacity());
        }
        assert!(m.capacity() > start);
        for i in 0..1000 {
            assert_eq!(m.get_index(&i), Some(i as usize));
        }
    }

    #[test]
    fn remove_reports_moved_node() {
        let mut m = NodeMap::new();
        for v in ["a", "b", "c", "d"] {
            m.put(v);
        }
        let r = m.remove(&"b").unwrap();
        assert_eq!(*r.node.vertex(), "b");
        assert_eq!(r.index, 1);
        assert_eq!(r.moved, Some(3));
        assert_eq!(m.get_index(&"d"), Some(1));

        let r = m.remove(&"d").unwrap();
        assert_eq!(r.moved, Some(2));
        let r = m.remove(&"c").unwrap();
        assert_eq!(r.moved, None);
        assert!(m.remove(&"c").is_none());
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn colliding_hashes_survive_remove_and_reinsert() {
        let mut m = NodeMap::new();
        for i in 0..40 {
            m.put(Colliding(i));
        }
        for i in (0..40).step_by(3) {
            assert!(m.remove(&Colliding(i)).is_some());
        }
        for i in 0..40 {
            assert_eq!(m.contains(&Colliding(i)), i % 3 != 0, "key {i}");
        }
        for i in (0..40).step_by(3) {
            assert!(m.put(Colliding(i)).1);
        }
        assert_eq!(m.len(), 40);
        for i in 0..40 {
            let idx = m.get_index(&Colliding(i)).unwrap();
            assert_eq!(m.node(idx).vertex(), &Colliding(i));
        }
    }

    #[test]
    fn clear_keeps_table() {
        let mut m = NodeMap::new();
        for i in 0..100 {
            m.put(i);
        }
        let cap = m.capacity();
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.capacity(), cap);
        assert!(!m.contains(&5));
        assert_eq!(m.put(5), (0, true));
    }

    #[test]
    fn invalid_load_factor_falls_back() {
        let m: NodeMap<i32> = NodeMap::with_config(NodeMapConfig::default().with_load_factor(1.5));
        assert_eq!(m.load_factor(), 0.5);
    }

    #[test]
    fn permute_rewrites_handles() {
        use crate::node::Edge;
        let mut m = NodeMap::new();
        for v in ["a", "b", "c"] {
            m.put(v);
        }
        m.node_mut(0).out.push(Edge { to: 2, weight: 1.0 });
        m.node_mut(2).inc.push(0);
        m.permute(&[2, 1, 0]);
        assert_eq!(m.get_index(&"c"), Some(0));
        assert_eq!(m.get_index(&"a"), Some(2));
        assert_eq!(m.node(2).edges()[0].to(), 0);
        assert_eq!(m.node(0).incoming(), &[2]);
    }
}
