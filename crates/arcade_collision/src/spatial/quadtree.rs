//! Quadtree spatial partitioning structure
//!
//! Divides a 2D region into hierarchical quadrants for broad-phase collision
//! queries. A leaf splits into four children (NE, NW, SW, SE) once it holds
//! more than `max_objects` objects, unless it already sits at `max_levels`.
//!
//! Nodes live in a slot-map arena and objects are referenced by
//! [`ObjectKey`]. An object whose box straddles a midline is stored in every
//! quadrant it touches, so a reverse lookup (object -> containing leaves) is
//! kept alongside the arena for removal and retrieval.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::foundation::{Aabb, NodeKey, ObjectKey};

/// Objects a leaf may hold before it is considered for a split
pub const MAX_OBJECTS: usize = 10;

/// Maximum split depth (the root is depth 0)
pub const MAX_LEVELS: u32 = 5;

/// Configuration for quadtree behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadtreeConfig {
    /// Maximum objects per leaf before subdivision
    pub max_objects: usize,

    /// Maximum subdivision depth
    pub max_levels: u32,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            max_objects: MAX_OBJECTS,
            max_levels: MAX_LEVELS,
        }
    }
}

/// Quadrant indices in child order
const NE: usize = 0;
const NW: usize = 1;
const SW: usize = 2;
const SE: usize = 3;

/// Single node in the quadtree hierarchy
#[derive(Debug, Clone)]
struct QuadNode {
    bounds: Aabb,
    depth: u32,
    /// Objects stored directly in this node (leaves only)
    objects: Vec<ObjectKey>,
    /// Child nodes in NE, NW, SW, SE order, `None` for a leaf
    children: Option<[NodeKey; 4]>,
}

impl QuadNode {
    fn leaf(bounds: Aabb, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            objects: Vec::new(),
            children: None,
        }
    }
}

/// Which of a node's quadrants a rectangle belongs to
///
/// A box fully on one side of a midline belongs to that side only; a box that
/// straddles a midline belongs to both sides. A box that ends exactly on the
/// midline from the east/south falls to the east/south side so that nothing
/// is ever dropped.
fn quadrant_mask(node_bounds: &Aabb, rect: &Aabb) -> [bool; 4] {
    let mid = node_bounds.center();

    let west = rect.left() < mid.x;
    let east = rect.right() > mid.x || !west;
    let north = rect.top() < mid.y;
    let south = rect.bottom() > mid.y || !north;

    let mut mask = [false; 4];
    mask[NE] = north && east;
    mask[NW] = north && west;
    mask[SW] = south && west;
    mask[SE] = south && east;
    mask
}

/// Quadtree spatial partitioning structure
#[derive(Debug, Clone)]
pub struct Quadtree {
    nodes: SlotMap<NodeKey, QuadNode>,
    root: NodeKey,
    config: QuadtreeConfig,

    /// Bounding box each object was inserted with (needed to redistribute on split)
    boxes: HashMap<ObjectKey, Aabb>,

    /// Reverse lookup: object -> leaves that currently hold it
    lookup: HashMap<ObjectKey, Vec<NodeKey>>,

    /// Objects marked for removal at the next flush
    pending_removals: Vec<ObjectKey>,
}

impl Quadtree {
    /// Create a quadtree over `bounds` with the default limits
    pub fn new(bounds: Aabb) -> Self {
        Self::with_config(bounds, QuadtreeConfig::default())
    }

    /// Create a quadtree over `bounds` with explicit limits
    pub fn with_config(bounds: Aabb, config: QuadtreeConfig) -> Self {
        debug_assert!(!bounds.is_empty(), "quadtree bounds must have positive area: {bounds:?}");

        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(QuadNode::leaf(bounds, 0));
        Self {
            nodes,
            root,
            config,
            boxes: HashMap::new(),
            lookup: HashMap::new(),
            pending_removals: Vec::new(),
        }
    }

    /// Region covered by the root node
    pub fn bounds(&self) -> Aabb {
        self.nodes[self.root].bounds
    }

    /// Active limits
    pub fn config(&self) -> &QuadtreeConfig {
        &self.config
    }

    /// Insert an object into every leaf its box belongs to
    ///
    /// Re-inserting an object that is already present moves it instead.
    /// Returns `true` if the object was not present before.
    pub fn insert(&mut self, key: ObjectKey, bounds: Aabb) -> bool {
        let was_present = self.remove(key);
        self.boxes.insert(key, bounds);
        self.insert_into(self.root, key, bounds);
        !was_present
    }

    /// Remove an object from every node that holds it
    ///
    /// Returns `false` (and does nothing) if the object was not present.
    pub fn remove(&mut self, key: ObjectKey) -> bool {
        let Some(containing) = self.lookup.remove(&key) else {
            return false;
        };

        for node_key in containing {
            if let Some(node) = self.nodes.get_mut(node_key) {
                node.objects.retain(|&object| object != key);
            }
        }
        self.boxes.remove(&key);
        true
    }

    /// Move an object to a new bounding box (remove + insert)
    pub fn update(&mut self, key: ObjectKey, bounds: Aabb) {
        self.remove(key);
        self.insert(key, bounds);
    }

    /// Every other object sharing at least one leaf with `key`
    ///
    /// The result is deduplicated, excludes `key` itself, and keeps the order
    /// in which objects are first encountered. Returns an empty list for an
    /// unknown object.
    pub fn retrieve(&self, key: ObjectKey) -> Vec<ObjectKey> {
        let Some(containing) = self.lookup.get(&key) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for node in containing.iter().filter_map(|&node_key| self.nodes.get(node_key)) {
            for &object in &node.objects {
                if object != key && seen.insert(object) {
                    candidates.push(object);
                }
            }
        }
        candidates
    }

    /// Every object stored in the leaves an area belongs to
    pub fn query_area(&self, area: &Aabb) -> Vec<ObjectKey> {
        let mut seen = HashSet::new();
        let mut results = Vec::new();
        self.collect_area(self.root, area, &mut seen, &mut results);
        results
    }

    /// Drop every node below the root and every stored object
    ///
    /// Pending removals survive a clear; they are applied at the next flush.
    pub fn clear(&mut self) {
        let bounds = self.bounds();
        self.nodes.clear();
        self.root = self.nodes.insert(QuadNode::leaf(bounds, 0));
        self.boxes.clear();
        self.lookup.clear();
    }

    /// Mark an object for removal at the next [`Self::apply_pending_removals`]
    pub fn queue_pending_removal(&mut self, key: ObjectKey) {
        if !self.pending_removals.contains(&key) {
            self.pending_removals.push(key);
        }
    }

    /// Number of removals waiting for a flush
    pub fn pending_removal_count(&self) -> usize {
        self.pending_removals.len()
    }

    /// Remove every queued object and return the keys that were queued
    pub fn apply_pending_removals(&mut self) -> Vec<ObjectKey> {
        let queued = std::mem::take(&mut self.pending_removals);
        for &key in &queued {
            self.remove(key);
        }
        queued
    }

    /// Check if an object is stored in the tree
    pub fn contains(&self, key: ObjectKey) -> bool {
        self.lookup.contains_key(&key)
    }

    /// Number of leaves currently holding `key`
    pub fn node_memberships(&self, key: ObjectKey) -> usize {
        self.lookup.get(&key).map_or(0, Vec::len)
    }

    /// Number of distinct objects stored
    pub fn object_count(&self) -> usize {
        self.boxes.len()
    }

    /// Total number of nodes, branches included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest node level currently present
    pub fn depth(&self) -> u32 {
        self.nodes.values().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Bounds of every leaf (for debug drawing)
    pub fn leaf_bounds(&self) -> Vec<Aabb> {
        self.nodes
            .values()
            .filter(|node| node.children.is_none())
            .map(|node| node.bounds)
            .collect()
    }

    /// Bounds of the leaves holding `key`
    pub fn nodes_containing(&self, key: ObjectKey) -> Vec<Aabb> {
        self.lookup
            .get(&key)
            .into_iter()
            .flatten()
            .filter_map(|&node_key| self.nodes.get(node_key))
            .map(|node| node.bounds)
            .collect()
    }

    fn insert_into(&mut self, node_key: NodeKey, key: ObjectKey, bounds: Aabb) {
        let Some(node) = self.nodes.get_mut(node_key) else {
            return;
        };

        if let Some(children) = node.children {
            let mask = quadrant_mask(&node.bounds, &bounds);
            for (child, _) in children.into_iter().zip(mask).filter(|&(_, hit)| hit) {
                self.insert_into(child, key, bounds);
            }
            return;
        }

        node.objects.push(key);
        let should_split =
            node.objects.len() > self.config.max_objects && node.depth < self.config.max_levels;
        self.lookup.entry(key).or_default().push(node_key);

        if should_split {
            self.split(node_key);
        }
    }

    /// Turn a leaf into a branch and push its objects down into the children
    fn split(&mut self, node_key: NodeKey) {
        let Some(node) = self.nodes.get(node_key) else {
            return;
        };
        let (bounds, depth) = (node.bounds, node.depth);

        let children = bounds
            .quadrants()
            .map(|quadrant| self.nodes.insert(QuadNode::leaf(quadrant, depth + 1)));

        let node = &mut self.nodes[node_key];
        node.children = Some(children);
        let objects = std::mem::take(&mut node.objects);

        log::debug!(
            "Quadtree split at depth {} ({:?}), redistributing {} objects",
            depth,
            bounds,
            objects.len()
        );

        for key in objects {
            if let Some(containing) = self.lookup.get_mut(&key) {
                containing.retain(|&n| n != node_key);
            }
            if let Some(&object_bounds) = self.boxes.get(&key) {
                self.insert_into(node_key, key, object_bounds);
            }
        }
    }

    fn collect_area(
        &self,
        node_key: NodeKey,
        area: &Aabb,
        seen: &mut HashSet<ObjectKey>,
        results: &mut Vec<ObjectKey>,
    ) {
        let Some(node) = self.nodes.get(node_key) else {
            return;
        };

        match node.children {
            Some(children) => {
                let mask = quadrant_mask(&node.bounds, area);
                for (child, _) in children.into_iter().zip(mask).filter(|&(_, hit)| hit) {
                    self.collect_area(child, area, seen, results);
                }
            }
            None => {
                for &object in &node.objects {
                    if seen.insert(object) {
                        results.push(object);
                    }
                }
            }
        }
    }
}
