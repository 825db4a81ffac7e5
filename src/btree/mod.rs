//! Leaf-storage B+ tree keyed on price, one [`PriceLevel`] per distinct
//! price.
//!
//! One instance exists per book side. All levels live in leaves; internal
//! nodes hold routing keys (copies of a leaf's minimum price) and child
//! indices. Leaves are doubly linked so ordered depth walks cost O(1) per
//! level emitted, with no re-descent from the root.
//!
//! The minimum degree `t` is fixed at construction. Every non-root node
//! holds between `t - 1` and `2t - 1` keys; an internal node with `k` keys
//! has `k + 1` children. The default degree keeps a node's key vector
//! within a few cache lines, which is what makes the descent cheap compared
//! to a binary tree of the same size.

mod node;

use crate::order::{Order, Price};
use crate::pricelevel::PriceLevel;
use node::{Node, NodeId};

/// Default minimum degree. A node then holds up to 63 price keys.
pub const DEFAULT_DEGREE: usize = 32;

/// Traversal direction for level walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Lowest price first (ask-side depth).
    Ascending,
    /// Highest price first (bid-side depth).
    Descending,
}

/// Ordered map from price to [`PriceLevel`], backed by a B+ tree whose
/// nodes live in an index arena.
#[derive(Debug, Clone)]
pub struct PriceTree {
    nodes: Vec<Node>,
    /// Recycled arena slots.
    free: Vec<NodeId>,
    root: NodeId,
    degree: usize,
    /// Number of price levels currently keyed in the leaves.
    len: usize,
}

/// Index of the child subtree that covers `price`.
///
/// Routing key `keys[i]` is the minimum price of `children[i + 1]`, so the
/// covering child is the one after the last key `<= price`.
fn child_index(keys: &[Price], price: Price) -> usize {
    keys.partition_point(|&key| key <= price)
}

impl PriceTree {
    /// Create a tree with [`DEFAULT_DEGREE`].
    pub fn new() -> Self {
        Self::with_degree(DEFAULT_DEGREE)
    }

    /// Create a tree with minimum degree `degree`.
    ///
    /// # Panics
    ///
    /// Panics if `degree < 2`; a B tree needs at least two keys per split.
    pub fn with_degree(degree: usize) -> Self {
        assert!(degree >= 2, "B+ tree minimum degree must be at least 2");
        let mut tree = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: 0,
            degree,
            len: 0,
        };
        tree.root = tree.alloc(Node::default());
        tree
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of distinct price levels in the tree.
    pub fn level_count(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn max_keys(&self) -> usize {
        2 * self.degree - 1
    }

    /// Append `order` to the level at `price`, creating the level if this is
    /// the first order at that price.
    pub fn insert(&mut self, price: Price, order: Order) {
        if self.nodes[self.root].keys.len() == self.max_keys() {
            // Tree height grows only here: the old root becomes the single
            // child of a fresh root and is split immediately.
            let old_root = self.root;
            let new_root = self.alloc(Node::default());
            self.nodes[new_root].children.push(old_root);
            self.root = new_root;
            self.split_child(new_root, 0);
        }

        let mut current = self.root;
        while !self.nodes[current].is_leaf() {
            let mut index = child_index(&self.nodes[current].keys, price);
            let child = self.nodes[current].children[index];
            if self.nodes[child].keys.len() == self.max_keys() {
                self.split_child(current, index);
                // The split pushed a routing key into `current` at `index`;
                // re-pick which half covers the price.
                if price >= self.nodes[current].keys[index] {
                    index += 1;
                }
            }
            current = self.nodes[current].children[index];
        }

        let leaf = &mut self.nodes[current];
        match leaf.keys.binary_search(&price) {
            Ok(i) => leaf.levels[i].append(order),
            Err(i) => {
                leaf.keys.insert(i, price);
                leaf.levels.insert(i, PriceLevel::with_order(price, order));
                self.len += 1;
            }
        }
    }

    /// Look up the level at exactly `price`.
    pub fn level(&self, price: Price) -> Option<&PriceLevel> {
        let leaf = self.leaf_for(price);
        let node = &self.nodes[leaf];
        node.keys
            .binary_search(&price)
            .ok()
            .map(|i| &node.levels[i])
    }

    /// Mutable lookup of the level at exactly `price`.
    pub fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        let leaf = self.leaf_for(price);
        let node = &mut self.nodes[leaf];
        match node.keys.binary_search(&price) {
            Ok(i) => Some(&mut node.levels[i]),
            Err(_) => None,
        }
    }

    pub fn contains(&self, price: Price) -> bool {
        self.level(price).is_some()
    }

    /// Lowest price with a non-empty level.
    pub fn min_price(&self) -> Option<Price> {
        self.iter(Direction::Ascending).next().map(|l| l.price())
    }

    /// Highest price with a non-empty level.
    pub fn max_price(&self) -> Option<Price> {
        self.iter(Direction::Descending).next().map(|l| l.price())
    }

    /// Remove the level at `price`, rebalancing on the way down and
    /// repairing ancestor routing keys so each continues to name the
    /// minimum price of its right subtree.
    pub fn remove_level(&mut self, price: Price) -> Option<PriceLevel> {
        let (removed, _) = self.remove_in(self.root, price);
        if removed.is_some() {
            self.len -= 1;
        }
        // An internal root left with a single child hands the root role to
        // that child, shrinking the tree by one height step. Top-down merges
        // can leave the root like this even when no level was removed.
        if !self.nodes[self.root].is_leaf() && self.nodes[self.root].keys.is_empty() {
            let old_root = self.root;
            self.root = self.nodes[old_root].children[0];
            self.free_node(old_root);
        }
        removed
    }

    /// Walk non-empty levels in price order.
    ///
    /// The walk starts at the extremal leaf and follows the leaf chain, so
    /// emitting `k` levels costs O(tree height + k). Empty levels cannot be
    /// reached from the root when the book prunes correctly, but the walk
    /// skips them anyway rather than trusting that.
    pub fn iter(&self, direction: Direction) -> LevelIter<'_> {
        let leaf = self.edge_leaf(direction);
        let position = match direction {
            Direction::Ascending => 0,
            Direction::Descending => self.nodes[leaf].levels.len(),
        };
        LevelIter {
            tree: self,
            leaf: Some(leaf),
            position,
            direction,
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id] = node;
            id
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    fn free_node(&mut self, id: NodeId) {
        self.nodes[id] = Node::default();
        self.free.push(id);
    }

    /// Descend to the leaf whose key range covers `price`.
    fn leaf_for(&self, price: Price) -> NodeId {
        let mut current = self.root;
        while !self.nodes[current].is_leaf() {
            let index = child_index(&self.nodes[current].keys, price);
            current = self.nodes[current].children[index];
        }
        current
    }

    /// Descend along the first (ascending) or last (descending) child
    /// pointers to the extremal leaf.
    fn edge_leaf(&self, direction: Direction) -> NodeId {
        let mut current = self.root;
        while !self.nodes[current].is_leaf() {
            let node = &self.nodes[current];
            current = match direction {
                Direction::Ascending => node.children[0],
                Direction::Descending => node.children[node.children.len() - 1],
            };
        }
        current
    }

    /// Split the full `index`-th child of `parent`.
    ///
    /// Leaves keep all `2t - 1` levels between the two halves and splice the
    /// new sibling into the leaf chain; the parent receives a copy of the
    /// sibling's minimum price as a routing key. Internal nodes push their
    /// middle key up instead of copying it.
    fn split_child(&mut self, parent: NodeId, index: usize) {
        let t = self.degree;
        let child = self.nodes[parent].children[index];

        if self.nodes[child].is_leaf() {
            let sibling_keys = self.nodes[child].keys.split_off(t - 1);
            let sibling_levels = self.nodes[child].levels.split_off(t - 1);
            let separator = sibling_keys[0];
            let child_next = self.nodes[child].next;

            let sibling = self.alloc(Node {
                keys: sibling_keys,
                levels: sibling_levels,
                children: Vec::new(),
                prev: Some(child),
                next: child_next,
            });
            self.nodes[child].next = Some(sibling);
            if let Some(after) = child_next {
                self.nodes[after].prev = Some(sibling);
            }

            let parent_node = &mut self.nodes[parent];
            parent_node.keys.insert(index, separator);
            parent_node.children.insert(index + 1, sibling);
        } else {
            let mut upper_keys = self.nodes[child].keys.split_off(t - 1);
            let separator = upper_keys.remove(0);
            let upper_children = self.nodes[child].children.split_off(t);

            let sibling = self.alloc(Node {
                keys: upper_keys,
                levels: Vec::new(),
                children: upper_children,
                prev: None,
                next: None,
            });

            let parent_node = &mut self.nodes[parent];
            parent_node.keys.insert(index, separator);
            parent_node.children.insert(index + 1, sibling);
        }
    }

    /// Recursive removal. Returns the removed level and, when the minimum
    /// price of this subtree changed, the new minimum so the caller can
    /// repair its routing key.
    fn remove_in(&mut self, node_id: NodeId, price: Price) -> (Option<PriceLevel>, Option<Price>) {
        if self.nodes[node_id].is_leaf() {
            let node = &mut self.nodes[node_id];
            return match node.keys.binary_search(&price) {
                Ok(i) => {
                    node.keys.remove(i);
                    let level = node.levels.remove(i);
                    let new_min = if i == 0 { node.keys.first().copied() } else { None };
                    (Some(level), new_min)
                }
                Err(_) => (None, None),
            };
        }

        let mut index = child_index(&self.nodes[node_id].keys, price);
        // Guarantee the child we descend into can lose a key without
        // underflowing; top-down fix-up means nothing propagates back up.
        if self.nodes[self.nodes[node_id].children[index]].keys.len() < self.degree {
            index = self.fill_child(node_id, index);
        }
        let child = self.nodes[node_id].children[index];
        let (removed, child_min) = self.remove_in(child, price);

        match child_min {
            Some(min) if index > 0 => {
                self.nodes[node_id].keys[index - 1] = min;
                (removed, None)
            }
            other => (removed, other),
        }
    }

    /// Bring the `index`-th child of `parent` up to at least `t` keys by
    /// borrowing from a rich sibling or merging with a poor one. Returns the
    /// index of the child that now covers the original key range.
    fn fill_child(&mut self, parent: NodeId, index: usize) -> usize {
        let t = self.degree;
        if index > 0 {
            let left = self.nodes[parent].children[index - 1];
            if self.nodes[left].keys.len() >= t {
                self.borrow_from_left(parent, index);
                return index;
            }
        }
        if index + 1 < self.nodes[parent].children.len() {
            let right = self.nodes[parent].children[index + 1];
            if self.nodes[right].keys.len() >= t {
                self.borrow_from_right(parent, index);
                return index;
            }
        }
        if index > 0 {
            self.merge_children(parent, index - 1);
            index - 1
        } else {
            self.merge_children(parent, index);
            index
        }
    }

    fn borrow_from_left(&mut self, parent: NodeId, index: usize) {
        let left = self.nodes[parent].children[index - 1];
        let child = self.nodes[parent].children[index];

        if self.nodes[child].is_leaf() {
            // The left leaf's maximum becomes this leaf's new minimum, and
            // therefore the parent's routing key for it.
            let key = self.nodes[left].keys.pop().unwrap();
            let level = self.nodes[left].levels.pop().unwrap();
            let node = &mut self.nodes[child];
            node.keys.insert(0, key);
            node.levels.insert(0, level);
            self.nodes[parent].keys[index - 1] = key;
        } else {
            // Rotate through the separator: parent key drops into the
            // child, the left sibling's last key rises into the parent.
            let separator = self.nodes[parent].keys[index - 1];
            let key = self.nodes[left].keys.pop().unwrap();
            let grand = self.nodes[left].children.pop().unwrap();
            let node = &mut self.nodes[child];
            node.keys.insert(0, separator);
            node.children.insert(0, grand);
            self.nodes[parent].keys[index - 1] = key;
        }
    }

    fn borrow_from_right(&mut self, parent: NodeId, index: usize) {
        let child = self.nodes[parent].children[index];
        let right = self.nodes[parent].children[index + 1];

        if self.nodes[child].is_leaf() {
            let key = self.nodes[right].keys.remove(0);
            let level = self.nodes[right].levels.remove(0);
            let new_right_min = self.nodes[right].keys[0];
            let node = &mut self.nodes[child];
            node.keys.push(key);
            node.levels.push(level);
            self.nodes[parent].keys[index] = new_right_min;
        } else {
            let separator = self.nodes[parent].keys[index];
            let key = self.nodes[right].keys.remove(0);
            let grand = self.nodes[right].children.remove(0);
            let node = &mut self.nodes[child];
            node.keys.push(separator);
            node.children.push(grand);
            self.nodes[parent].keys[index] = key;
        }
    }

    /// Merge children `index` and `index + 1` of `parent` into the left one.
    fn merge_children(&mut self, parent: NodeId, index: usize) {
        let left = self.nodes[parent].children[index];
        let right = self.nodes[parent].children[index + 1];
        let separator = self.nodes[parent].keys.remove(index);
        self.nodes[parent].children.remove(index + 1);

        if self.nodes[left].is_leaf() {
            // The separator was a copy of the right leaf's minimum; it
            // dissolves with the merge. Unlink the right leaf from the chain.
            let mut keys = std::mem::take(&mut self.nodes[right].keys);
            let mut levels = std::mem::take(&mut self.nodes[right].levels);
            let right_next = self.nodes[right].next;
            let node = &mut self.nodes[left];
            node.keys.append(&mut keys);
            node.levels.append(&mut levels);
            node.next = right_next;
            if let Some(after) = right_next {
                self.nodes[after].prev = Some(left);
            }
        } else {
            let mut keys = std::mem::take(&mut self.nodes[right].keys);
            let mut children = std::mem::take(&mut self.nodes[right].children);
            let node = &mut self.nodes[left];
            node.keys.push(separator);
            node.keys.append(&mut keys);
            node.children.append(&mut children);
        }
        self.free_node(right);
    }
}

impl Default for PriceTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over non-empty levels in price order, driven by the leaf chain.
pub struct LevelIter<'a> {
    tree: &'a PriceTree,
    leaf: Option<NodeId>,
    /// Next index for ascending walks; one past the next index for
    /// descending walks (0 means the current leaf is exhausted).
    position: usize,
    direction: Direction,
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = &'a PriceLevel;

    fn next(&mut self) -> Option<&'a PriceLevel> {
        loop {
            let leaf = self.leaf?;
            let node = &self.tree.nodes[leaf];
            match self.direction {
                Direction::Ascending => {
                    if self.position < node.levels.len() {
                        let level = &node.levels[self.position];
                        self.position += 1;
                        if !level.is_empty() {
                            return Some(level);
                        }
                    } else {
                        self.leaf = node.next;
                        self.position = 0;
                    }
                }
                Direction::Descending => {
                    if self.position > 0 {
                        self.position -= 1;
                        let level = &node.levels[self.position];
                        if !level.is_empty() {
                            return Some(level);
                        }
                    } else {
                        self.leaf = node.prev;
                        if let Some(prev) = node.prev {
                            self.position = self.tree.nodes[prev].levels.len();
                        }
                    }
                }
            }
        }
    }
}
