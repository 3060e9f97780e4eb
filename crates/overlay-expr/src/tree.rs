//! Flat, level-order binary tree storage and index algebra.
//!
//! A tree is a growable sequence of optional node slots addressed by heap
//! index: slot 0 is the root and slot `i` has children at `2i+1` and `2i+2`.
//! Parent and child are computed relationships, never stored references, so
//! "insert a new ancestor above an existing subtree" reduces to pure index
//! arithmetic on a cloned slot vector.

use crate::ast::Node;
use serde::{Deserialize, Serialize};

/// Level-order index of the parent of `index`, or `None` at the root.
#[must_use]
pub fn parent_index(index: usize) -> Option<usize> {
    // ceil(index / 2) - 1
    if index == 0 {
        None
    } else {
        Some((index + 1) / 2 - 1)
    }
}

#[must_use]
pub fn left_child_index(index: usize) -> usize {
    2 * index + 1
}

#[must_use]
pub fn right_child_index(index: usize) -> usize {
    2 * index + 2
}

/// `floor(log2(x))` for `x >= 1`.
fn floor_log2(x: usize) -> u32 {
    usize::BITS - 1 - x.leading_zeros()
}

/// A binary expression tree packed into a level-order slot vector.
///
/// Slots at indices past the end of the vector are absent, exactly like an
/// explicit `None` inside it. Trees are built once by the parser and never
/// mutated afterwards; every structural operation returns a new tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tree {
    slots: Vec<Option<Node>>,
}

impl Tree {
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    #[must_use]
    pub fn from_slots(slots: Vec<Option<Node>>) -> Self {
        Self { slots }
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<Node>] {
        &self.slots
    }

    /// Number of slots, absent ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The node at `index`, absent slots and out-of-range indices alike
    /// reading as `None`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn root(&self) -> Option<&Node> {
        self.get(0)
    }

    /// The parent node of the slot at `index`, or `None` at the root.
    #[must_use]
    pub fn parent(&self, index: usize) -> Option<&Node> {
        parent_index(index).and_then(|p| self.get(p))
    }

    /// Place a node, growing the vector with absent slots as needed.
    pub fn set(&mut self, index: usize, node: Node) {
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(node);
    }

    /// Returns a new tree in which the slot at `index` is vacated for a new
    /// parent: the node formerly there becomes its left child and every
    /// descendant moves one level deeper, however deep the subtree reaches.
    #[must_use]
    pub fn insert_parent(&self, index: usize) -> Tree {
        let mut slots = self.slots.clone();
        let min_len = right_child_index(index) + 1;
        if slots.len() < min_len {
            slots.resize(min_len, None);
        }
        shift_level_down(&mut slots, index, index + 1);
        Tree { slots }
    }

    /// The left child's subtree as a new, independently zero-indexed tree.
    /// Empty when this tree has fewer than two slots.
    #[must_use]
    pub fn left_subtree(&self) -> Tree {
        let count = left_subtree_len(self.slots.len());
        let slots = (0..count)
            .map(|i| {
                let src = i + (1usize << floor_log2(i + 1));
                self.slots.get(src).cloned().flatten()
            })
            .collect();
        Tree { slots }
    }

    /// The right child's subtree as a new, independently zero-indexed tree.
    /// Empty when this tree has fewer than three slots.
    #[must_use]
    pub fn right_subtree(&self) -> Tree {
        let count = right_subtree_len(self.slots.len());
        let slots = (0..count)
            .map(|i| {
                let src = i + (1usize << (floor_log2(i + 1) + 1));
                self.slots.get(src).cloned().flatten()
            })
            .collect();
        Tree { slots }
    }
}

/// Trailing absent slots are growth padding, not structure: two trees are
/// equal when their populated prefixes match.
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        let trim = |slots: &[Option<Node>]| {
            let end = slots
                .iter()
                .rposition(Option::is_some)
                .map_or(0, |last| last + 1);
            slots[..end].to_vec()
        };
        trim(&self.slots) == trim(&other.slots)
    }
}

/// Move every node in the level range `[lo, hi)`, and via recursion the
/// whole subtree hanging below it, one level deeper: range `[lo, hi)` lands
/// at `[2*lo+1, 2*lo+1 + (hi-lo))`. Deeper levels move first so the
/// destination half of the next level is already vacant. The base case is a
/// range whose entire remaining subtree is empty.
fn shift_level_down(slots: &mut Vec<Option<Node>>, lo: usize, hi: usize) {
    if !range_has_nodes(slots, lo, hi) {
        return;
    }
    shift_level_down(slots, 2 * lo + 1, 2 * hi + 1);
    let width = hi - lo;
    let dest_lo = left_child_index(lo);
    if slots.len() < dest_lo + width {
        slots.resize(dest_lo + width, None);
    }
    for offset in 0..width {
        let node = slots[lo + offset].take();
        slots[dest_lo + offset] = node;
    }
}

/// Whether any slot in the level range `[lo, hi)` or anywhere below it is
/// populated. Terminates because `lo` grows past the vector length.
fn range_has_nodes(slots: &[Option<Node>], lo: usize, hi: usize) -> bool {
    if lo >= slots.len() {
        return false;
    }
    let hi = hi.min(slots.len());
    slots[lo..hi].iter().any(Option::is_some) || range_has_nodes(slots, 2 * lo + 1, 2 * hi + 1)
}

/// How many leading slots of a level-order vector of length `len` belong to
/// the left child's partition. Derived from the shape of a complete binary
/// tree: the fully-populated levels split evenly, and the partial last level
/// fills the left partition before spilling into the right one.
fn left_subtree_len(len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let complete_levels = floor_log2(len + 1);
    let right_complete = (1usize << (complete_levels - 1)) - 1;
    let last_level = len + 1 - (1 << complete_levels);
    let last_level_right = last_level.saturating_sub(1 << (complete_levels - 1));
    len - right_complete - last_level_right - 1
}

fn right_subtree_len(len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    len - left_subtree_len(len) - 1
}
