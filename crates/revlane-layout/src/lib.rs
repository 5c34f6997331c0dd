#![forbid(unsafe_code)]

//! Revision-history layout engine.
//!
//! This crate turns a flat window of [`Revision`] records into a
//! two-dimensional arrangement for branching commit-graph-style timelines:
//!
//! - [`build_revision_tree_layout`] - graph reconstruction, trunk detection,
//!   and deterministic lane/row assignment
//! - [`TreeLayout`] / [`RevisionTreeNode`] - the computed arrangement
//! - [`markers`] - missing-parent marker extraction for dangling edges
//!
//! The engine is pure: it never mutates its input, allocates all state per
//! call, and always returns a complete layout, degrading gracefully on
//! malformed records (absent ids, parents outside the window).
//!
//! # Example
//!
//! ```
//! use revlane_core::{Revision, SortOrder};
//! use revlane_layout::build_revision_tree_layout;
//!
//! let window = vec![
//!     Revision::new("r1", "2024-01-01T00:00:00Z"),
//!     Revision::new("r2", "2024-01-02T00:00:00Z").with_parent("r1"),
//!     Revision::new("r3", "2024-01-03T00:00:00Z").with_parent("r1"),
//! ];
//!
//! let layout = build_revision_tree_layout(&window, SortOrder::Ascending, None);
//! assert_eq!(layout.lane_count, 2);
//! assert_eq!(layout.nodes[0].id, "r1");
//! assert_eq!(layout.nodes[2].lane, 1);
//! ```
//!
//! # Lane growth
//!
//! Lanes are never released or reused once allocated to a finished branch,
//! so wide histories grow monotonically wide. This mirrors the upstream
//! renderer's expectations and keeps allocation deterministic; callers with
//! very wide windows should narrow them before layout.

pub mod markers;

pub use markers::{MissingParentMarker, missing_parent_markers};
pub use revlane_core::{Revision, SortOrder};

use serde::Serialize;
use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

/// Connector shape between a node and its in-window parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Parent sits in the same lane; the renderer draws a straight line.
    Straight,
    /// Parent sits in a different lane; the renderer draws an elbow.
    Elbow,
}

/// One positioned revision in the computed layout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionTreeNode<'a> {
    /// Resolved identity: the record's own id, or a positional placeholder
    /// when the record carried none.
    pub id: Cow<'a, str>,
    /// Predecessor id as supplied, present in the window or not.
    pub parent_id: Option<&'a str>,
    /// Timestamp the row order was derived from.
    pub time: &'a str,
    /// Display metadata carried through untouched.
    pub status: Option<&'a str>,
    /// Display metadata carried through untouched.
    pub author: Option<&'a str>,
    /// Column index in the rendered graph.
    pub lane: usize,
    /// Position in the time-sorted render order.
    pub row: usize,
    /// Lane of the parent when the parent is present in the window.
    pub parent_lane: Option<usize>,
    /// True iff `parent_id` names a revision absent from the window.
    pub is_missing_parent: bool,
    /// The input record this node was derived from.
    #[serde(skip)]
    pub raw: &'a Revision,
}

impl RevisionTreeNode<'_> {
    /// Connector shape toward the parent.
    ///
    /// `None` when the parent is not in the window; the renderer then
    /// terminates the edge at a [`MissingParentMarker`] instead.
    #[must_use]
    pub fn edge_kind(&self) -> Option<EdgeKind> {
        self.parent_lane.map(|parent_lane| {
            if parent_lane == self.lane {
                EdgeKind::Straight
            } else {
                EdgeKind::Elbow
            }
        })
    }
}

/// Summary of a computed layout, machine-readable for snapshot gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    /// Number of positioned nodes (equals the input window size).
    pub nodes: usize,
    /// Number of lanes in use.
    pub lanes: usize,
    /// Distinct parent ids referenced but absent from the window.
    pub missing_parents: usize,
    /// Length of the trunk chain (0 when no trunk was requested or found).
    pub trunk_len: usize,
}

/// The complete computed arrangement for one revision window.
///
/// Created fresh per [`build_revision_tree_layout`] call and never mutated
/// afterward. Node fields borrow from the caller's window; the layout holds
/// no ownership beyond those borrows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeLayout<'a> {
    /// All nodes in render (row) order.
    pub nodes: Vec<RevisionTreeNode<'a>>,
    /// One more than the maximum lane used; 1 at minimum when any node
    /// exists, 0 for an empty window.
    pub lane_count: usize,
    /// Parent ids referenced by some node but absent from the window.
    pub missing_parent_ids: BTreeSet<String>,
    /// Ids forming the unbroken ancestor chain from the current revision.
    pub trunk_ids: BTreeSet<String>,
}

impl TreeLayout<'_> {
    /// Summarize the layout.
    #[must_use]
    pub fn stats(&self) -> LayoutStats {
        LayoutStats {
            nodes: self.nodes.len(),
            lanes: self.lane_count,
            missing_parents: self.missing_parent_ids.len(),
            trunk_len: self.trunk_ids.len(),
        }
    }
}

/// Lane-assignment policy, chosen per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LanePolicy {
    /// The current revision's ancestor chain is pinned to lane 0; branches
    /// hang off it on fresh lanes.
    TrunkBiased,
    /// No current revision: forest roots claim lanes in ascending time
    /// order.
    FirstSeen,
}

/// Compute the tree layout for a window of revisions.
///
/// Reconstructs parent/child relationships from `parent_id` links, detects
/// the trunk (the ancestor chain of `current_revision_id`, when supplied
/// and present), assigns lanes, and orders rows by timestamp.
///
/// The function is total: malformed input degrades instead of failing.
/// Records without an id get a positional placeholder, parents outside the
/// window become [`TreeLayout::missing_parent_ids`] entries, and an
/// unmatched `current_revision_id` falls back to first-seen lane
/// assignment. Duplicate ids are not defended against; the first occurrence
/// wins the index.
#[must_use]
pub fn build_revision_tree_layout<'a>(
    revisions: &'a [Revision],
    sort_order: SortOrder,
    current_revision_id: Option<&str>,
) -> TreeLayout<'a> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "revision_tree_layout",
        revisions = revisions.len(),
        sort_order = %sort_order,
        has_current = current_revision_id.is_some()
    )
    .entered();

    let n = revisions.len();

    // 1. Normalize identities and index the window.
    let resolved: Vec<Cow<'a, str>> = revisions
        .iter()
        .enumerate()
        .map(|(i, rev)| rev.resolved_id(i))
        .collect();
    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(n);
    for (i, id) in resolved.iter().enumerate() {
        by_id.entry(id.as_ref()).or_insert(i);
    }

    // 2. Resolve parents: adjacency for present ones, markers for absent.
    let mut parent_idx: Vec<Option<usize>> = vec![None; n];
    let mut is_missing = vec![false; n];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut missing_parent_ids = BTreeSet::new();
    let mut roots = Vec::new();
    for (i, rev) in revisions.iter().enumerate() {
        match rev.parent_id.as_deref() {
            Some(parent) => {
                if let Some(&p) = by_id.get(parent) {
                    parent_idx[i] = Some(p);
                    children[p].push(i);
                } else {
                    is_missing[i] = true;
                    missing_parent_ids.insert(parent.to_owned());
                    roots.push(i);
                }
            }
            None => roots.push(i),
        }
    }

    // Ascending time order; stable sort keeps input order on equal times.
    let mut asc_order: Vec<usize> = (0..n).collect();
    asc_order.sort_by(|&a, &b| revisions[a].time.cmp(&revisions[b].time));
    let mut rank = vec![0usize; n];
    for (pos, &i) in asc_order.iter().enumerate() {
        rank[i] = pos;
    }

    // 3. Trunk detection: walk parent links up from the current revision,
    // inclusive of the last ancestor whose parent left the window.
    let mut trunk_order: Vec<usize> = Vec::new();
    let mut on_trunk = vec![false; n];
    if let Some(current) = current_revision_id
        && let Some(&start) = by_id.get(current)
    {
        let mut cursor = Some(start);
        while let Some(i) = cursor {
            if on_trunk[i] {
                // Parent cycle in malformed input; the chain ends here.
                break;
            }
            on_trunk[i] = true;
            trunk_order.push(i);
            cursor = parent_idx[i];
        }
    }

    // 4. Lane assignment.
    let policy = if trunk_order.is_empty() {
        LanePolicy::FirstSeen
    } else {
        LanePolicy::TrunkBiased
    };
    #[cfg(feature = "tracing")]
    tracing::trace!(policy = ?policy, trunk_len = trunk_order.len(), "lane policy selected");

    let mut lanes: Vec<Option<usize>> = vec![None; n];
    let mut next_lane = 0usize;
    match policy {
        LanePolicy::TrunkBiased => {
            for &i in &trunk_order {
                lanes[i] = Some(0);
            }
            next_lane = 1;

            // Branch roots hang off the trunk, most recent trunk node
            // first, each branch's children in ascending time order.
            let mut by_recency = trunk_order.clone();
            by_recency.sort_by_key(|&i| Reverse(rank[i]));
            for &t in &by_recency {
                let mut branches: Vec<usize> = children[t]
                    .iter()
                    .copied()
                    .filter(|&c| lanes[c].is_none())
                    .collect();
                branches.sort_by_key(|&c| rank[c]);
                for &branch in &branches {
                    assign_lanes_from(branch, None, &mut lanes, &children, &rank, &mut next_lane);
                }
            }

            // Forest roots not reachable from the trunk.
            let mut rest: Vec<usize> = roots
                .iter()
                .copied()
                .filter(|&r| lanes[r].is_none())
                .collect();
            rest.sort_by_key(|&r| rank[r]);
            for &root in &rest {
                assign_lanes_from(root, None, &mut lanes, &children, &rank, &mut next_lane);
            }
        }
        LanePolicy::FirstSeen => {
            let mut ordered = roots.clone();
            ordered.sort_by_key(|&r| rank[r]);
            for &root in &ordered {
                assign_lanes_from(root, None, &mut lanes, &children, &rank, &mut next_lane);
            }
        }
    }

    // Completeness sweep: nodes the root/trunk phases could not reach
    // (parent cycles, odd orderings) still claim a lane.
    for &i in &asc_order {
        if lanes[i].is_none() {
            assign_lanes_from(i, None, &mut lanes, &children, &rank, &mut next_lane);
        }
    }

    // The sweep fills every slot.
    let lane_of: Vec<usize> = lanes.into_iter().map(|slot| slot.unwrap_or(0)).collect();
    let lane_count = lane_of.iter().map(|&lane| lane + 1).max().unwrap_or(0);

    // 5. Row order: ascending by time, reversed wholesale for descending.
    let row_order: Vec<usize> = match sort_order {
        SortOrder::Ascending => asc_order,
        SortOrder::Descending => asc_order.into_iter().rev().collect(),
    };

    // 6. Emit nodes in render order.
    let mut trunk_ids = BTreeSet::new();
    for &i in &trunk_order {
        trunk_ids.insert(resolved[i].as_ref().to_owned());
    }
    let nodes = row_order
        .into_iter()
        .enumerate()
        .map(|(row, i)| {
            let rev = &revisions[i];
            RevisionTreeNode {
                id: resolved[i].clone(),
                parent_id: rev.parent_id.as_deref(),
                time: rev.time.as_str(),
                status: rev.status.as_deref(),
                author: rev.author.as_deref(),
                lane: lane_of[i],
                row,
                parent_lane: parent_idx[i].map(|p| lane_of[p]),
                is_missing_parent: is_missing[i],
                raw: rev,
            }
        })
        .collect();

    TreeLayout {
        nodes,
        lane_count,
        missing_parent_ids,
        trunk_ids,
    }
}

/// Assign lanes to a branch with an explicit stack.
///
/// For each visited node, the chronologically-earliest unassigned child
/// continues the node's lane; every later child claims a fresh lane when it
/// is visited. Allocation at visit time keeps lane numbering identical to
/// the recursive formulation while staying safe on arbitrarily deep chains.
fn assign_lanes_from(
    start: usize,
    inherited: Option<usize>,
    lanes: &mut [Option<usize>],
    children: &[Vec<usize>],
    rank: &[usize],
    next_lane: &mut usize,
) {
    let mut stack = vec![(start, inherited)];
    while let Some((node, slot)) = stack.pop() {
        if lanes[node].is_some() {
            continue;
        }
        let lane = match slot {
            Some(lane) => lane,
            None => {
                let fresh = *next_lane;
                *next_lane += 1;
                fresh
            }
        };
        lanes[node] = Some(lane);

        let mut kids: Vec<usize> = children[node]
            .iter()
            .copied()
            .filter(|&c| lanes[c].is_none())
            .collect();
        kids.sort_by_key(|&c| rank[c]);
        // Reverse push so the earliest child is popped (and its whole
        // subtree laid out) before any sibling allocates.
        for (k, &child) in kids.iter().enumerate().rev() {
            stack.push((child, if k == 0 { Some(lane) } else { None }));
        }
    }
}
