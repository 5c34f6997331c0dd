#![forbid(unsafe_code)]

//! Missing-parent marker extraction.
//!
//! When a window of history is partially loaded, some nodes reference a
//! parent that is not in the window. The renderer draws a dashed
//! terminator where the real parent node would attach; this module derives
//! one such marker per distinct `(parent id, lane)` pair so a lane never
//! collects duplicate terminators for the same absent ancestor.

use crate::RevisionTreeNode;
use serde::Serialize;
use std::collections::HashSet;

/// A dangling-edge terminator position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingParentMarker {
    /// Id of the ancestor absent from the window.
    pub parent_id: String,
    /// Lane of the child(ren) whose edge the marker terminates.
    pub lane: usize,
}

/// Derive markers from laid-out nodes.
///
/// Scans `nodes` in order and emits a marker the first time each
/// `(parent id, lane)` pair is seen on a node flagged
/// [`is_missing_parent`](RevisionTreeNode::is_missing_parent). Output
/// follows first-encounter order.
#[must_use]
pub fn missing_parent_markers(nodes: &[RevisionTreeNode<'_>]) -> Vec<MissingParentMarker> {
    let mut seen: HashSet<(&str, usize)> = HashSet::new();
    let mut markers = Vec::new();
    for node in nodes {
        if !node.is_missing_parent {
            continue;
        }
        if let Some(parent_id) = node.parent_id
            && seen.insert((parent_id, node.lane))
        {
            markers.push(MissingParentMarker {
                parent_id: parent_id.to_owned(),
                lane: node.lane,
            });
        }
    }
    markers
}
