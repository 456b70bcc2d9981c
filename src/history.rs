//! Branchable move history.
//!
//! The tree is rooted in a sentinel node that never holds a move. Each node
//! may carry one realized move, one idea (a reply pre-committed before the
//! opponent's real move exists) and any number of predictions (anticipated
//! replies to the idea). The current line is the path of node ids from the
//! root to the active node; it only ever grows.
//!
//! ```text
//! root
//!  └─ #0 move e2e4
//!      └─ #1 move e7e5
//!          └─ #2 idea g8f6, move g1f3, predictions [b8c6]
//! ```

use crate::rules::MoveRecord;
use std::collections::BTreeMap;
use std::fmt;

/// Creation identifier of a history node.
///
/// Ids come from a per-history counter, so they are unique within a session
/// and strictly increasing in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveNode {
    realized: Option<MoveRecord>,
    idea: Option<MoveRecord>,
    predictions: Vec<MoveRecord>,
    children: BTreeMap<NodeId, MoveNode>,
}

impl MoveNode {
    /// The move actually played at this ply, if it has been played yet.
    pub fn realized(&self) -> Option<&MoveRecord> {
        self.realized.as_ref()
    }

    pub fn idea(&self) -> Option<&MoveRecord> {
        self.idea.as_ref()
    }

    pub fn predictions(&self) -> &[MoveRecord] {
        &self.predictions
    }

    /// Children in creation order.
    pub fn children(&self) -> impl Iterator<Item = (NodeId, &MoveNode)> {
        self.children.iter().map(|(id, node)| (*id, node))
    }

    pub fn child(&self, id: NodeId) -> Option<&MoveNode> {
        self.children.get(&id)
    }

    pub fn is_completed(&self) -> bool {
        self.realized.is_some()
    }

    /// Record the realized move.
    ///
    /// # Panics
    ///
    /// Panics if the node already holds a realized move.
    pub fn set_realized(&mut self, mv: MoveRecord) {
        assert!(
            self.realized.is_none(),
            "history node already holds realized move {}",
            self.realized.as_ref().map(MoveRecord::uci).unwrap_or_default()
        );
        self.realized = Some(mv);
    }

    /// Record the idea move.
    ///
    /// # Panics
    ///
    /// Panics if the node already holds an idea.
    pub fn set_idea(&mut self, mv: MoveRecord) {
        assert!(self.idea.is_none(), "history node already holds an idea");
        self.idea = Some(mv);
    }

    pub fn push_prediction(&mut self, mv: MoveRecord) {
        self.predictions.push(mv);
    }
}

/// The move tree of one session plus the current line into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    root: MoveNode,
    line: Vec<NodeId>,
    next_id: u64,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &MoveNode {
        &self.root
    }

    pub fn line(&self) -> &[NodeId] {
        &self.line
    }

    /// The node the current line ends in (the root when the line is empty).
    ///
    /// # Panics
    ///
    /// Panics if the current line names a node that does not exist. The line
    /// is only extended by [`create_child`](Self::create_child), so this
    /// indicates a bug in the tree bookkeeping.
    pub fn current_node(&self) -> &MoveNode {
        self.line.iter().fold(&self.root, |node, id| {
            node.children
                .get(id)
                .unwrap_or_else(|| panic!("current line references missing node {}", id))
        })
    }

    /// Mutable access to the node the current line ends in.
    ///
    /// # Panics
    ///
    /// Same as [`current_node`](Self::current_node).
    pub fn current_node_mut(&mut self) -> &mut MoveNode {
        let mut node = &mut self.root;
        for id in &self.line {
            node = node
                .children
                .get_mut(id)
                .unwrap_or_else(|| panic!("current line references missing node {}", id));
        }
        node
    }

    /// Deepest node on the current line (the active node included) that holds a
    /// realized move. `None` while nothing has been played.
    pub fn last_completed_node(&self) -> Option<&MoveNode> {
        let mut node = &self.root;
        let mut completed = None;
        for id in &self.line {
            node = node
                .children
                .get(id)
                .unwrap_or_else(|| panic!("current line references missing node {}", id));
            if node.is_completed() {
                completed = Some(node);
            }
        }
        completed
    }

    /// Append an empty node below the current node and descend into it.
    pub fn create_child(&mut self) -> &mut MoveNode {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        self.current_node_mut().children.insert(id, MoveNode::default());
        self.line.push(id);
        self.current_node_mut()
    }

    /// Realized moves along the current line, root first.
    pub fn realized_moves(&self) -> impl Iterator<Item = &MoveRecord> {
        let mut node = &self.root;
        self.line.iter().filter_map(move |id| {
            node = node
                .children
                .get(id)
                .unwrap_or_else(|| panic!("current line references missing node {}", id));
            node.realized()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Turn;
    use crate::square::Square;

    fn record(uci: &str, color: Turn) -> MoveRecord {
        let text: crate::rules::MoveText = uci.parse().unwrap();
        MoveRecord {
            from: text.from,
            to: text.to,
            promotion: text.promotion,
            color,
            before: String::new(),
            after: format!("after {}", uci),
        }
    }

    #[test]
    fn test_new_history_is_empty() {
        let history = History::new();
        assert!(history.line().is_empty());
        assert_eq!(history.root().children().count(), 0);
        assert!(history.last_completed_node().is_none());
        assert_eq!(history.current_node(), history.root());
    }

    #[test]
    fn test_create_child_descends() {
        let mut history = History::new();
        history.create_child();
        history.create_child();

        assert_eq!(history.line().len(), 2);
        let (first_id, first) = history.root().children().next().unwrap();
        assert_eq!(first_id, history.line()[0]);
        assert_eq!(first.children().count(), 1);
        assert!(history.line()[0] < history.line()[1]);
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut history = History::new();
        for _ in 0..20 {
            history.create_child();
        }
        assert!(history.line().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_last_completed_skips_idea_nodes() {
        let mut history = History::new();
        history.create_child().set_realized(record("e2e4", Turn::W));
        history.create_child().set_realized(record("e7e5", Turn::B));
        history.create_child().set_idea(record("g8f6", Turn::B));

        let completed = history.last_completed_node().unwrap();
        assert_eq!(completed.realized().unwrap().uci(), "e7e5");
        assert!(history.current_node().realized().is_none());
        assert_eq!(history.current_node().idea().unwrap().uci(), "g8f6");
    }

    #[test]
    fn test_predictions_accumulate() {
        let mut history = History::new();
        history.create_child();
        history.current_node_mut().push_prediction(record("b8c6", Turn::B));
        history.current_node_mut().push_prediction(record("d7d6", Turn::B));
        let predictions: Vec<String> =
            history.current_node().predictions().iter().map(MoveRecord::uci).collect();
        assert_eq!(predictions, ["b8c6", "d7d6"]);
    }

    #[test]
    fn test_realized_moves_follow_line() {
        let mut history = History::new();
        history.create_child().set_realized(record("e2e4", Turn::W));
        history.create_child().set_idea(record("g8f6", Turn::B));
        history.current_node_mut().set_realized(record("g1f3", Turn::W));

        let line: Vec<String> = history.realized_moves().map(MoveRecord::uci).collect();
        assert_eq!(line, ["e2e4", "g1f3"]);
        assert_eq!(history.realized_moves().next().unwrap().from, Square::new(12));
    }

    #[test]
    #[should_panic(expected = "already holds realized move")]
    fn test_second_realized_move_panics() {
        let mut history = History::new();
        let node = history.create_child();
        node.set_realized(record("e2e4", Turn::W));
        node.set_realized(record("d2d4", Turn::W));
    }
}
