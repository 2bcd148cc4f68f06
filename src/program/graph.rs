// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena representation of a heating program.
//!
//! The controller describes a program as a ring of nodes, each pointing to
//! the next and previous step. Its JSON form nests copies of neighbouring
//! nodes inside each other, so the same step can appear several times.
//! [`ProgramGraph`] stores one node per id and addresses nodes by
//! [`NodeRef`] handles, so traversal never depends on the data closing its
//! own ring.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::ParseError;

/// Handle to a node inside one [`ProgramGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(usize);

impl NodeRef {
    /// Returns the arena slot of the node.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// One step of a heating program.
///
/// # Examples
///
/// ```
/// use ember_lib::program::ProgramNode;
///
/// let node = ProgramNode::new("a")
///     .with_temperature(175)
///     .with_duration(40)
///     .with_position(1);
///
/// assert_eq!(node.id(), Some("a"));
/// assert_eq!(node.temperature(), Some(175));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramNode {
    id: Option<String>,
    temperature: Option<i32>,
    duration: Option<u32>,
    position: Option<u32>,
    next: Option<NodeRef>,
    prev: Option<NodeRef>,
}

impl ProgramNode {
    /// Creates a node with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Creates a node without an id.
    ///
    /// Such a node is malformed: traversal refuses to step onto it.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Sets the temperature in tenths of a degree.
    #[must_use]
    pub fn with_temperature(mut self, tenths: i32) -> Self {
        self.temperature = Some(tenths);
        self
    }

    /// Sets the duration in minutes.
    #[must_use]
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    /// Sets the controller's position counter.
    #[must_use]
    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    /// Returns the node id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the temperature in tenths of a degree.
    #[must_use]
    pub fn temperature(&self) -> Option<i32> {
        self.temperature
    }

    /// Returns the duration in minutes.
    #[must_use]
    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    /// Returns the controller's position counter.
    #[must_use]
    pub fn position(&self) -> Option<u32> {
        self.position
    }

    /// Returns the following node.
    #[must_use]
    pub fn next(&self) -> Option<NodeRef> {
        self.next
    }

    /// Returns the preceding node.
    #[must_use]
    pub fn prev(&self) -> Option<NodeRef> {
        self.prev
    }

    /// Fills fields this node lacks from another copy of the same step.
    fn absorb(&mut self, other: &Self) {
        self.temperature = self.temperature.or(other.temperature);
        self.duration = self.duration.or(other.duration);
        self.position = self.position.or(other.position);
    }
}

/// A heating program held as an arena of nodes.
///
/// # Examples
///
/// ```
/// use ember_lib::program::{ProgramGraph, ProgramNode};
///
/// let mut graph = ProgramGraph::new();
/// let a = graph.add(ProgramNode::new("a").with_temperature(175));
/// let b = graph.add(ProgramNode::new("b").with_temperature(185));
/// graph.link(a, b);
/// graph.link(b, a);
///
/// assert_eq!(graph.root(), Some(a));
/// assert_eq!(graph.find("b"), Some(b));
/// assert_eq!(graph.node(a).unwrap().next(), Some(b));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramGraph {
    nodes: Vec<ProgramNode>,
    root: Option<NodeRef>,
}

impl ProgramGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its handle.
    ///
    /// The first node added becomes the root.
    pub fn add(&mut self, node: ProgramNode) -> NodeRef {
        let at = NodeRef(self.nodes.len());
        self.nodes.push(node);
        self.root.get_or_insert(at);
        at
    }

    /// Links `from` forward to `to` and `to` back to `from`.
    ///
    /// Handles that do not belong to this graph are ignored.
    pub fn link(&mut self, from: NodeRef, to: NodeRef) {
        if from.0 >= self.nodes.len() || to.0 >= self.nodes.len() {
            tracing::warn!(?from, ?to, "Ignoring link to a node outside the graph");
            return;
        }
        self.nodes[from.0].next = Some(to);
        self.nodes[to.0].prev = Some(from);
    }

    /// Removes the forward link of a node, making it terminal.
    pub fn unlink_next(&mut self, at: NodeRef) {
        if let Some(node) = self.nodes.get_mut(at.0) {
            node.next = None;
        }
    }

    /// Sets the node traversal starts from.
    pub fn set_root(&mut self, root: NodeRef) {
        if root.0 < self.nodes.len() {
            self.root = Some(root);
        }
    }

    /// Returns the node traversal starts from.
    #[must_use]
    pub fn root(&self) -> Option<NodeRef> {
        self.root
    }

    /// Returns a node by handle.
    #[must_use]
    pub fn node(&self, at: NodeRef) -> Option<&ProgramNode> {
        self.nodes.get(at.0)
    }

    /// Returns the handle of the first node with the given id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<NodeRef> {
        self.nodes
            .iter()
            .position(|n| n.id() == Some(id))
            .map(NodeRef)
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parses the controller's nested program JSON.
    ///
    /// The top-level object becomes the root. Nested `Next`/`Prev` copies of
    /// a node already seen by id are merged into it: values seen first win
    /// and missing links are filled from later copies. `null` yields an
    /// empty graph.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` for invalid JSON and
    /// `ParseError::UnexpectedFormat` if a node is not an object or carries
    /// a non-numeric field.
    ///
    /// # Examples
    ///
    /// ```
    /// use ember_lib::program::ProgramGraph;
    ///
    /// let json = r#"{
    ///     "id": "a", "temperature": 175, "time": 40, "Count": 1,
    ///     "Next": {
    ///         "id": "b", "temperature": 185, "time": 60,
    ///         "Prev": {"id": "a", "temperature": 175, "time": 40},
    ///         "Next": {"id": "a"}
    ///     }
    /// }"#;
    ///
    /// let graph = ProgramGraph::from_json(json).unwrap();
    /// assert_eq!(graph.len(), 2);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Builds a graph from an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// See [`ProgramGraph::from_json`].
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        let mut graph = Self::new();
        if value.is_null() {
            return Ok(graph);
        }

        let mut by_id = HashMap::new();
        let root = graph.intern(value, &mut by_id)?;
        graph.root = Some(root);

        // Each JSON object is visited once, so the walk ends even when the
        // ids describe a ring.
        let mut pending = vec![(root, value)];
        while let Some((at, object)) = pending.pop() {
            for (key, forward) in [("Next", true), ("Prev", false)] {
                let Some(child) = object.get(key).filter(|v| !v.is_null()) else {
                    continue;
                };
                let child_ref = graph.intern(child, &mut by_id)?;
                let node = &mut graph.nodes[at.0];
                if forward {
                    node.next.get_or_insert(child_ref);
                } else {
                    node.prev.get_or_insert(child_ref);
                }
                pending.push((child_ref, child));
            }
        }

        tracing::debug!(nodes = graph.len(), "Parsed program graph");
        Ok(graph)
    }

    fn intern(
        &mut self,
        value: &Value,
        by_id: &mut HashMap<String, NodeRef>,
    ) -> Result<NodeRef, ParseError> {
        let object = value.as_object().ok_or_else(|| {
            ParseError::UnexpectedFormat(format!("program node is not an object: {value}"))
        })?;
        let parsed = parse_node(object)?;

        let Some(id) = parsed.id.clone() else {
            return Ok(self.add_detached(parsed));
        };
        if let Some(&existing) = by_id.get(&id) {
            self.nodes[existing.0].absorb(&parsed);
            return Ok(existing);
        }
        let at = self.add_detached(parsed);
        by_id.insert(id, at);
        Ok(at)
    }

    fn add_detached(&mut self, node: ProgramNode) -> NodeRef {
        let at = NodeRef(self.nodes.len());
        self.nodes.push(node);
        at
    }
}

fn parse_node(object: &Map<String, Value>) -> Result<ProgramNode, ParseError> {
    let id = match object.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => {
            return Err(ParseError::UnexpectedFormat(format!(
                "program node id is not a string: {other}"
            )));
        }
    };

    Ok(ProgramNode {
        id,
        temperature: int_field(object, "temperature")?,
        duration: int_field(object, "time")?,
        position: int_field(object, "Count")?,
        next: None,
        prev: None,
    })
}

fn int_field<T>(object: &Map<String, Value>, key: &str) -> Result<Option<T>, ParseError>
where
    T: TryFrom<i64>,
{
    let raw = match object.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    raw.and_then(|v| T::try_from(v).ok())
        .map(Some)
        .ok_or_else(|| ParseError::UnexpectedFormat(format!("program node field {key} is invalid")))
}
