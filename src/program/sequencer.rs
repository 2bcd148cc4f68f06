// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Linearization of a program ring into an ordered step list.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::ProgramError;
use crate::program::{NodeRef, ProgramGraph, ProgramNode};
use crate::types::Temperature;

/// One decoded step of a linearized program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramStep {
    /// 1-based position in emission order.
    pub position: usize,
    /// Node id.
    pub id: String,
    /// Setpoint for the step.
    pub temperature: Option<Temperature>,
    /// Duration in minutes.
    pub duration: Option<u32>,
    /// The controller's own position counter.
    pub count: Option<u32>,
}

impl ProgramStep {
    fn from_node(position: usize, id: &str, node: &ProgramNode) -> Self {
        Self {
            position,
            id: id.to_string(),
            temperature: node.temperature().map(Temperature::from_tenths),
            duration: node.duration(),
            count: node.position(),
        }
    }
}

/// Walks forward links from `start`, emitting one step per distinct node.
///
/// Stops when the next node was already emitted, when a node has no forward
/// link, or once `max_steps` steps have been emitted. An absent start, or a
/// start node without an id, yields an empty list.
///
/// # Errors
///
/// Returns `ProgramError::MalformedNode` if a node reached after the start
/// has no id. A node past the step bound is never inspected.
///
/// # Examples
///
/// ```
/// use ember_lib::program::{ProgramGraph, ProgramNode, traverse};
///
/// let mut graph = ProgramGraph::new();
/// let a = graph.add(ProgramNode::new("a").with_temperature(175));
/// let b = graph.add(ProgramNode::new("b").with_temperature(185));
/// graph.link(a, b);
/// graph.link(b, a);
///
/// let steps = traverse(&graph, Some(a), 20).unwrap();
/// let ids: Vec<_> = steps.iter().map(|s| s.id.as_str()).collect();
/// assert_eq!(ids, ["a", "b"]);
/// ```
pub fn traverse(
    graph: &ProgramGraph,
    start: Option<NodeRef>,
    max_steps: usize,
) -> Result<Vec<ProgramStep>, ProgramError> {
    let Some(first) = start.and_then(|at| graph.node(at)) else {
        return Ok(Vec::new());
    };
    if first.id().is_none() {
        tracing::debug!("Program start node has no id");
        return Ok(Vec::new());
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut steps = Vec::new();
    let mut current = start;

    while let Some(at) = current {
        let Some(node) = graph.node(at) else {
            tracing::warn!(?at, "Program link points outside the graph");
            break;
        };
        if steps.len() == max_steps {
            if !node.id().is_some_and(|id| visited.contains(id)) {
                tracing::warn!(max_steps, "Program truncated before its cycle closed");
            }
            break;
        }
        let Some(id) = node.id() else {
            return Err(ProgramError::MalformedNode {
                position: steps.len() + 1,
            });
        };
        if !visited.insert(id) {
            break;
        }

        steps.push(ProgramStep::from_node(steps.len() + 1, id, node));
        current = node.next();
    }

    tracing::trace!(steps = steps.len(), "Traversed program");
    Ok(steps)
}

/// Traverses a graph from its root.
///
/// # Errors
///
/// See [`traverse`].
pub fn extract_program(
    graph: &ProgramGraph,
    max_steps: usize,
) -> Result<Vec<ProgramStep>, ProgramError> {
    traverse(graph, graph.root(), max_steps)
}
