use super::node::{NodeId, NodePtr};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitStatus {
    Emitting,
    Emitted,
    /// The node depends on itself through its operands; it is left out of the post order.
    Loop,
}

pub type EmitStatusMap = HashMap<NodeId, EmitStatus>;

/// Post order of every node `root` depends on, ending with `root` itself.
///
/// Nodes already marked in `emit_status` are skipped, so a map carried across calls yields each
/// node at most once over all of them.
pub fn compute_post_order(root: &NodePtr, emit_status: &mut EmitStatusMap) -> Vec<NodePtr> {
    let mut post_order = Vec::new();
    visit(root, emit_status, &mut post_order);
    post_order
}

pub fn compute_post_order_all(roots: &[NodePtr], emit_status: &mut EmitStatusMap) -> Vec<NodePtr> {
    let mut post_order = Vec::new();
    for root in roots {
        visit(root, emit_status, &mut post_order);
    }
    post_order
}

/// Number of distinct nodes reachable from `roots`.
pub fn graph_size(roots: &[NodePtr]) -> usize {
    let mut emit_status = EmitStatusMap::new();
    compute_post_order_all(roots, &mut emit_status).len()
}

fn visit(root: &NodePtr, emit_status: &mut EmitStatusMap, post_order: &mut Vec<NodePtr>) {
    let mut stack: Vec<NodePtr> = vec![Arc::clone(root)];

    while let Some(node) = stack.last().cloned() {
        match emit_status.get(&node.id()).copied() {
            None => {
                emit_status.insert(node.id(), EmitStatus::Emitting);
                // Reversed so operands come off the stack in declaration order.
                for operand in node.operands().iter().rev() {
                    match emit_status.get(&operand.node.id()) {
                        None => stack.push(Arc::clone(&operand.node)),
                        Some(EmitStatus::Emitting) => {
                            tracing::warn!(
                                node = %node.id(),
                                operand = %operand.node.id(),
                                "graph loop found while computing post order"
                            );
                        }
                        Some(_) => {}
                    }
                }
            }
            Some(EmitStatus::Emitting) => {
                let complete = node
                    .operands()
                    .iter()
                    .all(|operand| emit_status.get(&operand.node.id()) == Some(&EmitStatus::Emitted));
                if complete {
                    emit_status.insert(node.id(), EmitStatus::Emitted);
                    post_order.push(node);
                } else {
                    emit_status.insert(node.id(), EmitStatus::Loop);
                }
                stack.pop();
            }
            Some(_) => {
                stack.pop();
            }
        }
    }
}
