/*! Deferred tensor operations.
 *
 * Tensor code records nodes instead of executing them. Each node holds its operands as
 * `(node, slot)` outputs, so a graph is an immutable DAG of reference-counted nodes that the
 * lowering context walks in post order.
 */

pub mod metadata;
pub mod node;
pub mod output;
pub mod util;

pub use metadata::{IrDebugConfig, NodeMetadata, ScopePusher, SourceLocation};
pub use node::{Node, NodeCore, NodeId, NodePtr, OpKind};
pub use output::{Output, OutputKey};
pub use util::{compute_post_order, compute_post_order_all, graph_size, EmitStatus, EmitStatusMap};
