use super::metadata::NodeMetadata;
use super::output::Output;
use crate::lowering::{LoweringContext, NodeError, OpList};
use crate::types::Shape;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type NodePtr = Arc<dyn Node>;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Namespaced operation name such as `xla::optimization_barrier`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpKind(String);

impl OpKind {
    pub fn new(name: impl Into<String>) -> Self {
        OpKind(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State shared by every node kind.
#[derive(Debug)]
pub struct NodeCore {
    id: NodeId,
    op: OpKind,
    operands: Vec<Output>,
    shape: Shape,
    num_outputs: usize,
    multi_output: bool,
    hash: u64,
    metadata: NodeMetadata,
}

impl NodeCore {
    /// Single-result core. `extra_hash` folds node-specific attributes (constants, op variants)
    /// into the structural hash alongside the op kind, shape and operand hashes.
    #[track_caller]
    pub fn new(op: OpKind, operands: Vec<Output>, shape: Shape, extra_hash: u64) -> Self {
        Self::build(op, operands, shape, 1, false, extra_hash)
    }

    /// Core for a node with one result slot per element of `output_shapes`.
    #[track_caller]
    pub fn new_multi(
        op: OpKind,
        operands: Vec<Output>,
        output_shapes: Vec<Shape>,
        extra_hash: u64,
    ) -> Self {
        let num_outputs = output_shapes.len();
        Self::build(
            op,
            operands,
            Shape::Tuple(output_shapes),
            num_outputs,
            true,
            extra_hash,
        )
    }

    #[track_caller]
    fn build(
        op: OpKind,
        operands: Vec<Output>,
        shape: Shape,
        num_outputs: usize,
        multi_output: bool,
        extra_hash: u64,
    ) -> Self {
        let mut hasher = DefaultHasher::new();
        op.hash(&mut hasher);
        shape.hash(&mut hasher);
        num_outputs.hash(&mut hasher);
        extra_hash.hash(&mut hasher);
        for operand in &operands {
            operand.node.core().hash.hash(&mut hasher);
            operand.index.hash(&mut hasher);
        }

        Self {
            id: NodeId::next(),
            op,
            operands,
            shape,
            num_outputs,
            multi_output,
            hash: hasher.finish(),
            metadata: NodeMetadata::capture(),
        }
    }

    pub fn with_metadata(mut self, metadata: NodeMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn op(&self) -> &OpKind {
        &self.op
    }

    pub fn operands(&self) -> &[Output] {
        &self.operands
    }

    pub fn operand(&self, index: usize) -> &Output {
        &self.operands[index]
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    /// Shape of one result slot. Multi-output nodes carry a tuple shape with one element per slot.
    pub fn output_shape(&self, index: usize) -> Option<&Shape> {
        if self.multi_output {
            self.shape.tuple_element(index)
        } else if index == 0 {
            Some(&self.shape)
        } else {
            None
        }
    }
}

/// A deferred tensor operation that knows how to emit itself through a [`LoweringContext`].
///
/// `lower` runs after every operand has been lowered, so operand ops are available through
/// [`LoweringContext::get_output_op`]. Implementations must publish every result slot, normally
/// with [`LoweringContext::return_ops`].
pub trait Node: Send + Sync {
    fn core(&self) -> &NodeCore;

    fn lower(&self, loctx: &mut LoweringContext) -> Result<OpList, NodeError>;

    fn clone_with_operands(&self, operands: Vec<Output>) -> NodePtr;

    /// Node-specific attributes appended to the textual form.
    fn describe(&self) -> Option<String> {
        None
    }

    fn id(&self) -> NodeId {
        self.core().id()
    }

    fn op(&self) -> &OpKind {
        self.core().op()
    }

    fn operands(&self) -> &[Output] {
        self.core().operands()
    }

    fn shape(&self) -> &Shape {
        self.core().shape()
    }

    fn num_outputs(&self) -> usize {
        self.core().num_outputs()
    }

    fn metadata(&self) -> &NodeMetadata {
        self.core().metadata()
    }
}

impl fmt::Display for dyn Node + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, id={}, shape={}", self.op(), self.id(), self.shape())?;
        if let Some(extra) = self.describe() {
            write!(f, ", {}", extra)?;
        }
        if let Some(scope) = &self.metadata().scope {
            write!(f, ", scope={}", scope)?;
        }
        Ok(())
    }
}

impl fmt::Debug for dyn Node + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
