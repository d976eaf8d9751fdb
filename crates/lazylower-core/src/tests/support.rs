use crate::builder::Op;
use crate::ir::{Node, NodeCore, NodePtr, OpKind, Output, OutputKey};
use crate::literal::Literal;
use crate::lowering::{LoweringContext, NodeError, OpList};
use crate::types::{PrimitiveType, Shape};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn f32_vec(n: i64) -> Shape {
    Shape::array(PrimitiveType::F32, [n])
}

/// How a tracked node misbehaves when lowered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    Raise,
    PoisonBuilder,
    PoisonThenRaise,
    SkipPublish,
}

/// Test node that counts its lowerings. Leaves lower to a constant, inner nodes to an
/// optimization barrier over their first operand.
pub struct Tracked {
    core: NodeCore,
    lowered: Arc<AtomicUsize>,
    fault: Fault,
}

impl Tracked {
    #[track_caller]
    pub fn create(name: &str, operands: Vec<Output>, fault: Fault) -> (NodePtr, Arc<AtomicUsize>) {
        Self::with_shape(name, operands, f32_vec(2), fault)
    }

    #[track_caller]
    pub fn with_shape(
        name: &str,
        operands: Vec<Output>,
        shape: Shape,
        fault: Fault,
    ) -> (NodePtr, Arc<AtomicUsize>) {
        let lowered = Arc::new(AtomicUsize::new(0));
        let node: NodePtr = Arc::new(Tracked {
            core: NodeCore::new(OpKind::new(format!("test::{}", name)), operands, shape, 0),
            lowered: Arc::clone(&lowered),
            fault,
        });
        (node, lowered)
    }
}

impl Node for Tracked {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn lower(&self, loctx: &mut LoweringContext) -> Result<OpList, NodeError> {
        self.lowered.fetch_add(1, Ordering::SeqCst);
        if self.fault == Fault::Raise {
            return Err(NodeError::Unsupported("node refused to lower".to_string()));
        }

        let mut operand_ops = Vec::new();
        for operand in self.core.operands() {
            operand_ops.push(loctx.get_output_op(operand)?);
        }

        let builder = loctx.builder_mut();
        let op = match operand_ops.first() {
            Some(&first) => builder.optimization_barrier(first),
            None => builder.constant(Literal::vector(PrimitiveType::F32, vec![1.0, 2.0])),
        };
        if matches!(self.fault, Fault::PoisonBuilder | Fault::PoisonThenRaise) {
            builder.get_tuple_element(op, 0);
        }
        if self.fault == Fault::PoisonThenRaise {
            return Err(NodeError::Unsupported("node gave up after a builder failure".to_string()));
        }
        if self.fault == Fault::SkipPublish {
            return Ok(vec![op]);
        }
        Ok(loctx.return_ops(&self.core, vec![op]))
    }

    fn clone_with_operands(&self, operands: Vec<Output>) -> NodePtr {
        Arc::new(Tracked {
            core: NodeCore::new(self.core.op().clone(), operands, self.core.shape().clone(), 0),
            lowered: Arc::clone(&self.lowered),
            fault: self.fault,
        })
    }
}

/// Two-result node publishing a constant and its negation. A partial pair publishes only slot 0.
pub struct Pair {
    core: NodeCore,
    lowered: Arc<AtomicUsize>,
    publish_second: bool,
}

impl Pair {
    #[track_caller]
    pub fn create() -> (NodePtr, Arc<AtomicUsize>) {
        Self::build(true)
    }

    #[track_caller]
    pub fn partial() -> NodePtr {
        Self::build(false).0
    }

    #[track_caller]
    fn build(publish_second: bool) -> (NodePtr, Arc<AtomicUsize>) {
        let lowered = Arc::new(AtomicUsize::new(0));
        let node: NodePtr = Arc::new(Pair {
            core: NodeCore::new_multi(
                OpKind::new("test::pair"),
                Vec::new(),
                vec![f32_vec(2), f32_vec(2)],
                0,
            ),
            lowered: Arc::clone(&lowered),
            publish_second,
        });
        (node, lowered)
    }
}

impl Node for Pair {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn lower(&self, loctx: &mut LoweringContext) -> Result<OpList, NodeError> {
        self.lowered.fetch_add(1, Ordering::SeqCst);
        let builder = loctx.builder_mut();
        let first = builder.constant(Literal::vector(PrimitiveType::F32, vec![3.0, 4.0]));
        let second = builder.unary(crate::builder::UnaryOp::Negate, first);
        loctx.assign_output_op(OutputKey::new(self.core.id(), 0), first);
        if self.publish_second {
            loctx.assign_output_op(OutputKey::new(self.core.id(), 1), second);
        }
        Ok(vec![first, second])
    }

    fn clone_with_operands(&self, _operands: Vec<Output>) -> NodePtr {
        Pair::build(self.publish_second).0
    }
}

pub fn count(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

pub fn out(node: &NodePtr) -> Output {
    Output::new(Arc::clone(node), 0)
}

pub fn same_op(a: Op, b: Op) -> bool {
    a == b && a.is_valid()
}
