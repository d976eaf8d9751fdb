use super::{hash_of, BINARY, UNARY};
use crate::builder::{BinaryOp, UnaryOp};
use crate::ir::{Node, NodeCore, NodePtr, OpKind, Output};
use crate::lowering::{LoweringContext, NodeError, OpList};
use crate::types::PrimitiveType;
use std::sync::Arc;

fn check_operand(output: &Output, index: usize, op: &str) -> Result<(), NodeError> {
    let shape = output.shape();
    match shape.element_type() {
        None => Err(NodeError::InvalidOperand {
            index,
            reason: format!("{} expects an array, got {}", op, shape),
        }),
        Some(PrimitiveType::Pred) => Err(NodeError::Unsupported(format!(
            "{} on pred operand {}",
            op, index
        ))),
        Some(_) => Ok(()),
    }
}

/// Elementwise binary op. The result takes the left operand's shape; the builder rejects
/// mismatched operands at lowering time.
pub struct Binary {
    core: NodeCore,
    op: BinaryOp,
}

impl Binary {
    #[track_caller]
    pub fn new(op: BinaryOp, lhs: Output, rhs: Output) -> Self {
        let shape = lhs.shape().clone();
        let core = NodeCore::new(OpKind::new(BINARY), vec![lhs, rhs], shape, hash_of(&op));
        Self { core, op }
    }

    pub fn kind(&self) -> BinaryOp {
        self.op
    }
}

impl Node for Binary {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn lower(&self, loctx: &mut LoweringContext) -> Result<OpList, NodeError> {
        for (index, operand) in self.core.operands().iter().enumerate() {
            check_operand(operand, index, self.op.name())?;
        }
        let lhs = loctx.get_output_op(self.core.operand(0))?;
        let rhs = loctx.get_output_op(self.core.operand(1))?;
        let op = loctx.builder_mut().binary(self.op, lhs, rhs);
        Ok(loctx.return_ops(&self.core, vec![op]))
    }

    fn clone_with_operands(&self, operands: Vec<Output>) -> NodePtr {
        let mut operands = operands.into_iter();
        match (operands.next(), operands.next()) {
            (Some(lhs), Some(rhs)) => Arc::new(Binary::new(self.op, lhs, rhs)),
            _ => panic!("{} requires two operands", self.op.name()),
        }
    }

    fn describe(&self) -> Option<String> {
        Some(format!("kind={}", self.op.name()))
    }
}

pub struct Unary {
    core: NodeCore,
    op: UnaryOp,
}

impl Unary {
    #[track_caller]
    pub fn new(op: UnaryOp, operand: Output) -> Self {
        let shape = operand.shape().clone();
        let core = NodeCore::new(OpKind::new(UNARY), vec![operand], shape, hash_of(&op));
        Self { core, op }
    }

    pub fn kind(&self) -> UnaryOp {
        self.op
    }
}

impl Node for Unary {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn lower(&self, loctx: &mut LoweringContext) -> Result<OpList, NodeError> {
        check_operand(self.core.operand(0), 0, self.op.name())?;
        let operand = loctx.get_output_op(self.core.operand(0))?;
        let op = loctx.builder_mut().unary(self.op, operand);
        Ok(loctx.return_ops(&self.core, vec![op]))
    }

    fn clone_with_operands(&self, operands: Vec<Output>) -> NodePtr {
        match operands.into_iter().next() {
            Some(operand) => Arc::new(Unary::new(self.op, operand)),
            None => panic!("{} requires one operand", self.op.name()),
        }
    }

    fn describe(&self) -> Option<String> {
        Some(format!("kind={}", self.op.name()))
    }
}
