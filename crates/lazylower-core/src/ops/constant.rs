use super::{hash_of, CONSTANT};
use crate::ir::{Node, NodeCore, NodePtr, OpKind, Output};
use crate::literal::Literal;
use crate::lowering::{LoweringContext, NodeError, OpList};
use std::sync::Arc;

pub struct Constant {
    core: NodeCore,
    literal: Literal,
}

impl Constant {
    #[track_caller]
    pub fn new(literal: Literal) -> Self {
        let bits: Vec<u64> = literal.values.iter().map(|v| v.to_bits()).collect();
        let core = NodeCore::new(
            OpKind::new(CONSTANT),
            Vec::new(),
            literal.shape.clone(),
            hash_of(&bits),
        );
        Self { core, literal }
    }

    pub fn literal(&self) -> &Literal {
        &self.literal
    }
}

impl Node for Constant {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn lower(&self, loctx: &mut LoweringContext) -> Result<OpList, NodeError> {
        let op = loctx.builder_mut().constant(self.literal.clone());
        Ok(loctx.return_ops(&self.core, vec![op]))
    }

    fn clone_with_operands(&self, _operands: Vec<Output>) -> NodePtr {
        Arc::new(Constant::new(self.literal.clone()))
    }

    fn describe(&self) -> Option<String> {
        Some(format!("value={}", self.literal))
    }
}
