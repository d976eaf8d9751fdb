use super::OPTIMIZATION_BARRIER;
use crate::ir::{Node, NodeCore, NodePtr, OpKind, Output};
use crate::lowering::{LoweringContext, NodeError, OpList};
use crate::types::Shape;
use std::sync::Arc;

fn node_output_shapes(inputs: &[Output]) -> Vec<Shape> {
    inputs.iter().map(|input| input.shape().clone()).collect()
}

/// Passes its inputs through unchanged while keeping the target from reordering computation
/// across it. Produces one output per input.
pub struct OptimizationBarrier {
    core: NodeCore,
}

impl OptimizationBarrier {
    #[track_caller]
    pub fn new(inputs: Vec<Output>) -> Self {
        let shapes = node_output_shapes(&inputs);
        Self {
            core: NodeCore::new_multi(OpKind::new(OPTIMIZATION_BARRIER), inputs, shapes, 0),
        }
    }
}

impl Node for OptimizationBarrier {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn lower(&self, loctx: &mut LoweringContext) -> Result<OpList, NodeError> {
        if self.core.operands().is_empty() {
            return Err(NodeError::Unsupported(
                "optimization barrier requires at least one input".to_string(),
            ));
        }
        let inputs = self
            .core
            .operands()
            .iter()
            .map(|operand| loctx.get_output_op(operand))
            .collect::<Result<Vec<_>, _>>()?;

        let builder = loctx.builder_mut();
        let tuple_input = builder.tuple(&inputs);
        let tuple_output = builder.optimization_barrier(tuple_input);
        let outputs = (0..inputs.len())
            .map(|index| builder.get_tuple_element(tuple_output, index))
            .collect();
        Ok(loctx.return_ops(&self.core, outputs))
    }

    fn clone_with_operands(&self, operands: Vec<Output>) -> NodePtr {
        Arc::new(OptimizationBarrier::new(operands))
    }
}
