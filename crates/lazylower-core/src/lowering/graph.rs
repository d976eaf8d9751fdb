use super::context::LoweringContext;
use super::error::LoweringError;
use crate::builder::Computation;
use crate::data::DataPtr;
use crate::ir::Output;
use crate::types::Shape;

/// A lowered graph ready for execution: the computation plus the data to bind to its parameters,
/// in parameter-number order.
#[derive(Debug)]
pub struct LoweredGraph {
    pub computation: Computation,
    pub parameters: Vec<DataPtr>,
    pub result_shapes: Vec<Shape>,
}

/// Lowers `outputs` into one computation whose root tuple holds them in order.
pub fn lower_outputs(name: &str, outputs: &[Output]) -> Result<LoweredGraph, LoweringError> {
    let mut loctx = LoweringContext::new(name);
    let mut result_shapes = Vec::with_capacity(outputs.len());
    for output in outputs {
        let op = loctx.get_output_op(output)?;
        loctx.add_result(op);
        result_shapes.push(output.shape().clone());
    }

    let parameters = loctx.parameters_data();
    let computation = loctx.build()?;
    Ok(LoweredGraph {
        computation,
        parameters,
        result_shapes,
    })
}
