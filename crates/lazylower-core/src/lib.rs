/*! Lazy tensor IR and its lowering into builder computations.
 *
 * Tensor code records deferred operations as an IR graph. Lowering walks that graph once, turning
 * input data into numbered parameters and every node into builder ops, and produces a serializable
 * computation together with the data to bind to its parameters.
 */

pub mod builder;
pub mod data;
pub mod ir;
pub mod literal;
pub mod lowering;
pub mod ops;
pub mod persist;
pub mod types;

pub use builder::{BuilderError, Computation, HloBuilder, Op, OpId};
pub use data::{ComputationData, DataPtr, TensorData};
pub use ir::{Node, NodeCore, NodeMetadata, NodePtr, Output, OutputKey, ScopePusher};
pub use literal::Literal;
pub use lowering::{
    lower_outputs, LoweredGraph, LoweringContext, LoweringError, NodeDiagnostic, NodeError,
};
pub use types::{PrimitiveType, Shape};

pub type Result<T> = std::result::Result<T, LoweringError>;

#[cfg(test)]
mod tests;
