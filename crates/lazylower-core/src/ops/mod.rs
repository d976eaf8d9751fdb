/*! Node implementations.
 *
 * Each op infers its output shape at construction and emits itself through the lowering context.
 * The free functions build a node and hand back its outputs, which is how tensor code records
 * operations.
 */

pub mod constant;
pub mod device_data;
pub mod elementwise;
pub mod optimization_barrier;

pub use constant::Constant;
pub use device_data::DeviceData;
pub use elementwise::{Binary, Unary};
pub use optimization_barrier::OptimizationBarrier;

use crate::builder::{BinaryOp, UnaryOp};
use crate::data::DataPtr;
use crate::ir::{NodePtr, Output};
use crate::literal::Literal;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub const DEVICE_DATA: &str = "lazy::device_data";
pub const CONSTANT: &str = "lazy::constant";
pub const BINARY: &str = "lazy::binary";
pub const UNARY: &str = "lazy::unary";
pub const OPTIMIZATION_BARRIER: &str = "xla::optimization_barrier";

pub(crate) fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[track_caller]
pub fn device_data(data: DataPtr) -> Output {
    let node: NodePtr = Arc::new(DeviceData::new(data));
    Output::new(node, 0)
}

#[track_caller]
pub fn constant(literal: Literal) -> Output {
    let node: NodePtr = Arc::new(Constant::new(literal));
    Output::new(node, 0)
}

#[track_caller]
pub fn binary(op: BinaryOp, lhs: Output, rhs: Output) -> Output {
    let node: NodePtr = Arc::new(Binary::new(op, lhs, rhs));
    Output::new(node, 0)
}

#[track_caller]
pub fn add(lhs: Output, rhs: Output) -> Output {
    binary(BinaryOp::Add, lhs, rhs)
}

#[track_caller]
pub fn mul(lhs: Output, rhs: Output) -> Output {
    binary(BinaryOp::Multiply, lhs, rhs)
}

#[track_caller]
pub fn unary(op: UnaryOp, operand: Output) -> Output {
    let node: NodePtr = Arc::new(Unary::new(op, operand));
    Output::new(node, 0)
}

/// Routes `inputs` through one barrier node and returns its outputs, one per input.
#[track_caller]
pub fn optimization_barrier(inputs: Vec<Output>) -> Vec<Output> {
    let node: NodePtr = Arc::new(OptimizationBarrier::new(inputs));
    Output::all(&node)
}
