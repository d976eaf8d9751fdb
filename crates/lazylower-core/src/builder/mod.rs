/*! Op builder for the lowered computation.
 *
 * Lowering emits into an XLA-style builder: every call returns a value handle immediately and the
 * builder remembers the first error it saw instead of failing the call. Callers poll that error
 * between steps and finalization refuses to produce a computation while it is set.
 */

pub mod computation;
pub mod hlo_builder;
pub mod instruction;

pub use computation::{Computation, ProgramShape};
pub use hlo_builder::HloBuilder;
pub use instruction::{BinaryOp, HloInstruction, Op, OpId, Opcode, UnaryOp};

use crate::types::{PrimitiveType, Shape};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuilderError {
    #[error("Invalid op handle passed to builder {builder}")]
    InvalidOp { builder: String },
    #[error("Op does not belong to builder {builder}")]
    ForeignOp { builder: String },
    #[error("Binary op {op} with incompatible shapes: {lhs} and {rhs}")]
    ShapeMismatch { op: String, lhs: Shape, rhs: Shape },
    #[error("Operation {op} expects an array operand, got {shape}")]
    ExpectedArray { op: String, shape: Shape },
    #[error("Operation {op} does not support element type {element_type}")]
    UnsupportedElementType {
        op: String,
        element_type: PrimitiveType,
    },
    #[error("Operand of get-tuple-element is not a tuple: {0}")]
    NotATuple(Shape),
    #[error("Tuple index {index} out of range for tuple of {size} elements")]
    TupleIndexOutOfRange { index: usize, size: usize },
    #[error("Parameter {0} already registered")]
    DuplicateParameter(i64),
    #[error("Parameter numbers must be contiguous, missing parameter {0}")]
    MissingParameter(i64),
    #[error("Invalid shape: {0}")]
    InvalidShape(Shape),
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),
    #[error("Cannot build computation {0} without instructions")]
    EmptyComputation(String),
}
