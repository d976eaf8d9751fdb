/*! Unified interface for lowering deferred tensor graphs.
 *
 * Single import for building IR nodes, lowering them into a computation and printing the result.
 */

pub use lazylower_core as core;
pub use lazylower_emit as emit;

pub use lazylower_core::{
    builder::{Computation, HloBuilder, Op},
    ir::{Node, NodeCore, Output, ScopePusher},
    lowering::{lower_outputs, LoweredGraph, LoweringContext, LoweringError},
    ops,
    types::{PrimitiveType, Shape},
    TensorData,
};

pub use lazylower_emit::{ComputationEmitter, GraphEmitter};
