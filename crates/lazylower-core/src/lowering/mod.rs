/*! Lowering of IR graphs into builder computations.
 *
 * The lowering context interns input data as parameters, walks the graph in post order so every
 * operand is lowered before its consumer, memoizes each lowered output, and turns node failures or
 * builder errors into diagnostics that point back at the node that caused them.
 */

pub mod context;
pub mod error;
pub mod graph;

pub use context::{LoweringContext, LoweringStats, OpList};
pub use error::{LoweringError, NodeDiagnostic, NodeError};
pub use graph::{lower_outputs, LoweredGraph};
