/*! Readable text for lowered computations and the IR graphs they come from.
 *
 * `ComputationEmitter` prints a finalized computation as an HLO-style module, `GraphEmitter`
 * prints the deferred node graph behind a set of outputs. Both can also write JSON.
 */

pub mod computation_emitter;
pub mod config;
pub mod emitter;
pub mod graph_emitter;
pub mod output;

pub use computation_emitter::{instruction_text, ComputationEmitter};
pub use config::{EmitterConfig, IndentStyle, VerbosityLevel};
pub use emitter::{EmitContext, EmitHelper, EmitResult, Emittable, Emitter, LineStyle};
pub use graph_emitter::GraphEmitter;
pub use output::{JsonFormatter, OutputFormat};
