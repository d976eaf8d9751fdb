use super::error::{LoweringError, NodeDiagnostic, NodeError};
use crate::builder::{Computation, HloBuilder, Op};
use crate::data::{DataKey, DataPtr};
use crate::ir::{compute_post_order, EmitStatusMap, Node, NodeCore, NodePtr, Output, OutputKey};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

pub type OpList = Vec<Op>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoweringStats {
    pub traversals: usize,
    pub nodes_lowered: usize,
    pub parameters: usize,
    pub results: usize,
}

struct Parameter {
    data: DataPtr,
    op: Op,
}

/// Builder state for lowering one IR graph into a [`Computation`].
///
/// A context is created per compilation unit, accumulates parameters, lowered outputs and results
/// across any number of [`get_output_op`](Self::get_output_op) calls, and is consumed by
/// [`build`](Self::build) or [`build_with_root`](Self::build_with_root).
pub struct LoweringContext {
    builder: HloBuilder,
    parameters: IndexMap<DataKey, Parameter>,
    root_tuple: Vec<Op>,
    emitted_outputs: HashMap<OutputKey, Op>,
    emit_status: EmitStatusMap,
    stats: LoweringStats,
}

impl LoweringContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            builder: HloBuilder::new(name),
            parameters: IndexMap::new(),
            root_tuple: Vec::new(),
            emitted_outputs: HashMap::new(),
            emit_status: EmitStatusMap::new(),
            stats: LoweringStats::default(),
        }
    }

    pub fn builder(&self) -> &HloBuilder {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut HloBuilder {
        &mut self.builder
    }

    pub fn stats(&self) -> LoweringStats {
        self.stats
    }

    /// Parameter op for `data`, created as `param_<n>` the first time this handle is seen.
    pub fn get_parameter(&mut self, data: &DataPtr) -> Op {
        let key = DataKey::of(data);
        if let Some(param) = self.parameters.get(&key) {
            return param.op;
        }

        let index = self.parameters.len();
        let op = self.builder.parameter(
            index as i64,
            data.shape().clone(),
            format!("param_{}", index),
        );
        self.parameters.insert(
            key,
            Parameter {
                data: Arc::clone(data),
                op,
            },
        );
        self.stats.parameters += 1;
        trace!(index, shape = %data.shape(), device = data.device(), "registered parameter");
        op
    }

    /// Data handles in parameter-number order, for binding buffers at execution time.
    pub fn parameters_data(&self) -> Vec<DataPtr> {
        self.parameters
            .values()
            .map(|param| Arc::clone(&param.data))
            .collect()
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn add_result(&mut self, op: Op) -> usize {
        self.root_tuple.push(op);
        self.stats.results += 1;
        self.root_tuple.len() - 1
    }

    pub fn result_count(&self) -> usize {
        self.root_tuple.len()
    }

    /// Finalizes the computation. Registered results become a tuple root in registration order;
    /// with none registered the builder picks its default root.
    pub fn build(mut self) -> Result<Computation, LoweringError> {
        debug!(
            computation = self.builder.name(),
            parameters = self.parameters.len(),
            results = self.root_tuple.len(),
            "building lowered computation"
        );
        if !self.root_tuple.is_empty() {
            let root = self.builder.tuple(&self.root_tuple);
            return Ok(self.builder.build_with_root(root)?);
        }
        Ok(self.builder.build()?)
    }

    /// Finalizes against an explicit root.
    ///
    /// # Panics
    ///
    /// Panics if any result was registered with [`add_result`](Self::add_result); the two
    /// finalization modes are exclusive.
    pub fn build_with_root(self, root: Op) -> Result<Computation, LoweringError> {
        assert!(
            self.root_tuple.is_empty(),
            "build_with_root called on a context with {} registered results",
            self.root_tuple.len()
        );
        Ok(self.builder.build_with_root(root)?)
    }

    pub fn assign_output_op(&mut self, output: OutputKey, op: Op) {
        self.emitted_outputs.insert(output, op);
    }

    /// Publishes `ops` as result slots `0..ops.len()` of `node` and hands them back.
    ///
    /// # Panics
    ///
    /// Panics if the number of ops differs from the node's result count.
    pub fn return_ops(&mut self, node: &NodeCore, ops: OpList) -> OpList {
        assert_eq!(
            ops.len(),
            node.num_outputs(),
            "{} returned {} ops for {} outputs",
            node.op(),
            ops.len(),
            node.num_outputs()
        );
        for (index, op) in ops.iter().enumerate() {
            self.assign_output_op(OutputKey::new(node.id(), index), *op);
        }
        ops
    }

    pub fn is_lowered(&self, output: &Output) -> bool {
        self.emitted_outputs.contains_key(&output.key())
    }

    /// Lowered op for `output`, lowering the graph it depends on if needed.
    ///
    /// # Panics
    ///
    /// Panics if lowering the producing node did not publish the requested slot. That is a defect
    /// in the node's `lower` implementation, not a recoverable condition.
    pub fn get_output_op(&mut self, output: &Output) -> Result<Op, LoweringError> {
        let key = output.key();
        if let Some(op) = self.emitted_outputs.get(&key) {
            return Ok(*op);
        }

        let post_order = compute_post_order(&output.node, &mut self.emit_status);
        self.stats.traversals += 1;
        debug!(output = %key, nodes = post_order.len(), "lowering post order");
        self.lower_post_order(&post_order)?;

        match self.emitted_outputs.get(&key) {
            Some(op) => Ok(*op),
            None => panic!("No lowered op emitted for output: {}", output),
        }
    }

    fn lower_post_order(&mut self, post_order: &[NodePtr]) -> Result<(), LoweringError> {
        for node in post_order {
            let lowered = node.lower(self);
            self.stats.nodes_lowered += 1;
            match lowered {
                Ok(ops) => {
                    trace!(node = %node.id(), op = %node.op(), results = ops.len(), "lowered node")
                }
                Err(NodeError::Lowering(inner)) => return Err(*inner),
                Err(err) => {
                    return Err(self.report_builder_error(node.as_ref(), Some(err.to_string())))
                }
            }
            if self.builder.has_error() {
                return Err(self.report_builder_error(node.as_ref(), None));
            }
        }
        Ok(())
    }

    fn report_builder_error(&self, node: &dyn Node, error: Option<String>) -> LoweringError {
        let diagnostic = NodeDiagnostic {
            node: node.to_string(),
            builder_status: self.builder.first_error().map(|err| err.to_string()),
            error,
            frame_info: node.metadata().frame_info(),
        };
        warn!(node = %node.id(), op = %node.op(), "{}", diagnostic);
        LoweringError::Node(Box::new(diagnostic))
    }
}
