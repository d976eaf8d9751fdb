use crate::config::EmitterConfig;
use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter, LineStyle};
use crate::output::{JsonFormatter, OutputFormat};
use lazylower_core::ir::{compute_post_order_all, EmitStatusMap, NodeId, NodePtr, Output};
use serde_json::json;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

/// Dumps the IR nodes reachable from a set of outputs in post order.
///
/// Each node gets a `%n` label by its position; operands of multi-output nodes are written as
/// `%n.slot`. Nodes producing one of the requested outputs carry `ROOT=<i>`.
pub struct GraphEmitter {
    config: EmitterConfig,
    format: OutputFormat,
}

struct GraphLine {
    label: usize,
    node: NodePtr,
    operands: Vec<String>,
    roots: Vec<usize>,
}

impl GraphEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            config,
            format: OutputFormat::Text,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    fn collect(&self, outputs: &[Output]) -> Vec<GraphLine> {
        let roots: Vec<NodePtr> = outputs.iter().map(|o| Arc::clone(&o.node)).collect();
        let mut emit_status = EmitStatusMap::new();
        let post_order = compute_post_order_all(&roots, &mut emit_status);

        let labels: HashMap<NodeId, usize> = post_order
            .iter()
            .enumerate()
            .map(|(label, node)| (node.id(), label))
            .collect();

        post_order
            .into_iter()
            .enumerate()
            .map(|(label, node)| {
                let operands = node
                    .operands()
                    .iter()
                    .map(|operand| operand_ref(&labels, operand))
                    .collect();
                let roots = outputs
                    .iter()
                    .enumerate()
                    .filter(|(_, output)| output.node.id() == node.id())
                    .map(|(index, _)| index)
                    .collect();
                GraphLine {
                    label,
                    node,
                    operands,
                    roots,
                }
            })
            .collect()
    }

    fn line_text(&self, line: &GraphLine) -> String {
        let node = &line.node;
        let mut text = if self.config.shapes_enabled() {
            format!("%{} = {} {}", line.label, node.shape(), node.op())
        } else {
            format!("%{} = {}", line.label, node.op())
        };
        text.push_str(&format!("({})", line.operands.join(", ")));

        if self.config.ids_enabled() {
            text.push_str(&format!(", id={}", node.id()));
        }
        if let Some(extra) = node.describe() {
            text.push_str(&format!(", {}", extra));
        }
        if let Some(scope) = &node.metadata().scope {
            text.push_str(&format!(", scope={}", scope));
        }
        if self.config.locations_enabled() {
            if let Some(frame) = node.metadata().frames.first() {
                text.push_str(&format!(", location={}", frame));
            }
        }
        for root in &line.roots {
            text.push_str(&format!(", ROOT={}", root));
        }
        text
    }

    fn emit_json<W: Write>(&self, lines: &[GraphLine], writer: &mut W) -> EmitResult {
        let nodes: Vec<serde_json::Value> = lines
            .iter()
            .map(|line| {
                json!({
                    "label": line.label,
                    "op": line.node.op().as_str(),
                    "shape": line.node.shape().to_string(),
                    "operands": line.operands,
                    "attributes": line.node.describe(),
                    "scope": line.node.metadata().scope,
                    "roots": line.roots,
                })
            })
            .collect();
        JsonFormatter::format_object(writer, &json!({ "nodes": nodes }))
    }
}

/// `%n` or `%n.slot` for an operand; `%?` when the operand never made it into the post order.
fn operand_ref(labels: &HashMap<NodeId, usize>, operand: &Output) -> String {
    let target = match labels.get(&operand.node.id()) {
        Some(label) => label.to_string(),
        None => "?".to_string(),
    };
    if operand.node.num_outputs() > 1 {
        format!("%{}.{}", target, operand.index)
    } else {
        format!("%{}", target)
    }
}

impl Default for GraphEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl Emitter for GraphEmitter {
    type Item = [Output];

    fn emit<W: Write>(
        &self,
        outputs: &[Output],
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let lines = self.collect(outputs);
        match self.format {
            OutputFormat::Json => self.emit_json(&lines, writer),
            OutputFormat::Text => EmitHelper::block(writer, context, "IR", |w, c| {
                for line in &lines {
                    let style = if line.roots.is_empty() {
                        LineStyle::Plain
                    } else {
                        LineStyle::Root
                    };
                    EmitHelper::line(w, c, style, &self.line_text(line))?;
                }
                Ok(())
            }),
        }
    }

    fn config(&self) -> &EmitterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazylower_core::{ops, Literal, PrimitiveType};

    fn two_slot_barrier() -> Vec<Output> {
        let a = ops::constant(Literal::scalar(PrimitiveType::F32, 1.0));
        let b = ops::constant(Literal::scalar(PrimitiveType::F32, 2.0));
        ops::optimization_barrier(vec![a, b])
    }

    #[test]
    fn test_operand_ref_uses_label() {
        let outputs = two_slot_barrier();
        let labels = HashMap::from([(outputs[1].node.id(), 3)]);
        assert_eq!(operand_ref(&labels, &outputs[1]), "%3.1");

        let scalar = ops::constant(Literal::scalar(PrimitiveType::F32, 0.0));
        let labels = HashMap::from([(scalar.node.id(), 0)]);
        assert_eq!(operand_ref(&labels, &scalar), "%0");
    }

    #[test]
    fn test_unlabeled_operand_is_not_mistaken_for_first_node() {
        let labels = HashMap::new();
        let scalar = ops::constant(Literal::scalar(PrimitiveType::F32, 0.0));
        assert_eq!(operand_ref(&labels, &scalar), "%?");

        let outputs = two_slot_barrier();
        assert_eq!(operand_ref(&labels, &outputs[0]), "%?.0");
    }
}
