use super::instruction::{HloInstruction, OpId, Opcode};
use crate::types::Shape;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramShape {
    pub parameters: Vec<Shape>,
    pub parameter_names: Vec<String>,
    pub result: Shape,
}

impl fmt::Display for ProgramShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self
            .parameter_names
            .iter()
            .zip(&self.parameters)
            .map(|(name, shape)| format!("{}: {}", name, shape))
            .collect();
        write!(f, "({}) -> {}", params.join(", "), self.result)
    }
}

/// Finalized output of an [`HloBuilder`](super::HloBuilder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Computation {
    pub name: String,
    pub instructions: Vec<HloInstruction>,
    pub root: OpId,
    pub program_shape: ProgramShape,
}

impl Computation {
    pub fn instruction(&self, id: OpId) -> Option<&HloInstruction> {
        self.instructions.get(id.0 as usize)
    }

    pub fn root_instruction(&self) -> Option<&HloInstruction> {
        self.instruction(self.root)
    }

    pub fn parameter_count(&self) -> usize {
        self.program_shape.parameters.len()
    }

    pub fn result_shape(&self) -> &Shape {
        &self.program_shape.result
    }

    pub fn parameters(&self) -> impl Iterator<Item = &HloInstruction> {
        self.instructions.iter().filter(|inst| inst.is_parameter())
    }

    pub fn count_opcode(&self, name: &str) -> usize {
        self.instructions
            .iter()
            .filter(|inst| inst.opcode.name() == name)
            .count()
    }

    /// Hex SHA-256 over the textual form of every instruction and the root.
    ///
    /// The computation name is excluded so identical graphs lowered under different names share a
    /// fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for inst in &self.instructions {
            hasher.update(inst.to_string().as_bytes());
            hasher.update(b"\n");
        }
        hasher.update(format!("ROOT {}", self.root).as_bytes());

        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    pub(crate) fn collect_program_shape(
        instructions: &[HloInstruction],
        root: OpId,
    ) -> Option<ProgramShape> {
        let mut params: Vec<(i64, &str, &Shape)> = instructions
            .iter()
            .filter_map(|inst| match &inst.opcode {
                Opcode::Parameter { number, name } => Some((*number, name.as_str(), &inst.shape)),
                _ => None,
            })
            .collect();
        params.sort_by_key(|(number, _, _)| *number);

        let result = instructions.get(root.0 as usize)?.shape.clone();
        Some(ProgramShape {
            parameters: params.iter().map(|(_, _, shape)| (*shape).clone()).collect(),
            parameter_names: params.iter().map(|(_, name, _)| name.to_string()).collect(),
            result,
        })
    }
}
