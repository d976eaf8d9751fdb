use crate::literal::Literal;
use crate::types::Shape;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OpId(pub u32);

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuilderId(pub(crate) u64);

/// Handle to a value produced by an [`HloBuilder`](super::HloBuilder).
///
/// An op is only meaningful for the builder that created it. Failed builder calls hand back an
/// invalid op so callers can keep chaining; the failure itself lives in the builder's first error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Op {
    pub(crate) builder: BuilderId,
    pub(crate) handle: Option<OpId>,
}

impl Op {
    pub(crate) fn new(builder: BuilderId, handle: OpId) -> Self {
        Self {
            builder,
            handle: Some(handle),
        }
    }

    pub(crate) fn invalid(builder: BuilderId) -> Self {
        Self {
            builder,
            handle: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    pub fn id(&self) -> Option<OpId> {
        self.handle
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.handle {
            Some(id) => write!(f, "{}", id),
            None => write!(f, "<invalid>"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Maximum,
    Minimum,
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
            BinaryOp::Maximum => "maximum",
            BinaryOp::Minimum => "minimum",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Negate,
    Abs,
    Exp,
    Log,
    Tanh,
}

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Negate => "negate",
            UnaryOp::Abs => "abs",
            UnaryOp::Exp => "exponential",
            UnaryOp::Log => "log",
            UnaryOp::Tanh => "tanh",
        }
    }

    pub fn requires_float(self) -> bool {
        matches!(self, UnaryOp::Exp | UnaryOp::Log | UnaryOp::Tanh)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Opcode {
    Parameter { number: i64, name: String },
    Constant { literal: Literal },
    Tuple,
    GetTupleElement { index: usize },
    OptimizationBarrier,
    Binary(BinaryOp),
    Unary(UnaryOp),
}

impl Opcode {
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Parameter { .. } => "parameter",
            Opcode::Constant { .. } => "constant",
            Opcode::Tuple => "tuple",
            Opcode::GetTupleElement { .. } => "get-tuple-element",
            Opcode::OptimizationBarrier => "opt-barrier",
            Opcode::Binary(op) => op.name(),
            Opcode::Unary(op) => op.name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HloInstruction {
    pub id: OpId,
    pub opcode: Opcode,
    pub operands: Vec<OpId>,
    pub shape: Shape,
}

impl HloInstruction {
    pub fn is_parameter(&self) -> bool {
        matches!(self.opcode, Opcode::Parameter { .. })
    }

    /// Everything after the opcode name, e.g. `(%0, %1)` or `(0), name="x"`.
    pub fn arguments(&self) -> String {
        match &self.opcode {
            Opcode::Parameter { number, name } => format!("({}), name=\"{}\"", number, name),
            Opcode::Constant { literal } => format!("({})", literal),
            Opcode::GetTupleElement { index } => {
                format!("({}), index={}", join_operands(&self.operands), index)
            }
            _ => format!("({})", join_operands(&self.operands)),
        }
    }
}

impl fmt::Display for HloInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} {}{}",
            self.id,
            self.shape,
            self.opcode.name(),
            self.arguments()
        )
    }
}

fn join_operands(operands: &[OpId]) -> String {
    operands
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
