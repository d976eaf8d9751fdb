use crate::builder::BuilderError;
use std::fmt;
use thiserror::Error;

/// Failure raised by a node's own lowering logic.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Invalid operand {index}: {reason}")]
    InvalidOperand { index: usize, reason: String },

    #[error(transparent)]
    Builder(#[from] BuilderError),

    /// An operand lookup failed while resolving another node; already attributed to that node.
    #[error(transparent)]
    Lowering(Box<LoweringError>),
}

impl From<LoweringError> for NodeError {
    fn from(err: LoweringError) -> Self {
        NodeError::Lowering(Box::new(err))
    }
}

/// Attributed report for a node that failed to lower.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDiagnostic {
    pub node: String,
    pub builder_status: Option<String>,
    pub error: Option<String>,
    pub frame_info: String,
}

impl fmt::Display for NodeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error while lowering: {}", self.node)?;
        if let Some(status) = &self.builder_status {
            writeln!(f, "Builder error: {}", status)?;
        }
        if let Some(error) = &self.error {
            writeln!(f, "Error: {}", error)?;
        }
        write!(f, "{}", self.frame_info)
    }
}

#[derive(Error, Debug)]
pub enum LoweringError {
    #[error("{0}")]
    Node(Box<NodeDiagnostic>),

    #[error("Failed to build computation: {0}")]
    Build(#[from] BuilderError),
}

impl LoweringError {
    pub fn diagnostic(&self) -> Option<&NodeDiagnostic> {
        match self {
            LoweringError::Node(diagnostic) => Some(diagnostic),
            LoweringError::Build(_) => None,
        }
    }
}
