use super::computation::Computation;
use super::instruction::{BinaryOp, BuilderId, HloInstruction, Op, OpId, Opcode, UnaryOp};
use super::BuilderError;
use crate::literal::Literal;
use crate::types::Shape;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BUILDER_ID: AtomicU64 = AtomicU64::new(0);

pub struct HloBuilder {
    id: BuilderId,
    name: String,
    instructions: Vec<HloInstruction>,
    parameters: BTreeMap<i64, OpId>,
    first_error: Option<BuilderError>,
}

impl HloBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BuilderId(NEXT_BUILDER_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            instructions: Vec::new(),
            parameters: BTreeMap::new(),
            first_error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    pub fn instructions(&self) -> &[HloInstruction] {
        &self.instructions
    }

    pub fn first_error(&self) -> Option<&BuilderError> {
        self.first_error.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.first_error.is_some()
    }

    pub fn current_status(&self) -> Result<(), BuilderError> {
        match &self.first_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub fn shape_of(&self, op: Op) -> Result<Shape, BuilderError> {
        self.lookup(op).map(|inst| inst.shape.clone())
    }

    pub fn parameter(&mut self, number: i64, shape: Shape, name: impl Into<String>) -> Op {
        let name = name.into();
        self.report_error_or_return(|b| {
            if b.parameters.contains_key(&number) {
                return Err(BuilderError::DuplicateParameter(number));
            }
            if !shape.is_valid() {
                return Err(BuilderError::InvalidShape(shape));
            }
            let op = b.push(Opcode::Parameter { number, name }, Vec::new(), shape);
            if let Some(id) = op.handle {
                b.parameters.insert(number, id);
            }
            Ok(op)
        })
    }

    pub fn constant(&mut self, literal: Literal) -> Op {
        self.report_error_or_return(|b| {
            if !literal.is_consistent() {
                return Err(BuilderError::InvalidLiteral(format!(
                    "{} values for shape {}",
                    literal.values.len(),
                    literal.shape
                )));
            }
            let shape = literal.shape.clone();
            Ok(b.push(Opcode::Constant { literal }, Vec::new(), shape))
        })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: Op, rhs: Op) -> Op {
        self.report_error_or_return(|b| {
            let lhs_id = b.resolve(lhs)?;
            let rhs_id = b.resolve(rhs)?;
            let lhs_shape = b.shape_of(lhs)?;
            let rhs_shape = b.shape_of(rhs)?;

            let element_type =
                lhs_shape
                    .element_type()
                    .ok_or_else(|| BuilderError::ExpectedArray {
                        op: op.name().to_string(),
                        shape: lhs_shape.clone(),
                    })?;
            if lhs_shape != rhs_shape {
                return Err(BuilderError::ShapeMismatch {
                    op: op.name().to_string(),
                    lhs: lhs_shape,
                    rhs: rhs_shape,
                });
            }
            if !element_type.is_numeric() {
                return Err(BuilderError::UnsupportedElementType {
                    op: op.name().to_string(),
                    element_type,
                });
            }
            Ok(b.push(Opcode::Binary(op), vec![lhs_id, rhs_id], lhs_shape))
        })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: Op) -> Op {
        self.report_error_or_return(|b| {
            let operand_id = b.resolve(operand)?;
            let shape = b.shape_of(operand)?;
            let element_type = shape
                .element_type()
                .ok_or_else(|| BuilderError::ExpectedArray {
                    op: op.name().to_string(),
                    shape: shape.clone(),
                })?;

            let supported = if op.requires_float() {
                element_type.is_float()
            } else {
                element_type.is_numeric()
            };
            if !supported {
                return Err(BuilderError::UnsupportedElementType {
                    op: op.name().to_string(),
                    element_type,
                });
            }
            Ok(b.push(Opcode::Unary(op), vec![operand_id], shape))
        })
    }

    pub fn tuple(&mut self, elements: &[Op]) -> Op {
        self.report_error_or_return(|b| {
            let mut operands = Vec::with_capacity(elements.len());
            let mut shapes = Vec::with_capacity(elements.len());
            for &element in elements {
                operands.push(b.resolve(element)?);
                shapes.push(b.shape_of(element)?);
            }
            Ok(b.push(Opcode::Tuple, operands, Shape::Tuple(shapes)))
        })
    }

    pub fn get_tuple_element(&mut self, tuple: Op, index: usize) -> Op {
        self.report_error_or_return(|b| {
            let tuple_id = b.resolve(tuple)?;
            let shape = b.shape_of(tuple)?;
            if !shape.is_tuple() {
                return Err(BuilderError::NotATuple(shape));
            }
            let element = shape.tuple_element(index).cloned().ok_or_else(|| {
                BuilderError::TupleIndexOutOfRange {
                    index,
                    size: shape.tuple_shapes().len(),
                }
            })?;
            Ok(b.push(Opcode::GetTupleElement { index }, vec![tuple_id], element))
        })
    }

    /// Identity op that prevents the target from moving computation across it.
    pub fn optimization_barrier(&mut self, operand: Op) -> Op {
        self.report_error_or_return(|b| {
            let operand_id = b.resolve(operand)?;
            let shape = b.shape_of(operand)?;
            Ok(b.push(Opcode::OptimizationBarrier, vec![operand_id], shape))
        })
    }

    /// Finalizes with the most recently added instruction as root.
    pub fn build(self) -> Result<Computation, BuilderError> {
        self.current_status()?;
        let root = match self.instructions.last() {
            Some(inst) => inst.id,
            None => return Err(BuilderError::EmptyComputation(self.name)),
        };
        self.finish(root)
    }

    pub fn build_with_root(self, root: Op) -> Result<Computation, BuilderError> {
        self.current_status()?;
        let root = self.resolve(root)?;
        self.finish(root)
    }

    fn finish(self, root: OpId) -> Result<Computation, BuilderError> {
        for (expected, number) in (0i64..).zip(self.parameters.keys()) {
            if *number != expected {
                return Err(BuilderError::MissingParameter(expected));
            }
        }

        let program_shape = Computation::collect_program_shape(&self.instructions, root)
            .ok_or_else(|| BuilderError::InvalidOp {
                builder: self.name.clone(),
            })?;

        tracing::debug!(
            computation = %self.name,
            instructions = self.instructions.len(),
            parameters = self.parameters.len(),
            "built computation"
        );

        Ok(Computation {
            name: self.name,
            instructions: self.instructions,
            root,
            program_shape,
        })
    }

    fn report_error_or_return<F>(&mut self, f: F) -> Op
    where
        F: FnOnce(&mut Self) -> Result<Op, BuilderError>,
    {
        match f(self) {
            Ok(op) => op,
            Err(err) => self.note_error(err),
        }
    }

    fn note_error(&mut self, err: BuilderError) -> Op {
        if self.first_error.is_none() {
            tracing::debug!(builder = %self.name, error = %err, "builder entered error state");
            self.first_error = Some(err);
        }
        Op::invalid(self.id)
    }

    fn push(&mut self, opcode: Opcode, operands: Vec<OpId>, shape: Shape) -> Op {
        let id = OpId(self.instructions.len() as u32);
        self.instructions.push(HloInstruction {
            id,
            opcode,
            operands,
            shape,
        });
        Op::new(self.id, id)
    }

    fn resolve(&self, op: Op) -> Result<OpId, BuilderError> {
        self.lookup(op).map(|inst| inst.id)
    }

    fn lookup(&self, op: Op) -> Result<&HloInstruction, BuilderError> {
        if op.builder != self.id {
            return Err(BuilderError::ForeignOp {
                builder: self.name.clone(),
            });
        }
        op.handle
            .and_then(|id| self.instructions.get(id.0 as usize))
            .ok_or_else(|| BuilderError::InvalidOp {
                builder: self.name.clone(),
            })
    }
}
