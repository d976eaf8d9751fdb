use super::node::{NodeId, NodePtr};
use crate::types::Shape;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// One result slot of a node.
#[derive(Clone)]
pub struct Output {
    pub node: NodePtr,
    pub index: usize,
}

impl Output {
    /// # Panics
    ///
    /// Panics if `node` has no result slot `index`.
    pub fn new(node: NodePtr, index: usize) -> Self {
        assert!(
            index < node.num_outputs(),
            "Output index {} out of range for {} with {} outputs",
            index,
            node.op(),
            node.num_outputs()
        );
        Self { node, index }
    }

    pub fn key(&self) -> OutputKey {
        OutputKey::new(self.node.id(), self.index)
    }

    pub fn shape(&self) -> &Shape {
        match self.node.core().output_shape(self.index) {
            Some(shape) => shape,
            None => unreachable!(
                "slot {} checked against {} outputs",
                self.index,
                self.node.num_outputs()
            ),
        }
    }

    /// All result slots of `node`, in slot order.
    pub fn all(node: &NodePtr) -> Vec<Output> {
        (0..node.num_outputs())
            .map(|index| Output::new(Arc::clone(node), index))
            .collect()
    }
}

impl PartialEq for Output {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Output {}

impl Hash for Output {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, index={}", self.node, self.index)
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Output({}.{})", self.node.id(), self.index)
    }
}

/// Memoization key for lowered outputs: the producing node's id and the slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputKey {
    pub node: NodeId,
    pub index: usize,
}

impl OutputKey {
    pub fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }
}

impl fmt::Display for OutputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TensorData;
    use crate::ops;
    use crate::types::{PrimitiveType, Shape};

    fn f32_vec(n: i64) -> Shape {
        Shape::array(PrimitiveType::F32, [n])
    }

    #[test]
    fn test_slot_shapes() {
        let x = ops::device_data(TensorData::zeros(f32_vec(2)).into_ptr());
        let n = ops::device_data(TensorData::zeros(Shape::scalar(PrimitiveType::S32)).into_ptr());
        assert_eq!(x.shape(), &f32_vec(2));

        let fenced = ops::optimization_barrier(vec![x, n]);
        assert_eq!(fenced[1].shape(), &Shape::scalar(PrimitiveType::S32));
    }

    #[test]
    #[should_panic(expected = "Output index 5 out of range for lazy::device_data with 1 outputs")]
    fn test_nonexistent_slot_is_rejected() {
        let x = ops::device_data(TensorData::zeros(f32_vec(2)).into_ptr());
        let _ = Output::new(x.node, 5);
    }

    #[test]
    #[should_panic(expected = "Output index 1 out of range for xla::optimization_barrier")]
    fn test_slot_past_barrier_inputs_is_rejected() {
        let x = ops::device_data(TensorData::zeros(f32_vec(2)).into_ptr());
        let fenced = ops::optimization_barrier(vec![x]);
        let _ = Output::new(Arc::clone(&fenced[0].node), 1);
    }
}
