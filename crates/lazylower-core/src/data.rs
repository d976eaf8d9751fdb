use crate::types::Shape;
use std::fmt;
use std::sync::Arc;

/// Device-resident tensor storage that a lowered computation binds to a parameter.
pub trait ComputationData: fmt::Debug + Send + Sync {
    fn shape(&self) -> &Shape;

    fn device(&self) -> &str;
}

pub type DataPtr = Arc<dyn ComputationData>;

/// Identity of a data handle, derived from its allocation address.
///
/// Two clones of the same `Arc` share a key; two handles with equal contents do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataKey(usize);

impl DataKey {
    pub fn of(data: &DataPtr) -> Self {
        DataKey(Arc::as_ptr(data) as *const () as usize)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TensorData {
    shape: Shape,
    device: String,
    values: Vec<f64>,
}

impl TensorData {
    pub fn new(shape: Shape, device: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            shape,
            device: device.into(),
            values,
        }
    }

    /// Zero-filled host data of the given shape.
    pub fn zeros(shape: Shape) -> Self {
        let len = shape.element_count().unwrap_or(0);
        Self::new(shape, "CPU:0", vec![0.0; len])
    }

    pub fn into_ptr(self) -> DataPtr {
        Arc::new(self)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl ComputationData for TensorData {
    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn device(&self) -> &str {
        &self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveType;

    #[test]
    fn test_data_key_is_identity() {
        let shape = Shape::array(PrimitiveType::F32, [2]);
        let a = TensorData::zeros(shape.clone()).into_ptr();
        let b = TensorData::zeros(shape).into_ptr();
        let a_clone = Arc::clone(&a);

        assert_eq!(DataKey::of(&a), DataKey::of(&a_clone));
        assert_ne!(DataKey::of(&a), DataKey::of(&b));
    }

    #[test]
    fn test_zeros() {
        let data = TensorData::zeros(Shape::array(PrimitiveType::F32, [2, 2]));
        assert_eq!(data.values(), &[0.0; 4]);
        assert_eq!(data.device(), "CPU:0");
    }
}
