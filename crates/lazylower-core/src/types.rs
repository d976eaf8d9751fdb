use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Pred,
    S8,
    S32,
    S64,
    U8,
    U32,
    F16,
    BF16,
    F32,
    F64,
}

impl PrimitiveType {
    pub fn is_float(self) -> bool {
        matches!(
            self,
            PrimitiveType::F16 | PrimitiveType::BF16 | PrimitiveType::F32 | PrimitiveType::F64
        )
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveType::S8
                | PrimitiveType::S32
                | PrimitiveType::S64
                | PrimitiveType::U8
                | PrimitiveType::U32
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_float() || self.is_integer()
    }

    pub fn size_in_bytes(self) -> usize {
        match self {
            PrimitiveType::Pred | PrimitiveType::S8 | PrimitiveType::U8 => 1,
            PrimitiveType::F16 | PrimitiveType::BF16 => 2,
            PrimitiveType::S32 | PrimitiveType::U32 | PrimitiveType::F32 => 4,
            PrimitiveType::S64 | PrimitiveType::F64 => 8,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveType::Pred => "pred",
            PrimitiveType::S8 => "s8",
            PrimitiveType::S32 => "s32",
            PrimitiveType::S64 => "s64",
            PrimitiveType::U8 => "u8",
            PrimitiveType::U32 => "u32",
            PrimitiveType::F16 => "f16",
            PrimitiveType::BF16 => "bf16",
            PrimitiveType::F32 => "f32",
            PrimitiveType::F64 => "f64",
        };
        write!(f, "{}", name)
    }
}

/// Array or tuple shape of a value produced by the op builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Array {
        element_type: PrimitiveType,
        dims: Vec<i64>,
    },
    Tuple(Vec<Shape>),
}

impl Shape {
    pub fn array(element_type: PrimitiveType, dims: impl Into<Vec<i64>>) -> Self {
        Shape::Array {
            element_type,
            dims: dims.into(),
        }
    }

    pub fn scalar(element_type: PrimitiveType) -> Self {
        Shape::array(element_type, Vec::new())
    }

    pub fn tuple(shapes: impl Into<Vec<Shape>>) -> Self {
        Shape::Tuple(shapes.into())
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Shape::Tuple(_))
    }

    pub fn element_type(&self) -> Option<PrimitiveType> {
        match self {
            Shape::Array { element_type, .. } => Some(*element_type),
            Shape::Tuple(_) => None,
        }
    }

    pub fn dims(&self) -> &[i64] {
        match self {
            Shape::Array { dims, .. } => dims,
            Shape::Tuple(_) => &[],
        }
    }

    pub fn rank(&self) -> usize {
        self.dims().len()
    }

    pub fn tuple_shapes(&self) -> &[Shape] {
        match self {
            Shape::Tuple(shapes) => shapes,
            Shape::Array { .. } => &[],
        }
    }

    pub fn tuple_element(&self, index: usize) -> Option<&Shape> {
        self.tuple_shapes().get(index)
    }

    /// Number of elements of an array shape; `None` for tuples or negative dimensions.
    pub fn element_count(&self) -> Option<usize> {
        match self {
            Shape::Array { dims, .. } => dims.iter().try_fold(1usize, |acc, &dim| {
                usize::try_from(dim).ok().and_then(|d| acc.checked_mul(d))
            }),
            Shape::Tuple(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Shape::Array { dims, .. } => dims.iter().all(|&d| d >= 0),
            Shape::Tuple(shapes) => shapes.iter().all(Shape::is_valid),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Array { element_type, dims } => {
                let dims: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
                write!(f, "{}[{}]", element_type, dims.join(","))
            }
            Shape::Tuple(shapes) => {
                let parts: Vec<String> = shapes.iter().map(|s| s.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}
