use crate::types::{PrimitiveType, Shape};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Constant array data embedded in a computation.
///
/// Values are stored widened to `f64` regardless of the element type; the shape decides how the
/// target interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub shape: Shape,
    #[serde(with = "element_values")]
    pub values: Vec<f64>,
}

/// JSON has no encoding for infinities or NaN, so those are written as the strings `"inf"`,
/// `"-inf"` and `"nan"`. Finite values stay plain numbers.
mod element_values {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Element {
        Number(f64),
        Special(String),
    }

    impl From<f64> for Element {
        fn from(value: f64) -> Self {
            if value.is_finite() {
                Element::Number(value)
            } else if value.is_nan() {
                Element::Special("nan".to_string())
            } else if value > 0.0 {
                Element::Special("inf".to_string())
            } else {
                Element::Special("-inf".to_string())
            }
        }
    }

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        let elements: Vec<Element> = values.iter().copied().map(Element::from).collect();
        elements.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Vec::<Element>::deserialize(deserializer)?
            .into_iter()
            .map(|element| match element {
                Element::Number(value) => Ok(value),
                Element::Special(text) => match text.as_str() {
                    "inf" => Ok(f64::INFINITY),
                    "-inf" => Ok(f64::NEG_INFINITY),
                    "nan" => Ok(f64::NAN),
                    other => Err(D::Error::custom(format!("invalid literal value: {}", other))),
                },
            })
            .collect()
    }
}

impl Literal {
    pub fn scalar(element_type: PrimitiveType, value: f64) -> Self {
        Self {
            shape: Shape::scalar(element_type),
            values: vec![value],
        }
    }

    pub fn vector(element_type: PrimitiveType, values: Vec<f64>) -> Self {
        Self {
            shape: Shape::array(element_type, [values.len() as i64]),
            values,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.rank() == 0
    }

    /// Values count must match the element count of an array shape.
    pub fn is_consistent(&self) -> bool {
        self.shape.element_count() == Some(self.values.len())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_scalar() {
            if let Some(value) = self.values.first() {
                return write!(f, "{}", value);
            }
        }
        let values: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        write!(f, "{{{}}}", values.join(", "))
    }
}
