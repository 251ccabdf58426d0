//! Element types of a [`Vector`](crate::vector::Vector)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type tag of a vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    Boolean,
    Integer,
    Float,
    String,
    Date,
    Datetime,
    Timedelta,
    Object,
}

impl Dtype {
    /// Lowercase name of the dtype
    pub fn name(&self) -> &'static str {
        match self {
            Dtype::Boolean => "boolean",
            Dtype::Integer => "integer",
            Dtype::Float => "float",
            Dtype::String => "string",
            Dtype::Date => "date",
            Dtype::Datetime => "datetime",
            Dtype::Timedelta => "timedelta",
            Dtype::Object => "object",
        }
    }

    /// The dtype able to represent missing values of this dtype.
    ///
    /// Integers have no missing sentinel and widen to float, booleans fall back
    /// to object. Every other dtype carries its own sentinel.
    pub fn na_dtype(self) -> Dtype {
        match self {
            Dtype::Integer => Dtype::Float,
            Dtype::Boolean => Dtype::Object,
            other => other,
        }
    }

    /// Integer or float
    pub fn is_number(self) -> bool {
        matches!(self, Dtype::Integer | Dtype::Float)
    }

    /// Date or datetime
    pub fn is_datetime(self) -> bool {
        matches!(self, Dtype::Date | Dtype::Datetime)
    }

    /// Common supertype of two dtypes, `None` when they cannot be reconciled.
    ///
    /// # Arguments
    /// * `other` - The dtype to combine with
    ///
    /// # Returns
    /// * `Option<Dtype>` - Object absorbs everything, string absorbs every
    ///   non-object dtype, booleans, integers and floats promote numerically and
    ///   dates widen to datetimes
    pub fn common(self, other: Dtype) -> Option<Dtype> {
        use Dtype::*;
        if self == other {
            return Some(self);
        }
        match (self, other) {
            (Object, _) | (_, Object) => Some(Object),
            (String, _) | (_, String) => Some(String),
            (Boolean, Integer) | (Integer, Boolean) => Some(Integer),
            (Boolean, Float) | (Float, Boolean) | (Integer, Float) | (Float, Integer) => {
                Some(Float)
            }
            (Date, Datetime) | (Datetime, Date) => Some(Datetime),
            _ => None,
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
