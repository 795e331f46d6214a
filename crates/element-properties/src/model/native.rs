//! Native values carried by, and produced from, property values.
//!
//! [`PrimitiveValue`] is the dynamically-typed scalar stored inside a
//! primitive property value. [`NativeValue`] is the wider value space the
//! property helper converts from and [`PropertyValue::value_as_object`]
//! renders into.
//!
//! [`PropertyValue::value_as_object`]: crate::model::PropertyValue::value_as_object

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;

use crate::model::PrimitiveTypeCategory;

/// The native kind of a [`PrimitiveValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    String,
}

impl PrimitiveKind {
    /// Returns the kind name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::BigInteger => "biginteger",
            PrimitiveKind::BigDecimal => "bigdecimal",
            PrimitiveKind::String => "string",
        }
    }
}

/// A native scalar stored in a primitive property value.
#[derive(Debug, Clone)]
pub enum PrimitiveValue {
    Boolean(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    BigInteger(BigInt),
    BigDecimal(BigDecimal),
    String(String),
}

impl PrimitiveValue {
    /// Returns the native kind of this value.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            PrimitiveValue::Boolean(_) => PrimitiveKind::Boolean,
            PrimitiveValue::Byte(_) => PrimitiveKind::Byte,
            PrimitiveValue::Char(_) => PrimitiveKind::Char,
            PrimitiveValue::Short(_) => PrimitiveKind::Short,
            PrimitiveValue::Int(_) => PrimitiveKind::Int,
            PrimitiveValue::Long(_) => PrimitiveKind::Long,
            PrimitiveValue::Float(_) => PrimitiveKind::Float,
            PrimitiveValue::Double(_) => PrimitiveKind::Double,
            PrimitiveValue::BigInteger(_) => PrimitiveKind::BigInteger,
            PrimitiveValue::BigDecimal(_) => PrimitiveKind::BigDecimal,
            PrimitiveValue::String(_) => PrimitiveKind::String,
        }
    }

    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrimitiveValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Renders this value as JSON for the wire format.
    ///
    /// Big numbers travel as strings so no precision is lost; non-finite
    /// floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            PrimitiveValue::Boolean(b) => serde_json::Value::Bool(*b),
            PrimitiveValue::Byte(v) => serde_json::Value::from(*v),
            PrimitiveValue::Char(c) => serde_json::Value::String(c.to_string()),
            PrimitiveValue::Short(v) => serde_json::Value::from(*v),
            PrimitiveValue::Int(v) => serde_json::Value::from(*v),
            PrimitiveValue::Long(v) => serde_json::Value::from(*v),
            PrimitiveValue::Float(v) => serde_json::Number::from_f64(f64::from(*v))
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            PrimitiveValue::Double(v) => serde_json::Number::from_f64(*v)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            PrimitiveValue::BigInteger(v) => serde_json::Value::String(v.to_string()),
            PrimitiveValue::BigDecimal(v) => serde_json::Value::String(v.to_string()),
            PrimitiveValue::String(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Reads a wire JSON scalar the way a dynamically-typed JSON reader
    /// would: integers that fit 32 bits become `Int`, wider ones `Long`
    /// (or `BigInteger` beyond 64 bits), fractions `Double`, text `String`.
    ///
    /// Big numbers, bytes and shorts written as strings are read back as
    /// numbers when the declared category asks for them, so the coercion
    /// table sees the same input it saw when the value was first set.
    /// Returns `Ok(None)` for JSON `null` and `Err(kind)` for arrays/objects.
    pub fn from_json(
        json: &serde_json::Value,
        category: Option<PrimitiveTypeCategory>,
    ) -> Result<Option<PrimitiveValue>, &'static str> {
        match json {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Bool(b) => Ok(Some(PrimitiveValue::Boolean(*b))),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Some(match i32::try_from(i) {
                        Ok(small) => PrimitiveValue::Int(small),
                        Err(_) => PrimitiveValue::Long(i),
                    }))
                } else if let Some(u) = n.as_u64() {
                    Ok(Some(PrimitiveValue::BigInteger(BigInt::from(u))))
                } else {
                    Ok(n.as_f64().map(PrimitiveValue::Double))
                }
            }
            serde_json::Value::String(s) => Ok(Some(read_string_for(s, category))),
            serde_json::Value::Array(_) => Err("array"),
            serde_json::Value::Object(_) => Err("object"),
        }
    }
}

fn read_string_for(s: &str, category: Option<PrimitiveTypeCategory>) -> PrimitiveValue {
    let parsed = match category {
        Some(PrimitiveTypeCategory::BigInteger) => {
            BigInt::from_str(s).ok().map(PrimitiveValue::BigInteger)
        }
        Some(PrimitiveTypeCategory::BigDecimal) => {
            BigDecimal::from_str(s).ok().map(PrimitiveValue::BigDecimal)
        }
        Some(PrimitiveTypeCategory::Byte) | Some(PrimitiveTypeCategory::Short) => {
            s.parse::<i32>().ok().map(PrimitiveValue::Int)
        }
        _ => None,
    };
    parsed.unwrap_or_else(|| PrimitiveValue::String(s.to_string()))
}

impl PartialEq for PrimitiveValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PrimitiveValue::Boolean(a), PrimitiveValue::Boolean(b)) => a == b,
            (PrimitiveValue::Byte(a), PrimitiveValue::Byte(b)) => a == b,
            (PrimitiveValue::Char(a), PrimitiveValue::Char(b)) => a == b,
            (PrimitiveValue::Short(a), PrimitiveValue::Short(b)) => a == b,
            (PrimitiveValue::Int(a), PrimitiveValue::Int(b)) => a == b,
            (PrimitiveValue::Long(a), PrimitiveValue::Long(b)) => a == b,
            // Bitwise so that equality stays reflexive for NaN.
            (PrimitiveValue::Float(a), PrimitiveValue::Float(b)) => a.to_bits() == b.to_bits(),
            (PrimitiveValue::Double(a), PrimitiveValue::Double(b)) => a.to_bits() == b.to_bits(),
            (PrimitiveValue::BigInteger(a), PrimitiveValue::BigInteger(b)) => a == b,
            (PrimitiveValue::BigDecimal(a), PrimitiveValue::BigDecimal(b)) => a == b,
            (PrimitiveValue::String(a), PrimitiveValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PrimitiveValue {}

impl Hash for PrimitiveValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            PrimitiveValue::Boolean(v) => v.hash(state),
            PrimitiveValue::Byte(v) => v.hash(state),
            PrimitiveValue::Char(v) => v.hash(state),
            PrimitiveValue::Short(v) => v.hash(state),
            PrimitiveValue::Int(v) => v.hash(state),
            PrimitiveValue::Long(v) => v.hash(state),
            PrimitiveValue::Float(v) => v.to_bits().hash(state),
            PrimitiveValue::Double(v) => v.to_bits().hash(state),
            PrimitiveValue::BigInteger(v) => v.hash(state),
            PrimitiveValue::BigDecimal(v) => v.hash(state),
            PrimitiveValue::String(v) => v.hash(state),
        }
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveValue::Boolean(v) => write!(f, "{}", v),
            PrimitiveValue::Byte(v) => write!(f, "{}", v),
            PrimitiveValue::Char(v) => write!(f, "{}", v),
            PrimitiveValue::Short(v) => write!(f, "{}", v),
            PrimitiveValue::Int(v) => write!(f, "{}", v),
            PrimitiveValue::Long(v) => write!(f, "{}", v),
            PrimitiveValue::Float(v) => write!(f, "{:?}", v),
            PrimitiveValue::Double(v) => write!(f, "{:?}", v),
            PrimitiveValue::BigInteger(v) => write!(f, "{}", v),
            PrimitiveValue::BigDecimal(v) => write!(f, "{}", v),
            PrimitiveValue::String(v) => f.write_str(v),
        }
    }
}

macro_rules! primitive_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PrimitiveValue {
                fn from(v: $ty) -> Self {
                    PrimitiveValue::$variant(v)
                }
            }
        )*
    };
}

primitive_from! {
    bool => Boolean,
    i8 => Byte,
    char => Char,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    BigInt => BigInteger,
    BigDecimal => BigDecimal,
    String => String,
}

impl From<&str> for PrimitiveValue {
    fn from(v: &str) -> Self {
        PrimitiveValue::String(v.to_string())
    }
}

/// A dynamically-typed native value.
///
/// The property helper dispatches on this type when converting arbitrary
/// native maps into property values.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Null,
    String(String),
    Int(i32),
    Long(i64),
    Short(i16),
    Date(DateTime<Utc>),
    Char(char),
    Byte(i8),
    Boolean(bool),
    Float(f32),
    BigDecimal(BigDecimal),
    BigInteger(BigInt),
    Double(f64),
    List(Vec<NativeValue>),
    Map(BTreeMap<String, NativeValue>),
}

impl NativeValue {
    /// Returns true for [`NativeValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, NativeValue::Null)
    }

    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NativeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the map payload, if this is a map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, NativeValue>> {
        match self {
            NativeValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<PrimitiveValue> for NativeValue {
    fn from(v: PrimitiveValue) -> Self {
        match v {
            PrimitiveValue::Boolean(v) => NativeValue::Boolean(v),
            PrimitiveValue::Byte(v) => NativeValue::Byte(v),
            PrimitiveValue::Char(v) => NativeValue::Char(v),
            PrimitiveValue::Short(v) => NativeValue::Short(v),
            PrimitiveValue::Int(v) => NativeValue::Int(v),
            PrimitiveValue::Long(v) => NativeValue::Long(v),
            PrimitiveValue::Float(v) => NativeValue::Float(v),
            PrimitiveValue::Double(v) => NativeValue::Double(v),
            PrimitiveValue::BigInteger(v) => NativeValue::BigInteger(v),
            PrimitiveValue::BigDecimal(v) => NativeValue::BigDecimal(v),
            PrimitiveValue::String(v) => NativeValue::String(v),
        }
    }
}

macro_rules! native_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for NativeValue {
                fn from(v: $ty) -> Self {
                    NativeValue::$variant(v)
                }
            }
        )*
    };
}

native_from! {
    String => String,
    i32 => Int,
    i64 => Long,
    i16 => Short,
    DateTime<Utc> => Date,
    char => Char,
    i8 => Byte,
    bool => Boolean,
    f32 => Float,
    BigDecimal => BigDecimal,
    BigInt => BigInteger,
    f64 => Double,
    Vec<NativeValue> => List,
    BTreeMap<String, NativeValue> => Map,
}

impl From<&str> for NativeValue {
    fn from(v: &str) -> Self {
        NativeValue::String(v.to_string())
    }
}

impl<T: Into<NativeValue>> From<Option<T>> for NativeValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(NativeValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash_of(v: &PrimitiveValue) -> u64 {
        let mut hasher = DefaultHasher::new();
        v.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_nan_equality_is_reflexive() {
        let a = PrimitiveValue::Double(f64::NAN);
        assert_eq!(a, a.clone());
        assert_eq!(hash_of(&a), hash_of(&a.clone()));
        assert_ne!(PrimitiveValue::Int(1), PrimitiveValue::Long(1));
    }

    #[test]
    fn test_display() {
        assert_eq!(PrimitiveValue::Double(1.0).to_string(), "1.0");
        assert_eq!(PrimitiveValue::Char('x').to_string(), "x");
        assert_eq!(PrimitiveValue::from("abc").to_string(), "abc");
        assert_eq!(PrimitiveValue::Long(-7).to_string(), "-7");
    }

    #[test]
    fn test_from_json_number_widths() {
        let small = serde_json::json!(42);
        let wide = serde_json::json!(5_000_000_000i64);
        let huge = serde_json::json!(u64::MAX);
        let frac = serde_json::json!(2.5);

        assert_eq!(PrimitiveValue::from_json(&small, None), Ok(Some(PrimitiveValue::Int(42))));
        assert_eq!(
            PrimitiveValue::from_json(&wide, None),
            Ok(Some(PrimitiveValue::Long(5_000_000_000)))
        );
        assert_eq!(
            PrimitiveValue::from_json(&huge, None),
            Ok(Some(PrimitiveValue::BigInteger(BigInt::from(u64::MAX))))
        );
        assert_eq!(PrimitiveValue::from_json(&frac, None), Ok(Some(PrimitiveValue::Double(2.5))));
        assert_eq!(PrimitiveValue::from_json(&serde_json::Value::Null, None), Ok(None));
        assert_eq!(PrimitiveValue::from_json(&serde_json::json!([1]), None), Err("array"));
    }

    #[test]
    fn test_from_json_strings_follow_category() {
        let digits = serde_json::json!("12345678901234567890123");
        assert_eq!(
            PrimitiveValue::from_json(&digits, Some(PrimitiveTypeCategory::BigInteger)),
            Ok(Some(PrimitiveValue::BigInteger(
                BigInt::from_str("12345678901234567890123").unwrap()
            )))
        );
        assert_eq!(
            PrimitiveValue::from_json(&digits, Some(PrimitiveTypeCategory::String)),
            Ok(Some(PrimitiveValue::String("12345678901234567890123".to_string())))
        );
        assert_eq!(
            PrimitiveValue::from_json(&serde_json::json!("7"), Some(PrimitiveTypeCategory::Short)),
            Ok(Some(PrimitiveValue::Int(7)))
        );
    }

    #[test]
    fn test_native_from_option() {
        assert_eq!(NativeValue::from(None::<i32>), NativeValue::Null);
        assert_eq!(NativeValue::from(Some("a")), NativeValue::String("a".to_string()));
    }
}
