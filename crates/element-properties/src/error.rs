//! Error types for property values, the property helper, validation and the
//! JSON wire codec.

use thiserror::Error;

use crate::model::PrimitiveTypeCategory;

/// Stable error codes, one per error family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Missing or blank caller-supplied parameter
    InvalidParameter,
    /// E002: Array element written beyond the declared count
    ArrayIndexOutOfBounds,
    /// E003: Primitive value does not match its category
    InvalidPrimitiveValue,
    /// E004: Primitive category cannot be resolved
    InvalidPrimitiveClass,
    /// E005: Typed accessor used against the wrong kind of stored value
    HelperLogic,
    /// E006: Malformed or over-limit wire data
    MalformedWire,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidParameter => "E001",
            ErrorCode::ArrayIndexOutOfBounds => "E002",
            ErrorCode::InvalidPrimitiveValue => "E003",
            ErrorCode::InvalidPrimitiveClass => "E004",
            ErrorCode::HelperLogic => "E005",
            ErrorCode::MalformedWire => "E006",
        }
    }
}

/// Internal invariant violations raised by the property model and helper.
///
/// These indicate a defect in the calling code rather than bad user input;
/// they are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("[E002] array index {index} is out of bounds for declared array count {count}")]
    ArrayIndexOutOfBounds { index: usize, count: usize },

    #[error("[E003] primitive value of kind {value_kind} is not valid for category {category:?} (expected {expected})")]
    InvalidPrimitiveValue {
        category: PrimitiveTypeCategory,
        expected: &'static str,
        value_kind: &'static str,
    },

    #[error("[E004] primitive type category {name:?} cannot be resolved")]
    InvalidPrimitiveClass { name: String },

    #[error("[E005] {helper_method} called by {method_name} from {source_name} found a stored value of kind {found} for property {property_name:?}")]
    HelperLogic {
        source_name: String,
        method_name: String,
        helper_method: &'static str,
        property_name: String,
        found: String,
    },
}

impl PropertyError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PropertyError::ArrayIndexOutOfBounds { .. } => ErrorCode::ArrayIndexOutOfBounds,
            PropertyError::InvalidPrimitiveValue { .. } => ErrorCode::InvalidPrimitiveValue,
            PropertyError::InvalidPrimitiveClass { .. } => ErrorCode::InvalidPrimitiveClass,
            PropertyError::HelperLogic { .. } => ErrorCode::HelperLogic,
        }
    }
}

/// Why a caller-supplied parameter was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterProblem {
    /// The parameter was absent.
    Missing,
    /// The parameter was present but empty or whitespace.
    Blank,
    /// The parameter was present but structurally unusable.
    Malformed,
}

impl std::fmt::Display for ParameterProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterProblem::Missing => write!(f, "missing"),
            ParameterProblem::Blank => write!(f, "blank"),
            ParameterProblem::Malformed => write!(f, "malformed"),
        }
    }
}

/// Caller input error: a required GUID, name or search parameter was not usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[E001] parameter {parameter_name} passed to {method_name} is {problem}{}", detail_suffix(.detail))]
pub struct InvalidParameterError {
    pub parameter_name: String,
    pub method_name: String,
    pub problem: ParameterProblem,
    pub detail: Option<String>,
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {}", d),
        None => String::new(),
    }
}

impl InvalidParameterError {
    pub(crate) fn new(
        parameter_name: &str,
        method_name: &str,
        problem: ParameterProblem,
    ) -> Self {
        Self {
            parameter_name: parameter_name.to_string(),
            method_name: method_name.to_string(),
            problem,
            detail: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::InvalidParameter
    }
}

/// Error while decoding the JSON wire format.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("[E006] malformed JSON: {message}")]
    Json { message: String },

    #[error("[E006] nesting depth {depth} exceeds maximum {max}")]
    DepthExceeded { depth: usize, max: usize },

    #[error("[E006] container holds {count} properties, maximum is {max}")]
    TooManyProperties { count: usize, max: usize },
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::MalformedWire
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json {
            message: err.to_string(),
        }
    }
}

/// Error while encoding to the JSON wire format.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("[E006] JSON serialization failed: {message}")]
    Json { message: String },
}

impl EncodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::MalformedWire
    }
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        EncodeError::Json {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = PropertyError::ArrayIndexOutOfBounds { index: 3, count: 3 };
        assert_eq!(err.code().code(), "E002");
        assert_eq!(
            err.to_string(),
            "[E002] array index 3 is out of bounds for declared array count 3"
        );

        let err = PropertyError::InvalidPrimitiveClass {
            name: "OM_PRIMITIVE_TYPE_UUID".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::InvalidPrimitiveClass);
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = InvalidParameterError::new("guid", "getAsset", ParameterProblem::Blank);
        assert_eq!(err.to_string(), "[E001] parameter guid passed to getAsset is blank");

        let err = err.with_detail("whitespace only");
        assert_eq!(
            err.to_string(),
            "[E001] parameter guid passed to getAsset is blank: whitespace only"
        );
        assert_eq!(err.code().code(), "E001");
    }
}
