//! Decoded call results and value formatting.

use crate::BindError;
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{hex, Address, U256};

/// Result of a read-only call, shaped by the function's declared outputs.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutput {
    /// The function declares no outputs.
    Unit,
    /// The function declares exactly one output.
    Value(DynSolValue),
    /// The function declares several outputs, kept in declared order.
    ///
    /// Unnamed outputs are keyed `output{index}`.
    Record(Vec<(String, DynSolValue)>),
}

impl CallOutput {
    /// Look up a named field of a multi-output result.
    pub fn field(&self, name: &str) -> Option<&DynSolValue> {
        match self {
            Self::Record(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// The single output value, if the function declares exactly one.
    pub fn into_value(self) -> Option<DynSolValue> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_uint(self) -> Result<U256, BindError> {
        self.single("uint")?
            .as_uint()
            .map(|(value, _)| value)
            .ok_or_else(|| BindError::decode("call output", "expected an unsigned integer"))
    }

    pub fn into_address(self) -> Result<Address, BindError> {
        self.single("address")?
            .as_address()
            .ok_or_else(|| BindError::decode("call output", "expected an address"))
    }

    pub fn into_bool(self) -> Result<bool, BindError> {
        self.single("bool")?
            .as_bool()
            .ok_or_else(|| BindError::decode("call output", "expected a bool"))
    }

    pub fn into_string(self) -> Result<String, BindError> {
        match self.single("string")? {
            DynSolValue::String(value) => Ok(value),
            _ => Err(BindError::decode("call output", "expected a string")),
        }
    }

    fn single(self, expected: &str) -> Result<DynSolValue, BindError> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Unit => Err(BindError::decode(
                "call output",
                format!("expected a single {expected}, function returns nothing"),
            )),
            Self::Record(fields) => Err(BindError::decode(
                "call output",
                format!("expected a single {expected}, got {} fields", fields.len()),
            )),
        }
    }
}

/// Render a decoded value the way Solidity tooling prints it.
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => hex::encode_prefixed(&word[..*size]),
        DynSolValue::Address(address) => address.to_checksum(None),
        DynSolValue::Function(function) => hex::encode_prefixed(function.as_slice()),
        DynSolValue::Bytes(bytes) => hex::encode_prefixed(bytes),
        DynSolValue::String(s) => format!("{s:?}"),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            format!("[{}]", join(items))
        }
        DynSolValue::Tuple(items) => format!("({})", join(items)),
        #[allow(unreachable_patterns)]
        other => format!("{other:?}"),
    }
}

fn join(items: &[DynSolValue]) -> String {
    items.iter().map(format_value).collect::<Vec<_>>().join(", ")
}

/// Whether every integer and fixed-bytes value fits the width it declares.
///
/// `Uint(300, 8)` is well typed as far as [`DynSolType::matches`] goes but
/// cannot be a `uint8`. Nested arrays and tuples are checked element-wise.
///
/// [`DynSolType::matches`]: alloy_dyn_abi::DynSolType::matches
pub(crate) fn fits_declared_width(value: &DynSolValue) -> bool {
    match value {
        DynSolValue::Uint(u, size) => u.bit_len() <= *size,
        DynSolValue::Int(i, size) => {
            // Two's complement: the magnitude bits of a negative value are the
            // complement of its raw word.
            let magnitude = if i.is_negative() {
                !i.into_raw()
            } else {
                i.into_raw()
            };
            magnitude.bit_len() < *size
        }
        DynSolValue::FixedBytes(word, size) => word
            .get(*size..)
            .is_some_and(|padding| padding.iter().all(|byte| *byte == 0)),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            items.iter().all(fits_declared_width)
        }
        _ => true,
    }
}

/// Solidity type name of a value, for error messages.
pub(crate) fn type_name(value: &DynSolValue) -> String {
    value
        .as_type()
        .map(|ty| ty.sol_type_name().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}
