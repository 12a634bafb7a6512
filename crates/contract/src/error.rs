//! Error types returned by the binding façade.
//!
//! Every failure is a value of [`BindError`]. Argument problems that are
//! detected before any I/O are grouped under [`EncodingError`], and failures
//! reported by the node are carried as [`TransportError`] so callers can
//! inspect the JSON-RPC code and revert data.

use alloy_primitives::{Address, Bytes, U256};
use thiserror::Error;

/// Failure reported by a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        /// Revert data attached to the error, if the node returned any.
        data: Option<Bytes>,
    },

    /// The request never produced a JSON-RPC response (connection, timeout, serialization).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The live log stream ended.
    #[error("log subscription closed")]
    SubscriptionClosed,
}

impl TransportError {
    /// Revert data carried by an RPC error, if any.
    pub const fn revert_data(&self) -> Option<&Bytes> {
        match self {
            Self::Rpc { data, .. } => data.as_ref(),
            _ => None,
        }
    }
}

/// Argument problems detected while building a request, before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("{method}: expected {expected} arguments, got {got}")]
    ArgumentCount {
        method: String,
        expected: usize,
        got: usize,
    },

    #[error("{method}: argument #{index} `{name}` expects {expected}, got {got}")]
    ArgumentType {
        method: String,
        index: usize,
        name: String,
        expected: String,
        got: String,
    },

    #[error("{method}: argument #{index} `{name}` does not fit in {expected}")]
    ArgumentRange {
        method: String,
        index: usize,
        name: String,
        expected: String,
    },

    #[error("{method} is not payable but {value} wei was attached")]
    NonPayable { method: String, value: U256 },

    #[error("{contract} has no receive or payable fallback function")]
    NoReceive { contract: String },

    #[error("{event} has {indexed} indexed fields but {got} filter sets were given")]
    TooManyTopics {
        event: String,
        indexed: usize,
        got: usize,
    },

    #[error("{event}: indexed field `{name}` expects {expected}, got {got}")]
    TopicType {
        event: String,
        name: String,
        expected: String,
        got: String,
    },

    #[error("{event}: filter value for indexed field `{name}` does not fit in {expected}")]
    TopicRange {
        event: String,
        name: String,
        expected: String,
    },
}

/// A read-only call rejected by the node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("call to {method} failed{}: {source}", reason_suffix(.reason))]
pub struct ContractCallError {
    /// Signature of the called function.
    pub method: String,
    /// Decoded revert reason (`Error(string)`, `Panic(uint256)` or a declared custom error).
    pub reason: Option<String>,
    #[source]
    pub source: TransportError,
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|reason| format!(" with `{reason}`"))
        .unwrap_or_default()
}

/// Errors returned by the binding façade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("malformed ABI for {contract}: {reason}")]
    MalformedAbi { contract: String, reason: String },

    #[error("malformed bytecode for {contract}: {reason}")]
    MalformedBytecode { contract: String, reason: String },

    #[error("{0} has no deployment bytecode")]
    MissingBytecode(String),

    #[error("{contract} has no function `{name}`")]
    UnknownFunction { contract: String, name: String },

    #[error("{contract}: `{name}` is overloaded, use one of {candidates:?}")]
    AmbiguousFunction {
        contract: String,
        name: String,
        candidates: Vec<String>,
    },

    #[error("{contract} has no event `{name}`")]
    UnknownEvent { contract: String, name: String },

    #[error("{contract}: event `{name}` is overloaded, use one of {candidates:?}")]
    AmbiguousEvent {
        contract: String,
        name: String,
        candidates: Vec<String>,
    },

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    ContractCall(#[from] ContractCallError),

    #[error("no contract code at {0}")]
    NoCode(Address),

    #[error("submitting {method} failed: {source}")]
    SubmissionFailed {
        method: String,
        #[source]
        source: TransportError,
    },

    #[error("signing {method} failed: {reason}")]
    Signer { method: String, reason: String },

    #[error("failed to decode {context}: {reason}")]
    Decode { context: String, reason: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("watch task aborted: {0}")]
    Aborted(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl BindError {
    pub(crate) fn decode(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_error_display_includes_reason() {
        let err = ContractCallError {
            method: "withdraw(uint256)".to_string(),
            reason: Some("insufficient bond".to_string()),
            source: TransportError::Rpc {
                code: 3,
                message: "execution reverted".to_string(),
                data: None,
            },
        };
        assert_eq!(
            err.to_string(),
            "call to withdraw(uint256) failed with `insufficient bond`: RPC error 3: execution reverted"
        );
    }

    #[test]
    fn test_revert_data_only_on_rpc_errors() {
        let rpc = TransportError::Rpc {
            code: 3,
            message: "execution reverted".to_string(),
            data: Some(Bytes::from_static(&[0xde, 0xad])),
        };
        assert_eq!(rpc.revert_data().map(|d| d.len()), Some(2));
        assert!(TransportError::SubscriptionClosed.revert_data().is_none());
    }
}
