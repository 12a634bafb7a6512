//! Generic contract bindings driven by ABI descriptors.
//!
//! A [`ContractDescriptor`] is parsed once from an ABI and optional bytecode
//! and shared by every [`BoundContract`] of that type. A bound contract pairs
//! the descriptor with an address and a [`Transport`], and offers:
//! - read-only calls ([`BoundContract::call`]) decoded into [`CallOutput`]
//! - transactions ([`BoundContract::transact`], [`BoundContract::transfer`])
//! - deployment ([`BoundContract::deploy`])
//! - historical event queries ([`BoundContract::filter`]), live watches
//!   ([`BoundContract::watch`]) and log decoding ([`BoundContract::parse`])
//!
//! Statically typed `sol!` calls and events go through the same paths via the
//! `*_typed` variants.

mod bound;
mod descriptor;
mod error;
mod event;
mod filter;
mod options;
mod session;
mod transport;
mod value;
mod watch;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use bound::{BoundContract, Deployment};
pub use descriptor::{ContractDescriptor, EventFieldSpec, EventSpec, FunctionSpec, ParamSpec};
pub use error::{BindError, ContractCallError, EncodingError, TransportError};
pub use event::{encode_topic, EventField, EventRecord, TopicSets};
pub use filter::{EventIterator, IteratorState};
pub use options::{
    CallOptions, FilterOptions, PendingTransaction, SignerFn, TransactOptions, WatchOptions,
    DEFAULT_CHUNK_SIZE,
};
pub use session::Session;
pub use transport::{LogStream, Transport};
pub use value::{format_value, CallOutput};
pub use watch::Subscription;

pub use alloy_dyn_abi::{DynSolType, DynSolValue};
pub use tokio_util::sync::CancellationToken;
