//! Kroma contract bindings.
//!
//! Two flavours of binding live here side by side:
//! - A registry of the shipped contract artifacts (ABI and creation code),
//!   loaded on demand into [`contract::ContractDescriptor`]s for dynamic use
//! - Typed interfaces generated with alloy's `sol!` macro, grouped by area
//!   (output oracle, bridge, validator, governance, token)
//!
//! Well-known L2 predeploy addresses are listed in [`predeploys`].

pub mod bridge;
pub mod governance;
pub mod oracle;
pub mod predeploys;
pub mod token;
pub mod validator;

mod registry;

pub use registry::{KromaContract, Layer, UnknownContract};
