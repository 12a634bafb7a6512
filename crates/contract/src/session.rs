//! Bound contracts with preset call and transaction options.

use crate::{
    bound::BoundContract,
    event::EventRecord,
    filter::EventIterator,
    options::{CallOptions, FilterOptions, PendingTransaction, TransactOptions},
    value::CallOutput,
    BindError, Transport,
};
use alloy_dyn_abi::DynSolValue;
use alloy_sol_types::SolCall;

/// A bound contract with preset call and transaction options.
#[derive(Debug, Clone)]
pub struct Session<T> {
    contract: BoundContract<T>,
    call_options: CallOptions,
    transact_options: TransactOptions,
}

impl<T: Transport + 'static> Session<T> {
    pub const fn new(
        contract: BoundContract<T>,
        call_options: CallOptions,
        transact_options: TransactOptions,
    ) -> Self {
        Self {
            contract,
            call_options,
            transact_options,
        }
    }

    pub const fn contract(&self) -> &BoundContract<T> {
        &self.contract
    }

    pub const fn call_options(&self) -> &CallOptions {
        &self.call_options
    }

    pub const fn transact_options(&self) -> &TransactOptions {
        &self.transact_options
    }

    pub async fn call(&self, method: &str, args: &[DynSolValue]) -> Result<CallOutput, BindError> {
        self.contract.call(&self.call_options, method, args).await
    }

    pub async fn call_typed<C: SolCall>(&self, call: &C) -> Result<C::Return, BindError> {
        self.contract.call_typed(&self.call_options, call).await
    }

    pub async fn transact(
        &self,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<PendingTransaction, BindError> {
        self.contract
            .transact(&self.transact_options, method, args)
            .await
    }

    pub async fn transact_typed<C: SolCall>(&self, call: &C) -> Result<PendingTransaction, BindError> {
        self.contract
            .transact_typed(&self.transact_options, call)
            .await
    }

    pub async fn transfer(&self) -> Result<PendingTransaction, BindError> {
        self.contract.transfer(&self.transact_options).await
    }

    pub fn filter(
        &self,
        opts: &FilterOptions,
        event: &str,
        indexed: &[Vec<DynSolValue>],
    ) -> Result<EventIterator<T>, BindError> {
        self.contract.filter(opts, event, indexed)
    }

    pub fn parse(
        &self,
        event: &str,
        log: &alloy_rpc_types_eth::Log,
    ) -> Result<EventRecord, BindError> {
        self.contract.parse(event, log)
    }
}
