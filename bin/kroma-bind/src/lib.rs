//! Command implementations for the `kroma-bind` CLI.
//!
//! Every command runs against any [`Transport`], so the same code serves a
//! live RPC endpoint and the scripted transport used in tests.

pub mod config;
pub mod metrics;

use crate::metrics::Metrics;
use contract::{
    format_value, BoundContract, CallOptions, CallOutput, ContractDescriptor, Deployment,
    DynSolValue, EventRecord, EventSpec, FilterOptions, ParamSpec, PendingTransaction,
    TransactOptions, Transport, WatchOptions,
};
use eyre::{bail, WrapErr};
use std::{fmt::Write, sync::Arc, time::Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Buffered records between a watch task and its printer.
const WATCH_BUFFER: usize = 64;

/// Parse textual arguments against declared parameter types.
pub fn parse_args(inputs: &[ParamSpec], raw: &[String]) -> eyre::Result<Vec<DynSolValue>> {
    if inputs.len() != raw.len() {
        bail!("expected {} arguments, got {}", inputs.len(), raw.len());
    }

    inputs
        .iter()
        .zip(raw)
        .map(|(param, raw)| {
            param
                .ty
                .coerce_str(raw)
                .wrap_err_with(|| format!("invalid value for `{}`: {raw}", display_name(param)))
        })
        .collect()
}

/// Parse indexed-field filters, one argument per indexed position.
///
/// Alternatives are separated by `|`; `*` or an empty string leaves the
/// position unconstrained.
pub fn parse_topics(event: &EventSpec, raw: &[String]) -> eyre::Result<Vec<Vec<DynSolValue>>> {
    let indexed: Vec<_> = event.indexed_fields().collect();
    if raw.len() > indexed.len() {
        bail!(
            "{} has {} indexed fields, got {} filters",
            event.name(),
            indexed.len(),
            raw.len()
        );
    }

    indexed
        .iter()
        .zip(raw)
        .map(|(field, raw)| {
            if raw.is_empty() || raw == "*" {
                return Ok(Vec::new());
            }
            raw.split('|')
                .map(|value| {
                    field
                        .ty
                        .coerce_str(value)
                        .wrap_err_with(|| format!("invalid filter for `{}`: {value}", field.name))
                })
                .collect()
        })
        .collect()
}

/// Render call outputs, one line per named field for multi-value results.
pub fn render_output(output: &CallOutput) -> String {
    match output {
        CallOutput::Unit => "()".to_string(),
        CallOutput::Value(value) => format_value(value),
        CallOutput::Record(fields) => fields
            .iter()
            .map(|(name, value)| format!("{name}: {}", format_value(value)))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// One-line rendering of a decoded event.
pub fn render_record(record: &EventRecord) -> String {
    let mut line = record.event.clone();
    if let (Some(block), Some(index)) = (record.block_number, record.log_index) {
        let _ = write!(line, " @{block}:{index}");
    }
    for field in &record.fields {
        let _ = write!(line, " {}={}", field.name, format_value(&field.value));
    }
    line
}

/// Human-readable listing of a contract's interface.
pub fn describe_abi(descriptor: &ContractDescriptor) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", descriptor.name());

    if !descriptor.constructor_inputs().is_empty() {
        let _ = writeln!(out, "  constructor({})", join_params(descriptor.constructor_inputs()));
    }
    if descriptor.accepts_value_transfer() {
        let _ = writeln!(out, "  receive() payable");
    }

    for function in descriptor.functions() {
        let mutability = if function.is_payable() {
            " payable"
        } else if function.is_read_only() {
            " view"
        } else {
            ""
        };
        let returns = if function.outputs().is_empty() {
            String::new()
        } else {
            format!(" returns ({})", join_params(function.outputs()))
        };
        let _ = writeln!(
            out,
            "  {} {}({}){mutability}{returns}",
            function.selector(),
            function.name(),
            join_params(function.inputs()),
        );
    }

    for event in descriptor.events() {
        let fields = event
            .fields()
            .iter()
            .map(|field| {
                let indexed = if field.indexed { " indexed" } else { "" };
                format!("{}{indexed} {}", field.ty.sol_type_name(), field.name)
            })
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "  event {}({fields})", event.name());
    }

    out
}

fn join_params(params: &[ParamSpec]) -> String {
    params
        .iter()
        .map(|param| {
            if param.name.is_empty() {
                param.ty.sol_type_name().into_owned()
            } else {
                format!("{} {}", param.ty.sol_type_name(), param.name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_name(param: &ParamSpec) -> String {
    if param.name.is_empty() {
        param.ty.sol_type_name().into_owned()
    } else {
        param.name.clone()
    }
}

/// Invoke a read-only function and render its result.
pub async fn run_call<T: Transport + 'static>(
    contract: &BoundContract<T>,
    opts: &CallOptions,
    method: &str,
    raw_args: &[String],
    metrics: &Metrics,
) -> eyre::Result<String> {
    let function = contract.descriptor().function(method)?;
    let args = parse_args(function.inputs(), raw_args)?;

    let started = Instant::now();
    let result = contract.call(opts, method, &args).await;
    metrics.record_call(
        contract.descriptor().name(),
        function.name(),
        result.is_ok(),
        started.elapsed(),
    );

    Ok(render_output(&result?))
}

/// Submit a transaction invoking `method`.
pub async fn run_send<T: Transport + 'static>(
    contract: &BoundContract<T>,
    opts: &TransactOptions,
    method: &str,
    raw_args: &[String],
    metrics: &Metrics,
) -> eyre::Result<PendingTransaction> {
    let function = contract.descriptor().function(method)?;
    let args = parse_args(function.inputs(), raw_args)?;

    let result = contract.transact(opts, method, &args).await;
    metrics.record_transaction(contract.descriptor().name(), function.name(), result.is_ok());

    let pending = result?;
    info!(tx_hash = %pending.tx_hash, method = function.name(), "Transaction submitted");
    Ok(pending)
}

/// Deploy a new instance with textual constructor arguments.
pub async fn run_deploy<T: Transport + 'static>(
    descriptor: Arc<ContractDescriptor>,
    transport: Arc<T>,
    opts: &TransactOptions,
    raw_args: &[String],
    metrics: &Metrics,
) -> eyre::Result<Deployment<T>> {
    let args = parse_args(descriptor.constructor_inputs(), raw_args)?;
    let name = descriptor.name().to_string();

    let result = BoundContract::deploy(descriptor, transport, opts, &args).await;
    metrics.record_transaction(&name, "constructor", result.is_ok());

    let deployment = result?;
    info!(
        contract = %name,
        address = %deployment.address,
        tx_hash = %deployment.transaction.tx_hash,
        "Deployment submitted"
    );
    Ok(deployment)
}

/// Query historical events and render them in chain order.
pub async fn run_logs<T: Transport + 'static>(
    contract: &BoundContract<T>,
    opts: &FilterOptions,
    event: &str,
    raw_topics: &[String],
    metrics: &Metrics,
) -> eyre::Result<Vec<String>> {
    let spec = contract.descriptor().event(event)?;
    let topics = parse_topics(spec, raw_topics)?;

    let mut iterator = contract.filter(opts, event, &topics)?;
    let mut lines = Vec::new();
    while let Some(record) = iterator.next().await {
        let record = record?;
        metrics.record_event(contract.descriptor().name(), &record.event);
        lines.push(render_record(&record));
    }
    debug!(event, count = lines.len(), "Log query complete");
    Ok(lines)
}

/// Watch events, handing each rendered record to `output`.
///
/// Returns once the watch ends: cleanly after `opts.cancel` fires, or with
/// the error that stopped it.
pub async fn run_watch<T, F>(
    contract: &BoundContract<T>,
    opts: &WatchOptions,
    event: &str,
    raw_topics: &[String],
    metrics: &Metrics,
    mut output: F,
) -> eyre::Result<()>
where
    T: Transport + 'static,
    F: FnMut(String),
{
    let spec = contract.descriptor().event(event)?;
    let topics = parse_topics(spec, raw_topics)?;

    let (tx, mut rx) = mpsc::channel(WATCH_BUFFER);
    let subscription = contract.watch(opts, event, &topics, tx).await?;
    info!(event, address = %contract.address(), "Watching events");

    while let Some(record) = rx.recv().await {
        metrics.record_event(contract.descriptor().name(), &record.event);
        output(render_record(&record));
    }

    subscription.join().await?;
    Ok(())
}
