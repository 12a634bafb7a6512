//! CLI for interacting with Kroma contracts through their shipped ABIs.
//!
//! - `abi`: print a contract's functions and events
//! - `call`: invoke a read-only function
//! - `send`: submit a transaction
//! - `deploy`: deploy a new instance
//! - `logs`: query historical events
//! - `watch`: stream live events until interrupted

use alloy_primitives::{Address, U256};
use binding::KromaContract;
use clap::{Args, Parser, Subcommand};
use client::SignerSource;
use contract::{
    BoundContract, CallOptions, CancellationToken, FilterOptions, TransactOptions, WatchOptions,
};
use eyre::{bail, WrapErr};
use kroma_bind::{
    config::{Config, LogFormat},
    describe_abi,
    metrics::{install_prometheus_exporter, Metrics},
    run_call, run_deploy, run_logs, run_send, run_watch,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kroma-bind")]
#[command(about = "Call, transact with and watch Kroma contracts")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Private key for signing transactions (hex string, with or without 0x prefix)
    #[arg(short = 'k', long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Target {
    /// Contract name, e.g. L2OutputOracle
    contract: KromaContract,

    /// Contract address; defaults to the configured or predeploy address
    #[arg(long)]
    address: Option<Address>,
}

#[derive(Args)]
struct EventArgs {
    /// Event name or full signature
    event: String,

    /// Filter per indexed field, in order; `a|b` matches either, `*` matches any
    #[arg(long = "topic")]
    topics: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a contract's interface
    Abi { contract: KromaContract },

    /// Invoke a read-only function
    Call {
        #[command(flatten)]
        target: Target,
        /// Function name or full signature
        method: String,
        args: Vec<String>,
        /// Evaluate at this block instead of the latest
        #[arg(long, conflicts_with = "pending")]
        block: Option<u64>,
        /// Evaluate against the pending state
        #[arg(long)]
        pending: bool,
        /// Caller address
        #[arg(long)]
        from: Option<Address>,
    },

    /// Submit a transaction
    Send {
        #[command(flatten)]
        target: Target,
        /// Function name or full signature
        method: String,
        args: Vec<String>,
        /// Value to send, in wei
        #[arg(long, default_value = "0", value_parser = parse_wei)]
        value: U256,
        /// Sender address when signing through the remote signer
        #[arg(long)]
        from: Option<Address>,
    },

    /// Deploy a new contract instance
    Deploy {
        contract: KromaContract,
        /// Constructor arguments
        args: Vec<String>,
        /// Value to send with the deployment, in wei
        #[arg(long, default_value = "0", value_parser = parse_wei)]
        value: U256,
        #[arg(long)]
        from: Option<Address>,
    },

    /// Query historical events
    Logs {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        event: EventArgs,
        #[arg(long, default_value = "0")]
        from_block: u64,
        /// Last block to scan; defaults to the head at query time
        #[arg(long)]
        to_block: Option<u64>,
        /// Retries per chunk on transport errors
        #[arg(long, default_value = "0")]
        retries: usize,
    },

    /// Stream live events until interrupted
    Watch {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        event: EventArgs,
        /// Backfill from this block before streaming
        #[arg(long)]
        from_block: Option<u64>,
    },
}

fn parse_wei(value: &str) -> Result<U256, String> {
    value.parse().map_err(|e| format!("invalid wei amount: {e}"))
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)
        .wrap_err_with(|| format!("failed to load config from {}", cli.config))?;

    init_tracing(config.log_format);

    if let Some(port) = config.metrics_port {
        install_prometheus_exporter(port)?;
        info!(port, "Metrics exporter listening");
    }
    let metrics = Metrics::new();

    match cli.command {
        Command::Abi { contract } => {
            print!("{}", describe_abi(&*contract.descriptor()?));
        }
        Command::Call {
            target,
            method,
            args,
            block,
            pending,
            from,
        } => {
            let contract = bind(&config, &target).await?;
            let mut opts = CallOptions::default();
            if let Some(from) = from {
                opts = opts.caller(from);
            }
            if let Some(block) = block {
                opts = opts.at_block(block);
            }
            if pending {
                opts = opts.pending();
            }

            println!("{}", run_call(&contract, &opts, &method, &args, &metrics).await?);
        }
        Command::Send {
            target,
            method,
            args,
            value,
            from,
        } => {
            let contract = bind(&config, &target).await?;
            let opts = transact_options(&config, cli.private_key, from, target.contract, &contract)?
                .with_value(value);

            let pending = run_send(&contract, &opts, &method, &args, &metrics).await?;
            println!("{}", pending.tx_hash);
        }
        Command::Deploy {
            contract,
            args,
            value,
            from,
        } => {
            let layer = contract.layer();
            let provider = connect(&config, layer).await?;
            let transport = Arc::new(provider.clone());
            let signer = signer_source(&config, cli.private_key, from)?;
            let (sender, signer) = signer.into_signer_fn(config.chain_id(layer), provider)?;
            let opts = TransactOptions::new(sender)
                .with_signer(signer)
                .with_value(value);

            let deployment =
                run_deploy(contract.descriptor()?, transport, &opts, &args, &metrics).await?;
            println!("{} {}", deployment.address, deployment.transaction.tx_hash);
        }
        Command::Logs {
            target,
            event,
            from_block,
            to_block,
            retries,
        } => {
            let contract = bind(&config, &target).await?;
            let cancel = shutdown_token();
            let mut opts = match to_block {
                Some(to_block) => FilterOptions::range(from_block, to_block),
                None => FilterOptions::since(from_block),
            };
            opts = opts
                .with_chunk_size(config.chunk_size)
                .with_retries(retries)
                .with_cancel(cancel);

            for line in run_logs(&contract, &opts, &event.event, &event.topics, &metrics).await? {
                println!("{line}");
            }
        }
        Command::Watch {
            target,
            event,
            from_block,
        } => {
            let contract = bind(&config, &target).await?;
            let mut opts = WatchOptions::default()
                .with_poll_interval(config.poll_interval())
                .with_cancel(shutdown_token());
            opts.start = from_block;

            run_watch(&contract, &opts, &event.event, &event.topics, &metrics, |line| {
                println!("{line}")
            })
            .await?;
            info!("Watch stopped");
        }
    }

    Ok(())
}

/// Connect to the RPC endpoint serving `layer` and check its chain id.
async fn connect(
    config: &Config,
    layer: binding::Layer,
) -> eyre::Result<impl alloy_provider::Provider + Clone + 'static> {
    let provider = client::create_provider(config.rpc_url(layer))?;
    let expected = config.chain_id(layer);
    match client::check_connection(&provider, Some(expected)).await {
        Ok(_) => {}
        // A custom devnet may run with other chain ids; warn and carry on.
        Err(client::ClientError::ChainMismatch { expected, actual }) => {
            warn!(expected, actual, ?layer, "Endpoint chain id differs from network config");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(provider)
}

async fn bind(
    config: &Config,
    target: &Target,
) -> eyre::Result<BoundContract<impl alloy_provider::Provider + Clone + 'static>> {
    let address = match target.address {
        Some(address) => address,
        None => config.address_of(target.contract)?,
    };
    let provider = connect(config, target.contract.layer()).await?;
    info!(contract = %target.contract, %address, "Bound contract");

    Ok(BoundContract::new(
        address,
        target.contract.descriptor()?,
        Arc::new(provider),
    ))
}

fn signer_source(
    config: &Config,
    private_key: Option<String>,
    from: Option<Address>,
) -> eyre::Result<SignerSource> {
    match (private_key, &config.remote_signer_url, from) {
        (Some(private_key), _, _) => Ok(SignerSource::Local { private_key }),
        (None, Some(url), Some(address)) => Ok(SignerSource::Remote {
            url: url.clone(),
            address,
        }),
        (None, Some(_), None) => bail!("--from is required when signing remotely"),
        (None, None, _) => bail!("no signer: pass --private-key or configure remote_signer_url"),
    }
}

fn transact_options<P>(
    config: &Config,
    private_key: Option<String>,
    from: Option<Address>,
    contract: KromaContract,
    bound: &BoundContract<P>,
) -> eyre::Result<TransactOptions>
where
    P: alloy_provider::Provider + Clone + 'static,
{
    let signer = signer_source(config, private_key, from)?;
    let provider = (**bound.transport()).clone();
    let (sender, signer) = signer.into_signer_fn(config.chain_id(contract.layer()), provider)?;
    Ok(TransactOptions::new(sender).with_signer(signer))
}

/// Token cancelled on Ctrl-C.
fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, shutting down");
        }
        cancel.cancel();
    });
    token
}
