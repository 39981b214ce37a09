use anyhow::Result;
use clap::Parser;
use taiko_bindings_cli::{
    args::{Cli, Command},
    command::{self, abi, call, protocol, watch},
    config::Config,
    display::{self, show},
};
use taiko_contracts_client::{
    binding::WatchOpts,
    config::{ConfigBuilder, ConfigExt},
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Cli {
        args,
        json,
        command,
    } = cli;

    let config: Config = ConfigBuilder::new(args).build()?;

    // setup tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(config.tracing_env_filter()?)
        .try_init()?;

    let fork = config.fork;

    match command {
        Command::Contracts => {
            let registry = command::registry(fork)?;
            show(json, &abi::contracts(&registry), display::display_contracts)?;
        }

        Command::Abi { contract } => {
            let registry = command::registry(fork)?;
            show(json, &abi::abi(&registry, &contract, fork)?, display::display_abi)?;
        }

        Command::DecodeError { data } => {
            let registry = command::registry(fork)?;
            show(
                json,
                &abi::decode_error(&registry, &data)?,
                display::display_decoded_error,
            )?;
        }

        Command::DecodeCalldata { data } => {
            let registry = command::registry(fork)?;
            show(
                json,
                &abi::decode_calldata(&registry, &data)?,
                display::display_decoded_call,
            )?;
        }

        Command::Call {
            contract,
            address,
            function,
            block,
            args,
        } => {
            let registry = command::registry(fork)?;
            let contract = registry.contract(&contract, fork)?;
            let address = config.named_contract_address(contract.name(), address.as_deref())?;
            let client = config.chain.query_client().await?;

            let output = call::call(
                &client.provider,
                &registry,
                contract,
                address,
                &function,
                &args,
                block,
            )
            .await?;
            show(json, &output, display::display_call_output)?;
        }

        Command::Watch {
            contract,
            address,
            event,
            from_block,
        } => {
            let registry = command::registry(fork)?;
            let contract = registry.contract(&contract, fork)?;
            let address = config.named_contract_address(contract.name(), address.as_deref())?;
            let client = config.chain.query_client().await?;

            let cancel = CancellationToken::new();
            tokio::spawn({
                let cancel = cancel.clone();
                async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        tracing::info!("Interrupted, stopping watch");
                    }
                    cancel.cancel();
                }
            });

            let opts = WatchOpts {
                start: from_block,
                poll_interval: config.chain.poll_interval(),
            };

            watch::watch(
                client.provider.clone(),
                contract,
                address,
                &event,
                opts,
                config.chain.backfill_chunk_size,
                cancel,
                |event| display::show_event(json, &event),
            )
            .await?;
        }

        Command::Whitelist { address } => {
            let address = config.contract_address("PreconfWhitelist", address.as_deref())?;
            let client = config.chain.query_client().await?;

            let status = protocol::whitelist(&client.preconf_whitelist(address)).await?;
            show(json, &status, display::display_whitelist)?;
        }

        Command::ForcedInclusions {
            address,
            history_from,
        } => {
            let address = config.contract_address("ForcedInclusionStore", address.as_deref())?;
            let client = config.chain.query_client().await?;

            let status =
                protocol::forced_inclusions(&client.forced_inclusion_store(address), history_from)
                    .await?;
            show(json, &status, display::display_forced_inclusions)?;
        }

        Command::ForkRoute { address, selector } => {
            let address = config.contract_address("ForkRouter", address.as_deref())?;
            let client = config.chain.query_client().await?;

            let output = protocol::fork_route(&client.fork_router(address), &selector).await?;
            show(json, &output, display::display_fork_route)?;
        }
    }

    Ok(())
}
