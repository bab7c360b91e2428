//! dropclaim CLI Application

mod cli;

use clap::Parser as _;
use cli::{ClaimCommands, Cli, Commands, SnapshotCommands};
use dropclaim_sdk::commands::{claim_params, snapshot_build, snapshot_proof, snapshot_schema};

fn init_tracing() -> eyre::Result<()> {
    #[cfg(feature = "tokio-console")]
    {
        // tokio-console: layers the console subscriber with fmt
        use tracing_subscriber::prelude::*;
        tracing_subscriber::registry()
            .with(console_subscriber::spawn())
            .with(
                tracing_subscriber::fmt::layer().with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                ),
            )
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing: {:?}", e))?;
    }

    #[cfg(not(feature = "tokio-console"))]
    {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_timer(tracing_subscriber::fmt::time::uptime())
            .with_target(false)
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing: {:?}", e))?;
    }

    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> eyre::Result<()> {
    // Needed before any HTTPS request
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| eyre::eyre!("Failed to install rustls crypto provider: {e:?}"))?;

    // Missing .env is fine
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let cli = Cli::parse();

    let res = match cli.command {
        Commands::Claim { command } => match command {
            ClaimCommands::Params(args) => {
                let input = (&args).into();
                claim_params(args.common.into(), input, args.params_out).await
            }
        },
        Commands::Snapshot { command } => match command {
            SnapshotCommands::Build(args) => {
                let layout = args.layout();
                snapshot_build(
                    args.common.into(),
                    args.entries,
                    args.token_decimals,
                    layout,
                    args.snapshot_out,
                )
                .await
            }
            SnapshotCommands::Proof(args) => {
                snapshot_proof(
                    args.common.into(),
                    args.snapshot,
                    args.claimer,
                    args.token_decimals,
                    args.proof_out,
                )
                .await
            }
            SnapshotCommands::Schema(args) => snapshot_schema(args.schema_out).await,
        },
    };

    if let Err(e) = res {
        tracing::error!("Error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
