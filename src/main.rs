//! Arvol CLI Application
//!
//! A command-line interface for deploying, upgrading and using the token.

use arvol::cli::{self, AppState, CliResult};
use arvol::core::{parse_amount, Address, Amount};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arvol")]
#[command(version = "0.1.0")]
#[command(about = "An upgradeable fungible token ledger", long_about = None)]
struct Cli {
    /// Data directory for ledger storage
    #[arg(short, long, default_value = ".arvol_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the token behind a new proxy
    Deploy {
        /// Admin account; receives the initial supply
        #[arg(short, long)]
        admin: Address,

        /// Deployment parameters file (defaults to <data-dir>/deployment-params.json)
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Nonce mixed into the proxy address
        #[arg(long, default_value = "0")]
        nonce: u64,

        /// Replace an existing deployment
        #[arg(long)]
        force: bool,
    },

    /// Check that a logic version can take over the deployed storage
    PrepareUpgrade {
        /// Logic version, e.g. arvol-v1
        version: String,
    },

    /// Point the proxy at another logic version
    Upgrade {
        /// Admin account
        #[arg(short, long)]
        caller: Address,

        /// Logic version, e.g. arvol-v1
        version: String,
    },

    /// Call the initializer (rejected once the token is initialized)
    Initialize {
        #[arg(short, long)]
        caller: Address,

        /// Initial supply in base units
        #[arg(short, long, value_parser = parse_amount)]
        supply: Amount,

        #[arg(short, long, default_value = "Arvol")]
        name: String,

        #[arg(long, default_value = "ARV")]
        symbol: String,
    },

    /// Transfer tokens from the caller
    Transfer {
        #[arg(short, long)]
        caller: Address,

        #[arg(short, long)]
        to: Address,

        /// Amount in base units (decimal, or hex with 0x)
        #[arg(short, long, value_parser = parse_amount)]
        amount: Amount,
    },

    /// Set the caller's allowance for a spender
    Approve {
        #[arg(short, long)]
        caller: Address,

        #[arg(short, long)]
        spender: Address,

        /// Amount in base units (decimal, or hex with 0x)
        #[arg(short, long, value_parser = parse_amount)]
        amount: Amount,
    },

    /// Spend an allowance: move tokens from owner to recipient
    TransferFrom {
        /// Spender
        #[arg(short, long)]
        caller: Address,

        #[arg(short, long)]
        owner: Address,

        #[arg(short, long)]
        to: Address,

        /// Amount in base units (decimal, or hex with 0x)
        #[arg(short, long, value_parser = parse_amount)]
        amount: Amount,
    },

    /// Show an account balance
    Balance {
        #[arg(short, long)]
        account: Address,
    },

    /// Show how much a spender may move on an owner's behalf
    Allowance {
        #[arg(short, long)]
        owner: Address,

        #[arg(short, long)]
        spender: Address,
    },

    /// Display token and proxy information
    Info,

    /// List accounts holding tokens
    Holders {
        /// Number of holders to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Show recent Transfer and Approval events
    Events {
        /// Number of events to show
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },

    /// Account operations
    Account {
        #[command(subcommand)]
        action: AccountCommands,
    },
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Generate a random account address
    New,
}

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    // Commands that don't need a deployed proxy
    match &cli.command {
        Commands::Deploy {
            admin,
            params,
            nonce,
            force,
        } => {
            return cli::cmd_deploy(&cli.data_dir, *admin, params.as_deref(), *nonce, *force);
        }
        Commands::Account {
            action: AccountCommands::New,
        } => {
            return cli::cmd_account_new();
        }
        _ => {}
    }

    let state = AppState::load(cli.data_dir.clone())?;

    match cli.command {
        Commands::Deploy { .. } | Commands::Account { .. } => unreachable!(),

        Commands::PrepareUpgrade { version } => {
            cli::cmd_prepare_upgrade(&state, &version)?;
        }

        Commands::Upgrade { caller, version } => {
            cli::cmd_upgrade(&state, caller, &version)?;
        }

        Commands::Initialize {
            caller,
            supply,
            name,
            symbol,
        } => {
            cli::cmd_initialize(&state, caller, supply, name, symbol)?;
        }

        Commands::Transfer { caller, to, amount } => {
            cli::cmd_transfer(&state, caller, to, amount)?;
        }

        Commands::Approve {
            caller,
            spender,
            amount,
        } => {
            cli::cmd_approve(&state, caller, spender, amount)?;
        }

        Commands::TransferFrom {
            caller,
            owner,
            to,
            amount,
        } => {
            cli::cmd_transfer_from(&state, caller, owner, to, amount)?;
        }

        Commands::Balance { account } => {
            cli::cmd_balance(&state, account)?;
        }

        Commands::Allowance { owner, spender } => {
            cli::cmd_allowance(&state, owner, spender)?;
        }

        Commands::Info => {
            cli::cmd_info(&state)?;
        }

        Commands::Holders { count } => {
            cli::cmd_holders(&state, count)?;
        }

        Commands::Events { count } => {
            cli::cmd_events(&state, count)?;
        }
    }

    Ok(())
}
