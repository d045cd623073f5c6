//! CLI commands for the token ledger
//!
//! Implements all command handlers for the CLI interface. Each mutating
//! command loads the saved proxy, runs one call through the host, and saves
//! the result.

use crate::config::{DeploymentParams, DEPLOYMENT_PARAMS_FILE};
use crate::core::{format_units, Address, Amount};
use crate::crypto::sha256_hex;
use crate::proxy::{LedgerCall, LogicRegistry, ProxyHost};
use crate::storage::{Storage, StorageConfig};
use crate::token::LedgerEvent;
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub host: ProxyHost,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load the deployed proxy from the data directory
    pub fn load(data_dir: PathBuf) -> CliResult<Self> {
        let storage = open_storage(&data_dir)?;

        if !storage.exists() {
            return Err(format!(
                "No deployment found in {:?}. Run `arvol deploy` first.",
                data_dir
            )
            .into());
        }

        let proxy = storage.load()?;
        let host = ProxyHost::new(proxy, LogicRegistry::with_defaults());

        Ok(Self {
            host,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.host.snapshot())?;
        Ok(())
    }

    /// Run one ledger call, print its events and save on success
    ///
    /// Rejections are returned unprinted; `main` reports them.
    fn execute(&self, caller: Address, call: LedgerCall) -> CliResult<Vec<LedgerEvent>> {
        let method = call.method();
        let events = self.host.execute(caller, call)?;
        self.save()?;

        println!("✅ {} succeeded", method);
        for event in &events {
            print_event(self, event);
        }
        Ok(events)
    }

    fn format_amount(&self, amount: Amount) -> String {
        let (decimals, symbol) = self
            .host
            .with_storage(|s| (s.decimals(), s.symbol().to_string()));
        format!(
            "{} {} ({} base units)",
            format_units(amount, decimals),
            symbol,
            amount
        )
    }
}

fn open_storage(data_dir: &Path) -> CliResult<Storage> {
    let storage_config = StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    Ok(Storage::new(storage_config)?)
}

fn print_event(state: &AppState, event: &LedgerEvent) {
    match event {
        LedgerEvent::Transfer(e) => println!(
            "   📤 Transfer {} -> {}: {}",
            e.from,
            e.to,
            state.format_amount(e.amount)
        ),
        LedgerEvent::Approval(e) => println!(
            "   📝 Approval {} -> {}: {}",
            e.owner,
            e.spender,
            state.format_amount(e.amount)
        ),
    }
}

/// Deploy the token behind a new proxy and initialize it
pub fn cmd_deploy(
    data_dir: &Path,
    admin: Address,
    params_path: Option<&Path>,
    nonce: u64,
    force: bool,
) -> CliResult<()> {
    let storage = open_storage(data_dir)?;

    if storage.exists() && !force {
        println!("⚠️  A deployment already exists at {:?}", data_dir);
        println!("   Use --force to replace it (this discards the existing ledger)");
        return Ok(());
    }

    let default_path = data_dir.join(DEPLOYMENT_PARAMS_FILE);
    let params = match params_path {
        Some(path) => DeploymentParams::load(path)?,
        None => DeploymentParams::load_or_default(&default_path)?,
    };

    println!("📜 Deploying with the account: {}", admin);
    println!("   Logic: {}", params.logic_version);

    let host = ProxyHost::deploy(LogicRegistry::with_defaults(), admin, &params, nonce)?;
    let proxy = host.snapshot();
    storage.save(&proxy)?;

    println!("✅ Token deployed to: {}", proxy.address());
    println!("   🏷️  {} ({})", params.token_name, params.token_symbol);
    println!(
        "   💰 Initial supply: {} base units credited to {}",
        params.initial_supply, admin
    );
    println!("   📁 Data directory: {:?}", data_dir);

    Ok(())
}

/// Validate a logic version against the deployed storage without switching
pub fn cmd_prepare_upgrade(state: &AppState, version: &str) -> CliResult<()> {
    println!("🔍 Preparing upgrade to {}...", version);

    let version = state.host.prepare_upgrade(version)?;
    let proxy = state.host.snapshot();

    println!("✅ {} is compatible with proxy {}", version, proxy.address());
    println!("   Active logic: {}", proxy.implementation());
    println!(
        "   Storage layout: {}",
        proxy.storage().layout_version()
    );

    Ok(())
}

/// Switch the proxy to another logic version
pub fn cmd_upgrade(state: &AppState, caller: Address, version: &str) -> CliResult<()> {
    println!("⬆️  Upgrading proxy contract...");

    let record = state.host.upgrade(caller, version)?;
    state.save()?;

    println!(
        "✅ Proxy {} upgraded: {} -> {}",
        state.host.address(),
        record.from,
        record.to
    );

    Ok(())
}

/// Call the initializer through the proxy (rejected once initialized)
pub fn cmd_initialize(
    state: &AppState,
    caller: Address,
    initial_supply: Amount,
    name: String,
    symbol: String,
) -> CliResult<()> {
    state.execute(
        caller,
        LedgerCall::Initialize {
            initial_supply,
            name,
            symbol,
        },
    )?;
    Ok(())
}

/// Transfer tokens from the caller
pub fn cmd_transfer(state: &AppState, caller: Address, to: Address, amount: Amount) -> CliResult<()> {
    state.execute(caller, LedgerCall::Transfer { to, amount })?;
    Ok(())
}

/// Set the caller's allowance for a spender
pub fn cmd_approve(
    state: &AppState,
    caller: Address,
    spender: Address,
    amount: Amount,
) -> CliResult<()> {
    state.execute(caller, LedgerCall::Approve { spender, amount })?;
    Ok(())
}

/// Transfer tokens out of an owner's balance using the caller's allowance
pub fn cmd_transfer_from(
    state: &AppState,
    caller: Address,
    owner: Address,
    to: Address,
    amount: Amount,
) -> CliResult<()> {
    state.execute(caller, LedgerCall::TransferFrom { owner, to, amount })?;
    Ok(())
}

/// Show an account balance
pub fn cmd_balance(state: &AppState, account: Address) -> CliResult<()> {
    let balance = state.host.with_storage(|s| s.balance_of(&account));

    println!("💰 Balance for {}", account);
    println!("   {}", state.format_amount(balance));

    Ok(())
}

/// Show an allowance
pub fn cmd_allowance(state: &AppState, owner: Address, spender: Address) -> CliResult<()> {
    let allowance = state.host.with_storage(|s| s.allowance(&owner, &spender));

    println!("📝 Allowance {} -> {}", owner, spender);
    println!("   {}", state.format_amount(allowance));

    Ok(())
}

/// Display token and proxy information
pub fn cmd_info(state: &AppState) -> CliResult<()> {
    let proxy = state.host.snapshot();
    let token = proxy.storage();

    println!("🪙  Token Info");
    println!("   ├─ Name: {}", token.name());
    println!("   ├─ Symbol: {}", token.symbol());
    println!("   ├─ Decimals: {}", token.decimals());
    println!(
        "   ├─ Total supply: {}",
        state.format_amount(token.total_supply())
    );
    println!("   ├─ Holders: {}", token.holder_count());
    println!("   ├─ Initialized: {}", token.is_initialized());
    println!("   ├─ Storage layout: {}", token.layout_version());
    println!(
        "   └─ State digest: {}",
        sha256_hex(&serde_json::to_vec(token)?)
    );
    println!();
    println!("🔗 Proxy");
    println!("   ├─ Address: {}", proxy.address());
    println!("   ├─ Admin: {}", proxy.admin());
    println!("   ├─ Logic: {}", proxy.implementation());
    println!("   ├─ Upgrades: {}", proxy.upgrades().len());
    println!(
        "   └─ Deployed: {}",
        proxy.deployed_at().format("%Y-%m-%d %H:%M:%S")
    );

    for record in proxy.upgrades() {
        println!(
            "      └─ {} -> {} by {} at {}",
            record.from,
            record.to,
            record.by.short(),
            record.at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    match token.check_conservation() {
        Some(_) => println!("\n✅ Balances sum to total supply"),
        None => println!("\n❌ Balances do NOT sum to total supply!"),
    }

    Ok(())
}

/// List accounts with a non-zero balance
pub fn cmd_holders(state: &AppState, count: usize) -> CliResult<()> {
    let mut holders = state.host.with_storage(|s| s.holders());

    if holders.is_empty() {
        println!("📭 No holders yet.");
        return Ok(());
    }

    holders.sort_by(|a, b| b.1.cmp(&a.1));

    println!("📋 Holders ({}):", holders.len());
    for (address, balance) in holders.iter().take(count) {
        println!("   {} - {}", address, state.format_amount(*balance));
    }
    if holders.len() > count {
        println!("   ... and {} more", holders.len() - count);
    }

    Ok(())
}

/// Show recent ledger events
pub fn cmd_events(state: &AppState, count: usize) -> CliResult<()> {
    let proxy = state.host.snapshot();
    let events = proxy.events();

    if events.is_empty() {
        println!("📭 No events recorded.");
        return Ok(());
    }

    println!("📜 Recent events:");
    let skip = events.len().saturating_sub(count);
    for event in &events[skip..] {
        print!("   {} ", event.timestamp().format("%Y-%m-%d %H:%M:%S"));
        print_event(state, event);
    }

    Ok(())
}

/// Generate a fresh random account address
pub fn cmd_account_new() -> CliResult<()> {
    let address = Address::random();

    println!("🔐 New account address: {}", address);
    println!("   Use it as --caller or as a transfer recipient.");

    Ok(())
}
