use clap::Parser;
use cli::{Args, Command};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ztarknet_core::account::PrivateKey;
use ztarknet_core::calldata::parse_calldata;
use ztarknet_core::config::AccountConfig;
use ztarknet_core::confirmation::ConfirmationResult;
use ztarknet_core::contract_class::CompiledClassSource;
use ztarknet_core::Toolkit;
use ztarknet_types::felt::Felt;

mod cli;

/// Configures tracing with default level INFO,
/// If the environment variable `RUST_LOG` is set, it will be used instead.
/// Logs go to stderr so that stdout only carries results.
fn configure_tracing() {
    let level_filter_layer =
        EnvFilter::builder().with_default_directive(tracing::Level::INFO.into()).from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(level_filter_layer)
        .with_writer(std::io::stderr)
        .init();
}

fn print_confirmation(confirmation: &ConfirmationResult) {
    let block = confirmation.block_info.and_then(|info| info.block_number);
    match (confirmation.finality_status, block) {
        (Some(status), Some(number)) => println!("Status: {status:?} (block {number})"),
        (Some(status), None) => println!("Status: {status:?}"),
        _ => {}
    }
}

/// Account given with `--from-address`/`--from-key`, if any
fn account_override(
    address: Option<Felt>,
    private_key: Option<Felt>,
) -> Result<Option<AccountConfig>, anyhow::Error> {
    let Some(address) = address else {
        return Ok(None);
    };

    Ok(Some(AccountConfig {
        address: Some(address),
        private_key: private_key.map(PrivateKey::new).transpose()?,
    }))
}

/// Stops confirmation waits on CTRL+C. The transactions themselves are not affected.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted; no longer waiting for confirmation");
            cancel.cancel();
        }
    });

    token
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // a missing .env is not an error
    dotenvy::dotenv().ok();
    configure_tracing();

    let args = Args::parse();
    let config = args.to_config()?;
    info!("Using node at {} ({} transactions)", config.rpc_url, config.tx_version);

    let toolkit = Toolkit::connect(config).with_cancellation(cancel_on_ctrl_c());

    match args.command {
        Command::Declare { sierra_path, casm_path, compiled_class_hash } => {
            let compiled_class = match (casm_path, compiled_class_hash) {
                (Some(path), _) => CompiledClassSource::CasmFile(path),
                (None, Some(hash)) => CompiledClassSource::Hash(hash),
                (None, None) => {
                    anyhow::bail!("either --casm-path or --compiled-class-hash is required")
                }
            };

            let output = toolkit.declare(&sierra_path, &compiled_class).await?;
            println!("Transaction hash: {:#x}", output.transaction_hash);
            println!("Class hash: {:#x}", output.class_hash);
            println!("Compiled class hash: {:#x}", output.compiled_class_hash);
            print_confirmation(&output.confirmation);
            println!("COUNTER_CLASS_HASH={:#x}", output.class_hash);
        }
        Command::Deploy { class_hash, calldata, salt, not_unique } => {
            let calldata = parse_calldata(&calldata)?;
            let output = toolkit.deploy(class_hash, calldata, salt, !not_unique).await?;
            println!("Transaction hash: {:#x}", output.transaction_hash);
            println!("Contract address: {:#x}", output.contract_address);
            println!("Salt: {:#x}", output.salt);
            print_confirmation(&output.confirmation);
            println!("COUNTER_CONTRACT_ADDRESS={:#x}", output.contract_address);
        }
        Command::Invoke { contract, function, calldata, nonce } => {
            let calldata = parse_calldata(&calldata)?;
            let output = toolkit.invoke(contract, &function, calldata, nonce).await?;
            println!("Transaction hash: {:#x}", output.transaction_hash);
            print_confirmation(&output.confirmation);
        }
        Command::Read { contract, function, calldata, block } => {
            let calldata = parse_calldata(&calldata)?;
            for felt in toolkit.read(contract, &function, calldata, block).await? {
                println!("{felt:#x}");
            }
        }
        Command::Transfer { recipient, amount, token, from_address, from_key } => {
            let sender = account_override(from_address, from_key)?;
            let output = toolkit.transfer(recipient, &amount, token, sender.as_ref()).await?;
            println!("Transferred {amount} to {recipient:#x}");
            println!("Transaction hash: {:#x}", output.transaction_hash);
            print_confirmation(&output.confirmation);
        }
        Command::Mint { recipient, amount, token, from_address, from_key } => {
            let minter = account_override(from_address, from_key)?;
            let output = toolkit.mint(recipient, amount, token, minter.as_ref()).await?;
            println!("Transaction hash: {:#x}", output.transaction_hash);
            print_confirmation(&output.confirmation);
        }
        Command::Balance { account, token } => {
            let balance = toolkit.balance(account, token).await?;
            println!("Account: {:#x}", balance.account);
            println!("Token: {:#x}", balance.token);
            println!("Balance: {} {} ({} raw)", balance.formatted(), balance.symbol, balance.raw);
        }
        Command::CreateAccount { class_hash, funding_amount } => {
            let created = toolkit.create_account(class_hash, funding_amount).await?;
            println!("Funding transaction hash: {:#x}", created.funding_transaction_hash);
            println!("Deploy transaction hash: {:#x}", created.deploy_transaction_hash);
            print_confirmation(&created.confirmation);
            println!(
                r"
| Account address |  {:#x}
| Private key     |  {}
| Public key      |  {:#x}
| Class hash      |  {:#x}",
                created.address,
                created.key_pair.private_key.to_fixed_hex_string(),
                created.key_pair.public_key,
                created.class_hash
            );
        }
        Command::CheckAccount { address } => {
            let status = toolkit.check_account(address).await?;
            println!("Account {:#x} is deployed", status.address);
            println!("Class hash: {:#x}", status.class_hash);
            println!("Nonce: {:#x}", status.nonce);
        }
    }

    Ok(())
}
