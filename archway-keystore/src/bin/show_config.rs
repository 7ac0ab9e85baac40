use anyhow::Context;
use archway_keystore::KeystoreConfig;

fn main() -> anyhow::Result<()> {
    archway_keystore::init();

    let config = KeystoreConfig::from_env().context("Invalid keystore configuration")?;

    println!(
        "Archway Keystore Configuration ({} v{}):\n",
        archway_keystore::NAME,
        archway_keystore::VERSION
    );
    println!("  Backend: {}", config.backend);
    println!("  Keystore directory: {}", config.keystore_dir.display());
    println!("  Address prefix: {}", config.address_prefix);
    println!("  Default HD path: {}", config.hd_path);
    println!("  Ledger open timeout: {} ms", config.ledger_open_timeout_ms);
    println!("  Ledger listen timeout: {} ms", config.ledger_listen_timeout_ms);
    println!(
        "  Argon2id: {} KiB, {} passes, {} lanes",
        config.kdf.memory_cost, config.kdf.iterations, config.kdf.parallelism
    );
    Ok(())
}
