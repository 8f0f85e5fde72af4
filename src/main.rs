// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;

// Use library instead of local modules
use cnpj_lookup::{telemetry, Config};

fn main() -> Result<()> {
    let config = Config::from_env()?;
    run_ui_mode(&config)
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    use cnpj_lookup::BrasilApiClient;

    if let Some(path) = &config.log_file {
        telemetry::init_file(path)?;
    }

    println!("🏢 Loading CNPJ Lookup v{}...", cnpj_lookup::VERSION);
    println!("   Registry: {}", config.api_base_url);

    let client = BrasilApiClient::new(config)?;
    tracing::info!(base_url = %config.api_base_url, timeout_secs = config.timeout.as_secs(), "starting TUI");

    let mut app = ui::App::new(client);
    ui::run_ui(&mut app)?;

    println!("\n✅ CNPJ Lookup closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(config: &Config) -> Result<()> {
    telemetry::init_stderr();
    tracing::error!(base_url = %config.api_base_url, "TUI mode not compiled in");
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use web UI: cargo run --bin cnpj-server --features server");
    std::process::exit(1);
}
