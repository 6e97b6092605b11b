use clap::{Arg, ArgAction, Command};
use fte_core::{Context, IssueTracker, JiraClient, Result};
use tracing::{error, info};

mod logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("info");

    let matches = Command::new("fte_health")
        .version("0.1.0")
        .about("Check configuration and credentials against the issue tracker")
        .author("FTE Estimates Team")
        .arg(
            Arg::new("test_server")
                .short('t')
                .action(ArgAction::SetTrue)
                .help("Use the test server"),
        )
        .get_matches();

    let use_test_server = matches.get_flag("test_server");

    // Initialize context from config file and environment
    let ctx = Context::load()?;

    if ctx.ctx_out {
        info!("Context: {:?}", ctx);
    }

    info!("Checking configuration...");
    match &ctx.config_file {
        Some(path) => info!("✓ Config file: {}", path.display()),
        None => info!("⚠ No config file found (using environment only)"),
    }

    let server = match ctx.server_url(use_test_server) {
        Ok(server) => {
            info!("✓ Server: {}", server);
            server.to_string()
        }
        Err(err) => {
            error!("✗ {}", err);
            std::process::exit(1);
        }
    };

    info!("✓ FTE next cycle field: {}", ctx.next_cycle_field);
    info!("✓ FTE remaining field: {}", ctx.remaining_field);

    info!("Testing login...");
    let (client, username) = match JiraClient::login(&ctx, use_test_server).await {
        Ok(login) => {
            info!("✓ Logged in as {}", login.1);
            login
        }
        Err(err) => {
            error!("✗ Login failed: {}", err);
            std::process::exit(1);
        }
    };

    client.close().await?;

    println!("\n=== FTE Estimates Health Check Results ===");
    println!("Server: {}", server);
    println!("User: {}", username);
    println!("\nCredentials work, initiative_estimates is ready to run.");

    Ok(())
}
