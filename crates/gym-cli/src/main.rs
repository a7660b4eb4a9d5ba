use anyhow::Result;
use tracing::debug;

use gym_cli::cli::Cli;
use gym_cli::logging;
use gym_remote::Connection;
use gym_roster::Roster;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();
    logging::init();
    let cli = Cli::init();

    let conn = Connection::open(&cli.connection_config())?;
    debug!(url = %conn.base_url(), "connecting to member service");

    let roster = Roster::new(conn, cli.credentials())
        .with_server_filter(cli.command.server_filter());
    let (username, password) = cli.operator_login()?;
    roster.login(&username, &password).await?;

    cli.command.run(&roster).await?;

    Ok(())
}
