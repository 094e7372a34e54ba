//! Newsrank server binary

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = newsrank_server::load_config().context("failed to load configuration")?;

    newsrank_server::run(config)
        .await
        .context("server exited with an error")?;

    Ok(())
}
