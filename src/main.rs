use anyhow::Result;

use feedtui::cli::Flags;
use feedtui::controllers::{feed_controller, init_session, start_app};
use feedtui::models::{Config, FeedClient};
use feedtui::FeedEngine;

#[tokio::main]
async fn main() -> Result<()> {
    let flags = Flags::from_args();

    let mut config = Config::load()?;
    let client = FeedClient::new(config.base_url.clone());

    // Fill in the viewer id from the service if the config only has a token.
    init_session(&client, &mut config).await?;

    if flags.whoami() {
        match &config.viewer_id {
            Some(id) => println!("{}", id),
            None => println!("not signed in"),
        }
        return Ok(());
    }

    let engine = FeedEngine::new(client, config.session());

    if flags.post() {
        let content = feed_controller::compose_via_editor()?;
        if content.trim().is_empty() {
            println!("Empty draft, nothing posted.");
            return Ok(());
        }
        engine.create_post(content.trim()).await?;
        println!("Posted.");
        Ok(())
    } else {
        // Initial load; the TUI renders whatever is in the store.
        engine.reconcile().await?;
        start_app(engine)
            .await
            .map_err(|e| anyhow::anyhow!(e.to_string()))
    }
}
