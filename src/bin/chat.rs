use lawdesk::config::ChatConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lawdesk::logging::init();

    // Load configuration
    let config = ChatConfig::from_env()?;

    lawdesk::actuators::chat::back::serve(config).await
}
