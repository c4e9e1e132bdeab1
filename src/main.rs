use dotenv::dotenv;
use probebot::actions::ActionSchema;
use probebot::infra::{DefaultObserver, bridge};
use probebot::{Agent, Config, Game};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("probebot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let config = Config::from_env()?;
    tracing::info!("Agent: {}", config.agent);
    if let Some(seed) = config.seed {
        tracing::info!("Seed: {}", seed);
    }

    let policy = config.agent.build(config.qlearning);
    let schema = ActionSchema::defaults(config.agent.action_space());
    let agent = Agent::new(policy, schema, config.seed);

    let (process, channel) = bridge::spawn(&config.bridge)?;
    let mut game = Game::new(
        channel,
        config.game,
        config.replays_folder,
        agent,
        DefaultObserver,
    );
    let result = game.run(config.episodes).await;
    drop(game);

    process.shutdown().await?;
    result?;
    Ok(())
}
