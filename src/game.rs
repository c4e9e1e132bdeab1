use std::time::Instant;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{info, warn};

use crate::agent::Agent;
use crate::bridge_interface::StartRequest;
use crate::config::GameSettings;
use crate::infra::wire::action_space_to_proto;
use crate::infra::{BridgeChannel, BridgeError, GameObserver};
use crate::stats::{EpisodeOutcome, EpisodeSummary, RunStats};

/// Decisions slower than this are reported.
const SLOW_TICK_MS: u128 = 100;

pub struct Game<R, W> {
    channel: BridgeChannel<R, W>,
    settings: GameSettings,
    replays_folder: Option<String>,
    agent: Agent,
    observer: Box<dyn GameObserver>,
    stats: RunStats,
}

impl<R, W> Game<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        channel: BridgeChannel<R, W>,
        settings: GameSettings,
        replays_folder: Option<String>,
        agent: Agent,
        observer: impl GameObserver + 'static,
    ) -> Self {
        Self {
            channel,
            settings,
            replays_folder,
            agent,
            observer: Box::new(observer),
            stats: RunStats::default(),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    fn start_request(&self) -> StartRequest {
        StartRequest {
            agent_name: self.agent.name().to_string(),
            map: self.settings.map.clone(),
            difficulty: self.settings.difficulty.clone(),
            step_mul: self.settings.step_mul,
            screen_size: self.settings.screen_size,
            minimap_size: self.settings.minimap_size,
            action_space: action_space_to_proto(self.agent.policy().action_space()) as i32,
        }
    }

    /// Play `episodes` games back to back, or until the bridge stops offering
    /// games when `episodes` is 0.
    pub async fn run(&mut self, episodes: u32) -> Result<(), BridgeError> {
        let space = self.agent.policy().action_space();
        let mut episode_number = 0;

        while episodes == 0 || episode_number < episodes {
            let request = self.start_request();
            let Some(mut episode) = self
                .channel
                .start(request, space, self.replays_folder.as_deref())
                .await?
            else {
                info!("Bridge offers no more games");
                break;
            };
            episode_number += 1;

            self.agent.set_schema(episode.schema.clone());
            self.observer
                .on_episode_start(episode_number, &episode.game_id, self.agent.name());

            loop {
                let tick_start = Instant::now();
                let action = self.agent.step(&episode.step);
                let tick_duration = tick_start.elapsed();

                self.observer.on_step(&episode.step, self.agent.session());
                if tick_duration.as_millis() > SLOW_TICK_MS {
                    warn!(
                        "Tick {} took {:.2}ms (action: {})",
                        self.agent.session().tick,
                        tick_duration.as_secs_f64() * 1000.0,
                        action
                    );
                }

                if episode.step.last() {
                    break;
                }
                self.observer
                    .on_action_selected(self.agent.session(), &action);
                episode.act(&action).await?;
            }

            let session = self.agent.session();
            let summary = EpisodeSummary {
                episode: episode_number,
                ticks: session.tick,
                total_reward: session.episode_reward,
                outcome: EpisodeOutcome::from_final_reward(episode.step.observation.reward),
                learned_entries: self.agent.policy().learned_entries(),
            };
            self.observer.on_episode_end(&summary);
            self.stats.record_episode(&summary);
        }

        self.stats.print_summary();
        Ok(())
    }
}
