use tracing::{debug, info};

use crate::actions::ActionRequest;
use crate::state::{Session, TimeStep};
use crate::stats::EpisodeSummary;

use super::game_observer::GameObserver;

pub struct DefaultObserver;

impl GameObserver for DefaultObserver {
    fn on_episode_start(&mut self, episode: u32, game_id: &str, agent: &str) {
        info!("Episode {} started: game {} with agent {}", episode, game_id, agent);
    }

    fn on_step(&mut self, step: &TimeStep, session: &Session) {
        let obs = &step.observation;
        debug!(
            "tick: {}, minerals: {}, vespene: {}, supply: {}/{}, own units: {}, enemies: {}, home: {:?}",
            session.tick,
            obs.player.minerals,
            obs.player.vespene,
            obs.player.food_used,
            obs.player.food_cap,
            obs.own_unit_count(),
            obs.enemy_unit_count(),
            session.home_side,
        );
    }

    fn on_action_selected(&mut self, session: &Session, action: &ActionRequest) {
        if !action.is_no_op() {
            info!("tick {}: {}", session.tick, action);
        }
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        info!(
            "Episode {} finished: {} after {} ticks, reward {:.2}",
            summary.episode, summary.outcome, summary.ticks, summary.total_reward
        );
        if let Some(entries) = summary.learned_entries {
            info!("Learned entries: {}", entries);
        }
    }
}
