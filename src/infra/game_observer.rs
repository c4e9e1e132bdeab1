use crate::actions::ActionRequest;
use crate::state::{Session, TimeStep};
use crate::stats::EpisodeSummary;

/// Trait for observing game events during execution
pub trait GameObserver {
    /// Called when the bridge has started a game
    fn on_episode_start(&mut self, episode: u32, game_id: &str, agent: &str);

    /// Called for every observation, after the session has absorbed it
    fn on_step(&mut self, step: &TimeStep, session: &Session);

    /// Called when an action is selected
    fn on_action_selected(&mut self, _session: &Session, _action: &ActionRequest) {}

    /// Called when the last observation of a game has been handled
    fn on_episode_end(&mut self, summary: &EpisodeSummary);
}
