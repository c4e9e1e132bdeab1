//! Per-episode results and running averages over a run.

use std::collections::VecDeque;
use std::fmt;

use tracing::info;

pub const DEFAULT_WINDOW: usize = 100;

/// Moving average calculator
#[derive(Debug, Clone)]
pub struct MovingAverage {
    values: VecDeque<f32>,
    window_size: usize,
    sum: f32,
}

impl MovingAverage {
    pub fn new(window_size: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(window_size),
            window_size,
            sum: 0.0,
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.values.len() >= self.window_size
            && let Some(old) = self.values.pop_front()
        {
            self.sum -= old;
        }
        self.values.push_back(value);
        self.sum += value;
    }

    pub fn average(&self) -> f32 {
        if self.values.is_empty() {
            0.0
        } else {
            self.sum / self.values.len() as f32
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeOutcome {
    Victory,
    Defeat,
    Tie,
}

impl EpisodeOutcome {
    /// The environment reports the result as the sign of the final reward.
    pub fn from_final_reward(reward: f32) -> Self {
        if reward > 0.0 {
            EpisodeOutcome::Victory
        } else if reward < 0.0 {
            EpisodeOutcome::Defeat
        } else {
            EpisodeOutcome::Tie
        }
    }
}

impl fmt::Display for EpisodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EpisodeOutcome::Victory => "victory",
            EpisodeOutcome::Defeat => "defeat",
            EpisodeOutcome::Tie => "tie",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub episode: u32,
    pub ticks: u64,
    pub total_reward: f32,
    pub outcome: EpisodeOutcome,
    /// Size of the learned table, for agents that learn.
    pub learned_entries: Option<usize>,
}

/// Statistics across all episodes of a run
#[derive(Debug, Clone)]
pub struct RunStats {
    pub episodes: u32,
    pub victories: u32,
    pub defeats: u32,
    pub ties: u32,
    pub total_ticks: u64,
    pub rewards: MovingAverage,
    pub lengths: MovingAverage,
    pub win_rate: MovingAverage,
    pub last_learned_entries: Option<usize>,
}

impl RunStats {
    pub fn new(window_size: usize) -> Self {
        Self {
            episodes: 0,
            victories: 0,
            defeats: 0,
            ties: 0,
            total_ticks: 0,
            rewards: MovingAverage::new(window_size),
            lengths: MovingAverage::new(window_size),
            win_rate: MovingAverage::new(window_size),
            last_learned_entries: None,
        }
    }

    pub fn record_episode(&mut self, summary: &EpisodeSummary) {
        self.episodes += 1;
        self.total_ticks += summary.ticks;
        match summary.outcome {
            EpisodeOutcome::Victory => self.victories += 1,
            EpisodeOutcome::Defeat => self.defeats += 1,
            EpisodeOutcome::Tie => self.ties += 1,
        }
        self.rewards.push(summary.total_reward);
        self.lengths.push(summary.ticks as f32);
        self.win_rate.push(if summary.outcome == EpisodeOutcome::Victory {
            1.0
        } else {
            0.0
        });
        if summary.learned_entries.is_some() {
            self.last_learned_entries = summary.learned_entries;
        }
    }

    pub fn print_summary(&self) {
        info!("=== Run Summary ===");
        info!("Episodes: {}", self.episodes);
        info!(
            "Victories: {}, Defeats: {}, Ties: {}",
            self.victories, self.defeats, self.ties
        );
        info!("Total ticks: {}", self.total_ticks);
        info!(
            "Last {} episodes: reward={:.2}, length={:.1}, win rate={:.1}%",
            self.rewards.len(),
            self.rewards.average(),
            self.lengths.average(),
            self.win_rate.average() * 100.0
        );
        if let Some(entries) = self.last_learned_entries {
            info!("Learned entries: {}", entries);
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
