//! Built-in controllers for the automation bridge

use std::thread;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::bridge::{Action, BreakoutEnv, Observation};
use crate::error::BridgeError;
use crate::game::Exit;
use crate::sim::Direction;

/// Picks the next action from the latest observation. `None` sends nothing.
pub trait Policy {
    fn act(&mut self, observation: Option<&Observation>) -> Option<Action>;
}

/// Uniform draw in `0..=150`: below 50 toggles left, otherwise right
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: Pcg32,
}

impl RandomPolicy {
    const DRAW_MAX: u32 = 150;
    const LEFT_BELOW: u32 = 50;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: Option<&Observation>) -> Option<Action> {
        if self.rng.random_range(0..=Self::DRAW_MAX) < Self::LEFT_BELOW {
            Some(Action::Left)
        } else {
            Some(Action::Right)
        }
    }
}

/// Follows the ball, and near the paddle steers against its drift
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingPolicy {
    /// Horizontal distance tolerated before chasing the ball
    pub tolerance: f32,
    /// Below this line (y grows downward) the ball is about to land
    pub danger_y: f32,
    /// Horizontal speed above which the ball counts as fast
    pub fast_vx: f32,
}

impl Default for TrackingPolicy {
    fn default() -> Self {
        Self {
            tolerance: 25.0,
            danger_y: 330.0,
            fast_vx: 3.0,
        }
    }
}

impl TrackingPolicy {
    /// Where the paddle should be heading, `None` to hold still
    pub fn desired(&self, obs: &Observation) -> Option<Direction> {
        let offset = obs.paddle_x - obs.ball.x;
        let vx = obs.ball_vel.x;

        if offset.abs() > self.tolerance {
            if offset < 0.0 {
                Some(Direction::Right)
            } else {
                Some(Direction::Left)
            }
        } else if obs.ball.y > self.danger_y {
            let toward_right = if vx.abs() > self.fast_vx {
                vx <= 0.0
            } else {
                vx > 0.0
            };
            Some(if toward_right {
                Direction::Right
            } else {
                Direction::Left
            })
        } else {
            None
        }
    }
}

impl Policy for TrackingPolicy {
    fn act(&mut self, observation: Option<&Observation>) -> Option<Action> {
        let obs = observation?;
        let (want_left, want_right) = match self.desired(obs) {
            Some(Direction::Left) => (true, false),
            Some(Direction::Right) => (false, true),
            None => (false, false),
        };

        // Actions toggle, so fix one mismatched intent per step
        if obs.moving_left != want_left {
            Some(Action::Left)
        } else if obs.moving_right != want_right {
            Some(Action::Right)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeOptions {
    /// Pause between policy decisions
    pub step_interval: Duration,
    /// Decisions before the episode is stopped
    pub max_decisions: u64,
}

impl Default for EpisodeOptions {
    fn default() -> Self {
        Self {
            step_interval: Duration::from_millis(16),
            max_decisions: 100_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: u64,
    pub steps: u64,
    pub exit: Exit,
    pub last: Option<Observation>,
}

/// Reset the env and let `policy` drive it until game over or the decision cap
pub fn run_episode<P: Policy + ?Sized>(
    env: &mut BreakoutEnv,
    policy: &mut P,
    options: &EpisodeOptions,
) -> Result<EpisodeSummary, BridgeError> {
    env.reset()?;

    let mut decisions = 0;
    while !env.is_game_over() && !env.is_finished() && decisions < options.max_decisions {
        if let Some(action) = policy.act(env.observation().as_ref()) {
            env.step(action)?;
        }
        decisions += 1;
        if !options.step_interval.is_zero() {
            thread::sleep(options.step_interval);
        }
    }

    let steps = env.steps();
    let exit = if env.is_game_over() {
        env.finish()?
    } else {
        env.stop()?
    };
    let last = env.observation();

    Ok(EpisodeSummary {
        episode: env.episodes(),
        steps,
        exit,
        last,
    })
}
