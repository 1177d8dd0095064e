//! Automation bridge
//!
//! Lets an external controller drive the paddle while the game runs on its
//! own thread. The controller posts actions into a single-slot mailbox; the
//! frame loop takes at most one per frame, so an action posted before the
//! previous one was consumed replaces it (last write wins).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use glam::Vec2;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SEED;
use crate::error::BridgeError;
use crate::game::{Exit, Game};
use crate::platform::{FrameClock, Headless};
use crate::settings::{Complexity, Settings};
use crate::sim::{Direction, GamePhase, GameState};

/// Paddle action. Each one toggles the matching movement intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    Left = 0,
    Right = 1,
}

impl Action {
    pub fn direction(self) -> Direction {
        match self {
            Action::Left => Direction::Left,
            Action::Right => Direction::Right,
        }
    }
}

impl TryFrom<u8> for Action {
    type Error = BridgeError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Action::Left),
            1 => Ok(Action::Right),
            other => Err(BridgeError::InvalidAction(other)),
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    action: Option<Action>,
    posted: u64,
    consumed: u64,
}

/// Single-slot action mailbox
#[derive(Debug, Default)]
pub struct ActionSlot {
    inner: Mutex<Slot>,
}

impl ActionSlot {
    /// Store `action`, replacing any action not yet taken
    pub fn post(&self, action: Action) {
        let mut slot = self.inner.lock();
        if let Some(dropped) = slot.action.replace(action) {
            log::debug!("Dropping unconsumed action {:?}", dropped);
        }
        slot.posted += 1;
    }

    /// Take the pending action, if any
    pub fn take(&self) -> Option<Action> {
        let mut slot = self.inner.lock();
        let action = slot.action.take();
        if action.is_some() {
            slot.consumed += 1;
        }
        action
    }

    pub fn posted(&self) -> u64 {
        self.inner.lock().posted
    }

    pub fn consumed(&self) -> u64 {
        self.inner.lock().consumed
    }
}

/// Snapshot of the game published after every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub frame: u64,
    pub phase: GamePhase,
    /// Paddle center
    pub paddle_x: f32,
    pub paddle_width: f32,
    pub moving_left: bool,
    pub moving_right: bool,
    pub ball: Vec2,
    pub ball_vel: Vec2,
    pub score: u64,
    pub lives: u32,
    pub bricks_left: usize,
}

impl Observation {
    pub fn capture(state: &GameState) -> Self {
        Self {
            frame: state.time_ticks,
            phase: state.phase,
            paddle_x: state.paddle.bounds.center().x,
            paddle_width: state.paddle.bounds.w,
            moving_left: state.paddle.moving_left,
            moving_right: state.paddle.moving_right,
            ball: state.ball.pos,
            ball_vel: state.ball.vel,
            score: state.score,
            lives: state.lives,
            bricks_left: state.bricks.len(),
        }
    }
}

/// State shared between the controller and one episode's game thread
#[derive(Debug, Default)]
pub struct Shared {
    pub actions: ActionSlot,
    game_over: AtomicBool,
    stop: AtomicBool,
    observation: Mutex<Option<Observation>>,
}

impl Shared {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_game_over(&self) {
        self.game_over.store(true, Ordering::Release);
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.load(Ordering::Acquire)
    }

    /// Ask the game thread to leave its loop at the next frame
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub fn publish(&self, observation: Observation) {
        *self.observation.lock() = Some(observation);
    }

    pub fn observation(&self) -> Option<Observation> {
        *self.observation.lock()
    }
}

/// How each episode is built
#[derive(Debug, Clone)]
pub struct EnvOptions {
    pub settings: Settings,
    pub complexity: Complexity,
    /// Seed of the first episode; episode `n` uses `seed + n - 1`
    pub seed: u64,
    /// Hold the configured frame rate; off runs frames back to back
    pub realtime: bool,
}

impl Default for EnvOptions {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            complexity: Complexity::default(),
            seed: DEFAULT_SEED,
            realtime: true,
        }
    }
}

/// One episode's shared state. Kept after the thread ends so game over,
/// the last observation and late steps stay valid until the next reset.
struct Episode {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<Exit>>,
    exit: Option<Exit>,
}

/// Controller-side handle to the running game
pub struct BreakoutEnv {
    options: EnvOptions,
    episodes: u64,
    steps: u64,
    episode: Option<Episode>,
}

impl BreakoutEnv {
    pub fn new(options: EnvOptions) -> Self {
        Self {
            options,
            episodes: 0,
            steps: 0,
            episode: None,
        }
    }

    /// Start a fresh episode on a new game thread, stopping the previous one
    pub fn reset(&mut self) -> Result<(), BridgeError> {
        if let Some(exit) = self.stop_episode()? {
            log::info!("Episode {} abandoned ({:?})", self.episodes, exit);
        }

        self.episodes += 1;
        self.steps = 0;

        let episode = self.episodes;
        let seed = self.options.seed.wrapping_add(episode - 1);
        let clock = if self.options.realtime {
            FrameClock::new(self.options.settings.frame_duration())
        } else {
            FrameClock::unthrottled()
        };

        let shared = Arc::new(Shared::new());
        let mut game = Game::new(self.options.settings.clone(), seed).with_clock(clock);
        game.attach(Arc::clone(&shared));
        game.start(self.options.complexity);

        let handle = thread::Builder::new()
            .name(format!("breakout-episode-{episode}"))
            .spawn(move || game.run(&mut Headless::quiet()))
            .map_err(BridgeError::Spawn)?;

        log::info!(
            "Episode {} started (seed {}, complexity {})",
            episode,
            seed,
            self.options.complexity
        );
        self.episode = Some(Episode {
            shared,
            handle: Some(handle),
            exit: None,
        });
        Ok(())
    }

    /// Post an action for the next frame. Never blocks on the game thread.
    /// After the episode has ended the action is accepted and ignored.
    pub fn step(&mut self, action: Action) -> Result<(), BridgeError> {
        let episode = self.episode.as_ref().ok_or(BridgeError::NotInitialized)?;
        self.steps += 1;
        episode.shared.actions.post(action);
        Ok(())
    }

    /// `step` with a raw action id (0 = left, 1 = right)
    pub fn step_raw(&mut self, raw: u8) -> Result<(), BridgeError> {
        self.step(Action::try_from(raw)?)
    }

    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_game_over(&self) -> bool {
        self.episode
            .as_ref()
            .is_some_and(|episode| episode.shared.is_game_over())
    }

    /// The game thread has left its loop (game over, stopped or closed)
    pub fn is_finished(&self) -> bool {
        self.episode
            .as_ref()
            .is_none_or(|episode| episode.handle.as_ref().is_none_or(JoinHandle::is_finished))
    }

    /// Latest published snapshot of the current episode
    pub fn observation(&self) -> Option<Observation> {
        self.episode
            .as_ref()
            .and_then(|episode| episode.shared.observation())
    }

    /// Wait for the current episode to end on its own
    pub fn finish(&mut self) -> Result<Exit, BridgeError> {
        self.join_current()
    }

    /// Stop the current episode and wait for its thread
    pub fn stop(&mut self) -> Result<Exit, BridgeError> {
        let episode = self.episode.as_ref().ok_or(BridgeError::NotInitialized)?;
        episode.shared.request_stop();
        self.join_current()
    }

    /// Stop a still-running episode. `Some` only if a thread was joined.
    fn stop_episode(&mut self) -> Result<Option<Exit>, BridgeError> {
        let running = self
            .episode
            .as_ref()
            .is_some_and(|episode| episode.handle.is_some());
        if running {
            self.stop().map(Some)
        } else {
            Ok(None)
        }
    }

    fn join_current(&mut self) -> Result<Exit, BridgeError> {
        let number = self.episodes;
        let steps = self.steps;
        let episode = self.episode.as_mut().ok_or(BridgeError::NotInitialized)?;
        if let Some(exit) = episode.exit {
            return Ok(exit);
        }

        let handle = episode.handle.take().ok_or(BridgeError::GameThread(number))?;
        let exit = handle.join().map_err(|_| BridgeError::GameThread(number))?;
        episode.exit = Some(exit);
        log::info!("Episode {} ended: {:?} after {} steps", number, exit, steps);
        Ok(exit)
    }
}

impl Drop for BreakoutEnv {
    fn drop(&mut self) {
        if let Err(e) = self.stop_episode() {
            log::warn!("{e}");
        }
    }
}
