//! Frame loop
//!
//! `Game` owns the simulation and drives it at a fixed frame rate through
//! the platform collaborators. It never touches a window, a mixer or a
//! keyboard directly.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::{AudioManager, SoundEffect};
use crate::bridge::{Observation, Shared};
use crate::consts::COMPLEXITY_RETRY_PROMPT;
use crate::palette;
use crate::platform::{Drawable, Frontend, FrameClock, InputEvent, MenuChoice, TextEntry};
use crate::settings::{Complexity, Settings};
use crate::sim::{self, GameEvent, GamePhase, GameState};

/// Why the frame loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exit {
    Won,
    Lost,
    /// Quit chosen from the menu
    Quit,
    /// The window was closed; the process should end immediately
    WindowClosed,
    /// Bot chosen from the menu; control passes to the automation bridge
    BotSelected,
    /// Stopped by the automation bridge
    Stopped,
}

pub struct Game {
    state: GameState,
    audio: AudioManager,
    clock: FrameClock,
    automation: Option<Arc<Shared>>,
}

impl Game {
    /// New game sitting in the main menu
    pub fn new(settings: Settings, seed: u64) -> Self {
        let audio = AudioManager::from_settings(&settings);
        let clock = FrameClock::new(settings.frame_duration());
        Self {
            state: GameState::new(settings, seed),
            audio,
            clock,
            automation: None,
        }
    }

    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    /// Take paddle actions from, and publish observations to, an automation bridge
    pub fn attach(&mut self, shared: Arc<Shared>) {
        self.automation = Some(shared);
    }

    /// Skip the menu and prompt, starting a session at `complexity`
    pub fn start(&mut self, complexity: Complexity) {
        self.state.select_play();
        self.state.start_session(complexity);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Run frames until the game ends or is interrupted
    pub fn run<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> Exit {
        loop {
            if let Some(exit) = self.frame(frontend) {
                log::info!(
                    "Game loop exited: {:?} (score {}, lives {})",
                    exit,
                    self.state.score,
                    self.state.lives
                );
                return exit;
            }
            self.clock.tick();
        }
    }

    /// One frame: input, pending action, update, dispatch, render, publish
    pub fn frame<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> Option<Exit> {
        let shared = self.automation.clone();
        if shared.as_ref().is_some_and(|s| s.should_stop()) {
            return Some(Exit::Stopped);
        }

        for event in frontend.poll_events() {
            if let Some(exit) = self.handle_event(frontend, event) {
                return Some(exit);
            }
        }

        if let Some(action) = shared.as_ref().and_then(|s| s.actions.take()) {
            self.state.paddle.toggle_intent(action.direction());
        }

        sim::tick(&mut self.state);
        self.dispatch(frontend);
        frontend.draw(&self.scene());
        self.publish();

        match self.state.phase {
            GamePhase::Won => Some(Exit::Won),
            GamePhase::Lost => Some(Exit::Lost),
            _ => None,
        }
    }

    /// Apply one platform event
    pub fn handle_event<F: Frontend + ?Sized>(
        &mut self,
        frontend: &mut F,
        event: InputEvent,
    ) -> Option<Exit> {
        match event {
            InputEvent::WindowClosed => Some(Exit::WindowClosed),
            InputEvent::Key { direction, pressed } => {
                self.state.paddle.set_intent(direction, pressed);
                None
            }
            InputEvent::Menu(choice) if self.state.phase == GamePhase::Menu => match choice {
                MenuChoice::Play => {
                    self.state.select_play();
                    match prompt_complexity(frontend) {
                        Some(complexity) => {
                            self.state.start_session(complexity);
                            None
                        }
                        // Prompt dismissed by closing the window
                        None => Some(Exit::WindowClosed),
                    }
                }
                MenuChoice::Bot => Some(Exit::BotSelected),
                MenuChoice::Quit => Some(Exit::Quit),
            },
            InputEvent::Menu(choice) => {
                log::debug!("Ignoring menu choice {:?} in {:?}", choice, self.state.phase);
                None
            }
        }
    }

    fn dispatch<F: Frontend + ?Sized>(&mut self, frontend: &mut F) {
        let message_duration = self.state.settings.message_duration();
        for event in self.state.drain_events() {
            match event {
                GameEvent::PaddleHit { .. } => self.audio.play(frontend, SoundEffect::PaddleHit),
                GameEvent::WallHit => self.audio.play(frontend, SoundEffect::WallHit),
                GameEvent::BrickDestroyed { .. } => self.audio.play(frontend, SoundEffect::BrickHit),
                GameEvent::Banner(banner) => frontend.show_message(banner.text(), message_duration),
                GameEvent::LifeLost { .. }
                | GameEvent::EffectStarted(_)
                | GameEvent::EffectEnded(_)
                | GameEvent::PhaseChanged { .. } => {}
            }
        }
    }

    /// Draw list for the current frame
    pub fn scene(&self) -> Vec<Drawable> {
        let state = &self.state;
        if state.phase == GamePhase::Menu {
            return menu_scene(&state.settings);
        }

        let mut scene = Vec::with_capacity(state.bricks.len() + 4);
        scene.extend(state.bricks.iter().map(|brick| Drawable::Rect {
            bounds: brick.bounds,
            color: brick.color,
        }));
        scene.push(Drawable::Rect {
            bounds: state.paddle.bounds,
            color: palette::PADDLE,
        });
        scene.push(Drawable::Circle {
            center: state.ball.pos,
            radius: state.ball.radius,
            color: state.ball.tint.color(),
        });
        scene.push(Drawable::Text {
            pos: Vec2::new(5.0, 5.0),
            text: format!("SCORE: {}", state.score),
            color: palette::TEXT,
        });
        scene.push(Drawable::Text {
            pos: Vec2::new(state.settings.screen_width - 90.0, 5.0),
            text: format!("LIVES: {}", state.lives),
            color: palette::TEXT,
        });
        scene
    }

    fn publish(&self) {
        let Some(shared) = &self.automation else {
            return;
        };
        shared.publish(Observation::capture(&self.state));
        if self.state.is_over() {
            shared.set_game_over();
        }
    }
}

fn menu_scene(settings: &Settings) -> Vec<Drawable> {
    let x = settings.screen_width / 2.0 - 30.0;
    ["PLAY", "BOT", "QUIT"]
        .iter()
        .enumerate()
        .map(|(i, label)| Drawable::Text {
            pos: Vec2::new(x, settings.screen_height / 2.0 - 60.0 + i as f32 * 50.0),
            text: (*label).to_string(),
            color: palette::WHITE,
        })
        .collect()
}

/// Ask for a complexity until the answer is an integer in `0..=10`.
/// `None` when the prompt was closed.
pub fn prompt_complexity<T: TextEntry + ?Sized>(entry: &mut T) -> Option<Complexity> {
    let mut error = None;
    loop {
        let answer = entry.ask(error)?;
        match Complexity::parse(&answer) {
            Ok(complexity) => return Some(complexity),
            Err(e) => {
                log::debug!("{e}");
                error = Some(COMPLEXITY_RETRY_PROMPT);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::Action;
    use crate::platform::Headless;
    use crate::sim::{Banner, Direction};

    fn game() -> Game {
        Game::new(Settings::default(), 7).with_clock(FrameClock::unthrottled())
    }

    fn menu(choice: MenuChoice) -> Vec<InputEvent> {
        vec![InputEvent::Menu(choice)]
    }

    #[test]
    fn test_prompt_retries_until_valid() {
        let mut headless = Headless::new();
        headless.push_answer("abc").push_answer("11").push_answer(" 4 ");
        let complexity = prompt_complexity(&mut headless);
        assert_eq!(complexity.map(Complexity::get), Some(4));
        assert_eq!(
            headless.prompts,
            vec![
                None,
                Some(COMPLEXITY_RETRY_PROMPT.to_string()),
                Some(COMPLEXITY_RETRY_PROMPT.to_string()),
            ]
        );
    }

    #[test]
    fn test_play_from_menu_starts_countdown() {
        let mut game = game();
        let mut headless = Headless::new();
        headless.push_frame(menu(MenuChoice::Play)).push_answer("0");

        assert_eq!(game.frame(&mut headless), None);
        assert_eq!(game.state().phase, GamePhase::Countdown);
        assert_eq!(game.state().ball.vel.y, 20.0);
        assert_eq!(headless.messages, vec![Banner::GetReady.text().to_string()]);
        assert!(headless.last_scene.iter().any(
            |d| matches!(d, Drawable::Text { text, .. } if text == "LIVES: 3")
        ));
    }

    #[test]
    fn test_closed_prompt_exits() {
        let mut game = game();
        let mut headless = Headless::new();
        headless.push_frame(menu(MenuChoice::Play));
        assert_eq!(game.frame(&mut headless), Some(Exit::WindowClosed));
    }

    #[test]
    fn test_menu_quit_and_bot() {
        let mut headless = Headless::new();
        headless.push_frame(menu(MenuChoice::Quit));
        assert_eq!(game().run(&mut headless), Exit::Quit);

        headless.push_frame(menu(MenuChoice::Bot));
        assert_eq!(game().run(&mut headless), Exit::BotSelected);
    }

    #[test]
    fn test_window_close_mid_game() {
        let mut game = game();
        game.start(Complexity::default());
        let mut headless = Headless::new();
        headless.push_frame(vec![]).push_frame(vec![InputEvent::WindowClosed]);
        assert_eq!(game.run(&mut headless), Exit::WindowClosed);
        assert_eq!(headless.frames, 1);
    }

    #[test]
    fn test_keys_set_intent() {
        let mut game = game();
        game.start(Complexity::default());
        let mut headless = Headless::new();
        headless.push_frame(vec![InputEvent::Key {
            direction: Direction::Right,
            pressed: true,
        }]);
        game.frame(&mut headless);
        assert!(game.state().paddle.moving_right);
        assert!(!game.state().paddle.moving_left);
    }

    #[test]
    fn test_last_posted_action_wins() {
        let mut game = game();
        game.start(Complexity::default());
        let shared = Arc::new(Shared::new());
        game.attach(Arc::clone(&shared));

        shared.actions.post(Action::Left);
        shared.actions.post(Action::Right);
        let mut headless = Headless::new();
        game.frame(&mut headless);

        assert!(game.state().paddle.moving_right);
        assert!(!game.state().paddle.moving_left);
        assert_eq!(shared.actions.posted(), 2);
        assert_eq!(shared.actions.consumed(), 1);

        let obs = shared.observation().unwrap();
        assert!(obs.moving_right);
        assert_eq!(obs.lives, 3);
    }

    #[test]
    fn test_lost_publishes_game_over() {
        let mut game = game();
        game.start(Complexity::default());
        let shared = Arc::new(Shared::new());
        game.attach(Arc::clone(&shared));
        let state = game.state_mut();
        state.lives = 1;
        state.pause_frames = 0;
        state.ball.pos = Vec2::new(250.0, 410.0);

        let mut headless = Headless::new();
        assert_eq!(game.frame(&mut headless), Some(Exit::Lost));
        assert!(shared.is_game_over());
        assert!(headless.messages.contains(&Banner::GameOver.text().to_string()));
    }

    #[test]
    fn test_stop_request_ends_loop() {
        let mut game = game();
        game.start(Complexity::default());
        let shared = Arc::new(Shared::new());
        game.attach(Arc::clone(&shared));
        shared.request_stop();
        assert_eq!(game.run(&mut Headless::new()), Exit::Stopped);
    }

    #[test]
    fn test_paddle_hit_plays_sound() {
        let mut game = game();
        game.start(Complexity::default());
        let state = game.state_mut();
        state.pause_frames = 0;
        let paddle = state.paddle.bounds;
        state.ball.pos = Vec2::new(paddle.center().x, paddle.top() + 2.0);
        state.ball.vel = Vec2::new(0.0, 20.0);

        let mut headless = Headless::new();
        game.frame(&mut headless);
        assert_eq!(headless.sounds, vec![SoundEffect::PaddleHit]);
    }

    #[test]
    fn test_brick_hit_plays_sound_once() {
        let mut game = game();
        game.start(Complexity::default());
        let state = game.state_mut();
        state.pause_frames = 0;
        state.bricks.clear();
        let id = state.next_entity_id();
        state.bricks.push(crate::sim::Brick {
            id,
            bounds: crate::sim::Rect::new(100.0, 100.0, 60.0, 20.0),
            color: palette::BRICK,
            effect: None,
        });
        state.ball.pos = Vec2::new(130.0, 126.0);
        state.ball.vel = Vec2::new(0.0, -20.0);

        let mut headless = Headless::new();
        game.frame(&mut headless);
        assert_eq!(headless.sounds, vec![SoundEffect::BrickHit]);
        assert_eq!(game.state().score, 1);
    }
}
