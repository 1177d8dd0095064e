//! Brick Breaker entry point
//!
//! Usage: `brick-breaker [settings.json] [complexity]`
//!
//! There is no windowing backend in this binary, so the main menu is driven
//! headlessly and always picks the bot: a tracking policy plays one episode
//! through the automation bridge and the summary is printed as JSON.

use brick_breaker::bot::{EpisodeOptions, TrackingPolicy, run_episode};
use brick_breaker::consts::DEFAULT_SEED;
use brick_breaker::platform::{FrameClock, Headless, InputEvent, MenuChoice};
use brick_breaker::{BreakoutEnv, Complexity, EnvOptions, Exit, Game, Settings};

const DEFAULT_SETTINGS_PATH: &str = "settings.json";

fn main() {
    env_logger::init();
    log::info!("Brick Breaker starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());
    let settings = Settings::load_or_default(&settings_path);
    let complexity = match args.next().map(|arg| Complexity::parse(&arg)) {
        Some(Ok(complexity)) => complexity,
        Some(Err(e)) => {
            log::warn!("{e}, using complexity 0");
            Complexity::default()
        }
        None => Complexity::default(),
    };

    let mut menu = Headless::quiet();
    menu.push_frame(vec![InputEvent::Menu(MenuChoice::Bot)]);
    let exit = Game::new(settings.clone(), DEFAULT_SEED)
        .with_clock(FrameClock::unthrottled())
        .run(&mut menu);

    match exit {
        Exit::BotSelected => {}
        Exit::WindowClosed => std::process::exit(0),
        other => {
            log::info!("Leaving from the menu ({other:?})");
            return;
        }
    }

    let mut env = BreakoutEnv::new(EnvOptions {
        settings,
        complexity,
        ..EnvOptions::default()
    });
    let mut policy = TrackingPolicy::default();

    match run_episode(&mut env, &mut policy, &EpisodeOptions::default()) {
        Ok(summary) => {
            log::info!(
                "Episode {} finished: {:?} after {} steps",
                summary.episode,
                summary.exit,
                summary.steps
            );
            if summary.exit == Exit::WindowClosed {
                std::process::exit(0);
            }
            match serde_json::to_string_pretty(&summary) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to encode summary: {e}"),
            }
        }
        Err(e) => {
            log::error!("Bot episode failed: {e}");
            std::process::exit(1);
        }
    }
}
