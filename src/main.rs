//! Peggle Prime entry point
//!
//! Headless native driver: loads an optional JSON config (first argument),
//! fires a short volley of scripted shots through a `GameSession` on a
//! synthetic 60 Hz clock, and prints the final score.

use glam::DVec2;

use peggle_prime::scoring::ScoreBreakdown;
use peggle_prime::sim::{Action, GameState, PLAYER_ACTIONS};
use peggle_prime::viewport::Viewport;
use peggle_prime::{GameConfig, GameSession, Renderer, score};

/// Simulated display refresh interval (ms)
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up on a shot that is still bouncing after this many frames
const MAX_FRAMES_PER_SHOT: u32 = 60 * 20;

/// Logs score changes instead of drawing
#[derive(Default)]
struct LogRenderer {
    last_score: u64,
}

impl Renderer for LogRenderer {
    fn render(&mut self, state: &GameState, previous: Option<&GameState>) {
        // Pieces only change on a hit
        if previous.is_some_and(|p| p.board.pieces == state.board.pieces) {
            return;
        }
        let current = score(&state.board);
        if current != self.last_score {
            log::info!("Score: {} (+{})", current, current - self.last_score);
            self.last_score = current;
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Peggle Prime (native) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    for binding in &PLAYER_ACTIONS {
        log::debug!(
            "{:<10} {:?} / {:?}: {}",
            binding.action,
            binding.default_mapping,
            binding.alternate_mapping,
            binding.description
        );
    }

    let mut session = GameSession::new(config.initial_state());
    let dispatcher = session.dispatcher();
    let mut renderer = LogRenderer::default();
    let viewport = Viewport::of(&session.state().board);

    // Pointer positions in board screen space (top-left origin, y down)
    let targets = [
        DVec2::new(viewport.width / 2.0, viewport.height),
        DVec2::new(viewport.width * 0.2, viewport.height * 0.9),
        DVec2::new(viewport.width * 0.8, viewport.height * 0.9),
    ];

    let mut clock = 0.0;
    for target in targets {
        let world = viewport.screen_to_world(target);
        dispatcher.dispatch(Action::Aim {
            x: world.x,
            y: world.y,
        });
        dispatcher.dispatch(Action::Shoot);

        let mut frames = 0;
        loop {
            let Some(state) = session.frame_and_render(clock, &mut renderer) else {
                break;
            };
            clock += FRAME_MS;
            frames += 1;
            if !state.in_flight() {
                break;
            }
            if frames >= MAX_FRAMES_PER_SHOT {
                log::warn!("Shot still in flight after {frames} frames, moving on");
                break;
            }
        }
        log::info!("Shot at {:.1}° finished after {frames} frames", session.state().cannon.angle);
    }

    session.stop();

    let breakdown = ScoreBreakdown::from_board(&session.state().board);
    match serde_json::to_string_pretty(&breakdown) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode score: {e}"),
    }
}
