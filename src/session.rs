//! Frame scheduler
//!
//! A `GameSession` owns the current snapshot and a queue of pending player
//! actions. The host calls [`GameSession::frame`] once per display refresh
//! with a monotonic timestamp in milliseconds; each frame applies every
//! queued action and then exactly one TICK.
//!
//! Input handlers get a cloneable [`Dispatcher`] and may push actions from
//! anywhere. Only the session ever calls the reducer, and snapshots are
//! handed out as `Arc<GameState>`, so renderers never need a lock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::sim::{Action, ActionMessage, GameState, apply};

/// Consumes snapshots; never writes back into them
pub trait Renderer {
    /// Draw `state`. `previous` is the snapshot the last frame started from.
    fn render(&mut self, state: &GameState, previous: Option<&GameState>);
}

/// Order in which a frame applies the actions queued since the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrainOrder {
    /// Oldest first
    #[default]
    ArrivalOrder,
    /// Newest first, matching the original browser game's pop-from-the-end loop
    NewestFirst,
}

type Queue = Arc<Mutex<VecDeque<Action>>>;

fn lock(queue: &Queue) -> MutexGuard<'_, VecDeque<Action>> {
    // The queue only holds plain values, so a poisoned lock is still usable
    queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Cloneable handle for pushing actions into a session
#[derive(Debug, Clone)]
pub struct Dispatcher {
    queue: Queue,
    running: Arc<AtomicBool>,
}

impl Dispatcher {
    /// Queue an action for the next frame
    pub fn dispatch(&self, action: Action) {
        lock(&self.queue).push_back(action);
    }

    /// Queue an untyped message. Undecodable messages are logged and dropped.
    pub fn dispatch_message(&self, msg: &ActionMessage) {
        match Action::try_from(msg) {
            Ok(action) => self.dispatch(action),
            Err(e) => log::warn!("Dropping action: {e}"),
        }
    }

    /// Stop the owning session after its current frame
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// An owned running game
#[derive(Debug)]
pub struct GameSession {
    state: Arc<GameState>,
    previous: Option<Arc<GameState>>,
    queue: Queue,
    running: Arc<AtomicBool>,
    last_timestamp: Option<f64>,
    drain_order: DrainOrder,
    frames: u64,
}

impl GameSession {
    pub fn new(initial: GameState) -> Self {
        Self::with_drain_order(initial, DrainOrder::default())
    }

    pub fn with_drain_order(initial: GameState, drain_order: DrainOrder) -> Self {
        log::info!(
            "Session started with {} pieces, {} balls of ammo ({:?})",
            initial.board.pieces.len(),
            initial.player.balls,
            drain_order
        );
        Self {
            state: Arc::new(initial),
            previous: None,
            queue: Arc::new(Mutex::new(VecDeque::new())),
            running: Arc::new(AtomicBool::new(true)),
            last_timestamp: None,
            drain_order,
            frames: 0,
        }
    }

    /// Current snapshot
    pub fn state(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    /// Snapshot the last frame started from
    pub fn previous(&self) -> Option<Arc<GameState>> {
        self.previous.clone()
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            queue: Arc::clone(&self.queue),
            running: Arc::clone(&self.running),
        }
    }

    /// Queue an action for the next frame
    pub fn dispatch(&self, action: Action) {
        lock(&self.queue).push_back(action);
    }

    pub fn pending(&self) -> usize {
        lock(&self.queue).len()
    }

    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            log::info!("Session stopped after {} frames", self.frames);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame at `timestamp_ms`
    ///
    /// Applies every action queued before this call, then one TICK whose
    /// delta is the time since the previous frame (zero on the first frame).
    /// Actions dispatched while the frame runs wait for the next one.
    /// Returns `None` once the session is stopped.
    pub fn frame(&mut self, timestamp_ms: f64) -> Option<Arc<GameState>> {
        if !self.is_running() {
            return None;
        }

        let pending: Vec<Action> = {
            let mut queue = lock(&self.queue);
            match self.drain_order {
                DrainOrder::ArrivalOrder => queue.drain(..).collect(),
                DrainOrder::NewestFirst => queue.drain(..).rev().collect(),
            }
        };

        let start = Arc::clone(&self.state);
        let mut state = pending
            .iter()
            .fold((*start).clone(), |state, action| apply(&state, action));

        let delta = (timestamp_ms - self.last_timestamp.unwrap_or(timestamp_ms)) / 1000.0;
        state = apply(&state, &Action::Tick { delta });

        self.last_timestamp = Some(timestamp_ms);
        self.previous = Some(start);
        self.state = Arc::new(state);
        self.frames += 1;
        Some(self.state())
    }

    /// Run one frame and hand the result to `renderer`
    pub fn frame_and_render<R: Renderer>(
        &mut self,
        timestamp_ms: f64,
        renderer: &mut R,
    ) -> Option<Arc<GameState>> {
        let state = self.frame(timestamp_ms)?;
        renderer.render(&state, self.previous.as_deref());
        Some(state)
    }

    /// Drive frames from a host clock until it runs dry or the session stops.
    ///
    /// Returns the number of frames run.
    pub fn run<I, R>(&mut self, timestamps: I, renderer: &mut R) -> u64
    where
        I: IntoIterator<Item = f64>,
        R: Renderer,
    {
        let mut count = 0;
        for ts in timestamps {
            if self.frame_and_render(ts, renderer).is_none() {
                break;
            }
            count += 1;
        }
        count
    }
}
