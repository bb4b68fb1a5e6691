//! Run lifecycle: asset gate, start/restart, per-frame ticking, and the
//! one-shot final score save.

use std::fmt;

use crate::config::GameConfig;
use crate::notify::{NotificationSink, Severity};
use crate::persistence::{PersistError, ScoreRecord, ScoreStore};
use crate::sim::{GameState, TickInput, TickOutcome, WorldBounds, tick};

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for an explicit start
    NotStarted,
    Running,
    /// Run ended, score frozen
    Over,
}

/// Why a session request was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// `start` before assets finished loading
    AssetsNotLoaded,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AssetsNotLoaded => write!(f, "assets are still loading"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Guard against saving the same run twice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveLatch {
    Idle,
    InFlight,
    Done,
}

/// Owns the world and drives it one tick per display frame
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    /// Applied on the next start
    pending_bounds: WorldBounds,
    state: GameState,
    phase: SessionPhase,
    assets_ready: bool,
    save_latch: SaveLatch,
    user_id: Option<String>,
    torn_down: bool,
    last_outcome: TickOutcome,
}

impl Session {
    pub fn new(config: GameConfig, bounds: WorldBounds) -> Self {
        let state = GameState::new(0, bounds, &config);
        Self {
            config,
            pending_bounds: bounds,
            state,
            phase: SessionPhase::NotStarted,
            assets_ready: false,
            save_latch: SaveLatch::Idle,
            user_id: None,
            torn_down: false,
            last_outcome: TickOutcome::default(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Last fully settled world
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access to the world, for hosts that script or restore runs
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn assets_ready(&self) -> bool {
        self.assets_ready
    }

    /// Asset loading finished. A failed load still opens the gate; the host
    /// falls back to basic shapes.
    pub fn mark_assets_loaded(&mut self, ok: bool, sink: &mut dyn NotificationSink) {
        self.assets_ready = true;
        if ok {
            log::info!("assets loaded");
            sink.notify("Assets loaded! Ready to play", Severity::Info);
        } else {
            log::warn!("asset loading failed, using fallback graphics");
            sink.notify("Could not load images, using basic graphics", Severity::Warning);
        }
    }

    /// Signed-in user the final score is attributed to
    pub fn set_user(&mut self, user_id: Option<String>) {
        self.user_id = user_id.filter(|id| !id.is_empty());
    }

    pub fn user(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Playfield size for the next run. The current run keeps its bounds.
    pub fn set_bounds(&mut self, bounds: WorldBounds) {
        self.pending_bounds = bounds;
    }

    /// Reset the world and begin running
    pub fn start(&mut self, seed: u64, sink: &mut dyn NotificationSink) -> Result<(), SessionError> {
        if !self.assets_ready {
            sink.notify("Wait for the images to load...", Severity::Warning);
            return Err(SessionError::AssetsNotLoaded);
        }

        self.state = GameState::new(seed, self.pending_bounds, &self.config);
        self.phase = SessionPhase::Running;
        self.save_latch = SaveLatch::Idle;
        self.torn_down = false;
        self.last_outcome = TickOutcome::default();
        log::info!(
            "run started (seed {}, {}x{})",
            seed,
            self.pending_bounds.width,
            self.pending_bounds.height
        );
        Ok(())
    }

    /// Start over from any phase
    pub fn restart(&mut self, seed: u64, sink: &mut dyn NotificationSink) -> Result<(), SessionError> {
        self.start(seed, sink)
    }

    /// Run one tick if running; otherwise report the settled outcome
    pub fn tick(&mut self, input: &TickInput, sink: &mut dyn NotificationSink) -> TickOutcome {
        if self.torn_down || self.phase != SessionPhase::Running {
            return TickOutcome {
                cannon_fired: false,
                power_up_collected: false,
                shield_used: false,
                ..self.last_outcome
            };
        }

        let outcome = tick(&mut self.state, input, &self.config, sink);
        if outcome.game_over {
            self.phase = SessionPhase::Over;
        }
        self.last_outcome = outcome;
        outcome
    }

    /// Record to persist for the finished run, handed out at most once.
    ///
    /// With no user signed in the save is skipped and the latch closes.
    pub fn take_pending_save(&mut self) -> Option<ScoreRecord> {
        if self.phase != SessionPhase::Over || self.save_latch != SaveLatch::Idle {
            return None;
        }
        if self.user_id.is_none() {
            log::info!("no user signed in, score not saved");
            self.save_latch = SaveLatch::Done;
            return None;
        }

        self.save_latch = SaveLatch::InFlight;
        Some(ScoreRecord::new(
            self.state.score,
            self.state.duration_seconds(),
        ))
    }

    /// Report the result of a save handed out by `take_pending_save`.
    ///
    /// Failure reopens the latch so the save can be retried. Results for a
    /// run that has since been restarted are ignored.
    pub fn complete_save(&mut self, result: Result<(), PersistError>, sink: &mut dyn NotificationSink) {
        if self.save_latch != SaveLatch::InFlight {
            log::debug!("ignoring stale save result");
            return;
        }

        match result {
            Ok(()) => {
                self.save_latch = SaveLatch::Done;
                log::info!("score {} saved", self.state.score);
                sink.notify("Score saved to the leaderboard", Severity::Info);
            }
            Err(e) => {
                self.save_latch = SaveLatch::Idle;
                log::warn!("saving score failed: {}", e);
                sink.notify("Error saving score", Severity::Danger);
            }
        }
    }

    /// Save the finished run through a synchronous store
    pub fn persist_final_score(&mut self, store: &mut dyn ScoreStore, sink: &mut dyn NotificationSink) {
        let Some(record) = self.take_pending_save() else {
            return;
        };
        let user = self.user_id.clone().unwrap_or_default();
        let result = store.save_score(&user, &record);
        self.complete_save(result, sink);
    }

    /// True once the finished run's score was saved or skipped
    pub fn save_settled(&self) -> bool {
        self.save_latch == SaveLatch::Done
    }

    /// Stop ticking immediately. The save latch is left as is.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            log::info!("session torn down at frame {}", self.state.frame);
        }
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Settled world as JSON for an external renderer
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.state)
    }
}
