//! Island Dodge entry point
//!
//! Browser host on wasm32 (one tick per animation frame), headless demo run
//! on native.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent};

    use island_dodge::audio::{AudioManager, SoundEffect};
    use island_dodge::persistence::LocalScoreStore;
    use island_dodge::sim::{TickInput, WorldBounds};
    use island_dodge::{GameConfig, NotificationLog, Session, SessionPhase};

    /// LocalStorage key holding the signed-in user id
    const USER_KEY: &str = "island_dodge_user";
    /// Window property the settled world is published under
    const SNAPSHOT_PROPERTY: &str = "islandDodgeState";

    /// Game instance holding all state
    struct Game {
        session: Session,
        notifications: NotificationLog,
        input: TickInput,
        scores: LocalScoreStore,
        audio: AudioManager,
    }

    impl Game {
        fn new(config: GameConfig) -> Self {
            Self {
                session: Session::new(config, WorldBounds::default()),
                notifications: NotificationLog::new(),
                input: TickInput::default(),
                scores: LocalScoreStore::load(),
                audio: AudioManager::new(),
            }
        }

        fn start(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.audio.resume();
            self.input = TickInput::default();
            match self.session.restart(seed, &mut self.notifications) {
                Ok(()) => log::info!("Game started with seed: {}", seed),
                Err(e) => log::warn!("Start refused: {}", e),
            }
        }

        /// Run exactly one simulation tick
        fn update(&mut self) {
            let was_over = self.session.phase() == SessionPhase::Over;
            let outcome = self.session.tick(&self.input, &mut self.notifications);

            for cue in SoundEffect::for_outcome(&outcome, was_over) {
                self.audio.play(cue);
            }

            // Save once, on the frame the run ends
            if !was_over && self.session.phase() == SessionPhase::Over {
                self.session
                    .persist_final_score(&mut self.scores, &mut self.notifications);
            }
        }

        /// Publish the settled world for the renderer
        fn publish_snapshot(&self) {
            let Some(window) = web_sys::window() else { return };
            match self.session.snapshot_json() {
                Ok(json) => {
                    let _ = js_sys::Reflect::set(
                        &window,
                        &JsValue::from_str(SNAPSHOT_PROPERTY),
                        &JsValue::from_str(&json),
                    );
                }
                Err(e) => log::warn!("Snapshot failed: {}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = self.session.state();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.score.to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-shield") {
                let class = if state.player.invulnerable {
                    "hud-item active"
                } else if state.player.has_shield {
                    "hud-item"
                } else {
                    "hud-item hidden"
                };
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("start-prompt") {
                let class = if self.session.phase() == SessionPhase::NotStarted {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                if self.session.phase() == SessionPhase::Over {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&state.score.to_string()));
                    }
                    if let Some(time_el) = document.get_element_by_id("final-time") {
                        time_el.set_text_content(Some(&format!("{}s", state.duration_seconds())));
                    }
                    if let (Some(best_el), Some(user)) =
                        (document.get_element_by_id("best-score"), self.session.user())
                    {
                        let stats = self.scores.stats(user);
                        best_el.set_text_content(Some(&stats.highest_score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            render_notifications(&document, &self.notifications);
        }
    }

    fn render_notifications(document: &Document, log: &NotificationLog) {
        let Some(container) = document.get_element_by_id("notifications") else {
            return;
        };
        container.set_text_content(None);
        for n in log.iter() {
            if let Ok(item) = document.create_element("div") {
                item.set_class_name(&format!("notification {}", n.severity.as_str()));
                item.set_text_content(Some(&n.message));
                let _ = container.append_child(&item);
            }
        }
    }

    fn load_user() -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok()??;
        storage.get_item(USER_KEY).ok()?
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Island Dodge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        // Write back so a stored config picks up fields added since
        let config = GameConfig::load();
        config.save();

        let game = Rc::new(RefCell::new(Game::new(config)));
        {
            let mut g = game.borrow_mut();
            let user = load_user();
            if user.is_none() {
                log::info!("No signed-in user, scores will not be saved");
            }
            g.session.set_user(user);
            // Sprites are drawn by the page; nothing to wait on here
            let Game {
                session,
                notifications,
                ..
            } = &mut *g;
            session.mark_assets_loaded(true, notifications);
        }

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_teardown(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Island Dodge running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => {
                        event.prevent_default();
                        g.input.turn_left = true;
                    }
                    "ArrowRight" => {
                        event.prevent_default();
                        g.input.turn_right = true;
                    }
                    " " | "Enter" if g.session.phase() != SessionPhase::Running => g.start(),
                    "m" | "M" => {
                        let muted = !g.audio.is_muted();
                        g.audio.set_muted(muted);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.turn_left = false,
                    "ArrowRight" => g.input.turn_right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().start();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// Stop scheduling frames when the page goes away
    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().session.teardown();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.session.is_torn_down() {
                log::info!("Frame loop stopped");
                return;
            }

            g.update();
            g.publish_snapshot();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use island_dodge::persistence::{LocalScoreStore, ScoreStore};
    use island_dodge::sim::{TickInput, WorldBounds};
    use island_dodge::{GameConfig, Session, SessionPhase, Severity, vector_to_heading};

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);
    let max_ticks: u64 = 60 * 60 * 10;

    log::info!("Island Dodge (native) headless run, seed {}", seed);

    let mut sink = |message: &str, severity: Severity| {
        log::info!("[{}] {}", severity.as_str(), message);
    };

    let mut session = Session::new(GameConfig::load(), WorldBounds::default());
    session.mark_assets_loaded(true, &mut sink);
    session.set_user(Some("local".to_string()));
    if let Err(e) = session.start(seed, &mut sink) {
        log::error!("Could not start: {}", e);
        return;
    }

    // Autopilot: steer back toward the middle when drifting near an edge
    let mut input = TickInput::default();
    for _ in 0..max_ticks {
        let state = session.state();
        let player = &state.player;
        let center = glam::Vec2::new(state.bounds.width / 2.0, state.bounds.height / 2.0);
        let to_center = center - player.pos;
        let wander = (state.frame / 90) % 2 == 0;
        let desired = if to_center.length() > 250.0 {
            vector_to_heading(to_center)
        } else if wander {
            player.heading + 30.0
        } else {
            player.heading - 30.0
        };
        let diff = (desired - player.heading + 540.0).rem_euclid(360.0) - 180.0;
        input.turn_left = diff < -player.turn_rate;
        input.turn_right = diff > player.turn_rate;

        session.tick(&input, &mut sink);
        if session.phase() == SessionPhase::Over {
            break;
        }
    }

    let mut store = LocalScoreStore::load();
    if session.phase() == SessionPhase::Over {
        session.persist_final_score(&mut store, &mut sink);
    } else {
        // Survived the whole demo; record it anyway
        let state = session.state();
        let record = island_dodge::persistence::ScoreRecord::new(state.score, state.duration_seconds());
        if let Err(e) = store.save_score("local", &record) {
            log::warn!("Could not record demo score: {}", e);
        }
    }

    let state = session.state();
    let stats = store.stats("local");
    log::info!(
        "Run finished: score {}, {}s, frame {}, best {}",
        state.score,
        state.duration_seconds(),
        state.frame,
        stats.highest_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
