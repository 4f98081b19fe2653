//! Jumping Potato entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, TouchEvent};

    use jumping_potato::GameError;
    use jumping_potato::game_loop::GameLoop;
    use jumping_potato::highscores::HighScores;
    use jumping_potato::input::{InputState, TOUCH};
    use jumping_potato::persistence::{LocalStorage, MemoryStorage, Storage};
    use jumping_potato::platform::{self, EventSubscription};
    use jumping_potato::renderer::{RenderSink, RenderState, SceneOptions};
    use jumping_potato::settings::Settings;
    use jumping_potato::sim::{GameEvent, GamePhase, GameState, tick};
    use jumping_potato::tuning::Tuning;

    /// Game instance holding all state for one session
    struct Game {
        state: GameState,
        game_loop: GameLoop,
        input: InputState,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        settings: Settings,
        high_scores: HighScores,
        storage: Box<dyn Storage>,
        /// DOM listeners, removed when the session is torn down
        listeners: Vec<EventSubscription>,
        /// Set by event handlers; applied at the start of the next frame
        pending_resize: bool,
        quit: bool,
    }

    impl Game {
        /// One animation frame: simulate, then draw
        fn frame(&mut self, time: f64) {
            if self.pending_resize {
                self.pending_resize = false;
                self.apply_resize();
            }

            let mut events = Vec::new();
            let state = &mut self.state;
            let input = &mut self.input;
            self.game_loop.frame(time, |dt| {
                events.extend(tick(state, &input.take_tick_input(), dt));
            });
            self.input.end_frame();

            for event in events {
                self.handle_event(event);
            }

            if let Some(render_state) = self.render_state.as_mut() {
                let options = SceneOptions {
                    reduced_motion: self.settings.reduced_motion,
                };
                render_state.render(&self.state.snapshot(), &options);
            }
            self.update_hud();
        }

        fn handle_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::GameOver { score, level } => {
                    // No more stepping until restart
                    self.game_loop.stop();
                    let rank = self.high_scores.add_score(
                        score,
                        level,
                        self.settings.username.clone(),
                        platform::unix_time_ms(),
                    );
                    if rank.is_some() {
                        self.high_scores.save(self.storage.as_mut());
                    }
                    self.show_game_over(score, rank);
                }
                GameEvent::LevelUp { level } => {
                    if let Some(document) = current_document() {
                        set_text(&document, "hud-level", &level.to_string());
                    }
                }
                _ => {}
            }
        }

        fn restart(&mut self) {
            let seed = platform::unix_time_ms() as u64;
            self.state.reset(seed);
            self.input.clear();
            self.game_loop.start(platform::now_ms());
            if let Some(document) = current_document() {
                set_visible(&document, "game-over", false);
                set_visible(&document, "pause-menu", false);
            }
            log::info!("Game restarted with seed: {}", seed);
        }

        fn toggle_pause(&mut self) {
            if self.state.phase != GamePhase::Playing {
                return;
            }
            if self.game_loop.is_paused() {
                self.game_loop.resume(platform::now_ms());
            } else {
                self.game_loop.pause();
                self.input.clear();
            }
            if let Some(document) = current_document() {
                set_visible(&document, "pause-menu", self.game_loop.is_paused());
            }
        }

        fn auto_pause(&mut self, reason: &str) {
            if self.state.phase == GamePhase::Playing && self.game_loop.is_running() {
                self.toggle_pause();
                log::info!("Auto-paused ({})", reason);
            }
        }

        fn apply_resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let client_w = self.canvas.client_width();
            let client_h = self.canvas.client_height();
            if client_w <= 0 || client_h <= 0 {
                return;
            }
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
            self.state.resize(client_w as f32, client_h as f32);
        }

        /// Remove all listeners and stop the loop
        fn teardown(&mut self) {
            self.game_loop.stop();
            self.listeners.clear();
            self.render_state = None;
            log::info!("Session torn down");
        }

        fn update_hud(&self) {
            let Some(document) = current_document() else {
                return;
            };
            set_text(&document, "hud-score", &self.state.score().to_string());
            set_text(&document, "hud-level", &self.state.levels.level_number().to_string());
            set_text(&document, "hud-dodged", &self.state.dodged.to_string());
            set_visible(&document, "hud-fps", self.settings.show_fps);
            if self.settings.show_fps {
                set_text(&document, "hud-fps", &self.game_loop.fps().to_string());
            }
        }

        fn show_game_over(&self, score: u64, rank: Option<usize>) {
            let Some(document) = current_document() else {
                return;
            };
            set_text(&document, "final-score", &score.to_string());
            let best = self.high_scores.top_score().unwrap_or(score);
            set_text(&document, "best-score", &best.to_string());
            let name = self.settings.display_name();
            let message = match rank {
                Some(1) => format!("New best, {}!", name),
                Some(rank) => format!("{} is #{} on the leaderboard", name, rank),
                None => String::new(),
            };
            set_text(&document, "rank-message", &message);
            show_leaderboard(&document, &self.high_scores);
            set_visible(&document, "game-over", true);
        }
    }

    fn show_leaderboard(document: &Document, high_scores: &HighScores) {
        let lines = high_scores.leaderboard_lines(platform::unix_time_ms());
        set_text(document, "leaderboard", &lines.join("\n"));
    }

    fn current_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document
            .query_selector(&format!("#{} .hud-value", id))
            .ok()
            .flatten()
            .or_else(|| document.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn open_storage() -> Box<dyn Storage> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; progress will not be saved", e);
                Box::new(MemoryStorage::new())
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Jumping Potato starting...");

        let Some(document) = current_document() else {
            log::error!("{}", GameError::NoDocument);
            return;
        };
        set_visible(&document, "loading", false);

        let storage = open_storage();
        let settings = Settings::load(storage.as_ref());
        let high_scores = HighScores::load(storage.as_ref());
        if let Some(best) = high_scores.top_score() {
            set_text(&document, "menu-best", &best.to_string());
        }
        show_leaderboard(&document, &high_scores);
        for (id, value) in [
            ("username", settings.username.as_deref()),
            ("potato-color", settings.customization.as_deref()),
        ] {
            if let (Some(value), Some(input)) = (value, input_element(&document, id)) {
                input.set_value(value);
            }
        }
        show_menu(&document, None);

        // The menu lives as long as the page
        let Some(button) = document.get_element_by_id("start-btn") else {
            log::error!("{}", GameError::MissingElement("start-btn"));
            return;
        };
        let starting = Rc::new(Cell::new(false));
        let pending = Rc::new(RefCell::new(Some((storage, settings, high_scores))));
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if starting.replace(true) {
                return;
            }
            let Some((storage, mut settings, high_scores)) = pending.borrow_mut().take() else {
                return;
            };
            if let Some(document) = current_document() {
                if let Some(input) = input_element(&document, "username") {
                    settings.set_username(&input.value());
                }
                if let Some(input) = input_element(&document, "potato-color") {
                    settings.set_customization(Some(input.value()));
                }
            }

            let starting = starting.clone();
            let pending = pending.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let mut storage = storage;
                settings.save(storage.as_mut());
                if let Err((e, restored)) = start(storage, settings, high_scores).await {
                    log::error!("Failed to start game: {}", e);
                    *pending.borrow_mut() = Some(restored);
                    starting.set(false);
                    if let Some(document) = current_document() {
                        show_menu(&document, Some(&e.to_string()));
                    }
                }
            });
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn input_element(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn show_menu(document: &Document, error: Option<&str>) {
        set_visible(document, "menu", true);
        set_visible(document, "hud", false);
        if let Some(error) = error {
            set_text(document, "menu-error", error);
        }
    }

    type Profile = (Box<dyn Storage>, Settings, HighScores);

    /// Bring up the renderer and the session. On failure the profile is handed back.
    async fn start(
        storage: Box<dyn Storage>,
        settings: Settings,
        high_scores: HighScores,
    ) -> Result<(), (GameError, Profile)> {
        let canvas = match find_canvas() {
            Ok(canvas) => canvas,
            Err(e) => return Err((e, (storage, settings, high_scores))),
        };
        let render_state = match init_renderer(&canvas).await {
            Ok(render_state) => render_state,
            Err(e) => return Err((e, (storage, settings, high_scores))),
        };

        let seed = platform::unix_time_ms() as u64;
        let playfield = glam::Vec2::new(
            canvas.client_width().max(1) as f32,
            canvas.client_height().max(1) as f32,
        );
        let state = GameState::with_playfield(seed, Tuning::default(), playfield);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            state,
            game_loop: GameLoop::new(),
            input: InputState::new(),
            render_state: Some(render_state),
            canvas: canvas.clone(),
            settings,
            high_scores,
            storage,
            listeners: Vec::new(),
            pending_resize: false,
            quit: false,
        }));

        let listeners = subscribe(&canvas, Rc::downgrade(&game));
        {
            let mut g = game.borrow_mut();
            g.listeners = listeners;
            g.game_loop.start(platform::now_ms());
        }

        if let Some(document) = current_document() {
            set_visible(&document, "menu", false);
            set_visible(&document, "hud", true);
        }

        request_animation_frame(game);
        log::info!("Jumping Potato running!");
        Ok(())
    }

    fn find_canvas() -> Result<HtmlCanvasElement, GameError> {
        let window = web_sys::window().ok_or(GameError::NoWindow)?;
        let document = window.document().ok_or(GameError::NoDocument)?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or(GameError::MissingElement("canvas"))?
            .dyn_into()
            .map_err(|_| GameError::NotACanvas("canvas"))?;

        let dpr = window.device_pixel_ratio();
        canvas.set_width((canvas.client_width().max(1) as f64 * dpr) as u32);
        canvas.set_height((canvas.client_height().max(1) as f64 * dpr) as u32);
        Ok(canvas)
    }

    async fn init_renderer(canvas: &HtmlCanvasElement) -> Result<RenderState, GameError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| GameError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| GameError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, canvas.width(), canvas.height()).await
    }

    /// Run `f` against the game if the session is still alive
    fn with_game(game: &Weak<RefCell<Game>>, f: impl FnOnce(&mut Game)) {
        if let Some(game) = game.upgrade() {
            f(&mut game.borrow_mut());
        }
    }

    fn subscribe(canvas: &HtmlCanvasElement, game: Weak<RefCell<Game>>) -> Vec<EventSubscription> {
        let mut listeners = Vec::new();
        let (Some(window), Some(document)) = (web_sys::window(), current_document()) else {
            return listeners;
        };

        {
            let game = game.clone();
            listeners.push(EventSubscription::new(
                &window,
                "keydown",
                move |event: KeyboardEvent| {
                    let code = event.code();
                    if matches!(code.as_str(), "Space" | "ArrowUp") {
                        // Keep the page from scrolling
                        event.prevent_default();
                    }
                    with_game(&game, |g| match code.as_str() {
                        "Escape" | "KeyP" => g.toggle_pause(),
                        "Enter" | "KeyR" if g.state.phase == GamePhase::GameOver => g.restart(),
                        _ => g.input.key_down(&code),
                    });
                },
            ));
        }

        {
            let game = game.clone();
            listeners.push(EventSubscription::new(
                &window,
                "keyup",
                move |event: KeyboardEvent| {
                    with_game(&game, |g| g.input.key_up(&event.code()));
                },
            ));
        }

        {
            let game = game.clone();
            listeners.push(EventSubscription::new(
                canvas,
                "touchstart",
                move |event: TouchEvent| {
                    event.prevent_default();
                    with_game(&game, |g| {
                        if g.state.phase == GamePhase::GameOver {
                            g.restart();
                        } else {
                            g.input.key_down(TOUCH);
                        }
                    });
                },
            ));
        }

        {
            let game = game.clone();
            listeners.push(EventSubscription::new(
                canvas,
                "touchend",
                move |_event: TouchEvent| {
                    with_game(&game, |g| g.input.key_up(TOUCH));
                },
            ));
        }

        {
            let game = game.clone();
            listeners.push(EventSubscription::new(
                &window,
                "resize",
                move |_event: web_sys::Event| {
                    with_game(&game, |g| g.pending_resize = true);
                },
            ));
        }

        {
            let game = game.clone();
            let document_clone = document.clone();
            listeners.push(EventSubscription::new(
                &document,
                "visibilitychange",
                move |_event: web_sys::Event| {
                    if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                        with_game(&game, |g| g.auto_pause("tab hidden"));
                    }
                },
            ));
        }

        {
            let game = game.clone();
            listeners.push(EventSubscription::new(
                &window,
                "blur",
                move |_event: web_sys::FocusEvent| {
                    with_game(&game, |g| {
                        g.input.clear();
                        g.auto_pause("window blur");
                    });
                },
            ));
        }

        {
            let game = game.clone();
            listeners.push(EventSubscription::new(
                &window,
                "pagehide",
                move |_event: web_sys::Event| {
                    // Dropping listeners from inside one of them is not allowed
                    with_game(&game, |g| g.quit = true);
                },
            ));
        }

        let buttons: [(&str, fn(&mut Game)); 2] = [
            ("restart-btn", Game::restart),
            ("resume-btn", Game::toggle_pause),
        ];
        for (id, action) in buttons {
            if let Some(button) = document.get_element_by_id(id) {
                let game = game.clone();
                listeners.push(EventSubscription::new(
                    &button,
                    "click",
                    move |_event: web_sys::Event| with_game(&game, action),
                ));
            }
        }

        listeners
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();
            if g.quit {
                g.teardown();
                false
            } else {
                g.frame(time);
                true
            }
        };

        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: the autopilot plays one session on a simulated 60 Hz clock
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use jumping_potato::persistence::MemoryStorage;
    use jumping_potato::platform;
    use jumping_potato::sim::{GameEvent, GameState, TickInput, tick};
    use jumping_potato::{GameLoop, HighScores, Settings, Tuning};

    env_logger::init();
    log::info!("Jumping Potato (native) starting...");
    log::info!("Native mode runs a headless demo - use the web build to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| platform::unix_time_ms() as u64);
    let mut storage = MemoryStorage::new();
    let settings = Settings::load(&storage);
    let mut high_scores = HighScores::load(&storage);

    let mut state = GameState::new(seed, Tuning::default());
    let mut game_loop = GameLoop::new();
    let frame_ms = 1000.0 / 60.0;
    let max_frames = 60 * 60 * 5;
    let mut now = 0.0;
    game_loop.start(now);

    let mut result = None;
    for _ in 0..max_frames {
        now += frame_ms;
        let mut events = Vec::new();
        game_loop.frame(now, |dt| {
            let input = TickInput::autopilot(&state);
            events.extend(tick(&mut state, &input, dt));
        });
        for event in events {
            match event {
                GameEvent::LevelUp { level } => println!("Level {}", level),
                GameEvent::GameOver { score, level } => result = Some((score, level)),
                _ => {}
            }
        }
        if result.is_some() {
            game_loop.stop();
            break;
        }
    }

    let (score, level) = result.unwrap_or((state.score(), state.levels.level_number()));
    high_scores.add_score(
        score,
        level,
        settings.username.clone(),
        platform::unix_time_ms(),
    );
    high_scores.save(&mut storage);

    println!(
        "Seed {}: score {} at level {}, {} obstacles dodged{}",
        seed,
        score,
        level,
        state.dodged,
        if state.is_alive() { " (still alive)" } else { "" }
    );
    for line in high_scores.leaderboard_lines(platform::unix_time_ms()) {
        println!("{}", line);
    }
}
