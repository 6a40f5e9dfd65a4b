//! Hydro Hero entry point
//!
//! In the browser this wires the DOM, the frame loop and the round clock to
//! the sim. Natively it plays a few seeded rounds on autopilot and logs them.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

    use hydro_hero::renderer::CanvasRenderer;
    use hydro_hero::sim::{
        CountdownOutcome, FrameView, GameEvent, GamePhase, GameState, Generation, RoundInput,
        TickInput, TimerOutcome, advance_countdown, press, tick, timer_tick,
    };
    use hydro_hero::{KeyAction, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        renderer: Option<CanvasRenderer>,
        held_left: bool,
        held_right: bool,
        autopilot: bool,
        /// `setInterval` handle of the live round clock
        interval_id: Option<i32>,
        // FPS tracking
        last_time: f64,
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                state: GameState::new(Tuning::default(), seed),
                settings,
                renderer: None,
                held_left: false,
                held_right: false,
                autopilot: false,
                interval_id: None,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn input(&self) -> TickInput {
            TickInput {
                left: self.held_left,
                right: self.held_right,
                autopilot: self.autopilot,
            }
        }

        /// One display frame of an active round
        fn update(&mut self, time: f64) {
            if self.last_time > 0.0 {
                self.frame_times[self.frame_index] = time - self.last_time;
                self.frame_index = (self.frame_index + 1) % self.frame_times.len();
                let avg = self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64;
                if avg > 0.0 {
                    self.fps = (1000.0 / avg).round() as u32;
                }
            }
            self.last_time = time;

            let input = self.input();
            tick(&mut self.state, &input);
        }

        /// Render the current frame
        fn render(&self, time: f64) {
            if let Some(renderer) = &self.renderer {
                renderer.draw(&FrameView::capture(&self.state), time);
            }
        }

        /// Apply queued sim events to the overlay, then refresh the HUD
        fn sync_dom(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            for event in self.state.drain_events() {
                match event {
                    GameEvent::CountdownStep { label } => {
                        show(&document, "overlay");
                        hide(&document, "start-message");
                        show(&document, "countdown-message");
                        set_text(&document, "countdown-message", &label);
                    }
                    GameEvent::RoundStarted => hide(&document, "overlay"),
                    GameEvent::RoundEnded {
                        score,
                        high_score,
                        new_high,
                    } => {
                        show(&document, "overlay");
                        hide(&document, "countdown-message");
                        show(&document, "start-message");
                        let banner = if new_high { "<br>New high score!" } else { "" };
                        if let Some(el) = document.get_element_by_id("start-message") {
                            el.set_inner_html(&format!(
                                "Time's up!<br>Score: {}<br>High Score: {}{}<br>\
                                 Press Space to play again or Esc to quit",
                                score, high_score, banner
                            ));
                        }
                    }
                    GameEvent::DropCaught { id, bucket } => {
                        log::trace!("Caught drop {} (bucket {})", id, bucket)
                    }
                    GameEvent::Deposited { amount } => log::debug!("Deposited {}", amount),
                    _ => {}
                }
            }

            set_text(&document, "hud-score", &format!("Score: {}", self.state.score));
            set_text(&document, "hud-timer", &format!("Time: {}", self.state.time_left));
            set_text(
                &document,
                "hud-high",
                &format!("High Score: {}", self.state.high_score),
            );
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "");
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &Document, id: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", "");
        }
    }

    fn hide(document: &Document, id: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", "hidden");
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Hydro Hero starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let canvas = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());

        let settings = Settings::from_json_or_default(
            canvas
                .as_ref()
                .and_then(|c| c.get_attribute("data-settings"))
                .as_deref(),
        );

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(seed, settings);

        match &canvas {
            Some(canvas) => {
                canvas.set_width(game.state.tuning.board_width as u32);
                canvas.set_height(game.state.tuning.board_height as u32);
                game.renderer = canvas
                    .get_context("2d")
                    .ok()
                    .flatten()
                    .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
                    .map(|ctx| CanvasRenderer::new(ctx, &game.settings));
                if game.renderer.is_none() {
                    log::warn!("No 2d context; running without drawing");
                }
            }
            None => log::warn!("No #canvas element; running without drawing"),
        }

        game.render(0.0);
        game.sync_dom();
        show(&document, "overlay");
        show(&document, "start-message");
        hide(&document, "countdown-message");

        log::info!("Ready (seed {})", seed);

        setup_input_handlers(Rc::new(RefCell::new(game)));
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let actions = game.borrow().settings.actions_for_key(&event.key());
                for action in actions {
                    if handle_action(&game, action, true) {
                        event.prevent_default();
                        break;
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let actions = game.borrow().settings.actions_for_key(&event.key());
                for action in actions.into_iter().filter(KeyAction::is_held) {
                    handle_action(&game, action, false);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Returns true when the key was consumed
    fn handle_action(game: &Rc<RefCell<Game>>, action: KeyAction, down: bool) -> bool {
        let round_input = match action {
            KeyAction::MoveLeft => {
                game.borrow_mut().held_left = down;
                return true;
            }
            KeyAction::MoveRight => {
                game.borrow_mut().held_right = down;
                return true;
            }
            KeyAction::ToggleAutopilot => {
                let mut g = game.borrow_mut();
                g.autopilot = !g.autopilot;
                log::info!("Autopilot: {}", g.autopilot);
                return true;
            }
            KeyAction::Start => RoundInput::Start,
            KeyAction::Replay => RoundInput::Replay,
            KeyAction::Quit => RoundInput::Quit,
        };

        let (accepted, phase, generation) = {
            let mut g = game.borrow_mut();
            let accepted = press(&mut g.state, round_input);
            if accepted {
                g.sync_dom();
            }
            (accepted, g.state.phase, g.state.generation)
        };
        if !accepted {
            return false;
        }

        match phase {
            GamePhase::Countdown { .. } => schedule_countdown_step(game.clone(), generation),
            GamePhase::Quit => {
                let g = game.borrow();
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    hide(&document, "overlay");
                }
                log::info!("Thanks for playing (high score {})", g.state.high_score);
            }
            _ => {}
        }
        true
    }

    fn schedule_countdown_step(game: Rc<RefCell<Game>>, generation: Generation) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let delay = game.borrow().state.tuning.countdown_step_ms as i32;
        let closure = Closure::once(move || {
            let outcome = {
                let mut g = game.borrow_mut();
                let outcome = advance_countdown(&mut g.state, generation);
                g.sync_dom();
                outcome
            };
            match outcome {
                CountdownOutcome::Step { .. } => schedule_countdown_step(game, generation),
                CountdownOutcome::Started { generation } => {
                    start_round_clock(&game, generation);
                    request_animation_frame(game, generation);
                }
                CountdownOutcome::Stale => {}
            }
        });
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay,
        ) {
            log::error!("Failed to schedule countdown: {:?}", e);
        }
        closure.forget();
    }

    /// Replace any running interval with one bound to `generation`
    fn start_round_clock(game: &Rc<RefCell<Game>>, generation: Generation) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(old) = game.borrow_mut().interval_id.take() {
            window.clear_interval_with_handle(old);
        }

        let own_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let closure = {
            let game = game.clone();
            let own_id = own_id.clone();
            Closure::<dyn FnMut()>::new(move || {
                let outcome = {
                    let mut g = game.borrow_mut();
                    let outcome = timer_tick(&mut g.state, generation);
                    g.sync_dom();
                    outcome
                };
                if outcome.should_cancel() {
                    if let Some(id) = own_id.take() {
                        if let Some(window) = web_sys::window() {
                            window.clear_interval_with_handle(id);
                        }
                        let mut g = game.borrow_mut();
                        if g.interval_id == Some(id) {
                            g.interval_id = None;
                        }
                    }
                }
                if let TimerOutcome::Expired { score, .. } = outcome {
                    log::info!("Round over: {}", score);
                }
            })
        };

        let period = hydro_hero::consts::TIMER_PERIOD_MS as i32;
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            period,
        ) {
            Ok(id) => {
                own_id.set(Some(id));
                game.borrow_mut().interval_id = Some(id);
            }
            Err(e) => log::error!("Failed to start round clock: {:?}", e),
        }
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, generation: Generation) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, generation, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Runs while the round of `generation` is active, then draws one last frame
    fn game_loop(game: Rc<RefCell<Game>>, generation: Generation, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            let live = g.state.generation == generation && g.state.is_active();
            if live {
                g.update(time);
            }
            g.render(time);
            g.sync_dom();
            live
        };

        if keep_going {
            request_animation_frame(game, generation);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hydro_hero::Tuning;
    use hydro_hero::sim::{
        CountdownOutcome, GameState, RoundInput, TickInput, TimerOutcome, advance_countdown,
        press, tick, timer_tick,
    };

    /// Display frames per round-clock second
    const FRAMES_PER_SECOND: u32 = 60;
    const ROUNDS: usize = 3;

    env_logger::init();
    log::info!("Hydro Hero (native) starting...");
    log::info!("Native mode is a headless autopilot demo - build for wasm32 to play");

    let seed = std::env::var("HYDRO_HERO_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x4859_4452);
    let mut state = GameState::new(Tuning::default(), seed);
    let input = TickInput {
        autopilot: true,
        ..TickInput::default()
    };

    for round in 0..ROUNDS {
        let round_input = if round == 0 {
            RoundInput::Start
        } else {
            RoundInput::Replay
        };
        press(&mut state, round_input);

        let countdown = state.generation;
        let generation = loop {
            match advance_countdown(&mut state, countdown) {
                CountdownOutcome::Step { .. } => continue,
                CountdownOutcome::Started { generation } => break generation,
                CountdownOutcome::Stale => {
                    log::error!("Countdown went stale");
                    return;
                }
            }
        };

        loop {
            for _ in 0..FRAMES_PER_SECOND {
                tick(&mut state, &input);
            }
            state.drain_events();
            match timer_tick(&mut state, generation) {
                TimerOutcome::Expired { score, high_score } => {
                    println!(
                        "Round {}: score {} (high {}) caught {} missed {} deposits {}",
                        round + 1,
                        score,
                        high_score,
                        state.stats.caught,
                        state.stats.missed,
                        state.stats.deposits
                    );
                    break;
                }
                TimerOutcome::Ticked { .. } | TimerOutcome::Inert => {}
                TimerOutcome::Stale => {
                    log::error!("Round clock went stale");
                    return;
                }
            }
        }
        state.drain_events();
    }

    press(&mut state, RoundInput::Quit);

    println!("\nLeaderboard:");
    for (rank, record) in state.leaderboard.entries.iter().enumerate() {
        println!("{:>2}. {:>5}  ({} caught)", rank + 1, record.score, record.caught);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
