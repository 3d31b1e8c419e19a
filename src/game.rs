//! Host-facing game façade
//!
//! The host feeds in input events and frame timestamps and services the
//! requests it gets back (fetch a level, save an edited one). Everything else
//! stays inside.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Bounds;
use crate::config::GameConfig;
use crate::editor::LevelEditor;
use crate::error::LevelError;
use crate::level::Level;
use crate::platform::{Command, FrameClock, InputEvent, InputRouter, KeyValueStore};
use crate::settings::SettingsStore;
use crate::sim::rng::{self, RandomSource};
use crate::sim::{Phase, Round, RoundEvent, tick};

/// Identifies one level fetch. Only the newest outstanding ticket is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    /// 0-based level index
    pub level: usize,
}

/// Work the host has to do on the game's behalf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostRequest {
    /// Fetch this level and hand it back through `Game::complete_load`
    LoadLevel(LoadRequest),
    /// Same as `LoadLevel`, but the layout goes to the editor
    EditLevel(LoadRequest),
    /// Offer this level file to the user
    SaveLevel(String),
}

/// Who a fetched layout is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadTarget {
    Round,
    Editor,
}

impl LoadTarget {
    /// Phase the fetch belongs to; leaving it cancels the fetch
    fn phase(self) -> Phase {
        match self {
            LoadTarget::Round => Phase::Playing,
            LoadTarget::Editor => Phase::EditMode,
        }
    }
}

/// At most one level fetch in flight
#[derive(Debug, Clone, Default)]
struct LoadTracker {
    next_seq: u64,
    in_flight: Option<(LoadTicket, LoadTarget)>,
}

impl LoadTracker {
    fn begin(&mut self, target: LoadTarget) -> Option<LoadTicket> {
        if self.in_flight.is_some() {
            return None;
        }
        self.next_seq += 1;
        let ticket = LoadTicket(self.next_seq);
        self.in_flight = Some((ticket, target));
        Some(ticket)
    }

    /// Where the layout goes, if `ticket` is the one we were waiting for
    fn finish(&mut self, ticket: LoadTicket) -> Option<LoadTarget> {
        match self.in_flight {
            Some((pending, target)) if pending == ticket => {
                self.in_flight = None;
                Some(target)
            }
            _ => None,
        }
    }

    /// Drop the outstanding fetch unless it belongs to `phase`
    fn cancel_outside(&mut self, phase: Phase) {
        match self.in_flight {
            Some((ticket, target)) if target.phase() != phase => {
                self.in_flight = None;
                log::debug!("Cancelled level load #{}", ticket.seq());
            }
            _ => {}
        }
    }
}

pub struct Game<S: KeyValueStore, R: RandomSource = Pcg32> {
    round: Round<R>,
    settings: SettingsStore<S>,
    editor: LevelEditor,
    router: InputRouter,
    clock: FrameClock,
    loads: LoadTracker,
    /// Configured paddle width before the difficulty adjustment
    base_paddle_width: f32,
}

impl<S: KeyValueStore> Game<S, Pcg32> {
    pub fn seeded(config: &GameConfig, bounds: Bounds, level_count: usize, store: S, seed: u64) -> Self {
        Self::new(config, bounds, level_count, store, rng::seeded(seed))
    }
}

impl<S: KeyValueStore, R: RandomSource> Game<S, R> {
    /// A game sitting in the main menu, with settings read from `store`
    pub fn new(config: &GameConfig, bounds: Bounds, level_count: usize, store: S, rng: R) -> Self {
        let settings = SettingsStore::load(store);
        let round = Round::new(config, bounds, level_count, settings.settings().highscore, rng);
        let router = InputRouter::new(round.phase, settings.settings().controls);
        log::info!(
            "Game ready: {} level(s), difficulty {}",
            round.level_count,
            settings.settings().difficulty.as_str()
        );
        Self {
            round,
            settings,
            editor: LevelEditor::new(&config.block, bounds),
            router,
            clock: FrameClock::new(),
            loads: LoadTracker::default(),
            base_paddle_width: config.paddle.width,
        }
    }

    pub fn round(&self) -> &Round<R> {
        &self.round
    }

    pub fn settings(&self) -> &SettingsStore<S> {
        &self.settings
    }

    pub fn editor(&self) -> &LevelEditor {
        &self.editor
    }

    pub fn phase(&self) -> Phase {
        self.round.phase
    }

    /// Level fetch still outstanding, if any
    pub fn pending_load(&self) -> Option<LoadTicket> {
        self.loads.in_flight.map(|(ticket, _)| ticket)
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Option<HostRequest> {
        let command = self.router.route(&event)?;
        let width = self.round.bounds.width;

        match command {
            Command::MovePaddleTo(x) => self.round.paddle.clamp_to_mouse(x, width),
            Command::NudgePaddle(direction) => self.round.paddle.nudge(direction, width),
            Command::Play | Command::Acknowledge => return self.start_round(),
            Command::Back => self.set_phase(Phase::MainMenu),
            Command::OpenEditor => self.set_phase(Phase::EditMode),
            Command::OpenOptions => self.set_phase(Phase::Options),
            Command::CycleDifficulty => {
                self.settings.cycle_difficulty();
            }
            Command::ToggleMusic => {
                self.settings.toggle_music();
            }
            Command::ToggleSound => {
                self.settings.toggle_sound();
            }
            Command::ToggleControls => {
                let controls = self.settings.toggle_controls();
                self.router.set_controls(controls);
            }
            Command::PlaceBlock { x, y } => {
                self.editor.place(x, y);
            }
            Command::SelectHp(digit) => {
                self.editor.select_hp(digit);
            }
            Command::CycleHp => {
                self.editor.cycle_hp();
            }
            Command::Undo => {
                self.editor.undo();
            }
            Command::Clear => self.editor.clear(),
            Command::SaveLevel => match self.editor.to_json() {
                Ok(json) => return Some(HostRequest::SaveLevel(json)),
                Err(e) => log::warn!("Nothing saved: {e}"),
            },
            Command::EditLevel => {
                let Some(ticket) = self.loads.begin(LoadTarget::Editor) else {
                    log::debug!("Level load already in flight");
                    return None;
                };
                return Some(HostRequest::EditLevel(LoadRequest {
                    ticket,
                    level: self.round.level_index,
                }));
            }
        }
        None
    }

    /// One frame callback. Returns the round events it produced.
    pub fn frame(&mut self, timestamp_ms: f64) -> Vec<RoundEvent> {
        let dt = self.clock.advance(timestamp_ms);
        tick(&mut self.round, dt);

        let events = self.round.drain_events();
        for event in &events {
            if let RoundEvent::GameOver { highscore, .. } = event {
                self.settings.record_highscore(*highscore);
            }
        }
        // the round moves itself to Won/Lost
        if self.router.active() != self.round.phase {
            self.router.activate(self.round.phase);
        }
        events
    }

    /// Hand back the result of a `LoadLevel` or `EditLevel` request.
    /// Returns true if the layout was attached to the round or the editor.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<Level, LevelError>) -> bool {
        let Some(target) = self.loads.finish(ticket) else {
            log::warn!("Discarding stale level load #{}", ticket.seq());
            return false;
        };
        match (target, result) {
            (LoadTarget::Round, Ok(level)) => {
                self.round.attach_level(&level);
                true
            }
            (LoadTarget::Round, Err(e)) => {
                log::error!("Level {} failed to load: {e}", self.round.level_index + 1);
                self.set_phase(Phase::LoadFailed);
                false
            }
            (LoadTarget::Editor, Ok(level)) => {
                self.editor.load(&level);
                true
            }
            // the editor keeps what it has
            (LoadTarget::Editor, Err(e)) => {
                log::error!("Level {} could not be opened for editing: {e}", self.round.level_index + 1);
                false
            }
        }
    }

    fn start_round(&mut self) -> Option<HostRequest> {
        let difficulty = self.settings.settings().difficulty;
        self.round.start(difficulty.paddle_width(self.base_paddle_width));
        self.set_phase(Phase::Playing);

        let Some(ticket) = self.loads.begin(LoadTarget::Round) else {
            log::debug!("Level load already in flight");
            return None;
        };
        log::debug!("Requesting level {} (#{})", self.round.level_index + 1, ticket.seq());
        Some(HostRequest::LoadLevel(LoadRequest {
            ticket,
            level: self.round.level_index,
        }))
    }

    fn set_phase(&mut self, phase: Phase) {
        self.round.set_phase(phase);
        self.router.activate(phase);
        if phase == Phase::Playing {
            self.clock.reset();
        }
        self.loads.cancel_outside(phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::platform::{Key, MemoryStore, MenuChoice};
    use crate::settings::Controls;
    use crate::sim::{Block, BlockHp, ScriptedRolls};
    use glam::Vec2;

    const LEVEL: &str = r#"[{ "block": [
        { "position": { "x": 0, "y": 0 }, "hp": 1 },
        { "position": { "x": 80, "y": 0 }, "hp": "Unbreakable" }
    ] }]"#;

    fn game() -> Game<MemoryStore> {
        Game::seeded(&test_config(), Bounds::new(800.0, 600.0), 2, MemoryStore::new(), 7)
    }

    fn play(game: &mut Game<MemoryStore>) -> LoadRequest {
        match game.handle_input(InputEvent::Menu(MenuChoice::Play)) {
            Some(HostRequest::LoadLevel(request)) => request,
            other => panic!("expected a load request, got {other:?}"),
        }
    }

    #[test]
    fn test_play_requests_current_level() {
        let mut game = game();
        let request = play(&mut game);
        assert_eq!(request.level, 0);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.pending_load(), Some(request.ticket));
        assert!(game.round().is_awaiting_layout());
    }

    #[test]
    fn test_round_waits_for_layout() {
        let mut game = game();
        let request = play(&mut game);
        let start = game.round().balls[0].pos;
        game.frame(0.0);
        game.frame(16.0);
        assert_eq!(game.round().balls[0].pos, start);
        assert_eq!(game.phase(), Phase::Playing);

        assert!(game.complete_load(request.ticket, Level::from_json(LEVEL)));
        assert_eq!(game.round().blocks.len(), 2);
        game.frame(32.0);
        assert!(game.round().balls[0].pos.y < start.y);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut game = game();
        let first = play(&mut game);
        game.handle_input(InputEvent::Key(Key::Escape));
        assert_eq!(game.phase(), Phase::MainMenu);
        assert_eq!(game.pending_load(), None);

        let second = play(&mut game);
        assert_ne!(first.ticket, second.ticket);
        assert!(!game.complete_load(first.ticket, Level::from_json(LEVEL)));
        assert!(game.round().is_awaiting_layout());
        assert!(game.complete_load(second.ticket, Level::from_json(LEVEL)));
        assert!(!game.complete_load(second.ticket, Level::from_json(LEVEL)));
    }

    #[test]
    fn test_load_failure_then_retry() {
        let mut game = game();
        let request = play(&mut game);
        assert!(!game.complete_load(request.ticket, Err(LevelError::UnknownLevel(0))));
        assert_eq!(game.phase(), Phase::LoadFailed);

        let retry = game.handle_input(InputEvent::Key(Key::Enter));
        assert!(matches!(retry, Some(HostRequest::LoadLevel(r)) if r.level == 0));
        assert_eq!(game.phase(), Phase::Playing);

        let request = game.pending_load().unwrap();
        game.complete_load(request, Err(LevelError::NoBlocks));
        game.handle_input(InputEvent::Menu(MenuChoice::Back));
        assert_eq!(game.phase(), Phase::MainMenu);
    }

    #[test]
    fn test_difficulty_sets_paddle_width() {
        let mut game = game();
        game.handle_input(InputEvent::Menu(MenuChoice::Options));
        game.handle_input(InputEvent::Menu(MenuChoice::Difficulty));
        game.handle_input(InputEvent::Menu(MenuChoice::Difficulty));
        game.handle_input(InputEvent::Menu(MenuChoice::Back));
        assert_eq!(
            game.settings().backend().get("difficulty").as_deref(),
            Some("NIGHTMARE")
        );

        play(&mut game);
        assert_eq!(game.round().paddle.width, 70.0);
        assert_eq!(game.round().paddle.pos.x, 365.0);
    }

    #[test]
    fn test_controls_toggle_reroutes_paddle() {
        let mut game = game();
        game.handle_input(InputEvent::Menu(MenuChoice::Options));
        game.handle_input(InputEvent::Menu(MenuChoice::Controls));
        game.handle_input(InputEvent::Key(Key::Escape));
        assert_eq!(game.settings().settings().controls, Controls::Keyboard);

        play(&mut game);
        let x = game.round().paddle.pos.x;
        game.handle_input(InputEvent::PointerMoved { x: 100.0 });
        assert_eq!(game.round().paddle.pos.x, x);
        game.handle_input(InputEvent::Key(Key::Left));
        assert!(game.round().paddle.pos.x < x);
    }

    #[test]
    fn test_loss_persists_highscore_and_acknowledge_restarts() {
        let mut game = game();
        let request = play(&mut game);
        game.complete_load(request.ticket, Level::from_json(LEVEL));
        game.round.score = 700;
        game.round.balls[0].pos = Vec2::new(400.0, 700.0);
        game.round.balls[0].motion.velocity = Vec2::new(0.0, 300.0);

        let events = game.frame(0.0);
        assert!(events.contains(&RoundEvent::BallLost));
        assert!(events.contains(&RoundEvent::GameOver {
            score: 700,
            highscore: 700
        }));
        assert_eq!(game.phase(), Phase::Lost);
        assert_eq!(game.settings().settings().highscore, 700);
        assert_eq!(game.settings().backend().get("highscore").as_deref(), Some("700"));

        let again = game.handle_input(InputEvent::PointerPressed { x: 0.0, y: 0.0 });
        assert!(matches!(again, Some(HostRequest::LoadLevel(r)) if r.level == 0));
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.round().score, 0);
    }

    #[test]
    fn test_win_advances_level() {
        let mut game: Game<MemoryStore, ScriptedRolls> = Game::new(
            &test_config(),
            Bounds::new(800.0, 600.0),
            2,
            MemoryStore::new(),
            ScriptedRolls::new(vec![0.9]).unwrap(),
        );
        game.handle_input(InputEvent::Menu(MenuChoice::Play));
        let ticket = game.pending_load().unwrap();
        let mut block = Block::new(Vec2::new(360.0, 400.0), 80.0, 30.0, 2.0, BlockHp::Hits(1));
        block.power_up = false;
        game.complete_load(ticket, Ok(Level::default()));
        game.round.attach_blocks(vec![block]);

        game.frame(0.0);
        let mut now = 0.0;
        while game.phase() == Phase::Playing && now < 2000.0 {
            now += 16.0;
            game.frame(now);
        }
        assert_eq!(game.phase(), Phase::Won);
        assert_eq!(game.round().level_index, 1);

        let next = game.handle_input(InputEvent::Key(Key::Enter));
        assert!(matches!(next, Some(HostRequest::LoadLevel(r)) if r.level == 1));
    }

    #[test]
    fn test_editor_save_request() {
        let mut game = game();
        game.handle_input(InputEvent::Menu(MenuChoice::EditMode));
        assert_eq!(game.handle_input(InputEvent::Menu(MenuChoice::Save)), None);

        game.handle_input(InputEvent::Key(Key::Digit(3)));
        game.handle_input(InputEvent::PointerPressed { x: 50.0, y: 20.0 });
        assert_eq!(game.editor().blocks.len(), 1);

        match game.handle_input(InputEvent::Menu(MenuChoice::Save)) {
            Some(HostRequest::SaveLevel(json)) => {
                let level = Level::from_json(&json).unwrap();
                assert_eq!(level.blocks[0].hp, BlockHp::Hits(3));
            }
            other => panic!("expected a save request, got {other:?}"),
        }
    }

    fn edit_request(game: &mut Game<MemoryStore>) -> LoadRequest {
        match game.handle_input(InputEvent::Menu(MenuChoice::Load)) {
            Some(HostRequest::EditLevel(request)) => request,
            other => panic!("expected an edit request, got {other:?}"),
        }
    }

    #[test]
    fn test_editor_opens_existing_level() {
        let mut game = game();
        game.handle_input(InputEvent::Menu(MenuChoice::EditMode));
        game.handle_input(InputEvent::PointerPressed { x: 400.0, y: 100.0 });

        let request = edit_request(&mut game);
        assert_eq!(request.level, 0);
        assert_eq!(game.handle_input(InputEvent::Menu(MenuChoice::Load)), None);

        assert!(game.complete_load(request.ticket, Level::from_json(LEVEL)));
        assert_eq!(game.phase(), Phase::EditMode);
        assert_eq!(game.editor().blocks.len(), 2);
        assert_eq!(game.editor().blocks[1].hp, BlockHp::Unbreakable);
        assert!(game.round().blocks.is_empty());
        assert_eq!(game.editor().preview(40.0, 15.0).map(|(_, free)| free), Some(false));
    }

    #[test]
    fn test_editor_load_failure_keeps_blocks() {
        let mut game = game();
        game.handle_input(InputEvent::Menu(MenuChoice::EditMode));
        game.handle_input(InputEvent::PointerPressed { x: 400.0, y: 100.0 });

        let request = edit_request(&mut game);
        assert!(!game.complete_load(request.ticket, Err(LevelError::NoBlocks)));
        assert_eq!(game.phase(), Phase::EditMode);
        assert_eq!(game.editor().blocks.len(), 1);
        assert_eq!(game.pending_load(), None);
    }

    #[test]
    fn test_leaving_editor_cancels_its_load() {
        let mut game = game();
        game.handle_input(InputEvent::Menu(MenuChoice::EditMode));
        let request = edit_request(&mut game);
        game.handle_input(InputEvent::Key(Key::Escape));
        assert_eq!(game.pending_load(), None);

        let round_load = play(&mut game);
        assert!(!game.complete_load(request.ticket, Level::from_json(LEVEL)));
        assert!(game.editor().blocks.is_empty());
        assert!(game.complete_load(round_load.ticket, Level::from_json(LEVEL)));
        assert_eq!(game.round().blocks.len(), 2);
    }
}
