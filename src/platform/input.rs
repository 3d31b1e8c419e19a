//! Input routing
//!
//! Raw host events are translated into game commands through a routing table
//! chosen by the current phase. The table is swapped only when the phase (or
//! the control scheme) changes, so no handler is ever attached or detached by
//! hand.

use serde::{Deserialize, Serialize};

use crate::settings::Controls;
use crate::sim::Phase;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    /// Number row, 0-9
    Digit(u8),
    Escape,
    Enter,
}

/// Menu buttons drawn by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuChoice {
    Play,
    EditMode,
    Options,
    Difficulty,
    Music,
    Sound,
    Controls,
    Save,
    Load,
    Undo,
    Clear,
    CycleBlock,
    Back,
}

/// Event delivered by the host, in playfield coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerMoved { x: f32 },
    PointerPressed { x: f32, y: f32 },
    Key(Key),
    Menu(MenuChoice),
}

/// What the game should do in response to an event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Center the paddle on this x
    MovePaddleTo(f32),
    /// One key step, -1 left or +1 right
    NudgePaddle(f32),
    /// Continue past Won/Lost, or retry a failed load
    Acknowledge,
    Back,
    Play,
    OpenEditor,
    OpenOptions,
    CycleDifficulty,
    ToggleMusic,
    ToggleSound,
    ToggleControls,
    PlaceBlock { x: f32, y: f32 },
    SelectHp(u8),
    CycleHp,
    Undo,
    Clear,
    SaveLevel,
    /// Open an existing level in the editor
    EditLevel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Trigger {
    PointerMove,
    PointerPress,
    Key(Key),
    AnyDigit,
    Menu(MenuChoice),
}

impl Trigger {
    fn matches(&self, event: &InputEvent) -> bool {
        match (self, event) {
            (Trigger::PointerMove, InputEvent::PointerMoved { .. }) => true,
            (Trigger::PointerPress, InputEvent::PointerPressed { .. }) => true,
            (Trigger::AnyDigit, InputEvent::Key(Key::Digit(_))) => true,
            (Trigger::Key(k), InputEvent::Key(e)) => k == e,
            (Trigger::Menu(m), InputEvent::Menu(e)) => m == e,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    MovePaddle,
    NudgeLeft,
    NudgeRight,
    Acknowledge,
    Back,
    Play,
    OpenEditor,
    OpenOptions,
    CycleDifficulty,
    ToggleMusic,
    ToggleSound,
    ToggleControls,
    PlaceBlock,
    SelectHp,
    CycleHp,
    Undo,
    Clear,
    SaveLevel,
    EditLevel,
}

impl Action {
    /// Fill in the event payload
    fn command(self, event: &InputEvent) -> Option<Command> {
        let command = match self {
            Action::MovePaddle => match event {
                InputEvent::PointerMoved { x } => Command::MovePaddleTo(*x),
                _ => return None,
            },
            Action::NudgeLeft => Command::NudgePaddle(-1.0),
            Action::NudgeRight => Command::NudgePaddle(1.0),
            Action::Acknowledge => Command::Acknowledge,
            Action::Back => Command::Back,
            Action::Play => Command::Play,
            Action::OpenEditor => Command::OpenEditor,
            Action::OpenOptions => Command::OpenOptions,
            Action::CycleDifficulty => Command::CycleDifficulty,
            Action::ToggleMusic => Command::ToggleMusic,
            Action::ToggleSound => Command::ToggleSound,
            Action::ToggleControls => Command::ToggleControls,
            Action::PlaceBlock => match event {
                InputEvent::PointerPressed { x, y } => Command::PlaceBlock { x: *x, y: *y },
                _ => return None,
            },
            Action::SelectHp => match event {
                InputEvent::Key(Key::Digit(d)) => Command::SelectHp(*d),
                _ => return None,
            },
            Action::CycleHp => Command::CycleHp,
            Action::Undo => Command::Undo,
            Action::Clear => Command::Clear,
            Action::SaveLevel => Command::SaveLevel,
            Action::EditLevel => Command::EditLevel,
        };
        Some(command)
    }
}

type Route = (Trigger, Action);

const PLAYING_MOUSE: &[Route] = &[
    (Trigger::PointerMove, Action::MovePaddle),
    (Trigger::Key(Key::Escape), Action::Back),
];

const PLAYING_KEYBOARD: &[Route] = &[
    (Trigger::Key(Key::Left), Action::NudgeLeft),
    (Trigger::Key(Key::Right), Action::NudgeRight),
    (Trigger::Key(Key::Escape), Action::Back),
];

const ROUND_OVER: &[Route] = &[
    (Trigger::PointerPress, Action::Acknowledge),
    (Trigger::Key(Key::Enter), Action::Acknowledge),
    (Trigger::Key(Key::Escape), Action::Back),
];

const MAIN_MENU: &[Route] = &[
    (Trigger::Menu(MenuChoice::Play), Action::Play),
    (Trigger::Key(Key::Enter), Action::Play),
    (Trigger::Menu(MenuChoice::EditMode), Action::OpenEditor),
    (Trigger::Menu(MenuChoice::Options), Action::OpenOptions),
];

const OPTIONS: &[Route] = &[
    (Trigger::Menu(MenuChoice::Difficulty), Action::CycleDifficulty),
    (Trigger::Menu(MenuChoice::Music), Action::ToggleMusic),
    (Trigger::Menu(MenuChoice::Sound), Action::ToggleSound),
    (Trigger::Menu(MenuChoice::Controls), Action::ToggleControls),
    (Trigger::Menu(MenuChoice::Back), Action::Back),
    (Trigger::Key(Key::Escape), Action::Back),
];

const EDIT_MODE: &[Route] = &[
    (Trigger::PointerPress, Action::PlaceBlock),
    (Trigger::AnyDigit, Action::SelectHp),
    (Trigger::Menu(MenuChoice::CycleBlock), Action::CycleHp),
    (Trigger::Menu(MenuChoice::Undo), Action::Undo),
    (Trigger::Menu(MenuChoice::Clear), Action::Clear),
    (Trigger::Menu(MenuChoice::Save), Action::SaveLevel),
    (Trigger::Menu(MenuChoice::Load), Action::EditLevel),
    (Trigger::Menu(MenuChoice::Back), Action::Back),
    (Trigger::Key(Key::Escape), Action::Back),
];

const LOAD_FAILED: &[Route] = &[
    (Trigger::PointerPress, Action::Acknowledge),
    (Trigger::Key(Key::Enter), Action::Acknowledge),
    (Trigger::Menu(MenuChoice::Back), Action::Back),
    (Trigger::Key(Key::Escape), Action::Back),
];

fn routes_for(phase: Phase, controls: Controls) -> &'static [Route] {
    match (phase, controls) {
        (Phase::Playing, Controls::Mouse) => PLAYING_MOUSE,
        (Phase::Playing, Controls::Keyboard) => PLAYING_KEYBOARD,
        (Phase::Won | Phase::Lost, _) => ROUND_OVER,
        (Phase::MainMenu, _) => MAIN_MENU,
        (Phase::Options, _) => OPTIONS,
        (Phase::EditMode, _) => EDIT_MODE,
        (Phase::LoadFailed, _) => LOAD_FAILED,
    }
}

/// Routes events through the table for the active phase
#[derive(Debug, Clone)]
pub struct InputRouter {
    active: Phase,
    controls: Controls,
    routes: &'static [Route],
}

impl InputRouter {
    pub fn new(phase: Phase, controls: Controls) -> Self {
        Self {
            active: phase,
            controls,
            routes: routes_for(phase, controls),
        }
    }

    pub fn active(&self) -> Phase {
        self.active
    }

    /// Swap to the table for `phase`. No-op if it is already active.
    pub fn activate(&mut self, phase: Phase) {
        if self.active == phase {
            return;
        }
        log::debug!("Input routes {:?} -> {:?}", self.active, phase);
        self.active = phase;
        self.routes = routes_for(phase, self.controls);
    }

    pub fn set_controls(&mut self, controls: Controls) {
        if self.controls != controls {
            self.controls = controls;
            self.routes = routes_for(self.active, controls);
        }
    }

    /// First matching route wins; unrouted events are dropped
    pub fn route(&self, event: &InputEvent) -> Option<Command> {
        self.routes
            .iter()
            .find(|(trigger, _)| trigger.matches(event))
            .and_then(|(_, action)| action.command(event))
    }
}
