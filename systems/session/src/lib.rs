#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session controller that drives screens, lives and level progression.
//!
//! The session is the only component that submits commands to the world. Each
//! call to [`Session::tick`] runs one fixed simulation step and returns a
//! [`SimulationSnapshot`] for presentation.

pub mod dash;
pub mod menu;

use glam::Vec2;
use maze_knight_core::{
    Command, Direction, Event, Facing, GameRules, InputState, LevelIndex, Progress, Screen,
    SimulationSnapshot,
};
use maze_knight_world::{self as world, query, World};
use tracing::{debug, info};

use crate::{
    dash::{Dash, DASH_SUBSTEPS},
    menu::{MenuAction, MenuButton},
};

/// Owns the world and every piece of state that outlives a single level.
#[derive(Debug)]
pub struct Session {
    rules: GameRules,
    world: World,
    screen: Screen,
    lives: u32,
    max_unlocked: LevelIndex,
    dash: Dash,
    last_move: Vec2,
    facing: Facing,
    moving: bool,
    pending: Vec<Event>,
}

impl Session {
    /// Creates a session on the title screen.
    #[must_use]
    pub fn new(rules: GameRules, world: World) -> Self {
        Self {
            lives: rules.starting_lives,
            rules,
            world,
            screen: Screen::Intro,
            max_unlocked: LevelIndex::FIRST,
            dash: Dash::default(),
            last_move: Vec2::X,
            facing: Facing::default(),
            moving: false,
            pending: Vec::new(),
        }
    }

    /// Rules the session was created with.
    #[must_use]
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Screen currently shown.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// Active level.
    #[must_use]
    pub fn level(&self) -> LevelIndex {
        query::level(&self.world)
    }

    /// Lives left in the current run.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Highest level reachable from the level picker.
    #[must_use]
    pub const fn max_unlocked(&self) -> LevelIndex {
        self.max_unlocked
    }

    /// Buttons shown on the current screen.
    #[must_use]
    pub fn buttons(&self) -> Vec<MenuButton> {
        menu::buttons(self.screen, &self.rules, self.max_unlocked)
    }

    /// Begins a run on `level` with full lives.
    ///
    /// Levels beyond the last one are clamped to it.
    pub fn start_level(&mut self, level: LevelIndex) {
        let level = level.clamp(LevelIndex::FIRST, self.rules.last_level());
        self.lives = self.rules.starting_lives;
        self.dash.reset();
        self.moving = false;
        self.max_unlocked = self.max_unlocked.max(level);
        self.submit(Command::ChangeLevel { level });
        self.submit(Command::ResetLevel);
        self.set_screen(Screen::Playing);
    }

    /// Handles a click at `point` in logical canvas coordinates.
    ///
    /// Returns the action taken, if the click landed on an enabled button.
    pub fn click(&mut self, point: Vec2) -> Option<MenuAction> {
        let action = menu::route(self.screen, &self.rules, self.max_unlocked, point)?;
        match action {
            MenuAction::Start => self.start_level(LevelIndex::FIRST),
            MenuAction::SelectLevel(level) => self.start_level(level),
            MenuAction::ShowLevelSelect => self.set_screen(Screen::LevelSelect),
            MenuAction::ShowTutorial => self.set_screen(Screen::Tutorial),
            MenuAction::ShowIntro => {
                self.lives = self.rules.starting_lives;
                self.submit(Command::ChangeLevel {
                    level: LevelIndex::FIRST,
                });
                self.set_screen(Screen::Intro);
            }
        }
        Some(action)
    }

    /// Runs one simulation step. Screens other than `Playing` only report.
    pub fn tick(&mut self, input: &InputState) -> SimulationSnapshot {
        if self.screen == Screen::Playing {
            self.simulate(input);
        }
        let events = std::mem::take(&mut self.pending);
        self.snapshot_with(events)
    }

    /// Captures the current state without advancing it.
    #[must_use]
    pub fn snapshot(&self) -> SimulationSnapshot {
        self.snapshot_with(Vec::new())
    }

    fn simulate(&mut self, input: &InputState) {
        self.moving = false;

        // A press is honoured before this tick's cooldown decrement.
        if self.rules.dash_enabled && input.dash {
            if let Some(direction) = self.dash.trigger(input.axes(), self.last_move) {
                debug!(x = direction.x, y = direction.y, "dash started");
                self.pending.push(Event::DashStarted { direction });
            }
        }
        self.dash.cool_down();

        if self.dash.is_active() {
            self.run_dash_frame();
            if self.screen != Screen::Playing {
                return;
            }
        } else {
            self.walk(input);
        }

        self.submit(Command::AdvanceHazards);
        self.submit(Command::AdvanceEnemies);

        if query::player_hit(&self.world) {
            self.lose_life();
            if self.screen != Screen::Playing {
                return;
            }
        }

        if query::exit_reached(&self.world) {
            self.clear_level();
        }
    }

    /// Moves through one dash frame. A blocked sub-step or a hit ends the dash.
    fn run_dash_frame(&mut self) {
        self.moving = true;
        let delta = self.dash.substep();
        for _ in 0..DASH_SUBSTEPS {
            if !self.shift_player(delta) {
                self.dash.interrupt();
                self.pending.push(Event::DashInterrupted);
                return;
            }
            if query::player_hit(&self.world) {
                self.dash.interrupt();
                self.lose_life();
                return;
            }
        }
        self.dash.finish_frame();
    }

    fn walk(&mut self, input: &InputState) {
        if let Some(direction) = input.axes().try_normalize() {
            self.last_move = direction;
        }
        if input.left != input.right {
            self.facing = if input.left {
                Facing::Left
            } else {
                Facing::Right
            };
        }

        for direction in Direction::ALL {
            if input.held(direction) {
                self.moving = true;
                self.submit(Command::StepPlayer { direction });
            }
        }
    }

    fn shift_player(&mut self, delta: Vec2) -> bool {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::ShiftPlayer { delta }, &mut events);
        let moved = events
            .iter()
            .any(|event| matches!(event, Event::CameraScrolled { .. }));
        self.pending.extend(events);
        moved
    }

    fn lose_life(&mut self) {
        let level = self.level();
        self.lives = self.lives.saturating_sub(1);
        self.submit(Command::ResetLevel);
        self.dash.recover();
        debug!(level = level.get(), lives = self.lives, "player hit");
        self.pending.push(Event::PlayerHit {
            level,
            lives_remaining: self.lives,
        });

        if self.lives == 0 {
            info!(level = level.get(), "game over");
            self.submit(Command::ChangeLevel {
                level: LevelIndex::FIRST,
            });
            self.lives = self.rules.starting_lives;
            self.pending.push(Event::GameOver);
            self.set_screen(Screen::Death);
        }
    }

    fn clear_level(&mut self) {
        let level = self.level();
        self.submit(Command::ResetLevel);
        self.pending.push(Event::ExitReached { level });

        match self.rules.advance(level) {
            Progress::Next(next) => {
                info!(cleared = level.get(), next = next.get(), "level complete");
                self.max_unlocked = self.max_unlocked.max(next);
                self.submit(Command::ChangeLevel { level: next });
            }
            Progress::Complete => {
                info!(lives = self.lives, "game complete");
                self.max_unlocked = self.rules.last_level();
                self.submit(Command::ChangeLevel {
                    level: LevelIndex::FIRST,
                });
                self.pending.push(Event::GameCompleted);
                self.set_screen(Screen::Complete);
            }
        }
    }

    fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            self.screen = screen;
            self.pending.push(Event::ScreenChanged { screen });
        }
    }

    fn submit(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.pending);
    }

    fn snapshot_with(&self, events: Vec<Event>) -> SimulationSnapshot {
        SimulationSnapshot {
            screen: self.screen,
            level: self.level(),
            lives: self.lives,
            max_unlocked: self.max_unlocked,
            camera: query::camera(&self.world),
            player: query::player(&self.world),
            player_facing: self.facing,
            player_moving: self.moving,
            hazards: query::hazard_view(&self.world),
            enemies: query::enemy_view(&self.world),
            dash: self.dash.snapshot(),
            events,
        }
    }
}
