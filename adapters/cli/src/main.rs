#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Knight experience.

mod animation;
mod clock;
mod scene;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use maze_knight_assets::{load_layout, AssetManifest};
use maze_knight_core::{Event, InputState, LevelIndex, Screen, SimulationSnapshot, Variant};
use maze_knight_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, Scene, TextureSources,
};
use maze_knight_rendering_macroquad::MacroquadBackend;
use maze_knight_system_session::Session;
use maze_knight_world::{layout::LevelLayout, query, World};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{animation::RunCycle, clock::FixedStep};

/// Command-line arguments accepted by the Maze Knight binary.
#[derive(Debug, Parser)]
#[command(name = "maze-knight")]
#[command(about = "Scroll through pixel-mask mazes past spikes and ghosts")]
struct CliArgs {
    /// Game variant to play.
    #[arg(long, value_enum, default_value_t = VariantArg::MazeKnight)]
    variant: VariantArg,
    /// Asset manifest listing masks, backgrounds and sprites.
    #[arg(long, value_name = "PATH", default_value = "assets/manifest.toml")]
    manifest: PathBuf,
    /// TOML file replacing the built-in hazard and ghost tables.
    #[arg(long, value_name = "PATH")]
    layout: Option<PathBuf>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_name = "BOOL")]
    vsync: Option<bool>,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
    /// Draw coloured rectangles instead of loading sprite images.
    #[arg(long)]
    no_sprites: bool,
    /// Run this many idle ticks on level 1 without opening a window.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    Runner,
    MazeKnight,
}

impl From<VariantArg> for Variant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Runner => Variant::Runner,
            VariantArg::MazeKnight => Variant::MazeKnight,
        }
    }
}

/// Entry point for the Maze Knight command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    let variant = Variant::from(args.variant);
    let manifest = AssetManifest::load(&args.manifest)?;
    let layout = match &args.layout {
        Some(path) => load_layout(path)?,
        None => LevelLayout::for_variant(variant),
    };
    let world = World::new(manifest.load_masks()?, &layout)
        .context("level layout rejected by the world")?;
    let session = Session::new(variant.rules(), world);
    info!(?variant, manifest = %args.manifest.display(), "session ready");

    if let Some(ticks) = args.headless {
        return run_headless(session, ticks);
    }

    let textures = if args.no_sprites {
        TextureSources::default()
    } else {
        manifest.texture_sources()?
    };

    let mut game = Game::new(session);
    let presentation = Presentation::new(
        game.session.rules().title.clone(),
        Color::from_rgb_u8(0, 0, 0),
        game.scene(),
        textures,
    );

    let mut backend = MacroquadBackend::new()
        .with_show_fps(args.show_fps)
        .with_sprite_loading(!args.no_sprites);
    if let Some(vsync) = args.vsync {
        backend = backend.with_vsync(vsync);
    }

    backend.run(presentation, move |dt, input, scene| {
        game.frame(dt, input);
        *scene = game.scene();
    })
}

fn run_headless(mut session: Session, ticks: u32) -> Result<()> {
    session.start_level(LevelIndex::FIRST);
    let idle = InputState::default();
    let mut hits = 0_u32;
    let mut last = session.snapshot();
    for _ in 0..ticks {
        last = session.tick(&idle);
        hits += last
            .events
            .iter()
            .filter(|event| matches!(event, Event::PlayerHit { .. }))
            .count() as u32;
        if last.screen != Screen::Playing {
            break;
        }
    }
    info!(
        level = last.level.get(),
        lives = last.lives,
        hits,
        screen = ?last.screen,
        "headless run finished"
    );
    Ok(())
}

/// Host-side loop state driven by the rendering backend.
struct Game {
    session: Session,
    clock: FixedStep,
    dash_latched: bool,
    run_cycle: RunCycle,
}

impl Game {
    fn new(session: Session) -> Self {
        Self {
            session,
            clock: FixedStep::default(),
            dash_latched: false,
            run_cycle: RunCycle::default(),
        }
    }

    fn frame(&mut self, dt: Duration, input: FrameInput) {
        if let Some(point) = input.click {
            if let Some(action) = self.session.click(point) {
                debug!(?action, "menu action");
            }
        }

        // Space is edge-triggered; keep a press until a tick consumes it.
        self.dash_latched |= input.keys.dash;
        for _ in 0..self.clock.advance(dt) {
            let keys = InputState {
                dash: self.dash_latched,
                ..input.keys
            };
            self.dash_latched = false;
            let snapshot = self.session.tick(&keys);
            self.run_cycle.advance(snapshot.player_moving);
            log_events(&snapshot);
        }
    }

    fn scene(&self) -> Scene {
        scene::project(
            &self.session.snapshot(),
            self.session.rules(),
            &self.session.buttons(),
            query::asset_index(self.session.world()),
            self.run_cycle.frame(),
        )
    }
}

fn log_events(snapshot: &SimulationSnapshot) {
    for event in &snapshot.events {
        debug!(?event, "simulation event");
    }
}
