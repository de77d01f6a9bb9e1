use glam::Vec2;
use maze_knight_core::{
    Event, GameRules, HazardKind, InputState, LevelIndex, MaskColor, Rect, Screen, Variant,
};
use maze_knight_system_session::{dash, menu::MenuAction, Session};
use maze_knight_world::{
    layout::{HazardSpec, LevelLayout},
    mask::{MaskBuffer, MaskLibrary},
    World,
};

const FLOOR: MaskColor = MaskColor::from_rgba(20, 20, 20, 255);

fn session_with(rules: GameRules, mask: MaskBuffer, layout: &LevelLayout) -> Session {
    let masks = MaskLibrary::new(vec![mask]).expect("library");
    let world = World::new(masks, layout).expect("layout");
    Session::new(rules, world)
}

fn open_mask() -> MaskBuffer {
    MaskBuffer::solid(1200, 1200, FLOOR).expect("mask")
}

/// Exit strip just above the player's top edge, reached by one step up.
fn mask_with_exit_above_player() -> MaskBuffer {
    let mut mask = open_mask();
    mask.paint(Rect::new(240.0, 370.0, 60.0, 10.0), MaskColor::EXIT);
    mask
}

fn static_spike(level: u32, x: f32, y: f32) -> HazardSpec {
    HazardSpec {
        level: LevelIndex::new(level),
        kind: HazardKind::Static,
        travel_limit: 0,
        x,
        y,
        width: 40.0,
        height: 40.0,
    }
}

fn sliding_spike(level: u32, limit: u32, x: f32, y: f32) -> HazardSpec {
    HazardSpec {
        level: LevelIndex::new(level),
        kind: HazardKind::Horizontal,
        travel_limit: limit,
        x,
        y,
        width: 60.0,
        height: 42.0,
    }
}

fn layout_with(hazards: Vec<HazardSpec>) -> LevelLayout {
    LevelLayout {
        hazards,
        enemies: Vec::new(),
    }
}

fn idle() -> InputState {
    InputState::default()
}

fn dash_only() -> InputState {
    InputState {
        dash: true,
        ..InputState::default()
    }
}

#[test]
fn three_hits_end_the_run_on_level_one() {
    let layout = layout_with(vec![static_spike(2, 260.0, 390.0)]);
    let mut session = session_with(Variant::MazeKnight.rules(), open_mask(), &layout);
    session.start_level(LevelIndex::new(2));

    let first = session.tick(&idle());
    assert_eq!(first.lives, 2);
    let second = session.tick(&idle());
    assert_eq!(second.lives, 1);
    assert_eq!(second.screen, Screen::Playing);

    let third = session.tick(&idle());
    assert_eq!(third.screen, Screen::Death);
    assert_eq!(third.level, LevelIndex::FIRST);
    assert_eq!(third.lives, 3);
    assert!(third.events.contains(&Event::GameOver));
    assert!(third.events.contains(&Event::ScreenChanged {
        screen: Screen::Death
    }));

    let frozen = session.tick(&idle());
    assert!(frozen.events.is_empty());
}

#[test]
fn sliding_spike_kills_three_times_then_game_over() {
    let layout = layout_with(vec![sliding_spike(1, 130, 300.0, 390.0)]);
    let mut session = session_with(Variant::MazeKnight.rules(), open_mask(), &layout);
    session.start_level(LevelIndex::FIRST);

    let mut hits = Vec::new();
    let mut last = None;
    for _ in 0..1_000 {
        let snapshot = session.tick(&idle());
        for event in &snapshot.events {
            if let Event::PlayerHit {
                lives_remaining, ..
            } = event
            {
                hits.push(*lives_remaining);
            }
        }
        let done = snapshot.screen != Screen::Playing;
        last = Some(snapshot);
        if done {
            break;
        }
    }

    let last = last.expect("ticks ran");
    assert_eq!(hits, vec![2, 1, 0]);
    assert_eq!(last.screen, Screen::Death);
    assert_eq!(last.level, LevelIndex::FIRST);
    assert_eq!(last.lives, 3);
    assert!(last.events.contains(&Event::GameOver));
}

#[test]
fn reaching_exit_advances_exactly_one_level() {
    let mut session = session_with(
        Variant::MazeKnight.rules(),
        mask_with_exit_above_player(),
        &LevelLayout::default(),
    );
    session.start_level(LevelIndex::FIRST);
    let _ = session.tick(&idle());

    let snapshot = session.tick(&InputState {
        up: true,
        ..InputState::default()
    });

    assert_eq!(snapshot.level, LevelIndex::new(2));
    assert_eq!(snapshot.max_unlocked, LevelIndex::new(2));
    assert_eq!(snapshot.camera, Vec2::ZERO);
    assert_eq!(snapshot.screen, Screen::Playing);
    assert!(snapshot.events.contains(&Event::ExitReached {
        level: LevelIndex::FIRST
    }));
}

#[test]
fn clearing_final_level_completes_the_game() {
    let mut session = session_with(
        Variant::Runner.rules(),
        mask_with_exit_above_player(),
        &LevelLayout::default(),
    );
    session.start_level(LevelIndex::new(4));

    let snapshot = session.tick(&InputState {
        up: true,
        ..InputState::default()
    });

    assert_eq!(snapshot.screen, Screen::Complete);
    assert_eq!(snapshot.level, LevelIndex::FIRST);
    assert_eq!(snapshot.max_unlocked, LevelIndex::new(4));
    assert_eq!(snapshot.lives, 4);
    assert!(snapshot.events.contains(&Event::GameCompleted));
}

#[test]
fn dash_without_input_follows_last_move() {
    let mut session = session_with(
        Variant::MazeKnight.rules(),
        open_mask(),
        &LevelLayout::default(),
    );
    session.start_level(LevelIndex::FIRST);

    let snapshot = session.tick(&dash_only());
    assert_eq!(snapshot.camera, Vec2::new(-18.0, 0.0));
    assert!(snapshot.dash.active);
    assert!(snapshot.events.contains(&Event::DashStarted { direction: Vec2::X }));

    let mut camera = snapshot.camera;
    for _ in 1..dash::DASH_FRAMES {
        camera = session.tick(&idle()).camera;
    }
    assert_eq!(camera, Vec2::new(-144.0, 0.0));

    let after = session.tick(&idle());
    assert!(!after.dash.active);
    assert_eq!(after.camera, camera);
}

#[test]
fn retrigger_during_cooldown_is_ignored() {
    let mut session = session_with(
        Variant::MazeKnight.rules(),
        open_mask(),
        &LevelLayout::default(),
    );
    session.start_level(LevelIndex::FIRST);

    let _ = session.tick(&dash_only());
    for _ in 0..dash::DASH_FRAMES + 5 {
        let snapshot = session.tick(&dash_only());
        assert!(!snapshot
            .events
            .iter()
            .any(|event| matches!(event, Event::DashStarted { .. })));
    }
}

#[test]
fn blocked_dash_substep_interrupts_dash() {
    let mut mask = open_mask();
    mask.paint(Rect::new(300.0, 0.0, 20.0, 1200.0), MaskColor::WALL);
    let mut session = session_with(Variant::MazeKnight.rules(), mask, &LevelLayout::default());
    session.start_level(LevelIndex::FIRST);

    let snapshot = session.tick(&dash_only());

    assert_eq!(snapshot.camera, Vec2::new(-6.0, 0.0));
    assert!(!snapshot.dash.active);
    assert_eq!(snapshot.dash.cooldown, dash::DASH_COOLDOWN_TICKS);
    assert!(snapshot.events.contains(&Event::DashInterrupted));
}

#[test]
fn dashing_into_spikes_costs_a_life_mid_dash() {
    let layout = layout_with(vec![static_spike(1, 300.0, 390.0)]);
    let mut session = session_with(Variant::MazeKnight.rules(), open_mask(), &layout);
    session.start_level(LevelIndex::FIRST);

    let snapshot = session.tick(&dash_only());

    assert_eq!(snapshot.lives, 2);
    assert_eq!(snapshot.camera, Vec2::ZERO);
    assert!(!snapshot.dash.active);
    assert_eq!(snapshot.dash.cooldown, dash::RECOVERY_COOLDOWN_TICKS);
    assert_eq!(snapshot.hazards[0].bounds.origin(), Vec2::new(300.0, 390.0));
}

#[test]
fn tick_keeps_running_after_a_dash_hit() {
    let layout = layout_with(vec![sliding_spike(1, 130, 300.0, 390.0)]);
    let mut session = session_with(Variant::MazeKnight.rules(), open_mask(), &layout);
    session.start_level(LevelIndex::FIRST);

    // The second sub-step slides the spike onto the knight.
    let snapshot = session.tick(&dash_only());

    assert_eq!(snapshot.lives, 2);
    assert_eq!(snapshot.camera, Vec2::ZERO);
    assert!(!snapshot.dash.active);
    assert_eq!(snapshot.hazards[0].traveled, 2);
    assert_eq!(snapshot.hazards[0].bounds.origin(), Vec2::new(302.0, 390.0));
}

#[test]
fn dash_rearms_the_tick_after_cooldown_runs_out() {
    let mut session = session_with(
        Variant::MazeKnight.rules(),
        open_mask(),
        &LevelLayout::default(),
    );
    session.start_level(LevelIndex::FIRST);

    let mut starts = Vec::new();
    for tick in 0..40 {
        let snapshot = session.tick(&dash_only());
        if snapshot
            .events
            .iter()
            .any(|event| matches!(event, Event::DashStarted { .. }))
        {
            starts.push(tick);
        }
    }

    // Eight dash frames, then twenty cooldown ticks, then the press lands.
    let rearm = dash::DASH_FRAMES + dash::DASH_COOLDOWN_TICKS;
    assert_eq!(starts, vec![0, rearm]);
}

#[test]
fn runner_ignores_dash_requests() {
    let mut session = session_with(Variant::Runner.rules(), open_mask(), &LevelLayout::default());
    session.start_level(LevelIndex::FIRST);

    let snapshot = session.tick(&dash_only());
    assert_eq!(snapshot.camera, Vec2::ZERO);
    assert!(!snapshot.dash.active);
}

#[test]
fn menus_route_between_screens() {
    let mut session = session_with(
        Variant::MazeKnight.rules(),
        open_mask(),
        &LevelLayout::default(),
    );

    assert_eq!(
        session.click(Vec2::new(400.0, 680.0)),
        Some(MenuAction::ShowLevelSelect)
    );
    assert_eq!(session.screen(), Screen::LevelSelect);

    // Level 2 is still locked.
    assert_eq!(session.click(Vec2::new(500.0, 270.0)), None);
    assert_eq!(session.screen(), Screen::LevelSelect);

    assert_eq!(
        session.click(Vec2::new(240.0, 270.0)),
        Some(MenuAction::SelectLevel(LevelIndex::FIRST))
    );
    assert_eq!(session.screen(), Screen::Playing);
    assert!(session.click(Vec2::new(400.0, 480.0)).is_none());

    let snapshot = session.tick(&idle());
    assert!(snapshot.events.contains(&Event::ScreenChanged {
        screen: Screen::Playing
    }));
}

#[test]
fn runner_tutorial_returns_to_intro() {
    let mut session = session_with(Variant::Runner.rules(), open_mask(), &LevelLayout::default());

    assert_eq!(
        session.click(Vec2::new(400.0, 580.0)),
        Some(MenuAction::ShowTutorial)
    );
    assert_eq!(
        session.click(Vec2::new(400.0, 580.0)),
        Some(MenuAction::ShowIntro)
    );
    assert_eq!(session.screen(), Screen::Intro);
    assert_eq!(session.lives(), 4);
}
