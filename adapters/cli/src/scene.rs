//! Projects session state into the renderer's scene description.

use glam::Vec2;
use maze_knight_core::{GameRules, Screen, SimulationSnapshot};
use maze_knight_rendering::{
    ButtonPalette, Color, Headline, Scene, SceneButton, SceneEnemy, ScenePlayer, StarRating,
};
use maze_knight_system_session::menu::{ButtonStyle, MenuButton};

/// Stars available on the completion screen.
pub(crate) const RATING_STARS: u32 = 3;

const TITLE_ORANGE: Color = Color::from_rgb_u8(255, 165, 0);
const PROMPT_BLUE: Color = Color::from_rgb_u8(0, 90, 255);
const CHEER_YELLOW: Color = Color::from_rgb_u8(255, 230, 0);
const PICKER_CYAN: Color = Color::from_rgb_u8(0x00, 0xc9, 0xff);

/// Stars earned for finishing a run with `lives` left.
///
/// Lives beyond the first [`RATING_STARS`] a variant grants do not count, so
/// a variant that starts with a spare heart has to keep it to earn the same
/// rating.
pub(crate) fn earned_stars(lives: u32, starting_lives: u32) -> u32 {
    let spare = starting_lives.saturating_sub(RATING_STARS);
    lives.saturating_sub(spare).min(RATING_STARS)
}

pub(crate) fn project(
    snapshot: &SimulationSnapshot,
    rules: &GameRules,
    buttons: &[MenuButton],
    background: usize,
    run_frame: Option<usize>,
) -> Scene {
    let mut scene = Scene::empty(snapshot.screen);
    scene.camera = snapshot.camera;
    scene.buttons = buttons.iter().map(scene_button).collect();

    match snapshot.screen {
        Screen::Playing => {
            scene.background = Some(background);
            scene.player = Some(ScenePlayer {
                bounds: snapshot.player,
                facing: snapshot.player_facing,
                run_frame,
            });
            scene.hazards = snapshot.hazards.iter().map(|hazard| hazard.bounds).collect();
            scene.enemies = snapshot
                .enemies
                .iter()
                .map(|enemy| SceneEnemy {
                    bounds: enemy.bounds,
                    facing: enemy.facing,
                })
                .collect();
            scene.hearts = snapshot.lives;
        }
        Screen::Intro => scene.headline = Some(title_headline(rules)),
        Screen::Tutorial => {
            scene.headline = Some(headline("Tutorial", 208.0, 190.0, 120.0, PROMPT_BLUE));
        }
        Screen::LevelSelect => {
            scene.headline = Some(headline("Select Level", 112.0, 182.0, 90.0, PICKER_CYAN));
            scene.dimmed = true;
        }
        Screen::Complete => {
            scene.headline = Some(headline(
                "Congratulations",
                154.0,
                400.0,
                70.0,
                CHEER_YELLOW,
            ));
            scene.rating = Some(StarRating {
                earned: earned_stars(snapshot.lives, rules.starting_lives),
                total: RATING_STARS,
            });
        }
        Screen::Death => {
            scene.headline = Some(headline("Try Again", 108.0, 342.0, 130.0, PROMPT_BLUE));
        }
    }

    scene
}

fn title_headline(rules: &GameRules) -> Headline {
    // Long titles get a smaller face so they still fit the canvas.
    if rules.title.chars().count() > 8 {
        headline(&rules.title, 60.0, 300.0, 90.0, TITLE_ORANGE)
    } else {
        headline(&rules.title, 40.0, 340.0, 170.0, TITLE_ORANGE)
    }
}

fn headline(text: &str, x: f32, y: f32, size: f32, color: Color) -> Headline {
    Headline {
        text: text.to_owned(),
        position: Vec2::new(x, y),
        size,
        color,
    }
}

fn scene_button(button: &MenuButton) -> SceneButton {
    let palette = match button.style {
        ButtonStyle::Title => ButtonPalette::TITLE,
        ButtonStyle::Retry => ButtonPalette::RETRY,
        ButtonStyle::Locked => ButtonPalette::LOCKED,
    };
    SceneButton {
        rect: button.rect,
        label: button.label.clone(),
        palette,
    }
}
