//! Clickable buttons shown on the non-playing screens.

use glam::Vec2;
use maze_knight_core::{GameRules, LevelIndex, Rect, Screen};

const PRIMARY: Rect = Rect::new(300.0, 450.0, 200.0, 60.0);
const SECONDARY: Rect = Rect::new(300.0, 550.0, 200.0, 60.0);
const TERTIARY: Rect = Rect::new(300.0, 650.0, 200.0, 60.0);
const LEVEL_SELECT_BACK: Rect = Rect::new(300.0, 710.0, 200.0, 60.0);

const LEVEL_GRID_COLUMNS: u32 = 2;
const LEVEL_GRID_ORIGIN: Vec2 = Vec2::new(140.0, 240.0);
const LEVEL_GRID_PITCH: Vec2 = Vec2::new(260.0, 90.0);
const LEVEL_BUTTON_SIZE: Vec2 = Vec2::new(200.0, 70.0);

/// What happens when a button is clicked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// Starts a fresh run on level 1.
    Start,
    /// Opens the level picker.
    ShowLevelSelect,
    /// Opens the tutorial card.
    ShowTutorial,
    /// Returns to the title screen.
    ShowIntro,
    /// Starts a run on the given level.
    SelectLevel(LevelIndex),
}

/// Visual emphasis of a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonStyle {
    /// Title-screen colours.
    Title,
    /// Colours used by the restart prompt.
    Retry,
    /// Greyed out; the button does nothing.
    Locked,
}

/// A labelled hit box on a menu screen.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuButton {
    /// Hit box in logical canvas coordinates.
    pub rect: Rect,
    /// Caption.
    pub label: String,
    /// Action performed on click.
    pub action: MenuAction,
    /// Disabled buttons swallow clicks without acting.
    pub enabled: bool,
    /// Visual emphasis.
    pub style: ButtonStyle,
}

impl MenuButton {
    fn new(rect: Rect, label: &str, action: MenuAction, style: ButtonStyle) -> Self {
        Self {
            rect,
            label: label.to_owned(),
            action,
            enabled: true,
            style,
        }
    }
}

/// Buttons presented on `screen`.
#[must_use]
pub fn buttons(screen: Screen, rules: &GameRules, max_unlocked: LevelIndex) -> Vec<MenuButton> {
    use ButtonStyle::{Retry, Title};

    match screen {
        Screen::Intro => {
            let mut buttons = vec![MenuButton::new(PRIMARY, "Start", MenuAction::Start, Title)];
            if rules.level_select {
                buttons.push(MenuButton::new(
                    SECONDARY,
                    "Menu",
                    MenuAction::ShowLevelSelect,
                    Title,
                ));
                buttons.push(MenuButton::new(
                    TERTIARY,
                    "Levels",
                    MenuAction::ShowLevelSelect,
                    Title,
                ));
            } else if rules.tutorial {
                buttons.push(MenuButton::new(
                    SECONDARY,
                    "Tutorial",
                    MenuAction::ShowTutorial,
                    Title,
                ));
            }
            buttons
        }
        Screen::Tutorial => vec![MenuButton::new(
            SECONDARY,
            "Menu",
            MenuAction::ShowIntro,
            Title,
        )],
        Screen::LevelSelect => {
            let mut buttons: Vec<MenuButton> = (0..rules.total_levels)
                .map(|slot| level_button(slot, max_unlocked))
                .collect();
            buttons.push(MenuButton::new(
                LEVEL_SELECT_BACK,
                "Menu",
                MenuAction::ShowIntro,
                Title,
            ));
            buttons
        }
        Screen::Complete | Screen::Death => {
            let back = if rules.level_select {
                MenuAction::ShowLevelSelect
            } else {
                MenuAction::ShowIntro
            };
            vec![
                MenuButton::new(PRIMARY, "Restart", MenuAction::Start, Retry),
                MenuButton::new(SECONDARY, "Menu", back, Title),
            ]
        }
        Screen::Playing => Vec::new(),
    }
}

fn level_button(slot: u32, max_unlocked: LevelIndex) -> MenuButton {
    let level = LevelIndex::new(slot + 1);
    let column = (slot % LEVEL_GRID_COLUMNS) as f32;
    let row = (slot / LEVEL_GRID_COLUMNS) as f32;
    let origin = LEVEL_GRID_ORIGIN + LEVEL_GRID_PITCH * Vec2::new(column, row);
    let rect = Rect::new(origin.x, origin.y, LEVEL_BUTTON_SIZE.x, LEVEL_BUTTON_SIZE.y);

    let enabled = level <= max_unlocked;
    MenuButton {
        rect,
        label: if enabled {
            format!("Level {}", level.get())
        } else {
            "Locked".to_owned()
        },
        action: MenuAction::SelectLevel(level),
        enabled,
        style: if enabled {
            ButtonStyle::Title
        } else {
            ButtonStyle::Locked
        },
    }
}

/// Resolves a click at `point` to the action of the first button under it.
///
/// A click on a disabled button is consumed and yields nothing.
#[must_use]
pub fn route(
    screen: Screen,
    rules: &GameRules,
    max_unlocked: LevelIndex,
    point: Vec2,
) -> Option<MenuAction> {
    buttons(screen, rules, max_unlocked)
        .into_iter()
        .find(|button| button.rect.contains(point))
        .filter(|button| button.enabled)
        .map(|button| button.action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_knight_core::Variant;

    #[test]
    fn runner_intro_offers_tutorial() {
        let rules = Variant::Runner.rules();
        let labels: Vec<String> = buttons(Screen::Intro, &rules, LevelIndex::FIRST)
            .into_iter()
            .map(|button| button.label)
            .collect();
        assert_eq!(labels, vec!["Start", "Tutorial"]);
        assert_eq!(
            route(Screen::Intro, &rules, LevelIndex::FIRST, Vec2::new(400.0, 580.0)),
            Some(MenuAction::ShowTutorial)
        );
    }

    #[test]
    fn level_grid_matches_two_column_layout() {
        let rules = Variant::MazeKnight.rules();
        let buttons = buttons(Screen::LevelSelect, &rules, LevelIndex::new(3));
        assert_eq!(buttons.len(), 11);
        assert_eq!(buttons[3].rect, Rect::new(400.0, 330.0, 200.0, 70.0));
        assert_eq!(buttons[9].rect, Rect::new(400.0, 600.0, 200.0, 70.0));
        assert_eq!(buttons[2].label, "Level 3");
        assert_eq!(buttons[3].label, "Locked");
        assert_eq!(buttons[10].rect, LEVEL_SELECT_BACK);
    }

    #[test]
    fn locked_levels_swallow_clicks() {
        let rules = Variant::MazeKnight.rules();
        let unlocked = route(
            Screen::LevelSelect,
            &rules,
            LevelIndex::new(2),
            Vec2::new(500.0, 270.0),
        );
        assert_eq!(unlocked, Some(MenuAction::SelectLevel(LevelIndex::new(2))));

        let locked = route(
            Screen::LevelSelect,
            &rules,
            LevelIndex::new(2),
            Vec2::new(240.0, 370.0),
        );
        assert_eq!(locked, None);
    }

    #[test]
    fn button_edges_are_not_clickable() {
        let rules = Variant::MazeKnight.rules();
        assert_eq!(
            route(Screen::Death, &rules, LevelIndex::FIRST, Vec2::new(300.0, 480.0)),
            None
        );
        assert_eq!(
            route(Screen::Death, &rules, LevelIndex::FIRST, Vec2::new(301.0, 480.0)),
            Some(MenuAction::Start)
        );
    }

    #[test]
    fn menu_after_game_over_depends_on_variant() {
        let point = Vec2::new(400.0, 580.0);
        assert_eq!(
            route(
                Screen::Complete,
                &Variant::MazeKnight.rules(),
                LevelIndex::FIRST,
                point
            ),
            Some(MenuAction::ShowLevelSelect)
        );
        assert_eq!(
            route(Screen::Complete, &Variant::Runner.rules(), LevelIndex::FIRST, point),
            Some(MenuAction::ShowIntro)
        );
    }
}
