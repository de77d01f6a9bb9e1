#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Maze Knight.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Scenes are authored on an 800x800 logical canvas. The backend scales that
//! canvas uniformly to fit the window and maps pointer positions back into
//! logical coordinates before handing them to the update closure.

mod sprites;

use anyhow::{Context, Result};
use glam::Vec2;
use macroquad::input::{
    is_key_down, is_key_pressed, is_mouse_button_down, is_mouse_button_pressed, mouse_position,
    KeyCode, MouseButton,
};
use maze_knight_core::{Facing, InputState, Rect, Screen};
use maze_knight_rendering::{
    CanvasTransform, Color, FrameInput, Headline, Presentation, RenderingBackend, Scene,
    SceneButton, SpriteKey, StarRating, LOGICAL_CANVAS_SIZE,
};
use std::{sync::mpsc, time::Duration};
use tracing::info;

use self::sprites::{DrawParams, SpriteAtlas};

const HEART_SIZE: f32 = 100.0;
const HEART_ORIGIN: Vec2 = Vec2::new(40.0, 30.0);
const HEART_PITCH: f32 = 140.0;
const STAR_SIZE: f32 = 200.0;
const STAR_LEFT: f32 = 50.0;
const STAR_PITCH: f32 = 250.0;
const STAR_TOP: f32 = 50.0;
const BUTTON_FONT_SIZE: f32 = 28.0;
const BUTTON_OUTLINE: f32 = 3.0;

const HAZARD_COLOR: Color = Color::from_rgb_u8(180, 180, 190);
const GHOST_COLOR: Color = Color::from_rgb_u8(230, 230, 255);
const KNIGHT_COLOR: Color = Color::from_rgb_u8(255, 200, 40);
const HEART_COLOR: Color = Color::from_rgb_u8(220, 30, 60);
const STAR_COLOR: Color = Color::from_rgb_u8(255, 215, 0);
const GREY_STAR_COLOR: Color = Color::from_rgb_u8(90, 90, 90);
const MAZE_FLOOR_COLOR: Color = Color::from_rgb_u8(24, 22, 30);
const VEIL_COLOR: Color = Color::new(0.0, 0.0, 0.0, 0.55);

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    load_sprites: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            load_sprites: true,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend should attempt to load sprite assets.
    #[must_use]
    pub fn with_sprite_loading(mut self, enabled: bool) -> Self {
        self.load_sprites = enabled;
        self
    }
}

/// Averages frames per second over one-second windows.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            load_sprites,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
            textures,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: LOGICAL_CANVAS_SIZE as i32,
            window_height: LOGICAL_CANVAS_SIZE as i32,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (atlas_init_sender, atlas_init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let sprite_atlas = if load_sprites && !textures.is_empty() {
                match SpriteAtlas::from_sources(&textures).context("failed to load textures") {
                    Ok(atlas) => Some(atlas),
                    Err(error) => {
                        let _ = atlas_init_sender.send(Err(error));
                        return;
                    }
                }
            } else {
                None
            };
            let _ = atlas_init_sender.send(Ok(()));

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                if is_key_pressed(KeyCode::Escape) {
                    break;
                }

                macroquad::window::clear_background(background);
                let transform = CanvasTransform::fit(
                    Vec2::new(
                        macroquad::window::screen_width(),
                        macroquad::window::screen_height(),
                    ),
                    LOGICAL_CANVAS_SIZE,
                );

                let frame_dt =
                    Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                let frame_input = gather_frame_input(&transform);
                update_scene(frame_dt, frame_input, &mut scene);

                let painter = Painter {
                    transform,
                    atlas: sprite_atlas.as_ref(),
                };
                painter.draw_scene(&scene, frame_input.pointer, frame_input.pointer_down);

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        info!(fps = per_second, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        atlas_init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

fn gather_frame_input(transform: &CanvasTransform) -> FrameInput {
    let keys = InputState {
        up: is_key_down(KeyCode::Up),
        down: is_key_down(KeyCode::Down),
        left: is_key_down(KeyCode::Left),
        right: is_key_down(KeyCode::Right),
        dash: is_key_pressed(KeyCode::Space),
    };
    let (cursor_x, cursor_y) = mouse_position();
    let pointer = transform.to_logical(Vec2::new(cursor_x, cursor_y));
    let click = if is_mouse_button_pressed(MouseButton::Left) {
        pointer
    } else {
        None
    };

    FrameInput {
        keys,
        pointer,
        click,
        pointer_down: is_mouse_button_down(MouseButton::Left),
    }
}

/// Draws logical-canvas primitives through the window transform.
struct Painter<'a> {
    transform: CanvasTransform,
    atlas: Option<&'a SpriteAtlas>,
}

impl Painter<'_> {
    fn draw_scene(&self, scene: &Scene, pointer: Option<Vec2>, pointer_down: bool) {
        if scene.screen == Screen::Playing {
            self.draw_maze(scene);
        } else {
            self.draw_backdrop(scene.screen);
        }
        if scene.dimmed {
            self.fill(
                Rect::new(0.0, 0.0, LOGICAL_CANVAS_SIZE, LOGICAL_CANVAS_SIZE),
                VEIL_COLOR,
            );
        }
        if let Some(rating) = scene.rating {
            self.draw_rating(rating);
        }
        if let Some(headline) = &scene.headline {
            self.draw_headline(headline);
        }
        for button in &scene.buttons {
            self.draw_button(button, pointer, pointer_down);
        }
    }

    fn draw_maze(&self, scene: &Scene) {
        self.fill(
            Rect::new(0.0, 0.0, LOGICAL_CANVAS_SIZE, LOGICAL_CANVAS_SIZE),
            MAZE_FLOOR_COLOR,
        );
        if let (Some(index), Some(atlas)) = (scene.background, self.atlas) {
            let _ = atlas.draw_background(index, self.natural(scene.camera));
        }

        for hazard in &scene.hazards {
            self.sprite_or_fill(SpriteKey::Spikes, *hazard, HAZARD_COLOR);
        }
        for enemy in &scene.enemies {
            let key = match enemy.facing {
                Facing::Left => SpriteKey::GhostLeft,
                Facing::Right => SpriteKey::GhostRight,
            };
            self.sprite_or_fill(key, enemy.bounds, GHOST_COLOR);
        }
        if let Some(player) = scene.player {
            let key = SpriteKey::knight(player.facing, player.run_frame);
            self.sprite_or_fill(key, player.bounds, KNIGHT_COLOR);
        }

        if let Some(atlas) = self.atlas.filter(|atlas| atlas.contains(SpriteKey::Darkness)) {
            let _ = atlas.draw(
                SpriteKey::Darkness,
                self.sized(Rect::new(0.0, 0.0, LOGICAL_CANVAS_SIZE, LOGICAL_CANVAS_SIZE)),
            );
        }

        for slot in 0..scene.hearts {
            let origin = HEART_ORIGIN + Vec2::new(slot as f32 * HEART_PITCH, 0.0);
            let bounds = Rect::new(origin.x, origin.y, HEART_SIZE, HEART_SIZE);
            self.sprite_or_fill(SpriteKey::Heart, bounds, HEART_COLOR);
        }
    }

    fn draw_backdrop(&self, screen: Screen) {
        if let (Some(key), Some(atlas)) = (SpriteKey::backdrop(screen), self.atlas) {
            let _ = atlas.draw(
                key,
                self.sized(Rect::new(0.0, 0.0, LOGICAL_CANVAS_SIZE, LOGICAL_CANVAS_SIZE)),
            );
        }
    }

    fn draw_rating(&self, rating: StarRating) {
        for slot in 0..rating.total {
            let left = STAR_LEFT + slot as f32 * STAR_PITCH;
            let bounds = Rect::new(left, STAR_TOP, STAR_SIZE, STAR_SIZE);
            if slot < rating.earned {
                self.sprite_or_fill(SpriteKey::Star, bounds, STAR_COLOR);
            } else {
                self.sprite_or_fill(SpriteKey::GreyStar, bounds, GREY_STAR_COLOR);
            }
        }
    }

    fn draw_headline(&self, headline: &Headline) {
        let shadow = headline.position + Vec2::new(8.0, 8.0);
        self.text(&headline.text, shadow, headline.size, Color::new(0.0, 0.0, 0.0, 1.0));
        self.text(&headline.text, headline.position, headline.size, headline.color);
    }

    fn draw_button(&self, button: &SceneButton, pointer: Option<Vec2>, pointer_down: bool) {
        let hovered = pointer.is_some_and(|point| button.rect.contains(point));
        let scale = match (hovered, pointer_down) {
            (true, true) => 0.97,
            (true, false) => 1.03,
            _ => 1.0,
        };
        let center = Vec2::new(
            button.rect.x + button.rect.width * 0.5,
            button.rect.y + button.rect.height * 0.5,
        );
        let size = Vec2::new(button.rect.width, button.rect.height) * scale;
        let rect = Rect::new(
            center.x - size.x * 0.5,
            center.y - size.y * 0.5,
            size.x,
            size.y,
        );

        self.fill(rect, button.palette.fill);
        self.outline(rect, BUTTON_OUTLINE, button.palette.stroke);

        let font_size = BUTTON_FONT_SIZE * scale;
        let width = self.text_width(&button.label, font_size);
        let baseline = Vec2::new(center.x - width * 0.5, center.y + font_size * 0.35);
        self.text(&button.label, baseline, font_size, button.palette.text);
    }

    fn sprite_or_fill(&self, key: SpriteKey, bounds: Rect, fallback: Color) {
        let drawn = self
            .atlas
            .is_some_and(|atlas| atlas.draw(key, self.sized(bounds)));
        if !drawn {
            self.fill(bounds, fallback);
        }
    }

    fn sized(&self, bounds: Rect) -> DrawParams {
        DrawParams::new(
            self.transform.to_window(bounds.origin()),
            Vec2::new(bounds.width, bounds.height) * self.transform.scale,
        )
    }

    fn natural(&self, origin: Vec2) -> DrawParams {
        DrawParams::natural(self.transform.to_window(origin), self.transform.scale)
    }

    fn fill(&self, bounds: Rect, color: Color) {
        let origin = self.transform.to_window(bounds.origin());
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            bounds.width * self.transform.scale,
            bounds.height * self.transform.scale,
            to_macroquad_color(color),
        );
    }

    fn outline(&self, bounds: Rect, thickness: f32, color: Color) {
        let origin = self.transform.to_window(bounds.origin());
        macroquad::shapes::draw_rectangle_lines(
            origin.x,
            origin.y,
            bounds.width * self.transform.scale,
            bounds.height * self.transform.scale,
            thickness * self.transform.scale,
            to_macroquad_color(color),
        );
    }

    fn text(&self, text: &str, baseline: Vec2, size: f32, color: Color) {
        let position = self.transform.to_window(baseline);
        // Some macroquad releases return the drawn dimensions here.
        #[allow(clippy::let_unit_value)]
        let _ = macroquad::text::draw_text(
            text,
            position.x,
            position.y,
            size * self.transform.scale,
            to_macroquad_color(color),
        );
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        let scaled = (size * self.transform.scale).round().max(1.0) as u16;
        let dimensions = macroquad::text::measure_text(text, None, scaled, 1.0);
        if self.transform.scale <= f32::EPSILON {
            0.0
        } else {
            dimensions.width / self.transform.scale
        }
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        for _ in 0..59 {
            assert!(counter
                .record_frame(Duration::from_micros(16_667))
                .is_none());
        }
        let fps = counter
            .record_frame(Duration::from_millis(20))
            .expect("one second elapsed");
        assert!((fps - 59.4).abs() < 1.0, "{fps}");
        assert!(counter.record_frame(Duration::from_millis(16)).is_none());
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let converted = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(converted.r, 0.1);
        assert_eq!(converted.g, 0.2);
        assert_eq!(converted.b, 0.3);
        assert_eq!(converted.a, 0.4);
    }
}
