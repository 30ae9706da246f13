#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Edge Runner.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use anyhow::Result;
use edge_runner_rendering::{
    Color, EdgeStrip, FrameInput, Presentation, RenderingBackend, Scene, ViewTransform,
};
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use std::time::Duration;

const WINDOW_SIZE: i32 = 960;
const EDGE_THICKNESS: f32 = 4.0;
const PAINT_THICKNESS: f32 = 6.0;
const TEXT_SIZE: f32 = 28.0;
const TEXT_MARGIN: f32 = 16.0;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
        }
    }
}

/// Arrow keys and WASD steer the runner.
fn poll_movement_keys() -> FrameInput {
    let held = |primary: KeyCode, secondary: KeyCode| is_key_down(primary) || is_key_down(secondary);

    FrameInput {
        up: held(KeyCode::Up, KeyCode::W),
        down: held(KeyCode::Down, KeyCode::S),
        left: held(KeyCode::Left, KeyCode::A),
        right: held(KeyCode::Right, KeyCode::D),
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
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

    /// Configures whether the backend logs the frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Returns the frames per second whenever a full second has been observed.
    fn record_frame(&mut self, frame: Duration) -> Option<f64> {
        self.elapsed += frame;
        self.frames += 1;
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = f64::from(self.frames) / self.elapsed.as_secs_f64();
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
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: WINDOW_SIZE,
            window_height: WINDOW_SIZE,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                if KeyboardShortcuts::poll().quit_requested {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, poll_movement_keys(), &mut scene);

                macroquad::window::clear_background(background);
                let viewport = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_scene(&scene, viewport);

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        log::info!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_scene(scene: &Scene, viewport: Vec2) {
    let view = scene.view;
    let edge_color = to_macroquad_color(scene.palette.edge);
    let paint_color = to_macroquad_color(scene.palette.paint);

    for edge in &scene.edges {
        draw_segment(&view, viewport, [edge.start, edge.end], EDGE_THICKNESS, edge_color);
    }
    for edge in &scene.edges {
        draw_paint(&view, viewport, edge, paint_color);
    }

    for marker in scene.agents() {
        let centre = view.to_screen(marker.position, viewport);
        let radius = view.to_screen_length(marker.radius, viewport);
        let color = to_macroquad_color(scene.agent_color(marker.role));
        macroquad::shapes::draw_circle(centre.x, centre.y, radius, color);
    }

    draw_overlay(scene);
}

fn draw_paint(view: &ViewTransform, viewport: Vec2, edge: &EdgeStrip, color: macroquad::color::Color) {
    for span in edge.covered_spans() {
        draw_segment(view, viewport, span, PAINT_THICKNESS, color);
    }
}

fn draw_segment(
    view: &ViewTransform,
    viewport: Vec2,
    [from, to]: [Vec2; 2],
    thickness: f32,
    color: macroquad::color::Color,
) {
    let from = view.to_screen(from, viewport);
    let to = view.to_screen(to, viewport);
    macroquad::shapes::draw_line(from.x, from.y, to.x, to.y, thickness, color);
}

fn draw_overlay(scene: &Scene) {
    let text_color = to_macroquad_color(scene.palette.text);
    let status = format!(
        "{}  {:>3.0}%",
        scene.level_name,
        scene.coverage_fraction * 100.0
    );
    let _ = macroquad::text::draw_text(&status, TEXT_MARGIN, TEXT_MARGIN + TEXT_SIZE, TEXT_SIZE, text_color);

    if let Some(banner) = &scene.banner {
        let _ = macroquad::text::draw_text(
            banner,
            TEXT_MARGIN,
            macroquad::window::screen_height() - TEXT_MARGIN,
            TEXT_SIZE,
            text_color,
        );
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
        let frame = Duration::from_millis(250);

        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), None);
        let per_second = counter.record_frame(frame).expect("one second elapsed");

        assert!((per_second - 4.0).abs() < 1e-9);
        assert_eq!(counter.record_frame(frame), None);
    }

    #[test]
    fn vsync_maps_onto_swap_interval() {
        assert_eq!(MacroquadBackend::new().with_vsync(true).swap_interval, Some(1));
        assert_eq!(MacroquadBackend::new().with_vsync(false).swap_interval, Some(0));
        assert_eq!(MacroquadBackend::new().swap_interval, None);
    }

    #[test]
    fn palette_colors_convert_channel_for_channel() {
        let converted = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));

        assert_eq!(
            (converted.r, converted.g, converted.b, converted.a),
            (0.1, 0.2, 0.3, 0.4)
        );
    }
}
