#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Box Siege.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in containerised CI environments. To
//! keep `cargo test` usable everywhere we depend on macroquad without its
//! `audio` feature; sound playback is opted into through this crate's own
//! `audio` feature, and [`MacroquadBackend::with_audio`] can silence a
//! session at runtime either way.

mod assets;
mod audio;
mod overlay;

use std::{
    sync::mpsc,
    time::{Duration, Instant},
};

use anyhow::Result;
use box_siege_core::StageDirection;
use box_siege_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, Scene, SelectorEntryPresentation,
};
use glam::Vec2;
use macroquad::{
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    shapes::{draw_rectangle, draw_rectangle_lines},
    text::draw_text,
    texture::{draw_texture, Texture2D},
};

use crate::{
    assets::{AssetCatalog, TerminalArt},
    audio::SoundBank,
    overlay::HelpOverlay,
};

const CELL_INSET: f32 = 5.0;
const CELL_OUTLINE_THICKNESS: f32 = 2.0;
const COOLDOWN_BAR_HEIGHT: f32 = 4.0;

const HEALTH_BAR_OFFSET: f32 = 20.0;
const HEALTH_BAR_HEIGHT: f32 = 10.0;
const PROGRESS_BAR_OFFSET: f32 = 8.0;
const PROGRESS_BAR_HEIGHT: f32 = 5.0;

/// Snapshot of edge-triggered keyboard shortcuts observed during a frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` to quit the game loop.
    quit_requested: bool,
    /// `Q` toggles the hidden catalog entry.
    cheat_toggle: bool,
    /// `Left` switches to the previous stage.
    navigate_previous: bool,
    /// `Right` switches to the next unlocked stage.
    navigate_next: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            cheat_toggle: is_key_pressed(KeyCode::Q),
            navigate_previous: is_key_pressed(KeyCode::Left),
            navigate_next: is_key_pressed(KeyCode::Right),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    enable_audio: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            enable_audio: true,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the
    /// display refresh rate or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per
    /// second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the backend loads and plays sound clips.
    #[must_use]
    pub fn with_audio(mut self, enabled: bool) -> Self {
        self.enable_audio = enabled;
        self
    }
}

/// Frame timing metrics averaged over roughly one second.
#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    simulation_accum: Duration,
    render_accum: Duration,
}

impl FpsCounter {
    fn record_frame(
        &mut self,
        frame: Duration,
        simulation: Duration,
        render: Duration,
    ) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += simulation;
        self.render_accum += render;

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let metrics = if seconds <= f32::EPSILON || frames == 0 {
            None
        } else {
            Some(FpsMetrics {
                per_second: frames as f32 / seconds,
                avg_simulation: self.simulation_accum / frames,
                avg_render: self.render_accum / frames,
            })
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        metrics
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
            enable_audio,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            screen,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: screen.x as i32,
            window_height: screen.y as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (init_sender, init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut init_sender = Some(init_sender);
            let mut scene = scene;

            let asset_catalog = match AssetCatalog::from_default_manifest() {
                Ok(catalog) => catalog,
                Err(error) => {
                    if let Some(sender) = init_sender.take() {
                        let _ = sender.send(Err(error));
                    }
                    return;
                }
            };

            let mut sound_bank = if enable_audio {
                match SoundBank::load(&asset_catalog).await {
                    Ok(bank) => Some(bank),
                    Err(error) => {
                        if let Some(sender) = init_sender.take() {
                            let _ = sender.send(Err(error));
                        }
                        return;
                    }
                }
            } else {
                None
            };

            if let Some(sender) = init_sender.take() {
                let _ = sender.send(Ok(()));
            }

            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut help_overlay = HelpOverlay::default();
            let mut terminal_art = TerminalArt::new(asset_catalog);

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                if let Some(bank) = sound_bank.as_mut() {
                    bank.begin_frame();
                }

                macroquad::window::clear_background(background);

                let (cursor_x, cursor_y) = mouse_position();
                let cursor = Vec2::new(cursor_x, cursor_y);
                let confirm = is_mouse_button_pressed(MouseButton::Left);
                let frame_input = gather_frame_input(&scene, cursor, confirm, keyboard);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let simulation_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let simulation_duration = simulation_start.elapsed();

                if let Some(bank) = sound_bank.as_mut() {
                    for cue in &scene.sound_cues {
                        bank.play(*cue);
                    }
                }

                terminal_art.ensure_loaded(&scene);

                let render_start = Instant::now();
                draw_grid(&scene);
                draw_target_box(&scene, terminal_art.texture());
                draw_selector(&scene);
                draw_money(&scene);
                help_overlay.handle_input(cursor, confirm, screen);
                help_overlay.draw(screen);
                let render_duration = render_start.elapsed();

                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        avg_simulation,
                        avg_render,
                    }) = fps_counter.record_frame(frame_dt, simulation_duration, render_duration)
                    {
                        println!(
                            "FPS: {:.2} | sim: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

fn gather_frame_input(
    scene: &Scene,
    cursor: Vec2,
    confirm: bool,
    keyboard: KeyboardShortcuts,
) -> FrameInput {
    let stage_navigation = if keyboard.navigate_previous {
        Some(StageDirection::Previous)
    } else if keyboard.navigate_next {
        Some(StageDirection::Next)
    } else {
        None
    };

    FrameInput {
        cursor_position: cursor,
        confirm_action: confirm,
        cheat_toggle: keyboard.cheat_toggle,
        stage_navigation,
        hovered_cell: scene.grid.cell_at(cursor),
        selector_entry: scene.selector.layout.entry_at(cursor),
    }
}

fn draw_grid(scene: &Scene) {
    let cell_length = scene.grid.cell_length();
    let inset_length = cell_length - 2.0 * CELL_INSET;

    let hover_outline = to_macroquad_color(Color::from_rgb_u8(0xFA, 0xCA, 0x88));
    let idle_outline = to_macroquad_color(Color::from_rgb_u8(0xAA, 0xAA, 0xAA));
    let bar_background = to_macroquad_color(Color::from_rgb_u8(0xFF, 0x00, 0x00));
    let bar_fill = to_macroquad_color(Color::from_rgb_u8(0x00, 0xFF, 0x00));

    for cell in &scene.cells {
        if !cell.enabled {
            continue;
        }

        let origin = scene.grid.cell_origin(cell.cell);
        let hovered = scene
            .hover
            .map_or(false, |hover| hover.cell == cell.cell);

        if hovered && cell.unit.is_none() {
            if let Some(preview) = scene.hover.and_then(|hover| hover.preview) {
                draw_rectangle(
                    origin.x + CELL_INSET,
                    origin.y + CELL_INSET,
                    inset_length,
                    inset_length,
                    to_macroquad_color(preview),
                );
            }
        }

        let outline = if hovered { hover_outline } else { idle_outline };
        draw_rectangle_lines(
            origin.x,
            origin.y,
            cell_length,
            cell_length,
            CELL_OUTLINE_THICKNESS,
            outline,
        );

        if let Some(unit) = cell.unit {
            draw_rectangle(
                origin.x + CELL_INSET,
                origin.y + CELL_INSET,
                inset_length,
                inset_length,
                to_macroquad_color(unit.color),
            );

            let bar_width = cell_length - 2.0 * CELL_INSET;
            draw_rectangle(
                origin.x + CELL_INSET,
                origin.y + CELL_INSET,
                bar_width,
                COOLDOWN_BAR_HEIGHT,
                bar_background,
            );
            draw_rectangle(
                origin.x + CELL_INSET,
                origin.y + CELL_INSET,
                (bar_width * unit.cooldown_progress).floor(),
                COOLDOWN_BAR_HEIGHT,
                bar_fill,
            );
        }
    }
}

fn draw_target_box(scene: &Scene, terminal_texture: Option<Texture2D>) {
    let target = &scene.target_box;
    let white = to_macroquad_color(Color::from_rgb_u8(0xFF, 0xFF, 0xFF));

    match (target.terminal, terminal_texture) {
        (true, Some(texture)) => draw_texture(texture, target.origin.x, target.origin.y, white),
        _ => draw_rectangle(
            target.origin.x,
            target.origin.y,
            target.size,
            target.size,
            to_macroquad_color(target.fill),
        ),
    }

    draw_rectangle(
        target.origin.x,
        target.origin.y - HEALTH_BAR_OFFSET,
        target.size,
        HEALTH_BAR_HEIGHT,
        to_macroquad_color(Color::from_rgb_u8(0xFF, 0x00, 0x00)),
    );
    draw_rectangle(
        target.origin.x,
        target.origin.y - HEALTH_BAR_OFFSET,
        (target.size * target.health.ratio()).floor(),
        HEALTH_BAR_HEIGHT,
        to_macroquad_color(Color::from_rgb_u8(0x00, 0xFF, 0x00)),
    );

    if let Some(progress) = target.progress {
        draw_rectangle(
            target.origin.x,
            target.origin.y - PROGRESS_BAR_OFFSET,
            target.size,
            PROGRESS_BAR_HEIGHT,
            to_macroquad_color(Color::from_rgb_u8(0x44, 0x44, 0x44)),
        );
        draw_rectangle(
            target.origin.x,
            target.origin.y - PROGRESS_BAR_OFFSET,
            (target.size * progress.ratio()).floor(),
            PROGRESS_BAR_HEIGHT,
            to_macroquad_color(Color::from_rgb_u8(0x00, 0xFF, 0xFF)),
        );
    }

    draw_label(
        &format!("Stage {}", target.stage.get()),
        target.origin.x,
        target.origin.y + target.size + 3.0,
        20.0,
        white,
    );
}

fn draw_selector(scene: &Scene) {
    let layout = scene.selector.layout;
    let entry_length = box_siege_rendering::SelectorLayout::ENTRY_LENGTH;
    let white = to_macroquad_color(Color::from_rgb_u8(0xFF, 0xFF, 0xFF));
    let black = to_macroquad_color(Color::from_rgb_u8(0x00, 0x00, 0x00));

    for (index, entry) in scene.selector.entries.iter().enumerate() {
        let SelectorEntryPresentation {
            color,
            damage,
            attacks_per_second,
            scaled_cost,
            selected,
        } = *entry;
        let origin = layout.entry_origin(index);

        if selected {
            draw_rectangle_lines(
                origin.x - 2.0,
                origin.y - 2.0,
                entry_length + 4.0,
                entry_length + 4.0,
                CELL_OUTLINE_THICKNESS,
                white,
            );
        }

        draw_rectangle(
            origin.x,
            origin.y,
            entry_length,
            entry_length,
            to_macroquad_color(color),
        );

        draw_label(
            &format!("{damage} d"),
            origin.x + 7.0,
            origin.y + 7.0,
            18.0,
            white,
        );
        draw_label(
            &format!("{attacks_per_second}p/s"),
            origin.x + 7.0,
            origin.y + 24.0,
            16.0,
            white,
        );
        draw_label(
            &format!("${}", scaled_cost.get()),
            origin.x + 7.0,
            origin.y + entry_length - 20.0,
            18.0,
            black,
        );
    }
}

fn draw_money(scene: &Scene) {
    draw_label(
        &format!("Money: ${}", scene.money.amount.get()),
        10.0,
        10.0,
        24.0,
        to_macroquad_color(Color::from_rgb_u8(0xFF, 0xD7, 0x00)),
    );
}

/// Draws text anchored at its top-left corner rather than the baseline.
pub(crate) fn draw_label(text: &str, x: f32, y: f32, size: f32, color: macroquad::color::Color) {
    let _ = draw_text(text, x, y + size * 0.75, size, color);
}

pub(crate) fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use box_siege_core::{CellCoord, Money, Stage};
    use box_siege_rendering::{
        stage_color, BoxPresentation, GridLayout, HealthPresentation, MoneyPresentation,
        SelectorLayout, SelectorPresentation,
    };

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn base_scene() -> Scene {
        let grid = GridLayout::centered(7, 7, 50.0, SCREEN).expect("valid layout");
        let selector = SelectorPresentation {
            layout: SelectorLayout::centered(4, SCREEN),
            entries: Vec::new(),
        };
        Scene::new(
            grid,
            Vec::new(),
            None,
            BoxPresentation {
                origin: Vec2::new(350.0, 250.0),
                size: 100.0,
                stage: Stage::FIRST,
                fill: stage_color(Stage::FIRST),
                terminal: false,
                health: HealthPresentation::new(100, 100),
                progress: None,
            },
            selector,
            MoneyPresentation::new(Money::new(100)),
            Vec::new(),
        )
    }

    #[test]
    fn frame_input_resolves_grid_and_selector_hits() {
        let scene = base_scene();

        let over_grid = gather_frame_input(
            &scene,
            Vec2::new(230.0, 130.0),
            true,
            KeyboardShortcuts::default(),
        );
        assert_eq!(over_grid.hovered_cell, Some(CellCoord::new(0, 0)));
        assert_eq!(over_grid.selector_entry, None);
        assert!(over_grid.confirm_action);

        let over_selector = gather_frame_input(
            &scene,
            Vec2::new(265.0, 540.0),
            false,
            KeyboardShortcuts::default(),
        );
        assert_eq!(over_selector.hovered_cell, None);
        assert_eq!(over_selector.selector_entry, Some(0));
    }

    #[test]
    fn navigation_prefers_the_previous_direction() {
        let scene = base_scene();
        let keyboard = KeyboardShortcuts {
            navigate_previous: true,
            navigate_next: true,
            ..KeyboardShortcuts::default()
        };

        let input = gather_frame_input(&scene, Vec2::ZERO, false, keyboard);
        assert_eq!(input.stage_navigation, Some(StageDirection::Previous));
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);
        let work = Duration::from_millis(2);

        for _ in 0..3 {
            assert!(counter.record_frame(frame, work, work).is_none());
        }
        let metrics = counter
            .record_frame(frame, work, work)
            .expect("fourth frame crosses one second");
        assert_eq!(metrics.per_second, 4.0);
        assert_eq!(metrics.avg_simulation, work);
        assert_eq!(metrics.avg_render, work);
    }
}
