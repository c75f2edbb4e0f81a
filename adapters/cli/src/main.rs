#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Box Siege experience.

mod scene;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use box_siege_core::Command;
use box_siege_rendering::{Color, FrameInput, GridLayout, Presentation, RenderingBackend, Scene};
use box_siege_rendering_macroquad::MacroquadBackend;
use box_siege_system_bootstrap::Bootstrap;
use box_siege_system_combat::Combat;
use box_siege_system_control::{Control, ControlInput};
use box_siege_world::{self as world, query, World};

/// Command-line options for the Box Siege binary.
#[derive(Debug, Parser)]
#[command(name = "box-siege", about = "Single-screen box defence game")]
struct Args {
    /// Render without waiting for the display refresh rate.
    #[arg(long)]
    no_vsync: bool,
    /// Print frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,
    /// Disable audio playback entirely.
    #[arg(long)]
    mute: bool,
}

/// Entry point for the Box Siege command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let mut world = World::new();
    let bootstrap = Bootstrap::default();
    println!("{}", bootstrap.welcome_banner(&world));

    let screen = scene::screen();
    let (columns, rows) = bootstrap.grid_dimensions(&world);
    let grid = GridLayout::centered(columns, rows, scene::GRID_CELL_LENGTH, screen)?;

    let mut control = Control::new();
    let mut combat = Combat::new();

    let presentation = Presentation::new(
        "Box Siege",
        Color::from_rgb_u8(0x12, 0x34, 0x56),
        screen,
        scene::populate(&world, grid, None, &[], screen),
    );

    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps)
        .with_audio(!args.mute);

    let mut clock = Duration::ZERO;
    let mut commands: Vec<Command> = Vec::new();
    let mut events = Vec::new();

    backend.run(
        presentation,
        move |dt, input: FrameInput, out_scene: &mut Scene| {
            clock += dt;
            events.clear();

            world::apply(&mut world, Command::Tick { now: clock }, &mut events);

            control.handle(distill_input(input), &mut commands);
            for command in commands.drain(..) {
                world::apply(&mut world, command, &mut events);
            }

            combat.handle(query::unit_cooldowns(&world), &mut commands);
            for command in commands.drain(..) {
                world::apply(&mut world, command, &mut events);
            }

            *out_scene = scene::populate(&world, grid, input.hovered_cell, &events, screen);
        },
    )
}

fn distill_input(input: FrameInput) -> ControlInput {
    ControlInput::new(
        input.selector_entry,
        input.hovered_cell,
        input.confirm_action,
        input.cheat_toggle,
        input.stage_navigation,
    )
}
