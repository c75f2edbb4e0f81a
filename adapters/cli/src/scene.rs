//! Populates presentation state from world queries and frame events.

use glam::Vec2;

use box_siege_core::{CellCoord, Event};
use box_siege_rendering::{
    stage_color, BoxPresentation, CellPresentation, GridLayout, HealthPresentation,
    HoverPresentation, MoneyPresentation, ProgressPresentation, Scene, SelectorEntryPresentation,
    SelectorLayout, SelectorPresentation, SoundCue, UnitFillPresentation,
};
use box_siege_world::{
    query::{self, CatalogView},
    World,
};

/// Logical screen width in pixels.
pub(crate) const SCREEN_WIDTH: f32 = 800.0;

/// Logical screen height in pixels.
pub(crate) const SCREEN_HEIGHT: f32 = 600.0;

/// Side length of a single grid cell in pixels.
pub(crate) const GRID_CELL_LENGTH: f32 = 50.0;

/// Side length of the box in pixels.
const BOX_SIZE: f32 = 100.0;

/// Logical screen size shared by layout and the window configuration.
pub(crate) fn screen() -> Vec2 {
    Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)
}

/// Builds the frame's scene from the world plus this frame's events.
pub(crate) fn populate(
    world: &World,
    grid: GridLayout,
    hovered_cell: Option<CellCoord>,
    events: &[Event],
    screen: Vec2,
) -> Scene {
    let box_snapshot = query::box_view(world);
    let catalog = query::catalog_view(world);

    let cells: Vec<CellPresentation> = query::grid_view(world)
        .iter()
        .map(|snapshot| CellPresentation {
            cell: snapshot.cell,
            enabled: snapshot.enabled,
            unit: snapshot.unit.map(|unit| UnitFillPresentation {
                color: unit.color.into(),
                cooldown_progress: unit.cooldown_progress,
            }),
        })
        .collect();

    let hover = hovered_cell.and_then(|cell| hover_for(&cells, &catalog, cell));

    let entries = catalog
        .iter()
        .enumerate()
        .map(|(index, entry)| SelectorEntryPresentation {
            color: entry.stats.color().into(),
            damage: entry.stats.damage(),
            attacks_per_second: entry.stats.attacks_per_second(),
            scaled_cost: entry.scaled_cost,
            selected: index == catalog.selected_index(),
        })
        .collect();
    let selector = SelectorPresentation {
        layout: SelectorLayout::centered(catalog.len(), screen),
        entries,
    };

    let at_frontier =
        box_snapshot.stage == box_snapshot.max_stage && !box_snapshot.stage.is_terminal();
    let target_box = BoxPresentation {
        origin: (screen - Vec2::splat(BOX_SIZE)) * 0.5,
        size: BOX_SIZE,
        stage: box_snapshot.stage,
        fill: stage_color(box_snapshot.stage),
        terminal: box_snapshot.stage.is_terminal(),
        health: HealthPresentation::new(box_snapshot.health, box_snapshot.max_health),
        progress: at_frontier
            .then(|| ProgressPresentation::new(box_snapshot.progress, box_snapshot.max_progress)),
    };

    Scene::new(
        grid,
        cells,
        hover,
        target_box,
        selector,
        MoneyPresentation::new(query::money(world)),
        sound_cues(events),
    )
}

/// Hover feedback for an enabled cell; empty cells preview the selection.
fn hover_for(
    cells: &[CellPresentation],
    catalog: &CatalogView,
    cell: CellCoord,
) -> Option<HoverPresentation> {
    let snapshot = cells.iter().find(|candidate| candidate.cell == cell)?;
    if !snapshot.enabled {
        return None;
    }

    let preview = if snapshot.unit.is_none() {
        catalog.selected().map(|entry| entry.stats.color().into())
    } else {
        None
    };
    Some(HoverPresentation { cell, preview })
}

fn sound_cues(events: &[Event]) -> Vec<SoundCue> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::BoxStruck { .. } => Some(SoundCue::Hit),
            Event::BoxDestroyed { .. } => Some(SoundCue::Death),
            _ => None,
        })
        .collect()
}
