#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Box Siege.

mod catalog;
mod grid;
mod target_box;

use std::time::Duration;

use box_siege_core::{CellCoord, Command, Event, Money, PlacementError, WELCOME_BANNER};

use crate::{
    catalog::UnitCatalog,
    grid::{Grid, PlacedUnit},
    target_box::{DamageOutcome, TargetBox},
};

/// Money available when a fresh session starts.
const STARTING_MONEY: Money = Money::new(100);

/// Represents the authoritative Box Siege world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    clock: Duration,
    target_box: TargetBox,
    grid: Grid,
    catalog: UnitCatalog,
    money: Money,
}

impl World {
    /// Creates a new Box Siege world ready for simulation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            clock: Duration::ZERO,
            target_box: TargetBox::new(),
            grid: Grid::new(),
            catalog: UnitCatalog::new(),
            money: STARTING_MONEY,
        }
    }

    fn spend(&mut self, amount: Money) -> bool {
        match self.money.checked_sub(amount) {
            Some(remaining) => {
                self.money = remaining;
                true
            }
            None => false,
        }
    }

    fn credit(&mut self, amount: Money) {
        self.money = self.money.saturating_add(amount);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { now } => {
            world.clock = now;
            out_events.push(Event::TimeAdvanced { now });
        }
        Command::SelectUnit { index } => {
            if world.catalog.select(index) {
                out_events.push(Event::SelectionChanged { index });
            }
        }
        Command::ToggleSecretUnit => {
            let present = world.catalog.toggle_secret();
            out_events.push(Event::CatalogToggled { present });
        }
        Command::NavigateStage { direction } => {
            if let Some(stage) = world.target_box.navigate(direction) {
                out_events.push(Event::StageChanged { stage });
            }
        }
        Command::PlaceUnit { cell } => place_unit(world, cell, out_events),
        Command::Strike { cell } => resolve_strike(world, cell, out_events),
    }
}

fn place_unit(world: &mut World, cell: CellCoord, out_events: &mut Vec<Event>) {
    let refund = match world.grid.cell(cell) {
        None => {
            out_events.push(Event::PlacementRejected {
                cell,
                reason: PlacementError::OutOfBounds,
            });
            return;
        }
        Some(slot) if !slot.is_enabled() => {
            out_events.push(Event::PlacementRejected {
                cell,
                reason: PlacementError::CellDisabled,
            });
            return;
        }
        Some(slot) => slot.unit().map(PlacedUnit::refund_value),
    };

    let cost = world.catalog.selected_template().scaled_cost();
    if !world.spend(cost) {
        out_events.push(Event::PlacementRejected {
            cell,
            reason: PlacementError::InsufficientFunds,
        });
        return;
    }

    if let Some(refund) = refund {
        world.credit(refund);
    }

    let stats = world.catalog.selected_template().stats();
    if let Some(slot) = world.grid.cell_mut(cell) {
        slot.place(PlacedUnit::new(stats));
    }
    world.catalog.record_selected_purchase();

    out_events.push(Event::UnitPlaced { cell, refund });
}

fn resolve_strike(world: &mut World, cell: CellCoord, out_events: &mut Vec<Event>) {
    let now = world.clock;
    let Some(slot) = world.grid.cell_mut(cell) else {
        return;
    };
    let Some(unit) = slot.unit_mut() else {
        return;
    };
    if !unit.can_attack(now) {
        return;
    }

    let damage = unit.attack(now);
    out_events.push(Event::BoxStruck { cell, damage });

    match world.target_box.take_damage(damage) {
        DamageOutcome::Survived => {}
        DamageOutcome::Killed { advanced } => {
            let reward = world.target_box.money_drop();
            world.credit(reward);
            out_events.push(Event::BoxDestroyed { reward });

            if let Some(stage) = advanced {
                out_events.push(Event::StageUnlocked { stage });
                out_events.push(Event::StageChanged { stage });
                if stage.is_terminal() {
                    out_events.push(Event::TerminalStageReached);
                }
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use box_siege_core::{
        CellCoord, Money, Stage, UnitColor, UnitCooldownSnapshot, UnitCooldownView, UnitStats,
    };

    use super::{grid, target_box, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Monotonic time the world observed most recently.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Money currently held by the ledger.
    #[must_use]
    pub fn money(world: &World) -> Money {
        world.money
    }

    /// Dimensions of the placement grid as `(columns, rows)`.
    #[must_use]
    pub fn grid_dimensions(_world: &World) -> (u32, u32) {
        (grid::GRID_COLUMNS, grid::GRID_ROWS)
    }

    /// Captures a read-only snapshot of the besieged box.
    #[must_use]
    pub fn box_view(world: &World) -> BoxSnapshot {
        let target = &world.target_box;
        BoxSnapshot {
            stage: target.stage(),
            max_stage: target.max_stage(),
            health: target.health(),
            max_health: target.max_health(),
            progress: target.progress(),
            max_progress: target_box::MAX_PROGRESS,
            money_drop: target.money_drop(),
        }
    }

    /// Captures a read-only view of every grid cell in row-major order.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView {
        let now = world.clock;
        let snapshots = world
            .grid
            .iter()
            .map(|slot| CellSnapshot {
                cell: slot.cell(),
                enabled: slot.is_enabled(),
                unit: slot.unit().map(|unit| PlacedUnitSnapshot {
                    color: unit.stats().color(),
                    damage: unit.stats().damage(),
                    cooldown_progress: unit.cooldown_progress(now),
                }),
            })
            .collect();
        GridView { snapshots }
    }

    /// Captures a read-only view of the purchasable catalog.
    #[must_use]
    pub fn catalog_view(world: &World) -> CatalogView {
        let snapshots = world
            .catalog
            .templates()
            .iter()
            .map(|template| TemplateSnapshot {
                stats: template.stats(),
                scaled_cost: template.scaled_cost(),
            })
            .collect();
        CatalogView {
            snapshots,
            selected: world.catalog.selected_index(),
        }
    }

    /// Exposes the cooldown of every placed unit for the combat system.
    #[must_use]
    pub fn unit_cooldowns(world: &World) -> UnitCooldownView {
        let now = world.clock;
        let snapshots = world
            .grid
            .iter()
            .filter_map(|slot| {
                slot.unit().map(|unit| UnitCooldownSnapshot {
                    cell: slot.cell(),
                    ready_in: unit.ready_in(now),
                })
            })
            .collect();
        UnitCooldownView::from_snapshots(snapshots)
    }

    /// Immutable representation of the box used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BoxSnapshot {
        /// Stage the box currently occupies.
        pub stage: Stage,
        /// Highest stage ever reached.
        pub max_stage: Stage,
        /// Current health.
        pub health: i64,
        /// Health granted when the stage was entered.
        pub max_health: i64,
        /// Frontier kills accrued toward the next unlock.
        pub progress: u32,
        /// Kills required to unlock the next stage.
        pub max_progress: u32,
        /// Money credited per kill at the current stage.
        pub money_drop: Money,
    }

    /// Read-only snapshot describing every cell of the grid.
    #[derive(Clone, Debug)]
    pub struct GridView {
        snapshots: Vec<CellSnapshot>,
    }

    impl GridView {
        /// Iterator over the captured cell snapshots in row-major order.
        pub fn iter(&self) -> impl Iterator<Item = &CellSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<CellSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single grid cell.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct CellSnapshot {
        /// Coordinate of the cell within the grid.
        pub cell: CellCoord,
        /// Whether the cell accepts placements.
        pub enabled: bool,
        /// The placed unit, if the cell is occupied.
        pub unit: Option<PlacedUnitSnapshot>,
    }

    /// Immutable representation of a placed unit.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlacedUnitSnapshot {
        /// Color used when presenting the unit.
        pub color: UnitColor,
        /// Damage dealt per attack.
        pub damage: u32,
        /// Fraction of the cooldown already elapsed, clamped to 1.
        pub cooldown_progress: f32,
    }

    /// Read-only snapshot of the purchasable catalog.
    #[derive(Clone, Debug)]
    pub struct CatalogView {
        snapshots: Vec<TemplateSnapshot>,
        selected: usize,
    }

    impl CatalogView {
        /// Iterator over the catalog entries in display order.
        pub fn iter(&self) -> impl Iterator<Item = &TemplateSnapshot> {
            self.snapshots.iter()
        }

        /// Number of entries currently offered.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether the catalog is empty.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Index of the currently selected entry.
        #[must_use]
        pub fn selected_index(&self) -> usize {
            self.selected
        }

        /// Snapshot of the currently selected entry.
        #[must_use]
        pub fn selected(&self) -> Option<&TemplateSnapshot> {
            self.snapshots.get(self.selected)
        }
    }

    /// Immutable representation of a single catalog entry.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct TemplateSnapshot {
        /// Stat block offered by the template.
        pub stats: UnitStats,
        /// Price of the next purchase, including scaling.
        pub scaled_cost: Money,
    }
}
