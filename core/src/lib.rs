#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Box Siege engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually happened. Systems consume read-only views and respond exclusively
//! with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Box Siege.";

/// Health assigned to the terminal stage in place of the staged formula.
const TERMINAL_MAX_HEALTH: i64 = 100_000_000_000;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock to the provided monotonic sample.
    Tick {
        /// Time elapsed since the session started.
        now: Duration,
    },
    /// Requests that the catalog entry at the provided index become selected.
    SelectUnit {
        /// Zero-based index into the unit catalog.
        index: usize,
    },
    /// Toggles the hidden unit template in or out of the catalog.
    ToggleSecretUnit,
    /// Requests that the box switch to an adjacent stage.
    NavigateStage {
        /// Direction of the requested stage change.
        direction: StageDirection,
    },
    /// Requests placement of the selected unit template into a grid cell.
    PlaceUnit {
        /// Cell targeted by the placement.
        cell: CellCoord,
    },
    /// Requests that the unit occupying the provided cell attack the box.
    Strike {
        /// Cell whose occupant should attack.
        cell: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Monotonic time the world now observes.
        now: Duration,
    },
    /// Confirms that the catalog selection moved to a new entry.
    SelectionChanged {
        /// Zero-based index of the newly selected entry.
        index: usize,
    },
    /// Reports the hidden template's presence after a catalog toggle.
    CatalogToggled {
        /// `true` when the toggle added the hidden template.
        present: bool,
    },
    /// Confirms that the box switched to a different stage.
    StageChanged {
        /// Stage that became active.
        stage: Stage,
    },
    /// Announces that the box's frontier advanced to a new stage.
    StageUnlocked {
        /// Stage that is now the highest ever reached.
        stage: Stage,
    },
    /// Announces that the box entered the terminal stage. Emitted once per
    /// session; adapters use it to request the terminal-stage artwork.
    TerminalStageReached,
    /// Confirms that a unit was placed into a grid cell.
    UnitPlaced {
        /// Cell that received the unit.
        cell: CellCoord,
        /// Refund credited for an evicted occupant, if the cell was taken.
        refund: Option<Money>,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a placed unit struck the box.
    BoxStruck {
        /// Cell occupied by the attacking unit.
        cell: CellCoord,
        /// Damage applied to the box.
        damage: u32,
    },
    /// Reports that the box's health was depleted and reset.
    BoxDestroyed {
        /// Money credited to the ledger for the kill.
        reward: Money,
    },
}

/// Direction of a stage navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageDirection {
    /// Switch to the next lower stage.
    Previous,
    /// Switch to the next higher stage, bounded by the frontier.
    Next,
}

/// Reasons a unit placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell belongs to the permanently disabled center block.
    CellDisabled,
    /// The ledger cannot cover the selected template's scaled cost.
    InsufficientFunds,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Chebyshev distance between two cell coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column()
            .abs_diff(other.column())
            .max(self.row().abs_diff(other.row()))
    }
}

/// Discrete difficulty/reward tier of the box, 1 through the terminal 10.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Stage(u8);

impl Stage {
    /// Lowest stage the box can occupy.
    pub const FIRST: Stage = Stage(1);

    /// Terminal stage; reachable only by progression and never exitable.
    pub const TERMINAL: Stage = Stage(10);

    /// Creates a new stage wrapper. Callers keep values within
    /// `FIRST..=TERMINAL`; the world validates every transition.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric stage tier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Reports whether this is the terminal stage.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.0 >= Self::TERMINAL.0
    }

    /// Returns the next higher stage, or `None` at the terminal stage.
    #[must_use]
    pub fn next(self) -> Option<Stage> {
        if self.is_terminal() {
            None
        } else {
            Some(Stage(self.0 + 1))
        }
    }

    /// Returns the next lower stage, or `None` at the first stage.
    #[must_use]
    pub fn previous(self) -> Option<Stage> {
        if self.0 <= Self::FIRST.0 {
            None
        } else {
            Some(Stage(self.0 - 1))
        }
    }

    /// Maximum health granted to the box at this stage.
    ///
    /// Stages 1-9 follow `floor(100 * stage^1.7)`; the terminal stage uses a
    /// sentinel large enough to be effectively indestructible.
    #[must_use]
    pub fn max_health(self) -> i64 {
        if self.is_terminal() {
            TERMINAL_MAX_HEALTH
        } else {
            (100.0 * f64::from(self.0).powf(1.7)).floor() as i64
        }
    }

    /// Money credited for depleting the box's health at this stage.
    ///
    /// Stages 1-9 follow `floor(50 * 1.6^(stage - 1))`; the terminal stage
    /// pays a saturating maximum.
    #[must_use]
    pub fn money_drop(self) -> Money {
        if self.is_terminal() {
            Money::MAX
        } else {
            Money::new((50.0 * 1.6_f64.powi(i32::from(self.0) - 1)).floor() as u64)
        }
    }
}

/// Quantity of money held by the ledger or quoted as a price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Largest representable amount, used as the terminal-stage reward.
    pub const MAX: Money = Money(u64::MAX);

    /// Creates a new money amount.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric amount.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Adds two amounts, saturating at the representable maximum.
    #[must_use]
    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Subtracts an amount, returning `None` when funds are insufficient.
    #[must_use]
    pub const fn checked_sub(self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(value) => Some(Money(value)),
            None => None,
        }
    }
}

/// Visual appearance applied to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnitColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl UnitColor {
    /// Creates a new unit color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Stat block shared by catalog templates and their placed copies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitStats {
    damage: u32,
    attacks_per_second: f32,
    cost: Money,
    color: UnitColor,
}

impl UnitStats {
    /// Creates a new stat block.
    #[must_use]
    pub const fn new(damage: u32, attacks_per_second: f32, cost: Money, color: UnitColor) -> Self {
        Self {
            damage,
            attacks_per_second,
            cost,
            color,
        }
    }

    /// Damage dealt per attack.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Attack rate expressed in attacks per second.
    #[must_use]
    pub const fn attacks_per_second(&self) -> f32 {
        self.attacks_per_second
    }

    /// Base purchase cost before catalog scaling.
    #[must_use]
    pub const fn cost(&self) -> Money {
        self.cost
    }

    /// Color used when presenting the unit.
    #[must_use]
    pub const fn color(&self) -> UnitColor {
        self.color
    }

    /// Minimum time between two successive attacks.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.attacks_per_second)
    }
}

/// Stat block of the hidden catalog template. The catalog toggle identifies
/// the hidden entry by exact stat match, not by identity.
pub const SECRET_UNIT_STATS: UnitStats = UnitStats::new(
    30,
    60.0,
    Money::new(10),
    UnitColor::from_rgb(0x00, 0x00, 0x00),
);

/// Immutable cooldown readout for a single placed unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitCooldownSnapshot {
    /// Cell occupied by the unit.
    pub cell: CellCoord,
    /// Time remaining until the unit may attack again; zero when ready.
    pub ready_in: Duration,
}

/// Read-only view over the cooldowns of every placed unit.
#[derive(Clone, Debug, Default)]
pub struct UnitCooldownView {
    snapshots: Vec<UnitCooldownSnapshot>,
}

impl UnitCooldownView {
    /// Creates a new cooldown view, ordering snapshots row-major.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<UnitCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| (snapshot.cell.row(), snapshot.cell.column()));
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &UnitCooldownSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<UnitCooldownSnapshot> {
        self.snapshots
    }
}
