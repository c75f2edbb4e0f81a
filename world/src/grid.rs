//! Placement grid cells and the attacking units they own.

use std::time::Duration;

use box_siege_core::{CellCoord, Money, UnitStats};

/// Number of cell rings laid out around the disabled center block.
pub(crate) const GRID_CELLS_FROM_CENTER: u32 = 3;

/// Number of columns in the placement grid.
pub(crate) const GRID_COLUMNS: u32 = GRID_CELLS_FROM_CENTER * 2 + 1;

/// Number of rows in the placement grid.
pub(crate) const GRID_ROWS: u32 = GRID_COLUMNS;

/// Unit instance copied from a catalog template at placement time.
///
/// The stat block is frozen at the moment of placement; later purchases of
/// the template never change an already placed copy.
#[derive(Clone, Debug)]
pub(crate) struct PlacedUnit {
    stats: UnitStats,
    last_attack: Duration,
}

impl PlacedUnit {
    pub(crate) const fn new(stats: UnitStats) -> Self {
        Self {
            stats,
            last_attack: Duration::ZERO,
        }
    }

    pub(crate) const fn stats(&self) -> UnitStats {
        self.stats
    }

    /// Time remaining until the unit may attack again; zero when ready.
    pub(crate) fn ready_in(&self, now: Duration) -> Duration {
        let elapsed = now.saturating_sub(self.last_attack);
        self.stats.cooldown().saturating_sub(elapsed)
    }

    pub(crate) fn can_attack(&self, now: Duration) -> bool {
        self.ready_in(now).is_zero()
    }

    /// Records the attack instant and yields the damage dealt.
    pub(crate) fn attack(&mut self, now: Duration) -> u32 {
        self.last_attack = now;
        self.stats.damage()
    }

    /// Fraction of the cooldown already elapsed, clamped to 1.
    pub(crate) fn cooldown_progress(&self, now: Duration) -> f32 {
        let elapsed = now.saturating_sub(self.last_attack).as_secs_f32();
        (elapsed * self.stats.attacks_per_second()).min(1.0)
    }

    /// Money returned when this unit is evicted by a new placement.
    pub(crate) fn refund_value(&self) -> Money {
        Money::new(self.stats.cost().get() / 2)
    }
}

/// One placement slot of the grid.
#[derive(Debug)]
pub(crate) struct GridCell {
    cell: CellCoord,
    enabled: bool,
    unit: Option<PlacedUnit>,
}

impl GridCell {
    const fn new(cell: CellCoord, enabled: bool) -> Self {
        Self {
            cell,
            enabled,
            unit: None,
        }
    }

    pub(crate) const fn cell(&self) -> CellCoord {
        self.cell
    }

    pub(crate) const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn unit(&self) -> Option<&PlacedUnit> {
        self.unit.as_ref()
    }

    pub(crate) fn unit_mut(&mut self) -> Option<&mut PlacedUnit> {
        self.unit.as_mut()
    }

    /// Installs a unit, discarding any previous occupant.
    pub(crate) fn place(&mut self, unit: PlacedUnit) {
        self.unit = Some(unit);
    }
}

/// Fixed arrangement of placement cells surrounding the box.
#[derive(Debug)]
pub(crate) struct Grid {
    cells: Vec<GridCell>,
}

impl Grid {
    /// Builds the grid once; the center 3×3 block stays disabled for the
    /// whole session.
    pub(crate) fn new() -> Self {
        let center = CellCoord::new(GRID_COLUMNS / 2, GRID_ROWS / 2);
        let mut cells = Vec::with_capacity((GRID_COLUMNS * GRID_ROWS) as usize);
        for row in 0..GRID_ROWS {
            for column in 0..GRID_COLUMNS {
                let cell = CellCoord::new(column, row);
                let enabled = cell.chebyshev_distance(center) > 1;
                cells.push(GridCell::new(cell, enabled));
            }
        }
        Self { cells }
    }

    pub(crate) fn cell(&self, cell: CellCoord) -> Option<&GridCell> {
        Self::index(cell).and_then(|index| self.cells.get(index))
    }

    pub(crate) fn cell_mut(&mut self, cell: CellCoord) -> Option<&mut GridCell> {
        Self::index(cell).and_then(|index| self.cells.get_mut(index))
    }

    /// Iterates over every cell in row-major order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }

    fn index(cell: CellCoord) -> Option<usize> {
        if cell.column() < GRID_COLUMNS && cell.row() < GRID_ROWS {
            Some((cell.row() * GRID_COLUMNS + cell.column()) as usize)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use box_siege_core::{UnitColor, UnitStats};

    fn stats() -> UnitStats {
        UnitStats::new(5, 1.0, Money::new(50), UnitColor::from_rgb(0x00, 0xFF, 0x00))
    }

    #[test]
    fn center_block_is_permanently_disabled() {
        let grid = Grid::new();
        let disabled = grid.iter().filter(|cell| !cell.is_enabled()).count();
        assert_eq!(disabled, 9);

        for column in 2..=4 {
            for row in 2..=4 {
                let cell = grid
                    .cell(CellCoord::new(column, row))
                    .expect("center cell exists");
                assert!(!cell.is_enabled());
            }
        }
        assert!(grid
            .cell(CellCoord::new(0, 0))
            .expect("corner exists")
            .is_enabled());
    }

    #[test]
    fn out_of_bounds_cells_are_absent() {
        let grid = Grid::new();
        assert!(grid.cell(CellCoord::new(GRID_COLUMNS, 0)).is_none());
        assert!(grid.cell(CellCoord::new(0, GRID_ROWS)).is_none());
    }

    #[test]
    fn fresh_unit_waits_out_its_first_cooldown() {
        let unit = PlacedUnit::new(stats());
        assert!(!unit.can_attack(Duration::from_millis(500)));
        assert!(unit.can_attack(Duration::from_secs(1)));
        assert!(unit.can_attack(Duration::from_secs(30)));
    }

    #[test]
    fn attack_restarts_the_cooldown() {
        let mut unit = PlacedUnit::new(stats());
        let now = Duration::from_secs(5);
        assert_eq!(unit.attack(now), 5);
        assert!(!unit.can_attack(now));
        assert!(!unit.can_attack(now + Duration::from_millis(999)));
        assert!(unit.can_attack(now + Duration::from_secs(1)));
    }

    #[test]
    fn cooldown_progress_saturates_at_one() {
        let mut unit = PlacedUnit::new(stats());
        let now = Duration::from_secs(2);
        let _ = unit.attack(now);
        assert_eq!(unit.cooldown_progress(now), 0.0);
        assert_eq!(unit.cooldown_progress(now + Duration::from_millis(250)), 0.25);
        assert_eq!(unit.cooldown_progress(now + Duration::from_secs(7)), 1.0);
    }

    #[test]
    fn refund_is_half_the_frozen_cost_floored() {
        let odd = UnitStats::new(7, 1.0, Money::new(75), UnitColor::from_rgb(0, 0, 0));
        assert_eq!(PlacedUnit::new(odd).refund_value(), Money::new(37));
        assert_eq!(PlacedUnit::new(stats()).refund_value(), Money::new(25));
    }
}
