//! Purchasable unit templates and the scaled-cost economy.

use box_siege_core::{Money, UnitColor, UnitStats, SECRET_UNIT_STATS};

/// Cost multiplier applied per recorded purchase of a template.
const COST_GROWTH: f64 = 1.2;

/// Catalog entry whose purchase count drives cost scaling.
#[derive(Clone, Debug)]
pub(crate) struct UnitTemplate {
    stats: UnitStats,
    purchase_count: u32,
}

impl UnitTemplate {
    pub(crate) const fn new(stats: UnitStats) -> Self {
        Self {
            stats,
            purchase_count: 0,
        }
    }

    pub(crate) const fn stats(&self) -> UnitStats {
        self.stats
    }

    /// Purchase price inflated by how many times this template was bought.
    pub(crate) fn scaled_cost(&self) -> Money {
        let scaled = self.stats.cost().get() as f64 * COST_GROWTH.powi(self.purchase_count as i32);
        Money::new(scaled.floor() as u64)
    }

    pub(crate) fn record_purchase(&mut self) {
        self.purchase_count = self.purchase_count.saturating_add(1);
    }
}

/// Ordered collection of purchasable templates plus the active selection.
#[derive(Debug)]
pub(crate) struct UnitCatalog {
    templates: Vec<UnitTemplate>,
    selected: usize,
}

impl UnitCatalog {
    pub(crate) fn new() -> Self {
        let templates = vec![
            UnitTemplate::new(UnitStats::new(
                5,
                1.0,
                Money::new(50),
                UnitColor::from_rgb(0x00, 0xFF, 0x00),
            )),
            UnitTemplate::new(UnitStats::new(
                4,
                2.5,
                Money::new(150),
                UnitColor::from_rgb(0x00, 0x00, 0xFF),
            )),
            UnitTemplate::new(UnitStats::new(
                40,
                0.5,
                Money::new(400),
                UnitColor::from_rgb(0xFF, 0x00, 0x00),
            )),
            UnitTemplate::new(UnitStats::new(
                3,
                15.0,
                Money::new(1_000),
                UnitColor::from_rgb(0xFF, 0x00, 0xFF),
            )),
        ];
        Self {
            templates,
            selected: 0,
        }
    }

    pub(crate) fn templates(&self) -> &[UnitTemplate] {
        &self.templates
    }

    pub(crate) const fn selected_index(&self) -> usize {
        self.selected
    }

    /// Moves the selection. Out-of-range indices are silently refused.
    pub(crate) fn select(&mut self, index: usize) -> bool {
        if index < self.templates.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    pub(crate) fn selected_template(&self) -> &UnitTemplate {
        &self.templates[self.selected]
    }

    pub(crate) fn record_selected_purchase(&mut self) {
        self.templates[self.selected].record_purchase();
    }

    /// Adds the hidden template when absent, removes it when present.
    ///
    /// The hidden entry is identified by exact stat match. Removal clamps the
    /// selection back into bounds. Returns the presence after the toggle.
    pub(crate) fn toggle_secret(&mut self) -> bool {
        if let Some(index) = self
            .templates
            .iter()
            .position(|template| template.stats() == SECRET_UNIT_STATS)
        {
            let _ = self.templates.remove(index);
            if self.selected >= self.templates.len() {
                self.selected = self.templates.len().saturating_sub(1);
            }
            false
        } else {
            self.templates.push(UnitTemplate::new(SECRET_UNIT_STATS));
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_cost_grows_with_each_purchase() {
        let mut template = UnitTemplate::new(UnitStats::new(
            5,
            1.0,
            Money::new(50),
            UnitColor::from_rgb(0, 0xFF, 0),
        ));
        let expected = [50, 60, 72, 86, 103];
        for cost in expected {
            assert_eq!(template.scaled_cost(), Money::new(cost));
            template.record_purchase();
        }
    }

    #[test]
    fn select_refuses_out_of_range_indices() {
        let mut catalog = UnitCatalog::new();
        assert!(catalog.select(3));
        assert!(!catalog.select(4));
        assert_eq!(catalog.selected_index(), 3);
    }

    #[test]
    fn toggle_adds_then_removes_the_hidden_template() {
        let mut catalog = UnitCatalog::new();
        assert!(catalog.toggle_secret());
        assert_eq!(catalog.templates().len(), 5);
        assert_eq!(catalog.templates()[4].stats(), SECRET_UNIT_STATS);

        assert!(!catalog.toggle_secret());
        assert_eq!(catalog.templates().len(), 4);
    }

    #[test]
    fn toggle_pair_preserves_surviving_order() {
        let mut catalog = UnitCatalog::new();
        let before: Vec<_> = catalog
            .templates()
            .iter()
            .map(UnitTemplate::stats)
            .collect();

        assert!(catalog.toggle_secret());
        assert!(!catalog.toggle_secret());

        let after: Vec<_> = catalog
            .templates()
            .iter()
            .map(UnitTemplate::stats)
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn removal_clamps_the_selection_into_bounds() {
        let mut catalog = UnitCatalog::new();
        assert!(catalog.toggle_secret());
        assert!(catalog.select(4));

        assert!(!catalog.toggle_secret());
        assert_eq!(catalog.selected_index(), 3);
    }
}
