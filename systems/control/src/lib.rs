#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that translates per-frame player input into world commands.

use box_siege_core::{CellCoord, Command, StageDirection};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ControlInput {
    /// Selector entry currently under the cursor, if any.
    pub selector_entry: Option<usize>,
    /// Grid cell currently under the cursor, if any.
    pub hovered_cell: Option<CellCoord>,
    /// Whether the player confirmed an action on this frame.
    pub confirm_action: bool,
    /// Whether the player pressed the hidden-catalog toggle on this frame.
    pub cheat_toggle: bool,
    /// Stage navigation requested on this frame.
    pub stage_navigation: Option<StageDirection>,
}

impl ControlInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        selector_entry: Option<usize>,
        hovered_cell: Option<CellCoord>,
        confirm_action: bool,
        cheat_toggle: bool,
        stage_navigation: Option<StageDirection>,
    ) -> Self {
        Self {
            selector_entry,
            hovered_cell,
            confirm_action,
            cheat_toggle,
            stage_navigation,
        }
    }
}

/// Control system that turns edge-triggered input into command batches.
#[derive(Debug, Default)]
pub struct Control;

impl Control {
    /// Creates a new control system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Distils the frame's input snapshot into world commands.
    ///
    /// Commands are emitted in a fixed order: catalog toggle, stage
    /// navigation, then the pointer confirmation. A confirmation over the
    /// selector takes precedence over one on the grid.
    pub fn handle(&mut self, input: ControlInput, out: &mut Vec<Command>) {
        if input.cheat_toggle {
            out.push(Command::ToggleSecretUnit);
        }

        if let Some(direction) = input.stage_navigation {
            out.push(Command::NavigateStage { direction });
        }

        if input.confirm_action {
            if let Some(index) = input.selector_entry {
                out.push(Command::SelectUnit { index });
            } else if let Some(cell) = input.hovered_cell {
                out.push(Command::PlaceUnit { cell });
            }
        }
    }
}
