#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits strike commands for units whose cooldown elapsed.

use box_siege_core::{Command, UnitCooldownView};

/// Combat system that queues strike commands for ready units.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::Strike` entries for every ready unit, row-major.
    pub fn handle(&mut self, cooldowns: UnitCooldownView, out: &mut Vec<Command>) {
        let snapshots = cooldowns.into_vec();
        if snapshots.is_empty() {
            return;
        }

        self.scratch.clear();

        for snapshot in &snapshots {
            if snapshot.ready_in.is_zero() {
                self.scratch.push(Command::Strike {
                    cell: snapshot.cell,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
