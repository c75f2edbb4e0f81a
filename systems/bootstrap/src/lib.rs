#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Box Siege experience.

use box_siege_world::{query, World};

/// Produces data required to greet the player and lay out the screen.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the placement grid dimensions required for layout.
    #[must_use]
    pub fn grid_dimensions(&self, world: &World) -> (u32, u32) {
        query::grid_dimensions(world)
    }
}
