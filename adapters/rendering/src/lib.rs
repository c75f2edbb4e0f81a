#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Box Siege adapters.

use anyhow::Result as AnyResult;
use box_siege_core::{CellCoord, Money, Stage, StageDirection, UnitColor};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

impl From<UnitColor> for Color {
    fn from(color: UnitColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Palette applied to the box across its staged tiers.
///
/// Stage `n` draws entry `n`, mirroring the original artwork table; the last
/// entry doubles as the fallback when terminal artwork is unavailable.
const STAGE_PALETTE: [Color; 10] = [
    Color::from_rgb_u8(0xE6, 0xB8, 0x9C),
    Color::from_rgb_u8(0x9C, 0xB4, 0xCC),
    Color::from_rgb_u8(0xB4, 0xC8, 0xB4),
    Color::from_rgb_u8(0xE6, 0xD3, 0xB3),
    Color::from_rgb_u8(0xC8, 0xA2, 0xC8),
    Color::from_rgb_u8(0xB3, 0xD9, 0xD9),
    Color::from_rgb_u8(0xD4, 0xB4, 0x99),
    Color::from_rgb_u8(0xB3, 0x99, 0xB3),
    Color::from_rgb_u8(0x99, 0xC2, 0xB0),
    Color::from_rgb_u8(0xCA, 0x73, 0x94),
];

/// Fill color presented for the box at the provided stage.
#[must_use]
pub fn stage_color(stage: Stage) -> Color {
    STAGE_PALETTE[(stage.get() as usize).min(STAGE_PALETTE.len() - 1)]
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position in screen space.
    pub cursor_position: Vec2,
    /// Whether the adapter detected a pointer confirmation on this frame.
    pub confirm_action: bool,
    /// Whether the adapter detected the hidden-catalog toggle on this frame.
    pub cheat_toggle: bool,
    /// Stage navigation detected on this frame.
    pub stage_navigation: Option<StageDirection>,
    /// Grid cell under the cursor, resolved against the previous scene.
    pub hovered_cell: Option<CellCoord>,
    /// Selector entry under the cursor, resolved against the previous scene.
    pub selector_entry: Option<usize>,
}

/// Screen-space layout of the placement grid with pure hit-testing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    columns: u32,
    rows: u32,
    cell_length: f32,
    origin: Vec2,
}

impl GridLayout {
    /// Creates a grid layout centered within the provided screen.
    ///
    /// Returns an error when `cell_length` is not strictly positive.
    pub fn centered(
        columns: u32,
        rows: u32,
        cell_length: f32,
        screen: Vec2,
    ) -> Result<Self, RenderingError> {
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        let origin = Vec2::new(
            (screen.x - columns as f32 * cell_length) * 0.5,
            (screen.y - rows as f32 * cell_length) * 0.5,
        );
        Ok(Self {
            columns,
            rows,
            cell_length,
            origin,
        })
    }

    /// Number of columns laid out by the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows laid out by the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell in screen units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Top-left corner of the grid in screen space.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Top-left corner of the provided cell in screen space.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        self.origin
            + Vec2::new(
                cell.column() as f32 * self.cell_length,
                cell.row() as f32 * self.cell_length,
            )
    }

    /// Maps a screen-space point to the single cell containing it.
    ///
    /// Returns `None` for points outside the grid.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellCoord> {
        let local = point - self.origin;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }

        let column = (local.x / self.cell_length).floor() as u32;
        let row = (local.y / self.cell_length).floor() as u32;
        if column < self.columns && row < self.rows {
            Some(CellCoord::new(column, row))
        } else {
            None
        }
    }
}

/// Screen-space layout of the unit selector bar with pure hit-testing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectorLayout {
    entry_count: usize,
    origin: Vec2,
}

impl SelectorLayout {
    /// Side length of a single selector entry in screen units.
    pub const ENTRY_LENGTH: f32 = 60.0;

    /// Gap between successive selector entries in screen units.
    pub const PADDING: f32 = 10.0;

    /// Creates a selector layout centered near the bottom of the screen.
    #[must_use]
    pub fn centered(entry_count: usize, screen: Vec2) -> Self {
        let span = entry_count as f32 * (Self::ENTRY_LENGTH + Self::PADDING);
        let origin = Vec2::new(
            (screen.x - span) * 0.5,
            screen.y - Self::ENTRY_LENGTH - Self::PADDING,
        );
        Self {
            entry_count,
            origin,
        }
    }

    /// Number of entries laid out by the selector.
    #[must_use]
    pub const fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Top-left corner of the provided entry in screen space.
    #[must_use]
    pub fn entry_origin(&self, index: usize) -> Vec2 {
        self.origin + Vec2::new(index as f32 * (Self::ENTRY_LENGTH + Self::PADDING), 0.0)
    }

    /// Maps a screen-space point to the selector entry containing it.
    #[must_use]
    pub fn entry_at(&self, point: Vec2) -> Option<usize> {
        if point.y < self.origin.y || point.y > self.origin.y + Self::ENTRY_LENGTH {
            return None;
        }

        for index in 0..self.entry_count {
            let left = self.entry_origin(index).x;
            if point.x >= left && point.x <= left + Self::ENTRY_LENGTH {
                return Some(index);
            }
        }
        None
    }
}

/// Health readout drawn as a depleting bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthPresentation {
    /// Current health of the box.
    pub current: i64,
    /// Health granted when the stage was entered.
    pub maximum: i64,
}

impl HealthPresentation {
    /// Creates a new health readout.
    #[must_use]
    pub const fn new(current: i64, maximum: i64) -> Self {
        Self { current, maximum }
    }

    /// Filled fraction of the bar, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.maximum <= 0 {
            return 0.0;
        }
        (self.current as f32 / self.maximum as f32).clamp(0.0, 1.0)
    }
}

/// Frontier progress readout drawn as a filling bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressPresentation {
    /// Frontier kills accrued toward the next unlock.
    pub current: u32,
    /// Kills required to unlock the next stage.
    pub maximum: u32,
}

impl ProgressPresentation {
    /// Creates a new progress readout.
    #[must_use]
    pub const fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    /// Filled fraction of the bar, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.maximum == 0 {
            return 0.0;
        }
        (self.current as f32 / self.maximum as f32).clamp(0.0, 1.0)
    }
}

/// Presentation of the besieged box at the center of the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxPresentation {
    /// Top-left corner of the box in screen space.
    pub origin: Vec2,
    /// Side length of the box in screen units.
    pub size: f32,
    /// Stage the box currently occupies.
    pub stage: Stage,
    /// Fill color for the staged artwork.
    pub fill: Color,
    /// Whether the terminal artwork should replace the staged fill.
    pub terminal: bool,
    /// Health readout drawn above the box.
    pub health: HealthPresentation,
    /// Frontier progress readout, present only at the frontier.
    pub progress: Option<ProgressPresentation>,
}

/// Cooldown-aware fill drawn for a placed unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitFillPresentation {
    /// Fill color of the unit.
    pub color: Color,
    /// Fraction of the attack cooldown already elapsed, clamped to 1.
    pub cooldown_progress: f32,
}

/// Presentation of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPresentation {
    /// Coordinate of the cell within the grid.
    pub cell: CellCoord,
    /// Whether the cell participates in placement; disabled cells are not
    /// drawn.
    pub enabled: bool,
    /// The placed unit's fill, if the cell is occupied.
    pub unit: Option<UnitFillPresentation>,
}

/// Hover feedback for the cell under the cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverPresentation {
    /// Cell currently hovered.
    pub cell: CellCoord,
    /// Ghost fill previewing the selected template on an empty cell.
    pub preview: Option<Color>,
}

/// Presentation of a single selector entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectorEntryPresentation {
    /// Fill color of the entry.
    pub color: Color,
    /// Damage dealt per attack, shown on the entry.
    pub damage: u32,
    /// Attack rate, shown on the entry.
    pub attacks_per_second: f32,
    /// Price of the next purchase, including scaling.
    pub scaled_cost: Money,
    /// Whether this entry is the active selection.
    pub selected: bool,
}

/// Selector bar combining its layout and per-entry content.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectorPresentation {
    /// Screen-space layout of the bar.
    pub layout: SelectorLayout,
    /// Entries in display order.
    pub entries: Vec<SelectorEntryPresentation>,
}

/// Money readout drawn in the screen corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoneyPresentation {
    /// Amount held by the ledger.
    pub amount: Money,
}

impl MoneyPresentation {
    /// Creates a new money readout.
    #[must_use]
    pub const fn new(amount: Money) -> Self {
        Self { amount }
    }
}

/// Fire-and-forget audio trigger emitted by the simulation for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    /// A unit struck the box.
    Hit,
    /// The box's health was depleted.
    Death,
}

/// Scene description combining the grid, box, selector and readouts.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Screen-space layout of the placement grid.
    pub grid: GridLayout,
    /// Grid cells in row-major order.
    pub cells: Vec<CellPresentation>,
    /// Hover feedback for the cell under the cursor, if any.
    pub hover: Option<HoverPresentation>,
    /// The besieged box.
    pub target_box: BoxPresentation,
    /// The unit selector bar.
    pub selector: SelectorPresentation,
    /// Money readout.
    pub money: MoneyPresentation,
    /// Audio triggers produced by this frame's simulation step.
    pub sound_cues: Vec<SoundCue>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        grid: GridLayout,
        cells: Vec<CellPresentation>,
        hover: Option<HoverPresentation>,
        target_box: BoxPresentation,
        selector: SelectorPresentation,
        money: MoneyPresentation,
        sound_cues: Vec<SoundCue>,
    ) -> Self {
        Self {
            grid,
            cells,
            hover,
            target_box,
            selector,
            money,
            sound_cues,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Logical screen size in pixels.
    pub screen: Vec2,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, screen: Vec2, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            screen,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Box Siege scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and may replace the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cell length must be positive to avoid a zero-sized grid.
    InvalidCellLength {
        /// Provided cell length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellLength { cell_length } => {
                write!(f, "cell_length must be positive (received {cell_length})")
            }
        }
    }
}

impl Error for RenderingError {}
