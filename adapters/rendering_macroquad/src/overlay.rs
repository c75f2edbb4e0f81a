//! Adapter-local help overlay toggled from the corner marker.
//!
//! All overlay state lives here so the rest of the backend stays focused on
//! presenting the scene; the simulation never learns whether help is open.

use box_siege_rendering::Color;
use glam::Vec2;
use macroquad::shapes::{draw_rectangle, draw_rectangle_lines};

use crate::{draw_label, to_macroquad_color};

const MARKER_SIZE: f32 = 30.0;
const MARKER_MARGIN: f32 = 40.0;
const MARKER_TOP: f32 = 10.0;

const POPUP_WIDTH: f32 = 400.0;
const POPUP_HEIGHT: f32 = 300.0;
const POPUP_PADDING: f32 = 20.0;
const LINE_HEIGHT: f32 = 24.0;

const INSTRUCTIONS: [&str; 10] = [
    "- Build units to attack the box!",
    "- Press left/right keys",
    "  to switch stages!",
    "- Replace units by other units!",
    "- Have fun!",
    "",
    "",
    "",
    "",
    "- cheat button is \"Q\"",
];

/// Corner "?" marker plus the popup it toggles.
#[derive(Debug, Default)]
pub(crate) struct HelpOverlay {
    visible: bool,
    hovering: bool,
}

impl HelpOverlay {
    /// Updates hover state and applies this frame's click, if any.
    ///
    /// A click on the marker toggles the popup; a click anywhere else while
    /// the popup is open closes it.
    pub(crate) fn handle_input(&mut self, cursor: Vec2, clicked: bool, screen: Vec2) {
        let left = screen.x - MARKER_MARGIN;
        self.hovering = cursor.x >= left
            && cursor.x <= left + MARKER_SIZE
            && cursor.y >= MARKER_TOP
            && cursor.y <= MARKER_TOP + MARKER_SIZE;

        if self.hovering && clicked {
            self.visible = !self.visible;
        }

        if self.visible && !self.hovering && clicked {
            self.visible = false;
        }
    }

    /// Draws the marker and, when open, the popup.
    pub(crate) fn draw(&self, screen: Vec2) {
        let marker_color = if self.hovering {
            Color::from_rgb_u8(0xFF, 0xFF, 0xFF)
        } else {
            Color::from_rgb_u8(0xAA, 0xAA, 0xAA)
        };
        draw_label(
            "?",
            screen.x - MARKER_MARGIN,
            MARKER_TOP,
            MARKER_SIZE,
            to_macroquad_color(marker_color),
        );

        if !self.visible {
            return;
        }

        let popup_left = (screen.x - POPUP_WIDTH) * 0.5;
        let popup_top = (screen.y - POPUP_HEIGHT) * 0.5;
        let white = to_macroquad_color(Color::from_rgb_u8(0xFF, 0xFF, 0xFF));

        draw_rectangle(
            0.0,
            0.0,
            screen.x,
            screen.y,
            to_macroquad_color(Color::new(0.0, 0.0, 0.0, 0.53)),
        );
        draw_rectangle(
            popup_left,
            popup_top,
            POPUP_WIDTH,
            POPUP_HEIGHT,
            to_macroquad_color(Color::from_rgb_u8(0x1A, 0x1A, 0x1A)),
        );
        draw_rectangle_lines(popup_left, popup_top, POPUP_WIDTH, POPUP_HEIGHT, 2.0, white);

        draw_label(
            "How to Play",
            popup_left + POPUP_PADDING,
            popup_top + POPUP_PADDING,
            24.0,
            white,
        );

        for (index, line) in INSTRUCTIONS.iter().enumerate() {
            draw_label(
                line,
                popup_left + POPUP_PADDING,
                popup_top + POPUP_PADDING + 40.0 + index as f32 * LINE_HEIGHT,
                20.0,
                white,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn marker_point() -> Vec2 {
        Vec2::new(SCREEN.x - MARKER_MARGIN + 5.0, MARKER_TOP + 5.0)
    }

    #[test]
    fn marker_click_toggles_the_popup() {
        let mut overlay = HelpOverlay::default();
        overlay.handle_input(marker_point(), true, SCREEN);
        assert!(overlay.visible);

        overlay.handle_input(marker_point(), true, SCREEN);
        assert!(!overlay.visible);
    }

    #[test]
    fn clicking_elsewhere_closes_the_popup() {
        let mut overlay = HelpOverlay::default();
        overlay.handle_input(marker_point(), true, SCREEN);
        assert!(overlay.visible);

        overlay.handle_input(Vec2::new(100.0, 100.0), true, SCREEN);
        assert!(!overlay.visible);
    }

    #[test]
    fn hovering_without_clicking_changes_nothing() {
        let mut overlay = HelpOverlay::default();
        overlay.handle_input(marker_point(), false, SCREEN);
        assert!(overlay.hovering);
        assert!(!overlay.visible);
    }
}
