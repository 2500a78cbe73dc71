/*
 * Input Module
 *
 * Keyboard shortcuts for the aquarium:
 * - Space: pause / play
 * - B: toggle the quadtree overlay
 * - R: respawn the population
 *
 * Keys typed while egui has keyboard focus are left to the UI.
 */

use nannou::prelude::*;
use tracing::debug;

use crate::app::Model;

// What a key press maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    TogglePause,
    ToggleSpatialIndex,
    Reset,
}

impl Shortcut {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Space => Some(Self::TogglePause),
            Key::B => Some(Self::ToggleSpatialIndex),
            Key::R => Some(Self::Reset),
            _ => None,
        }
    }
}

// Key pressed event handler
pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }

    let Some(shortcut) = Shortcut::from_key(key) else {
        return;
    };
    debug!(?shortcut, "keyboard shortcut");

    match shortcut {
        Shortcut::TogglePause => model.controls.toggle_pause(),
        Shortcut::ToggleSpatialIndex => model.controls.toggle_spatial_index(),
        Shortcut::Reset => model.reset_requested = true,
    }
}
