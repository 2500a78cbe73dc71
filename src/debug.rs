/*
 * Debug Controls Module
 *
 * This module defines the debug signal the simulation consults every frame
 * and the DebugControls struct the app uses to back it. It handles:
 * - Pause / play
 * - Showing the quadtree overlay
 * - Counting frames per second
 *
 * The controls only observe; they never touch the simulation math beyond
 * gating the Running/Paused transition.
 */

use std::time::Duration;

const FPS_WINDOW: Duration = Duration::from_secs(1);

pub trait DebugSignal {
    fn is_paused(&self) -> bool;

    fn show_spatial_index(&self) -> bool;

    // Called once per host frame, paused or not
    fn record_frame(&mut self, now: Duration);
}

#[derive(Debug, Clone, Default)]
pub struct DebugControls {
    pub paused: bool,
    pub show_spatial_index: bool,
    frame_count: u32,
    last_fps_update: Duration,
    fps: u32,
    // Index statistics for the UI, refreshed by the app after each frame
    pub index_nodes: usize,
    pub index_depth: u32,
}

impl DebugControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_spatial_index(&mut self) {
        self.show_spatial_index = !self.show_spatial_index;
    }

    // Frames counted during the last full one-second window
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl DebugSignal for DebugControls {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn show_spatial_index(&self) -> bool {
        self.show_spatial_index
    }

    fn record_frame(&mut self, now: Duration) {
        self.frame_count += 1;
        if now.saturating_sub(self.last_fps_update) >= FPS_WINDOW {
            self.fps = self.frame_count;
            self.frame_count = 0;
            self.last_fps_update = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_frames_per_second() {
        let mut controls = DebugControls::new();
        assert_eq!(controls.fps(), 0);

        // 60 frames over the first second, 30 over the next
        for i in 1..=60 {
            controls.record_frame(Duration::from_secs_f64(i as f64 / 60.0));
        }
        assert_eq!(controls.fps(), 60);

        for i in 1..=30 {
            controls.record_frame(Duration::from_secs(1) + Duration::from_secs_f64(i as f64 / 30.0));
        }
        assert_eq!(controls.fps(), 30);
    }

    #[test]
    fn toggles_flip_the_flags() {
        let mut controls = DebugControls::new();
        controls.toggle_pause();
        controls.toggle_spatial_index();
        assert!(controls.is_paused());
        assert!(controls.show_spatial_index());
        controls.toggle_pause();
        assert!(!controls.is_paused());
    }
}
