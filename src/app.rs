/*
 * Application Module
 *
 * This module defines the nannou model and the host callbacks for the
 * aquarium. It handles:
 * - Creating the window, the egui panel and the initial population
 * - Applying parameter changes from the UI (respawn, new strategies, new index layout)
 * - Driving one simulation frame per nannou update
 * - Painting the recorded display list in view
 */

use std::process;
use std::sync::OnceLock;

use nannou::prelude::*;
use nannou_egui::Egui;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

use crate::bounds::Rect;
use crate::debug::DebugControls;
use crate::input;
use crate::params::SimulationParams;
use crate::renderer::{self, DisplayList};
use crate::ui::{self, RespawnGate};
use crate::world::{self, IndexSettings, Simulation};

const FALLBACK_WINDOW_SIZE: (u32, u32) = (1280, 800);

static LAUNCH_PARAMS: OnceLock<SimulationParams> = OnceLock::new();

// Main model for the application
pub struct Model {
    pub simulation: Simulation,
    pub params: SimulationParams,
    pub controls: DebugControls,
    pub display: DisplayList,
    pub egui: Egui,
    pub rng: StdRng,
    pub reset_requested: bool,
    pub respawn_gate: RespawnGate,
}

impl Model {
    // Spawn a new population inside the current window
    fn respawn(&mut self, arena: Rect) {
        match Simulation::from_params(&self.params, arena, &mut self.rng) {
            Ok(simulation) => self.simulation = simulation,
            Err(error) => warn!(%error, "keeping the current population"),
        }
    }

    fn apply_behavior(&mut self) {
        match world::shared_strategies(self.params.species, &self.params) {
            Ok(strategies) => self.simulation.set_strategies(strategies, self.params.speed),
            Err(error) => warn!(%error, "keeping the current strategies"),
        }
    }
}

// Run the aquarium with the given parameters; blocks until the window closes
pub fn launch(params: SimulationParams) {
    if LAUNCH_PARAMS.set(params).is_err() {
        warn!("aquarium already launched, ignoring new parameters");
    }
    nannou::app(model).update(update).run();
}

fn window_arena(app: &App) -> Rect {
    let window_rect = app.window_rect();
    Rect::sized(window_rect.w(), window_rect.h())
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let params = LAUNCH_PARAMS.get().cloned().unwrap_or_default();

    // 80% of the primary monitor when we can see one
    let (window_width, window_height) = app
        .primary_monitor()
        .map(|monitor| {
            let size = monitor.size();
            ((size.width as f32 * 0.8) as u32, (size.height as f32 * 0.8) as u32)
        })
        .unwrap_or(FALLBACK_WINDOW_SIZE);

    let window_id = match app
        .new_window()
        .title("Aquarium")
        .size(window_width, window_height)
        .view(view)
        .key_pressed(input::key_pressed)
        .raw_event(raw_window_event)
        .build()
    {
        Ok(id) => id,
        Err(error) => {
            error!(?error, "failed to create window");
            process::exit(1);
        }
    };

    let Some(window) = app.window(window_id) else {
        error!("window disappeared right after creation");
        process::exit(1);
    };
    let egui = Egui::from_window(&window);
    drop(window);

    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let simulation = match Simulation::from_params(&params, window_arena(app), &mut rng) {
        Ok(simulation) => simulation,
        Err(error) => {
            error!(%error, "invalid simulation parameters");
            process::exit(2);
        }
    };
    info!(seed = ?params.seed, "aquarium started");

    Model {
        simulation,
        params,
        controls: DebugControls::new(),
        display: DisplayList::new(),
        egui,
        rng,
        reset_requested: false,
        respawn_gate: RespawnGate::default(),
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    let response = ui::update_ui(&mut model.egui, &mut model.params, &mut model.controls);
    let arena = window_arena(app);

    if response.changes.any() {
        debug!(changes = ?response.changes, "parameters changed");
    }

    let respawn = model.respawn_gate.should_respawn(&response);
    if respawn || model.reset_requested {
        model.reset_requested = false;
        model.respawn(arena);
    } else if response.changes.behavior {
        model.apply_behavior();
    }
    if response.changes.index {
        model.simulation.set_index_settings(IndexSettings::from_params(&model.params));
    }

    let Model { simulation, controls, display, .. } = model;
    if simulation.frame(update.since_start, &arena, controls, display).is_some() {
        let index = simulation.next_index();
        controls.index_nodes = index.node_count();
        controls.index_depth = index.depth();
    }
}

pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(rgb(12u8, 30, 48));

    renderer::paint(&model.display, &draw, app.window_rect());

    if let Err(error) = draw.to_frame(app, &frame) {
        error!(?error, "failed to render frame");
    }
    if let Err(error) = model.egui.draw_to_frame(&frame) {
        error!(?error, "failed to render controls");
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
