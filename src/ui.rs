/*
 * UI Module
 *
 * This module contains the egui control panel for the aquarium. It exposes
 * the simulation parameters as sliders, the debug toggles as checkboxes and
 * shows the frame rate and spatial index statistics.
 * Parameter change detection is handled by the SimulationParams struct.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugControls;
use crate::params::{ParamChanges, SimulationParams};
use crate::species::Species;

// What the app has to do after this frame's UI pass
#[derive(Debug, Clone, Copy, Default)]
pub struct UiResponse {
    pub reset: bool,
    pub changes: ParamChanges,
    // The agent count slider is still being dragged
    pub adjusting_population: bool,
}

// Holds a population change back until its slider is released
#[derive(Debug, Clone, Copy, Default)]
pub struct RespawnGate {
    pending: bool,
}

impl RespawnGate {
    pub fn should_respawn(&mut self, response: &UiResponse) -> bool {
        self.pending |= response.changes.population;
        if response.reset || (self.pending && !response.adjusting_population) {
            self.pending = false;
            return true;
        }
        false
    }
}

pub fn update_ui(egui: &mut Egui, params: &mut SimulationParams, controls: &mut DebugControls) -> UiResponse {
    let mut reset = false;
    let mut adjusting_population = false;

    // Take a snapshot of current parameter values for change detection
    params.take_snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Aquarium Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Population", |ui| {
                let count = ui.add(egui::Slider::new(&mut params.num_agents, SimulationParams::get_num_agents_range()).text("Number of Agents"));
                adjusting_population = count.dragged();

                egui::ComboBox::from_label("Species")
                    .selected_text(params.species.name())
                    .show_ui(ui, |ui| {
                        for species in Species::ALL {
                            ui.selectable_value(&mut params.species, species, species.name());
                        }
                    });

                ui.add(egui::Slider::new(&mut params.speed, SimulationParams::get_speed_range()).text("Speed"));

                if ui.button("Reset Agents").clicked() {
                    reset = true;
                }
            });

            ui.collapsing("Edge Avoidance", |ui| {
                ui.add(egui::Slider::new(&mut params.boundary_margin, SimulationParams::get_margin_range()).text("Boundary Margin"));
                ui.add(egui::Slider::new(&mut params.edge_max_force, SimulationParams::get_force_range()).text("Max Force"));
            });

            ui.collapsing("Flocking Behavior (Minnows)", |ui| {
                ui.add(egui::Slider::new(&mut params.separation_weight, SimulationParams::get_weight_range()).text("Separation Weight"));
                ui.add(egui::Slider::new(&mut params.alignment_weight, SimulationParams::get_weight_range()).text("Alignment Weight"));
                ui.add(egui::Slider::new(&mut params.cohesion_weight, SimulationParams::get_weight_range()).text("Cohesion Weight"));
                ui.add(egui::Slider::new(&mut params.separation_radius, SimulationParams::get_radius_range()).text("Separation Radius"));
                ui.add(egui::Slider::new(&mut params.alignment_radius, SimulationParams::get_radius_range()).text("Alignment Radius"));
                ui.add(egui::Slider::new(&mut params.cohesion_radius, SimulationParams::get_radius_range()).text("Cohesion Radius"));
                ui.add(egui::Slider::new(&mut params.flocking_max_force, SimulationParams::get_force_range()).text("Max Force"));
            });

            ui.collapsing("Spatial Index", |ui| {
                ui.add(egui::Slider::new(&mut params.max_objects, SimulationParams::get_max_objects_range()).text("Leaf Capacity"));
                ui.add(egui::Slider::new(&mut params.max_depth, SimulationParams::get_max_depth_range()).text("Max Depth"));
                ui.add(egui::Slider::new(&mut params.perception_radius, SimulationParams::get_perception_range()).text("Perception Radius (0 = leaf)"));

                ui.separator();

                ui.label(format!("Nodes: {}", controls.index_nodes));
                ui.label(format!("Depth: {}", controls.index_depth));
            });

            ui.separator();

            ui.label(format!("FPS: {}", controls.fps()));
            ui.label(format!("Agents: {}", params.num_agents));

            ui.checkbox(&mut controls.show_spatial_index, "Show Quadtree (B)");
            ui.checkbox(&mut controls.paused, "Pause Simulation (Space)");
        });

    UiResponse {
        reset,
        changes: params.detect_changes(),
        adjusting_population,
    }
}
