/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that contains all the
 * adjustable parameters for the aquarium. These parameters can be set from
 * the command line at launch and modified through the UI while running.
 * It also provides snapshot-based change detection so the app knows whether a
 * change needs a new population, new strategies or just a new index layout.
 */

use clap::Parser;

use crate::quadtree::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_OBJECTS};
use crate::species::Species;
use crate::steering::{DEFAULT_BOUNDARY_MARGIN, DEFAULT_EDGE_MAX_FORCE};

// Parameters for the simulation that can be adjusted via UI
#[derive(Debug, Clone)]
pub struct SimulationParams {
    pub num_agents: usize,
    pub species: Species,
    pub speed: f32,
    pub seed: Option<u64>,
    // Edge avoidance
    pub boundary_margin: f32,
    pub edge_max_force: f32,
    // Flocking (minnows only)
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_radius: f32,
    pub alignment_radius: f32,
    pub cohesion_radius: f32,
    pub flocking_max_force: f32,
    // Spatial index
    pub max_objects: usize,
    pub max_depth: u32,
    pub perception_radius: f32, // 0 means "same leaf only"

    // Internal state for tracking changes
    pub(crate) previous_values: Option<ParamSnapshot>,
}

// A snapshot of parameter values used for change detection
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParamSnapshot {
    num_agents: usize,
    species: Species,
    speed: f32,
    boundary_margin: f32,
    edge_max_force: f32,
    separation_weight: f32,
    alignment_weight: f32,
    cohesion_weight: f32,
    separation_radius: f32,
    alignment_radius: f32,
    cohesion_radius: f32,
    flocking_max_force: f32,
    max_objects: usize,
    max_depth: u32,
    perception_radius: f32,
}

// What kind of rebuild a parameter change calls for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParamChanges {
    pub population: bool,
    pub behavior: bool,
    pub index: bool,
}

impl ParamChanges {
    pub fn any(&self) -> bool {
        self.population || self.behavior || self.index
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_agents: 500,
            species: Species::Guppy,
            speed: Species::Guppy.default_speed(),
            seed: None,
            boundary_margin: DEFAULT_BOUNDARY_MARGIN,
            edge_max_force: DEFAULT_EDGE_MAX_FORCE,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            separation_radius: 25.0,
            alignment_radius: 50.0,
            cohesion_radius: 50.0,
            flocking_max_force: 60.0,
            max_objects: DEFAULT_MAX_OBJECTS,
            max_depth: DEFAULT_MAX_DEPTH,
            perception_radius: 0.0,
            // Initialize with no previous values
            previous_values: None,
        }
    }
}

impl SimulationParams {
    // Defaults with the species' own cruising speed
    pub fn for_species(species: Species) -> Self {
        Self {
            species,
            speed: species.default_speed(),
            ..Self::default()
        }
    }

    fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            num_agents: self.num_agents,
            species: self.species,
            speed: self.speed,
            boundary_margin: self.boundary_margin,
            edge_max_force: self.edge_max_force,
            separation_weight: self.separation_weight,
            alignment_weight: self.alignment_weight,
            cohesion_weight: self.cohesion_weight,
            separation_radius: self.separation_radius,
            alignment_radius: self.alignment_radius,
            cohesion_radius: self.cohesion_radius,
            flocking_max_force: self.flocking_max_force,
            max_objects: self.max_objects,
            max_depth: self.max_depth,
            perception_radius: self.perception_radius,
        }
    }

    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(self.snapshot());
    }

    // Check which parameters changed since the last snapshot
    pub fn detect_changes(&self) -> ParamChanges {
        let mut changes = ParamChanges::default();

        // If we don't have previous values, nothing has changed
        let Some(prev) = &self.previous_values else {
            return changes;
        };

        if self.num_agents != prev.num_agents || self.species != prev.species {
            changes.population = true;
        }

        if self.speed != prev.speed
            || self.boundary_margin != prev.boundary_margin
            || self.edge_max_force != prev.edge_max_force
            || self.separation_weight != prev.separation_weight
            || self.alignment_weight != prev.alignment_weight
            || self.cohesion_weight != prev.cohesion_weight
            || self.separation_radius != prev.separation_radius
            || self.alignment_radius != prev.alignment_radius
            || self.cohesion_radius != prev.cohesion_radius
            || self.flocking_max_force != prev.flocking_max_force
        {
            changes.behavior = true;
        }

        if self.max_objects != prev.max_objects
            || self.max_depth != prev.max_depth
            || self.perception_radius != prev.perception_radius
        {
            changes.index = true;
        }

        changes
    }

    // Radius query when a perception radius is set, same-leaf query otherwise
    pub fn neighbor_radius(&self) -> Option<f32> {
        (self.perception_radius > 0.0).then_some(self.perception_radius)
    }

    // Get parameter ranges for UI sliders
    pub fn get_num_agents_range() -> std::ops::RangeInclusive<usize> {
        1..=5000
    }

    pub fn get_speed_range() -> std::ops::RangeInclusive<f32> {
        10.0..=600.0
    }

    pub fn get_margin_range() -> std::ops::RangeInclusive<f32> {
        10.0..=300.0
    }

    pub fn get_force_range() -> std::ops::RangeInclusive<f32> {
        1.0..=500.0
    }

    pub fn get_weight_range() -> std::ops::RangeInclusive<f32> {
        0.0..=3.0
    }

    pub fn get_radius_range() -> std::ops::RangeInclusive<f32> {
        10.0..=100.0
    }

    pub fn get_max_objects_range() -> std::ops::RangeInclusive<usize> {
        1..=32
    }

    pub fn get_max_depth_range() -> std::ops::RangeInclusive<u32> {
        1..=16
    }

    pub fn get_perception_range() -> std::ops::RangeInclusive<f32> {
        0.0..=150.0
    }
}

// Command line overrides for the defaults above
#[derive(Debug, Parser)]
#[command(name = "aquarium", about = "Boid aquarium with a double-buffered quadtree")]
pub struct CliArgs {
    /// Number of agents to spawn
    #[arg(long)]
    pub agents: Option<usize>,

    /// Species to spawn (guppy or minnow)
    #[arg(long)]
    pub species: Option<Species>,

    /// Cruising speed in pixels per second (defaults to the species' speed)
    #[arg(long)]
    pub speed: Option<f32>,

    /// Quadtree leaf capacity
    #[arg(long)]
    pub max_objects: Option<usize>,

    /// Quadtree depth limit
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Neighbor radius; omit to use same-leaf neighbors
    #[arg(long)]
    pub perception_radius: Option<f32>,

    /// Seed for reproducible spawning
    #[arg(long)]
    pub seed: Option<u64>,
}

impl CliArgs {
    pub fn into_params(self) -> SimulationParams {
        let mut params = SimulationParams::for_species(self.species.unwrap_or_default());
        if let Some(agents) = self.agents {
            params.num_agents = agents;
        }
        if let Some(speed) = self.speed {
            params.speed = speed;
        }
        if let Some(max_objects) = self.max_objects {
            params.max_objects = max_objects;
        }
        if let Some(max_depth) = self.max_depth {
            params.max_depth = max_depth;
        }
        if let Some(radius) = self.perception_radius {
            params.perception_radius = radius;
        }
        params.seed = self.seed;
        params
    }
}
