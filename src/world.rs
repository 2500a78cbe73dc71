/*
 * World Module
 *
 * This module defines the Simulation: the fixed agent population, the clock
 * and the double-buffered quadtree. Each running frame:
 * 1. The tree filled during the previous frame becomes the read-only query tree
 * 2. A fresh, empty tree sized to the current screen bounds starts filling
 * 3. Every agent queries the frozen tree, steers, moves, is drawn and is
 *    inserted into the fresh tree for the next frame
 *
 * Because the query tree only ever holds last frame's snapshots, the order in
 * which agents are updated never changes what they see.
 */

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::agent::{Agent, Neighbor};
use crate::bounds::{Rect, ScreenBounds};
use crate::clock::{ClockState, SimulationClock};
use crate::debug::DebugSignal;
use crate::error::SimulationError;
use crate::params::SimulationParams;
use crate::quadtree::QuadTree;
use crate::renderer::Renderer;
use crate::species::Species;
use crate::steering::{SteeringContext, SteeringStrategy};
use crate::vector::Vector;

// Spatial index layout and neighbor lookup mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexSettings {
    pub max_objects: usize,
    pub max_depth: u32,
    // None: neighbors are the agent's leaf; Some(r): every agent within r
    pub neighbor_radius: Option<f32>,
}

impl IndexSettings {
    pub fn from_params(params: &SimulationParams) -> Self {
        Self {
            max_objects: params.max_objects,
            max_depth: params.max_depth,
            neighbor_radius: params.neighbor_radius(),
        }
    }
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self::from_params(&SimulationParams::default())
    }
}

pub struct Simulation {
    agents: Vec<Agent>,
    clock: SimulationClock,
    settings: IndexSettings,
    // Read-only during a frame: last frame's tree
    current_index: Option<QuadTree<Neighbor>>,
    // Write-only during a frame: becomes next frame's current_index
    next_index: QuadTree<Neighbor>,
}

impl Simulation {
    // Seed the first index with the agents' starting positions so the first
    // frame already has neighbors to query.
    pub fn new(agents: Vec<Agent>, bounds: Rect, settings: IndexSettings) -> Self {
        let mut next_index = QuadTree::new(bounds, settings.max_objects, settings.max_depth);
        for agent in &agents {
            next_index.insert(agent.snapshot());
        }

        Self {
            agents,
            clock: SimulationClock::default(),
            settings,
            current_index: None,
            next_index,
        }
    }

    // Spawn the population described by `params` inside `bounds`
    pub fn from_params<R: Rng + ?Sized>(
        params: &SimulationParams,
        bounds: Rect,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        let agents = populate(params, &bounds, rng)?;
        info!(
            agents = agents.len(),
            species = %params.species,
            width = bounds.width,
            height = bounds.height,
            "spawned population"
        );
        Ok(Self::new(agents, bounds, IndexSettings::from_params(params)))
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn clock_state(&self) -> ClockState {
        self.clock.state()
    }

    pub fn settings(&self) -> IndexSettings {
        self.settings
    }

    // The tree agents are querying during the current frame
    pub fn current_index(&self) -> Option<&QuadTree<Neighbor>> {
        self.current_index.as_ref()
    }

    // The tree being filled for the next frame
    pub fn next_index(&self) -> &QuadTree<Neighbor> {
        &self.next_index
    }

    // Neighbor candidates for `position` in the frozen tree
    pub fn neighbors_at(&self, position: &Vector) -> Cow<'_, [Neighbor]> {
        gather_neighbors(self.current_index.as_ref(), position, self.settings.neighbor_radius)
    }

    // Takes effect from the next index swap
    pub fn set_index_settings(&mut self, settings: IndexSettings) {
        self.settings = settings;
    }

    // Swap the strategy list of every agent, e.g. after a parameter change
    pub fn set_strategies(&mut self, strategies: Arc<[SteeringStrategy]>, speed: f32) {
        for agent in &mut self.agents {
            agent.strategies = Arc::clone(&strategies);
            agent.speed = speed;
            let mut velocity = agent.velocity;
            if velocity.try_normalize().is_ok() {
                velocity.scale(speed);
                agent.velocity = velocity;
            }
        }
    }

    // Run one host frame. Returns the integration step, or None when paused.
    pub fn frame<B, D, R>(&mut self, now: Duration, screen: &B, signal: &mut D, renderer: &mut R) -> Option<f32>
    where
        B: ScreenBounds + ?Sized,
        D: DebugSignal + ?Sized,
        R: Renderer + ?Sized,
    {
        signal.record_frame(now);
        let delta_time = self.clock.tick(now, signal.is_paused())?;

        let bounds = screen.bounds();
        if bounds != self.next_index.bounds() {
            debug!(width = bounds.width, height = bounds.height, "arena resized, resizing spatial index");
        }
        let fresh = QuadTree::new(bounds, self.settings.max_objects, self.settings.max_depth);
        self.current_index = Some(std::mem::replace(&mut self.next_index, fresh));

        renderer.begin_frame(bounds);
        let ctx = SteeringContext { bounds };
        let radius = self.settings.neighbor_radius;
        for agent in &mut self.agents {
            let neighbors = gather_neighbors(self.current_index.as_ref(), &agent.position, radius);
            agent.decide_movement(delta_time, &ctx, &neighbors);
            renderer.draw_agent(agent);
            self.next_index.insert(agent.snapshot());
        }

        if signal.show_spatial_index() {
            self.next_index.draw(renderer);
        }

        Some(delta_time)
    }
}

fn gather_neighbors<'a>(
    index: Option<&'a QuadTree<Neighbor>>,
    position: &Vector,
    radius: Option<f32>,
) -> Cow<'a, [Neighbor]> {
    match (index, radius) {
        (None, _) => Cow::Borrowed(&[]),
        (Some(index), None) => Cow::Borrowed(index.query(position)),
        (Some(index), Some(radius)) => {
            Cow::Owned(index.query_radius(position, radius).into_iter().copied().collect())
        }
    }
}

// Build `params.num_agents` agents sharing one validated strategy list
pub fn populate<R: Rng + ?Sized>(
    params: &SimulationParams,
    bounds: &Rect,
    rng: &mut R,
) -> Result<Vec<Agent>, SimulationError> {
    let strategies = shared_strategies(params.species, params)?;
    Ok((0..params.num_agents)
        .map(|id| Agent::spawn(id, &mut *rng, bounds, params.speed, params.species, Arc::clone(&strategies)))
        .collect())
}

pub fn shared_strategies(
    species: Species,
    params: &SimulationParams,
) -> Result<Arc<[SteeringStrategy]>, SimulationError> {
    Ok(Arc::from(species.strategies(params)?))
}
