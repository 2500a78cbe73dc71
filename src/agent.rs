/*
 * Agent Module
 *
 * This module defines the Agent struct: a mobile entity with a position, a
 * velocity, a heading used for drawing, a fixed cruising speed and a shared
 * list of steering strategies. Every tick the strategies' forces are summed
 * into the velocity, which is then rescaled to the cruising speed, so steering
 * only ever changes direction.
 */

use std::sync::Arc;

use rand::Rng;
use tracing::{trace, warn};

use crate::bounds::Rect;
use crate::quadtree::Located;
use crate::species::Species;
use crate::steering::{SteeringContext, SteeringStrategy};
use crate::vector::Vector;

// Distance kept from the arena edges when spawning
pub const SPAWN_INSET: f32 = 50.0;

// Frozen copy of an agent as stored in the spatial index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: usize,
    pub position: Vector,
    pub velocity: Vector,
}

impl Located for Neighbor {
    fn position(&self) -> Vector {
        self.position
    }
}

#[derive(Debug, Clone)]
pub struct Agent {
    pub id: usize,
    pub position: Vector,
    pub velocity: Vector,
    pub heading: f32,
    pub speed: f32,
    pub species: Species,
    pub strategies: Arc<[SteeringStrategy]>,
}

impl Agent {
    pub fn new(
        id: usize,
        position: Vector,
        heading: f32,
        speed: f32,
        species: Species,
        strategies: Arc<[SteeringStrategy]>,
    ) -> Self {
        Self {
            id,
            position,
            velocity: Vector::from_angle(heading, speed),
            heading,
            speed,
            species,
            strategies,
        }
    }

    // Random position inside the inset arena, random heading
    pub fn spawn<R: Rng + ?Sized>(
        id: usize,
        rng: &mut R,
        bounds: &Rect,
        speed: f32,
        species: Species,
        strategies: Arc<[SteeringStrategy]>,
    ) -> Self {
        let span_x = (bounds.width - 2.0 * SPAWN_INSET).max(0.0);
        let span_y = (bounds.height - 2.0 * SPAWN_INSET).max(0.0);
        let position = Vector::new(
            bounds.x + SPAWN_INSET + rng.gen::<f32>() * span_x,
            bounds.y + SPAWN_INSET + rng.gen::<f32>() * span_y,
        );
        let heading = rng.gen_range(0.0..std::f32::consts::TAU);
        Self::new(id, position, heading, speed, species, strategies)
    }

    pub fn snapshot(&self) -> Neighbor {
        Neighbor {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
        }
    }

    // Sum every strategy's force into the velocity, rescale to cruising speed,
    // refresh the heading and integrate the position (explicit Euler).
    pub fn decide_movement(&mut self, delta_time: f32, ctx: &SteeringContext, neighbors: &[Neighbor]) {
        let mut summed = self.velocity;
        for strategy in self.strategies.iter() {
            let Some(force) = strategy.steer(ctx, self, neighbors) else {
                continue;
            };
            if let Err(error) = summed.add(&force) {
                warn!(agent = self.id, strategy = strategy.name(), %error, "dropping steering force");
            }
        }

        // A zero sum has no direction; keep last tick's velocity
        if summed.try_normalize().is_ok() {
            summed.scale(self.speed);
            self.velocity = summed;
        } else {
            trace!(agent = self.id, "steering forces cancelled out, keeping previous velocity");
        }

        if self.velocity.length_squared() > 0.0 {
            if let Ok(angle) = self.velocity.angle() {
                self.heading = angle;
            }
        }

        self.position.x += self.velocity.x * delta_time;
        self.position.y += self.velocity.y * delta_time;
    }
}
