/*
 * Steering Module
 *
 * This module defines the steering strategies an agent combines every tick.
 * Each strategy turns the agent's state and its neighbor set into a force
 * vector that nudges the agent's velocity:
 * 1. Edge avoidance: push away from arena edges, ramping up quadratically
 * 2. Separation: avoid crowding neighbors
 * 3. Alignment: steer towards the average heading of neighbors
 * 4. Cohesion: steer towards the average position of neighbors
 *
 * Strategies are immutable configuration values validated by their builders,
 * so one list can be shared by a whole population.
 */

use thiserror::Error;
use tracing::warn;

use crate::agent::{Agent, Neighbor};
use crate::bounds::Rect;
use crate::vector::{Vector, VectorError};

pub const DEFAULT_BOUNDARY_MARGIN: f32 = 100.0;
pub const DEFAULT_EDGE_MAX_FORCE: f32 = 200.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SteeringError {
    #[error("{strategy} is misconfigured: {reason}")]
    Configuration { strategy: &'static str, reason: String },

    #[error(transparent)]
    Vector(#[from] VectorError),
}

impl SteeringError {
    fn configuration(strategy: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration { strategy, reason: reason.into() }
    }
}

// Per-frame inputs shared by every strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringContext {
    pub bounds: Rect,
}

fn require_positive(strategy: &'static str, field: &str, value: f32) -> Result<f32, SteeringError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SteeringError::configuration(strategy, format!("{field} must be positive, got {value}")))
    }
}

// Clamp a force to `max` while keeping its direction
fn limit(force: &mut Vector, max: f32) {
    if force.length_squared() > max * max {
        force.normalize().scale(max);
    }
}

// Reynolds steering: desired velocity at cruising speed minus current velocity
fn steer_towards(desired: Vector, agent: &Agent, max_force: f32) -> Result<Vector, SteeringError> {
    let mut steering = desired;
    if steering.try_normalize().is_err() {
        return Ok(Vector::ZERO);
    }
    steering.scale(agent.speed).sub(&agent.velocity)?;
    limit(&mut steering, max_force);
    Ok(steering)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeAvoidance {
    boundary_margin: f32,
    max_force: f32,
}

impl EdgeAvoidance {
    const NAME: &'static str = "edge avoidance";

    pub fn builder() -> EdgeAvoidanceBuilder {
        EdgeAvoidanceBuilder::default()
    }

    pub fn boundary_margin(&self) -> f32 {
        self.boundary_margin
    }

    pub fn max_force(&self) -> f32 {
        self.max_force
    }

    fn intensity(&self, distance: f32) -> f32 {
        ((self.boundary_margin - distance) / self.boundary_margin).clamp(0.0, 1.0)
    }

    fn push(&self, distance: f32) -> f32 {
        let intensity = self.intensity(distance);
        intensity * intensity * self.max_force
    }

    // Inward force for a position near any of the four arena edges.
    // Corners combine additively per axis.
    pub fn force(&self, bounds: &Rect, position: &Vector) -> Result<Vector, SteeringError> {
        if bounds.is_degenerate() {
            return Err(SteeringError::configuration(
                Self::NAME,
                format!("arena bounds {}x{} are empty", bounds.width, bounds.height),
            ));
        }

        let margin = self.boundary_margin;
        let mut force = Vector::ZERO;

        let left = position.x - bounds.x;
        if left < margin {
            force.x += self.push(left);
        }
        let right = bounds.right() - position.x;
        if right < margin {
            force.x -= self.push(right);
        }
        let top = position.y - bounds.y;
        if top < margin {
            force.y += self.push(top);
        }
        let bottom = bounds.bottom() - position.y;
        if bottom < margin {
            force.y -= self.push(bottom);
        }

        Ok(force)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EdgeAvoidanceBuilder {
    boundary_margin: f32,
    max_force: f32,
}

impl Default for EdgeAvoidanceBuilder {
    fn default() -> Self {
        Self {
            boundary_margin: DEFAULT_BOUNDARY_MARGIN,
            max_force: DEFAULT_EDGE_MAX_FORCE,
        }
    }
}

impl EdgeAvoidanceBuilder {
    pub fn boundary_margin(mut self, margin: f32) -> Self {
        self.boundary_margin = margin;
        self
    }

    pub fn max_force(mut self, max_force: f32) -> Self {
        self.max_force = max_force;
        self
    }

    pub fn build(self) -> Result<EdgeAvoidance, SteeringError> {
        Ok(EdgeAvoidance {
            boundary_margin: require_positive(EdgeAvoidance::NAME, "boundary margin", self.boundary_margin)?,
            max_force: require_positive(EdgeAvoidance::NAME, "max force", self.max_force)?,
        })
    }
}

// Shared parameters of the three neighbor-driven rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockingRule {
    radius: f32,
    weight: f32,
    max_force: f32,
}

impl FlockingRule {
    const NAME: &'static str = "flocking rule";

    pub fn builder() -> FlockingRuleBuilder {
        FlockingRuleBuilder::default()
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn max_force(&self) -> f32 {
        self.max_force
    }

    // Neighbors other than the agent itself within the perception radius, with their distance
    fn visible<'a>(
        &'a self,
        agent: &'a Agent,
        neighbors: &'a [Neighbor],
    ) -> impl Iterator<Item = (&'a Neighbor, f32)> + 'a {
        neighbors.iter().filter_map(move |other| {
            if other.id == agent.id {
                return None;
            }
            let d = agent.position.distance(&other.position).ok()?;
            (d > 0.0 && d < self.radius).then_some((other, d))
        })
    }

    fn separation(&self, agent: &Agent, neighbors: &[Neighbor]) -> Result<Vector, SteeringError> {
        let mut away = Vector::ZERO;
        let mut count = 0;
        for (other, d) in self.visible(agent, neighbors) {
            // Weight by distance, closer neighbors push harder
            let mut diff = agent.position;
            diff.sub(&other.position)?.scale(1.0 / (d * d));
            away.add(&diff)?;
            count += 1;
        }
        if count == 0 {
            return Ok(Vector::ZERO);
        }
        Ok(steer_towards(away, agent, self.max_force)? * self.weight)
    }

    fn alignment(&self, agent: &Agent, neighbors: &[Neighbor]) -> Result<Vector, SteeringError> {
        let mut heading = Vector::ZERO;
        let mut count = 0;
        for (other, _) in self.visible(agent, neighbors) {
            heading.add(&other.velocity)?;
            count += 1;
        }
        if count == 0 {
            return Ok(Vector::ZERO);
        }
        heading.scale(1.0 / count as f32);
        Ok(steer_towards(heading, agent, self.max_force)? * self.weight)
    }

    fn cohesion(&self, agent: &Agent, neighbors: &[Neighbor]) -> Result<Vector, SteeringError> {
        let mut center = Vector::ZERO;
        let mut count = 0;
        for (other, _) in self.visible(agent, neighbors) {
            center.add(&other.position)?;
            count += 1;
        }
        if count == 0 {
            return Ok(Vector::ZERO);
        }
        center.scale(1.0 / count as f32).sub(&agent.position)?;
        Ok(steer_towards(center, agent, self.max_force)? * self.weight)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FlockingRuleBuilder {
    radius: f32,
    weight: f32,
    max_force: f32,
}

impl Default for FlockingRuleBuilder {
    fn default() -> Self {
        Self {
            radius: 50.0,
            weight: 1.0,
            max_force: 60.0,
        }
    }
}

impl FlockingRuleBuilder {
    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn max_force(mut self, max_force: f32) -> Self {
        self.max_force = max_force;
        self
    }

    pub fn build(self) -> Result<FlockingRule, SteeringError> {
        if !(self.weight.is_finite() && self.weight >= 0.0) {
            return Err(SteeringError::configuration(
                FlockingRule::NAME,
                format!("weight must be non-negative, got {}", self.weight),
            ));
        }
        Ok(FlockingRule {
            radius: require_positive(FlockingRule::NAME, "radius", self.radius)?,
            weight: self.weight,
            max_force: require_positive(FlockingRule::NAME, "max force", self.max_force)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SteeringStrategy {
    EdgeAvoidance(EdgeAvoidance),
    Separation(FlockingRule),
    Alignment(FlockingRule),
    Cohesion(FlockingRule),
}

impl SteeringStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            SteeringStrategy::EdgeAvoidance(_) => "edge avoidance",
            SteeringStrategy::Separation(_) => "separation",
            SteeringStrategy::Alignment(_) => "alignment",
            SteeringStrategy::Cohesion(_) => "cohesion",
        }
    }

    pub fn force(
        &self,
        ctx: &SteeringContext,
        agent: &Agent,
        neighbors: &[Neighbor],
    ) -> Result<Vector, SteeringError> {
        match self {
            SteeringStrategy::EdgeAvoidance(edges) => edges.force(&ctx.bounds, &agent.position),
            SteeringStrategy::Separation(rule) => rule.separation(agent, neighbors),
            SteeringStrategy::Alignment(rule) => rule.alignment(agent, neighbors),
            SteeringStrategy::Cohesion(rule) => rule.cohesion(agent, neighbors),
        }
    }

    // Force for this tick, or None when the strategy faulted.
    // Faults are logged and never abort the frame.
    pub fn steer(&self, ctx: &SteeringContext, agent: &Agent, neighbors: &[Neighbor]) -> Option<Vector> {
        match self.force(ctx, agent, neighbors) {
            Ok(force) if force.is_finite() => Some(force),
            Ok(force) => {
                warn!(agent = agent.id, strategy = self.name(), ?force, "discarding non-finite steering force");
                None
            }
            Err(error) => {
                warn!(agent = agent.id, strategy = self.name(), %error, "steering strategy contributed no force");
                None
            }
        }
    }
}

impl From<EdgeAvoidance> for SteeringStrategy {
    fn from(edges: EdgeAvoidance) -> Self {
        SteeringStrategy::EdgeAvoidance(edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use std::sync::Arc;

    const EPS: f32 = 1e-4;

    fn arena() -> SteeringContext {
        SteeringContext { bounds: Rect::sized(1000.0, 800.0) }
    }

    fn edges() -> EdgeAvoidance {
        EdgeAvoidance::builder().boundary_margin(100.0).max_force(200.0).build().unwrap()
    }

    fn agent_at(id: usize, x: f32, y: f32, heading: f32) -> Agent {
        Agent::new(id, Vector::new(x, y), heading, 300.0, Species::Guppy, Arc::from(Vec::new()))
    }

    #[test]
    fn left_edge_force_follows_the_quadratic_ramp() {
        let force = edges().force(&arena().bounds, &Vector::new(50.0, 400.0)).unwrap();
        assert!((force.x - 50.0).abs() < EPS);
        assert_eq!(force.y, 0.0);

        for d in [1.0_f32, 25.0, 75.0, 99.0] {
            let force = edges().force(&arena().bounds, &Vector::new(d, 400.0)).unwrap();
            let expected = ((100.0 - d) / 100.0).powi(2) * 200.0;
            assert!((force.x - expected).abs() < EPS, "d={d}");
        }
    }

    #[test]
    fn far_from_edges_there_is_no_force() {
        let force = edges().force(&arena().bounds, &Vector::new(500.0, 400.0)).unwrap();
        assert_eq!(force, Vector::ZERO);
    }

    #[test]
    fn every_edge_pushes_inward() {
        let b = arena().bounds;
        assert!(edges().force(&b, &Vector::new(960.0, 400.0)).unwrap().x < 0.0);
        assert!(edges().force(&b, &Vector::new(500.0, 10.0)).unwrap().y > 0.0);
        assert!(edges().force(&b, &Vector::new(500.0, 790.0)).unwrap().y < 0.0);
    }

    #[test]
    fn corners_combine_per_axis() {
        let force = edges().force(&arena().bounds, &Vector::new(950.0, 750.0)).unwrap();
        assert!((force.x + 50.0).abs() < EPS);
        assert!((force.y + 50.0).abs() < EPS);
    }

    #[test]
    fn outside_the_arena_the_push_saturates() {
        let force = edges().force(&arena().bounds, &Vector::new(-30.0, 400.0)).unwrap();
        assert!((force.x - 200.0).abs() < EPS);
    }

    #[test]
    fn builders_reject_missing_parameters() {
        assert!(matches!(
            EdgeAvoidance::builder().boundary_margin(0.0).build(),
            Err(SteeringError::Configuration { .. })
        ));
        assert!(EdgeAvoidance::builder().max_force(f32::NAN).build().is_err());
        assert!(FlockingRule::builder().radius(-1.0).build().is_err());
        assert!(FlockingRule::builder().weight(-0.5).build().is_err());
        assert!(FlockingRule::builder().weight(0.0).build().is_ok());
    }

    #[test]
    fn empty_arena_is_a_recoverable_configuration_error() {
        let strategy = SteeringStrategy::from(edges());
        let ctx = SteeringContext { bounds: Rect::sized(0.0, 0.0) };
        let agent = agent_at(0, 10.0, 10.0, 0.0);

        assert!(matches!(strategy.force(&ctx, &agent, &[]), Err(SteeringError::Configuration { .. })));
        assert_eq!(strategy.steer(&ctx, &agent, &[]), None);
    }

    #[test]
    fn separation_pushes_away_and_ignores_self() {
        let rule = FlockingRule::builder().radius(50.0).max_force(1000.0).build().unwrap();
        let agent = agent_at(0, 100.0, 100.0, std::f32::consts::FRAC_PI_2);
        let neighbors = [agent.snapshot(), Neighbor { id: 1, position: Vector::new(110.0, 100.0), velocity: Vector::ZERO }];

        let force = SteeringStrategy::Separation(rule).force(&arena(), &agent, &neighbors).unwrap();
        // desired is (-300, 0), current velocity is (0, 300)
        assert!((force.x + 300.0).abs() < 1e-2);
        assert!((force.y + 300.0).abs() < 1e-2);

        let alone = SteeringStrategy::Separation(rule).force(&arena(), &agent, &neighbors[..1]).unwrap();
        assert_eq!(alone, Vector::ZERO);
    }

    #[test]
    fn alignment_matches_neighbor_heading_within_max_force() {
        let rule = FlockingRule::builder().radius(50.0).max_force(10.0).build().unwrap();
        let agent = agent_at(0, 100.0, 100.0, 0.0);
        let neighbors = [Neighbor { id: 1, position: Vector::new(120.0, 100.0), velocity: Vector::new(0.0, 300.0) }];

        let force = SteeringStrategy::Alignment(rule).force(&arena(), &agent, &neighbors).unwrap();
        assert!((force.length() - 10.0).abs() < EPS);
        assert!(force.y > 0.0 && force.x < 0.0);
    }

    #[test]
    fn cohesion_pulls_towards_the_centre_and_respects_weight() {
        let rule = FlockingRule::builder().radius(100.0).max_force(5.0).weight(2.0).build().unwrap();
        let agent = agent_at(0, 100.0, 100.0, 0.0);
        let neighbors = [
            Neighbor { id: 1, position: Vector::new(100.0, 150.0), velocity: Vector::ZERO },
            Neighbor { id: 2, position: Vector::new(100.0, 170.0), velocity: Vector::ZERO },
            // out of range
            Neighbor { id: 3, position: Vector::new(400.0, 100.0), velocity: Vector::ZERO },
        ];

        let force = SteeringStrategy::Cohesion(rule).force(&arena(), &agent, &neighbors).unwrap();
        assert!(force.y > 0.0);
        assert!((force.length() - 10.0).abs() < EPS);
    }
}
