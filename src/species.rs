/*
 * Species Module
 *
 * Agent variants differ only in how they are drawn and which steering
 * strategies they carry. Both are plain data here.
 *
 * - Guppy: large, fast, only avoids the arena edges
 * - Minnow: small, slower, avoids edges and flocks with its neighbors
 */

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::params::SimulationParams;
use crate::steering::{EdgeAvoidance, FlockingRule, SteeringError, SteeringStrategy};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeciesError {
    #[error("unknown species `{0}` (expected one of: guppy, minnow)")]
    Unknown(String),
}

// Triangle drawn nose-first along the heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyShape {
    pub length: f32,
    pub half_width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Species {
    #[default]
    Guppy,
    Minnow,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::Guppy, Species::Minnow];

    pub fn name(&self) -> &'static str {
        match self {
            Species::Guppy => "guppy",
            Species::Minnow => "minnow",
        }
    }

    pub fn default_speed(&self) -> f32 {
        match self {
            Species::Guppy => 300.0,
            Species::Minnow => 150.0,
        }
    }

    pub fn shape(&self) -> BodyShape {
        match self {
            Species::Guppy => BodyShape { length: 20.0, half_width: 6.0 },
            Species::Minnow => BodyShape { length: 15.0, half_width: 4.0 },
        }
    }

    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Species::Guppy => (232, 229, 195),
            Species::Minnow => (140, 200, 235),
        }
    }

    // Strategy list for this species, validated once and shared by every member
    pub fn strategies(&self, params: &SimulationParams) -> Result<Vec<SteeringStrategy>, SteeringError> {
        let edges = EdgeAvoidance::builder()
            .boundary_margin(params.boundary_margin)
            .max_force(params.edge_max_force)
            .build()?;

        match self {
            Species::Guppy => Ok(vec![edges.into()]),
            Species::Minnow => {
                let rule = |radius: f32, weight: f32| {
                    FlockingRule::builder()
                        .radius(radius)
                        .weight(weight)
                        .max_force(params.flocking_max_force)
                        .build()
                };
                Ok(vec![
                    edges.into(),
                    SteeringStrategy::Separation(rule(params.separation_radius, params.separation_weight)?),
                    SteeringStrategy::Alignment(rule(params.alignment_radius, params.alignment_weight)?),
                    SteeringStrategy::Cohesion(rule(params.cohesion_radius, params.cohesion_weight)?),
                ])
            }
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Species {
    type Err = SpeciesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|species| species.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SpeciesError::Unknown(s.to_string()))
    }
}
