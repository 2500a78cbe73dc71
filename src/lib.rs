/*
 * Aquarium - Module Definitions
 *
 * This file defines the module structure for the aquarium: agents steered by
 * pluggable strategies, with neighbor lookups served by a double-buffered
 * quadtree rebuilt every frame.
 */

// Re-export key components for easier access
pub use agent::{Agent, Neighbor};
pub use bounds::{Rect, ScreenBounds};
pub use clock::{ClockState, SimulationClock};
pub use debug::{DebugControls, DebugSignal};
pub use error::SimulationError;
pub use params::{CliArgs, SimulationParams};
pub use quadtree::{Located, QuadTree};
pub use renderer::{DisplayList, Renderer};
pub use species::Species;
pub use steering::{EdgeAvoidance, FlockingRule, SteeringContext, SteeringStrategy};
pub use vector::Vector;
pub use world::{IndexSettings, Simulation};

// Define modules
pub mod agent;
pub mod app;
pub mod bounds;
pub mod clock;
pub mod debug;
pub mod error;
pub mod input;
pub mod params;
pub mod quadtree;
pub mod renderer;
pub mod species;
pub mod steering;
pub mod ui;
pub mod vector;
pub mod world;
