/*
 * Aquarium
 *
 * A school of fish steered by pluggable strategies:
 * 1. Edge avoidance: turn back before leaving the window
 * 2. Separation, alignment and cohesion for schooling species
 *
 * Neighbor lookups go through a quadtree rebuilt every frame. Space pauses,
 * B shows the quadtree and R respawns the population.
 * Set RUST_LOG (e.g. RUST_LOG=aquarium=debug) to control logging.
 */

use aquarium::app;
use aquarium::CliArgs;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aquarium=info")))
        .init();

    let params = CliArgs::parse().into_params();
    app::launch(params);
}
