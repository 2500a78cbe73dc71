use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use aquarium::{
    Agent, DebugControls, DisplayList, IndexSettings, Rect, Simulation, SimulationParams, Species, Vector,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const ARENA: Rect = Rect::sized(800.0, 600.0);
const FRAME: u64 = 16;

fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn seeded(species: Species, num_agents: usize, seed: u64) -> Simulation {
    let mut params = SimulationParams::for_species(species);
    params.num_agents = num_agents;
    let mut rng = StdRng::seed_from_u64(seed);
    Simulation::from_params(&params, ARENA, &mut rng).expect("default parameters are valid")
}

fn run_frames(sim: &mut Simulation, frames: u64, screen: &Rect) -> DisplayList {
    let mut controls = DebugControls::new();
    let mut list = DisplayList::new();
    for frame in 0..frames {
        sim.frame(ms(frame * FRAME), screen, &mut controls, &mut list);
    }
    list
}

#[test]
fn three_agents_see_only_their_own_leaf() {
    let strategies: Arc<[_]> = Arc::from(Vec::new());
    let agents = vec![
        Agent::new(0, Vector::new(10.0, 10.0), 0.0, 0.0, Species::Guppy, Arc::clone(&strategies)),
        Agent::new(1, Vector::new(10.0, 12.0), 0.0, 0.0, Species::Guppy, Arc::clone(&strategies)),
        Agent::new(2, Vector::new(900.0, 10.0), 0.0, 0.0, Species::Guppy, strategies),
    ];
    let settings = IndexSettings { max_objects: 2, max_depth: 10, neighbor_radius: None };
    let arena = Rect::sized(1000.0, 1000.0);
    let mut sim = Simulation::new(agents, arena, settings);
    run_frames(&mut sim, 1, &arena);

    let near: Vec<usize> = sim.neighbors_at(&Vector::new(10.0, 10.0)).iter().map(|n| n.id).collect();
    let far: Vec<usize> = sim.neighbors_at(&Vector::new(900.0, 10.0)).iter().map(|n| n.id).collect();
    assert_eq!(near, vec![0, 1]);
    assert_eq!(far, vec![2]);
}

#[test]
fn update_order_does_not_change_the_outcome() {
    let forward = seeded(Species::Minnow, 120, 11);
    let mut reversed_agents = forward.agents().to_vec();
    reversed_agents.reverse();
    let mut reversed = Simulation::new(reversed_agents, ARENA, forward.settings());
    let mut forward = forward;

    run_frames(&mut forward, 3, &ARENA);
    run_frames(&mut reversed, 3, &ARENA);

    let by_id: HashMap<usize, Vector> = reversed.agents().iter().map(|a| (a.id, a.position)).collect();
    for agent in forward.agents() {
        let other = by_id[&agent.id];
        assert!(
            approx_eq(agent.position.x, other.x, 1e-2) && approx_eq(agent.position.y, other.y, 1e-2),
            "agent {} diverged: {:?} vs {:?}",
            agent.id,
            agent.position,
            other
        );
    }
}

#[test]
fn agents_keep_their_cruising_speed() {
    for species in Species::ALL {
        let mut sim = seeded(species, 200, 3);
        run_frames(&mut sim, 90, &ARENA);
        for agent in sim.agents() {
            let speed = agent.velocity.length();
            assert!(
                approx_eq(speed, species.default_speed(), 1e-2),
                "{species} agent {} drifted to speed {speed}",
                agent.id
            );
            assert!(agent.position.is_finite());
        }
    }
}

#[test]
fn resuming_after_a_long_pause_does_not_jump() {
    let mut sim = seeded(Species::Guppy, 30, 5);
    let mut controls = DebugControls::new();
    let mut list = DisplayList::new();

    sim.frame(ms(0), &ARENA, &mut controls, &mut list);
    sim.frame(ms(16), &ARENA, &mut controls, &mut list);

    controls.paused = true;
    let mut now = 16;
    while now < 10_000 {
        now += FRAME;
        assert_eq!(sim.frame(ms(now), &ARENA, &mut controls, &mut list), None);
    }

    controls.paused = false;
    let step = sim
        .frame(ms(now + FRAME), &ARENA, &mut controls, &mut list)
        .expect("running frame");
    assert!(approx_eq(step, 0.016, 1e-6), "resumed with step {step}");
}

#[test]
fn a_stalled_host_is_clamped_to_the_maximum_step() {
    let mut sim = seeded(Species::Guppy, 10, 6);
    let mut controls = DebugControls::new();
    let mut list = DisplayList::new();

    assert_eq!(sim.frame(ms(0), &ARENA, &mut controls, &mut list), Some(0.0));
    assert_eq!(sim.frame(ms(5_000), &ARENA, &mut controls, &mut list), Some(0.3));
}

#[test]
fn the_index_follows_the_screen_size() {
    let mut sim = seeded(Species::Guppy, 100, 8);
    run_frames(&mut sim, 2, &ARENA);
    assert_eq!(sim.next_index().bounds(), ARENA);
    assert_eq!(sim.next_index().len(), 100);

    let smaller = Rect::sized(400.0, 300.0);
    let mut controls = DebugControls::new();
    let mut list = DisplayList::new();
    sim.frame(ms(100), &smaller, &mut controls, &mut list);

    assert_eq!(sim.next_index().bounds(), smaller);
    assert_eq!(sim.current_index().map(|index| index.bounds()), Some(ARENA));
    let inside = sim.agents().iter().filter(|a| smaller.contains(&a.position)).count();
    assert_eq!(sim.next_index().len(), inside);
    // every agent is still drawn, indexed or not
    assert_eq!(list.arena(), smaller);
    assert_eq!(list.agent_count(), 100);
}

#[test]
fn a_zero_sized_screen_does_not_poison_the_population() {
    let mut sim = seeded(Species::Minnow, 50, 9);
    run_frames(&mut sim, 2, &ARENA);

    let mut controls = DebugControls::new();
    let mut list = DisplayList::new();
    sim.frame(ms(100), &Rect::sized(0.0, 0.0), &mut controls, &mut list);
    assert!(sim.next_index().is_empty());

    sim.frame(ms(116), &ARENA, &mut controls, &mut list);
    sim.frame(ms(132), &ARENA, &mut controls, &mut list);
    for agent in sim.agents() {
        assert!(agent.position.is_finite() && agent.velocity.is_finite());
        assert!(approx_eq(agent.velocity.length(), Species::Minnow.default_speed(), 1e-2));
    }
    assert_eq!(list.agent_count(), 50);
}

#[test]
fn every_running_frame_draws_each_agent_once() {
    let mut sim = seeded(Species::Minnow, 75, 10);
    let mut controls = DebugControls::new();
    let mut list = DisplayList::new();

    for frame in 0..10 {
        sim.frame(ms(frame * FRAME), &ARENA, &mut controls, &mut list);
        assert_eq!(list.agent_count(), 75);
        assert_eq!(list.region_count(), 0);
    }

    controls.toggle_spatial_index();
    sim.frame(ms(10 * FRAME), &ARENA, &mut controls, &mut list);
    assert_eq!(list.agent_count(), 75);
    assert_eq!(list.region_count(), sim.next_index().node_count());
}

#[test]
fn radius_lookup_sees_across_leaf_boundaries() {
    let strategies: Arc<[_]> = Arc::from(Vec::new());
    // 199 and 201 straddle the first vertical split of a 400 wide arena
    let agents = vec![
        Agent::new(0, Vector::new(199.0, 50.0), 0.0, 0.0, Species::Guppy, Arc::clone(&strategies)),
        Agent::new(1, Vector::new(201.0, 50.0), 0.0, 0.0, Species::Guppy, Arc::clone(&strategies)),
        Agent::new(2, Vector::new(10.0, 10.0), 0.0, 0.0, Species::Guppy, strategies),
    ];
    let arena = Rect::sized(400.0, 400.0);

    let leaf_only = IndexSettings { max_objects: 1, max_depth: 10, neighbor_radius: None };
    let mut sim = Simulation::new(agents.clone(), arena, leaf_only);
    run_frames(&mut sim, 1, &arena);
    let ids: Vec<usize> = sim.neighbors_at(&Vector::new(199.0, 50.0)).iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![0]);

    let with_radius = IndexSettings { neighbor_radius: Some(5.0), ..leaf_only };
    let mut sim = Simulation::new(agents, arena, with_radius);
    run_frames(&mut sim, 1, &arena);
    let mut ids: Vec<usize> = sim.neighbors_at(&Vector::new(199.0, 50.0)).iter().map(|n| n.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1]);
}
