use multigrid_core::seed::set_deterministic_mode;
use multigrid_core::{SimConfig, WildfireSim};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::time::Instant;

fn main() {
    let config = SimConfig {
        grid_width: 128,
        grid_height: 128,
        num_agents: 64,
        initial_fires: 32,
        spread_probability: 0.3,
        seed: 42,
        ..SimConfig::default()
    };
    println!(
        "Benchmarking {}x{} grid at {}px tiles with {} agents",
        config.grid_width, config.grid_height, config.tile_size, config.num_agents
    );

    let mut sim = WildfireSim::try_new(config.clone(), ChaCha12Rng::seed_from_u64(config.seed))
        .expect("valid benchmark config");
    for _ in 0..10 {
        sim.step();
    }

    let frames = 20;

    set_deterministic_mode(true);
    let start = Instant::now();
    for _ in 0..frames {
        sim.render().expect("render frame");
    }
    let sequential = start.elapsed();
    println!("Time for {} frames, sequential: {:?}", frames, sequential);
    println!("Avg time per frame (sequential): {:?}", sequential / frames);

    set_deterministic_mode(false);
    let start = Instant::now();
    for _ in 0..frames {
        sim.render().expect("render frame");
    }
    let parallel = start.elapsed();
    println!("Time for {} frames, parallel: {:?}", frames, parallel);
    println!("Avg time per frame (parallel): {:?}", parallel / frames);

    let same = {
        set_deterministic_mode(true);
        let a = sim.render().expect("render frame");
        set_deterministic_mode(false);
        let b = sim.render().expect("render frame");
        a == b
    };
    println!("Parallel output identical to sequential: {}", same);
}
