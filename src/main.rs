//! Bouncing Balls entry point
//!
//! Runs a scenario headless and prints the final ball states as JSON.
//!
//! ```text
//! bouncing-balls [scenario.json]
//! RUST_LOG=debug bouncing-balls scenario.json
//! ```

use bouncing_balls::{ConfigError, Scenario};

/// Progress is logged this many times per run
const REPORTS: u64 = 10;

fn main() {
    env_logger::init();
    log::info!("Bouncing Balls (native) starting...");

    if let Err(err) = run() {
        log::error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ConfigError> {
    let scenario = match std::env::args().nth(1) {
        Some(path) => Scenario::load_from(path)?,
        None => {
            log::info!("No scenario given, using the default 4x3 world");
            Scenario::default()
        }
    };

    let mut world = scenario.build_world()?;
    let report_every = (scenario.steps / REPORTS).max(1);
    log::info!(
        "Running {} steps of {:.4} ({} mode)",
        scenario.steps,
        scenario.dt,
        world.settings().contact_mode.as_str()
    );

    for n in 1..=scenario.steps {
        world.step(scenario.dt);
        if n % report_every == 0 {
            let momentum = world.momentum();
            log::info!(
                "t={:.3} energy={:.6} momentum=({:.6}, {:.6})",
                world.time(),
                world.kinetic_energy(),
                momentum.x,
                momentum.y
            );
        }
    }

    let json = serde_json::to_string_pretty(world.balls())?;
    println!("{}", json);
    Ok(())
}
