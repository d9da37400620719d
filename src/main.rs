//! Decay Tracker Demo
//!
//! Drives a synthetic mini transport engine through a few events:
//! - primaries are generated with random momenta and registered
//! - each step randomly transports, scatters, or escapes the world
//! - the recorder classifies every step and grows the decay forest

use decay_tracker::{
    EventConfig, EventRecorder, Momentum3, StepRecord, StepStatus, TRANSPORTATION,
};
use rand::Rng;

const N_EVENTS: usize = 3;
const N_PRIMARIES: i32 = 2;
const STEPS_PER_TRACK: usize = 6;
const MOMENTUM_THRESHOLD: f64 = 50.0;

fn main() {
    env_logger::init();

    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║  decay-tracker - step classification & decay forest demo             ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    let config = EventConfig::default()
        .with_escape_band(1, 9, 4)
        .with_momentum_threshold(MOMENTUM_THRESHOLD);
    demo_config(&config);

    let mut recorder = EventRecorder::new(config);
    for event in 0..N_EVENTS {
        demo_event(event, &mut recorder);
    }

    println!("\n✓ Demo completed");
}

fn demo_config(config: &EventConfig) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  1. EVENT CONFIG");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    println!("Escape killing:       {}", config.kill_events_escaping_world);
    println!(
        "Multiplicity band:    [{}, {}] excluding {}",
        config.min_reg_multiplicity, config.max_reg_multiplicity, config.excluded_multiplicity
    );
    println!(
        "Transfer threshold:   {:.1} (momentum² units)\n",
        config.allowed_momentum_transfer
    );
}

fn demo_event(event: usize, recorder: &mut EventRecorder) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  EVENT {}", event);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    let mut rng = rand::thread_rng();
    recorder.begin_event();

    'tracks: for track_id in 1..=N_PRIMARIES {
        let multiplicity = rng.gen_range(1..=3);
        let primary = recorder.register_primary(track_id, multiplicity);
        let mut momentum = random_momentum(&mut rng, 511.0);
        println!(
            "primary track {} generated (multiplicity {}, |p| = {:.1})",
            track_id,
            multiplicity,
            momentum.mag()
        );

        for _ in 0..STEPS_PER_TRACK {
            let step = random_step(&mut rng, track_id, &mut momentum, primary.clone());
            let outcome = recorder.on_step(&step);
            if outcome.is_record() {
                println!(
                    "  · {} on track {}: recorded (multiplicity now {})",
                    step.process,
                    track_id,
                    primary.borrow().effective_multiplicity()
                );
            }
            if outcome.is_abort() {
                println!("  · track {} escaped the world: event aborted", track_id);
                break 'tracks;
            }
            if step.status == StepStatus::WorldBoundary {
                println!("  · track {} left the world (not aborted)", track_id);
                continue 'tracks;
            }
        }
    }

    println!("\nEvent summary: {}", recorder.summary());
    let stats = recorder.stats();
    if stats.n_nodes > 0 {
        match recorder.graph().to_json() {
            Ok(json) => println!("\nDecay forest ({}):\n{}", stats, json),
            Err(e) => eprintln!("forest export failed: {}", e),
        }
    }
    println!();
}

fn random_momentum(rng: &mut impl Rng, scale: f64) -> Momentum3 {
    Momentum3::new(
        rng.gen_range(-scale..scale),
        rng.gen_range(-scale..scale),
        rng.gen_range(-scale..scale),
    )
}

/// One synthetic step: mostly transportation, sometimes a scatter that
/// sheds a random fraction of the momentum, occasionally a world escape
fn random_step(
    rng: &mut impl Rng,
    track_id: i32,
    momentum: &mut Momentum3,
    primary: decay_tracker::PrimaryHandle,
) -> StepRecord {
    let pre = *momentum;
    let roll: f64 = rng.gen_range(0.0..1.0);

    if roll < 0.15 {
        // escaping the world boundary, momentum unchanged
        StepRecord::new(track_id, 0, pre, pre, TRANSPORTATION)
            .with_status(StepStatus::WorldBoundary)
            .with_primary(primary)
    } else if roll < 0.55 {
        // plain transportation step
        StepRecord::new(track_id, 0, pre, pre, TRANSPORTATION).with_primary(primary)
    } else {
        // scatter: shed up to a quarter of |p|²
        let post = pre.scaled(rng.gen_range(0.85..0.995));
        *momentum = post;
        let process = if rng.gen_bool(0.8) { "compt" } else { "phot" };
        StepRecord::new(track_id, 0, pre, post, process).with_primary(primary)
    }
}
