//! Roto Roulette entry point
//!
//! Headless demo: spins the ball to a chosen (or random) pocket, printing
//! session notifications as they fire. Usage:
//!
//! ```text
//! roto-roulette [pocket] [seed]
//! ```

use roto_roulette::SpinConfig;
use roto_roulette::consts::SIM_DT;
use roto_roulette::sim::{SessionEvent, SpinOutcome, SpinState, tick};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let target: Option<usize> = args.next().and_then(|arg| arg.parse().ok());
    let seed: u64 = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xC0FFEE);

    let mut state = SpinState::new(SpinConfig::default(), 800.0, 800.0, seed);
    log::info!(
        "board 800x800, {} pockets, wheel {:.2} rot/s, seed {seed}",
        state.config.pocket_count,
        state.config.wheel_rps
    );

    let request = match target {
        Some(target) => SessionEvent::SpinRequested { target },
        None => SessionEvent::RandomSpinRequested,
    };
    tick(&mut state, std::slice::from_ref(&request), SIM_DT);

    // Run through the spin, the blend, and a bit of locked rotation
    let total = state.config.spin_duration + state.config.blend_duration + 2.0;
    for _ in 0..(total / SIM_DT) as usize {
        tick(&mut state, &[], SIM_DT);
        for event in state.drain_events() {
            match event {
                SpinOutcome::BallLanded { pocket } => {
                    let pos = state.ball_position();
                    println!(
                        "ball landed on pocket {pocket} at ({:.1}, {:.1})",
                        pos.x, pos.y
                    );
                }
                SpinOutcome::SpinComplete { pocket } => {
                    println!("spin complete: pocket {pocket}");
                }
                SpinOutcome::CountdownTick { seconds_left } => {
                    println!("next round in {seconds_left}s");
                }
                SpinOutcome::CountdownFinished => println!("countdown finished"),
                SpinOutcome::ConnectionChanged { connected } => {
                    println!("connection: {connected}");
                }
            }
        }
    }

    state.shutdown();
}
