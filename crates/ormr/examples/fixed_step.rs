//! Fixed-timestep driver: a physics-style integration running at 50 Hz
//! inside a variable-rate frame loop, with a tracked system doing the work.
//!
//! Run with `RUST_LOG=trace cargo run --example fixed_step` to watch the
//! per-system timing output.

use std::time::{Duration, Instant};

use ormr::prelude::*;

struct Position(f32);
impl Component for Position {}

struct Velocity(f32);
impl Component for Velocity {}

struct Integrate;

impl System for Integrate {
    type Query = (&'static mut Position, &'static Velocity);

    fn update(&mut self, mut query: Query<'_, Self::Query>) {
        query.for_each(|_, _, (position, velocity)| {
            position.0 += velocity.0 * FIXED_DT;
        });
    }
}

const FIXED_DT: f32 = 1.0 / 50.0;

fn main() {
    env_logger::init();

    let mut app = App::new()
        .add_startup_system(|world: &mut World| {
            for i in 0..3 {
                world
                    .spawn()
                    .insert(Position(0.0))
                    .insert(Velocity(1.0 + i as f32));
            }
        })
        .add_tracked_system(Stage::FixedUpdate, Integrate);

    app.run_startup();

    // Drive two simulated seconds of wall time through the accumulator.
    let mut accumulator = Duration::ZERO;
    let mut previous = Instant::now();
    let deadline = previous + Duration::from_secs(2);
    let step = Duration::from_secs_f32(FIXED_DT);

    while Instant::now() < deadline {
        let now = Instant::now();
        accumulator += now - previous;
        previous = now;

        while accumulator >= step {
            app.run_fixed_update();
            accumulator -= step;
        }
        app.run_update();

        std::thread::sleep(Duration::from_millis(7));
    }

    let state = app.world.query_state::<&Position>(QueryFilter::new());
    app.world.query(&state).for_each(|_, entity, position| {
        println!("{:?} travelled {:.2} units", entity, position.0);
    });
}
