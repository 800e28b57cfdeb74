//=========================================================================
// Patrol Demo
//=========================================================================
//
// Guards walk their routes in an entity group while a lantern effect
// flickers. A second thread toggles the lantern group on and off through
// the control channel.
//
// Run with:
//   RUST_LOG=debug cargo run --example patrol
//
//=========================================================================

use std::thread;
use std::time::Duration;

use log::info;
use phasebound::prelude::*;

//=== Objects =============================================================

struct Guard {
    name: &'static str,
    position: i32,
    step: i32,
    route: (i32, i32),
}

impl GameObject for Guard {
    fn update_active(&mut self, _ctx: &mut TickContext) {
        self.position += self.step;
        if self.position <= self.route.0 || self.position >= self.route.1 {
            self.step = -self.step;
        }
    }

    fn update_mid(&mut self, ctx: &mut TickContext) {
        info!("{} at {} (active tick {})", self.name, self.position, ctx.ticks(Phase::Active));
    }
}

struct Lantern {
    flickers: u32,
}

impl GameObject for Lantern {
    fn update_active(&mut self, _ctx: &mut TickContext) {
        self.flickers += 1;
    }
}

//=== Main ================================================================

fn main() {
    env_logger::init();

    let mut lanterns = None;

    let engine = EngineBuilder::new()
        .with_cadence(Phase::Mid, Duration::from_millis(250))
        .build()
        .init(|registry| {
            let entities = registry.dyn_manager_mut(ManagerKind::Entity).unwrap();
            let patrol = entities.add_named_group("patrol");
            for (name, start) in [("Ada", 0), ("Bram", 5)] {
                entities.add_member(
                    patrol,
                    Box::new(Guard {
                        name,
                        position: start,
                        step: 1,
                        route: (0, 10),
                    }),
                );
            }
            entities.open_group(patrol);

            let effects = registry.dyn_manager_mut(ManagerKind::Effect).unwrap();
            let group = effects.add_named_group("lanterns");
            effects.add_member(group, Box::new(Lantern { flickers: 0 }));
            lanterns = Some(group);
        });

    let Some(lanterns) = lanterns else {
        return;
    };

    let handle = engine.run();
    let control = handle.sender();

    let switcher = thread::spawn(move || {
        for _ in 0..4 {
            thread::sleep(Duration::from_millis(200));
            let toggle = ControlEvent::Group(GroupCommand::Toggle(lanterns));
            if control.send(toggle).is_err() {
                break;
            }
        }
    });

    thread::sleep(Duration::from_secs(1));
    if switcher.join().is_err() {
        log::error!("Switcher thread panicked");
    }

    match handle.shutdown() {
        Ok(registry) => info!(
            "Finished: {} active ticks, {} groups open",
            registry.ticks(Phase::Active),
            registry.active_group_count()
        ),
        Err(e) => log::error!("{}", e),
    }
}
