//! Scene-tree walkthrough: builds a small hierarchy with the spawn builder,
//! wires scoped observers at several depths, and shows a targeted trigger
//! bubbling from a leaf to the root, then tears a subtree down.

use ormr::prelude::*;

struct Name(&'static str);
impl Component for Name {}

/// Fired at a leaf; every ancestor hears it on the way up.
struct Clicked;

fn label(world: &World, entity: Entity) -> &'static str {
    world.get::<Name>(entity).map(|name| name.0).unwrap_or("?")
}

fn main() {
    env_logger::init();

    let mut world = World::new();

    let mut button = None;
    let window = world
        .spawn()
        .insert(Name("window"))
        .observe::<Clicked>(|world, trigger| {
            let here = trigger.observer().expect("scoped observer");
            println!("  bubbled to {}", label(world, here));
        })
        .with_children(|children| {
            let mut panel = children.spawn();
            panel.insert(Name("panel")).observe::<Clicked>(|world, trigger| {
                let here = trigger.observer().expect("scoped observer");
                println!("  bubbled to {}", label(world, here));
            });
            panel.with_children(|children| {
                button = Some(
                    children
                        .spawn()
                        .insert(Name("button"))
                        .observe::<Clicked>(|world, trigger| {
                            let target = trigger.target().expect("targeted trigger");
                            println!("  clicked {}", label(world, target));
                        })
                        .id(),
                );
            });
        })
        .id();

    world.observe::<Clicked>(|_, _| println!("  global: click seen"));

    let button = button.expect("spawned in with_children");
    println!("trigger at the leaf:");
    world.trigger_targets(Clicked, button);

    println!("\ntree before teardown: {} entities", world.entity_count());
    let panel = world.parent_of(button).expect("button has a parent");
    world.despawn_recursive(panel);
    world.trigger_targets(Clicked, button); // still alive until the flush

    // A schedule tick would do this; standalone worlds flush through one.
    let mut schedule = Schedule::new();
    schedule.run_update(&mut world);

    println!("tree after teardown:  {} entities", world.entity_count());
    assert_eq!(world.children_of(window), &[] as &[Entity]);
}
