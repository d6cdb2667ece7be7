use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use strata_core::ecs::{ComponentRegistry, Entity, Signature, Store, StoreConfig, StoreError};
use strata_core::{register, spawn};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Health(i32);

#[allow(dead_code)]
struct Marker<const N: usize>;

fn store_with(max_entities: u32) -> Store {
    let config = StoreConfig::default()
        .with_max_entities(max_entities)
        .with_page_size(16);
    let mut store = Store::with_registry(config, Arc::new(ComponentRegistry::new()));
    register!(store, Position, Velocity, Health);
    store
}

fn store() -> Store {
    store_with(1024)
}

fn pos(x: f32, y: f32) -> Position {
    Position { x, y }
}

fn sorted(mut entities: Vec<Entity>) -> Vec<Entity> {
    entities.sort();
    entities
}

#[test]
fn add_then_get_returns_value() {
    let mut store = store();
    let e = store.create();
    store.add_component(e, pos(3.0, 4.0));

    assert_eq!(store.get_component::<Position>(e), Some(&pos(3.0, 4.0)));
    assert!(store.has_component::<Position>(e));
    assert!(!store.has_component::<Velocity>(e));
}

#[test]
fn swap_removal_keeps_other_values() {
    let mut store = store();
    let entities: Vec<_> = (0..6).map(|_| store.create()).collect();
    for (i, &e) in entities.iter().enumerate() {
        store.add_component(e, Health(i as i32 * 10));
    }

    store.remove_component::<Health>(entities[1]);
    store.remove_component::<Health>(entities[4]);

    for (i, &e) in entities.iter().enumerate() {
        let expected = match i {
            1 | 4 => None,
            _ => Some(Health(i as i32 * 10)),
        };
        assert_eq!(store.get_component::<Health>(e).copied(), expected);
    }
    assert_eq!(store.entities_with::<Health>().len(), 4);
}

#[test]
fn signature_mirrors_pool_membership() {
    let mut store = store();
    let ids = [
        store.pools().id_of::<Position>(),
        store.pools().id_of::<Velocity>(),
        store.pools().id_of::<Health>(),
    ];
    let entities: Vec<_> = (0..8).map(|_| store.create()).collect();

    for (i, &e) in entities.iter().enumerate() {
        if i % 2 == 0 {
            store.add_component(e, pos(i as f32, 0.0));
        }
        if i % 3 == 0 {
            store.add_component(e, Velocity { x: 1.0, y: 1.0 });
        }
        if i % 4 == 0 {
            store.add_component(e, Health(1));
        }
    }
    store.remove_component::<Velocity>(entities[3]);
    store.clear::<Health>();

    for &e in &entities {
        let sig = store.signature(e);
        assert_eq!(sig.contains(ids[0]), store.has_component::<Position>(e));
        assert_eq!(sig.contains(ids[1]), store.has_component::<Velocity>(e));
        assert_eq!(sig.contains(ids[2]), store.has_component::<Health>(e));
    }
}

#[test]
fn view_yields_exactly_the_matching_entities() {
    let mut store = store();
    let mut expected = BTreeSet::new();
    for i in 0..50 {
        let e = store.create();
        if i % 2 == 0 {
            store.add_component(e, pos(0.0, 0.0));
        }
        if i % 5 == 0 {
            store.add_component(e, Velocity { x: 0.0, y: 0.0 });
        }
        if i % 10 == 0 {
            expected.insert(e);
        }
    }

    let mut seen = Vec::new();
    store
        .view::<(Position, Velocity)>()
        .each(|e, (_pos, _vel)| seen.push(e));

    assert_eq!(seen.len(), expected.len());
    assert_eq!(seen.into_iter().collect::<BTreeSet<_>>(), expected);
}

#[test]
fn repeated_view_reuses_cache() {
    let mut store = store();
    for i in 0..10 {
        let e = store.create();
        store.add_component(e, pos(i as f32, 0.0));
    }

    let (first_id, first) = {
        let mut view = store.view::<(Position,)>();
        (view.id(), view.entities())
    };
    let mut view = store.view::<(Position,)>();
    assert_eq!(view.id(), first_id);
    assert_eq!(view.entities(), first);
    assert_eq!(view.rebuild_count(), 1);
    assert_eq!(store.view_count(), 1);
}

#[test]
fn overwrite_is_visible_without_rebuild() {
    let mut store = store();
    let e = store.create();
    store.add_component(e, pos(1.0, 1.0));
    assert_eq!(store.view::<(Position,)>().len(), 1);

    store.add_component(e, pos(9.0, 9.0));

    let mut values = Vec::new();
    let view = store.view::<(Position,)>();
    assert_eq!(view.rebuild_count(), 1);
    view.each(|_, (p,)| values.push(*p));
    assert_eq!(values, vec![pos(9.0, 9.0)]);
}

#[test]
fn structural_change_rebuilds_view() {
    let mut store = store();
    let a = store.create();
    store.add_component(a, pos(0.0, 0.0));
    assert_eq!(store.view::<(Position,)>().len(), 1);

    let b = store.create();
    store.add_component(b, pos(1.0, 0.0));

    let mut view = store.view::<(Position,)>();
    assert_eq!(sorted(view.entities()), vec![a, b]);
    assert_eq!(view.rebuild_count(), 2);
}

#[test]
fn destruction_is_deferred_until_update() {
    let mut store = store();
    let e = store.create();
    store.add_component(e, pos(5.0, 5.0));

    store.destroy(e);
    assert!(store.valid(e));
    assert!(store.is_pending_destroy(e));
    assert_eq!(store.get_component::<Position>(e), Some(&pos(5.0, 5.0)));
    assert_eq!(store.view::<(Position,)>().entities(), vec![e]);

    store.update();
    assert!(!store.valid(e));
    assert!(store.get_component::<Position>(e).is_none());
    assert!(store.view::<(Position,)>().is_empty());
    assert_eq!(store.signature(e), Signature::EMPTY);
}

#[test]
fn walkthrough_position_view() {
    let mut store = store_with(100);
    let e0 = store.create();
    let e1 = store.create();
    let e2 = store.create();
    assert_eq!([e0.id(), e1.id(), e2.id()], [0, 1, 2]);

    store.add_component(e0, pos(0.0, 0.0));
    store.add_component(e2, pos(2.0, 2.0));
    store.add_component(e1, Velocity { x: 1.0, y: 1.0 });

    let mut seen = Vec::new();
    store.view::<(Position,)>().each(|e, (p,)| {
        p.x += 1.0;
        seen.push(e);
    });
    assert_eq!(sorted(seen), vec![e0, e2]);
    assert_eq!(store.get_component::<Position>(e2), Some(&pos(3.0, 2.0)));

    store.destroy(e0);
    store.update();
    assert_eq!(store.view::<(Position,)>().entities(), vec![e2]);
}

#[test]
fn entity_capacity_yields_none() {
    let mut store = store_with(2);
    assert!(!store.create().is_none());
    assert!(!store.create().is_none());
    assert!(store.create().is_none());
    assert_eq!(store.try_create(), Err(StoreError::EntityCapacity { max: 2 }));
}

#[test]
fn sixty_fifth_component_type_is_rejected() {
    let mut store = Store::with_registry(
        StoreConfig::default().with_max_entities(8),
        Arc::new(ComponentRegistry::new()),
    );
    register!(store, Marker<0>, Marker<1>, Marker<2>, Marker<3>, Marker<4>, Marker<5>, Marker<6>, Marker<7>, Marker<8>, Marker<9>, Marker<10>, Marker<11>, Marker<12>, Marker<13>, Marker<14>, Marker<15>, Marker<16>, Marker<17>, Marker<18>, Marker<19>, Marker<20>, Marker<21>, Marker<22>, Marker<23>, Marker<24>, Marker<25>, Marker<26>, Marker<27>, Marker<28>, Marker<29>, Marker<30>, Marker<31>, Marker<32>, Marker<33>, Marker<34>, Marker<35>, Marker<36>, Marker<37>, Marker<38>, Marker<39>, Marker<40>, Marker<41>, Marker<42>, Marker<43>, Marker<44>, Marker<45>, Marker<46>, Marker<47>, Marker<48>, Marker<49>, Marker<50>, Marker<51>, Marker<52>, Marker<53>, Marker<54>, Marker<55>, Marker<56>, Marker<57>, Marker<58>, Marker<59>, Marker<60>, Marker<61>, Marker<62>, Marker<63>);

    let err = store.try_register::<Position>().unwrap_err();
    assert!(matches!(err, StoreError::ComponentCapacity { id: 64, max: 64, .. }));
}

#[test]
#[should_panic(expected = "component limit of 64")]
fn sixty_fifth_component_type_is_fatal() {
    let mut store = Store::with_registry(
        StoreConfig::default().with_max_entities(8),
        Arc::new(ComponentRegistry::new()),
    );
    register!(store, Marker<0>, Marker<1>, Marker<2>, Marker<3>, Marker<4>, Marker<5>, Marker<6>, Marker<7>, Marker<8>, Marker<9>, Marker<10>, Marker<11>, Marker<12>, Marker<13>, Marker<14>, Marker<15>, Marker<16>, Marker<17>, Marker<18>, Marker<19>, Marker<20>, Marker<21>, Marker<22>, Marker<23>, Marker<24>, Marker<25>, Marker<26>, Marker<27>, Marker<28>, Marker<29>, Marker<30>, Marker<31>, Marker<32>, Marker<33>, Marker<34>, Marker<35>, Marker<36>, Marker<37>, Marker<38>, Marker<39>, Marker<40>, Marker<41>, Marker<42>, Marker<43>, Marker<44>, Marker<45>, Marker<46>, Marker<47>, Marker<48>, Marker<49>, Marker<50>, Marker<51>, Marker<52>, Marker<53>, Marker<54>, Marker<55>, Marker<56>, Marker<57>, Marker<58>, Marker<59>, Marker<60>, Marker<61>, Marker<62>, Marker<63>);
    store.register::<Health>();
}

#[test]
#[should_panic(expected = "is not registered")]
fn unregistered_component_is_fatal() {
    let mut store = Store::with_registry(StoreConfig::default(), Arc::new(ComponentRegistry::new()));
    let e = store.create();
    store.add_component(e, Health(1));
}

#[test]
fn spawn_and_entity_handle() {
    let mut store = store();
    let e = spawn!(store, pos(1.0, 2.0), Health(7));
    assert!(store.has_component::<Position>(e));

    let mut handle = store.entity_mut(e);
    handle.add(Velocity { x: 0.5, y: 0.5 }).add(Health(8));
    assert_eq!(handle.get::<Health>(), Some(&Health(8)));
    if let Some(p) = handle.get_mut::<Position>() {
        p.x = 10.0;
    }
    assert_eq!(handle.remove::<Velocity>(), Some(Velocity { x: 0.5, y: 0.5 }));
    assert!(!handle.has::<Velocity>());
    handle.destroy();

    assert_eq!(store.get_component::<Position>(e), Some(&pos(10.0, 2.0)));
    store.update();
    assert!(!store.valid(e));
}

#[test]
fn par_each_visits_every_match_once() {
    let mut store = store();
    for i in 0..1000 {
        let e = store.create();
        store.add_component(e, pos(i as f32, 0.0));
        if i % 3 == 0 {
            store.add_component(e, Velocity { x: 1.0, y: 2.0 });
        }
    }

    let visited = AtomicUsize::new(0);
    store.view::<(Position, Velocity)>().par_each(|_, (p, v)| {
        p.x += v.x;
        p.y += v.y;
        visited.fetch_add(1, Ordering::Relaxed);
    });
    assert_eq!(visited.load(Ordering::Relaxed), 334);

    let moved = store
        .alive()
        .iter()
        .filter(|&&e| store.get_component::<Position>(e).is_some_and(|p| p.y == 2.0))
        .count();
    assert_eq!(moved, 334);
}

#[test]
fn par_for_each_skips_entities_missing_components() {
    let mut store = store();
    for i in 0..257 {
        let e = store.create();
        store.add_component(e, Health(i));
        if i % 2 == 0 {
            store.add_component(e, pos(0.0, 0.0));
        }
    }

    let visited = AtomicUsize::new(0);
    store.par_for_each::<(Health, Position), _>(4, |_, (health, p)| {
        health.0 += 1000;
        p.x = health.0 as f32;
        visited.fetch_add(1, Ordering::Relaxed);
    });
    assert_eq!(visited.load(Ordering::Relaxed), 129);

    for &e in store.alive() {
        let health = store.get_component::<Health>(e).map(|h| h.0).unwrap_or_default();
        match store.get_component::<Position>(e) {
            Some(p) => assert!(health >= 1000 && p.x == health as f32),
            None => assert!(health < 1000),
        }
    }
}

#[test]
fn reset_then_reuse() {
    let mut store = store_with(4);
    for _ in 0..4 {
        spawn!(store, Health(1));
    }
    assert!(store.create().is_none());

    store.reset();
    assert_eq!(store.alive_count(), 0);
    assert!(store.entities_with::<Health>().is_empty());
    assert!(!store.create().is_none());
}

#[test]
fn churn_keeps_join_and_slots_consistent() {
    let mut store = store_with(64);
    let entities: Vec<_> = (0..64).map(|_| store.create()).collect();
    for (i, &e) in entities.iter().enumerate() {
        store.add_component(e, Health(i as i32));
        if i % 2 == 0 {
            store.add_component(e, pos(i as f32, 0.0));
        }
    }
    for &e in entities.iter().step_by(4) {
        store.remove_component::<Health>(e);
    }
    for &e in entities.iter().step_by(7) {
        store.destroy(e);
    }
    store.update();

    let expected: BTreeSet<_> = store
        .alive()
        .iter()
        .copied()
        .filter(|&e| store.has_component::<Health>(e) && store.has_component::<Position>(e))
        .collect();

    let mut seen = BTreeSet::new();
    store.view::<(Position, Health)>().each(|e, (p, health)| {
        assert_eq!(p.x as i32, health.0);
        assert_eq!(health.0 as u32, e.id());
        seen.insert(e);
    });
    assert_eq!(seen, expected);

    let visited = AtomicUsize::new(0);
    store.par_for_each::<(Health, Position), _>(0, |e, (health, _)| {
        assert_eq!(health.0 as u32, e.id());
        visited.fetch_add(1, Ordering::Relaxed);
    });
    assert_eq!(visited.load(Ordering::Relaxed), expected.len());

    store.reset();
    assert!((0..64).all(|_| !store.create().is_none()));
}
