//! Integration tests for slot lifecycles: handle validity across reuse,
//! refcounting and destructor delivery.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use genslot_core::{
    EntityStore, Generation, Handle, IdAllocator, NamedTable, Released, StoreError, TableId,
};

#[derive(Debug, Clone, PartialEq)]
enum Freed {
    Mesh(String),
    Material(u32),
}

#[test]
fn rock_paper_scenario() {
    let mut table: NamedTable<u32> = NamedTable::new().unwrap();
    assert_eq!(std::mem::size_of::<u32>(), 4);

    let (h1, added) = table.add("rock", 0xCAFE);
    assert!(added);

    let (again, added) = table.add("rock", 0xFACE);
    assert!(!added);
    assert_eq!(again, h1);

    let released = table.release(h1);
    assert_eq!(released, Some(Released::Freed(0xCAFE)));
    assert!(!table.is_current(h1));

    let (h2, added) = table.add("paper", 0xBEEF);
    assert!(added);
    assert_eq!(h2.index(), h1.index());
    assert_ne!(h2.generation(), h1.generation());
}

#[test]
fn released_handles_never_become_current_again() {
    let mut table: NamedTable<u64> = NamedTable::new().unwrap();
    let mut retired: Vec<Handle> = Vec::new();

    for round in 0..50u64 {
        let mut live = Vec::new();
        for i in 0..8u64 {
            let (h, added) = table.add(&format!("r{round}_{i}"), round * 100 + i);
            assert!(added);
            assert!(table.is_current(h));
            live.push(h);
        }
        for h in live {
            assert!(table.release(h).is_some_and(|r| r.is_freed()));
            retired.push(h);
        }
        assert!(retired.iter().all(|h| !table.is_current(*h)));
    }
    assert_eq!(table.width(), 8);
}

#[test]
fn retain_release_balance() {
    let mut table: NamedTable<u32> = NamedTable::new().unwrap();

    for n in 0..5u32 {
        let name = format!("res{n}");
        let (h, _) = table.add(&name, n);
        for _ in 0..n {
            assert!(table.retain(h));
        }
        for _ in 0..n {
            assert!(!table.release(h).unwrap().is_freed());
        }
        assert!(table.is_current(h));
        assert_eq!(table.release(h).and_then(Released::into_freed), Some(n));
        assert!(!table.is_current(h));
    }
}

#[test]
fn set_get_round_trip() {
    let mut table: NamedTable<[u8; 16]> = NamedTable::new().unwrap();
    let (h, _) = table.add("blob", [0; 16]);

    let value = [7u8; 16];
    assert!(table.set(h, value));
    assert_eq!(table.get(h).copied(), Some(value));
}

#[test]
fn create_destroy_never_repeats_a_handle() {
    let mut store = EntityStore::new(["units"]).unwrap();
    let table = TableId::new(0);
    let mut seen = HashSet::new();

    for _ in 0..200 {
        let batch: Vec<_> = (0..4).map(|_| store.create(table)).collect();
        for entity in &batch {
            assert!(seen.insert((entity.index(), entity.generation())));
        }
        for entity in batch {
            assert!(store.destroy(entity));
        }
    }
    assert_eq!(store.table(table).width(), 4);
}

#[test]
fn destroying_stale_entity_has_no_effect() {
    let freed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&freed);

    let mut store = EntityStore::new(["units"]).unwrap();
    let table = TableId::new(0);
    store
        .register_row_with(table, move |v: u32| sink.lock().unwrap().push(v))
        .unwrap();

    let stale = store.create(table);
    store.insert(stale, 1u32).unwrap();
    assert!(store.destroy(stale));

    let live = store.create(table);
    store.insert(live, 2u32).unwrap();

    let generations: Vec<Generation> = store.table(table).generations().to_vec();
    let row_generations = store.table(table).row::<u32>().unwrap().generations().to_vec();

    assert!(!store.destroy(stale));
    assert_eq!(store.table(table).generations(), generations.as_slice());
    assert_eq!(
        store.table(table).row::<u32>().unwrap().generations(),
        row_generations.as_slice()
    );
    assert_eq!(store.get::<u32>(live), Some(&2));
    assert_eq!(*freed.lock().unwrap(), vec![1]);

    let next = store.create(table);
    assert_ne!(next.index(), live.index());
}

#[test]
fn destroy_delivers_exact_values_to_each_row() {
    let freed = Arc::new(Mutex::new(Vec::new()));
    let meshes = Arc::clone(&freed);
    let materials = Arc::clone(&freed);

    let mut store = EntityStore::new(["drawables", "lights"]).unwrap();
    let drawables = store.table_by_name("drawables").unwrap();
    store
        .register_row_with(drawables, move |mesh: String| {
            meshes.lock().unwrap().push(Freed::Mesh(mesh));
        })
        .unwrap();
    store
        .register_row_with(drawables, move |material: u32| {
            materials.lock().unwrap().push(Freed::Material(material));
        })
        .unwrap();

    let bare = store.create(drawables);
    let e = store.create(drawables);
    store.insert(e, "cube.mesh".to_owned()).unwrap();
    store.insert(e, 42u32).unwrap();

    assert!(store.destroy(bare));
    assert!(freed.lock().unwrap().is_empty());

    assert!(store.destroy(e));
    assert_eq!(
        *freed.lock().unwrap(),
        vec![Freed::Mesh("cube.mesh".to_owned()), Freed::Material(42)]
    );
}

#[test]
fn schema_is_fixed_after_first_create() {
    let mut store = EntityStore::new(["a", "b"]).unwrap();
    let a = TableId::new(0);
    let b = TableId::new(1);
    store.create(a);

    assert!(matches!(
        store.register_row::<u32>(a),
        Err(StoreError::RowAfterCreate { .. })
    ));
    assert!(store.register_row::<u32>(b).is_ok());
}

#[test]
fn id_allocator_live_iteration_matches_exists() {
    let mut ids = IdAllocator::new();
    let handles: Vec<Handle> = (0..10).map(|_| ids.alloc()).collect();
    for h in handles.iter().step_by(3) {
        ids.free(*h);
    }

    let live: Vec<Handle> = ids.iter().collect();
    assert_eq!(live.len(), ids.len());
    for h in &handles {
        assert_eq!(ids.exists(*h), live.contains(h));
    }
}

#[test]
fn entities_from_before_shutdown_never_see_new_occupants() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);

    let mut store = EntityStore::new(["units"]).unwrap();
    let units = TableId::new(0);
    store
        .register_row_with(units, move |v: u32| sink.lock().unwrap().push(v))
        .unwrap();

    let before: Vec<_> = (0..3u32)
        .map(|i| {
            let e = store.create(units);
            store.insert(e, i).unwrap();
            e
        })
        .collect();
    assert_eq!(store.shutdown(), 3);
    assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);

    for i in 0..3u32 {
        let e = store.create(units);
        store.insert(e, 10 + i).unwrap();
    }

    for old in &before {
        assert!(!store.is_alive(*old));
        assert_eq!(store.get::<u32>(*old), None);
        assert!(!store.destroy(*old));
    }
    assert_eq!(store.len(), 3);
    assert_eq!(log.lock().unwrap().len(), 3);
}

#[test]
fn row_access_stays_within_table_width() {
    let mut store = EntityStore::new(["units"]).unwrap();
    let units = TableId::new(0);
    store.register_row::<u32>(units).unwrap();

    let a = store.create(units);
    let b = store.create(units);
    store.insert(a, 5u32).unwrap();
    store.destroy(b);
    assert_eq!(store.insert(b, 6u32), Err(StoreError::StaleHandle));

    let table = store.table_mut(units);
    let width = table.width();
    let row = table.row_mut::<u32>().unwrap();
    if let Some(value) = row.get_mut(a.index(), a.generation()) {
        *value += 1;
    }
    assert!(!row.remove(b.index(), b.generation()));
    assert_eq!(row.len(), width);
    assert_eq!(row.values().iter().flatten().copied().collect::<Vec<_>>(), vec![6]);
}
