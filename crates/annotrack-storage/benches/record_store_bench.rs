use criterion::{criterion_group, criterion_main, Criterion};

use annotrack_core::entities::{Permissions, User, UserPatch};
use annotrack_core::{IRecordStore, RecordId};
use annotrack_storage::StorageEngine;

fn make_user(i: u64) -> User {
    User {
        name: format!("bench-{i}"),
        api_key: format!("key-{i}"),
        permissions: Permissions::Standard,
    }
}

fn bench_create(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let engine = StorageEngine::open(&dir.path().join("bench_create.db")).unwrap();
    let users = engine.users();
    let mut counter = 0u64;

    c.bench_function("create_record", |b| {
        b.iter(|| {
            counter += 1;
            users.create(make_user(counter)).unwrap();
        });
    });
}

fn bench_update(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let engine = StorageEngine::open(&dir.path().join("bench_update.db")).unwrap();
    let users = engine.users();
    let record_id = users.create(make_user(0)).unwrap().record_id;
    let mut counter = 0u64;

    c.bench_function("update_record", |b| {
        b.iter(|| {
            counter += 1;
            let patch = UserPatch {
                name: Some(format!("renamed-{counter}")),
                ..Default::default()
            };
            users.update(record_id, patch).unwrap();
        });
    });
}

fn bench_read_current(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let engine = StorageEngine::open(&dir.path().join("bench_read.db")).unwrap();
    let users = engine.users();

    // Pre-populate.
    let ids: Vec<RecordId> = (0..100)
        .map(|i| users.create(make_user(i)).unwrap().record_id)
        .collect();

    c.bench_function("read_current", |b| {
        let mut idx = 0;
        b.iter(|| {
            users.read(ids[idx % ids.len()]).unwrap();
            idx += 1;
        });
    });
}

fn bench_read_historical(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let engine = StorageEngine::open(&dir.path().join("bench_hist.db")).unwrap();
    let users = engine.users();

    // One record with a long chain; read from the middle of it.
    let created = users.create(make_user(0)).unwrap();
    for i in 0..500 {
        let patch = UserPatch {
            name: Some(format!("v{i}")),
            ..Default::default()
        };
        users.update(created.record_id, patch).unwrap();
    }
    let history = users.history(created.record_id).unwrap();
    let mid = history[history.len() / 2].valid_from;

    c.bench_function("read_at_mid_history", |b| {
        b.iter(|| {
            users.read_at(created.record_id, mid).unwrap();
        });
    });
}

fn bench_read_all(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let engine = StorageEngine::open(&dir.path().join("bench_all.db")).unwrap();
    let users = engine.users();
    for i in 0..1_000 {
        users.create(make_user(i)).unwrap();
    }

    c.bench_function("read_all_1000", |b| {
        b.iter(|| {
            users.read_all().unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_create,
    bench_update,
    bench_read_current,
    bench_read_historical,
    bench_read_all
);
criterion_main!(benches);
