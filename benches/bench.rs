// Criterion benchmarks for Cardmatch

use cardmatch::core::{Catalog, Engine, Matchmaker, WaitingPool};
use cardmatch::models::{Card, PlayerId, Profile, ResponseKind, ServerEvent};
use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

fn create_profile(id: usize) -> Profile {
    Profile {
        name: format!("User {}", id),
        age: 20 + (id % 40) as u8,
        location: "Berlin".to_string(),
        bio: "Climbing and jazz".to_string(),
        // Every fifth player shares a profile to keep the self-match guard busy
        unique_id: format!("u{}", id - id % 5),
        telegram_id: None,
    }
}

fn create_pool(size: usize) -> (WaitingPool, PlayerId) {
    let mut pool = WaitingPool::new();
    let now = Utc::now();
    let mut last = PlayerId::new();
    for i in 0..size {
        last = PlayerId::new();
        pool.insert(last, create_profile(i), now - Duration::seconds((size - i) as i64));
    }
    (pool, last)
}

fn bench_find_partner(c: &mut Criterion) {
    let matchmaker = Matchmaker::new();
    let mut group = c.benchmark_group("matchmaking");

    for pool_size in [10, 100, 1000, 10000].iter() {
        let (pool, requester) = create_pool(*pool_size);

        group.bench_with_input(BenchmarkId::new("find_partner", pool_size), pool_size, |b, _| {
            b.iter(|| matchmaker.find_partner(black_box(&pool), black_box(requester)));
        });
    }

    group.finish();
}

fn bench_exchange_round(c: &mut Criterion) {
    let mut engine = Engine::new(Arc::new(Catalog::default()));
    let waiting = PlayerId::new();
    let requester = PlayerId::new();
    engine.join(waiting, create_profile(0)).ok();
    let session_id = engine
        .join(requester, create_profile(5))
        .ok()
        .and_then(|effects| {
            effects.notifications.into_iter().find_map(|n| match n.event {
                ServerEvent::MatchFound(found) => Some(found.session_id),
                _ => None,
            })
        })
        .expect("players should pair");

    let card = Card {
        question: "Mountains or sea?".to_string(),
        answer: Some("Sea".to_string()),
    };

    // The asker keeps the turn, so the same pair of calls repeats forever
    c.bench_function("submit_respond_round", |b| {
        b.iter(|| {
            engine.submit(session_id, requester, card.clone()).ok();
            black_box(engine.respond(session_id, waiting, ResponseKind::Like).ok())
        });
    });
}

fn bench_join_pairing(c: &mut Criterion) {
    let catalog = Arc::new(Catalog::default());

    c.bench_function("join_and_pair_100_players", |b| {
        b.iter(|| {
            let mut engine = Engine::new(catalog.clone());
            for i in 0..100 {
                engine.join(PlayerId::new(), create_profile(i * 5)).ok();
            }
            black_box(engine.status())
        });
    });
}

criterion_group!(benches, bench_find_partner, bench_exchange_round, bench_join_pairing);

criterion_main!(benches);
