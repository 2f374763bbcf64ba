/// Benchmarks for the authorization subsystem
///
/// Measures performance of:
/// - Policy evaluation across rule-set sizes
/// - Grant-time policy construction
/// - User-code normalization
/// - Scope set queries

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashSet;
use std::str::FromStr;
use uuid::Uuid;
use xivauth_authz::device::normalize_user_code;
use xivauth_authz::policy::{PermissiblePolicy, PermissibleRule, PolicyBuilder, RestrictionMode};
use xivauth_authz::scope::{Scope, ScopeSet};
use xivauth_core::ResourceRef;

fn policy_with_rules(n: usize) -> (PermissiblePolicy, ResourceRef) {
    let probe = ResourceRef::Character(Uuid::from_u128(0));
    let rules = (1..=n as u128).map(|i| {
        let resource = ResourceRef::Character(Uuid::from_u128(i));
        if i % 2 == 0 {
            PermissibleRule::deny(resource)
        } else {
            PermissibleRule::allow(resource)
        }
    });
    (PermissiblePolicy::from_rules(rules), probe)
}

fn bench_policy_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy_evaluation");

    for size in [1usize, 8, 64, 512] {
        let (policy, probe) = policy_with_rules(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| policy.evaluate(black_box(&probe), black_box(true)));
        });
    }

    group.finish();
}

fn bench_policy_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy_construction");

    let candidates: Vec<ResourceRef> = (0..64u128)
        .map(|i| ResourceRef::Character(Uuid::from_u128(i)))
        .collect();
    let selected: HashSet<Uuid> = (0..32u128).map(Uuid::from_u128).collect();

    group.bench_function("include_mode", |b| {
        b.iter(|| {
            let mut builder = PolicyBuilder::new();
            builder.select(
                black_box(&candidates),
                black_box(&selected),
                RestrictionMode::IncludeSelected,
            );
            builder.finish()
        });
    });

    group.bench_function("exclude_mode", |b| {
        b.iter(|| {
            let mut builder = PolicyBuilder::new();
            builder.select(
                black_box(&candidates),
                black_box(&selected),
                RestrictionMode::ExcludeSelected,
            );
            builder.finish()
        });
    });

    group.finish();
}

fn bench_user_code_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("user_code_normalization");

    let cases = vec![
        ("canonical", "ABCDEFGH"),
        ("grouped", "abcd-efgh"),
        ("ambiguous", "oIlO-iLoi"),
    ];

    for (name, input) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, &s| {
            b.iter(|| normalize_user_code(black_box(s)));
        });
    }

    group.finish();
}

fn bench_scope_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("scope_queries");

    let scopes = ScopeSet::from_str("character:jwt character:data user:email").unwrap();
    let probe = Scope::from_str("character:jwt").unwrap();

    group.bench_function("has", |b| {
        b.iter(|| scopes.has(black_box(&probe)));
    });

    group.bench_function("has_bulk", |b| {
        b.iter(|| scopes.has_bulk(black_box("character")));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_policy_evaluation,
    bench_policy_construction,
    bench_user_code_normalization,
    bench_scope_queries
);
criterion_main!(benches);
