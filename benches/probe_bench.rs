// Probe-length statistics alongside lookup timing. Needs `bench_internal`.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rc_runtime::{Mapping, Str};
use std::time::Duration;

fn build(n: usize) -> Mapping<Str, usize> {
    let mut m = Mapping::new();
    for i in 0..n {
        m.set(Str::from_string(format!("key-{i}")), i);
    }
    m
}

fn bench_probe_lengths(c: &mut Criterion) {
    for n in [5usize, 5_000, 50_000] {
        let m = build(n);
        eprintln!(
            "n={n} slots={} max_probe_len={}",
            m.slot_count(),
            m.max_probe_len()
        );
        let keys: Vec<Str> = (0..n).map(|i| Str::from_string(format!("key-{i}"))).collect();
        let mut it = keys.iter().cycle();
        c.bench_function(&format!("mapping_has_key_n{n}"), |b| {
            b.iter(|| black_box(m.has_key(it.next().unwrap())))
        });
    }
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(4))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_probe_lengths
}
criterion_main!(benches);
