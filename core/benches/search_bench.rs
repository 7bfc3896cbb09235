use criterion::{criterion_group, criterion_main, Criterion};
use search_core::intersect::intersect_weighted;
use search_core::rank::top_k;
use search_core::tokenizer::normalize;
use search_core::Posting;

const PLOT: &str = "Bilbo Baggins is swept into a quest to reclaim the lost Dwarf Kingdom of Erebor \
    from the fearsome dragon Smaug. Approached out of the blue by the wizard Gandalf the Grey, \
    Bilbo finds himself joining a company of thirteen dwarves led by the legendary warrior Thorin.";

fn postings(step: u32, len: u32) -> Vec<Posting> {
    (0..len).map(|i| Posting { doc_id: i * step, weight: 1.0 / (i + 1) as f64 }).collect()
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_plot", |b| b.iter(|| normalize(PLOT)));
}

fn bench_intersect(c: &mut Criterion) {
    let a = postings(2, 50_000);
    let b = postings(3, 40_000);
    let d = postings(5, 30_000);
    c.bench_function("intersect_weighted_3_lists", |bench| {
        bench.iter(|| intersect_weighted(&[&a[..], &b[..], &d[..]]))
    });
}

fn bench_top_k(c: &mut Criterion) {
    let scores: Vec<(u32, f64)> = (0..100_000u32).map(|i| (i, ((i * 7919) % 10_007) as f64)).collect();
    c.bench_function("top_10_of_100k", |b| b.iter(|| top_k(scores.iter().copied(), 10)));
}

criterion_group!(benches, bench_normalize, bench_intersect, bench_top_k);
criterion_main!(benches);
