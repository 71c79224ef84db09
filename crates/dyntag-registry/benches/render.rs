//! Benchmarks for tag substitution.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dyntag_cache::NullCache;
use dyntag_registry::{TagOccurrence, TagOptions, TagRegistry};

/// Registry with `count` tags named `{tag_0}` .. `{tag_N}`.
fn registry_with_tags(registry: TagRegistry, count: usize) -> TagRegistry {
    for i in 0..count {
        registry.register(&format!("{{tag_{i}}}"), TagOptions::default(), |id, tag, _| {
            format!("{id}:{}", TagOccurrence::new(tag).attr(0))
        });
    }
    registry
}

/// Content with `paragraphs` paragraphs, each referencing a few tags.
fn generate_content(paragraphs: usize, tags: usize) -> String {
    let mut content = String::with_capacity(paragraphs * 120);
    for i in 0..paragraphs {
        content.push_str(&format!(
            "Paragraph {i} mentions {{tag_{}}} and {{tag_{}:attr}} and {{unknown}}.\n\n",
            i % tags,
            (i * 7) % tags
        ));
    }
    content
}

fn bench_render_no_tags(c: &mut Criterion) {
    let registry = TagRegistry::new();
    let content = generate_content(100, 10);

    c.bench_function("render_empty_registry", |b| {
        b.iter(|| registry.render(black_box(&content), 1, "text"));
    });
}

fn bench_render_varying_tag_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_by_tag_count");

    for tags in [5, 50, 500] {
        let registry = registry_with_tags(TagRegistry::new(), tags);
        let content = generate_content(100, tags);

        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::new("tags", tags), &content, |b, content| {
            b.iter(|| registry.render(content, 1, "text"));
        });
    }

    group.finish();
}

fn bench_render_cached_vs_uncached(c: &mut Criterion) {
    let content = generate_content(100, 20);
    let cached = registry_with_tags(TagRegistry::new(), 20);
    let uncached = registry_with_tags(TagRegistry::with_cache(Box::new(NullCache)), 20);

    let mut group = c.benchmark_group("caching");

    group.bench_function("render_uncached", |b| {
        b.iter(|| uncached.render(&content, 1, "text"));
    });

    // Prime the cache
    let _ = cached.render(&content, 1, "text");

    group.bench_function("render_cache_hit", |b| {
        b.iter(|| cached.render(&content, 1, "text"));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_render_no_tags,
    bench_render_varying_tag_counts,
    bench_render_cached_vs_uncached,
);
criterion_main!(benches);
