use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use folio::model::{Content, ContentStatus, FeaturedImage};
use folio::seo::{analyze, generate_meta_description};

fn article(words: usize) -> Content {
    let body = format!(
        "<h2>Introduction</h2>\n{}",
        "<p>Lorem ipsum <strong>dolor</strong> sit amet.</p> ".repeat(words / 5)
    );

    let mut content = Content::new(
        "c1".into(),
        "A reasonably long article title".into(),
        "article".into(),
        ContentStatus::Published,
        "a1".into(),
        body,
    );
    content.meta_title = Some("t".repeat(55));
    content.meta_description = Some("d".repeat(155));
    content.featured_image = Some(FeaturedImage::new("/cover.png".into(), Some("Cover".into())));
    content
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for words in [300, 3_000, 30_000] {
        let content = article(words);
        group.bench_with_input(BenchmarkId::from_parameter(words), &content, |b, content| {
            b.iter(|| black_box(analyze(content)))
        });
    }

    group.finish();
}

fn bench_generate_description(c: &mut Criterion) {
    let content = article(3_000);

    c.bench_function("generate_meta_description", |b| {
        b.iter(|| black_box(generate_meta_description(&content.body)))
    });
}

criterion_group!(benches, bench_analyze, bench_generate_description);
criterion_main!(benches);
