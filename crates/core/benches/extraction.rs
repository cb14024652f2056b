use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use serapis_core::{
    BasicPreprocessor, DirectFetchExtractor, DomTextConverter, ExtractionRequest, MarkdownTextConverter, SerapisConfig,
    TextConverter, detect_features, extract_meta, extract_sentences,
};

fn load_article() -> String {
    std::fs::read_to_string("../../tests/fixtures/article.html").unwrap()
}

fn bench_convert(c: &mut Criterion) {
    let html = load_article();
    let mut group = c.benchmark_group("convert");

    group.bench_with_input(BenchmarkId::new("markdown", "article"), &html, |b, html| {
        b.iter(|| MarkdownTextConverter::default().convert(black_box(html)))
    });

    group.bench_with_input(BenchmarkId::new("dom", "article"), &html, |b, html| {
        b.iter(|| DomTextConverter.convert(black_box(html)))
    });

    group.finish();
}

fn bench_features(c: &mut Criterion) {
    let html = load_article();

    c.bench_function("detect_features", |b| b.iter(|| detect_features(black_box(&html), "serendipity")));
}

fn bench_meta(c: &mut Criterion) {
    let html = load_article();

    c.bench_function("extract_meta", |b| b.iter(|| extract_meta(black_box(&html))));
}

fn bench_sentences(c: &mut Criterion) {
    let html = load_article();
    let text = DomTextConverter.convert(&html).unwrap();
    let preprocessor = BasicPreprocessor::new();

    c.bench_function("extract_sentences", |b| {
        b.iter(|| extract_sentences(black_box(&text), "serendipity", &preprocessor))
    });
}

fn bench_full_extraction(c: &mut Criterion) {
    let html = load_article();
    let extractor = DirectFetchExtractor::new(SerapisConfig::default()).unwrap();
    let request = ExtractionRequest::new("https://example.com/history", "serendipity");

    c.bench_function("full_extraction", |b| b.iter(|| extractor.parse_html(&request, black_box(&html))));
}

criterion_group!(
    benches,
    bench_convert,
    bench_features,
    bench_meta,
    bench_sentences,
    bench_full_extraction
);
criterion_main!(benches);
