use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use clipmark_core::{
    ConvertOptions, Document, ExtractOptions, clean_html_fragment, convert_to_markdown, extract_content,
    preprocess_html,
};

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("../../tests/fixtures/{}", name)).unwrap()
}

/// The blog fixture repeated inside one body, for a larger page.
fn large_page() -> String {
    let article = fixture("blog_post.html");
    let body = Document::parse(&article).body().map(|b| b.inner_html()).unwrap_or_default();
    format!("<html><body>{}</body></html>", body.repeat(40))
}

fn bench_parse(c: &mut Criterion) {
    let small = fixture("custom_selector.html");
    let medium = fixture("blog_post.html");
    let large = large_page();

    let mut group = c.benchmark_group("parse");

    for (name, html) in [("small", &small), ("medium", &medium), ("large", &large)] {
        group.bench_with_input(BenchmarkId::new(name, html.len()), html, |b, html| {
            b.iter(|| Document::parse(black_box(html)))
        });
    }

    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let doc = Document::parse(&fixture("blog_post.html"));
    let options = ExtractOptions::default();

    c.bench_function("extract_content", |b| {
        b.iter(|| extract_content(black_box(&doc), black_box(&options)))
    });
}

fn bench_cleaning(c: &mut Criterion) {
    let doc = Document::parse(&large_page());
    let body = doc.body().map(|b| b.outer_html()).unwrap_or_default();
    let options = ExtractOptions::default();

    c.bench_function("clean_html_fragment", |b| b.iter(|| clean_html_fragment(black_box(&body), &options)));
}

fn bench_preprocess(c: &mut Criterion) {
    let html = fixture("blog_post.html");
    let config = Default::default();

    c.bench_function("preprocess", |b| b.iter(|| preprocess_html(black_box(&html), &config)));
}

fn bench_conversion(c: &mut Criterion) {
    let doc = Document::parse(&fixture("blog_post.html"));
    let content = extract_content(&doc, &ExtractOptions::default()).unwrap().content;
    let options = ConvertOptions::default();

    c.bench_function("convert_to_markdown", |b| {
        b.iter(|| convert_to_markdown(black_box(&content), black_box(&options)))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_extraction,
    bench_cleaning,
    bench_preprocess,
    bench_conversion
);
criterion_main!(benches);
