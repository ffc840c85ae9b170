//! Benchmarks for proshno parsing performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks test parsing performance at various question counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use proshno::{parse_lines, RenderOptions, Schema, Variant};

/// Creates synthetic MCQ lines: stem with tags, options, answer.
fn create_mcq_lines(question_count: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(question_count * 5);

    for i in 1..=question_count {
        lines.push(format!(
            "{}. বস্তুর বেগ $v^2 = u^2 + 2as$ হলে সরণ কত? [টপিক: গতি][ঢাকা বোর্ড ২০২৩]",
            i
        ));
        lines.push("ক) $\\frac{v^2}{2a}$ খ) $2as$".to_string());
        lines.push("গ) $u \\times t$".to_string());
        lines.push("ঘ) শূন্য".to_string());
        lines.push("উত্তর: ক".to_string());
    }

    lines
}

/// Creates a synthetic DOCX with one paragraph per line.
fn create_test_docx(lines: &[String]) -> Vec<u8> {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut body = String::new();
    for line in lines {
        body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
        body.push_str(&line.replace('&', "&amp;").replace('<', "&lt;"));
        body.push_str("</w:t></w:r></w:p>");
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#).unwrap();

    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        )
        .as_bytes(),
    )
    .unwrap();

    zip.finish().unwrap().into_inner()
}

/// Benchmark the line parser at various sizes.
fn bench_line_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_parsing");
    let variant = Variant::mcq();

    for count in [10, 100, 1000].iter() {
        let lines = create_mcq_lines(*count);

        group.throughput(Throughput::Elements(lines.len() as u64));
        group.bench_with_input(BenchmarkId::new("questions", count), &lines, |b, lines| {
            b.iter(|| parse_lines(black_box(lines), &variant));
        });
    }

    group.finish();
}

/// Benchmark DOCX reading plus parsing.
fn bench_docx_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("docx_parsing");
    let variant = Variant::mcq();

    for count in [10, 100, 500].iter() {
        let data = create_test_docx(&create_mcq_lines(*count));

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("questions", count), &data, |b, data| {
            b.iter(|| {
                let _ = proshno::parse_bytes(black_box(data), &variant);
            });
        });
    }

    group.finish();
}

/// Benchmark table building and text rendering.
fn bench_output(c: &mut Criterion) {
    let report = parse_lines(create_mcq_lines(500), &Variant::mcq());
    let schema = Schema::mcq();
    let options = RenderOptions::default();

    c.bench_function("to_table_500", |b| {
        b.iter(|| schema.to_table(black_box(&report.questions)));
    });

    c.bench_function("render_text_500", |b| {
        b.iter(|| proshno::render::render_text(black_box(&report.questions), &options));
    });
}

/// Benchmark format detection.
fn bench_format_detection(c: &mut Criterion) {
    let docx = create_test_docx(&create_mcq_lines(10));
    let latex = "\\begin{enumerate}\n১. প্রশ্ন {[}ঢাকা বোর্ড{]}\n".repeat(50);

    c.bench_function("detect_docx", |b| {
        b.iter(|| proshno::detect_format_from_bytes(black_box(&docx)).unwrap());
    });

    c.bench_function("detect_latex", |b| {
        b.iter(|| proshno::detect_format_from_bytes(black_box(latex.as_bytes())).unwrap());
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_line_parsing,
    bench_docx_parsing,
    bench_output,
);
criterion_main!(benches);
