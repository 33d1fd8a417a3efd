use chatcmd_syntax::{normalized_levenshtein, parse_duration, CommandSyntax};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn line_parsing_benchmark(c: &mut Criterion) {
    let syntax = CommandSyntax::new([".", "!"], ["!", ":"]);
    let raw = r#".admin!give "Iron Sword" 3 player_one"#;

    let mut group = c.benchmark_group("line");
    group.throughput(Throughput::Bytes(raw.len() as u64));
    group.bench_function("parse_qualified", |b| {
        b.iter(|| syntax.parse(black_box(raw)))
    });
    group.bench_function("reject_chat_text", |b| {
        b.iter(|| syntax.parse(black_box("just some ordinary chat message")))
    });
    group.finish();
}

fn helper_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("helpers");
    group.bench_function("normalized_levenshtein", |b| {
        b.iter(|| normalized_levenshtein(black_box("teleport"), black_box("telpeort")))
    });
    group.bench_function("parse_duration", |b| {
        b.iter(|| parse_duration(black_box("1d 23h 59m 59s")))
    });
    group.finish();
}

criterion_group!(benches, line_parsing_benchmark, helper_benchmark);
criterion_main!(benches);
