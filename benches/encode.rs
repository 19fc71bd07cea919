use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qr_codec::encoder::mask::find_best_mask;
use qr_codec::encoder::matrix_builder::generate_modules;
use qr_codec::{ECLevel, Version, encode};

fn bench_encode_short(c: &mut Criterion) {
    c.bench_function("encode_hello_world_m", |b| {
        b.iter(|| encode(black_box("HELLO WORLD"), black_box(ECLevel::M)))
    });
}

fn bench_encode_by_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_bytes_l");
    for length in [16usize, 128, 512] {
        let text = "qr codec bench! ".repeat(length / 16);
        group.bench_with_input(BenchmarkId::from_parameter(length), &text, |b, text| {
            b.iter(|| encode(black_box(text), black_box(ECLevel::L)))
        });
    }
    group.finish();
}

fn bench_mask_selection(c: &mut Criterion) {
    let version = Version::new(10).unwrap();
    let codewords: Vec<u8> = (0..346u32).map(|i| (i * 73 % 256) as u8).collect();
    let base = generate_modules(&codewords, version);
    c.bench_function("find_best_mask_v10", |b| {
        b.iter(|| find_best_mask(black_box(&base)))
    });
}

criterion_group!(
    benches,
    bench_encode_short,
    bench_encode_by_length,
    bench_mask_selection
);
criterion_main!(benches);
