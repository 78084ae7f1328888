#[path = "../util/util.rs"]
mod util;

use util::bench_images;

use std::time::Duration;

use criterion::{
    criterion_group, criterion_main, measurement::WallTime, Bencher, BenchmarkId, Criterion,
    SamplingMode,
};
use dominant::{
    extract_by_area_average, extract_by_frequency, extract_by_frequency_par, extract_by_kmeans,
    extract_by_kmeans_par, AverageOptions, DecodeToPixelBuffer, DistanceFormula,
    FrequencyOptions, KmeansOptions, PixelBuffer, Quality,
};

fn bench<Options: Copy>(
    c: &mut Criterion,
    group: &str,
    options: &[(&str, Options)],
    mut f: impl FnMut(&mut Bencher<WallTime>, &(PixelBuffer, Options)),
) {
    let mut group = c.benchmark_group(group);
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_millis(500));

    for (name, image) in bench_images() {
        let buffer = image.decode_to_pixel_buffer().unwrap();
        for &(label, options) in options {
            group.bench_with_input(BenchmarkId::new(label, name), &(buffer, options), &mut f);
        }
    }
}

fn frequency_options() -> Vec<(&'static str, FrequencyOptions)> {
    [
        ("cie76_fair", DistanceFormula::Cie76, Quality::Fair),
        ("cie94_fair", DistanceFormula::Cie94, Quality::Fair),
        ("ciede2000_fair", DistanceFormula::Ciede2000, Quality::Fair),
        ("cie94_high", DistanceFormula::Cie94, Quality::High),
    ]
    .into_iter()
    .map(|(label, formula, quality)| {
        (label, FrequencyOptions::new().formula(formula).quality(quality))
    })
    .collect()
}

fn kmeans_options() -> Vec<(&'static str, KmeansOptions)> {
    [("k8_fair", 8, Quality::Fair), ("k16_fair", 16, Quality::Fair), ("k8_high", 8, Quality::High)]
        .into_iter()
        .map(|(label, k, quality)| (label, KmeansOptions::new().count(k).quality(quality)))
        .collect()
}

fn frequency_single(c: &mut Criterion) {
    bench(c, "frequency_single", &frequency_options(), |b, &(buffer, options)| {
        b.iter(|| extract_by_frequency(buffer, options).unwrap());
    });
}

fn frequency_par(c: &mut Criterion) {
    bench(c, "frequency_par", &frequency_options(), |b, &(buffer, options)| {
        b.iter(|| extract_by_frequency_par(buffer, options).unwrap());
    });
}

fn kmeans_single(c: &mut Criterion) {
    bench(c, "kmeans_single", &kmeans_options(), |b, &(buffer, options)| {
        b.iter(|| extract_by_kmeans(buffer, options).unwrap());
    });
}

fn kmeans_par(c: &mut Criterion) {
    bench(c, "kmeans_par", &kmeans_options(), |b, &(buffer, options)| {
        b.iter(|| extract_by_kmeans_par(buffer, options).unwrap());
    });
}

fn area_average(c: &mut Criterion) {
    let options = [
        ("all_8", AverageOptions::new()),
        ("fair_8", AverageOptions::new().quality(Quality::Fair)),
    ];
    bench(c, "area_average", &options, |b, &(buffer, options)| {
        b.iter(|| extract_by_area_average(buffer, options).unwrap());
    });
}

criterion_group!(
    benches,
    frequency_single,
    frequency_par,
    kmeans_single,
    kmeans_par,
    area_average,
);
criterion_main!(benches);
