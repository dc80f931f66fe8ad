//! Benchmarks for the transform and per-frame detection

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use doppler_gesture::config::DetectorConfig;
use doppler_gesture::gesture::GestureDetector;
use doppler_gesture::spectrum::FftEngine;
use std::f64::consts::PI;

fn test_frame(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64 / 44_100.0;
            0.8 * (2.0 * PI * 18_500.0 * t).sin() + 0.2 * (2.0 * PI * 18_300.0 * t).sin()
        })
        .collect()
}

fn benchmark_transform(c: &mut Criterion) {
    let fft = FftEngine::new(2048).unwrap();
    let frame = test_frame(2048);
    let mut real = vec![0.0; 2048];
    let mut imag = vec![0.0; 2048];

    c.bench_function("fft_2048", |b| {
        b.iter(|| {
            real.copy_from_slice(&frame);
            imag.fill(0.0);
            fft.transform(black_box(&mut real), black_box(&mut imag));
        })
    });
}

fn benchmark_detector(c: &mut Criterion) {
    let mut detector = GestureDetector::new(&DetectorConfig::default()).unwrap();
    let frame = test_frame(2048);

    c.bench_function("process_frame_2048", |b| {
        b.iter(|| detector.process_frame(black_box(&frame)))
    });
}

criterion_group!(benches, benchmark_transform, benchmark_detector);
criterion_main!(benches);
