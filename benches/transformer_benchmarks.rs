use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kline_chart_wasm::application::{ChartBinding, RenderChartUseCase};
use kline_chart_wasm::domain::chart::ChartOptions;
use kline_chart_wasm::domain::market_data::{PriceBar, SeriesTransformer};
use kline_chart_wasm::infrastructure::rendering::{HeadlessSurface, Scene};
use std::rc::Rc;
use std::time::Duration;

/// Daily bars with a slow trend and some deterministic noise
fn generate_bars(count: usize) -> Vec<PriceBar> {
    let mut price = 3_000.0;
    (0..count)
        .map(|i| {
            let t = i as f64;
            let open = price;
            let close = open * (1.0 + (t * 0.37).sin() * 0.02 + (t * 0.011).cos() * 0.003);
            let high = open.max(close) * (1.0 + (t * 0.7).sin().abs() * 0.01);
            let low = open.min(close) * (1.0 - (t * 0.9).cos().abs() * 0.01);
            let volume = 1e7 + (t * 0.4).sin().abs() * 4e7;
            price = close;
            let date = format!("{:04}-{:02}-{:02}", 2000 + i / 336, (i / 28) % 12 + 1, i % 28 + 1);
            PriceBar::new(date, open, high, low, close, volume)
        })
        .collect()
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("series_transform");
    group.measurement_time(Duration::from_secs(5));
    let transformer = SeriesTransformer::new();

    for count in [250, 1_000, 5_000] {
        let bars = generate_bars(count);
        group.bench_with_input(BenchmarkId::new("ma_30_120", count), &bars, |b, bars| {
            b.iter(|| transformer.transform(black_box(bars), &[30, 120]))
        });
        group.bench_with_input(BenchmarkId::new("ma_5_to_120", count), &bars, |b, bars| {
            b.iter(|| transformer.transform(black_box(bars), &[5, 10, 20, 30, 60, 120]))
        });
    }
    group.finish();
}

fn bench_memoized_render(c: &mut Criterion) {
    let bars = Rc::new(generate_bars(2_000));
    let mut use_case = RenderChartUseCase::new();
    c.bench_function("derive_memoized_2000", |b| {
        b.iter(|| use_case.derive(black_box(&bars), &[30, 120]))
    });
}

fn bench_scene_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_layout");
    for count in [60, 500] {
        let derived = SeriesTransformer::new().transform(&generate_bars(count), &[30, 120]);
        let options = ChartOptions { visible_bars: count, ..ChartOptions::default() };
        let mut binding = ChartBinding::configure(HeadlessSurface::new(), 1_280, options);
        if binding.set_data(&derived).is_err() {
            continue;
        }
        let Some(surface) = binding.surface() else { continue };
        group.bench_with_input(BenchmarkId::new("visible_bars", count), surface, |b, surface| {
            b.iter(|| Scene::build(black_box(surface.model())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_transform, bench_memoized_render, bench_scene_layout);
criterion_main!(benches);
