use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use urania::aspects::{angular_separation, AspectDetector};
use urania::{estimate_tokens, AnalysisRequest, EngineConfig, RawSnapshot, TransitEngine};

const NAMES: [&str; 11] = [
    "Sol", "Lua", "Mercúrio", "Vênus", "Marte", "Júpiter", "Saturno", "Urano", "Netuno", "Plutão",
    "Ascendente",
];
const SPEEDS: [f64; 11] = [
    0.9856, 13.18, 1.38, 1.2, 0.52, 0.083, 0.034, 0.012, 0.006, 0.004, 0.0,
];

fn body(name: &str, lon: f64, speed: f64) -> Value {
    json!({
        "name": name,
        "fullDegree": lon.rem_euclid(360.0),
        "speed": speed,
        "isRetro": speed < 0.0,
    })
}

/// A year of daily snapshots.
fn year_request() -> AnalysisRequest {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let houses: Vec<Value> = (0..12)
        .map(|h| json!({ "house": h + 1, "degree": 15.0 + 30.0 * h as f64 }))
        .collect();

    let samples = (0..365)
        .map(|d| {
            let mut data: Vec<Value> = NAMES
                .iter()
                .zip(SPEEDS)
                .enumerate()
                .map(|(i, (name, speed))| body(name, 27.0 * i as f64 + speed * d as f64, speed))
                .collect();
            data.extend(
                NAMES
                    .iter()
                    .enumerate()
                    .map(|(i, name)| body(name, 31.0 * i as f64 + 7.0, 0.0)),
            );
            data.push(json!({ "houses": houses }));
            RawSnapshot {
                timestamp: (start + Duration::days(d)).to_rfc3339(),
                data,
            }
        })
        .collect();

    AnalysisRequest {
        samples,
        window_start: None,
        generated_at: None,
    }
}

fn bench_angular_separation(c: &mut Criterion) {
    c.bench_function("angular_separation", |b| {
        b.iter(|| angular_separation(black_box(350.0), black_box(10.0)))
    });
}

fn bench_classify(c: &mut Criterion) {
    let detector = AspectDetector::new(5.0);
    c.bench_function("classify_aspect", |b| {
        b.iter(|| detector.classify(black_box(118.5)))
    });
}

fn bench_analyze_year(c: &mut Criterion) {
    let engine = TransitEngine::new(EngineConfig::default()).unwrap();
    let request = year_request();

    c.bench_function("analyze_year_reduced", |b| {
        b.iter(|| engine.analyze(black_box(&request)))
    });
    c.bench_function("analyze_year_full", |b| {
        b.iter(|| engine.analyze_full(black_box(&request)))
    });
    c.bench_function("estimate_tokens", |b| {
        b.iter(|| estimate_tokens(black_box(&request), engine.config()))
    });
}

criterion_group!(
    benches,
    bench_angular_separation,
    bench_classify,
    bench_analyze_year
);
criterion_main!(benches);
