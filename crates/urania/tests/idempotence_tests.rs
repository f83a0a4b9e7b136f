mod common;

use common::RequestBuilder;
use std::sync::Arc;
use std::thread;
use urania::{AnalysisRequest, EngineConfig, TransitEngine};

fn request() -> AnalysisRequest {
    RequestBuilder::new(0, 200)
        .step(2)
        .linear("Lua", 10.0, 13.18)
        .linear("Marte", 80.0, 0.6)
        .track("Mercúrio", |d| {
            let phase = std::f64::consts::TAU * d as f64 / 116.0;
            (40.0 + d as f64 + 25.0 * phase.sin(), 1.0 + 1.354 * phase.cos())
        })
        .linear("Saturno", 355.0, 0.03)
        .natal("Sol", 92.0)
        .natal("Lua", 181.0)
        .natal("Marte", 270.5)
        .generated_at("2025-01-01T00:00:00Z")
        .build()
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let engine = TransitEngine::new(EngineConfig::default()).unwrap();
    let request = request();

    let first = serde_json::to_string(&engine.analyze(&request).unwrap()).unwrap();
    let second = serde_json::to_string(&engine.analyze(&request).unwrap()).unwrap();
    assert_eq!(first, second);

    let full_a = serde_json::to_string(&engine.analyze_full(&request).unwrap()).unwrap();
    let full_b = serde_json::to_string(&engine.analyze_full(&request).unwrap()).unwrap();
    assert_eq!(full_a, full_b);
}

#[test]
fn test_sample_order_does_not_matter() {
    let engine = TransitEngine::new(EngineConfig::default()).unwrap();
    let ordered = request();
    let mut shuffled = ordered.clone();
    shuffled.samples.reverse();
    shuffled.samples.swap(3, 40);

    assert_eq!(
        engine.analyze(&ordered).unwrap(),
        engine.analyze(&shuffled).unwrap()
    );
}

#[test]
fn test_concurrent_analyses_share_one_engine() {
    let engine = Arc::new(TransitEngine::new(EngineConfig::default()).unwrap());
    let request = Arc::new(request());
    let expected = engine.analyze(&request).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let request = Arc::clone(&request);
            thread::spawn(move || engine.analyze(&request).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
