//! Unit tests for job type serialization

use pairscope::jobs::types::{CleanupJob, RefreshNewsJob, UpdatePairJob};

#[test]
fn update_pair_job_round_trips() {
    let job = UpdatePairJob {
        symbol: "BTCUSDT".to_string(),
    };
    let json = serde_json::to_string(&job).expect("serialize");
    assert_eq!(json, r#"{"symbol":"BTCUSDT"}"#);

    let back: UpdatePairJob = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, job);
}

#[test]
fn marker_jobs_round_trip() {
    let json = serde_json::to_string(&RefreshNewsJob).expect("serialize");
    let back: RefreshNewsJob = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, RefreshNewsJob);

    let json = serde_json::to_string(&CleanupJob).expect("serialize");
    let back: CleanupJob = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, CleanupJob);
}
