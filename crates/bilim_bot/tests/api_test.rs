use bilim_bot::{ApiState, CycleMetrics, CycleReport, spawn_api};

#[tokio::test]
async fn test_health_and_metrics_endpoints() {
    let metrics = CycleMetrics::new();
    metrics.record_publish();
    metrics.record_cycle(&CycleReport {
        attempts: 5,
        duplicates: 1,
        failed: 1,
        ..CycleReport::default()
    });

    let addr = spawn_api(0, ApiState::new(metrics.clone()))
        .await
        .expect("API should bind");
    let base = format!("http://127.0.0.1:{}", addr.port());

    let health: serde_json::Value = reqwest::get(format!("{base}/health"))
        .await
        .expect("health request")
        .json()
        .await
        .expect("health body");
    assert_eq!(health["status"], "ok");

    let snapshot: serde_json::Value = reqwest::get(format!("{base}/metrics"))
        .await
        .expect("metrics request")
        .json()
        .await
        .expect("metrics body");
    assert_eq!(snapshot["cycles"], 1);
    assert_eq!(snapshot["facts_generated"], 5);
    assert_eq!(snapshot["duplicates"], 1);
    assert_eq!(snapshot["published"], 1);
    assert_eq!(snapshot["failed"], 1);
    assert_eq!(snapshot["publish_success_rate"], 0.5);
}
