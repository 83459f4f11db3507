//! Scrape endpoint tests over a real listener.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sonar_exporter_agent::app_state::AppState;
use sonar_exporter_agent::config::{ExporterConfig, SonarSection};
use sonar_exporter_agent::fetch::SonarClient;
use sonar_exporter_agent::obs::metrics::ExporterMetrics;
use sonar_exporter_agent::poller::Poller;
use sonar_exporter_agent::router;
use sonar_exporter_core::GaugeSnapshot;

fn config(base_url: String) -> ExporterConfig {
    ExporterConfig::from_sonar(SonarSection { base_url, token: "squ_t".into() })
}

/// Serve the router on an ephemeral port; returns the base URL.
async fn serve(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router::build_router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn end_to_end_poll_then_scrape() {
    let sonar = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/license_usage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"projects": [
            {"projectName": "A", "branch": "main", "linesOfCode": 100},
            {"projectName": "B", "branch": "dev", "linesOfCode": 50}
        ]})))
        .mount(&sonar)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/system/info"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"health": {"status": "GREEN"}, "users": {"count": 7}})),
        )
        .mount(&sonar)
        .await;

    let state = AppState::new(config(sonar.uri()));
    let base = serve(state.clone()).await;
    let http = reqwest::Client::new();

    let ready = http.get(format!("{base}/readyz")).send().await.unwrap();
    assert_eq!(ready.status().as_u16(), 503);

    let poller = Poller::new(SonarClient::new(&state.cfg().sonar).unwrap(), state.clone());
    poller.poll_once().await.unwrap();

    let ready = http.get(format!("{base}/readyz")).send().await.unwrap();
    assert_eq!(ready.status().as_u16(), 200);

    let resp = http.get(format!("{base}/metrics")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let ctype = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(ctype.starts_with("text/plain; version=0.0.4"));

    let body = resp.text().await.unwrap();
    for line in [
        "sonarqube_health_check 1",
        "sonarqube_total_projects 2",
        "sonarqube_total_lines_of_code 150",
        "sonarqube_total_users 7",
        "sonarqube_loc_by_project{project_name=\"A\",branch=\"main\"} 100",
        "sonarqube_loc_by_project{project_name=\"B\",branch=\"dev\"} 50",
        "sonar_exporter_polls_total{outcome=\"ok\"} 1",
    ] {
        assert!(body.lines().any(|l| l == line), "missing line {line:?} in:\n{body}");
    }
}

#[tokio::test]
async fn healthz_is_always_ok() {
    let base = serve(AppState::new(config("http://127.0.0.1:1".into()))).await;
    let resp = reqwest::get(format!("{base}/healthz")).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

fn uniform_snapshot(projects: usize, loc: f64) -> GaugeSnapshot {
    let mut s = GaugeSnapshot {
        total_projects: projects as f64,
        total_loc: projects as f64 * loc,
        ..GaugeSnapshot::default()
    };
    for i in 0..projects {
        s.loc_by_project.insert((format!("p{i}"), "main".into()), loc);
    }
    s
}

/// Parse `name{...} value` / `name value` lines for one metric family.
fn values(body: &str, name: &str) -> Vec<f64> {
    body.lines()
        .filter(|l| !l.starts_with('#'))
        .filter(|l| l.split(['{', ' ']).next() == Some(name))
        .map(|l| l.rsplit(' ').next().unwrap().parse().unwrap())
        .collect()
}

#[test]
fn concurrent_render_never_sees_a_torn_update() {
    let metrics = Arc::new(ExporterMetrics::default());
    let stop = Arc::new(AtomicBool::new(false));

    let writer = {
        let metrics = Arc::clone(&metrics);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut flip = false;
            while !stop.load(Ordering::Relaxed) {
                let snap = if flip { uniform_snapshot(20, 1.0) } else { uniform_snapshot(5, 9.0) };
                metrics.publish(snap);
                flip = !flip;
            }
        })
    };

    for _ in 0..2_000 {
        let body = metrics.render();
        let locs = values(&body, "sonarqube_loc_by_project");
        let total = values(&body, "sonarqube_total_lines_of_code")[0];
        let projects = values(&body, "sonarqube_total_projects")[0];

        assert_eq!(locs.len() as f64, projects, "series count disagrees with total_projects");
        assert_eq!(locs.iter().sum::<f64>(), total, "series sum disagrees with total_loc");
        if let Some(first) = locs.first() {
            assert!(locs.iter().all(|v| v == first), "mixed series values: {locs:?}");
        }
    }

    stop.store(true, Ordering::Relaxed);
    writer.join().unwrap();
}
