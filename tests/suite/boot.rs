//! Startup against mock HTTP servers and a headless terminal.

use pickem_engine::{Bootstrap, Host, Metric, MetricName, ROOT_MOUNT_ID, VitalsCallback};
use pickem_tui::{Command, TerminalHost, run_command};
use pickem_types::UiOptions;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{date, screen, services_for, start_season_2022, test_terminal};

#[tokio::test]
async fn startup_fetches_leagues_and_current_season() {
    let server = start_season_2022().await;
    let mut host = TerminalHost::new(test_terminal(90, 24), UiOptions::default());

    let booted = Bootstrap::new(services_for(&server, date(2022, 3, 22), Some("u-7")))
        .run(&mut host)
        .unwrap();
    assert_eq!(booted.store.stats().thunks, 2);
    booted.store.settle().await;

    let requests = server.received_requests().await.unwrap();
    let paths: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert!(paths.contains(&"/leagues".to_string()));
    assert!(paths.contains(&"/api/f1/2022.json".to_string()));
    assert_eq!(requests.len(), 2);
    let leagues_request = requests.iter().find(|r| r.url.path() == "/leagues").unwrap();
    assert_eq!(leagues_request.url.query(), Some("userId=u-7"));

    let state = booted.store.state();
    assert_eq!(state.leagues.loaded().map(Vec::len), Some(2));
    // 22 March: Bahrain is done, Saudi Arabia is next.
    assert_eq!(state.selected().map(|race| race.round), Some(2));

    host.redraw().unwrap();
    let rows = screen(host.terminal());
    assert!(rows.contains("Fast Boiz"));
    assert!(rows.contains("Pit Wall"));
    assert!(rows.contains("Schedule 2022"));
    assert!(rows.contains("Saudi Arabian Grand Prix"));
}

#[tokio::test]
async fn results_load_on_demand() {
    let server = start_season_2022().await;
    let mut host = TerminalHost::new(test_terminal(90, 30), UiOptions::default());
    let booted = Bootstrap::new(services_for(&server, date(2022, 3, 1), None))
        .run(&mut host)
        .unwrap();
    booted.store.settle().await;

    run_command(&booted.store, Command::LoadResults);
    booted.store.settle().await;
    host.redraw().unwrap();

    let rows = screen(host.terminal());
    assert!(rows.contains("P1"));
    assert!(rows.contains("Charles Leclerc"));
}

#[tokio::test]
async fn failed_fetches_do_not_fail_startup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leagues"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/f1/2022.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let mut host = TerminalHost::new(test_terminal(120, 20), UiOptions::default());
    let booted = Bootstrap::new(services_for(&server, date(2022, 5, 1), None))
        .run(&mut host)
        .unwrap();
    booted.store.settle().await;

    let state = booted.store.state();
    assert!(state.leagues.error().unwrap().contains("HTTP 502"));
    assert!(state.races.error().unwrap().contains("decode"));

    host.redraw().unwrap();
    assert!(screen(host.terminal()).contains("HTTP 502"));
}

#[tokio::test]
async fn season_follows_the_clock() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/f1/2024.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(crate::common::schedule_body(
            2024,
            &[(1, "Bahrain Grand Prix", "2024-03-02")],
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/leagues"))
        .and(query_param("userId", "me"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "leagues": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut host = TerminalHost::new(test_terminal(80, 20), UiOptions::default());
    let booted = Bootstrap::new(services_for(&server, date(2024, 1, 10), Some("me")))
        .run(&mut host)
        .unwrap();
    booted.store.settle().await;

    host.redraw().unwrap();
    let rows = screen(host.terminal());
    assert!(rows.contains("Schedule 2024"));
    assert!(rows.contains("No leagues yet"));
}

#[tokio::test]
async fn vitals_report_first_data_once() {
    let server = start_season_2022().await;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: VitalsCallback =
        Arc::new(move |metric: Metric| sink.lock().unwrap().push(metric.name));

    let mut host = TerminalHost::new(test_terminal(80, 20), UiOptions::default());
    let booted = Bootstrap::new(services_for(&server, date(2022, 3, 1), None))
        .with_vitals(Some(callback))
        .run(&mut host)
        .unwrap();
    booted.vitals.unwrap().await.unwrap();

    let names = seen.lock().unwrap().clone();
    assert_eq!(
        names,
        vec![
            MetricName::StoreInit,
            MetricName::Prefetch,
            MetricName::Mount,
            MetricName::FirstData
        ]
    );
}

#[tokio::test]
async fn remounting_replaces_the_tree() {
    let server = start_season_2022().await;
    let mut host = TerminalHost::new(test_terminal(80, 20), UiOptions::default());
    let booted = Bootstrap::new(services_for(&server, date(2022, 3, 1), None))
        .run(&mut host)
        .unwrap();

    let other = pickem_engine::Store::new(services_for(&server, date(2022, 3, 1), None)).unwrap();
    host.mount(ROOT_MOUNT_ID, &other).unwrap();
    booted.store.settle().await;

    let mounted = host.mounted_store().unwrap();
    assert_eq!(mounted.stats().thunks, 0);
    assert_eq!(booted.store.stats().thunks, 2);
}
