//! Shared test utilities and fixtures
//!
//! Mock Ergast and pick'em servers plus a headless terminal.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pickem_engine::{FixedClock, Services};
use pickem_providers::{ErgastClient, LeagueSource, PickemApi, RetryConfig};

pub const GRID_SIZE: usize = 20;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn no_retry() -> RetryConfig {
    RetryConfig::with_max_retries(0)
}

/// Ergast schedule body for `season` with `(round, name, date)` races.
pub fn schedule_body(season: u16, races: &[(u32, &str, &str)]) -> Value {
    let races: Vec<Value> = races
        .iter()
        .map(|(round, name, date)| {
            json!({
                "season": season.to_string(),
                "round": round.to_string(),
                "raceName": name,
                "date": date,
                "time": "15:00:00Z"
            })
        })
        .collect();
    json!({
        "MRData": {
            "limit": "30",
            "offset": "0",
            "total": races.len().to_string(),
            "RaceTable": { "season": season.to_string(), "Races": races }
        }
    })
}

/// Complete Ergast result set with `winner` in P1.
pub fn results_body(date: &str, winner: (&str, &str)) -> Value {
    let results: Vec<Value> = (1..=GRID_SIZE)
        .map(|position| {
            let (given, family) = if position == 1 {
                winner
            } else {
                ("Driver", "Backmarker")
            };
            json!({
                "position": position.to_string(),
                "Driver": { "givenName": given, "familyName": family }
            })
        })
        .collect();
    json!({ "MRData": { "RaceTable": { "Races": [{ "date": date, "Results": results }] } } })
}

pub fn leagues_body() -> Value {
    json!({
        "leagues": [
            { "id": "1", "name": "Fast Boiz", "num_of_members": 11, "season": "2022" },
            { "id": "2", "name": "Pit Wall", "num_of_members": 3, "season": "2022" }
        ]
    })
}

pub async fn mount_json(server: &MockServer, at: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// A server answering the 2022 schedule, Bahrain results and leagues.
pub async fn start_season_2022() -> MockServer {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/f1/2022.json",
        schedule_body(
            2022,
            &[
                (1, "Bahrain Grand Prix", "2022-03-20"),
                (2, "Saudi Arabian Grand Prix", "2022-03-27"),
                (3, "Australian Grand Prix", "2022-04-10"),
            ],
        ),
    )
    .await;
    mount_json(
        &server,
        "/api/f1/2022/1/results.json",
        results_body("2022-03-20", ("Charles", "Leclerc")),
    )
    .await;
    mount_json(&server, "/leagues", leagues_body()).await;
    server
}

/// Real HTTP clients pointed at `server`.
pub fn services_for(server: &MockServer, today: NaiveDate, user_id: Option<&str>) -> Services {
    let http = reqwest_client();
    let races = ErgastClient::new(server.uri(), http.clone()).with_retry(no_retry());
    let leagues: Arc<dyn LeagueSource> =
        Arc::new(PickemApi::new(server.uri(), http).with_retry(no_retry()));
    Services {
        races: Arc::new(races),
        leagues,
        user_id: user_id.map(str::to_string),
        clock: Arc::new(FixedClock(today)),
    }
}

fn reqwest_client() -> reqwest::Client {
    pickem_providers::http_client(std::time::Duration::from_secs(5)).unwrap()
}

pub fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(width, height)).unwrap()
}

pub fn screen(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let width = usize::from(buffer.area.width);
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
