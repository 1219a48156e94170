use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};
use slot_cell::models::SlotError;
use slot_cell::services::SlotGeneratorService;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn generator_for(mock_server: &MockServer) -> SlotGeneratorService {
    let config = TestConfig::for_mock_server(&mock_server.uri()).to_app_config();
    SlotGeneratorService::new(&config)
}

async fn mock_schedules(mock_server: &MockServer, rows: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/clinic_schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(rows)))
        .mount(mock_server)
        .await;
}

async fn mock_existence_checks(mock_server: &MockServer, rows: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointment_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(rows)))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn generates_every_slot_for_a_tuesday_schedule() {
    let mock_server = MockServer::start().await;
    let schedule_id = Uuid::new_v4();

    mock_schedules(&mock_server, vec![MockSupabaseResponses::schedule_row(
        schedule_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        2,
        "09:00:00",
        "12:00:00",
        30,
    )]).await;
    mock_existence_checks(&mock_server, vec![]).await;

    // All staged rows land in one bulk insert.
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointment_slots"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator = generator_for(&mock_server);
    // 2025-01-06 is a Monday; the window holds exactly one Tuesday.
    let report = generator
        .generate_for_window(date("2025-01-06"), date("2025-01-12"))
        .await
        .unwrap();

    assert_eq!(report.schedules_processed, 1);
    assert_eq!(report.schedules_skipped, 0);
    assert_eq!(report.slots_created, 6);
    assert_eq!(report.slots_skipped, 0);

    // The single POST carried all six rows, already ordered by start time.
    let requests = mock_server.received_requests().await.unwrap();
    let insert = requests
        .iter()
        .find(|r| r.method.to_string() == "POST")
        .expect("bulk insert request");
    let rows: Vec<Value> = serde_json::from_slice(&insert.body).unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["start_time"], "09:00:00");
    assert_eq!(rows[0]["is_booked"], false);
    assert_eq!(rows[5]["start_time"], "11:30:00");
    assert_eq!(rows[5]["end_time"], "12:00:00");
}

#[tokio::test]
async fn rerun_skips_slots_that_already_exist() {
    let mock_server = MockServer::start().await;
    let schedule_id = Uuid::new_v4();

    mock_schedules(&mock_server, vec![MockSupabaseResponses::schedule_row(
        schedule_id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        2,
        "09:00:00",
        "12:00:00",
        30,
    )]).await;
    // Every existence probe finds a row, as after a completed first run.
    mock_existence_checks(&mock_server, vec![MockSupabaseResponses::slot_row(
        Uuid::new_v4(),
        schedule_id,
        "2025-01-07",
        "09:00:00",
        "09:30:00",
        false,
    )]).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointment_slots"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let generator = generator_for(&mock_server);
    let report = generator
        .generate_for_window(date("2025-01-06"), date("2025-01-12"))
        .await
        .unwrap();

    assert_eq!(report.slots_created, 0);
    assert_eq!(report.slots_skipped, 6);
}

#[tokio::test]
async fn malformed_schedule_does_not_block_siblings() {
    let mock_server = MockServer::start().await;
    let broken_id = Uuid::new_v4();
    let healthy_id = Uuid::new_v4();

    mock_schedules(&mock_server, vec![
        // start == end: refused by expansion, skipped by the run.
        MockSupabaseResponses::schedule_row(
            broken_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            2,
            "09:00:00",
            "09:00:00",
            30,
        ),
        MockSupabaseResponses::schedule_row(
            healthy_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            2,
            "09:00:00",
            "10:00:00",
            30,
        ),
    ]).await;
    mock_existence_checks(&mock_server, vec![]).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointment_slots"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let generator = generator_for(&mock_server);
    let report = generator
        .generate_for_window(date("2025-01-06"), date("2025-01-12"))
        .await
        .unwrap();

    assert_eq!(report.schedules_skipped, 1);
    assert_eq!(report.schedules_processed, 1);
    assert_eq!(report.slots_created, 2);

    let requests = mock_server.received_requests().await.unwrap();
    let insert = requests
        .iter()
        .find(|r| r.method.to_string() == "POST")
        .expect("bulk insert request");
    let rows: Vec<Value> = serde_json::from_slice(&insert.body).unwrap();
    assert!(rows.iter().all(|row| row["clinic_schedule_id"] == json!(healthy_id)));
}

#[tokio::test]
async fn inverted_window_generates_nothing() {
    let mock_server = MockServer::start().await;

    mock_schedules(&mock_server, vec![MockSupabaseResponses::schedule_row(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        2,
        "09:00:00",
        "12:00:00",
        30,
    )]).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointment_slots"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let generator = generator_for(&mock_server);
    let report = generator
        .generate_for_window(date("2025-01-12"), date("2025-01-06"))
        .await
        .unwrap();

    assert_eq!(report.schedules_processed, 1);
    assert_eq!(report.slots_created, 0);
    assert_eq!(report.slots_skipped, 0);
}

#[tokio::test]
async fn storage_failure_aborts_the_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/clinic_schedules"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&mock_server)
        .await;

    let generator = generator_for(&mock_server);
    let result = generator
        .generate_for_window(date("2025-01-06"), date("2025-01-12"))
        .await;

    assert_matches!(result, Err(SlotError::DatabaseError(_)));
}

#[tokio::test]
async fn failed_bulk_insert_surfaces_as_error() {
    let mock_server = MockServer::start().await;

    mock_schedules(&mock_server, vec![MockSupabaseResponses::schedule_row(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        2,
        "09:00:00",
        "10:00:00",
        30,
    )]).await;
    mock_existence_checks(&mock_server, vec![]).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointment_slots"))
        .respond_with(ResponseTemplate::new(503).set_body_string("write failed"))
        .mount(&mock_server)
        .await;

    let generator = generator_for(&mock_server);
    let result = generator
        .generate_for_window(date("2025-01-06"), date("2025-01-12"))
        .await;

    assert_matches!(result, Err(SlotError::DatabaseError(_)));
}
