//! Integration Tests for the Owners Load Generator
//!
//! These tests run tasks and whole load tests against an in-memory owners
//! backend, checking what actually arrives on the wire.

use owners_loadgen::{
    Config, LoadTest, OwnerPayload, OwnersClient, Profile, RequestExecutor, Task, WaitTime,
};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::*;

fn client_for(addr: std::net::SocketAddr) -> OwnersClient {
    OwnersClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap()
}

// ============================================================================
// Single task execution against the owners API
// ============================================================================

mod tasks {
    use super::*;

    #[tokio::test]
    async fn test_create_then_read_owner_2_observes_created_owner() {
        let backend = MockBackend::with_first_owner();
        let (addr, server_handle) = start_mock_backend(backend.clone()).await;
        let client = client_for(addr);

        let created = client.execute(&Task::CreateOwner2.request()).await;
        assert_eq!(created.status, Some(200));

        let read = client.execute(&Task::ReadOwner2.request()).await;
        assert_eq!(read.status, Some(200));
        assert!(!read.is_failure());

        // Fetch the body separately to check what was stored
        let body: serde_json::Value = reqwest::get(format!("http://{}/owners/2", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["id"], 2);
        assert_eq!(body["firstName"], "Alice");
        assert_eq!(body["lastName"], "Smith");
        assert_eq!(body["telephone"], "5555555556");

        server_handle.abort();
    }

    #[tokio::test]
    async fn test_read_all_owners_on_empty_backend_is_empty_list() {
        let (addr, server_handle) = start_mock_backend(MockBackend::new()).await;
        let client = client_for(addr);

        let outcome = client.execute(&Task::ReadAllOwners.request()).await;
        assert_eq!(outcome.status, Some(200));
        assert!(!outcome.is_failure());

        let body: serde_json::Value = reqwest::get(format!("http://{}/owners", addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, serde_json::json!([]));

        server_handle.abort();
    }

    #[tokio::test]
    async fn test_read_before_create_is_a_recorded_failure() {
        let (addr, server_handle) = start_mock_backend(MockBackend::with_first_owner()).await;
        let client = client_for(addr);

        let outcome = client.execute(&Task::ReadOwner3.request()).await;
        assert_eq!(outcome.status, Some(404));
        assert!(outcome.is_failure());
        assert!(outcome.error.is_none());

        server_handle.abort();
    }

    #[tokio::test]
    async fn test_create_bodies_match_literal_payloads() {
        let backend = MockBackend::new();
        let (addr, server_handle) = start_mock_backend(backend.clone()).await;
        let client = client_for(addr);

        client.execute(&Task::CreateOwner2.request()).await;
        client.execute(&Task::CreateOwner3.request()).await;

        let owners = backend.owners();
        assert_eq!(owners.len(), 2);
        assert_eq!(owners[0].payload, OwnerPayload::alice_smith());
        assert_eq!(owners[1].payload, OwnerPayload::charlie_brown());

        server_handle.abort();
    }

    #[tokio::test]
    async fn test_create_is_not_idempotent() {
        let backend = MockBackend::with_first_owner();
        let (addr, server_handle) = start_mock_backend(backend.clone()).await;
        let client = client_for(addr);

        for _ in 0..3 {
            let outcome = client.execute(&Task::CreateOwner2.request()).await;
            assert_eq!(outcome.status, Some(200));
        }

        let alices: Vec<u32> = backend
            .owners()
            .into_iter()
            .filter(|o| o.payload == OwnerPayload::alice_smith())
            .map(|o| o.id)
            .collect();
        assert_eq!(alices, vec![2, 3, 4]);

        server_handle.abort();
    }
}

// ============================================================================
// Whole load test runs
// ============================================================================

mod runs {
    use super::*;

    fn fast_profile() -> Profile {
        Profile::owner_behavior().with_wait_time(
            WaitTime::from_durations(Duration::from_millis(1), Duration::from_millis(10)).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_run_against_backend_records_every_request() {
        init_test_logging();

        let backend = MockBackend::with_first_owner();
        let (addr, server_handle) = start_mock_backend(backend.clone()).await;

        let config = Config {
            host: format!("http://{}", addr),
            users: 5,
            spawn_rate: 50.0,
            seed: Some(2024),
            ..Default::default()
        };
        let test = LoadTest::new(config, fast_profile(), Arc::new(client_for(addr))).unwrap();

        let summary = test
            .run_until(tokio::time::sleep(Duration::from_millis(750)))
            .await
            .unwrap();

        assert_eq!(summary.users, 5);
        assert!(summary.total_requests > 20, "{}", summary.report());

        // Users interrupted mid-request may leave requests the backend saw but the
        // summary never recorded; never the other way round
        let seen = backend.requests();
        assert!(seen.len() as u64 >= summary.total_requests);
        assert!(seen.len() as u64 <= summary.total_requests + summary.users as u64);

        let allowed = [
            "GET /owners/1",
            "GET /owners",
            "POST /owners",
            "GET /owners/2",
            "GET /owners/3",
        ];
        for row in &summary.requests {
            assert!(allowed.contains(&row.name.as_str()), "unexpected {}", row.name);
        }
        for request in &seen {
            assert!(allowed.contains(&request.as_str()), "unexpected {}", request);
        }

        // Only the two literal owners are ever created
        for owner in backend.owners().iter().skip(1) {
            assert!(
                owner.payload == OwnerPayload::alice_smith()
                    || owner.payload == OwnerPayload::charlie_brown()
            );
        }

        // Owner 1 exists and the list endpoint never fails
        assert_eq!(summary.row("GET /owners/1").map(|r| r.failures), Some(0));
        assert_eq!(summary.row("GET /owners").map(|r| r.failures), Some(0));

        server_handle.abort();
    }

    #[tokio::test]
    async fn test_run_keeps_going_when_target_is_down() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = Config {
            host: format!("http://{}", addr),
            users: 2,
            spawn_rate: 100.0,
            ..Default::default()
        };
        let test = LoadTest::new(config, fast_profile(), Arc::new(client_for(addr))).unwrap();

        let summary = test
            .run_until(tokio::time::sleep(Duration::from_millis(300)))
            .await
            .unwrap();

        assert!(summary.total_requests > 2);
        assert_eq!(summary.total_failures, summary.total_requests);
        assert!(summary.requests.iter().all(|r| r.status_counts.is_empty()));
        // Every failure is attributed to a transport error, not a status
        for row in &summary.requests {
            assert_eq!(row.errors.values().sum::<u64>(), row.failures, "{}", row.name);
            assert!(row.errors.keys().all(|reason| !reason.starts_with("HTTP ")));
        }
        assert!(summary.report().contains("Failures:"));
    }

    #[tokio::test]
    async fn test_json_summary_is_parseable() {
        let (addr, server_handle) = start_mock_backend(MockBackend::new()).await;

        let config = Config {
            host: format!("http://{}", addr),
            users: 1,
            ..Default::default()
        };
        let test = LoadTest::new(config, fast_profile(), Arc::new(client_for(addr))).unwrap();
        let summary = test
            .run_until(tokio::time::sleep(Duration::from_millis(200)))
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&summary.to_json()).unwrap();
        assert_eq!(json["users"], 1);
        assert_eq!(json["total_requests"], summary.total_requests);

        server_handle.abort();
    }
}
