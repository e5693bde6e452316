//! End-to-end swarm runs against a mock server

use clusterload_core::{
    ClusterIdentifiers, RandomIndex, SimulatedUser, Swarm, SwarmError, SwarmSettings, UserError,
    WaitTime,
};
use clusterload_http::HttpManager;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(users: usize, run_time: Duration) -> SwarmSettings {
    SwarmSettings {
        users,
        spawn_rate: 100.0,
        run_time: Some(run_time),
        wait_time: WaitTime::None,
        stats_interval: None,
    }
}

async fn cluster_server(status: u16) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/clusters/[0-9a-f]{40}$"))
        .respond_with(ResponseTemplate::new(status).set_body_string("{}"))
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_users_only_request_known_clusters() {
    let mock_server = cluster_server(200).await;
    let ids = Arc::new(ClusterIdentifiers::default());

    let swarm = Swarm::new(settings(3, Duration::from_millis(300))).unwrap();
    let client = HttpManager::new(&mock_server.uri()).unwrap();
    let report = swarm
        .run(client, |i| {
            SimulatedUser::with_index_source(Arc::clone(&ids), RandomIndex::seeded(i as u64))
        })
        .await
        .unwrap();

    assert!(report.total.requests > 0);
    assert_eq!(report.total.failures, 0);
    for entry in &report.entries {
        assert_eq!(entry.method, "GET");
        let id = entry.name.strip_prefix("/clusters/").unwrap();
        assert!(ids.contains(id), "unexpected entry {}", entry.name);
    }

    let received = mock_server.received_requests().await.unwrap();
    // Requests cut off by the shutdown reach the server but are never recorded.
    assert!(received.len() as u64 >= report.total.requests);
    assert!(received.iter().all(|r| r.body.is_empty()));
}

#[tokio::test]
async fn test_error_statuses_are_recorded_not_fatal() {
    let mock_server = cluster_server(503).await;
    let ids = Arc::new(ClusterIdentifiers::default());

    let swarm = Swarm::new(settings(2, Duration::from_millis(200))).unwrap();
    let client = HttpManager::new(&mock_server.uri()).unwrap();
    let report = swarm
        .run(client, |_| SimulatedUser::new(Arc::clone(&ids)))
        .await
        .unwrap();

    assert!(report.total.requests > 0);
    assert_eq!(report.total.failures, report.total.requests);
    assert_eq!(
        report.total.failure_reasons.get("HTTP 503"),
        Some(&report.total.requests)
    );
}

#[tokio::test]
async fn test_unreachable_target_is_recorded_not_fatal() {
    let ids = Arc::new(ClusterIdentifiers::default());
    let swarm = Swarm::new(SwarmSettings {
        wait_time: WaitTime::Constant(Duration::from_millis(20)),
        ..settings(1, Duration::from_millis(200))
    })
    .unwrap();

    let client = HttpManager::new("http://127.0.0.1:9").unwrap();
    let report = swarm
        .run(client, |_| SimulatedUser::new(Arc::clone(&ids)))
        .await
        .unwrap();

    assert!(report.total.requests > 0);
    assert_eq!(report.total.failures, report.total.requests);
    assert!(report.total.status_codes.is_empty());
    assert!(report
        .total
        .failure_reasons
        .keys()
        .all(|reason| reason == "connect" || reason == "network"));
}

#[tokio::test]
async fn test_empty_identifier_set_fails_fast() {
    let mock_server = cluster_server(200).await;
    let ids = Arc::new(ClusterIdentifiers::new(Vec::new()));

    // No run time: the swarm must end on its own once every user has failed.
    let swarm = Swarm::new(SwarmSettings {
        users: 2,
        spawn_rate: 100.0,
        stats_interval: None,
        ..Default::default()
    })
    .unwrap();
    let client = HttpManager::new(&mock_server.uri()).unwrap();

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        swarm.run(client, |_| SimulatedUser::new(Arc::clone(&ids))),
    )
    .await
    .unwrap();

    match result {
        Err(SwarmError::AllUsersFailed { users, source }) => {
            assert_eq!(users, 2);
            assert_eq!(source, UserError::EmptyIdentifierSet);
        }
        other => panic!("expected AllUsersFailed, got {:?}", other.map(|r| r.total)),
    }
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_shutdown_handle_stops_open_ended_run() {
    let mock_server = cluster_server(200).await;
    let ids = Arc::new(ClusterIdentifiers::default());

    let swarm = Swarm::new(SwarmSettings {
        users: 2,
        spawn_rate: 100.0,
        run_time: None,
        stats_interval: None,
        ..Default::default()
    })
    .unwrap();

    let shutdown = swarm.shutdown_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        shutdown.trigger("test over");
    });

    let client = HttpManager::new(&mock_server.uri()).unwrap();
    let report = tokio::time::timeout(
        Duration::from_secs(5),
        swarm.run(client, |_| SimulatedUser::new(Arc::clone(&ids))),
    )
    .await
    .unwrap()
    .unwrap();

    assert!(report.total.requests > 0);
}

#[tokio::test]
async fn test_constant_pacing_limits_iterations() {
    let mock_server = cluster_server(200).await;
    let ids = Arc::new(ClusterIdentifiers::default());

    let swarm = Swarm::new(SwarmSettings {
        wait_time: WaitTime::Constant(Duration::from_millis(100)),
        ..settings(1, Duration::from_millis(350))
    })
    .unwrap();
    let client = HttpManager::new(&mock_server.uri()).unwrap();
    let report = swarm
        .run(client, |_| SimulatedUser::new(Arc::clone(&ids)))
        .await
        .unwrap();

    assert!(report.total.requests >= 1);
    assert!(report.total.requests <= 4, "{} requests", report.total.requests);
}
