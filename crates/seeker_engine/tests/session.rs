use std::sync::{Arc, Once};
use std::thread;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use seeker_core::{RequestStatus, SearchSettings, SearchViewModel};
use seeker_engine::{FetchSettings, JsonFetcher, SearchSession};
use serde::Deserialize;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct Results {
    items: Vec<String>,
}

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(seeker_logging::initialize_for_tests);
}

fn session(server: &MockServer, debounce_ms: u64) -> SearchSession<Results> {
    let fetcher = JsonFetcher::new(
        &format!("{}/search", server.uri()),
        "q",
        FetchSettings::default(),
    )
    .expect("valid base url");
    SearchSession::new(
        SearchSettings {
            debounce_delay: Duration::from_millis(debounce_ms),
        },
        Arc::new(fetcher),
    )
}

fn items_body(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("\"{item}\"")).collect();
    format!("{{\"items\":[{}]}}", quoted.join(","))
}

fn pump_until(
    session: &mut SearchSession<Results>,
    timeout: Duration,
    pred: impl Fn(&SearchViewModel<Results>) -> bool,
) -> SearchViewModel<Results> {
    let deadline = Instant::now() + timeout;
    loop {
        session.pump();
        let view = session.view();
        if pred(&view) {
            return view;
        }
        assert!(
            Instant::now() < deadline,
            "condition not met within {timeout:?}; last status {:?}",
            view.status
        );
        thread::sleep(Duration::from_millis(5));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn rapid_edits_issue_single_fetch_for_final_value() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "react"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(items_body(&["react docs"]), "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session(&server, 120);
    for text in ["r", "re", "rea", "reac", "react"] {
        session.edit(text);
        thread::sleep(Duration::from_millis(5));
    }

    let view = pump_until(&mut session, Duration::from_secs(5), |view| {
        view.status == RequestStatus::Success
    });

    assert_eq!(view.stable_value.as_deref(), Some("react"));
    assert_eq!(
        view.data,
        Some(Results {
            items: vec!["react docs".to_string()],
        })
    );
    // MockServer::verify (on drop) checks that exactly one request was made.
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_response_is_suppressed_end_to_end() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "slowterm"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(400))
                .set_body_raw(items_body(&["slow result"]), "application/json"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "fastterm"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(items_body(&["fast result"]), "application/json"),
        )
        .mount(&server)
        .await;

    let mut session = session(&server, 20);
    session.edit("slowterm");
    pump_until(&mut session, Duration::from_secs(5), |view| {
        view.status == RequestStatus::Loading
    });

    // Supersede the slow request before it resolves.
    session.edit("fastterm");
    let view = pump_until(&mut session, Duration::from_secs(5), |view| {
        view.status == RequestStatus::Success
    });
    assert_eq!(
        view.data,
        Some(Results {
            items: vec!["fast result".to_string()],
        })
    );

    // Give the slow response time to arrive; it must not overwrite anything.
    thread::sleep(Duration::from_millis(600));
    session.pump();
    assert_eq!(
        session.view().data,
        Some(Results {
            items: vec!["fast result".to_string()],
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn clearing_the_input_returns_to_idle() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "x"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(items_body(&["x result"]), "application/json"),
        )
        .mount(&server)
        .await;

    let mut session = session(&server, 20);
    session.edit("x");
    pump_until(&mut session, Duration::from_secs(5), |view| {
        view.status == RequestStatus::Success
    });

    session.edit("");
    let view = pump_until(&mut session, Duration::from_secs(5), |view| {
        view.status == RequestStatus::Idle
    });

    assert!(view.has_value);
    assert_eq!(view.data, None);
    assert_eq!(view.error, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn error_surfaces_and_refetch_recovers() {
    init_logging();
    let server = MockServer::start().await;
    // First request fails; the retry succeeds.
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "x"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "x"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(items_body(&["x result"]), "application/json"),
        )
        .mount(&server)
        .await;

    let mut session = session(&server, 20);
    session.edit("x");
    let view = pump_until(&mut session, Duration::from_secs(5), |view| {
        view.status == RequestStatus::Error
    });
    assert!(view.error.is_some());

    session.refetch();
    let view = pump_until(&mut session, Duration::from_secs(5), |view| {
        view.status == RequestStatus::Success
    });
    assert_eq!(
        view.data,
        Some(Results {
            items: vec!["x result".to_string()],
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn dispose_cancels_pending_work() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(items_body(&["never shown"]), "application/json"),
        )
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session(&server, 50);
    session.edit("x");
    session.dispose();

    // Long past the debounce delay: the cancelled timer must not fire a
    // fetch, and the disposed session must stay inert.
    thread::sleep(Duration::from_millis(250));
    assert!(!session.pump());
    let view = session.view();
    assert_eq!(view.status, RequestStatus::Idle);
    assert!(!view.has_value);
}
