use apitest_lib::core::error::HookError;
use apitest_lib::model::{
    Environment, HttpMethod, Interface, InterfaceStatus, Project, RequestTemplate, TestCase,
    TestCollection, TestResult, TestStatus,
};
use apitest_lib::{ApiTestError, CollectionRunner, MemoryStore, RunHooks, RunnerConfig, Store};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn project(base_url: &str) -> Project {
    let mut variables = BTreeMap::new();
    variables.insert("api_key".to_string(), "k-123".to_string());
    let mut headers = BTreeMap::new();
    headers.insert("X-Api-Key".to_string(), "{{api_key}}".to_string());
    headers.insert("Accept".to_string(), "application/json".to_string());
    Project {
        id: "p1".to_string(),
        name: "Shop".to_string(),
        environments: vec![Environment {
            name: "default".to_string(),
            base_url: base_url.to_string(),
            variables,
            headers,
        }],
    }
}

fn interface(id: &str, method: HttpMethod, path: &str) -> Interface {
    Interface {
        id: id.to_string(),
        project_id: "p1".to_string(),
        name: id.to_string(),
        method,
        path: path.to_string(),
        query: Vec::new(),
        headers: Vec::new(),
        body: Value::Null,
        status: InterfaceStatus::Completed,
    }
}

fn case(id: &str, interface_id: &str, order: i64, script: Option<&str>) -> TestCase {
    TestCase {
        id: id.to_string(),
        collection_id: "c1".to_string(),
        interface_id: interface_id.to_string(),
        name: format!("case {id}"),
        order,
        enabled: true,
        request: RequestTemplate::default(),
        assertion_script: script.map(str::to_string),
    }
}

fn store(base_url: &str, cases: Vec<TestCase>) -> Arc<MemoryStore> {
    let mut store = MemoryStore::new()
        .with_project(project(base_url))
        .with_interface(interface("ping", HttpMethod::GET, "/ping"))
        .with_interface(interface("login", HttpMethod::POST, "/login"))
        .with_interface(interface("user", HttpMethod::GET, "/users/{id}"))
        .with_collection(TestCollection {
            id: "c1".to_string(),
            project_id: "p1".to_string(),
            name: "Smoke".to_string(),
            description: None,
        });
    for case in cases {
        store = store.with_test_case(case);
    }
    Arc::new(store)
}

fn runner(store: Arc<MemoryStore>) -> CollectionRunner {
    CollectionRunner::new(store, RunnerConfig::default())
}

async fn ping_server(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_cases_run_in_ascending_order() {
    let server = ping_server(200).await;
    let store = store(
        &server.uri(),
        vec![
            case("third", "ping", 3, None),
            case("first", "ping", 1, None),
            case("second", "ping", 2, None),
        ],
    );

    let report = runner(store).run("c1", None).await.unwrap();

    let ids: Vec<_> = report.results.iter().map(|r| r.test_case_id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second", "third"]);
    assert_eq!(report.total, 3);
    assert_eq!(report.passed, 3);
    assert!(report.is_success());
}

#[tokio::test]
async fn test_disabled_cases_are_skipped() {
    let server = ping_server(200).await;
    let mut disabled = case("off", "ping", 0, None);
    disabled.enabled = false;
    let store = store(&server.uri(), vec![disabled, case("on", "ping", 1, None)]);

    let report = runner(store).run("c1", None).await.unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].test_case_id, "on");
}

#[tokio::test]
async fn test_later_case_reads_earlier_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc", "id": 42})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/42"))
        .and(header("authorization", "Bearer abc"))
        .and(header("x-api-key", "k-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42, "name": "ann"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut user = case(
        "user",
        "user",
        2,
        Some(r#"assert.equal(body.id, records[0].response.body.id); assert.equal(body.name, "ann");"#),
    );
    user.request.path_params = json!({"id": "$.login.body.id"}).as_object().cloned().unwrap();
    user.request.headers = json!({"Authorization": "Bearer $.login.body.token"})
        .as_object()
        .cloned()
        .unwrap();
    let store = store(&server.uri(), vec![case("login", "login", 1, None), user]);

    let report = runner(store).run("c1", None).await.unwrap();

    assert_eq!(report.passed, 2, "{:?}", report.results);
    let request = report.results[1].request.as_ref().unwrap();
    assert_eq!(request.url, format!("{}/users/42", server.uri()));
}

#[tokio::test]
async fn test_fallback_policy_without_script() {
    let server = MockServer::start().await;
    Mock::given(path("/ping"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut missing = case("missing", "ping", 2, None);
    missing.request.path = "/missing".to_string();
    let store = store(&server.uri(), vec![case("ok", "ping", 1, None), missing]);

    let report = runner(store).run("c1", None).await.unwrap();

    assert_eq!(report.results[0].status, TestStatus::Passed);
    assert_eq!(report.results[1].status, TestStatus::Failed);
    assert_eq!(report.passed + report.failed + report.errors, report.total);
}

#[tokio::test]
async fn test_transport_error_does_not_halt_run() {
    let server = ping_server(200).await;
    let mut unreachable = case("down", "ping", 1, Some("assert.ok(true);"));
    unreachable.request.path = "http://127.0.0.1:1/ping".to_string();
    let store = store(&server.uri(), vec![unreachable, case("up", "ping", 2, None)]);

    let report = runner(store).run("c1", None).await.unwrap();

    let down = &report.results[0];
    assert_eq!(down.status, TestStatus::Error);
    assert!(down.response.is_none());
    assert!(down.assertion_result.is_none());
    assert!(down.error.is_some());
    assert_eq!(report.results[1].status, TestStatus::Passed);
    assert_eq!((report.passed, report.failed, report.errors), (1, 0, 1));
    assert!(!report.is_success());
}

#[tokio::test]
async fn test_script_cannot_reach_modules() {
    let server = ping_server(200).await;
    let store = store(
        &server.uri(),
        vec![case("fs", "ping", 1, Some("const fs = require('fs'); fs.readFileSync('/etc/hosts');"))],
    );

    let report = runner(store).run("c1", None).await.unwrap();

    assert_eq!(report.results[0].status, TestStatus::Failed);
}

#[tokio::test]
async fn test_runaway_script_fails_within_timeout() {
    let server = ping_server(200).await;
    let store = store(&server.uri(), vec![case("loop", "ping", 1, Some("for (;;) {}"))]);
    let config = RunnerConfig {
        script_timeout_ms: 300,
        ..RunnerConfig::default()
    };

    let started = std::time::Instant::now();
    let report = CollectionRunner::new(store, config).run("c1", None).await.unwrap();

    assert_eq!(report.results[0].status, TestStatus::Failed);
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}

#[tokio::test]
async fn test_bad_directives_do_not_abort_the_run() {
    let server = ping_server(200).await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    let mut odd = case("odd", "login", 1, None);
    odd.request.body = json!({
        "name": "@string(20000)",
        "bio": "@paragraph(20000)",
        "price": "@float(NaN,1)",
        "limit": "@float(0,inf)",
        "at": "@now(%Q)",
        "day": "@date(%Q)"
    });
    let store = store(&server.uri(), vec![odd, case("after", "ping", 2, None)]);

    let report = runner(store).run("c1", None).await.unwrap();

    assert_eq!(report.total, 2);
    assert_eq!((report.passed, report.failed, report.errors), (2, 0, 0));
    let sent = &report.results[0].request.as_ref().unwrap().body;
    assert_eq!(sent["name"].as_str().unwrap().len(), 10_000);
    assert_eq!(sent["price"], "@float(NaN,1)");
    assert_eq!(sent["limit"], "@float(0,inf)");
    assert_eq!(sent["at"], "@now(%Q)");
    assert_eq!(sent["day"], "@date(%Q)");
    assert_eq!(report.results[1].test_case_id, "after");
}

#[tokio::test]
async fn test_unknown_collection_is_an_error() {
    let store = store("http://127.0.0.1:1", Vec::new());
    let err = runner(store).run("nope", None).await.unwrap_err();
    assert!(matches!(err, ApiTestError::CollectionNotFound(id) if id == "nope"));
}

#[tokio::test]
async fn test_empty_collection_reports_zero() {
    let store = store("http://127.0.0.1:1", Vec::new());
    let report = runner(store).run("c1", None).await.unwrap();
    assert_eq!((report.total, report.passed, report.failed, report.errors), (0, 0, 0, 0));
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn test_missing_interface_is_case_error() {
    let store = store("http://127.0.0.1:1", vec![case("ghost", "no-such-interface", 1, None)]);
    let report = runner(store).run("c1", None).await.unwrap();
    let result = &report.results[0];
    assert_eq!(result.status, TestStatus::Error);
    assert!(result
        .error
        .as_ref()
        .unwrap()
        .message
        .contains("no-such-interface"));
}

#[tokio::test]
async fn test_strict_mode_rejects_unknown_reference() {
    let server = ping_server(200).await;
    let mut dangling = case("dangling", "ping", 1, None);
    dangling.request.query = json!({"token": "$.nobody.body.token"}).as_object().cloned().unwrap();
    let config = RunnerConfig {
        strict_resolution: true,
        ..RunnerConfig::default()
    };

    let strict = CollectionRunner::new(store(&server.uri(), vec![dangling.clone()]), config);
    let report = strict.run("c1", None).await.unwrap();
    assert_eq!(report.results[0].status, TestStatus::Error);

    let lenient = runner(store(&server.uri(), vec![dangling]));
    let report = lenient.run("c1", None).await.unwrap();
    assert_eq!(report.results[0].status, TestStatus::Passed);
    let query = &report.results[0].request.as_ref().unwrap().query;
    assert_eq!(query["token"], json!("$.nobody.body.token"));
}

#[tokio::test]
async fn test_results_are_persisted() {
    let server = ping_server(200).await;
    let store = store(&server.uri(), vec![case("a", "ping", 1, None), case("b", "ping", 2, None)]);
    let report = runner(store.clone()).run("c1", None).await.unwrap();

    let stored = store.results("c1").unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored, report.results);
}

#[tokio::test]
async fn test_run_single_case_ignores_enabled_flag() {
    let server = ping_server(200).await;
    let mut disabled = case("solo", "ping", 1, Some("assert.equal(status, 200);"));
    disabled.enabled = false;
    let store = store(&server.uri(), vec![disabled]);

    let result = runner(store.clone()).run_case("solo", None).await.unwrap();

    assert_eq!(result.status, TestStatus::Passed);
    assert_eq!(store.results("c1").unwrap().len(), 1);
    assert!(matches!(
        runner(store).run_case("nope", None).await,
        Err(ApiTestError::TestCaseNotFound(_))
    ));
}

struct RejectingHooks;

#[async_trait]
impl RunHooks for RejectingHooks {
    async fn before_case(&self, case: &TestCase) -> Result<(), HookError> {
        if case.id == "blocked" {
            return Err("not allowed".into());
        }
        Ok(())
    }

    async fn after_case(&self, _case: &TestCase, _result: &TestResult) -> Result<(), HookError> {
        Err("audit log unavailable".into())
    }
}

#[tokio::test]
async fn test_hooks_shape_results() {
    let server = MockServer::start().await;
    Mock::given(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let store = store(
        &server.uri(),
        vec![case("blocked", "ping", 1, None), case("allowed", "ping", 2, None)],
    );

    let report = runner(store)
        .with_hooks(Arc::new(RejectingHooks))
        .run("c1", None)
        .await
        .unwrap();

    let blocked = &report.results[0];
    assert_eq!(blocked.status, TestStatus::Error);
    assert_eq!(
        blocked.error.as_ref().unwrap().message,
        "before hook failed: not allowed"
    );
    let allowed = &report.results[1];
    assert_eq!(allowed.status, TestStatus::Passed);
    assert_eq!(allowed.hook_error.as_deref(), Some("audit log unavailable"));
}
