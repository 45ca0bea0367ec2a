use super::hooks::{NoHooks, RunHooks};
use crate::client::{build_url, execute_request, fill_path_params, RequestDescriptor};
use crate::core::config::RunnerConfig;
use crate::core::error::ApiTestError;
use crate::core::json::to_plain_string;
use crate::model::{
    CapturedRequest, CapturedResponse, Environment, ErrorInfo, HttpMethod, Interface,
    InterfaceStatus, TestCase, TestResult, TestStatus,
};
use crate::resolve::{ExecutionRecord, RecordEntry, Resolver};
use crate::sandbox::{fallback, AssertionEvaluator, ScriptInput};
use crate::store::Store;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Drives one case through `pending → running → passed | failed | error`.
pub struct TestCaseRunner {
    store: Arc<dyn Store>,
    client: reqwest::Client,
    evaluator: AssertionEvaluator,
    hooks: Arc<dyn RunHooks>,
    config: RunnerConfig,
}

impl TestCaseRunner {
    pub fn new(store: Arc<dyn Store>, config: RunnerConfig) -> Self {
        Self {
            store,
            client: reqwest::Client::new(),
            evaluator: AssertionEvaluator::new(config.script_timeout()),
            hooks: Arc::new(NoHooks),
            config,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RunHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs `case` and appends its request/response to `record`, whatever the outcome.
    pub async fn run(
        &self,
        case: &TestCase,
        env_name: Option<&str>,
        record: &mut ExecutionRecord,
    ) -> TestResult {
        let span = tracing::info_span!("case", id = %case.id, name = %case.name);
        self.run_inner(case, env_name, record).instrument(span).await
    }

    async fn run_inner(
        &self,
        case: &TestCase,
        env_name: Option<&str>,
        record: &mut ExecutionRecord,
    ) -> TestResult {
        let mut result = TestResult::pending(&case.id, &case.name, &case.collection_id);
        result.status = TestStatus::Running;

        if let Err(error) = self.execute(case, env_name, record, &mut result).await {
            result.status = TestStatus::Error;
            result.error = Some(error);
        }

        record.push(RecordEntry {
            key: case.id.clone(),
            request: result.request.clone().unwrap_or_default(),
            response: result.response.clone(),
        });

        if let Err(e) = self.hooks.after_case(case, &result).await {
            tracing::warn!("after hook failed: {e}");
            result.hook_error = Some(e.to_string());
        }

        match result.status {
            TestStatus::Passed => tracing::info!(duration = result.duration, "passed"),
            TestStatus::Failed => tracing::info!(
                duration = result.duration,
                reason = result
                    .assertion_result
                    .as_ref()
                    .map(|a| a.message.as_str())
                    .unwrap_or_default(),
                "failed"
            ),
            _ => tracing::info!(
                duration = result.duration,
                error = result
                    .error
                    .as_ref()
                    .map(|e| e.message.as_str())
                    .unwrap_or_default(),
                "error"
            ),
        }
        result
    }

    /// Fills `result` up to a terminal pass/fail; an `Err` means the case errored.
    async fn execute(
        &self,
        case: &TestCase,
        env_name: Option<&str>,
        record: &ExecutionRecord,
        result: &mut TestResult,
    ) -> Result<(), ErrorInfo> {
        let interface = self.store.interface(&case.interface_id).map_err(lookup_error)?;
        let project = self
            .store
            .project(&interface.project_id)
            .map_err(lookup_error)?;
        let environment = project.select_environment(env_name).cloned();
        if let (Some(requested), Some(env)) = (env_name, environment.as_ref()) {
            if env.name != requested {
                tracing::warn!("environment '{requested}' not found, using '{}'", env.name);
            }
        }

        if let Err(e) = self.hooks.before_case(case).await {
            return Err(ErrorInfo::new(format!("before hook failed: {e}")));
        }

        if interface.status == InterfaceStatus::Deprecated {
            tracing::warn!(interface = %interface.id, "running a case against a deprecated interface");
        }

        let (descriptor, captured) =
            self.build_request(case, &interface, environment.as_ref(), record)?;
        result.request = Some(captured.clone());

        // Duration covers the HTTP call and the assertion script only.
        let started = Instant::now();
        let response =
            match execute_request(&self.client, &descriptor, self.config.request_timeout()).await {
                Ok(response) => response,
                Err(e) => {
                    result.duration = elapsed_ms(started);
                    return Err(ErrorInfo::from_error(&e));
                }
            };
        let response = CapturedResponse {
            status_code: response.status,
            headers: response.headers,
            body: response.body,
            duration: response.duration,
        };

        let input = ScriptInput::new(&response, &captured, record);
        result.response = Some(response);

        let assertion = match case.assertion_script.as_deref() {
            Some(script) if case.has_script() => self.evaluator.evaluate(script, input).await,
            _ => fallback(input.status),
        };
        result.status = if assertion.passed {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        };
        result.assertion_result = Some(assertion);
        result.duration = elapsed_ms(started);
        Ok(())
    }

    fn build_request(
        &self,
        case: &TestCase,
        interface: &Interface,
        environment: Option<&Environment>,
        record: &ExecutionRecord,
    ) -> Result<(RequestDescriptor, CapturedRequest), ErrorInfo> {
        let no_variables = BTreeMap::new();
        let variables = environment.map(|env| &env.variables).unwrap_or(&no_variables);
        let resolver = Resolver::new(record)
            .with_variables(variables)
            .strict(self.config.strict_resolution);
        let resolve_text = |text: &str| -> Result<String, ErrorInfo> {
            resolver
                .resolve_string(text)
                .map(|v| to_plain_string(&v))
                .map_err(|e| ErrorInfo::from_error(&e))
        };

        let template = &case.request;
        let raw_method = if template.method.trim().is_empty() {
            interface.method.as_str()
        } else {
            template.method.as_str()
        };
        let method_text = resolve_text(raw_method)?;
        let method = HttpMethod::from_str(&method_text)
            .ok_or_else(|| ErrorInfo::new(format!("Invalid HTTP method '{method_text}'")))?;

        let raw_path = if template.path.trim().is_empty() {
            &interface.path
        } else {
            &template.path
        };
        let path = resolve_text(raw_path)?;
        let path_params = resolver
            .resolve_map(&template.path_params)
            .map_err(|e| ErrorInfo::from_error(&e))?;
        let base_url = match environment {
            Some(env) => resolve_text(&env.base_url)?,
            None => String::new(),
        };
        let url = build_url(&base_url, &fill_path_params(&path, &path_params));

        let query = resolver
            .resolve_map(&template.query)
            .map_err(|e| ErrorInfo::from_error(&e))?;
        let body = resolver
            .resolve_value(&template.body)
            .map_err(|e| ErrorInfo::from_error(&e))?;

        let mut headers = BTreeMap::new();
        if let Some(env) = environment {
            for (name, value) in &env.headers {
                headers.insert(name.clone(), resolve_text(value)?);
            }
        }
        let case_headers = resolver
            .resolve_map(&template.headers)
            .map_err(|e| ErrorInfo::from_error(&e))?;
        merge_headers(&mut headers, &case_headers);

        let descriptor = RequestDescriptor {
            method,
            url: url.clone(),
            query: query.clone(),
            body: body.clone(),
            headers: headers.clone(),
        };
        let captured = CapturedRequest {
            method: method.as_str().to_string(),
            url,
            query,
            body,
            headers,
        };
        Ok((descriptor, captured))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn lookup_error(err: ApiTestError) -> ErrorInfo {
    ErrorInfo::from_error(&err)
}

/// Case headers replace environment headers with the same name, ignoring case.
fn merge_headers(headers: &mut BTreeMap<String, String>, overrides: &Map<String, Value>) {
    for (name, value) in overrides {
        if value.is_null() {
            continue;
        }
        headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        headers.insert(name.clone(), to_plain_string(value));
    }
}
