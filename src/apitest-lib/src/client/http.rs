use crate::core::error::HttpError;
use crate::core::json::{is_json_content, parse_body, to_plain_string, CONTENT_TYPE};
use crate::model::HttpMethod;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// A fully resolved request, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: String,
    pub query: Map<String, Value>,
    pub body: Value,
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
    /// Milliseconds from send to fully read body.
    pub duration: u64,
}

fn query_pairs(query: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in query {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|v| !v.is_null()) {
                    pairs.push((key.clone(), to_plain_string(item)));
                }
            }
            other => pairs.push((key.clone(), to_plain_string(other))),
        }
    }
    pairs
}

fn has_header(headers: &BTreeMap<String, String>, name: &str) -> bool {
    headers.keys().any(|k| k.eq_ignore_ascii_case(name))
}

/// Issues exactly one HTTP call. Only transport failures are errors.
pub async fn execute_request(
    client: &reqwest::Client,
    request: &RequestDescriptor,
    timeout: Duration,
) -> Result<HttpResponse, HttpError> {
    tracing::debug!(
        method = request.method.as_str(),
        url = %request.url,
        "executing request"
    );

    let url = reqwest::Url::parse(&request.url).map_err(|e| HttpError::InvalidUrl {
        url: request.url.clone(),
        reason: e.to_string(),
    })?;

    let mut req_builder = client
        .request(request.method.to_reqwest_method(), url)
        .timeout(timeout);

    let pairs = query_pairs(&request.query);
    if !pairs.is_empty() {
        req_builder = req_builder.query(&pairs);
    }

    if !has_header(&request.headers, "user-agent") {
        req_builder = req_builder.header(
            reqwest::header::USER_AGENT,
            crate::core::version::user_agent(),
        );
    }

    for (key, value) in &request.headers {
        tracing::debug!("adding header: {key}: {value}");
        req_builder = req_builder.header(key, value);
    }

    let sets_content_type = has_header(&request.headers, "content-type");
    match &request.body {
        Value::Null => {}
        Value::String(text) => {
            if !sets_content_type && is_json_content(text) {
                req_builder = req_builder.header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE);
            }
            req_builder = req_builder.body(text.clone());
        }
        structured => {
            if !sets_content_type {
                req_builder = req_builder.header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE);
            }
            req_builder = req_builder.body(structured.to_string());
        }
    }

    let timeout_ms = timeout.as_millis() as u64;
    let classify = |e: reqwest::Error| {
        if e.is_timeout() {
            HttpError::Timeout {
                timeout_ms,
                source: e,
            }
        } else {
            HttpError::Transport(e)
        }
    };

    let started = Instant::now();
    let response = req_builder.send().await.map_err(classify)?;
    let status = response.status().as_u16();

    let mut headers = BTreeMap::new();
    for (key, value) in response.headers() {
        if let Ok(value_str) = value.to_str() {
            headers.insert(key.to_string(), value_str.to_string());
        }
    }

    let text = response.text().await.map_err(classify)?;
    let duration = started.elapsed().as_millis() as u64;

    tracing::debug!(status, duration, "response received");

    Ok(HttpResponse {
        status,
        headers,
        body: parse_body(&text),
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn descriptor(method: HttpMethod, url: String) -> RequestDescriptor {
        RequestDescriptor {
            method,
            url,
            query: Map::new(),
            body: Value::Null,
            headers: BTreeMap::new(),
        }
    }

    #[test]
    fn test_query_pairs_flatten() {
        let query = json!({"a": 1, "b": "x", "c": null, "d": [1, 2]});
        let pairs = query_pairs(query.as_object().unwrap());
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "x".to_string()),
                ("d".to_string(), "1".to_string()),
                ("d".to_string(), "2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_json_body_query_and_headers_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users"))
            .and(query_param("page", "2"))
            .and(header("x-trace", "abc"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"name": "ann"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let mut request = descriptor(HttpMethod::POST, format!("{}/users", server.uri()));
        request.query = json!({"page": 2}).as_object().cloned().unwrap();
        request.body = json!({"name": "ann"});
        request.headers.insert("x-trace".to_string(), "abc".to_string());

        let response = execute_request(&reqwest::Client::new(), &request, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(response.status, 201);
        assert_eq!(response.body, json!({"id": 7}));
        assert_eq!(
            response.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_non_2xx_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let request = descriptor(HttpMethod::GET, format!("{}/nope", server.uri()));
        let response = execute_request(&reqwest::Client::new(), &request, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.body, json!("missing"));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let request = descriptor(HttpMethod::GET, format!("{}/slow", server.uri()));
        let err = execute_request(&reqwest::Client::new(), &request, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Timeout { timeout_ms: 50, .. }));
    }

    #[tokio::test]
    async fn test_relative_url_is_invalid() {
        let request = descriptor(HttpMethod::GET, "/users".to_string());
        let err = execute_request(&reqwest::Client::new(), &request, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::InvalidUrl { .. }));
    }
}
