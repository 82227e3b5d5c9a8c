use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use reqwest::Client;
use serde_json::{Value, json};

use lead_intake::config::{
    AirtableConfig, BusinessProfile, Config, IntakePolicy, PostmarkConfig,
};

pub const SALES_EMAIL: &str = "coach@ashtianyfitness.com";
pub const SCHEDULING_LINK: &str = "https://calendly.com/ashtiany/consult";

/// One request captured by the mock upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

struct UpstreamState {
    requests: Mutex<Vec<Recorded>>,
    airtable_status: AtomicU16,
    owner_status: AtomicU16,
    lead_status: AtomicU16,
}

/// Stands in for both Airtable (`/v0/...`) and Postmark (`/email`).
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    state: Arc<UpstreamState>,
}

impl MockUpstream {
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn airtable_requests(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with("/v0/"))
            .collect()
    }

    pub fn emails(&self) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == "/email")
            .map(|r| r.body)
            .collect()
    }

    pub fn emails_to(&self, to: &str) -> Vec<Value> {
        self.emails().into_iter().filter(|e| e["To"] == to).collect()
    }

    pub fn set_airtable_status(&self, status: u16) {
        self.state.airtable_status.store(status, Ordering::SeqCst);
    }

    pub fn set_owner_status(&self, status: u16) {
        self.state.owner_status.store(status, Ordering::SeqCst);
    }

    pub fn set_lead_status(&self, status: u16) {
        self.state.lead_status.store(status, Ordering::SeqCst);
    }
}

async fn record(
    State(state): State<Arc<UpstreamState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, axum::Json<Value>) {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let path = uri.path().to_string();

    let status = if path.starts_with("/v0/") {
        state.airtable_status.load(Ordering::SeqCst)
    } else if body["To"] == SALES_EMAIL {
        state.owner_status.load(Ordering::SeqCst)
    } else {
        state.lead_status.load(Ordering::SeqCst)
    };

    state.requests.lock().unwrap().push(Recorded {
        path,
        headers,
        body,
    });

    let status = StatusCode::from_u16(status).unwrap();
    let reply = if status.is_success() {
        json!({ "ErrorCode": 0, "Message": "OK" })
    } else {
        json!({ "ErrorCode": 406, "Message": "Upstream refused the request" })
    };
    (status, axum::Json(reply))
}

pub async fn spawn_upstream() -> MockUpstream {
    let state = Arc::new(UpstreamState {
        requests: Mutex::new(Vec::new()),
        airtable_status: AtomicU16::new(200),
        owner_status: AtomicU16::new(200),
        lead_status: AtomicU16::new(200),
    });

    let app = Router::new().fallback(record).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock upstream");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock upstream failed");
    });

    MockUpstream { addr, state }
}

/// A running intake server wired to a mock upstream.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub upstream: MockUpstream,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Post a form-submission event, return (body, status).
    pub async fn submit(&self, event: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/v1/intake"))
            .json(event)
            .send()
            .await
            .expect("submit failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Post raw bytes as JSON, return (body, status).
    pub async fn submit_raw(&self, body: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/v1/intake"))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("submit raw failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Post a direct form submission, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/v1/intake"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config(upstream: &MockUpstream) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        log_level: "warn".to_string(),
        max_body_size: 65_536,
        http_timeout_secs: 5,
        intake: IntakePolicy::default(),
        airtable: Some(AirtableConfig {
            api_url: format!("http://{}/v0", upstream.addr),
            token: "key-test".to_string(),
            base_id: "appTest".to_string(),
            table_name: "Consultation Leads".to_string(),
        }),
        postmark: PostmarkConfig {
            api_url: format!("http://{}", upstream.addr),
            token: Some("pm-test".to_string()),
            message_stream: "outbound".to_string(),
            sales_email: Some(SALES_EMAIL.to_string()),
            from: None,
        },
        business: BusinessProfile {
            scheduling_link: Some(SCHEDULING_LINK.to_string()),
            ..BusinessProfile::default()
        },
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn the app with a config tweaked by `customize`.
pub async fn spawn_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let upstream = spawn_upstream().await;
    let mut config = test_config(&upstream);
    customize(&mut config);

    let app = lead_intake::build_app(config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        upstream,
    }
}

/// Goals long enough to earn the detailed-goals bonus.
pub fn detailed_goals() -> String {
    "I want to lose about fifteen pounds before my wedding next summer and \
     build enough strength to keep up with my kids on weekend hikes while \
     staying consistent with training three times every week"
        .to_string()
}

/// A consultation event that passes every gate. `overrides` replaces
/// individual `data` fields.
pub fn consultation(overrides: Value) -> Value {
    let mut data = json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": "Jane@Gmail.com",
        "interest": "Fat Loss",
        "bestTime": "Morning (7–10 AM)",
        "goals": detailed_goals(),
        "consent": "on",
        "company": "",
        "time_to_complete": "20000",
    });

    if let Some(obj) = overrides.as_object() {
        for (k, v) in obj {
            data[k] = v.clone();
        }
    }

    json!({ "payload": { "form_name": "consultation", "data": data } })
}
