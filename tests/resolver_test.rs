use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

use cb_resolver::error::{Result as ResolverResult, ResolverError};
use cb_resolver::resolver::Resolver;
use cb_resolver::sink::CsvSink;
use cb_resolver::types::{ApiResponse, EntityApi};

/// Scripted stand-in for the remote API: pops one canned response per call.
struct ScriptedApi {
    responses: Arc<Mutex<VecDeque<ApiResponse>>>,
}

impl ScriptedApi {
    fn new(responses: Vec<ApiResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
        }
    }
}

#[async_trait]
impl EntityApi for ScriptedApi {
    fn api_name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_entity(&self, _id: &Uuid) -> ResolverResult<ApiResponse> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ResolverError::Api {
                message: "scripted API ran out of responses".to_string(),
            })
    }
}

fn response(status: u16, body: &str) -> ApiResponse {
    ApiResponse {
        status,
        body: body.to_string(),
    }
}

const GOOD_BODY: &str =
    r#"{"properties":{"identifier":{"uuid":"u1","value":"Acme","permalink":"acme"}}}"#;

/// Resolver with throttle and backoff shrunk so retry paths stay fast.
fn fast_resolver(api: ScriptedApi) -> Resolver {
    Resolver::new(Box::new(api), Duration::ZERO).with_backoff_base(Duration::from_millis(1))
}

fn test_ids(count: usize) -> Vec<Uuid> {
    (0..count).map(|_| Uuid::new_v4()).collect()
}

#[tokio::test]
async fn not_found_leaves_header_only_output() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.csv");
    let mut sink = CsvSink::create(&path)?;

    let api = ScriptedApi::new(vec![response(404, "")]);
    let ids = vec![Uuid::parse_str("11111111-1111-1111-1111-111111111111")?];

    let report = fast_resolver(api).run(&ids, &mut sink).await?;

    assert_eq!(report.total, 1);
    assert_eq!(report.not_found, 1);
    assert_eq!(report.resolved, 0);
    assert_eq!(fs::read_to_string(&path)?, "id,name,link\n");
    Ok(())
}

#[tokio::test]
async fn resolved_row_uses_body_fields_verbatim() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.csv");
    let mut sink = CsvSink::create(&path)?;

    let api = ScriptedApi::new(vec![response(200, GOOD_BODY)]);

    let report = fast_resolver(api).run(&test_ids(1), &mut sink).await?;

    assert_eq!(report.resolved, 1);
    assert_eq!(
        fs::read_to_string(&path)?,
        "id,name,link\nu1,Acme,acme\n"
    );
    Ok(())
}

#[tokio::test]
async fn rate_limited_lookup_retries_until_resolved() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.csv");
    let mut sink = CsvSink::create(&path)?;

    let api = ScriptedApi::new(vec![
        response(429, ""),
        response(429, ""),
        response(200, GOOD_BODY),
    ]);
    let remaining = api.responses.clone();

    let started = Instant::now();
    let report = fast_resolver(api).run(&test_ids(1), &mut sink).await?;

    // All three scripted responses were consumed by the retry loop
    assert!(remaining.lock().unwrap().is_empty());
    // Two backoff sleeps of 1ms and 2ms happened before success
    assert!(started.elapsed() >= Duration::from_millis(3));
    assert_eq!(report.total, 1);
    assert_eq!(report.resolved, 1);
    assert_eq!(
        fs::read_to_string(&path)?,
        "id,name,link\nu1,Acme,acme\n"
    );
    Ok(())
}

#[tokio::test]
async fn unexpected_shape_is_skipped_not_fatal() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.csv");
    let mut sink = CsvSink::create(&path)?;

    let api = ScriptedApi::new(vec![response(200, r#"{"data":{}}"#), response(404, "")]);

    let report = fast_resolver(api).run(&test_ids(2), &mut sink).await?;

    assert_eq!(report.total, 2);
    assert_eq!(report.unexpected_shape, 1);
    assert_eq!(report.not_found, 1);
    assert_eq!(report.resolved, 0);
    assert_eq!(fs::read_to_string(&path)?, "id,name,link\n");
    Ok(())
}

#[tokio::test]
async fn server_error_halts_the_run() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.csv");
    let mut sink = CsvSink::create(&path)?;

    let api = ScriptedApi::new(vec![response(500, ""), response(404, "")]);
    let remaining = api.responses.clone();

    let err = fast_resolver(api)
        .run(&test_ids(2), &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(err, ResolverError::Api { .. }));
    assert!(err.to_string().contains("500"));
    // The second identifier was never requested
    assert_eq!(remaining.lock().unwrap().len(), 1);
    assert_eq!(fs::read_to_string(&path)?, "id,name,link\n");
    Ok(())
}
