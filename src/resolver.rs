use crate::error::{Result, ResolverError};
use crate::sink::CsvSink;
use crate::types::{ApiResponse, EntityApi, LookupOutcome, ResolvedRecord, RunReport};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Doubling delay applied while a lookup keeps hitting the rate limit.
/// Starts at one second and has no upper bound; the counter is reset for
/// every identifier by constructing a fresh value.
pub struct Backoff {
    delay: Duration,
}

impl Backoff {
    pub fn new() -> Self {
        Self::starting_at(Duration::from_secs(1))
    }

    pub fn starting_at(base: Duration) -> Self {
        Self { delay: base }
    }

    /// Returns the delay to sleep now and doubles the stored delay.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.delay;
        self.delay *= 2;
        delay
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a non-rate-limited lookup response. 429s never reach this
/// point; they are consumed by the retry loop.
pub fn classify(status: u16, body: &str) -> Result<LookupOutcome> {
    match status {
        200 => Ok(extract_record(body)
            .map(LookupOutcome::Resolved)
            .unwrap_or(LookupOutcome::UnexpectedShape)),
        404 => Ok(LookupOutcome::NotFound),
        other => Err(ResolverError::Api {
            message: format!("unexpected HTTP status {} from entity lookup", other),
        }),
    }
}

fn extract_record(body: &str) -> Option<ResolvedRecord> {
    let data: Value = serde_json::from_str(body).ok()?;
    let identifier = &data["properties"]["identifier"];

    Some(ResolvedRecord {
        id: identifier["uuid"].as_str()?.to_string(),
        name: identifier["value"].as_str()?.to_string(),
        link: identifier["permalink"].as_str()?.to_string(),
    })
}

/// Sequential fetch-and-classify loop over a list of identifiers.
pub struct Resolver {
    api: Box<dyn EntityApi>,
    throttle: Duration,
    backoff_base: Duration,
}

impl Resolver {
    pub fn new(api: Box<dyn EntityApi>, throttle: Duration) -> Self {
        Self {
            api,
            throttle,
            backoff_base: Duration::from_secs(1),
        }
    }

    /// Override the initial rate-limit delay (default one second).
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Resolve every identifier in order, appending one CSV row per
    /// successful lookup. Not-found and malformed responses are logged and
    /// skipped; any other non-2xx status aborts the run.
    pub async fn run(&self, ids: &[Uuid], sink: &mut CsvSink) -> Result<RunReport> {
        let mut report = RunReport {
            output_file: sink.path().to_string(),
            ..Default::default()
        };

        for id in ids {
            let response = self.fetch_with_backoff(id).await?;

            match classify(response.status, &response.body)? {
                LookupOutcome::Resolved(record) => {
                    info!(%id, name = %record.name, "resolved");
                    sink.write(&record)?;
                    report.resolved += 1;
                }
                LookupOutcome::NotFound => {
                    info!(%id, "not found");
                    report.not_found += 1;
                }
                LookupOutcome::UnexpectedShape => {
                    warn!(%id, "response body missing identifier properties");
                    report.unexpected_shape += 1;
                }
            }
            report.total += 1;

            // Self-throttle between identifiers regardless of outcome
            tokio::time::sleep(self.throttle).await;
        }

        sink.finish()?;
        Ok(report)
    }

    /// Send the lookup, retrying for as long as the API answers 429. There
    /// is deliberately no retry cap; a persistently rate-limited run waits
    /// until the operator kills it.
    #[instrument(skip(self))]
    async fn fetch_with_backoff(&self, id: &Uuid) -> Result<ApiResponse> {
        let mut backoff = Backoff::starting_at(self.backoff_base);
        loop {
            let response = self.api.fetch_entity(id).await?;
            if response.status != 429 {
                return Ok(response);
            }
            let delay = backoff.next_delay();
            warn!(%id, delay_secs = delay.as_secs_f64(), "rate limited, backing off");
            tokio::time::sleep(delay).await;
        }
    }
}
