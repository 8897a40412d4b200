//! Enrichment steps
//!
//! Each step injects metadata into a record's `extra` group before
//! formatting. Writers run their steps in attachment order.

use crate::record::Record;
use recordlog_core_types::schema::{
    EXTRA_HTTP_METHOD, EXTRA_IP, EXTRA_LOG_SOURCE, EXTRA_PROCESS_ID, EXTRA_UID, EXTRA_URL,
    LOG_SOURCE,
};
use recordlog_core_types::{RequestInfo, RunId};
use serde_json::Value;
use std::sync::Arc;

/// A step that adds metadata to a record
pub trait Enricher: Send + Sync {
    fn enrich(&self, record: &mut Record);
}

/// Supplies the request currently being served, if any
///
/// Implementations return `RequestInfo::empty()` outside a request.
pub trait RequestInfoProvider: Send + Sync {
    fn current(&self) -> RequestInfo;
}

/// Provider for hosts that never serve requests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRequest;

impl RequestInfoProvider for NoRequest {
    fn current(&self) -> RequestInfo {
        RequestInfo::empty()
    }
}

/// Stamps the run identifier as `uid`
#[derive(Debug, Clone)]
pub struct RunIdEnricher {
    run_id: RunId,
}

impl RunIdEnricher {
    pub fn new(run_id: RunId) -> Self {
        Self { run_id }
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }
}

impl Enricher for RunIdEnricher {
    fn enrich(&self, record: &mut Record) {
        record.extra.insert(
            EXTRA_UID.to_string(),
            Value::String(self.run_id.as_str().to_string()),
        );
    }
}

/// Stamps the current process id as `process_id`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessIdEnricher;

impl Enricher for ProcessIdEnricher {
    fn enrich(&self, record: &mut Record) {
        record
            .extra
            .insert(EXTRA_PROCESS_ID.to_string(), Value::from(std::process::id()));
    }
}

/// Stamps `ip`, `url`, `http_method` and the `log_source` marker
pub struct RequestEnricher {
    provider: Arc<dyn RequestInfoProvider>,
}

impl RequestEnricher {
    pub fn new(provider: Arc<dyn RequestInfoProvider>) -> Self {
        Self { provider }
    }
}

impl Enricher for RequestEnricher {
    fn enrich(&self, record: &mut Record) {
        let info = self.provider.current();
        let extra = &mut record.extra;
        extra.insert(EXTRA_IP.to_string(), Value::String(info.ip));
        extra.insert(EXTRA_URL.to_string(), Value::String(info.url));
        extra.insert(EXTRA_HTTP_METHOD.to_string(), Value::String(info.method));
        extra.insert(
            EXTRA_LOG_SOURCE.to_string(),
            Value::String(LOG_SOURCE.to_string()),
        );
    }
}

/// The three standard steps every writer gets
pub fn standard_enrichers(
    run_id: RunId,
    requests: Arc<dyn RequestInfoProvider>,
) -> Vec<Arc<dyn Enricher>> {
    vec![
        Arc::new(RunIdEnricher::new(run_id)),
        Arc::new(ProcessIdEnricher),
        Arc::new(RequestEnricher::new(requests)),
    ]
}
