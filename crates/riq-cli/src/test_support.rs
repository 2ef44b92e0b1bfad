//! In-memory `BlacklistApi` used by dispatcher tests.

use std::sync::Mutex;

use async_trait::async_trait;
use riq_api::{
    ApiError, ApiResult, BlacklistApi, BlacklistListQuery, IncidentListQuery, MalwareQuery,
};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StubCall {
    Lookup(String),
    Incident(String),
    IncidentList(IncidentListQuery),
    List(BlacklistListQuery),
    Malware(MalwareQuery),
}

/// Records every call and answers with a canned payload or a one-shot error.
pub(crate) struct StubApi {
    payload: Value,
    error: Mutex<Option<ApiError>>,
    calls: Mutex<Vec<StubCall>>,
}

impl StubApi {
    pub(crate) fn returning(payload: Value) -> Self {
        Self {
            payload,
            error: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(error: ApiError) -> Self {
        Self {
            payload: Value::Null,
            error: Mutex::new(Some(error)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn answer(&self, call: StubCall) -> ApiResult<Value> {
        self.calls.lock().expect("calls lock").push(call);
        match self.error.lock().expect("error lock").take() {
            Some(error) => Err(error),
            None => Ok(self.payload.clone()),
        }
    }
}

#[async_trait]
impl BlacklistApi for StubApi {
    async fn get_blacklist_lookup(&self, url: &str) -> ApiResult<Value> {
        self.answer(StubCall::Lookup(url.to_string()))
    }

    async fn get_blacklist_incident(&self, url: &str) -> ApiResult<Value> {
        self.answer(StubCall::Incident(url.to_string()))
    }

    async fn get_blacklist_incident_list(&self, query: &IncidentListQuery) -> ApiResult<Value> {
        self.answer(StubCall::IncidentList(query.clone()))
    }

    async fn get_blacklist_list(&self, query: &BlacklistListQuery) -> ApiResult<Value> {
        self.answer(StubCall::List(query.clone()))
    }

    async fn get_blacklist_malware(&self, query: &MalwareQuery) -> ApiResult<Value> {
        self.answer(StubCall::Malware(query.clone()))
    }
}
