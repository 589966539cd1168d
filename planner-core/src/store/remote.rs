//! Remote record store.
//!
//! An optional network-backed `users` table keyed by username, with `pin`
//! and `events` columns. The trait seam keeps the storage service testable
//! and makes the outcome of a lookup explicit (`Found` / `NotFound` /
//! transport error) instead of guessing error categories downstream.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::event::CourseEvent;

/// Bounded deadline for every remote call, so a dead endpoint can never
/// suspend a login or load indefinitely.
const REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// A row in the remote `users` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub pin: String,
    /// `None` when the column is null; distinct from an empty collection.
    #[serde(default)]
    pub events: Option<Vec<CourseEvent>>,
}

/// Outcome of a keyed lookup that completed without a transport failure.
#[derive(Debug, Clone)]
pub enum Lookup {
    Found(UserRecord),
    NotFound,
}

/// Transport-level failures of the remote tier. This is the
/// "remote unavailable" condition: callers recover by falling back to the
/// local store, and only logs ever see these values.
#[derive(Error, Debug, Clone)]
pub enum RemoteError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote store returned HTTP {0}")]
    Status(u16),

    #[error("Remote payload error: {0}")]
    Serialization(String),
}

/// Operations the storage service needs from a remote record store.
pub trait RemoteRecords: Clone + Send + Sync + 'static {
    /// Look up the record for `username`.
    fn fetch(&self, username: &str) -> impl Future<Output = Result<Lookup, RemoteError>> + Send;

    /// Create the record for a first-time user with an empty collection.
    fn register(
        &self,
        username: &str,
        pin: &str,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Replace the stored event collection for `username`.
    fn push_events(
        &self,
        username: &str,
        events: &[CourseEvent],
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

/// PostgREST-style HTTP implementation (the hosted store the app was
/// originally backed by speaks exactly this dialect).
#[derive(Clone)]
pub struct HttpRemote {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpRemote {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(REMOTE_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        Ok(HttpRemote {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn users_url(&self) -> String {
        format!("{}/rest/v1/users", self.base_url)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

impl RemoteRecords for HttpRemote {
    fn fetch(&self, username: &str) -> impl Future<Output = Result<Lookup, RemoteError>> + Send {
        let req = self.authed(self.http.get(self.users_url())).query(&[
            ("username", format!("eq.{}", username)),
            ("select", "username,pin,events".to_string()),
        ]);

        async move {
            let resp = req.send().await.map_err(transport)?;
            let status = resp.status();
            if !status.is_success() {
                return Err(RemoteError::Status(status.as_u16()));
            }

            let mut rows: Vec<UserRecord> = resp
                .json()
                .await
                .map_err(|e| RemoteError::Serialization(e.to_string()))?;

            match rows.pop() {
                Some(record) => Ok(Lookup::Found(record)),
                None => Ok(Lookup::NotFound),
            }
        }
    }

    fn register(
        &self,
        username: &str,
        pin: &str,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send {
        let req = self
            .authed(self.http.post(self.users_url()))
            .header("Prefer", "return=minimal")
            .json(&json!([{ "username": username, "pin": pin, "events": [] }]));

        async move {
            let resp = req.send().await.map_err(transport)?;
            let status = resp.status();
            if !status.is_success() {
                return Err(RemoteError::Status(status.as_u16()));
            }
            Ok(())
        }
    }

    fn push_events(
        &self,
        username: &str,
        events: &[CourseEvent],
    ) -> impl Future<Output = Result<(), RemoteError>> + Send {
        let req = self
            .authed(self.http.patch(self.users_url()))
            .query(&[("username", format!("eq.{}", username))])
            .header("Prefer", "return=minimal")
            .json(&json!({ "events": events }));

        async move {
            let resp = req.send().await.map_err(transport)?;
            let status = resp.status();
            if !status.is_success() {
                return Err(RemoteError::Status(status.as_u16()));
            }
            Ok(())
        }
    }
}

fn transport(e: reqwest::Error) -> RemoteError {
    RemoteError::Transport(e.to_string())
}
