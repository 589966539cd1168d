//! Storage service: sessions and event persistence with remote fallback.
//!
//! Single authority for turning a username + PIN into a session and for
//! loading/saving a user's full event collection. The remote store is used
//! when configured and reachable; everything degrades to the local store
//! without losing data. The one failure that never falls through is a PIN
//! mismatch reported by the remote store: wrong credentials are wrong
//! credentials, not an outage.

use tokio::sync::mpsc;

use crate::config::PlannerConfig;
use crate::error::{PlannerError, PlannerResult};
use crate::event::CourseEvent;
use crate::store::remote::{HttpRemote, Lookup, RemoteError, RemoteRecords};
use crate::store::{auth_key, data_key, LocalStore, SESSION_KEY};
use crate::user::User;

/// Which remote operation a report is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOp {
    Fetch,
    Push,
}

/// Outcome of a background remote operation, delivered out-of-band.
///
/// Reports exist for diagnostics only: nothing consumes them on the mutation
/// path, and a failed push is never retried.
#[derive(Debug)]
pub struct SyncReport {
    pub username: String,
    pub op: RemoteOp,
    pub result: Result<(), RemoteError>,
}

pub struct StorageService<R: RemoteRecords = HttpRemote> {
    local: LocalStore,
    remote: Option<R>,
    report_tx: mpsc::UnboundedSender<SyncReport>,
}

impl StorageService<HttpRemote> {
    /// Build the service from configuration: local store in the data
    /// directory, remote store only when endpoint and key are both set.
    pub fn from_config(
        config: &PlannerConfig,
    ) -> PlannerResult<(Self, mpsc::UnboundedReceiver<SyncReport>)> {
        let local = LocalStore::open(config.data_path())?;
        let remote = match config.remote() {
            Some((url, key)) => Some(HttpRemote::new(url, key)?),
            None => None,
        };
        Ok(Self::new(local, remote))
    }
}

impl<R: RemoteRecords> StorageService<R> {
    pub fn new(
        local: LocalStore,
        remote: Option<R>,
    ) -> (Self, mpsc::UnboundedReceiver<SyncReport>) {
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        let service = StorageService {
            local,
            remote,
            report_tx,
        };
        (service, report_rx)
    }

    pub fn remote_configured(&self) -> bool {
        self.remote.is_some()
    }

    /// Authenticate `username` with `pin`.
    ///
    /// An unknown username registers on first login; there is no separate
    /// signup flow. Remote transport failures (including a failed remote
    /// registration) fall back to the local credential path. On success the
    /// user is written to the session key for restoration on restart.
    pub async fn login(&self, username: &str, pin: &str) -> PlannerResult<User> {
        if let Some(remote) = &self.remote {
            match remote.fetch(username).await {
                Ok(Lookup::Found(record)) => {
                    if record.pin != pin {
                        return Err(PlannerError::InvalidCredentials);
                    }
                    return self.open_session(username);
                }
                Ok(Lookup::NotFound) => match remote.register(username, pin).await {
                    Ok(()) => return self.open_session(username),
                    Err(e) => self.report(username, RemoteOp::Fetch, Err(e)),
                },
                Err(e) => self.report(username, RemoteOp::Fetch, Err(e)),
            }
        }

        self.login_local(username, pin)
    }

    fn login_local(&self, username: &str, pin: &str) -> PlannerResult<User> {
        match self.local.get(&auth_key(username))? {
            Some(stored) if stored != pin => Err(PlannerError::InvalidCredentials),
            Some(_) => self.open_session(username),
            None => {
                // First-time registration
                self.local.set(&auth_key(username), pin)?;
                self.open_session(username)
            }
        }
    }

    fn open_session(&self, username: &str) -> PlannerResult<User> {
        let user = User::logged_in(username);
        let raw = serde_json::to_string(&user)
            .map_err(|e| PlannerError::Serialization(e.to_string()))?;
        self.local.set(SESSION_KEY, &raw)?;
        Ok(user)
    }

    /// The last-authenticated user, if a session marker survives from a
    /// previous run. A corrupt marker is discarded, not an error.
    pub fn current_session(&self) -> PlannerResult<Option<User>> {
        match self.local.get(SESSION_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(user) => Ok(Some(user)),
                Err(_) => {
                    self.local.remove(SESSION_KEY)?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    pub fn clear_session(&self) -> PlannerResult<()> {
        self.local.remove(SESSION_KEY)
    }

    /// Load the full event collection for `username`.
    ///
    /// A remote record with a non-null events column wins verbatim, even when
    /// empty. Everything else (no remote, record missing, null column,
    /// transport failure) reads the local store; a missing local key is an
    /// empty collection, never an error.
    pub async fn load_events(&self, username: &str) -> PlannerResult<Vec<CourseEvent>> {
        if let Some(remote) = &self.remote {
            match remote.fetch(username).await {
                Ok(Lookup::Found(record)) => {
                    if let Some(events) = record.events {
                        return Ok(events);
                    }
                }
                Ok(Lookup::NotFound) => {}
                Err(e) => self.report(username, RemoteOp::Fetch, Err(e)),
            }
        }

        match self.local.get(&data_key(username))? {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| PlannerError::Serialization(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    /// Persist the full event collection for `username`.
    ///
    /// The local write happens first and is what the caller is told about;
    /// `StorageFull` surfaces here. The remote push, when configured, is a
    /// detached task whose outcome arrives only on the report channel.
    pub async fn save_events(&self, username: &str, events: &[CourseEvent]) -> PlannerResult<()> {
        let raw = serde_json::to_string(events)
            .map_err(|e| PlannerError::Serialization(e.to_string()))?;
        self.local.set(&data_key(username), &raw)?;

        if let Some(remote) = &self.remote {
            let remote = remote.clone();
            let username = username.to_string();
            let events = events.to_vec();
            let report_tx = self.report_tx.clone();

            tokio::spawn(async move {
                let result = remote.push_events(&username, &events).await;
                let _ = report_tx.send(SyncReport {
                    username,
                    op: RemoteOp::Push,
                    result,
                });
            });
        }

        Ok(())
    }

    fn report(&self, username: &str, op: RemoteOp, result: Result<(), RemoteError>) {
        // Dropped receiver just means nobody is watching
        let _ = self.report_tx.send(SyncReport {
            username: username.to_string(),
            op,
            result,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventColor;
    use crate::store::UserRecord;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    /// In-memory remote store with switchable failure modes.
    #[derive(Clone, Default)]
    struct MockRemote {
        rows: Arc<Mutex<HashMap<String, (String, Option<Vec<CourseEvent>>)>>>,
        unreachable: Arc<Mutex<bool>>,
        fail_pushes: Arc<Mutex<bool>>,
    }

    impl MockRemote {
        fn insert(&self, username: &str, pin: &str, events: Option<Vec<CourseEvent>>) {
            self.rows
                .lock()
                .unwrap()
                .insert(username.to_string(), (pin.to_string(), events));
        }

        fn set_unreachable(&self, v: bool) {
            *self.unreachable.lock().unwrap() = v;
        }

        fn set_fail_pushes(&self, v: bool) {
            *self.fail_pushes.lock().unwrap() = v;
        }

        fn events_of(&self, username: &str) -> Option<Vec<CourseEvent>> {
            self.rows
                .lock()
                .unwrap()
                .get(username)
                .and_then(|(_, events)| events.clone())
        }

        fn check_reachable(&self) -> Result<(), RemoteError> {
            if *self.unreachable.lock().unwrap() {
                Err(RemoteError::Transport("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    impl RemoteRecords for MockRemote {
        fn fetch(
            &self,
            username: &str,
        ) -> impl Future<Output = Result<Lookup, RemoteError>> + Send {
            let this = self.clone();
            let username = username.to_string();
            async move {
                this.check_reachable()?;
                match this.rows.lock().unwrap().get(&username) {
                    Some((pin, events)) => Ok(Lookup::Found(UserRecord {
                        username,
                        pin: pin.clone(),
                        events: events.clone(),
                    })),
                    None => Ok(Lookup::NotFound),
                }
            }
        }

        fn register(
            &self,
            username: &str,
            pin: &str,
        ) -> impl Future<Output = Result<(), RemoteError>> + Send {
            let this = self.clone();
            let username = username.to_string();
            let pin = pin.to_string();
            async move {
                this.check_reachable()?;
                this.insert(&username, &pin, Some(Vec::new()));
                Ok(())
            }
        }

        fn push_events(
            &self,
            username: &str,
            events: &[CourseEvent],
        ) -> impl Future<Output = Result<(), RemoteError>> + Send {
            let this = self.clone();
            let username = username.to_string();
            let events = events.to_vec();
            async move {
                this.check_reachable()?;
                if *this.fail_pushes.lock().unwrap() {
                    return Err(RemoteError::Status(503));
                }
                let mut rows = this.rows.lock().unwrap();
                if let Some(row) = rows.get_mut(&username) {
                    row.1 = Some(events);
                }
                Ok(())
            }
        }
    }

    fn local_only() -> (
        tempfile::TempDir,
        StorageService<MockRemote>,
        mpsc::UnboundedReceiver<SyncReport>,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStore::open(dir.path()).unwrap();
        let (service, rx) = StorageService::new(local, None);
        (dir, service, rx)
    }

    fn with_remote(
        remote: MockRemote,
    ) -> (
        tempfile::TempDir,
        StorageService<MockRemote>,
        mpsc::UnboundedReceiver<SyncReport>,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStore::open(dir.path()).unwrap();
        let (service, rx) = StorageService::new(local, Some(remote));
        (dir, service, rx)
    }

    fn event(id: &str, title: &str) -> CourseEvent {
        CourseEvent {
            id: id.to_string(),
            title: title.to_string(),
            location: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            start_time: "09:00".to_string(),
            end_time: "10:30".to_string(),
            color: EventColor::Red,
            attachments: None,
        }
    }

    #[tokio::test]
    async fn first_login_registers_then_wrong_pin_fails() {
        let (_dir, service, _rx) = local_only();

        service.login("ann", "1234").await.unwrap();

        let err = service.login("ann", "9999").await.unwrap_err();
        assert!(matches!(err, PlannerError::InvalidCredentials));

        // The right PIN still works
        let user = service.login("ann", "1234").await.unwrap();
        assert_eq!(user.username, "ann");
        assert!(user.last_login.is_some());
    }

    #[tokio::test]
    async fn login_writes_restorable_session() {
        let (_dir, service, _rx) = local_only();

        assert!(service.current_session().unwrap().is_none());

        service.login("ann", "1234").await.unwrap();
        let restored = service.current_session().unwrap().unwrap();
        assert_eq!(restored.username, "ann");

        service.clear_session().unwrap();
        assert!(service.current_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn remote_pin_mismatch_is_never_retried_locally() {
        let remote = MockRemote::default();
        remote.insert("ann", "1234", Some(Vec::new()));
        let (dir, service, _rx) = with_remote(remote);

        let err = service.login("ann", "9999").await.unwrap_err();
        assert!(matches!(err, PlannerError::InvalidCredentials));

        // No local credential was registered as a side effect
        let local = LocalStore::open(dir.path()).unwrap();
        assert_eq!(local.get(&auth_key("ann")).unwrap(), None);
    }

    #[tokio::test]
    async fn unreachable_remote_falls_back_to_local_login() {
        let remote = MockRemote::default();
        remote.set_unreachable(true);
        let (_dir, service, _rx) = with_remote(remote);

        service.login("ann", "1234").await.unwrap();
        let err = service.login("ann", "9999").await.unwrap_err();
        assert!(matches!(err, PlannerError::InvalidCredentials));
    }

    #[tokio::test]
    async fn load_missing_user_is_empty_not_error() {
        let (_dir, service, _rx) = local_only();
        assert!(service.load_events("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_roundtrips_locally() {
        let (_dir, service, _rx) = local_only();

        let events = vec![event("1", "Calc I"), event("2", "Physics")];
        service.save_events("ann", &events).await.unwrap();

        assert_eq!(service.load_events("ann").await.unwrap(), events);
    }

    #[tokio::test]
    async fn remote_events_win_verbatim_even_when_empty() {
        let remote = MockRemote::default();
        remote.insert("ann", "1234", Some(Vec::new()));
        let (dir, service, _rx) = with_remote(remote);

        // Local store has stale data, remote has an (empty) collection
        let local = LocalStore::open(dir.path()).unwrap();
        local
            .set(
                &data_key("ann"),
                &serde_json::to_string(&[event("stale", "Old")]).unwrap(),
            )
            .unwrap();

        assert!(service.load_events("ann").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn null_remote_events_fall_through_to_local() {
        let remote = MockRemote::default();
        remote.insert("ann", "1234", None);
        let (dir, service, _rx) = with_remote(remote);

        let local = LocalStore::open(dir.path()).unwrap();
        let events = vec![event("1", "Calc I")];
        local
            .set(&data_key("ann"), &serde_json::to_string(&events).unwrap())
            .unwrap();

        assert_eq!(service.load_events("ann").await.unwrap(), events);
    }

    #[tokio::test]
    async fn remote_failure_during_load_falls_back_to_local() {
        let remote = MockRemote::default();
        remote.insert("ann", "1234", Some(vec![event("r", "Remote")]));
        let (_dir, service, mut rx) = with_remote(remote.clone());

        let events = vec![event("1", "Calc I")];
        service.save_events("ann", &events).await.unwrap();
        // Drain the push report before cutting the connection
        rx.recv().await.unwrap();

        remote.set_unreachable(true);
        assert_eq!(service.load_events("ann").await.unwrap(), events);

        // The fallback was observed, not swallowed
        let report = rx.recv().await.unwrap();
        assert_eq!(report.op, RemoteOp::Fetch);
        assert!(report.result.is_err());
    }

    #[tokio::test]
    async fn save_pushes_to_remote_in_background() {
        let remote = MockRemote::default();
        remote.insert("ann", "1234", Some(Vec::new()));
        let (_dir, service, mut rx) = with_remote(remote.clone());

        let events = vec![event("1", "Calc I")];
        service.save_events("ann", &events).await.unwrap();

        let report = rx.recv().await.unwrap();
        assert_eq!(report.op, RemoteOp::Push);
        assert!(report.result.is_ok());
        assert_eq!(remote.events_of("ann").unwrap(), events);
    }

    #[tokio::test]
    async fn failed_push_does_not_fail_the_save() {
        let remote = MockRemote::default();
        remote.insert("ann", "1234", Some(Vec::new()));
        remote.set_fail_pushes(true);
        let (_dir, service, mut rx) = with_remote(remote);

        let events = vec![event("1", "Calc I")];
        service.save_events("ann", &events).await.unwrap();

        // The local write stands and the failure is only reported
        assert_eq!(service.load_events("ann").await.unwrap(), events);
        let report = rx.recv().await.unwrap();
        assert_eq!(report.op, RemoteOp::Push);
        assert!(report.result.is_err());
    }

    #[tokio::test]
    async fn storage_full_surfaces_from_save() {
        let dir = tempfile::tempdir().unwrap();
        let local = LocalStore::with_quota(dir.path(), 8).unwrap();
        let (service, _rx) = StorageService::<MockRemote>::new(local, None);

        let err = service
            .save_events("ann", &[event("1", "Calc I")])
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::StorageFull));
    }
}
