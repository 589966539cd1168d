//! Session controller.
//!
//! Owns the in-memory event collection and the authenticated user, and
//! enforces the one correctness property everything else hangs on: the
//! collection is never persisted before it has been fully loaded for the
//! current user. A login clears the previous state, a load populates it, and
//! only then are mutations (each of which persists immediately) accepted.

use uuid::Uuid;

use crate::error::{PlannerError, PlannerResult};
use crate::event::CourseEvent;
use crate::storage::StorageService;
use crate::store::remote::{HttpRemote, RemoteRecords};
use crate::user::User;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LoggedOut,
    /// A user is authenticated but their events are not loaded yet.
    /// Mutations are rejected in this phase.
    Loading,
    Ready,
}

pub struct Session<R: RemoteRecords = HttpRemote> {
    storage: StorageService<R>,
    user: Option<User>,
    events: Vec<CourseEvent>,
    phase: Phase,
}

impl<R: RemoteRecords> Session<R> {
    pub fn new(storage: StorageService<R>) -> Self {
        Session {
            storage,
            user: None,
            events: Vec::new(),
            phase: Phase::LoggedOut,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn events(&self) -> &[CourseEvent] {
        &self.events
    }

    pub fn storage(&self) -> &StorageService<R> {
        &self.storage
    }

    /// Authenticate and enter `Loading`. The previous collection is cleared
    /// before the user changes so stale events can never leak into (or be
    /// saved under) the new session.
    pub async fn login(&mut self, username: &str, pin: &str) -> PlannerResult<&User> {
        self.events.clear();
        self.phase = Phase::LoggedOut;

        let user = self.storage.login(username, pin).await?;
        self.phase = Phase::Loading;
        Ok(self.user.insert(user))
    }

    /// Restore the session persisted by a previous run, entering `Loading`
    /// when one exists.
    pub fn restore(&mut self) -> PlannerResult<Option<&User>> {
        match self.storage.current_session()? {
            Some(user) => {
                self.events.clear();
                self.user = Some(user);
                self.phase = Phase::Loading;
                Ok(self.user.as_ref())
            }
            None => Ok(None),
        }
    }

    /// Load the authenticated user's collection, entering `Ready`.
    pub async fn load(&mut self) -> PlannerResult<()> {
        let user = self.user.as_ref().ok_or(PlannerError::NotLoggedIn)?;
        self.events = self.storage.load_events(&user.username).await?;
        self.phase = Phase::Ready;
        Ok(())
    }

    /// Clear in-memory state and the persisted session marker.
    pub fn logout(&mut self) -> PlannerResult<()> {
        self.storage.clear_session()?;
        self.user = None;
        self.events.clear();
        self.phase = Phase::LoggedOut;
        Ok(())
    }

    /// Add an event and persist. An empty id gets a fresh UUID; a supplied id
    /// that would collide with an existing event is also replaced, keeping
    /// ids unique within the collection.
    pub async fn create(&mut self, mut event: CourseEvent) -> PlannerResult<&CourseEvent> {
        self.require_ready()?;

        if event.id.is_empty() || self.find(&event.id).is_some() {
            event.id = Uuid::new_v4().to_string();
        }

        self.events.push(event);
        self.persist().await?;
        // unwrap safe: we just pushed
        Ok(self.events.last().unwrap())
    }

    /// Replace the event with a matching id and persist. A missing id is
    /// reported as `EventNotFound`.
    pub async fn update(&mut self, event: CourseEvent) -> PlannerResult<()> {
        self.require_ready()?;

        let Some(index) = self.find(&event.id) else {
            return Err(PlannerError::EventNotFound(event.id));
        };

        self.events[index] = event;
        self.persist().await
    }

    /// Remove the event with a matching id and persist. A missing id is a
    /// silent no-op: nothing changes in memory and nothing is written.
    pub async fn delete(&mut self, id: &str) -> PlannerResult<()> {
        self.require_ready()?;

        let Some(index) = self.find(id) else {
            return Ok(());
        };

        self.events.remove(index);
        self.persist().await
    }

    fn find(&self, id: &str) -> Option<usize> {
        self.events.iter().position(|e| e.id == id)
    }

    fn require_ready(&self) -> PlannerResult<()> {
        match self.phase {
            Phase::Ready => Ok(()),
            Phase::Loading => Err(PlannerError::SessionNotReady),
            Phase::LoggedOut => Err(PlannerError::NotLoggedIn),
        }
    }

    /// Persist the full collection. Only reachable from `Ready`.
    async fn persist(&self) -> PlannerResult<()> {
        let user = self.user.as_ref().ok_or(PlannerError::NotLoggedIn)?;
        self.storage.save_events(&user.username, &self.events).await
    }
}
