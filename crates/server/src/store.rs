//! Live puzzle sessions, keyed by id.
//!
//! Each session is a `PuzzleController` behind one store-wide mutex; no lock
//! is held across an await. Opponent replies with a display delay are run by
//! a spawned task that sleeps, relocks and hands the ticket back to the
//! controller, which drops it if the session was reset or advanced meanwhile.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chess_puzzler::{
    Catalog, ControllerSettings, OpponentReply, PuzzleController, PuzzleError, SessionView,
};
use tracing::{debug, error, info};

use crate::error::AppError;

pub type SessionId = u64;

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<StoreInner>>,
    max_sessions: usize,
}

struct StoreInner {
    next_id: SessionId,
    sessions: BTreeMap<SessionId, PuzzleController>,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                next_id: 1,
                sessions: BTreeMap::new(),
            })),
            max_sessions: max_sessions.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start a session on `index` (taken modulo the catalog size).
    pub fn create(
        &self,
        catalog: Catalog,
        settings: ControllerSettings,
        index: usize,
    ) -> Result<(SessionId, SessionView), AppError> {
        let index = index % catalog.len();
        let mut controller = PuzzleController::new(catalog, settings);
        let reply = controller.initialize(index)?;

        let (id, view, deferred) = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;

            while inner.sessions.len() >= self.max_sessions {
                if let Some((evicted, _)) = inner.sessions.pop_first() {
                    debug!(session_id = evicted, "Evicted oldest session");
                }
            }

            let deferred = Self::dispatch(&mut controller, reply)?;
            let view = controller.view();
            inner.sessions.insert(id, controller);
            (id, view, deferred)
        };

        info!(session_id = id, puzzle_index = index, "Session created");
        if let Some(reply) = deferred {
            self.spawn_reply(id, reply);
        }
        Ok((id, view))
    }

    /// Run a command against session `id` and return its result together
    /// with the view after any immediate opponent reply.
    pub fn command<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut PuzzleController) -> Result<T, PuzzleError>,
    ) -> Result<(T, SessionView), AppError> {
        let (out, view, deferred) = {
            let mut inner = self.lock();
            let controller = inner
                .sessions
                .get_mut(&id)
                .ok_or_else(|| not_found(id))?;

            let out = f(controller)?;
            let reply = controller.pending_reply();
            let deferred = Self::dispatch(controller, reply)?;
            (out, controller.view(), deferred)
        };

        if let Some(reply) = deferred {
            self.spawn_reply(id, reply);
        }
        Ok((out, view))
    }

    /// Read-only access to session `id`.
    pub fn read<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&PuzzleController) -> T,
    ) -> Result<T, AppError> {
        let inner = self.lock();
        inner.sessions.get(&id).map(f).ok_or_else(|| not_found(id))
    }

    pub fn remove(&self, id: SessionId) -> bool {
        let removed = self.lock().sessions.remove(&id).is_some();
        if removed {
            info!(session_id = id, "Session closed");
        }
        removed
    }

    /// Hand a ticket back to its session after the delay has elapsed.
    pub fn play_reply(&self, id: SessionId, reply: OpponentReply) {
        let mut inner = self.lock();
        let Some(controller) = inner.sessions.get_mut(&id) else {
            debug!(session_id = id, "Dropping opponent reply for a closed session");
            return;
        };
        match controller.play_opponent(reply) {
            Ok(Some(entry)) => debug!(session_id = id, mv = %entry.mv, "Opponent moved"),
            Ok(None) => {}
            Err(e) => error!(session_id = id, "Opponent reply failed: {e}"),
        }
    }

    /// Zero-delay replies are played on the spot; others are returned for
    /// scheduling once the lock is released.
    fn dispatch(
        controller: &mut PuzzleController,
        reply: Option<OpponentReply>,
    ) -> Result<Option<OpponentReply>, PuzzleError> {
        match reply {
            Some(reply) if reply.delay.is_zero() => {
                controller.settle()?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn spawn_reply(&self, id: SessionId, reply: OpponentReply) {
        let store = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(reply.delay).await;
            store.play_reply(id, reply);
        });
    }
}

fn not_found(id: SessionId) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
