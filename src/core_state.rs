//! Transport-agnostic application state.
//!
//! `CoreState` owns the ambient `UserSession` and the live form instance,
//! keeping both out of the HTTP layer: handlers stay thin and tests can
//! drive the form without a router. Wrapped in `Arc` at startup.

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::form::{FormState, FormView};
use crate::session::UserSession;

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

/// Shared application state.
///
/// The session sits behind an `RwLock` (reads dominate: every render
/// derives identity from it). The form sits behind a `Mutex` and is
/// `None` until a view opens one. Neither guard is ever held across an
/// `.await`; async callers take snapshots instead.
pub struct CoreState {
    /// Ambient user identity, stand-in for the auth subsystem.
    session: RwLock<UserSession>,
    /// The live form instance, replaced wholesale on each open.
    form: Mutex<Option<FormState>>,
}

impl CoreState {
    pub fn new() -> Self {
        Self {
            session: RwLock::new(UserSession::default()),
            form: Mutex::new(None),
        }
    }

    // ── Session access ──────────────────────────────────────

    /// Acquire a read lock on the session.
    pub fn read_session(&self) -> Result<RwLockReadGuard<'_, UserSession>, CoreError> {
        self.session.read().map_err(|_| CoreError::LockPoisoned)
    }

    /// Acquire a write lock on the session (sign-in/out, role change).
    pub fn write_session(&self) -> Result<RwLockWriteGuard<'_, UserSession>, CoreError> {
        self.session.write().map_err(|_| CoreError::LockPoisoned)
    }

    /// Owned copy of the current session, for use across `.await` points.
    pub fn session_snapshot(&self) -> Result<UserSession, CoreError> {
        Ok(self.read_session()?.clone())
    }

    // ── Form access ─────────────────────────────────────────

    /// Acquire the form slot. `None` inside means no view has opened yet.
    pub fn lock_form(&self) -> Result<MutexGuard<'_, Option<FormState>>, CoreError> {
        self.form.lock().map_err(|_| CoreError::LockPoisoned)
    }

    /// Mount a fresh form for the given route, discarding any previous
    /// instance and its draft.
    pub fn open_form(&self, route_patient_id: Option<String>) -> Result<FormView, CoreError> {
        let session = self.session_snapshot()?;
        let mut slot = self.lock_form()?;
        let form = FormState::open(route_patient_id);
        let view = form.view(&session);
        *slot = Some(form);
        Ok(view)
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    #[test]
    fn new_state_has_no_form_and_signed_out_session() {
        let state = CoreState::new();
        assert!(state.lock_form().unwrap().is_none());
        assert_eq!(*state.read_session().unwrap(), UserSession::default());
    }

    #[test]
    fn open_form_mounts_a_fresh_instance() {
        let state = CoreState::new();
        let view = state.open_form(Some("P7".into())).unwrap();
        assert_eq!(view.route_patient_id.as_deref(), Some("P7"));
        assert!(state.lock_form().unwrap().is_some());
    }

    #[test]
    fn reopen_discards_previous_draft() {
        let state = CoreState::new();
        let first = state.open_form(Some("P7".into())).unwrap();
        {
            let mut slot = state.lock_form().unwrap();
            let form = slot.as_mut().unwrap();
            form.draft.apply(crate::form::Field::Weight, "70");
        }

        let second = state.open_form(None).unwrap();
        assert_ne!(first.draft_id, second.draft_id);
        assert_eq!(second.draft.weight, None);
        assert_eq!(second.route_patient_id, None);
    }

    #[test]
    fn session_updates_are_visible_to_snapshots() {
        let state = CoreState::new();
        {
            let mut session = state.write_session().unwrap();
            session.auth_token = Some("tok".into());
            session.role = Some(Role::Nurse);
        }
        let snap = state.session_snapshot().unwrap();
        assert!(snap.is_nurse());
    }

    #[test]
    fn open_form_view_reflects_current_session() {
        let state = CoreState::new();
        {
            let mut session = state.write_session().unwrap();
            session.auth_token = Some("tok".into());
            session.role = Some(Role::Patient);
            session.user_id = Some("U1".into());
        }
        let view = state.open_form(Some("P7".into())).unwrap();
        assert!(!view.is_nurse);
        assert_eq!(view.effective_patient_id.as_deref(), Some("U1"));
    }

    #[test]
    fn concurrent_session_reads_do_not_block() {
        use std::sync::Arc;
        use std::thread;

        let state = Arc::new(CoreState::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let state = Arc::clone(&state);
            handles.push(thread::spawn(move || {
                let guard = state.read_session().unwrap();
                assert!(!guard.is_nurse());
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn poisoned_session_lock_surfaces_core_error() {
        use std::sync::Arc;
        use std::thread;

        let state = Arc::new(CoreState::new());
        let poisoner = Arc::clone(&state);
        let _ = thread::spawn(move || {
            let _guard = poisoner.session.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        match state.read_session() {
            Err(CoreError::LockPoisoned) => {}
            other => panic!("expected LockPoisoned, got {other:?}"),
        };
    }

    #[test]
    fn core_error_display() {
        assert_eq!(CoreError::LockPoisoned.to_string(), "Internal lock error");
    }
}
