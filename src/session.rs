//! Ambient user identity consumed by the submission view.
//!
//! Effective-patient resolution (checked in order):
//! 1. Nurse session (auth token present AND nurse role) → the patient id
//!    typed into the form, falling back to the route's patient id
//! 2. Any other session → the signed-in user's own id
//!
//! The resolution is computed on every read, never cached, so a token or
//! role change is reflected immediately.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Session role, as reported by the auth subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Nurse,
    Patient,
}

impl Role {
    /// Parse from the auth subsystem's string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "nurse" => Some(Self::Nurse),
            "patient" => Some(Self::Patient),
            _ => None,
        }
    }

    /// String representation used on the wire and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nurse => "nurse",
            Self::Patient => "patient",
        }
    }
}

/// Snapshot of the authenticated user, read-only from the form's side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSession {
    pub auth_token: Option<String>,
    pub role: Option<Role>,
    pub user_id: Option<String>,
}

impl UserSession {
    /// Nurse mode requires both a live token and the nurse role.
    pub fn is_nurse(&self) -> bool {
        self.auth_token.is_some() && self.role == Some(Role::Nurse)
    }
}

// ═══════════════════════════════════════════════════════════
// Identity resolution
// ═══════════════════════════════════════════════════════════

/// Resolve which patient a submitted reading belongs to.
///
/// `entered_patient_id` is the value of the nurse-only patient-id input;
/// blank entries count as absent. Non-nurse sessions always submit for
/// themselves, whatever the route or the form says.
pub fn effective_patient_id(
    session: &UserSession,
    entered_patient_id: Option<&str>,
    route_patient_id: Option<&str>,
) -> Option<String> {
    if session.is_nurse() {
        return entered_patient_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or(route_patient_id)
            .map(str::to_string);
    }
    session.user_id.clone()
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
