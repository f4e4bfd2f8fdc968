//! Daily Health Info form — draft state, typed field updates, validation,
//! and the submission state machine.
//!
//! The draft lives server-side; the page is a thin renderer over it.
//! Numeric fields hold `Option<i32>`: a parse with no digits stores `None`
//! ("no value"), never zero and never an error. The "> 0" check is
//! advisory feedback only — submission is gated by presence of the
//! required fields, not by positivity.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::VitalsReading;
use crate::session::{self, UserSession};

// ═══════════════════════════════════════════════════════════
// Fields
// ═══════════════════════════════════════════════════════════

/// The closed set of form fields. Updates are dispatched against this
/// enum, so a misspelled field name is an error instead of silently
/// growing the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PatientId,
    Date,
    PulseRate,
    BloodPressure,
    Weight,
    Temperature,
    RespiratoryRate,
}

/// The five measurement fields, in display order.
pub const NUMERIC_FIELDS: [Field; 5] = [
    Field::Weight,
    Field::Temperature,
    Field::BloodPressure,
    Field::PulseRate,
    Field::RespiratoryRate,
];

impl Field {
    /// Parse a wire field name as sent by the page.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "patientId" => Some(Self::PatientId),
            "date" => Some(Self::Date),
            "pulseRate" => Some(Self::PulseRate),
            "bloodPressure" => Some(Self::BloodPressure),
            "weight" => Some(Self::Weight),
            "temperature" => Some(Self::Temperature),
            "respiratoryRate" => Some(Self::RespiratoryRate),
            _ => None,
        }
    }

    /// Wire field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PatientId => "patientId",
            Self::Date => "date",
            Self::PulseRate => "pulseRate",
            Self::BloodPressure => "bloodPressure",
            Self::Weight => "weight",
            Self::Temperature => "temperature",
            Self::RespiratoryRate => "respiratoryRate",
        }
    }

    /// Human-readable name for validation messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::PatientId => "patient id",
            Self::Date => "date",
            Self::PulseRate => "pulse rate",
            Self::BloodPressure => "blood pressure",
            Self::Weight => "weight",
            Self::Temperature => "temperature",
            Self::RespiratoryRate => "respiratory rate",
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

/// Errors from form operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("No form is open")]
    NotOpen,
    #[error("Unknown form field: {0}")]
    UnknownField(String),
    #[error("A submission is already in flight")]
    SubmissionInFlight,
}

// ═══════════════════════════════════════════════════════════
// Draft
// ═══════════════════════════════════════════════════════════

/// One in-progress reading. Everything starts empty; numeric `None` and
/// empty strings both mean "not yet entered".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingDraft {
    /// Nurse-entered patient id. Only consulted in nurse mode.
    pub patient_id: Option<String>,
    /// Calendar date, `YYYY-MM-DD` once entered.
    pub date: String,
    pub pulse_rate: Option<i32>,
    pub blood_pressure: Option<i32>,
    pub weight: Option<i32>,
    pub temperature: Option<i32>,
    pub respiratory_rate: Option<i32>,
}

impl ReadingDraft {
    /// Apply one field update. Measurement fields go through the integer
    /// parse; `date` and `patientId` keep the raw string. No other field
    /// is touched.
    pub fn apply(&mut self, field: Field, raw: &str) {
        match field {
            Field::PatientId => self.patient_id = Some(raw.to_string()),
            Field::Date => self.date = raw.to_string(),
            Field::PulseRate => self.pulse_rate = parse_vital_input(raw),
            Field::BloodPressure => self.blood_pressure = parse_vital_input(raw),
            Field::Weight => self.weight = parse_vital_input(raw),
            Field::Temperature => self.temperature = parse_vital_input(raw),
            Field::RespiratoryRate => self.respiratory_rate = parse_vital_input(raw),
        }
    }

    /// Current value of a measurement field. `None` for the two text fields.
    fn vital(&self, field: Field) -> Option<i32> {
        match field {
            Field::PulseRate => self.pulse_rate,
            Field::BloodPressure => self.blood_pressure,
            Field::Weight => self.weight,
            Field::Temperature => self.temperature,
            Field::RespiratoryRate => self.respiratory_rate,
            Field::PatientId | Field::Date => None,
        }
    }

    /// Advisory validity: an untouched measurement is valid, an entered
    /// one must be strictly positive. Text fields are always valid here;
    /// their presence is checked at submit instead.
    pub fn field_is_valid(&self, field: Field) -> bool {
        match field {
            Field::PatientId | Field::Date => true,
            _ => self.vital(field).map_or(true, |v| v > 0),
        }
    }

    /// Clear every field back to untouched.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Leading-integer parse in the form's tradition: optional sign, then a
/// digit run; anything after the digits is ignored ("12abc" → 12,
/// "3.7" → 3). No digits, or a run that overflows i32, yields `None` —
/// the no-value sentinel.
pub fn parse_vital_input(raw: &str) -> Option<i32> {
    let s = raw.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.strip_prefix('+').unwrap_or(s)),
    };
    let run: &str = &digits[..digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len())];
    if run.is_empty() {
        return None;
    }
    format!("{sign}{run}").parse().ok()
}

// ═══════════════════════════════════════════════════════════
// Submission state machine
// ═══════════════════════════════════════════════════════════

/// Failure provenance: a validation failure never reached the network;
/// a gateway failure did and can be retried as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    Gateway,
}

/// Where the submission stands. Drives the spinner and the inline
/// error text on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Idle,
    Pending,
    Success {
        reading: VitalsReading,
        redirect_to: String,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

/// Decision made under the form lock when a submit arrives.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStep {
    /// Draft is complete; Pending has been entered. Send this reading.
    Dispatch(VitalsReading),
    /// Required fields are missing; a validation failure was recorded.
    Rejected,
}

/// One live form instance. Created when the view opens, replaced
/// wholesale on the next open.
#[derive(Debug, Clone)]
pub struct FormState {
    /// Correlates log lines and stale gateway completions.
    pub draft_id: Uuid,
    /// Patient id from the route the view was opened on, if any.
    pub route_patient_id: Option<String>,
    pub draft: ReadingDraft,
    pub outcome: SubmissionOutcome,
}

impl FormState {
    pub fn open(route_patient_id: Option<String>) -> Self {
        Self {
            draft_id: Uuid::new_v4(),
            route_patient_id,
            draft: ReadingDraft::default(),
            outcome: SubmissionOutcome::Idle,
        }
    }

    /// Assemble the reading the gateway would receive, or explain what is
    /// still missing. Positivity is deliberately not checked here.
    pub fn validate(&self, session: &UserSession) -> Result<VitalsReading, String> {
        let patient_id = session::effective_patient_id(
            session,
            self.draft.patient_id.as_deref(),
            self.route_patient_id.as_deref(),
        );

        let mut missing: Vec<&str> = Vec::new();
        if patient_id.is_none() {
            missing.push(Field::PatientId.label());
        }
        if self.draft.date.trim().is_empty() {
            missing.push(Field::Date.label());
        }
        for field in NUMERIC_FIELDS {
            if self.draft.vital(field).is_none() {
                missing.push(field.label());
            }
        }
        if !missing.is_empty() {
            return Err(format!("Required fields are missing: {}", missing.join(", ")));
        }

        let date = self.draft.date.trim();
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err("Date must be a calendar date (YYYY-MM-DD)".to_string());
        }

        // All five vitals checked present above.
        Ok(VitalsReading {
            patient_id: patient_id.unwrap_or_default(),
            date: date.to_string(),
            pulse_rate: self.draft.pulse_rate.unwrap_or_default(),
            blood_pressure: self.draft.blood_pressure.unwrap_or_default(),
            weight: self.draft.weight.unwrap_or_default(),
            temperature: self.draft.temperature.unwrap_or_default(),
            respiratory_rate: self.draft.respiratory_rate.unwrap_or_default(),
        })
    }

    /// Start a submission. Rejects outright while one is in flight;
    /// otherwise validates and either enters Pending or records a
    /// validation failure. The draft survives both failure paths.
    pub fn begin_submit(&mut self, session: &UserSession) -> Result<SubmitStep, FormError> {
        if self.outcome == SubmissionOutcome::Pending {
            return Err(FormError::SubmissionInFlight);
        }

        match self.validate(session) {
            Ok(reading) => {
                self.outcome = SubmissionOutcome::Pending;
                Ok(SubmitStep::Dispatch(reading))
            }
            Err(message) => {
                self.outcome = SubmissionOutcome::Failure {
                    kind: FailureKind::Validation,
                    message,
                };
                Ok(SubmitStep::Rejected)
            }
        }
    }

    /// Gateway accepted the reading: record the echo, reset the whole
    /// draft, and hand the page its navigation target.
    pub fn record_success(&mut self, reading: VitalsReading) {
        let redirect_to = format!("/healthInfo/{}", reading.patient_id);
        self.draft.reset();
        self.outcome = SubmissionOutcome::Success {
            reading,
            redirect_to,
        };
    }

    /// Gateway rejected or was unreachable: keep the draft untouched so
    /// the user can retry, surface the message.
    pub fn record_failure(&mut self, message: String) {
        self.outcome = SubmissionOutcome::Failure {
            kind: FailureKind::Gateway,
            message,
        };
    }

    /// Snapshot for the page. Identity and nurse mode are derived from
    /// the session at call time, so a token or role change shows up on
    /// the next render with no subscription machinery.
    pub fn view(&self, session: &UserSession) -> FormView {
        FormView {
            draft_id: self.draft_id,
            is_nurse: session.is_nurse(),
            route_patient_id: self.route_patient_id.clone(),
            effective_patient_id: session::effective_patient_id(
                session,
                self.draft.patient_id.as_deref(),
                self.route_patient_id.as_deref(),
            ),
            draft: self.draft.clone(),
            validity: FieldValidity {
                weight: self.draft.field_is_valid(Field::Weight),
                temperature: self.draft.field_is_valid(Field::Temperature),
                blood_pressure: self.draft.field_is_valid(Field::BloodPressure),
                pulse_rate: self.draft.field_is_valid(Field::PulseRate),
                respiratory_rate: self.draft.field_is_valid(Field::RespiratoryRate),
            },
            outcome: self.outcome.clone(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// View types — serialised to the page
// ═══════════════════════════════════════════════════════════

/// Advisory per-field validity flags, as rendered inline on the page.
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidity {
    pub weight: bool,
    pub temperature: bool,
    pub blood_pressure: bool,
    pub pulse_rate: bool,
    pub respiratory_rate: bool,
}

/// Everything the page needs to render the form.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub draft_id: Uuid,
    pub is_nurse: bool,
    pub route_patient_id: Option<String>,
    pub effective_patient_id: Option<String>,
    pub draft: ReadingDraft,
    pub validity: FieldValidity,
    pub outcome: SubmissionOutcome,
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;

    fn patient_session(user_id: &str) -> UserSession {
        UserSession {
            auth_token: Some("tok".into()),
            role: Some(Role::Patient),
            user_id: Some(user_id.into()),
        }
    }

    fn nurse_session() -> UserSession {
        UserSession {
            auth_token: Some("tok".into()),
            role: Some(Role::Nurse),
            user_id: Some("N3".into()),
        }
    }

    fn filled_form(route: Option<&str>) -> FormState {
        let mut form = FormState::open(route.map(str::to_string));
        form.apply_all(&[
            (Field::Date, "2024-01-01"),
            (Field::Weight, "70"),
            (Field::Temperature, "37"),
            (Field::BloodPressure, "120"),
            (Field::PulseRate, "72"),
            (Field::RespiratoryRate, "16"),
        ]);
        form
    }

    impl FormState {
        fn apply_all(&mut self, updates: &[(Field, &str)]) {
            for (field, raw) in updates {
                self.draft.apply(*field, raw);
            }
        }
    }

    // ───────────────────────────────────────
    // parse_vital_input tests
    // ───────────────────────────────────────

    #[test]
    fn parse_plain_integers() {
        assert_eq!(parse_vital_input("72"), Some(72));
        assert_eq!(parse_vital_input("  120 "), Some(120));
        assert_eq!(parse_vital_input("+5"), Some(5));
        assert_eq!(parse_vital_input("-5"), Some(-5));
        assert_eq!(parse_vital_input("0012"), Some(12));
    }

    #[test]
    fn parse_keeps_leading_digit_run_only() {
        assert_eq!(parse_vital_input("12abc"), Some(12));
        assert_eq!(parse_vital_input("3.7"), Some(3));
        assert_eq!(parse_vital_input("-2kg"), Some(-2));
    }

    #[test]
    fn parse_without_digits_is_no_value() {
        assert_eq!(parse_vital_input(""), None);
        assert_eq!(parse_vital_input("   "), None);
        assert_eq!(parse_vital_input("abc"), None);
        assert_eq!(parse_vital_input("."), None);
        assert_eq!(parse_vital_input("-"), None);
        assert_eq!(parse_vital_input("+"), None);
    }

    #[test]
    fn parse_overflow_is_no_value() {
        assert_eq!(parse_vital_input("99999999999999"), None);
    }

    // ───────────────────────────────────────
    // field update tests
    // ───────────────────────────────────────

    #[test]
    fn apply_updates_only_the_named_field() {
        let mut form = filled_form(None);
        form.draft.apply(Field::Weight, "82");

        assert_eq!(form.draft.weight, Some(82));
        assert_eq!(form.draft.temperature, Some(37));
        assert_eq!(form.draft.blood_pressure, Some(120));
        assert_eq!(form.draft.pulse_rate, Some(72));
        assert_eq!(form.draft.respiratory_rate, Some(16));
        assert_eq!(form.draft.date, "2024-01-01");
    }

    #[test]
    fn apply_non_numeric_clears_to_no_value() {
        let mut form = filled_form(None);
        form.draft.apply(Field::Weight, "seventy");
        assert_eq!(form.draft.weight, None);
    }

    #[test]
    fn apply_text_fields_store_raw_strings() {
        let mut draft = ReadingDraft::default();
        draft.apply(Field::Date, "2024-03-09");
        draft.apply(Field::PatientId, "P9");
        assert_eq!(draft.date, "2024-03-09");
        assert_eq!(draft.patient_id.as_deref(), Some("P9"));
    }

    #[test]
    fn unknown_wire_name_does_not_map_to_a_field() {
        assert_eq!(Field::from_str("weigth"), None);
        assert_eq!(Field::from_str(""), None);
        assert_eq!(Field::from_str("pulseRate"), Some(Field::PulseRate));
    }

    // ───────────────────────────────────────
    // validity tests
    // ───────────────────────────────────────

    #[test]
    fn untouched_field_is_valid() {
        let draft = ReadingDraft::default();
        for field in NUMERIC_FIELDS {
            assert!(draft.field_is_valid(field));
        }
    }

    #[test]
    fn zero_and_negative_are_invalid() {
        let mut draft = ReadingDraft::default();
        draft.apply(Field::Weight, "0");
        assert!(!draft.field_is_valid(Field::Weight));
        draft.apply(Field::Weight, "-4");
        assert!(!draft.field_is_valid(Field::Weight));
    }

    #[test]
    fn positive_is_valid() {
        let mut draft = ReadingDraft::default();
        draft.apply(Field::Temperature, "37");
        assert!(draft.field_is_valid(Field::Temperature));
    }

    #[test]
    fn non_numeric_entry_reads_as_untouched_not_error() {
        let mut draft = ReadingDraft::default();
        draft.apply(Field::PulseRate, "fast");
        assert!(draft.field_is_valid(Field::PulseRate));
    }

    // ───────────────────────────────────────
    // validation / begin_submit tests
    // ───────────────────────────────────────

    #[test]
    fn complete_draft_dispatches_assembled_reading() {
        let mut form = filled_form(None);
        let step = form.begin_submit(&patient_session("U1")).unwrap();

        let expected = VitalsReading {
            patient_id: "U1".into(),
            date: "2024-01-01".into(),
            pulse_rate: 72,
            blood_pressure: 120,
            weight: 70,
            temperature: 37,
            respiratory_rate: 16,
        };
        assert_eq!(step, SubmitStep::Dispatch(expected));
        assert_eq!(form.outcome, SubmissionOutcome::Pending);
    }

    #[test]
    fn missing_fields_reject_before_any_dispatch() {
        let mut form = FormState::open(None);
        form.draft.apply(Field::Date, "2024-01-01");
        form.draft.apply(Field::Weight, "70");

        let step = form.begin_submit(&patient_session("U1")).unwrap();
        assert_eq!(step, SubmitStep::Rejected);
        match &form.outcome {
            SubmissionOutcome::Failure { kind, message } => {
                assert_eq!(*kind, FailureKind::Validation);
                assert!(message.contains("temperature"));
                assert!(message.contains("pulse rate"));
                assert!(!message.contains("weight"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        // Entered values survive the rejection.
        assert_eq!(form.draft.weight, Some(70));
    }

    #[test]
    fn unresolvable_patient_counts_as_missing() {
        let mut form = filled_form(None);
        // Signed-out session: no user id, no nurse mode.
        let step = form.begin_submit(&UserSession::default()).unwrap();
        assert_eq!(step, SubmitStep::Rejected);
        match &form.outcome {
            SubmissionOutcome::Failure { kind, message } => {
                assert_eq!(*kind, FailureKind::Validation);
                assert!(message.contains("patient id"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn malformed_date_rejects() {
        let mut form = filled_form(None);
        form.draft.apply(Field::Date, "Jan 1st");

        let step = form.begin_submit(&patient_session("U1")).unwrap();
        assert_eq!(step, SubmitStep::Rejected);
        match &form.outcome {
            SubmissionOutcome::Failure { kind, message } => {
                assert_eq!(*kind, FailureKind::Validation);
                assert!(message.contains("calendar date"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn impossible_calendar_date_rejects() {
        let mut form = filled_form(None);
        form.draft.apply(Field::Date, "2024-02-31");
        let step = form.begin_submit(&patient_session("U1")).unwrap();
        assert_eq!(step, SubmitStep::Rejected);
    }

    #[test]
    fn positivity_does_not_block_submission() {
        // Entered but non-positive values are advisory-invalid yet still
        // submit; only presence gates the dispatch.
        let mut form = filled_form(None);
        form.draft.apply(Field::Weight, "-5");
        assert!(!form.draft.field_is_valid(Field::Weight));

        let step = form.begin_submit(&patient_session("U1")).unwrap();
        match step {
            SubmitStep::Dispatch(reading) => assert_eq!(reading.weight, -5),
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    #[test]
    fn second_submit_while_pending_is_rejected() {
        let mut form = filled_form(None);
        let first = form.begin_submit(&patient_session("U1")).unwrap();
        assert!(matches!(first, SubmitStep::Dispatch(_)));

        let second = form.begin_submit(&patient_session("U1"));
        assert_eq!(second, Err(FormError::SubmissionInFlight));
        assert_eq!(form.outcome, SubmissionOutcome::Pending);
    }

    #[test]
    fn nurse_uses_entered_id_over_route() {
        let mut form = filled_form(Some("P7"));
        form.draft.apply(Field::PatientId, "P9");

        let step = form.begin_submit(&nurse_session()).unwrap();
        match step {
            SubmitStep::Dispatch(reading) => assert_eq!(reading.patient_id, "P9"),
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    #[test]
    fn nurse_falls_back_to_route_id() {
        let mut form = filled_form(Some("P7"));
        let step = form.begin_submit(&nurse_session()).unwrap();
        match step {
            SubmitStep::Dispatch(reading) => assert_eq!(reading.patient_id, "P7"),
            other => panic!("expected dispatch, got {other:?}"),
        }
    }

    // ───────────────────────────────────────
    // outcome transition tests
    // ───────────────────────────────────────

    #[test]
    fn success_resets_entire_draft_and_sets_redirect() {
        let mut form = filled_form(None);
        let step = form.begin_submit(&patient_session("U1")).unwrap();
        let reading = match step {
            SubmitStep::Dispatch(r) => r,
            other => panic!("expected dispatch, got {other:?}"),
        };

        form.record_success(reading.clone());

        assert_eq!(form.draft, ReadingDraft::default());
        match &form.outcome {
            SubmissionOutcome::Success {
                reading: echoed,
                redirect_to,
            } => {
                assert_eq!(echoed, &reading);
                assert_eq!(redirect_to, "/healthInfo/U1");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn gateway_failure_retains_draft_for_retry() {
        let mut form = filled_form(None);
        form.begin_submit(&patient_session("U1")).unwrap();
        form.record_failure("network error".into());

        assert_eq!(
            form.outcome,
            SubmissionOutcome::Failure {
                kind: FailureKind::Gateway,
                message: "network error".into(),
            }
        );
        assert_eq!(form.draft.weight, Some(70));
        assert_eq!(form.draft.date, "2024-01-01");

        // And a retry is allowed from the failure state.
        let retry = form.begin_submit(&patient_session("U1")).unwrap();
        assert!(matches!(retry, SubmitStep::Dispatch(_)));
    }

    // ───────────────────────────────────────
    // view tests
    // ───────────────────────────────────────

    #[test]
    fn view_derives_identity_from_current_session() {
        let form = filled_form(Some("P7"));

        let as_nurse = form.view(&nurse_session());
        assert!(as_nurse.is_nurse);
        assert_eq!(as_nurse.effective_patient_id.as_deref(), Some("P7"));

        // Same form, session changed underneath: next render follows.
        let as_patient = form.view(&patient_session("U1"));
        assert!(!as_patient.is_nurse);
        assert_eq!(as_patient.effective_patient_id.as_deref(), Some("U1"));
    }

    #[test]
    fn view_carries_advisory_validity_flags() {
        let mut form = FormState::open(None);
        form.draft.apply(Field::Weight, "0");
        form.draft.apply(Field::Temperature, "37");

        let view = form.view(&patient_session("U1"));
        assert!(!view.validity.weight);
        assert!(view.validity.temperature);
        assert!(view.validity.pulse_rate);
    }

    #[test]
    fn view_serialises_with_wire_casing() {
        let form = filled_form(Some("P7"));
        let json = serde_json::to_value(form.view(&nurse_session())).unwrap();

        assert_eq!(json["outcome"]["state"], "idle");
        assert_eq!(json["draft"]["pulseRate"], 72);
        assert_eq!(json["route_patient_id"], "P7");
    }
}
