use serde::{Deserialize, Serialize};

/// One completed vital-signs record, as the records service stores and
/// echoes it. Field names are camelCase on the wire.
///
/// All numeric fields are semantically "> 0", but that is advisory form
/// feedback only; the service accepts whatever the gateway accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsReading {
    pub patient_id: String,
    /// Calendar date of the measurements, `YYYY-MM-DD`.
    pub date: String,
    pub pulse_rate: i32,
    pub blood_pressure: i32,
    pub weight: i32,
    pub temperature: i32,
    pub respiratory_rate: i32,
}
