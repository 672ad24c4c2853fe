use serde::Deserialize;

#[derive(Deserialize)]
pub struct DecideAppointmentRequest {
    pub appointment_id: i32,
    pub faculty_id: i32,
    /// `accept` or `reject`.
    pub decision: String,
}

#[derive(Deserialize)]
pub struct RequestCancellationRequest {
    pub appointment_id: i32,
    pub requester_id: i32,
    #[serde(default)]
    pub reason: String,
}

#[derive(Deserialize)]
pub struct SearchAppointmentsRequest {
    pub faculty_id: i32,
    pub status: Option<String>,
}
