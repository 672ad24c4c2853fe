use serde::Deserialize;

#[derive(Deserialize)]
pub struct RequestAppointmentRequest {
    pub student_id: i32,
    pub faculty_id: i32,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub reason: String,
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
    pub student_id: i32,
    pub status: Option<String>,
}
