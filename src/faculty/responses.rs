use serde::Serialize;

#[derive(Default, Serialize)]
pub struct AppointmentItem {
    pub id: i32,
    pub student_id: i32,
    pub faculty_id: i32,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
    pub status: String,
}

#[derive(Default, Serialize)]
pub struct SearchAppointmentsResponse {
    pub success: bool,
    pub err: String,
    pub appointments: Vec<AppointmentItem>,
}

crate::err_envelope! {
    SearchAppointmentsResponse,
}
