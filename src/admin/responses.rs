use serde::Serialize;

#[derive(Default, Serialize)]
pub struct CreateUserResponse {
    pub success: bool,
    pub err: String,
    pub user_id: i32,
}

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

#[derive(Default, Serialize)]
pub struct CancellationItem {
    pub id: i32,
    pub appointment_id: i32,
    pub requester_id: i32,
    pub reason: String,
    pub status: String,
}

#[derive(Default, Serialize)]
pub struct SearchCancellationsResponse {
    pub success: bool,
    pub err: String,
    pub requests: Vec<CancellationItem>,
}

#[derive(Default, Serialize)]
pub struct UserItem {
    pub id: i32,
    pub username: String,
    pub role: String,
}

#[derive(Default, Serialize)]
pub struct SearchUsersResponse {
    pub success: bool,
    pub err: String,
    pub users: Vec<UserItem>,
}

crate::err_envelope! {
    CreateUserResponse,
    SearchAppointmentsResponse,
    SearchCancellationsResponse,
    SearchUsersResponse,
}
