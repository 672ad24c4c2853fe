use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub admin_id: i32,
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct SetRoleRequest {
    pub admin_id: i32,
    pub user_id: i32,
    pub role: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub admin_id: i32,
    pub user_id: i32,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct CancelAppointmentRequest {
    pub admin_id: i32,
    pub appointment_id: i32,
}

#[derive(Deserialize)]
pub struct EditAppointmentRequest {
    pub admin_id: i32,
    pub appointment_id: i32,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct ResolveCancellationRequest {
    pub admin_id: i32,
    pub appointment_id: i32,
    /// `accept` or `reject`.
    pub decision: String,
}

#[derive(Deserialize)]
pub struct SearchAppointmentsRequest {
    pub student_id: Option<i32>,
    pub faculty_id: Option<i32>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchCancellationsRequest {
    pub appointment_id: Option<i32>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchUsersRequest {
    pub admin_id: i32,
    pub role: Option<String>,
}
