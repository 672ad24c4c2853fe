use serde::Serialize;

#[derive(Default, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub err: String,
    pub user_id: i32,
    pub username: String,
    pub role: String,
}

crate::err_envelope! {
    LoginResponse,
}
