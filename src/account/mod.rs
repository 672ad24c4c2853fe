mod requests;
mod responses;

use actix_web::{post, web, HttpResponse, Responder};

use crate::database::get_db_conn;
use crate::error::ServiceError;
use crate::protocol::SimpleResponse;
use crate::services::auth;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(change_password);
}

crate::post_funcs! {
    (login, "/login", LoginRequest, LoginResponse),
    (change_password, "/change_password", ChangePasswordRequest, SimpleResponse),
}

async fn login_impl(
    state: web::Data<crate::AppState>,
    info: web::Json<LoginRequest>,
) -> anyhow::Result<LoginResponse> {
    let info = info.into_inner();
    let mut conn = get_db_conn(&state)?;

    let user = web::block(move || -> Result<_, ServiceError> {
        auth::authenticate(&mut conn, &info.username, &info.password)
    })
    .await??;

    Ok(LoginResponse {
        success: true,
        err: "".to_string(),
        user_id: user.id,
        username: user.username,
        role: user.role,
    })
}

async fn change_password_impl(
    state: web::Data<crate::AppState>,
    info: web::Json<ChangePasswordRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    let mut conn = get_db_conn(&state)?;

    let user = web::block(move || -> Result<_, ServiceError> {
        auth::set_password(
            &mut conn,
            info.user_id,
            info.user_id,
            Some(&info.old_password),
            &info.new_password,
        )
    })
    .await??;

    tracing::info!(user = user.id, "password changed");

    Ok(SimpleResponse::ok())
}
