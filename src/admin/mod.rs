mod requests;
mod responses;

use actix_web::{post, web, HttpResponse, Responder};
use diesel::prelude::*;

use crate::database::{assert, get_db_conn};
use crate::error::ServiceError;
use crate::models::users::{UserData, ROLE_ADMIN};
use crate::protocol::SimpleResponse;
use crate::relay::events;
use crate::relay::server::Broadcast;
use crate::services::booking::{self, AppointmentFilter, Decision, TimeWindow};
use crate::services::cancellation::{self, CancellationFilter};
use crate::services::auth;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(set_role)
        .service(reset_password)
        .service(cancel_appointment)
        .service(edit_appointment)
        .service(resolve_cancellation)
        .service(search_appointments)
        .service(search_cancellations)
        .service(search_users);
}

crate::post_funcs! {
    (create_user, "/create_user", CreateUserRequest, CreateUserResponse),
    (set_role, "/set_role", SetRoleRequest, SimpleResponse),
    (reset_password, "/reset_password", ResetPasswordRequest, SimpleResponse),
    (cancel_appointment, "/cancel_appointment", CancelAppointmentRequest, SimpleResponse),
    (edit_appointment, "/edit_appointment", EditAppointmentRequest, SimpleResponse),
    (resolve_cancellation, "/resolve_cancellation", ResolveCancellationRequest, SimpleResponse),
    (search_appointments, "/search_appointments", SearchAppointmentsRequest, SearchAppointmentsResponse),
    (search_cancellations, "/search_cancellations", SearchCancellationsRequest, SearchCancellationsResponse),
    (search_users, "/search_users", SearchUsersRequest, SearchUsersResponse),
}

async fn create_user_impl(
    state: web::Data<crate::AppState>,
    info: web::Json<CreateUserRequest>,
) -> anyhow::Result<CreateUserResponse> {
    let info = info.into_inner();

    let mut conn = get_db_conn(&state)?;
    let user = web::block(move || -> Result<_, ServiceError> {
        let acting = assert::assert_user(&mut conn, info.admin_id)?;
        auth::require_role(&acting, &[ROLE_ADMIN])?;
        auth::create_user(&mut conn, &info.username, &info.password, &info.role)
    })
    .await??;

    tracing::info!(username = %user.username, role = %user.role, "user created");

    Ok(CreateUserResponse {
        success: true,
        err: "".to_string(),
        user_id: user.id,
    })
}

async fn set_role_impl(
    state: web::Data<crate::AppState>,
    info: web::Json<SetRoleRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();

    let mut conn = get_db_conn(&state)?;
    web::block(move || -> Result<_, ServiceError> {
        auth::set_role(&mut conn, info.admin_id, info.user_id, &info.role)
    })
    .await??;

    Ok(SimpleResponse::ok())
}

async fn reset_password_impl(
    state: web::Data<crate::AppState>,
    info: web::Json<ResetPasswordRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();

    let mut conn = get_db_conn(&state)?;
    let user = web::block(move || -> Result<_, ServiceError> {
        auth::set_password(&mut conn, info.admin_id, info.user_id, None, &info.new_password)
    })
    .await??;

    tracing::info!(user = user.id, "password reset");

    Ok(SimpleResponse::ok())
}

async fn cancel_appointment_impl(
    state: web::Data<crate::AppState>,
    info: web::Json<CancelAppointmentRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();

    let mut conn = get_db_conn(&state)?;
    let appointment = web::block(move || -> Result<_, ServiceError> {
        booking::cancel(&mut conn, info.appointment_id, info.admin_id)
    })
    .await??;

    tracing::info!(appointment = appointment.id, "appointment cancelled");
    state
        .relay
        .do_send(Broadcast(events::appointment_event(&appointment)));

    Ok(SimpleResponse::ok())
}

async fn edit_appointment_impl(
    state: web::Data<crate::AppState>,
    info: web::Json<EditAppointmentRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();

    let window = match (&info.start_time, &info.end_time) {
        (Some(start), Some(end)) => Some(TimeWindow::new(
            crate::utils::parse_time_str(start)?,
            crate::utils::parse_time_str(end)?,
        )?),
        (None, None) => None,
        _ => {
            return Err(ServiceError::MalformedInput(
                "start_time and end_time must be given together".to_string(),
            )
            .into())
        }
    };

    let mut conn = get_db_conn(&state)?;
    let appointment = web::block(move || -> Result<_, ServiceError> {
        booking::edit(
            &mut conn,
            info.admin_id,
            info.appointment_id,
            window,
            info.reason,
        )
    })
    .await??;

    state
        .relay
        .do_send(Broadcast(events::appointment_event(&appointment)));

    Ok(SimpleResponse::ok())
}

async fn resolve_cancellation_impl(
    state: web::Data<crate::AppState>,
    info: web::Json<ResolveCancellationRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    let decision = Decision::parse(&info.decision)?;
    let appointment_id = info.appointment_id;

    let mut conn = get_db_conn(&state)?;
    let (request, appointment) = web::block(move || -> Result<_, ServiceError> {
        cancellation::resolve(&mut conn, info.appointment_id, info.admin_id, decision)
    })
    .await??;

    tracing::info!(
        request = request.id,
        status = %request.status,
        "cancellation request resolved"
    );
    state
        .relay
        .do_send(Broadcast(events::cancellation_event(appointment_id)));
    if decision == Decision::Accept {
        state
            .relay
            .do_send(Broadcast(events::appointment_event(&appointment)));
    }

    Ok(SimpleResponse::ok())
}

async fn search_appointments_impl(
    state: web::Data<crate::AppState>,
    info: web::Json<SearchAppointmentsRequest>,
) -> anyhow::Result<SearchAppointmentsResponse> {
    let info = info.into_inner();

    let mut conn = get_db_conn(&state)?;
    let appointments = web::block(move || -> Result<_, ServiceError> {
        booking::search_appointments(
            &mut conn,
            AppointmentFilter {
                student_id: info.student_id,
                faculty_id: info.faculty_id,
                status: info.status,
            },
        )
    })
    .await??;

    let appointments = appointments
        .into_iter()
        .map(|appo| AppointmentItem {
            id: appo.id,
            student_id: appo.student_id,
            faculty_id: appo.faculty_id,
            start_time: crate::utils::format_time_str(&appo.start_time),
            end_time: crate::utils::format_time_str(&appo.end_time),
            reason: appo.reason,
            status: appo.status,
        })
        .collect();

    Ok(SearchAppointmentsResponse {
        success: true,
        err: "".to_string(),
        appointments,
    })
}

async fn search_cancellations_impl(
    state: web::Data<crate::AppState>,
    info: web::Json<SearchCancellationsRequest>,
) -> anyhow::Result<SearchCancellationsResponse> {
    let info = info.into_inner();

    let mut conn = get_db_conn(&state)?;
    let requests = web::block(move || -> Result<_, ServiceError> {
        cancellation::search_cancellations(
            &mut conn,
            CancellationFilter {
                appointment_id: info.appointment_id,
                status: info.status,
            },
        )
    })
    .await??;

    let requests = requests
        .into_iter()
        .map(|req| CancellationItem {
            id: req.id,
            appointment_id: req.appointment_id,
            requester_id: req.requester_id,
            reason: req.reason,
            status: req.status,
        })
        .collect();

    Ok(SearchCancellationsResponse {
        success: true,
        err: "".to_string(),
        requests,
    })
}

async fn search_users_impl(
    state: web::Data<crate::AppState>,
    info: web::Json<SearchUsersRequest>,
) -> anyhow::Result<SearchUsersResponse> {
    use crate::schema::users;

    let info = info.into_inner();

    let mut conn = get_db_conn(&state)?;
    let found = web::block(move || -> Result<_, ServiceError> {
        let acting = assert::assert_user(&mut conn, info.admin_id)?;
        auth::require_role(&acting, &[ROLE_ADMIN])?;

        let mut query = users::table.into_boxed();
        if let Some(role) = info.role {
            query = query.filter(users::role.eq(role));
        }
        let found = query
            .order(users::username.asc())
            .get_results::<UserData>(&mut conn)?;
        Ok(found)
    })
    .await??;

    let found = found
        .into_iter()
        .map(|user| UserItem {
            id: user.id,
            username: user.username,
            role: user.role,
        })
        .collect();

    Ok(SearchUsersResponse {
        success: true,
        err: "".to_string(),
        users: found,
    })
}
