mod requests;
mod responses;

use actix_web::{post, web, HttpResponse, Responder};

use crate::database::get_db_conn;
use crate::error::ServiceError;
use crate::protocol::SimpleResponse;
use crate::relay::events;
use crate::relay::server::Broadcast;
use crate::services::booking::{self, AppointmentFilter, Decision};
use crate::services::cancellation;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(decide_appointment)
        .service(request_cancellation)
        .service(search_appointments);
}

crate::post_funcs! {
    (decide_appointment, "/decide_appointment", DecideAppointmentRequest, SimpleResponse),
    (request_cancellation, "/request_cancellation", RequestCancellationRequest, SimpleResponse),
    (search_appointments, "/search_appointments", SearchAppointmentsRequest, SearchAppointmentsResponse),
}

async fn decide_appointment_impl(
    state: web::Data<crate::AppState>,
    info: web::Json<DecideAppointmentRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    let decision = Decision::parse(&info.decision)?;

    let mut conn = get_db_conn(&state)?;
    let appointment = web::block(move || -> Result<_, ServiceError> {
        booking::decide(&mut conn, info.appointment_id, info.faculty_id, decision)
    })
    .await??;

    tracing::info!(
        appointment = appointment.id,
        status = %appointment.status,
        "appointment decided"
    );
    state
        .relay
        .do_send(Broadcast(events::appointment_event(&appointment)));

    Ok(SimpleResponse::ok())
}

async fn request_cancellation_impl(
    state: web::Data<crate::AppState>,
    info: web::Json<RequestCancellationRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    let appointment_id = info.appointment_id;
    let allow_repeat = state.config.allow_repeat_cancel_requests;

    let mut conn = get_db_conn(&state)?;
    web::block(move || -> Result<_, ServiceError> {
        cancellation::request_cancellation(
            &mut conn,
            info.appointment_id,
            info.requester_id,
            info.reason,
            allow_repeat,
        )
    })
    .await??;

    state
        .relay
        .do_send(Broadcast(events::cancellation_event(appointment_id)));

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
                faculty_id: Some(info.faculty_id),
                status: info.status,
                ..Default::default()
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
