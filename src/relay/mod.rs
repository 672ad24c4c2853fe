pub mod events;
pub mod server;

use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;

use crate::error::ServiceError;
use crate::services::booking::{self, Decision, TimeWindow};
use crate::services::cancellation;
use crate::AppState;

use self::server::{Broadcast, Connect, Disconnect, Event};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// The inbound `{action, ...}` message set. Unknown actions and missing
/// fields fail serde parsing and only the sending connection hears about it.
#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ClientEvent {
    RequestAppointment {
        student_id: i32,
        faculty_id: i32,
        start_time: String,
        end_time: String,
        #[serde(default)]
        reason: String,
    },
    RequestCancellation {
        appointment_id: i32,
        requester_id: i32,
        #[serde(default)]
        reason: String,
    },
    AdminAcceptCancellation {
        appointment_id: i32,
        admin_id: i32,
    },
    AdminRejectCancellation {
        appointment_id: i32,
        admin_id: i32,
    },
}

fn parse_event(text: &str) -> Result<ClientEvent, ServiceError> {
    serde_json::from_str(text).map_err(|err| ServiceError::MalformedInput(err.to_string()))
}

/// Runs one inbound event against the core services and returns the update
/// events to broadcast on success.
async fn dispatch(state: &AppState, text: &str) -> Result<Vec<String>, ServiceError> {
    let event = parse_event(text)?;
    let pool = state.pool.clone();
    let allow_repeat = state.config.allow_repeat_cancel_requests;

    match event {
        ClientEvent::RequestAppointment {
            student_id,
            faculty_id,
            start_time,
            end_time,
            reason,
        } => {
            let window = TimeWindow::new(
                crate::utils::parse_time_str(&start_time)?,
                crate::utils::parse_time_str(&end_time)?,
            )?;
            let appointment = web::block(move || -> Result<_, ServiceError> {
                let mut conn = pool.get()?;
                booking::request_appointment(&mut conn, student_id, faculty_id, window, reason)
            })
            .await??;
            Ok(vec![events::appointment_event(&appointment)])
        }
        ClientEvent::RequestCancellation {
            appointment_id,
            requester_id,
            reason,
        } => {
            web::block(move || -> Result<_, ServiceError> {
                let mut conn = pool.get()?;
                cancellation::request_cancellation(
                    &mut conn,
                    appointment_id,
                    requester_id,
                    reason,
                    allow_repeat,
                )
            })
            .await??;
            Ok(vec![events::cancellation_event(appointment_id)])
        }
        ClientEvent::AdminAcceptCancellation {
            appointment_id,
            admin_id,
        } => {
            let (_, appointment) = web::block(move || -> Result<_, ServiceError> {
                let mut conn = pool.get()?;
                cancellation::resolve(&mut conn, appointment_id, admin_id, Decision::Accept)
            })
            .await??;
            Ok(vec![
                events::cancellation_event(appointment_id),
                events::appointment_event(&appointment),
            ])
        }
        ClientEvent::AdminRejectCancellation {
            appointment_id,
            admin_id,
        } => {
            web::block(move || -> Result<_, ServiceError> {
                let mut conn = pool.get()?;
                cancellation::resolve(&mut conn, appointment_id, admin_id, Decision::Reject)
            })
            .await??;
            Ok(vec![events::cancellation_event(appointment_id)])
        }
    }
}

pub struct WsSession {
    id: usize,
    hb: Instant,
    state: web::Data<AppState>,
}

impl WsSession {
    fn new(state: web::Data<AppState>) -> Self {
        Self {
            id: 0,
            hb: Instant::now(),
            state,
        }
    }

    fn heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.heartbeat(ctx);

        let addr = ctx.address();
        self.state
            .relay
            .send(Connect {
                addr: addr.recipient(),
            })
            .into_actor(self)
            .then(|res, act, ctx| {
                match res {
                    Ok(id) => act.id = id,
                    Err(_) => ctx.stop(),
                }
                fut::ready(())
            })
            .wait(ctx);
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.state.relay.do_send(Disconnect { id: self.id });
        Running::Stop
    }
}

impl Handler<Event> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Event, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.hb = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                let state = self.state.clone();
                let text = text.to_string();
                let task = actix::fut::wrap_future::<_, Self>(async move {
                    dispatch(&state, &text).await
                });
                ctx.spawn(task.map(|res, act, ctx| match res {
                    Ok(payloads) => {
                        for payload in payloads {
                            act.state.relay.do_send(Broadcast(payload));
                        }
                    }
                    Err(err) => ctx.text(events::error_event(&err)),
                }));
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(_) => {}
            Err(_) => ctx.stop(),
        }
    }
}

pub async fn ws_route(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    ws::start(WsSession::new(state), &req, stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_request_appointment_action() {
        let event = parse_event(
            r#"{"action": "request_appointment", "student_id": 1, "faculty_id": 2,
                "start_time": "2024-05-10T10:00:00Z", "end_time": "2024-05-10T11:00:00Z",
                "reason": "thesis"}"#,
        )
        .unwrap();
        assert!(matches!(
            event,
            ClientEvent::RequestAppointment {
                student_id: 1,
                faculty_id: 2,
                ..
            }
        ));
    }

    #[test]
    fn reason_is_optional() {
        let event = parse_event(
            r#"{"action": "request_cancellation", "appointment_id": 3, "requester_id": 1}"#,
        )
        .unwrap();
        match event {
            ClientEvent::RequestCancellation { reason, .. } => assert_eq!(reason, ""),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let err = parse_event(r#"{"action": "admin_accept_cancellation", "admin_id": 1}"#)
            .unwrap_err();
        assert!(matches!(err, ServiceError::MalformedInput(_)));
    }

    #[test]
    fn unknown_action_is_malformed() {
        let err = parse_event(r#"{"action": "drop_all_tables"}"#).unwrap_err();
        assert!(matches!(err, ServiceError::MalformedInput(_)));
    }

    #[test]
    fn unparsable_json_is_malformed() {
        let err = parse_event("not json at all").unwrap_err();
        assert!(matches!(err, ServiceError::MalformedInput(_)));
    }
}
