//! The JSON envelope every POST handler answers with. `success` tells the
//! client whether to refresh its appointment views; `err` carries the
//! taxonomy message and is empty on success.

use serde::Serialize;

/// Reply for operations whose only payload is the outcome, such as role
/// changes and cancellation decisions.
#[derive(Default, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub err: String,
}

impl SimpleResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            err: String::new(),
        }
    }
}

/// Gives a response type the failure constructor the handler macro expects.
/// Payload fields fall back to `Default` so an error reply never carries a
/// half-built appointment or user record.
#[macro_export]
macro_rules! err_envelope {
    ( $( $type:ty),+ $(,)? ) => {
        $(
            impl $type {
                pub fn err<S: ToString>(err: S) -> Self {
                    Self {
                        success: false,
                        err: err.to_string(),
                        ..Default::default()
                    }
                }
            }
        )+
    };
}

err_envelope! {
    SimpleResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_resets_payload_fields() {
        #[derive(Default, Serialize)]
        struct WithPayload {
            success: bool,
            err: String,
            appointment_id: i32,
        }
        crate::err_envelope! { WithPayload }

        let reply = WithPayload::err("slot is already taken");
        assert!(!reply.success);
        assert_eq!(reply.err, "slot is already taken");
        assert_eq!(reply.appointment_id, 0);
    }
}
