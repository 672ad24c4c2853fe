use crate::error::ServiceError;
use crate::models::appointments::Appointment;

/// Broadcast after any successful appointment mutation.
pub fn appointment_event(appointment: &Appointment) -> String {
    serde_json::json!({
        "action": "update_appointment",
        "appointment": {
            "id": appointment.id,
            "student_id": appointment.student_id,
            "faculty_id": appointment.faculty_id,
            "start_time": crate::utils::format_time_str(&appointment.start_time),
            "end_time": crate::utils::format_time_str(&appointment.end_time),
            "reason": appointment.reason,
            "status": appointment.status,
        }
    })
    .to_string()
}

/// Broadcast after any cancellation-request mutation.
pub fn cancellation_event(appointment_id: i32) -> String {
    serde_json::json!({
        "action": "update_cancellation",
        "appointment_id": appointment_id,
    })
    .to_string()
}

/// Sent back on the offending connection only; never broadcast.
pub fn error_event(err: &ServiceError) -> String {
    serde_json::json!({
        "action": "error",
        "err": err.to_string(),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn appointment_event_carries_action_and_status() {
        let appointment = Appointment {
            id: 7,
            student_id: 1,
            faculty_id: 2,
            start_time: NaiveDate::from_ymd_opt(2024, 5, 10)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            end_time: NaiveDate::from_ymd_opt(2024, 5, 10)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap(),
            reason: "thesis".to_string(),
            status: "pending".to_string(),
        };

        let value: serde_json::Value =
            serde_json::from_str(&appointment_event(&appointment)).unwrap();
        assert_eq!(value["action"], "update_appointment");
        assert_eq!(value["appointment"]["id"], 7);
        assert_eq!(value["appointment"]["status"], "pending");
    }

    #[test]
    fn cancellation_event_names_the_appointment() {
        let value: serde_json::Value =
            serde_json::from_str(&cancellation_event(42)).unwrap();
        assert_eq!(value["action"], "update_cancellation");
        assert_eq!(value["appointment_id"], 42);
    }

    #[test]
    fn error_event_is_human_readable() {
        let value: serde_json::Value =
            serde_json::from_str(&error_event(&ServiceError::SlotTaken)).unwrap();
        assert_eq!(value["action"], "error");
        assert_eq!(value["err"], "time slot already taken");
    }
}
