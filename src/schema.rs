diesel::table! {
    appointments (id) {
        id -> Integer,
        student_id -> Integer,
        faculty_id -> Integer,
        start_time -> Timestamp,
        end_time -> Timestamp,
        reason -> Text,
        status -> Text,
    }
}

diesel::table! {
    cancellation_requests (id) {
        id -> Integer,
        appointment_id -> Integer,
        requester_id -> Integer,
        reason -> Text,
        status -> Text,
    }
}

diesel::table! {
    users (id) {
        id -> Integer,
        username -> Text,
        password -> Text,
        role -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(appointments, cancellation_requests, users,);
