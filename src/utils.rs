#[macro_export]
macro_rules! post_funcs {
    ( $( ( $func_name:ident, $url:expr, $request:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[post($url)]
                async fn $func_name(
                    state: web::Data<$crate::AppState>,
                    info: web::Json<$request>
                ) -> impl Responder {
                    let response = match [<$func_name _impl>](state, info).await {
                        Ok(response) => response,
                        Err(err) => $response::err(err.to_string()),
                    };
                    HttpResponse::Ok().json(response)
                }
            }
        )+
    };
}

use chrono::{DateTime, NaiveDateTime};

use crate::error::ServiceError;
use crate::models::users::ALL_ROLES;

pub fn assert_role_str(role: &str) -> Result<(), ServiceError> {
    if !ALL_ROLES.contains(&role) {
        return Err(ServiceError::MalformedInput(format!(
            "unknown role `{}`",
            role
        )));
    }
    Ok(())
}

/// Accepts `2024-05-10T10:00:00Z`, an explicit offset, or a bare local
/// timestamp; everything is normalized to naive UTC.
pub fn parse_time_str<S: AsRef<str>>(s: S) -> Result<NaiveDateTime, ServiceError> {
    const TIME_FMT_OFFSET: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";
    const TIME_FMT_UTC: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
    const TIME_FMT_PLAIN: &str = "%Y-%m-%dT%H:%M:%S%.f";

    let s = s.as_ref();
    let parsed = if s.ends_with('Z') {
        NaiveDateTime::parse_from_str(s, TIME_FMT_UTC)
    } else {
        DateTime::parse_from_str(s, TIME_FMT_OFFSET)
            .map(|t| t.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(s, TIME_FMT_PLAIN))
    };
    parsed.map_err(|_| ServiceError::MalformedInput(format!("invalid time `{}`", s)))
}

pub fn format_time_str(time: &NaiveDateTime) -> String {
    const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    format!("{}+00:00", time.format(TIME_FMT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_utc_suffix() {
        let t = parse_time_str("2024-05-10T10:00:00Z").unwrap();
        let want = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(t, want);
    }

    #[test]
    fn parses_explicit_offset() {
        let t = parse_time_str("2024-05-10T12:00:00+02:00").unwrap();
        let want = NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(t, want);
    }

    #[test]
    fn parses_bare_timestamp() {
        assert!(parse_time_str("2024-05-10T10:00:00").is_ok());
    }

    #[test]
    fn rejects_garbage_time() {
        assert!(matches!(
            parse_time_str("next tuesday"),
            Err(ServiceError::MalformedInput(_))
        ));
    }

    #[test]
    fn rejects_unknown_role() {
        assert!(assert_role_str("student").is_ok());
        assert!(assert_role_str("faculty").is_ok());
        assert!(assert_role_str("admin").is_ok());
        assert!(assert_role_str("dean").is_err());
    }
}
