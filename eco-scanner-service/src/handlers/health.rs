use crate::models::HealthResponse;
use axum::Json;
use chrono::{SecondsFormat, Utc};

/// `GET /api/health`: liveness with the current UTC time.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn reports_ok_with_iso_timestamp() {
        let Json(body) = health_check().await;
        assert_eq!(body.status, "ok");
        assert!(body.timestamp.ends_with('Z'));

        let parsed = DateTime::parse_from_rfc3339(&body.timestamp).unwrap();
        let skew = Utc::now().signed_duration_since(parsed.with_timezone(&Utc));
        assert!(skew.num_seconds().abs() < 5);
    }
}
