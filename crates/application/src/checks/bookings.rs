use async_trait::async_trait;
use kpi_check_domain::{Assertion, NewBooking, RecordKind};
use serde_json::json;

use super::Check;
use crate::error::ApplicationResult;
use crate::session::KpiSession;

const BOOKING: NewBooking = NewBooking {
    profit: 10.50,
    is_prepaid: true,
    has_refund_protection: false,
    time_since_last: None,
};

/// A booking can be added to today's entry and removed again.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingsApi;

#[async_trait]
impl Check for BookingsApi {
    fn name(&self) -> &'static str {
        "Bookings API"
    }

    async fn run(&self, session: &mut KpiSession) -> ApplicationResult<()> {
        tracing::info!("Testing Bookings API...");

        let (_, id) = session
            .create_identified_record(
                RecordKind::Booking,
                &BOOKING,
                [
                    Assertion::json_eq("$.bookings[-1].profit", json!(BOOKING.profit)),
                    Assertion::json_eq("$.bookings[-1].is_prepaid", json!(BOOKING.is_prepaid)),
                    Assertion::json_eq(
                        "$.bookings[-1].has_refund_protection",
                        json!(BOOKING.has_refund_protection),
                    ),
                ],
            )
            .await?;
        tracing::info!("✅ POST /entries/{{date}}/bookings working correctly");

        session.delete_record(RecordKind::Booking, &id).await?;
        tracing::info!("✅ DELETE /entries/{{date}}/bookings/{{booking_id}} working correctly");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::test_support::{FixedClient, MismatchVerifier, PassingVerifier, session};

    #[tokio::test]
    async fn test_booking_without_id_fails_before_delete() {
        let client = Arc::new(FixedClient::new(
            200,
            &json!({"bookings": [{"profit": 10.5, "is_prepaid": true}]}),
        ));
        let mut session = session(Arc::clone(&client), PassingVerifier);

        let err = BookingsApi.run(&mut session).await.unwrap_err();

        assert!(err.to_string().contains("created booking has no id"));
        assert_eq!(client.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_booking_is_created_then_deleted() {
        let client = Arc::new(FixedClient::new(200, &json!({"bookings": [{"id": "b-7"}]})));
        let mut session = session(Arc::clone(&client), PassingVerifier);

        BookingsApi.run(&mut session).await.unwrap();

        assert!(session.ledger().pending().is_empty());
        assert_eq!(
            client.requests.lock().unwrap().last().map(String::as_str),
            Some("DELETE http://kpi.test/api/entries/2025-06-03/bookings/b-7")
        );
    }

    #[tokio::test]
    async fn test_mismatching_booking_stays_tracked_for_teardown() {
        let client = Arc::new(FixedClient::new(200, &json!({"bookings": [{"id": "b-3", "profit": 0.0}]})));
        let mut session = session(Arc::clone(&client), MismatchVerifier);

        let err = BookingsApi.run(&mut session).await.unwrap_err();

        assert!(err.to_string().contains("value mismatch"));
        let ids: Vec<&str> = session.ledger().pending().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b-3"]);
        assert_eq!(client.requests.lock().unwrap().len(), 1);
    }
}
