//! Typed decode helpers for endpoints whose response shape varies.
//!
//! Some mutating endpoints answer with the full updated booking, others with
//! an acknowledgement such as `{"status": "cancelled"}`; payment updates may
//! arrive bare or wrapped under a `payment` or `data` key. These helpers turn
//! that shape probing into explicit typed results.

use serde_json::Value;
use thiserror::Error;

use crate::model::{Booking, Payment};

/// Decode failure for an ambiguous-shape response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The response matched none of the accepted shapes for the endpoint.
    #[error("unrecognized {endpoint} response shape")]
    UnrecognizedShape {
        /// Endpoint the response came from.
        endpoint: &'static str,
    },
    /// The response matched a shape but its fields failed to deserialize.
    #[error("invalid {endpoint} response: {message}")]
    Invalid {
        /// Endpoint the response came from.
        endpoint: &'static str,
        /// Deserialization failure detail.
        message: String,
    },
}

/// Classified response of a cancel/confirm call.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The server returned the full updated booking record.
    Updated(Booking),
    /// Acknowledgement only; the caller must re-fetch the booking by id.
    Ack,
}

/// Classifies a cancel/confirm response.
///
/// A JSON object carrying a non-null `id` is treated as a full booking record;
/// anything else (including `{"status": "cancelled"}`) is an acknowledgement.
///
/// # Errors
///
/// Returns [`DecodeError::Invalid`] when an id-carrying object fails to
/// deserialize as a [`Booking`].
pub fn decode_mutation_outcome(
    value: Value,
    endpoint: &'static str,
) -> Result<MutationOutcome, DecodeError> {
    match value.get("id") {
        Some(id) if !id.is_null() => serde_json::from_value(value)
            .map(MutationOutcome::Updated)
            .map_err(|e| DecodeError::Invalid {
                endpoint,
                message: e.to_string(),
            }),
        _ => Ok(MutationOutcome::Ack),
    }
}

/// Decodes a payment-update response, unwrapping `payment` or `data` wrappers.
///
/// # Errors
///
/// Returns [`DecodeError::UnrecognizedShape`] when neither the bare object nor
/// a wrapper holds an id-carrying payment, and [`DecodeError::Invalid`] when
/// the located object fails to deserialize as a [`Payment`].
pub fn decode_payment_response(value: Value) -> Result<Payment, DecodeError> {
    const ENDPOINT: &str = "payment update";

    let candidate = if value.get("id").map_or(false, |id| !id.is_null()) {
        value
    } else if let Some(inner) = value.get("payment").filter(|v| v.is_object()) {
        inner.clone()
    } else if let Some(inner) = value.get("data").filter(|v| v.is_object()) {
        inner.clone()
    } else {
        return Err(DecodeError::UnrecognizedShape { endpoint: ENDPOINT });
    };

    serde_json::from_value(candidate).map_err(|e| DecodeError::Invalid {
        endpoint: ENDPOINT,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{PaymentMethod, PaymentStatus};

    fn booking_json() -> Value {
        json!({
            "id": 42,
            "salon": {"id": 5, "owner": 2, "name": "Shear Genius"},
            "service": {"id": 9, "salon": 5, "name": "Cut", "duration_minutes": 30, "price": 25.0},
            "start_time": "2024-01-01T10:00:00Z",
            "status": "cancelled"
        })
    }

    #[test]
    fn full_booking_response_decodes_as_updated() {
        let outcome = decode_mutation_outcome(booking_json(), "cancel").unwrap();
        match outcome {
            MutationOutcome::Updated(booking) => assert_eq!(booking.id, 42),
            MutationOutcome::Ack => panic!("expected full record"),
        }
    }

    #[test]
    fn ack_response_decodes_as_ack() {
        let outcome =
            decode_mutation_outcome(json!({"status": "cancelled"}), "cancel").unwrap();
        assert_eq!(outcome, MutationOutcome::Ack);
    }

    #[test]
    fn malformed_id_carrying_response_is_an_error() {
        let err = decode_mutation_outcome(json!({"id": 42}), "confirm").unwrap_err();
        assert!(matches!(err, DecodeError::Invalid { endpoint: "confirm", .. }));
    }

    #[test]
    fn bare_payment_decodes() {
        let payment = decode_payment_response(json!({
            "id": 7, "amount": "10.00", "method": "cod", "status": "completed"
        }))
        .unwrap();
        assert_eq!(payment.id, 7);
        assert_eq!(payment.status, PaymentStatus::Completed);
    }

    #[test]
    fn payment_unwraps_data_and_payment_keys() {
        for key in ["data", "payment"] {
            let payment = decode_payment_response(json!({
                key: {"id": 7, "amount": 10.0, "method": "cod", "status": "completed"}
            }))
            .unwrap();
            assert_eq!(payment.id, 7);
            assert_eq!(payment.method, PaymentMethod::Cod);
        }
    }

    #[test]
    fn unrecognized_payment_shape_is_an_error() {
        let err = decode_payment_response(json!({"ok": true})).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnrecognizedShape { endpoint: "payment update" }
        );
    }
}
