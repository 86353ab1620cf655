use std::sync::Arc;

use poem_openapi::{OpenApi, payload::Json};

use business::domain::checkout::use_cases::checkout::CheckoutUseCase;

use crate::api::checkout::dto::{CheckoutRequest, PaymentConfirmationResponse, ReceiptResponse};
use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::security::ClerkBearer;
use crate::api::tags::ApiTags;

pub struct CheckoutApi {
    checkout_use_case: Arc<dyn CheckoutUseCase>,
}

impl CheckoutApi {
    pub fn new(checkout_use_case: Arc<dyn CheckoutUseCase>) -> Self {
        Self { checkout_use_case }
    }
}

/// Checkout API
///
/// Receipt totals with GST and a simulated payment step. No payment gateway
/// is contacted and nothing is stored.
#[OpenApi]
impl CheckoutApi {
    /// Build a receipt
    ///
    /// Computes line totals, subtotal, 18% GST and the amount to pay.
    #[oai(path = "/checkout/receipt", method = "post", tag = "ApiTags::Checkout")]
    async fn build_receipt(
        &self,
        _auth: ClerkBearer,
        body: Json<CheckoutRequest>,
    ) -> BuildReceiptResponse {
        match self.checkout_use_case.build_receipt(body.0.into()) {
            Ok(receipt) => BuildReceiptResponse::Ok(Json(receipt.into())),
            Err(err) => {
                let (_, json) = err.into_error_response();
                BuildReceiptResponse::BadRequest(json)
            }
        }
    }

    /// Pay for a cart
    ///
    /// Simulates a digital payment for the receipt total and returns the
    /// transaction details.
    #[oai(path = "/checkout/payment", method = "post", tag = "ApiTags::Checkout")]
    async fn pay(&self, _auth: ClerkBearer, body: Json<CheckoutRequest>) -> PayResponse {
        match self.checkout_use_case.pay(body.0.into()).await {
            Ok(confirmation) => PayResponse::Ok(Json(confirmation.into())),
            Err(err) => {
                let (_, json) = err.into_error_response();
                PayResponse::BadRequest(json)
            }
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum BuildReceiptResponse {
    #[oai(status = 200)]
    Ok(Json<ReceiptResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum PayResponse {
    #[oai(status = 200)]
    Ok(Json<PaymentConfirmationResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
}
