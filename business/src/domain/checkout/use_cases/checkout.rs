use async_trait::async_trait;

use crate::domain::checkout::errors::CheckoutError;
use crate::domain::checkout::model::{PaymentConfirmation, Receipt};

/// A receipt line as submitted back by the client after review.
pub struct CheckoutLine {
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub confidence: f64,
}

pub struct CheckoutParams {
    pub lines: Vec<CheckoutLine>,
}

#[async_trait]
pub trait CheckoutUseCase: Send + Sync {
    fn build_receipt(&self, params: CheckoutParams) -> Result<Receipt, CheckoutError>;

    async fn pay(&self, params: CheckoutParams) -> Result<PaymentConfirmation, CheckoutError>;
}
