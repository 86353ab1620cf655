use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::cart::model::RecognizedProduct;
use crate::domain::checkout::errors::CheckoutError;
use crate::domain::checkout::model::{PaymentConfirmation, Receipt};
use crate::domain::checkout::use_cases::checkout::{CheckoutParams, CheckoutUseCase};
use crate::domain::logger::Logger;

pub struct CheckoutUseCaseImpl {
    pub logger: Arc<dyn Logger>,
}

impl CheckoutUseCaseImpl {
    fn validate_lines(params: CheckoutParams) -> Result<Vec<RecognizedProduct>, CheckoutError> {
        params
            .lines
            .into_iter()
            .enumerate()
            .map(|(index, line)| {
                RecognizedProduct::new(&line.name, line.unit_price, line.quantity, line.confidence)
                    .map_err(|reason| CheckoutError::InvalidLine { index, reason })
            })
            .collect()
    }
}

#[async_trait]
impl CheckoutUseCase for CheckoutUseCaseImpl {
    fn build_receipt(&self, params: CheckoutParams) -> Result<Receipt, CheckoutError> {
        let products = Self::validate_lines(params)?;
        let receipt = Receipt::from_products(&products).inspect_err(|err| {
            if let CheckoutError::InvalidLine { index, .. } = err {
                self.logger
                    .warn(&format!("Receipt rejected: line #{index} overflows the total"));
            }
        })?;

        self.logger.debug(&format!(
            "Receipt built: {} lines, subtotal {}, tax {}, total {}",
            receipt.lines().len(),
            receipt.subtotal(),
            receipt.tax(),
            receipt.total()
        ));

        Ok(receipt)
    }

    async fn pay(&self, params: CheckoutParams) -> Result<PaymentConfirmation, CheckoutError> {
        let receipt = self.build_receipt(params)?;

        if receipt.is_empty() {
            self.logger.warn("Payment rejected: cart is empty");
            return Err(CheckoutError::EmptyCart);
        }

        let confirmation = PaymentConfirmation::simulate(receipt, Utc::now());

        self.logger.info(&format!(
            "Simulated payment {} for {}",
            confirmation.transaction_id, confirmation.amount
        ));

        Ok(confirmation)
    }
}
