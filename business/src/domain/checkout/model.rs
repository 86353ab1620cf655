use chrono::{DateTime, Utc};

use crate::domain::cart::errors::EntryRejection;
use crate::domain::cart::model::RecognizedProduct;
use crate::domain::checkout::errors::CheckoutError;

/// Goods and services tax, in percent.
pub const GST_PERCENT: u64 = 18;

pub const SIMULATED_PAYMENT_METHOD: &str = "Digital Payment";

#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub line_total: u64,
}

/// Priced lines with GST. Only built through [`Receipt::from_products`], so
/// `subtotal` is the sum of the line totals and `total` is `subtotal + tax`.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    lines: Vec<ReceiptLine>,
    subtotal: u64,
    tax: u64,
    total: u64,
}

impl Receipt {
    /// Fails with `InvalidLine { reason: InvalidPrice }` on the first line whose
    /// total would overflow the subtotal or the GST-inclusive total.
    pub fn from_products(products: &[RecognizedProduct]) -> Result<Self, CheckoutError> {
        let mut lines = Vec::with_capacity(products.len());
        let mut subtotal: u64 = 0;

        for (index, p) in products.iter().enumerate() {
            let line_total = p.line_total();
            subtotal = subtotal
                .checked_add(line_total)
                .filter(|next| next.checked_add(gst_on(*next)).is_some())
                .ok_or(CheckoutError::InvalidLine {
                    index,
                    reason: EntryRejection::InvalidPrice,
                })?;
            lines.push(ReceiptLine {
                name: p.name().to_string(),
                unit_price: p.unit_price(),
                quantity: p.quantity(),
                line_total,
            });
        }

        let tax = gst_on(subtotal);

        Ok(Self {
            lines,
            subtotal,
            tax,
            total: subtotal + tax,
        })
    }

    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    pub fn subtotal(&self) -> u64 {
        self.subtotal
    }

    pub fn tax(&self) -> u64 {
        self.tax
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// GST on `amount`, rounded to the nearest rupee with halves rounding up.
pub fn gst_on(amount: u64) -> u64 {
    let scaled = u128::from(amount) * u128::from(GST_PERCENT);
    let rounded = (scaled + 50) / 100;
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

/// Outcome of the simulated payment step. Nothing is charged.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentConfirmation {
    pub transaction_id: String,
    pub amount: u64,
    pub method: String,
    pub paid_at: DateTime<Utc>,
    pub receipt: Receipt,
}

impl PaymentConfirmation {
    pub fn simulate(receipt: Receipt, paid_at: DateTime<Utc>) -> Self {
        Self {
            transaction_id: format!("TXN{}", paid_at.timestamp_millis()),
            amount: receipt.total(),
            method: SIMULATED_PAYMENT_METHOD.to_string(),
            paid_at,
            receipt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(name: &str, price: u64, quantity: u32) -> RecognizedProduct {
        RecognizedProduct::new(name, price, quantity, 0.9).unwrap()
    }

    #[test]
    fn should_compute_subtotal_tax_and_total() {
        let receipt = Receipt::from_products(&[
            product("Tropicana Orange Juice", 120, 1),
            product("Maggi Noodles", 25, 2),
            product("Lay's Potato Chips", 30, 1),
        ])
        .unwrap();

        assert_eq!(receipt.subtotal(), 200);
        assert_eq!(receipt.tax(), 36);
        assert_eq!(receipt.total(), 236);
        assert_eq!(receipt.lines()[1].line_total, 50);
    }

    #[test]
    fn should_reject_first_line_that_overflows_totals() {
        let half = u64::MAX / 2;

        let result = Receipt::from_products(&[
            product("Gold Bar", half, 1),
            product("Silver Bar", half, 1),
            product("Milk", 10, 1),
        ]);

        assert!(matches!(
            result,
            Err(CheckoutError::InvalidLine {
                index: 1,
                reason: EntryRejection::InvalidPrice
            })
        ));
    }

    #[test]
    fn should_reject_line_when_tax_overflows_total() {
        // Subtotal fits in u64 but subtotal + 18% does not.
        let result = Receipt::from_products(&[product("Gold Bar", u64::MAX - 1_000, 1)]);

        assert!(matches!(
            result,
            Err(CheckoutError::InvalidLine {
                index: 0,
                reason: EntryRejection::InvalidPrice
            })
        ));
    }

    #[test]
    fn should_round_gst_to_nearest_rupee() {
        assert_eq!(gst_on(0), 0);
        assert_eq!(gst_on(25), 5); // 4.5
        assert_eq!(gst_on(30), 5); // 5.4
        assert_eq!(gst_on(220), 40); // 39.6
    }

    #[test]
    fn should_build_transaction_id_from_payment_time() {
        let paid_at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let receipt = Receipt::from_products(&[product("Milk", 60, 1)]).unwrap();

        let confirmation = PaymentConfirmation::simulate(receipt, paid_at);

        assert_eq!(confirmation.transaction_id, "TXN1700000000123");
        assert_eq!(confirmation.amount, 71);
        assert_eq!(confirmation.method, "Digital Payment");
    }
}
