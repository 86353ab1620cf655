use chrono::{DateTime, Utc};
use poem_openapi::Object;

use business::domain::checkout::model::{GST_PERCENT, PaymentConfirmation, Receipt, ReceiptLine};
use business::domain::checkout::use_cases::checkout::{CheckoutLine, CheckoutParams};

/// A reviewed cart line as returned by `/cart/analyze`.
#[derive(Debug, Clone, Object)]
pub struct CheckoutLineRequest {
    /// Product name
    pub name: String,
    /// Unit price in whole rupees
    pub unit_price: u64,
    /// Number of units (default: 1)
    #[oai(skip_serializing_if_is_none)]
    pub quantity: Option<u32>,
    /// Model confidence between 0 and 1 (default: 1)
    #[oai(skip_serializing_if_is_none)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Object)]
pub struct CheckoutRequest {
    /// Lines to bill
    pub products: Vec<CheckoutLineRequest>,
}

impl From<CheckoutRequest> for CheckoutParams {
    fn from(request: CheckoutRequest) -> Self {
        Self {
            lines: request
                .products
                .into_iter()
                .map(|line| CheckoutLine {
                    name: line.name,
                    unit_price: line.unit_price,
                    quantity: line.quantity.unwrap_or(1),
                    confidence: line.confidence.unwrap_or(1.0),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ReceiptLineResponse {
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub line_total: u64,
}

impl From<&ReceiptLine> for ReceiptLineResponse {
    fn from(line: &ReceiptLine) -> Self {
        Self {
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            line_total: line.line_total,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ReceiptResponse {
    pub lines: Vec<ReceiptLineResponse>,
    /// Sum of line totals before tax
    pub subtotal: u64,
    /// GST rate in percent
    pub tax_rate: u64,
    /// GST amount, rounded to the nearest rupee
    pub tax: u64,
    /// Amount to pay
    pub total: u64,
}

impl From<Receipt> for ReceiptResponse {
    fn from(receipt: Receipt) -> Self {
        Self {
            lines: receipt.lines().iter().map(|l| l.into()).collect(),
            subtotal: receipt.subtotal(),
            tax_rate: GST_PERCENT,
            tax: receipt.tax(),
            total: receipt.total(),
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct PaymentConfirmationResponse {
    /// Simulated transaction identifier
    pub transaction_id: String,
    /// Amount charged, GST included
    pub amount: u64,
    /// Payment method shown to the user
    pub method: String,
    /// Time of the simulated payment
    pub paid_at: DateTime<Utc>,
    pub receipt: ReceiptResponse,
}

impl From<PaymentConfirmation> for PaymentConfirmationResponse {
    fn from(confirmation: PaymentConfirmation) -> Self {
        Self {
            transaction_id: confirmation.transaction_id,
            amount: confirmation.amount,
            method: confirmation.method,
            paid_at: confirmation.paid_at,
            receipt: confirmation.receipt.into(),
        }
    }
}
