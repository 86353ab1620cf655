#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("checkout.invalid_line")]
    InvalidLine {
        index: usize,
        reason: crate::domain::cart::errors::EntryRejection,
    },
    #[error("checkout.empty_cart")]
    EmptyCart,
}
