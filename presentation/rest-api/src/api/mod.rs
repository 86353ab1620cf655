pub mod cart;
pub mod checkout;
pub mod error;
pub mod health;
pub mod security;
pub mod tags;
