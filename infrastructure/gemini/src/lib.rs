pub mod cart_recognizer;
pub mod client;
