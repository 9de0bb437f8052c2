pub mod cart_service;
pub mod checkout;
