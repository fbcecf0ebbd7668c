//! Integration test suite modules

mod catalog;
mod checkout;
mod session;
