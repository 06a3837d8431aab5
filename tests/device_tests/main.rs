//! Simulated device tests

mod crypto_tests;
mod flash_tests;
mod hex_tests;
