//! Unit tests for the service balance ledger.

mod domain_tests;
mod service_tests;
