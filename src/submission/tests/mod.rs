//! Unit tests for submission publishing.

mod domain_tests;
