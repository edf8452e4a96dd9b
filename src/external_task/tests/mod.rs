//! Unit tests for external task dispatch and processing.
