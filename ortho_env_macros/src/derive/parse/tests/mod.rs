//! Unit tests for derive input parsing.
