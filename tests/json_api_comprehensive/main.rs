//! JSON Access API Comprehensive Test Suite
//!
//! Tests for the read-only JSON access contract.
//!
//! ## Test Tier Structure
//!
//! - **Tier 1: Semantic Invariants** (must never break)
//!   Query determinism, iterator exhaustion, untouched outputs, bounds.
//!
//! - **Tier 2: Property-Based** (catch edge cases)
//!   Random documents against a fixed set of paths.
//!
//! - **Tier 3: Shared API** (function table and registry)
//!   Consumers resolving the V1 table by name.
//!
//! - **Tier 4: Configuration** (keyspaces opened from `jsonkv.toml`)
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test json_api_comprehensive
//!
//! # Only the invariants
//! cargo test --test json_api_comprehensive invariant
//! ```

// Test utilities
mod test_utils;

// Tier 1: Semantic Invariants
mod document_scenario;
mod indexed_access_invariants;
mod iterator_invariants;
mod query_invariants;

// Tier 2: Property-Based
mod property_tests;

// Tier 3: Shared API
mod shared_api_tests;

// Tier 4: Configuration
mod config_tests;
