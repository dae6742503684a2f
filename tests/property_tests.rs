// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Entry Point
//!
//! This test suite uses proptest to verify properties of the span
//! equipment model that must hold for every cut order and cable count.

mod fixtures;
mod property;
