// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Each scenario runs the async service on a fresh in-memory network
//! through `tokio_test::block_on`.

mod cut_revert;
mod one_cable;
