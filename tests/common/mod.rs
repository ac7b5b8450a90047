//! Common test utilities for gridspline.
//!
//! This module provides shared assertions and fixture models for the
//! integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
