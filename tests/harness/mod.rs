// SPDX-FileCopyrightText: 2026 Formgate Contributors
// SPDX-License-Identifier: Apache-2.0

//! Test harness for admission-gate attack simulation.
//!
//! Utilities for replaying abusive traffic shapes (floods, honeypot spam,
//! scripted clients) against the limiter and detector to validate the gate's
//! behavior under load.

pub mod attacks;
pub mod generators;
pub mod metrics;
