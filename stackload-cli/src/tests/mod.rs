//! Shared test harness modules for the Stackload CLI.
#![expect(
    clippy::panic,
    clippy::float_cmp,
    reason = "Tests assert panic branches and compare literal costs exactly"
)]

use super::*;

mod helpers;
