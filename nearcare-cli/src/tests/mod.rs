//! Shared test harness modules for the NearCare CLI.

use super::*;

mod helpers;
mod unit;
