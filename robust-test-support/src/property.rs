//! Environment overrides for property-test case counts.
//!
//! Suites read their case budget through [`PropertyProfile::load`] so CI can
//! raise or lower every suite at once.

use std::env;

/// Environment variable overriding the number of proptest cases.
pub const CASES_ENV_KEY: &str = "ROBUST_PBT_CASES";

/// Resolved property-test budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyProfile {
    cases: u32,
}

impl PropertyProfile {
    /// Reads [`CASES_ENV_KEY`], falling back to `default_cases` when the
    /// variable is unset or not a positive integer.
    ///
    /// # Examples
    /// ```
    /// use robust_test_support::property::PropertyProfile;
    ///
    /// assert!(PropertyProfile::load(32).cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32) -> Self {
        let cases = match env::var(CASES_ENV_KEY) {
            Ok(raw) => parse_cases(&raw).unwrap_or_else(|reason| {
                tracing::warn!(
                    env = CASES_ENV_KEY,
                    raw = %raw,
                    reason,
                    "invalid property-test override; using default",
                );
                default_cases
            }),
            Err(_) => default_cases,
        };
        Self { cases }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }
}

fn parse_cases(raw: &str) -> Result<u32, &'static str> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be > 0"),
        Ok(cases) => Ok(cases),
        Err(_) => Err("not an unsigned integer"),
    }
}
