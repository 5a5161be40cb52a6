//! Monthly call-budget counter for the scraping provider.
//!
//! The provider plan allows a fixed number of calls per calendar month, so
//! every scrape call must pass through [`MonthlyBudget::check_and_increment`]
//! first. Usage lives in a local JSON file mapping `"YYYY-MM"` keys to call
//! counts. The file is rewritten through a same-directory temp file plus
//! rename, and keys older than the retention window are pruned on write.
//! The counter assumes a single pipeline process; there is no file lock.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("failed to read budget file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write budget file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode budget file: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result of a budget check: whether the call may proceed, and the number of
/// calls recorded for the current month after the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetDecision {
    pub allowed: bool,
    pub count: u32,
}

/// File-backed counter capping external scrape calls per calendar month.
#[derive(Debug, Clone)]
pub struct MonthlyBudget {
    path: PathBuf,
    cap: u32,
    retain_months: u32,
}

impl MonthlyBudget {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, cap: u32, retain_months: u32) -> Self {
        Self {
            path: path.into(),
            cap,
            retain_months,
        }
    }

    #[must_use]
    pub fn cap(&self) -> u32 {
        self.cap
    }

    /// Check the current month's usage against the cap and, if there is room,
    /// record one more call.
    ///
    /// At or over the cap, returns `allowed: false` with the recorded count
    /// and performs no write.
    ///
    /// # Errors
    ///
    /// Returns [`BudgetError`] if the usage file cannot be read (other than
    /// not existing) or the incremented ledger cannot be persisted.
    pub fn check_and_increment(&self) -> Result<BudgetDecision, BudgetError> {
        self.check_and_increment_at(Utc::now())
    }

    /// [`Self::check_and_increment`] with an explicit clock, for tests.
    ///
    /// # Errors
    ///
    /// See [`Self::check_and_increment`].
    pub fn check_and_increment_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<BudgetDecision, BudgetError> {
        let mut usage = self.load()?;
        let key = month_key(now);
        let current = usage.get(&key).copied().unwrap_or(0);

        if current >= self.cap {
            return Ok(BudgetDecision {
                allowed: false,
                count: current,
            });
        }

        let next = current + 1;
        usage.insert(key, next);
        prune_old_months(&mut usage, &cutoff_key(now, self.retain_months));
        self.persist(&usage)?;

        Ok(BudgetDecision {
            allowed: true,
            count: next,
        })
    }

    /// Calls recorded for the current month, without incrementing.
    ///
    /// # Errors
    ///
    /// Returns [`BudgetError::Read`] if the usage file exists but cannot be read.
    pub fn current_count(&self) -> Result<u32, BudgetError> {
        self.count_at(Utc::now())
    }

    /// [`Self::current_count`] with an explicit clock, for tests.
    ///
    /// # Errors
    ///
    /// See [`Self::current_count`].
    pub fn count_at(&self, now: DateTime<Utc>) -> Result<u32, BudgetError> {
        let usage = self.load()?;
        Ok(usage.get(&month_key(now)).copied().unwrap_or(0))
    }

    fn load(&self) -> Result<BTreeMap<String, u32>, BudgetError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(BudgetError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        // A malformed ledger reads as empty rather than failing the run.
        Ok(serde_json::from_str(&raw).unwrap_or_default())
    }

    fn persist(&self, usage: &BTreeMap<String, u32>) -> Result<(), BudgetError> {
        let data = serde_json::to_vec_pretty(usage)?;

        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| BudgetError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }

        // Temp file + rename so a reader never observes a half-written ledger.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &data).map_err(|e| BudgetError::Write {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| BudgetError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}

fn month_key(date: DateTime<Utc>) -> String {
    date.format("%Y-%m").to_string()
}

/// Oldest `"YYYY-MM"` key to keep when retaining `retain` months, counting
/// the current month as the first.
fn cutoff_key(now: DateTime<Utc>, retain: u32) -> String {
    let month = i32::try_from(now.month()).unwrap_or(1);
    let back = i32::try_from(retain.saturating_sub(1)).unwrap_or(0);
    let index = now.year() * 12 + (month - 1) - back;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) + 1;
    format!("{year:04}-{month:02}")
}

fn prune_old_months(usage: &mut BTreeMap<String, u32>, cutoff: &str) {
    // Zero-padded "YYYY-MM" keys order lexicographically.
    usage.retain(|key, _| key.as_str() >= cutoff);
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn budget_in(dir: &tempfile::TempDir, cap: u32) -> MonthlyBudget {
        MonthlyBudget::new(dir.path().join("usage.json"), cap, 12)
    }

    fn read_ledger(budget: &MonthlyBudget) -> BTreeMap<String, u32> {
        let raw = fs::read_to_string(budget.path.clone()).expect("ledger should exist");
        serde_json::from_str(&raw).expect("ledger should be valid JSON")
    }

    #[test]
    fn month_key_is_zero_padded() {
        assert_eq!(month_key(at(2026, 3, 1)), "2026-03");
    }

    #[test]
    fn cutoff_key_within_year() {
        assert_eq!(cutoff_key(at(2026, 8, 1), 3), "2026-06");
    }

    #[test]
    fn cutoff_key_crosses_year_boundary() {
        assert_eq!(cutoff_key(at(2026, 1, 15), 3), "2025-11");
    }

    #[test]
    fn first_call_creates_ledger_with_count_one() {
        let dir = tempfile::tempdir().unwrap();
        let budget = budget_in(&dir, 20);

        let decision = budget.check_and_increment_at(at(2026, 8, 8)).unwrap();

        assert_eq!(
            decision,
            BudgetDecision {
                allowed: true,
                count: 1
            }
        );
        assert_eq!(read_ledger(&budget).get("2026-08"), Some(&1));
    }

    #[test]
    fn cap_is_enforced_on_the_twenty_first_call() {
        let dir = tempfile::tempdir().unwrap();
        let budget = budget_in(&dir, 20);
        let now = at(2026, 8, 8);

        for expected in 1..=20 {
            let decision = budget.check_and_increment_at(now).unwrap();
            assert!(decision.allowed, "call {expected} should be allowed");
            assert_eq!(decision.count, expected);
        }

        let denied = budget.check_and_increment_at(now).unwrap();
        assert_eq!(
            denied,
            BudgetDecision {
                allowed: false,
                count: 20
            }
        );
        // The 21st call must not bump the persisted count.
        assert_eq!(read_ledger(&budget).get("2026-08"), Some(&20));
    }

    #[test]
    fn exhausted_budget_performs_no_write() {
        let dir = tempfile::tempdir().unwrap();
        let budget = budget_in(&dir, 0);

        let decision = budget.check_and_increment_at(at(2026, 8, 8)).unwrap();

        assert!(!decision.allowed);
        assert_eq!(decision.count, 0);
        assert!(!budget.path.exists(), "denied check must not create the file");
    }

    #[test]
    fn malformed_ledger_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let budget = budget_in(&dir, 20);
        fs::write(&budget.path, "{not json").unwrap();

        let decision = budget.check_and_increment_at(at(2026, 8, 8)).unwrap();

        assert!(decision.allowed);
        assert_eq!(decision.count, 1);
    }

    #[test]
    fn month_rollover_starts_a_fresh_count() {
        let dir = tempfile::tempdir().unwrap();
        let budget = budget_in(&dir, 20);

        for _ in 0..20 {
            budget.check_and_increment_at(at(2025, 12, 20)).unwrap();
        }
        assert!(!budget.check_and_increment_at(at(2025, 12, 31)).unwrap().allowed);

        let decision = budget.check_and_increment_at(at(2026, 1, 2)).unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.count, 1);
    }

    #[test]
    fn old_month_keys_are_pruned_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let budget = MonthlyBudget::new(dir.path().join("usage.json"), 20, 2);
        fs::write(
            &budget.path,
            r#"{"2025-01": 5, "2026-07": 3, "2026-08": 1}"#,
        )
        .unwrap();

        budget.check_and_increment_at(at(2026, 8, 8)).unwrap();

        let ledger = read_ledger(&budget);
        assert!(!ledger.contains_key("2025-01"), "stale key should be pruned");
        assert_eq!(ledger.get("2026-07"), Some(&3));
        assert_eq!(ledger.get("2026-08"), Some(&2));
    }

    #[test]
    fn count_at_reads_without_incrementing() {
        let dir = tempfile::tempdir().unwrap();
        let budget = budget_in(&dir, 20);
        let now = at(2026, 8, 8);

        assert_eq!(budget.count_at(now).unwrap(), 0);
        budget.check_and_increment_at(now).unwrap();
        assert_eq!(budget.count_at(now).unwrap(), 1);
        assert_eq!(budget.count_at(now).unwrap(), 1);
    }
}
