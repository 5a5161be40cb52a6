//! Typed per-account outcomes collected by the crawl stages and rendered
//! into an end-of-run summary.

use std::fmt::Write as _;

/// What happened to one account during a stage pass.
#[derive(Debug)]
pub(crate) enum AccountOutcome {
    /// Scrape succeeded; `posts` posts were upserted.
    Scraped { handle: String, posts: usize },
    /// The monthly call budget ran out at this account; the rest of the
    /// snapshot was abandoned.
    SkippedBudget { handle: String },
    /// No stored posts; only the scraped timestamp was refreshed.
    NoPosts { handle: String },
    /// A summary was generated and stored.
    Summarized { handle: String },
    /// Provider or persistence failure; the account was skipped.
    Failed { handle: String, reason: String },
}

/// Ordered outcomes of one stage pass.
#[derive(Debug, Default)]
pub(crate) struct StageSummary {
    outcomes: Vec<AccountOutcome>,
}

impl StageSummary {
    pub(crate) fn push(&mut self, outcome: AccountOutcome) {
        self.outcomes.push(outcome);
    }

    /// One-paragraph report: aggregate counts on the first line, then one
    /// line per failed account.
    pub(crate) fn render(&self, stage: &str) -> String {
        let mut scraped_accounts = 0usize;
        let mut scraped_posts = 0usize;
        let mut summarized = 0usize;
        let mut no_posts = 0usize;
        let mut budget_skipped = 0usize;
        let mut failures: Vec<(&str, &str)> = Vec::new();

        for outcome in &self.outcomes {
            match outcome {
                AccountOutcome::Scraped { posts, .. } => {
                    scraped_accounts += 1;
                    scraped_posts += posts;
                }
                AccountOutcome::SkippedBudget { .. } => budget_skipped += 1,
                AccountOutcome::NoPosts { .. } => no_posts += 1,
                AccountOutcome::Summarized { .. } => summarized += 1,
                AccountOutcome::Failed { handle, reason } => failures.push((handle, reason)),
            }
        }

        let mut parts: Vec<String> = Vec::new();
        if scraped_accounts > 0 {
            parts.push(format!("{scraped_accounts} scraped ({scraped_posts} posts)"));
        }
        if summarized > 0 {
            parts.push(format!("{summarized} summarized"));
        }
        if no_posts > 0 {
            parts.push(format!("{no_posts} without posts"));
        }
        if budget_skipped > 0 {
            parts.push(format!("{budget_skipped} stopped by budget"));
        }
        if !failures.is_empty() {
            parts.push(format!("{} failed", failures.len()));
        }

        let detail = if parts.is_empty() {
            "nothing to do".to_string()
        } else {
            parts.join(", ")
        };

        let mut out = format!("{stage}: {} account(s): {detail}", self.outcomes.len());
        for (handle, reason) in failures {
            let _ = write!(out, "\n  {handle}: {reason}");
        }
        out
    }
}
