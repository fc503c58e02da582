//! Listening duration to word budget mapping.
//!
//! A listener picks how long the podcast should be. The summary length is
//! derived from an assumed speaking rate, with one extra minute added to the
//! selection so the result errs on the long side.

use crate::config::BudgetSettings;
use crate::error::{EduAidError, Result};

/// Assumed speaking rate in words per minute.
pub const WORDS_PER_MINUTE: u32 = 150;

/// Longest supported listening duration in minutes.
pub const MAX_MINUTES: u32 = 10;

/// Shortest supported listening duration in minutes.
pub const MIN_MINUTES: u32 = 1;

/// Precomputed word budgets for every supported duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetTable {
    words_per_minute: u32,
    /// `budgets[m - 1]` is the budget for `m` minutes.
    budgets: Vec<u32>,
}

impl BudgetTable {
    /// Build the table for `1..=max_minutes`.
    pub fn new(words_per_minute: u32, max_minutes: u32) -> Self {
        let budgets = (MIN_MINUTES..=max_minutes.max(MIN_MINUTES))
            .map(|minutes| minutes.saturating_mul(words_per_minute).saturating_add(1))
            .collect();
        Self {
            words_per_minute,
            budgets,
        }
    }

    /// Build the table from configuration.
    pub fn from_settings(settings: &BudgetSettings) -> Self {
        Self::new(settings.words_per_minute, settings.max_minutes)
    }

    /// Longest duration in the table.
    pub fn max_minutes(&self) -> u32 {
        self.budgets.len() as u32
    }

    /// Speaking rate the table was built with.
    pub fn words_per_minute(&self) -> u32 {
        self.words_per_minute
    }

    /// Budget for exactly `minutes`, if supported.
    pub fn lookup(&self, minutes: u32) -> Option<u32> {
        minutes
            .checked_sub(MIN_MINUTES)
            .and_then(|idx| self.budgets.get(idx as usize))
            .copied()
    }

    /// Duration actually used for a selection: one minute longer, clamped to
    /// the table maximum.
    pub fn adjusted_minutes(&self, selected: u32) -> u32 {
        selected.saturating_add(1).min(self.max_minutes())
    }

    /// Word budget for a user-selected duration.
    pub fn word_budget(&self, selected: u32) -> Result<u32> {
        self.validate(selected)?;
        let adjusted = self.adjusted_minutes(selected);
        self.lookup(adjusted).ok_or_else(|| {
            EduAidError::InvalidInput(format!("No word budget for {} minutes", adjusted))
        })
    }

    /// Check that a selection is within the supported range.
    pub fn validate(&self, selected: u32) -> Result<()> {
        if (MIN_MINUTES..=self.max_minutes()).contains(&selected) {
            Ok(())
        } else {
            Err(EduAidError::InvalidInput(format!(
                "Duration must be between {} and {} minutes, got {}",
                MIN_MINUTES,
                self.max_minutes(),
                selected
            )))
        }
    }
}

impl Default for BudgetTable {
    fn default() -> Self {
        Self::new(WORDS_PER_MINUTE, MAX_MINUTES)
    }
}
