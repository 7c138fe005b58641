//! Append-only, in-memory session history with label counters.
//!
//! Counters are updated in the same `&mut self` call that appends the
//! record, so they always equal the number of matching entries.

use serde::Serialize;

use crate::classifier::Label;
use super::record::ClassificationRecord;

#[derive(Debug, Default, Clone)]
pub struct SessionHistory {
    records: Vec<ClassificationRecord>,
    spam_count: u64,
    ham_count: u64,
}

/// Counter snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total: u64,
    pub spam: u64,
    pub ham: u64,
}

impl SessionStats {
    /// Share of spam among all records; `0.0` for an empty session.
    pub fn spam_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.spam as f64 / self.total as f64
        }
    }
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: ClassificationRecord) {
        match record.label() {
            Label::Spam => self.spam_count += 1,
            Label::NotSpam => self.ham_count += 1,
        }
        self.records.push(record);
    }

    /// Up to `limit` most recent records, newest first.
    pub fn recent(&self, limit: usize) -> Vec<ClassificationRecord> {
        self.records.iter().rev().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn spam_count(&self) -> u64 {
        self.spam_count
    }

    pub fn ham_count(&self) -> u64 {
        self.ham_count
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            total: self.records.len() as u64,
            spam: self.spam_count,
            ham: self.ham_count,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.spam_count = 0;
        self.ham_count = 0;
    }
}
