use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::alerts::matcher::AlertMatcher;
use super::model::{Alert, AlertId};

pub struct RefreshOutput {
    /// Every alert in the snapshot, with `done` and `matched` filled in
    pub alerts: Vec<Alert>,
    /// Matched alerts not reported by an earlier refresh
    pub new_matches: Vec<Alert>,
    pub logs: Vec<String>,
}

impl RefreshOutput {
    pub fn shown(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|alert| alert.matched)
    }
}

/// Runs one refresh cycle per feed snapshot and remembers what has already
/// been announced.
pub struct Coordinator {
    notified: HashSet<AlertId>,
    marked_done: HashSet<AlertId>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            notified: HashSet::new(),
            marked_done: HashSet::new(),
        }
    }

    /// Mark an alert as completed by the user. It stays done for as long as it
    /// appears in the feed.
    pub fn mark_done(&mut self, id: impl Into<AlertId>) {
        self.marked_done.insert(id.into());
    }

    pub fn is_marked_done(&self, id: &str) -> bool {
        self.marked_done.contains(id)
    }

    pub fn refresh(
        &mut self,
        mut alerts: Vec<Alert>,
        matcher: &AlertMatcher,
        now: DateTime<Utc>,
    ) -> RefreshOutput {
        let mut logs = Vec::new();

        // 1. Completion state
        let mut expired = 0;
        for alert in &mut alerts {
            if self.marked_done.contains(&alert.id) {
                alert.done = true;
            } else if alert.is_expired(now) {
                alert.done = true;
                expired += 1;
            }
        }

        // 2. Match
        let matched = matcher.apply(&mut alerts);

        // 3. Announce new matches
        let new_matches: Vec<Alert> = alerts
            .iter()
            .filter(|alert| alert.matched && !self.notified.contains(&alert.id))
            .cloned()
            .collect();
        for alert in &new_matches {
            self.notified.insert(alert.id.clone());
        }

        // 4. Forget alerts that left the feed
        let present: HashSet<&str> = alerts.iter().map(|alert| alert.id.as_str()).collect();
        let before = self.notified.len();
        self.notified.retain(|id| present.contains(id.as_str()));
        self.marked_done.retain(|id| present.contains(id.as_str()));
        let dropped = before - self.notified.len();

        logs.push(format!(
            "Refreshed {} alerts: {} shown, {} new",
            alerts.len(),
            matched,
            new_matches.len()
        ));
        if expired > 0 {
            logs.push(format!("{} alerts expired", expired));
        }
        if dropped > 0 {
            logs.push(format!("{} alerts left the feed", dropped));
        }

        RefreshOutput {
            alerts,
            new_matches,
            logs,
        }
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}
