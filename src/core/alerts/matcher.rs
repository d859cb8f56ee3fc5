// The alert matching rule.
//
// Checks run in a fixed order and the first failing one decides the
// rejection: done, credits tier (credits-only alerts), reward category
// toggles, then the name filter.

use super::model::{MatchConfig, Rejection};
use crate::core::filters::FilterSet;
use crate::core::model::Alert;

/// Predicate over alerts for one configuration and filter set.
pub struct AlertMatcher<'a> {
    config: MatchConfig,
    filters: &'a FilterSet,
}

impl<'a> AlertMatcher<'a> {
    pub fn new(config: MatchConfig, filters: &'a FilterSet) -> Self {
        Self { config, filters }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Returns the reason the alert is hidden, or None if it should be shown.
    pub fn check(&self, alert: &Alert) -> Option<Rejection> {
        if alert.is_done() {
            return Some(Rejection::Done);
        }

        if !alert.has_loot() && !self.config.credits.accepts(alert.credits) {
            return Some(Rejection::Credits);
        }

        if let Some(category) = &alert.category {
            let kind = category.kind;
            if !self.config.blueprints && kind.is_blueprint() {
                return Some(Rejection::Blueprint);
            }
            if !self.config.mods && kind.is_mod() {
                return Some(Rejection::Mod);
            }
            if !self.config.auras && kind.is_aura() {
                return Some(Rejection::Aura);
            }
            if !self.config.resources && kind.is_resource() {
                return Some(Rejection::Resource);
            }
        }

        if self.config.filter {
            if let Some(name) = alert.reward_name() {
                if self.filters.contains(name) {
                    return Some(Rejection::Filtered);
                }
            }
        }

        None
    }

    pub fn matches(&self, alert: &Alert) -> bool {
        self.check(alert).is_none()
    }

    /// Write the match result onto each alert. Returns how many matched.
    pub fn apply(&self, alerts: &mut [Alert]) -> usize {
        let mut matched = 0;
        for alert in alerts.iter_mut() {
            alert.matched = self.matches(alert);
            if alert.matched {
                matched += 1;
            }
        }
        matched
    }
}
