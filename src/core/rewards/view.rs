use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::zoom::Zoom;
use crate::core::filters::FilterSet;
use crate::core::model::RewardId;

/// Zoom changes are saved once the slider has been still this long.
pub const ZOOM_SAVE_DELAY: Duration = Duration::from_millis(500);

pub const WIKI_BASE_URL: &str = "https://warframe.fandom.com/wiki/";

/// Which rewards the view lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    #[default]
    All,
    /// Only rewards not in the filter set
    Notify,
    /// Only rewards in the filter set
    Ignore,
}

impl DisplayMode {
    pub fn includes(self, ignored: bool) -> bool {
        match self {
            Self::All => true,
            Self::Notify => !ignored,
            Self::Ignore => ignored,
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "notify" => Ok(Self::Notify),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!("unknown display mode '{other}' (all, notify, ignore)")),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "All",
            Self::Notify => "Notify",
            Self::Ignore => "Ignore",
        })
    }
}

/// Keep the rewards the display mode wants, in input order.
pub fn partition<'r>(
    rewards: impl IntoIterator<Item = &'r RewardId>,
    mode: DisplayMode,
    filters: &FilterSet,
) -> Vec<&'r RewardId> {
    rewards
        .into_iter()
        .filter(|reward| mode.includes(filters.contains(reward.name())))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardEntry<'a> {
    pub reward: &'a RewardId,
    /// Drawn dimmed when ignored
    pub ignored: bool,
}

/// State of one reward panel.
pub struct RewardView {
    name: String,
    rewards: Vec<RewardId>,
    mode: DisplayMode,
    zoom: Zoom,
    icon_width: u32,
    icon_height: u32,
    zoom_changed_at: Option<Instant>,
}

impl RewardView {
    pub fn new(
        name: impl Into<String>,
        rewards: impl IntoIterator<Item = RewardId>,
        icon_width: u32,
        icon_height: u32,
        zoom_start: Option<Zoom>,
    ) -> Self {
        let rewards: BTreeSet<RewardId> = rewards.into_iter().collect();
        Self {
            name: name.into(),
            rewards: rewards.into_iter().collect(),
            mode: DisplayMode::All,
            zoom: zoom_start.unwrap_or_default(),
            icon_width,
            icon_height,
            zoom_changed_at: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    pub fn zoom(&self) -> Zoom {
        self.zoom
    }

    /// Select a zoom level. Restarts the save delay when the level changes.
    pub fn set_zoom(&mut self, zoom: Zoom, now: Instant) -> bool {
        if zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        self.zoom_changed_at = Some(now);
        true
    }

    pub fn scroll_zoom(&mut self, units_to_scroll: i32, scroll_amount: i32, now: Instant) -> bool {
        self.set_zoom(self.zoom.scrolled(units_to_scroll, scroll_amount), now)
    }

    /// Returns the zoom to persist once the save delay has passed since the
    /// last change. Yields each change at most once.
    ///
    /// Meant for interactive front ends that poll while the user drags or
    /// scrolls. One-shot callers that set a single zoom can save `zoom()`
    /// right away.
    pub fn take_pending_zoom(&mut self, now: Instant) -> Option<Zoom> {
        let changed_at = self.zoom_changed_at?;
        if now.duration_since(changed_at) < ZOOM_SAVE_DELAY {
            return None;
        }
        self.zoom_changed_at = None;
        Some(self.zoom)
    }

    /// Scaled icon size for the current zoom; None means the fallback icon.
    pub fn icon_size(&self) -> Option<(u32, u32)> {
        self.zoom.scale(self.icon_width, self.icon_height)
    }

    pub fn entries<'a>(&'a self, filters: &FilterSet) -> Vec<RewardEntry<'a>> {
        partition(&self.rewards, self.mode, filters)
            .into_iter()
            .map(|reward| RewardEntry {
                reward,
                ignored: filters.contains(reward.name()),
            })
            .collect()
    }

    pub fn total(&self) -> usize {
        self.rewards.len()
    }

    pub fn count_label(&self, filters: &FilterSet) -> String {
        format!("Showing {} of {}", self.entries(filters).len(), self.total())
    }

    /// State of the "Notify" context action for a reward.
    pub fn is_notify(reward: &RewardId, filters: &FilterSet) -> bool {
        !filters.contains(reward.name())
    }

    /// The "Notify" context action. Returns the new notify state.
    pub fn toggle_notify(reward: &RewardId, filters: &mut FilterSet) -> bool {
        let ignored = filters.toggle(reward.name());
        log::debug!(
            "{} is now {}",
            reward.name(),
            if ignored { "ignored" } else { "notified" }
        );
        !ignored
    }

    /// The "Show on wiki" context action.
    pub fn wiki_url(reward: &RewardId) -> String {
        format!("{}{}", WIKI_BASE_URL, reward.name().trim().replace(' ', "_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewards() -> Vec<RewardId> {
        ["Serration", "Alloy Plate", "Orokin Reactor", "Alloy Plate"]
            .into_iter()
            .map(RewardId::new)
            .collect()
    }

    fn filters() -> FilterSet {
        ["Alloy Plate"].into_iter().collect()
    }

    #[test]
    fn test_partition_modes() {
        let rewards = rewards();
        let filters = filters();

        assert_eq!(partition(&rewards, DisplayMode::All, &filters).len(), 4);

        let notify: Vec<&str> = partition(&rewards, DisplayMode::Notify, &filters)
            .into_iter()
            .map(RewardId::name)
            .collect();
        assert_eq!(notify, vec!["Serration", "Orokin Reactor"]);

        let ignore = partition(&rewards, DisplayMode::Ignore, &filters);
        assert_eq!(ignore.len(), 2);
        assert!(ignore.iter().all(|r| r.name() == "Alloy Plate"));
    }

    #[test]
    fn test_entries_sorted_and_deduplicated() {
        let view = RewardView::new("Rewards", rewards(), 256, 128, None);
        let filters = filters();

        let entries = view.entries(&filters);
        let names: Vec<&str> = entries.iter().map(|e| e.reward.name()).collect();
        assert_eq!(names, vec!["Alloy Plate", "Orokin Reactor", "Serration"]);
        assert!(entries[0].ignored);
        assert!(!entries[1].ignored);
        assert_eq!(view.count_label(&filters), "Showing 3 of 3");
    }

    #[test]
    fn test_mode_changes_count() {
        let mut view = RewardView::new("Rewards", rewards(), 256, 128, None);
        let filters = filters();

        view.set_mode(DisplayMode::Notify);
        assert_eq!(view.count_label(&filters), "Showing 2 of 3");
        view.set_mode(DisplayMode::Ignore);
        assert_eq!(view.count_label(&filters), "Showing 1 of 3");
    }

    #[test]
    fn test_toggle_notify() {
        let reward = RewardId::new("Serration");
        let mut filters = filters();

        assert!(RewardView::is_notify(&reward, &filters));
        assert!(!RewardView::toggle_notify(&reward, &mut filters));
        assert!(filters.contains("Serration"));
        assert!(!RewardView::is_notify(&reward, &filters));
        assert!(RewardView::toggle_notify(&reward, &mut filters));
        assert!(!filters.contains("Serration"));
    }

    #[test]
    fn test_zoom_save_is_debounced() {
        let start = Instant::now();
        let mut view = RewardView::new("Rewards", rewards(), 256, 128, Some(Zoom::Zoom50));
        assert_eq!(view.take_pending_zoom(start + ZOOM_SAVE_DELAY), None);

        assert!(view.set_zoom(Zoom::Zoom75, start));
        assert!(view.scroll_zoom(3, 3, start + Duration::from_millis(300)));
        assert_eq!(view.zoom(), Zoom::Zoom100);

        // Second change restarted the delay
        assert_eq!(view.take_pending_zoom(start + Duration::from_millis(600)), None);
        assert_eq!(
            view.take_pending_zoom(start + Duration::from_millis(800)),
            Some(Zoom::Zoom100)
        );
        assert_eq!(view.take_pending_zoom(start + Duration::from_secs(5)), None);

        assert!(!view.set_zoom(Zoom::Zoom100, start));
    }

    #[test]
    fn test_icon_size_follows_zoom() {
        let start = Instant::now();
        let mut view = RewardView::new("Rewards", rewards(), 256, 128, None);
        assert_eq!(view.zoom(), Zoom::Zoom100);
        assert_eq!(view.icon_size(), Some((256, 128)));
        view.set_zoom(Zoom::Zoom0, start);
        assert_eq!(view.icon_size(), None);
    }

    #[test]
    fn test_wiki_url() {
        assert_eq!(
            RewardView::wiki_url(&RewardId::new("Orokin Reactor")),
            "https://warframe.fandom.com/wiki/Orokin_Reactor"
        );
    }

    #[test]
    fn test_display_mode_parse() {
        assert_eq!("notify".parse::<DisplayMode>().unwrap(), DisplayMode::Notify);
        assert_eq!("IGNORE".parse::<DisplayMode>().unwrap(), DisplayMode::Ignore);
        assert!("some".parse::<DisplayMode>().is_err());
    }
}
