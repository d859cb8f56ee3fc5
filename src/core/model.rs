use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub type AlertId = String;
pub type RewardName = String;

/// Classification of a reward. The flags are checked independently by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardType {
    Blueprint,
    Mod,
    Aura,
    Resource,
    Other,
}

impl RewardType {
    pub fn is_blueprint(self) -> bool {
        self == Self::Blueprint
    }

    pub fn is_mod(self) -> bool {
        self == Self::Mod
    }

    pub fn is_aura(self) -> bool {
        self == Self::Aura
    }

    pub fn is_resource(self) -> bool {
        self == Self::Resource
    }

    /// Map a feed label like "Blueprint" or "mods" to a type.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().trim_end_matches('s') {
            "blueprint" | "bp" => Self::Blueprint,
            "mod" => Self::Mod,
            "aura" => Self::Aura,
            "resource" => Self::Resource,
            _ => Self::Other,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Blueprint => "Blueprint",
            Self::Mod => "Mod",
            Self::Aura => "Aura",
            Self::Resource => "Resource",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RewardType,
}

impl Category {
    pub fn from_label(label: &str) -> Self {
        Self {
            name: label.trim().to_string(),
            kind: RewardType::from_label(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardId {
    pub name: RewardName,
}

impl RewardId {
    pub fn new(name: impl Into<RewardName>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A timed mission as seen in one feed snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    #[serde(default)]
    pub node: String,
    #[serde(default)]
    pub mission: String,
    #[serde(default)]
    pub credits: u32,
    #[serde(default)]
    pub reward: Option<RewardId>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    pub done: bool,
    /// Display flag written back after matching
    #[serde(skip)]
    pub matched: bool,
}

impl Alert {
    pub fn new(id: impl Into<AlertId>, credits: u32) -> Self {
        Self {
            id: id.into(),
            node: String::new(),
            mission: String::new(),
            credits,
            reward: None,
            category: None,
            expiry: None,
            done: false,
            matched: false,
        }
    }

    pub fn with_reward(mut self, name: &str, category: Option<Category>) -> Self {
        self.reward = Some(RewardId::new(name));
        self.category = category;
        self
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// True when the alert grants an item, not just credits.
    pub fn has_loot(&self) -> bool {
        self.reward.is_some()
    }

    pub fn reward_name(&self) -> Option<&str> {
        self.reward.as_ref().map(RewardId::name)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= now)
    }

    pub fn time_left(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expiry.map(|expiry| (expiry - now).max(Duration::zero()))
    }

    /// One-line summary used by the CLI and log output.
    pub fn summary(&self, now: DateTime<Utc>) -> String {
        let mut text = format!("{}: {} - {}cr", self.node, self.mission, self.credits);
        if let Some(reward) = &self.reward {
            text.push_str(" - ");
            text.push_str(reward.name());
            if let Some(category) = &self.category {
                text.push_str(&format!(" ({})", category.name));
            }
        }
        if let Some(left) = self.time_left(now) {
            text.push_str(&format!(" [{}m left]", left.num_minutes()));
        }
        text
    }
}
