//! Alert feed parsing.
//!
//! Two formats are understood:
//! - JSON: an array of alert objects
//! - Text: one alert per line, e.g.
//!   `[2014-10-12 18:00:00] Apollodorus (Mercury): Exterminate - 40m - 4500cr - Serration (Mod)`

use std::path::Path;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use super::error::Result;
use super::model::{Alert, Category, RewardId};

lazy_static! {
    static ref ALERT_LINE: Regex = Regex::new(
        r"^(?:\[\s*(?P<issued>\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2})\s*\]\s*)?(?P<node>[^:]+?)\s*:\s*(?P<mission>.+?)\s+-\s+(?P<minutes>\d+)\s*m\s+-\s+(?P<credits>\d+)\s*cr(?:\s+-\s+(?P<reward>.+?)(?:\s+\((?P<category>[^()]+)\))?)?$"
    )
    .expect("Invalid alert line regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Json,
    Text,
}

impl FeedFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Parse a whole feed document.
pub fn parse_feed(content: &str, format: FeedFormat, now: DateTime<Utc>) -> Result<Vec<Alert>> {
    match format {
        FeedFormat::Json => Ok(serde_json::from_str(content)?),
        FeedFormat::Text => Ok(parse_lines(content, now)),
    }
}

/// Parse a text feed, skipping blank lines, `#` comments and lines that do not
/// look like alerts.
pub fn parse_lines(content: &str, now: DateTime<Utc>) -> Vec<Alert> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim().trim_start_matches('\u{feff}');
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let alert = parse_line(line, now);
            if alert.is_none() {
                log::warn!("Skipping unrecognised feed line {}: {}", index + 1, line);
            }
            alert
        })
        .collect()
}

/// Parse a single alert line. `now` is used as the issue time when the line
/// carries no timestamp.
pub fn parse_line(line: &str, now: DateTime<Utc>) -> Option<Alert> {
    let caps = ALERT_LINE.captures(line.trim())?;

    let issued = match caps.name("issued") {
        Some(m) => {
            let naive = NaiveDateTime::parse_from_str(m.as_str(), "%Y-%m-%d %H:%M:%S").ok()?;
            Utc.from_utc_datetime(&naive)
        }
        None => now,
    };

    let node = caps.name("node")?.as_str().trim().to_string();
    let mission = caps.name("mission")?.as_str().trim().to_string();
    let minutes: i64 = caps.name("minutes")?.as_str().parse().ok()?;
    let credits: u32 = caps.name("credits")?.as_str().parse().ok()?;
    let expiry = issued.checked_add_signed(Duration::try_minutes(minutes)?)?;
    let reward = caps
        .name("reward")
        .map(|m| RewardId::new(m.as_str().trim()));
    let category = caps
        .name("category")
        .filter(|_| reward.is_some())
        .map(|m| Category::from_label(m.as_str()));

    let id = format!(
        "{}|{}|{}|{}",
        node,
        mission,
        credits,
        reward.as_ref().map_or("", RewardId::name)
    );

    Some(Alert {
        id,
        node,
        mission,
        credits,
        reward,
        category,
        expiry: Some(expiry),
        done: false,
        matched: false,
    })
}
