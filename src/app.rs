use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::core::{
    alerts::{matcher::AlertMatcher, model::CreditsTier},
    config::{default_config_dir, ConfigManager, Settings},
    coordinator::Coordinator,
    error::Result,
    feed::{parse_feed, FeedFormat},
    filters::{FilterSet, FilterStore},
    model::{Alert, RewardId},
    rewards::{
        view::{DisplayMode, RewardView},
        zoom::Zoom,
    },
};

/// Name the reward view's zoom is saved under.
const REWARD_VIEW: &str = "Rewards";
const ICON_WIDTH: u32 = 256;
const ICON_HEIGHT: u32 = 128;

#[derive(Parser)]
#[command(name = "tenno-alerts", version, about = "Track alerts and filter their rewards")]
struct Cli {
    /// Directory holding settings.json and filters.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the feed and log alerts as they start matching
    Watch { feed: Option<PathBuf> },
    /// Refresh once and print the alerts that would be shown
    Check {
        feed: Option<PathBuf>,
        /// Also list hidden alerts with the reason they were hidden
        #[arg(long)]
        all: bool,
    },
    /// Mark an alert as completed so it stops being shown
    Done {
        /// Alert id as printed by `check`
        id: String,
    },
    /// List known rewards with their notify/ignore state
    Rewards {
        feed: Option<PathBuf>,
        #[arg(long, default_value = "all")]
        mode: DisplayMode,
        /// Zoom level by slider position (0 = text only, 4 = 100%)
        #[arg(long)]
        zoom: Option<usize>,
        /// Print the wiki link of each listed reward
        #[arg(long)]
        wiki: bool,
    },
    /// Edit the ignore list
    Filter {
        #[command(subcommand)]
        action: FilterAction,
    },
    /// Show or change settings
    Config {
        /// Credits tier 0-5 (all, 3K, 5K, 7K, 10K, none)
        #[arg(long)]
        credits: Option<u8>,
        #[arg(long)]
        blueprints: Option<bool>,
        #[arg(long)]
        mods: Option<bool>,
        #[arg(long)]
        auras: Option<bool>,
        #[arg(long)]
        resources: Option<bool>,
        /// Hide alerts whose reward is on the ignore list
        #[arg(long)]
        filter: Option<bool>,
        #[arg(long)]
        feed: Option<PathBuf>,
        #[arg(long)]
        refresh: Option<u64>,
    },
}

#[derive(Subcommand)]
enum FilterAction {
    /// Flip a reward between notify and ignore
    Toggle { name: String },
    List,
    Clear,
}

struct AppState {
    config_manager: ConfigManager,
    filter_store: FilterStore,
}

impl AppState {
    fn new(config_dir: &Path) -> Self {
        Self {
            config_manager: ConfigManager::new(config_dir),
            filter_store: FilterStore::new(config_dir),
        }
    }

    fn feed_path(&self, settings: &Settings, feed: Option<PathBuf>) -> PathBuf {
        feed.unwrap_or_else(|| settings.feed_path.clone())
    }
}

pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(Some(env_logger::TimestampPrecision::Seconds))
        .init();

    let cli = Cli::parse();
    if let Err(e) = execute(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    let config_dir = cli.config_dir.unwrap_or_else(default_config_dir);
    let state = AppState::new(&config_dir);
    log::debug!("Using config directory {:?}", config_dir);

    match cli.command.unwrap_or(Command::Watch { feed: None }) {
        Command::Watch { feed } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(watch(&state, feed));
            Ok(())
        }
        Command::Check { feed, all } => check(&state, feed, all),
        Command::Rewards {
            feed,
            mode,
            zoom,
            wiki,
        } => rewards(&state, feed, mode, zoom, wiki),
        Command::Done { id } => {
            let mut settings = state.config_manager.load();
            if settings.mark_done(&id) {
                state.config_manager.save(&settings)?;
                log::info!("Marked {} as done", id);
            } else {
                log::info!("{} is already done", id);
            }
            Ok(())
        }
        Command::Filter { action } => filter(&state, action),
        Command::Config {
            credits,
            blueprints,
            mods,
            auras,
            resources,
            filter,
            feed,
            refresh,
        } => {
            let mut settings = state.config_manager.load();
            if let Some(index) = credits {
                settings.matcher.credits = CreditsTier::from_index(index)?;
            }
            let toggles = [
                (blueprints, &mut settings.matcher.blueprints),
                (mods, &mut settings.matcher.mods),
                (auras, &mut settings.matcher.auras),
                (resources, &mut settings.matcher.resources),
                (filter, &mut settings.matcher.filter),
            ];
            for (value, slot) in toggles {
                if let Some(value) = value {
                    *slot = value;
                }
            }
            if let Some(feed) = feed {
                settings.feed_path = feed;
            }
            if let Some(refresh) = refresh {
                settings.refresh_seconds = refresh.max(1);
            }
            state.config_manager.save(&settings)?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
            println!("Credits: {}", settings.matcher.credits.display_name());
            Ok(())
        }
    }
}

fn load_feed(path: &Path, now: DateTime<Utc>) -> Result<Vec<Alert>> {
    let content = fs::read_to_string(path)?;
    parse_feed(&content, FeedFormat::from_path(path), now)
}

fn load_filters(state: &AppState) -> FilterSet {
    state.filter_store.load().unwrap_or_else(|e| {
        log::warn!("Cannot read filters from {:?}: {}", state.filter_store.path(), e);
        FilterSet::new()
    })
}

fn apply_done_marks(coordinator: &mut Coordinator, settings: &Settings) {
    for id in &settings.done_alerts {
        coordinator.mark_done(id.as_str());
    }
}

async fn watch(state: &AppState, feed: Option<PathBuf>) {
    let mut coordinator = Coordinator::new();
    let mut current_feed: Option<PathBuf> = None;

    loop {
        // Settings and filters are re-read every tick so edits apply without a restart
        let mut settings = state.config_manager.load();
        let filters = load_filters(state);
        let feed_path = state.feed_path(&settings, feed.clone());

        if current_feed.as_ref() != Some(&feed_path) {
            log::info!("Monitoring feed {:?}", feed_path);
            if current_feed.is_some() {
                coordinator = Coordinator::new();
            }
            current_feed = Some(feed_path.clone());
        }

        let now = Utc::now();
        match tokio::fs::read_to_string(&feed_path).await {
            Ok(content) => match parse_feed(&content, FeedFormat::from_path(&feed_path), now) {
                Ok(alerts) => {
                    apply_done_marks(&mut coordinator, &settings);
                    let matcher = AlertMatcher::new(settings.matcher, &filters);
                    let output = coordinator.refresh(alerts, &matcher, now);
                    for msg in &output.logs {
                        log::debug!("{}", msg);
                    }
                    if settings.forget_done_except(&output.alerts) {
                        if let Err(e) = state.config_manager.save(&settings) {
                            log::warn!("Cannot save settings: {}", e);
                        }
                    }
                    for alert in &output.new_matches {
                        log::info!("New alert: {}", alert.summary(now));
                    }
                }
                Err(e) => log::warn!("Cannot parse feed {:?}: {}", feed_path, e),
            },
            Err(e) => log::warn!("Cannot read feed {:?}: {}", feed_path, e),
        }

        let delay = Duration::from_secs(settings.refresh_seconds.max(1));
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("Stopping watcher");
                break;
            }
        }
    }
}

fn check(state: &AppState, feed: Option<PathBuf>, all: bool) -> Result<()> {
    let settings = state.config_manager.load();
    let filters = load_filters(state);
    let feed_path = state.feed_path(&settings, feed);

    let now = Utc::now();
    let alerts = load_feed(&feed_path, now)?;
    let matcher = AlertMatcher::new(settings.matcher, &filters);
    let mut coordinator = Coordinator::new();
    apply_done_marks(&mut coordinator, &settings);
    let output = coordinator.refresh(alerts, &matcher, now);
    for msg in &output.logs {
        log::info!("{}", msg);
    }

    for alert in output.shown() {
        println!("  {}  [{}]", alert.summary(now), alert.id);
    }
    if all {
        for alert in output.alerts.iter().filter(|alert| !alert.matched) {
            let reason = matcher
                .check(alert)
                .map_or("hidden", |rejection| rejection.description());
            println!("- {} ({})  [{}]", alert.summary(now), reason, alert.id);
        }
    }
    Ok(())
}

fn rewards(
    state: &AppState,
    feed: Option<PathBuf>,
    mode: DisplayMode,
    zoom: Option<usize>,
    wiki: bool,
) -> Result<()> {
    let mut settings = state.config_manager.load();
    let filters = load_filters(state);
    let feed_path = state.feed_path(&settings, feed);

    let mut names: BTreeSet<String> = filters.iter().map(str::to_string).collect();
    match load_feed(&feed_path, Utc::now()) {
        Ok(alerts) => names.extend(alerts.iter().filter_map(Alert::reward_name).map(str::to_string)),
        Err(e) => log::warn!("Listing filtered rewards only, feed unavailable: {}", e),
    }

    let mut view = RewardView::new(
        REWARD_VIEW,
        names.into_iter().map(RewardId::new),
        ICON_WIDTH,
        ICON_HEIGHT,
        settings.zoom_for(REWARD_VIEW),
    );
    view.set_mode(mode);

    if let Some(ordinal) = zoom {
        if view.set_zoom(Zoom::from_ordinal(ordinal)?, Instant::now()) {
            settings.set_zoom(view.name(), view.zoom());
            state.config_manager.save(&settings)?;
        }
    }

    let size = view
        .icon_size()
        .map_or_else(|| "text".to_string(), |(w, h)| format!("{}x{}", w, h));
    println!(
        "{} | Zoom: {} ({}) | {}",
        view.mode(),
        view.zoom(),
        size,
        view.count_label(&filters)
    );
    for entry in view.entries(&filters) {
        let mark = if entry.ignored { " " } else { "x" };
        if wiki {
            println!("  [{}] {}  {}", mark, entry.reward.name(), RewardView::wiki_url(entry.reward));
        } else {
            println!("  [{}] {}", mark, entry.reward.name());
        }
    }
    Ok(())
}

/// Edits write the whole set back, so a failed read must stop the command
/// instead of saving over the file.
fn filter(state: &AppState, action: FilterAction) -> Result<()> {
    let mut filters = state.filter_store.load()?;
    match action {
        FilterAction::Toggle { name } => {
            let reward = RewardId::new(name.trim());
            let notify = RewardView::toggle_notify(&reward, &mut filters);
            state.filter_store.save(&filters)?;
            println!(
                "{}: {}",
                reward.name(),
                if notify { "notify" } else { "ignore" }
            );
        }
        FilterAction::List => {
            for name in filters.iter() {
                println!("{}", name);
            }
            log::info!("{} ignored rewards", filters.len());
        }
        FilterAction::Clear => {
            filters.clear();
            state.filter_store.save(&filters)?;
            log::info!("Ignore list cleared");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_filter_toggle_persists() {
        let dir = tempdir().unwrap();
        let state = AppState::new(dir.path());

        filter(&state, FilterAction::Toggle { name: " Serration ".to_string() }).unwrap();
        assert!(state.filter_store.load().unwrap().contains("Serration"));

        filter(&state, FilterAction::Toggle { name: "Serration".to_string() }).unwrap();
        assert!(state.filter_store.load().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_filters_are_not_overwritten() {
        let dir = tempdir().unwrap();
        let state = AppState::new(dir.path());
        let garbled = vec![0xff, 0xfe, b'[', b'"'];
        fs::write(state.filter_store.path(), &garbled).unwrap();

        assert!(filter(&state, FilterAction::Toggle { name: "Serration".to_string() }).is_err());
        assert!(filter(&state, FilterAction::Clear).is_err());
        assert_eq!(fs::read(state.filter_store.path()).unwrap(), garbled);

        // Read-only paths still fall back to an empty set
        assert!(load_filters(&state).is_empty());
    }

    #[test]
    fn test_done_marks_reach_the_coordinator() {
        let mut settings = Settings::default();
        settings.mark_done("a");
        let mut coordinator = Coordinator::new();
        apply_done_marks(&mut coordinator, &settings);
        assert!(coordinator.is_marked_done("a"));
        assert!(!coordinator.is_marked_done("b"));
    }
}
