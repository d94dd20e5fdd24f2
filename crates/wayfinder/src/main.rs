//! wayfinder - navigation analytics from the command line
//!
//! This is the main entry point for the wayfinder CLI.
//! It wires together all the components:
//! - Configuration loading
//! - Durable and session store initialization
//! - Navigation analytics service
//! - Quick-actions palette
//! - Sidebar customization and preferences

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wayfinder_api::{ItemUsageSummary, Role};
use wayfinder_config::{load_config_or_default, Config};
use wayfinder_core::{
    default_catalog, ActionOutcome, CoreEvent, NavigationAnalytics, Preferences,
    QuickActionIndex, SidebarCustomization,
};
use wayfinder_store::{KeyValueStore, SqliteStore};
use wayfinder_util::{
    default_config_path, format_datetime_full, format_duration, ActionId, ItemId,
    DURABLE_DB_FILENAME, SESSION_DB_FILENAME,
};

/// wayfinder - Navigation analytics and quick actions for the dashboard
#[derive(Parser, Debug)]
#[command(name = "wayfinder")]
#[command(about = "Navigation analytics and quick actions for the dashboard", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/wayfinder/config.toml)
    #[arg(short, long, env = "WAYFINDER_CONFIG", default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set WAYFINDER_DATA_DIR env var)
    #[arg(short, long, env = "WAYFINDER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Role used for quick-action permission checks (admin, editor, viewer)
    #[arg(short, long)]
    role: Option<Role>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a click on a navigation item, then visit its page
    Track {
        item_id: String,
        /// Defaults to the sidebar item's title
        #[arg(long)]
        title: Option<String>,
        /// Defaults to the sidebar item's link
        #[arg(long)]
        href: Option<String>,
        /// Defaults to the sidebar section holding the item
        #[arg(long)]
        category: Option<String>,
    },

    /// Record a route change without a click
    Visit { page: String },

    /// Show usage for one item
    Usage { item_id: String },

    /// Most used items
    Top {
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Least used items (clicked at least once)
    Least {
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Usage rolled up per category
    Categories,

    /// Daily and weekly click histograms
    Trends {
        /// Show weekly buckets instead of daily
        #[arg(long)]
        weekly: bool,
    },

    /// Hide/promote suggestions
    Recommend,

    /// Export all analytics as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete all usage data
    Clear,

    /// Quick-actions palette
    Actions {
        #[command(subcommand)]
        command: ActionsCommand,
    },

    /// Sidebar customization
    Sidebar {
        #[command(subcommand)]
        command: SidebarCommand,
    },

    /// Application preferences
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ActionsCommand {
    /// Search actions; an empty query lists recent ones
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Run an action by id
    Run { id: String },
}

#[derive(Subcommand, Debug)]
enum SidebarCommand {
    Show,
    Hide { item_id: String },
    Unhide { item_id: String },
    Move {
        item_id: String,
        section: String,
        #[arg(default_value_t = 0)]
        position: usize,
    },
    Collapse { section: String },
    Expand { section: String },
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    Import { file: PathBuf },
    Reset,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    /// Flip a toggle: theme, compact_sidebar, usage_badges, recommendations, tts
    Toggle { setting: String },
}

/// Opened stores plus the effective configuration
struct App {
    config: Config,
    role: Role,
    durable: Arc<dyn KeyValueStore>,
    volatile: Arc<dyn KeyValueStore>,
}

impl App {
    fn open(args: &Args) -> Result<Self> {
        let mut config = load_config_or_default(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;

        if let Some(dir) = &args.data_dir {
            config.service.data_dir = Some(dir.clone());
        }
        let role = args.role.unwrap_or(config.role);

        let data_dir = config.service.data_dir();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
        let runtime_dir = config.service.runtime_dir();
        std::fs::create_dir_all(&runtime_dir)
            .with_context(|| format!("Failed to create runtime directory {:?}", runtime_dir))?;

        let durable = open_store(&data_dir.join(DURABLE_DB_FILENAME))?;
        let volatile = open_store(&runtime_dir.join(SESSION_DB_FILENAME))?;

        info!(
            data_dir = %data_dir.display(),
            runtime_dir = %runtime_dir.display(),
            role = %role,
            "Stores initialized"
        );

        Ok(Self {
            config,
            role,
            durable,
            volatile,
        })
    }

    fn analytics(&self) -> NavigationAnalytics {
        NavigationAnalytics::new(self.durable.clone(), self.volatile.clone(), &self.config)
    }

    fn quick_actions(&self) -> QuickActionIndex {
        QuickActionIndex::new(
            default_catalog(),
            Some(&self.role),
            self.config.quick_actions,
            self.durable.clone(),
        )
    }

    fn run(&self, command: Command) -> Result<()> {
        let now = wayfinder_util::now();

        match command {
            Command::Track {
                item_id,
                title,
                href,
                category,
            } => {
                let item_id = ItemId::new(item_id);
                let sidebar = SidebarCustomization::load(self.durable.clone());
                let layout = sidebar.layout();
                let known = layout.find_item(&item_id);
                let section = layout
                    .sections
                    .iter()
                    .find(|s| s.items.iter().any(|i| i.id == item_id));

                let href = href
                    .or_else(|| known.map(|i| i.href.clone()))
                    .ok_or_else(|| anyhow!("Unknown item {}: pass --href", item_id))?;
                let title = title
                    .or_else(|| known.map(|i| i.title.clone()))
                    .unwrap_or_else(|| item_id.to_string());
                let category = category
                    .or_else(|| section.map(|s| s.id.clone()))
                    .unwrap_or_else(|| "other".to_string());

                let mut analytics = self.analytics();
                let Some(event) =
                    analytics.track_navigation(&item_id, &title, &href, &category, now)
                else {
                    bail!("Item id must not be blank");
                };
                report(&event);
                if let Some(event) = analytics.on_route_change(&href, now) {
                    report(&event);
                }
            }

            Command::Visit { page } => {
                match self.analytics().on_route_change(&page, now) {
                    Some(event) => report(&event),
                    None => println!("Now on {}", page),
                }
            }

            Command::Usage { item_id } => {
                let analytics = self.analytics();
                let item_id = ItemId::new(item_id);
                let record = analytics
                    .get_item_usage(&item_id)
                    .ok_or_else(|| anyhow!("No usage recorded for {}", item_id))?;

                println!("{} ({})", record.title, record.item_id);
                println!("  Link:          {}", record.href);
                println!("  Category:      {}", record.category);
                println!("  Clicks:        {}", record.click_count);
                println!("  Time spent:    {}", format_ms(record.time_spent_ms));
                println!("  Last accessed: {}", format_datetime_full(&record.last_accessed));
                println!("  History:       {} entries", record.access_history.len());
            }

            Command::Top { limit } => {
                let limit = limit.unwrap_or(self.config.analytics.most_used_limit);
                print_ranking(&self.analytics().get_most_used_items(limit));
            }

            Command::Least { limit } => {
                let limit = limit.unwrap_or(self.config.analytics.least_used_limit);
                print_ranking(&self.analytics().get_least_used_items(limit));
            }

            Command::Categories => {
                let analytics = self.analytics();
                let categories = analytics.get_category_analytics();
                if categories.is_empty() {
                    println!("No usage recorded");
                }
                for (name, usage) in categories {
                    println!(
                        "{:<16} {:>6} clicks  {:>3} items  {}",
                        name,
                        usage.total_clicks,
                        usage.item_count,
                        format_ms(usage.total_time_spent_ms)
                    );
                }
            }

            Command::Trends { weekly } => {
                let trends = self.analytics().get_usage_trends();
                let buckets = if weekly { &trends.weekly } else { &trends.daily };
                if buckets.is_empty() {
                    println!("No usage recorded");
                }
                for (bucket, clicks) in buckets {
                    println!("{:<12} {:>6}", bucket, clicks);
                }
            }

            Command::Recommend => {
                let recommendations = self.analytics().get_recommendations();
                if recommendations.is_empty() {
                    println!("No recommendations");
                }
                for rec in recommendations {
                    println!(
                        "{:<8} {:<16} {:.0}%  {}",
                        format!("{:?}", rec.kind).to_lowercase(),
                        rec.item_id.as_str(),
                        rec.confidence * 100.0,
                        rec.reason
                    );
                }
            }

            Command::Export { output } => {
                let json = self.analytics().export_analytics(now)?;
                write_output(output.as_deref(), &json)?;
            }

            Command::Clear => {
                let event = self.analytics().clear_analytics();
                report(&event);
            }

            Command::Actions { command } => self.run_actions(command, now)?,
            Command::Sidebar { command } => self.run_sidebar(command)?,
            Command::Settings { command } => self.run_settings(command)?,
        }

        Ok(())
    }

    fn run_actions(
        &self,
        command: ActionsCommand,
        now: chrono::DateTime<chrono::Local>,
    ) -> Result<()> {
        let mut index = self.quick_actions();

        match command {
            ActionsCommand::Search { query } => {
                let results = index.search(&query);
                if results.is_empty() {
                    println!("No matching actions");
                }
                for action in results {
                    let shortcut = action.shortcut.as_deref().unwrap_or("");
                    println!(
                        "{:<18} {:<20} {:<8} {}",
                        action.id.as_str(),
                        action.title,
                        shortcut,
                        action.description
                    );
                }
            }

            ActionsCommand::Run { id } => {
                let id = ActionId::new(id);
                let event = index
                    .execute(&id)
                    .ok_or_else(|| anyhow!("No such action: {}", id))?;
                report(&event);

                if let CoreEvent::ActionExecuted { outcome, .. } = event {
                    self.apply_outcome(outcome, now)?;
                }
            }
        }

        Ok(())
    }

    /// Carry out what an executed action asked for
    fn apply_outcome(
        &self,
        outcome: ActionOutcome,
        now: chrono::DateTime<chrono::Local>,
    ) -> Result<()> {
        match outcome {
            ActionOutcome::Navigate { href } => {
                println!("Navigating to {}", href);
                if let Some(event) = self.analytics().on_route_change(&href, now) {
                    report(&event);
                }
            }
            ActionOutcome::ToggleSetting { setting } => {
                let mut prefs = Preferences::load(self.durable.clone());
                if !prefs.toggle(&setting) {
                    bail!("Unknown setting: {}", setting);
                }
                println!("Toggled {}", setting);
            }
            ActionOutcome::ExportAnalytics => {
                println!("{}", self.analytics().export_analytics(now)?);
            }
            ActionOutcome::StartVoiceInput => {
                println!("Voice input is not available in a terminal");
            }
        }
        Ok(())
    }

    fn run_sidebar(&self, command: SidebarCommand) -> Result<()> {
        let mut sidebar = SidebarCustomization::load(self.durable.clone());

        match command {
            SidebarCommand::Show => {
                for section in &sidebar.layout().sections {
                    let marker = if section.collapsed { "+" } else { "-" };
                    println!("{} {} [{}]", marker, section.title, section.id);
                    for item in &section.items {
                        let hidden = if item.visible { "" } else { " (hidden)" };
                        println!(
                            "    {:<12} {:<24} {}{}",
                            item.id.as_str(),
                            item.title,
                            item.href,
                            hidden
                        );
                    }
                }
            }
            SidebarCommand::Hide { item_id } => {
                sidebar.set_item_visible(&ItemId::new(item_id), false)?;
            }
            SidebarCommand::Unhide { item_id } => {
                sidebar.set_item_visible(&ItemId::new(item_id), true)?;
            }
            SidebarCommand::Move {
                item_id,
                section,
                position,
            } => {
                sidebar.move_item(&ItemId::new(item_id), &section, position)?;
            }
            SidebarCommand::Collapse { section } => sidebar.set_section_collapsed(&section, true)?,
            SidebarCommand::Expand { section } => sidebar.set_section_collapsed(&section, false)?,
            SidebarCommand::Export { output } => {
                write_output(output.as_deref(), &sidebar.export_settings()?)?;
            }
            SidebarCommand::Import { file } => {
                let json = std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {:?}", file))?;
                sidebar.import_settings(&json)?;
                println!("Sidebar settings imported");
            }
            SidebarCommand::Reset => sidebar.reset_to_defaults(),
        }

        Ok(())
    }

    fn run_settings(&self, command: SettingsCommand) -> Result<()> {
        let mut prefs = Preferences::load(self.durable.clone());

        match command {
            SettingsCommand::Show => {
                let unified = prefs.unified();
                println!("Appearance");
                println!("  Theme:            {:?}", unified.theme);
                println!("  Compact sidebar:  {}", unified.compact_sidebar);
                println!("  Usage badges:     {}", unified.show_usage_badges);
                println!("  Recommendations:  {}", unified.recommendations_enabled);

                let tts = prefs.tts();
                println!("Speech");
                println!("  Enabled:          {}", tts.enabled);
                println!("  Voice:            {}", tts.voice.as_deref().unwrap_or("default"));
                println!(
                    "  Rate/pitch/vol:   {:.1} / {:.1} / {:.1}",
                    tts.rate, tts.pitch, tts.volume
                );

                let llm = prefs.llm();
                println!("Language model");
                println!("  Provider:         {}", llm.provider);
                println!("  Model:            {}", llm.model);
                println!("  Temperature:      {:.2}", llm.temperature);
                println!("  Max tokens:       {}", llm.max_tokens);
            }
            SettingsCommand::Toggle { setting } => {
                if !prefs.toggle(&setting) {
                    bail!("Unknown setting: {}", setting);
                }
                println!("Toggled {}", setting);
            }
        }

        Ok(())
    }
}

fn open_store(path: &Path) -> Result<Arc<dyn KeyValueStore>> {
    let store = SqliteStore::open(path)
        .with_context(|| format!("Failed to open database {:?}", path))?;
    debug!(path = %path.display(), "Database opened");
    Ok(Arc::new(store))
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write {:?}", path))?;
            info!(path = %path.display(), "Export written");
        }
        None => println!("{}", contents),
    }
    Ok(())
}

fn format_ms(ms: u64) -> String {
    format_duration(Duration::from_millis(ms))
}

fn print_ranking(items: &[ItemUsageSummary]) {
    if items.is_empty() {
        println!("No usage recorded");
    }
    for (rank, item) in items.iter().enumerate() {
        println!(
            "{:>2}. {:<16} {:>6} clicks  {}",
            rank + 1,
            item.item_id.as_str(),
            item.click_count,
            format_ms(item.time_spent_ms)
        );
    }
}

fn report(event: &CoreEvent) {
    match event {
        CoreEvent::NavigationTracked {
            item_id,
            click_count,
            ..
        } => println!("Tracked {} ({} clicks)", item_id, click_count),
        CoreEvent::PageTimeCredited {
            page,
            elapsed_ms,
            items,
            ..
        } => println!(
            "Left {} after {} ({} items credited)",
            page,
            format_ms(*elapsed_ms),
            items.len()
        ),
        CoreEvent::AnalyticsCleared { item_count } => {
            println!("Cleared usage for {} items", item_count)
        }
        CoreEvent::ActionExecuted { action_id, .. } => println!("Ran {}", action_id),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        mock_time = wayfinder_util::is_mock_time_active(),
        "wayfinder starting"
    );

    let app = App::open(&args)?;
    app.run(args.command)
}
