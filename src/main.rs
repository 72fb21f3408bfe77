use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, ListScope};
use cli::render;
use config::Config;
use loops::domain::{LoopStatus, LoopUpdate, tag};
use loops::id::short_id;
use loops::storage::FileStore;
use loops::store::LoopStore;
use loops::views::{self, LoopStats};

type Store = LoopStore<FileStore>;

fn setup_logging(config: &Config) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("loops")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("loops.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // Config level first, RUST_LOG overrides it
    let mut builder = env_logger::Builder::new();
    if let Some(level) = &config.log_level {
        builder.parse_filters(level);
    }
    builder
        .parse_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn open_store(config: &Config) -> Result<Store> {
    let storage = FileStore::new(&config.storage.data_dir)
        .with_context(|| format!("Failed to open data directory {}", config.storage.data_dir.display()))?;
    Ok(LoopStore::load_with_key(storage, config.storage.key.clone()))
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{} {}", "Data directory:".yellow(), config.storage.data_dir.display());
    }

    if let Some(Commands::Tags) = &cli.command {
        return handle_tags_command();
    }

    let mut store = open_store(config)?;

    match &cli.command {
        None => handle_list_command(&store, ListScope::Open, None, false, config),
        Some(Commands::Add { content, tags, energy }) => {
            handle_add_command(&mut store, &content.join(" "), tags, *energy, config)
        }
        Some(Commands::List {
            closed,
            all,
            tag: tag_filter,
            newest,
        }) => handle_list_command(
            &store,
            ListScope::from_flags(*closed, *all),
            tag_filter.as_deref(),
            *newest,
            config,
        ),
        Some(Commands::Show { id }) => handle_show_command(&store, id, config),
        Some(Commands::Edit {
            id,
            content,
            tags,
            clear_tags,
            energy,
            clear_energy,
        }) => {
            let update = build_update(content.as_deref(), tags, *clear_tags, *energy, *clear_energy);
            handle_edit_command(&mut store, id, update, config)
        }
        Some(Commands::Toggle { id }) => handle_toggle_command(&mut store, id),
        Some(Commands::Delete { id }) => handle_delete_command(&mut store, id),
        Some(Commands::Stats) => handle_stats_command(&store),
        Some(Commands::Tags) => handle_tags_command(),
    }
}

/// Resolve a user-supplied ID or prefix to a full loop ID.
fn resolve(store: &Store, prefix: &str) -> Result<String> {
    match store.resolve_id(prefix)? {
        Some(record) => Ok(record.id.clone()),
        None => Err(eyre!("No loop matches '{}'", prefix)),
    }
}

fn build_update(
    content: Option<&str>,
    tags: &[String],
    clear_tags: bool,
    energy: Option<u8>,
    clear_energy: bool,
) -> LoopUpdate {
    let mut update = LoopUpdate::new();
    if let Some(content) = content {
        update = update.content(content);
    }
    if clear_tags {
        update = update.tags(Vec::<String>::new());
    } else if !tags.is_empty() {
        update = update.tags(tags.iter().cloned());
    }
    if clear_energy {
        update = update.energy_level(None);
    } else if let Some(level) = energy {
        update = update.energy_level(Some(level));
    }
    update
}

fn handle_add_command(
    store: &mut Store,
    content: &str,
    tags: &[String],
    energy: Option<u8>,
    config: &Config,
) -> Result<()> {
    info!("Adding loop (tags: {:?}, energy: {:?})", tags, energy);
    let record = store.create(content, tags.to_vec(), energy)?;
    println!("{} {}", "Added:".green(), render::loop_line(&record, &config.display));
    Ok(())
}

fn handle_list_command(
    store: &Store,
    scope: ListScope,
    tag_filter: Option<&str>,
    newest: bool,
    config: &Config,
) -> Result<()> {
    info!("Listing loops - scope: {:?}, tag: {:?}", scope, tag_filter);
    if let Some(value) = tag_filter {
        if !tag::is_known(value) {
            return Err(eyre!("Unknown tag '{}' (see `loops tags`)", value));
        }
    }

    let snapshot = store.loops();
    let stats = LoopStats::compute(snapshot);
    println!("{}", render::stats_line(&stats));

    let open = if newest {
        views::filter_by_tag(views::open_loops(snapshot), tag_filter)
    } else {
        views::open_board(snapshot, tag_filter)
    };
    let closed = views::filter_by_tag(views::closed_loops(snapshot), tag_filter);

    let sections: Vec<(&str, Vec<_>)> = match scope {
        ListScope::Open => vec![("Open Loops", open)],
        ListScope::Closed => vec![("Closed Loops", closed)],
        ListScope::All => vec![("Open Loops", open), ("Closed Loops", closed)],
    };

    for (title, set) in sections {
        println!();
        if set.is_empty() {
            match (scope, tag_filter) {
                (ListScope::Open, None) => println!("{}", render::empty_message(&stats)),
                (_, Some(value)) => println!("{} has no {} loops", title, value),
                (_, None) => println!("{}: none", title),
            }
            continue;
        }
        println!("{} ({})", title.bold(), set.len());
        for record in set {
            println!("  {}", render::loop_line(record, &config.display));
        }
    }
    Ok(())
}

fn handle_show_command(store: &Store, id: &str, config: &Config) -> Result<()> {
    let id = resolve(store, id)?;
    if let Some(record) = store.get(&id) {
        println!("{}", render::loop_detail(record, &config.display));
    }
    Ok(())
}

fn handle_edit_command(store: &mut Store, id: &str, update: LoopUpdate, config: &Config) -> Result<()> {
    if update.is_empty() {
        return Err(eyre!("Nothing to change; pass --content, --tag, --clear-tags, --energy or --clear-energy"));
    }
    let id = resolve(store, id)?;
    info!("Editing loop {}", id);
    store.update(&id, update)?;
    if let Some(record) = store.get(&id) {
        println!("{} {}", "Updated:".green(), render::loop_line(record, &config.display));
    }
    Ok(())
}

fn handle_toggle_command(store: &mut Store, id: &str) -> Result<()> {
    let id = resolve(store, id)?;
    info!("Toggling loop {}", id);
    if let Some(status) = store.toggle_status(&id) {
        let label = match status {
            LoopStatus::Closed => "Closed:".green(),
            LoopStatus::Open => "Reopened:".yellow(),
        };
        println!("{} {}", label, short_id(&id));
    }
    Ok(())
}

fn handle_delete_command(store: &mut Store, id: &str) -> Result<()> {
    let id = resolve(store, id)?;
    info!("Deleting loop {}", id);
    if store.delete(&id) {
        println!("{} {}", "Deleted:".red(), short_id(&id));
    }
    Ok(())
}

fn handle_stats_command(store: &Store) -> Result<()> {
    let stats = LoopStats::compute(store.loops());
    println!("{}", render::stats_line(&stats));
    Ok(())
}

fn handle_tags_command() -> Result<()> {
    for def in tag::all() {
        println!("{}", render::tag_catalog_line(def));
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(&config).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_update_empty() {
        assert!(build_update(None, &[], false, None, false).is_empty());
    }

    #[test]
    fn test_build_update_fields() {
        let tags = vec!["work".to_string()];
        let update = build_update(Some("x"), &tags, false, Some(3), false);
        assert_eq!(update.content.as_deref(), Some("x"));
        assert_eq!(update.tags, Some(tags));
        assert_eq!(update.energy_level, Some(Some(3)));
    }

    #[test]
    fn test_build_update_clears() {
        let update = build_update(None, &[], true, None, true);
        assert_eq!(update.tags, Some(vec![]));
        assert_eq!(update.energy_level, Some(None));
    }
}
