// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use tripintent_core::store::{
    load_custom_aliases, load_my_location, load_smart_settings, persist_my_location,
    remove_custom_alias, save_smart_settings, upsert_custom_alias,
};
use tripintent_core::suggest::DEFAULT_QUICK_ACTIONS;
use tripintent_core::{
    load_catalog, near_me_row, quick_actions, sample_catalog, AliasTable, CatalogItem,
    IntentIndex, JsonFileStore, Level, MyLocation, SmartSettings,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog JSON (array of items); the bundled sample is used when absent
    #[arg(long, env = "TRIPINTENT_CATALOG")]
    catalog: Option<PathBuf>,

    /// Settings file holding aliases, the smart-alias flag and my location
    #[arg(long, env = "TRIPINTENT_STORE")]
    store: Option<PathBuf>,

    /// -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parsed intent as JSON
    Parse {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show the suggestion row for a query
    Suggest {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// "Hotels in <city>" shortcuts for the busiest cities
    Quick {
        #[arg(long, default_value_t = DEFAULT_QUICK_ACTIONS)]
        limit: usize,
    },
    /// Manage custom location aliases
    Alias {
        #[command(subcommand)]
        action: AliasCommand,
    },
    /// Show or set smart alias resolution
    Smart { state: Option<Switch> },
    /// Set or clear the location used for "near me"
    Locate {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        province: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long, conflicts_with_all = ["city", "province", "country"])]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum AliasCommand {
    /// List custom aliases (add --builtin for the shipped table too)
    List {
        #[arg(long)]
        builtin: bool,
    },
    /// Add or replace an alias, e.g. `alias add cbd --level city "Cape Town"`
    Add {
        key: String,
        #[arg(long, default_value = "city")]
        level: Level,
        value: String,
    },
    Remove { key: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

fn read_catalog(path: Option<&PathBuf>) -> Result<Vec<CatalogItem>> {
    match path {
        Some(path) => {
            load_catalog(path).with_context(|| format!("Failed to load catalog {:?}", path))
        }
        None => sample_catalog().context("Bundled sample catalog is invalid"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let store_path = cli.store.clone().unwrap_or_else(JsonFileStore::default_path);
    let mut settings = JsonFileStore::open(&store_path)
        .with_context(|| format!("Failed to open settings {:?}", store_path))?;
    log::debug!("[Intent] Using settings at {:?}", settings.path());

    match &cli.command {
        Commands::Parse { query } => {
            let catalog = read_catalog(cli.catalog.as_ref())?;
            let text = query.join(" ");
            let custom = load_custom_aliases(&settings);
            let smart = load_smart_settings(&settings);
            let mine = load_my_location(&settings);
            let index = IntentIndex::build(&catalog, smart.smart_aliases, &custom);
            let parsed = index.parse(&text, Some(&mine));
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Commands::Suggest { query } => {
            let catalog = read_catalog(cli.catalog.as_ref())?;
            let text = query.join(" ");
            let custom = load_custom_aliases(&settings);
            let smart = load_smart_settings(&settings);
            let mine = load_my_location(&settings);
            let index = IntentIndex::build(&catalog, smart.smart_aliases, &custom);

            match index.suggest(&text, Some(&mine)) {
                Some(s) => {
                    println!("{}  [{}]", s.label, s.meta());
                    println!("  ?{}", s.params.to_query_string());
                }
                None => println!("No suggestion for '{}'", text),
            }
            if let Some(row) = near_me_row(&text, Some(&mine)) {
                println!("{}  [{}]", row.label(), row.meta());
            }
        }
        Commands::Quick { limit } => {
            let catalog = read_catalog(cli.catalog.as_ref())?;
            let actions = quick_actions(&catalog, *limit);
            if actions.is_empty() {
                println!("No cities in catalog");
            }
            for action in actions {
                println!("{}  ?{}", action.label, action.params.to_query_string());
            }
        }
        Commands::Alias { action } => match action {
            AliasCommand::List { builtin } => {
                let custom = load_custom_aliases(&settings);
                if custom.is_empty() {
                    println!("No custom aliases");
                }
                for record in &custom {
                    println!("{:<20} {}", record.key, record.location());
                }
                if *builtin {
                    println!();
                    for (key, location) in AliasTable::builtin().iter() {
                        println!("{:<20} {}", key, location);
                    }
                }
            }
            AliasCommand::Add { key, level, value } => {
                let record = upsert_custom_alias(&mut settings, key, *level, value)?;
                println!("Saved: {} -> {}", record.key, record.location());
            }
            AliasCommand::Remove { key } => {
                if remove_custom_alias(&mut settings, key)? {
                    println!("Removed: {}", key.trim().to_lowercase());
                } else {
                    println!("No custom alias matching '{}'", key);
                }
            }
        },
        Commands::Smart { state } => {
            if let Some(state) = state {
                let smart_aliases = matches!(state, Switch::On);
                save_smart_settings(&mut settings, SmartSettings { smart_aliases })?;
            }
            let on = load_smart_settings(&settings).smart_aliases;
            println!("Smart aliases: {}", if on { "on" } else { "off" });
        }
        Commands::Locate {
            city,
            province,
            country,
            clear,
        } => {
            if *clear {
                persist_my_location(&mut settings, &MyLocation::default())?;
            } else if city.is_some() || province.is_some() || country.is_some() {
                let mine = MyLocation {
                    city: city.clone(),
                    province: province.clone(),
                    country: country.clone(),
                };
                persist_my_location(&mut settings, &mine)?;
            }
            let mine = load_my_location(&settings);
            match mine.preferred().value() {
                Some(value) => println!("My location: {}", value),
                None => println!("My location: not set"),
            }
        }
    }

    Ok(())
}
