//! drand-keystore CLI — `drand-keys` command.
//!
//! Generates the node's identity, imports group files and inspects the
//! key store of a drand participant.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use drand_keystore::storage::{self, CONFIG_FOLDER_FLAG, DEFAULT_FOLDER_NAME};
use drand_keystore::{Category, FileStore, Group, Pair, Store, StoreError};

/// Environment variable consulted when `--homedir` is not given.
const HOME_ENV: &str = "DRAND_HOME";

// ── Directory helpers ─────────────────────────────────────────────────────────

fn base_folder(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var_os("HOME")
        .ok_or_else(|| anyhow!("HOME not set; pass --{CONFIG_FOLDER_FLAG}"))?;
    Ok(PathBuf::from(home).join(DEFAULT_FOLDER_NAME))
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// drand key store CLI — manage the identity key, group file and
/// distributed key material of a drand node.
#[derive(Parser, Debug)]
#[command(name = "drand-keys", about = "drand key store CLI", version)]
struct Cli {
    /// Folder holding the key store (default: $DRAND_HOME or ~/.drand)
    #[arg(long = CONFIG_FOLDER_FLAG, global = true, value_name = "DIR")]
    homedir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new identity key pair
    Keygen {
        /// Address other nodes reach this node at, e.g. 127.0.0.1:8080
        address: String,

        /// The node serves over TLS
        #[arg(long)]
        tls: bool,

        /// Replace an existing key pair
        #[arg(long)]
        force: bool,
    },

    /// Display the stored public identity
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report which material is present, absent or broken
    Check,

    /// Import a group TOML file into the store
    Group {
        /// Path of the group file to import
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let base = match base_folder(cli.homedir) {
        Ok(base) => base,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    // Running without a hardened key folder is never safe.
    let store = match FileStore::new(&base) {
        Ok(store) => store,
        Err(e) => {
            log::error!(
                "something went wrong with the config folder: {e}. \
                 Make sure that you have the appropriate rights."
            );
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Keygen {
            address,
            tls,
            force,
        } => cmd_keygen(&store, &address, tls, force),
        Commands::Show { json } => cmd_show(&store, json),
        Commands::Check => cmd_check(&store),
        Commands::Group { file } => cmd_group(&store, &file),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

// ── Command implementations ───────────────────────────────────────────────────

/// `drand-keys keygen ADDRESS [--tls] [--force]`
fn cmd_keygen(store: &FileStore, address: &str, tls: bool, force: bool) -> Result<()> {
    match store.load_key_pair() {
        Ok(existing) if !force => {
            return Err(anyhow!(
                "a key pair for {} already exists in {} (use --force to replace it)",
                existing.public.address,
                store.key_folder().display()
            ));
        }
        Ok(_) => log::warn!("replacing the existing key pair"),
        Err(e) if e.is_absent() => {}
        Err(e) if force => log::warn!("overwriting unreadable key pair: {e}"),
        Err(e) => return Err(e).context("existing key pair is unreadable"),
    }

    let pair = Pair::generate(address, tls).context("invalid address")?;
    store.save_key_pair(&pair).context("failed to save key pair")?;

    println!("Generated key pair for {address}");
    println!("  Public key: {}", pair.public.key_hex());
    println!("  Private:    {}", store.private_key_file().display());
    println!("  Public:     {}", store.public_key_file().display());
    Ok(())
}

#[derive(Serialize)]
struct IdentityReport<'a> {
    address: &'a str,
    key: String,
    tls: bool,
    file: &'a Path,
}

/// `drand-keys show [--json]`
fn cmd_show(store: &FileStore, json: bool) -> Result<()> {
    let pair = match store.load_key_pair() {
        Err(e) if e.is_absent() => {
            return Err(anyhow!(
                "no key pair in {} (run `drand-keys keygen ADDRESS` first)",
                store.key_folder().display()
            ));
        }
        other => other.context("failed to load key pair")?,
    };

    let report = IdentityReport {
        address: &pair.public.address,
        key: pair.public.key_hex(),
        tls: pair.public.tls,
        file: store.public_key_file(),
    };

    if json {
        let text =
            serde_json::to_string_pretty(&report).context("failed to serialize identity")?;
        println!("{text}");
    } else {
        println!("Identity: {}", report.address);
        println!("  Key:  {}", report.key);
        println!("  TLS:  {}", report.tls);
        println!("  File: {}", report.file.display());
    }
    Ok(())
}

/// State of one category in the store.
enum Status {
    Present(String),
    Absent,
    Broken(String),
}

fn status_of<T>(
    result: drand_keystore::Result<T>,
    describe: impl FnOnce(&T) -> std::result::Result<String, String>,
) -> Status {
    match result {
        Ok(value) => match describe(&value) {
            Ok(summary) => Status::Present(summary),
            Err(problem) => Status::Broken(problem),
        },
        Err(StoreError::Absent(_)) => Status::Absent,
        Err(e) => Status::Broken(e.to_string()),
    }
}

/// `drand-keys check`
fn cmd_check(store: &FileStore) -> Result<()> {
    let mut broken = 0;

    for category in Category::ALL {
        let status = match category {
            Category::KeyPair => status_of(store.load_key_pair(), |pair| {
                if pair.matches_public() {
                    Ok(pair.public.address.clone())
                } else {
                    Err("public key does not match the private key".to_string())
                }
            }),
            Category::Share => {
                status_of(store.load_share(), |share| Ok(format!("index {}", share.index())))
            }
            Category::Group => status_of(store.load_group(), |group| {
                Ok(format!(
                    "{} nodes, threshold {}, hash {}",
                    group.len(),
                    group.threshold,
                    group.hash()
                ))
            }),
            Category::DistPublic => status_of(store.load_dist_public(), |dist| {
                Ok(format!("{} coefficients", dist.coefficients().len()))
            }),
        };

        let path = store.path_of(category).display();
        match status {
            Status::Present(summary) => println!("{category:<24} ok      {summary} ({path})"),
            Status::Absent => println!("{category:<24} absent  ({path})"),
            Status::Broken(problem) => {
                broken += 1;
                println!("{category:<24} BROKEN  {problem}");
            }
        }
    }

    if broken > 0 {
        return Err(anyhow!(
            "{broken} broken item(s) in {}",
            store.base_folder().display()
        ));
    }
    Ok(())
}

/// `drand-keys group FILE`
fn cmd_group(store: &FileStore, file: &Path) -> Result<()> {
    let mut group = Group::default();
    storage::load(file, &mut group)
        .with_context(|| format!("failed to read group file {}", file.display()))?;

    if let Ok(pair) = store.load_key_pair() {
        if !group.contains(&pair.public) {
            log::warn!(
                "this node ({}) is not listed in the imported group",
                pair.public.address
            );
        }
    }

    store.save_group(&group).context("failed to save group")?;

    println!(
        "Imported group of {} nodes (threshold {})",
        group.len(),
        group.threshold
    );
    println!("  Hash: {}", group.hash());
    println!("  File: {}", store.group_file().display());
    Ok(())
}
