//! easy-invoices - manage the records invoices are built from
//!
//! ## Commands
//!
//! - `list`: List stored ids of a record type
//! - `show`: Print a stored record as JSON
//! - `new`: Create a record interactively
//! - `edit`: Edit a stored record interactively
//! - `delete`: Delete a stored record

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, Level};

use easy_invoices_core::config::DATA_DIR_ENV;
use easy_invoices_core::{
    Catalog, Config, FsRecordStore, Origin, RecordKind, SaveOutcome, Saved, Session,
    TerminalPrompt,
};

#[derive(Parser)]
#[command(name = "easy-invoices")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage companies, contacts, billing options and presets", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Directory holding the record collections
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored ids of a record type
    List {
        #[arg(value_enum)]
        data_type: DataType,
    },

    /// Print a stored record
    Show {
        #[arg(value_enum)]
        data_type: DataType,
        id: String,
    },

    /// Create a record interactively
    New {
        #[arg(value_enum)]
        data_type: DataType,
        /// Id to start from (asked for when omitted)
        id: Option<String>,
    },

    /// Edit a stored record interactively
    Edit {
        #[arg(value_enum)]
        data_type: DataType,
        id: String,
    },

    /// Delete a stored record
    Delete {
        #[arg(value_enum)]
        data_type: DataType,
        id: String,
    },
}

/// Record types addressable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DataType {
    Company,
    Contact,
    Options,
    Preset,
}

impl From<DataType> for RecordKind {
    fn from(value: DataType) -> Self {
        match value {
            DataType::Company => RecordKind::Company,
            DataType::Contact => RecordKind::Contact,
            DataType::Options => RecordKind::Options,
            DataType::Preset => RecordKind::Preset,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    easy_invoices_core::telemetry::init_tracing(cli.json, level);

    let config = Config::resolve(cli.data_dir).context("Failed to resolve data directory")?;
    debug!(data_dir = %config.data_dir.display(), "resolved data directory");

    let catalog = Catalog::global().context("Invalid record declarations")?;
    let store = FsRecordStore::new(&config.data_dir);
    let mut prompt = TerminalPrompt::stdio();
    let mut session = Session::new(catalog, &store, &mut prompt);

    match cli.command {
        Commands::List { data_type } => cmd_list(&session, data_type.into()),
        Commands::Show { data_type, id } => cmd_show(&session, data_type.into(), &id),
        Commands::New { data_type, id } => cmd_new(&mut session, data_type.into(), id.as_deref()),
        Commands::Edit { data_type, id } => cmd_edit(&mut session, data_type.into(), &id),
        Commands::Delete { data_type, id } => cmd_delete(&session, data_type.into(), &id),
    }
}

fn cmd_list(session: &Session<'_>, kind: RecordKind) -> Result<()> {
    let ids = session
        .list(kind)
        .with_context(|| format!("Failed to list {}", kind.collection()))?;

    if ids.is_empty() {
        eprintln!("No {} found", kind.collection());
        return Ok(());
    }
    for id in ids {
        println!("{id}");
    }
    Ok(())
}

fn cmd_show(session: &Session<'_>, kind: RecordKind, id: &str) -> Result<()> {
    let shown = session
        .show(kind, id)
        .with_context(|| format!("Failed to show {} '{id}'", kind.tag()))?;

    println!("{}", serde_json::to_string_pretty(&shown.document)?);
    for dangling in &shown.dangling {
        eprintln!(
            "warning: {} '{}' referenced by '{}' does not exist",
            dangling.target.tag(),
            dangling.id,
            dangling.field
        );
    }
    Ok(())
}

fn cmd_new(session: &mut Session<'_>, kind: RecordKind, id: Option<&str>) -> Result<()> {
    let saved = session
        .create(kind, id)
        .with_context(|| format!("Failed to create {}", kind.tag()))?;
    report(&saved, "created");
    Ok(())
}

fn cmd_edit(session: &mut Session<'_>, kind: RecordKind, id: &str) -> Result<()> {
    let saved = session
        .edit(kind, id)
        .with_context(|| format!("Failed to edit {} '{id}'", kind.tag()))?;
    report(&saved, "updated");
    Ok(())
}

fn cmd_delete(session: &Session<'_>, kind: RecordKind, id: &str) -> Result<()> {
    session
        .delete(kind, id)
        .with_context(|| format!("Failed to delete {} '{id}'", kind.tag()))?;
    println!("deleted {} '{id}'", kind.tag());
    Ok(())
}

fn report(saved: &Saved, verb: &str) {
    for resolution in &saved.resolutions {
        if resolution.origin == Origin::Created {
            println!("new {} created: '{}'", resolution.kind.tag(), resolution.id);
        }
    }
    let tag = saved.kind.tag();
    match saved.outcome {
        SaveOutcome::Created => println!("new {tag} created: '{}'", saved.id),
        SaveOutcome::Overwritten => println!("{tag} '{}' {verb}", saved.id),
        SaveOutcome::Kept => println!("{tag} '{}' left unchanged", saved.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_new_without_id() {
        let cli = Cli::try_parse_from(["easy-invoices", "new", "preset"]).unwrap();
        match cli.command {
            Commands::New { data_type, id } => {
                assert_eq!(data_type, DataType::Preset);
                assert_eq!(id, None);
            }
            _ => panic!("expected new"),
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(Cli::try_parse_from(["easy-invoices", "list", "invoice"]).is_err());
    }

    #[test]
    fn test_data_type_maps_to_stored_kinds() {
        for data_type in DataType::value_variants() {
            assert!(RecordKind::from(*data_type).is_stored());
        }
    }
}
