//! Command-line front end: inspect and edit a record JSON export.
//!
//! Record numbers are 1-based as in `list`; layer indices are 0-based.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pktedit::bridge::{import_into, JsonImporter};
use pktedit::json_edit::{get, parse_value, segment_for, to_pretty, Edit, KeyPath};
use pktedit::layer_edit::{bytes_of, field_summary, tree_of, BytesTarget, FieldDraft, TreeTarget};
use pktedit::raw_bytes::format_hex;
use pktedit::{classify, IndexedRecord, RecordStore, StoreOptions};

#[derive(Parser)]
#[command(name = "pktedit")]
#[command(about = "Inspect and edit captured protocol records", long_about = None)]
#[command(version)]
struct Cli {
    /// Record JSON export to read.
    records: PathBuf,

    /// Write the edited records here instead of printing the edited layer.
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Create missing intermediate maps on insert.
    #[arg(long, global = true)]
    create_missing: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum TreeField {
    Data,
    Headers,
}

impl From<TreeField> for TreeTarget {
    fn from(field: TreeField) -> Self {
        match field {
            TreeField::Data => TreeTarget::Data,
            TreeField::Headers => TreeTarget::Headers,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BytesField {
    Load,
    Body,
}

impl From<BytesField> for BytesTarget {
    fn from(field: BytesField) -> Self {
        match field {
            BytesField::Load => BytesTarget::Load,
            BytesField::Body => BytesTarget::Body,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the record table.
    List,
    /// Print every layer of one record with its capability.
    Show { record: usize },
    /// Print the tree under a layer field, or one node of it.
    Get {
        record: usize,
        layer: usize,
        field: TreeField,
        #[arg(default_value = "")]
        pointer: String,
    },
    /// Overwrite one node with a JSON value.
    Set {
        record: usize,
        layer: usize,
        field: TreeField,
        pointer: String,
        value: String,
    },
    /// Insert a JSON value under a parent node.
    Insert {
        record: usize,
        layer: usize,
        field: TreeField,
        parent: String,
        key: String,
        value: String,
    },
    /// Remove one node.
    Delete {
        record: usize,
        layer: usize,
        field: TreeField,
        pointer: String,
    },
    /// Replace a byte payload with hex text.
    Hex {
        record: usize,
        layer: usize,
        field: BytesField,
        hex: Option<String>,
    },
    /// Edit fields of a structured layer as `key=<json>` pairs.
    Fields {
        record: usize,
        layer: usize,
        assignments: Vec<String>,
    },
}

fn record_index(number: usize) -> Result<usize, String> {
    number
        .checked_sub(1)
        .ok_or_else(|| "record numbers start at 1".to_string())
}

fn pointer(text: &str) -> Result<KeyPath, Box<dyn Error>> {
    Ok(KeyPath::parse_pointer_relaxed(text)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut store = RecordStore::new(StoreOptions {
        create_missing: cli.create_missing,
    });
    let capture = fs::read(&cli.records)?;
    import_into(&mut store, &mut JsonImporter, &capture)?;

    let edited = match cli.command {
        Command::List => {
            for row in store.rows() {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    row.number, row.timestamp, row.source, row.destination, row.length, row.protocol
                );
            }
            None
        }
        Command::Show { record } => {
            let selected = store.select(record_index(record)?)?;
            for (i, layer) in selected.record.layers.iter().enumerate() {
                println!(
                    "{i}\t{}\t{}\t{}",
                    layer.name,
                    classify(layer).as_str(),
                    field_summary(layer)
                );
            }
            None
        }
        Command::Get {
            record,
            layer,
            field,
            pointer: text,
        } => {
            let doc = tree_of(store.layer(record_index(record)?, layer)?, field.into())?;
            println!("{}", to_pretty(get(doc, &pointer(&text)?)?));
            None
        }
        Command::Set {
            record,
            layer,
            field,
            pointer: text,
            value,
        } => {
            let edit = Edit::Set {
                path: pointer(&text)?,
                value: parse_value(&value)?,
            };
            Some(store.apply_tree_edit(record_index(record)?, layer, field.into(), &edit)?)
        }
        Command::Insert {
            record,
            layer,
            field,
            parent,
            key,
            value,
        } => {
            let index = record_index(record)?;
            let parent = pointer(&parent)?;
            let doc = tree_of(store.layer(index, layer)?, field.into())?;
            let key = if store.options().create_missing && get(doc, &parent).is_err() {
                key.as_str().into()
            } else {
                segment_for(doc, &parent, &key)?
            };
            let edit = Edit::Insert {
                parent,
                key,
                value: parse_value(&value)?,
            };
            Some(store.apply_tree_edit(index, layer, field.into(), &edit)?)
        }
        Command::Delete {
            record,
            layer,
            field,
            pointer: text,
        } => {
            let edit = Edit::Delete {
                path: pointer(&text)?,
            };
            Some(store.apply_tree_edit(record_index(record)?, layer, field.into(), &edit)?)
        }
        Command::Hex {
            record,
            layer,
            field,
            hex,
        } => {
            let index = record_index(record)?;
            match hex {
                Some(text) => Some(store.apply_hex_edit(index, layer, field.into(), &text)?),
                None => {
                    let bytes = bytes_of(store.layer(index, layer)?, field.into())?;
                    println!("{}", format_hex(&bytes));
                    None
                }
            }
        }
        Command::Fields {
            record,
            layer,
            assignments,
        } => {
            let index = record_index(record)?;
            let mut draft = FieldDraft::from_layer(store.layer(index, layer)?)?;
            if assignments.is_empty() {
                for (key, text) in draft.fields() {
                    println!("{key}={text}");
                }
                None
            } else {
                for assignment in &assignments {
                    let (key, text) = assignment
                        .split_once('=')
                        .ok_or_else(|| format!("expected key=<json>, got {assignment:?}"))?;
                    draft.set_field(key, text)?;
                }
                Some(store.apply_field_draft(index, layer, &draft)?)
            }
        }
    };

    if let Some(indexed) = edited {
        write_result(&store, &indexed, cli.output.as_ref())?;
    }
    Ok(())
}

fn write_result(
    store: &RecordStore,
    indexed: &IndexedRecord,
    output: Option<&PathBuf>,
) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            let text = serde_json::to_string_pretty(store.records())?;
            fs::write(path, text)?;
            log::info!("wrote {} records to {}", store.len(), path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&indexed.record)?),
    }
    Ok(())
}
