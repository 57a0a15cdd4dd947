//! samyama-quadstore: command-line administration of a quad store
//!
//! Opens the backend named by `--config` (YAML) or `--data` (RocksDB
//! directory), or a throwaway in-memory store when neither is given.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use samyama_quadstore::rdf::{is_default_iri, is_default_prefix};
use samyama_quadstore::rdf::serialization::{
    export_nquads, export_ntriples, import_nquads, import_ntriples,
};
use samyama_quadstore::{
    BlankNode, GraphName, GraphScope, NamedNode, RdfFormat, StoreConfig, StoreRegistry,
};
use serde_json::json;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "samyama-quadstore", version, about = "Samyama RDF quad store CLI")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "SAMYAMA_QUADSTORE_CONFIG")]
    config: Option<PathBuf>,

    /// RocksDB data directory (overrides the configured backend)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Store id
    #[arg(long, global = true)]
    store: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Syntax {
    Nt,
    Nq,
}

impl From<Syntax> for RdfFormat {
    fn from(syntax: Syntax) -> Self {
        match syntax {
            Syntax::Nt => RdfFormat::NTriples,
            Syntax::Nq => RdfFormat::NQuads,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load an N-Triples or N-Quads file
    Import {
        file: PathBuf,

        /// Context for N-Triples input (IRI or _:id); default context if omitted
        #[arg(long)]
        context: Option<String>,

        /// Input syntax; guessed from the file extension if omitted
        #[arg(long)]
        syntax: Option<Syntax>,
    },
    /// Write the store (N-Quads) or one context (N-Triples)
    Export {
        /// Output file; stdout if omitted
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Export only this context as N-Triples
        #[arg(long)]
        context: Option<String>,
    },
    /// Count quads in the store or in one context
    Count {
        #[arg(long)]
        context: Option<String>,
    },
    /// List contexts holding at least one quad
    Contexts,
    /// Remove every quad of the store or of one context
    Clear {
        #[arg(long)]
        context: Option<String>,
    },
    /// List namespace bindings
    Namespaces,
    /// Bind a prefix to a namespace IRI
    Bind { prefix: String, iri: String },
}

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let registry = open_registry(cli.config.as_deref(), cli.data)?;
    let store_id = cli.store.as_deref();

    match cli.command {
        Commands::Import {
            file,
            context,
            syntax,
        } => {
            let format = match syntax {
                Some(syntax) => syntax.into(),
                None => file
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(RdfFormat::from_extension)
                    .with_context(|| {
                        format!("cannot tell the syntax of {}; pass --syntax", file.display())
                    })?,
            };
            let reader = BufReader::new(
                File::open(&file).with_context(|| format!("opening {}", file.display()))?,
            );
            let context = parse_context(context.as_deref())?;
            let added = match format {
                RdfFormat::NTriples => {
                    import_ntriples(&registry.get_named_graph(context, store_id)?, reader)?
                }
                RdfFormat::NQuads => {
                    let conj = registry.get_conjunctive_graph(store_id, Some(context))?;
                    import_nquads(&conj, reader)?
                }
            };
            report(&cli.format, "added", added)
        }
        Commands::Export { output, context } => {
            let writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(path).with_context(|| format!("creating {}", path.display()))?,
                )),
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };
            let written = match context {
                Some(context) => {
                    let graph = registry.get_named_graph(parse_context(Some(&context))?, store_id)?;
                    export_ntriples(&graph, writer)?
                }
                None => export_nquads(&registry.get_conjunctive_graph(store_id, None)?, writer)?,
            };
            if output.is_some() {
                report(&cli.format, "written", written)?;
            }
            Ok(())
        }
        Commands::Count { context } => {
            let count = match context {
                Some(context) => registry
                    .get_named_graph(parse_context(Some(&context))?, store_id)?
                    .len()?,
                None => registry.get_conjunctive_graph(store_id, None)?.len()?,
            };
            report(&cli.format, "count", count)
        }
        Commands::Contexts => {
            let conj = registry.get_conjunctive_graph(store_id, None)?;
            let mut rows = Vec::new();
            for context in conj.contexts()? {
                let size = conj.get_context(context.clone()).len()?;
                rows.push((context.to_string(), size));
            }
            rows.sort();

            match cli.format {
                OutputFormat::Json => {
                    let items: Vec<_> = rows
                        .iter()
                        .map(|(context, size)| json!({ "context": context, "quads": size }))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&items)?);
                }
                OutputFormat::Table => {
                    let mut table = new_table(&["Context", "Quads"]);
                    for (context, size) in &rows {
                        table.add_row(vec![context.clone(), size.to_string()]);
                    }
                    println!("{}", table);
                    println!("{} context(s)", rows.len());
                }
            }
            Ok(())
        }
        Commands::Clear { context } => {
            let scope = match context {
                Some(context) => GraphScope::Graph(parse_context(Some(&context))?),
                None => GraphScope::All,
            };
            let removed = registry.open(store_id)?.clear(&scope)?;
            report(&cli.format, "removed", removed)
        }
        Commands::Namespaces => {
            let graph = registry.get_conjunctive_graph(store_id, None)?;
            let namespaces: Vec<_> = graph.namespaces()?.collect();

            match cli.format {
                OutputFormat::Json => {
                    let items: Vec<_> = namespaces
                        .iter()
                        .map(|ns| json!({ "prefix": ns.prefix, "iri": ns.iri.as_str() }))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&items)?);
                }
                OutputFormat::Table => {
                    let mut table = new_table(&["Prefix", "IRI"]);
                    for ns in &namespaces {
                        table.add_row(vec![ns.prefix.clone(), ns.iri.as_str().to_string()]);
                    }
                    println!("{}", table);
                }
            }
            Ok(())
        }
        Commands::Bind { prefix, iri } => {
            let iri = NamedNode::new(&iri)?;
            if is_default_prefix(&prefix) || is_default_iri(iri.as_str()) {
                eprintln!("Note: default bindings are fixed; '{}' left unchanged", prefix);
            }
            let manager = registry.get_conjunctive_graph(store_id, None)?.namespace_manager();
            manager.bind(&prefix, &iri)?;
            Ok(())
        }
    }
}

fn open_registry(config: Option<&Path>, data: Option<PathBuf>) -> Result<StoreRegistry> {
    let mut config = match config {
        Some(path) => StoreConfig::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(data) = data {
        config = StoreConfig {
            default_store_id: config.default_store_id,
            ..StoreConfig::rocksdb(data)
        };
    }
    Ok(StoreRegistry::from_config(&config)?)
}

/// `_:id` names a blank-node context, anything else must be an IRI
fn parse_context(context: Option<&str>) -> Result<GraphName> {
    match context {
        None => Ok(GraphName::DefaultGraph),
        Some("") => bail!("empty context name"),
        Some(id) if id.starts_with("_:") => Ok(BlankNode::from_id(&id[2..])?.into()),
        Some(iri) => Ok(NamedNode::new(iri)?.into()),
    }
}

fn report(format: &OutputFormat, key: &str, value: usize) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let mut object = serde_json::Map::new();
            object.insert(key.to_string(), json!(value));
            println!("{}", serde_json::Value::Object(object));
        }
        OutputFormat::Table => println!("{}: {}", key, value),
    }
    Ok(())
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}
