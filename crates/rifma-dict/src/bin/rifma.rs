use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use rifma_dict::config;
use rifma_dict::ingest;
use rifma_dict::lookup::{LookupOptions, LookupResult, lookup_random_word, lookup_word};
use rifma_dict::store::Store;

#[derive(Parser)]
#[command(name = "rifma", about = "A Russian rhyming dictionary")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a Windows-1251 dictionary file into the store.
    Ingest {
        #[arg(long)]
        dict: PathBuf,
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Look up rhymes for a word.
    Lookup {
        query: String,
        #[arg(long)]
        db: Option<PathBuf>,
        #[command(flatten)]
        options: QueryFlags,
    },
    /// Look up rhymes for a uniformly random dictionary word.
    Random {
        #[arg(long)]
        db: Option<PathBuf>,
        #[command(flatten)]
        options: QueryFlags,
    },
}

#[derive(Args)]
struct QueryFlags {
    /// Ignore the final consonant cluster when scoring rhymes.
    #[arg(long)]
    xj: bool,
    /// Treat voicing mismatches as free everywhere.
    #[arg(long)]
    zv: bool,
    /// Merge the unstressed у/а vowel distinction.
    #[arg(long)]
    uu: bool,
    /// Merge the unstressed и/а vowel distinction.
    #[arg(long)]
    yy: bool,
    /// Require this many leading pretonic syllables to match exactly.
    #[arg(long, default_value_t = 0)]
    nu: usize,
}

impl From<QueryFlags> for LookupOptions {
    fn from(f: QueryFlags) -> Self {
        LookupOptions { xj: f.xj, zv: f.zv, uu: f.uu, yy: f.yy, nu: f.nu }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Ingest { dict, db } => {
            let db_path = config::resolve_db_path(db.as_deref());
            let store = Store::open(&db_path)?;
            store.clear()?;
            let total = ingest::ingest_file(&dict, &store)?;
            log::info!("ingested {total} records into {}", db_path.display());
        }
        Command::Lookup { query, db, options } => {
            let store = Store::open(&config::resolve_db_path(db.as_deref()))?;
            let result = lookup_word(&query, &store, &options.into())?;
            print_result(&result);
        }
        Command::Random { db, options } => {
            let store = Store::open(&config::resolve_db_path(db.as_deref()))?;
            let result = lookup_random_word(&store, &options.into())?;
            print_result(&result);
        }
    }
    Ok(())
}

fn print_result(result: &LookupResult) {
    match result {
        LookupResult::Variants { input_pretty, variants } => {
            println!("{input_pretty}: which stress did you mean?");
            for variant in variants {
                println!("  {variant}");
            }
        }
        LookupResult::Rhymes { input_pretty, groups } => {
            println!("rhymes for {input_pretty}:");
            for group in groups {
                let line = group.iter().map(|(text, _)| text.as_str()).collect::<Vec<_>>().join(" ");
                println!("  {line}");
            }
        }
    }
}
