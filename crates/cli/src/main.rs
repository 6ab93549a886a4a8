use clap::{Parser, Subcommand};
use medplat_core::{
    CaseRecord, DomainClassifier, GuidelineRegistry, GuidelineTable, KeywordDomainClassifier,
    LmicAdapter, RegionCode, RegionResolver,
};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "medplat")]
#[command(about = "MedPlat guideline and case adaptation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a region code from request headers
    Region {
        /// Header as NAME=VALUE (repeatable)
        #[arg(long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },
    /// Print the guideline set for a region
    Guidelines {
        /// Region name as used in the guideline table
        #[arg(long, default_value = "auto")]
        region: String,
        /// Clinical topic echoed in the result
        #[arg(long, default_value = "")]
        topic: String,
        /// YAML guideline table to use instead of the built-in one
        #[arg(long)]
        guidelines_file: Option<PathBuf>,
    },
    /// Apply LMIC stroke adaptation to a case JSON file
    Adapt {
        /// Path to the case JSON
        case: PathBuf,
        /// Domain tag (repeatable)
        #[arg(long = "domain")]
        domains: Vec<String>,
        /// Region code of the requesting client
        #[arg(long, default_value = "global")]
        region: String,
        /// Add keyword-classified domain tags to the given ones
        #[arg(long)]
        classify: bool,
    },
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Region { headers } => {
            let headers: HashMap<String, String> = headers.into_iter().collect();
            println!("{}", RegionResolver::new().resolve(&headers));
        }
        Commands::Guidelines {
            region,
            topic,
            guidelines_file,
        } => {
            let table = match guidelines_file {
                Some(path) => GuidelineTable::from_path(&path)?,
                None => GuidelineTable::builtin(),
            };
            let set = GuidelineRegistry::new(Arc::new(table)).lookup(&region, &topic);
            println!("{}", serde_json::to_string_pretty(&set)?);
        }
        Commands::Adapt {
            case,
            domains,
            region,
            classify,
        } => {
            let contents = std::fs::read_to_string(&case)?;
            let record: CaseRecord = serde_json::from_str(&contents)?;

            let mut tags: BTreeSet<String> = domains.into_iter().collect();
            if classify {
                tags.extend(KeywordDomainClassifier::default().classify(&record, ""));
            }

            let adapted = LmicAdapter::new().adapt(&record, &tags, &RegionCode::new(region));
            println!("{}", serde_json::to_string_pretty(&adapted)?);
        }
    }

    Ok(())
}
