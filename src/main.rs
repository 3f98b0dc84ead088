use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use relquery::config::{CompilerConfig, ConfigOverrides};
use relquery::graph_catalog::{RegistryConfig, RelationshipRegistry};
use relquery::relationship_query::{RawSpecification, RelationshipQuery};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// relquery - compile a related-object filter into SQL join/where fragments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON filter specification file, `-` reads stdin
    #[arg(long, default_value = "-")]
    spec: String,

    /// YAML relationship registry. Without it nothing resolves.
    #[arg(long)]
    registry: Option<PathBuf>,

    /// YAML compiler config (defaults to RELQUERY_* environment variables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Object kind of the rows being filtered
    #[arg(long)]
    base_kind: Option<String>,

    /// Table the enclosing query selects from
    #[arg(long)]
    base_table: Option<String>,

    /// Id column of the base table
    #[arg(long)]
    base_key: Option<String>,

    /// Prefix for relationship tables, used when the registry file has none
    #[arg(long)]
    table_prefix: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Fail instead of dropping valid segments whose type is not registered
    #[arg(long)]
    strict: bool,
}

impl From<&Cli> for ConfigOverrides {
    fn from(cli: &Cli) -> Self {
        ConfigOverrides {
            base_kind: cli.base_kind.clone(),
            base_table: cli.base_table.clone(),
            base_key: cli.base_key.clone(),
            table_prefix: cli.table_prefix.clone(),
        }
    }
}

fn load_config(cli: &Cli) -> Result<CompilerConfig> {
    let mut config = match &cli.config {
        Some(path) => CompilerConfig::from_yaml_file(path)
            .with_context(|| format!("loading compiler config {}", path.display()))?,
        None => CompilerConfig::from_env().context("reading RELQUERY_* environment")?,
    };
    config
        .merge(ConfigOverrides::from(cli))
        .context("applying command-line overrides")?;
    Ok(config)
}

fn load_registry(cli: &Cli, config: &CompilerConfig) -> Result<RelationshipRegistry> {
    match &cli.registry {
        Some(path) => {
            let registry = RegistryConfig::from_yaml_file(path)
                .and_then(|rc| rc.to_registry_with_default_prefix(&config.table_prefix))
                .with_context(|| format!("loading registry {}", path.display()))?;
            Ok(registry)
        }
        None => {
            log::warn!("No --registry given; every segment will be dropped");
            Ok(RelationshipRegistry::new(config.table_prefix.clone())?)
        }
    }
}

fn read_spec(source: &str) -> Result<RawSpecification> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading specification from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("reading specification {}", source))?
    };
    Ok(RawSpecification::from_json_str(&text)?)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let context = config.query_context();
    let registry = load_registry(&cli, &config)?;
    let spec = read_spec(&cli.spec)?;

    let query = RelationshipQuery::new(spec, &registry, &context);
    if cli.strict {
        query.check_resolved(&registry, &context)?;
    }

    match cli.format {
        OutputFormat::Text => {
            println!("join:{}", query.join_fragment());
            println!("where:{}", query.where_fragment());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&query.fragments())?);
        }
    }
    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();

    // Defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
