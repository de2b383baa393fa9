use std::{num::NonZeroU32, process::ExitCode};

use bibfetch::{
  clients::arxiv::{ARXIV_API_URL, DEFAULT_MAX_ATTEMPTS},
  format,
  metadata::{self, ErrorRecord},
  ArxivClient, CitationConfig,
};
use clap::{builder::ArgAction, Parser};
use console::style;
use errors::CliError;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod errors;

#[derive(Parser)]
#[command(author, version, about = "Fetch arXiv metadata and print it with a BibTeX citation")]
struct Cli {
  /// Verbose mode (-v, -vv, -vvv)
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// arXiv identifier, e.g. 2304.00123
  identifier: Option<String>,

  /// Total number of attempts before giving up
  #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
  max_attempts: NonZeroU32,

  /// Query endpoint of the arXiv export API
  #[arg(long, default_value = ARXIV_API_URL)]
  endpoint: String,

  /// Subject classification written as the citation's primaryClass
  #[arg(long, default_value = "cs.LG")]
  primary_class: String,
}

/// Setup logging with the specified verbosity level
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true)
    .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode, CliError> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let Some(identifier) = cli.identifier.as_deref().map(str::trim).filter(|id| !id.is_empty())
  else {
    eprintln!("{} bibfetch <arxiv_id>", style("Usage:").bold());
    return Ok(ExitCode::FAILURE);
  };

  let client =
    ArxivClient::new().with_endpoint(&cli.endpoint)?.with_max_attempts(cli.max_attempts);
  let config = CitationConfig { primary_class: cli.primary_class, ..Default::default() };
  trace!("Using endpoint {} with {} attempts", cli.endpoint, cli.max_attempts);

  let record = client.fetch_metadata(identifier).await;
  debug!("Fetch result: {record:?}");

  if record.is_err() {
    println!("{}", metadata::to_json(&record)?);
    return Ok(ExitCode::SUCCESS);
  }

  let citation = match format::format_citation(&record, &config) {
    Ok(citation) => citation,
    Err(error) => {
      println!("{}", serde_json::to_string_pretty(&ErrorRecord::from(&error))?);
      return Ok(ExitCode::FAILURE);
    },
  };

  println!("{}", style("--- Metadata ---").bold());
  println!("{}", metadata::to_json(&record)?);
  println!("\n{}", style("--- BibTeX ---").bold());
  println!("{citation}");
  Ok(ExitCode::SUCCESS)
}
