use clap::{Parser, Subcommand, ValueEnum};
use memberday_core::Dataset;
use memberday_scraper::{HolidayExtractor, PageClient, PartyWorldExtractor};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "memberday-cli")]
#[command(about = "Scrape KTV member-day calendars from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch one source page and print the extracted calendar as JSON.
    Scrape {
        #[arg(value_enum)]
        site: Site,

        /// Override the configured source URL.
        #[arg(long)]
        url: Option<String>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Site {
    Holiday,
    PartyWorld,
}

impl From<Site> for Dataset {
    fn from(site: Site) -> Self {
        match site {
            Site::Holiday => Dataset::Holiday,
            Site::PartyWorld => Dataset::PartyWorld,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = memberday_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape { site, url, pretty } => {
            let client = PageClient::new(
                config.scraper_request_timeout_secs,
                &config.scraper_user_agent,
            )?;
            let dataset = Dataset::from(site);
            let url = url.unwrap_or_else(|| match dataset {
                Dataset::Holiday => config.holiday_url.clone(),
                Dataset::PartyWorld => config.party_world_url.clone(),
            });
            tracing::info!(%dataset, url = %url, "scraping");

            let json = match dataset {
                Dataset::Holiday => {
                    to_json(&client.scrape(&url, &HolidayExtractor).await?, pretty)?
                }
                Dataset::PartyWorld => {
                    to_json(&client.scrape(&url, &PartyWorldExtractor).await?, pretty)?
                }
            };
            println!("{json}");
        }
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
