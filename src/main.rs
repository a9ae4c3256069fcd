use anyhow::Result;
use clap::Parser;
use indicatif::ProgressBar;
use mubawabfinder::fetcher::BASE_URL;
use mubawabfinder::models::{City, Language};
use mubawabfinder::output::{self, SaveOutcome};
use mubawabfinder::pagination::{self, run_scraper, ScrapingOptions};
use mubawabfinder::{logging, prompt};
use std::io::{self, IsTerminal};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Mubawabfinder - Property Scraper for mubawab.ma")]
struct Args {
    /// Listing language; asked interactively when omitted
    #[clap(short, long, value_enum)]
    language: Option<Language>,

    /// City to scrape; asked interactively when omitted
    #[clap(short, long, value_enum)]
    city: Option<City>,

    /// Directory receiving data_<city>.json and data_<city>.csv
    #[clap(short, long, default_value = ".")]
    output_dir: String,

    /// Stop after this many pages even if new listings keep coming
    #[clap(short, long)]
    max_pages: Option<u32>,

    /// Portal root URL
    #[clap(long, default_value = BASE_URL)]
    base_url: String,

    /// Enable debug output
    #[clap(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let progress = if !args.debug && io::stderr().is_terminal() {
        pagination::spinner()
    } else {
        ProgressBar::hidden()
    };
    logging::init(args.debug, &progress);

    println!("--------Mubawab Scraper--------");

    let language = match args.language {
        Some(language) => language,
        None => prompt::select_language(&mut io::stdin().lock(), &mut io::stdout())?,
    };
    let city = match args.city {
        Some(city) => city,
        None => prompt::select_city(&mut io::stdin().lock(), &mut io::stdout(), language)?,
    };

    let options = ScrapingOptions {
        base_url: args.base_url,
        language,
        city,
        output_dir: args.output_dir,
        max_pages: args.max_pages,
        ..ScrapingOptions::default()
    };

    println!("\nScraping {} listings...", city);
    let run = run_scraper(&options, &progress)?;

    println!();
    print!("{}", output::render_summary(&run.listings));

    match output::save_listings(&run.listings, city.slug(), &options.output_dir)? {
        SaveOutcome::Written { json, csv } => {
            println!("\n=== Summary ===");
            println!("Pages fetched: {}", run.pages_fetched);
            println!("Listings saved: {}", run.listings.len());
            println!("Incomplete cards skipped: {}", run.rejected);
            println!("Saved to: {} and {}", json.display(), csv.display());
        }
        SaveOutcome::NoData => {
            println!("\nNo listings scraped after {} page(s); no files written.", run.pages_fetched);
        }
    }

    Ok(())
}
