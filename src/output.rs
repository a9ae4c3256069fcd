use crate::models::Listing;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Written { json: PathBuf, csv: PathBuf },
    NoData,
}

pub fn json_path(output_dir: impl AsRef<Path>, city: &str) -> PathBuf {
    output_dir.as_ref().join(format!("data_{}.json", city))
}

pub fn csv_path(output_dir: impl AsRef<Path>, city: &str) -> PathBuf {
    output_dir.as_ref().join(format!("data_{}.csv", city))
}

/// Writes `data_<city>.json` and `data_<city>.csv`, replacing earlier runs.
///
/// Nothing is written for an empty collection.
pub fn save_listings(listings: &[Listing], city: &str, output_dir: impl AsRef<Path>) -> Result<SaveOutcome> {
    if listings.is_empty() {
        return Ok(SaveOutcome::NoData);
    }

    let json = json_path(&output_dir, city);
    let csv = csv_path(&output_dir, city);

    save_listings_to_json(listings, &json)?;
    save_listings_to_csv(listings, &csv)?;

    Ok(SaveOutcome::Written { json, csv })
}

pub fn save_listings_to_json(listings: &[Listing], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, listings)
        .with_context(|| format!("Failed to write JSON to {}", output_path.display()))?;
    writer.flush()?;

    info!("Saved {} listings to {}", listings.len(), output_path.display());
    Ok(())
}

pub fn save_listings_to_csv(listings: &[Listing], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;

    // Header row comes from the `Listing` field names.
    let mut writer = csv::Writer::from_writer(file);
    for listing in listings {
        writer
            .serialize(listing)
            .with_context(|| format!("Failed to write CSV row to {}", output_path.display()))?;
    }
    writer.flush()?;

    info!("Saved {} listings to {}", listings.len(), output_path.display());
    Ok(())
}

/// Human-readable report of a run, grouped by location in first-seen order.
pub fn render_summary(listings: &[Listing]) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{:^60}", "---SCRAPED LISTINGS---");
    let _ = writeln!(out, "{}", rule);

    if listings.is_empty() {
        let _ = writeln!(out, "No data was scraped!");
        return out;
    }

    let _ = writeln!(out, "Total listings found: {}", listings.len());

    let mut groups: Vec<(&str, Vec<&Listing>)> = Vec::new();
    for listing in listings {
        match groups.iter_mut().find(|(location, _)| *location == listing.location) {
            Some((_, group)) => group.push(listing),
            None => groups.push((listing.location.as_str(), vec![listing])),
        }
    }

    for (location, group) in groups {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", location);
        let _ = writeln!(out, "{}", "-".repeat(location.chars().count()));
        for listing in group {
            let _ = writeln!(out, "  {}", listing.title);
            let _ = writeln!(out, "     {} DH{}", listing.price, describe_features(listing));
        }
    }

    out
}

fn describe_features(listing: &Listing) -> String {
    let parts: Vec<String> = [
        listing.area.map(|v| format!("{} m²", v)),
        listing.rooms.map(|v| format!("{} rooms", v)),
        listing.bedrooms.map(|v| format!("{} bedrooms", v)),
        listing.bathrooms.map(|v| format!("{} bathrooms", v)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        String::new()
    } else {
        format!(" · {}", parts.join(", "))
    }
}
