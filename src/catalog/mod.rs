mod catalog_error;
mod heartrails;

pub use catalog_error::CatalogError;
pub use heartrails::HeartRailsClient;

use std::time::Duration;

use crate::db::catalog::replace_catalog;
use crate::db::connection::Database;
use crate::domain::models::Coordinates;

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStation {
    pub name: String,
    pub location: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogLine {
    pub name: String,
    pub stations: Vec<CatalogStation>,
}

/// Where line and station listings come from.
pub trait StationSource {
    fn lines(&self, prefecture: &str) -> Result<Vec<String>, CatalogError>;
    fn stations(&self, line: &str) -> Result<Vec<CatalogStation>, CatalogError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub lines: usize,
    pub stations: usize,
    pub skipped_lines: Vec<String>,
}

/// Fetch every line of the prefecture with its stations and replace the
/// stored catalog.
///
/// A failed line listing aborts before anything is written. A line whose
/// stations cannot be fetched is skipped (and reported) so one bad line
/// does not lose the rest.
pub fn import_catalog(
    db: &Database,
    source: &dyn StationSource,
    prefecture: &str,
    pause: Duration,
) -> Result<ImportSummary, CatalogError> {
    let names = source.lines(prefecture)?;
    tracing::info!(prefecture, lines = names.len(), "fetched line list");

    let mut lines = Vec::with_capacity(names.len());
    let mut skipped_lines = Vec::new();

    for (i, name) in names.iter().enumerate() {
        match source.stations(name) {
            Ok(stations) => {
                tracing::info!(line = %name, stations = stations.len(), "({}/{}) fetched", i + 1, names.len());
                lines.push(CatalogLine {
                    name: name.clone(),
                    stations,
                });
            }
            Err(e) => {
                tracing::warn!(line = %name, error = %e, "skipping line");
                skipped_lines.push(name.clone());
            }
        }

        if !pause.is_zero() {
            std::thread::sleep(pause);
        }
    }

    let stations = db
        .with_conn(|conn| replace_catalog(conn, &lines))
        .map_err(|e| CatalogError::Store(e.to_string()))?;

    Ok(ImportSummary {
        lines: lines.len(),
        stations,
        skipped_lines,
    })
}
