use crate::catalog::CatalogRecord;
use std::collections::BTreeSet;

/// Genre value some pages render when a record has no genre
pub const PLACEHOLDER_GENRE: &str = "-";

/// Merges the baseline taxonomy with every genre observed on the records
///
/// Values are trimmed; empty strings and [`PLACEHOLDER_GENRE`] are dropped. The
/// result is sorted and free of duplicates.
///
/// # Examples
///
/// ```
/// use reel_sweep::catalog::{aggregate_genres, CatalogRecord};
///
/// let mut record = CatalogRecord::new("Dune", "https://example.com/film/dune");
/// record.genres = vec!["Drama".into(), "Sci-Fi".into(), "".into()];
///
/// let genres = aggregate_genres(&[record], &["Action", "Drama"]);
/// assert_eq!(genres, vec!["Action", "Drama", "Sci-Fi"]);
/// ```
pub fn aggregate_genres<S: AsRef<str>>(records: &[CatalogRecord], baseline: &[S]) -> Vec<String> {
    let observed = records
        .iter()
        .flat_map(|record| record.genres.iter().map(String::as_str));

    baseline
        .iter()
        .map(|genre| genre.as_ref())
        .chain(observed)
        .map(str::trim)
        .filter(|genre| !genre.is_empty() && *genre != PLACEHOLDER_GENRE)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
