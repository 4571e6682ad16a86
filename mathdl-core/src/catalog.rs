// Candidate enumeration for the contest archives

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// A remote document and the place it should land, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    remote_url: String,
    local_path: PathBuf,
}

impl Candidate {
    pub fn new(remote_url: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            remote_url: remote_url.into(),
            local_path: local_path.into(),
        }
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }
}

/// Tournament month. HMMT runs a February and a November event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Feb,
    Nov,
}

impl Month {
    pub fn as_str(&self) -> &'static str {
        match self {
            Month::Feb => "feb",
            Month::Nov => "nov",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One naming convention: the categories used in `month` for every year in `years`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochRule {
    pub month: Month,
    pub years: RangeInclusive<u16>,
    pub categories: Vec<String>,
}

impl EpochRule {
    pub fn new(month: Month, years: RangeInclusive<u16>, categories: &[&str]) -> Self {
        Self {
            month,
            years,
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn matches(&self, year: u16, month: Month) -> bool {
        self.month == month && self.years.contains(&year)
    }
}

/// Ordered epoch table. The first matching rule wins; no match means no categories.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    rules: Vec<EpochRule>,
}

impl CategoryTable {
    pub fn new(rules: Vec<EpochRule>) -> Self {
        Self { rules }
    }

    /// The HMMT archive's historical category codes.
    pub fn hmmt() -> Self {
        Self::new(vec![
            EpochRule::new(Month::Nov, 0..=2010, &["gen1", "gen2", "guts", "team"]),
            EpochRule::new(Month::Nov, 2011..=2024, &["gen", "thm", "guts", "team"]),
            EpochRule::new(
                Month::Feb,
                0..=2010,
                &["alg", "calc", "comb", "geo", "gen1", "gen2", "guts", "team1", "team2"],
            ),
            EpochRule::new(
                Month::Feb,
                2011..=2011,
                &[
                    "algcalc", "algcomb", "alggeo", "calccomb", "calcgeo", "combgeo", "guts",
                    "team1", "team2",
                ],
            ),
            EpochRule::new(
                Month::Feb,
                2012..=2012,
                &["alg", "comb", "geo", "guts", "team1", "team2"],
            ),
            EpochRule::new(Month::Feb, 2013..=2016, &["alg", "comb", "geo", "guts", "team"]),
            EpochRule::new(Month::Feb, 2017..=2025, &["algnt", "comb", "geo", "guts", "team"]),
        ])
    }

    pub fn categories(&self, year: u16, month: Month) -> &[String] {
        self.rules
            .iter()
            .find(|rule| rule.matches(year, month))
            .map(|rule| rule.categories.as_slice())
            .unwrap_or(&[])
    }
}

/// A contest published as one document per year, e.g. AIME or AMC 12.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestSeries {
    pub label: String,
    pub base_url: String,
    pub years: RangeInclusive<u16>,
    /// Local directory, e.g. `AIME`
    pub directory: String,
    /// File name prefix, e.g. `aime` for `aime1990.pdf`
    pub file_prefix: String,
}

impl ContestSeries {
    pub fn candidates(&self) -> Vec<Candidate> {
        let base = self.base_url.trim_end_matches('/');
        self.years
            .clone()
            .map(|year| {
                Candidate::new(
                    format!("{}/{}", base, year),
                    Path::new(&self.directory).join(format!("{}{}.pdf", self.file_prefix, year)),
                )
            })
            .collect()
    }
}

/// A tournament whose papers are split by year, month, category and document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSchedule {
    pub base_url: String,
    /// Local root directory, e.g. `HMMT`
    pub root: String,
    pub years: RangeInclusive<u16>,
    pub months: Vec<Month>,
    pub doc_types: Vec<String>,
    pub rules: CategoryTable,
}

impl TournamentSchedule {
    /// Year, then month, then category, then document type.
    pub fn candidates(&self) -> Vec<Candidate> {
        let base = self.base_url.trim_end_matches('/');
        let mut candidates = Vec::new();

        for year in self.years.clone() {
            for month in &self.months {
                for category in self.rules.categories(year, *month) {
                    for doc_type in &self.doc_types {
                        let url = format!(
                            "{}/{}/{}/{}/{}.pdf",
                            base, year, month, category, doc_type
                        );
                        let local_path = Path::new(&self.root)
                            .join(year.to_string())
                            .join(month.as_str())
                            .join(capitalize(doc_type))
                            .join(format!("{}.pdf", category));
                        candidates.push(Candidate::new(url, local_path));
                    }
                }
            }
        }

        candidates
    }
}

/// Everything one instance knows how to look for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Catalog {
    Series { series: Vec<ContestSeries> },
    Tournament(TournamentSchedule),
}

impl Catalog {
    pub fn candidates(&self) -> Vec<Candidate> {
        match self {
            Catalog::Series { series } => series.iter().flat_map(|s| s.candidates()).collect(),
            Catalog::Tournament(schedule) => schedule.candidates(),
        }
    }
}

/// `problems` -> `Problems`
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> ContestSeries {
        ContestSeries {
            label: "AIME".to_string(),
            base_url: "https://example.test/c3416/".to_string(),
            years: 1999..=2001,
            directory: "AIME".to_string(),
            file_prefix: "aime".to_string(),
        }
    }

    #[test]
    fn test_series_one_candidate_per_year() {
        let candidates = series().candidates();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].remote_url(), "https://example.test/c3416/1999");
        assert_eq!(candidates[0].local_path(), Path::new("AIME/aime1999.pdf"));
        assert_eq!(candidates[2].remote_url(), "https://example.test/c3416/2001");
    }

    #[test]
    fn test_empty_year_range_yields_nothing() {
        let mut s = series();
        s.years = 2001..=1999;
        assert!(s.candidates().is_empty());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("problems"), "Problems");
        assert_eq!(capitalize("solutions"), "Solutions");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let table = CategoryTable::new(vec![
            EpochRule::new(Month::Feb, 2000..=2010, &["first"]),
            EpochRule::new(Month::Feb, 2005..=2015, &["second"]),
        ]);
        assert_eq!(table.categories(2007, Month::Feb), ["first".to_string()]);
        assert_eq!(table.categories(2012, Month::Feb), ["second".to_string()]);
        assert!(table.categories(2007, Month::Nov).is_empty());
    }
}
