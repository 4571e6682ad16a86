// Tests for candidate enumeration and the category rule table

use mathdl_core::catalog::{Catalog, CategoryTable, ContestSeries, Month, TournamentSchedule};
use mathdl_core::config::InstanceConfig;
use std::path::Path;

fn categories(year: u16, month: Month) -> Vec<String> {
    CategoryTable::hmmt().categories(year, month).to_vec()
}

fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Category Rule Table Tests
// ============================================================================

#[test]
fn test_feb_2020_categories() {
    assert_eq!(
        categories(2020, Month::Feb),
        strs(&["algnt", "comb", "geo", "guts", "team"])
    );
}

#[test]
fn test_feb_pre_2011_categories() {
    let expected = strs(&["alg", "calc", "comb", "geo", "gen1", "gen2", "guts", "team1", "team2"]);
    assert_eq!(categories(2008, Month::Feb), expected);
    assert_eq!(categories(2010, Month::Feb), expected);
    assert_eq!(categories(1998, Month::Feb), expected);
}

#[test]
fn test_feb_2011_pairwise_categories() {
    assert_eq!(
        categories(2011, Month::Feb),
        strs(&[
            "algcalc", "algcomb", "alggeo", "calccomb", "calcgeo", "combgeo", "guts", "team1",
            "team2"
        ])
    );
}

#[test]
fn test_feb_2012_categories() {
    assert_eq!(
        categories(2012, Month::Feb),
        strs(&["alg", "comb", "geo", "guts", "team1", "team2"])
    );
}

#[test]
fn test_feb_2013_to_2016_categories() {
    for year in 2013..=2016 {
        assert_eq!(
            categories(year, Month::Feb),
            strs(&["alg", "comb", "geo", "guts", "team"]),
            "year {}",
            year
        );
    }
}

#[test]
fn test_feb_2017_boundary() {
    assert_eq!(categories(2016, Month::Feb)[0], "alg");
    assert_eq!(categories(2017, Month::Feb)[0], "algnt");
    assert_eq!(categories(2025, Month::Feb)[0], "algnt");
}

#[test]
fn test_nov_categories() {
    assert_eq!(
        categories(2009, Month::Nov),
        strs(&["gen1", "gen2", "guts", "team"])
    );
    assert_eq!(
        categories(2011, Month::Nov),
        strs(&["gen", "thm", "guts", "team"])
    );
    assert_eq!(
        categories(2024, Month::Nov),
        strs(&["gen", "thm", "guts", "team"])
    );
}

#[test]
fn test_outside_epochs_is_empty() {
    assert!(categories(2025, Month::Nov).is_empty());
    assert!(categories(2026, Month::Feb).is_empty());
    assert!(categories(2026, Month::Nov).is_empty());
    assert!(categories(u16::MAX, Month::Feb).is_empty());
}

#[test]
fn test_empty_table_is_empty() {
    let table = CategoryTable::default();
    assert!(table.categories(2020, Month::Feb).is_empty());
}

// ============================================================================
// Enumeration Tests
// ============================================================================

#[test]
fn test_aops_enumeration_layout() {
    let candidates = InstanceConfig::aops().candidates();

    // AIME 1983-2025, AMC 12 2000-2025
    assert_eq!(candidates.len(), 43 + 26);

    assert_eq!(
        candidates[0].remote_url(),
        "https://artofproblemsolving.com/community/contest/download/c3416/1983"
    );
    assert_eq!(candidates[0].local_path(), Path::new("AIME/aime1983.pdf"));

    let aime_1990 = &candidates[1990 - 1983];
    assert_eq!(aime_1990.local_path(), Path::new("AIME/aime1990.pdf"));

    assert_eq!(
        candidates[43].remote_url(),
        "https://artofproblemsolving.com/community/contest/download/c3415_amc_12/2000"
    );
    assert_eq!(candidates[43].local_path(), Path::new("AMC12/amc2000.pdf"));
    assert_eq!(
        candidates.last().unwrap().local_path(),
        Path::new("AMC12/amc2025.pdf")
    );
}

#[test]
fn test_hmmt_enumeration_count() {
    // feb: 3*9 + 9 + 6 + 4*5 + 9*5 = 107, nov: 3*4 + 14*4 = 68
    let candidates = InstanceConfig::hmmt().candidates();
    assert_eq!(candidates.len(), (107 + 68) * 2);
}

#[test]
fn test_hmmt_enumeration_order() {
    let candidates = InstanceConfig::hmmt().candidates();
    let base = "https://hmmt-archive.s3.amazonaws.com/tournaments";

    assert_eq!(
        candidates[0].remote_url(),
        format!("{}/2008/feb/alg/problems.pdf", base)
    );
    assert_eq!(
        candidates[0].local_path(),
        Path::new("HMMT/2008/feb/Problems/alg.pdf")
    );
    assert_eq!(
        candidates[1].remote_url(),
        format!("{}/2008/feb/alg/solutions.pdf", base)
    );
    assert_eq!(
        candidates[1].local_path(),
        Path::new("HMMT/2008/feb/Solutions/alg.pdf")
    );
    assert_eq!(
        candidates[2].remote_url(),
        format!("{}/2008/feb/calc/problems.pdf", base)
    );

    // feb 2008 has 9 categories, so nov 2008 starts at 18
    assert_eq!(
        candidates[18].remote_url(),
        format!("{}/2008/nov/gen1/problems.pdf", base)
    );

    assert_eq!(
        candidates.last().unwrap().remote_url(),
        format!("{}/2025/feb/team/solutions.pdf", base)
    );
}

#[test]
fn test_enumeration_is_deterministic() {
    for instance in [InstanceConfig::aops(), InstanceConfig::hmmt()] {
        assert_eq!(instance.candidates(), instance.candidates());
    }
}

#[test]
fn test_schedule_outside_epochs_yields_nothing() {
    let schedule = TournamentSchedule {
        base_url: "http://127.0.0.1:1/tournaments".to_string(),
        root: "HMMT".to_string(),
        years: 2030..=2035,
        months: vec![Month::Feb, Month::Nov],
        doc_types: vec!["problems".to_string()],
        rules: CategoryTable::hmmt(),
    };
    assert!(Catalog::Tournament(schedule).candidates().is_empty());
}

#[test]
fn test_series_catalog_concatenates_in_order() {
    let catalog = Catalog::Series {
        series: vec![
            ContestSeries {
                label: "A".to_string(),
                base_url: "http://a.test".to_string(),
                years: 2001..=2002,
                directory: "A".to_string(),
                file_prefix: "a".to_string(),
            },
            ContestSeries {
                label: "B".to_string(),
                base_url: "http://b.test".to_string(),
                years: 1999..=1999,
                directory: "B".to_string(),
                file_prefix: "b".to_string(),
            },
        ],
    };

    let urls: Vec<String> = catalog
        .candidates()
        .iter()
        .map(|c| c.remote_url().to_string())
        .collect();
    assert_eq!(
        urls,
        vec!["http://a.test/2001", "http://a.test/2002", "http://b.test/1999"]
    );
}
