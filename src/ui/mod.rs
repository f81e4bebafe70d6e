//! Terminal report for finished runs.

use comfy_table::{Attribute, Cell, CellAlignment, Table};
use owo_colors::OwoColorize;
use std::collections::{BTreeMap, BTreeSet};

use crate::analytics::{AuthorReport, Overlap};
use crate::models::{AffiliationTally, Classification, ManualCheckList, PaperBreakdown};
use crate::pipeline::{AffiliationReport, AuthorCensus, RunOutcome};

/// Members listed inline before an overlap is abbreviated.
const MAX_MEMBERS_SHOWN: usize = 8;

/// Institutions per year and class shown in the affiliation table.
const TOP_INSTITUTIONS: usize = 10;

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

pub fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Author { census, report } => print_author_report(census, report),
        RunOutcome::Affiliation(report) => print_affiliation_report(report),
    }
}

pub fn print_author_report(census: &AuthorCensus, report: &AuthorReport) {
    print_section("Authors");
    if census.from_cache {
        println!("{}", "(loaded from author_info.json)".dimmed());
    }
    println!("{}", year_size_table(&report.year_sizes));
    print_failures(census);

    print_section("Multiple profile authors");
    if report.multi_profile.is_empty() {
        println!("{}", "none".dimmed());
    } else {
        println!("{}", multi_profile_table(&report.multi_profile));
    }

    print_section("Attendee overlap (names)");
    println!("{}", overlap_table(&report.name_overlaps));

    print_section("Attendee overlap (ids)");
    println!("{}", overlap_table(&report.id_overlaps));

    print_manual(&census.manual);
}

pub fn print_affiliation_report(report: &AffiliationReport) {
    print_section("Papers");
    println!("{}", paper_table(&report.papers));

    print_section("Profile affiliations");
    println!("{}", tally_table(&report.tally, TOP_INSTITUTIONS));
    println!(
        "{} academic institution match(es) across all papers",
        report.universities.len().to_string().bold()
    );

    print_manual(&report.manual);
}

fn print_failures(census: &AuthorCensus) {
    for (year, failure) in census.failures() {
        println!("{} {} incomplete: {}", "⚠".yellow().bold(), year, failure);
    }
}

fn print_manual(manual: &ManualCheckList) {
    if manual.is_empty() {
        return;
    }
    print_section("Manual check");
    for entry in manual.iter() {
        println!("  {} {}", entry.url, format!("({})", entry.reason).dimmed());
    }
}

fn header(table: &mut Table, columns: &[&str]) {
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(
        columns
            .iter()
            .map(|c| Cell::new(c).add_attribute(Attribute::Bold)),
    );
}

fn count_cell(count: impl ToString) -> Cell {
    Cell::new(count.to_string()).set_alignment(CellAlignment::Right)
}

fn year_size_table(sizes: &BTreeMap<String, usize>) -> Table {
    let mut table = Table::new();
    header(&mut table, &["Year", "Distinct names"]);
    for (year, size) in sizes {
        table.add_row(vec![Cell::new(year), count_cell(size)]);
    }
    table
}

fn multi_profile_table(authors: &BTreeMap<String, BTreeSet<String>>) -> Table {
    let mut table = Table::new();
    header(&mut table, &["Name", "Ids"]);
    for (name, ids) in authors {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(ids.iter().cloned().collect::<Vec<_>>().join(", ")),
        ]);
    }
    table
}

fn overlap_table(overlaps: &[Overlap]) -> Table {
    let mut table = Table::new();
    header(&mut table, &["Years", "Count", "Members"]);
    for overlap in overlaps {
        table.add_row(vec![
            Cell::new(&overlap.label),
            count_cell(overlap.count()),
            Cell::new(abbreviate(&overlap.members, MAX_MEMBERS_SHOWN)),
        ]);
    }
    table
}

fn paper_table(papers: &BTreeMap<String, PaperBreakdown>) -> Table {
    let mut table = Table::new();
    header(&mut table, &["Year", "Papers", "Academia only", "Industry involved"]);
    for (year, breakdown) in papers {
        table.add_row(vec![
            Cell::new(year),
            count_cell(breakdown.total),
            count_cell(breakdown.academia_only),
            count_cell(breakdown.industry_involved()),
        ]);
    }
    table
}

fn tally_table(tally: &AffiliationTally, top: usize) -> Table {
    let mut table = Table::new();
    header(&mut table, &["Year", "Class", "Institution", "Count"]);
    for year in tally.years() {
        for class in [Classification::Academia, Classification::Other] {
            let Some(counts) = tally.by_class(class).remove(year) else {
                continue;
            };
            let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            for (institution, count) in ranked.into_iter().take(top) {
                table.add_row(vec![
                    Cell::new(year),
                    Cell::new(class),
                    Cell::new(institution),
                    count_cell(count),
                ]);
            }
        }
    }
    table
}

/// Join up to `max` members, noting how many were left out.
fn abbreviate(members: &BTreeSet<String>, max: usize) -> String {
    let shown: Vec<&str> = members.iter().take(max).map(String::as_str).collect();
    let mut text = shown.join(", ");
    if members.len() > max {
        text.push_str(&format!(", … (+{})", members.len() - max));
    }
    text
}
