use super::types::CatalogSummary;
use itertools::Itertools;
use std::cmp::{Ordering, Reverse};
use std::fmt::Write;

/// Order by arch, then name, then newest revision first.
pub fn sort_summaries(summaries: Vec<CatalogSummary>) -> Vec<CatalogSummary> {
    summaries
        .into_iter()
        .sorted_by(|a, b| {
            a.arch
                .cmp(&b.arch)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| compare_revisions_desc(&a.revision, &b.revision))
        })
        .collect()
}

// Revisions are strings on the wire; anything unparsable sorts as 0.
fn compare_revisions_desc(a: &str, b: &str) -> Ordering {
    let parse = |r: &str| r.trim().parse::<u64>().unwrap_or(0);
    Reverse(parse(a)).cmp(&Reverse(parse(b)))
}

pub fn render_listing(summaries: &[CatalogSummary]) -> String {
    let mut out = String::from("Arch\tName\tRevision\n");
    for summary in summaries {
        let _ = writeln!(
            out,
            "{}\t{}\t{}",
            summary.arch, summary.name, summary.revision
        );
    }
    out
}
