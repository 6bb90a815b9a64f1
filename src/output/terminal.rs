// Colored terminal output for run summaries, overlap tables, and banks.
//
// This module handles all terminal-specific formatting; main.rs delegates
// here after a run completes.

use colored::Colorize;

use crate::model::SourceId;
use crate::overlap::CommunityOverlapScore;
use crate::pipeline::AggregateRun;
use crate::hashtags::HashtagBank;

/// Display the per-source corpus breakdown after a collect run.
pub fn display_summary(run: &AggregateRun) {
    println!(
        "\n{}",
        format!("=== Aggregated corpus ({} posts) ===", run.posts.len()).bold()
    );
    println!();

    let mut sources: Vec<(&SourceId, &usize)> = run.breakdown.iter().collect();
    sources.sort_by(|a, b| b.1.cmp(a.1));

    for (source, count) in sources {
        let bar_len = if run.posts.is_empty() {
            0
        } else {
            (count * 30) / run.posts.len().max(1)
        };
        println!(
            "  {:<10} {:>6}  {}",
            source.to_string().bold(),
            count,
            "=".repeat(bar_len).bright_blue()
        );
    }

    println!(
        "\n  {} terms in the hashtag bank, {} overlap communities",
        run.bank.len(),
        run.overlaps.len()
    );
}

/// Display the overlap discovery table.
pub fn display_overlaps(seed: &str, scores: &[CommunityOverlapScore]) {
    if scores.is_empty() {
        println!("No overlapping communities found for '{seed}'.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Communities overlapping '{seed}' ===").bold()
    );
    println!();
    println!(
        "  {:>4}  {:<28} {:>8}",
        "Rank".dimmed(),
        "Community".dimmed(),
        "Ratio".dimmed()
    );
    println!("  {}", "-".repeat(44).dimmed());

    for score in scores {
        let ratio = format!("{:.2}", score.ratio);
        let colored_ratio = if score.ratio >= 10.0 {
            ratio.bright_green()
        } else if score.ratio >= 3.0 {
            ratio.bright_yellow()
        } else {
            ratio.normal()
        };
        println!(
            "  {:>4}. {:<28} {:>8}",
            score.rank, score.community, colored_ratio
        );
    }
    println!();
}

/// Display the derived term bank with weights.
pub fn display_bank(bank: &HashtagBank) {
    if bank.is_empty() {
        println!("Term bank is empty — fan-out would fall back to the seed term.");
        return;
    }

    println!("\n{}", format!("=== Term bank ({} terms) ===", bank.len()).bold());
    println!();

    for (i, entry) in bank.entries().iter().enumerate() {
        let origin = entry.origin.as_deref().unwrap_or("-");
        println!(
            "  {:>3}. #{:<24} {:>8.2}  {}",
            i + 1,
            entry.term.bold(),
            entry.weight,
            origin.dimmed()
        );
    }
    println!();
}
