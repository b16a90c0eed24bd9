use std::path::PathBuf;

use clap::Args;

use crate::catalog::stats::IndexStats;
use crate::cli::{IndexKind, LoadedIndex, OutputFormat};
use crate::core::piece::PieceEntry;

#[derive(Args)]
pub struct IndexArgs {
    /// Index file (melody_index.json or cadences_meta.json layout)
    #[arg(required = true)]
    pub index: PathBuf,

    /// Layout of the index file
    #[arg(short, long, value_enum, default_value_t = IndexKind::Melody)]
    pub kind: IndexKind,

    /// List every piece after the statistics
    #[arg(long)]
    pub list: bool,
}

pub fn run(args: IndexArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let index = LoadedIndex::load(&args.index, args.kind)?;
    let stats = IndexStats::collect(index.source());

    if verbose && stats.malformed_voices() > 0 {
        eprintln!(
            "{} voices have arrays of different lengths and will never match",
            stats.malformed_voices()
        );
    }

    match format {
        OutputFormat::Text => print_text_stats(&args, &index, &stats),
        OutputFormat::Json => print_json_stats(&args, &index, &stats)?,
        OutputFormat::Tsv => print_tsv_stats(&args, &index, &stats),
    }

    Ok(())
}

fn voice_summary(entry: &PieceEntry) -> String {
    entry
        .voices
        .keys()
        .map(|voice| voice.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn print_text_stats(args: &IndexArgs, index: &LoadedIndex, stats: &IndexStats) {
    println!("Index: {} ({})", args.index.display(), args.kind.as_str());
    println!("{}", "=".repeat(60));
    println!("Pieces: {}", stats.pieces);
    println!("Notes: {}", stats.total_notes());

    println!("\n{:<10} {:>8} {:>10} {:>10}", "Voice", "Pieces", "Notes", "Malformed");
    for (voice, voice_stats) in &stats.voices {
        println!(
            "{:<10} {:>8} {:>10} {:>10}",
            voice.label(),
            voice_stats.pieces,
            voice_stats.notes,
            voice_stats.malformed
        );
    }

    if args.list {
        println!();
        for entry in index.entries() {
            let detail = index
                .detail(&entry.id)
                .map(|d| format!(" [{d}]"))
                .unwrap_or_default();
            println!(
                "{}{detail}  ({} notes: {})",
                entry.display_title(),
                entry.note_count(),
                voice_summary(entry)
            );
        }
    }
}

fn print_json_stats(
    args: &IndexArgs,
    index: &LoadedIndex,
    stats: &IndexStats,
) -> anyhow::Result<()> {
    let mut output = serde_json::json!({
        "path": args.index.display().to_string(),
        "kind": args.kind.as_str(),
        "stats": stats,
        "total_notes": stats.total_notes(),
    });

    if args.list {
        let pieces: Vec<serde_json::Value> = index
            .entries()
            .into_iter()
            .map(|entry| {
                serde_json::json!({
                    "id": entry.id,
                    "title": entry.title,
                    "detail": index.detail(&entry.id),
                    "voices": entry.voices.keys().collect::<Vec<_>>(),
                    "notes": entry.note_count(),
                })
            })
            .collect();
        output["pieces"] = serde_json::Value::Array(pieces);
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_stats(args: &IndexArgs, index: &LoadedIndex, stats: &IndexStats) {
    if args.list {
        println!("number\tsecondary\ttitle\tvoices\tnotes");
        for entry in index.entries() {
            println!(
                "{}\t{}\t{}\t{}\t{}",
                entry.id.number,
                entry.id.secondary.as_deref().unwrap_or(""),
                entry.title.as_deref().unwrap_or(""),
                voice_summary(entry),
                entry.note_count()
            );
        }
        return;
    }

    println!("voice\tpieces\tnotes\tmalformed");
    for (voice, voice_stats) in &stats.voices {
        println!(
            "{}\t{}\t{}\t{}",
            voice, voice_stats.pieces, voice_stats.notes, voice_stats.malformed
        );
    }
}
