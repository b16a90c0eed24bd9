use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use crate::catalog::source::VoiceSource;
use crate::cli::{IndexKind, LoadedIndex, OutputFormat};
use crate::core::types::{MatchMode, VoiceName};
use crate::matching::aggregate::unique_measures;
use crate::matching::engine::MatchingConfig;
use crate::parsing::pattern_text::parse_pattern;
use crate::session::SearchSession;

#[derive(Args)]
pub struct SearchArgs {
    /// Index file (melody_index.json or cadences_meta.json layout)
    #[arg(required = true)]
    pub index: PathBuf,

    /// Pattern as NAME:DURATION tokens, e.g. "C:1 E:1 G:2" or "Bb(8th) A(8th)"
    #[arg(short, long, default_value = "")]
    pub pattern: String,

    /// How pitches are compared
    #[arg(short, long, value_enum, default_value_t = MatchMode::Absolute)]
    pub mode: MatchMode,

    /// Layout of the index file
    #[arg(short, long, value_enum, default_value_t = IndexKind::Melody)]
    pub kind: IndexKind,

    /// Voice to scan; repeat to scan several (default: all voices for
    /// melody indices, soprano for cadence indices)
    #[arg(long = "voice", value_enum)]
    pub voices: Vec<VoiceName>,

    /// Smallest pattern length to accept
    #[arg(long)]
    pub min_notes: Option<usize>,
}

impl SearchArgs {
    /// Matching configuration implied by the flags
    pub fn config(&self) -> MatchingConfig {
        let mut config = match self.kind {
            IndexKind::Melody => MatchingConfig::melody(self.mode),
            IndexKind::Cadence => MatchingConfig::cadence(self.mode, VoiceName::Soprano),
        };

        if !self.voices.is_empty() {
            let mut voices = self.voices.clone();
            voices.sort();
            voices.dedup();
            config.voices = voices;
        }
        if self.min_notes.is_some() {
            config.min_notes = self.min_notes;
        }

        config
    }
}

pub fn run(args: SearchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let pattern = parse_pattern(&args.pattern)?;
    let index = LoadedIndex::load(&args.index, args.kind)?;
    let config = args.config();

    if verbose {
        eprintln!(
            "Loaded {} {} entries from {}",
            index.len(),
            args.kind.as_str(),
            args.index.display()
        );
        eprintln!("Pattern: {pattern} ({} mode)", config.mode);
    }
    debug!(voices = ?config.voices, min_notes = ?config.min_notes, "search configuration");

    let (singular, plural) = args.kind.item_names();
    let mut session =
        SearchSession::new(index.source(), config).with_item_names(singular, plural);
    session.set_pattern(pattern);
    session.run()?;

    match format {
        OutputFormat::Text => print_text_results(&session, &index),
        OutputFormat::Json => print_json_results(&session, &index)?,
        OutputFormat::Tsv => print_tsv_results(&session),
    }

    Ok(())
}

fn print_text_results<S: VoiceSource + ?Sized>(
    session: &SearchSession<'_, S>,
    index: &LoadedIndex,
) {
    println!("Pattern: {}", session.pattern());
    println!("Mode: {}", session.config().mode);

    if !session.outcome().is_active() {
        println!(
            "\nNo melody entered: all {} entries pass the filter.",
            index.len()
        );
        return;
    }

    let hits = session.hits();
    for entry in index.entries() {
        let Some(locations) = hits.get(&entry.id) else {
            continue;
        };

        match index.detail(&entry.id) {
            Some(detail) => println!("\n{} [{detail}]", entry.display_title()),
            None => println!("\n{}", entry.display_title()),
        }
        for (voice, measures) in unique_measures(locations) {
            if measures.is_empty() {
                println!("  {}: measure unknown", voice.label());
            } else {
                let measures: Vec<String> = measures.iter().map(ToString::to_string).collect();
                println!("  {}: m. {}", voice.label(), measures.join(", "));
            }
        }
    }

    println!("\n{}", session.summary());
}

fn print_json_results<S: VoiceSource + ?Sized>(
    session: &SearchSession<'_, S>,
    index: &LoadedIndex,
) -> anyhow::Result<()> {
    let hits = session.hits();
    let pieces: Vec<serde_json::Value> = index
        .entries()
        .into_iter()
        .filter_map(|entry| {
            let locations = hits.get(&entry.id)?;
            Some(serde_json::json!({
                "id": entry.id,
                "title": entry.title,
                "detail": index.detail(&entry.id),
                "matches": locations,
            }))
        })
        .collect();

    let output = serde_json::json!({
        "pattern": session.pattern().to_string(),
        "config": session.config(),
        "active": session.outcome().is_active(),
        "match_count": session.matches().len(),
        "piece_count": pieces.len(),
        "pieces": pieces,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results<S: VoiceSource + ?Sized>(session: &SearchSession<'_, S>) {
    println!("number\tsecondary\tvoice\tstart\tmeasure");
    for m in session.matches() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            m.piece.number,
            m.piece.secondary.as_deref().unwrap_or(""),
            m.voice,
            m.start,
            m.measure.map(|n| n.to_string()).unwrap_or_default(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(kind: IndexKind, voices: Vec<VoiceName>, min_notes: Option<usize>) -> SearchArgs {
        SearchArgs {
            index: PathBuf::from("index.json"),
            pattern: String::new(),
            mode: MatchMode::Relative,
            kind,
            voices,
            min_notes,
        }
    }

    #[test]
    fn test_melody_defaults_scan_all_voices() {
        let config = args(IndexKind::Melody, vec![], None).config();
        assert_eq!(config.voices, VoiceName::ALL.to_vec());
        assert_eq!(config.min_notes, Some(2));
        assert_eq!(config.mode, MatchMode::Relative);
    }

    #[test]
    fn test_cadence_defaults_to_soprano() {
        let config = args(IndexKind::Cadence, vec![], None).config();
        assert_eq!(config.voices, vec![VoiceName::Soprano]);
        assert_eq!(config.min_notes, None);
    }

    #[test]
    fn test_voices_are_put_in_scan_order() {
        let config = args(
            IndexKind::Melody,
            vec![VoiceName::Bass, VoiceName::Soprano, VoiceName::Bass],
            Some(4),
        )
        .config();
        assert_eq!(config.voices, vec![VoiceName::Soprano, VoiceName::Bass]);
        assert_eq!(config.required_notes(), 4);
    }
}
