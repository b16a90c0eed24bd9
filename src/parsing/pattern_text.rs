use crate::core::note::{parse_duration, parse_pitch_class};
use crate::core::pattern::{Pattern, PatternError};

/// Parse a pattern written as note tokens.
///
/// Each token is `NAME:DURATION` or `NAME(DURATION)`. `NAME` is a note name
/// (`C`, `F#`, `Bb`, octave ignored) or a pitch class number 0-11.
/// `DURATION` is a number of quarter notes or one of `16th`, `8th`, `q`,
/// `h`, `w`. Tokens are separated by whitespace, commas or dashes (`-`,
/// `–`), with or without surrounding spaces, so `C:1-E:1` works and the
/// output of `Pattern`'s `Display` parses back.
///
/// # Errors
///
/// Returns `PatternError::InvalidToken` for a token without a duration,
/// `PatternError::UnknownNoteName` for an unrecognized name, and
/// `PatternError::InvalidDuration` for a non-positive duration.
pub fn parse_pattern(text: &str) -> Result<Pattern, PatternError> {
    let mut pattern = Pattern::new();

    for token in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|chunk| *chunk != "-")
        .flat_map(split_on_dashes)
        .filter(|t| !t.is_empty())
    {
        let (name, duration) = split_token(token)?;
        let pitch_class = parse_name(name)?;
        let duration = parse_duration(duration).ok_or_else(|| PatternError::InvalidToken {
            token: token.to_string(),
            reason: format!("'{duration}' is not a duration"),
        })?;
        pattern.append(pitch_class, duration)?;
    }

    Ok(pattern)
}

/// Split a chunk at dashes used as separators. A `-` that starts a number
/// (at the chunk start or after `:` or `(`) is a minus sign and stays.
fn split_on_dashes(chunk: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;

    for (i, c) in chunk.char_indices() {
        let is_sign = c == '-' && matches!(prev, None | Some(':' | '('));
        if matches!(c, '-' | '–') && !is_sign {
            parts.push(&chunk[start..i]);
            start = i + c.len_utf8();
            prev = None;
            continue;
        }
        prev = Some(c);
    }
    parts.push(&chunk[start..]);
    parts
}

fn split_token(token: &str) -> Result<(&str, &str), PatternError> {
    if let Some((name, duration)) = token.split_once(':') {
        return Ok((name, duration));
    }
    if let Some((name, rest)) = token.split_once('(') {
        if let Some(duration) = rest.strip_suffix(')') {
            return Ok((name, duration));
        }
    }
    Err(PatternError::InvalidToken {
        token: token.to_string(),
        reason: "expected NAME:DURATION or NAME(DURATION)".to_string(),
    })
}

fn parse_name(name: &str) -> Result<i64, PatternError> {
    if let Ok(number) = name.trim().parse::<i64>() {
        return Ok(number);
    }
    parse_pitch_class(name)
        .map(i64::from)
        .ok_or_else(|| PatternError::UnknownNoteName(name.to_string()))
}
