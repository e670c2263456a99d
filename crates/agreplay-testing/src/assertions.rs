//! Custom assertions for rendered transcripts.
//!
//! Provides high-level assertions that make tests more readable:
//! - Line presence and absence
//! - Separator checks between neighbouring lines

use anyhow::Result;

/// Assert that some line of the transcript equals `expected` exactly.
pub fn assert_has_line(transcript: &str, expected: &str) -> Result<()> {
    if transcript.lines().any(|line| line == expected) {
        return Ok(());
    }
    anyhow::bail!(
        "Expected line {:?} in transcript:\n{}",
        expected,
        transcript
    );
}

/// Assert that no line of the transcript contains `needle`.
pub fn assert_absent(transcript: &str, needle: &str) -> Result<()> {
    if let Some((i, line)) = transcript
        .lines()
        .enumerate()
        .find(|(_, line)| line.contains(needle))
    {
        anyhow::bail!("Unexpected {:?} on line {}: {:?}", needle, i + 1, line);
    }
    Ok(())
}

/// Assert that `second` directly follows `first`, with no blank line between.
pub fn assert_flush(transcript: &str, first: &str, second: &str) -> Result<()> {
    let lines: Vec<&str> = transcript.lines().collect();
    let found = lines
        .windows(2)
        .any(|pair| pair[0] == first && pair[1] == second);

    if !found {
        anyhow::bail!(
            "Expected {:?} immediately followed by {:?} in transcript:\n{}",
            first,
            second,
            transcript
        );
    }
    Ok(())
}

/// Count blank separator lines.
pub fn blank_lines(transcript: &str) -> usize {
    transcript.lines().filter(|line| line.is_empty()).count()
}
