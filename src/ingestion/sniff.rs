//! Delimiter sniffing for delimited text files
//!
//! Looks at the start of a file and picks the separator whose per-line
//! count is most consistent. Characters inside double quotes are ignored.

use std::collections::HashMap;

/// Bytes inspected when sniffing
pub const SNIFF_SAMPLE_BYTES: usize = 1024;

/// Candidates in order of preference
const CANDIDATES: &[u8] = b",\t;| :";

/// Lowest share of lines that must agree on the modal count
const MIN_CONSISTENCY: f64 = 0.9;

/// Detect the delimiter of a text sample, or `None` when nothing is consistent
pub fn sniff_delimiter(sample: &[u8]) -> Option<u8> {
    let truncated = sample.len() > SNIFF_SAMPLE_BYTES;
    let sample = &sample[..sample.len().min(SNIFF_SAMPLE_BYTES)];
    let text = String::from_utf8_lossy(sample);

    let mut lines: Vec<&str> = text.lines().collect();
    // The last line of a cut sample is usually partial
    if truncated && !text.ends_with('\n') && lines.len() > 1 {
        lines.pop();
    }
    lines.retain(|line| !line.trim().is_empty());
    if lines.is_empty() {
        return None;
    }

    let consistency: Vec<(u8, f64)> = CANDIDATES
        .iter()
        .filter_map(|&candidate| {
            let counts: Vec<usize> = lines
                .iter()
                .map(|line| count_unquoted(line, candidate))
                .collect();
            let (mode, freq) = modal_count(&counts)?;
            if mode == 0 {
                return None;
            }
            Some((candidate, freq as f64 / lines.len() as f64))
        })
        .collect();

    // Step the threshold down from full agreement; preference order breaks ties
    let mut threshold = 1.0;
    while threshold >= MIN_CONSISTENCY - f64::EPSILON {
        if let Some((candidate, _)) = consistency.iter().find(|(_, c)| *c >= threshold - f64::EPSILON) {
            tracing::debug!(
                delimiter = %(*candidate as char).escape_default(),
                threshold,
                "sniffed delimiter"
            );
            return Some(*candidate);
        }
        threshold -= 0.01;
    }
    None
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for byte in line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

/// (most frequent value, its frequency); ties prefer the larger value
fn modal_count(counts: &[usize]) -> Option<(usize, usize)> {
    let mut freq: HashMap<usize, usize> = HashMap::new();
    for &c in counts {
        *freq.entry(c).or_insert(0) += 1;
    }
    freq.into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
}
