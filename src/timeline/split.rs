use crate::foundation::core::TimeRange;

/// Characters that end a subtitle sentence.
pub const SENTENCE_DELIMITERS: &[char] = &[
    '。', ',', '，', '！', '!', '.', '？', '?', '“', '：', '”',
];

/// Split subtitle text into sentences, dropping empty fragments.
///
/// Delimiters are removed; surrounding whitespace is kept as written.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(SENTENCE_DELIMITERS)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Distribute `duration` over `sentences` in proportion to their character counts.
///
/// Boundaries are rounded cumulatively, so the returned ranges are contiguous,
/// start at `start` and sum to exactly `duration`.
pub fn distribute(start: u64, duration: u64, sentences: &[&str]) -> Vec<TimeRange> {
    let lens: Vec<u64> = sentences.iter().map(|s| s.chars().count() as u64).collect();
    let total: u64 = lens.iter().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(lens.len());
    let mut cum = 0u64;
    let mut prev_end = 0u64;
    for len in lens {
        cum += len;
        let end = rounded_share(duration, cum, total);
        out.push(TimeRange::new(start + prev_end, end - prev_end));
        prev_end = end;
    }
    out
}

/// `round(duration * part / total)` in integer arithmetic, half rounding up.
fn rounded_share(duration: u64, part: u64, total: u64) -> u64 {
    let num = duration as u128 * part as u128;
    let total = total as u128;
    ((num + total / 2) / total) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/split.rs"]
mod tests;
