//! Ratcliff/Obershelp "gestalt" string similarity.
//!
//! Used to recover a city name from a misspelt message. The score is
//! `2 * M / T` where `T` is the combined length of both strings and `M` the
//! number of characters in matching blocks, found by taking the longest
//! common block and recursing on both sides of it.

/// Similarity of `a` and `b` in `[0, 1]`. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Up to `n` candidates scoring at least `cutoff` against `word`, best first.
/// Equal scores put the lexicographically greater candidate first.
pub fn close_matches<'a, I>(word: &str, candidates: I, n: usize, cutoff: f64) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    if n == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &'a str)> = candidates
        .into_iter()
        .map(|candidate| (ratio(candidate, word), candidate))
        .filter(|(score, _)| *score >= cutoff)
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.1.cmp(a.1))
    });

    scored.into_iter().take(n).map(|(_, c)| c).collect()
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut pending = vec![(0, a.len(), 0, b.len())];
    let mut total = 0;

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    total
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
/// Among equally long blocks the one starting earliest in `a`, then in `b`, wins.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    let width = bhi - blo + 1;
    let mut prev = vec![0usize; width];

    for i in alo..ahi {
        let mut curr = vec![0usize; width];
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let k = prev[j - blo] + 1;
            curr[j - blo + 1] = k;
            if k > best_k {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_k = k;
            }
        }
        prev = curr;
    }

    (best_i, best_j, best_k)
}
