//! Normalized edit distance between an original draft and the text sent.

/// Levenshtein distance between `a` and `b` as an integer percentage of the
/// longer string: 0 means identical, 100 means fully rewritten.
///
/// Compares Unicode scalar values and keeps two rows, so memory is
/// proportional to the shorter input. Rounds half up.
pub fn levenshtein_ratio(a: &str, b: &str) -> u32 {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 100;
    }

    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let distance = levenshtein_distance(&long, &short);
    let max = long.len();
    ((distance * 100 + max / 2) / max) as u32
}

fn levenshtein_distance(long: &[char], short: &[char]) -> usize {
    let n = short.len();
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let cost = usize::from(lc != sc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
