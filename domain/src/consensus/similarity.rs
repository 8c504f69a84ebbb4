//! Textual similarity between two responses.
//!
//! Uses the Ratcliff/Obershelp "gestalt" ratio: find the longest common
//! substring, recurse on the pieces to its left and right, and score
//! `2 * matched / (len(a) + len(b))`. Lengths are counted in chars.

/// Lowercase, trim and collapse every whitespace run to one space
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Similarity ratio in `[0, 1]`.
///
/// Symmetric: the arguments are put in a canonical order before matching,
/// so tie-breaking between equally long substrings cannot depend on which
/// side a text was passed on. Two identical strings (including two empty
/// strings) score exactly 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Total chars covered by recursively found longest common blocks
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
///
/// Ties resolve to the block ending earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0);
    let width = bhi - blo;
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            if a[i] == b[j] {
                let len = prev[col - 1] + 1;
                curr[col] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            } else {
                curr[col] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  The  Answer\n\tis 4. "), "the answer is 4.");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n "), "");
    }

    #[test]
    fn test_identity() {
        for text in ["", "4", "the answer is four", "ünïcödé text"] {
            assert_eq!(similarity(text, text), 1.0);
        }
    }

    #[test]
    fn test_known_ratios() {
        assert_eq!(similarity("abcd", "bcde"), 0.75);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", "abc"), 0.0);
    }

    #[test]
    fn test_symmetry_with_ambiguous_ties() {
        // Plain Ratcliff/Obershelp gives 0.25 one way and 0.5 the other
        assert_eq!(similarity("tide", "diet"), similarity("diet", "tide"));
        assert_eq!(similarity("tide", "diet"), 0.5);

        let a = "functional programming composes pure functions";
        let b = "object oriented programming composes objects";
        assert_eq!(similarity(a, b), similarity(b, a));
    }

    #[test]
    fn test_score_is_bounded() {
        let pairs = [
            ("4", "four"),
            ("the answer is 4", "the answer is 4."),
            ("rust", "rusty nails"),
        ];
        for (a, b) in pairs {
            let s = similarity(a, b);
            assert!((0.0..=1.0).contains(&s), "{} out of range", s);
        }
    }

    #[test]
    fn test_near_duplicates_score_high() {
        let a = normalize_text("The answer is 4.");
        let b = normalize_text("the answer is 4");
        assert!(similarity(&a, &b) > 0.9);
    }
}
