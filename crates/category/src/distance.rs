/// Candidates at or beyond this edit distance never match
pub const MAX_MATCH_DISTANCE: usize = 100;

/// Levenshtein distance counted in chars (insert, delete, substitute all cost 1)
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();
    if n == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr: Vec<usize> = vec![0; n + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for j in 1..=n {
            let cost = usize::from(ca != b_chars[j - 1]);
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Candidate closest to `word`, if any is closer than [`MAX_MATCH_DISTANCE`].
///
/// Ties go to the candidate encountered first.
pub fn closest_match<'a, I>(word: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, usize)> = None;
    for candidate in candidates {
        let distance = levenshtein(word, candidate);
        let bound = best.map_or(MAX_MATCH_DISTANCE, |(_, d)| d);
        if distance < bound {
            best = Some((candidate, distance));
        }
    }
    best.map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("straße", "strasse"), 2);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn test_levenshtein_is_symmetric() {
        for (a, b) in [("cat", "cats"), ("mat", "atm"), ("über", "uber")] {
            assert_eq!(levenshtein(a, b), levenshtein(b, a));
        }
    }

    #[test]
    fn test_closest_match_prefers_first_on_ties() {
        let candidates = ["bat", "hat", "cats"];
        assert_eq!(closest_match("cat", candidates), Some("bat"));
        assert_eq!(closest_match("hat", candidates), Some("hat"));
    }

    #[test]
    fn test_closest_match_bound() {
        assert_eq!(closest_match("cat", std::iter::empty()), None);

        let far = "x".repeat(MAX_MATCH_DISTANCE + 5);
        assert_eq!(closest_match("", [far.as_str()]), None);
    }
}
