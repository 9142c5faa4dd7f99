use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// The `n` most common tokens. Equal counts keep first-occurrence order.
pub fn most_common<'t, I>(tokens: I, n: usize) -> Vec<WordCount>
where
    I: IntoIterator<Item = &'t str>,
{
    let mut counts: Vec<WordCount> = Vec::new();
    let mut positions: HashMap<&'t str, usize> = HashMap::new();

    for token in tokens {
        match positions.get(token) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(token, counts.len());
                counts.push(WordCount {
                    word: token.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps insertion order for ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_orders() {
        let top = most_common("pixel audio pixel codec audio pixel".split(' '), 10);
        assert_eq!(
            top,
            vec![
                WordCount { word: "pixel".into(), count: 3 },
                WordCount { word: "audio".into(), count: 2 },
                WordCount { word: "codec".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let top = most_common(["video", "audio", "image", "audio", "video"], 2);
        assert_eq!(top[0].word, "video");
        assert_eq!(top[1].word, "audio");
    }

    #[test]
    fn test_limit_and_empty() {
        assert_eq!(most_common(["a", "b", "c"], 1).len(), 1);
        assert!(most_common(std::iter::empty::<&str>(), 5).is_empty());
    }
}
