use tracing::debug;

use crate::config::Category;

/// Assigns category labels by keyword containment.
///
/// A keyword matches anywhere in the lowercased text, including inside a
/// longer word. Labels come back in table order.
pub struct RuleTagger<'a> {
    categories: &'a [Category],
}

impl<'a> RuleTagger<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        Self { categories }
    }

    pub fn tag(&self, text: &str) -> Vec<&'a str> {
        let lowered = text.to_lowercase();

        let labels: Vec<&'a str> = self
            .categories
            .iter()
            .filter(|category| category.matches(&lowered))
            .map(|category| category.label.as_str())
            .collect();

        debug!("Tagged text ({} chars) with {:?}", text.len(), labels);
        labels
    }

    pub fn labels(&self) -> impl Iterator<Item = &'a str> {
        self.categories.iter().map(|c| c.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<Category> {
        vec![
            Category::new("Audio", &["audio", "sampl", "rate"]),
            Category::new("Image", &["pixel", "image"]),
            Category::new("Compression", &["huffman", "compression"]),
        ]
    }

    #[test]
    fn test_first_keyword_maps_to_its_category() {
        let categories = table();
        let tagger = RuleTagger::new(&categories);
        for category in &categories {
            assert_eq!(tagger.tag(&category.keywords[0]), vec![category.label.as_str()]);
        }
    }

    #[test]
    fn test_substring_matching_inside_words() {
        let categories = table();
        let tagger = RuleTagger::new(&categories);
        // "sampl" inside "resampling", "image" inside "imagery"
        assert_eq!(tagger.tag("Resampling satellite imagery"), vec!["Audio", "Image"]);
        // "rate" inside "generate"
        assert_eq!(tagger.tag("Generate a report"), vec!["Audio"]);
    }

    #[test]
    fn test_case_insensitive() {
        let categories = table();
        let tagger = RuleTagger::new(&categories);
        assert_eq!(tagger.tag("HUFFMAN TREES"), vec!["Compression"]);
    }

    #[test]
    fn test_result_follows_table_order() {
        let categories = table();
        let tagger = RuleTagger::new(&categories);
        assert_eq!(
            tagger.tag("compression of pixel data and audio"),
            vec!["Audio", "Image", "Compression"]
        );
    }

    #[test]
    fn test_no_match_gives_empty() {
        let categories = table();
        let tagger = RuleTagger::new(&categories);
        assert!(tagger.tag("Define a finite state machine.").is_empty());
        assert!(tagger.tag("").is_empty());
    }
}
