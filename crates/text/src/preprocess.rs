use crate::error::Result;
use crate::language::Language;
use unicode_segmentation::UnicodeSegmentation;

/// Splits text into sentences
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Restores punctuation in unpunctuated text (e.g. speech transcripts).
///
/// Best-effort: an `Err` makes the preprocessor fall back to the raw text.
pub trait PunctuationRestorer: Send + Sync {
    fn restore(&self, text: &str) -> std::result::Result<String, String>;
}

/// Sentence segmentation based on Unicode sentence boundaries (UAX #29)
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentenceSegmenter;

impl SentenceSegmenter for UnicodeSentenceSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Turns raw text into the ordered content-token sequence
pub struct Preprocessor {
    segmenter: Box<dyn SentenceSegmenter>,
    restorer: Option<Box<dyn PunctuationRestorer>>,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self {
            segmenter: Box::new(UnicodeSentenceSegmenter),
            restorer: None,
        }
    }

    pub fn with_segmenter(mut self, segmenter: impl SentenceSegmenter + 'static) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    pub fn with_restorer(mut self, restorer: impl PunctuationRestorer + 'static) -> Self {
        self.restorer = Some(Box::new(restorer));
        self
    }

    /// Sentences of the (punctuation-restored) text, untouched otherwise
    pub fn raw_sentences(&self, text: &str) -> Vec<String> {
        self.segmenter.segment(&self.restore(text))
    }

    /// Lowercased sentences with non-word characters and one-letter words removed
    pub fn sentences(&self, text: &str) -> Vec<String> {
        // Segment before lowercasing: boundary detection relies on capitalization
        self.raw_sentences(text)
            .iter()
            .map(|sentence| clean_sentence(&sentence.to_lowercase()))
            .filter(|sentence| !sentence.is_empty())
            .collect()
    }

    /// Content tokens in text order, stopwords removed
    pub fn preprocess(&self, text: &str, language: Language) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let tokens: Vec<String> = self
            .sentences(text)
            .iter()
            .flat_map(|sentence| sentence.split_whitespace())
            .filter(|token| !language.is_stopword(token))
            .map(str::to_string)
            .collect();

        log::debug!(
            "Preprocessed {} chars into {} tokens ({})",
            text.len(),
            tokens.len(),
            language
        );
        tokens
    }

    fn restore(&self, text: &str) -> String {
        let Some(restorer) = &self.restorer else {
            return text.to_string();
        };
        match restorer.restore(text) {
            Ok(restored) => restored,
            Err(err) => {
                log::warn!("Punctuation restoration failed, using raw text: {err}");
                text.to_string()
            }
        }
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Preprocess with the default collaborators, parsing the language code
pub fn preprocess(text: &str, language: &str) -> Result<Vec<String>> {
    let language = Language::from_code(language)?;
    Ok(Preprocessor::new().preprocess(text, language))
}

/// Replace non-word characters with spaces and drop single-character words
fn clean_sentence(sentence: &str) -> String {
    let spaced: String = sentence
        .chars()
        .map(|c| if is_word_char(c) { c } else { ' ' })
        .collect();

    spaced
        .split_whitespace()
        .filter(|word| word.chars().count() > 1)
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FailingRestorer;

    impl PunctuationRestorer for FailingRestorer {
        fn restore(&self, _text: &str) -> std::result::Result<String, String> {
            Err("model unavailable".to_string())
        }
    }

    struct PeriodRestorer;

    impl PunctuationRestorer for PeriodRestorer {
        fn restore(&self, text: &str) -> std::result::Result<String, String> {
            Ok(text.replace(" then ", ". Then "))
        }
    }

    #[test]
    fn test_clean_sentence() {
        assert_eq!(clean_sentence("a cat's mat, x-ray!"), "cat mat ray");
        assert_eq!(clean_sentence("   "), "");
        assert_eq!(clean_sentence("snake_case stays"), "snake_case stays");
    }

    #[test]
    fn test_preprocess_cat_scenario() {
        let tokens = preprocess("The cat sat on the mat. The cat likes the mat.", "en").unwrap();
        assert_eq!(tokens, vec!["cat", "sat", "mat", "cat", "likes", "mat"]);
    }

    #[test]
    fn test_preprocess_german() {
        let tokens = preprocess("Die Katze sitzt auf der Matte.", "de").unwrap();
        assert_eq!(tokens, vec!["katze", "sitzt", "matte"]);
    }

    #[test]
    fn test_empty_and_unsupported() {
        assert!(preprocess("", "en").unwrap().is_empty());
        assert!(preprocess("   \n", "de").unwrap().is_empty());
        assert!(preprocess("text", "xx").is_err());
    }

    #[test]
    fn test_sentence_order_is_preserved() {
        let pre = Preprocessor::new();
        let sentences = pre.sentences("First sentence here. Second one follows! Third?");
        assert_eq!(
            sentences,
            vec!["first sentence here", "second one follows", "third"]
        );
    }

    #[test]
    fn test_failing_restorer_falls_back() {
        let pre = Preprocessor::new().with_restorer(FailingRestorer);
        assert_eq!(
            pre.preprocess("Dogs chase cats", Language::English),
            vec!["dogs", "chase", "cats"]
        );
    }

    #[test]
    fn test_restorer_output_is_segmented() {
        let pre = Preprocessor::new().with_restorer(PeriodRestorer);
        assert_eq!(
            pre.sentences("dogs bark then cats run"),
            vec!["dogs bark", "then cats run"]
        );
    }
}
