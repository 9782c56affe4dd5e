use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default selection preprocessor; the result is sent upstream verbatim
    fn process(&self, text: &str) -> String {
        text.trim().to_string()
    }

    /// Composed and decomposed forms of the same text compare equal
    fn same_text(&self, a: &str, b: &str) -> bool {
        a == b || a.nfc().eq(b.nfc())
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}
