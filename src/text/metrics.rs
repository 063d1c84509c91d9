use serde::Serialize;

const MINUTES_PER_WORD: f64 = 0.008;

/// Read-only statistics derived from the working text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub words: usize,
    /// Length in UTF-16 code units, the way a browser text field counts.
    pub characters: usize,
    pub vowels: usize,
    pub consonants: usize,
    pub reading_minutes: f64,
}

impl DerivedMetrics {
    pub fn compute(text: &str) -> Self {
        let words = text.split_whitespace().count();
        let vowels = text.chars().filter(|c| is_vowel(*c)).count();
        let consonants = text
            .chars()
            .filter(|c| c.is_ascii_alphabetic() && !is_vowel(*c))
            .count();

        Self {
            words,
            characters: text.encode_utf16().count(),
            vowels,
            consonants,
            reading_minutes: MINUTES_PER_WORD * words as f64,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} words, {} characters\n{} Minutes read\nVowel Letters: {}\nConsonant Letters: {}",
            self.words, self.characters, self.reading_minutes, self.vowels, self.consonants
        )
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_world() {
        let m = DerivedMetrics::compute("Hello World");
        assert_eq!(m.words, 2);
        assert_eq!(m.characters, 11);
        assert_eq!(m.vowels, 3);
        assert_eq!(m.consonants, 7);
        assert!((m.reading_minutes - 0.016).abs() < 1e-12);
    }

    #[test]
    fn empty_and_whitespace_only() {
        let m = DerivedMetrics::compute("");
        assert_eq!((m.words, m.characters, m.vowels, m.consonants), (0, 0, 0, 0));
        assert_eq!(m.reading_minutes, 0.0);

        let m = DerivedMetrics::compute(" \t\n  ");
        assert_eq!(m.words, 0);
        assert_eq!(m.characters, 5);
    }

    #[test]
    fn non_ascii_letters_are_not_classified() {
        let m = DerivedMetrics::compute("Ünï café");
        assert_eq!(m.words, 2);
        assert_eq!(m.characters, 8);
        // n, c, f
        assert_eq!(m.consonants, 3);
        // a
        assert_eq!(m.vowels, 1);
    }

    #[test]
    fn y_counts_as_consonant() {
        let m = DerivedMetrics::compute("Yy");
        assert_eq!(m.consonants, 2);
        assert_eq!(m.vowels, 0);
    }
}
