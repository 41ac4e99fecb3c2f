/// Spelled-out numbers the speech transcriber tends to produce for room
/// numbers, paired with the digit form room labels use.
const NUMBER_WORDS: [(&str, &str); 12] = [
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
    ("eleven", "11"),
    ("twelve", "12"),
];

/// Digit form of a phrase that is exactly a spelled-out number.
pub fn word_to_digit(phrase: &str) -> Option<&'static str> {
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == phrase)
        .map(|(_, digit)| *digit)
}

/// Digit form of the first spelled-out number embedded in a phrase.
/// Longer words are tried first so "twelve" is never shadowed by a shorter
/// word it happens to contain.
pub fn digit_in_phrase(phrase: &str) -> Option<&'static str> {
    let mut words: Vec<&(&str, &str)> = NUMBER_WORDS.iter().collect();
    words.sort_by_key(|(word, _)| std::cmp::Reverse(word.len()));
    words
        .into_iter()
        .find(|(word, _)| phrase.contains(word))
        .map(|(_, digit)| *digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_words_convert() {
        assert_eq!(word_to_digit("three"), Some("3"));
        assert_eq!(word_to_digit("twelve"), Some("12"));
        assert_eq!(word_to_digit("thirteen"), None);
        assert_eq!(word_to_digit("3"), None);
    }

    #[test]
    fn embedded_words_convert_longest_first() {
        assert_eq!(digit_in_phrase("room twelve"), Some("12"));
        assert_eq!(digit_in_phrase("take me to seven please"), Some("7"));
        assert_eq!(digit_in_phrase("washroom"), None);
    }
}
