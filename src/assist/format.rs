use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s+").expect("valid regex"));

/// Texts longer than this get a paragraph break after each sentence.
const PARAGRAPH_THRESHOLD_CHARS: usize = 100;

pub fn format_text(text: &str) -> String {
    let mut formatted = WHITESPACE.replace_all(text.trim(), " ").into_owned();

    if formatted.chars().count() > PARAGRAPH_THRESHOLD_CHARS {
        formatted = SENTENCE_END.replace_all(&formatted, ".\n\n").into_owned();
    }

    let mut chars = formatted.chars();
    let mut formatted = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    if !formatted.ends_with(['.', '!', '?']) {
        formatted.push('.');
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_capitalized_and_terminated() {
        assert_eq!(format_text("hello world"), "Hello world.");
        assert_eq!(format_text("привет, мир"), "Привет, мир.");
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(format_text("  много   пробелов\tи\n\nстрок  "), "Много пробелов и строк.");
    }

    #[test]
    fn existing_terminal_punctuation_is_kept() {
        assert_eq!(format_text("wow!"), "Wow!");
        assert_eq!(format_text("really?"), "Really?");
        assert_eq!(format_text("done."), "Done.");
    }

    #[test]
    fn short_text_keeps_sentences_inline() {
        assert_eq!(format_text("one. two. three"), "One. two. three.");
    }

    #[test]
    fn long_text_gets_paragraph_breaks() {
        let text = "первое предложение достаточно длинное чтобы его заметить. \
                    второе предложение тоже не короткое.   третье завершает абзац";
        assert!(text.chars().count() > 100);
        assert_eq!(
            format_text(text),
            "Первое предложение достаточно длинное чтобы его заметить.\n\n\
             второе предложение тоже не короткое.\n\n\
             третье завершает абзац."
        );
    }

    #[test]
    fn only_the_first_character_is_capitalized() {
        let formatted = format_text(&format!("{}. next sentence", "a".repeat(100)));
        assert!(formatted.starts_with('A'));
        assert!(formatted.ends_with("\n\nnext sentence."));
    }

    #[test]
    fn idempotent_on_normalized_sentences() {
        for text in ["Hello world.", "Уже готово!", "Всё в порядке?", "hello world"] {
            let once = format_text(text);
            assert_eq!(format_text(&once), once, "{text}");
        }
    }

    #[test]
    fn blank_text_becomes_a_period() {
        assert_eq!(format_text("   "), ".");
    }
}
