//! Terminal output helpers.
//!
//! Errors go to stderr in bold red, headings to stdout in bold cyan.

use colored::*;

pub fn print_err(msg: &str) {
    eprintln!("{}", msg.red().bold());
}

pub fn print_bold(msg: &str) {
    println!("{}", msg.cyan().bold());
}

/// Breaks `text` into lines of at most `width` columns without splitting
/// words. A word longer than `width` gets a line of its own.
pub fn wrap(width: usize, text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let len = line.chars().count();
        if len > 0 && len + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

pub fn print_wrap(width: usize, text: &str) {
    for line in wrap(width, text) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_keeps_words_whole() {
        let lines = wrap(10, "Package json implements encoding");
        assert_eq!(lines, vec!["Package", "json", "implements", "encoding"]);

        let lines = wrap(16, "Package json implements encoding");
        assert_eq!(lines, vec!["Package json", "implements", "encoding"]);
    }

    #[test]
    fn test_wrap_long_word_and_empty() {
        assert_eq!(wrap(4, "abcdefgh ij"), vec!["abcdefgh", "ij"]);
        assert!(wrap(72, "  ").is_empty());
    }
}
