//! Token shape classification.
//!
//! Tokens carry no kind tag. Whether a token is a tag, a whitespace run or
//! plain text is read back from its text whenever a later stage needs it.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// A single token: a slice of the document it was cut from.
pub type Token<'a> = &'a str;

/// The non-breaking space entity. It counts as whitespace.
pub const NBSP_ENTITY: &str = "&nbsp;";

/// Tags that render as content and are diffed like words, never as markup.
const WORD_LIKE_TAGS: [&str; 2] = ["<img", "<input"];

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*<[^>]+>\s*$").unwrap());
static TAG_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^\s>]+").unwrap());
static LATIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Script_Extensions=Latin}$").unwrap());

/// Returns `true` if the token is a markup tag.
///
/// `<img …>` and `<input …>` are excluded: they stand for visible content and
/// take part in the diff as atomic words.
pub fn is_tag(token: &str) -> bool {
    !WORD_LIKE_TAGS.iter().any(|prefix| token.starts_with(prefix)) && TAG.is_match(token)
}

/// Returns `true` if the token is made only of whitespace characters and
/// `&nbsp;` entities. The empty string is not whitespace.
pub fn is_whitespace(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let mut rest = token;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix(NBSP_ENTITY) {
            rest = tail;
            continue;
        }
        let mut chars = rest.chars();
        match chars.next() {
            Some(c) if c.is_whitespace() => rest = chars.as_str(),
            _ => return false,
        }
    }
    true
}

/// Returns `true` if the character continues a word: Latin-script letters,
/// ASCII digits, `@` and `#`.
///
/// Characters outside this class (punctuation, CJK ideographs, …) become
/// one-character tokens.
pub fn is_word_char(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric() || c == '@' || c == '#';
    }
    let mut buf = [0u8; 4];
    LATIN.is_match(c.encode_utf8(&mut buf))
}

/// Reduces a tag to its name, dropping every attribute.
///
/// `<a href="x">` becomes `<a>`; a self-closing tag keeps its `/>`.
pub fn strip_tag_attributes(token: &str) -> Cow<'_, str> {
    let Some(name) = TAG_NAME.find(token) else {
        return Cow::Borrowed(token);
    };
    let close = if token.ends_with("/>") { "/>" } else { ">" };
    let stripped = format!("{}{close}", name.as_str());
    if stripped == token {
        Cow::Borrowed(token)
    } else {
        Cow::Owned(stripped)
    }
}

/// Strips attributes if the token is a tag, otherwise returns it unchanged.
pub fn strip_any_attributes(token: &str) -> Cow<'_, str> {
    if is_tag(token) {
        strip_tag_attributes(token)
    } else {
        Cow::Borrowed(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_tags() {
        assert!(is_tag("<p>"));
        assert!(is_tag("</strong>"));
        assert!(is_tag("<a href='x'>"));
        assert!(is_tag("<br/>"));
        assert!(!is_tag("word"));
        assert!(!is_tag("<"));
        assert!(!is_tag("<unterminated"));
    }

    #[test]
    fn img_and_input_are_words() {
        assert!(!is_tag("<img src='logo.jpg'/>"));
        assert!(!is_tag(r#"<input type="checkbox" />"#));
    }

    #[test]
    fn whitespace_includes_nbsp() {
        assert!(is_whitespace(" "));
        assert!(is_whitespace("\n\t "));
        assert!(is_whitespace("&nbsp;"));
        assert!(is_whitespace(" &nbsp; "));
        assert!(!is_whitespace(""));
        assert!(!is_whitespace("&nbsp"));
        assert!(!is_whitespace(" a "));
        assert!(!is_whitespace("&amp;"));
    }

    #[test]
    fn word_chars() {
        for c in ['a', 'Z', '0', '9', '@', '#', 'ü', 'ı', 'ş', 'ç', 'ğ'] {
            assert!(is_word_char(c), "{c:?} should be a word char");
        }
        for c in ['.', ',', '\'', '"', ';', '中', '文', '，', '-'] {
            assert!(!is_word_char(c), "{c:?} should not be a word char");
        }
    }

    #[test]
    fn strips_attributes() {
        assert_eq!(strip_tag_attributes("<a title='xx'>"), "<a>");
        assert_eq!(strip_tag_attributes("<p class=\"lead\" id=\"x\">"), "<p>");
        assert_eq!(strip_tag_attributes("<hr class='x' />"), "<hr/>");
        assert!(matches!(strip_tag_attributes("<b>"), Cow::Borrowed(_)));
        assert!(matches!(strip_tag_attributes("text"), Cow::Borrowed(_)));
    }

    #[test]
    fn strip_any_leaves_words_alone() {
        assert_eq!(strip_any_attributes("<em class='x'>"), "<em>");
        assert_eq!(strip_any_attributes("<img src='a.png'>"), "<img src='a.png'>");
        assert_eq!(strip_any_attributes("hello"), "hello");
    }
}
