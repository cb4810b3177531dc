//! Visual HTML diff for redline.
//!
//! Given an old and a new HTML document, produces the new document with the
//! changes marked up: removed text inside `<del class="…">`, added text
//! inside `<ins class="…">`. Tags are never split or wrapped in markers, so
//! the output stays well-formed wherever the input was.
//!
//! The pipeline has four stages: tokenize both documents, find matching
//! blocks, align them into a cover of operations, and render.
//!
//! # Quick Start
//!
//! ```rust
//! use redline_diff::{diff, DiffOptions};
//!
//! let out = diff("a c", "a b c", &DiffOptions::default()).unwrap();
//! assert_eq!(out, r#"a <ins class="diffins">b </ins>c"#);
//! ```
//!
//! # Key Types
//!
//! - [`HtmlDiff`] -- A validated, reusable differ
//! - [`DiffOptions`] -- Matching and combining knobs, loadable with serde
//! - [`Operation`] / [`Action`] -- The aligned regions, for callers that
//!   render themselves

pub mod alignment;
pub mod error;
pub mod html_diff;
pub mod matcher;
pub mod options;
pub mod render;

// Re-exports for convenience.
pub use alignment::{align, Action, Operation};
pub use error::{DiffError, DiffResult};
pub use html_diff::{diff, HtmlDiff};
pub use matcher::{find_best_match, BlockMatcher, Match, MatchOptions};
pub use options::DiffOptions;
pub use render::{render, CLASS_DELETED, CLASS_INSERTED, CLASS_MODIFIED};

#[cfg(test)]
mod tests {
    use super::*;

    fn check(old: &str, new: &str, expected: &str) {
        let out = diff(old, new, &DiffOptions::default()).unwrap();
        assert_eq!(out, expected, "old: {old:?}\nnew: {new:?}");
    }

    fn check_combined(old: &str, new: &str, expected: &str) {
        let options = DiffOptions {
            combine_words: true,
            ..Default::default()
        };
        let out = diff(old, new, &options).unwrap();
        assert_eq!(out, expected, "old: {old:?}\nnew: {new:?}");
    }

    // -----------------------------------------------------------------------
    // 1. Plain text insertions, deletions and replacements
    // -----------------------------------------------------------------------
    #[test]
    fn inserted_word() {
        check("a c", "a b c", r#"a <ins class="diffins">b </ins>c"#);
    }

    #[test]
    fn deleted_word() {
        check("a b c", "a c", r#"a <del class="diffdel">b </del>c"#);
    }

    #[test]
    fn replaced_word() {
        check(
            "a b c",
            "a d c",
            r#"a <del class="diffmod">b</del><ins class="diffmod">d</ins> c"#,
        );
    }

    #[test]
    fn leading_space_of_insertion_is_kept_visible() {
        check(
            "a word is here",
            "a nother word is there",
            r#"a<ins class="diffins">&nbsp;nother</ins> word is <del class="diffmod">here</del><ins class="diffmod">there</ins>"#,
        );
    }

    #[test]
    fn trailing_punctuation_changes() {
        check(
            "The Dealer.",
            "The Dealer info,",
            r#"The Dealer<del class="diffmod">.</del><ins class="diffmod">&nbsp;info,</ins>"#,
        );
        check(
            "The Dealer.",
            "Mr Dealer info,",
            r#"<del class="diffmod">The</del><ins class="diffmod">Mr</ins> Dealer<del class="diffmod">.</del><ins class="diffmod">&nbsp;info,</ins>"#,
        );
    }

    // -----------------------------------------------------------------------
    // 2. Tags and attributes
    // -----------------------------------------------------------------------
    #[test]
    fn attribute_only_change_is_not_reported() {
        check("<a title='xx'>test</a>", "<a title='yy'>test</a>", "<a title='yy'>test</a>");
    }

    #[test]
    fn void_tags_are_atomic() {
        check(
            "<img src='logo.jpg'/>",
            "",
            r#"<del class="diffdel"><img src='logo.jpg'/></del>"#,
        );
        check(
            "",
            "<img src='logo.jpg'/>",
            r#"<ins class="diffins"><img src='logo.jpg'/></ins>"#,
        );
        check(
            "",
            r#"<input type="checkbox" /> my checkbox"#,
            r#"<ins class="diffins"><input type="checkbox" /> my checkbox</ins>"#,
        );
    }

    #[test]
    fn symbols_are_separate_tokens() {
        check(
            "symbols 'should not' belong <b>to</b> words",
            r#"symbols should not belong <b>"to"</b> words"#,
            r#"symbols <del class="diffdel">'</del>should not<del class="diffdel">'</del> belong <b><ins class="diffins">"</ins>to<ins class="diffins">"</ins></b> words"#,
        );
    }

    #[test]
    fn entities_are_separate_tokens() {
        check(
            "entities are separate amp;words",
            "entities are&nbsp;separate &amp;words",
            r#"entities are<del class="diffmod">&nbsp;</del><ins class="diffmod">&nbsp;</ins>separate <del class="diffmod">amp;</del><ins class="diffmod">&amp;</ins>words"#,
        );
    }

    // -----------------------------------------------------------------------
    // 3. Inline formatting changes
    // -----------------------------------------------------------------------
    #[test]
    fn added_formatting_marks_text_inside_tag() {
        check(
            "a b c",
            "a <strong>b</strong> c",
            r#"a <strong><ins class="mod">b</ins></strong> c"#,
        );
    }

    #[test]
    fn added_nested_formatting() {
        check(
            "Some plain text",
            "Some <strong><i>plain</i></strong> text",
            r#"Some <strong><i><ins class="mod">plain</ins></i></strong> text"#,
        );
    }

    #[test]
    fn removed_nested_formatting_drops_old_tags() {
        check(
            "Some <strong><i>formatted</i></strong> text",
            "Some formatted text",
            r#"Some <ins class="mod">formatted</ins> text"#,
        );
    }

    #[test]
    fn formatting_inside_longer_text() {
        check(
            "This is a longer piece of text to ensure the new blocksize algorithm works",
            "This is a longer piece of text to <strong>ensure</strong> the new blocksize algorithm works decently",
            r#"This is a longer piece of text to <strong><ins class="mod">ensure</ins></strong> the new blocksize algorithm works<ins class="diffins">&nbsp;decently</ins>"#,
        );
    }

    #[test]
    fn moved_formatting_boundary() {
        check(
            "By virtue of an agreement between xxx and the <b>yyy schools</b>, ...",
            "By virtue of an agreement between xxx and the <b>yyy</b> schools, ...",
            "By virtue of an agreement between xxx and the <b>yyy</b> schools, ...",
        );
    }

    #[test]
    fn moved_formatting_keeps_markers_balanced() {
        check(
            "a <b>b c</b>",
            "a b <b>c</b>",
            r#"a <ins class="mod">b <b><ins class="mod">c</ins></b></ins>"#,
        );
    }

    #[test]
    fn uppercase_formatting_tags() {
        check(
            "a b c",
            "a <EM>b</EM> c",
            r#"a <EM><ins class="mod">b</ins></EM> c"#,
        );
    }

    // -----------------------------------------------------------------------
    // 4. Non-Latin text
    // -----------------------------------------------------------------------
    #[test]
    fn cjk_degrades_to_characters() {
        check(
            "这个是中文内容, CSharp is the bast",
            "这是中国语内容，CSharp is the best language.",
            r#"这<del class="diffdel">个</del>是中<del class="diffmod">文</del><ins class="diffmod">国语</ins>内容<del class="diffmod">, </del><ins class="diffmod">，</ins>CSharp is the <del class="diffmod">bast</del><ins class="diffmod">best language.</ins>"#,
        );
    }

    #[test]
    fn latin_extended_words_stay_whole() {
        let text = "tüh, jantı feda et; pislik böceği yormuş, vazgeç.";
        check(text, text, text);
        check(
            text,
            "tüh, jantı feda et; pislik bacağı yokmuş, vazgeç.",
            r#"tüh, jantı feda et; pislik <del class="diffmod">böceği</del><ins class="diffmod">bacağı</ins> <del class="diffmod">yormuş</del><ins class="diffmod">yokmuş</ins>, vazgeç."#,
        );
    }

    // -----------------------------------------------------------------------
    // 5. Word combination
    // -----------------------------------------------------------------------
    #[test]
    fn combine_keeps_simple_cases() {
        check_combined("a c", "a b c", r#"a <ins class="diffins">b </ins>c"#);
        check_combined("a b c", "a c", r#"a <del class="diffdel">b </del>c"#);
        check_combined(
            "a b c",
            "a d c",
            r#"a <del class="diffmod">b</del><ins class="diffmod">d</ins> c"#,
        );
        check_combined(
            "a b c",
            "a <strong>b</strong> c",
            r#"a <strong><ins class="mod">b</ins></strong> c"#,
        );
        check_combined(
            "The Dealer.",
            "The Dealer info,",
            r#"The Dealer<del class="diffmod">.</del><ins class="diffmod">&nbsp;info,</ins>"#,
        );
    }

    #[test]
    fn combine_merges_replacements_across_spaces() {
        check_combined(
            "tüh, jantı feda et; pislik böceği yormuş, vazgeç.",
            "tüh, jantı feda et; pislik bacağı yokmuş, vazgeç.",
            r#"tüh, jantı feda et; pislik <del class="diffmod">böceği yormuş</del><ins class="diffmod">bacağı yokmuş</ins>, vazgeç."#,
        );
    }

    #[test]
    fn combine_merges_rewritten_tail() {
        check_combined(
            "The Dealer has been really helpful",
            "The Dealer has no idea about this",
            r#"The Dealer has <del class="diffmod">been really helpful</del><ins class="diffmod">no idea about this</ins>"#,
        );
    }

    #[test]
    fn combine_leaves_other_scenarios_unchanged() {
        check_combined(
            "<a title='xx'>test</a>",
            "<a title='yy'>test</a>",
            "<a title='yy'>test</a>",
        );
        check_combined(
            "Some <strong><i>formatted</i></strong> text",
            "Some formatted text",
            r#"Some <ins class="mod">formatted</ins> text"#,
        );
        check_combined(
            "entities are separate amp;words",
            "entities are&nbsp;separate &amp;words",
            r#"entities are<del class="diffmod">&nbsp;</del><ins class="diffmod">&nbsp;</ins>separate <del class="diffmod">amp;</del><ins class="diffmod">&amp;</ins>words"#,
        );
    }

    // -----------------------------------------------------------------------
    // 6. Options
    // -----------------------------------------------------------------------
    #[test]
    fn block_expressions_keep_placeholders_whole() {
        let (old, new) = ("Hello {{ name }}!", "Hello {{ user }}!");
        check(old, new, r#"Hello {{ <del class="diffmod">name</del><ins class="diffmod">user</ins> }}!"#);

        let options = DiffOptions {
            block_expressions: vec![r"\{\{.*?\}\}".into()],
            ..Default::default()
        };
        assert_eq!(
            diff(old, new, &options).unwrap(),
            r#"Hello <del class="diffmod">{{ name }}</del><ins class="diffmod">{{ user }}</ins>!"#
        );
    }

    #[test]
    fn overlapping_block_expressions_fail() {
        let options = DiffOptions {
            block_expressions: vec!["a b".into(), "b c".into()],
            ..Default::default()
        };
        let err = diff("a b c", "a b c d", &options).unwrap_err();
        assert!(matches!(
            err,
            DiffError::Tokenize(redline_tokenizer::TokenizeError::OverlappingBlocks { .. })
        ));
    }

    #[test]
    fn ignore_whitespace_differences() {
        check(
            "a  b",
            "a b",
            r#"a<del class="diffmod">  </del><ins class="diffmod">&nbsp;</ins>b"#,
        );
        let options = DiffOptions {
            ignore_whitespace_differences: true,
            ..Default::default()
        };
        assert_eq!(diff("a  b", "a b", &options).unwrap(), "a b");
        assert_eq!(diff("a&nbsp;b", "a b", &options).unwrap(), "a b");
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = DiffOptions {
            orphan_match_threshold: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            diff("a", "b", &options),
            Err(DiffError::InvalidOption { name: "orphan_match_threshold", .. })
        ));
    }

    #[test]
    fn orphan_threshold_absorbs_stray_match() {
        let old = "alpha beta gamma x delta epsilon zeta";
        let new = "one two three x four five six";
        let options = DiffOptions {
            orphan_match_threshold: 0.5,
            ..Default::default()
        };
        let ops = HtmlDiff::new(options).unwrap().operations(old, new).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].action, Action::Replace);
    }
}
