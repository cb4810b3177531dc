//! Renderer: emits the diff as HTML with `<ins>`/`<del>` change markers.
//!
//! Changed text is wrapped in markers; changed tags are passed through
//! bare so the output stays structurally close to the input. Inline
//! formatting tags (`<b>`, `<em>`, …) get special treatment: when only the
//! formatting around some text changed, the text is marked with a bare
//! `<ins class="mod">` placed *inside* the formatting element, and the old
//! formatting tags are dropped from the deleted side.

use redline_tokenizer::{is_tag, Token, NBSP_ENTITY};

use crate::alignment::{Action, Operation};

/// Class of markers around inserted content.
pub const CLASS_INSERTED: &str = "diffins";
/// Class of markers around deleted content.
pub const CLASS_DELETED: &str = "diffdel";
/// Class of markers around both halves of a replacement.
pub const CLASS_MODIFIED: &str = "diffmod";

const MOD_OPEN: &str = r#"<ins class="mod">"#;
const MOD_CLOSE: &str = "</ins>";

const FORMATTING_TAGS: [&str; 12] = [
    "strong", "em", "b", "i", "u", "sub", "sup", "strike", "s", "dfn", "big", "small",
];

/// The element a run of changed tokens is wrapped in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Ins,
    Del,
}

impl Marker {
    pub fn tag_name(self) -> &'static str {
        match self {
            Marker::Ins => "ins",
            Marker::Del => "del",
        }
    }
}

/// An inline formatting element that is open at the current output position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenFormatting {
    name: &'static str,
    /// A `<ins class="mod">` was emitted for this element and is still open.
    marked: bool,
}

/// Inline formatting elements open at the current output position.
///
/// Elements opened by a change carry an open mod marker. Elements passed
/// through by unchanged text are tracked too. A closing tag only ends the
/// innermost open element, and only when the names agree.
#[derive(Debug, Default)]
pub struct FormattingStack {
    open: Vec<OpenFormatting>,
}

impl FormattingStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Number of mod markers still open.
    pub fn open_markers(&self) -> usize {
        self.open.iter().filter(|f| f.marked).count()
    }

    fn push(&mut self, name: &'static str, marked: bool) {
        self.open.push(OpenFormatting { name, marked });
    }

    /// Pop the innermost element if `closed` names it. Returns whether a mod
    /// marker has to be closed with it.
    fn close(&mut self, closed: Option<&'static str>) -> Option<bool> {
        let top = self.open.last()?;
        if Some(top.name) != closed {
            return None;
        }
        self.open.pop().map(|f| f.marked)
    }

    /// Close every mod marker still open. Called once the document is done.
    pub fn finish(&mut self, out: &mut String) {
        while let Some(f) = self.open.pop() {
            if f.marked {
                out.push_str(MOD_CLOSE);
            }
        }
    }
}

enum Injection {
    BeforeTags(&'static str),
    AfterTags(&'static str),
}

/// Render `operations` over the two token sequences.
pub fn render(operations: &[Operation], old: &[Token<'_>], new: &[Token<'_>]) -> String {
    let mut stack = FormattingStack::new();
    let mut out = String::new();
    for op in operations {
        render_operation(op, old, new, &mut stack, &mut out);
    }
    stack.finish(&mut out);
    out
}

/// Render one operation, appending to `out`. `stack` must be shared by all
/// operations of one document and by nothing else, and finished after the
/// last one.
pub fn render_operation(
    op: &Operation,
    old: &[Token<'_>],
    new: &[Token<'_>],
    stack: &mut FormattingStack,
    out: &mut String,
) {
    match op.action {
        Action::Equal => pass_through(&new[op.new_range()], stack, out),
        Action::Delete => insert_tag(Marker::Del, CLASS_DELETED, &old[op.old_range()], stack, out),
        Action::Insert => insert_tag(Marker::Ins, CLASS_INSERTED, &new[op.new_range()], stack, out),
        Action::Replace => {
            insert_tag(Marker::Del, CLASS_MODIFIED, &old[op.old_range()], stack, out);
            insert_tag(Marker::Ins, CLASS_MODIFIED, &new[op.new_range()], stack, out);
        }
    }
}

/// Emit unchanged tokens, tracking the formatting elements they open and
/// close. A closing tag that ends an element carrying a mod marker closes
/// the marker first.
fn pass_through(tokens: &[Token<'_>], stack: &mut FormattingStack, out: &mut String) {
    for token in tokens {
        if let Some(name) = opening_formatting_tag(token) {
            stack.push(name, false);
        } else if let Some(name) = closing_formatting_tag(token) {
            if stack.close(Some(name)) == Some(true) {
                out.push_str(MOD_CLOSE);
            }
        }
        out.push_str(token);
    }
}

/// Wrap the changed `tokens` in markers.
///
/// Runs of text are wrapped whole. Runs of tags are emitted unwrapped, with
/// the inline formatting special case applied at their head.
pub fn insert_tag(
    marker: Marker,
    class: &str,
    tokens: &[Token<'_>],
    stack: &mut FormattingStack,
    out: &mut String,
) {
    let mut cursor = 0;
    while cursor < tokens.len() {
        let text_end = run_end(tokens, cursor, |t| !is_tag(t));
        if text_end > cursor {
            wrap_text(marker, class, &tokens[cursor..text_end], out);
            cursor = text_end;
            continue;
        }

        let mut injection = None;
        if let Some(name) = opening_formatting_tag(tokens[cursor]) {
            stack.push(name, true);
            injection = Some(Injection::AfterTags(MOD_OPEN));
            if marker == Marker::Del {
                cursor = run_end(tokens, cursor, |t| opening_formatting_tag(t).is_some());
            }
        } else if closing_formatting_tag(tokens[cursor]).is_some() {
            let closes_end = run_end(tokens, cursor, |t| closing_formatting_tag(t).is_some());
            let last_closed = closing_formatting_tag(tokens[closes_end - 1]);
            if stack.close(last_closed) == Some(true) {
                injection = Some(Injection::BeforeTags(MOD_CLOSE));
            }
            if marker == Marker::Del {
                cursor = closes_end;
            }
        }

        if cursor == tokens.len() && injection.is_none() {
            break;
        }

        let tags_end = run_end(tokens, cursor, is_tag);
        let tags = &tokens[cursor..tags_end];
        cursor = tags_end;
        match injection {
            Some(Injection::BeforeTags(marker_tag)) => {
                out.push_str(marker_tag);
                tags.iter().for_each(|t| out.push_str(t));
            }
            Some(Injection::AfterTags(marker_tag)) => {
                tags.iter().for_each(|t| out.push_str(t));
                out.push_str(marker_tag);
            }
            None => tags.iter().for_each(|t| out.push_str(t)),
        }
    }
}

/// End of the run of tokens starting at `from` that satisfy `pred`.
fn run_end(tokens: &[Token<'_>], from: usize, pred: impl Fn(&str) -> bool) -> usize {
    from + tokens[from..].iter().take_while(|t| pred(t)).count()
}

/// `<marker class="…">text</marker>`. A lone leading space becomes `&nbsp;`
/// so it survives whitespace collapsing at the start of the element.
fn wrap_text(marker: Marker, class: &str, tokens: &[Token<'_>], out: &mut String) {
    let name = marker.tag_name();
    out.push('<');
    out.push_str(name);
    out.push_str(" class=\"");
    out.push_str(class);
    out.push_str("\">");
    for (i, token) in tokens.iter().enumerate() {
        if i == 0 && *token == " " {
            out.push_str(NBSP_ENTITY);
        } else {
            out.push_str(token);
        }
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn formatting_name(name: &str) -> Option<&'static str> {
    FORMATTING_TAGS
        .iter()
        .copied()
        .find(|tag| tag.eq_ignore_ascii_case(name))
}

/// The formatting tag a token opens: `<b>`, `<em class="x">`, … but not
/// `<br>` or a self-closing `<b/>`.
fn opening_formatting_tag(token: &str) -> Option<&'static str> {
    let rest = token.trim_start().strip_prefix('<')?;
    let name_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let (name, after) = rest.split_at(name_len);
    match after.chars().next() {
        Some(c) if c == '>' || c.is_whitespace() => formatting_name(name),
        _ => None,
    }
}

/// The formatting tag a token closes: `</b>`, `</STRONG>`, …
fn closing_formatting_tag(token: &str) -> Option<&'static str> {
    let name = token.trim().strip_prefix("</")?.strip_suffix('>')?.trim_end();
    formatting_name(name)
}
