// crates/refdoc-yaml/src/parser.rs
// ============================================================================
// Module: YAML Parser
// Description: Comment-preserving parser for block-style YAML documents.
// Purpose: Turn reference configuration text into an ordered node tree.
// Dependencies: crate::node, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! Parsing runs in two passes. The text is first checked for well-formedness
//! with `serde_yaml`, so malformed input fails with the same diagnostics a
//! strict YAML reader would produce. A line-oriented pass then builds the
//! [`Node`] tree, keeping key order, scalar styles, anchors, tags, and the
//! comments that a value-level reader would discard.
//!
//! ### Comment placement
//! - Comment lines directly above an entry become its head comment.
//! - A trailing `# ...` on a line becomes the value's line comment.
//! - Comments closing a nested block, indented at the block's level or
//!   deeper, become the foot comment of the block's last entry.
//! - Leading comments separated from the first entry by a blank line and all
//!   trailing comments of the file belong to the document node.
//!
//! ### Supported subset
//! Block mappings and sequences (including compact `- key: value` items),
//! plain and quoted scalars (possibly spanning lines), literal and folded
//! block scalars, flow collections (possibly spanning lines), anchors,
//! aliases, and tags. Explicit `?` keys are rejected with a [`ParseError`].
//!
//! ### Line folding
//! Continuation lines of a plain or quoted scalar join the previous line with
//! one space. Each blank line between them becomes a line break. A quote only
//! opens a quoted scalar where a node may begin: at the start of a value,
//! after an `&anchor` or `!tag` property, or after a flow indicator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::node::Node;
use crate::node::Style;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted input size in bytes.
pub const MAX_YAML_INPUT_BYTES: usize = 8 * 1024 * 1024;
/// Maximum supported block nesting depth.
const MAX_NESTING: usize = 128;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error raised when a document is not well-formed or uses unsupported syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("yaml parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    /// One-based line number.
    pub line: usize,
    /// One-based column number.
    pub column: usize,
    /// Human-readable reason.
    pub message: String,
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Parses a single YAML document into a [`Node`] of kind document.
///
/// Empty or comment-only input yields a document wrapping an empty mapping.
///
/// # Errors
///
/// Returns [`ParseError`] when the text is not well-formed YAML, holds more
/// than one document, exceeds [`MAX_YAML_INPUT_BYTES`], or uses a construct
/// outside the supported subset.
pub fn parse_document(text: &str) -> Result<Node, ParseError> {
    if text.len() > MAX_YAML_INPUT_BYTES {
        return Err(ParseError {
            line: 1,
            column: 1,
            message: format!("input exceeds {MAX_YAML_INPUT_BYTES} bytes"),
        });
    }
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines = split_lines(text);
    if lines.iter().any(Line::is_content) {
        check_well_formed(text)?;
    }
    Parser::new(lines).document()
}

// ============================================================================
// SECTION: Well-Formedness Gate
// ============================================================================

/// Rejects text that a strict YAML reader refuses.
fn check_well_formed(text: &str) -> Result<(), ParseError> {
    serde_yaml::from_str::<serde_yaml::Value>(text).map(|_| ()).map_err(|err| {
        let (line, column) = err.location().map_or((1, 1), |loc| (loc.line(), loc.column()));
        ParseError {
            line,
            column,
            message: err.to_string(),
        }
    })
}

// ============================================================================
// SECTION: Lines
// ============================================================================

/// One physical source line.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    /// One-based line number.
    number: usize,
    /// Count of leading spaces.
    indent: usize,
    /// Text after the indentation, trailing whitespace removed.
    content: &'a str,
    /// Full line without its terminator.
    raw: &'a str,
}

impl Line<'_> {
    /// Returns true when the line is neither blank nor a comment.
    fn is_content(&self) -> bool {
        let trimmed = self.content.trim_start();
        !trimmed.is_empty() && !trimmed.starts_with('#')
    }
}

/// Splits text into lines, measuring indentation.
fn split_lines(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .enumerate()
        .map(|(idx, raw)| {
            let indent = raw.len() - raw.trim_start_matches(' ').len();
            Line {
                number: idx + 1,
                indent,
                content: raw[indent ..].trim_end(),
                raw,
            }
        })
        .collect()
}

/// Comment or blank line waiting to be attached to a node.
#[derive(Debug, Clone, Copy)]
enum Pending<'a> {
    /// Blank separator line.
    Blank,
    /// Comment line with its indentation.
    Comment {
        /// Count of leading spaces.
        indent: usize,
        /// Comment text starting at `#`.
        text: &'a str,
    },
}

/// Joins pending lines into a comment slot value.
///
/// Leading and trailing blanks are dropped and inner runs of blank lines
/// collapse into one empty line.
fn render_comments<'a>(items: impl IntoIterator<Item = Pending<'a>>) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut blank = false;
    for item in items {
        match item {
            Pending::Blank => blank = true,
            Pending::Comment {
                text, ..
            } => {
                if blank && !lines.is_empty() {
                    lines.push("");
                }
                blank = false;
                lines.push(text);
            }
        }
    }
    lines.join("\n")
}

// ============================================================================
// SECTION: Block Parser
// ============================================================================

/// Line-oriented parser state.
struct Parser<'a> {
    /// Source lines; compact sequence items are rewritten in place.
    lines: Vec<Line<'a>>,
    /// Index of the next unread line.
    pos: usize,
    /// Comments read but not yet attached.
    pending: Vec<Pending<'a>>,
    /// Current block nesting depth.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over pre-split lines.
    const fn new(lines: Vec<Line<'a>>) -> Self {
        Self {
            lines,
            pos: 0,
            pending: Vec::new(),
            depth: 0,
        }
    }

    /// Parses the whole input as one document.
    fn document(&mut self) -> Result<Node, ParseError> {
        self.gather();
        while let Some(line) = self.peek() {
            if line.indent == 0 && line.content.starts_with('%') {
                self.pos += 1;
                self.gather();
                continue;
            }
            if line.indent == 0 && is_document_start(line.content) {
                self.pos += 1;
                self.gather();
            } else if line.indent == 0 && line.content.starts_with("---") {
                return Err(error_at(line, "content after a document start marker is not supported"));
            }
            break;
        }

        let head = self.take_document_head();
        let root = match self.content_line()? {
            Some(line) if !is_document_end(line) => self.block(line.indent, None)?,
            _ => Node::mapping(Vec::new()),
        };
        if let Some(line) = self.content_line()? {
            if !is_document_end(line) {
                return Err(error_at(line, "unexpected content after the document root"));
            }
            self.pos += 1;
            if let Some(extra) = self.content_line()? {
                return Err(error_at(extra, "only a single document is supported"));
            }
        }
        let foot = self.take_head();

        let mut document = Node::document(root);
        document.comments.head = head;
        document.comments.foot = foot;
        Ok(document)
    }

    /// Parses the block starting at the next content line.
    ///
    /// `foot_indent` is the minimum indentation of closing comments claimed
    /// as the block's foot; `None` leaves them for the caller.
    fn block(&mut self, indent: usize, foot_indent: Option<usize>) -> Result<Node, ParseError> {
        let Some(line) = self.content_line()? else {
            return Ok(Node::null());
        };
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(error_at(line, format!("nesting exceeds {MAX_NESTING} levels")));
        }
        let node = if is_sequence_item(line.content) {
            self.sequence(indent, foot_indent)?
        } else if split_key(line.content).is_some() || is_explicit_key(line.content) {
            self.mapping(indent, foot_indent)?
        } else {
            let head = self.take_head();
            self.pos += 1;
            let (rest, comment) = split_comment(line.content);
            let mut node = self.value(rest.trim(), comment, indent.saturating_sub(1), line)?;
            node.comments.head = head;
            node
        };
        self.depth -= 1;
        Ok(node)
    }

    /// Parses consecutive mapping entries at `indent`.
    fn mapping(&mut self, indent: usize, foot_indent: Option<usize>) -> Result<Node, ParseError> {
        let mut node = Node::mapping(Vec::new());
        while let Some(line) = self.content_line()? {
            if line.indent < indent || is_document_end(line) {
                break;
            }
            if line.indent > indent {
                return Err(error_at(line, "unexpected indentation"));
            }
            if is_sequence_item(line.content) {
                return Err(error_at(line, "sequence item found where a mapping entry was expected"));
            }
            if is_explicit_key(line.content) {
                return Err(error_at(line, "explicit `?` mapping keys are not supported"));
            }
            let head = self.take_head();
            let (mut key, value) = self.entry(line)?;
            key.comments.head = head;
            node.children.push(key);
            node.children.push(value);
        }
        if let Some(min_indent) = foot_indent {
            let foot = self.take_foot(min_indent);
            let len = node.children.len();
            if !foot.is_empty() && len >= 2 {
                node.children[len - 2].comments.foot = foot;
            }
        }
        Ok(node)
    }

    /// Parses consecutive sequence items at `indent`.
    fn sequence(&mut self, indent: usize, foot_indent: Option<usize>) -> Result<Node, ParseError> {
        let mut node = Node::sequence(Vec::new());
        while let Some(line) = self.content_line()? {
            if line.indent > indent {
                return Err(error_at(line, "unexpected indentation"));
            }
            if line.indent < indent || !is_sequence_item(line.content) {
                break;
            }
            let head = self.take_head();
            let mut item = self.item(line)?;
            if !head.is_empty() {
                item.comments.head = if item.comments.head.is_empty() {
                    head
                } else {
                    format!("{head}\n{}", item.comments.head)
                };
            }
            node.children.push(item);
        }
        if let Some(min_indent) = foot_indent {
            let foot = self.take_foot(min_indent);
            if let Some(last) = node.children.last_mut()
                && !foot.is_empty()
            {
                last.comments.foot = foot;
            }
        }
        Ok(node)
    }

    /// Parses one `key: value` entry starting on `line`.
    fn entry(&mut self, line: Line<'a>) -> Result<(Node, Node), ParseError> {
        let Some((raw_key, rest)) = split_key(line.content) else {
            return Err(error_at(line, "expected a mapping entry"));
        };
        let key = parse_key(raw_key).map_err(|message| error_at(line, message))?;
        self.pos += 1;
        let (rest, comment) = split_comment(rest);
        let rest = rest.trim();
        let value = if rest.is_empty() {
            let mut nested = self.nested(line.indent, true)?;
            if let Some(comment) = comment {
                nested.comments.line = comment.to_string();
            }
            nested
        } else {
            self.value(rest, comment, line.indent, line)?
        };
        Ok((key, value))
    }

    /// Parses one `- item` starting on `line`.
    fn item(&mut self, line: Line<'a>) -> Result<Node, ParseError> {
        let trimmed = line.content[1 ..].trim_start();
        let column = line.indent + (line.content.len() - trimmed.len());
        if trimmed.is_empty() || trimmed.starts_with('#') {
            self.pos += 1;
            let mut nested = self.nested(line.indent, false)?;
            if !trimmed.is_empty() {
                nested.comments.line = trimmed.to_string();
            }
            return Ok(nested);
        }
        if is_sequence_item(trimmed) || split_key(trimmed).is_some() {
            // Compact collection: re-read the rest of this line at its own column.
            self.lines[self.pos] = Line {
                number: line.number,
                indent: column,
                content: trimmed,
                raw: line.raw,
            };
            return self.block(column, Some(column));
        }
        self.pos += 1;
        let (rest, comment) = split_comment(trimmed);
        self.value(rest.trim(), comment, line.indent, line)
    }

    /// Parses the block nested under a key or dash whose value is empty.
    fn nested(&mut self, parent_indent: usize, allow_indentless: bool) -> Result<Node, ParseError> {
        let Some(next) = self.content_line()? else {
            return Ok(Node::null());
        };
        if next.indent > parent_indent && !is_document_end(next) {
            return self.block(next.indent, Some(next.indent));
        }
        if allow_indentless && next.indent == parent_indent && is_sequence_item(next.content) {
            return self.sequence(parent_indent, Some(parent_indent + 1));
        }
        Ok(Node::null())
    }

    /// Parses an inline value: properties, then a scalar, alias, flow
    /// collection, block scalar, or (with properties only) a nested block.
    fn value(
        &mut self,
        rest: &'a str,
        comment: Option<&'a str>,
        parent_indent: usize,
        line: Line<'a>,
    ) -> Result<Node, ParseError> {
        let (anchor, tag, rest) = take_properties(rest).map_err(|message| error_at(line, message))?;
        let mut comment = comment.map(str::to_string);
        let mut node = match rest.as_bytes().first() {
            None => self.nested(parent_indent, false)?,
            Some(b'|' | b'>') => self.block_scalar(rest, parent_indent, line)?,
            Some(b'[' | b'{') => {
                let (node, last_comment) = self.flow(rest, line)?;
                if comment.is_none() {
                    comment = last_comment.map(str::to_string);
                }
                node
            }
            Some(b'*') => {
                let name = &rest[1 ..];
                if name.is_empty() || name.contains(char::is_whitespace) {
                    return Err(error_at(line, "invalid alias"));
                }
                Node::alias(name)
            }
            Some(b'"' | b'\'') => {
                let (node, last_comment) = self.quoted(rest, line)?;
                if last_comment.is_some() {
                    comment = last_comment.map(str::to_string);
                }
                node
            }
            Some(_) => {
                if split_key(rest).is_some() {
                    return Err(error_at(line, "properties before a compact mapping are not supported"));
                }
                if comment.is_some() {
                    Node::scalar(rest)
                } else {
                    let (text, last_comment) = self.plain(rest, parent_indent);
                    comment = last_comment.map(str::to_string);
                    Node::scalar(text)
                }
            }
        };
        if let Some(comment) = comment {
            node.comments.line = comment;
        }
        if anchor.is_some() {
            node.anchor = anchor;
        }
        if tag.is_some() {
            node.tag = tag;
        }
        Ok(node)
    }

    /// Parses a literal or folded block scalar whose header is `header`.
    fn block_scalar(
        &mut self,
        header: &str,
        parent_indent: usize,
        line: Line<'a>,
    ) -> Result<Node, ParseError> {
        let style = if header.starts_with('|') { Style::Literal } else { Style::Folded };
        let mut chomp = Chomp::Clip;
        let mut explicit = None;
        for ch in header[1 ..].chars() {
            match ch {
                '-' => chomp = Chomp::Strip,
                '+' => chomp = Chomp::Keep,
                '1' ..= '9' => explicit = ch.to_digit(10).and_then(|digit| usize::try_from(digit).ok()),
                _ => return Err(error_at(line, "invalid block scalar header")),
            }
        }

        let mut content_indent = explicit.map(|digit| parent_indent + digit);
        let mut body: Vec<&str> = Vec::new();
        while let Some(next) = self.lines.get(self.pos).copied() {
            if next.raw.trim().is_empty() {
                body.push("");
                self.pos += 1;
                continue;
            }
            let indent = *content_indent.get_or_insert(next.indent);
            if next.indent <= parent_indent || next.indent < indent {
                break;
            }
            body.push(&next.raw[indent ..]);
            self.pos += 1;
        }

        let mut trailing = 0;
        while body.last() == Some(&"") {
            body.pop();
            trailing += 1;
        }
        let text = if style == Style::Literal { body.join("\n") } else { fold_lines(&body) };
        let value = match chomp {
            _ if text.is_empty() && chomp != Chomp::Keep => String::new(),
            Chomp::Strip => text,
            Chomp::Clip => format!("{text}\n"),
            Chomp::Keep if text.is_empty() => "\n".repeat(trailing),
            Chomp::Keep => format!("{text}\n{}", "\n".repeat(trailing)),
        };
        Ok(Node::scalar(value).with_style(style))
    }

    /// Parses a flow collection, joining continuation lines until brackets
    /// balance. Returns the node and the comment of the last joined line.
    fn flow(
        &mut self,
        rest: &str,
        line: Line<'a>,
    ) -> Result<(Node, Option<&'a str>), ParseError> {
        let mut text = rest.to_string();
        let mut last_comment = None;
        while flow_depth(&text) > 0 {
            let Some(next) = self.lines.get(self.pos).copied() else {
                return Err(error_at(line, "unterminated flow collection"));
            };
            self.pos += 1;
            let (part, comment) =
                split_comment_from(next.content.trim_start(), NodeStart::in_flow());
            if comment.is_some() {
                last_comment = comment;
            }
            text.push(' ');
            text.push_str(part.trim());
        }
        let node = FlowParser::new(&text).parse().map_err(|message| error_at(line, message))?;
        Ok((node, last_comment))
    }

    /// Folds the continuation lines of a plain scalar starting with `first`.
    ///
    /// Content lines indented deeper than `parent_indent` continue the
    /// scalar. A comment line ends it; a trailing comment ends it after that
    /// line and is returned.
    fn plain(&mut self, first: &str, parent_indent: usize) -> (String, Option<&'a str>) {
        let mut text = first.to_string();
        let mut blanks = 0;
        let mut cursor = self.pos;
        while let Some(next) = self.lines.get(cursor).copied() {
            let trimmed = next.content.trim_start();
            if trimmed.is_empty() {
                blanks += 1;
                cursor += 1;
                continue;
            }
            if next.indent <= parent_indent || trimmed.starts_with('#') {
                break;
            }
            let (part, comment) = split_comment(trimmed);
            push_folded(&mut text, part.trim(), blanks);
            blanks = 0;
            cursor += 1;
            self.pos = cursor;
            if comment.is_some() {
                return (text, comment);
            }
        }
        (text, None)
    }

    /// Parses the quoted scalar starting with `first`, folding continuation
    /// lines until the closing quote. Returns the node and the trailing
    /// comment of the closing line.
    fn quoted(
        &mut self,
        first: &'a str,
        line: Line<'a>,
    ) -> Result<(Node, Option<&'a str>), ParseError> {
        if quoted_end(first).is_some() {
            let (node, consumed) = parse_quoted(first).map_err(|message| error_at(line, message))?;
            if !first[consumed ..].trim().is_empty() {
                return Err(error_at(line, "unexpected content after a quoted scalar"));
            }
            return Ok((node, None));
        }
        let escapes = first.starts_with('"');
        let mut text = first.trim_end().to_string();
        let mut blanks = 0;
        while let Some(next) = self.lines.get(self.pos).copied() {
            self.pos += 1;
            let part = next.raw.trim();
            if part.is_empty() {
                blanks += 1;
                continue;
            }
            if blanks == 0 && escapes && ends_with_escape(&text) {
                text.pop();
                text.push_str(part);
            } else {
                push_folded(&mut text, part, blanks);
            }
            blanks = 0;
            if quoted_end(&text).is_none() {
                continue;
            }
            let (node, consumed) = parse_quoted(&text).map_err(|message| error_at(next, message))?;
            let tail = &part[part.len() - (text.len() - consumed) ..];
            let (rest, comment) = split_comment(tail);
            if !rest.trim().is_empty() {
                return Err(error_at(next, "unexpected content after a quoted scalar"));
            }
            return Ok((node, comment));
        }
        Err(error_at(line, "unterminated quoted scalar"))
    }

    // ------------------------------------------------------------------------
    // Line cursor and comment bookkeeping
    // ------------------------------------------------------------------------

    /// Returns the next unread line.
    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    /// Moves blank and comment lines into the pending buffer.
    fn gather(&mut self) {
        while let Some(line) = self.peek() {
            let trimmed = line.content.trim_start();
            if trimmed.is_empty() {
                self.pending.push(Pending::Blank);
            } else if trimmed.starts_with('#') {
                self.pending.push(Pending::Comment {
                    indent: line.indent,
                    text: trimmed,
                });
            } else {
                break;
            }
            self.pos += 1;
        }
    }

    /// Gathers comments and returns the next content line, if any.
    fn content_line(&mut self) -> Result<Option<Line<'a>>, ParseError> {
        self.gather();
        match self.peek() {
            Some(line) if line.content.starts_with('\t') => {
                Err(error_at(line, "tabs are not allowed in indentation"))
            }
            other => Ok(other),
        }
    }

    /// Drains all pending comments into a head comment.
    fn take_head(&mut self) -> String {
        render_comments(self.pending.drain(..))
    }

    /// Drains pending comments indented at `min_indent` or deeper, up to the
    /// first shallower comment.
    fn take_foot(&mut self, min_indent: usize) -> String {
        let split = self
            .pending
            .iter()
            .position(|item| {
                matches!(item, Pending::Comment { indent, .. } if *indent < min_indent)
            })
            .unwrap_or(self.pending.len());
        render_comments(self.pending.drain(.. split))
    }

    /// Drains the comment block separated from the first entry by a blank
    /// line.
    fn take_document_head(&mut self) -> String {
        match self.pending.iter().rposition(|item| matches!(item, Pending::Blank)) {
            Some(idx) => render_comments(self.pending.drain(..= idx)),
            None => String::new(),
        }
    }
}

/// Block scalar chomping indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chomp {
    /// Single trailing newline (default).
    Clip,
    /// No trailing newline (`-`).
    Strip,
    /// All trailing newlines (`+`).
    Keep,
}

/// Builds a positioned error for `line`.
fn error_at(line: Line<'_>, message: impl Into<String>) -> ParseError {
    ParseError {
        line: line.number,
        column: line.indent + 1,
        message: message.into(),
    }
}

// ============================================================================
// SECTION: Lexical Helpers
// ============================================================================

/// Returns true for `-` items.
fn is_sequence_item(content: &str) -> bool {
    content == "-" || content.starts_with("- ") || content.starts_with("-\t")
}

/// Returns true for `?` explicit keys.
fn is_explicit_key(content: &str) -> bool {
    content == "?" || content.starts_with("? ")
}

/// Returns true for a bare `---` marker, optionally followed by a comment.
fn is_document_start(content: &str) -> bool {
    content == "---" || content.starts_with("--- #")
}

/// Returns true for a `...` document end marker at column one.
fn is_document_end(line: Line<'_>) -> bool {
    line.indent == 0 && (line.content == "..." || line.content.starts_with("... #"))
}

/// Returns the byte index of the quote closing the quoted scalar at the start
/// of `text`.
fn quoted_end(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let quote = *bytes.first()?;
    let mut idx = 1;
    while idx < bytes.len() {
        let byte = bytes[idx];
        if quote == b'"' && byte == b'\\' {
            idx += 2;
            continue;
        }
        if byte == quote {
            if quote == b'\'' && bytes.get(idx + 1) == Some(&b'\'') {
                idx += 2;
                continue;
            }
            return Some(idx);
        }
        idx += 1;
    }
    None
}

/// Splits `key: rest` on the first mapping indicator outside quotes.
fn split_key(content: &str) -> Option<(&str, &str)> {
    let bytes = content.as_bytes();
    let first = *bytes.first()?;
    if first == b'"' || first == b'\'' {
        let end = quoted_end(content)?;
        let after = content[end + 1 ..].trim_start_matches(' ');
        let rest = after.strip_prefix(':')?;
        return (rest.is_empty() || rest.starts_with([' ', '\t']))
            .then_some((&content[..= end], rest));
    }
    if matches!(
        first,
        b'[' | b'{' | b']' | b'}' | b',' | b'#' | b'|' | b'>' | b'*' | b'&' | b'!' | b'%' | b'@' | b'`'
    ) || is_sequence_item(content)
        || is_explicit_key(content)
    {
        return None;
    }
    let mut prev = b' ';
    for (idx, &byte) in bytes.iter().enumerate() {
        if byte == b'#' && (prev == b' ' || prev == b'\t') {
            return None;
        }
        if byte == b':' && matches!(bytes.get(idx + 1), None | Some(b' ' | b'\t')) {
            return Some((content[.. idx].trim_end(), &content[idx + 1 ..]));
        }
        prev = byte;
    }
    None
}

/// Scanner state telling whether a node may begin at the current byte.
///
/// A quote opens a quoted scalar only where a node may begin; elsewhere it is
/// part of a plain scalar. Brackets open a flow collection only where a node
/// may begin, and commas separate nodes only inside one.
#[derive(Debug, Clone, Copy)]
struct NodeStart {
    /// A node may begin at the next non-blank byte.
    open: bool,
    /// Inside an `&anchor` or `!tag` property token.
    property: bool,
    /// Open flow collections.
    depth: usize,
}

impl NodeStart {
    /// State at the start of a block value.
    const fn new() -> Self {
        Self {
            open: true,
            property: false,
            depth: 0,
        }
    }

    /// State at the start of a line continuing an open flow collection.
    const fn in_flow() -> Self {
        Self {
            open: true,
            property: false,
            depth: 1,
        }
    }

    /// Moves past `byte`, where `next` is the byte after it.
    const fn advance(&mut self, byte: u8, next: Option<u8>) {
        let spaced = matches!(next, None | Some(b' ' | b'\t'));
        match byte {
            b' ' | b'\t' => {
                if self.property {
                    self.property = false;
                    self.open = true;
                }
            }
            b'[' | b'{' if self.open => self.depth += 1,
            b']' | b'}' if self.depth > 0 => {
                self.depth -= 1;
                self.open = false;
                self.property = false;
            }
            b',' if self.depth > 0 => {
                self.open = true;
                self.property = false;
            }
            b':' if spaced => {
                self.open = true;
                self.property = false;
            }
            b'-' if self.open && spaced => {}
            b'&' | b'!' if self.open => {
                self.open = false;
                self.property = true;
            }
            _ => {
                if !self.property {
                    self.open = false;
                }
            }
        }
    }

    /// Moves past a complete quoted scalar.
    const fn close(&mut self) {
        self.open = false;
        self.property = false;
    }
}

/// Splits a trailing `# comment` off a block value, ignoring `#` inside
/// quotes.
fn split_comment(text: &str) -> (&str, Option<&str>) {
    split_comment_from(text, NodeStart::new())
}

/// Splits a trailing `# comment` off `text` scanned from `start`.
///
/// An unterminated quote runs to the end of the line, so nothing after it
/// is a comment.
fn split_comment_from(text: &str, mut start: NodeStart) -> (&str, Option<&str>) {
    let bytes = text.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        let byte = bytes[idx];
        if byte == b'#' && (idx == 0 || matches!(bytes[idx - 1], b' ' | b'\t')) {
            return (&text[.. idx], Some(&text[idx ..]));
        }
        if matches!(byte, b'"' | b'\'') && start.open {
            let Some(end) = quoted_end(&text[idx ..]) else {
                return (text, None);
            };
            idx += end + 1;
            start.close();
            continue;
        }
        start.advance(byte, bytes.get(idx + 1).copied());
        idx += 1;
    }
    (text, None)
}

/// Number of flow collections still open at the end of `text`.
fn flow_depth(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut start = NodeStart::new();
    let mut idx = 0;
    while idx < bytes.len() {
        let byte = bytes[idx];
        if matches!(byte, b'"' | b'\'') && start.open {
            let Some(end) = quoted_end(&text[idx ..]) else {
                break;
            };
            idx += end + 1;
            start.close();
            continue;
        }
        start.advance(byte, bytes.get(idx + 1).copied());
        idx += 1;
    }
    start.depth
}

/// Appends a folded continuation line: one space after a plain line break,
/// one line break per blank line otherwise.
fn push_folded(text: &mut String, part: &str, blanks: usize) {
    if blanks == 0 {
        text.push(' ');
    } else {
        text.push_str(&"\n".repeat(blanks));
    }
    text.push_str(part);
}

/// Returns true when `text` ends with an unescaped backslash, which joins
/// the next line of a double-quoted scalar without a space.
fn ends_with_escape(text: &str) -> bool {
    text.bytes().rev().take_while(|byte| *byte == b'\\').count() % 2 == 1
}

/// Splits leading `&anchor` and `!tag` properties off a value.
fn take_properties(text: &str) -> Result<(Option<String>, Option<String>, &str), String> {
    let mut rest = text;
    let mut anchor = None;
    let mut tag = None;
    loop {
        if let Some(body) = rest.strip_prefix('&') {
            let end = body.find([' ', '\t']).unwrap_or(body.len());
            if end == 0 {
                return Err("empty anchor name".to_string());
            }
            anchor = Some(body[.. end].to_string());
            rest = body[end ..].trim_start();
        } else if rest.starts_with('!') {
            let end = rest.find([' ', '\t']).unwrap_or(rest.len());
            tag = Some(rest[.. end].to_string());
            rest = rest[end ..].trim_start();
        } else {
            return Ok((anchor, tag, rest));
        }
    }
}

/// Parses a quoted or plain mapping key.
fn parse_key(raw: &str) -> Result<Node, String> {
    match raw.as_bytes().first() {
        Some(b'"' | b'\'') => parse_quoted(raw).map(|(node, _)| node),
        _ => Ok(Node::scalar(raw)),
    }
}

/// Parses the quoted scalar at the start of `text`, returning it with the
/// number of bytes consumed.
fn parse_quoted(text: &str) -> Result<(Node, usize), String> {
    let Some(end) = quoted_end(text) else {
        return Err("unterminated quoted scalar".to_string());
    };
    let inner = &text[1 .. end];
    let node = if text.starts_with('"') {
        Node::scalar(unescape_double(inner)?).with_style(Style::DoubleQuoted)
    } else {
        Node::scalar(inner.replace("''", "'")).with_style(Style::SingleQuoted)
    };
    Ok((node, end + 1))
}

/// Resolves escape sequences of a double-quoted scalar body.
fn unescape_double(text: &str) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(escape) = chars.next() else {
            return Err("dangling escape in double-quoted scalar".to_string());
        };
        let resolved = match escape {
            '0' => '\0',
            'a' => '\u{07}',
            'b' => '\u{08}',
            't' | '\t' => '\t',
            'n' => '\n',
            'v' => '\u{0b}',
            'f' => '\u{0c}',
            'r' => '\r',
            'e' => '\u{1b}',
            ' ' => ' ',
            '"' => '"',
            '/' => '/',
            '\\' => '\\',
            'N' => '\u{85}',
            '_' => '\u{a0}',
            'L' => '\u{2028}',
            'P' => '\u{2029}',
            'x' => hex_escape(&mut chars, 2)?,
            'u' => hex_escape(&mut chars, 4)?,
            'U' => hex_escape(&mut chars, 8)?,
            other => return Err(format!("unknown escape `\\{other}`")),
        };
        out.push(resolved);
    }
    Ok(out)
}

/// Reads `width` hex digits and converts them to a character.
fn hex_escape(chars: &mut std::str::Chars<'_>, width: usize) -> Result<char, String> {
    let digits: String = chars.by_ref().take(width).collect();
    if digits.len() != width {
        return Err("truncated hex escape".to_string());
    }
    u32::from_str_radix(&digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| format!("invalid hex escape `{digits}`"))
}

/// Folds the content lines of a `>` block scalar.
fn fold_lines(lines: &[&str]) -> String {
    let mut out = String::new();
    let mut blanks = 0;
    let mut started = false;
    let mut prev_more = false;
    for line in lines {
        if line.is_empty() {
            blanks += 1;
            continue;
        }
        let more = line.starts_with([' ', '\t']);
        if started {
            if blanks > 0 {
                let breaks = if more || prev_more { blanks + 1 } else { blanks };
                out.push_str(&"\n".repeat(breaks));
            } else if more || prev_more {
                out.push('\n');
            } else {
                out.push(' ');
            }
        } else {
            out.push_str(&"\n".repeat(blanks));
        }
        out.push_str(line);
        started = true;
        blanks = 0;
        prev_more = more;
    }
    out
}

// ============================================================================
// SECTION: Flow Parser
// ============================================================================

/// Recursive-descent parser for a single flow collection.
struct FlowParser<'s> {
    /// Joined flow text.
    text: &'s str,
    /// Current byte offset.
    offset: usize,
}

impl<'s> FlowParser<'s> {
    /// Creates a parser over `text`.
    const fn new(text: &'s str) -> Self {
        Self {
            text,
            offset: 0,
        }
    }

    /// Parses the collection and rejects trailing content.
    fn parse(mut self) -> Result<Node, String> {
        let node = self.node()?;
        self.skip_ws();
        if self.offset < self.text.len() {
            return Err(format!("unexpected content after flow collection at byte {}", self.offset));
        }
        Ok(node)
    }

    /// Returns the current byte.
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.offset).copied()
    }

    /// Skips spaces and tabs.
    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.offset += 1;
        }
    }

    /// Parses any flow node.
    fn node(&mut self) -> Result<Node, String> {
        self.skip_ws();
        let (anchor, tag) = self.properties();
        let mut node = match self.peek() {
            Some(b'[') => self.sequence()?,
            Some(b'{') => self.mapping()?,
            Some(b'"' | b'\'') => {
                let (node, consumed) = parse_quoted(&self.text[self.offset ..])?;
                self.offset += consumed;
                node
            }
            Some(b'*') => {
                self.offset += 1;
                let name = self.plain_text();
                if name.is_empty() {
                    return Err("invalid alias".to_string());
                }
                Node::alias(name)
            }
            _ => Node::scalar(self.plain_text()),
        };
        if anchor.is_some() {
            node.anchor = anchor;
        }
        if tag.is_some() {
            node.tag = tag;
        }
        Ok(node)
    }

    /// Parses `&anchor` and `!tag` properties.
    fn properties(&mut self) -> (Option<String>, Option<String>) {
        let mut anchor = None;
        let mut tag = None;
        loop {
            match self.peek() {
                Some(b'&') => {
                    self.offset += 1;
                    anchor = Some(self.token());
                }
                Some(b'!') => tag = Some(self.token()),
                _ => return (anchor, tag),
            }
            self.skip_ws();
        }
    }

    /// Reads a property token up to whitespace or a flow indicator.
    fn token(&mut self) -> String {
        let start = self.offset;
        while let Some(byte) = self.peek() {
            if matches!(byte, b' ' | b'\t' | b',' | b'[' | b']' | b'{' | b'}') {
                break;
            }
            self.offset += 1;
        }
        self.text[start .. self.offset].to_string()
    }

    /// Reads a plain scalar up to a flow indicator or `: `.
    fn plain_text(&mut self) -> String {
        let start = self.offset;
        let bytes = self.text.as_bytes();
        while let Some(byte) = self.peek() {
            if matches!(byte, b',' | b'[' | b']' | b'{' | b'}') {
                break;
            }
            if byte == b':'
                && matches!(bytes.get(self.offset + 1), None | Some(b' ' | b',' | b']' | b'}'))
            {
                break;
            }
            self.offset += 1;
        }
        self.text[start .. self.offset].trim_end().to_string()
    }

    /// Parses `[a, b]`.
    fn sequence(&mut self) -> Result<Node, String> {
        self.offset += 1;
        let mut children = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b']') => {
                    self.offset += 1;
                    break;
                }
                None => return Err("unterminated flow sequence".to_string()),
                Some(_) => {}
            }
            children.push(self.node()?);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.offset += 1,
                Some(b']') => {
                    self.offset += 1;
                    break;
                }
                _ => return Err("expected `,` or `]` in flow sequence".to_string()),
            }
        }
        Ok(Node::sequence(children).with_style(Style::Flow))
    }

    /// Parses `{a: b}`.
    fn mapping(&mut self) -> Result<Node, String> {
        self.offset += 1;
        let mut children = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'}') => {
                    self.offset += 1;
                    break;
                }
                None => return Err("unterminated flow mapping".to_string()),
                Some(_) => {}
            }
            let key = self.node()?;
            self.skip_ws();
            let value = if self.peek() == Some(b':') {
                self.offset += 1;
                self.skip_ws();
                if matches!(self.peek(), Some(b',' | b'}')) { Node::null() } else { self.node()? }
            } else {
                Node::null()
            };
            children.push(key);
            children.push(value);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.offset += 1,
                Some(b'}') => {
                    self.offset += 1;
                    break;
                }
                _ => return Err("expected `,` or `}` in flow mapping".to_string()),
            }
        }
        Ok(Node::mapping(children).with_style(Style::Flow))
    }
}
