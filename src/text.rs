//! Markup stripping and word-count chunking of filing text

use scraper::{Html, Node};
use std::num::NonZeroUsize;
use std::str::SplitWhitespace;

/// Elements whose text never reaches the reader
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Readable text of a fetched document.
///
/// Plain-text documents, by `Content-Type` or by a `.txt` file name, only
/// have their whitespace collapsed: a stray `<` or `&` in them is prose,
/// not markup. Everything else goes through [`clean`].
pub fn normalize(body: &str, content_type: Option<&str>, document_name: &str) -> String {
    if is_plain_text(content_type, document_name) {
        collapse_whitespace(body)
    } else {
        clean(body)
    }
}

fn is_plain_text(content_type: Option<&str>, document_name: &str) -> bool {
    let mime = content_type
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase());
    match mime.as_deref() {
        Some("text/plain") => true,
        Some("text/html") | Some("application/xhtml+xml") => false,
        _ => document_name.to_ascii_lowercase().ends_with(".txt"),
    }
}

/// Extract the readable text of an HTML document.
///
/// Tags are removed, entities decoded, runs of whitespace collapsed to one
/// space and the ends trimmed. html5ever recovers from any malformed input,
/// so this never fails; broken markup yields whatever text it could find.
pub fn clean(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut pieces: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => SKIPPED_ELEMENTS.contains(&element.name()),
            _ => false,
        });
        if !hidden {
            pieces.push(text);
        }
    }

    collapse_whitespace(&pieces.join(" "))
}

/// [`clean`] for bytes of unknown encoding; invalid UTF-8 is replaced
pub fn clean_bytes(bytes: &[u8]) -> String {
    clean(&String::from_utf8_lossy(bytes))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Consecutive run of words from a larger text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Position of this chunk in its sequence, starting at 0
    pub index: usize,
    pub word_count: usize,
    pub text: String,
}

/// Split `text` into chunks of `size` whitespace-delimited words; the last
/// chunk may be shorter.
///
/// The sequence is lazy. Cloning a [`Chunks`] (or calling `chunk` again)
/// restarts it; joining every chunk with single spaces gives back the
/// whitespace-collapsed input.
pub fn chunk(text: &str, size: NonZeroUsize) -> Chunks<'_> {
    Chunks {
        words: text.split_whitespace(),
        size,
        next_index: 0,
    }
}

#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    words: SplitWhitespace<'a>,
    size: NonZeroUsize,
    next_index: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = TextChunk;

    fn next(&mut self) -> Option<TextChunk> {
        let words: Vec<&str> = self.words.by_ref().take(self.size.get()).collect();
        if words.is_empty() {
            return None;
        }

        let chunk = TextChunk {
            index: self.next_index,
            word_count: words.len(),
            text: words.join(" "),
        };
        self.next_index += 1;
        Some(chunk)
    }
}

impl std::iter::FusedIterator for Chunks<'_> {}
