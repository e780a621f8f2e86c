/*!
 * Document segmentation.
 *
 * A document is cut at line breaks into ordered segments. Blank lines become
 * blank segments so the layout survives reassembly. Segments longer than the
 * chunk size are further split into model-sized pieces at sentence boundaries.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::Config;

// Sentence terminators; CJK full stops need no trailing space
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?…]+[\u{0022}\u{0027}\u{00BB}\u{201D}\u{2019})]*\s+|[。！？]+\s*").unwrap()
});

/// An ordered slice of the source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Position in the document, starting at 0
    pub index: usize,
    /// Trimmed text; empty for blank segments
    pub text: String,
    /// Number of source lines merged into this segment
    pub line_count: usize,
}

impl Segment {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Rules for cutting a document
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationPolicy {
    /// Largest piece of text sent to the model in one call
    pub max_chars: usize,
    /// Merge consecutive short lines
    pub group_short_lines: bool,
    /// Lines per group before it is closed
    pub min_lines: usize,
    /// Lines shorter than this can be grouped
    pub short_line_chars: usize,
}

impl SegmentationPolicy {
    /// One segment per line
    pub fn line_by_line(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
            group_short_lines: false,
            min_lines: 1,
            short_line_chars: 0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            max_chars: config.chunk_size.max(1),
            group_short_lines: config.segmentation.group_short_lines,
            min_lines: config.segmentation.min_lines.max(1),
            short_line_chars: config.segmentation.short_line_chars,
        }
    }
}

/// Cuts documents into segments and segments into model-sized pieces
#[derive(Debug, Clone)]
pub struct Segmenter {
    policy: SegmentationPolicy,
}

impl Segmenter {
    pub fn new(policy: SegmentationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SegmentationPolicy {
        &self.policy
    }

    /// Split a document into ordered segments
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        let mut segments: Vec<Segment> = Vec::new();
        let mut group: Vec<&str> = Vec::new();
        let mut group_chars = 0;

        for line in text.split('\n').map(str::trim) {
            let line_chars = line.chars().count();

            if line.is_empty() {
                Self::flush_group(&mut group, &mut group_chars, &mut segments);
                Self::push(&mut segments, String::new(), 1);
                continue;
            }

            let groupable = self.policy.group_short_lines && line_chars < self.policy.short_line_chars;
            if !groupable {
                Self::flush_group(&mut group, &mut group_chars, &mut segments);
                Self::push(&mut segments, line.to_string(), 1);
                continue;
            }

            if !group.is_empty() && group_chars + 1 + line_chars > self.policy.max_chars {
                Self::flush_group(&mut group, &mut group_chars, &mut segments);
            }

            group_chars += line_chars + usize::from(!group.is_empty());
            group.push(line);

            if group.len() >= self.policy.min_lines {
                Self::flush_group(&mut group, &mut group_chars, &mut segments);
            }
        }

        Self::flush_group(&mut group, &mut group_chars, &mut segments);
        segments
    }

    fn push(segments: &mut Vec<Segment>, text: String, line_count: usize) {
        let index = segments.len();
        segments.push(Segment { index, text, line_count });
    }

    fn flush_group(group: &mut Vec<&str>, group_chars: &mut usize, segments: &mut Vec<Segment>) {
        if group.is_empty() {
            return;
        }
        let line_count = group.len();
        Self::push(segments, group.join("\n"), line_count);
        group.clear();
        *group_chars = 0;
    }

    /// Split a segment into pieces no longer than the chunk size
    ///
    /// Pieces follow sentence boundaries; a sentence that alone exceeds the
    /// limit is cut between words, and a word that does is cut between characters.
    pub fn split_for_model(&self, text: &str) -> Vec<String> {
        let max_chars = self.policy.max_chars;
        if text.chars().count() <= max_chars {
            return vec![text.to_string()];
        }

        let mut pieces = Vec::new();
        let mut current = String::new();

        for sentence in split_sentences(text) {
            if sentence.chars().count() > max_chars {
                flush_piece(&mut current, &mut pieces);
                pieces.extend(split_words(sentence, max_chars));
                continue;
            }

            if !current.is_empty() && current.chars().count() + 1 + sentence.chars().count() > max_chars {
                flush_piece(&mut current, &mut pieces);
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(sentence);
        }

        flush_piece(&mut current, &mut pieces);
        pieces
    }
}

/// Join translated segments back into a document
pub fn reassemble<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
}

fn flush_piece(current: &mut String, pieces: &mut Vec<String>) {
    if !current.is_empty() {
        pieces.push(std::mem::take(current));
    }
}

/// Split text after sentence terminators
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(text) {
        let sentence = text[start..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = m.end();
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

fn split_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        if word_chars > max_chars {
            flush_piece(&mut current, &mut pieces);
            let chars: Vec<char> = word.chars().collect();
            pieces.extend(chars.chunks(max_chars).map(|chunk| chunk.iter().collect::<String>()));
            continue;
        }

        if !current.is_empty() && current.chars().count() + 1 + word_chars > max_chars {
            flush_piece(&mut current, &mut pieces);
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    flush_piece(&mut current, &mut pieces);
    pieces
}
