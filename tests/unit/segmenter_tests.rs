/*!
 * Tests for document segmentation
 */

use l2t::app_config::Config;
use l2t::translation::segmenter::{reassemble, split_sentences};
use l2t::translation::{SegmentationPolicy, Segmenter};

fn grouping_policy(min_lines: usize, short_line_chars: usize, max_chars: usize) -> SegmentationPolicy {
    SegmentationPolicy {
        max_chars,
        group_short_lines: true,
        min_lines,
        short_line_chars,
    }
}

#[test]
fn test_segment_withLineByLinePolicy_shouldProduceOneSegmentPerLine() {
    let segmenter = Segmenter::new(SegmentationPolicy::line_by_line(500));

    let segments = segmenter.segment("First line\nSecond line\nThird line");

    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["First line", "Second line", "Third line"]);
    assert!(segments.iter().enumerate().all(|(i, s)| s.index == i && s.line_count == 1));
}

/// Blank and whitespace-only lines keep their position as blank segments
#[test]
fn test_segment_withBlankLines_shouldKeepThemInPlace() {
    let segmenter = Segmenter::new(SegmentationPolicy::line_by_line(500));

    let segments = segmenter.segment("Title\n\n   \nBody text\n");

    let blanks: Vec<bool> = segments.iter().map(|s| s.is_blank()).collect();
    assert_eq!(blanks, vec![false, true, true, false, true]);
    assert_eq!(segments[3].text, "Body text");
}

#[test]
fn test_segment_withCrlfAndIndentation_shouldTrimLines() {
    let segmenter = Segmenter::new(SegmentationPolicy::line_by_line(500));

    let segments = segmenter.segment("  one\r\n\ttwo  \r\n");

    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", ""]);
}

/// Reassembling the segments restores the line layout of the trimmed input
#[test]
fn test_reassemble_withSegments_shouldRestoreLineCount() {
    let segmenter = Segmenter::new(SegmentationPolicy::line_by_line(500));
    let text = "a\n\nb\nc\n\n";

    let segments = segmenter.segment(text);
    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();

    assert_eq!(reassemble(&texts), text);
}

#[test]
fn test_segment_withGrouping_shouldMergeShortLines() {
    let segmenter = Segmenter::new(grouping_policy(3, 40, 500));

    let segments = segmenter.segment("a\nb\nc\nd\nThis line is definitely longer than forty characters.\ne");

    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["a\nb\nc", "d", "This line is definitely longer than forty characters.", "e"]
    );
    assert_eq!(segments[0].line_count, 3);
    assert_eq!(segments[1].line_count, 1);
}

#[test]
fn test_segment_withGroupingAndBlankLine_shouldCloseGroup() {
    let segmenter = Segmenter::new(grouping_policy(3, 40, 500));

    let segments = segmenter.segment("a\nb\n\nc");

    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["a\nb", "", "c"]);
}

#[test]
fn test_segment_withGroupingOverChunkSize_shouldSplitGroup() {
    let segmenter = Segmenter::new(grouping_policy(10, 40, 12));

    let segments = segmenter.segment("aaaaa\nbbbbb\nccccc");

    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["aaaaa\nbbbbb", "ccccc"]);
}

#[test]
fn test_split_for_model_withShortText_shouldReturnItWhole() {
    let segmenter = Segmenter::new(SegmentationPolicy::line_by_line(100));
    assert_eq!(segmenter.split_for_model("Short."), vec!["Short."]);
}

/// Long lines are cut at sentence boundaries, each piece within the limit
#[test]
fn test_split_for_model_withLongLine_shouldPackSentences() {
    let segmenter = Segmenter::new(SegmentationPolicy::line_by_line(30));
    let text = "The first sentence. The second one! A third? And the last sentence here.";

    let pieces = segmenter.split_for_model(text);

    assert_eq!(
        pieces,
        vec!["The first sentence.", "The second one! A third?", "And the last sentence here."]
    );
    assert!(pieces.iter().all(|p| p.chars().count() <= 30));
}

#[test]
fn test_split_for_model_withNoPunctuation_shouldCutBetweenWords() {
    let segmenter = Segmenter::new(SegmentationPolicy::line_by_line(10));

    let pieces = segmenter.split_for_model("one two three four five six");

    assert_eq!(pieces, vec!["one two", "three four", "five six"]);
}

#[test]
fn test_split_sentences_withTrailingText_shouldKeepTail() {
    assert_eq!(split_sentences("Hi there. Bye"), vec!["Hi there.", "Bye"]);
    assert_eq!(split_sentences("\"Quoted!\" Next."), vec!["\"Quoted!\"", "Next."]);
}

#[test]
fn test_policy_from_config_shouldCopySettings() {
    let mut config = Config::default();
    config.chunk_size = 250;
    config.segmentation.group_short_lines = true;

    let policy = SegmentationPolicy::from_config(&config);

    assert_eq!(policy.max_chars, 250);
    assert!(policy.group_short_lines);
    assert_eq!(policy.min_lines, 3);
    assert_eq!(policy.short_line_chars, 40);
}
