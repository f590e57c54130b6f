//! Summary rendering.

use crate::transcript::Transcript;

/// Render the Markdown fragment delivered into a note.
///
/// Sections, separated by blank lines: title heading, thumbnail image,
/// author/link line, summary text. Title and author are inserted verbatim;
/// Markdown-significant characters in them are not escaped.
pub fn format_summary(
    transcript: &Transcript,
    thumbnail_url: &str,
    source_url: &str,
    summary: &str,
) -> String {
    let sections = [
        format!("# {}", transcript.title),
        format!("![Thumbnail]({})", thumbnail_url),
        format!(
            "👤 [{}]({}) | 🔗 [Watch video]({})",
            transcript.author, transcript.channel_url, source_url
        ),
        summary.to_string(),
    ];

    sections.join("\n\n")
}
