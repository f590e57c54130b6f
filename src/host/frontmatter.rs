//! YAML front-matter handling for Markdown notes.

use crate::error::{Result, TldwError};

/// Front-matter key/value mapping.
pub type Frontmatter = serde_yaml::Mapping;

const DELIMITER: &str = "---";

/// Split a note into its raw front-matter block (without delimiters) and body.
///
/// A note has front-matter only when its first line is `---` and a later line
/// closes the block with `---`.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let Some(first_line_end) = content.find('\n') else {
        return (None, content);
    };
    if content[..first_line_end].trim_end() != DELIMITER {
        return (None, content);
    }

    let yaml_start = first_line_end + 1;
    let mut offset = yaml_start;
    for line in content[yaml_start..].split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let yaml = &content[yaml_start..offset];
            let body = &content[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    (None, content)
}

/// Parse the front-matter of a note.
pub fn parse_frontmatter(content: &str) -> Result<Frontmatter> {
    match split_frontmatter(content).0 {
        Some(yaml) if !yaml.trim().is_empty() => {
            let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
            match value {
                serde_yaml::Value::Mapping(mapping) => Ok(mapping),
                serde_yaml::Value::Null => Ok(Frontmatter::new()),
                _ => Err(TldwError::Document(
                    "front-matter is not a key/value mapping".to_string(),
                )),
            }
        }
        _ => Ok(Frontmatter::new()),
    }
}

/// Render a note from front-matter and body.
pub fn render_document(frontmatter: &Frontmatter, body: &str) -> Result<String> {
    if frontmatter.is_empty() {
        return Ok(body.to_string());
    }
    let yaml = serde_yaml::to_string(frontmatter)?;
    Ok(format!("{}\n{}{}\n{}", DELIMITER, yaml, DELIMITER, body))
}
