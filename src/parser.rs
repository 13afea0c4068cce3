//! Extracts file-write proposals from a model reply.
//!
//! The system prompt documents the protocol: a proposal is a fenced code
//! block whose opening fence carries a `path="relative/path.ext"` attribute,
//! e.g. ```` ```file path="src/Foo.txt" ````. Blocks without the attribute
//! are plain illustrative code and are ignored.

/// A proposed file write, pending user confirmation. The path is untrusted
/// until it passes the workspace guards at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSuggestion {
    pub path: String,
    pub content: String,
}

/// Single-pass scan over the reply. Annotated blocks become suggestions in
/// document order; unannotated blocks are skipped wholesale so their bodies
/// are never re-scanned; an unterminated fence is discarded.
pub fn extract_suggestions(reply: &str) -> Vec<FileSuggestion> {
    let mut suggestions = Vec::new();
    let mut lines = reply.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        let Some(header) = trimmed.strip_prefix("```") else {
            continue;
        };

        let path = parse_path_attribute(header);

        let mut body: Vec<&str> = Vec::new();
        let mut terminated = false;
        for body_line in lines.by_ref() {
            if body_line.trim() == "```" {
                terminated = true;
                break;
            }
            body.push(body_line);
        }

        if !terminated {
            break;
        }

        if let Some(path) = path {
            suggestions.push(FileSuggestion {
                path,
                content: body.join("\n"),
            });
        }
    }

    suggestions
}

/// Pulls the target path out of a fence header like `file path="src/x.rs"`.
/// Returns None when the header has no well-formed attribute.
fn parse_path_attribute(header: &str) -> Option<String> {
    let header = header.trim();
    let attr_pos = header.find("path=\"")?;

    // Anything before the attribute must be a bare tag token, not quoted
    // text that happens to contain `path="`.
    let tag = header[..attr_pos].trim();
    if tag.contains('"') || tag.contains(char::is_whitespace) {
        return None;
    }

    let rest = &header[attr_pos + "path=\"".len()..];
    let end = rest.find('"')?;
    let path = rest[..end].trim();
    if path.is_empty() {
        return None;
    }
    Some(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_a_single_annotated_block() {
        let reply = "Here you go:\n```file path=\"src/Foo.txt\"\nhello\n```\nDone.";
        let suggestions = extract_suggestions(reply);
        assert_eq!(
            suggestions,
            vec![FileSuggestion {
                path: "src/Foo.txt".to_string(),
                content: "hello".to_string(),
            }]
        );
    }

    #[test]
    fn extracts_multiple_blocks_in_document_order() {
        let reply = concat!(
            "First:\n",
            "```file path=\"a.txt\"\n",
            "one\n",
            "```\n",
            "Second:\n",
            "```rust path=\"src/b.rs\"\n",
            "fn b() {}\n",
            "```\n",
        );
        let suggestions = extract_suggestions(reply);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].path, "a.txt");
        assert_eq!(suggestions[0].content, "one");
        assert_eq!(suggestions[1].path, "src/b.rs");
        assert_eq!(suggestions[1].content, "fn b() {}");
    }

    #[test]
    fn preserves_body_verbatim_including_blank_lines() {
        let reply = "```file path=\"x.txt\"\nline one\n\n  indented\n\n```";
        let suggestions = extract_suggestions(reply);
        assert_eq!(suggestions[0].content, "line one\n\n  indented\n");
    }

    #[test]
    fn ignores_blocks_without_a_path_annotation() {
        let reply = "```rust\nfn main() {}\n```\nplain text";
        assert!(extract_suggestions(reply).is_empty());
    }

    #[test]
    fn returns_empty_for_text_with_no_fences() {
        assert!(extract_suggestions("just a normal reply").is_empty());
        assert!(extract_suggestions("").is_empty());
    }

    #[test]
    fn skips_unannotated_blocks_without_rescanning_their_bodies() {
        // The plain block's body mentions the annotated form; it must not
        // be picked up as a suggestion.
        let reply = concat!(
            "```text\n",
            "```file path=\"trap.txt\"\n",
            "```\n",
            "after\n",
            "```file path=\"real.txt\"\n",
            "ok\n",
            "```\n",
        );
        let suggestions = extract_suggestions(reply);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].path, "real.txt");
        assert_eq!(suggestions[0].content, "ok");
    }

    #[test]
    fn discards_an_unterminated_fence() {
        let reply = "```file path=\"x.txt\"\nno closing fence";
        assert!(extract_suggestions(reply).is_empty());
    }

    #[test]
    fn rejects_malformed_path_attributes() {
        assert!(extract_suggestions("```file path=\"\"\nbody\n```").is_empty());
        assert!(extract_suggestions("```file path=src/x.rs\nbody\n```").is_empty());
    }
}
