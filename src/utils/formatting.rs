use regex::Regex;

/// Assistant markup split into renderable segments. The post-processed
/// answer embeds source citations as `[label](url)` links, so links are a
/// first-class segment next to code.
#[derive(Clone, Debug, PartialEq)]
pub enum ContentSegment {
    Text(String),
    InlineCode(String),
    CodeBlock { language: String, code: String },
    Link { text: String, url: String },
}

pub fn parse_message_content(content: &str) -> Vec<ContentSegment> {
    let mut segments = Vec::new();
    let mut remaining = content;

    while !remaining.is_empty() {
        // Code blocks bind tightest, then inline code, then links.
        if let Some(code_block) = extract_code_block(remaining) {
            // The prefix cannot contain backticks but may still carry
            // citation links.
            push_text_with_links(&mut segments, &code_block.prefix);
            segments.push(ContentSegment::CodeBlock {
                language: code_block.language,
                code: code_block.code,
            });
            remaining = &remaining[code_block.end..];
        } else if let Some(inline_code) = extract_inline_code(remaining) {
            if !inline_code.prefix.is_empty() {
                segments.push(ContentSegment::Text(inline_code.prefix));
            }
            segments.push(ContentSegment::InlineCode(inline_code.code));
            remaining = &remaining[inline_code.end..];
        } else if let Some(link) = extract_link(remaining) {
            if !link.prefix.is_empty() {
                segments.push(ContentSegment::Text(link.prefix));
            }
            segments.push(ContentSegment::Link {
                text: link.text,
                url: link.url,
            });
            remaining = &remaining[link.end..];
        } else {
            segments.push(ContentSegment::Text(remaining.to_string()));
            break;
        }
    }

    segments
}

fn push_text_with_links(segments: &mut Vec<ContentSegment>, text: &str) {
    let mut remaining = text;
    while !remaining.is_empty() {
        match extract_link(remaining) {
            Some(link) => {
                if !link.prefix.is_empty() {
                    segments.push(ContentSegment::Text(link.prefix));
                }
                segments.push(ContentSegment::Link {
                    text: link.text,
                    url: link.url,
                });
                remaining = &remaining[link.end..];
            }
            None => {
                segments.push(ContentSegment::Text(remaining.to_string()));
                break;
            }
        }
    }
}

struct CodeBlockMatch {
    prefix: String,
    language: String,
    code: String,
    end: usize,
}

fn extract_code_block(text: &str) -> Option<CodeBlockMatch> {
    let re = Regex::new(r"^([^`]*?)```(\w*)\n([\s\S]*?)\n```").ok()?;
    let captures = re.captures(text)?;

    Some(CodeBlockMatch {
        prefix: captures.get(1).map(|m| m.as_str()).unwrap_or("").to_string(),
        language: captures.get(2).map(|m| m.as_str()).unwrap_or("").to_string(),
        code: captures.get(3).map(|m| m.as_str()).unwrap_or("").to_string(),
        end: captures.get(0).map(|m| m.end()).unwrap_or(0),
    })
}

struct InlineCodeMatch {
    prefix: String,
    code: String,
    end: usize,
}

fn extract_inline_code(text: &str) -> Option<InlineCodeMatch> {
    let re = Regex::new(r"^([^`\[]*?)`([^`]+)`").ok()?;
    let captures = re.captures(text)?;

    Some(InlineCodeMatch {
        prefix: captures.get(1).map(|m| m.as_str()).unwrap_or("").to_string(),
        code: captures.get(2).map(|m| m.as_str()).unwrap_or("").to_string(),
        end: captures.get(0).map(|m| m.end()).unwrap_or(0),
    })
}

struct LinkMatch {
    prefix: String,
    text: String,
    url: String,
    end: usize,
}

fn extract_link(text: &str) -> Option<LinkMatch> {
    let re = Regex::new(r"^([\s\S]*?)\[([^\]]+)\]\(([^)\s]+)\)").ok()?;
    let captures = re.captures(text)?;

    Some(LinkMatch {
        prefix: captures.get(1).map(|m| m.as_str()).unwrap_or("").to_string(),
        text: captures.get(2).map(|m| m.as_str()).unwrap_or("").to_string(),
        url: captures.get(3).map(|m| m.as_str()).unwrap_or("").to_string(),
        end: captures.get(0).map(|m| m.end()).unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_segment() {
        let segments = parse_message_content("solo texto");
        assert_eq!(segments, vec![ContentSegment::Text("solo texto".to_string())]);
    }

    #[test]
    fn reference_links_are_extracted() {
        let segments =
            parse_message_content("Según el manual [1](https://example.com/manual.pdf), sí.");
        assert_eq!(
            segments,
            vec![
                ContentSegment::Text("Según el manual ".to_string()),
                ContentSegment::Link {
                    text: "1".to_string(),
                    url: "https://example.com/manual.pdf".to_string(),
                },
                ContentSegment::Text(", sí.".to_string()),
            ]
        );
    }

    #[test]
    fn code_block_with_language() {
        let segments = parse_message_content("antes\n```sql\nSELECT 1;\n```resto");
        assert_eq!(
            segments[1],
            ContentSegment::CodeBlock {
                language: "sql".to_string(),
                code: "SELECT 1;".to_string(),
            }
        );
    }

    #[test]
    fn link_before_code_block_is_extracted() {
        let segments = parse_message_content(
            "Ver [1](https://example.com/doc)\n```sql\nSELECT 1;\n```",
        );
        assert_eq!(
            segments,
            vec![
                ContentSegment::Text("Ver ".to_string()),
                ContentSegment::Link {
                    text: "1".to_string(),
                    url: "https://example.com/doc".to_string(),
                },
                ContentSegment::Text("\n".to_string()),
                ContentSegment::CodeBlock {
                    language: "sql".to_string(),
                    code: "SELECT 1;".to_string(),
                },
            ]
        );
    }

    #[test]
    fn inline_code_before_link() {
        let segments = parse_message_content("usa `SELECT` aquí [doc](https://e.com/d)");
        assert!(matches!(segments[1], ContentSegment::InlineCode(_)));
        assert!(matches!(segments[3], ContentSegment::Link { .. }));
    }
}
