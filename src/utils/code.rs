//! Normalization of model output into plain source text.

/// Strip an enclosing markdown code fence from model output.
///
/// Models are instructed to emit raw source, but some wrap it anyway. If
/// the text starts with a fence marker, everything up to and including the
/// first line break is dropped (this also removes language tags such as
/// tsx or typescript); a trailing closing fence is dropped likewise.
/// Surrounding whitespace is trimmed. Text without fences passes through
/// untouched apart from the trim.
#[must_use]
pub fn strip_code_fences(content: &str) -> String {
    let mut content = content.trim();

    if content.starts_with("```") {
        content = match content.split_once('\n') {
            Some((_, rest)) => rest,
            // A fence with no newline carries no code at all.
            None => "",
        };
    }

    if content.ends_with("```") {
        if let Some((head, _)) = content.rsplit_once("```") {
            content = head;
        }
    }

    content.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_output_round_trips_to_bare_code() {
        assert_eq!(strip_code_fences("```tsx\nCODE\n```"), "CODE");
        assert_eq!(strip_code_fences("```\nCODE\n```"), "CODE");
    }

    #[test]
    fn bare_output_is_only_trimmed() {
        assert_eq!(strip_code_fences("  const x = 1;\n"), "const x = 1;");
    }

    #[test]
    fn language_tag_is_dropped_with_the_fence() {
        let raw = "```typescript\nexport default function C() {}\n```";
        assert_eq!(strip_code_fences(raw), "export default function C() {}");
    }

    #[test]
    fn unterminated_fence_still_yields_code() {
        assert_eq!(strip_code_fences("```tsx\nCODE"), "CODE");
    }

    #[test]
    fn fence_only_input_yields_empty() {
        assert_eq!(strip_code_fences("```"), "");
        assert_eq!(strip_code_fences("```\n```"), "");
    }

    #[test]
    fn multiline_body_keeps_interior_blank_lines() {
        let raw = "```tsx\nline1\n\nline2\n```";
        assert_eq!(strip_code_fences(raw), "line1\n\nline2");
    }
}
