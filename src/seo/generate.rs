use super::strip_tags;

const TITLE_MAX: usize = 60;
const DESCRIPTION_MAX: usize = 160;
const ELLIPSIS: &str = "...";

/// Shortens `text` to at most `max` characters, ending in `...` when it was cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }

    let keep = max - ELLIPSIS.len();
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

pub fn generate_meta_title(title: &str) -> String {
    truncate(title, TITLE_MAX)
}

/// Builds a meta description from HTML or plain text: tags are dropped and whitespace collapsed.
pub fn generate_meta_description(text: &str) -> String {
    let plain = strip_tags(text);
    let collapsed = plain.split_whitespace().collect::<Vec<_>>().join(" ");

    truncate(&collapsed, DESCRIPTION_MAX)
}
