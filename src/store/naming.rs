use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

pub const LIST_EXTENSION: &str = "1list";

/// Converts a list title into a filesystem-safe stem made of `[a-z0-9-]`.
///
/// Accents are folded away through NFD decomposition, spaces and underscores turn into hyphens and
/// every other disallowed character is dropped. Runs of hyphens collapse and the stem never starts
/// or ends with one. Titles with nothing usable left become `list`.
pub fn sanitize_stem(title: &str) -> String {
    let lowered: String = title
        .trim()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .to_lowercase();
    let mapped = lowered.chars().filter_map(|c| match c {
        'a'..='z' | '0'..='9' | '-' => Some(c),
        ' ' | '_' => Some('-'),
        _ => None,
    });

    let mut collapsed = String::with_capacity(title.len());
    for c in mapped {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }

    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        "list".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Picks `<stem>.1list`, or `<stem>-<n>.1list` with the smallest free `n` when the plain name is
/// taken. Lists with the same title can therefore coexist.
pub fn unique_filename(stem: &str, existing: &HashSet<String>) -> String {
    let plain = format!("{stem}.{LIST_EXTENSION}");
    if !existing.contains(&plain) {
        return plain;
    }

    (1..)
        .map(|n| format!("{stem}-{n}.{LIST_EXTENSION}"))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or(plain)
}

pub fn is_list_file(file_name: &str) -> bool {
    file_name
        .strip_suffix(LIST_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some_and(|stem| !stem.is_empty())
}

/// Name shown in menus for a list file.
pub fn display_name(file_name: &str) -> &str {
    file_name
        .strip_suffix(LIST_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(file_name)
}
