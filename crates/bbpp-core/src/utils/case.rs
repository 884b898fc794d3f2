//! Identifier case checks and conversions.
//!
//! Checks are ASCII-only: workflow designers restrict identifiers to ASCII
//! letters, digits and underscores, so anything else is a separator.

/// Returns true for `myVariable`-style names.
///
/// The first character is a lowercase ASCII letter and there are no
/// separators.
#[must_use]
pub fn is_camel_case(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Returns true for `MyVariable`-style names.
#[must_use]
pub fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Returns true for `my_variable`-style names.
#[must_use]
pub fn is_snake_case(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !name.contains("__")
        && !name.ends_with('_')
}

/// Splits an identifier into words on separators and case boundaries.
///
/// `"userName"`, `"UserName"` and `"user_name"` all yield `["user", "Name"]`
/// or `["User", "Name"]`; acronyms stay together (`"XMLParser"` yields
/// `["XML", "Parser"]`).
#[must_use]
pub fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
        }
        None => String::new(),
    }
}

/// Converts to `PascalCase`.
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    split_words(name).iter().map(|w| capitalize(w)).collect()
}

/// Converts to `camelCase`.
#[must_use]
pub fn to_camel_case(name: &str) -> String {
    split_words(name)
        .iter()
        .enumerate()
        .map(|(i, w)| {
            if i == 0 {
                w.to_ascii_lowercase()
            } else {
                capitalize(w)
            }
        })
        .collect()
}

/// Converts to `snake_case`.
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}
