//! Client-side filtering of autocomplete suggestions.
//!
//! Suggestions are advisory. Input that matches nothing yields an
//! `add_new` entry that simply echoes the text; the value only reaches the
//! store when the surrounding form is submitted.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions<'a> {
    pub matches: Vec<&'a str>,
    pub add_new: Option<&'a str>,
}

/// Filters `options` to those containing `input`, ignoring case.
pub fn suggest<'a>(options: &'a [String], input: &'a str) -> Suggestions<'a> {
    if input.is_empty() {
        return Suggestions {
            matches: options.iter().map(String::as_str).collect(),
            add_new: None,
        };
    }

    let needle = input.to_lowercase();
    let matches: Vec<&str> = options
        .iter()
        .filter(|opt| opt.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect();
    let add_new = (matches.is_empty() && !input.trim().is_empty()).then_some(input);

    Suggestions { matches, add_new }
}
