//! Template helper library.
//!
//! Deterministic string transforms exposed to every template, both as filters
//! (`{{ name | snake_case }}`) and as functions (`{{ has_prefix(name, "Get") }}`).
//! None of them touch the file system or the schema.
//!
//! | Name | Behavior |
//! |------|----------|
//! | `lower`, `upper` | case folding |
//! | `title` | lowercase, then capitalize every word |
//! | `capitalize` | uppercase the first character, keep the rest |
//! | `snake` / `snake_case` | `UserID` → `user_id` |
//! | `camel` / `camel_case` | `user_id` → `userId` |
//! | `pascal` / `pascal_case` | `user_id` → `UserId` |
//! | `kebab` / `kebab_case` | `UserID` → `user-id` |
//! | `split`, `join`, `trim`, `replace` | string plumbing |
//! | `contains`, `has_prefix`, `has_suffix` | string predicates |
//! | `eq`, `ne` | value comparison |
//! | `index` | map lookup that yields `""` for missing keys or maps |

use minijinja::{Environment, Value};

/// Split an identifier into words on `_`, `-`, whitespace, and case changes.
///
/// A run of capitals followed by a lowercase letter keeps its last capital
/// for the next word: `HTTPServer` → `["HTTP", "Server"]`.
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
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

pub fn lower(s: &str) -> String {
    s.to_lowercase()
}

pub fn upper(s: &str) -> String {
    s.to_uppercase()
}

/// Uppercase the first character and leave the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Lowercase everything, then capitalize the first letter of each word.
pub fn title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.to_lowercase().chars() {
        if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_' || c == '\'');
    }
    out
}

pub fn snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn kebab_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn pascal_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| capitalize(&w.to_lowercase()))
        .collect()
}

pub fn camel_case(s: &str) -> String {
    let mut words = split_words(s).into_iter();
    match words.next() {
        Some(first) => words.fold(first.to_lowercase(), |mut acc, w| {
            acc.push_str(&capitalize(&w.to_lowercase()));
            acc
        }),
        None => String::new(),
    }
}

/// Split on `sep`; with no separator, split on whitespace. An empty separator
/// yields one entry per character.
pub fn split(s: &str, sep: Option<&str>) -> Vec<String> {
    match sep {
        None => s.split_whitespace().map(str::to_string).collect(),
        Some("") => s.chars().map(String::from).collect(),
        Some(sep) => s.split(sep).map(str::to_string).collect(),
    }
}

pub fn join(items: &[String], sep: &str) -> String {
    items.join(sep)
}

pub fn trim(s: &str) -> String {
    s.trim().to_string()
}

pub fn replace(s: &str, old: &str, new: &str) -> String {
    s.replace(old, new)
}

/// Look up `key` in a map value. Missing keys, undefined maps, and `none`
/// all resolve to the empty string.
pub fn index(map: &Value, key: &str) -> Value {
    if map.is_undefined() || map.is_none() {
        return Value::from("");
    }
    match map.get_attr(key) {
        Ok(value) if !value.is_undefined() => value,
        _ => Value::from(""),
    }
}

/// Render a template value as text; undefined and `none` become `""`.
fn text(value: &Value) -> String {
    if value.is_undefined() || value.is_none() {
        String::new()
    } else if let Some(s) = value.as_str() {
        s.to_string()
    } else {
        value.to_string()
    }
}

/// Collect a sequence value as text items; undefined and `none` are empty.
fn text_items(value: &Value) -> Vec<String> {
    if value.is_undefined() || value.is_none() {
        return Vec::new();
    }
    match value.try_iter() {
        Ok(iter) => iter.map(|item| text(&item)).collect(),
        Err(_) => vec![text(value)],
    }
}

macro_rules! register_helper {
    ($env:expr, [$($name:literal),+ $(,)?], $f:expr) => {{
        $(
            $env.add_filter($name, $f);
            $env.add_function($name, $f);
        )+
    }};
}

/// Register every helper as both a filter and a function.
///
/// Helpers replace MiniJinja builtins of the same name, so `capitalize`
/// keeps the tail of the string intact. Missing values are treated as empty
/// strings rather than errors.
pub fn register(env: &mut Environment<'_>) {
    register_helper!(env, ["lower"], |s: Value| lower(&text(&s)));
    register_helper!(env, ["upper"], |s: Value| upper(&text(&s)));
    register_helper!(env, ["title"], |s: Value| title(&text(&s)));
    register_helper!(env, ["capitalize"], |s: Value| capitalize(&text(&s)));
    register_helper!(env, ["snake", "snake_case"], |s: Value| snake_case(&text(&s)));
    register_helper!(env, ["camel", "camel_case"], |s: Value| camel_case(&text(&s)));
    register_helper!(env, ["pascal", "pascal_case"], |s: Value| pascal_case(&text(&s)));
    register_helper!(env, ["kebab", "kebab_case"], |s: Value| kebab_case(&text(&s)));

    register_helper!(env, ["split"], |s: Value, sep: Option<String>| split(
        &text(&s),
        sep.as_deref()
    ));
    register_helper!(env, ["trim"], |s: Value| trim(&text(&s)));
    register_helper!(env, ["join"], |items: Value, sep: Option<String>| join(
        &text_items(&items),
        sep.as_deref().unwrap_or("")
    ));
    register_helper!(env, ["contains"], |s: Value, needle: String| text(&s)
        .contains(needle.as_str()));
    register_helper!(env, ["has_prefix"], |s: Value, prefix: String| text(&s)
        .starts_with(prefix.as_str()));
    register_helper!(env, ["has_suffix"], |s: Value, suffix: String| text(&s)
        .ends_with(suffix.as_str()));
    register_helper!(env, ["replace"], |s: Value, old: String, new: String| {
        replace(&text(&s), &old, &new)
    });

    register_helper!(env, ["eq"], |a: Value, b: Value| a == b);
    register_helper!(env, ["ne"], |a: Value, b: Value| a != b);
    register_helper!(env, ["index"], |map: Value, key: String| index(&map, &key));
}
