use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};

pub fn snake_case(src: &str) -> String {
    src.to_snake_case()
}

pub fn camel_case(src: &str) -> String {
    src.to_lower_camel_case()
}

pub fn upper_camel_case(src: &str) -> String {
    src.to_upper_camel_case()
}

pub fn upper_snake_case(src: &str) -> String {
    src.to_shouty_snake_case()
}

/// Pluralizes the last word of a snake_case identifier.
pub fn pluralize(src: &str) -> String {
    map_last_word(src, |word| pluralizer::pluralize(word, 2, false))
}

/// Singularizes the last word of a snake_case identifier.
pub fn singularize(src: &str) -> String {
    map_last_word(src, |word| pluralizer::pluralize(word, 1, false))
}

fn map_last_word(src: &str, f: impl FnOnce(&str) -> String) -> String {
    match src.rsplit_once('_') {
        Some((head, last)) => format!("{head}_{}", f(last)),
        None => f(src),
    }
}
