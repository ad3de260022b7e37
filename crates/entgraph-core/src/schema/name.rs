use std_util::str;

/// A type name split into lowercase words, from which every derived
/// spelling is produced.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name {
    pub parts: Vec<String>,
}

impl Name {
    pub fn new(src: &str) -> Name {
        let snake = str::snake_case(src);
        let parts = snake
            .split('_')
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect();
        Name { parts }
    }

    pub fn camel_case(&self) -> String {
        str::camel_case(&self.snake_case())
    }

    pub fn upper_camel_case(&self) -> String {
        str::upper_camel_case(&self.snake_case())
    }

    pub fn snake_case(&self) -> String {
        self.parts.join("_")
    }

    pub fn upper_snake_case(&self) -> String {
        str::upper_snake_case(&self.snake_case())
    }

    /// `snake_case` with the last word pluralized, e.g. `pet_owners`.
    pub fn plural_snake_case(&self) -> String {
        str::pluralize(&self.snake_case())
    }
}

impl core::fmt::Display for Name {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.upper_camel_case())
    }
}
