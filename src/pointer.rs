//! JSON pointer (RFC 6901) helpers shared by the reader and the validator.

/// Append one reference token to a pointer, escaping `~` and `/`.
pub fn push(base: &str, token: &str) -> String {
    let mut out = String::with_capacity(base.len() + token.len() + 1);
    out.push_str(base);
    out.push('/');
    for c in token.chars() {
        match c {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            c => out.push(c),
        }
    }
    out
}

pub fn push_index(base: &str, index: usize) -> String {
    format!("{base}/{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_reserved_characters() {
        assert_eq!(push("", "a/b~c"), "/a~1b~0c");
        assert_eq!(push("#/properties", "x"), "#/properties/x");
        assert_eq!(push_index("/items", 3), "/items/3");
    }
}
