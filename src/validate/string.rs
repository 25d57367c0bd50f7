use crate::error::{Violation, ViolationKind};
use crate::schema::StringConstraints;

use super::Loc;

/// Lengths count Unicode scalar values; `pattern` is an unanchored search.
pub(super) fn check(c: &StringConstraints, s: &str, loc: &Loc, out: &mut Vec<Violation>) {
    if c.min_length.is_some() || c.max_length.is_some() {
        let actual = s.chars().count() as u64;
        if let Some(limit) = c.min_length {
            if actual < limit {
                out.push(loc.violation("minLength", ViolationKind::MinLength { limit, actual }));
            }
        }
        if let Some(limit) = c.max_length {
            if actual > limit {
                out.push(loc.violation("maxLength", ViolationKind::MaxLength { limit, actual }));
            }
        }
    }
    if let Some(p) = &c.pattern {
        if !p.is_match(s) {
            out.push(loc.violation("pattern", ViolationKind::Pattern { pattern: p.as_str().to_string() }));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::Schema;
    use serde_json::json;

    #[test]
    fn length_counts_code_points() {
        let s = Schema::from_value(&json!({ "minLength": 2, "maxLength": 2 })).unwrap();
        assert!(s.is_valid(&json!("US")));
        assert!(s.is_valid(&json!("日本")));
        assert!(s.is_valid(&json!("ée")));
        assert!(!s.is_valid(&json!("U")));
        assert!(!s.is_valid(&json!("USA")));
    }

    #[test]
    fn pattern_searches_unless_anchored() {
        let open = Schema::from_value(&json!({ "pattern": "[0-9]{3}" })).unwrap();
        assert!(open.is_valid(&json!("abc123def")));
        assert!(!open.is_valid(&json!("abc12")));

        let anchored = Schema::from_value(&json!({ "pattern": "^[0-9]{3}$" })).unwrap();
        assert!(anchored.is_valid(&json!("123")));
        assert!(!anchored.is_valid(&json!("abc123def")));
    }

    #[test]
    fn string_rules_skip_other_kinds() {
        let s = Schema::from_value(&json!({ "minLength": 3, "pattern": "^x" })).unwrap();
        assert!(s.is_valid(&json!(1)));
        assert!(s.is_valid(&json!(["a"])));
    }
}
