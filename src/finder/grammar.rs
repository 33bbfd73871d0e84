//! Dynamic finder tokenizer
//!
//! ```text
//! finder  := "findAllBy" clause ("And" clause)*
//! clause  := Field [Suffix]
//! Suffix  := Between | IsNotNull | IsNull | GreaterThanEquals | GreaterThan
//!          | LessThanEquals | LessThan | Like
//! ```
//!
//! `And` only separates clauses when the next character is uppercase, so a
//! field such as `Android` is never split.

use crate::model::Operator;

use super::errors::{FinderError, FinderResult};

pub const FINDER_PREFIX: &str = "findAllBy";

const SEPARATOR: &str = "And";

/// Suffixes in longest-match order
const SUFFIXES: [(&str, Operator); 8] = [
    ("Between", Operator::Between),
    ("IsNotNull", Operator::IsNotNull),
    ("IsNull", Operator::IsNull),
    ("GreaterThanEquals", Operator::GreaterThanEquals),
    ("GreaterThan", Operator::GreaterThan),
    ("LessThanEquals", Operator::LessThanEquals),
    ("LessThan", Operator::LessThan),
    ("Like", Operator::Like),
];

/// Fragments that only appear in operator suffixes
const OPERATOR_FRAGMENTS: [&str; 7] = [
    "Than", "Null", "Like", "Between", "Equals", "Less", "Greater",
];

/// One `Field[Suffix]` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub field: String,
    pub operator: Operator,
    /// Field carried no suffix but looks like it tried to
    pub suspect_suffix: bool,
}

/// Split a finder expression into clauses
pub fn tokenize(expression: &str) -> FinderResult<Vec<Clause>> {
    let expression = expression.trim();
    let body = expression
        .strip_prefix(FINDER_PREFIX)
        .ok_or_else(|| FinderError::Malformed(expression.to_string()))?;

    if body.is_empty() {
        return Err(FinderError::Malformed(expression.to_string()));
    }

    split_clauses(body)
        .into_iter()
        .map(|token| parse_clause(expression, token))
        .collect()
}

fn split_clauses(body: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut search = 0;

    while let Some(found) = body[search..].find(SEPARATOR) {
        let at = search + found;
        let after = at + SEPARATOR.len();
        let next_is_upper = body[after..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_uppercase());

        if next_is_upper {
            tokens.push(&body[start..at]);
            start = after;
        }
        search = after;
    }
    tokens.push(&body[start..]);
    tokens
}

fn parse_clause(expression: &str, token: &str) -> FinderResult<Clause> {
    for (suffix, operator) in SUFFIXES {
        if let Some(field) = token.strip_suffix(suffix) {
            if field.is_empty() {
                return Err(FinderError::Malformed(expression.to_string()));
            }
            return Ok(Clause {
                field: field.to_string(),
                operator,
                suspect_suffix: false,
            });
        }
    }

    if token.is_empty() {
        return Err(FinderError::Malformed(expression.to_string()));
    }

    // skip the first char so a field named e.g. "Likes" is not suspect
    let suspect_suffix = OPERATOR_FRAGMENTS
        .iter()
        .any(|f| token.get(1..).is_some_and(|rest| rest.contains(f)));

    Ok(Clause {
        field: token.to_string(),
        operator: Operator::Equals,
        suspect_suffix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(expression: &str) -> Vec<(String, Operator)> {
        tokenize(expression)
            .unwrap()
            .into_iter()
            .map(|c| (c.field, c.operator))
            .collect()
    }

    #[test]
    fn test_single_clauses() {
        assert_eq!(ops("findAllByName"), vec![("Name".into(), Operator::Equals)]);
        assert_eq!(ops("findAllByAgeBetween"), vec![("Age".into(), Operator::Between)]);
        assert_eq!(
            ops("findAllByCreditLessThan"),
            vec![("Credit".into(), Operator::LessThan)]
        );
        assert_eq!(
            ops("findAllByCreditLessThanEquals"),
            vec![("Credit".into(), Operator::LessThanEquals)]
        );
        assert_eq!(
            ops("findAllByCommentIsNotNull"),
            vec![("Comment".into(), Operator::IsNotNull)]
        );
        assert_eq!(
            ops("findAllByCommentIsNull"),
            vec![("Comment".into(), Operator::IsNull)]
        );
    }

    #[test]
    fn test_multiple_clauses() {
        assert_eq!(
            ops("findAllByMakerLikeAndMonthLessThanEquals"),
            vec![
                ("Maker".into(), Operator::Like),
                ("Month".into(), Operator::LessThanEquals)
            ]
        );
        assert_eq!(
            ops("findAllByAgeGreaterThanAndNameAndIdIsNull"),
            vec![
                ("Age".into(), Operator::GreaterThan),
                ("Name".into(), Operator::Equals),
                ("Id".into(), Operator::IsNull)
            ]
        );
    }

    #[test]
    fn test_and_inside_a_field() {
        assert_eq!(ops("findAllByAndroid"), vec![("Android".into(), Operator::Equals)]);
        assert_eq!(
            ops("findAllByBrandAndroidAndYear"),
            vec![
                ("BrandAndroid".into(), Operator::Equals),
                ("Year".into(), Operator::Equals)
            ]
        );
    }

    #[test]
    fn test_suspect_suffix() {
        let clauses = tokenize("findAllByCreditLessThhhhan").unwrap();
        assert!(clauses[0].suspect_suffix);
        assert!(!tokenize("findAllByLikes").unwrap()[0].suspect_suffix);
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(tokenize(""), Err(FinderError::Malformed(_))));
        assert!(matches!(tokenize("findAllBy"), Err(FinderError::Malformed(_))));
        assert!(matches!(tokenize("findByName"), Err(FinderError::Malformed(_))));
        assert!(matches!(tokenize("findAllByLike"), Err(FinderError::Malformed(_))));
        assert!(matches!(tokenize("findAllByAndName"), Err(FinderError::Malformed(_))));
    }
}
