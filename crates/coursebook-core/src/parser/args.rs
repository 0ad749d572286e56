//! Value-level parsing shared by the per-command parsers.

use crate::command::{DeleteTarget, Index, Target};
use crate::model::{CourseSpec, FieldError, Name};

pub const MESSAGE_INVALID_INDEX: &str = "Index is not a non-zero unsigned integer.";

/// Parse a one-based index: digits only, no sign, no leading zero.
///
/// # Errors
///
/// Returns [`MESSAGE_INVALID_INDEX`] for anything else, including `0`,
/// `01` and values that overflow.
pub fn parse_index(raw: &str) -> Result<Index, &'static str> {
    let text = raw.trim();
    let well_formed = !text.is_empty()
        && !text.starts_with('0')
        && text.chars().all(|c| c.is_ascii_digit());
    if !well_formed {
        return Err(MESSAGE_INVALID_INDEX);
    }
    text.parse::<usize>()
        .ok()
        .and_then(Index::from_one_based)
        .ok_or(MESSAGE_INVALID_INDEX)
}

fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// An index when the argument is all digits, otherwise a full name.
///
/// # Errors
///
/// Returns a message when the argument is neither a valid index nor a
/// valid name. Several numbers (`1 2`) are an invalid index, not a name.
pub fn parse_target(raw: &str) -> Result<Target, String> {
    let text = raw.trim();
    let mut tokens = text.split_whitespace();
    if tokens.clone().next().is_some() && tokens.clone().all(is_numeric) {
        return match (tokens.next(), tokens.next()) {
            (Some(only), None) => parse_index(only).map(Target::Index).map_err(String::from),
            _ => Err(MESSAGE_INVALID_INDEX.to_string()),
        };
    }
    Name::parse(text)
        .map(Target::Name)
        .map_err(|err| err.to_string())
}

/// One or more indices (`1 3 5`) or a single full name.
///
/// # Errors
///
/// Returns a message when any index is invalid or the name is invalid.
pub fn parse_delete_target(raw: &str) -> Result<DeleteTarget, String> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if !tokens.is_empty() && tokens.iter().all(|token| is_numeric(token)) {
        let mut indices = Vec::with_capacity(tokens.len());
        for token in tokens {
            let index = parse_index(token)?;
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
        return Ok(DeleteTarget::Indices(indices));
    }
    Name::parse(raw)
        .map(DeleteTarget::Name)
        .map_err(|err| err.to_string())
}

/// Parse `c/` values, keeping the last spec when a code repeats.
///
/// # Errors
///
/// Returns the first [`FieldError`] met.
pub fn parse_course_specs(values: &[String]) -> Result<Vec<CourseSpec>, FieldError> {
    let mut specs: Vec<CourseSpec> = Vec::with_capacity(values.len());
    for value in values {
        let spec = CourseSpec::parse(value)?;
        specs.retain(|existing| existing.code != spec.code);
        specs.push(spec);
    }
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_rules() {
        assert_eq!(parse_index("1").unwrap().zero_based(), 0);
        assert_eq!(parse_index(" 12 ").unwrap().one_based(), 12);
        for bad in ["0", "01", "-1", "+1", "1a", "", "99999999999999999999999"] {
            assert!(parse_index(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn target_is_index_or_name() {
        assert_eq!(
            parse_target("2").unwrap(),
            Target::Index(Index::from_zero_based(1))
        );
        assert!(matches!(parse_target(" Alice Yeoh "), Ok(Target::Name(n)) if n.as_str() == "Alice Yeoh"));
        assert!(parse_target("0").is_err());
        assert_eq!(parse_target("1 2"), Err(MESSAGE_INVALID_INDEX.to_string()));
        assert!(parse_target("Alice!").is_err());
    }

    #[test]
    fn delete_target_accepts_many_indices() {
        let target = parse_delete_target("3 1 3").unwrap();
        assert_eq!(
            target,
            DeleteTarget::Indices(vec![Index::from_zero_based(2), Index::from_zero_based(0)])
        );
        assert!(parse_delete_target("1 0").is_err());
        assert!(matches!(parse_delete_target("Bob 2"), Ok(DeleteTarget::Name(_))));
    }

    #[test]
    fn course_specs_keep_last_per_code() {
        let values = vec!["cs2103t,red".to_string(), "MA1521".into(), "CS2103T,blue".into()];
        let specs = parse_course_specs(&values).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].code.as_str(), "MA1521");
        assert_eq!(specs[1].color, Some(crate::model::CourseColor::Blue));
    }
}
