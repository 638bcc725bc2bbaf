//! Assessment weight normalization.
//!
//! Validates a module's grading breakdown and fills in missing weights so the
//! components always add up to exactly 100. Integer arithmetic only.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::AssessmentError;

/// Total every breakdown must reach.
pub const FULL_WEIGHT: i64 = 100;

/// One component as submitted by a client. `weight` may be omitted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AssessmentInput {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    #[schema(value_type = Option<i64>)]
    pub weight: Option<serde_json::Number>,
}

impl AssessmentInput {
    pub fn new(kind: impl Into<String>, weight: Option<i64>) -> Self {
        Self {
            kind: kind.into(),
            weight: weight.map(serde_json::Number::from),
        }
    }
}

/// A normalized component with its final weight.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AssessmentComponent {
    #[serde(rename = "type")]
    pub kind: String,
    pub weight: u32,
}

/// Validate `items` and compute the missing weights.
///
/// Unweighted components share whatever the weighted ones leave over. When the
/// remainder does not divide evenly, the earliest unweighted components (input
/// order) get one extra point each.
pub fn normalize(items: &[AssessmentInput]) -> Result<Vec<AssessmentComponent>, AssessmentError> {
    if items.is_empty() {
        return Err(AssessmentError::Empty);
    }

    let mut seen = HashSet::with_capacity(items.len());
    let mut kinds = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let kind = item.kind.trim();
        if kind.is_empty() {
            return Err(AssessmentError::EmptyType { index });
        }
        if !seen.insert(kind.to_lowercase()) {
            return Err(AssessmentError::DuplicateType(kind.to_string()));
        }
        kinds.push(kind);
    }

    let mut weights = Vec::with_capacity(items.len());
    for (item, kind) in items.iter().zip(&kinds) {
        weights.push(match &item.weight {
            Some(number) => Some(parse_weight(number, kind)?),
            None => None,
        });
    }

    if let [only] = weights.as_mut_slice() {
        match *only {
            None => *only = Some(FULL_WEIGHT),
            Some(FULL_WEIGHT) => {}
            Some(other) => return Err(AssessmentError::SingleNotFull(other)),
        }
    } else {
        let specified_sum: i64 = weights.iter().flatten().sum();
        if specified_sum > FULL_WEIGHT {
            return Err(AssessmentError::Overallocated(specified_sum));
        }

        let remaining = FULL_WEIGHT - specified_sum;
        let unspecified = weights.iter().filter(|w| w.is_none()).count() as i64;

        match unspecified {
            0 if specified_sum != FULL_WEIGHT => {
                return Err(AssessmentError::Underallocated(specified_sum));
            }
            0 => {}
            _ => {
                let base = remaining / unspecified;
                let mut extra = remaining % unspecified;
                for slot in weights.iter_mut().filter(|w| w.is_none()) {
                    let bump = i64::from(extra > 0);
                    extra -= bump;
                    *slot = Some(base + bump);
                }
            }
        }
    }

    let components: Vec<AssessmentComponent> = kinds
        .into_iter()
        .zip(weights)
        .map(|(kind, weight)| AssessmentComponent {
            kind: kind.to_string(),
            weight: weight.unwrap_or_default() as u32,
        })
        .collect();

    let total: i64 = components.iter().map(|c| i64::from(c.weight)).sum();
    if total != FULL_WEIGHT {
        return Err(AssessmentError::Inconsistent(total));
    }

    Ok(components)
}

fn parse_weight(number: &serde_json::Number, kind: &str) -> Result<i64, AssessmentError> {
    let weight = match (number.as_i64(), number.as_u64()) {
        (Some(w), _) => w,
        (None, Some(_)) => i64::MAX,
        (None, None) => {
            return Err(AssessmentError::NotAnInteger {
                kind: kind.to_string(),
            })
        }
    };

    if !(0..=FULL_WEIGHT).contains(&weight) {
        return Err(AssessmentError::OutOfRange {
            kind: kind.to_string(),
            weight,
        });
    }
    Ok(weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: &str, weight: Option<i64>) -> AssessmentInput {
        AssessmentInput::new(kind, weight)
    }

    fn weights(out: &[AssessmentComponent]) -> Vec<u32> {
        out.iter().map(|c| c.weight).collect()
    }

    #[test]
    fn test_single_unweighted_gets_full_weight() {
        let out = normalize(&[item("Exam", None)]).unwrap();
        assert_eq!(
            out,
            vec![AssessmentComponent {
                kind: "Exam".into(),
                weight: 100
            }]
        );
    }

    #[test]
    fn test_single_weighted_must_be_full() {
        assert!(normalize(&[item("Exam", Some(100))]).is_ok());
        assert_eq!(
            normalize(&[item("Exam", Some(80))]),
            Err(AssessmentError::SingleNotFull(80))
        );
    }

    #[test]
    fn test_one_unweighted_takes_remainder() {
        let out = normalize(&[item("Exam", Some(60)), item("Assignment", None)]).unwrap();
        assert_eq!(weights(&out), vec![60, 40]);
        assert_eq!(out[1].kind, "Assignment");
    }

    #[test]
    fn test_one_unweighted_can_receive_zero() {
        let out = normalize(&[item("Exam", Some(100)), item("Bonus", None)]).unwrap();
        assert_eq!(weights(&out), vec![100, 0]);
    }

    #[test]
    fn test_one_unweighted_can_receive_everything() {
        let out = normalize(&[item("Quiz", Some(0)), item("Exam", None)]).unwrap();
        assert_eq!(weights(&out), vec![0, 100]);
    }

    #[test]
    fn test_even_split_favours_earliest_items() {
        let out = normalize(&[item("A", None), item("B", None), item("C", None)]).unwrap();
        assert_eq!(weights(&out), vec![34, 33, 33]);
    }

    #[test]
    fn test_split_skips_weighted_items_when_assigning_extra() {
        let out = normalize(&[
            item("Project", Some(30)),
            item("Quiz", None),
            item("Exam", None),
            item("Lab", None),
        ])
        .unwrap();
        // 70 / 3 = 23 remainder 1
        assert_eq!(weights(&out), vec![30, 24, 23, 23]);
    }

    #[test]
    fn test_overallocation_rejected() {
        assert_eq!(
            normalize(&[item("A", Some(50)), item("B", Some(60))]),
            Err(AssessmentError::Overallocated(110))
        );
    }

    #[test]
    fn test_fully_weighted_must_sum_to_hundred() {
        assert_eq!(
            normalize(&[item("A", Some(50)), item("B", Some(40))]),
            Err(AssessmentError::Underallocated(90))
        );
        assert!(normalize(&[item("A", Some(50)), item("B", Some(50))]).is_ok());
    }

    #[test]
    fn test_duplicate_types_are_case_insensitive() {
        assert_eq!(
            normalize(&[item("a", None), item("A", None)]),
            Err(AssessmentError::DuplicateType("A".into()))
        );
    }

    #[test]
    fn test_empty_type_rejected() {
        assert_eq!(
            normalize(&[item("Exam", None), item("   ", None)]),
            Err(AssessmentError::EmptyType { index: 1 })
        );
    }

    #[test]
    fn test_empty_list_rejected() {
        assert_eq!(normalize(&[]), Err(AssessmentError::Empty));
    }

    #[test]
    fn test_weight_range_checked() {
        assert!(matches!(
            normalize(&[item("A", Some(-5)), item("B", None)]),
            Err(AssessmentError::OutOfRange { weight: -5, .. })
        ));
        assert!(matches!(
            normalize(&[item("A", Some(101)), item("B", None)]),
            Err(AssessmentError::OutOfRange { weight: 101, .. })
        ));
    }

    #[test]
    fn test_fractional_weight_rejected() {
        let items: Vec<AssessmentInput> =
            serde_json::from_str(r#"[{"type": "A", "weight": 40.5}, {"type": "B"}]"#).unwrap();
        assert!(matches!(
            normalize(&items),
            Err(AssessmentError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_types_are_trimmed() {
        let out = normalize(&[item("  Exam ", None)]).unwrap();
        assert_eq!(out[0].kind, "Exam");
    }

    #[test]
    fn test_output_always_sums_to_hundred() {
        for count in 1..=12 {
            for fixed in 0..=20 {
                let mut items = vec![item("Fixed", Some(fixed))];
                items.extend((0..count).map(|i| item(&format!("C{i}"), None)));
                let out = normalize(&items).unwrap();
                let total: u32 = out.iter().map(|c| c.weight).sum();
                assert_eq!(total, 100, "count={count} fixed={fixed}");
            }
        }
    }

    #[test]
    fn test_deserializes_type_field() {
        let items: Vec<AssessmentInput> =
            serde_json::from_str(r#"[{"type": "Exam", "weight": 60}, {"type": "Oral", "weight": null}]"#)
                .unwrap();
        let out = normalize(&items).unwrap();
        assert_eq!(weights(&out), vec![60, 40]);
    }
}
