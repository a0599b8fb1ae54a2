//! Description consistency checks.

use crate::schema::{BuiltinDescriptor, Description, OPERAND_KIND};
use thiserror::Error;

/// Errors that can occur during validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("helper structure {} is missing", OPERAND_KIND)]
    MissingOperandKinds,

    #[error(
        "some of {builtin} operand kinds is illegal: operand {operand} has kind {kind}, \
         which is not presented in {} list",
        OPERAND_KIND
    )]
    UnknownOperandKind {
        builtin: String,
        operand: String,
        kind: String,
    },

    #[error("builtin {builtin} declares operand {operand} more than once")]
    DuplicateOperandName { builtin: String, operand: String },
}

/// Validate a description before any text is generated from it.
///
/// Builtins are checked in declaration order and their operands in operand
/// order; the first inconsistency found is returned.
pub fn validate(desc: &Description) -> Result<(), ValidationError> {
    let kinds = desc
        .operand_kinds()
        .ok_or(ValidationError::MissingOperandKinds)?;

    for (builtin, builtin_desc) in desc.builtin_descriptions.iter() {
        validate_builtin(builtin, builtin_desc, kinds)?;
    }
    Ok(())
}

fn validate_builtin(
    builtin: &str,
    desc: &BuiltinDescriptor,
    kinds: &[String],
) -> Result<(), ValidationError> {
    for (idx, operand) in desc.operands.iter().enumerate() {
        if !kinds.contains(&operand.kind) {
            return Err(ValidationError::UnknownOperandKind {
                builtin: builtin.to_string(),
                operand: operand.name.clone(),
                kind: operand.kind.clone(),
            });
        }

        if desc.operands[..idx]
            .iter()
            .any(|prev| prev.name == operand.name)
        {
            return Err(ValidationError::DuplicateOperandName {
                builtin: builtin.to_string(),
                operand: operand.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BuiltinDescriptions, HelperStructures, OperandDescriptor};

    fn description(builtins: Vec<(&str, BuiltinDescriptor)>) -> Description {
        let helper_structures: HelperStructures = [(
            OPERAND_KIND,
            vec!["VectorIn".to_string(), "VectorOut".to_string()],
        )]
        .into_iter()
        .collect();
        let builtin_descriptions: BuiltinDescriptions = builtins.into_iter().collect();
        Description {
            helper_structures,
            builtin_descriptions,
        }
    }

    #[test]
    fn test_validate_known_kinds() {
        let desc = description(vec![
            (
                "Add",
                BuiltinDescriptor::new(
                    "add",
                    vec![
                        OperandDescriptor::new("DST", "VectorOut"),
                        OperandDescriptor::new("SRC", "VectorIn"),
                    ],
                ),
            ),
            ("Barrier", BuiltinDescriptor::new("barrier", vec![])),
        ]);
        assert!(validate(&desc).is_ok());
    }

    #[test]
    fn test_validate_unknown_kind() {
        let desc = description(vec![
            (
                "Abs",
                BuiltinDescriptor::new("abs", vec![OperandDescriptor::new("SRC", "VectorIn")]),
            ),
            (
                "Load",
                BuiltinDescriptor::new(
                    "load",
                    vec![
                        OperandDescriptor::new("DST", "VectorOut"),
                        OperandDescriptor::new("PTR", "Pointer"),
                    ],
                ),
            ),
        ]);

        let err = validate(&desc).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownOperandKind {
                builtin: "Load".to_string(),
                operand: "PTR".to_string(),
                kind: "Pointer".to_string(),
            }
        );
        assert!(err.to_string().contains("Load"), "{}", err);
    }

    #[test]
    fn test_validate_reports_first_offender() {
        let desc = description(vec![
            (
                "First",
                BuiltinDescriptor::new("first", vec![OperandDescriptor::new("A", "Bogus")]),
            ),
            (
                "Second",
                BuiltinDescriptor::new("second", vec![OperandDescriptor::new("B", "Bogus")]),
            ),
        ]);

        match validate(&desc) {
            Err(ValidationError::UnknownOperandKind { builtin, .. }) => {
                assert_eq!(builtin, "First")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_missing_operand_kinds() {
        let mut desc = description(vec![]);
        desc.helper_structures = [("Other", vec!["A".to_string()])].into_iter().collect();
        assert_eq!(validate(&desc), Err(ValidationError::MissingOperandKinds));
    }

    #[test]
    fn test_validate_duplicate_operand_name() {
        let desc = description(vec![(
            "Copy",
            BuiltinDescriptor::new(
                "copy",
                vec![
                    OperandDescriptor::new("SRC", "VectorIn"),
                    OperandDescriptor::new("SRC", "VectorIn"),
                ],
            ),
        )]);
        assert_eq!(
            validate(&desc),
            Err(ValidationError::DuplicateOperandName {
                builtin: "Copy".to_string(),
                operand: "SRC".to_string(),
            })
        );
    }
}
