//! Boolean condition table

use super::FilteringOperation;
use crate::value::CellValue;

pub(super) fn operations() -> Vec<FilteringOperation> {
    vec![
        FilteringOperation::new("all", true, |_, _, _| true),
        FilteringOperation::new("true", true, |target, _, _| {
            target.as_bool() == Some(true)
        }),
        FilteringOperation::new("false", true, |target, _, _| {
            target.as_bool() == Some(false)
        }),
        FilteringOperation::new("empty", true, |target, _, _| target.is_null()),
        FilteringOperation::new("notEmpty", true, |target, _, _| !target.is_null()),
    ]
}

#[cfg(test)]
mod tests {
    use crate::conditions::operand_for;
    use crate::schema::DataType;
    use crate::value::CellValue;

    fn logic(name: &str) -> crate::conditions::ConditionLogic {
        operand_for(DataType::Boolean).condition(name).unwrap().logic
    }

    #[test]
    fn test_true_false() {
        assert!(logic("true")(&CellValue::Bool(true), &CellValue::Null, false));
        assert!(!logic("true")(&CellValue::Bool(false), &CellValue::Null, false));
        assert!(!logic("true")(&CellValue::Null, &CellValue::Null, false));
        assert!(logic("false")(&CellValue::Bool(false), &CellValue::Null, false));
        assert!(!logic("false")(&CellValue::Null, &CellValue::Null, false));
    }

    #[test]
    fn test_all_matches_anything() {
        assert!(logic("all")(&CellValue::Null, &CellValue::Null, false));
        assert!(logic("all")(&CellValue::Bool(false), &CellValue::Null, false));
    }

    #[test]
    fn test_empty() {
        assert!(logic("empty")(&CellValue::Null, &CellValue::Null, false));
        assert!(!logic("empty")(&CellValue::Bool(false), &CellValue::Null, false));
    }
}
