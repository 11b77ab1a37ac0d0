//! Amount resolution
//!
//! Works out what a specific student owes for a fee type. Pure function of
//! the fee type and the student's class.

use serde::{Deserialize, Serialize};

use core_kernel::{ClassId, Money};

use crate::catalog::FeeType;
use crate::school::Student;

/// How a student's amount for a fee type was arrived at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedAmount {
    /// Fee is not class-specific; the base amount applies
    Flat { amount: Money },
    /// Class-specific fee with an override for the student's class
    ClassOverride { class_id: ClassId, amount: Money },
    /// Class-specific fee, class applicable, no override: base amount
    ClassFallback { class_id: ClassId, amount: Money },
    /// Class-specific fee the student's class is not listed for
    NotApplicable { class_id: ClassId },
}

impl ResolvedAmount {
    /// The owed amount; zero when the fee does not apply
    pub fn amount(&self) -> Money {
        match self {
            ResolvedAmount::Flat { amount }
            | ResolvedAmount::ClassOverride { amount, .. }
            | ResolvedAmount::ClassFallback { amount, .. } => *amount,
            ResolvedAmount::NotApplicable { .. } => Money::zero(),
        }
    }
}

/// Resolves per-student amounts against fee types
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeResolver;

impl FeeResolver {
    /// Classifies the amount `student` owes for `fee_type`
    pub fn resolve(student: &Student, fee_type: &FeeType) -> ResolvedAmount {
        Self::resolve_for_class(student.class_id, fee_type)
    }

    /// Same as [`FeeResolver::resolve`] for a bare class id
    pub fn resolve_for_class(class_id: ClassId, fee_type: &FeeType) -> ResolvedAmount {
        if !fee_type.is_class_specific {
            return ResolvedAmount::Flat { amount: fee_type.amount };
        }
        if !fee_type.applicable_classes.contains(&class_id) {
            return ResolvedAmount::NotApplicable { class_id };
        }
        match fee_type.class_price(class_id) {
            Some(amount) => ResolvedAmount::ClassOverride { class_id, amount },
            None => ResolvedAmount::ClassFallback { class_id, amount: fee_type.amount },
        }
    }

    /// The amount `student` owes for `fee_type` (zero if inapplicable)
    pub fn resolve_amount(student: &Student, fee_type: &FeeType) -> Money {
        Self::resolve(student, fee_type).amount()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::SchoolId;

    fn student_in(class_id: ClassId) -> Student {
        Student::new(class_id, "Ada", "R-01")
    }

    #[test]
    fn test_flat_fee_ignores_class() {
        let fee = FeeType::new(SchoolId::new(), "Books", Money::from_major(50));
        let resolved = FeeResolver::resolve(&student_in(ClassId::new()), &fee);
        assert_eq!(resolved, ResolvedAmount::Flat { amount: Money::from_major(50) });
    }

    #[test]
    fn test_class_specific_override_and_exclusion() {
        let class_a = ClassId::new();
        let class_b = ClassId::new();
        let fee = FeeType::new(SchoolId::new(), "Tuition", Money::from_major(100))
            .for_classes([class_a])
            .with_class_price(class_a, Money::from_major(80));

        assert_eq!(FeeResolver::resolve_amount(&student_in(class_a), &fee), Money::from_major(80));
        assert_eq!(FeeResolver::resolve_amount(&student_in(class_b), &fee), Money::zero());
        assert!(matches!(
            FeeResolver::resolve(&student_in(class_b), &fee),
            ResolvedAmount::NotApplicable { class_id } if class_id == class_b
        ));
    }

    #[test]
    fn test_applicable_class_without_override_falls_back_to_base() {
        let class_a = ClassId::new();
        let class_c = ClassId::new();
        let fee = FeeType::new(SchoolId::new(), "Tuition", Money::from_major(100))
            .for_classes([class_a, class_c])
            .with_class_price(class_a, Money::from_major(80));

        let resolved = FeeResolver::resolve(&student_in(class_c), &fee);
        assert!(matches!(resolved, ResolvedAmount::ClassFallback { .. }));
        assert_eq!(resolved.amount(), Money::from_major(100));
    }

    #[test]
    fn test_override_ignored_when_not_class_specific() {
        let class_a = ClassId::new();
        let mut fee = FeeType::new(SchoolId::new(), "Tuition", Money::from_major(100))
            .with_class_price(class_a, Money::from_major(80));
        fee.is_class_specific = false;

        assert_eq!(FeeResolver::resolve_amount(&student_in(class_a), &fee), Money::from_major(100));
    }
}
