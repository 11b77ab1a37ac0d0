//! Fee type definitions and the per-school catalog
//!
//! A fee type has a base (list) price. Class-specific fee types apply only to
//! the classes named in `applicable_classes` and may carry a per-class price
//! override for some of them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use core_kernel::{ClassId, FeeTypeId, Money, SchoolId};

/// A per-class price override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPrice {
    pub class_id: ClassId,
    pub amount: Money,
}

/// A category of charge (tuition, books, transport, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeType {
    pub id: FeeTypeId,
    pub school_id: SchoolId,
    pub name: String,
    /// Base amount, also the nominal price used for planned revenue
    pub amount: Money,
    pub due_date: Option<NaiveDate>,
    pub is_active: bool,
    pub is_class_specific: bool,
    /// Class price overrides; only consulted when `is_class_specific`
    pub class_prices: Vec<ClassPrice>,
    /// Classes the fee applies to when `is_class_specific`
    pub applicable_classes: Vec<ClassId>,
    pub description: Option<String>,
}

impl FeeType {
    /// Creates an active fee type that applies to every class at `amount`
    pub fn new(school_id: SchoolId, name: impl Into<String>, amount: Money) -> Self {
        Self {
            id: FeeTypeId::new_v7(),
            school_id,
            name: name.into(),
            amount,
            due_date: None,
            is_active: true,
            is_class_specific: false,
            class_prices: Vec::new(),
            applicable_classes: Vec::new(),
            description: None,
        }
    }

    /// Sets the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Restricts the fee to the given classes
    pub fn for_classes(mut self, classes: impl IntoIterator<Item = ClassId>) -> Self {
        self.is_class_specific = true;
        self.applicable_classes = classes.into_iter().collect();
        self
    }

    /// Adds a price override for a class
    ///
    /// The class is also made applicable, since an override for a class the
    /// fee does not apply to could never be charged.
    pub fn with_class_price(mut self, class_id: ClassId, amount: Money) -> Self {
        self.is_class_specific = true;
        if !self.applicable_classes.contains(&class_id) {
            self.applicable_classes.push(class_id);
        }
        self.class_prices.retain(|p| p.class_id != class_id);
        self.class_prices.push(ClassPrice { class_id, amount });
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deactivate(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// True when the fee is charged to students of `class_id`
    pub fn applies_to(&self, class_id: ClassId) -> bool {
        !self.is_class_specific || self.applicable_classes.contains(&class_id)
    }

    /// The override for `class_id`, if one is defined
    pub fn class_price(&self, class_id: ClassId) -> Option<Money> {
        self.class_prices
            .iter()
            .find(|p| p.class_id == class_id)
            .map(|p| p.amount)
    }
}

/// All fee types of one school, loaded once per request
#[derive(Debug, Clone, Default)]
pub struct FeeCatalog {
    fee_types: Vec<FeeType>,
    index: HashMap<FeeTypeId, usize>,
}

impl FeeCatalog {
    /// Builds a catalog, keeping the first definition of a duplicated id
    pub fn new(fee_types: Vec<FeeType>) -> Self {
        let mut catalog = Self::default();
        for fee_type in fee_types {
            if catalog.index.contains_key(&fee_type.id) {
                continue;
            }
            catalog.index.insert(fee_type.id, catalog.fee_types.len());
            catalog.fee_types.push(fee_type);
        }
        catalog
    }

    pub fn get(&self, id: &FeeTypeId) -> Option<&FeeType> {
        self.index.get(id).map(|&i| &self.fee_types[i])
    }

    /// Every fee type, in load order
    pub fn all(&self) -> &[FeeType] {
        &self.fee_types
    }

    /// Active fee types, in load order
    pub fn active(&self) -> impl Iterator<Item = &FeeType> {
        self.fee_types.iter().filter(|f| f.is_active)
    }

    /// Active fee types that apply to `class_id`
    pub fn applicable_to(&self, class_id: ClassId) -> impl Iterator<Item = &FeeType> {
        self.active().filter(move |f| f.applies_to(class_id))
    }

    /// Display name for a fee type id, if the catalog knows it
    pub fn name_of(&self, id: &FeeTypeId) -> Option<&str> {
        self.get(id).map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fee_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fee_types.is_empty()
    }
}

impl FromIterator<FeeType> for FeeCatalog {
    fn from_iter<I: IntoIterator<Item = FeeType>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
