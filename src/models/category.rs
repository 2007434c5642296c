//! Expense categories and payment methods
//!
//! Both are closed sets. They serialize using the labels shown to users so
//! stored JSON and exports read naturally.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Medical expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ExpenseCategory {
    #[serde(rename = "Doctor Visit")]
    DoctorVisit,
    Hospital,
    Pharmacy,
    #[serde(rename = "Laboratory Tests")]
    LaboratoryTests,
    Dental,
    Vision,
    #[serde(rename = "Mental Health")]
    MentalHealth,
    #[serde(rename = "Physical Therapy")]
    PhysicalTherapy,
    #[serde(rename = "Medical Equipment")]
    MedicalEquipment,
    Other,
    #[default]
    Uncategorized,
}

impl ExpenseCategory {
    /// Categories offered when entering an expense
    pub const SELECTABLE: [ExpenseCategory; 10] = [
        Self::DoctorVisit,
        Self::Hospital,
        Self::Pharmacy,
        Self::LaboratoryTests,
        Self::Dental,
        Self::Vision,
        Self::MentalHealth,
        Self::PhysicalTherapy,
        Self::MedicalEquipment,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::DoctorVisit => "Doctor Visit",
            Self::Hospital => "Hospital",
            Self::Pharmacy => "Pharmacy",
            Self::LaboratoryTests => "Laboratory Tests",
            Self::Dental => "Dental",
            Self::Vision => "Vision",
            Self::MentalHealth => "Mental Health",
            Self::PhysicalTherapy => "Physical Therapy",
            Self::MedicalEquipment => "Medical Equipment",
            Self::Other => "Other",
            Self::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    /// Matches labels case-insensitively, ignoring spaces, dashes and underscores,
    /// so "doctor-visit" and "Doctor Visit" both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::SELECTABLE
            .iter()
            .chain(std::iter::once(&Self::Uncategorized))
            .find(|c| normalize(c.label()) == wanted)
            .copied()
            .ok_or_else(|| format!("Unknown category: '{}'", s.trim()))
    }
}

/// How an expense was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    Insurance,
    #[serde(rename = "HSA/FSA")]
    HsaFsa,
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        Self::Cash,
        Self::CreditCard,
        Self::DebitCard,
        Self::Insurance,
        Self::HsaFsa,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::Insurance => "Insurance",
            Self::HsaFsa => "HSA/FSA",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .iter()
            .find(|m| normalize(m.label()) == wanted)
            .copied()
            .ok_or_else(|| format!("Unknown payment method: '{}'", s.trim()))
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
