//! Canonical payroll fields and section labels.
//!
//! Every column the engine understands resolves to one [`CanonicalField`].
//! The value kind of each field is declared here, so adding a field forces
//! a decision about how its cells are coerced.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the cells of a field are coerced into a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Trimmed free text.
    Text,
    /// A whole number, such as a sequence number or a dependant count.
    IntegerCount,
    /// A fractional quantity such as hours or working days.
    DecimalHours,
    /// A money amount kept exactly as the sheet displays it.
    MoneyString,
}

/// A canonical payroll field.
///
/// The income/deduction pairs (`MealFeeIncome`/`MealFeeDeduction`,
/// `OtherIncome`/`OtherDeduction`) share their header wording on real
/// sheets and are told apart by the section the column sits under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    /// Row ordinal printed on the sheet.
    SequenceNumber,
    /// Employee code, the identifier checked against the directory.
    EmployeeCode,
    /// Employee full name.
    EmployeeName,
    /// Department or team.
    Department,
    /// Job title.
    Position,
    /// Bank account number.
    BankAccount,
    /// Free-text remark.
    Note,
    /// Number of registered dependants for tax relief.
    DependentCount,
    /// Contractual base salary.
    BasicSalary,
    /// Days worked in the period.
    WorkingDays,
    /// Paid leave days taken.
    LeaveDays,
    /// Overtime hours paid at 150%.
    #[serde(rename = "overtime_hours_15x")]
    OvertimeHours15x,
    /// Overtime hours paid at 200%.
    #[serde(rename = "overtime_hours_20x")]
    OvertimeHours20x,
    /// Overtime hours paid at 300%.
    #[serde(rename = "overtime_hours_30x")]
    OvertimeHours30x,
    /// Total overtime pay.
    OvertimePay,
    /// General allowance.
    Allowance,
    /// Attendance bonus.
    AttendanceBonus,
    /// Meal money paid out as income.
    MealFeeIncome,
    /// Meal money withheld as a deduction.
    MealFeeDeduction,
    /// Miscellaneous income.
    OtherIncome,
    /// Miscellaneous deduction.
    OtherDeduction,
    /// Gross income before deductions.
    GrossIncome,
    /// Social insurance contribution.
    SocialInsurance,
    /// Health insurance contribution.
    HealthInsurance,
    /// Unemployment insurance contribution.
    UnemploymentInsurance,
    /// Trade union fee.
    UnionFee,
    /// Personal income tax withheld.
    PersonalIncomeTax,
    /// Salary advance already paid.
    AdvancePayment,
    /// Sum of all deductions.
    TotalDeduction,
    /// Amount actually paid to the employee.
    NetPay,
}

impl CanonicalField {
    /// Every canonical field, in declaration order.
    pub const ALL: [CanonicalField; 30] = [
        Self::SequenceNumber,
        Self::EmployeeCode,
        Self::EmployeeName,
        Self::Department,
        Self::Position,
        Self::BankAccount,
        Self::Note,
        Self::DependentCount,
        Self::BasicSalary,
        Self::WorkingDays,
        Self::LeaveDays,
        Self::OvertimeHours15x,
        Self::OvertimeHours20x,
        Self::OvertimeHours30x,
        Self::OvertimePay,
        Self::Allowance,
        Self::AttendanceBonus,
        Self::MealFeeIncome,
        Self::MealFeeDeduction,
        Self::OtherIncome,
        Self::OtherDeduction,
        Self::GrossIncome,
        Self::SocialInsurance,
        Self::HealthInsurance,
        Self::UnemploymentInsurance,
        Self::UnionFee,
        Self::PersonalIncomeTax,
        Self::AdvancePayment,
        Self::TotalDeduction,
        Self::NetPay,
    ];

    /// Returns how cells of this field are coerced.
    pub fn kind(self) -> ValueKind {
        match self {
            Self::EmployeeCode
            | Self::EmployeeName
            | Self::Department
            | Self::Position
            | Self::BankAccount
            | Self::Note => ValueKind::Text,
            Self::SequenceNumber | Self::DependentCount => ValueKind::IntegerCount,
            Self::WorkingDays
            | Self::LeaveDays
            | Self::OvertimeHours15x
            | Self::OvertimeHours20x
            | Self::OvertimeHours30x => ValueKind::DecimalHours,
            Self::BasicSalary
            | Self::OvertimePay
            | Self::Allowance
            | Self::AttendanceBonus
            | Self::MealFeeIncome
            | Self::MealFeeDeduction
            | Self::OtherIncome
            | Self::OtherDeduction
            | Self::GrossIncome
            | Self::SocialInsurance
            | Self::HealthInsurance
            | Self::UnemploymentInsurance
            | Self::UnionFee
            | Self::PersonalIncomeTax
            | Self::AdvancePayment
            | Self::TotalDeduction
            | Self::NetPay => ValueKind::MoneyString,
        }
    }

    /// Returns true for the fields every sheet must provide.
    pub fn is_mandatory(self) -> bool {
        matches!(self, Self::EmployeeCode | Self::EmployeeName)
    }

    /// The snake_case identifier used in configuration and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SequenceNumber => "sequence_number",
            Self::EmployeeCode => "employee_code",
            Self::EmployeeName => "employee_name",
            Self::Department => "department",
            Self::Position => "position",
            Self::BankAccount => "bank_account",
            Self::Note => "note",
            Self::DependentCount => "dependent_count",
            Self::BasicSalary => "basic_salary",
            Self::WorkingDays => "working_days",
            Self::LeaveDays => "leave_days",
            Self::OvertimeHours15x => "overtime_hours_15x",
            Self::OvertimeHours20x => "overtime_hours_20x",
            Self::OvertimeHours30x => "overtime_hours_30x",
            Self::OvertimePay => "overtime_pay",
            Self::Allowance => "allowance",
            Self::AttendanceBonus => "attendance_bonus",
            Self::MealFeeIncome => "meal_fee_income",
            Self::MealFeeDeduction => "meal_fee_deduction",
            Self::OtherIncome => "other_income",
            Self::OtherDeduction => "other_deduction",
            Self::GrossIncome => "gross_income",
            Self::SocialInsurance => "social_insurance",
            Self::HealthInsurance => "health_insurance",
            Self::UnemploymentInsurance => "unemployment_insurance",
            Self::UnionFee => "union_fee",
            Self::PersonalIncomeTax => "personal_income_tax",
            Self::AdvancePayment => "advance_payment",
            Self::TotalDeduction => "total_deduction",
            Self::NetPay => "net_pay",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sheet section that can disambiguate a shared header label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Columns paid to the employee.
    Income,
    /// Columns withheld from the employee.
    Deduction,
}

/// The section a column was found under, carried down from rows above the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupLabel {
    /// Under an income marker.
    Income,
    /// Under a deduction marker.
    Deduction,
    /// No marker above the column.
    #[default]
    Unlabeled,
}

impl GroupLabel {
    /// Returns the section this label names, if any.
    pub fn section(self) -> Option<Section> {
        match self {
            Self::Income => Some(Section::Income),
            Self::Deduction => Some(Section::Deduction),
            Self::Unlabeled => None,
        }
    }
}

impl From<Section> for GroupLabel {
    fn from(section: Section) -> Self {
        match section {
            Section::Income => Self::Income,
            Section::Deduction => Self::Deduction,
        }
    }
}
