//! Imputation module for handling missing values.
//!
//! Missing cells are replaced with a caller-chosen constant; the weather
//! cleaning run never infers fill values from the data.

mod constant;

pub use constant::ConstantImputer;
