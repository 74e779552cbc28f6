//! Field constraints shared by the 0.1.1 and later shapes
//!
//! Copyright (c) 2025 Aktorz Team
//! Licensed under the Apache-2.0 license

use aktorz_schemas::{FieldViolation, ValidationContext, ValidationHelpers};

/// Earliest year a film (or anyone in one) can plausibly date from
pub const EARLIEST_YEAR: i64 = 1850;

pub(crate) fn check_year(year: Option<i64>, context: &ValidationContext, out: &mut Vec<FieldViolation>) {
    ValidationHelpers::check_min_opt(year, EARLIEST_YEAR, context, out);
}

/// Budgets, grosses, salaries and run times
pub(crate) fn check_non_negative(value: Option<i64>, context: &ValidationContext, out: &mut Vec<FieldViolation>) {
    ValidationHelpers::check_min_opt(value, 0, context, out);
}

/// Check every key of an id-keyed map
pub(crate) fn check_keys<'a, I>(keys: I, context: &ValidationContext, out: &mut Vec<FieldViolation>)
where
    I: IntoIterator<Item = &'a String>,
{
    for key in keys {
        ValidationHelpers::check_identifier(key, &context.child(key), out);
    }
}

/// `"<first> <last>"` from whichever parts are present and non-empty
pub(crate) fn full_name(first_name: Option<&str>, last_name: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [first_name, last_name]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Cast member names: an explicit `name` must agree with first/last, and one
/// of the two forms must be present
pub(crate) fn check_cast_name(
    name: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    context: &ValidationContext,
    out: &mut Vec<FieldViolation>,
) {
    let derived = full_name(first_name, last_name);
    match (name.filter(|name| !name.is_empty()), derived) {
        (Some(name), Some(derived)) if name != derived => out.push(
            context
                .child("name")
                .violation("name_mismatch", format!("name [{name}] != full_name [{derived}]")),
        ),
        (None, None) => out.push(
            context
                .child("name")
                .violation("required", "either `name` or `first_name`/`last_name` must be provided"),
        ),
        _ => {}
    }
}
