//! Naming rules shared by every element and table column.

use std::collections::{BTreeSet, HashSet};

use crate::error::{ValidationError, ValidationResult};

fn invalid(name: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Checks that `name` may be used for an element.
pub fn check_valid_name(name: &str) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(invalid(name, "Name cannot be an empty string."));
    }
    if name == "." {
        return Err(invalid(name, "Name cannot be '.'."));
    }
    if name == ".." {
        return Err(invalid(name, "Name cannot be '..'."));
    }
    if name.starts_with("__") {
        return Err(invalid(name, "Name cannot start with '__'."));
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(invalid(
            name,
            "Name must contain only alphanumeric characters, underscores, dots and hyphens.",
        ));
    }
    Ok(())
}

/// Element name rules plus the reserved `_index` column.
pub fn check_valid_dataframe_column_name(name: &str) -> ValidationResult<()> {
    check_valid_name(name)?;
    if name == "_index" {
        return Err(invalid(name, "Name cannot be '_index'"));
    }
    Ok(())
}

pub fn check_key_is_case_insensitively_unique(
    key: &str,
    other_keys: &HashSet<String>,
) -> ValidationResult<()> {
    if other_keys.contains(&key.to_lowercase()) {
        return Err(ValidationError::DuplicateKey(key.to_string()));
    }
    Ok(())
}

/// Fails on the first key whose lower-cased form was already seen.
pub fn check_all_keys_case_insensitively_unique<'a, I>(keys: I) -> ValidationResult<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for key in keys {
        check_key_is_case_insensitively_unique(key, &seen)?;
        seen.insert(key.to_lowercase());
    }
    Ok(())
}

/// Checks that the distinct values found in a region column equal `targets`.
pub fn check_target_region_column_symmetry<'a, F, T>(found: F, targets: T) -> ValidationResult<()>
where
    F: IntoIterator<Item = &'a str>,
    T: IntoIterator<Item = &'a str>,
{
    let found: BTreeSet<&str> = found.into_iter().collect();
    let targets: BTreeSet<&str> = targets.into_iter().collect();
    let difference: Vec<&str> = found.symmetric_difference(&targets).copied().collect();
    if !difference.is_empty() {
        return Err(ValidationError::RegionMismatch(difference.join(", ")));
    }
    Ok(())
}

/// Validates observation-frame column names, collecting every problem into one error.
pub(crate) fn check_obs_column_names<'a, I>(names: I) -> ValidationResult<()>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let mut messages = Vec::new();

    if let Err(err) = check_all_keys_case_insensitively_unique(names.clone()) {
        messages.push(format!("  {err}"));
    }
    for name in names {
        if let Err(err) = check_valid_dataframe_column_name(name) {
            let reason = match err {
                ValidationError::InvalidName { reason, .. } => reason,
                other => other.to_string(),
            };
            messages.push(format!("  '{name}': {reason}"));
        }
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::InvalidTableKeys(format!(
            "obs:\n{}",
            messages.join("\n")
        )))
    }
}
