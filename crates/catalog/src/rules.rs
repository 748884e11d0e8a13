//! Small field-rule helpers shared by the entity validators.

use supplyhub_core::Notifier;

/// Required, with a length (in characters) between `min` and `max`.
pub(crate) fn length_between(
    notifier: &mut Notifier,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> bool {
    let len = value.trim().chars().count();
    if len == 0 {
        notifier.notify(format!("The field {field} must be provided."));
        return false;
    }
    if len < min || len > max {
        notifier.notify(format!(
            "The field {field} must be between {min} and {max} characters."
        ));
        return false;
    }
    true
}

pub(crate) fn exact_digits(notifier: &mut Notifier, field: &str, value: &str, len: usize) -> bool {
    let actual = value.chars().count();
    if actual != len {
        notifier.notify(format!(
            "The field {field} must have {len} characters and {actual} were provided."
        ));
        return false;
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        notifier.notify(format!("The field {field} must contain only digits."));
        return false;
    }
    true
}
