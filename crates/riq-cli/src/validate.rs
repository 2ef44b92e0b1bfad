//! Validation of enumerated filter values supplied on the command line.

use std::fmt::{self, Display, Formatter};

use riq_api::{BlacklistFilter, Confidence};

use crate::client::CliError;

/// A filter value outside its allowed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidationError {
    message: String,
}

impl ValidationError {
    fn invalid(kind: &str, allowed: impl IntoIterator<Item = &'static str>) -> Self {
        let allowed = allowed
            .into_iter()
            .map(|name| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            message: format!("Invalid {kind}. Must be one of ({allowed})"),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err.message)
    }
}

/// Accept `None` or one of `blackhole`, `sakura`, `exploitKit`.
pub(crate) fn validate_filter(
    value: Option<&str>,
) -> Result<Option<BlacklistFilter>, ValidationError> {
    value
        .map(|raw| {
            BlacklistFilter::from_wire(raw).ok_or_else(|| {
                ValidationError::invalid("filter", BlacklistFilter::ALL.map(BlacklistFilter::as_str))
            })
        })
        .transpose()
}

/// Accept `None` or one of `H`, `M`, `L`.
pub(crate) fn validate_confidence(
    value: Option<&str>,
) -> Result<Option<Confidence>, ValidationError> {
    value
        .map(|raw| {
            Confidence::from_wire(raw).ok_or_else(|| {
                ValidationError::invalid("confidence", Confidence::ALL.map(Confidence::as_str))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_pass() {
        assert_eq!(validate_filter(None), Ok(None));
        assert_eq!(validate_confidence(None), Ok(None));
    }

    #[test]
    fn every_member_is_accepted() {
        assert_eq!(validate_filter(Some("blackhole")), Ok(Some(BlacklistFilter::Blackhole)));
        assert_eq!(validate_filter(Some("sakura")), Ok(Some(BlacklistFilter::Sakura)));
        assert_eq!(
            validate_filter(Some("exploitKit")),
            Ok(Some(BlacklistFilter::ExploitKit))
        );
        assert_eq!(validate_confidence(Some("H")), Ok(Some(Confidence::High)));
        assert_eq!(validate_confidence(Some("M")), Ok(Some(Confidence::Medium)));
        assert_eq!(validate_confidence(Some("L")), Ok(Some(Confidence::Low)));
    }

    #[test]
    fn filter_errors_name_the_allowed_set() {
        for bad in ["badvalue", "", "Blackhole", "exploitkit", " sakura"] {
            let err = validate_filter(Some(bad)).expect_err("value should be rejected");
            assert_eq!(
                err.to_string(),
                "Invalid filter. Must be one of ('blackhole', 'sakura', 'exploitKit')"
            );
        }
    }

    #[test]
    fn confidence_errors_name_the_allowed_set() {
        for bad in ["X", "h", "high", "HM"] {
            let err = validate_confidence(Some(bad)).expect_err("value should be rejected");
            assert_eq!(
                err.to_string(),
                "Invalid confidence. Must be one of ('H', 'M', 'L')"
            );
        }
    }

    #[test]
    fn validation_errors_become_cli_validation_failures() {
        let err: CliError = validate_filter(Some("nope"))
            .expect_err("value should be rejected")
            .into();
        assert!(matches!(err, CliError::Validation(ref message) if message.contains("sakura")));
        assert_eq!(err.exit_code(), 1);
    }
}
