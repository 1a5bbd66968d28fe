use crate::utils::error::{LedgerError, Result};
use url::Url;

pub const MIN_CREDITS: i32 = 1;
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(LedgerError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(LedgerError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(LedgerError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(LedgerError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(LedgerError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| LedgerError::MissingConfig {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Repository identifiers take the `owner/name` form.
pub fn validate_repo_name(field_name: &str, repo: &str) -> Result<()> {
    validate_non_empty_string(field_name, repo)?;

    let mut parts = repo.split('/');
    let valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) => {
            !owner.is_empty()
                && !name.is_empty()
                && repo
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
        }
        _ => false,
    };

    if !valid {
        return Err(LedgerError::InvalidConfigValue {
            field: field_name.to_string(),
            value: repo.to_string(),
            reason: "Repository must look like 'owner/name'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(LedgerError::invalid_input(
            field_name,
            value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Required text field of a course form; returns the trimmed value.
pub fn require_text<'a>(field_name: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::invalid_input(
            field_name,
            value,
            "Value cannot be empty",
        ));
    }
    Ok(trimmed)
}

pub fn parse_credits(value: &str) -> Result<i32> {
    let credits: i32 = value
        .trim()
        .parse()
        .map_err(|_| LedgerError::invalid_input("credits", value, "Not a whole number"))?;

    if credits < MIN_CREDITS {
        return Err(LedgerError::invalid_input(
            "credits",
            value,
            format!("Value must be at least {}", MIN_CREDITS),
        ));
    }
    Ok(credits)
}

pub fn parse_score(value: &str) -> Result<f64> {
    let score: f64 = value
        .trim()
        .parse()
        .map_err(|_| LedgerError::invalid_input("score10", value, "Not a number"))?;

    if !score.is_finite() {
        return Err(LedgerError::invalid_input(
            "score10",
            value,
            "Value must be a finite number",
        ));
    }
    validate_range("score10", score, MIN_SCORE, MAX_SCORE)?;
    Ok(score)
}
