use regex::Regex;

use skimguard_types::{FixConfig, FixKind};

#[derive(Debug, thiserror::Error)]
pub enum FixError {
    #[error("unsupported fix type '{}'", .0.as_str())]
    UnsupportedKind(FixKind),

    #[error("fix has invalid search regex '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Apply `fix` to `text`, returning the rewritten text.
///
/// Every match of the search regex is replaced; the template may reference
/// capture groups (`$1`, `${name}`).
pub fn apply_fix(text: &str, fix: &FixConfig) -> Result<String, FixError> {
    match fix.kind {
        FixKind::RegexReplace => {
            let re = Regex::new(&fix.search).map_err(|source| FixError::InvalidPattern {
                pattern: fix.search.clone(),
                source,
            })?;
            Ok(re.replace_all(text, fix.replace.as_str()).into_owned())
        }
        FixKind::Unsupported => Err(FixError::UnsupportedKind(fix.kind)),
    }
}
