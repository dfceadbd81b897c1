//! Channel and repository naming rules

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::domain::project::RepositoryKind;

/// Length of the suffix appended to generated names
pub const SUFFIX_LENGTH: usize = 6;

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Where name suffixes come from
///
/// With a request token every suffix is derived from the token and the
/// purpose of the name, so a retried request generates the same channel
/// and repository names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuffixSource {
    Random,
    Token(String),
}

impl SuffixSource {
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some(token) if !token.is_empty() => Self::Token(token.to_string()),
            _ => Self::Random,
        }
    }

    pub fn suffix(&self, purpose: &str) -> String {
        match self {
            Self::Random => {
                let mut rng = rand::thread_rng();
                (0..SUFFIX_LENGTH)
                    .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
                    .collect()
            }
            Self::Token(token) => {
                let digest = Sha256::digest(format!("{}:{}", token, purpose).as_bytes());
                digest
                    .iter()
                    .take(SUFFIX_LENGTH)
                    .map(|b| SUFFIX_ALPHABET[*b as usize % SUFFIX_ALPHABET.len()] as char)
                    .collect()
            }
        }
    }
}

/// `{prefix}-{cohort token}-{suffix}`, lower-cased. Empty parts are left out.
pub fn channel_name(prefix: &str, cohort_token: &str, suffix: &str) -> String {
    [prefix.trim(), cohort_token, suffix]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// `{project slug}-{kind}-{suffix}`
pub fn repository_name(project_slug: &str, kind: RepositoryKind, suffix: &str) -> String {
    format!("{}-{}-{}", project_slug, kind, suffix)
}
