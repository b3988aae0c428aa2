//! Derivation of repository snapshot URLs.

use crate::{PipelineError, Result};

/// Build the archive URL for a repository snapshot at a named ref.
///
/// The returned URL points at the zip archive GitHub serves for a branch,
/// tag, or commit; fetching it yields a byte-stable artifact only for
/// immutable refs, so pass a tag or commit hash when the digest must be
/// reproducible.
pub fn github_zip_url(owner: &str, repo: &str, git_ref: &str) -> Result<String> {
    for (label, value) in [("owner", owner), ("repo", repo), ("ref", git_ref)] {
        if value.is_empty() {
            return Err(PipelineError::Encoding(format!(
                "snapshot URL {label} is empty"
            )));
        }
        if value.contains('/') || value.contains(char::is_whitespace) {
            return Err(PipelineError::Encoding(format!(
                "snapshot URL {label} {value:?} contains a separator"
            )));
        }
    }
    Ok(format!(
        "https://github.com/{owner}/{repo}/archive/{git_ref}.zip"
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builds_archive_url() {
        assert_eq!(
            github_zip_url("octo", "widgets", "v1.2.0").unwrap(),
            "https://github.com/octo/widgets/archive/v1.2.0.zip"
        );
    }

    #[test]
    fn refuses_empty_components() {
        assert!(github_zip_url("", "widgets", "main").is_err());
        assert!(github_zip_url("octo", "", "main").is_err());
        assert!(github_zip_url("octo", "widgets", "").is_err());
    }

    #[test]
    fn refuses_path_separators() {
        assert!(github_zip_url("octo/evil", "widgets", "main").is_err());
        assert!(github_zip_url("octo", "widgets", "main branch").is_err());
    }
}
