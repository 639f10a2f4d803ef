//! Version ordering and selection
//!
//! The server returns the versions of a name in no guaranteed order. These
//! functions sort them newest first and pick the requested subset. They do
//! no I/O and are applied after a name lookup.

use crate::errors::{Error, Result};
use crate::models::Credential;

/// Which versions of a name to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionSelection {
    /// Every version, newest first
    All,
    /// Only the current version
    #[default]
    Latest,
    /// The `n` newest versions; `0` means all of them
    MostRecent(usize),
}

/// Sort versions by creation time, newest first
///
/// Timestamps are compared as strings, which orders ISO-8601 values
/// chronologically. Versions with equal timestamps keep their relative order.
pub fn sort_by_created_desc(versions: &mut [Credential]) {
    versions.sort_by(|a, b| b.created.cmp(&a.created));
}

/// Order `versions` and keep the subset named by `selection`
///
/// # Errors
///
/// [`Error::NotFound`] for [`VersionSelection::Latest`] over an empty list.
///
/// # Example
///
/// ```
/// use credhub_sdk::{select, Credential, CredentialValue, VersionSelection};
///
/// let mut older = Credential::new("/x", CredentialValue::Password("a".into()));
/// older.created = "2020-01-01T00:00:00Z".to_string();
/// let mut newer = Credential::new("/x", CredentialValue::Password("b".into()));
/// newer.created = "2020-01-03T00:00:00Z".to_string();
///
/// let latest = select(vec![older, newer], VersionSelection::Latest).unwrap();
/// assert_eq!(latest[0].as_password().unwrap(), "b");
/// ```
pub fn select(mut versions: Vec<Credential>, selection: VersionSelection) -> Result<Vec<Credential>> {
    sort_by_created_desc(&mut versions);

    match selection {
        VersionSelection::All | VersionSelection::MostRecent(0) => Ok(versions),
        VersionSelection::Latest => {
            if versions.is_empty() {
                return Err(Error::not_found("no versions to select from"));
            }
            versions.truncate(1);
            Ok(versions)
        }
        VersionSelection::MostRecent(n) => {
            versions.truncate(n);
            Ok(versions)
        }
    }
}
