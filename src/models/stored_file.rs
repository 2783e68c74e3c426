//! Represents a file owned by a user, addressed in the backend by `{username}/{filename}`.

/// A single user file as seen by the gateway.
///
/// Only the identity is modeled; content lives in the backend and no other
/// metadata is kept. Neither part is sanitized, so a filename containing `/`
/// produces a nested key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    /// Owning user, taken verbatim from the request path.
    pub username: String,

    /// Original filename of the uploaded file.
    pub filename: String,
}

impl StoredFile {
    pub fn new(username: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            filename: filename.into(),
        }
    }

    /// Backend key for this file.
    pub fn key(&self) -> String {
        format!("{}{}", Self::user_prefix(&self.username), self.filename)
    }

    /// Key prefix shared by every file of `username`.
    pub fn user_prefix(username: &str) -> String {
        format!("{}/", username)
    }

    /// Strip `prefix` from a backend key, returning the bare filename.
    ///
    /// Returns `None` when the key does not belong to that prefix.
    pub fn filename_from_key<'a>(prefix: &str, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_joins_username_and_filename() {
        let file = StoredFile::new("sandy", "report.pdf");
        assert_eq!(file.key(), "sandy/report.pdf");
    }

    #[test]
    fn nested_filenames_are_kept_verbatim() {
        let file = StoredFile::new("sandy", "2024/q1/report.pdf");
        assert_eq!(file.key(), "sandy/2024/q1/report.pdf");
    }

    #[test]
    fn filename_from_key_strips_user_prefix() {
        let prefix = StoredFile::user_prefix("sandy");
        assert_eq!(
            StoredFile::filename_from_key(&prefix, "sandy/notes.txt"),
            Some("notes.txt")
        );
        assert_eq!(StoredFile::filename_from_key(&prefix, "sandra/notes.txt"), None);
    }
}
