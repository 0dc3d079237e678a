//! Allow/deny decisions for an incoming file.
//!
//! Both checks are pure: no logging, no state, no errors. The pipeline turns
//! a `false` into the matching rejection.

/// Returns the text after the last `.` in `file_name`, or `None` when there
/// is no dot or the name ends with one.
pub fn extension(file_name: &str) -> Option<&str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// True when `file_name` has an extension found in `allowed`, ignoring case.
pub fn is_allowed_type<I, S>(file_name: &str, allowed: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let Some(ext) = extension(file_name) else {
        return false;
    };
    let ext = ext.to_lowercase();
    allowed
        .into_iter()
        .any(|candidate| candidate.as_ref().to_lowercase() == ext)
}

/// True when `byte_length` does not exceed `max_bytes`.
pub fn is_within_size_limit(byte_length: u64, max_bytes: u64) -> bool {
    byte_length <= max_bytes
}
