//! File-id scheme and content hashing.
//!
//! A config file id embeds the owning member, the file name, and a
//! monotonically increasing version: `<member>-<fileName>-v<version>`.
//! The scheme is stable across processes; the id is the only place the
//! version lives, so both directions must stay in sync.

use crate::error::{StateError, StateResult};

/// Build the config file id for (member, fileName, version).
pub fn gen_member_config_file_id(member_name: &str, file_name: &str, version: u64) -> String {
    format!("{member_name}-{file_name}-v{version}")
}

/// Extract the version from a file id produced by
/// [`gen_member_config_file_id`].
pub fn config_file_version(file_id: &str) -> StateResult<u64> {
    let (_, ver) = file_id
        .rsplit_once("-v")
        .ok_or_else(|| StateError::MalformedFileId(file_id.to_string()))?;
    ver.parse::<u64>()
        .map_err(|_| StateError::MalformedFileId(file_id.to_string()))
}

/// Lowercase hex MD5 of the content, the store's content address.
pub fn md5_hex(content: &str) -> String {
    format!("{:x}", md5::compute(content.as_bytes()))
}
