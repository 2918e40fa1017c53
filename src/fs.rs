//! Change-aware file writing.
//!
//! Build systems (and the WiX toolset itself) decide what to rebuild by file
//! modification time. Writing identical content would bump the mtime and
//! force a needless recompile, so generated files go through
//! [`write_file_if_changed`].

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Permission bits used when a file has to be created (before umask).
pub const FILE_MODE: u32 = 0o666;

/// Bits a newly created file always ends up with, whatever the umask.
pub const OWNER_GROUP_RW: u32 = 0o660;

/// Returns true if `path` exists and its content is exactly `buf`.
///
/// Any read failure counts as "different".
pub fn file_has_content<P: AsRef<Path>>(path: P, buf: &[u8]) -> bool {
    match std::fs::read(path.as_ref()) {
        Ok(existing) => existing.len() == buf.len() && existing == buf,
        Err(_) => false,
    }
}

/// Writes `buf` to `path` unless the file already holds exactly that content.
///
/// Returns `Ok(true)` if the file was written and `Ok(false)` if it was left
/// untouched. The file is created or truncated as needed; on unix a newly
/// created file is made readable and writable by owner and group.
pub fn write_file_if_changed<P: AsRef<Path>>(path: P, buf: &[u8]) -> Result<bool> {
    let path = path.as_ref();
    if file_has_content(path, buf) {
        debug!(path = %path.display(), "content unchanged, skipping write");
        return Ok(false);
    }
    #[cfg(unix)]
    let created = !path.exists();

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    let mut file = options.open(path)?;
    #[cfg(unix)]
    if created {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = file.metadata()?.permissions();
        if perms.mode() & OWNER_GROUP_RW != OWNER_GROUP_RW {
            perms.set_mode(perms.mode() | OWNER_GROUP_RW);
            file.set_permissions(perms)?;
        }
    }
    file.write_all(buf)?;
    debug!(path = %path.display(), bytes = buf.len(), "wrote file");
    Ok(true)
}
