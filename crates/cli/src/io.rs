//! Whole-payload input and output for `file-crypto`.
//!
//! Payloads are read fully into memory; there is no streaming.

use std::fs::{self, File, OpenOptions, Permissions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Bytes read from a file or stdin.
#[derive(Debug)]
pub struct Input {
    pub data: Vec<u8>,
    /// Permissions of the input file; `None` for stdin.
    pub permissions: Option<Permissions>,
}

/// Read the whole of `path`, or of stdin when `path` is `None`.
pub fn read_input(path: Option<&Path>) -> Result<Input> {
    let Some(path) = path else {
        let mut data = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut data)
            .context("failed to read standard input")?;
        debug!(len = data.len(), "read stdin");
        return Ok(Input {
            data,
            permissions: None,
        });
    };

    let metadata = fs::metadata(path).with_context(|| {
        format!(
            "Error getting information on the input file {}",
            path.display()
        )
    })?;
    let data =
        fs::read(path).with_context(|| format!("failed to read input file {}", path.display()))?;
    debug!(path = %path.display(), len = data.len(), "read input file");

    Ok(Input {
        data,
        permissions: Some(metadata.permissions()),
    })
}

/// Write `data` to `path`, or to stdout when `path` is `None`.
///
/// A file created by this call takes `permissions` when given; an existing
/// file keeps its own.
pub fn write_output(
    path: Option<&Path>,
    data: &[u8],
    permissions: Option<Permissions>,
) -> Result<()> {
    let Some(path) = path else {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(data)
            .and_then(|()| stdout.flush())
            .context("failed to write standard output")?;
        return Ok(());
    };

    let (mut file, created) = open_output(path, permissions.as_ref())
        .with_context(|| format!("failed to open output file {}", path.display()))?;
    file.write_all(data)
        .and_then(|()| file.flush())
        .with_context(|| format!("failed to write output file {}", path.display()))?;

    // Non-unix targets have no creation mode; apply after the write.
    if let (false, true, Some(permissions)) = (cfg!(unix), created, permissions) {
        fs::set_permissions(path, permissions)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }
    debug!(path = %path.display(), len = data.len(), created, "wrote output file");
    Ok(())
}

/// Create `path` with `permissions` applied at creation, or truncate it if it
/// already exists. The flag reports whether the file was created.
fn open_output(path: &Path, permissions: Option<&Permissions>) -> std::io::Result<(File, bool)> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    if let Some(permissions) = permissions {
        creation_mode(&mut options, permissions);
    }

    match options.open(path) {
        Ok(file) => Ok((file, true)),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .map(|file| (file, false)),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn creation_mode(options: &mut OpenOptions, permissions: &Permissions) {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    options.mode(permissions.mode() & 0o7777);
}

#[cfg(not(unix))]
fn creation_mode(_options: &mut OpenOptions, _permissions: &Permissions) {}
