use std::io;
use std::path::Path;
use tokio::fs;
use tracing::warn;

/// Make sure the storage directory exists before the first write. Idempotent;
/// fails if a non-directory entry already occupies the path or creation is
/// denied.
pub async fn ensure_ready(dir: &Path) -> io::Result<()> {
    match fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} exists and is not a directory", dir.display()),
        )),
        Err(_) => fs::create_dir_all(dir).await,
    }
}

/// Write the full upload to disk, returning the byte count written. On
/// failure the partial file is removed before the error is surfaced, so a
/// half-written upload can never be served or cataloged.
pub async fn write_file(path: &Path, bytes: &[u8]) -> io::Result<u64> {
    if let Err(err) = fs::write(path, bytes).await {
        if let Err(cleanup) = fs::remove_file(path).await {
            if cleanup.kind() != io::ErrorKind::NotFound {
                warn!("failed to remove partial file {}: {}", path.display(), cleanup);
            }
        }
        return Err(err);
    }
    Ok(bytes.len() as u64)
}
