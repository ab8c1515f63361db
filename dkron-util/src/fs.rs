use std::{io, path::Path};

/// Reports whether `path` exists.
///
/// A missing path is `(false, None)`. Any other stat failure is
/// inconclusive and comes back as `(true, Some(err))`.
pub fn exists<P: AsRef<Path>>(path: P) -> (bool, Option<io::Error>) {
    match std::fs::metadata(path) {
        Ok(_) => (true, None),
        Err(err) if err.kind() == io::ErrorKind::NotFound => (false, None),
        Err(err) => (true, Some(err)),
    }
}
