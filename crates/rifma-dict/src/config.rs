//! Resolves the store path the CLI should use: an explicit `--db` flag
//! takes precedence over the `RIFMA_DB` environment variable, which in
//! turn takes precedence over a `./rifma.db` default in the current
//! directory.

use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE: &str = "rifma.db";
const DB_ENV_VAR: &str = "RIFMA_DB";

pub fn resolve_db_path(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(DB_ENV_VAR) {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_DB_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn an_explicit_flag_wins_over_everything() {
        assert_eq!(resolve_db_path(Some(Path::new("/tmp/explicit.db"))), PathBuf::from("/tmp/explicit.db"));
    }
}
