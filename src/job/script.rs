//! Script loading
//!
//! Resolves a script path against the working directory and reads it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};

use super::SubmitError;

/// Reads script files relative to a base directory
#[derive(Debug, Clone, Default)]
pub struct ScriptLoader {
    /// Directory relative paths resolve against; the process working
    /// directory when unset
    base_dir: Option<PathBuf>,
    /// Directory `~` expands to; `$HOME` when unset
    home_dir: Option<PathBuf>,
}

impl ScriptLoader {
    /// Loader resolving against the process working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader resolving against `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            home_dir: None,
        }
    }

    /// Expand `~` to `home_dir` instead of `$HOME`
    pub fn with_home_dir(mut self, home_dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(home_dir.into());
        self
    }

    fn home(&self) -> Option<PathBuf> {
        match self.home_dir {
            Some(ref dir) => Some(dir.clone()),
            None => std::env::var_os("HOME").map(PathBuf::from),
        }
    }

    /// Resolve `path` to an absolute path.
    ///
    /// A leading `~/` expands to the home directory.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf, SubmitError> {
        let expanded = match (path.strip_prefix("~"), self.home()) {
            (Ok(rest), Some(home)) => home.join(rest),
            _ => path.to_path_buf(),
        };

        if expanded.is_absolute() {
            return Ok(expanded);
        }

        let base = match self.base_dir {
            Some(ref dir) => dir.clone(),
            None => std::env::current_dir().map_err(|e| SubmitError::ScriptRead {
                path: expanded.clone(),
                source: e,
            })?,
        };
        Ok(base.join(expanded))
    }

    /// Read the full text of the script at `path`.
    ///
    /// Anything but a regular file is reported as not found.
    pub fn load(&self, path: &Path) -> Result<String, SubmitError> {
        let resolved = self.resolve(path)?;
        if !resolved.is_file() {
            return Err(SubmitError::ScriptNotFound(resolved));
        }

        let read_error = |source: io::Error| SubmitError::ScriptRead {
            path: resolved.clone(),
            source,
        };
        let bytes = fs::read(&resolved).map_err(read_error)?;
        let script = decode_script(&bytes).map_err(read_error)?;
        tracing::debug!(path = %resolved.display(), bytes = bytes.len(), "loaded script");
        Ok(script)
    }
}

/// Decode script bytes, honoring a UTF-8 or UTF-16 byte-order mark.
///
/// Without a BOM the bytes must be UTF-8.
fn decode_script(bytes: &[u8]) -> io::Result<String> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if had_errors {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("script is not valid {}", encoding.name()),
        ));
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16_bytes(text: &str, big_endian: bool) -> Vec<u8> {
        let mut bytes = if big_endian { vec![0xFE, 0xFF] } else { vec![0xFF, 0xFE] };
        for unit in text.encode_utf16() {
            if big_endian {
                bytes.extend_from_slice(&unit.to_be_bytes());
            } else {
                bytes.extend_from_slice(&unit.to_le_bytes());
            }
        }
        bytes
    }

    #[test]
    fn test_relative_path_uses_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("query.usql"), "@r = SELECT 1 AS a FROM (VALUES (1)) AS T(x);").unwrap();

        let loader = ScriptLoader::with_base_dir(dir.path());
        let script = loader.load(Path::new("query.usql")).unwrap();
        assert_eq!(script, "@r = SELECT 1 AS a FROM (VALUES (1)) AS T(x);");
    }

    #[test]
    fn test_absolute_path_ignores_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.hql");
        fs::write(&path, "SHOW TABLES;").unwrap();

        let loader = ScriptLoader::with_base_dir("/somewhere/else");
        assert_eq!(loader.resolve(&path).unwrap(), path);
        assert_eq!(loader.load(&path).unwrap(), "SHOW TABLES;");
    }

    #[test]
    fn test_tilde_expands_to_home_dir() {
        let home = tempfile::tempdir().unwrap();
        fs::write(home.path().join("x.usql"), "SELECT 1;").unwrap();

        let loader = ScriptLoader::with_base_dir("/somewhere/else").with_home_dir(home.path());
        assert_eq!(loader.resolve(Path::new("~/x.usql")).unwrap(), home.path().join("x.usql"));
        assert_eq!(loader.load(Path::new("~/x.usql")).unwrap(), "SELECT 1;");
    }

    #[test]
    fn test_tilde_inside_name_is_literal() {
        let loader = ScriptLoader::with_base_dir("/base").with_home_dir("/home/sam");
        assert_eq!(
            loader.resolve(Path::new("~backup/x.usql")).unwrap(),
            PathBuf::from("/base/~backup/x.usql")
        );
    }

    #[test]
    fn test_missing_file_reports_resolved_path() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ScriptLoader::with_base_dir(dir.path());

        match loader.load(Path::new("missing.usql")) {
            Err(SubmitError::ScriptNotFound(path)) => {
                assert_eq!(path, dir.path().join("missing.usql"));
            }
            other => panic!("expected ScriptNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ScriptLoader::new();

        match loader.load(dir.path()) {
            Err(SubmitError::ScriptNotFound(path)) => assert_eq!(path, dir.path()),
            other => panic!("expected ScriptNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_script_text_is_preserved_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let text = "line one\r\n\tline two\n\nüñïcödé\n";
        fs::write(dir.path().join("s.usql"), text).unwrap();

        let loader = ScriptLoader::with_base_dir(dir.path());
        assert_eq!(loader.load(Path::new("s.usql")).unwrap(), text);
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bom.usql"), b"\xEF\xBB\xBFSELECT 1;").unwrap();

        let loader = ScriptLoader::with_base_dir(dir.path());
        assert_eq!(loader.load(Path::new("bom.usql")).unwrap(), "SELECT 1;");
    }

    #[test]
    fn test_utf16_scripts_are_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let text = "SELECT \"größe\" FROM t;\r\n";
        fs::write(dir.path().join("le.usql"), utf16_bytes(text, false)).unwrap();
        fs::write(dir.path().join("be.usql"), utf16_bytes(text, true)).unwrap();

        let loader = ScriptLoader::with_base_dir(dir.path());
        assert_eq!(loader.load(Path::new("le.usql")).unwrap(), text);
        assert_eq!(loader.load(Path::new("be.usql")).unwrap(), text);
    }

    #[test]
    fn test_invalid_utf8_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.usql"), b"SELECT \xFF\xFE\xFD;").unwrap();

        let loader = ScriptLoader::with_base_dir(dir.path());
        match loader.load(Path::new("bad.usql")) {
            Err(SubmitError::ScriptRead { path, source }) => {
                assert_eq!(path, dir.path().join("bad.usql"));
                assert_eq!(source.kind(), io::ErrorKind::InvalidData);
            }
            other => panic!("expected ScriptRead, got {:?}", other),
        }
    }
}
