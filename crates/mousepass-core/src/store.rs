//! Reference credential persistence
//!
//! The credential is a plain text file:
//!
//! ```text
//! <count>
//! <kind> <time> <x> <y>
//! ...
//! ```
//!
//! `kind` is `m` or `c`, numbers are written with six fractional digits.
//! Reading is lenient: the first line that fails to parse ends the gesture,
//! so a truncated file yields a shorter credential rather than an error.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::gesture::{GestureEvent, GestureKind, GestureSequence};

/// Durable home of the single reference credential
pub trait CredentialStore {
    /// Persist `seq`, replacing whatever was stored before
    fn save(&self, seq: &GestureSequence) -> Result<()>;

    /// Load the stored credential, or `None` if there is nothing usable
    fn load(&self) -> Option<GestureSequence>;
}

/// Serialise a gesture into the credential text format
pub fn encode(seq: &GestureSequence) -> String {
    let mut out = String::with_capacity(16 + seq.len() * 32);
    let _ = writeln!(out, "{}", seq.len());
    for event in seq {
        let _ = writeln!(
            out,
            "{} {:.6} {:.6} {:.6}",
            event.kind.as_char(),
            event.t,
            event.x,
            event.y
        );
    }
    out
}

/// Parse the credential text format
///
/// Returns `None` only when the count header is missing or unparsable.
pub fn decode(contents: &str) -> Option<GestureSequence> {
    let mut lines = contents.lines();
    let declared: i64 = lines.next()?.trim().parse().ok()?;
    let declared = usize::try_from(declared).unwrap_or(0);

    let events: GestureSequence = lines
        .take(declared)
        .map_while(parse_event)
        .collect();

    if events.len() < declared {
        warn!(
            declared,
            parsed = events.len(),
            "Credential file truncated, using the parsed prefix"
        );
    }

    Some(events)
}

fn parse_event(line: &str) -> Option<GestureEvent> {
    let mut fields = line.split_whitespace();

    let mut tag = fields.next()?.chars();
    let kind = GestureKind::from_char(tag.next()?)?;
    if tag.next().is_some() {
        return None;
    }

    let t: f64 = fields.next()?.parse().ok()?;
    let x: f64 = fields.next()?.parse().ok()?;
    let y: f64 = fields.next()?.parse().ok()?;

    Some(GestureEvent::new(kind, x, y, t))
}

/// Credential stored in a single file on disk
#[derive(Clone, Debug)]
pub struct FileCredentialStore {
    /// Path to the credential file
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the credential file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, seq: &GestureSequence) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("dat.tmp");
        fs::write(&temp_path, encode(seq))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&temp_path, &self.path)?;

        info!(points = seq.len(), path = ?self.path, "Saved gesture credential");
        Ok(())
    }

    fn load(&self) -> Option<GestureSequence> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "No gesture credential stored");
                return None;
            }
            Err(e) => {
                warn!(path = ?self.path, "Failed to read gesture credential: {}", e);
                return None;
            }
        };

        match decode(&contents) {
            Some(seq) => {
                info!(points = seq.len(), "Loaded gesture credential");
                Some(seq)
            }
            None => {
                warn!(path = ?self.path, "Gesture credential header is unreadable");
                None
            }
        }
    }
}

/// In-memory store, handy for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    contents: RefCell<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from pre-existing file contents
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: RefCell::new(Some(contents.into())),
        }
    }

    /// Raw text of the last save
    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, seq: &GestureSequence) -> Result<()> {
        *self.contents.borrow_mut() = Some(encode(seq));
        Ok(())
    }

    fn load(&self) -> Option<GestureSequence> {
        self.contents.borrow().as_deref().and_then(decode)
    }
}

impl<S: CredentialStore + ?Sized> CredentialStore for &S {
    fn save(&self, seq: &GestureSequence) -> Result<()> {
        (**self).save(seq)
    }

    fn load(&self) -> Option<GestureSequence> {
        (**self).load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;

    fn sample() -> GestureSequence {
        GestureSequence::from(vec![
            GestureEvent::moved(0.0, 0.0, 0.0),
            GestureEvent::moved(1.0, 0.0, 0.1),
            GestureEvent::click(1.0, 0.0, 0.2),
        ])
    }

    #[test]
    fn test_encode_format() {
        let text = encode(&sample());
        let expected = "3\n\
                        m 0.000000 0.000000 0.000000\n\
                        m 0.100000 1.000000 0.000000\n\
                        c 0.200000 1.000000 0.000000\n";
        assert_eq!(text, expected);
    }

    #[rstest]
    #[case::empty_file("", None)]
    #[case::garbage_header("abc\nm 0 0 0\n", None)]
    #[case::count_only("0\n", Some(0))]
    #[case::negative_count("-4\nm 0 0 0\n", Some(0))]
    #[case::truncated("3\nm 0.0 0.0 0.0\nc 0.1 0.5 0.5\n", Some(2))]
    #[case::bad_line_stops("3\nm 0.0 0.0 0.0\nm zero 1 1\nc 0.2 1 1\n", Some(1))]
    #[case::unknown_kind("2\nx 0.0 0.0 0.0\nm 0.1 1 1\n", Some(0))]
    #[case::extra_lines_ignored("1\nm 0.0 0.0 0.0\nm 0.1 1 1\n", Some(1))]
    fn test_decode_is_lenient(#[case] text: &str, #[case] expected_len: Option<usize>) {
        assert_eq!(decode(text).map(|s| s.len()), expected_len);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let store = FileCredentialStore::new(temp_dir.path().join("mouse_password.dat"));

        assert!(store.load().is_none());

        store.save(&sample()).unwrap();
        assert_eq!(store.load(), Some(sample()));
    }

    #[test]
    fn test_file_store_overwrites() {
        let temp_dir = tempdir().unwrap();
        let store = FileCredentialStore::new(temp_dir.path().join("nested/cred.dat"));

        store.save(&sample()).unwrap();
        let shorter = GestureSequence::from(vec![GestureEvent::click(0.5, 0.5, 1.0)]);
        store.save(&shorter).unwrap();

        assert_eq!(store.load(), Some(shorter));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let store = FileCredentialStore::new(temp_dir.path().join("cred.dat"));
        store.save(&sample()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().is_none());

        store.save(&sample()).unwrap();
        assert_eq!(store.load(), Some(sample()));
        assert!(store.contents().unwrap().starts_with("3\n"));
    }
}
