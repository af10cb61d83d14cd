// src/attachment.rs
//
// The user's attached file, and where it lives between restarts.
//
// One attachment at a time. A new one replaces the cached one; `clear`
// removes it. The cache is session-scoped: it survives closing and
// reopening the app within a login session, not a new session.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::config::consts::{APP_NAME, SESSION_ENV, SESSION_FILE};
use crate::decode::{self, SheetKind};
use crate::error::StorageWarning;

#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub content: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.content.len())
            .finish()
    }
}

impl Attachment {
    /// Blank `mime_type` is guessed from the file name.
    pub fn new(content: Vec<u8>, file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let mut mime_type = mime_type.into();
        if mime_type.trim().is_empty() {
            mime_type = guess_mime(&file_name);
        }
        Self { content, file_name, mime_type }
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let content = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| s!("attachment"));
        Ok(Self::new(content, file_name, ""))
    }

    pub fn sheet_kind(&self) -> Option<SheetKind> {
        SheetKind::detect(&self.mime_type, &self.file_name)
    }

    pub fn is_spreadsheet(&self) -> bool {
        self.sheet_kind().is_some()
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    pub fn to_data_uri(&self) -> String {
        decode::encode_data_uri(&self.mime_type, &self.content)
    }

    /// Base64 body without the data URI prefix (request payloads).
    pub fn base64_payload(&self) -> String {
        s!(decode::strip_data_uri(&self.to_data_uri()))
    }

    /// Rebuild from a stored data URI. MIME comes from the prefix when present.
    pub fn from_data_uri(file_name: &str, data_uri: &str) -> Result<Self, crate::error::DecodeError> {
        let content = decode::decode_payload(data_uri)?;
        let mime = decode::data_uri_mime(data_uri).unwrap_or("");
        Ok(Self::new(content, file_name, mime))
    }
}

fn guess_mime(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| s!("application/octet-stream"))
}

/* ---------------- Session cache ---------------- */

/// Single-slot attachment persistence.
/// Writes are best-effort: failures come back as warnings, never errors.
pub trait AttachmentStore: Send {
    fn load(&self) -> Option<Attachment>;
    fn save(&mut self, attachment: &Attachment) -> Result<(), StorageWarning>;
    fn clear(&mut self) -> Result<(), StorageWarning>;
}

/// In-process slot. Used by tests and the CLI.
#[derive(Debug)]
pub struct MemoryStore {
    slot: Option<Attachment>,
    max_bytes: usize,
}

impl MemoryStore {
    pub fn new(max_bytes: usize) -> Self {
        Self { slot: None, max_bytes }
    }
}

impl AttachmentStore for MemoryStore {
    fn load(&self) -> Option<Attachment> {
        self.slot.clone()
    }

    fn save(&mut self, attachment: &Attachment) -> Result<(), StorageWarning> {
        // the previous file is gone either way
        self.slot = None;
        check_size(attachment, self.max_bytes)?;
        self.slot = Some(attachment.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageWarning> {
        self.slot = None;
        Ok(())
    }
}

/// On-disk record, same shape a browser session cache would hold.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAttachment {
    file_name: String,
    mime_type: String,
    data: String,
}

/// JSON record under `<tmp>/lead_search-<session>/attachment.json`.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    max_bytes: usize,
}

impl SessionStore {
    /// Store for the current login session.
    pub fn for_current_session(max_bytes: usize) -> Self {
        let dir = std::env::temp_dir().join(format!("{}-{}", APP_NAME, session_id()));
        Self::in_dir(&dir, max_bytes)
    }

    pub fn in_dir(dir: &Path, max_bytes: usize) -> Self {
        Self { path: dir.join(SESSION_FILE), max_bytes }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<Attachment>, StorageWarning> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredAttachment =
            serde_json::from_str(&text).map_err(|e| StorageWarning::Corrupt(e.to_string()))?;
        let mut att = Attachment::from_data_uri(&stored.file_name, &stored.data)
            .map_err(|e| StorageWarning::Corrupt(e.to_string()))?;
        if !stored.mime_type.is_empty() {
            att.mime_type = stored.mime_type;
        }
        Ok(Some(att))
    }
}

impl AttachmentStore for SessionStore {
    fn load(&self) -> Option<Attachment> {
        match self.read() {
            Ok(att) => {
                if let Some(a) = &att {
                    logf!("Session: Restored attachment {:?}", a);
                }
                att
            }
            Err(e) => {
                logw!("Session: Ignoring cached attachment: {}", e);
                None
            }
        }
    }

    fn save(&mut self, attachment: &Attachment) -> Result<(), StorageWarning> {
        // replace semantics: drop the old record before trying the new one
        self.clear()?;
        check_size(attachment, self.max_bytes)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredAttachment {
            file_name: attachment.file_name.clone(),
            mime_type: attachment.mime_type.clone(),
            data: attachment.to_data_uri(),
        };
        let json = serde_json::to_string(&stored).map_err(|e| StorageWarning::Corrupt(e.to_string()))?;
        fs::write(&self.path, json)?;
        logd!("Session: Cached {:?} → {}", attachment, self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageWarning> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Limit applies to the encoded record, as a browser session quota would.
fn check_size(attachment: &Attachment, limit: usize) -> Result<(), StorageWarning> {
    let size = attachment.size().div_ceil(3) * 4;
    if size > limit {
        return Err(StorageWarning::TooLarge { size, limit });
    }
    Ok(())
}

/// Explicit override, else the OS login session, else a fixed key.
fn session_id() -> String {
    [SESSION_ENV, "XDG_SESSION_ID", "SESSIONNAME"]
        .iter()
        .find_map(|k| std::env::var(k).ok().filter(|v| !v.trim().is_empty()))
        .map(|v| sanitize_key(&v))
        .unwrap_or_else(|| s!("default"))
}

fn sanitize_key(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
