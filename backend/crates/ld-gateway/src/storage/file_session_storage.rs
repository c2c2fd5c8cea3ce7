use crate::{GatewayError, Result as GatewayErrorResult, SessionStorage};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ld_core::Session;
use log::{debug, info, warn};

const DATE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Session persisted as JSON in a single file.
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Moves an unreadable session file aside so the next save starts clean.
    fn backup_corrupted(&self) {
        let timestamp = chrono::Utc::now().format(DATE_FORMAT);
        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".corrupted.{timestamp}"));
        let backup = PathBuf::from(backup);

        match fs::rename(&self.path, &backup) {
            Ok(()) => warn!("Backed up corrupted session file to {backup:?}"),
            Err(e) => warn!("Could not back up corrupted session file {:?}: {e}", self.path),
        }
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> GatewayErrorResult<Option<Session>> {
        if !self.path.exists() {
            debug!("No session file at {:?}", self.path);
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            GatewayError::storage(format!("reading {}: {}", self.path.display(), e))
        })?;

        match serde_json::from_str::<Session>(&contents) {
            Ok(session) => {
                info!("Restored session for {}", session.subject_id());
                Ok(Some(session))
            }
            Err(e) => {
                warn!("Session file corrupted at {:?}: {e}", self.path);
                self.backup_corrupted();
                Ok(None)
            }
        }
    }

    /// Atomic write: temp file, fsync, rename.
    fn save(&self, session: &Session) -> GatewayErrorResult<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(|e| {
                GatewayError::storage(format!("creating {}: {}", dir.display(), e))
            })?;
        }

        let mut temp_path = self.path.clone().into_os_string();
        temp_path.push(format!(".tmp.{}", std::process::id()));
        let temp_path = PathBuf::from(temp_path);

        let json = serde_json::to_string_pretty(session)?;

        {
            let write_err = |e: std::io::Error| {
                GatewayError::storage(format!("writing {}: {}", temp_path.display(), e))
            };

            let mut file = fs::File::create(&temp_path).map_err(write_err)?;
            file.write_all(json.as_bytes()).map_err(write_err)?;
            file.sync_all().map_err(write_err)?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            GatewayError::storage(format!(
                "renaming {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        debug!("Saved session for {}", session.subject_id());
        Ok(())
    }

    fn clear(&self) -> GatewayErrorResult<()> {
        if !self.path.exists() {
            return Ok(());
        }

        fs::remove_file(&self.path).map_err(|e| {
            GatewayError::storage(format!("removing {}: {}", self.path.display(), e))
        })?;

        debug!("Removed session file {:?}", self.path);
        Ok(())
    }
}
