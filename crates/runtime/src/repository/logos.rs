//! Sponsor logo files kept under `{data_dir}/sponsors/`.
//!
//! The roster stores relative refs of the form `sponsors/<file>`. Refs are
//! resolved only if they stay inside the sponsors directory.

use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};

use rand::Rng;
use rand::distributions::Alphanumeric;

use super::error::{RepositoryError, Result};

const SPONSORS_DIR: &str = "sponsors";

pub struct LogoStore {
    data_dir: PathBuf,
}

impl LogoStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn sponsors_dir(&self) -> PathBuf {
        self.data_dir.join(SPONSORS_DIR)
    }

    /// Copies `source` into the sponsors directory under a fresh unique name
    /// and returns the ref to store on the sponsor.
    pub fn import(&self, source: &Path) -> Result<String> {
        if !source.is_file() {
            return Err(RepositoryError::NotAFile(source.to_path_buf()));
        }

        let dir = self.sponsors_dir();
        fs::create_dir_all(&dir)?;

        let filename = unique_name(source.extension().and_then(|ext| ext.to_str()));
        fs::copy(source, dir.join(&filename))?;

        tracing::debug!("Imported logo {} as {}", source.display(), filename);
        Ok(format!("{SPONSORS_DIR}/{filename}"))
    }

    /// Maps a logo ref to its file path.
    pub fn resolve(&self, logo_ref: &str) -> Result<PathBuf> {
        let invalid = || RepositoryError::InvalidLogoRef(logo_ref.to_string());

        let normalized = logo_ref.replace('\\', "/");
        let relative = Path::new(&normalized);
        let mut components = relative.components();

        if components.next() != Some(Component::Normal(OsStr::new(SPONSORS_DIR))) {
            return Err(invalid());
        }
        let rest: Vec<Component<'_>> = components.collect();
        if rest.is_empty() || !rest.iter().all(|c| matches!(c, Component::Normal(_))) {
            return Err(invalid());
        }

        Ok(self.data_dir.join(relative))
    }

    /// Deletes the file behind `logo_ref`. Returns false when it was
    /// already gone.
    pub fn remove(&self, logo_ref: &str) -> Result<bool> {
        let path = self.resolve(logo_ref)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Removed logo {}", path.display());
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

fn unique_name(extension: Option<&str>) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    match extension {
        Some(ext) if !ext.is_empty() => format!("{millis:x}{suffix}.{}", ext.to_ascii_lowercase()),
        _ => format!("{millis:x}{suffix}"),
    }
}
