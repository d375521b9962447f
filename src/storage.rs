//! Media storage for user uploads (meme images and avatars).

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use thiserror::Error;

use crate::domain::types::{ImageFormat, MediaPath, TypeConstraintError, UserId};

/// URL prefix under which stored media is served.
pub const MEDIA_URL: &str = "/media/";
/// Directory of saved meme images.
pub const MEME_DIR: &str = "user_memes";
/// Directory of profile avatars.
pub const AVATAR_DIR: &str = "avatars";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Binary asset store addressed by [`MediaPath`].
pub trait MediaStorage {
    /// Write `bytes` at `path`, replacing any previous content.
    fn store(&self, path: &MediaPath, bytes: &[u8]) -> StorageResult<()>;
    /// Remove the asset at `path`. Missing assets are not an error.
    fn remove(&self, path: &MediaPath) -> StorageResult<()>;
    /// Read the asset at `path`.
    fn read(&self, path: &MediaPath) -> StorageResult<Vec<u8>>;
}

/// Public URL of a stored asset.
pub fn media_url(path: &MediaPath) -> String {
    format!("{MEDIA_URL}{path}")
}

/// Builds `<dir>/<prefix>_<user id>_<unix millis>_<random hex>.<ext>` for a
/// new upload. The random suffix keeps uploads made within the same
/// millisecond apart.
pub fn upload_path(
    dir: &str,
    prefix: &str,
    user_id: UserId,
    format: ImageFormat,
) -> Result<MediaPath, TypeConstraintError> {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = OsRng.next_u64();
    MediaPath::new(format!(
        "{dir}/{prefix}_{}_{millis}_{suffix:016x}.{}",
        user_id.get(),
        format.extension()
    ))
}

/// [`MediaStorage`] writing files under a root directory.
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    root: PathBuf,
}

impl FileSystemStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &MediaPath) -> PathBuf {
        // `MediaPath` guarantees relative, traversal-free segments.
        path.split('/')
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }
}

impl MediaStorage for FileSystemStorage {
    fn store(&self, path: &MediaPath, bytes: &[u8]) -> StorageResult<()> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write to a sibling file first so readers never see a partial asset.
        let mut partial = target.clone().into_os_string();
        partial.push(".partial");
        let partial = PathBuf::from(partial);
        fs::write(&partial, bytes)?;
        fs::rename(&partial, &target)?;
        Ok(())
    }

    fn remove(&self, path: &MediaPath) -> StorageResult<()> {
        match fs::remove_file(self.resolve(path)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read(&self, path: &MediaPath) -> StorageResult<Vec<u8>> {
        Ok(fs::read(self.resolve(path))?)
    }
}


#[cfg(test)]
pub mod test {
    use std::collections::HashMap;
    use std::io::ErrorKind;
    use std::sync::Mutex;

    use super::*;

    /// In-memory [`MediaStorage`] used by service tests.
    #[derive(Default)]
    pub struct MemoryStorage {
        files: Mutex<HashMap<String, Vec<u8>>>,
        fail_writes: bool,
    }

    impl MemoryStorage {
        pub fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }

        pub fn len(&self) -> usize {
            self.files.lock().unwrap().len()
        }

        pub fn contains(&self, path: &MediaPath) -> bool {
            self.files.lock().unwrap().contains_key(path.as_str())
        }
    }

    impl MediaStorage for MemoryStorage {
        fn store(&self, path: &MediaPath, bytes: &[u8]) -> StorageResult<()> {
            if self.fail_writes {
                return Err(std::io::Error::other("disk full").into());
            }
            self.files
                .lock()
                .unwrap()
                .insert(path.as_str().to_string(), bytes.to_vec());
            Ok(())
        }

        fn remove(&self, path: &MediaPath) -> StorageResult<()> {
            self.files.lock().unwrap().remove(path.as_str());
            Ok(())
        }

        fn read(&self, path: &MediaPath) -> StorageResult<Vec<u8>> {
            self.files
                .lock()
                .unwrap()
                .get(path.as_str())
                .cloned()
                .ok_or_else(|| std::io::Error::from(ErrorKind::NotFound).into())
        }
    }
}
