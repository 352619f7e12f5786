//! [`File`] [`Storage`] implementation.

use std::{io, path::PathBuf};

use common::operations::{By, Delete, Insert, Keyed, Select};
use tokio::{fs, io::AsyncWriteExt as _};
use tracerr::Traced;

use super::{Error, Key, Storage};

/// [`Storage`] keeping every [`Key`] as a separate file inside a directory.
///
/// A missing or blank file means there is no value. On Unix the files are
/// readable by their owner only.
#[derive(Clone, Debug)]
pub struct File {
    /// Directory the files are kept in.
    dir: PathBuf,
}

impl File {
    /// Unix permissions of the written files.
    #[cfg(unix)]
    const MODE: u32 = 0o600;

    /// Creates a new [`File`] storage inside the provided directory.
    ///
    /// The directory is created lazily, on the first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the path of the file holding the value of the provided [`Key`].
    fn path(&self, key: Key) -> PathBuf {
        self.dir.join(key.as_str())
    }
}

impl Storage<Select<By<Option<String>, Key>>> for File {
    type Ok = Option<String>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        match fs::read_to_string(self.path(by.into_inner())).await {
            Ok(value) => {
                let value = value.trim();
                Ok((!value.is_empty()).then(|| value.to_owned()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(tracerr::new!(Error::from(e))),
        }
    }
}

impl Storage<Insert<Keyed<Key, String>>> for File {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(Keyed { key, value }): Insert<Keyed<Key, String>>,
    ) -> Result<Self::Ok, Self::Err> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let mut options = fs::OpenOptions::new();
        _ = options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            _ = options.mode(Self::MODE);
        }

        let mut file = options
            .open(self.path(key))
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        // The file may predate this write with wider permissions.
        #[cfg(unix)]
        {
            use std::{fs::Permissions, os::unix::fs::PermissionsExt as _};

            file.set_permissions(Permissions::from_mode(Self::MODE))
                .await
                .map_err(tracerr::from_and_wrap!(=> Error))?;
        }
        file.write_all(value.as_bytes())
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        file.flush().await.map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl Storage<Delete<By<String, Key>>> for File {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<String, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        match fs::remove_file(self.path(by.into_inner())).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(tracerr::new!(Error::from(e))),
        }
    }
}
