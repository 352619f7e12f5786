//! In-memory [`Storage`] used in tests.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    io,
    rc::Rc,
};

use common::operations::{By, Delete, Insert, Keyed, Select};
use tracerr::Traced;

use super::{Error, Key, Storage};

/// [`Storage`] keeping values in memory.
///
/// Clones share the same values.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Stored values.
    values: Rc<RefCell<HashMap<Key, String>>>,

    /// Indicator whether writes should fail.
    read_only: Rc<Cell<bool>>,
}

impl Memory {
    /// Creates a new [`Memory`] storage holding the provided value under
    /// [`Key::CREDENTIAL`].
    #[must_use]
    pub fn with_credential(value: &str) -> Self {
        let this = Self::default();
        _ = this
            .values
            .borrow_mut()
            .insert(Key::CREDENTIAL, value.to_owned());
        this
    }

    /// Makes every following write or delete fail.
    pub fn make_read_only(&self) {
        self.read_only.set(true);
    }

    /// Returns the value stored under the provided [`Key`].
    #[must_use]
    pub fn get(&self, key: Key) -> Option<String> {
        self.values.borrow().get(&key).cloned()
    }

    /// Fails if this [`Memory`] storage is made read-only.
    fn check_writable(&self) -> Result<(), Traced<Error>> {
        if self.read_only.get() {
            return Err(tracerr::new!(Error::from(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only",
            ))));
        }
        Ok(())
    }
}

impl Storage<Select<By<Option<String>, Key>>> for Memory {
    type Ok = Option<String>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.get(by.into_inner()))
    }
}

impl Storage<Insert<Keyed<Key, String>>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(Keyed { key, value }): Insert<Keyed<Key, String>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.check_writable()?;
        _ = self.values.borrow_mut().insert(key, value);
        Ok(())
    }
}

impl Storage<Delete<By<String, Key>>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<String, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.check_writable()?;
        _ = self.values.borrow_mut().remove(&by.into_inner());
        Ok(())
    }
}
