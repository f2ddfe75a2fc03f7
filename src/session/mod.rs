//! Whether the birthday has been reached in this session, and the persisted
//! copy of that fact.

pub mod reset;
pub mod store;

pub use reset::{apply_reset_query, ResetOutcome, RESET_PARAM};
pub use store::FlagStore;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;
use log::info;

/// `reached` only goes false to true, except through [`Session::clear`].
#[derive(Clone)]
pub struct Session {
    reached: Arc<AtomicBool>,
    store: Arc<FlagStore>,
}

impl Session {
    /// Every fresh load starts un-reached unless `remember_reached` keeps the
    /// stored flag.
    pub fn load(store: Arc<FlagStore>, remember_reached: bool) -> Result<Self> {
        if !remember_reached {
            store.set_birthday_reached(false)?;
        }
        let reached = store.birthday_reached();
        if reached {
            info!("session: birthday already reached in a previous load");
        }

        Ok(Self {
            reached: Arc::new(AtomicBool::new(reached)),
            store,
        })
    }

    pub fn is_reached(&self) -> bool {
        self.reached.load(Ordering::SeqCst)
    }

    /// Returns true the first time only.
    pub fn mark_reached(&self) -> Result<bool> {
        if self.reached.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }
        self.store.set_birthday_reached(true)?;
        Ok(true)
    }

    /// Forgets the reached state, in memory and on disk.
    pub fn clear(&self) -> Result<()> {
        self.reached.store(false, Ordering::SeqCst);
        self.store.set_birthday_reached(false)
    }
}
