use std::{fmt, sync::Arc};

use parking_lot::Mutex;

use crate::metrics::METRICS_ID_PROVIDER_HANDLE_INIT;

/// A lazily materialized, shared handle.
///
/// The slot lock is held while the value is constructed, so concurrent callers observe exactly one construction. Failed constructions leave the slot empty.
pub(crate) struct LazyHandle<T> {
    name: &'static str,
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> LazyHandle<T> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached value or stores the one returned by `init`.
    pub(crate) fn get_or_try_init<E>(
        &self,
        init: impl FnOnce() -> Result<Arc<T>, E>,
    ) -> Result<Arc<T>, E> {
        let mut slot = self.slot.lock();
        if let Some(value) = slot.as_ref() {
            return Ok(Arc::clone(value));
        }
        let value = init()?;
        *slot = Some(Arc::clone(&value));
        tracing::debug!("materialized {}", self.name);
        ::metrics::counter!(METRICS_ID_PROVIDER_HANDLE_INIT, "handle" => self.name).increment(1);
        Ok(value)
    }

    pub(crate) fn get_or_init(&self, init: impl FnOnce() -> Arc<T>) -> Arc<T> {
        match self.get_or_try_init(|| Ok::<_, std::convert::Infallible>(init())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    pub(crate) fn clear(&self) {
        self.slot.lock().take();
    }

    #[cfg(test)]
    pub(crate) fn is_present(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl<T> fmt::Debug for LazyHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.slot.lock().is_some() {
            "present"
        } else {
            "absent"
        };
        f.debug_tuple(self.name).field(&state).finish()
    }
}
