//! Subcommand implementations.
//!
//! Each command writes its report to the given writer so it can be tested
//! without a terminal.

pub mod backend;
pub mod drill;
pub mod history;
pub mod mistakes;
pub mod tags;

use std::io::Write;

use wordmemo_core::SessionContext;
use wordmemo_storage::{persist, StorageFacade};

/// Persist the changed keys. Failures are reported, not fatal.
pub(crate) async fn save(
    facade: &StorageFacade,
    context: &SessionContext,
    keys: &[&str],
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let failed = persist(facade, context, keys).await;
    if !failed.is_empty() {
        writeln!(out, "warning: could not save {}", failed.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use wordmemo_storage::{LocalBackend, StorageFacade};

    pub fn facade() -> StorageFacade {
        StorageFacade::with_backend(Arc::new(LocalBackend::in_memory(1024 * 1024)))
    }

    pub fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }
}
