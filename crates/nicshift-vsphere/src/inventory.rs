//! Inventory resolution: display name → managed-object reference.

use crate::error::VsphereResult;
use crate::session::{ViewHandle, VimSession};
use crate::types::{ManagedObjectRef, ObjectKind};

/// Name-based lookups over the vCenter inventory.
pub struct ObjectResolver<'a> {
    session: &'a dyn VimSession,
}

impl<'a> ObjectResolver<'a> {
    pub fn new(session: &'a dyn VimSession) -> Self {
        Self { session }
    }

    /// Find the first object of `kind` whose display name equals `name`
    /// (case-sensitive). Returns `Ok(None)` on zero matches — callers
    /// must treat "not found" as distinct from an error.
    ///
    /// Names are not unique in vSphere; with duplicates this yields
    /// whichever the enumeration reports first, with no determinism
    /// promise across inventory states.
    pub async fn find(
        &self,
        kind: ObjectKind,
        name: &str,
    ) -> VsphereResult<Option<ManagedObjectRef>> {
        let view = self.session.create_container_view(kind).await?;
        let result = self.scan(kind, &view, name).await;
        if let Err(e) = self.session.destroy_view(view).await {
            log::warn!("failed to destroy container view: {e}");
        }
        result
    }

    async fn scan(
        &self,
        kind: ObjectKind,
        view: &ViewHandle,
        name: &str,
    ) -> VsphereResult<Option<ManagedObjectRef>> {
        let items = self.session.view_contents(view).await?;
        Ok(items
            .into_iter()
            .find(|item| item.name == name)
            .map(|item| ManagedObjectRef::new(kind, item.id)))
    }
}
