use crate::ecs::{ComponentId, Entity};
use thiserror::Error;

/// Failure classes reported by the store.
///
/// `EntityCapacity` and `InvalidEntity` are recoverable: the store logs them
/// and hands back a neutral value. The remaining variants describe wiring
/// bugs; the store logs them at error level and panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("entity limit of {max} reached")]
    EntityCapacity { max: u32 },

    #[error("component limit of {max} reached while registering '{name}' (id {id})")]
    ComponentCapacity {
        name: &'static str,
        id: ComponentId,
        max: usize,
    },

    #[error("component '{name}' is not registered; call register::<{name}>() first")]
    UnregisteredComponent { name: &'static str },

    #[error("component '{name}' appears more than once in a view")]
    DuplicateComponent { name: &'static str },

    #[error("{entity} is not alive")]
    InvalidEntity { entity: Entity },
}

/// Log an unrecoverable error and abort the current operation.
#[cold]
#[track_caller]
pub(crate) fn fatal(err: StoreError) -> ! {
    tracing::error!(error = %err, "unrecoverable store error");
    panic!("{err}");
}
