// demo.rs - Short tour of the store API

use strata_core::{spawn, Store, StoreConfig};

#[derive(Debug, Clone)]
pub struct Name(pub String);

/// Returns the number of entities still alive at the end.
pub fn run() -> usize {
    let mut store = Store::with_config(StoreConfig::default().with_max_entities(16));
    store.register::<Name>();

    let tom = store.create();
    store.add_component(tom, Name("Tom".into()));
    spawn!(store, Name("Ada".into()));

    store.view::<(Name,)>().each(|e, (name,)| {
        tracing::info!(%e, name = %name.0, "view");
    });

    let alive = store.alive().to_vec();
    for e in alive {
        if let Some(Name(name)) = store.remove_component::<Name>(e) {
            tracing::info!(%e, %name, "removed");
        }
        store.destroy(e);
    }
    tracing::info!(pending = store.pending_destroy_count(), "destruction staged");

    store.clear::<Name>();
    store.reset();
    tracing::info!(alive = store.alive_count(), "store reset");
    store.alive_count()
}
