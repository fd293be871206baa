//! # Bindery View
//!
//! Glue between [`bindery`] properties and the views that show them.
//!
//! UI toolkits tend to fall into one of two shapes, and there is a bridge for
//! each:
//! * toolkits with view controllers and a load/unload lifecycle use
//!   [`ViewHost`], which refreshes a view once when it loads and again on
//!   every change until it unloads,
//! * toolkits that watch "observable objects" use [`Observed`], which wraps a
//!   [`Controller`](bindery::Controller) and tells its watchers when it
//!   changed.
//!
//! Controllers can outlive the views that show them. [`ControllerCache`]
//! keeps them by id so a view that comes back finds the same controller.
pub mod cache;
pub mod lifecycle;
pub mod observed;

pub use cache::ControllerCache;
pub use lifecycle::{Refresh, ViewHost};
pub use observed::Observed;

pub mod prelude {
    //! Re-exports for convenience
    pub use super::cache::ControllerCache;
    pub use super::lifecycle::{Refresh, ViewHost};
    pub use super::observed::Observed;
    pub use bindery::prelude::*;
}

#[cfg(test)]
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
