#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Deterministic release of groups of resources
//!
//! Resources are registered into a [`Group`] as they are acquired and are
//! released in the reverse order on [`Group::release`]. Every entry is
//! attempted even when earlier ones fail; the first failure in release order
//! is the one reported.
//!
//! [`run_then_release`] runs a unit of work and then releases a resource or
//! group on every exit path. A failure of the work always takes precedence
//! over a failure while releasing.
//!
//! ```
//! use closers::{release_fn, Error, Group};
//!
//! let mut group: Group = Group::new();
//! group.add(release_fn(|| Ok::<(), Error>(())));
//! group.add(release_fn(|| Err(Error::release("socket already closed"))));
//!
//! let err = group.release().unwrap_err();
//! assert_eq!(err.to_string(), "socket already closed");
//! ```

mod group;
mod releasable;
mod scoped;

#[cfg(test)]
mod fake;

pub use closers_config::ReleaseConfig;
pub use closers_errors::{Error, ReleaseError, Result};
pub use group::Group;
pub use releasable::{release_fn, ReleaseFn, Releasable};
pub use scoped::{identity, no_transform, run_then_release};
