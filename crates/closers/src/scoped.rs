//! Run work, then release

use crate::releasable::Releasable;
use std::fmt;

/// Run `work`, then release `resource` on every exit path
///
/// If `work` fails, the resource is still released but any release error is
/// logged and dropped; the work error is returned unchanged. If `work`
/// succeeds and the release fails, the release error is passed through
/// `transform` when one is given. Pass [`no_transform`] (or `None`) to get
/// the raw release error.
///
/// `resource` may be a single resource or a whole [`Group`](crate::Group).
///
/// # Errors
///
/// Returns the work error, or the (possibly transformed) release error.
///
/// # Example
///
/// ```
/// use closers::{release_fn, run_then_release, Error};
///
/// let mut archive = release_fn(|| Err(Error::release("during close")));
/// let err = run_then_release(
///     &mut archive,
///     || Ok(()),
///     Some(|e: Error| e.context("closing archive")),
/// )
/// .unwrap_err();
/// assert_eq!(err.to_string(), "closing archive: during close");
/// ```
pub fn run_then_release<R, T, W, F>(
    resource: &mut R,
    work: W,
    transform: Option<F>,
) -> Result<T, R::Error>
where
    R: Releasable + ?Sized,
    R::Error: fmt::Display,
    W: FnOnce() -> Result<T, R::Error>,
    F: FnOnce(R::Error) -> R::Error,
{
    match work() {
        Err(work_error) => {
            if let Err(release_error) = resource.release() {
                tracing::warn!(
                    error = %release_error,
                    "release failed after work failed, reporting the work error"
                );
            }
            Err(work_error)
        }
        Ok(value) => match resource.release() {
            Ok(()) => Ok(value),
            Err(release_error) => Err(match transform {
                Some(transform) => transform(release_error),
                None => release_error,
            }),
        },
    }
}

/// Pass-through release error transform
#[must_use]
pub fn identity<E>(error: E) -> E {
    error
}

/// An absent transform, for call sites where `None` cannot be inferred
#[must_use]
pub fn no_transform<E>() -> Option<fn(E) -> E> {
    None
}
