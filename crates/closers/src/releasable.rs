//! The release capability and its adapters

use std::fmt;

/// A resource that can be released
///
/// Implementations report failure through their own error type. A group
/// never calls `release` on the same entry twice within one pass, but it
/// does replay the whole pass when the group is released again; resources
/// that cannot be released twice must guard against that themselves.
pub trait Releasable {
    type Error;

    /// Release the resource
    ///
    /// # Errors
    ///
    /// Returns the resource's error if it could not be released.
    fn release(&mut self) -> Result<(), Self::Error>;
}

impl<R: Releasable + ?Sized> Releasable for Box<R> {
    type Error = R::Error;

    fn release(&mut self) -> Result<(), Self::Error> {
        (**self).release()
    }
}

impl<R: Releasable + ?Sized> Releasable for &mut R {
    type Error = R::Error;

    fn release(&mut self) -> Result<(), Self::Error> {
        (**self).release()
    }
}

/// Releasable backed by a closure, see [`release_fn`]
pub struct ReleaseFn<F>(F);

/// Adapt a closure into a [`Releasable`]
///
/// The closure runs every time the resource is released.
pub fn release_fn<F, E>(release: F) -> ReleaseFn<F>
where
    F: FnMut() -> Result<(), E>,
{
    ReleaseFn(release)
}

impl<F, E> Releasable for ReleaseFn<F>
where
    F: FnMut() -> Result<(), E>,
{
    type Error = E;

    fn release(&mut self) -> Result<(), E> {
        (self.0)()
    }
}

impl<F> fmt::Debug for ReleaseFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseFn").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use closers_errors::Error;

    #[test]
    fn test_release_fn_runs_closure_each_time() {
        let mut calls = 0;
        {
            let mut resource = release_fn(|| {
                calls += 1;
                Ok::<(), Error>(())
            });
            resource.release().unwrap();
            resource.release().unwrap();
        }
        assert_eq!(calls, 2);
    }

    fn release_owned<R: Releasable>(mut resource: R) -> Result<(), R::Error> {
        resource.release()
    }

    #[test]
    fn test_boxed_and_borrowed_forward() {
        let mut inner = release_fn(|| Err(Error::release("closed twice")));

        assert_eq!(release_owned(&mut inner), Err(Error::release("closed twice")));

        let mut boxed: Box<dyn Releasable<Error = Error>> = Box::new(inner);
        assert_eq!(boxed.release(), Err(Error::release("closed twice")));
    }
}
