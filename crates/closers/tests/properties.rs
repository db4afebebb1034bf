//! Property tests for release ordering and failure selection

use closers::{run_then_release, Error, Group, Releasable};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

struct Tracked {
    index: usize,
    fails: bool,
    calls: Rc<RefCell<Vec<usize>>>,
}

impl Releasable for Tracked {
    type Error = Error;

    fn release(&mut self) -> Result<(), Error> {
        self.calls.borrow_mut().push(self.index);
        if self.fails {
            Err(Error::release(format!("entry {} failed", self.index)))
        } else {
            Ok(())
        }
    }
}

fn build(failures: &[bool]) -> (Group<'static>, Rc<RefCell<Vec<usize>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let group = failures
        .iter()
        .enumerate()
        .map(|(index, &fails)| Tracked {
            index,
            fails,
            calls: Rc::clone(&calls),
        })
        .collect();
    (group, calls)
}

proptest! {
    #[test]
    fn release_visits_every_entry_once_in_reverse(failures in prop::collection::vec(any::<bool>(), 0..24)) {
        let (mut group, calls) = build(&failures);
        let _ = group.release();

        let expected: Vec<usize> = (0..failures.len()).rev().collect();
        prop_assert_eq!(calls.borrow().clone(), expected);
    }

    #[test]
    fn release_reports_most_recently_registered_failure(failures in prop::collection::vec(any::<bool>(), 0..24)) {
        let (mut group, _calls) = build(&failures);
        let result = group.release();

        match failures.iter().rposition(|&fails| fails) {
            Some(index) => {
                prop_assert_eq!(result, Err(Error::release(format!("entry {index} failed"))));
            }
            None => {
                prop_assert_eq!(result, Ok(()));
            }
        }
    }

    #[test]
    fn work_failure_always_wins(failures in prop::collection::vec(any::<bool>(), 0..12)) {
        let (mut group, calls) = build(&failures);
        let result = run_then_release(
            &mut group,
            || Err::<(), _>(Error::internal("work failed")),
            Some(|e: Error| e.context("unexpected")),
        );

        prop_assert_eq!(result, Err(Error::internal("work failed")));
        prop_assert_eq!(calls.borrow().len(), failures.len());
    }
}
