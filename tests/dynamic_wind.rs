//! The classic R5RS 6.4 `dynamic-wind` + re-entrant continuation trace,
//! driven through `continuation::transition` the way an evaluator would:
//! the core only computes which before/after thunks to run and in what
//! order, so this test plays embedder and actually runs them, recording
//! the trace into a shared log.

use std::cell::RefCell;
use std::rc::Rc;

use scheme_rt::continuation;
use scheme_rt::prelude::*;

/// The dynamic-wind thunk representation this test uses: just a label,
/// since no evaluator is present to give it real code to run.
type Thunk = &'static str;

fn run(trace: &Rc<RefCell<Vec<&'static str>>>, thunks: &[Thunk]) {
    for t in thunks {
        trace.borrow_mut().push(t);
    }
}

#[test]
fn reentering_a_captured_continuation_replays_the_expected_trace() {
    let trace: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let root: WindNode<Thunk> = WindNode::root();
    let mut current = root.clone();

    // (dynamic-wind (lambda () (add 'connect)) ... (lambda () (add 'disconnect)))
    let child = root.push_child("connect", "disconnect");
    let enter = continuation::transition(&current, &child);
    run(&trace, &enter.exits);
    run(&trace, &enter.enters);
    current = child.clone();

    // (add 'talk1)
    trace.borrow_mut().push("talk1");

    // (call/cc (lambda (k) (set! resume k) ...))
    let k: Continuation<Thunk, ()> = Continuation::capture(current.clone(), ());

    // The body falls off the end of the dynamic-wind extent: exit back
    // to root, running `disconnect`.
    let exit = continuation::transition(&current, &root);
    run(&trace, &exit.exits);
    run(&trace, &exit.enters);
    current = root.clone();

    // Later, invoking the captured continuation re-enters the extent,
    // replaying `connect`.
    let (reentry, target) = k.invoke_from(&current);
    run(&trace, &reentry.exits);
    run(&trace, &reentry.enters);
    current = target;
    assert_eq!(current, child);

    // Control resumes after the `call/cc` call, i.e. at `(add 'talk2)`.
    trace.borrow_mut().push("talk2");

    // The program then ends, exiting the dynamic-wind extent for good.
    let final_exit = continuation::transition(&current, &root);
    run(&trace, &final_exit.exits);
    run(&trace, &final_exit.enters);

    assert_eq!(
        *trace.borrow(),
        vec!["connect", "talk1", "disconnect", "connect", "talk2", "disconnect"],
    );
}

#[test]
fn transition_between_unrelated_siblings_never_skips_the_common_ancestor() {
    let root: WindNode<Thunk> = WindNode::root();
    let left = root.push_child("enter-left", "exit-left");
    let left_left = left.push_child("enter-left-left", "exit-left-left");
    let right = root.push_child("enter-right", "exit-right");

    let t = continuation::transition(&left_left, &right);
    assert_eq!(t.exits, vec!["exit-left-left", "exit-left"]);
    assert_eq!(t.enters, vec!["enter-right"]);
}
