//! The R7RS `guard` seed scenarios from `SPEC_FULL.md` §8, driven
//! through `HandlerStack` the way an evaluator's `guard` expansion would:
//! each clause-matching handler returns `Some(result)` when one of its
//! clauses matches, or `None` to re-raise to the next-outer handler, per
//! R7RS 7th ed. 6.11's re-raise discipline.

use std::cell::RefCell;
use std::rc::Rc;

use scheme_rt::prelude::*;

type Handler = Rc<dyn Fn(&Value) -> Option<Value>>;

fn raise(stack: &mut HandlerStack<Handler>, condition: Value) -> Result<Value, &'static str> {
    loop {
        let handler = stack.pop().map_err(|_| "unhandled-at-top-level")?;
        if let Some(result) = handler(&condition) {
            return Ok(result);
        }
    }
}

fn symbol_guard() -> Handler {
    Rc::new(|c: &Value| {
        if c.is_symbol() {
            Some(Value::Pair(Rc::new(RefCell::new((
                Value::Symbol(Rc::from("symbol")),
                c.clone(),
            )))))
        } else {
            None
        }
    })
}

#[test]
fn guard_clause_matching_handles_symbol_condition() {
    let mut stack: HandlerStack<Handler> = HandlerStack::new();
    stack.push(symbol_guard());

    let result = raise(&mut stack, Value::Symbol(Rc::from("a"))).unwrap();
    match result {
        Value::Pair(p) => {
            let (tag, payload) = &*p.borrow();
            assert_eq!(*tag, Value::Symbol(Rc::from("symbol")));
            assert_eq!(*payload, Value::Symbol(Rc::from("a")));
        }
        other => panic!("expected a pair, got {other:?}"),
    }
}

#[test]
fn guard_with_no_matching_clause_reraises_past_the_stack() {
    let mut stack: HandlerStack<Handler> = HandlerStack::new();
    stack.push(symbol_guard());

    let err = raise(&mut stack, Value::Fixnum(4)).unwrap_err();
    assert_eq!(err, "unhandled-at-top-level");
}

#[test]
fn guard_falls_through_to_an_outer_handler_when_the_inner_clause_declines() {
    let mut stack: HandlerStack<Handler> = HandlerStack::new();
    let catch_all: Handler = Rc::new(|c: &Value| Some(Value::Pair(Rc::new(RefCell::new((
        Value::Symbol(Rc::from("caught-by-outer")),
        c.clone(),
    ))))));
    stack.push(catch_all);
    stack.push(symbol_guard());

    let result = raise(&mut stack, Value::Fixnum(4)).unwrap();
    match result {
        Value::Pair(p) => {
            let (tag, _) = &*p.borrow();
            assert_eq!(*tag, Value::Symbol(Rc::from("caught-by-outer")));
        }
        other => panic!("expected a pair, got {other:?}"),
    }
    assert!(stack.is_empty());
}
