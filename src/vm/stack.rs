//! Fixed-capacity value stack.
//!
//! Six slots cover the deepest nesting the dataset-algebra grammar allows.
//! Exceeding them is reported as [`Error::StackOverflow`]; the stack never grows.

use crate::domain::{Dataset, Value};
use crate::error::{Error, Result};

pub const STACK_CAPACITY: usize = 6;

#[derive(Debug, Default)]
pub struct ValueStack {
    slots: [Option<Value>; STACK_CAPACITY],
    len: usize,
}

impl ValueStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, value: Value) -> Result<()> {
        if self.len == STACK_CAPACITY {
            return Err(Error::StackOverflow(STACK_CAPACITY));
        }
        self.slots[self.len] = Some(value);
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Value> {
        if self.len == 0 {
            return Err(Error::Invariant("stack underflow".to_string()));
        }
        self.len -= 1;
        self.slots[self.len]
            .take()
            .ok_or_else(|| Error::Invariant("empty slot below the stack top".to_string()))
    }

    pub fn top_mut(&mut self) -> Result<&mut Value> {
        match self.len.checked_sub(1) {
            Some(i) => self.slots[i]
                .as_mut()
                .ok_or_else(|| Error::Invariant("empty slot at the stack top".to_string())),
            None => Err(Error::Invariant("stack underflow".to_string())),
        }
    }

    /// The top value as a series, or a type error naming `what`.
    pub fn top_series_mut(&mut self, what: &str) -> Result<&mut Dataset> {
        match self.top_mut()? {
            Value::Series(ds) => Ok(ds),
            Value::Scalar(_) => Err(Error::Type(format!("{what} is defined only for @n"))),
        }
    }

    /// Consume the stack, which must hold exactly one value.
    pub fn into_result(mut self) -> Result<Value> {
        if self.len != 1 {
            return Err(Error::Invariant(format!(
                "{} values left on the stack, expected 1",
                self.len
            )));
        }
        self.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seventh_push_overflows_without_corrupting() {
        let mut stack = ValueStack::new();
        for i in 0..STACK_CAPACITY {
            stack.push(Value::Scalar(i as f64)).unwrap();
        }
        assert_eq!(stack.push(Value::Scalar(99.0)), Err(Error::StackOverflow(6)));
        assert_eq!(stack.len(), 6);
        assert_eq!(stack.pop().unwrap(), Value::Scalar(5.0));
    }

    #[test]
    fn pop_on_empty_is_an_invariant_failure() {
        let mut stack = ValueStack::new();
        assert!(matches!(stack.pop(), Err(Error::Invariant(_))));
        assert!(matches!(stack.top_mut(), Err(Error::Invariant(_))));
    }

    #[test]
    fn result_requires_exactly_one_value() {
        let mut stack = ValueStack::new();
        stack.push(Value::Scalar(1.0)).unwrap();
        stack.push(Value::Scalar(2.0)).unwrap();
        assert!(matches!(stack.into_result(), Err(Error::Invariant(_))));

        let mut stack = ValueStack::new();
        stack.push(Value::Scalar(1.0)).unwrap();
        assert_eq!(stack.into_result().unwrap(), Value::Scalar(1.0));
    }

    #[test]
    fn series_ops_reject_numbers() {
        let mut stack = ValueStack::new();
        stack.push(Value::Scalar(1.0)).unwrap();
        let err = stack.top_series_mut("sum_same_x").unwrap_err();
        assert_eq!(err, Error::Type("sum_same_x is defined only for @n".to_string()));
    }
}
