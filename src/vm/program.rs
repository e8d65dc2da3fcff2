//! Compiled programs.
//!
//! A program is a flat stream of opcode tokens interleaved with pool indices,
//! plus two pools: numeric constants and dataset indices. The compiler builds it
//! append-only through [`ProgramBuilder`]; once built it is immutable and can be
//! executed any number of times.

use crate::error::{Error, Result};
use crate::vm::Opcode;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    code: Vec<i32>,
    numbers: Vec<f64>,
    datasets: Vec<usize>,
}

/// One decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instr {
    Number(f64),
    Dataset(usize),
    Symbol(i32),
    Op(Opcode),
    /// Token that is not an opcode at all.
    Unknown(i32),
}

impl Program {
    pub fn code(&self) -> &[i32] {
        &self.code
    }

    pub fn numbers(&self) -> &[f64] {
        &self.numbers
    }

    pub fn datasets(&self) -> &[usize] {
        &self.datasets
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Decode the code stream. Malformed streams yield an `Invariant` error.
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            program: self,
            pos: 0,
        }
    }

    fn pool_index(&self, pos: usize, op: Opcode) -> Result<usize> {
        let raw = *self
            .code
            .get(pos)
            .ok_or_else(|| Error::Invariant(format!("{op} at the end of the code, operand missing")))?;
        usize::try_from(raw).map_err(|_| Error::Invariant(format!("negative operand {raw} of {op}")))
    }
}

pub struct Instructions<'a> {
    program: &'a Program,
    pos: usize,
}

impl Iterator for Instructions<'_> {
    type Item = Result<Instr>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = *self.program.code.get(self.pos)?;
        self.pos += 1;
        let Some(op) = Opcode::from_code(token) else {
            return Some(Ok(Instr::Unknown(token)));
        };
        if !op.has_operand() {
            return Some(Ok(Instr::Op(op)));
        }

        let decoded = self.program.pool_index(self.pos, op).and_then(|idx| match op {
            Opcode::Number => self
                .program
                .numbers
                .get(idx)
                .map(|&v| Instr::Number(v))
                .ok_or_else(|| Error::Invariant(format!("number #{idx} not in the pool"))),
            Opcode::Dataset => self
                .program
                .datasets
                .get(idx)
                .map(|&d| Instr::Dataset(d))
                .ok_or_else(|| Error::Invariant(format!("dataset #{idx} not in the pool"))),
            _ => Ok(Instr::Symbol(self.program.code[self.pos])),
        });
        self.pos += 1;
        Some(decoded)
    }
}

/// Operand token of a pool index.
///
/// Indices that do not fit into a token become `-1`, which decoding rejects.
fn pool_token(idx: usize) -> i32 {
    i32::try_from(idx).unwrap_or(-1)
}

/// Append-only program construction.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(mut self, value: f64) -> Self {
        let idx = self.program.numbers.len();
        self.program.numbers.push(value);
        self.program.code.push(Opcode::Number.code());
        self.program.code.push(pool_token(idx));
        self
    }

    pub fn dataset(mut self, index: usize) -> Self {
        let idx = self.program.datasets.len();
        self.program.datasets.push(index);
        self.program.code.push(Opcode::Dataset.code());
        self.program.code.push(pool_token(idx));
        self
    }

    /// Reference to a named symbol (variable) by the compiler's symbol index.
    pub fn symbol(mut self, index: i32) -> Self {
        self.program.code.push(Opcode::Symbol.code());
        self.program.code.push(index);
        self
    }

    /// Append an operand-less opcode.
    pub fn op(mut self, op: Opcode) -> Self {
        self.program.code.push(op.code());
        self
    }

    /// Append a raw token (compiler extensions unknown to this crate).
    pub fn token(mut self, token: i32) -> Self {
        self.program.code.push(token);
        self
    }

    pub fn build(self) -> Program {
        self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pools_are_indexed_in_append_order() {
        let p = ProgramBuilder::new()
            .dataset(3)
            .number(2.5)
            .op(Opcode::Mul)
            .dataset(0)
            .op(Opcode::Add)
            .build();
        assert_eq!(p.numbers(), &[2.5]);
        assert_eq!(p.datasets(), &[3, 0]);

        let instrs: Vec<Instr> = p.instructions().collect::<Result<_>>().unwrap();
        assert_eq!(
            instrs,
            vec![
                Instr::Dataset(3),
                Instr::Number(2.5),
                Instr::Op(Opcode::Mul),
                Instr::Dataset(0),
                Instr::Op(Opcode::Add),
            ]
        );
    }

    #[test]
    fn truncated_code_is_an_invariant_failure() {
        let p = ProgramBuilder::new().token(Opcode::Number.code()).build();
        let err = p.instructions().next().unwrap().unwrap_err();
        assert!(matches!(err, Error::Invariant(_)), "got {err:?}");
    }

    #[test]
    fn unknown_tokens_are_reported_not_skipped() {
        let p = ProgramBuilder::new().token(12345).build();
        assert_eq!(p.instructions().next().unwrap(), Ok(Instr::Unknown(12345)));
    }

    #[test]
    fn oversized_pool_index_is_rejected_on_decode() {
        assert_eq!(pool_token(7), 7);
        assert_eq!(pool_token(i32::MAX as usize + 1), -1);

        let p = ProgramBuilder::new()
            .token(Opcode::Dataset.code())
            .token(pool_token(usize::MAX))
            .build();
        let err = p.instructions().next().unwrap().unwrap_err();
        assert!(matches!(err, Error::Invariant(_)), "got {err:?}");
    }
}
