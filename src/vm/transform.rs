//! Execution of dataset transformations (`@n = expr`).
//!
//! The program is run on a private stack of copies; the provider is written
//! exactly once, after the result has been validated. A failing program
//! therefore never leaves a half-modified dataset behind.

use tracing::{debug, trace};

use crate::config::Settings;
use crate::data::DatasetProvider;
use crate::domain::{Dataset, NO_TITLE, Value, sort_by_x};
use crate::error::{Error, Result};
use crate::math::{interpolate_clamped, merge_same_x, shirley_background};
use crate::vm::{Instr, Opcode, Program, ValueStack};

/// Dataset receiving the result of a transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Overwrite an existing dataset (`@n = ...`).
    Index(usize),
    /// Append a new dataset (`@+ = ...`).
    New,
}

pub struct DatasetTransformer<'a, P: DatasetProvider + ?Sized> {
    provider: &'a mut P,
    settings: &'a Settings,
}

impl<'a, P: DatasetProvider + ?Sized> DatasetTransformer<'a, P> {
    pub fn new(provider: &'a mut P, settings: &'a Settings) -> Self {
        Self { provider, settings }
    }

    /// Execute `program` and store the result in `target`.
    ///
    /// Returns the index of the dataset that was written.
    pub fn run(&mut self, program: &Program, target: Target) -> Result<usize> {
        let value = self.evaluate(program)?;
        self.commit(value, target)
    }

    /// Execute `program` without touching the provider.
    pub fn evaluate(&self, program: &Program) -> Result<Value> {
        let mut stack = ValueStack::new();

        for instr in program.instructions() {
            let instr = instr?;
            trace!(?instr, depth = stack.len(), "dt op");
            match instr {
                Instr::Number(v) => stack.push(Value::Scalar(v))?,
                Instr::Dataset(n) => stack.push(Value::Series(self.fetch(n)?))?,
                Instr::Op(Opcode::Neg) => negate(stack.top_mut()?),
                Instr::Op(op @ (Opcode::Add | Opcode::Sub)) => {
                    let rhs = stack.pop()?;
                    let lhs = stack.pop()?;
                    stack.push(self.add_sub(op, lhs, rhs)?)?;
                }
                Instr::Op(Opcode::Mul) => {
                    let rhs = stack.pop()?;
                    let lhs = stack.pop()?;
                    stack.push(multiply(lhs, rhs)?)?;
                }
                Instr::Op(op @ (Opcode::DtSumSameX | Opcode::DtAvgSameX)) => {
                    let ds = stack.top_series_mut(op.name())?;
                    merge_same_x(&mut ds.points, op == Opcode::DtAvgSameX, self.settings.epsilon);
                }
                Instr::Op(Opcode::DtShirleyBg) => {
                    let ds = stack.top_series_mut(Opcode::DtShirleyBg.name())?;
                    let fit = shirley_background(
                        &mut ds.points,
                        self.settings.background_max_iter,
                        self.settings.background_max_rdiff,
                    );
                    debug!(iterations = fit.iterations, converged = fit.converged, "shirley background");
                }
                // Marks the left operand of `and`; the work is done by AfterAnd.
                Instr::Op(Opcode::And) => {}
                Instr::Op(Opcode::AfterAnd) => {
                    let rhs = stack.pop()?;
                    let lhs = stack.pop()?;
                    stack.push(concatenate(lhs, rhs)?)?;
                }
                Instr::Op(op) => return Err(Error::UnsupportedOpcode(op.name().to_string())),
                Instr::Symbol(_) => return Err(Error::UnsupportedOpcode(Opcode::Symbol.name().to_string())),
                Instr::Unknown(token) => return Err(Error::UnsupportedOpcode(format!("#{token}"))),
            }
        }

        stack.into_result()
    }

    fn fetch(&self, index: usize) -> Result<Dataset> {
        let ds = self.provider.dataset(index).ok_or(Error::NoSuchDataset(index))?;
        let title = if ds.title.is_empty() {
            NO_TITLE.to_string()
        } else {
            ds.title.clone()
        };
        Ok(Dataset::new(ds.points.clone(), title))
    }

    fn add_sub(&self, op: Opcode, lhs: Value, rhs: Value) -> Result<Value> {
        let subtract = op == Opcode::Sub;
        match (lhs, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(if subtract { a - b } else { a + b })),
            (Value::Series(mut a), Value::Series(b)) => {
                for p in a.points.iter_mut() {
                    let y = interpolate_clamped(&b.points, p.x, self.settings.epsilon);
                    if subtract {
                        p.y -= y;
                    } else {
                        p.y += y;
                    }
                }
                a.title = format!("{}{}{}", a.title, if subtract { '-' } else { '+' }, b.title);
                Ok(Value::Series(a))
            }
            _ => Err(Error::Type(if subtract {
                "subtracting number and dataset".to_string()
            } else {
                "adding number and dataset".to_string()
            })),
        }
    }

    fn commit(&mut self, value: Value, target: Target) -> Result<usize> {
        let series = match value {
            Value::Series(ds) => Some(ds),
            Value::Scalar(v) if v == 0.0 => None,
            Value::Scalar(_) => return Err(Error::Type("dataset or 0 expected on RHS".to_string())),
        };

        let index = match (target, series) {
            (Target::Index(n), _) if n >= self.provider.count() => return Err(Error::NoSuchDataset(n)),
            (Target::Index(n), Some(ds)) => {
                debug!(dataset = n, points = ds.points.len(), title = %ds.title, "dataset replaced");
                self.provider.replace(n, ds)?;
                n
            }
            (Target::Index(n), None) => {
                debug!(dataset = n, "dataset cleared");
                self.provider.clear(n)?;
                n
            }
            (Target::New, Some(ds)) => {
                debug!(points = ds.points.len(), title = %ds.title, "dataset appended");
                self.provider.append(ds)
            }
            (Target::New, None) => {
                debug!("empty dataset appended");
                self.provider.append_new()
            }
        };
        Ok(index)
    }
}

/// Run `program` against `provider`, writing the result to `target`.
pub fn transform<P: DatasetProvider + ?Sized>(
    provider: &mut P,
    settings: &Settings,
    program: &Program,
    target: Target,
) -> Result<usize> {
    DatasetTransformer::new(provider, settings).run(program, target)
}

fn negate(value: &mut Value) {
    match value {
        Value::Scalar(v) => *v = -*v,
        Value::Series(ds) => {
            for p in ds.points.iter_mut() {
                p.y = -p.y;
            }
            ds.title.insert(0, '-');
        }
    }
}

fn multiply(lhs: Value, rhs: Value) -> Result<Value> {
    match (lhs, rhs) {
        (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(a * b)),
        (Value::Series(_), Value::Series(_)) => Err(Error::Type("multiplying two datasets".to_string())),
        (Value::Series(mut ds), Value::Scalar(k)) => {
            scale(&mut ds, k);
            ds.title = format!("{}*{}", ds.title, short_number(k));
            Ok(Value::Series(ds))
        }
        (Value::Scalar(k), Value::Series(mut ds)) => {
            scale(&mut ds, k);
            ds.title = format!("{}*{}", short_number(k), ds.title);
            Ok(Value::Series(ds))
        }
    }
}

/// `%g`-style rendering: six significant digits, exponent form outside
/// `[1e-4, 1e6)`, trailing zeros dropped.
fn short_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if !v.is_finite() {
        return v.to_string();
    }
    let sci = format!("{v:.5e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return v.to_string();
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if !(-4..6).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.abs())
    } else {
        trim_fraction(&format!("{v:.*}", (5 - exp) as usize)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn scale(ds: &mut Dataset, k: f64) {
    for p in ds.points.iter_mut() {
        p.y *= k;
    }
}

fn concatenate(lhs: Value, rhs: Value) -> Result<Value> {
    match (lhs, rhs) {
        (Value::Series(mut a), Value::Series(b)) => {
            a.points.extend(b.points);
            sort_by_x(&mut a.points);
            a.title = format!("{}&{}", a.title, b.title);
            Ok(Value::Series(a))
        }
        _ => Err(Error::Type("expected @n on both sides of `and'".to_string())),
    }
}
