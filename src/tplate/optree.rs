//! Parsed expression trees of custom function types.
//!
//! The formula parser turns the right-hand side of a definition such as
//! `Sigmoid(lower, upper, xmid, wsig) = lower + (upper-lower)/(1+exp((xmid-x)/wsig))`
//! into one `OpTree`. Parameters are referenced by their position in the
//! template's `fargs`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sqrt,
    Exp,
    Ln,
    Log10,
    Sin,
    Cos,
    Abs,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OpTree {
    Num(f64),
    X,
    Param(usize),
    Neg(Box<OpTree>),
    Binary(BinaryOp, Box<OpTree>, Box<OpTree>),
    Call(Func, Box<OpTree>),
}

impl OpTree {
    pub fn binary(op: BinaryOp, lhs: OpTree, rhs: OpTree) -> Self {
        OpTree::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn call(func: Func, arg: OpTree) -> Self {
        OpTree::Call(func, Box::new(arg))
    }

    pub fn neg(arg: OpTree) -> Self {
        OpTree::Neg(Box::new(arg))
    }

    /// Value at `x` for the given parameter values.
    ///
    /// A parameter index beyond `params` evaluates to NaN; templates reject such
    /// trees when they are constructed.
    pub fn eval(&self, x: f64, params: &[f64]) -> f64 {
        match self {
            OpTree::Num(v) => *v,
            OpTree::X => x,
            OpTree::Param(i) => params.get(*i).copied().unwrap_or(f64::NAN),
            OpTree::Neg(a) => -a.eval(x, params),
            OpTree::Binary(op, a, b) => {
                let (a, b) = (a.eval(x, params), b.eval(x, params));
                match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                    BinaryOp::Pow => a.powf(b),
                }
            }
            OpTree::Call(func, a) => {
                let a = a.eval(x, params);
                match func {
                    Func::Sqrt => a.sqrt(),
                    Func::Exp => a.exp(),
                    Func::Ln => a.ln(),
                    Func::Log10 => a.log10(),
                    Func::Sin => a.sin(),
                    Func::Cos => a.cos(),
                    Func::Abs => a.abs(),
                }
            }
        }
    }

    /// Highest parameter index referenced by the tree.
    pub fn max_param(&self) -> Option<usize> {
        match self {
            OpTree::Num(_) | OpTree::X => None,
            OpTree::Param(i) => Some(*i),
            OpTree::Neg(a) | OpTree::Call(_, a) => a.max_param(),
            OpTree::Binary(_, a, b) => a.max_param().max(b.max_param()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_exponential_decay() {
        // a*exp(-x/t)
        let tree = OpTree::binary(
            BinaryOp::Mul,
            OpTree::Param(0),
            OpTree::call(
                Func::Exp,
                OpTree::neg(OpTree::binary(BinaryOp::Div, OpTree::X, OpTree::Param(1))),
            ),
        );
        let v = tree.eval(2.0, &[3.0, 2.0]);
        assert!((v - 3.0 * (-1.0_f64).exp()).abs() < 1e-12, "got {v}");
        assert_eq!(tree.max_param(), Some(1));
    }

    #[test]
    fn missing_parameter_is_nan() {
        assert!(OpTree::Param(4).eval(0.0, &[1.0]).is_nan());
        assert_eq!(OpTree::X.max_param(), None);
    }
}
