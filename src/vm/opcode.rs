//! Opcodes of the expression language.
//!
//! The compiler emits one opcode set for every kind of expression (point
//! transformations, function arguments, dataset algebra). Dataset
//! transformations accept only the subset for which
//! [`Opcode::is_dataset_op`] holds.

/// Opcode token. `Number` and `Dataset` are followed by a pool index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Opcode {
    Number = 1,
    Dataset = 2,
    Neg = 3,
    Add = 4,
    Sub = 5,
    Mul = 6,
    DtSumSameX = 7,
    DtAvgSameX = 8,
    DtShirleyBg = 9,
    And = 10,
    AfterAnd = 11,

    // Not valid in dataset transformations.
    Div = 20,
    Pow = 21,
    Sqrt = 22,
    Exp = 23,
    Ln = 24,
    Log10 = 25,
    Sin = 26,
    Cos = 27,
    Abs = 28,
    X = 30,
    Y = 31,
    S = 32,
    A = 33,
    Lt = 40,
    Gt = 41,
    Le = 42,
    Ge = 43,
    Eq = 44,
    Ne = 45,
    Or = 46,
    AfterOr = 47,
    Not = 48,
    Ternary = 49,
    AfterTernary = 50,
    Symbol = 60,
}

impl Opcode {
    const ALL: [Opcode; 36] = [
        Opcode::Number,
        Opcode::Dataset,
        Opcode::Neg,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::DtSumSameX,
        Opcode::DtAvgSameX,
        Opcode::DtShirleyBg,
        Opcode::And,
        Opcode::AfterAnd,
        Opcode::Div,
        Opcode::Pow,
        Opcode::Sqrt,
        Opcode::Exp,
        Opcode::Ln,
        Opcode::Log10,
        Opcode::Sin,
        Opcode::Cos,
        Opcode::Abs,
        Opcode::X,
        Opcode::Y,
        Opcode::S,
        Opcode::A,
        Opcode::Lt,
        Opcode::Gt,
        Opcode::Le,
        Opcode::Ge,
        Opcode::Eq,
        Opcode::Ne,
        Opcode::Or,
        Opcode::AfterOr,
        Opcode::Not,
        Opcode::Ternary,
        Opcode::AfterTernary,
        Opcode::Symbol,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Opcode> {
        Self::ALL.iter().copied().find(|op| op.code() == code)
    }

    /// True if the opcode is followed by a pool index in the code stream.
    pub fn has_operand(self) -> bool {
        matches!(self, Opcode::Number | Opcode::Dataset | Opcode::Symbol)
    }

    pub fn is_dataset_op(self) -> bool {
        matches!(
            self,
            Opcode::Number
                | Opcode::Dataset
                | Opcode::Neg
                | Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::DtSumSameX
                | Opcode::DtAvgSameX
                | Opcode::DtShirleyBg
                | Opcode::And
                | Opcode::AfterAnd
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Number => "NUMBER",
            Opcode::Dataset => "DATASET",
            Opcode::Neg => "NEG",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::DtSumSameX => "sum_same_x",
            Opcode::DtAvgSameX => "avg_same_x",
            Opcode::DtShirleyBg => "shirley_bg",
            Opcode::And => "AND",
            Opcode::AfterAnd => "AFTER_AND",
            Opcode::Div => "DIV",
            Opcode::Pow => "POW",
            Opcode::Sqrt => "sqrt",
            Opcode::Exp => "exp",
            Opcode::Ln => "ln",
            Opcode::Log10 => "log10",
            Opcode::Sin => "sin",
            Opcode::Cos => "cos",
            Opcode::Abs => "abs",
            Opcode::X => "x",
            Opcode::Y => "y",
            Opcode::S => "s",
            Opcode::A => "a",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Le => "LE",
            Opcode::Ge => "GE",
            Opcode::Eq => "EQ",
            Opcode::Ne => "NE",
            Opcode::Or => "OR",
            Opcode::AfterOr => "AFTER_OR",
            Opcode::Not => "NOT",
            Opcode::Ternary => "TERNARY",
            Opcode::AfterTernary => "AFTER_TERNARY",
            Opcode::Symbol => "SYMBOL",
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_and_are_unique() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_code(op.code()), Some(op));
        }
        let mut codes: Vec<i32> = Opcode::ALL.iter().map(|op| op.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), Opcode::ALL.len());
        assert_eq!(Opcode::from_code(0), None);
        assert_eq!(Opcode::from_code(999), None);
    }

    #[test]
    fn dataset_subset() {
        let subset: Vec<Opcode> = Opcode::ALL.into_iter().filter(|op| op.is_dataset_op()).collect();
        assert_eq!(subset.len(), 11);
        assert!(!Opcode::Div.is_dataset_op());
        assert!(!Opcode::X.is_dataset_op());
    }
}
