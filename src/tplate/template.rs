//! Function types ("templates").
//!
//! A template such as `Gaussian(height, center, hwhm) = ...` describes a family
//! of functions. Concrete functions are made by binding variables to the
//! template's parameters ([`Tplate::bind`]).
//!
//! How the function is computed is given by the template's [`Body`]:
//!
//! - `Coded`: implemented natively by the fit-function layer
//! - `Sum`: sum of other templates with bound argument expressions
//! - `Split`: one component left of a threshold, another right of it
//! - `Custom`: parsed expression trees
//!
//! Templates are immutable once constructed and are shared as `Arc<Tplate>`.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::tplate::OpTree;
use crate::vm::Program;

/// Parameter names that a peak guess can supply.
pub const PEAK_TRAITS: [&str; 4] = ["center", "height", "hwhm", "area"];
/// Parameter names that a linear guess can supply.
pub const LINEAR_TRAITS: [&str; 3] = ["slope", "intercept", "avgy"];

/// Natively implemented function kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodedKind {
    Constant,
    Linear,
    Quadratic,
    Cubic,
    Polynomial4,
    Polynomial5,
    Polynomial6,
    Gaussian,
    Lorentzian,
    Pearson7,
    PseudoVoigt,
    Voigt,
    VoigtA,
    Emg,
    DoniachSunjic,
    PielaszekCube,
    LogNormal,
    Spline,
    Polyline,
}

/// Sub-template reference plus the compiled expressions bound to its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Name of the sub-template in the registry.
    pub tp: String,
    pub cargs: Vec<Program>,
}

impl Component {
    pub fn new(tp: impl Into<String>, cargs: Vec<Program>) -> Self {
        Self { tp: tp.into(), cargs }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Coded(CodedKind),
    Sum(Vec<Component>),
    /// `x < threshold ? parts[0] : parts[1]`
    Split {
        threshold: Program,
        parts: [Component; 2],
    },
    /// One tree per output channel.
    Custom(Vec<OpTree>),
}

/// What the function-construction layer has to build for a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Coded(CodedKind),
    Compound,
    Split,
    Custom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tplate {
    name: String,
    fargs: Vec<String>,
    defvals: Vec<String>,
    rhs: String,
    linear_d: bool,
    peak_d: bool,
    body: Body,
}

impl Tplate {
    /// Build a template.
    ///
    /// `defvals` holds default expressions for the trailing `fargs` (an empty
    /// string means "no default").
    pub fn new(
        name: impl Into<String>,
        fargs: Vec<String>,
        defvals: Vec<String>,
        rhs: impl Into<String>,
        body: Body,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_definition(&name, "empty name"));
        }
        for (i, a) in fargs.iter().enumerate() {
            if a.is_empty() {
                return Err(Error::invalid_definition(&name, format!("parameter #{i} has no name")));
            }
            if fargs[..i].contains(a) {
                return Err(Error::invalid_definition(&name, format!("parameter `{a}' repeated")));
            }
        }
        if defvals.len() > fargs.len() {
            return Err(Error::invalid_definition(
                &name,
                format!("{} default values for {} parameters", defvals.len(), fargs.len()),
            ));
        }
        match &body {
            Body::Sum(components) if components.is_empty() => {
                return Err(Error::invalid_definition(&name, "sum of no functions"));
            }
            Body::Custom(trees) if trees.is_empty() => {
                return Err(Error::invalid_definition(&name, "no formula"));
            }
            Body::Custom(trees) => {
                if let Some(i) = trees.iter().filter_map(OpTree::max_param).max() {
                    if i >= fargs.len() {
                        return Err(Error::invalid_definition(
                            &name,
                            format!("formula uses parameter #{i}, only {} defined", fargs.len()),
                        ));
                    }
                }
            }
            _ => {}
        }

        Ok(Self {
            name,
            fargs,
            defvals,
            rhs: rhs.into(),
            linear_d: false,
            peak_d: false,
            body,
        })
    }

    /// Set the guess classification hints.
    pub fn classified(mut self, linear_d: bool, peak_d: bool) -> Self {
        self.linear_d = linear_d;
        self.peak_d = peak_d;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fargs(&self) -> &[String] {
        &self.fargs
    }

    pub fn defvals(&self) -> &[String] {
        &self.defvals
    }

    pub fn rhs(&self) -> &str {
        &self.rhs
    }

    pub fn linear_d(&self) -> bool {
        self.linear_d
    }

    pub fn peak_d(&self) -> bool {
        self.peak_d
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// The native implementation, if any.
    pub fn create(&self) -> Option<CodedKind> {
        match self.body {
            Body::Coded(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_coded(&self) -> bool {
        self.create().is_some()
    }

    pub fn kind(&self) -> FunctionKind {
        match self.body {
            Body::Coded(kind) => FunctionKind::Coded(kind),
            Body::Sum(_) => FunctionKind::Compound,
            Body::Split { .. } => FunctionKind::Split,
            Body::Custom(_) => FunctionKind::Custom,
        }
    }

    /// Components of `Sum` and `Split` templates; empty otherwise.
    pub fn components(&self) -> &[Component] {
        match &self.body {
            Body::Sum(components) => components.as_slice(),
            Body::Split { parts, .. } => parts.as_slice(),
            _ => &[],
        }
    }

    /// Expression trees of `Custom` templates; empty otherwise.
    pub fn op_trees(&self) -> &[OpTree] {
        match &self.body {
            Body::Custom(trees) => trees.as_slice(),
            _ => &[],
        }
    }

    /// Explicit default of parameter `i` (tail-aligned `defvals`).
    fn explicit_default(&self, i: usize) -> Option<&str> {
        let offset = self.fargs.len() - self.defvals.len();
        i.checked_sub(offset)
            .and_then(|k| self.defvals.get(k))
            .map(String::as_str)
            .filter(|d| !d.is_empty())
    }

    /// Default expression of parameter `i`.
    ///
    /// Parameters of peak or linear templates named after a guessable trait
    /// default to that trait.
    pub fn default_for(&self, i: usize) -> Option<&str> {
        if let Some(d) = self.explicit_default(i) {
            return Some(d);
        }
        let farg = self.fargs.get(i)?.as_str();
        let guessable = (self.peak_d && PEAK_TRAITS.contains(&farg))
            || (self.linear_d && LINEAR_TRAITS.contains(&farg));
        guessable.then_some(farg)
    }

    /// Parameters that have no default and must be given explicitly.
    pub fn get_missing_default_values(&self) -> Vec<String> {
        (0..self.fargs.len())
            .filter(|&i| self.default_for(i).is_none())
            .map(|i| self.fargs[i].clone())
            .collect()
    }

    /// `Name(a, b=default, ...)`
    pub fn as_formula(&self) -> String {
        let args: Vec<String> = self
            .fargs
            .iter()
            .enumerate()
            .map(|(i, a)| match self.explicit_default(i) {
                Some(d) => format!("{a}={d}"),
                None => a.clone(),
            })
            .collect();
        format!("{}({})", self.name, args.join(", "))
    }

    /// `Name(a, b=default, ...) = rhs`
    pub fn as_definition(&self) -> String {
        format!("{} = {}", self.as_formula(), self.rhs)
    }

    /// Names of the templates this one is composed of.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.components().iter().map(|c| c.tp.as_str())
    }

    /// Bind variable names to the parameters, yielding the recipe of a concrete function.
    pub fn bind(self: &Arc<Self>, name: impl Into<String>, vars: Vec<String>) -> Result<BoundFunction> {
        if vars.len() != self.fargs.len() {
            return Err(Error::ArgumentCount {
                name: self.name.clone(),
                expected: self.fargs.len(),
                got: vars.len(),
            });
        }
        Ok(BoundFunction {
            name: name.into(),
            tplate: Arc::clone(self),
            vars,
        })
    }
}

/// A template with a variable bound to each parameter.
#[derive(Debug, Clone)]
pub struct BoundFunction {
    pub name: String,
    pub tplate: Arc<Tplate>,
    pub vars: Vec<String>,
}

impl BoundFunction {
    pub fn kind(&self) -> FunctionKind {
        self.tplate.kind()
    }

    /// Variable bound to parameter `farg`.
    pub fn var_for(&self, farg: &str) -> Option<&str> {
        let i = self.tplate.fargs.iter().position(|a| a == farg)?;
        self.vars.get(i).map(String::as_str)
    }
}

/// Split a comma-separated list, trimming each item (`""` is the empty list).
pub(crate) fn split_list(list: &str) -> Vec<String> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    list.split(',').map(|s| s.trim().to_string()).collect()
}
