//! The template registry.
//!
//! Owns every function type known to a session, in definition order. Lookups
//! hand out either a borrowed `&Tplate` or a shared `Arc<Tplate>` that stays
//! valid after the template is undefined.
//!
//! Components refer to their sub-templates by name. The registry keeps those
//! references valid: a template cannot be defined on top of a missing or
//! cyclic reference, and cannot be undefined while another template uses it.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::tplate::template::split_list;
use crate::tplate::{BUILTINS, Body, BuiltinDef, Tplate};

/// Textual-formula parser that turns the right-hand side of a definition into a body.
pub trait FormulaParser {
    fn parse_body(&mut self, name: &str, fargs: &[String], rhs: &str, mgr: &TplateMgr) -> Result<Body>;
}

#[derive(Debug, Default)]
pub struct TplateMgr {
    tpvec: Vec<Arc<Tplate>>,
}

impl TplateMgr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the builtin function types.
    ///
    /// Formula-defined builtins need `parser`; without one they are skipped.
    /// On error the registry is left as it was.
    pub fn add_builtin_types(&mut self, parser: Option<&mut dyn FormulaParser>) -> Result<()> {
        let snapshot = self.tpvec.clone();
        let result = self.add_builtins(parser);
        if result.is_err() {
            self.tpvec = snapshot;
        }
        result
    }

    fn add_builtins(&mut self, mut parser: Option<&mut dyn FormulaParser>) -> Result<()> {
        for def in BUILTINS {
            let body = match (def.coded, parser.as_deref_mut()) {
                (Some(kind), _) => Body::Coded(kind),
                (None, Some(p)) => p.parse_body(def.name, &split_list(def.fargs), def.rhs, self)?,
                (None, None) => {
                    debug!(name = def.name, "no formula parser, builtin skipped");
                    continue;
                }
            };
            self.define(builtin_tplate(def, body)?)?;
        }
        debug!(count = self.tpvec.len(), "builtin function types added");
        Ok(())
    }

    /// Store a new template. An existing name is never overwritten.
    pub fn define(&mut self, tp: impl Into<Arc<Tplate>>) -> Result<Arc<Tplate>> {
        let tp = tp.into();
        if self.position(tp.name()).is_some() {
            return Err(Error::DuplicateName(tp.name().to_string()));
        }
        self.check_components(&tp)?;
        debug!(formula = %tp.as_formula(), "function type defined");
        self.tpvec.push(Arc::clone(&tp));
        Ok(tp)
    }

    /// Store a template, replacing a previous definition of the same name.
    ///
    /// Returns the replaced template, if any.
    pub fn redefine(&mut self, tp: impl Into<Arc<Tplate>>) -> Result<Option<Arc<Tplate>>> {
        let tp = tp.into();
        self.check_components(&tp)?;
        for user in self.users_of(tp.name()) {
            for c in user.components().iter().filter(|c| c.tp == tp.name()) {
                if c.cargs.len() != tp.fargs().len() {
                    return Err(Error::ArgumentCount {
                        name: tp.name().to_string(),
                        expected: tp.fargs().len(),
                        got: c.cargs.len(),
                    });
                }
            }
        }

        match self.position(tp.name()) {
            Some(i) => {
                debug!(formula = %tp.as_formula(), "function type redefined");
                Ok(Some(std::mem::replace(&mut self.tpvec[i], tp)))
            }
            None => {
                debug!(formula = %tp.as_formula(), "function type defined");
                self.tpvec.push(tp);
                Ok(None)
            }
        }
    }

    /// Remove a template by name.
    pub fn undefine(&mut self, name: &str) -> Result<Arc<Tplate>> {
        let i = self.position(name).ok_or_else(|| Error::NotFound(name.to_string()))?;
        if let Some(user) = self.users_of(name).next() {
            return Err(Error::InUse {
                name: name.to_string(),
                used_by: user.name().to_string(),
            });
        }
        debug!(name, "function type undefined");
        Ok(self.tpvec.remove(i))
    }

    pub fn get_tp(&self, name: &str) -> Option<&Tplate> {
        self.tpvec.iter().find(|tp| tp.name() == name).map(Arc::as_ref)
    }

    pub fn get_shared_tp(&self, name: &str) -> Option<Arc<Tplate>> {
        self.tpvec.iter().find(|tp| tp.name() == name).cloned()
    }

    /// All templates in definition order.
    pub fn tpvec(&self) -> &[Arc<Tplate>] {
        &self.tpvec
    }

    pub fn len(&self) -> usize {
        self.tpvec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tpvec.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tpvec.iter().position(|tp| tp.name() == name)
    }

    fn users_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Arc<Tplate>> + 'a {
        self.tpvec
            .iter()
            .filter(move |tp| tp.name() != name && tp.dependencies().any(|d| d == name))
    }

    fn check_components(&self, tp: &Tplate) -> Result<()> {
        for c in tp.components() {
            if c.tp == tp.name() || self.depends_on(&c.tp, tp.name()) {
                warn!(name = tp.name(), component = %c.tp, "recursive function type rejected");
                return Err(Error::RecursiveDefinition(tp.name().to_string()));
            }
            let sub = self.get_tp(&c.tp).ok_or_else(|| Error::NotFound(c.tp.clone()))?;
            if c.cargs.len() != sub.fargs().len() {
                return Err(Error::ArgumentCount {
                    name: c.tp.clone(),
                    expected: sub.fargs().len(),
                    got: c.cargs.len(),
                });
            }
        }
        Ok(())
    }

    /// True if template `from` uses `target`, directly or through its components.
    fn depends_on(&self, from: &str, target: &str) -> bool {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut pending = vec![from];
        while let Some(name) = pending.pop() {
            if !seen.insert(name) {
                continue;
            }
            let Some(tp) = self.get_tp(name) else {
                continue;
            };
            for dep in tp.dependencies() {
                if dep == target {
                    return true;
                }
                pending.push(dep);
            }
        }
        false
    }
}

fn builtin_tplate(def: &BuiltinDef, body: Body) -> Result<Tplate> {
    Ok(Tplate::new(def.name, split_list(def.fargs), split_list(def.defvals), def.rhs, body)?
        .classified(def.linear_d, def.peak_d))
}
