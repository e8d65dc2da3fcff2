//! Keyword-to-positional argument binding.
//!
//! Used when a function is written as `Gaussian(center=1, height=3)` instead of
//! `Gaussian(3, 1, hwhm)`. Values are compiled expressions and are only moved,
//! never evaluated.

use crate::error::{Error, Result};
use crate::tplate::Tplate;

/// One positional argument after reordering.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgSlot<'t, E> {
    /// Value given by the caller.
    Given(E),
    /// Default expression taken from the template.
    Default(&'t str),
}

impl<E> ArgSlot<'_, E> {
    pub fn given(&self) -> Option<&E> {
        match self {
            ArgSlot::Given(e) => Some(e),
            ArgSlot::Default(_) => None,
        }
    }
}

/// Align keyword `values` to the order of `tp.fargs()`, filling the gaps with defaults.
pub fn reorder_args<'t, K, E>(tp: &'t Tplate, keys: &[K], values: Vec<E>) -> Result<Vec<ArgSlot<'t, E>>>
where
    K: AsRef<str>,
{
    if keys.len() != values.len() {
        return Err(Error::Invariant(format!(
            "{} keywords but {} values",
            keys.len(),
            values.len()
        )));
    }

    let fargs = tp.fargs();
    let mut given: Vec<Option<E>> = fargs.iter().map(|_| None).collect();
    for (key, value) in keys.iter().zip(values) {
        let key = key.as_ref();
        let pos = fargs
            .iter()
            .position(|a| a == key)
            .ok_or_else(|| Error::UnknownArgument {
                tplate: tp.name().to_string(),
                arg: key.to_string(),
            })?;
        if given[pos].replace(value).is_some() {
            return Err(Error::DuplicateArgument {
                tplate: tp.name().to_string(),
                arg: key.to_string(),
            });
        }
    }

    given
        .into_iter()
        .enumerate()
        .map(|(i, slot)| match slot {
            Some(value) => Ok(ArgSlot::Given(value)),
            None => tp.default_for(i).map(ArgSlot::Default).ok_or_else(|| Error::MissingArgument {
                tplate: tp.name().to_string(),
                arg: fargs[i].clone(),
            }),
        })
        .collect()
}
