//! Variant switching through define symbols
//!
//! The active variant is whichever variant's symbol is defined for the
//! target group. Switching defines the chosen variant's symbol and removes
//! the symbols of every other known variant; symbols that belong to no
//! variant are left alone.

use crate::application::session::DefineRegistry;
use crate::project::model::{CodeNameVariant, ProjectConfig, ProjectError};
use anyhow::Result;
use std::collections::{BTreeSet, HashSet};
use tracing::info;

/// Symbols currently defined for `group`, as the set `active_variant` expects
pub fn current_defines(registry: &dyn DefineRegistry, group: &str) -> Result<HashSet<String>> {
    Ok(registry.get(group)?.into_iter().collect())
}

/// Variant selected by the defines of `group`
pub fn active_variant<'c>(
    config: &'c ProjectConfig,
    registry: &dyn DefineRegistry,
    group: &str,
) -> Result<Option<&'c CodeNameVariant>> {
    let defines = current_defines(registry, group)?;
    Ok(config.active_variant(&defines))
}

/// New symbol set with `target` switched on and other variants switched off
pub fn switched_symbols(
    config: &ProjectConfig,
    current: &BTreeSet<String>,
    target: &CodeNameVariant,
) -> BTreeSet<String> {
    let known: HashSet<&str> = config
        .variants
        .iter()
        .map(|v| v.define_symbol.as_str())
        .collect();

    let mut symbols: BTreeSet<String> = current
        .iter()
        .filter(|s| !known.contains(s.as_str()))
        .cloned()
        .collect();
    symbols.insert(target.define_symbol.clone());
    symbols
}

/// Make `code_name` the active variant for `group`
pub fn switch_variant<'c>(
    config: &'c ProjectConfig,
    registry: &dyn DefineRegistry,
    group: &str,
    code_name: &str,
) -> Result<&'c CodeNameVariant> {
    let target = config
        .variant(code_name)
        .ok_or_else(|| ProjectError::UnknownVariant {
            name: code_name.to_string(),
        })?;

    let current = registry.get(group)?;
    let next = switched_symbols(config, &current, target);
    if next != current {
        registry.set(group, &next)?;
    }

    info!(variant = %target.code_name, group, define = %target.define_symbol, "Switched variant");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("switching.test.rs");
}
