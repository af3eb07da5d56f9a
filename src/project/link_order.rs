// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Link-order adjustment.
//!
//! ```text
//! declared order [x.o, y.o, z.o]
//!        |
//!        |  non_matching only
//!        v
//! LinkOrderHook::adjust(module, order) --> replacement order
//! ```
//!
//! The graph builder never calls a hook for strict builds, so byte-exact
//! images always link in declared order.

use std::collections::BTreeMap;

use super::model::ModuleId;

/// Strategy that rewrites a module's link order.
pub trait LinkOrderHook: Send + Sync {
    /// Return the replacement object-name list for `module`.
    fn adjust(&self, module: ModuleId, objects: Vec<String>) -> Vec<String>;
}

/// Per-module rules from `[link_order.<module>]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRules {
    pub prepend: Vec<String>,
    pub append: Vec<String>,
    pub remove: Vec<String>,
}

/// Configuration-driven [`LinkOrderHook`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOrderRules {
    rules: BTreeMap<ModuleId, ModuleRules>,
}

impl LinkOrderRules {
    #[must_use]
    pub const fn new(rules: BTreeMap<ModuleId, ModuleRules>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl LinkOrderHook for LinkOrderRules {
    fn adjust(&self, module: ModuleId, objects: Vec<String>) -> Vec<String> {
        let Some(rules) = self.rules.get(&module) else {
            return objects;
        };
        rules
            .prepend
            .iter()
            .cloned()
            .chain(objects.into_iter().filter(|name| !rules.remove.contains(name)))
            .chain(rules.append.iter().cloned())
            .collect()
    }
}
