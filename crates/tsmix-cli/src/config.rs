//! Scenario files.
//!
//! A scenario declares a handful of classes, the list of classes to
//! compose, and the constructor arguments for each component:
//!
//! ```json
//! {
//!   "options": { "unresolvedWrite": "reject" },
//!   "classes": [
//!     { "name": "Point",
//!       "params": [{ "name": "x", "type": "number" }],
//!       "fields": { "x": { "param": 0 }, "kind": "point" },
//!       "methods": { "describe": { "returns": "a point" }, "getX": { "returnsField": "x" } } },
//!     { "name": "Label", "fields": { "text": "origin" } }
//!   ],
//!   "compose": ["Point", "Label"],
//!   "args": [[1], []]
//! }
//! ```
//!
//! A `compose` entry that is itself a list composes those classes first and
//! uses the result as one component.

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tsmix_runtime::{ComposeOptions, Value};
use tsmix_solver::{IntrinsicKind, TypeId};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub options: ComposeOptions,
    pub classes: Vec<ClassDecl>,
    pub compose: Vec<ComponentDecl>,
    /// One entry per top-level component; omitted means no arguments.
    #[serde(default)]
    pub args: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClassDecl {
    pub name: String,
    #[serde(default)]
    pub extends: Option<String>,
    /// `None` inherits the base class's parameters.
    #[serde(default)]
    pub params: Option<Vec<ParamDecl>>,
    #[serde(default)]
    pub fields: IndexMap<String, FieldInit>,
    #[serde(default)]
    pub methods: IndexMap<String, MethodDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ParamDecl {
    pub name: String,
    #[serde(rename = "type", default = "default_param_type")]
    pub ty: String,
    #[serde(default)]
    pub optional: bool,
}

fn default_param_type() -> String {
    "any".to_string()
}

impl ParamDecl {
    pub fn type_id(&self) -> TypeId {
        IntrinsicKind::from_name(&self.ty)
            .map(IntrinsicKind::type_id)
            .unwrap_or(TypeId::ERROR)
    }
}

/// Initial value of an instance field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldInit {
    /// The constructor argument at this index.
    Param { param: usize },
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MethodDecl {
    Returns {
        returns: Literal,
    },
    /// Reads a field through the receiver.
    ReturnsField {
        #[serde(rename = "returnsField")]
        returns_field: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Literal {
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Number(n) => Value::Number(*n),
            Literal::String(s) => Value::string(s),
        }
    }

    pub fn type_id(&self) -> TypeId {
        match self {
            Literal::Null => TypeId::NULL,
            Literal::Bool(_) => TypeId::BOOLEAN,
            Literal::Number(_) => TypeId::NUMBER,
            Literal::String(_) => TypeId::STRING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ComponentDecl {
    Class(String),
    Composite(Vec<ComponentDecl>),
}

impl ComponentDecl {
    pub fn class_names(&self) -> Vec<&str> {
        match self {
            ComponentDecl::Class(name) => vec![name.as_str()],
            ComponentDecl::Composite(parts) => parts.iter().flat_map(Self::class_names).collect(),
        }
    }
}

impl Scenario {
    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.iter().find(|decl| decl.name == name)
    }

    /// Reject scenarios that name unknown classes or parameters.
    pub fn validate(&self) -> Result<()> {
        let mut declared: FxHashSet<&str> = FxHashSet::default();
        for decl in &self.classes {
            if let Some(base) = &decl.extends
                && !declared.contains(base.as_str())
            {
                bail!(
                    "class `{}` extends `{}`, which is not declared before it",
                    decl.name,
                    base
                );
            }
            if !declared.insert(decl.name.as_str()) {
                bail!("class `{}` is declared twice", decl.name);
            }

            let params = self.effective_params(decl);
            for param in params {
                if IntrinsicKind::from_name(&param.ty).is_none() {
                    bail!(
                        "parameter `{}` of `{}` has unknown type `{}`",
                        param.name,
                        decl.name,
                        param.ty
                    );
                }
            }
            for (field, init) in &decl.fields {
                if let FieldInit::Param { param } = init
                    && *param >= params.len()
                {
                    bail!(
                        "field `{}.{}` reads parameter {} but `{}` takes {}",
                        decl.name,
                        field,
                        param,
                        decl.name,
                        params.len()
                    );
                }
            }
        }

        if self.compose.is_empty() {
            bail!("`compose` lists no classes");
        }
        for entry in &self.compose {
            if matches!(entry, ComponentDecl::Composite(parts) if parts.is_empty()) {
                bail!("nested `compose` entry lists no classes");
            }
            for name in entry.class_names() {
                if !declared.contains(name) {
                    bail!("`compose` names undeclared class `{name}`");
                }
            }
        }
        Ok(())
    }

    /// Parameters of `decl`, walking up `extends` when it declares none.
    pub fn effective_params<'a>(&'a self, decl: &'a ClassDecl) -> &'a [ParamDecl] {
        let mut current = decl;
        loop {
            if let Some(params) = &current.params {
                return params;
            }
            match current.extends.as_deref().and_then(|base| self.class(base)) {
                Some(base) => current = base,
                None => return &[],
            }
        }
    }
}

pub fn parse_scenario(source: &str) -> Result<Scenario> {
    let scenario: Scenario =
        serde_json::from_str(source).context("failed to parse scenario JSON")?;
    scenario.validate()?;
    Ok(scenario)
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario: {}", path.display()))?;
    parse_scenario(&source).with_context(|| format!("invalid scenario: {}", path.display()))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
