//! Builds a scenario twice, once as runtime classes and once as class
//! types, composes both, and compares the results.

use crate::config::{ClassDecl, ComponentDecl, FieldInit, MethodDecl, Scenario, load_scenario};
use anyhow::{Context, Result, bail};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info_span, trace};
use tsmix_common::intern;
use tsmix_runtime::{
    Args, ClassBuilder, ClassRef, Composer, PropertyKey, Source, Value, has_mixin,
};
use tsmix_solver::queries::{find_property, get_properties};
use tsmix_solver::{
    CallSignature, ClassType, ClassTypeBuilder, MixinTypeResolver, ParamInfo, PropertyInfo,
    TypeDatabase, TypeFormatter, TypeId, TypeInterner,
};

/// A declared class in both worlds.
struct DeclaredClass {
    runtime: ClassRef,
    ty: ClassType,
}

/// A composed and constructed scenario.
pub struct Composition {
    db: TypeInterner,
    class: ClassRef,
    class_type: ClassType,
    component_types: Vec<ClassType>,
    declared: Vec<ClassRef>,
    instance: Value,
}

/// One row of the resolution table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRow {
    pub key: String,
    /// Where the runtime found the key; `None` when nothing owns it.
    pub source: Option<Source>,
    pub component: Option<String>,
    pub value: String,
    /// Result of calling the member with no arguments, for methods.
    pub returns: Option<String>,
    pub declared_type: Option<String>,
    pub declared_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub composite: String,
    pub constructor_args: String,
    pub instance_type: String,
    /// Declared classes the instance counts as having mixed in.
    pub mixins: Vec<String>,
    pub members: Vec<MemberRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Error,
    Warning,
}

/// A disagreement between the runtime composite and its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub key: String,
    pub message: String,
}

pub fn load(path: &Path) -> Result<Composition> {
    let _span = info_span!("load", scenario = %path.display()).entered();
    let scenario = load_scenario(path)?;
    Composition::build(&scenario)
}

impl Composition {
    pub fn build(scenario: &Scenario) -> Result<Self> {
        let db = TypeInterner::new();
        let mut classes: IndexMap<String, DeclaredClass> = IndexMap::new();
        for decl in &scenario.classes {
            let base = match &decl.extends {
                Some(name) => Some(lookup(&classes, name)?),
                None => None,
            };
            let declared = DeclaredClass {
                runtime: runtime_class(decl, base.map(|b| &b.runtime)),
                ty: class_type(&db, scenario, decl, base.map(|b| &b.ty)),
            };
            debug!(class = %decl.name, "declared");
            classes.insert(decl.name.clone(), declared);
        }

        let mut component_types = Vec::with_capacity(scenario.compose.len());
        let mut component_classes = Vec::with_capacity(scenario.compose.len());
        for entry in &scenario.compose {
            let (class, ty) = compose_entry(&db, scenario, &classes, entry)?;
            component_classes.push(class);
            component_types.push(ty);
        }
        let Some((primary, auxiliaries)) = component_classes.split_first() else {
            bail!("`compose` lists no classes");
        };
        let class = Composer::new(primary)
            .with_all(auxiliaries)
            .options(scenario.options.clone())
            .build()?;
        let class_type = MixinTypeResolver::new(&db).composite_class(&component_types);

        let top = ComponentDecl::Composite(scenario.compose.clone());
        let args = lower_args(&top, scenario.args.clone().map(serde_json::Value::Array).as_ref())?;
        let instance = class
            .construct(args)
            .with_context(|| format!("failed to construct {}", class.name()))?;

        Ok(Self {
            db,
            class,
            class_type,
            component_types,
            declared: classes.into_values().map(|c| c.runtime).collect(),
            instance,
        })
    }

    pub fn instance(&self) -> &Value {
        &self.instance
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// Resolution table for `keys`, or for every runtime key and type member
    /// when `keys` is empty.
    pub fn inspect(&self, keys: &[String]) -> Result<Report> {
        let _span = info_span!("inspect", composite = %self.class.name()).entered();
        let formatter = TypeFormatter::new(&self.db);
        let members = get_properties(&self.db, self.class_type.instance_type);

        let keys: IndexSet<String> = if keys.is_empty() {
            let mut all: IndexSet<String> = self
                .instance
                .own_keys()?
                .iter()
                .map(ToString::to_string)
                .collect();
            all.extend(members.iter().map(|prop| prop.name.to_string()));
            all
        } else {
            keys.iter().cloned().collect()
        };

        let object = self.instance.expect_object()?;
        let mut rows = Vec::with_capacity(keys.len());
        for key in &keys {
            let property_key = PropertyKey::from(key.as_str());
            let source = object.resolution_of(&property_key)?;
            let value = self.instance.get(&property_key)?;
            let returns = value.is_callable().then(|| {
                match self.instance.invoke(&property_key, &[]) {
                    Ok(result) => result.to_string(),
                    Err(err) => format!("error: {err}"),
                }
            });
            let atom = intern(key);
            let declared = members.iter().find(|prop| prop.name == atom);
            trace!(key = %key, ?source, "row");
            rows.push(MemberRow {
                key: key.clone(),
                source,
                component: source.map(|s| self.component_name(s)),
                value: value.to_string(),
                returns,
                declared_type: declared.map(|prop| formatter.format(prop.type_id)),
                declared_by: declared.and_then(|prop| prop.parent_id).map(|a| a.to_string()),
            });
        }

        let constructor_args = MixinTypeResolver::new(&self.db)
            .composite_constructor_args(&self.component_types);
        Ok(Report {
            composite: self.class.name().to_string(),
            constructor_args: formatter.format(constructor_args),
            instance_type: formatter.format(self.class_type.instance_type),
            mixins: self
                .declared
                .iter()
                .filter(|class| has_mixin(&self.instance, class))
                .map(|class| class.name().to_string())
                .collect(),
            members: rows,
        })
    }

    /// Compare the constructed instance against the composite type.
    ///
    /// Missing members, undeclared keys and kind mismatches are errors. A
    /// member both sides know about but attribute to different components is
    /// a single warning, even when the two components give it different
    /// kinds: the type prefers the earliest component while auxiliary
    /// instance fields resolve ahead of every prototype at runtime.
    pub fn check(&self) -> Result<Vec<Finding>> {
        let _span = info_span!("check", composite = %self.class.name()).entered();
        let object = self.instance.expect_object()?;
        let members = get_properties(&self.db, self.class_type.instance_type);
        let mut findings = Vec::new();

        for prop in &members {
            let key = PropertyKey::from(prop.name);
            let name = prop.name.to_string();
            let Some(source) = object.resolution_of(&key)? else {
                if !prop.optional {
                    findings.push(Finding {
                        severity: Severity::Error,
                        key: name,
                        message: "declared by the type but absent at runtime".to_string(),
                    });
                }
                continue;
            };

            let value = self.instance.get(&key)?;
            let conforms = value_conforms(&value, prop);
            let runtime_component = self.component_name(source);
            if let Some(expected) = self.expected_component(prop)
                && expected != runtime_component
            {
                let mut message = format!(
                    "runtime resolves from `{runtime_component}` ({source}), the type from `{expected}`"
                );
                if !conforms {
                    message.push_str(&format!(
                        "; runtime value `{value}` ({}) does not match `{}`",
                        value.type_name(),
                        TypeFormatter::new(&self.db).format(prop.type_id)
                    ));
                }
                findings.push(Finding {
                    severity: Severity::Warning,
                    key: name,
                    message,
                });
            } else if !conforms {
                findings.push(Finding {
                    severity: Severity::Error,
                    key: name,
                    message: format!(
                        "runtime value `{value}` ({}) does not match `{}`",
                        value.type_name(),
                        TypeFormatter::new(&self.db).format(prop.type_id)
                    ),
                });
            }
        }

        for key in self.instance.own_keys()? {
            let known = key
                .as_atom()
                .is_some_and(|atom| members.iter().any(|prop| prop.name == atom));
            if !known {
                findings.push(Finding {
                    severity: Severity::Error,
                    key: key.to_string(),
                    message: "present at runtime but not a member of the type".to_string(),
                });
            }
        }

        debug!(findings = findings.len(), "check");
        Ok(findings)
    }

    fn component_name(&self, source: Source) -> String {
        self.class
            .components()
            .get(source.component_index())
            .map(|class| class.name().to_string())
            .unwrap_or_default()
    }

    /// First component whose instance type has `prop`.
    fn expected_component(&self, prop: &PropertyInfo) -> Option<String> {
        self.component_types
            .iter()
            .find(|ty| find_property(&self.db, ty.instance_type, prop.name).is_some())
            .map(|ty| ty.name.to_string())
    }
}

fn lookup<'a>(classes: &'a IndexMap<String, DeclaredClass>, name: &str) -> Result<&'a DeclaredClass> {
    match classes.get(name) {
        Some(class) => Ok(class),
        None => bail!("unknown class `{name}`"),
    }
}

fn compose_entry(
    db: &TypeInterner,
    scenario: &Scenario,
    classes: &IndexMap<String, DeclaredClass>,
    entry: &ComponentDecl,
) -> Result<(ClassRef, ClassType)> {
    match entry {
        ComponentDecl::Class(name) => {
            let class = lookup(classes, name)?;
            Ok((class.runtime.clone(), class.ty.clone()))
        }
        ComponentDecl::Composite(parts) => {
            let mut runtime = Vec::with_capacity(parts.len());
            let mut types = Vec::with_capacity(parts.len());
            for part in parts {
                let (class, ty) = compose_entry(db, scenario, classes, part)?;
                runtime.push(class);
                types.push(ty);
            }
            let Some((primary, auxiliaries)) = runtime.split_first() else {
                bail!("nested `compose` entry lists no classes");
            };
            let class = Composer::new(primary)
                .with_all(auxiliaries)
                .options(scenario.options.clone())
                .build()?;
            Ok((class, MixinTypeResolver::new(db).composite_class(&types)))
        }
    }
}

fn runtime_class(decl: &ClassDecl, base: Option<&ClassRef>) -> ClassRef {
    let mut builder = ClassBuilder::new(&decl.name);
    if let Some(base) = base {
        builder = builder.extends(base);
    }

    let fields: Vec<(String, FieldInit)> = decl
        .fields
        .iter()
        .map(|(name, init)| (name.clone(), init.clone()))
        .collect();
    builder = builder.init(move |this, args| {
        for (name, init) in &fields {
            let value = match init {
                FieldInit::Param { param } => args.get(*param),
                FieldInit::Literal(literal) => literal.to_value(),
            };
            this.define_field(name.as_str(), value)?;
        }
        Ok(())
    });

    for (name, method) in &decl.methods {
        builder = match method {
            MethodDecl::Returns { returns } => {
                let result = returns.to_value();
                builder.method(name.as_str(), move |_, _| Ok(result.clone()))
            }
            MethodDecl::ReturnsField { returns_field } => {
                let field = PropertyKey::from(returns_field.as_str());
                builder.method(name.as_str(), move |this, _| this.get(&field))
            }
        };
    }
    builder.build()
}

fn class_type(
    db: &TypeInterner,
    scenario: &Scenario,
    decl: &ClassDecl,
    base: Option<&ClassType>,
) -> ClassType {
    let params = scenario.effective_params(decl);
    let mut members = Vec::with_capacity(decl.fields.len() + decl.methods.len());

    for (name, init) in &decl.fields {
        let name = intern(name);
        members.push(match init {
            FieldInit::Literal(literal) => PropertyInfo::new(name, literal.type_id()),
            FieldInit::Param { param } => match params.get(*param) {
                Some(p) if p.optional => PropertyInfo::opt(name, p.type_id()),
                Some(p) => PropertyInfo::new(name, p.type_id()),
                None => PropertyInfo::new(name, TypeId::ERROR),
            },
        });
    }

    for (name, method) in &decl.methods {
        let return_type = match method {
            MethodDecl::Returns { returns } => returns.type_id(),
            MethodDecl::ReturnsField { returns_field } => {
                field_type(db, &members, base, returns_field)
            }
        };
        let signature = db.function(CallSignature::new(Vec::new(), return_type));
        members.push(PropertyInfo::method(intern(name), signature));
    }

    let constructor_params = decl.params.as_ref().map(|params| {
        params
            .iter()
            .map(|p| {
                if p.optional {
                    ParamInfo::optional(intern(&p.name), p.type_id())
                } else {
                    ParamInfo::required(intern(&p.name), p.type_id())
                }
            })
            .collect()
    });

    ClassTypeBuilder::new(db).class_type(intern(&decl.name), base, members, constructor_params)
}

/// Type of a field read by a `returnsField` method: own fields first, then
/// the base class. Fields supplied by other components are unknown here.
fn field_type(
    db: &dyn TypeDatabase,
    own: &[PropertyInfo],
    base: Option<&ClassType>,
    field: &str,
) -> TypeId {
    let name = intern(field);
    own.iter()
        .find(|prop| prop.name == name && !prop.is_method)
        .map(|prop| prop.type_id)
        .or_else(|| base.and_then(|b| find_property(db, b.instance_type, name)).map(|p| p.type_id))
        .unwrap_or(TypeId::ANY)
}

/// Lower scenario arguments against the shape of `component`: a list of
/// literals for a class, a list of argument lists for a composite.
///
/// Surplus or missing lists are passed through as they are so the composite
/// reports the argument-shape error itself.
fn lower_args(component: &ComponentDecl, args: Option<&serde_json::Value>) -> Result<Args> {
    match (component, args) {
        (ComponentDecl::Class(_), None) => Ok(Args::none()),
        (ComponentDecl::Class(name), Some(serde_json::Value::Array(items))) => items
            .iter()
            .enumerate()
            .map(|(index, item)| literal_value(item).with_context(|| format!("argument {index} of `{name}`")))
            .collect::<Result<Vec<_>>>()
            .map(Args::Positional),
        (ComponentDecl::Class(name), Some(other)) => {
            bail!("arguments of `{name}` must be a list, found {other}")
        }
        (ComponentDecl::Composite(parts), None) => parts
            .iter()
            .map(|part| lower_args(part, None))
            .collect::<Result<Vec<_>>>()
            .map(Args::PerComponent),
        (ComponentDecl::Composite(parts), Some(serde_json::Value::Array(items))) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match parts.get(index) {
                Some(part) => lower_args(part, Some(item)),
                None => lower_args(&ComponentDecl::Class(format!("#{index}")), Some(item)),
            })
            .collect::<Result<Vec<_>>>()
            .map(Args::PerComponent),
        (ComponentDecl::Composite(_), Some(other)) => {
            bail!("composite arguments must be a list of argument lists, found {other}")
        }
    }
}

fn literal_value(item: &serde_json::Value) -> Result<Value> {
    Ok(match item {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(n) => Value::Number(n),
            None => bail!("number {n} is out of range"),
        },
        serde_json::Value::String(s) => Value::string(s),
        other => bail!("expected a literal, found {other}"),
    })
}

/// Whether `value` has the kind `prop` declares.
fn value_conforms(value: &Value, prop: &PropertyInfo) -> bool {
    if prop.is_method {
        return value.is_callable();
    }
    if prop.optional && value.is_undefined() {
        return true;
    }
    match prop.type_id {
        TypeId::ANY | TypeId::UNKNOWN => true,
        TypeId::NUMBER => value.as_number().is_some(),
        TypeId::STRING => value.as_str().is_some(),
        TypeId::BOOLEAN => value.as_bool().is_some(),
        TypeId::NULL => matches!(value, Value::Null),
        TypeId::UNDEFINED | TypeId::VOID => value.is_undefined(),
        TypeId::SYMBOL => matches!(value, Value::Symbol(_)),
        _ => value.as_object().is_some() || value.is_callable(),
    }
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod tests;
