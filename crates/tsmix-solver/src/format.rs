//! TypeScript-style rendering of interned types, for diagnostics.

use crate::intern::TypeDatabase;
use crate::types::*;

pub struct TypeFormatter<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }

    pub fn format(&self, type_id: TypeId) -> String {
        match self.db.lookup(type_id) {
            Some(TypeData::Intrinsic(kind)) => kind.name().to_string(),
            Some(TypeData::Object(shape)) => self.format_members(&shape.properties, &[], &[]),
            Some(TypeData::Callable(shape)) => {
                if shape.properties.is_empty()
                    && shape.construct_signatures.is_empty()
                    && shape.call_signatures.len() == 1
                {
                    let sig = &shape.call_signatures[0];
                    format!(
                        "({}) => {}",
                        self.format_params(&sig.params),
                        self.format(sig.return_type)
                    )
                } else {
                    self.format_members(
                        &shape.properties,
                        &shape.call_signatures,
                        &shape.construct_signatures,
                    )
                }
            }
            Some(TypeData::Tuple(elements)) => {
                let parts: Vec<String> = elements.iter().map(|e| self.format_element(e)).collect();
                format!("[{}]", parts.join(", "))
            }
            None => "error".to_string(),
        }
    }

    fn format_members(
        &self,
        properties: &[PropertyInfo],
        calls: &[CallSignature],
        constructs: &[CallSignature],
    ) -> String {
        let mut parts = Vec::new();
        for sig in calls {
            parts.push(format!(
                "({}): {}",
                self.format_params(&sig.params),
                self.format(sig.return_type)
            ));
        }
        for sig in constructs {
            parts.push(format!(
                "new ({}): {}",
                self.format_params(&sig.params),
                self.format(sig.return_type)
            ));
        }

        // Stable alphabetical order; interned order depends on atom ids.
        let mut sorted: Vec<&PropertyInfo> = properties.iter().collect();
        sorted.sort_by_key(|p| p.name.as_str());
        for prop in sorted {
            parts.push(self.format_property(prop));
        }

        if parts.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", parts.join("; "))
        }
    }

    fn format_property(&self, prop: &PropertyInfo) -> String {
        let name = prop.name.as_str();
        let optional = if prop.optional { "?" } else { "" };
        let readonly = if prop.readonly { "readonly " } else { "" };

        if prop.is_method {
            if let Some(TypeData::Callable(shape)) = self.db.lookup(prop.type_id) {
                if let [sig] = shape.call_signatures.as_slice() {
                    return format!(
                        "{readonly}{name}{optional}({}): {}",
                        self.format_params(&sig.params),
                        self.format(sig.return_type)
                    );
                }
            }
        }
        format!("{readonly}{name}{optional}: {}", self.format(prop.type_id))
    }

    fn format_params(&self, params: &[ParamInfo]) -> String {
        params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let name = param
                    .name
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| format!("arg{i}"));
                let rest = if param.rest { "..." } else { "" };
                let optional = if param.optional { "?" } else { "" };
                format!("{rest}{name}{optional}: {}", self.format(param.type_id))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn format_element(&self, element: &TupleElement) -> String {
        let ty = self.format(element.type_id);
        let rest = if element.rest { "..." } else { "" };
        let optional = if element.optional { "?" } else { "" };
        match element.name {
            Some(name) => format!("{rest}{name}{optional}: {ty}"),
            None if element.optional => format!("{rest}{ty}?"),
            None => format!("{rest}{ty}"),
        }
    }
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
