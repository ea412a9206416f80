use crate::app::FieldSpec;
use crate::error::RegistryError;
use ahash::AHashMap;
use itertools::Itertools;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Orders an operation's input fields so that every field comes after the fields
/// it depends on.
///
/// Declaration order is kept wherever dependencies do not force otherwise. Unknown
/// dependencies and cycles are rejected.
pub(super) struct DependencyGraph<'a> {
    operation_key: &'a str,
    fields: &'a [FieldSpec],
    index: AHashMap<&'a str, usize>,
}

impl<'a> DependencyGraph<'a> {
    pub(super) fn new(operation_key: &'a str, fields: &'a [FieldSpec]) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.key.as_str(), i))
            .collect();
        Self {
            operation_key,
            fields,
            index,
        }
    }

    /// Returns the field keys in dependency order.
    pub(super) fn order(&self) -> Result<Vec<String>, RegistryError> {
        self.check_dependencies_exist()?;

        let mut marks: AHashMap<usize, Mark> = AHashMap::new();
        let mut order = Vec::with_capacity(self.fields.len());
        let mut path = Vec::new();
        for i in 0..self.fields.len() {
            self.visit(i, &mut marks, &mut path, &mut order)?;
        }
        Ok(order)
    }

    fn check_dependencies_exist(&self) -> Result<(), RegistryError> {
        for field in self.fields {
            if let Some(missing) = field
                .depends_on
                .iter()
                .find(|d| !self.index.contains_key(d.as_str()))
            {
                return Err(RegistryError::UnknownDependency {
                    operation_key: self.operation_key.to_string(),
                    field_key: field.key.clone(),
                    dependency: missing.clone(),
                });
            }
        }
        Ok(())
    }

    fn visit(
        &self,
        i: usize,
        marks: &mut AHashMap<usize, Mark>,
        path: &mut Vec<usize>,
        order: &mut Vec<String>,
    ) -> Result<(), RegistryError> {
        match marks.get(&i) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => return Err(self.cycle_error(path, i)),
            None => {}
        }

        marks.insert(i, Mark::Visiting);
        path.push(i);

        for dep in self.fields[i].depends_on.iter().unique() {
            self.visit(self.index[dep.as_str()], marks, path, order)?;
        }

        path.pop();
        marks.insert(i, Mark::Done);
        order.push(self.fields[i].key.clone());
        Ok(())
    }

    fn cycle_error(&self, path: &[usize], repeated: usize) -> RegistryError {
        let start = path.iter().position(|&p| p == repeated).unwrap_or(0);
        let cycle = path[start..]
            .iter()
            .chain(std::iter::once(&repeated))
            .map(|&p| self.fields[p].key.as_str())
            .join(" -> ");
        RegistryError::DependencyCycle {
            operation_key: self.operation_key.to_string(),
            path: cycle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_come_first_and_declaration_order_is_kept() {
        let fields = vec![
            FieldSpec::new("assignee_id", "Assignee").depends_on("project_id"),
            FieldSpec::new("title", "Title"),
            FieldSpec::new("project_id", "Project"),
        ];
        let order = DependencyGraph::new("create_task", &fields).order().unwrap();
        assert_eq!(order, vec!["project_id", "assignee_id", "title"]);
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let fields = vec![FieldSpec::new("a", "A").depends_on("a")];
        let err = DependencyGraph::new("op", &fields).order().unwrap_err();
        assert_eq!(
            err,
            RegistryError::DependencyCycle {
                operation_key: "op".into(),
                path: "a -> a".into()
            }
        );
    }
}
