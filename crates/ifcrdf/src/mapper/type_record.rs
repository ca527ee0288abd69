//! Type records: a defined type instantiated as its own record.

use super::range::{classify, is_list, list_content_type, RangeKind};
use super::{Mapper, RecordScope};
use crate::error::Result;
use crate::iri::HelperKey;
use ifcrdf_graph::vocab::owl;
use ifcrdf_schema::TypeDescriptor;
use ifcrdf_step::{Record, Value};
use tracing::warn;

impl<'a> Mapper<'a> {
    pub(super) fn map_type_record(&self, record: &'a Record, ty: &'a TypeDescriptor) -> Result<()> {
        let subject = self.minter.entity(&ty.name, record.id);
        let class = self.schema_iri(&ty.name);
        self.type_as(&subject, &class, record.id)?;
        let scope = RecordScope::new(record, subject);

        let value = record
            .attributes
            .iter()
            .find(|v| !v.is_null() && !v.is_derived());
        match value {
            None => Ok(()),
            Some(Value::Literal(token)) | Some(Value::String(token)) => {
                self.type_literal(&scope, &class, token)
            }
            Some(Value::List(items)) => self.type_list(&scope, ty, items),
            Some(Value::Unresolved(_)) | Some(Value::Resolved(_)) => {
                warn!(
                    record = record.id,
                    text = %record,
                    "reference as the value of a type record is not supported"
                );
                self.record_error();
                Ok(())
            }
        }
    }

    /// Enumerations become `owl:sameAs` the individual; primitives carry the value directly.
    fn type_literal(&self, scope: &RecordScope<'a>, class: &str, token: &str) -> Result<()> {
        match classify(self.ontology, class) {
            RangeKind::Enumeration => match self.enum_individual(scope, class, token) {
                Some(individual) => self.emit(&scope.subject, owl::SAME_AS, individual),
                None => Ok(()),
            },
            RangeKind::Primitive(primitive) => match self.typed_value(scope, primitive, token) {
                Some(value) => self.emit(&scope.subject, primitive.value_property(), value),
                None => Ok(()),
            },
            _ => {
                warn!(
                    record = scope.record.id,
                    class,
                    token,
                    "type has no literal encoding"
                );
                self.record_error();
                Ok(())
            }
        }
    }

    /// The record's resource heads its own `hasContents`/`hasNext` chain.
    fn type_list(&self, scope: &RecordScope<'a>, ty: &TypeDescriptor, items: &[Value]) -> Result<()> {
        let Some(list_class) = ty.list_class_name() else {
            warn!(
                record = scope.record.id,
                ty = %ty.name,
                "list value for a type that is not an aggregate"
            );
            self.record_error();
            return Ok(());
        };
        let range = self.schema_iri(&list_class);
        let content = if is_list(self.ontology, &range) {
            list_content_type(self.ontology, &range)
        } else {
            None
        }
        .unwrap_or_else(|| self.schema_iri(ty.content_type()));

        let tokens: Vec<&str> = items
            .iter()
            .filter(|v| !v.is_null() && !v.is_derived())
            .filter_map(Value::as_literal)
            .collect();
        let subject = &scope.subject;
        let nodes = self.list_nodes(Some(subject), &range, tokens.len(), |i| {
            HelperKey::new().part(subject.as_str()).part(i)
        })?;
        self.fill_literal_nodes(scope, &nodes, &content, &tokens)
    }
}
