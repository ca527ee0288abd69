//! Entity records: positional attributes onto named properties.

use super::{Mapper, RecordScope};
use crate::error::Result;
use ifcrdf_graph::Iri;
use ifcrdf_schema::EntityDescriptor;
use ifcrdf_step::{Record, Value};
use tracing::{error, warn};

impl<'a> Mapper<'a> {
    /// Walk the attributes with a pointer into the descriptor's attribute list.
    ///
    /// The pointer advances once per top-level value, `$` and `*` included.
    /// A bare type-name token does not advance it; it types the next value.
    pub(super) fn map_entity(&self, record: &'a Record, entity: &'a EntityDescriptor) -> Result<()> {
        let subject = self.minter.entity(&entity.name, record.id);
        self.type_as(&subject, &self.schema_iri(&entity.name), record.id)?;

        let tables = self.tables;
        let mut scope = RecordScope::new(record, subject);
        let mut index = 0usize;
        for value in &record.attributes {
            match value {
                Value::Literal(token) if token == "$" || token == "*" => {}
                Value::Literal(token) => {
                    if let Some(ty) = tables.type_descriptor(token) {
                        scope.remembrance = Some(ty);
                        continue;
                    }
                    self.attribute_literal(&mut scope, entity, index, token)?;
                }
                Value::String(text) => self.attribute_literal(&mut scope, entity, index, text)?,
                Value::Unresolved(id) | Value::Resolved(id) => {
                    self.attribute_reference(&mut scope, entity, index, *id)?;
                }
                Value::List(items) => self.attribute_list(&mut scope, entity, index, items)?,
            }
            index += 1;
        }
        Ok(())
    }

    /// Destination property and its range for the attribute at `index`.
    fn attribute_property(
        &self,
        scope: &RecordScope<'a>,
        entity: &EntityDescriptor,
        index: usize,
    ) -> Option<(Iri, &'a str)> {
        let Some(attribute) = entity.attribute(index) else {
            error!(
                record = scope.record.id,
                entity = %entity.name,
                index,
                attributes = entity.attributes.len(),
                text = %scope.record,
                "more values than the entity has attributes"
            );
            self.record_error();
            return None;
        };
        let property = self.schema_iri(&attribute.property_name());
        let ontology = self.ontology;
        match ontology.property_range(&property) {
            Some(range) => Some((Iri::new(property), range)),
            None => {
                warn!(
                    record = scope.record.id,
                    attribute = %attribute.name,
                    property = %property,
                    "property has no range in the ontology"
                );
                self.record_error();
                None
            }
        }
    }

    fn attribute_literal(
        &self,
        scope: &mut RecordScope<'a>,
        entity: &EntityDescriptor,
        index: usize,
        token: &str,
    ) -> Result<()> {
        let remembered = scope.remembrance.take();
        let Some((property, range)) = self.attribute_property(scope, entity, index) else {
            return Ok(());
        };
        match remembered {
            Some(ty) => self.remembered_property(scope, &property, ty, token),
            None => self.scalar_property(scope, &property, range, token),
        }
    }

    fn attribute_reference(
        &self,
        scope: &mut RecordScope<'a>,
        entity: &EntityDescriptor,
        index: usize,
        id: u64,
    ) -> Result<()> {
        scope.remembrance = None;
        let Some((property, _)) = self.attribute_property(scope, entity, index) else {
            return Ok(());
        };
        self.reference_property(scope, &property, id)
    }

    fn attribute_list(
        &self,
        scope: &mut RecordScope<'a>,
        entity: &EntityDescriptor,
        index: usize,
        items: &'a [Value],
    ) -> Result<()> {
        let Some((property, range)) = self.attribute_property(scope, entity, index) else {
            scope.remembrance = None;
            return Ok(());
        };
        self.list_property(scope, &property, range, items)
    }

    /// `subject property referent`.
    pub(super) fn reference_property(
        &self,
        scope: &RecordScope<'a>,
        property: &Iri,
        id: u64,
    ) -> Result<()> {
        match self.referent(scope, id) {
            Some(target) => self.emit(&scope.subject, property.clone(), target),
            None => Ok(()),
        }
    }
}
