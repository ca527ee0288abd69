//! Aggregate values: `hasContents`/`hasNext` chains.
//!
//! An ordered list becomes a chain of helper nodes typed with the list
//! wrapper class. The property points at the first node, every node points
//! at its element with `hasContents` and at the following node with
//! `hasNext`. Sets of entities skip the chain and link each element
//! directly. A list of lists becomes a chain whose elements are the heads
//! of the inner chains. Deeper nesting is reported, not encoded.

use super::range::{is_list, list_content_type, list_element_name, local_name, classify, RangeKind};
use super::{Mapper, RecordScope};
use crate::error::Result;
use crate::iri::HelperKey;
use ifcrdf_graph::vocab::{list, rdf};
use ifcrdf_graph::Iri;
use ifcrdf_schema::TypeDescriptor;
use ifcrdf_step::Value;
use tracing::{error, trace, warn};

fn is_marker(token: &str) -> bool {
    token == "$" || token == "*"
}

/// Literal tokens of a list, markers dropped.
fn literal_tokens(items: &[Value]) -> Vec<&str> {
    items
        .iter()
        .filter_map(Value::as_literal)
        .filter(|token| !is_marker(token))
        .collect()
}

impl<'a> Mapper<'a> {
    /// Encode a parenthesized value of an attribute.
    pub(super) fn list_property(
        &self,
        scope: &mut RecordScope<'a>,
        property: &Iri,
        range: &str,
        items: &'a [Value],
    ) -> Result<()> {
        let tables = self.tables;
        let mut literals: Vec<&'a str> = Vec::new();
        let mut heads: Vec<Iri> = Vec::new();

        for (position, item) in items.iter().enumerate() {
            match item {
                Value::Literal(token) if is_marker(token) => {}
                Value::Literal(token) => match tables.type_descriptor(token) {
                    Some(ty) => remember(scope, ty),
                    None => literals.push(token),
                },
                Value::String(text) => literals.push(text),
                Value::Unresolved(id) | Value::Resolved(id) => {
                    if is_list(self.ontology, range) {
                        self.reference_chain(scope, property, range, items)?;
                        scope.remembrance = None;
                        return Ok(());
                    }
                    self.reference_property(scope, property, *id)?;
                }
                Value::List(inner) => match scope.remembrance {
                    Some(ty) => {
                        self.typed_inner_list(scope, property, ty, position, inner, &mut literals, &mut heads)?;
                    }
                    None => {
                        if let Some(head) = self.inner_list(scope, property, range, position, inner)? {
                            heads.push(head);
                        }
                    }
                },
            }
        }

        if !literals.is_empty() {
            match scope.remembrance {
                Some(ty) if is_list(self.ontology, range) => {
                    let class = self.schema_iri(&ty.name);
                    self.literal_chain(scope, property, range, Some(class), &literals)?;
                }
                Some(ty) => {
                    if literals.len() > 1 {
                        warn!(
                            record = scope.record.id,
                            property = %property,
                            values = literals.len(),
                            "only the first typed value is kept"
                        );
                    }
                    self.remembered_property(scope, property, ty, literals[0])?;
                }
                None if is_list(self.ontology, range) => {
                    self.literal_chain(scope, property, range, None, &literals)?;
                }
                None => {
                    for token in &literals {
                        self.scalar_property(scope, property, range, token)?;
                    }
                }
            }
        }

        if !heads.is_empty() {
            self.head_chain(scope, property, range, &heads)?;
        }
        scope.remembrance = None;
        Ok(())
    }

    /// Mint and type `count` nodes of `class`. A given `head` is node 0 and
    /// is typed by the caller.
    pub(super) fn list_nodes(
        &self,
        head: Option<&Iri>,
        class: &str,
        count: usize,
        key: impl Fn(usize) -> HelperKey,
    ) -> Result<Vec<Iri>> {
        let type_name = local_name(class);
        let mut nodes = Vec::with_capacity(count);
        for i in 0..count {
            let node = match head {
                Some(head) if i == 0 => head.clone(),
                _ => {
                    let node = self.minter.helper(type_name, &key(i));
                    self.emit(&node, rdf::TYPE, Iri::new(class))?;
                    node
                }
            };
            nodes.push(node);
        }
        Ok(nodes)
    }

    fn link_nodes(&self, nodes: &[Iri]) -> Result<()> {
        for pair in nodes.windows(2) {
            self.emit(&pair[0], list::HAS_NEXT, pair[1].clone())?;
        }
        Ok(())
    }

    /// `hasContents` from each node to the element encoded from its token, then `hasNext`.
    pub(super) fn fill_literal_nodes(
        &self,
        scope: &RecordScope<'a>,
        nodes: &[Iri],
        content: &str,
        tokens: &[&str],
    ) -> Result<()> {
        let kind = classify(self.ontology, content);
        for (node, token) in nodes.iter().zip(tokens) {
            let element = match kind {
                RangeKind::Enumeration => self.enum_individual(scope, content, token),
                RangeKind::Primitive(primitive) => {
                    match self.typed_value(scope, primitive, token) {
                        Some(value) => {
                            Some(self.literal_holder(node, None, content, primitive, token, value)?)
                        }
                        None => None,
                    }
                }
                _ => {
                    warn!(
                        record = scope.record.id,
                        content,
                        token,
                        "list element class has no literal encoding"
                    );
                    self.record_error();
                    None
                }
            };
            if let Some(element) = element {
                self.emit(node, list::HAS_CONTENTS, element)?;
            }
        }
        self.link_nodes(nodes)
    }

    fn fill_reference_nodes(&self, scope: &RecordScope<'a>, nodes: &[Iri], ids: &[u64]) -> Result<()> {
        for (node, id) in nodes.iter().zip(ids) {
            if let Some(target) = self.referent(scope, *id) {
                self.emit(node, list::HAS_CONTENTS, target)?;
            }
        }
        self.link_nodes(nodes)
    }

    /// Ordered list of entities under a list-wrapper range.
    fn reference_chain(
        &self,
        scope: &RecordScope<'a>,
        property: &Iri,
        range: &str,
        items: &[Value],
    ) -> Result<()> {
        let local = local_name(range);
        let element = list_element_name(local).unwrap_or(local);
        if is_list(self.ontology, &self.schema_iri(element)) {
            error!(
                record = scope.record.id,
                property = %property,
                range,
                "list of lists of entities is not supported"
            );
            self.record_error();
            return Ok(());
        }
        let ids: Vec<u64> = items.iter().filter_map(Value::as_reference).collect();
        let subject = &scope.subject;
        let nodes = self.list_nodes(None, range, ids.len(), |i| {
            HelperKey::new()
                .part(subject.as_str())
                .part(property.as_str())
                .part(i)
        })?;
        if let Some(first) = nodes.first() {
            self.emit(subject, property.clone(), first.clone())?;
        }
        self.fill_reference_nodes(scope, &nodes, &ids)
    }

    /// Ordered list of literals under a list-wrapper range.
    fn literal_chain(
        &self,
        scope: &RecordScope<'a>,
        property: &Iri,
        range: &str,
        element_class: Option<String>,
        tokens: &[&str],
    ) -> Result<()> {
        let content = match element_class.or_else(|| list_content_type(self.ontology, range)) {
            Some(content) => content,
            None => {
                self.record_error();
                return Ok(());
            }
        };
        let subject = &scope.subject;
        let nodes = self.list_nodes(None, range, tokens.len(), |i| {
            HelperKey::new()
                .part(subject.as_str())
                .part(property.as_str())
                .part(&content)
                .part(tokens[i])
                .part(i)
        })?;
        if let Some(first) = nodes.first() {
            self.emit(subject, property.clone(), first.clone())?;
        }
        self.fill_literal_nodes(scope, &nodes, &content, tokens)
    }

    /// Chain over the heads of inner lists.
    fn head_chain(
        &self,
        scope: &RecordScope<'a>,
        property: &Iri,
        range: &str,
        heads: &[Iri],
    ) -> Result<()> {
        let subject = &scope.subject;
        let nodes = self.list_nodes(None, range, heads.len(), |i| {
            HelperKey::new()
                .part(subject.as_str())
                .part(property.as_str())
                .part(heads[i].as_str())
                .part(i)
        })?;
        if let Some(first) = nodes.first() {
            self.emit(subject, property.clone(), first.clone())?;
        }
        for (node, head) in nodes.iter().zip(heads) {
            self.emit(node, list::HAS_CONTENTS, head.clone())?;
        }
        self.link_nodes(&nodes)
    }

    /// Inner list of a list of lists, e.g. one row of a coordinate list.
    /// Returns the head of its chain.
    fn inner_list(
        &self,
        scope: &RecordScope<'a>,
        property: &Iri,
        range: &str,
        position: usize,
        items: &[Value],
    ) -> Result<Option<Iri>> {
        let mut tokens: Vec<&str> = Vec::new();
        let mut ids: Vec<u64> = Vec::new();
        let mut deeper = 0usize;
        for item in items {
            match item {
                Value::Literal(token) | Value::String(token) if !is_marker(token) => tokens.push(token),
                Value::Literal(_) | Value::String(_) => {}
                Value::Unresolved(id) | Value::Resolved(id) => ids.push(*id),
                Value::List(_) => deeper += 1,
            }
        }
        if deeper > 0 {
            error!(
                record = scope.record.id,
                property = %property,
                lists = deeper,
                text = %scope.record,
                "cannot handle a third level of list nesting"
            );
            self.record_error();
        }
        if tokens.is_empty() && ids.is_empty() {
            return Ok(None);
        }

        let element = if is_list(self.ontology, range) {
            list_element_name(local_name(range))
        } else {
            None
        };
        let Some(element) = element else {
            error!(
                record = scope.record.id,
                property = %property,
                range,
                "nested list for a property that is not a list of lists"
            );
            self.record_error();
            return Ok(None);
        };

        let class = self.schema_iri(element);
        let head = self.minter.helper(
            element,
            &HelperKey::new()
                .part(scope.subject.as_str())
                .part(property.as_str())
                .part(position),
        );
        self.emit(&head, rdf::TYPE, Iri::new(&class))?;
        let key = |i: usize| HelperKey::new().part(head.as_str()).part(i);

        if !ids.is_empty() {
            let nodes = self.list_nodes(Some(&head), &class, ids.len(), key)?;
            self.fill_reference_nodes(scope, &nodes, &ids)?;
        } else {
            let Some(content) = list_content_type(self.ontology, &class) else {
                self.record_error();
                return Ok(Some(head));
            };
            let nodes = self.list_nodes(Some(&head), &class, tokens.len(), key)?;
            self.fill_literal_nodes(scope, &nodes, &content, &tokens)?;
        }
        Ok(Some(head))
    }

    /// Inner list following a type-name token, e.g. `IFCLINEINDEX((1,2))`.
    ///
    /// Plain values go to the outer literal buffer. A further nested list is
    /// the typed value itself and becomes its own chain, typed with the
    /// remembered type.
    #[allow(clippy::too_many_arguments)]
    fn typed_inner_list(
        &self,
        scope: &mut RecordScope<'a>,
        property: &Iri,
        ty: &'a TypeDescriptor,
        position: usize,
        items: &'a [Value],
        literals: &mut Vec<&'a str>,
        heads: &mut Vec<Iri>,
    ) -> Result<()> {
        let mut consumed = false;
        for (inner, item) in items.iter().enumerate() {
            match item {
                Value::Literal(token) | Value::String(token) if !is_marker(token) => literals.push(token),
                Value::Literal(_) | Value::String(_) => {}
                Value::List(values) => {
                    let class = self.schema_iri(&ty.name);
                    let head = self.minter.helper(
                        &ty.name,
                        &HelperKey::new()
                            .part(scope.subject.as_str())
                            .part(property.as_str())
                            .part(position)
                            .part(inner),
                    );
                    self.emit(&head, rdf::TYPE, Iri::new(&class))?;
                    let tokens = literal_tokens(values);
                    let content = self.schema_iri(ty.content_type());
                    let nodes = self.list_nodes(Some(&head), &class, tokens.len(), |i| {
                        HelperKey::new().part(head.as_str()).part(i)
                    })?;
                    self.fill_literal_nodes(scope, &nodes, &content, &tokens)?;
                    trace!(record = scope.record.id, list = %head, "typed inner list");
                    heads.push(head);
                    consumed = true;
                }
                Value::Unresolved(id) | Value::Resolved(id) => {
                    warn!(
                        record = scope.record.id,
                        property = %property,
                        target = id,
                        "reference inside a typed value is ignored"
                    );
                    self.record_error();
                }
            }
        }
        if consumed {
            scope.remembrance = None;
        }
        Ok(())
    }
}

/// Set the remembered type, noting when a list mixes types.
fn remember<'a>(scope: &mut RecordScope<'a>, ty: &'a TypeDescriptor) {
    if let Some(current) = scope.remembrance {
        if current.name != ty.name {
            warn!(
                record = scope.record.id,
                current = %current.name,
                next = %ty.name,
                "list mixes typed values, using the latest type"
            );
        }
    }
    scope.remembrance = Some(ty);
}
