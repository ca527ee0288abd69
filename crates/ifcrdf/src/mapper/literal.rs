//! Literal values, literal holders and enumeration individuals.

use super::range::{classify, local_name, primitive_of, Primitive, RangeKind};
use super::{Mapper, RecordScope};
use crate::error::Result;
use crate::iri::HelperKey;
use ifcrdf_graph::vocab::{express, rdf, xsd};
use ifcrdf_graph::{Iri, Literal, Term};
use ifcrdf_schema::TypeDescriptor;
use tracing::{error, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Logical {
    True,
    False,
    Unknown,
}

/// `.T.`, `.F.` and `.U.`, case-insensitive, dots optional.
fn parse_logical(token: &str) -> Option<Logical> {
    let symbol = token.trim().trim_matches('.');
    if symbol.eq_ignore_ascii_case("T") {
        Some(Logical::True)
    } else if symbol.eq_ignore_ascii_case("F") {
        Some(Logical::False)
    } else if symbol.eq_ignore_ascii_case("U") {
        Some(Logical::Unknown)
    } else {
        None
    }
}

/// STEP writes reals as `0.` or `1.E-5`; xsd:double needs a digit after the dot.
fn normalize_real(token: &str) -> String {
    let mut real = token.trim().replace(".E", ".0E");
    if real.ends_with('.') {
        real.push('0');
    }
    real
}

impl<'a> Mapper<'a> {
    /// Typed value of a literal token, or `None` (logged) if the token does not fit.
    pub(super) fn typed_value(
        &self,
        scope: &RecordScope<'a>,
        primitive: Primitive,
        token: &str,
    ) -> Option<Term> {
        let term: Term = match primitive {
            Primitive::String => Literal::new(token, xsd::STRING).into(),
            Primitive::Real | Primitive::Number => {
                Literal::new(normalize_real(token), xsd::DOUBLE).into()
            }
            Primitive::Integer => Literal::new(token.trim(), xsd::INTEGER).into(),
            Primitive::Binary => Literal::new(token.replace('"', ""), xsd::HEX_BINARY).into(),
            Primitive::Boolean => match parse_logical(token) {
                Some(Logical::True) => Literal::new("true", xsd::BOOLEAN).into(),
                Some(Logical::False) => Literal::new("false", xsd::BOOLEAN).into(),
                _ => {
                    warn!(record = scope.record.id, token, "not a boolean value");
                    self.record_error();
                    return None;
                }
            },
            Primitive::Logical => match parse_logical(token) {
                Some(Logical::True) => Iri::new(express::TRUE).into(),
                Some(Logical::False) => Iri::new(express::FALSE).into(),
                Some(Logical::Unknown) => Iri::new(express::UNKNOWN).into(),
                None => {
                    warn!(record = scope.record.id, token, "not a logical value");
                    self.record_error();
                    return None;
                }
            },
        };
        Some(term)
    }

    /// Literal-holder resource of `class` carrying one value.
    ///
    /// Without de-duplication the holder is private to `owner`; with it the
    /// holder is shared by everything carrying the same value, and only the
    /// thread that first inserts it emits its type and value.
    pub(super) fn literal_holder(
        &self,
        owner: &Iri,
        property: Option<&Iri>,
        class: &str,
        primitive: Primitive,
        token: &str,
        value: Term,
    ) -> Result<Iri> {
        let value_property = primitive.value_property();
        let content = format!("{value_property}:{}:{token}", primitive.datatype_name());
        let type_name = local_name(class);

        if let Some(holders) = &self.holders {
            let holder = self
                .minter
                .helper(type_name, &HelperKey::new().part(&content));
            if holders.insert(holder.clone()) {
                self.emit(&holder, rdf::TYPE, Iri::new(class))?;
                self.emit(&holder, value_property, value)?;
            }
            return Ok(holder);
        }

        let mut key = HelperKey::new().part(owner.as_str());
        if let Some(property) = property {
            key = key.part(property.as_str());
        }
        let holder = self.minter.helper(type_name, &key.part(&content));
        self.emit(&holder, rdf::TYPE, Iri::new(class))?;
        self.emit(&holder, value_property, value)?;
        Ok(holder)
    }

    /// `subject property holder` for a literal whose range has a primitive encoding.
    pub(super) fn literal_property(
        &self,
        scope: &RecordScope<'a>,
        property: &Iri,
        range: &str,
        token: &str,
    ) -> Result<()> {
        let Some(primitive) = primitive_of(self.ontology, range) else {
            warn!(
                record = scope.record.id,
                property = %property,
                range,
                token,
                "no datatype for the literal's range"
            );
            self.record_error();
            return Ok(());
        };
        let Some(value) = self.typed_value(scope, primitive, token) else {
            return Ok(());
        };
        let holder =
            self.literal_holder(&scope.subject, Some(property), range, primitive, token, value)?;
        trace!(record = scope.record.id, property = %property, "literal property");
        self.emit(&scope.subject, property.clone(), holder)
    }

    /// Individual of an enumeration class whose label matches the token.
    pub(super) fn enum_individual(
        &self,
        scope: &RecordScope<'a>,
        class: &str,
        token: &str,
    ) -> Option<Iri> {
        let label = token.trim().trim_matches('.');
        let found = self
            .ontology
            .individuals(class)
            .iter()
            .find(|individual| individual.label.eq_ignore_ascii_case(label));
        match found {
            Some(individual) => Some(Iri::new(&individual.iri)),
            None => {
                error!(
                    record = scope.record.id,
                    class,
                    token,
                    text = %scope.record,
                    "no enumeration value matches"
                );
                self.record_error();
                None
            }
        }
    }

    pub(super) fn enum_property(
        &self,
        scope: &RecordScope<'a>,
        property: &Iri,
        class: &str,
        token: &str,
    ) -> Result<()> {
        match self.enum_individual(scope, class, token) {
            Some(individual) => self.emit(&scope.subject, property.clone(), individual),
            None => Ok(()),
        }
    }

    /// A single literal against a property range.
    pub(super) fn scalar_property(
        &self,
        scope: &RecordScope<'a>,
        property: &Iri,
        range: &str,
        token: &str,
    ) -> Result<()> {
        match classify(self.ontology, range) {
            RangeKind::Enumeration => self.enum_property(scope, property, range, token),
            RangeKind::Select | RangeKind::Primitive(_) => {
                self.literal_property(scope, property, range, token)
            }
            RangeKind::List => {
                trace!(
                    record = scope.record.id,
                    property = %property,
                    token,
                    "bare literal for a list-valued property"
                );
                Ok(())
            }
            RangeKind::Other => {
                warn!(
                    record = scope.record.id,
                    property = %property,
                    range,
                    token,
                    "literal for a property without a literal encoding"
                );
                self.record_error();
                Ok(())
            }
        }
    }

    /// A literal whose type was named by the preceding token.
    pub(super) fn remembered_property(
        &self,
        scope: &RecordScope<'a>,
        property: &Iri,
        ty: &TypeDescriptor,
        token: &str,
    ) -> Result<()> {
        let class = self.schema_iri(&ty.name);
        if super::range::is_enumeration(self.ontology, &class) {
            self.enum_property(scope, property, &class, token)
        } else {
            self.literal_property(scope, property, &class, token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_logical() {
        assert_eq!(parse_logical(".T."), Some(Logical::True));
        assert_eq!(parse_logical(".t."), Some(Logical::True));
        assert_eq!(parse_logical(".F."), Some(Logical::False));
        assert_eq!(parse_logical(".U."), Some(Logical::Unknown));
        assert_eq!(parse_logical(".FOO."), None);
    }

    #[test]
    fn test_normalize_real() {
        assert_eq!(normalize_real("0."), "0.0");
        assert_eq!(normalize_real("1.E-5"), "1.0E-5");
        assert_eq!(normalize_real("2.5"), "2.5");
        assert_eq!(normalize_real("-3."), "-3.0");
    }
}
