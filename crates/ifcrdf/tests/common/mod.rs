//! Shared schema fixture and graph helpers for the pipeline tests.

// Each test crate uses a different subset of the helpers.
#![allow(dead_code)]

use ifcrdf::{convert, ConvertError, ConvertOptions, ConvertReport};
use ifcrdf_graph::vocab::{express, list, rdf};
use ifcrdf_graph::{CollectingSink, Literal, Term, Triple};
use ifcrdf_schema::{
    AttributeDescriptor, DescriptorTables, EntityDescriptor, Ontology, TypeDescriptor,
};

pub const NS: &str = "http://standards.buildingsmart.org/IFC/DEV/IFC4/ADD1/OWL#";
pub const BASE: &str = "http://ex.org/inst/";

pub fn ifc(local: &str) -> String {
    format!("{NS}{local}")
}

pub fn inst(local: &str) -> String {
    format!("{BASE}{local}")
}

fn attr(name: &str, property: &str) -> AttributeDescriptor {
    AttributeDescriptor::new(name, property)
}

pub fn tables() -> DescriptorTables {
    let entities = vec![
        EntityDescriptor::new(
            "IfcWall",
            vec![
                attr("Name", "name"),
                attr("Description", "description_IfcRoot"),
                attr("PredefinedType", "predefinedType_IfcWall"),
                attr("IsExternal", "isExternal_IfcWall"),
                attr("Height", "height_IfcWall"),
                attr("Tag", "tag_IfcWall"),
                attr("LoadBearing", "loadBearing_IfcWall"),
            ],
        ),
        EntityDescriptor::new("IfcBuilding", vec![attr("Name", "name")]),
        EntityDescriptor::new("IfcSpace", vec![attr("Name", "name")]),
        EntityDescriptor::new(
            "IfcRelAggregates",
            vec![
                attr("RelatingObject", "relatingObject_IfcRelAggregates"),
                attr("RelatedObjects", "relatedObjects_IfcRelAggregates"),
            ],
        ),
        EntityDescriptor::new(
            "IfcCartesianPoint",
            vec![attr("Coordinates", "coordinates_IfcCartesianPoint")],
        ),
        EntityDescriptor::new("IfcPolyline", vec![attr("Points", "points_IfcPolyline")]),
        EntityDescriptor::new(
            "IfcCartesianPointList3D",
            vec![attr("CoordList", "coordList_IfcCartesianPointList3D")],
        ),
        EntityDescriptor::new(
            "IfcIndexedPolyCurve",
            vec![attr("Segments", "segments_IfcIndexedPolyCurve")],
        ),
    ];
    let types = vec![
        TypeDescriptor::new("IfcLabel", "STRING"),
        TypeDescriptor::new("IfcText", "STRING"),
        TypeDescriptor::new("IfcLengthMeasure", "REAL"),
        TypeDescriptor::new("IfcBoolean", "BOOLEAN"),
        TypeDescriptor::new("IfcLogical", "LOGICAL"),
        TypeDescriptor::new("IfcPositiveInteger", "IfcInteger"),
        TypeDescriptor::new("IfcWallTypeEnum", "ENUMERATION OF (SOLIDWALL,MOVABLE,NOTDEFINED)"),
        TypeDescriptor::new("IfcValue", "SELECT (IfcLabel, IfcLengthMeasure)"),
        TypeDescriptor::new("IfcSegmentIndexSelect", "SELECT (IfcArcIndex, IfcLineIndex)"),
        TypeDescriptor::new("IfcLineIndex", "LIST [2:?] OF IfcPositiveInteger;"),
        TypeDescriptor::new("IfcArcIndex", "LIST [3:3] OF IfcPositiveInteger;"),
    ];
    DescriptorTables::new(entities, types)
}

pub fn ontology() -> Ontology {
    let mut ont = Ontology::with_express_vocabulary(NS);
    let root = std::iter::empty::<String>();

    ont.add_class(ifc("IfcObjectDefinition"), root.clone());
    for entity in ["IfcWall", "IfcBuilding", "IfcSpace"] {
        ont.add_class(ifc(entity), [ifc("IfcObjectDefinition")]);
    }
    for entity in [
        "IfcRelAggregates",
        "IfcCartesianPoint",
        "IfcPolyline",
        "IfcCartesianPointList3D",
        "IfcIndexedPolyCurve",
    ] {
        ont.add_class(ifc(entity), root.clone());
    }

    ont.add_class(ifc("IfcText"), [express::STRING]);
    ont.add_class(ifc("IfcLabel"), [express::STRING]);
    ont.add_class(ifc("IfcLengthMeasure"), [express::REAL]);
    ont.add_class(ifc("IfcBoolean"), [express::BOOLEAN]);
    ont.add_class(ifc("IfcLogical"), [express::LOGICAL]);
    ont.add_class(ifc("IfcInteger"), [express::INTEGER]);
    ont.add_class(ifc("IfcPositiveInteger"), [ifc("IfcInteger")]);
    ont.add_class(ifc("IfcValue"), [express::SELECT]);
    ont.add_class(ifc("IfcSegmentIndexSelect"), [express::SELECT]);
    ont.add_class(ifc("IfcWallTypeEnum"), [express::ENUMERATION]);
    for value in ["SOLIDWALL", "MOVABLE", "NOTDEFINED"] {
        ont.add_individual(ifc("IfcWallTypeEnum"), ifc(value), value);
    }

    for wrapper in [
        "IfcLengthMeasure_List",
        "IfcLengthMeasure_List_List",
        "IfcCartesianPoint_List",
        "IfcPositiveInteger_List",
        "IfcSegmentIndexSelect_List",
    ] {
        ont.add_class(ifc(wrapper), [list::OWL_LIST]);
    }
    ont.add_class(ifc("IfcLineIndex"), [ifc("IfcPositiveInteger_List")]);
    ont.add_class(ifc("IfcArcIndex"), [ifc("IfcPositiveInteger_List")]);

    let properties = [
        ("name", express::STRING.to_string()),
        ("description_IfcRoot", ifc("IfcText")),
        ("predefinedType_IfcWall", ifc("IfcWallTypeEnum")),
        ("isExternal_IfcWall", ifc("IfcBoolean")),
        ("height_IfcWall", ifc("IfcLengthMeasure")),
        ("tag_IfcWall", ifc("IfcValue")),
        ("loadBearing_IfcWall", ifc("IfcLogical")),
        ("relatingObject_IfcRelAggregates", ifc("IfcObjectDefinition")),
        ("relatedObjects_IfcRelAggregates", ifc("IfcObjectDefinition")),
        ("coordinates_IfcCartesianPoint", ifc("IfcLengthMeasure_List")),
        ("points_IfcPolyline", ifc("IfcCartesianPoint_List")),
        ("coordList_IfcCartesianPointList3D", ifc("IfcLengthMeasure_List_List")),
        ("segments_IfcIndexedPolyCurve", ifc("IfcSegmentIndexSelect_List")),
    ];
    for (property, range) in properties {
        ont.add_property(ifc(property), range);
    }
    ont
}

pub fn options() -> ConvertOptions {
    ConvertOptions::with_base_uri(BASE)
}

/// Wrap data statements in a minimal STEP file.
pub fn model(data: &str) -> String {
    format!(
        "ISO-10303-21;\nHEADER;\nFILE_DESCRIPTION((''),'2;1');\nFILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\n{data}\nENDSEC;\nEND-ISO-10303-21;\n"
    )
}

/// Convert `data` into memory with the fixture schema.
pub fn run_with(data: &str, options: ConvertOptions) -> Result<(Graph, ConvertReport), ConvertError> {
    let sink = CollectingSink::new();
    let report = convert(model(data).as_bytes(), &tables(), &ontology(), options, &sink)?;
    Ok((Graph(sink.into_triples()), report))
}

pub fn run(data: &str) -> (Graph, ConvertReport) {
    run_with(data, options()).unwrap()
}

/// Query helpers over collected triples.
pub struct Graph(pub Vec<Triple>);

impl Graph {
    pub fn triples(&self) -> &[Triple] {
        &self.0
    }

    pub fn objects(&self, subject: &str, predicate: &str) -> Vec<&Term> {
        self.0
            .iter()
            .filter(|t| t.subject.as_str() == subject && t.predicate.as_str() == predicate)
            .map(|t| &t.object)
            .collect()
    }

    /// The single IRI object of `(subject, predicate)`.
    pub fn object_iri(&self, subject: &str, predicate: &str) -> String {
        let objects = self.objects(subject, predicate);
        assert_eq!(objects.len(), 1, "expected one object for {subject} {predicate}");
        objects[0].as_iri().expect("IRI object").as_str().to_string()
    }

    /// The single literal object of `(subject, predicate)`.
    pub fn object_literal(&self, subject: &str, predicate: &str) -> Literal {
        let objects = self.objects(subject, predicate);
        assert_eq!(objects.len(), 1, "expected one object for {subject} {predicate}");
        objects[0].as_literal().expect("literal object").clone()
    }

    pub fn has_type(&self, subject: &str, class: &str) -> bool {
        self.0.iter().any(|t| {
            t.subject.as_str() == subject
                && t.predicate.as_str() == rdf::TYPE
                && t.object.as_iri().map(|o| o.as_str()) == Some(class)
        })
    }

    pub fn instances_of(&self, class: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|t| {
                t.predicate.as_str() == rdf::TYPE
                    && t.object.as_iri().map(|o| o.as_str()) == Some(class)
            })
            .map(|t| t.subject.as_str().to_string())
            .collect()
    }

    pub fn count_predicate(&self, predicate: &str) -> usize {
        self.0
            .iter()
            .filter(|t| t.predicate.as_str() == predicate)
            .count()
    }

    /// Walk a `hasNext` chain from `head`, returning every node in order.
    pub fn chain(&self, head: &str) -> Vec<String> {
        let mut nodes = vec![head.to_string()];
        loop {
            let next = self.objects(nodes.last().map(String::as_str).unwrap_or(head), list::HAS_NEXT);
            match next.as_slice() {
                [] => return nodes,
                [next] => nodes.push(next.as_iri().expect("IRI node").as_str().to_string()),
                _ => panic!("node with more than one hasNext"),
            }
        }
    }

    /// Sorted N-Triples-like lines, for order-independent comparison.
    pub fn canonical(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .0
            .iter()
            .map(|t| format!("{} {} {:?}", t.subject, t.predicate, t.object))
            .collect();
        lines.sort();
        lines
    }
}
