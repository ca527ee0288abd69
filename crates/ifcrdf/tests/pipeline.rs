//! End-to-end conversion of small models against the fixture schema.

mod common;

use common::*;
use ifcrdf::{convert, ConvertError, ConvertOptions, Converter, StatefulProgressListener, GENERATING_TRIPLES};
use ifcrdf_graph::vocab::{express, list, owl, rdf, xsd};
use ifcrdf_graph::{CollectingSink, Iri, Literal, QueuedSink, Triple, TurtleWriter};
use ifcrdf_schema::{AttributeDescriptor, DescriptorTables, EntityDescriptor, TypeDescriptor};
use ifcrdf_step::StepError;
use std::collections::HashSet;
use std::io::{BufReader, Write};

#[test]
fn test_string_attribute_gets_a_literal_holder() {
    let (graph, report) = run("#1=IFCWALL('Wall-01',$,$,$,$,$,$);");
    let wall = inst("IfcWall_1");

    assert!(graph.has_type(&wall, &ifc("IfcWall")));
    let holder = graph.object_iri(&wall, &ifc("name"));
    assert!(holder.starts_with(&inst("STRING_")));
    assert!(graph.has_type(&holder, express::STRING));
    assert_eq!(
        graph.object_literal(&holder, express::HAS_STRING),
        Literal::new("Wall-01", xsd::STRING)
    );

    assert_eq!(report.map.records_mapped, 1);
    assert_eq!(report.map.record_errors, 0);
    assert_eq!(report.map.triples, 4);
    // ontology header + the four record triples
    assert_eq!(graph.triples().len(), 6);
}

#[test]
fn test_defined_type_range_types_the_holder() {
    let (graph, _) = run("#1=IFCWALL($,'An outer wall',$,$,0.,$,$);");
    let wall = inst("IfcWall_1");

    let description = graph.object_iri(&wall, &ifc("description_IfcRoot"));
    assert!(graph.has_type(&description, &ifc("IfcText")));
    assert_eq!(
        graph.object_literal(&description, express::HAS_STRING).lexical(),
        "An outer wall"
    );

    let height = graph.object_iri(&wall, &ifc("height_IfcWall"));
    assert_eq!(
        graph.object_literal(&height, express::HAS_DOUBLE),
        Literal::new("0.0", xsd::DOUBLE)
    );
    assert!(graph.objects(&wall, &ifc("name")).is_empty());
}

#[test]
fn test_booleans_and_logicals() {
    let (graph, report) = run(
        "#1=IFCWALL('a',$,$,.T.,$,$,.U.);\n\
         #2=IFCWALL('b',$,$,.t.,$,$,.F.);\n\
         #3=IFCWALL('c',$,$,.X.,$,$,$);",
    );

    for id in [1, 2] {
        let wall = inst(&format!("IfcWall_{id}"));
        let holder = graph.object_iri(&wall, &ifc("isExternal_IfcWall"));
        assert!(graph.has_type(&holder, &ifc("IfcBoolean")));
        assert_eq!(
            graph.object_literal(&holder, express::HAS_BOOLEAN),
            Literal::new("true", xsd::BOOLEAN)
        );
    }

    let unknown = graph.object_iri(&inst("IfcWall_1"), &ifc("loadBearing_IfcWall"));
    assert_eq!(graph.object_iri(&unknown, express::HAS_LOGICAL), express::UNKNOWN);
    let false_ = graph.object_iri(&inst("IfcWall_2"), &ifc("loadBearing_IfcWall"));
    assert_eq!(graph.object_iri(&false_, express::HAS_LOGICAL), express::FALSE);

    assert!(graph
        .objects(&inst("IfcWall_3"), &ifc("isExternal_IfcWall"))
        .is_empty());
    assert_eq!(report.map.record_errors, 1);
}

#[test]
fn test_enumeration_values() {
    let (graph, report) = run(
        "#1=IFCWALL('a',$,.SOLIDWALL.,$,$,$,$);\n\
         #2=IFCWALL('b',$,.movable.,$,$,$,$);\n\
         #3=IFCWALL('c',$,.FOO.,$,$,$,$);",
    );
    let property = ifc("predefinedType_IfcWall");

    assert_eq!(graph.object_iri(&inst("IfcWall_1"), &property), ifc("SOLIDWALL"));
    assert_eq!(graph.object_iri(&inst("IfcWall_2"), &property), ifc("MOVABLE"));
    assert!(graph.objects(&inst("IfcWall_3"), &property).is_empty());
    assert_eq!(report.map.record_errors, 1);
    assert_eq!(report.map.records_mapped, 3);
}

#[test]
fn test_type_name_token_types_the_next_value() {
    let (graph, _) = run(
        "#1=IFCWALL('a',$,$,$,$,IFCLABEL('T-1'),$);\n\
         #2=IFCWALL('b',$,$,$,$,IFCLENGTHMEASURE(2.5),.T.);",
    );
    let tag = ifc("tag_IfcWall");

    let label = graph.object_iri(&inst("IfcWall_1"), &tag);
    assert!(graph.has_type(&label, &ifc("IfcLabel")));
    assert_eq!(graph.object_literal(&label, express::HAS_STRING).lexical(), "T-1");

    let length = graph.object_iri(&inst("IfcWall_2"), &tag);
    assert!(graph.has_type(&length, &ifc("IfcLengthMeasure")));
    assert_eq!(
        graph.object_literal(&length, express::HAS_DOUBLE),
        Literal::new("2.5", xsd::DOUBLE)
    );

    // the type token did not shift the following attribute
    let logical = graph.object_iri(&inst("IfcWall_2"), &ifc("loadBearing_IfcWall"));
    assert_eq!(graph.object_iri(&logical, express::HAS_LOGICAL), express::TRUE);
}

#[test]
fn test_references_use_the_referents_iri() {
    let (graph, _) = run(
        "#23=IFCRELAGGREGATES(#20,(#21,#22));\n\
         #20=IFCBUILDING('B');\n\
         #21=IFCSPACE('S1');\n\
         #22=IFCSPACE('S2');",
    );
    let rel = inst("IfcRelAggregates_23");

    let building = graph.object_iri(&rel, &ifc("relatingObject_IfcRelAggregates"));
    assert_eq!(building, inst("IfcBuilding_20"));
    assert!(graph.has_type(&building, &ifc("IfcBuilding")));

    let related: HashSet<String> = graph
        .objects(&rel, &ifc("relatedObjects_IfcRelAggregates"))
        .into_iter()
        .map(|o| o.as_iri().unwrap().as_str().to_string())
        .collect();
    let expected: HashSet<String> = [inst("IfcSpace_21"), inst("IfcSpace_22")].into();
    assert_eq!(related, expected);
    // a set of entities gets no list nodes
    assert_eq!(graph.count_predicate(list::HAS_CONTENTS), 0);
}

#[test]
fn test_duplicate_records_collapse() {
    let data = "#10=IFCCARTESIANPOINT((0.,0.,0.));\n\
                #11=IFCCARTESIANPOINT((0.,0.,0.));\n\
                #12=IFCPOLYLINE((#10,#11));";

    let (graph, report) = run(data);
    assert_eq!(report.duplicates, 1);
    assert_eq!(
        graph.instances_of(&ifc("IfcCartesianPoint")),
        vec![inst("IfcCartesianPoint_10")]
    );
    let head = graph.object_iri(&inst("IfcPolyline_12"), &ifc("points_IfcPolyline"));
    for node in graph.chain(&head) {
        assert_eq!(
            graph.object_iri(&node, list::HAS_CONTENTS),
            inst("IfcCartesianPoint_10")
        );
    }

    let keep = ConvertOptions {
        remove_duplicates: false,
        ..options()
    };
    let (graph, report) = run_with(data, keep).unwrap();
    assert_eq!(report.duplicates, 0);
    assert_eq!(graph.instances_of(&ifc("IfcCartesianPoint")).len(), 2);
    let head = graph.object_iri(&inst("IfcPolyline_12"), &ifc("points_IfcPolyline"));
    let targets: Vec<String> = graph
        .chain(&head)
        .iter()
        .map(|node| graph.object_iri(node, list::HAS_CONTENTS))
        .collect();
    assert_eq!(
        targets,
        vec![inst("IfcCartesianPoint_10"), inst("IfcCartesianPoint_11")]
    );
}

#[test]
fn test_reference_to_merged_record_is_redirected() {
    let (graph, _) = run(
        "#1=IFCBUILDING('B');\n\
         #2=IFCBUILDING('B');\n\
         #3=IFCRELAGGREGATES(#2,(#1));",
    );
    let rel = inst("IfcRelAggregates_3");
    assert_eq!(
        graph.object_iri(&rel, &ifc("relatingObject_IfcRelAggregates")),
        inst("IfcBuilding_1")
    );
    assert_eq!(
        graph.object_iri(&rel, &ifc("relatedObjects_IfcRelAggregates")),
        inst("IfcBuilding_1")
    );
    assert_eq!(graph.instances_of(&ifc("IfcBuilding")).len(), 1);
}

#[test]
fn test_dangling_reference_produces_no_output() {
    let sink = CollectingSink::new();
    let result = convert(
        model("#1=IFCPOLYLINE((#2,#99));\n#2=IFCCARTESIANPOINT((0.,0.));").as_bytes(),
        &tables(),
        &ontology(),
        options(),
        &sink,
    );
    match result {
        Err(ConvertError::Step(StepError::DanglingReference { record, target, .. })) => {
            assert_eq!(record, 1);
            assert_eq!(target, 99);
        }
        other => panic!("expected a dangling reference error, got {other:?}"),
    }
    assert!(sink.is_empty());
    assert!(sink.base_iri().is_none());
    assert!(sink.prefixes().is_empty());
}

#[test]
fn test_record_local_errors_do_not_abort() {
    let (graph, report) = run(
        "#1=IFCWALL('a',$,$,$,$,$,$,'extra');\n\
         #2=IFCFOO('x');\n\
         #3=IFCBUILDING('B');",
    );
    assert!(graph.has_type(&inst("IfcWall_1"), &ifc("IfcWall")));
    assert_eq!(graph.objects(&inst("IfcWall_1"), &ifc("name")).len(), 1);
    assert!(graph.has_type(&inst("IfcBuilding_3"), &ifc("IfcBuilding")));
    assert!(!graph.triples().iter().any(|t| t.subject.as_str().contains("IFCFOO")));

    assert_eq!(report.map.records_mapped, 2);
    assert_eq!(report.map.records_skipped, 1);
    assert_eq!(report.map.record_errors, 2);
}

#[test]
fn test_keyword_naming_entity_and_type_is_typed_as_entity() {
    let tables = DescriptorTables::new(
        [EntityDescriptor::new(
            "IfcWall",
            vec![AttributeDescriptor::new("Name", "name")],
        )],
        [TypeDescriptor::new("IfcWall", "STRING")],
    );
    let sink = CollectingSink::new();
    let report = convert(
        model("#1=IFCWALL('Wall-01');\n#2=IFCWALL('Wall-02');").as_bytes(),
        &tables,
        &ontology(),
        options(),
        &sink,
    )
    .unwrap();
    let graph = Graph(sink.into_triples());

    assert!(graph.has_type(&inst("IfcWall_1"), &ifc("IfcWall")));
    assert!(graph.has_type(&inst("IfcWall_2"), &ifc("IfcWall")));
    assert!(graph.objects(&inst("IfcWall_1"), &ifc("name")).is_empty());
    assert_eq!(graph.count_predicate(express::HAS_STRING), 0);

    assert_eq!(report.map.records_mapped, 0);
    assert_eq!(report.map.records_skipped, 2);
    assert_eq!(report.map.record_errors, 2);
    assert_eq!(report.map.triples, 2);
}

#[test]
fn test_untyped_literal_on_select_range_is_skipped() {
    let (graph, report) = run("#1=IFCWALL($,$,$,$,$,'x',.T.);");
    let wall = inst("IfcWall_1");

    assert!(graph.objects(&wall, &ifc("tag_IfcWall")).is_empty());
    let load_bearing = graph.object_iri(&wall, &ifc("loadBearing_IfcWall"));
    assert_eq!(
        graph.object_iri(&load_bearing, express::HAS_LOGICAL),
        express::TRUE
    );

    assert_eq!(report.map.records_mapped, 1);
    assert_eq!(report.map.record_errors, 1);
}

#[test]
fn test_missing_ontology_class_is_fatal() {
    let tables = DescriptorTables::new(
        [EntityDescriptor::new("IfcGhost", vec![])],
        std::iter::empty::<TypeDescriptor>(),
    );
    let sink = CollectingSink::new();
    let result = convert(
        model("#7=IFCGHOST();").as_bytes(),
        &tables,
        &ontology(),
        options(),
        &sink,
    );
    match result {
        Err(ConvertError::MissingClass { class, record }) => {
            assert_eq!(class, ifc("IfcGhost"));
            assert_eq!(record, 7);
        }
        other => panic!("expected a missing class error, got {other:?}"),
    }
}

#[test]
fn test_preamble() {
    let sink = CollectingSink::new();
    convert(
        model("#3=IFCBUILDING('B');").as_bytes(),
        &tables(),
        &ontology(),
        options(),
        &sink,
    )
    .unwrap();

    assert_eq!(sink.base_iri().as_deref(), Some(BASE));
    let prefixes = sink.prefixes();
    let names: Vec<&str> = prefixes.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(names, ["ifc", "inst", "list", "express", "rdf", "xsd", "owl"]);
    assert_eq!(prefixes[0].1, NS);
    assert_eq!(prefixes[1].1, BASE);

    let triples = sink.into_triples();
    assert_eq!(triples[0], Triple::new(BASE, rdf::TYPE, Iri::new(owl::ONTOLOGY)));
    assert_eq!(
        triples[1],
        Triple::new(BASE, owl::IMPORTS, Iri::new(NS.trim_end_matches('#')))
    );
}

#[test]
fn test_literal_holders_shared_by_content() {
    let data = "#1=IFCWALL('Same',$,$,.T.,$,$,$);\n#2=IFCWALL('Same',$,$,.F.,$,$,$);";

    let (graph, _) = run(data);
    let first = graph.object_iri(&inst("IfcWall_1"), &ifc("name"));
    let second = graph.object_iri(&inst("IfcWall_2"), &ifc("name"));
    assert_ne!(first, second);

    let shared = ConvertOptions {
        dedup_literal_resources: true,
        ..options()
    };
    let (graph, _) = run_with(data, shared).unwrap();
    let first = graph.object_iri(&inst("IfcWall_1"), &ifc("name"));
    let second = graph.object_iri(&inst("IfcWall_2"), &ifc("name"));
    assert_eq!(first, second);
    assert_eq!(graph.objects(&first, rdf::TYPE).len(), 1);
    assert_eq!(graph.objects(&first, express::HAS_STRING).len(), 1);
}

#[test]
fn test_output_is_independent_of_thread_count() {
    let mut data = String::new();
    for i in 1..=60 {
        data.push_str(&format!("#{i}=IFCWALL('W{i}',$,.SOLIDWALL.,.T.,{i}.,$,.U.);\n"));
    }
    for i in 0..20 {
        let id = 100 + i;
        data.push_str(&format!("#{id}=IFCCARTESIANPOINT(({i}.,0.5,1.E-3));\n"));
    }
    data.push_str("#200=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,1.,1.)));\n");

    let single = ConvertOptions {
        threads: Some(1),
        ..options()
    };
    let many = ConvertOptions {
        threads: Some(4),
        ..options()
    };
    let (a, _) = run_with(&data, single).unwrap();
    let (b, _) = run_with(&data, many.clone()).unwrap();
    let (c, _) = run_with(&data, many).unwrap();
    assert_eq!(a.canonical(), b.canonical());
    assert_eq!(b.canonical(), c.canonical());
}

#[test]
fn test_statement_split_over_lines() {
    let (one, _) = run("#1=IFCWALL('Wall-01',$,.SOLIDWALL.,.T.,2.5,$,$);");
    let (split, _) = run("#1=IFCWALL('Wall-01',\n  $,.SOLIDWALL.,\n  .T.,2.5,\n  $,$);");
    assert_eq!(one.canonical(), split.canonical());
}

#[test]
fn test_turtle_through_bounded_queue() {
    let sink = QueuedSink::with_capacity(TurtleWriter::new(Vec::new()), 2).unwrap();
    convert(
        model("#1=IFCWALL('Wall-01',$,$,$,$,$,$);").as_bytes(),
        &tables(),
        &ontology(),
        options(),
        &sink,
    )
    .unwrap();
    let out = String::from_utf8(sink.finish().unwrap().into_inner()).unwrap();

    assert!(out.starts_with("@base <http://ex.org/inst/> .\n@prefix ifc: <"));
    assert!(out.contains("<http://ex.org/inst/> a owl:Ontology .\n"));
    assert!(out.contains("inst:IfcWall_1 a ifc:IfcWall .\n"));
    assert!(out.contains(" express:hasString \"Wall-01\" .\n"));
}

#[test]
fn test_progress_is_reported() {
    let listener = StatefulProgressListener::new();
    let tables = tables();
    let ontology = ontology();
    let options = ConvertOptions {
        threads: Some(1),
        ..options()
    };
    let converter = Converter::new(&tables, &ontology, options).with_listener(&listener);
    let sink = CollectingSink::new();
    converter
        .convert(
            model("#1=IFCBUILDING('A');\n#2=IFCBUILDING('B');\n#3=IFCBUILDING('C');").as_bytes(),
            &sink,
        )
        .unwrap();

    let state = listener.task(GENERATING_TRIPLES).unwrap();
    assert!(state.finished);
    assert_eq!(state.fraction, 1.0);
    assert_eq!(state.message, "generated triples for 3 of 3 entities");
}

#[test]
fn test_convert_files_with_options_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ifcrdf.toml");
    std::fs::write(
        &config,
        format!("base_uri = \"{BASE}\"\nremove_duplicates = false\nthreads = 2\n"),
    )
    .unwrap();
    let input = dir.path().join("model.ifc");
    let mut file = std::fs::File::create(&input).unwrap();
    file.write_all(model("#1=IFCBUILDING('B');\n#2=IFCBUILDING('B');").as_bytes())
        .unwrap();
    drop(file);

    let options = ConvertOptions::load(&config).unwrap();
    let sink = CollectingSink::new();
    let reader = BufReader::new(std::fs::File::open(&input).unwrap());
    let report = convert(reader, &tables(), &ontology(), options, &sink).unwrap();

    assert_eq!(report.duplicates, 0);
    assert_eq!(report.parse.records, 2);
    assert_eq!(report.map.records_mapped, 2);
}
