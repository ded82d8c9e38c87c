use heredity_core::{parse_and_build, Evidence, InferenceError, PedigreeGraph, MAX_INDIVIDUALS};
use heredity_frontend::PersonRecord;
use heredity_tests::{FAMILY0, FAMILY1};

#[test]
fn builds_family1_graph() {
    let graph = parse_and_build(FAMILY1).expect("build");
    assert_eq!(graph.len(), 6);

    let molly = graph.id_of("Molly").unwrap();
    let arthur = graph.id_of("Arthur").unwrap();
    for child in ["Charlie", "Fred", "Ginny", "Ron"] {
        let id = graph.id_of(child).unwrap();
        let parents = graph.parents(id).expect("child has parents");
        assert_eq!(parents.mother, molly);
        assert_eq!(parents.father, arthur);
    }
    let roots: Vec<_> = graph
        .roots()
        .map(|id| graph.person(id).unwrap().name.to_string())
        .collect();
    assert_eq!(roots, ["Arthur", "Molly"]);
}

#[test]
fn evidence_reflects_file_observations() {
    let graph = parse_and_build(FAMILY0).expect("build");
    let evidence = Evidence::from_pedigree(&graph);
    assert_eq!(evidence.len(), 2);
    assert_eq!(evidence.get(graph.id_of("James").unwrap()), Some(true));
    assert_eq!(evidence.get(graph.id_of("Lily").unwrap()), Some(false));
    assert_eq!(evidence.get(graph.id_of("Harry").unwrap()), None);
}

#[test]
fn evidence_edits_require_known_names() {
    let graph = parse_and_build(FAMILY0).expect("build");
    let mut evidence = Evidence::from_pedigree(&graph);
    evidence.forget(&graph, "James").unwrap();
    assert_eq!(evidence.len(), 1);
    assert!(matches!(
        evidence.observe(&graph, "Hermione", true),
        Err(InferenceError::UnknownIndividual(name)) if name == "Hermione"
    ));
}

#[test]
fn single_parent_is_malformed() {
    let err = parse_and_build("name,mother,father,trait\nHarry,Lily,,\nLily,,,\n").unwrap_err();
    match err {
        InferenceError::MalformedPedigree { person, reason } => {
            assert_eq!(person, "Harry");
            assert!(reason.contains("line 2"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn oversized_pedigree_is_rejected() {
    let records: Vec<_> = (0..=MAX_INDIVIDUALS)
        .map(|i| PersonRecord::new(format!("p{i}")))
        .collect();
    assert!(matches!(
        PedigreeGraph::from_records(&records),
        Err(InferenceError::PedigreeTooLarge { count, max })
            if count == MAX_INDIVIDUALS + 1 && max == MAX_INDIVIDUALS
    ));
    assert!(PedigreeGraph::from_records(&records[..MAX_INDIVIDUALS]).is_ok());
}
