use heredity_frontend::{parse_pedigree, validate_pedigree, FrontendError, TraitObservation};
use heredity_tests::{FAMILY0, FAMILY1};

#[test]
fn parses_family0() {
    let ast = parse_pedigree(FAMILY0).expect("parse family0");
    assert_eq!(ast.records.len(), 3);

    let harry = &ast.records[0];
    assert_eq!(harry.name, "Harry");
    assert_eq!(harry.mother.as_deref(), Some("Lily"));
    assert_eq!(harry.father.as_deref(), Some("James"));
    assert_eq!(harry.trait_observation(), Some(TraitObservation::Unknown));
    assert_eq!(harry.line, Some(2));

    assert_eq!(
        ast.records[1].trait_observation(),
        Some(TraitObservation::Present)
    );
    assert_eq!(
        ast.records[2].trait_observation(),
        Some(TraitObservation::Absent)
    );
    validate_pedigree(&ast).expect("family0 is valid");
}

#[test]
fn parses_family1() {
    let ast = parse_pedigree(FAMILY1).expect("parse family1");
    let names: Vec<_> = ast.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Arthur", "Charlie", "Fred", "Ginny", "Molly", "Ron"]);
    let children = ast.records.iter().filter(|r| r.mother.is_some()).count();
    assert_eq!(children, 4);
    validate_pedigree(&ast).expect("family1 is valid");
}

#[test]
fn accepts_crlf_and_alternate_trait_literals() {
    let src = "Name,Trait,Mother,Father\r\nA,yes,,\r\nB,False,,\r\nC,,A,B\r\n";
    let ast = parse_pedigree(src).expect("parse");
    validate_pedigree(&ast).expect("valid");
    let observed: Vec<_> = ast.records.iter().map(|r| r.trait_observation()).collect();
    assert_eq!(
        observed,
        [
            Some(TraitObservation::Present),
            Some(TraitObservation::Absent),
            Some(TraitObservation::Unknown),
        ]
    );
}

#[test]
fn rejects_unrecognized_trait_literal() {
    let ast = parse_pedigree("name,mother,father,trait\nA,,,maybe\n").expect("parse");
    let err = validate_pedigree(&ast).unwrap_err();
    let diag = err.validation_diagnostic().expect("diagnostic");
    assert_eq!(diag.person(), Some("A"));
    assert_eq!(diag.line, Some(2));
    assert!(diag.message.contains("maybe"));
}

#[test]
fn rejects_dangling_parent() {
    let ast = parse_pedigree("name,mother,father,trait\nHarry,Lily,James,\nLily,,,\n")
        .expect("parse");
    let err = validate_pedigree(&ast).unwrap_err();
    assert!(err.to_string().contains("James"), "{err}");
}

#[test]
fn rejects_missing_column() {
    assert!(matches!(
        parse_pedigree("name,mother,trait\nA,,\n"),
        Err(FrontendError::ParseError(_))
    ));
}
