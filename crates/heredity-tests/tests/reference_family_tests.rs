//! Regression tests pinning posterior marginals for the reference families.
//!
//! Expected values were produced by exhaustive enumeration with the default
//! model and are asserted to 1e-9.

use heredity_core::{
    infer, infer_with_options, parse_and_build, Evidence, InferenceOptions, InheritanceModel,
    Marginals,
};
use heredity_tests::{FAMILY0, FAMILY1};

const TOLERANCE: f64 = 1e-9;

fn run(source: &str, options: InferenceOptions) -> Marginals {
    let pedigree = parse_and_build(source).expect("fixture parses");
    let evidence = Evidence::from_pedigree(&pedigree);
    infer_with_options(&pedigree, &evidence, &InheritanceModel::default(), options)
        .expect("inference succeeds")
        .0
}

#[track_caller]
fn assert_person(marginals: &Marginals, name: &str, gene: [f64; 3], traits: [f64; 2]) {
    let person = marginals.get(name).expect("person present");
    let [two, one, zero] = gene;
    let [present, absent] = traits;
    let pairs = [
        ("gene 2", person.gene.two, two),
        ("gene 1", person.gene.one, one),
        ("gene 0", person.gene.zero, zero),
        ("trait true", person.trait_.present, present),
        ("trait false", person.trait_.absent, absent),
    ];
    for (label, actual, expected) in pairs {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "{name} {label}: {actual} vs {expected}"
        );
    }
}

fn check_family0(marginals: &Marginals) {
    assert_person(
        marginals,
        "Harry",
        [0.0091831197, 0.4556982701, 0.5351186101],
        [0.2665112452, 0.7334887548],
    );
    assert_person(
        marginals,
        "James",
        [0.1975683891, 0.5106382979, 0.2917933131],
        [1.0, 0.0],
    );
    assert_person(
        marginals,
        "Lily",
        [0.0036190673, 0.0136490539, 0.9827318788],
        [0.0, 1.0],
    );
}

fn check_family1(marginals: &Marginals) {
    let parent = [0.0328987821, 0.1034992422, 0.8636019757];
    assert_person(marginals, "Arthur", parent, [0.0, 1.0]);
    assert_person(marginals, "Molly", parent, [0.0, 1.0]);
    assert_person(
        marginals,
        "Charlie",
        [0.0017828371, 0.1330865896, 0.8651305732],
        [0.0, 1.0],
    );
    assert_person(
        marginals,
        "Fred",
        [0.0064933909, 0.6486095959, 0.3448970132],
        [1.0, 0.0],
    );
    let unobserved_child = [0.0026905673, 0.1805297357, 0.8167796971];
    let unobserved_trait = [0.1110133177, 0.8889866823];
    assert_person(marginals, "Ginny", unobserved_child, unobserved_trait);
    assert_person(marginals, "Ron", unobserved_child, unobserved_trait);
}

#[test]
fn family0_sequential() {
    check_family0(&run(FAMILY0, InferenceOptions::sequential()));
}

#[test]
fn family0_parallel() {
    check_family0(&run(FAMILY0, InferenceOptions::default()));
}

#[test]
fn family1_sequential() {
    check_family1(&run(FAMILY1, InferenceOptions::sequential()));
}

#[test]
fn family1_parallel() {
    check_family1(&run(FAMILY1, InferenceOptions::default()));
}

#[test]
fn marginals_follow_file_order() {
    let names: Vec<_> = run(FAMILY1, InferenceOptions::sequential())
        .iter()
        .map(|p| p.name.clone())
        .collect();
    assert_eq!(names, ["Arthur", "Charlie", "Fred", "Ginny", "Molly", "Ron"]);
}

#[test]
fn observing_harry_shifts_parents() {
    let pedigree = parse_and_build(FAMILY0).unwrap();
    let model = InheritanceModel::default();
    let mut evidence = Evidence::from_pedigree(&pedigree);
    let before = infer(&pedigree, &evidence, &model).unwrap();

    evidence.observe(&pedigree, "Harry", true).unwrap();
    let after = infer(&pedigree, &evidence, &model).unwrap();

    let harry = after.get("Harry").unwrap();
    assert_eq!(harry.trait_.present, 1.0);
    let lily_before = before.get("Lily").unwrap().gene.zero;
    let lily_after = after.get("Lily").unwrap().gene.zero;
    assert!(lily_after < lily_before);
}
