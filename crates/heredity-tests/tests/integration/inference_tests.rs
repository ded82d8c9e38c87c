use heredity_core::{
    infer, infer_with_options, parse_and_build, Distribution, Evidence, GenePrior,
    InferenceError, InferenceOptions, InheritanceModel, ModelTable, PedigreeGraph, Summation,
    TraitGivenGene, TraitLikelihood,
};
use heredity_frontend::PersonRecord;
use heredity_tests::{FAMILY0, FAMILY1};

#[test]
fn every_distribution_sums_to_one() {
    for source in [FAMILY0, FAMILY1] {
        let graph = parse_and_build(source).unwrap();
        let marginals = infer(
            &graph,
            &Evidence::from_pedigree(&graph),
            &InheritanceModel::default(),
        )
        .unwrap();
        assert_eq!(marginals.len(), graph.len());
        for person in &marginals {
            assert!((person.gene.total() - 1.0).abs() < 1e-12, "{}", person.name);
            assert!((person.trait_.total() - 1.0).abs() < 1e-12, "{}", person.name);
        }
    }
}

#[test]
fn observed_traits_are_certain() {
    let graph = parse_and_build(FAMILY1).unwrap();
    let marginals = infer(
        &graph,
        &Evidence::from_pedigree(&graph),
        &InheritanceModel::default(),
    )
    .unwrap();
    assert_eq!(marginals.get("Fred").unwrap().trait_.present, 1.0);
    assert_eq!(marginals.get("Charlie").unwrap().trait_.absent, 1.0);
}

#[test]
fn diagnostics_count_the_hypothesis_space() {
    let graph = parse_and_build(FAMILY1).unwrap();
    let (_, diagnostics) = infer_with_options(
        &graph,
        &Evidence::from_pedigree(&graph),
        &InheritanceModel::default(),
        InferenceOptions::sequential(),
    )
    .unwrap();
    assert_eq!(diagnostics.persons, 6);
    assert_eq!(diagnostics.unknown_traits, 2);
    assert_eq!(diagnostics.hypotheses_evaluated, 3u64.pow(6) * 4);
    assert_eq!(diagnostics.partitions, 1);
    assert!(diagnostics.evidence_probability > 0.0 && diagnostics.evidence_probability < 1.0);
}

#[test]
fn certain_inheritance_without_mutation() {
    // Both parents certainly carry two copies; with no mutation so does the child.
    let graph = PedigreeGraph::from_records(&[
        PersonRecord::new("Mother"),
        PersonRecord::new("Father"),
        PersonRecord::new("Child").with_parents("Mother", "Father"),
    ])
    .unwrap();
    let model = InheritanceModel {
        gene_prior: GenePrior {
            zero: 0.0,
            one: 0.0,
            two: 1.0,
        },
        mutation_rate: 0.0,
        ..InheritanceModel::default()
    };
    let marginals = infer(&graph, &Evidence::none(), &model).unwrap();
    let child = marginals.get("Child").unwrap();
    assert_eq!(child.gene.two, 1.0);
    assert!((child.trait_.present - 0.65).abs() < 1e-12);
}

#[test]
fn contradictory_evidence_is_indeterminate() {
    let graph = parse_and_build(FAMILY0).unwrap();
    let never = TraitLikelihood {
        present: 0.0,
        absent: 1.0,
    };
    let model = InheritanceModel {
        trait_given_gene: TraitGivenGene {
            zero: never,
            one: never,
            two: never,
        },
        ..InheritanceModel::default()
    };
    let err = infer(&graph, &Evidence::from_pedigree(&graph), &model).unwrap_err();
    assert!(matches!(
        err,
        InferenceError::IndeterminateEvidence {
            distribution: Distribution::Gene,
            ..
        }
    ));
}

#[test]
fn invalid_tables_are_reported() {
    let graph = parse_and_build(FAMILY0).unwrap();
    let evidence = Evidence::from_pedigree(&graph);

    let prior = InheritanceModel {
        gene_prior: GenePrior {
            zero: 0.5,
            one: 0.5,
            two: 0.5,
        },
        ..InheritanceModel::default()
    };
    assert!(matches!(
        infer(&graph, &evidence, &prior),
        Err(InferenceError::InvalidConfiguration {
            table: ModelTable::GenePrior,
            ..
        })
    ));

    let mut row = InheritanceModel::default();
    row.trait_given_gene.one = TraitLikelihood {
        present: 0.7,
        absent: 0.7,
    };
    assert!(matches!(
        infer(&graph, &evidence, &row),
        Err(InferenceError::InvalidConfiguration {
            table: ModelTable::TraitGivenGene(1),
            ..
        })
    ));
}

#[test]
fn model_round_trips_through_json() {
    let json = r#"{
        "gene_prior": {"zero": 0.9, "one": 0.08, "two": 0.02},
        "mutation_rate": 0.05
    }"#;
    let model: InheritanceModel = serde_json::from_str(json).unwrap();
    assert_eq!(model.gene_prior.one, 0.08);
    assert_eq!(model.mutation_rate, 0.05);
    assert_eq!(model.trait_given_gene, TraitGivenGene::default());
    assert!(model.validate().is_ok());

    assert!(serde_json::from_str::<InheritanceModel>(r#"{"mutation": 0.1}"#).is_err());
}

#[test]
fn marginals_serialize_with_trait_key() {
    let graph = parse_and_build(FAMILY0).unwrap();
    let marginals = infer(
        &graph,
        &Evidence::from_pedigree(&graph),
        &InheritanceModel::default(),
    )
    .unwrap();
    let value = serde_json::to_value(marginals.get("James").unwrap()).unwrap();
    assert_eq!(value["name"], "James");
    assert_eq!(value["trait"]["present"], 1.0);
    assert!(value["gene"]["one"].as_f64().unwrap() > 0.5);
}

#[test]
fn vanishing_evidence_keeps_a_defined_posterior() {
    let records: Vec<_> = (0..9)
        .map(|i| PersonRecord::new(format!("p{i}")).observed(true))
        .collect();
    let graph = PedigreeGraph::from_records(&records).unwrap();
    let rare = TraitLikelihood {
        present: 1e-40,
        absent: 1.0 - 1e-40,
    };
    let model = InheritanceModel {
        trait_given_gene: TraitGivenGene {
            zero: rare,
            one: rare,
            two: rare,
        },
        ..InheritanceModel::default()
    };
    let evidence = Evidence::from_pedigree(&graph);

    let (marginals, diagnostics) =
        infer_with_options(&graph, &evidence, &model, InferenceOptions::default()).unwrap();
    assert_eq!(diagnostics.summation, Summation::LogDomain);
    assert!(diagnostics.log_evidence_probability < -800.0);
    for person in &marginals {
        assert!((person.gene.zero - 0.96).abs() < 1e-9, "{}", person.name);
        assert!((person.gene.two - 0.01).abs() < 1e-9, "{}", person.name);
    }
}
