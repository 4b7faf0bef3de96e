use serde_json::json;

use waymatrix_lib::{
    build_adjacency_matrices, compute_shortest_paths, parse_localities, shortest_path_records,
    CollectingReporter, ComputeOptions, DuplicateEdgePolicy, Edge, Error, NodeSet, ReportEvent,
    ResultRecord, Weight,
};

fn edge(city1: &str, city2: &str, min: f64, km: Option<f64>) -> Edge {
    Edge::new(city1, city2, min, km).expect("valid edge")
}

fn find<'a>(records: &'a [ResultRecord], from: &str, to: &str) -> &'a ResultRecord {
    records
        .iter()
        .find(|r| r.city1 == from && r.city2 == to)
        .unwrap_or_else(|| panic!("missing record {from} -> {to}"))
}

#[test]
fn path_through_intermediate_city() {
    let edges = vec![
        edge("A", "B", 5.0, Some(10.0)),
        edge("B", "C", 3.0, Some(6.0)),
    ];

    let paths = compute_shortest_paths(&edges, ComputeOptions::default()).expect("computes");

    let names: Vec<_> = paths.nodes().iter().collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(paths.time("A", "C"), Some(Weight::Finite(8.0)));
    assert_eq!(paths.distance("A", "C"), Some(Weight::Finite(16.0)));
    assert_eq!(paths.time("C", "A"), Some(Weight::Finite(8.0)));
    assert_eq!(paths.time("A", "Z"), None);
}

#[test]
fn disjoint_components_are_unreachable() {
    let edges = vec![edge("A", "B", 1.0, None), edge("C", "D", 1.0, None)];

    let paths = compute_shortest_paths(&edges, ComputeOptions::default()).expect("computes");

    assert_eq!(paths.time("A", "C"), Some(Weight::Unreachable));
    assert_eq!(paths.distance("A", "C"), Some(Weight::Unreachable));
    assert_eq!(paths.time("A", "B"), Some(Weight::Finite(1.0)));

    let records = paths.records();
    let record = find(&records, "B", "D");
    assert_eq!(record.min, Weight::Unreachable);
    let json = serde_json::to_value(record).expect("serializes");
    assert!(json["min"].is_null());
    assert!(json["km"].is_null());
}

#[test]
fn duplicate_edges_last_write_wins() {
    let edges = vec![edge("A", "B", 5.0, None), edge("A", "B", 2.0, None)];

    let paths = compute_shortest_paths(&edges, ComputeOptions::default()).expect("computes");

    assert_eq!(paths.time("A", "B"), Some(Weight::Finite(2.0)));
}

#[test]
fn duplicate_edges_last_write_wins_even_when_larger() {
    let edges = vec![edge("A", "B", 2.0, None), edge("B", "A", 5.0, None)];

    let paths = compute_shortest_paths(&edges, ComputeOptions::default()).expect("computes");

    assert_eq!(paths.time("A", "B"), Some(Weight::Finite(5.0)));
    assert_eq!(paths.time("B", "A"), Some(Weight::Finite(5.0)));
}

#[test]
fn duplicate_edges_keep_minimum_when_requested() {
    let edges = vec![
        edge("A", "B", 2.0, Some(30.0)),
        edge("B", "A", 5.0, Some(20.0)),
    ];
    let options = ComputeOptions {
        duplicate_edges: DuplicateEdgePolicy::KeepMinimum,
    };

    let paths = compute_shortest_paths(&edges, options).expect("computes");

    assert_eq!(paths.time("A", "B"), Some(Weight::Finite(2.0)));
    assert_eq!(paths.distance("A", "B"), Some(Weight::Finite(20.0)));
}

#[test]
fn malformed_record_is_skipped_without_failing() {
    let raw = vec![
        json!({"city1": "A", "city2": "B", "min": 5, "km": 10}),
        json!({"city1": "B", "city2": "X", "min": -1}),
        json!({"city1": "B", "city2": "C", "min": 3, "km": 6}),
    ];
    let reporter = CollectingReporter::new();

    let parsed = parse_localities(&raw, &reporter);
    let records =
        shortest_path_records(&parsed.edges, ComputeOptions::default(), &reporter).expect("computes");

    assert_eq!(parsed.skipped, 1);
    assert_eq!(records.len(), 6);
    assert!(records.iter().all(|r| r.city1 != "X" && r.city2 != "X"));
    assert_eq!(find(&records, "A", "C").min, Weight::Finite(8.0));
    assert_eq!(reporter.skipped_indices(), vec![1]);
    assert!(reporter
        .events()
        .contains(&ReportEvent::Computed { nodes: 3, records: 6 }));
}

#[test]
fn empty_edge_list_yields_empty_result() {
    let reporter = CollectingReporter::new();

    let records =
        shortest_path_records(&[], ComputeOptions::default(), &reporter).expect("not an error");

    assert!(records.is_empty());
    assert_eq!(
        reporter.events(),
        vec![ReportEvent::Computed {
            nodes: 0,
            records: 0
        }]
    );
}

#[test]
fn edge_outside_node_set_is_a_data_error() {
    let edges = vec![edge("A", "B", 1.0, None), edge("B", "Tomsk", 2.0, None)];
    let nodes = NodeSet::from_names(["A", "B"]);

    let error = build_adjacency_matrices(&edges, &nodes).expect_err("unknown city");

    match error {
        Error::UnknownCity { city } => assert_eq!(city, "Tomsk"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn records_follow_node_order() {
    let edges = vec![edge("Omsk", "Tara", 120.0, Some(300.0))];

    let records =
        shortest_path_records(&edges, ComputeOptions::default(), &CollectingReporter::new())
            .expect("computes");

    assert_eq!(
        records,
        vec![
            ResultRecord {
                city1: "Omsk".to_string(),
                city2: "Tara".to_string(),
                min: Weight::Finite(120.0),
                km: Weight::Finite(300.0),
            },
            ResultRecord {
                city1: "Tara".to_string(),
                city2: "Omsk".to_string(),
                min: Weight::Finite(120.0),
                km: Weight::Finite(300.0),
            },
        ]
    );
}
