use waymatrix_lib::{
    all_pairs_shortest_paths, build_adjacency_matrices, DistanceMatrix, Edge, NodeSet,
};

/// Two components: a weighted road network of six towns and an isolated pair.
fn road_network() -> Vec<Edge> {
    [
        ("Alpha", "Bravo", 7.0, Some(9.0)),
        ("Alpha", "Charlie", 9.0, None),
        ("Alpha", "Foxtrot", 14.0, Some(12.5)),
        ("Bravo", "Charlie", 10.0, Some(4.0)),
        ("Bravo", "Delta", 15.0, Some(20.0)),
        ("Charlie", "Delta", 11.0, None),
        ("Charlie", "Foxtrot", 2.0, Some(2.0)),
        ("Delta", "Echo", 6.0, Some(6.0)),
        ("Echo", "Foxtrot", 9.0, Some(0.5)),
        ("Golf", "Hotel", 3.0, Some(3.0)),
    ]
    .into_iter()
    .map(|(a, b, min, km)| Edge::new(a, b, min, km).expect("valid edge"))
    .collect()
}

fn relaxed() -> (Vec<Edge>, NodeSet, DistanceMatrix, DistanceMatrix) {
    let edges = road_network();
    let nodes = NodeSet::from_edges(&edges);
    let (time, distance) = build_adjacency_matrices(&edges, &nodes).expect("builds");
    let time = all_pairs_shortest_paths(&time);
    let distance = all_pairs_shortest_paths(&distance);
    (edges, nodes, time, distance)
}

#[test]
fn diagonal_is_zero() {
    let (_, nodes, time, distance) = relaxed();
    for i in 0..nodes.len() {
        assert_eq!(time.get(i, i), 0.0);
        assert_eq!(distance.get(i, i), 0.0);
    }
}

#[test]
fn undirected_input_gives_symmetric_result() {
    let (_, nodes, time, distance) = relaxed();
    for i in 0..nodes.len() {
        for j in 0..nodes.len() {
            assert_eq!(time.get(i, j), time.get(j, i));
            assert_eq!(distance.get(i, j), distance.get(j, i));
        }
    }
}

#[test]
fn triangle_inequality_holds() {
    let (_, nodes, time, distance) = relaxed();
    let n = nodes.len();
    for matrix in [&time, &distance] {
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    assert!(
                        matrix.get(i, j) <= matrix.get(i, k) + matrix.get(k, j),
                        "violated for ({i}, {j}) via {k}"
                    );
                }
            }
        }
    }
}

#[test]
fn second_pass_is_idempotent() {
    let (_, _, time, distance) = relaxed();
    assert_eq!(all_pairs_shortest_paths(&time), time);
    assert_eq!(all_pairs_shortest_paths(&distance), distance);
}

#[test]
fn direct_edges_bound_the_result() {
    let (edges, nodes, time, distance) = relaxed();
    for edge in &edges {
        let i = nodes.index_of(edge.city1()).expect("known city");
        let j = nodes.index_of(edge.city2()).expect("known city");
        assert!(time.get(i, j) <= edge.min());
        assert!(distance.get(i, j) <= edge.distance_weight());
    }
}

#[test]
fn known_shortest_values() {
    let (_, nodes, time, distance) = relaxed();
    let at = |name: &str| nodes.index_of(name).expect("known city");

    // Alpha -> Charlie -> Foxtrot -> Echo
    assert_eq!(time.get(at("Alpha"), at("Echo")), 20.0);
    // Alpha -> Charlie -> Foxtrot
    assert_eq!(time.get(at("Alpha"), at("Foxtrot")), 11.0);
    // Bravo -> Charlie -> Foxtrot -> Echo on distance
    assert_eq!(distance.get(at("Bravo"), at("Echo")), 6.5);
    assert_eq!(time.get(at("Alpha"), at("Golf")), f64::INFINITY);
}

#[test]
fn input_matrix_is_not_mutated() {
    let edges = road_network();
    let nodes = NodeSet::from_edges(&edges);
    let (time, _) = build_adjacency_matrices(&edges, &nodes).expect("builds");
    let before = time.clone();

    let _ = all_pairs_shortest_paths(&time);

    assert_eq!(time, before);
}
