use super::*;

use crate::routing::congestion::Congestion;
use crate::routing::perf::{is_stationary, performance_index};
use crate::routing::serialize::route_to_string;

#[test]
fn spare_periods_keep_the_total_at_zero() {
    let graph = school();
    let mut optimizer = seed(&graph, &[("21001", ""), ("21002", "G G"), ("21003", "")]);
    assert_eq!(optimizer.sum_rperf(), 0.0);

    let accepted = run_batches(&mut optimizer, &graph, 3, 10);
    assert!(accepted.iter().all(|&total| total == 0.0));
}

#[test]
fn stationary_sentinel_is_recognized() {
    let graph = school();
    assert!(is_stationary(&graph, &route(&graph, "G G")));
    assert!(!is_stationary(&graph, &route(&graph, "G A1")));
    assert!(!is_stationary(&graph, &route(&graph, "A1 X1 B1")));
    assert!(!is_stationary(&graph, &[]));
}

#[test]
fn ground_segments_do_not_count() {
    let graph = school();
    let congestion = Congestion::new();

    assert_eq!(
        performance_index(&graph, &route(&graph, "G A1"), &congestion),
        0.0
    );
    // Leading and trailing ground legs are excluded; the interior scores the
    // same as the bare room-to-room walk.
    let bracketed = performance_index(&graph, &route(&graph, "G A1 X1 B1 G"), &congestion);
    let interior = performance_index(&graph, &route(&graph, "A1 X1 B1"), &congestion);
    assert_eq!(bracketed, interior);
}

#[test]
fn stuck_pair_is_not_relitigated() {
    let graph = school();
    // Nobody can improve here: the junction route is already the shortest
    // and the congestion is too thin to matter.
    let mut optimizer = seed(
        &graph,
        &[("21001", "A1 X1 B1"), ("21002", "A1 X1 B1"), ("21003", "A1 X1 B1")],
    );
    let initial = optimizer.sum_rperf();

    for _ in 0..6 {
        optimizer.step(&graph).unwrap();
    }
    // All three share the stuck endpoint pair; routes must be untouched and
    // the running total unchanged.
    assert_eq!(optimizer.sum_rperf(), initial);
    let mut routes: Vec<String> = optimizer
        .routes()
        .map(|path| route_to_string(&graph, &path.route))
        .collect();
    routes.sort();
    routes.dedup();
    assert_eq!(routes, vec!["A1 X1 B1".to_owned()]);
}

#[test]
fn stuck_students_rejoin_at_the_batch_boundary() {
    let graph = school();
    let mut optimizer = seed(
        &graph,
        &[
            ("21001", "A1 X1 B1"),
            ("21002", "A1 X1 B1"),
            ("21003", "B1 X1 A1"),
        ],
    );

    for _ in 0..10 {
        optimizer.step(&graph).unwrap();
    }
    // Every reroute attempt failed to improve; the whole pool is stuck.
    assert_eq!(optimizer.pending(), 0);

    optimizer.rebaseline(&graph);
    // The boundary drains the stuck list back into the working heap, so
    // everyone is a candidate again in the next batch.
    assert_eq!(optimizer.pending(), 3);
    assert_eq!(optimizer.routes().count(), 3);
}

#[test]
fn the_heap_never_starves_across_many_batches() {
    let graph = school();
    let mut optimizer = seed(
        &graph,
        &[
            ("21001", "A1 X1 B1"),
            ("21002", "A1 A2 B1"),
            ("21003", "B1 X1 A1"),
            ("21004", "A1 X1 B1"),
        ],
    );

    for batch in 0..20 {
        for _ in 0..10 {
            optimizer.step(&graph).unwrap();
        }
        optimizer.rebaseline(&graph);
        // The pool is conserved and the working heap is live again after
        // every boundary (a rejected batch may hold back one demoted entry).
        assert_eq!(optimizer.routes().count(), 4);
        assert!(
            optimizer.pending() > 0,
            "heap starved after batch {batch}"
        );
    }
}

#[test]
fn drained_heap_steps_are_no_ops() {
    let graph = school();
    let mut optimizer = seed(&graph, &[("21001", "A1 X1 B1")]);
    for _ in 0..20 {
        optimizer.step(&graph).unwrap();
    }
    assert_eq!(optimizer.routes().count(), 1);
}

#[test]
fn disconnected_endpoints_are_fatal() {
    let graph = Graph::parse("A1 A2 5 0\nB8 B9 3 0\n").unwrap();
    // A committed route can name a pair the graph cannot connect; the
    // reroute must surface that as an error instead of looping.
    let broken = vec![(
        "21001".to_owned(),
        vec![graph.id("A1").unwrap(), graph.id("B9").unwrap()],
    )];
    let mut optimizer = PeriodOptimizer::new(&graph, 2, broken);
    assert!(optimizer.step(&graph).is_err());
}

#[test]
fn missing_edges_are_skipped_when_scoring() {
    let graph = school();
    // A2 -> X1 is not an edge; the pair is ignored, the rest still counts.
    let patched = vec![
        graph.id("A1").unwrap(),
        graph.id("A2").unwrap(),
        graph.id("X1").unwrap(),
        graph.id("B1").unwrap(),
    ];
    let congestion = Congestion::new();
    let rperf = performance_index(&graph, &patched, &congestion);
    let a1_a2 = performance_index(&graph, &route(&graph, "A1 A2"), &congestion);
    let x1_b1 = performance_index(&graph, &route(&graph, "X1 B1"), &congestion);
    assert_eq!(rperf, a1_a2 + x1_b1);
}
