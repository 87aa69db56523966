use mindmap_graph::{
    build_graph, layout, rank_links, LayoutAlgorithm, LayoutConfig, LogicalLink, RankOptions,
    WeightScale,
};
use mindmap_text::{CooccurrenceMap, Language};
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "cat", "mat", "dog", "bone", "sun", "moon", "star", "river", "stone", "tree", "leaf", "wind",
];

fn word() -> impl Strategy<Value = &'static str> {
    prop::sample::select(WORDS)
}

fn cooccurrence() -> impl Strategy<Value = CooccurrenceMap> {
    prop::collection::vec((word(), word(), 0.1f64..10.0), 0..60).prop_map(|pairs| {
        let mut map = CooccurrenceMap::new();
        for (a, b, w) in pairs {
            map.add_pair(a, b, w);
        }
        map
    })
}

fn links() -> impl Strategy<Value = Vec<LogicalLink>> {
    prop::collection::vec((word(), word(), 0.1f64..10.0), 0..80).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(a, b, weight)| LogicalLink {
                source: a.to_string(),
                target: b.to_string(),
                source_category: "unknown".to_string(),
                target_category: "unknown".to_string(),
                weight,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn proptest_ranked_links_are_non_increasing(
        map in cooccurrence(),
        top_k in prop::option::of(1usize..20),
        normalized in any::<bool>(),
    ) {
        let options = RankOptions {
            top_k,
            weight_scale: if normalized { WeightScale::normalized() } else { WeightScale::Raw },
            ..Default::default()
        };
        let ranked = rank_links(&map, &options, None, Language::English);

        prop_assert_eq!(ranked.len(), top_k.map_or(map.len(), |k| k.min(map.len())));
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].weight >= pair[1].weight);
        }
        if normalized {
            prop_assert!(ranked.iter().all(|l| (0.5..=5.0 + 1e-9).contains(&l.weight)));
        }
    }

    #[test]
    fn proptest_graph_respects_edge_cap(links in links(), max_edges in 1usize..30) {
        let graph = build_graph(&links, max_edges).unwrap();

        prop_assert!(graph.edge_count() <= max_edges);
        for (_, node) in graph.nodes() {
            let degree = graph.degree(&node.word).unwrap();
            prop_assert!(degree >= 1, "isolated node {}", node.word);
            prop_assert!(node.size >= degree);
        }
        for (a, b, weight) in graph.edges() {
            prop_assert_ne!(a, b);
            prop_assert!(weight > 0.0);
        }
    }

    #[test]
    fn proptest_layout_places_every_node(links in links(), energy in any::<bool>()) {
        let graph = build_graph(&links, 50).unwrap();
        let algorithm = if energy { LayoutAlgorithm::Energy } else { LayoutAlgorithm::Spring };
        let placed = layout(&graph, &LayoutConfig::with_algorithm(algorithm)).unwrap();

        prop_assert_eq!(placed.positions.len(), graph.node_count());
        for point in placed.positions.values() {
            prop_assert!(point.x.is_finite() && point.y.is_finite());
        }
    }
}
