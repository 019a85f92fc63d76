//! Integration tests for display rows and block totals.

use rstest::rstest;
use serde_json::json;

use reftree::application::{render, NoCounts, RenderOptions, StaticCounts, TotalPolicy};
use reftree::config::Settings;
use reftree::domain::{build, parse, BuildOptions, Forest, TreeNodeConvert};

const PLACES: &str = "Europe\n- France\n-- Paris\n- United Kingdom\nAsia\n- Japan";

fn places(branch_mode: bool) -> Forest {
    build(&parse(PLACES), BuildOptions { branch_mode })
}

#[rstest]
#[case(TotalPolicy::Roots, 2)]
#[case(TotalPolicy::Nodes, 6)]
fn given_total_policy_when_rendering_then_total_matches(#[case] total: TotalPolicy, #[case] expected: usize) {
    let options = RenderOptions {
        total,
        ..Default::default()
    };

    assert_eq!(render(&places(false), &NoCounts, options).total, expected);
}

#[test]
fn given_plain_forest_when_rendering_with_counts_then_looked_up_by_label() {
    let counts = StaticCounts::from_json(r#"{"Paris": 4, "Japan": 1}"#).unwrap();
    let options = RenderOptions {
        with_counts: true,
        ..Default::default()
    };

    let rendered = render(&places(false), &counts, options);

    let counted: Vec<(&str, usize, Option<u64>)> = rendered
        .rows
        .iter()
        .map(|row| (row.label.as_str(), row.depth, row.count))
        .collect();
    assert_eq!(
        counted,
        vec![
            ("Europe", 0, None),
            ("France", 1, None),
            ("Paris", 2, Some(4)),
            ("United Kingdom", 1, None),
            ("Asia", 0, None),
            ("Japan", 1, Some(1)),
        ]
    );
}

#[test]
fn given_rendered_tree_when_serialized_then_absent_fields_omitted() {
    let forest = build(&parse("Asia\n- Japan"), BuildOptions { branch_mode: true });
    let mut counts = StaticCounts::new();
    counts.insert("Asia :: Japan", 2);
    let options = RenderOptions {
        with_counts: true,
        expanded: true,
        total: TotalPolicy::Nodes,
    };

    let value = serde_json::to_value(render(&forest, &counts, options)).unwrap();

    assert_eq!(
        value,
        json!({
            "total": 2,
            "expanded": true,
            "rows": [
                {"label": "Asia", "depth": 0, "branch_path": "Asia"},
                {"label": "Japan", "depth": 1, "branch_path": "Asia :: Japan", "count": 2}
            ]
        })
    );
}

#[test]
fn given_expanded_settings_when_resolving_render_options_then_nodes_counted() {
    let mut settings = Settings::default();
    settings.block.expanded = true;

    let rendered = render(&places(false), &NoCounts, settings.render_options(false, None, None));

    assert!(rendered.expanded);
    assert_eq!(rendered.total, 6);
}

#[test]
fn given_flattened_forest_when_compared_with_rows_then_same_walk() {
    let forest = places(true);

    let flat = forest.flatten();
    let rows = render(&forest, &NoCounts, RenderOptions::default()).rows;

    assert_eq!(flat.len(), rows.len());
    for (node, row) in flat.iter().zip(&rows) {
        assert_eq!((&node.label, node.depth, &node.branch_path), (&row.label, row.depth, &row.branch_path));
    }
}

#[test]
fn given_forest_when_displayed_as_tree_then_box_drawing_shows_nesting() {
    let shown: String = places(false)
        .to_tree_string()
        .iter()
        .map(|tree| tree.to_string())
        .collect();

    assert_eq!(
        shown,
        "Europe\n├── France\n│   └── Paris\n└── United Kingdom\nAsia\n└── Japan\n"
    );
}
