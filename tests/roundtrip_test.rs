//! Round-trip tests: parse, build, serialize and parse again.

use rstest::rstest;

use reftree::domain::{
    build, normalize_levels, parse, serialize, BuildOptions, Forest, OutlineSerializer,
};

const PLACES: &str = "Europe\n- France\n-- Paris\n- United Kingdom\nAsia\n- Japan";

fn round_trip(text: &str, branch_mode: bool) -> Forest {
    build(&parse(text), BuildOptions { branch_mode })
}

#[test]
fn given_places_forest_when_serializing_then_original_lines_reproduced() {
    let forest = round_trip(PLACES, false);

    assert_eq!(serialize(&forest), PLACES);
}

#[rstest]
#[case::well_formed(PLACES)]
#[case::depth_jumps("-- Orphan\nEurope\n--- Lost\n- France\n----- Deep\nAsia")]
#[case::malformed("Europe\n--Paris\n- France\n---\n-- Lyon")]
#[case::blank_and_crlf("\r\n Europe \r\n\r\n- France\r\n\r\n-- Paris\r\n")]
#[case::duplicates("a\n- b\n- B\n- b\na")]
#[case::empty("")]
#[case::only_blank(" \n\t\n")]
fn given_any_outline_when_round_tripping_then_normalized_entries_returned(#[case] text: &str) {
    for branch_mode in [false, true] {
        let forest = round_trip(text, branch_mode);

        let again = parse(&serialize(&forest));

        assert_eq!(again, normalize_levels(&parse(text)), "branch_mode={branch_mode}");
    }
}

#[test]
fn given_well_formed_outline_when_normalizing_then_unchanged() {
    let entries = parse(PLACES);

    assert_eq!(normalize_levels(&entries), entries);
}

#[test]
fn given_serialized_forest_when_rebuilding_then_same_forest() {
    let forest = round_trip(PLACES, true);

    let rebuilt = round_trip(&serialize(&forest), true);

    assert_eq!(rebuilt, forest);
}

#[test]
fn given_blank_lines_inserted_when_round_tripping_then_same_forest() {
    let spaced = PLACES.replace('\n', "\n\n   \n");

    assert_eq!(round_trip(&spaced, false), round_trip(PLACES, false));
}

#[test]
fn given_forest_when_taking_levels_then_serializer_agrees() {
    let forest = round_trip(PLACES, false);
    let serializer = OutlineSerializer::new();

    let levels = serializer.levels(&forest);

    assert_eq!(levels, parse(PLACES));
    assert_eq!(serializer.serialize_entries(&levels), PLACES);
}

#[test]
fn given_forest_json_when_deserialized_then_serializes_to_same_outline() {
    let forest = round_trip(PLACES, true);

    let json = serde_json::to_string(&forest).unwrap();
    let back: Forest = serde_json::from_str(&json).unwrap();

    assert_eq!(back, forest);
    assert_eq!(serialize(&back), PLACES);
}
