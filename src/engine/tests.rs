use super::Matcher;
use crate::api::{MatchCandidate, Reason};
use crate::catalog::{Catalog, CatalogDocument};
use crate::{MatchStrength, Span};

const MENU: &str = r#"{
  "menu_categories": {
    "short_order": {"name": "Short Orders", "items": [
      {"name": "Chicken Adobo", "variations": [{"name": "Regular", "price": 150}]},
      {"name": "Pork Adobo", "variations": [{"name": "Regular", "price": 160}]},
      {"name": "Pork Ribs", "variations": [{"name": "Regular", "price": 200}]},
      {"name": "Sweet & Spicy Pork Ribs", "variations": [{"name": "Regular", "price": 260}]},
      {"name": "Rice Bowl w/ Lechon Kawali", "variations": [{"name": "Regular", "price": 190}]}
    ]},
    "stir_fry": {"name": "Stir Fry", "items": [
      {"name": "Chicken w/ Mushroom", "variations": [{"name": "Small", "price": 180}, {"name": "Double", "price": 320}]}
    ]},
    "yangchow": {"name": "Yangchow", "items": [
      {"name": "Yangchow", "variations": [
        {"name": "Chicken Fillet", "price": 180}, {"name": "Pork", "price": 170}, {"name": "Shrimp", "price": 210}
      ]}
    ]}
  },
  "equivalences": [{"phrase": "lechon kawali", "item": "Rice Bowl w/ Lechon Kawali"}]
}"#;

fn menu() -> Catalog {
    Catalog::from_document(CatalogDocument::from_json(MENU).unwrap())
}

fn names(candidates: &[MatchCandidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.base_item_name.as_str()).collect()
}

#[test]
fn order_examples_matching() {
    // (input, expected items in order of appearance)
    let cases: Vec<(&str, Vec<&str>)> = vec![
        ("1 sweet & spicy pork ribs", vec!["Sweet & Spicy Pork Ribs"]),
        ("sweet and spicy pork ribs and pork ribs", vec!["Sweet & Spicy Pork Ribs", "Pork Ribs"]),
        ("2 chicken adobo, 1 rice", vec!["Chicken Adobo"]),
        ("2 pork adobo, three yangchow", vec!["Pork Adobo", "Yangchow"]),
        ("stir fry chicken mushroom", vec!["Chicken w/ Mushroom"]),
        ("CHICKEN WITH MUSHROOM pls", vec!["Chicken w/ Mushroom"]),
        ("mushroom and chicken stir fry", vec!["Chicken w/ Mushroom"]),
        ("one lechon kawali", vec!["Rice Bowl w/ Lechon Kawali"]),
        ("pork adobos", vec![]),
    ];

    let catalog = menu();
    let matcher = Matcher::new(&catalog);
    for (input, expected) in cases {
        let found = matcher.find_candidates(input);
        assert_eq!(names(&found), expected, "input: {input:?}");
    }
}

#[test]
fn quantity_examples() {
    let cases: Vec<(&str, u32)> = vec![
        ("chicken adobo", 1),
        ("2 chicken adobo", 2),
        ("chicken adobo x3", 3),
        ("four chicken adobo please", 4),
        ("chicken adobo 2pcs", 2),
        ("9 chicken adobo", 1),
    ];

    let catalog = menu();
    let matcher = Matcher::new(&catalog);
    for (input, expected) in cases {
        let found = matcher.find_candidates(input);
        assert_eq!(found.len(), 1, "input: {input:?}");
        assert_eq!(found[0].quantity, expected, "input: {input:?}");
    }
}

#[test]
fn longer_name_wins_over_contained_name() {
    let catalog = menu();
    let found = Matcher::new(&catalog).find_candidates("sweet & spicy pork ribs");
    assert_eq!(names(&found), vec!["Sweet & Spicy Pork Ribs"]);
    assert_eq!(found[0].strength, MatchStrength::Exact);
}

#[test]
fn named_variation_is_resolved_directly() {
    let catalog = menu();
    let found = Matcher::new(&catalog).find_candidates("yangchow with chicken fillet");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].matched_variation.as_deref(), Some("Chicken Fillet"));
    assert_eq!(found[0].unit_price, 180);
}

#[test]
fn unnamed_size_needs_variation() {
    let catalog = menu();
    let found = Matcher::new(&catalog).find_candidates("stir fry chicken mushroom");
    assert_eq!(found.len(), 1);
    assert!(found[0].needs_variation());
    assert_eq!(found[0].strength, MatchStrength::Normalized);
}

#[test]
fn single_variation_items_are_always_resolved() {
    let catalog = menu();
    let found = Matcher::new(&catalog).find_candidates("2 chicken adobo");
    assert_eq!(found[0].matched_variation.as_deref(), Some("Regular"));
}

#[test]
fn named_size_replaces_generic_mention() {
    let catalog = menu();
    let found = Matcher::new(&catalog).find_candidates("chicken mushroom, make it the chicken mushroom double");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].matched_variation.as_deref(), Some("Double"));
    assert_eq!(found[0].unit_price, 320);
}

#[test]
fn leading_size_word_names_the_variation() {
    let catalog = menu();
    let found = Matcher::new(&catalog).find_candidates("2 small chicken w/ mushroom");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].matched_variation.as_deref(), Some("Small"));
    assert_eq!(found[0].quantity, 2);
}

#[test]
fn spans_point_into_original_text() {
    let catalog = menu();
    let text = "2 Chicken w/  Mushroom and 1 Pork Adobo";
    let found = Matcher::new(&catalog).find_candidates(text);

    let bodies: Vec<&str> = found.iter().map(|c| &text[c.source_span.start..c.source_span.end]).collect();
    assert_eq!(bodies, vec!["Chicken w/  Mushroom", "Pork Adobo"]);
    assert_eq!(found[1].source_span, Span { start: 29, end: 39 });
}

#[test]
fn validation_examples() {
    let catalog = menu();
    let matcher = Matcher::new(&catalog);

    let v = matcher.validate("what time do you open");
    assert!(!v.is_order);
    assert_eq!(v.reason, Reason::LooksLikeQuestion);

    let v = matcher.validate("hello there, I would like to order something really nice for the family");
    assert!(!v.is_order);
    assert_eq!(v.reason, Reason::NoRecognizedItems);

    let v = matcher.validate("hi! 2 pork adobo for pickup later, thanks");
    assert!(v.is_order);
    match v.reason {
        Reason::Recognized(items) => assert_eq!(items[0].name, "Pork Adobo"),
        other => panic!("unexpected reason {other:?}"),
    }
}

#[test]
fn best_match_prefers_exact_then_longer_name() {
    let catalog = menu();
    let matcher = Matcher::new(&catalog);

    let best = matcher.best_match("sweet & spicy pork ribs").unwrap();
    assert_eq!(best.name, "Sweet & Spicy Pork Ribs");
    assert_eq!(best.score, super::SCORE_EXACT);

    assert!(matcher.best_match("just water").is_none());
}

#[test]
fn no_base_item_is_counted_twice() {
    let catalog = menu();
    let found = Matcher::new(&catalog).find_candidates("pork adobo, pork adobo and another pork adobo");
    assert_eq!(names(&found), vec!["Pork Adobo"]);
}

#[test]
fn partial_names_are_extracted_like_they_are_scored() {
    // (input, item, quantity)
    let cases: Vec<(&str, &str, u32)> = vec![
        ("rice bowl kawali", "Rice Bowl w/ Lechon Kawali", 1),
        ("2 bowl of lechon rice", "Rice Bowl w/ Lechon Kawali", 2),
        ("sweet spicy ribs", "Sweet & Spicy Pork Ribs", 1),
    ];

    let catalog = menu();
    let matcher = Matcher::new(&catalog);
    for (input, item, quantity) in cases {
        let (validation, found) = matcher.run(input);
        assert!(validation.is_order, "input: {input:?}");
        assert_eq!(names(&found), vec![item], "input: {input:?}");
        assert_eq!(found[0].strength, MatchStrength::WordOverlap, "input: {input:?}");
        assert_eq!(found[0].quantity, quantity, "input: {input:?}");
    }
}

#[test]
fn recognized_text_always_has_candidates() {
    let inputs = [
        "rice bowl kawali",
        "kawali rice",
        "spicy ribs",
        "mushroom chicken",
        "pork and chicken adobo",
        "sweet pork",
        "chicken fillet yangchow",
    ];

    let catalog = menu();
    let matcher = Matcher::new(&catalog);
    for input in inputs {
        let (validation, found) = matcher.run(input);
        if matches!(validation.reason, Reason::Recognized(_)) {
            assert!(!found.is_empty(), "input: {input:?}");
        }
    }
}
