// tests/property_substitution.rs

use proptest::prelude::*;
use streammon::stream::{TOKEN_OPEN, parse_field_indices, parse_templates, substitute};

// Literal text that can never form a token.
fn literal() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9:,._/ -]{0,12}"
}

// A field value: no delimiter (space) and no token markers.
fn field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9:.]{1,8}"
}

// A template made of literal pieces interleaved with `#{k}` tokens.
fn template(max_index: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec((literal(), 0..=max_index), 0..4).prop_flat_map(|parts| {
        literal().prop_map(move |tail| {
            let mut s = String::new();
            for (lit, idx) in &parts {
                s.push_str(lit);
                s.push_str(&format!("#{{{idx}}}"));
            }
            s.push_str(&tail);
            s
        })
    })
}

proptest! {
    #[test]
    fn templates_without_tokens_are_unchanged(
        args in proptest::collection::vec(literal(), 0..5),
        fields in proptest::collection::vec(field(), 0..6),
    ) {
        let line = fields.join(" ");
        let templates = parse_templates(args.clone()).unwrap();
        prop_assert_eq!(substitute(&templates, &line, " "), args);
    }

    #[test]
    fn whole_line_token_yields_line(
        fields in proptest::collection::vec(field(), 0..6),
        delim in prop_oneof![Just(" "), Just(","), Just("::")],
    ) {
        let line = fields.join(delim);
        let templates = parse_templates(["#{0}"]).unwrap();
        prop_assert_eq!(substitute(&templates, &line, delim), vec![line.clone()]);
    }

    #[test]
    fn out_of_range_token_stays_literal(
        fields in proptest::collection::vec(field(), 1..6),
        extra in 1usize..5,
    ) {
        let line = fields.join(" ");
        let k = fields.len() + extra;
        let token = format!("#{{{k}}}");
        let templates = parse_templates([format!("x{token}y")]).unwrap();
        prop_assert_eq!(substitute(&templates, &line, " "), vec![format!("x{token}y")]);
    }

    #[test]
    fn enough_fields_leave_no_token_markers(
        args in proptest::collection::vec(template(6), 1..4),
        fields in proptest::collection::vec(field(), 6..9),
    ) {
        let indices = parse_field_indices(args.clone()).unwrap();
        let max = indices.iter().copied().max().unwrap_or(0);
        prop_assume!(fields.len() >= max);

        let line = fields.join(" ");
        let templates = parse_templates(args).unwrap();
        for rendered in substitute(&templates, &line, " ") {
            prop_assert!(!rendered.contains(TOKEN_OPEN), "leftover token in {}", rendered);
        }
    }

    #[test]
    fn substitution_is_idempotent(
        args in proptest::collection::vec(template(8), 0..4),
        fields in proptest::collection::vec(field(), 0..8),
    ) {
        let line = fields.join(" ");
        let templates = parse_templates(args).unwrap();
        prop_assert_eq!(
            substitute(&templates, &line, " "),
            substitute(&templates, &line, " ")
        );
    }
}
