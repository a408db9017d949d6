// tests/field_templates.rs

use std::collections::BTreeSet;

use streammon::errors::StreammonError;
use streammon::stream::{
    FieldTemplate, parse_field_indices, parse_templates, split_fields, substitute,
};

const DHCP_LINE: &str = "DHCPREQUEST for 192.168.127.3 from 61:7c:db:fb:45:5e via br1";

fn render(args: &[&str], line: &str, delim: &str) -> Vec<String> {
    let templates = parse_templates(args.iter().copied()).expect("templates should parse");
    substitute(&templates, line, delim)
}

#[test]
fn parse_collects_indices_across_templates() {
    let cases: Vec<(Vec<&str>, Vec<usize>)> = vec![
        (vec!["ip:#{3}", "mac:#{5}", "dev:#{7}"], vec![3, 5, 7]),
        (vec!["ip:#{3},mac:#{5}"], vec![3, 5]),
        (vec!["#{0}"], vec![0]),
        (vec!["#{2}#{2}", "x#{1}"], vec![1, 2]),
        (vec!["no tokens here"], vec![]),
        (vec![], vec![]),
    ];

    for (args, expected) in cases {
        let got = parse_field_indices(args.clone()).unwrap();
        let expected: BTreeSet<usize> = expected.into_iter().collect();
        assert_eq!(got, expected, "args: {args:?}");
    }
}

#[test]
fn unterminated_token_is_literal_text() {
    let t = FieldTemplate::parse("value:#{3").unwrap();
    assert!(!t.has_fields());
    assert_eq!(t.render("a b c", &["a", "b", "c"]), "value:#{3");

    let t = FieldTemplate::parse("#{1} then #{2").unwrap();
    assert_eq!(t.field_indices().collect::<Vec<_>>(), vec![1]);
    assert_eq!(t.render("x y", &["x", "y"]), "x then #{2");
}

#[test]
fn non_numeric_token_fails_fast() {
    for bad in ["#{abc}", "ip:#{}", "#{1a}", "#{-1}", "#{99999999999999999999999}"] {
        match FieldTemplate::parse(bad) {
            Err(StreammonError::InvalidFieldToken { template, .. }) => {
                assert_eq!(template, bad);
            }
            other => panic!("expected InvalidFieldToken for {bad:?}, got {other:?}"),
        }
    }
}

#[test]
fn invalid_token_in_any_template_fails_the_set() {
    let err = parse_field_indices(["#{1}", "#{x}"]).unwrap_err();
    assert!(err.is_config_error());
    assert!(err.to_string().contains("#{x}"));
}

#[test]
fn substitutes_dhcp_fields() {
    assert_eq!(
        render(&["ip:#{3}", "mac:#{5}", "dev:#{7}"], DHCP_LINE, " "),
        vec!["ip:192.168.127.3", "mac:61:7c:db:fb:45:5e", "dev:br1"]
    );
    assert_eq!(
        render(&["ip:#{3},mac:#{5}"], DHCP_LINE, " "),
        vec!["ip:192.168.127.3,mac:61:7c:db:fb:45:5e"]
    );
    assert_eq!(
        render(&["ip:#{3},mac:#{5},dev:#{7}"], DHCP_LINE, " "),
        vec!["ip:192.168.127.3,mac:61:7c:db:fb:45:5e,dev:br1"]
    );
}

#[test]
fn whole_line_token() {
    assert_eq!(render(&["#{0}"], DHCP_LINE, " "), vec![DHCP_LINE]);
    assert_eq!(render(&["#{0}"], "POST /x 200", " "), vec!["POST /x 200"]);
    assert_eq!(
        render(&["'#{0}'"], "POST /x 200", ":"),
        vec!["'POST /x 200'"]
    );
}

#[test]
fn empty_template_list_yields_no_args() {
    assert!(render(&[], DHCP_LINE, " ").is_empty());
}

#[test]
fn missing_field_is_left_unsubstituted() {
    assert_eq!(
        render(&["first:#{1}", "tenth:#{10}"], "a b c", " "),
        vec!["first:a", "tenth:#{10}"]
    );
}

#[test]
fn repeated_token_is_replaced_everywhere() {
    assert_eq!(render(&["#{2}-#{2}-#{1}"], "a b", " "), vec!["b-b-a"]);
}

#[test]
fn field_text_containing_token_is_not_substituted_again() {
    assert_eq!(render(&["#{1}:#{2}"], "#{2} tail", " "), vec!["#{2}:tail"]);
}

#[test]
fn leading_zero_tokens_resolve_to_their_index() {
    assert_eq!(render(&["#{03}"], "a b c", " "), vec!["c"]);
}

#[test]
fn split_uses_exact_delimiter() {
    assert_eq!(split_fields("a,,b", ","), vec!["a", "", "b"]);
    assert_eq!(split_fields("a::b::c", "::"), vec!["a", "b", "c"]);
    assert_eq!(split_fields("no-delim", " "), vec!["no-delim"]);
}

#[test]
fn empty_delimiter_splits_characters() {
    assert_eq!(split_fields("héllo", ""), vec!["h", "é", "l", "l", "o"]);
    assert_eq!(render(&["#{2}"], "héllo", ""), vec!["é"]);
}
