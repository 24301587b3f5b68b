//! End-to-end matching behaviour through the public API.

use waterloo::{Pattern, Span};

const LYRIC: &str = "Waterloo I was defeated, you won the war \
Waterloo promise to love you for ever more \
Waterloo couldn't escape if I wanted to \
Waterloo knowing my fate is to be with you \
Waterloo finally facing my Waterloo";

fn pattern(source: &str) -> Pattern {
    Pattern::new(source).unwrap_or_else(|err| panic!("{source:?}: {err}"))
}

fn texts(source: &str, subject: &str) -> Vec<String> {
    pattern(source)
        .find_iter(subject)
        .map(|m| m.span.text(subject))
        .collect()
}

#[test]
fn literal_offset_and_length() {
    let outcome = pattern("abc").match_at("xabcx", 0);
    assert!(outcome.success);
    assert_eq!(outcome.span, Span::new(1, 4));
    assert_eq!(outcome.span.len(), 3);
}

#[test]
fn greedy_wildcard_gives_back_to_literal() {
    let outcome = pattern(".*Waterloo").match_at("xxWaterloo", 0);
    assert_eq!(outcome.span, Span::new(0, 10));
}

#[test]
fn greedy_wildcard_over_lyric() {
    let found = pattern("Water.*loo").match_at(LYRIC, 0);
    assert_eq!(found.span, Span::new(0, LYRIC.chars().count()));
}

#[test]
fn group_with_alternation_takes_left_branch() {
    let outcome = pattern("(ab)+cd").match_at("abcd", 0);
    assert_eq!(outcome.captures[0].text("abcd"), "ab");
}

#[test]
fn counter() {
    assert_eq!(pattern("a{3}").match_at("aaab", 0).span, Span::new(0, 3));
    assert!(!pattern("a{3}").match_at("aab", 0).success);
}

#[test]
fn case_insensitive_every_position() {
    assert_eq!(texts("a\\I", "AaA"), vec!["A", "a", "A"]);
    assert_eq!(texts("a\\Ib", "AbABab"), vec!["Ab", "ab"]);
}

#[test]
fn selection_group_reports_capture() {
    let outcome = pattern("(a)b\\O1").match_at("ab", 0);
    assert_eq!(outcome.span.text("ab"), "a");
    assert_eq!(outcome.full, Span::new(0, 2));
}

#[test]
fn find_all_in_lyric() {
    assert_eq!(texts("Waterloo", LYRIC).len(), 6);
    assert_eq!(texts("waterloo\\I", LYRIC).len(), 6);
    assert_eq!(texts("you+I", LYRIC), vec!["I", "you", "you", "I", "you"]);
}

#[test]
fn find_all_with_counter_and_groups() {
    let subject = "love you for ever more";
    assert_eq!(texts("(.)o(.)e", subject), vec!["love", "more"]);
    assert_eq!(texts(".{3}r", subject), vec![" for", "ever", " mor"]);
}

#[test]
fn selection_of_second_group_over_lyric() {
    let found: Vec<String> = pattern("(.)(ou)\\O2")
        .find_iter(LYRIC)
        .map(|m| m.span.text(LYRIC))
        .collect();
    assert_eq!(found.len(), 4);
    assert!(found.iter().all(|s| s == "ou"));
}

#[test]
fn start_position_skips_earlier_matches() {
    let outcome = pattern("Waterloo").match_at(LYRIC, 1);
    assert_eq!(outcome.span.start, 41);
}

#[test]
fn non_ascii_subject_positions_are_chars() {
    let subject = "åäö abc";
    let outcome = pattern("b").match_at(subject, 0);
    assert_eq!(outcome.span, Span::new(5, 6));
}

#[test]
fn stress_long_subject_without_match() {
    let subject = "a".repeat(2_000);
    assert!(!pattern(".*b").match_at(&subject, 0).success);
    assert!(!pattern("a*b").match_at(&subject, 0).success);
}

#[test]
fn repeated_literal_over_lyric() {
    assert_eq!(texts("lo*", LYRIC)[0], "loo");
    assert_eq!(texts("lo*", LYRIC).len(), 7);
}

#[test]
fn stress_stacked_greedy_wildcards() {
    let subject = "a".repeat(500);
    assert!(!pattern(".*.*.*b").match_at(&subject, 0).success);

    let subject = format!("{}b", "a".repeat(499));
    let outcome = pattern("(.*)(.*)(.*)b").match_at(&subject, 0);
    assert_eq!(outcome.span, Span::new(0, 500));
    assert_eq!(outcome.captures[2], Span::new(498, 499));
}

#[test]
fn stress_nested_alternation() {
    let source = (0..12).map(|i| format!("(x{i}+y{i})")).collect::<String>();
    let subject = (0..12).map(|i| format!("y{i}")).collect::<String>().repeat(20);
    let outcome = pattern(&source).match_at(&subject, 0);
    assert!(outcome.success);
    assert_eq!(outcome.span.start, 0);
    assert_eq!(outcome.captures.len(), 12);
}

#[test]
fn stress_many_matches() {
    let subject = "Waterloo ".repeat(500);
    assert_eq!(pattern("W.{6}o").find_iter(&subject).count(), 500);
}
