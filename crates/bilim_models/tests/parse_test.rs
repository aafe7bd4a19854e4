use bilim_models::parse::{
    DEFAULT_KEYWORDS, ensure_connective, parse_reply, split_keywords, split_lines,
    split_on_connective, strip_parenthetical, strip_quotes,
};

#[test]
fn test_parse_two_line_reply_with_keywords() {
    let fact = parse_reply(
        "Oy atrofida suv muzi bor\nChunki qutblarda soya doimiy\n[keywords: moon, ice, poles, shadow]",
    )
    .expect("reply should parse");

    assert_eq!(fact.statement(), "Oy atrofida suv muzi bor");
    assert_eq!(
        fact.explanation().as_deref(),
        Some("Chunki qutblarda soya doimiy")
    );
    assert_eq!(fact.keywords(), &vec!["moon", "ice", "poles", "shadow"]);
    assert_eq!(fact.raw_keywords(), "moon, ice, poles, shadow");
}

#[test]
fn test_explanation_gets_connective_prefix() {
    let fact = parse_reply("Olmos eng qattiq mineral\nYuqori bosim issiqlik hosil qiladi")
        .expect("reply should parse");

    assert_eq!(
        fact.explanation().as_deref(),
        Some("Chunki Yuqori bosim issiqlik hosil qiladi")
    );
}

#[test]
fn test_ensure_connective_is_case_insensitive() {
    assert_eq!(ensure_connective("chunki u tez"), "chunki u tez");
    assert_eq!(ensure_connective("CHUNKI u tez"), "CHUNKI u tez");
    assert_eq!(ensure_connective("u tez"), "Chunki u tez");
}

#[test]
fn test_strip_quotes_removes_all_quote_styles() {
    assert_eq!(strip_quotes("\"Suv\" “muz” «bug»"), "Suv muz bug");
    assert_eq!(strip_quotes("  plain  "), "plain");
}

#[test]
fn test_strip_parenthetical_cuts_from_first_paren() {
    assert_eq!(strip_parenthetical("Kit sut emizuvchi (baliq emas) hayvon"), "Kit sut emizuvchi");
    assert_eq!(strip_parenthetical("No parens here"), "No parens here");
}

#[test]
fn test_missing_keywords_use_default() {
    let (body, keywords) = split_keywords("Fakt\nChunki sabab");
    assert_eq!(body, "Fakt\nChunki sabab");
    assert_eq!(keywords, DEFAULT_KEYWORDS);

    let fact = parse_reply("Fakt\nChunki sabab").expect("reply should parse");
    assert_eq!(fact.keywords(), &vec!["interesting fact", "world", "nature"]);
}

#[test]
fn test_keywords_keep_first_line_only() {
    let (_, keywords) = split_keywords("Fakt\n[keywords: bee, flower]\nHope you enjoy!");
    assert_eq!(keywords, "bee, flower");
}

#[test]
fn test_split_lines_drops_blank_lines() {
    assert_eq!(split_lines("  a \n\n   \n b"), vec!["a", "b"]);
}

#[test]
fn test_single_line_split_on_connective() {
    let fact = parse_reply("Qor oq ko'rinadi Chunki yorug'likni qaytaradi [keywords: snow]")
        .expect("reply should parse");

    assert_eq!(fact.statement(), "Qor oq ko'rinadi");
    assert_eq!(
        fact.explanation().as_deref(),
        Some("Chunki yorug'likni qaytaradi")
    );
    assert_eq!(fact.keywords(), &vec!["snow"]);
}

#[test]
fn test_repeated_connective_keeps_whole_body() {
    assert!(split_on_connective("a Chunki b Chunki c").is_none());

    let fact = parse_reply("a Chunki b Chunki c").expect("reply should parse");
    assert_eq!(fact.statement(), "a Chunki b Chunki c");
    assert!(fact.explanation().is_none());
}

#[test]
fn test_quotes_and_parenthetical_are_removed_before_splitting() {
    let fact = parse_reply("\"Asalari raqs bilan gaplashadi\"\nChunki raqs yo'nalishni bildiradi")
        .expect("reply should parse");

    assert_eq!(fact.statement(), "Asalari raqs bilan gaplashadi");
    assert_eq!(
        fact.explanation().as_deref(),
        Some("Chunki raqs yo'nalishni bildiradi")
    );
}

#[test]
fn test_empty_statement_is_parse_failure() {
    assert!(parse_reply("").is_none());
    assert!(parse_reply("   \n  ").is_none());
    assert!(parse_reply("(only a note)").is_none());
    assert!(parse_reply("[keywords: moon]").is_none());
}
