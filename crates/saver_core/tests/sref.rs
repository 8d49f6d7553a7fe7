use saver_core::{extract_sref, SrefError};

#[test]
fn extracts_code_from_first_matching_url() {
    let urls = (0..8)
        .map(|i| format!("https://cdn.example.com/styles/0_123456/{i}_640_N.webp"))
        .collect::<Vec<_>>();

    let code = extract_sref(urls.iter().map(String::as_str)).unwrap();
    assert_eq!(code.as_str(), "123456");
}

#[test]
fn skips_urls_without_the_segment() {
    let urls = [
        "https://cdn.example.com/banners/hero.webp",
        "https://cdn.example.com/styles/0_42/1_640_N.webp",
    ];

    let code = extract_sref(urls).unwrap();
    assert_eq!(code.as_str(), "42");
}

#[test]
fn fails_when_no_url_matches() {
    let urls = ["https://cdn.example.com/banners/hero.webp"];
    assert_eq!(extract_sref(urls), Err(SrefError::NoMatch));
}

#[test]
fn fails_on_empty_input() {
    assert_eq!(extract_sref(Vec::<&str>::new()), Err(SrefError::NoMatch));
}

#[test]
fn segment_requires_the_zero_prefix() {
    // `styles/1_...` is a different grid kind and must not match.
    let urls = ["https://cdn.example.com/styles/1_123/1_640_N.webp"];
    assert_eq!(extract_sref(urls), Err(SrefError::NoMatch));
}
