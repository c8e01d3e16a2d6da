use super::*;

/// Tests extracting the token from the Authorization header.
///
/// Expected: scheme matched case-insensitively, surrounding whitespace trimmed
#[test]
fn extracts_bearer_token() {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer  abc.def.ghi "));

    assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
}

/// Tests headers that do not carry a bearer token.
///
/// Expected: None for a missing header, another scheme and an empty token
#[test]
fn rejects_other_schemes() {
    assert_eq!(bearer_token(&HeaderMap::new()), None);
    assert_eq!(strip_bearer("Basic dXNlcjpwYXNz"), None);
    assert_eq!(strip_bearer("Bearer "), None);
    assert_eq!(strip_bearer("Bearer"), None);
}
