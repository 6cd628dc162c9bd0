//! Moderation predicates. Pure functions over request data.

/// True when the `Accept-Language` header is empty or mentions a blocked
/// language subtag anywhere (plain substring match, lowercased).
pub fn is_blocked_locale(accept_language: &str, blocked: &[String]) -> bool {
    let lang = accept_language.trim().to_lowercase();
    if lang.is_empty() {
        return true;
    }
    blocked.iter().any(|b| lang.contains(&b.to_lowercase()))
}

/// True when `message` contains any denylisted substring.
pub fn contains_banned_word(message: &str, banned: &[String]) -> bool {
    banned.iter().any(|w| !w.is_empty() && message.contains(w.as_str()))
}
