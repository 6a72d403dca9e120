/// Canonicalize free text into the stable comparison form used for
/// fingerprinting and fuzzy matching: lowercase, drop every character
/// outside `[a-z0-9]` and whitespace, then collapse whitespace runs to
/// single spaces and trim.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`. Stripping happens
/// before the collapse so that a removed symbol between two spaces cannot
/// leave a double space behind.
pub fn normalize(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Permissive title similarity used only as a fallback identification
/// heuristic: after normalization, true iff either side is a substring of
/// the other. Tuned for OCR noise, not precision: short common names can
/// false-positive, so callers must treat a fuzzy hit as weaker evidence
/// than an exact fingerprint match.
pub fn fuzzy_match(a: &str, b: &str) -> bool {
    let na = normalize(a);
    let nb = normalize(b);
    if na.is_empty() || nb.is_empty() {
        return false;
    }
    na.contains(&nb) || nb.contains(&na)
}
