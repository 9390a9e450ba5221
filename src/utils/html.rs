/// Whether `input` has no visible text once markup is removed.
///
/// Quiz text is stored and returned exactly as written, and clients display it
/// as plain text. Markup is only inspected here so that a field made of tags
/// alone (`<script>x</script>`, `<iframe></iframe>`) counts as blank.
pub fn is_blank_text(input: &str) -> bool {
    ammonia::Builder::empty()
        .clean(input)
        .to_string()
        .trim()
        .is_empty()
}
