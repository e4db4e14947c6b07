/// Canonical token of a header: lowercase, ASCII letters and digits only.
///
/// Total over any input; `""` maps to `""`.
pub fn normalize(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
