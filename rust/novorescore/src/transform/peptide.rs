/// Isoleucine -> leucine (mass-degenerate) and parentheses stripped.
/// Idempotent.
pub fn normalize_peptide(peptide: &str) -> String {
    peptide
        .chars()
        .filter(|c| *c != '(' && *c != ')')
        .map(|c| if c == 'I' { 'L' } else { c })
        .collect()
}

/// Applies the ordered literal replacements mapping inline mass shifts to
/// bracket tags, eg. `M+15.995` -> `M[ox]`.
pub fn to_bracket_notation(peptide: &str, mappings: &[(String, String)]) -> String {
    let mut out = peptide.to_string();
    for (from, to) in mappings.iter() {
        if out.contains(from.as_str()) {
            out = out.replace(from.as_str(), to);
        }
    }
    out
}

/// Only ASCII letters are kept.
pub fn bare_peptide(peptide: &str) -> String {
    peptide.chars().filter(|c| c.is_ascii_alphabetic()).collect()
}

pub fn peptidoform_string(bracket_peptide: &str, charge: i32) -> String {
    format!("{}/{}", bracket_peptide, charge)
}
