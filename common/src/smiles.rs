//! Syntactic SMILES checks.
//!
//! [`validate`] is a heuristic: it looks at the character set and at bracket
//! balance only. Valence, aromaticity, ring closures and the rest of the SMILES
//! grammar are left to the prediction service.

fn is_smiles_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '@' | '+' | '-' | '[' | ']' | '(' | ')' | '\\' | '/' | '=' | '#' | '%' | '.' | '*'
        )
}

/// Returns `true` if `smiles` is at least two characters long, uses only
/// SMILES characters and has balanced `()` / `[]` pairs.
pub fn validate(smiles: &str) -> bool {
    if smiles.chars().count() < 2 {
        return false;
    }

    if !smiles.chars().all(is_smiles_char) {
        return false;
    }

    let mut stack = Vec::new();
    for c in smiles.chars() {
        match c {
            '(' => stack.push(')'),
            '[' => stack.push(']'),
            ')' | ']' => {
                if stack.pop() != Some(c) {
                    return false;
                }
            }
            _ => {}
        }
    }

    stack.is_empty()
}

/// Splits an uploaded file into SMILES strings, one per line.
///
/// Lines are trimmed; lines shorter than `min_len` characters (and always
/// empty ones) are dropped. Order is preserved.
pub fn parse_smiles_list(text: &str, min_len: usize) -> Vec<String> {
    let min_len = min_len.max(1);
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).trim())
        .filter(|line| line.chars().count() >= min_len)
        .map(str::to_string)
        .collect()
}
