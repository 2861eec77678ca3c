use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of generated document ids
pub const DOCUMENT_ID_LEN: usize = 20;

/// Generates a random 20-character alphanumeric document id
pub fn generate_document_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(DOCUMENT_ID_LEN)
        .map(char::from)
        .collect()
}

/// Validates document id format (20 ASCII alphanumerics)
pub fn is_valid_document_id(id: &str) -> bool {
    id.len() == DOCUMENT_ID_LEN && id.chars().all(|c| c.is_ascii_alphanumeric())
}
