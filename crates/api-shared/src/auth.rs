use rx_types::NonEmptyText;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthHeaderError {
    #[error("Missing authorization header")]
    Missing,
    #[error("Authorization header must use the Bearer scheme")]
    Malformed,
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched exactly; anything after the first space is the token.
pub fn bearer_token(header: Option<&str>) -> Result<NonEmptyText, AuthHeaderError> {
    let header = header.ok_or(AuthHeaderError::Missing)?;

    match header.split_once(' ') {
        Some(("Bearer", token)) => {
            NonEmptyText::new(token).map_err(|_| AuthHeaderError::Malformed)
        }
        _ => Err(AuthHeaderError::Malformed),
    }
}
