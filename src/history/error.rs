use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Message for end users naming the action that failed, e.g. "Failed to save game: ...".
    pub fn user_message(&self, action: &str) -> String {
        format!("Failed to {action}: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_names_the_action() {
        let err = StoreError::NotFound("game");
        assert!(err.is_not_found());
        assert_eq!(err.user_message("load game"), "Failed to load game: game not found");

        let err = StoreError::validation("limit must be greater than zero");
        assert!(err.is_validation());
        assert_eq!(
            err.user_message("load high scores"),
            "Failed to load high scores: validation error: limit must be greater than zero"
        );
    }
}
