/// Erros do engine de armazenamento.
///
/// Todos são resultados esperados e recuperáveis: nenhum deles derruba o
/// store nem o worker de expiração.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("chave não encontrada")]
    KeyNotFound,
    #[error("operação não suportada para este tipo de dado")]
    TypeMismatch,
    #[error("TTL inválido: {0}")]
    InvalidTtl(i64),
    #[error("lista vazia")]
    EmptyList,
    #[error("falha ao serializar valor para JSON: {0}")]
    Serialization(String),
}

impl StorageError {
    /// Nome estável do tipo de erro, usado nos logs da API.
    pub fn kind(&self) -> &'static str {
        match self {
            StorageError::KeyNotFound => "key_not_found",
            StorageError::TypeMismatch => "type_mismatch",
            StorageError::InvalidTtl(_) => "invalid_ttl",
            StorageError::EmptyList => "empty_list",
            StorageError::Serialization(_) => "serialization_failure",
        }
    }
}

/// Result type alias.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_not_found_display() {
        let err = StorageError::KeyNotFound;
        assert_eq!(err.to_string(), "chave não encontrada");
    }

    #[test]
    fn invalid_ttl_display() {
        let err = StorageError::InvalidTtl(-3);
        assert_eq!(err.to_string(), "TTL inválido: -3");
    }

    #[test]
    fn serialization_keeps_cause() {
        let err = StorageError::Serialization("key must be a string".into());
        assert!(err.to_string().ends_with("key must be a string"));
    }

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            StorageError::KeyNotFound.kind(),
            StorageError::TypeMismatch.kind(),
            StorageError::InvalidTtl(-1).kind(),
            StorageError::EmptyList.kind(),
            StorageError::Serialization(String::new()).kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
