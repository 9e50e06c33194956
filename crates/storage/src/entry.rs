use std::collections::VecDeque;
use tokio::time::Instant;

use memstore_common::{StorageError, StorageResult};

/// Tipo do valor armazenado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    /// Frente da lista = índice 0.
    List(VecDeque<String>),
}

impl Value {
    pub fn as_str(&self) -> StorageResult<&str> {
        match self {
            Value::String(s) => Ok(s.as_str()),
            Value::List(_) => Err(StorageError::TypeMismatch),
        }
    }

    pub fn as_list_mut(&mut self) -> StorageResult<&mut VecDeque<String>> {
        match self {
            Value::List(list) => Ok(list),
            Value::String(_) => Err(StorageError::TypeMismatch),
        }
    }
}

/// Entrada no store: valor + TTL opcional.
#[derive(Debug, Clone)]
pub struct Entry {
    pub value: Value,
    pub expires_at: Option<Instant>,
}

impl Entry {
    pub fn new(value: Value, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }

    /// Lista vazia sem expiração, como criada pelo PUSH.
    pub fn empty_list() -> Self {
        Self::new(Value::List(VecDeque::new()), None)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.map(|t| now >= t).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Duration;

    #[test]
    fn no_expiry_is_always_live() {
        let entry = Entry::new(Value::String("v".into()), None);
        assert!(!entry.is_expired_at(Instant::now() + Duration::from_secs(86_400)));
    }

    #[test]
    fn expired_at_the_exact_instant() {
        let at = Instant::now() + Duration::from_secs(5);
        let entry = Entry::new(Value::String("v".into()), Some(at));
        assert!(!entry.is_expired_at(at - Duration::from_millis(1)));
        assert!(entry.is_expired_at(at));
    }

    #[test]
    fn value_accessors_reject_other_kind() {
        let mut list = Entry::empty_list().value;
        assert_eq!(list.as_str(), Err(StorageError::TypeMismatch));
        assert!(list.as_list_mut().unwrap().is_empty());

        let mut scalar = Value::String("x".into());
        assert_eq!(scalar.as_str(), Ok("x"));
        assert_eq!(scalar.as_list_mut(), Err(StorageError::TypeMismatch));
    }
}
