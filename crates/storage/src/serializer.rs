use serde::Serialize;

use memstore_common::{StorageError, StorageResult};

/// Converte um valor arbitrário na forma canônica armazenada.
///
/// Strings passam intactas (sem aspas). Qualquer outro valor vira JSON
/// compacto; objetos saem com as chaves ordenadas, então a mesma entrada
/// sempre produz a mesma string.
pub fn serialize<T>(value: &T) -> StorageResult<String>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => Ok(s),
        Ok(other) => Ok(other.to_string()),
        Err(e) => Err(StorageError::Serialization(e.to_string())),
    }
}
