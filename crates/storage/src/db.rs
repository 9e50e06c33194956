use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::time::{Duration, Instant};
use tracing::debug;

use memstore_common::{StorageError, StorageResult};

use crate::config::StoreConfig;
use crate::entry::{Entry, Value};
use crate::expiry::{ExpiryWorker, WorkerState, purge_expired};
use crate::serializer::serialize;

/// Mapa chave → entrada, protegido por um único RwLock para o store todo.
#[derive(Default)]
pub(crate) struct Keyspace {
    pub(crate) data: RwLock<HashMap<String, Entry>>,
}

/// Handle para o store in-memory.
///
/// Clonar é barato: todos os clones compartilham o mesmo keyspace e o mesmo
/// worker de expiração. Quando o último clone é dropado o worker para.
#[derive(Clone)]
pub struct Store {
    keyspace: Arc<Keyspace>,
    worker: Arc<ExpiryWorker>,
}

impl Store {
    /// Cria um store com o worker de expiração já rodando.
    ///
    /// Precisa ser chamado dentro de um runtime Tokio.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        let keyspace = Arc::new(Keyspace::default());
        let worker = Arc::new(ExpiryWorker::new(keyspace.clone(), config.sweep_interval));
        worker.start();

        Store { keyspace, worker }
    }

    // --- String operations ---

    /// Grava um escalar, substituindo qualquer entrada anterior.
    /// `ttl_seconds == 0` significa sem expiração.
    pub fn set<T>(&self, key: impl Into<String>, value: &T, ttl_seconds: i64) -> StorageResult<()>
    where
        T: Serialize + ?Sized,
    {
        if ttl_seconds < 0 {
            return Err(StorageError::InvalidTtl(ttl_seconds));
        }
        let value = serialize(value)?;

        // TTL além do alcance do relógio equivale a nunca expirar.
        let expires_at = (ttl_seconds > 0)
            .then(|| Instant::now().checked_add(Duration::from_secs(ttl_seconds as u64)))
            .flatten();

        self.keyspace
            .data
            .write()
            .insert(key.into(), Entry::new(Value::String(value), expires_at));
        Ok(())
    }

    pub fn get(&self, key: &str) -> StorageResult<String> {
        // Caminho rápido: lock compartilhado enquanto a entrada estiver viva.
        {
            let data = self.keyspace.data.read();
            let entry = data.get(key).ok_or(StorageError::KeyNotFound)?;
            if !entry.is_expired() {
                return entry.value.as_str().map(str::to_owned);
            }
        }

        // Expirada: o lock de leitura já foi solto, então a entrada pode ter
        // sido removida ou substituída. Revalidar sob o lock exclusivo.
        let mut data = self.keyspace.data.write();
        let entry = live_entry_mut(&mut data, key)?;
        entry.value.as_str().map(str::to_owned)
    }

    /// Troca o valor de um escalar existente, preservando o TTL.
    pub fn update<T>(&self, key: &str, value: &T) -> StorageResult<()>
    where
        T: Serialize + ?Sized,
    {
        let value = serialize(value)?;

        let mut data = self.keyspace.data.write();
        let entry = live_entry_mut(&mut data, key)?;
        match &mut entry.value {
            Value::String(current) => {
                *current = value;
                Ok(())
            }
            Value::List(_) => Err(StorageError::TypeMismatch),
        }
    }

    /// Remove a chave. Uma entrada já expirada também é removida, mas é
    /// reportada como inexistente.
    pub fn remove(&self, key: &str) -> StorageResult<()> {
        match self.keyspace.data.write().remove(key) {
            Some(entry) if !entry.is_expired() => Ok(()),
            _ => Err(StorageError::KeyNotFound),
        }
    }

    // --- List operations ---

    /// Insere `item` na frente da lista, criando-a se preciso.
    ///
    /// A lista funciona como pilha: o último item empurrado é o primeiro a
    /// sair no `pop`. Listas criadas aqui nunca expiram.
    pub fn push<T>(&self, key: &str, item: &T) -> StorageResult<()>
    where
        T: Serialize + ?Sized,
    {
        let item = serialize(item)?;

        let mut data = self.keyspace.data.write();
        let entry = data.entry(key.to_string()).or_insert_with(Entry::empty_list);

        // Entrada expirada é substituída na mesma seção crítica
        if entry.is_expired() {
            debug!("chave expirada recriada como lista: {key}");
            *entry = Entry::empty_list();
        }

        entry.value.as_list_mut()?.push_front(item);
        Ok(())
    }

    /// Remove e retorna o item da frente da lista.
    pub fn pop(&self, key: &str) -> StorageResult<String> {
        let mut data = self.keyspace.data.write();
        let entry = live_entry_mut(&mut data, key)?;
        entry
            .value
            .as_list_mut()?
            .pop_front()
            .ok_or(StorageError::EmptyList)
    }

    /// Forma canônica com que `value` seria armazenado.
    pub fn serialize<T>(value: &T) -> StorageResult<String>
    where
        T: Serialize + ?Sized,
    {
        serialize(value)
    }

    // --- Keyspace ---

    /// Número de entradas no mapa, incluindo expiradas ainda não removidas.
    pub fn len(&self) -> usize {
        self.keyspace.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Executa uma varredura completa agora. Retorna quantas chaves removeu.
    pub fn purge_expired(&self) -> usize {
        purge_expired(&self.keyspace, None)
    }

    // --- Expiry worker ---

    /// Inicia o worker de expiração. Se já estiver rodando, reinicia.
    pub fn start_expiry_worker(&self) {
        self.worker.start();
    }

    /// Para o worker de expiração. Idempotente; a expiração lazy continua.
    pub fn stop_expiry_worker(&self) {
        self.worker.stop();
    }

    pub fn expiry_worker_state(&self) -> WorkerState {
        self.worker.state()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Busca a entrada sob o lock exclusivo, removendo-a se estiver expirada.
fn live_entry_mut<'a>(
    data: &'a mut HashMap<String, Entry>,
    key: &str,
) -> StorageResult<&'a mut Entry> {
    let expired = data.get(key).ok_or(StorageError::KeyNotFound)?.is_expired();
    if expired {
        data.remove(key);
        debug!("chave expirada removida: {key}");
        return Err(StorageError::KeyNotFound);
    }
    data.get_mut(key).ok_or(StorageError::KeyNotFound)
}
