use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::debug;

use crate::db::Keyspace;

/// Estado observável do worker de expiração.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    Stopped,
}

/// Execução corrente da varredura: sinal de cancelamento + task.
struct Sweep {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Sweep {
    fn cancel(self) {
        // Err só acontece se a task já terminou.
        let _ = self.cancel.send(true);
    }
}

/// Worker que remove periodicamente as chaves expiradas.
///
/// Reiniciável: `start` cancela a execução anterior e instala um sinal novo;
/// `stop` é idempotente. Ao ser dropado, cancela a varredura em curso.
pub(crate) struct ExpiryWorker {
    keyspace: Arc<Keyspace>,
    period: Duration,
    sweep: Mutex<Option<Sweep>>,
}

impl ExpiryWorker {
    pub(crate) fn new(keyspace: Arc<Keyspace>, period: Duration) -> Self {
        Self {
            keyspace,
            // tokio::time::interval não aceita período zero
            period: period.max(Duration::from_millis(1)),
            sweep: Mutex::new(None),
        }
    }

    pub(crate) fn start(&self) {
        let mut sweep = self.sweep.lock();
        if let Some(previous) = sweep.take() {
            previous.cancel();
            debug!("worker de expiração reiniciado");
        }

        let (cancel, cancelled) = watch::channel(false);
        let handle = tokio::spawn(run_sweep(self.keyspace.clone(), self.period, cancelled));
        *sweep = Some(Sweep { cancel, handle });
    }

    pub(crate) fn stop(&self) {
        if let Some(sweep) = self.sweep.lock().take() {
            sweep.cancel();
            debug!("worker de expiração parado");
        }
    }

    pub(crate) fn state(&self) -> WorkerState {
        match &*self.sweep.lock() {
            Some(sweep) if !sweep.handle.is_finished() => WorkerState::Running,
            _ => WorkerState::Stopped,
        }
    }
}

impl Drop for ExpiryWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Loop da varredura ativa. Termina quando `cancelled` vira `true` ou o
/// sender é dropado.
pub(crate) async fn run_sweep(
    keyspace: Arc<Keyspace>,
    period: Duration,
    mut cancelled: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // O primeiro tick do interval é imediato
    ticker.tick().await;

    loop {
        if *cancelled.borrow() {
            break;
        }

        tokio::select! {
            _ = ticker.tick() => {
                let removed = purge_expired(&keyspace, Some(&cancelled));
                if removed > 0 {
                    debug!("varredura removeu {removed} chaves expiradas");
                }
            }
            changed = cancelled.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}

/// Remove todas as entradas expiradas sob o lock exclusivo.
///
/// O cancelamento é checado entre entradas, então uma varredura longa pode
/// ser interrompida no meio; o que já foi coletado até ali é removido.
pub(crate) fn purge_expired(keyspace: &Keyspace, cancelled: Option<&watch::Receiver<bool>>) -> usize {
    let now = Instant::now();
    let mut data = keyspace.data.write();

    let mut expired = Vec::new();
    for (key, entry) in data.iter() {
        if cancelled.is_some_and(|c| *c.borrow()) {
            break;
        }
        if entry.is_expired_at(now) {
            expired.push(key.clone());
        }
    }

    for key in &expired {
        data.remove(key);
    }
    expired.len()
}
