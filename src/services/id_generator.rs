//! Gerador de identificadores
//!
//! IDs têm o formato `AAAAMMDDhhmmXXX`: o minuto atual seguido de um sufixo
//! de três dígitos, o primeiro livre entre `000` e `999` na coleção.
//!
//! A leitura dos IDs existentes não reserva nada. Dois pedidos no mesmo
//! minuto podem escolher o mesmo sufixo, por isso quem insere deve segurar
//! o guard de [`NamespaceLocks`] entre `allocate` e o `INSERT`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{error, info};

use crate::models::Namespace;
use crate::repositories::IdentifierSource;
use crate::utils::errors::{AppError, AppResult};

/// Quantidade de sufixos por minuto (`000`..=`999`)
pub const SUFFIXES_PER_MINUTE: u32 = 1000;

/// Fonte de tempo injetável
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Relógio local do sistema
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Relógio parado, para testes
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Prefixo de 12 caracteres com resolução de minuto
pub fn time_prefix(timestamp: NaiveDateTime) -> String {
    timestamp.format("%Y%m%d%H%M").to_string()
}

/// Primeiro ID livre para o prefixo, ou `AllocatorExhausted`
pub fn pick_free_suffix(
    namespace: Namespace,
    prefix: &str,
    existing: &HashSet<String>,
) -> AppResult<String> {
    (0..SUFFIXES_PER_MINUTE)
        .map(|seq| format!("{}{:03}", prefix, seq))
        .find(|candidate| !existing.contains(candidate))
        .ok_or_else(|| AppError::AllocatorExhausted {
            namespace: namespace.to_string(),
            prefix: prefix.to_string(),
        })
}

/// Alocador de IDs por coleção
#[derive(Clone)]
pub struct IdAllocator {
    source: Arc<dyn IdentifierSource>,
    clock: Arc<dyn Clock>,
}

impl IdAllocator {
    pub fn new(source: Arc<dyn IdentifierSource>, clock: Arc<dyn Clock>) -> Self {
        Self { source, clock }
    }

    /// Gerar um ID para o minuto atual do relógio
    pub async fn allocate(&self, namespace: Namespace) -> AppResult<String> {
        self.allocate_at(namespace, self.clock.now()).await
    }

    /// Gerar um ID para um instante explícito
    #[tracing::instrument(skip(self))]
    pub async fn allocate_at(
        &self,
        namespace: Namespace,
        timestamp: NaiveDateTime,
    ) -> AppResult<String> {
        let prefix = time_prefix(timestamp);
        let existing = self.source.ids_with_prefix(namespace, &prefix).await?;

        match pick_free_suffix(namespace, &prefix, &existing) {
            Ok(id) => {
                info!("🆔 ID gerado: {} para {}", id, namespace);
                Ok(id)
            }
            Err(e) => {
                error!("❌ Erro ao gerar ID para {}: {}", namespace, e);
                Err(e)
            }
        }
    }
}

/// Exclusão mútua por coleção para o par alocar + inserir
#[derive(Clone, Default)]
pub struct NamespaceLocks {
    fornecedores: Arc<Mutex<()>>,
    veiculos: Arc<Mutex<()>>,
}

impl NamespaceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, namespace: Namespace) -> MutexGuard<'_, ()> {
        match namespace {
            Namespace::Fornecedores => self.fornecedores.lock().await,
            Namespace::Veiculos => self.veiculos.lock().await,
        }
    }
}
