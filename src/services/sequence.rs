//! Contador sequencial dos veículos (posição exibida `Nº NNN`)
//!
//! Independente do gerador de IDs. Satura em 999: a partir daí todo veículo
//! novo recebe 999 de novo.

use tracing::warn;

use crate::models::vehicle::MAX_SEQUENTIAL;
use crate::repositories::VehicleStore;
use crate::utils::errors::AppResult;

/// Próximo sequencial a partir do maior valor gravado
pub fn next_after(max: Option<i32>) -> i32 {
    match max {
        None => 1,
        Some(max) => (max + 1).clamp(1, MAX_SEQUENTIAL),
    }
}

/// Ler o maior sequencial e calcular o próximo
pub async fn next_sequence(store: &dyn VehicleStore) -> AppResult<i32> {
    let max = store.max_sequential().await?;
    let next = next_after(max);
    if max == Some(MAX_SEQUENTIAL) {
        warn!("⚠️ Sequencial atingiu o limite de {}; repetindo o valor", MAX_SEQUENTIAL);
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Supplier, Vehicle, VehicleStatus};
    use crate::repositories::memory::MemoryStore;
    use crate::repositories::SupplierStore;

    #[test]
    fn test_next_after() {
        assert_eq!(next_after(None), 1);
        assert_eq!(next_after(Some(1)), 2);
        assert_eq!(next_after(Some(998)), 999);
        assert_eq!(next_after(Some(999)), 999);
    }

    #[tokio::test]
    async fn test_next_sequence_reads_store() {
        let store = MemoryStore::new();
        assert_eq!(next_sequence(&store).await.unwrap(), 1);

        SupplierStore::insert(
            &store,
            &Supplier {
                id: "S1".into(),
                name: "Acme".into(),
                contact_person: None,
                whatsapp: None,
            },
        )
        .await
        .unwrap();
        VehicleStore::insert(
            &store,
            &Vehicle {
                id: "V1".into(),
                supplier_id: "S1".into(),
                plate: "ABC1234".into(),
                asset_tag: "1".into(),
                status: VehicleStatus::Ok,
                sequential: 41,
                photo1: None,
                photo2: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(next_sequence(&store).await.unwrap(), 42);
    }
}
