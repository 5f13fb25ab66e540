use sqlx::PgPool;

use super::{VehicleStore, SUPPLIER_MISSING_MESSAGE};
use crate::models::Vehicle;
use crate::utils::errors::{map_constraint_error, not_found_error, AppError, AppResult};

// Linha da tabela veiculos, com o status ainda como texto
#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: String,
    id_fornecedor: String,
    placa: String,
    ativo: String,
    status: String,
    sequencial: i32,
    foto1: Option<String>,
    foto2: Option<String>,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = AppError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        Ok(Vehicle {
            status: row
                .status
                .parse()
                .map_err(|_| AppError::Internal(format!("Status desconhecido no banco: {}", row.status)))?,
            id: row.id,
            supplier_id: row.id_fornecedor,
            plate: row.placa,
            asset_tag: row.ativo,
            sequential: row.sequencial,
            photo1: row.foto1,
            photo2: row.foto2,
        })
    }
}

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VehicleStore for PgVehicleRepository {
    async fn insert(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            INSERT INTO veiculos (id, id_fornecedor, placa, ativo, status, sequencial, foto1, foto2)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&vehicle.id)
        .bind(&vehicle.supplier_id)
        .bind(&vehicle.plate)
        .bind(&vehicle.asset_tag)
        .bind(vehicle.status.as_str())
        .bind(vehicle.sequential)
        .bind(&vehicle.photo1)
        .bind(&vehicle.photo2)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, SUPPLIER_MISSING_MESSAGE))?;

        row.try_into()
    }

    async fn update(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            UPDATE veiculos
            SET id_fornecedor = $2, placa = $3, ativo = $4, status = $5,
                sequencial = $6, foto1 = $7, foto2 = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(&vehicle.id)
        .bind(&vehicle.supplier_id)
        .bind(&vehicle.plate)
        .bind(&vehicle.asset_tag)
        .bind(vehicle.status.as_str())
        .bind(vehicle.sequential)
        .bind(&vehicle.photo1)
        .bind(&vehicle.photo2)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, SUPPLIER_MISSING_MESSAGE))?;

        row.ok_or_else(|| not_found_error("Veículo", &vehicle.id))?
            .try_into()
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM veiculos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Veículo", id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, VehicleRow>("SELECT * FROM veiculos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Vehicle::try_from).transpose()
    }

    async fn list_all(&self) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>("SELECT * FROM veiculos ORDER BY sequencial")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Vehicle::try_from).collect()
    }

    async fn max_sequential(&self) -> AppResult<Option<i32>> {
        let result: (Option<i32>,) = sqlx::query_as("SELECT MAX(sequencial) FROM veiculos")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}
