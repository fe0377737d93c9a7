//! Almacenamiento en PostgreSQL
//!
//! Implementación de los traits del store sobre SQLx. Las dos garantías de
//! concurrencia se delegan a la base de datos: el compare-and-set es un
//! `UPDATE ... WHERE status = $from` y el alquiler único activo por coche
//! lo impone un índice único parcial, cuya violación se traduce a `false`
//! en vez de a error.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool};
use uuid::Uuid;

use crate::models::car::{Car, CarCategory, CarStatus};
use crate::models::rental::Rental;
use crate::models::user::User;
use crate::store::{CarStore, RentalStore, StoreError, UserStore, ONE_ACTIVE_RENTAL_PER_CAR};

/// Esquema de la base de datos. Idempotente: se ejecuta en cada arranque.
const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS cars (
        id UUID PRIMARY KEY,
        number TEXT NOT NULL,
        category TEXT NOT NULL,
        name TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    );

    CREATE UNIQUE INDEX IF NOT EXISTS cars_number_key ON cars (number);

    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        name TEXT NOT NULL,
        contact_number TEXT NOT NULL,
        email TEXT NOT NULL,
        address TEXT,
        created_at TIMESTAMPTZ NOT NULL
    );

    CREATE UNIQUE INDEX IF NOT EXISTS users_username_key ON users (username);

    CREATE TABLE IF NOT EXISTS rentals (
        id UUID PRIMARY KEY,
        car_id UUID NOT NULL REFERENCES cars (id),
        user_id UUID NOT NULL REFERENCES users (id),
        start_date DATE NOT NULL,
        end_date DATE NOT NULL,
        cost NUMERIC(12, 2) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        returned_at TIMESTAMPTZ
    );

    -- Como máximo una fila activa (returned_at IS NULL) por coche
    CREATE UNIQUE INDEX IF NOT EXISTS rentals_one_active_per_car
        ON rentals (car_id) WHERE returned_at IS NULL;

    CREATE INDEX IF NOT EXISTS rentals_user_idx ON rentals (user_id);
"#;

/// Store sobre PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crea las tablas e índices si no existen todavía
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.pool.execute(SCHEMA).await.map_err(map_db_err)?;
        Ok(())
    }
}

/// Traduce errores de SQLx distinguiendo violaciones de unicidad, que los
/// servicios interpretan por nombre de constraint
fn map_db_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.kind() == sqlx::error::ErrorKind::UniqueViolation {
            return StoreError::UniqueViolation {
                constraint: db.constraint().unwrap_or("").to_string(),
            };
        }
    }
    StoreError::Database(err.to_string())
}

#[derive(Debug, sqlx::FromRow)]
struct CarRow {
    id: Uuid,
    number: String,
    category: String,
    name: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl CarRow {
    fn into_car(self) -> Result<Car, StoreError> {
        let status = CarStatus::parse(&self.status).ok_or_else(|| {
            StoreError::Database(format!(
                "car {} has corrupt status '{}'",
                self.id, self.status
            ))
        })?;
        Ok(Car {
            id: self.id,
            number: self.number,
            category: CarCategory::parse(&self.category),
            name: self.name,
            status,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RentalRow {
    id: Uuid,
    car_id: Uuid,
    user_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    cost: Decimal,
    created_at: DateTime<Utc>,
    returned_at: Option<DateTime<Utc>>,
}

impl From<RentalRow> for Rental {
    fn from(row: RentalRow) -> Self {
        Rental {
            id: row.id,
            car_id: row.car_id,
            user_id: row.user_id,
            start_date: row.start_date,
            end_date: row.end_date,
            cost: row.cost,
            created_at: row.created_at,
            returned_at: row.returned_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    name: String,
    contact_number: String,
    email: String,
    address: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            name: row.name,
            contact_number: row.contact_number,
            email: row.email,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

#[async_trait::async_trait]
impl CarStore for PgStore {
    async fn create(&self, car: &Car) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO cars (id, number, category, name, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(car.id)
        .bind(&car.number)
        .bind(car.category.as_str())
        .bind(&car.name)
        .bind(car.status.as_str())
        .bind(car.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Car>, StoreError> {
        let row = sqlx::query_as::<_, CarRow>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.map(CarRow::into_car).transpose()
    }

    async fn get_by_number(&self, number: &str) -> Result<Option<Car>, StoreError> {
        let row = sqlx::query_as::<_, CarRow>("SELECT * FROM cars WHERE number = $1")
            .bind(number)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.map(CarRow::into_car).transpose()
    }

    async fn list(&self) -> Result<Vec<Car>, StoreError> {
        let rows = sqlx::query_as::<_, CarRow>("SELECT * FROM cars ORDER BY number")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(CarRow::into_car).collect()
    }

    async fn list_by_status(&self, status: CarStatus) -> Result<Vec<Car>, StoreError> {
        let rows =
            sqlx::query_as::<_, CarRow>("SELECT * FROM cars WHERE status = $1 ORDER BY number")
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_err)?;

        rows.into_iter().map(CarRow::into_car).collect()
    }

    async fn transition(
        &self,
        id: Uuid,
        from: CarStatus,
        to: CarStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE cars SET status = $3 WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait::async_trait]
impl RentalStore for PgStore {
    async fn create_if_car_free(&self, rental: &Rental) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO rentals (id, car_id, user_id, start_date, end_date, cost, created_at, returned_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NULL)
            "#,
        )
        .bind(rental.id)
        .bind(rental.car_id)
        .bind(rental.user_id)
        .bind(rental.start_date)
        .bind(rental.end_date)
        .bind(rental.cost)
        .bind(rental.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) => {
                let err = map_db_err(err);
                // El índice parcial rechaza el segundo alquiler activo:
                // eso es un "coche ocupado", no un error de almacenamiento
                if err.is_unique_violation(ONE_ACTIVE_RENTAL_PER_CAR) {
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }

    async fn get_active_by_car(&self, car_id: Uuid) -> Result<Option<Rental>, StoreError> {
        let row = sqlx::query_as::<_, RentalRow>(
            "SELECT * FROM rentals WHERE car_id = $1 AND returned_at IS NULL",
        )
        .bind(car_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(row.map(Rental::from))
    }

    async fn close_active_by_car(
        &self,
        car_id: Uuid,
        returned_at: DateTime<Utc>,
    ) -> Result<Option<Rental>, StoreError> {
        let row = sqlx::query_as::<_, RentalRow>(
            r#"
            UPDATE rentals SET returned_at = $2
            WHERE car_id = $1 AND returned_at IS NULL
            RETURNING *
            "#,
        )
        .bind(car_id)
        .bind(returned_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(row.map(Rental::from))
    }

    async fn list_active_by_user(&self, user_id: Uuid) -> Result<Vec<Rental>, StoreError> {
        let rows = sqlx::query_as::<_, RentalRow>(
            r#"
            SELECT * FROM rentals
            WHERE user_id = $1 AND returned_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Rental::from).collect())
    }
}

#[async_trait::async_trait]
impl UserStore for PgStore {
    async fn create(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, name, contact_number, email, address, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.contact_number)
        .bind(&user.email)
        .bind(&user.address)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(row.map(User::from))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(row.map(User::from))
    }
}
