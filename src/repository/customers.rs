//! Customers repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::customer::{Customer, CustomerInput},
};

#[derive(Clone)]
pub struct CustomersRepository {
    pool: Pool<Postgres>,
}

impl CustomersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all customers
    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(customers)
    }

    /// Get customer by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Customer with id {} not found", id)))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Create a new customer
    pub async fn create(&self, customer: &CustomerInput) -> AppResult<Customer> {
        let created = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, surname, address, phone_number, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.surname)
        .bind(&customer.address)
        .bind(&customer.phone_number)
        .bind(&customer.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Persist every field of a customer
    pub async fn update(&self, customer: &Customer) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = $1, surname = $2, address = $3, phone_number = $4, email = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.surname)
        .bind(&customer.address)
        .bind(&customer.phone_number)
        .bind(&customer.email)
        .bind(customer.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer with id {} not found", customer.id)))
    }

    /// Lock a customer row and their lending rows, so no lending can be
    /// opened or reopened for them until the transaction ends
    pub async fn lock_with_lendings(&self, conn: &mut PgConnection, id: i32) -> AppResult<Customer> {
        let customer =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Customer with id {} not found", id)))?;

        sqlx::query("SELECT id FROM lendings WHERE customer_id = $1 ORDER BY id FOR UPDATE")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(customer)
    }

    /// Whether the customer still has a book out
    pub async fn has_open_lendings(&self, conn: &mut PgConnection, id: i32) -> AppResult<bool> {
        let borrowed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM lendings WHERE customer_id = $1 AND return_date IS NULL)",
        )
        .bind(id)
        .fetch_one(conn)
        .await?;
        Ok(borrowed)
    }

    /// Delete a customer (cascades to their lendings)
    pub async fn delete(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Customer with id {} not found", id)));
        }
        Ok(())
    }
}
