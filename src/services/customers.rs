//! Customer management service

use validator::Validate;

use crate::{
    error::{AppResult, LendingViolation},
    models::customer::{Customer, CustomerInput, CustomerPatch},
    repository::Repository,
};

#[derive(Clone)]
pub struct CustomersService {
    repository: Repository,
}

impl CustomersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        self.repository.customers.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Customer> {
        self.repository.customers.get_by_id(id).await
    }

    pub async fn create(&self, input: CustomerInput) -> AppResult<Customer> {
        input.validate()?;
        let customer = self.repository.customers.create(&input).await?;
        tracing::info!(customer_id = customer.id, "Customer created");
        Ok(customer)
    }

    pub async fn update(&self, id: i32, patch: CustomerPatch) -> AppResult<Customer> {
        patch.validate()?;
        let current = self.repository.customers.get_by_id(id).await?;
        self.repository.customers.update(&patch.apply(current)).await
    }

    /// Delete a customer unless they still have a book out
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;
        let customer = self.repository.customers.lock_with_lendings(&mut tx, id).await?;

        if self.repository.customers.has_open_lendings(&mut tx, id).await? {
            tracing::warn!(customer_id = id, "Refusing to delete customer with books borrowed");
            return Err(LendingViolation::CustomerHasOpenLendings(customer.full_name()).into());
        }

        self.repository.customers.delete(&mut tx, id).await?;
        tx.commit().await?;
        tracing::info!(customer_id = id, "Customer deleted");
        Ok(())
    }
}
