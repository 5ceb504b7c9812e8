// service/contract_service.rs
use uuid::Uuid;

use super::{error::ServiceError, today, Store};
use crate::models::contractmodel::{Contract, ContractView};

#[derive(Debug, Clone)]
pub struct ContractService {
    store: Store,
}

impl ContractService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn complete_contract(&self, actor: Uuid, contract_id: Uuid) -> Result<Contract, ServiceError> {
        let contract = self
            .store
            .complete_contract(actor, contract_id, today())
            .await?;

        tracing::info!(
            "contract {} completed, project {} closed",
            contract.id,
            contract.project_id
        );
        Ok(contract)
    }

    pub async fn get_contract(&self, contract_id: Uuid) -> Result<Contract, ServiceError> {
        self.store
            .get_contract(contract_id)
            .await?
            .ok_or(ServiceError::ContractNotFound(contract_id))
    }

    pub async fn get_freelancer_contracts(&self, student_id: Uuid) -> Result<Vec<ContractView>, ServiceError> {
        self.store.get_freelancer_contracts(student_id).await
    }

    pub async fn get_owner_contracts(&self, student_id: Uuid) -> Result<Vec<ContractView>, ServiceError> {
        self.store.get_owner_contracts(student_id).await
    }
}
