//! Ledger operations and their Rosetta representation.

use super::account::AccountId;
use super::amount::HbarAmount;
use super::error::ValidationError;
use super::rosetta;

/// A single balance-affecting change within a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub account_id: AccountId,
    /// Position within the transaction's operation list
    pub index: i64,
    /// Outcome of the operation; empty while unknown
    pub status: String,
    pub operation_type: String,
    pub amount: Option<HbarAmount>,
}

impl Operation {
    pub fn new(
        account_id: AccountId,
        index: i64,
        status: impl Into<String>,
        operation_type: impl Into<String>,
        amount: Option<HbarAmount>,
    ) -> Self {
        Self {
            account_id,
            index,
            status: status.into(),
            operation_type: operation_type.into(),
            amount,
        }
    }

    /// Parse an untrusted wire operation. An absent status becomes the empty string.
    pub fn from_rosetta(operation: &rosetta::Operation) -> Result<Self, ValidationError> {
        let account = operation.account.as_ref().ok_or_else(|| {
            ValidationError::InvalidAccount(format!(
                "operation {} has no account",
                operation.operation_identifier.index
            ))
        })?;
        let amount = operation
            .amount
            .as_ref()
            .map(HbarAmount::from_rosetta)
            .transpose()?;

        Ok(Self {
            account_id: AccountId::from_rosetta(account)?,
            index: operation.operation_identifier.index,
            status: operation.status.clone().unwrap_or_default(),
            operation_type: operation.r#type.clone(),
            amount,
        })
    }

    pub fn to_rosetta(&self) -> rosetta::Operation {
        // Rosetta treats a missing status as "not yet known", which is what an
        // empty status means here. Type is always emitted as-is.
        let status = (!self.status.is_empty()).then(|| self.status.clone());

        rosetta::Operation {
            operation_identifier: rosetta::OperationIdentifier {
                index: self.index,
                network_index: None,
            },
            r#type: self.operation_type.clone(),
            status,
            account: Some(self.account_id.to_rosetta()),
            amount: self.amount.as_ref().map(HbarAmount::to_rosetta),
            metadata: None,
        }
    }
}

/// Ordered operations of a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationSlice(Vec<Operation>);

impl OperationSlice {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self(operations)
    }

    pub fn to_rosetta(&self) -> Vec<rosetta::Operation> {
        self.0.iter().map(Operation::to_rosetta).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.0.iter()
    }
}

impl From<Vec<Operation>> for OperationSlice {
    fn from(operations: Vec<Operation>) -> Self {
        Self(operations)
    }
}

impl FromIterator<Operation> for OperationSlice {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
