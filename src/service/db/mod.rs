use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{TicketRow, Void};

pub mod postgres;

// Traits.

/// Generic database client trait that clients must implement.
///
/// This trait defines the only write the classifier performs: storing one
/// classified ticket. Implementing this trait allows different database
/// backends (or test doubles) to be used with the ticket-classifier.
#[async_trait]
pub trait GenericDbClient: Send + Sync + 'static {
    /// Inserts one classified ticket.
    ///
    /// There is no update or delete path; every call writes a new row.
    async fn insert_ticket(&self, row: &TicketRow) -> Void;
}

/// Database client for ticket-classifier.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct DbClient {
    /// The database client instance.
    pub inner: Arc<dyn GenericDbClient>,
}

impl Deref for DbClient {
    type Target = dyn GenericDbClient;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl DbClient {
    pub fn new(inner: Arc<dyn GenericDbClient>) -> Self {
        Self { inner }
    }
}
