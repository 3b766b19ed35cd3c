//! This module handles the storage of classified tickets in the database.

use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, instrument};

use crate::{
    base::types::{TicketRow, Void},
    service::db::DbClient,
};

/// Handles the ticket storage event.
///
/// The insert runs on its own task so that neither an error nor a panic in the
/// database layer can reach the caller; failures are only logged.
#[instrument(skip_all)]
pub fn handle_ticket_storage(row: TicketRow, db: DbClient) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            // Process the event.
            let result = handle_ticket_storage_internal(&row, &db).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Failed to store ticket: {:#}", err);
            }
        }
        .in_current_span(),
    )
}

/// Internal function to handle the ticket storage event.
#[instrument(skip_all)]
async fn handle_ticket_storage_internal(row: &TicketRow, db: &DbClient) -> Void {
    db.insert_ticket(row).await?;

    debug!("Ticket stored.");

    Ok(())
}
