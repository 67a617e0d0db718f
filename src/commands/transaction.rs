//! Transaction commands.
//!
//! Mutations go to the backend directly, then reload the transaction container. The reload
//! cascades into the summary and chart aggregates, so each handler can report the balance
//! that results from its own mutation.

use crate::commands::Out;
use crate::model::{Transaction, TransactionInput};
use crate::{App, Result};
use anyhow::Context;
use uuid::Uuid;

/// Lists all transactions (and refreshes the aggregates along the way).
pub async fn transaction_list(app: &App) -> Result<Out<Vec<Transaction>>> {
    app.store().load_transactions().await;
    let transactions = app.store().transactions();
    let summary = app.store().summary();
    let mut lines = vec![format!(
        "{} transactions, net balance {}",
        transactions.len(),
        summary.net_balance
    )];
    for transaction in &transactions {
        lines.push(format!(
            "  {} {:>12} {} {}",
            transaction.date,
            transaction.amount.to_string(),
            transaction.kind,
            transaction.description.as_deref().unwrap_or("")
        ));
    }
    Ok(Out::new(lines.join("\n"), transactions))
}

/// Records a new transaction, then reloads transactions and aggregates.
pub async fn transaction_add(app: &App, input: TransactionInput) -> Result<Out<Transaction>> {
    let created = app
        .backend()
        .create_transaction(&input)
        .await
        .context("Unable to create transaction")?;
    app.store().load_transactions().await;
    Ok(Out::new(
        format!(
            "Recorded {} of {} on {}; net balance is now {}",
            created.kind,
            created.amount,
            created.date,
            app.store().summary().net_balance
        ),
        created,
    ))
}

/// Rewrites an existing transaction, then reloads transactions and aggregates.
pub async fn transaction_update(
    app: &App,
    id: Uuid,
    input: TransactionInput,
) -> Result<Out<Transaction>> {
    let updated = app
        .backend()
        .update_transaction(id, &input)
        .await
        .with_context(|| format!("Unable to update transaction {id}"))?;
    app.store().load_transactions().await;
    Ok(Out::new(
        format!(
            "Updated transaction {}; net balance is now {}",
            updated.id,
            app.store().summary().net_balance
        ),
        updated,
    ))
}

/// Deletes a transaction, then reloads transactions and aggregates.
pub async fn transaction_delete(app: &App, id: Uuid) -> Result<Out<()>> {
    app.backend()
        .delete_transaction(id)
        .await
        .with_context(|| format!("Unable to delete transaction {id}"))?;
    app.store().load_transactions().await;
    Ok(Out::new_message(format!(
        "Deleted transaction {id}; net balance is now {}",
        app.store().summary().net_balance
    )))
}
