//! Built-in connector operations.
//!
//! Registered in the catalog like ordinary scripts, under any namespace:
//! `GetSavedTransactions` returns the persisted request/response pairs for
//! a transaction id, `DeleteSavedTransactions` removes them.

use std::sync::Arc;

use soapbridge_core::XmlElement;

use crate::catalog::{MethodLocator, ScriptCatalog};
use crate::script::{Script, ScriptContext, ScriptFault};

/// Register the built-in operations.
pub fn register_builtins(catalog: &mut ScriptCatalog) {
    catalog.register(
        MethodLocator::named("GetSavedTransactions"),
        Arc::new(GetSavedTransactions),
    );
    catalog.register(
        MethodLocator::named("DeleteSavedTransactions"),
        Arc::new(DeleteSavedTransactions),
    );
}

fn required_transaction_id(ctx: &ScriptContext<'_>) -> Result<String, ScriptFault> {
    ctx.request()
        .descendant_text("TransactionId")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ScriptFault::client("Parameter 'TransactionId' is not set"))
}

// ---------------------------------------------------------------------------
// GetSavedTransactions
// ---------------------------------------------------------------------------

/// Returns saved pairs as
/// `<transactions><transaction id=".." name=".."><request timestamp="..">…
/// </request><response timestamp="..">…</response></transaction>*</transactions>`,
/// ordered by sequence.
pub struct GetSavedTransactions;

impl Script for GetSavedTransactions {
    fn execute(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ScriptFault> {
        let id = required_transaction_id(ctx)?;
        let entries = ctx
            .saved_store()
            .read_all(&id)
            .map_err(|e| ScriptFault::server(e.to_string()))?;

        let mut transactions = XmlElement::new("transactions");
        for entry in entries {
            let mut transaction = XmlElement::new("transaction")
                .with_attr("id", entry.sequence.to_string())
                .with_attr("name", entry.id.as_str());

            let mut request = XmlElement::new("request").with_attr("timestamp", entry.request_time);
            request.push_child(entry.request);
            transaction.push_child(request);

            if let Some(method) = entry.response {
                let mut response = XmlElement::new("response")
                    .with_attr("timestamp", entry.response_time.unwrap_or_default());
                response.push_child(method);
                transaction.push_child(response);
            }
            transactions.push_child(transaction);
        }

        ctx.set_response(transactions);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DeleteSavedTransactions
// ---------------------------------------------------------------------------

/// Deletes every saved pair for the given transaction id. Responds with the
/// bare response method element.
pub struct DeleteSavedTransactions;

impl Script for DeleteSavedTransactions {
    fn execute(&self, ctx: &mut ScriptContext<'_>) -> Result<(), ScriptFault> {
        let id = required_transaction_id(ctx)?;
        ctx.saved_store()
            .delete(&id)
            .map_err(|e| ScriptFault::server(e.to_string()))?;
        Ok(())
    }
}
