//! Settlement sink for the web server.

use prospere_core::pix::{PixSettlement, PixSettlementSink};

/// Records confirmed PIX deposits in the structured log.
///
/// Crediting the investor's balance happens in the back office, which
/// consumes these events from the log pipeline.
#[derive(Clone, Default)]
pub struct LoggingSettlementSink;

impl PixSettlementSink for LoggingSettlementSink {
    fn on_settled(&self, settlement: PixSettlement) {
        tracing::info!(
            transaction_id = %settlement.transaction_id,
            amount = %settlement.amount,
            paid_at = %settlement.paid_at,
            "PIX deposit settled"
        );
    }
}
