use std::sync::Arc;

use crate::{config::Config, config::LogFormat, settlement::LoggingSettlementSink};
use prospere_core::{
    investments::{InvestmentService, InvestmentServiceTrait},
    pix::{PixGatewayTrait, PixSessionConfig, PixSessionRegistry, PixSettlementSink},
    withdrawals::{WithdrawalService, WithdrawalServiceTrait},
};
use prospere_pix_gateway::PixGatewayClient;
use prospere_storage_memory::{InMemoryInvestmentRepository, InMemoryWithdrawalRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub investment_service: Arc<dyn InvestmentServiceTrait>,
    pub withdrawal_service: Arc<dyn WithdrawalServiceTrait>,
    pub pix_gateway: Arc<dyn PixGatewayTrait>,
    pub pix_sessions: Arc<PixSessionRegistry>,
    pub pix_session_config: PixSessionConfig,
    /// Receives confirmed deposits from every PIX session.
    pub settlement_sink: Arc<dyn PixSettlementSink>,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let gateway = PixGatewayClient::new(
        config.pix_gateway_url.clone(),
        config.pix_api_key.clone(),
        None,
    );
    if !gateway.is_configured() {
        tracing::warn!(
            "PIX gateway is not configured; deposits will fail until PROSPERE_PIX_GATEWAY_URL and PROSPERE_PIX_API_KEY are set"
        );
    }
    Ok(build_state_with_gateway(config, Arc::new(gateway)))
}

/// Wires the in-memory repositories and services around a PIX gateway.
pub fn build_state_with_gateway(
    config: &Config,
    pix_gateway: Arc<dyn PixGatewayTrait>,
) -> Arc<AppState> {
    let investment_repository = Arc::new(InMemoryInvestmentRepository::new());
    let withdrawal_repository = Arc::new(InMemoryWithdrawalRepository::new());

    let investment_service = Arc::new(InvestmentService::new(investment_repository.clone()));
    let withdrawal_service = Arc::new(WithdrawalService::new(
        withdrawal_repository,
        investment_repository,
    ));

    Arc::new(AppState {
        investment_service,
        withdrawal_service,
        pix_gateway,
        pix_sessions: Arc::new(PixSessionRegistry::new()),
        pix_session_config: config.pix_session_config(),
        settlement_sink: Arc::new(LoggingSettlementSink),
    })
}
