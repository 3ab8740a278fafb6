#![allow(dead_code)]

use async_trait::async_trait;
use r4conecta::application::orchestrator::TransactionOrchestrator;
use r4conecta::config::{GatewayConfig, PollPolicy};
use r4conecta::domain::ports::OtpSource;
use r4conecta::domain::request::{C2pOrder, CreditOrder, DebitOrder, OtpRequest};
use r4conecta::error::Result;
use r4conecta::infrastructure::in_memory::ScriptedTransport;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const SECRET: &str = "commerce-secret";
pub const INTERVAL: Duration = Duration::from_millis(5_000);

pub fn config(base_url: &str, max_attempts: u32) -> GatewayConfig {
    GatewayConfig::new(Some(base_url), Some(SECRET))
        .unwrap()
        .with_poll(PollPolicy::new(INTERVAL, max_attempts).unwrap())
}

pub fn scripted_orchestrator(
    transport: &ScriptedTransport,
    max_attempts: u32,
) -> TransactionOrchestrator {
    TransactionOrchestrator::new(
        &config("https://r4.example", max_attempts),
        Box::new(transport.clone()),
    )
}

pub fn debit_order() -> DebitOrder {
    DebitOrder {
        bank: "0169".to_string(),
        amount: "150.00".parse().unwrap(),
        phone: "04141234567".to_string(),
        id: "V12345678".to_string(),
        name: "Ana Perez".to_string(),
        concept: "Factura 42".to_string(),
    }
}

pub fn credit_order() -> CreditOrder {
    CreditOrder {
        id: "V87654321".to_string(),
        account: "01690001020304050607".to_string(),
        amount: "80.25".parse().unwrap(),
        concept: "Reembolso".to_string(),
    }
}

pub fn c2p_order() -> C2pOrder {
    C2pOrder {
        destination_phone: "04241112233".to_string(),
        id: "V11222333".to_string(),
        concept: "Cobro".to_string(),
        bank: "0102".to_string(),
        ip: "192.168.0.10".to_string(),
        amount: "20.00".parse().unwrap(),
        otp: "55667788".to_string(),
    }
}

/// Hands out a fixed OTP and counts how often it was asked.
#[derive(Default)]
pub struct CountingOtp {
    pub otp: String,
    pub asked: AtomicUsize,
}

impl CountingOtp {
    pub fn new(otp: &str) -> Self {
        Self {
            otp: otp.to_string(),
            asked: AtomicUsize::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OtpSource for CountingOtp {
    async fn obtain_otp(&self, _request: &OtpRequest) -> Result<String> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.otp.clone())
    }
}
