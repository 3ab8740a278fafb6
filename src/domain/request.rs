use super::amount::Amount;
use serde::Serialize;

/// Gateway endpoints, each a path segment beneath the configured base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    GenerateOtp,
    ImmediateDebit,
    AccountCredit,
    C2p,
    StatusQuery,
    ExchangeRate,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::GenerateOtp => "GenerarOtp",
            Endpoint::ImmediateDebit => "DebitoInmediato",
            Endpoint::AccountCredit => "CICuentas",
            Endpoint::C2p => "MBc2p",
            Endpoint::StatusQuery => "ConsultarOperaciones",
            Endpoint::ExchangeRate => "MBbcv",
        }
    }
}

/// A request body the gateway authenticates.
///
/// The plaintext is the concatenation, without delimiter, of a subset of the
/// body fields in an order fixed per endpoint. The order differs between
/// endpoints and is part of the wire contract.
pub trait SignedPayload: Serialize + Send + Sync {
    const ENDPOINT: Endpoint;

    fn signature_plaintext(&self) -> String;
}

/// Operator input for an immediate debit, before the OTP exists.
#[derive(Debug, Clone, PartialEq)]
pub struct DebitOrder {
    pub bank: String,
    pub amount: Amount,
    pub phone: String,
    pub id: String,
    pub name: String,
    pub concept: String,
}

impl DebitOrder {
    pub fn otp_request(&self) -> OtpRequest {
        OtpRequest {
            bank: self.bank.clone(),
            amount: self.amount,
            phone: self.phone.clone(),
            id: self.id.clone(),
        }
    }

    pub fn with_otp(&self, otp: impl Into<String>) -> DebitSubmission {
        DebitSubmission {
            bank: self.bank.clone(),
            amount: self.amount,
            phone: self.phone.clone(),
            id: self.id.clone(),
            name: self.name.clone(),
            otp: otp.into(),
            concept: self.concept.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtpRequest {
    #[serde(rename = "Banco")]
    pub bank: String,
    #[serde(rename = "Monto")]
    pub amount: Amount,
    #[serde(rename = "Telefono")]
    pub phone: String,
    #[serde(rename = "Cedula")]
    pub id: String,
}

impl SignedPayload for OtpRequest {
    const ENDPOINT: Endpoint = Endpoint::GenerateOtp;

    fn signature_plaintext(&self) -> String {
        format!("{}{}{}{}", self.bank, self.amount, self.phone, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebitSubmission {
    #[serde(rename = "Banco")]
    pub bank: String,
    #[serde(rename = "Monto")]
    pub amount: Amount,
    #[serde(rename = "Telefono")]
    pub phone: String,
    #[serde(rename = "Cedula")]
    pub id: String,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "OTP")]
    pub otp: String,
    #[serde(rename = "Concepto")]
    pub concept: String,
}

impl SignedPayload for DebitSubmission {
    const ENDPOINT: Endpoint = Endpoint::ImmediateDebit;

    fn signature_plaintext(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.bank, self.id, self.phone, self.amount, self.otp
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditOrder {
    #[serde(rename = "Cedula")]
    pub id: String,
    #[serde(rename = "Cuenta")]
    pub account: String,
    #[serde(rename = "Monto")]
    pub amount: Amount,
    #[serde(rename = "Concepto")]
    pub concept: String,
}

impl SignedPayload for CreditOrder {
    const ENDPOINT: Endpoint = Endpoint::AccountCredit;

    fn signature_plaintext(&self) -> String {
        format!("{}{}{}", self.id, self.account, self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct C2pOrder {
    #[serde(rename = "TelefonoDestino")]
    pub destination_phone: String,
    #[serde(rename = "Cedula")]
    pub id: String,
    #[serde(rename = "Concepto")]
    pub concept: String,
    #[serde(rename = "Banco")]
    pub bank: String,
    #[serde(rename = "Ip")]
    pub ip: String,
    #[serde(rename = "Monto")]
    pub amount: Amount,
    #[serde(rename = "Otp")]
    pub otp: String,
}

impl SignedPayload for C2pOrder {
    const ENDPOINT: Endpoint = Endpoint::C2p;

    fn signature_plaintext(&self) -> String {
        format!(
            "{}{}{}{}",
            self.destination_phone, self.amount, self.bank, self.id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusQuery {
    pub id: String,
}

impl SignedPayload for StatusQuery {
    const ENDPOINT: Endpoint = Endpoint::StatusQuery;

    fn signature_plaintext(&self) -> String {
        self.id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateQuery {
    #[serde(rename = "Moneda")]
    pub currency: String,
    #[serde(rename = "Fechavalor")]
    pub value_date: String,
}

impl SignedPayload for RateQuery {
    const ENDPOINT: Endpoint = Endpoint::ExchangeRate;

    fn signature_plaintext(&self) -> String {
        format!("{}{}", self.value_date, self.currency)
    }
}
