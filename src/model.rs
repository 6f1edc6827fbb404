use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const GENDERS: [&str; 3] = ["Masculino", "Femenino", "Otro"];

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 120;
pub const PHONE_MIN_LENGTH: usize = 7;
pub const PHONE_MAX_LENGTH: usize = 15;
pub const IDENTIFICATION_MIN_LENGTH: usize = 5;
pub const IDENTIFICATION_MAX_LENGTH: usize = 20;
pub const PASSWORD_MIN_LENGTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "clienteId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "genero")]
    pub gender: String,
    #[serde(rename = "edad")]
    pub age: u32,
    #[serde(rename = "identificacion")]
    pub identification: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    /// Absent from the payload when `None`, so the backend keeps the stored credential.
    #[serde(rename = "contrasena", default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "estado")]
    pub active: bool,
}

impl Default for Customer {
    fn default() -> Self {
        Customer {
            id: None,
            name: String::new(),
            gender: String::new(),
            age: 0,
            identification: String::new(),
            address: String::new(),
            phone: String::new(),
            password: None,
            active: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "Ahorros")]
    Savings,
    #[serde(rename = "Corriente")]
    Checking,
}

impl AccountType {
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Savings => "Ahorros",
            AccountType::Checking => "Corriente",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "numeroCuenta")]
    pub number: String,
    #[serde(rename = "tipoCuenta")]
    pub account_type: AccountType,
    #[serde(rename = "saldoInicial")]
    pub initial_balance: Decimal,
    #[serde(rename = "estado")]
    pub active: bool,
    #[serde(rename = "clienteId")]
    pub customer_id: i64,
    /// Display only, never sent back.
    #[serde(rename = "clienteNombre", default, skip_serializing)]
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementType {
    #[serde(rename = "Deposito")]
    Deposit,
    #[serde(rename = "Retiro")]
    Withdrawal,
    #[serde(rename = "Credito")]
    Credit,
    #[serde(rename = "Debito")]
    Debit,
}

impl MovementType {
    pub const ALL: [MovementType; 4] = [
        MovementType::Deposit,
        MovementType::Withdrawal,
        MovementType::Credit,
        MovementType::Debit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MovementType::Deposit => "Deposito",
            MovementType::Withdrawal => "Retiro",
            MovementType::Credit => "Credito",
            MovementType::Debit => "Debito",
        }
    }

    pub fn is_outflow(&self) -> bool {
        matches!(self, MovementType::Withdrawal | MovementType::Debit)
    }
}

/// Forces the sign of `value` to match the movement type.
/// Outflows become negative, inflows positive, no type leaves the value alone.
pub fn normalize_sign(movement_type: Option<MovementType>, value: Decimal) -> Decimal {
    match movement_type {
        Some(t) if t.is_outflow() => -value.abs(),
        Some(_) => value.abs(),
        None => value,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "fecha", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(rename = "tipoMovimiento")]
    pub movement_type: MovementType,
    #[serde(rename = "valor")]
    pub value: Decimal,
    #[serde(rename = "saldo", default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    #[serde(rename = "numeroCuenta")]
    pub account_number: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Credit,
    Debit,
}

/// Denormalized report projection, one per movement in the requested range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "fecha")]
    pub date: NaiveDateTime,
    #[serde(rename = "cliente")]
    pub customer: String,
    #[serde(rename = "numeroCuenta")]
    pub account_number: String,
    #[serde(rename = "tipo")]
    pub account_type: String,
    #[serde(rename = "saldoInicial")]
    pub balance_before: Decimal,
    #[serde(rename = "estado")]
    pub active: bool,
    #[serde(rename = "movimiento")]
    pub movement: Decimal,
    #[serde(rename = "saldoDisponible")]
    pub balance_after: Decimal,
}

impl ReportRow {
    pub fn direction(&self) -> Option<Direction> {
        if self.movement > Decimal::ZERO {
            Some(Direction::Credit)
        } else if self.movement < Decimal::ZERO {
            Some(Direction::Debit)
        } else {
            None
        }
    }
}
