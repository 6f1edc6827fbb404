use log::debug;
use rust_decimal::Decimal;

use super::{matches, search_term};
use crate::api::ApiClient;
use crate::error::{ConsoleError, ValidationError};
use crate::model::{normalize_sign, Account, Movement, MovementType};
use crate::state::Notifications;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementForm {
    pub account_number: String,
    pub value: Decimal,
    movement_type: Option<MovementType>,
}

impl MovementForm {
    pub fn movement_type(&self) -> Option<MovementType> {
        self.movement_type
    }

    /// Changes the type and immediately forces the sign of the current value to match.
    pub fn select_type(&mut self, movement_type: Option<MovementType>) {
        self.movement_type = movement_type;
        self.value = normalize_sign(movement_type, self.value);
    }

    /// Payload for submission. The value is sent as shown in the form.
    pub fn to_movement(&self) -> Result<Movement, ValidationError> {
        let account_number = self.account_number.trim();
        let Some(movement_type) = self.movement_type else {
            return Err(ValidationError::MissingFields);
        };
        if account_number.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if self.value.is_zero() {
            return Err(ValidationError::ZeroValue);
        }

        Ok(Movement {
            id: None,
            timestamp: None,
            movement_type,
            value: self.value,
            balance: None,
            account_number: account_number.to_string(),
        })
    }
}

pub struct MovementsView {
    api: ApiClient,
    notifications: Notifications,
    pub movements: Vec<Movement>,
    /// Active accounts only, for the account picker.
    pub accounts: Vec<Account>,
    pub search: String,
    pub form: MovementForm,
}

impl MovementsView {
    pub fn new(api: ApiClient, notifications: Notifications) -> MovementsView {
        MovementsView {
            api,
            notifications,
            movements: Vec::new(),
            accounts: Vec::new(),
            search: String::new(),
            form: MovementForm::default(),
        }
    }

    pub async fn load(&mut self) -> Result<(), ConsoleError> {
        match self.api.movements().await {
            Ok(movements) => {
                self.movements = movements;
                Ok(())
            },
            Err(err) => {
                self.notifications.error("Error loading movements");
                Err(err.into())
            },
        }
    }

    pub async fn load_accounts(&mut self) -> Result<(), ConsoleError> {
        match self.api.accounts().await {
            Ok(accounts) => {
                self.accounts = accounts.into_iter().filter(|a| a.active).collect();
                Ok(())
            },
            Err(err) => {
                self.notifications.error("Error loading accounts");
                Err(err.into())
            },
        }
    }

    /// Puts `number` on the form if it is one of the loaded active accounts.
    pub fn choose_account(&mut self, number: &str) -> Result<(), ConsoleError> {
        let number = number.trim();
        if !self.accounts.iter().any(|a| a.number == number) {
            let err = ValidationError::InactiveAccount(number.to_string());
            self.notifications.error(err.to_string());
            return Err(err.into());
        }

        self.form.account_number = number.to_string();
        Ok(())
    }

    /// Movements whose account number or type contains the search term.
    pub fn filtered(&self) -> Vec<&Movement> {
        let Some(term) = search_term(&self.search) else {
            return self.movements.iter().collect();
        };

        self.movements
            .iter()
            .filter(|m| matches(&m.account_number, &term) || matches(m.movement_type.label(), &term))
            .collect()
    }

    /// Sends the form as a new movement. Incomplete forms and zero values never reach the API.
    pub async fn submit(&mut self) -> Result<(), ConsoleError> {
        let movement = match self.form.to_movement() {
            Ok(movement) => movement,
            Err(err) => {
                self.notifications.error(err.to_string());
                return Err(err.into());
            },
        };

        match self.api.create_movement(&movement).await {
            Ok(created) => {
                debug!("movement registered, id={:?}, balance={:?}", created.id, created.balance);
                self.notifications.success("Movement registered successfully");
                self.reload().await;
                self.clear_form();
                Ok(())
            },
            Err(err) => {
                self.notifications.error(format!("Error: {}", err));
                Err(err.into())
            },
        }
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), ConsoleError> {
        match self.api.delete_movement(id).await {
            Ok(()) => {
                self.notifications.success("Movement deleted");
                self.reload().await;
                Ok(())
            },
            Err(err) => {
                self.notifications.error(format!("Error: {}", err));
                Err(err.into())
            },
        }
    }

    pub fn clear_form(&mut self) {
        self.form = MovementForm::default();
    }

    async fn reload(&mut self) {
        if let Err(err) = self.load().await {
            debug!("reload after write failed, err={}", err);
        }
    }
}
