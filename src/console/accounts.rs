use log::debug;
use rust_decimal::Decimal;

use super::{matches, search_term};
use crate::api::ApiClient;
use crate::error::{ConsoleError, ValidationError};
use crate::model::{Account, AccountType, Customer};
use crate::state::Notifications;

#[derive(Debug, Clone, PartialEq)]
pub struct AccountForm {
    pub number: String,
    pub account_type: Option<AccountType>,
    pub initial_balance: Decimal,
    pub active: bool,
    pub customer_id: Option<i64>,
}

impl Default for AccountForm {
    fn default() -> Self {
        AccountForm {
            number: String::new(),
            account_type: None,
            initial_balance: Decimal::ZERO,
            active: true,
            customer_id: None,
        }
    }
}

impl AccountForm {
    pub fn from_account(account: &Account) -> AccountForm {
        AccountForm {
            number: account.number.clone(),
            account_type: Some(account.account_type),
            initial_balance: account.initial_balance,
            active: account.active,
            customer_id: Some(account.customer_id),
        }
    }

    /// Builds the payload, or fails when a required field is missing.
    pub fn to_account(&self, id: Option<i64>) -> Result<Account, ValidationError> {
        let number = self.number.trim();
        let customer_id = self.customer_id.filter(|id| *id != 0);
        let (Some(account_type), Some(customer_id)) = (self.account_type, customer_id) else {
            return Err(ValidationError::MissingFields);
        };
        if number.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if self.initial_balance < Decimal::ZERO {
            return Err(ValidationError::NegativeBalance);
        }

        Ok(Account {
            id,
            number: number.to_string(),
            account_type,
            initial_balance: self.initial_balance,
            active: self.active,
            customer_id,
            customer_name: None,
        })
    }
}

pub struct AccountsView {
    api: ApiClient,
    notifications: Notifications,
    pub accounts: Vec<Account>,
    /// Active customers only, for the owner picker.
    pub customers: Vec<Customer>,
    pub search: String,
    pub form: AccountForm,
    selected: Option<Account>,
}

impl AccountsView {
    pub fn new(api: ApiClient, notifications: Notifications) -> AccountsView {
        AccountsView {
            api,
            notifications,
            accounts: Vec::new(),
            customers: Vec::new(),
            search: String::new(),
            form: AccountForm::default(),
            selected: None,
        }
    }

    pub async fn load(&mut self) -> Result<(), ConsoleError> {
        match self.api.accounts().await {
            Ok(accounts) => {
                self.accounts = accounts;
                Ok(())
            },
            Err(err) => {
                self.notifications.error(format!("Error loading accounts: {}", err));
                Err(err.into())
            },
        }
    }

    pub async fn load_customers(&mut self) -> Result<(), ConsoleError> {
        match self.api.customers().await {
            Ok(customers) => {
                self.customers = customers.into_iter().filter(|c| c.active).collect();
                Ok(())
            },
            Err(err) => {
                self.notifications.error("Error loading customers");
                Err(err.into())
            },
        }
    }

    /// Accounts whose number, owner name or type contains the search term.
    pub fn filtered(&self) -> Vec<&Account> {
        let Some(term) = search_term(&self.search) else {
            return self.accounts.iter().collect();
        };

        self.accounts
            .iter()
            .filter(|a| {
                matches(&a.number, &term)
                    || a.customer_name.as_deref().is_some_and(|name| matches(name, &term))
                    || matches(a.account_type.label(), &term)
            })
            .collect()
    }

    pub fn select(&mut self, account: &Account) {
        self.form = AccountForm::from_account(account);
        self.selected = Some(account.clone());
    }

    pub fn selected(&self) -> Option<&Account> {
        self.selected.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.selected.is_some()
    }

    pub async fn save(&mut self) -> Result<(), ConsoleError> {
        let editing_id = self.selected.as_ref().and_then(|a| a.id);
        let account = match self.form.to_account(editing_id) {
            Ok(account) => account,
            Err(err) => {
                self.notifications.error(err.to_string());
                return Err(err.into());
            },
        };

        let (result, done) = match editing_id {
            Some(id) => (self.api.update_account(id, &account).await, "Account updated successfully"),
            None => (self.api.create_account(&account).await, "Account created successfully"),
        };

        match result {
            Ok(_) => {
                self.notifications.success(done);
                self.reload().await;
                self.cancel();
                Ok(())
            },
            Err(err) => {
                self.notifications.error(format!("Error: {}", err));
                Err(err.into())
            },
        }
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), ConsoleError> {
        match self.api.delete_account(id).await {
            Ok(()) => {
                self.notifications.success("Account deleted successfully");
                self.reload().await;
                Ok(())
            },
            Err(err) => {
                self.notifications.error(format!("Error: {}", err));
                Err(err.into())
            },
        }
    }

    pub fn cancel(&mut self) {
        self.form = AccountForm::default();
        self.selected = None;
    }

    async fn reload(&mut self) {
        if let Err(err) = self.load().await {
            debug!("reload after write failed, err={}", err);
        }
    }
}
