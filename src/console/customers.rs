use log::debug;

use super::{matches, search_term};
use crate::api::ApiClient;
use crate::error::{ConsoleError, ValidationError};
use crate::model::{
    Customer, IDENTIFICATION_MAX_LENGTH, IDENTIFICATION_MIN_LENGTH, MAX_AGE, MIN_AGE, PASSWORD_MIN_LENGTH,
    PHONE_MAX_LENGTH, PHONE_MIN_LENGTH,
};
use crate::state::Notifications;

/// Editable customer fields as typed by the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerForm {
    pub name: String,
    pub gender: String,
    pub age: u32,
    pub identification: String,
    pub address: String,
    pub phone: String,
    pub password: String,
    pub active: bool,
}

impl Default for CustomerForm {
    fn default() -> Self {
        CustomerForm {
            name: String::new(),
            gender: String::new(),
            age: 0,
            identification: String::new(),
            address: String::new(),
            phone: String::new(),
            password: String::new(),
            active: true,
        }
    }
}

impl CustomerForm {
    /// Starts an edit. The password is left blank so it is only sent when retyped.
    pub fn from_customer(customer: &Customer) -> CustomerForm {
        CustomerForm {
            name: customer.name.clone(),
            gender: customer.gender.clone(),
            age: customer.age,
            identification: customer.identification.clone(),
            address: customer.address.clone(),
            phone: customer.phone.clone(),
            password: String::new(),
            active: customer.active,
        }
    }

    pub fn validate(&self, editing: bool) -> Result<(), ValidationError> {
        let blank = |s: &str| s.trim().is_empty();
        if blank(&self.name) || blank(&self.identification) || blank(&self.phone) {
            return Err(ValidationError::MissingFields);
        }

        if !editing && blank(&self.password) {
            return Err(ValidationError::PasswordRequired);
        }
        if !blank(&self.password) && self.password.trim().chars().count() < PASSWORD_MIN_LENGTH {
            return Err(ValidationError::PasswordTooShort);
        }

        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(ValidationError::AgeOutOfRange);
        }

        let phone = self.phone.trim().chars().count();
        if !(PHONE_MIN_LENGTH..=PHONE_MAX_LENGTH).contains(&phone) {
            return Err(ValidationError::PhoneLength);
        }

        let identification = self.identification.trim().chars().count();
        if !(IDENTIFICATION_MIN_LENGTH..=IDENTIFICATION_MAX_LENGTH).contains(&identification) {
            return Err(ValidationError::IdentificationLength);
        }

        Ok(())
    }

    /// Outgoing payload. A blank password is left out entirely.
    pub fn to_customer(&self, id: Option<i64>) -> Customer {
        let password = Some(self.password.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Customer {
            id,
            name: self.name.trim().to_string(),
            gender: self.gender.clone(),
            age: self.age,
            identification: self.identification.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password,
            active: self.active,
        }
    }
}

pub struct CustomersView {
    api: ApiClient,
    notifications: Notifications,
    pub customers: Vec<Customer>,
    pub search: String,
    pub form: CustomerForm,
    selected: Option<Customer>,
}

impl CustomersView {
    pub fn new(api: ApiClient, notifications: Notifications) -> CustomersView {
        CustomersView {
            api,
            notifications,
            customers: Vec::new(),
            search: String::new(),
            form: CustomerForm::default(),
            selected: None,
        }
    }

    pub async fn load(&mut self) -> Result<(), ConsoleError> {
        match self.api.customers().await {
            Ok(customers) => {
                self.customers = customers;
                Ok(())
            },
            Err(err) => {
                self.notifications.error(format!("Error loading customers: {}", err));
                Err(err.into())
            },
        }
    }

    /// Customers whose name, identification or phone contains the search term.
    pub fn filtered(&self) -> Vec<&Customer> {
        let Some(term) = search_term(&self.search) else {
            return self.customers.iter().collect();
        };

        self.customers
            .iter()
            .filter(|c| matches(&c.name, &term) || matches(&c.identification, &term) || matches(&c.phone, &term))
            .collect()
    }

    pub fn select(&mut self, customer: &Customer) {
        self.form = CustomerForm::from_customer(customer);
        self.selected = Some(customer.clone());
    }

    pub fn selected(&self) -> Option<&Customer> {
        self.selected.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.selected.is_some()
    }

    pub async fn save(&mut self) -> Result<(), ConsoleError> {
        let editing_id = self.selected.as_ref().and_then(|c| c.id);
        if let Err(err) = self.form.validate(self.is_editing()) {
            self.notifications.error(err.to_string());
            return Err(err.into());
        }

        let (result, done, failed) = match editing_id {
            Some(id) => {
                let customer = self.form.to_customer(Some(id));
                (self.api.update_customer(id, &customer).await, "Customer updated successfully", "Error updating")
            },
            None => {
                let customer = self.form.to_customer(None);
                (self.api.create_customer(&customer).await, "Customer created successfully", "Error creating")
            },
        };

        match result {
            Ok(_) => {
                self.notifications.success(done);
                self.reload().await;
                self.cancel();
                Ok(())
            },
            Err(err) => {
                self.notifications.error(format!("{}: {}", failed, err));
                Err(err.into())
            },
        }
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), ConsoleError> {
        match self.api.delete_customer(id).await {
            Ok(()) => {
                self.notifications.success("Customer deleted successfully");
                self.reload().await;
                Ok(())
            },
            Err(err) => {
                self.notifications.error(format!("Error deleting: {}", err));
                Err(err.into())
            },
        }
    }

    pub fn cancel(&mut self) {
        self.form = CustomerForm::default();
        self.selected = None;
    }

    async fn reload(&mut self) {
        if let Err(err) = self.load().await {
            debug!("reload after write failed, err={}", err);
        }
    }
}
