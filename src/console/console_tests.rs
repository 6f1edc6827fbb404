use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use super::*;
use crate::api::mock::MockTransport;
use crate::api::{ApiClient, Method};
use crate::error::{ConsoleError, ExportError, ValidationError};
use crate::model::{AccountType, Customer, MovementType};
use crate::report::{CsvExporter, Exporter, JsonExporter, PdfExporter};
use crate::state::{LoadingState, NotificationKind, Notifications};

fn setup() -> (MockTransport, ApiClient, Notifications) {
    let transport = MockTransport::new();
    let api = ApiClient::new(transport.clone(), LoadingState::new());
    (transport, api, Notifications::default())
}

fn last_message(notifications: &Notifications) -> (NotificationKind, String) {
    let current = notifications.current().expect("a notification should be showing");
    (current.kind(), current.message().clone())
}

fn customers_json() -> Value {
    json!([
        {
            "clienteId": 1,
            "nombre": "Jose Lema",
            "genero": "Masculino",
            "edad": 30,
            "identificacion": "1234567890",
            "direccion": "Otavalo sn y principal",
            "telefono": "098254785",
            "estado": true
        },
        {
            "clienteId": 2,
            "nombre": "Marianela Montalvo",
            "genero": "Femenino",
            "edad": 25,
            "identificacion": "0987654321",
            "direccion": "Amazonas y NNUU",
            "telefono": "097548965",
            "estado": false
        }
    ])
}

fn valid_customer_form() -> CustomerForm {
    CustomerForm {
        name: "Juan Osorio".into(),
        gender: "Masculino".into(),
        age: 41,
        identification: "1712345678".into(),
        address: "13 junio y Equinoccial".into(),
        phone: "098874587".into(),
        password: "1245".into(),
        active: true,
    }
}

#[tokio::test]
async fn test_customers_load_and_filter() -> Result<()> {
    let (transport, api, notifications) = setup();
    transport.ok(Method::Get, "/clientes", customers_json());
    let mut view = CustomersView::new(api, notifications);

    view.load().await?;
    assert_eq!(view.customers.len(), 2);

    view.search = "  JOSE ".into();
    let names: Vec<&str> = view.filtered().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Jose Lema"]);

    view.search = "0975".into();
    let names: Vec<&str> = view.filtered().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Marianela Montalvo"]);

    view.search.clear();
    assert_eq!(view.filtered().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_customer_create_requires_password() {
    let (transport, api, notifications) = setup();
    let mut view = CustomersView::new(api, notifications.clone());
    view.form = CustomerForm {
        password: "  ".into(),
        ..valid_customer_form()
    };

    let result = view.save().await;
    assert!(matches!(result, Err(ConsoleError::Validation(ValidationError::PasswordRequired))));
    assert!(transport.requests().is_empty());
    assert_eq!(last_message(&notifications).0, NotificationKind::Error);
}

#[tokio::test]
async fn test_customer_required_fields() {
    let (transport, api, notifications) = setup();
    let mut view = CustomersView::new(api, notifications);

    for form in [
        CustomerForm { name: "".into(), ..valid_customer_form() },
        CustomerForm { identification: " ".into(), ..valid_customer_form() },
        CustomerForm { phone: "".into(), ..valid_customer_form() },
    ] {
        view.form = form;
        let result = view.save().await;
        assert!(matches!(result, Err(ConsoleError::Validation(ValidationError::MissingFields))));
    }

    view.form = CustomerForm { age: 17, ..valid_customer_form() };
    assert!(matches!(
        view.save().await,
        Err(ConsoleError::Validation(ValidationError::AgeOutOfRange))
    ));

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_customer_create_reloads_and_resets_form() -> Result<()> {
    let (transport, api, notifications) = setup();
    transport
        .ok(Method::Post, "/clientes", json!({"clienteId": 3, "nombre": "Juan Osorio", "genero": "Masculino", "edad": 41, "identificacion": "1712345678", "direccion": "13 junio y Equinoccial", "telefono": "098874587", "estado": true}))
        .ok(Method::Get, "/clientes", customers_json());
    let mut view = CustomersView::new(api, notifications.clone());
    view.form = valid_customer_form();

    view.save().await?;

    let body = transport.last(Method::Post, "/clientes").unwrap().body.unwrap();
    assert_eq!(body["contrasena"], json!("1245"));
    assert!(body.get("clienteId").is_none());
    assert_eq!(transport.count(Method::Get, "/clientes"), 1);
    assert_eq!(view.customers.len(), 2);
    assert_eq!(view.form, CustomerForm::default());
    assert_eq!(view.is_editing(), false);
    assert_eq!(
        last_message(&notifications),
        (NotificationKind::Success, "Customer created successfully".to_string())
    );

    Ok(())
}

#[tokio::test]
async fn test_customer_update_with_empty_password_omits_field() -> Result<()> {
    let (transport, api, notifications) = setup();
    transport
        .ok(Method::Get, "/clientes", customers_json())
        .ok(Method::Put, "/clientes/1", customers_json()[0].clone());
    let mut view = CustomersView::new(api, notifications);
    view.load().await?;

    let jose = view.customers[0].clone();
    view.select(&jose);
    assert_eq!(view.is_editing(), true);
    assert_eq!(view.form.password, "");

    view.form.address = "Otavalo".into();
    view.save().await?;

    let body = transport.last(Method::Put, "/clientes/1").unwrap().body.unwrap();
    assert!(body.get("contrasena").is_none());
    assert_eq!(body["direccion"], json!("Otavalo"));
    assert_eq!(transport.count(Method::Get, "/clientes"), 2);

    Ok(())
}

#[tokio::test]
async fn test_customer_update_with_password_includes_it() -> Result<()> {
    let (transport, api, notifications) = setup();
    transport
        .ok(Method::Get, "/clientes", customers_json())
        .ok(Method::Put, "/clientes/2", customers_json()[1].clone());
    let mut view = CustomersView::new(api, notifications);
    view.load().await?;

    let marianela = view.customers[1].clone();
    view.select(&marianela);
    view.form.password = "5678".into();
    view.save().await?;

    let body = transport.last(Method::Put, "/clientes/2").unwrap().body.unwrap();
    assert_eq!(body["contrasena"], json!("5678"));

    Ok(())
}

#[tokio::test]
async fn test_customer_delete_failure_surfaces_backend_message() {
    let (transport, api, notifications) = setup();
    transport.fail(
        Method::Delete,
        "/clientes/1",
        400,
        json!({"message": "No se puede eliminar un cliente con cuentas activas"}),
    );
    let mut view = CustomersView::new(api, notifications.clone());

    let result = view.delete(1).await;
    assert!(matches!(result, Err(ConsoleError::Api(ref err)) if err.status == 400));
    assert_eq!(
        last_message(&notifications),
        (
            NotificationKind::Error,
            "Error deleting: No se puede eliminar un cliente con cuentas activas".to_string()
        )
    );
    assert_eq!(transport.count(Method::Get, "/clientes"), 0);
}

fn accounts_json() -> Value {
    json!([
        {"id": 1, "numeroCuenta": "478758", "tipoCuenta": "Ahorros", "saldoInicial": 2000, "estado": true, "clienteId": 1, "clienteNombre": "Jose Lema"},
        {"id": 2, "numeroCuenta": "225487", "tipoCuenta": "Corriente", "saldoInicial": 100, "estado": false, "clienteId": 2, "clienteNombre": "Marianela Montalvo"}
    ])
}

#[tokio::test]
async fn test_accounts_filter_and_active_customers() -> Result<()> {
    let (transport, api, notifications) = setup();
    transport
        .ok(Method::Get, "/cuentas", accounts_json())
        .ok(Method::Get, "/clientes", customers_json());
    let mut view = AccountsView::new(api, notifications);

    view.load().await?;
    view.load_customers().await?;
    assert_eq!(view.customers.len(), 1);

    view.search = "marianela".into();
    let numbers: Vec<&str> = view.filtered().iter().map(|a| a.number.as_str()).collect();
    assert_eq!(numbers, vec!["225487"]);

    view.search = "ahorros".into();
    let numbers: Vec<&str> = view.filtered().iter().map(|a| a.number.as_str()).collect();
    assert_eq!(numbers, vec!["478758"]);

    Ok(())
}

#[tokio::test]
async fn test_account_requires_number_type_and_customer() {
    let (transport, api, notifications) = setup();
    let mut view = AccountsView::new(api, notifications);
    let complete = AccountForm {
        number: "585545".into(),
        account_type: Some(AccountType::Checking),
        initial_balance: dec!(1000),
        active: true,
        customer_id: Some(1),
    };

    for form in [
        AccountForm { number: " ".into(), ..complete.clone() },
        AccountForm { account_type: None, ..complete.clone() },
        AccountForm { customer_id: None, ..complete.clone() },
        AccountForm { customer_id: Some(0), ..complete.clone() },
    ] {
        view.form = form;
        assert!(matches!(
            view.save().await,
            Err(ConsoleError::Validation(ValidationError::MissingFields))
        ));
    }
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_account_update_drops_display_name() -> Result<()> {
    let (transport, api, notifications) = setup();
    transport
        .ok(Method::Get, "/cuentas", accounts_json())
        .ok(Method::Put, "/cuentas/1", accounts_json()[0].clone());
    let mut view = AccountsView::new(api, notifications);
    view.load().await?;

    let account = view.accounts[0].clone();
    view.select(&account);
    view.form.active = false;
    view.save().await?;

    let body = transport.last(Method::Put, "/cuentas/1").unwrap().body.unwrap();
    assert_eq!(
        body,
        json!({"id": 1, "numeroCuenta": "478758", "tipoCuenta": "Ahorros", "saldoInicial": 2000.0, "estado": false, "clienteId": 1})
    );
    assert_eq!(transport.count(Method::Get, "/cuentas"), 2);
    assert_eq!(view.is_editing(), false);

    Ok(())
}

#[test]
fn test_movement_type_change_forces_sign() {
    let mut form = MovementForm::default();
    form.account_number = "478758".into();
    form.value = dec!(575);

    form.select_type(Some(MovementType::Withdrawal));
    assert_eq!(form.value, dec!(-575));
    form.select_type(Some(MovementType::Debit));
    assert_eq!(form.value, dec!(-575));
    form.select_type(Some(MovementType::Credit));
    assert_eq!(form.value, dec!(575));
    form.select_type(Some(MovementType::Deposit));
    assert_eq!(form.value, dec!(575));
    form.select_type(None);
    assert_eq!(form.value, dec!(575));
}

#[tokio::test]
async fn test_movement_zero_value_never_reaches_api() {
    let (transport, api, notifications) = setup();
    let mut view = MovementsView::new(api, notifications.clone());

    for movement_type in MovementType::ALL {
        view.form = MovementForm::default();
        view.form.account_number = "478758".into();
        view.form.select_type(Some(movement_type));

        let result = view.submit().await;
        assert!(matches!(result, Err(ConsoleError::Validation(ValidationError::ZeroValue))));
        assert_eq!(
            last_message(&notifications),
            (NotificationKind::Error, "Value must not be zero".to_string())
        );
    }

    view.form = MovementForm::default();
    assert!(view.submit().await.is_err());

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_movement_blank_fields_rejected() {
    let (transport, api, notifications) = setup();
    let mut view = MovementsView::new(api, notifications);

    view.form.value = dec!(10);
    view.form.account_number = "478758".into();
    assert!(matches!(
        view.submit().await,
        Err(ConsoleError::Validation(ValidationError::MissingFields))
    ));

    view.form.account_number = "".into();
    view.form.select_type(Some(MovementType::Deposit));
    assert!(matches!(
        view.submit().await,
        Err(ConsoleError::Validation(ValidationError::MissingFields))
    ));

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_movement_submit_reloads_and_clears() -> Result<()> {
    let (transport, api, notifications) = setup();
    transport
        .ok(Method::Post, "/movimientos", json!({"id": 4, "fecha": "2026-01-10T09:30:00", "tipoMovimiento": "Retiro", "valor": -575, "saldo": 1425, "numeroCuenta": "478758"}))
        .ok(Method::Get, "/movimientos", json!([{"id": 4, "fecha": "2026-01-10T09:30:00", "tipoMovimiento": "Retiro", "valor": -575, "saldo": 1425, "numeroCuenta": "478758"}]));
    let mut view = MovementsView::new(api, notifications.clone());

    view.form.account_number = "478758".into();
    view.form.value = dec!(575);
    view.form.select_type(Some(MovementType::Withdrawal));
    view.submit().await?;

    let body = transport.last(Method::Post, "/movimientos").unwrap().body.unwrap();
    assert_eq!(body, json!({"tipoMovimiento": "Retiro", "valor": -575.0, "numeroCuenta": "478758"}));
    assert_eq!(view.movements.len(), 1);
    assert_eq!(view.form, MovementForm::default());
    assert_eq!(last_message(&notifications).0, NotificationKind::Success);

    view.search = "retiro".into();
    assert_eq!(view.filtered().len(), 1);
    view.search = "deposito".into();
    assert_eq!(view.filtered().len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_movement_picker_only_offers_active_accounts() -> Result<()> {
    let (transport, api, notifications) = setup();
    transport.ok(Method::Get, "/cuentas", accounts_json());
    let mut view = MovementsView::new(api, notifications.clone());

    view.load_accounts().await?;
    let numbers: Vec<&str> = view.accounts.iter().map(|a| a.number.as_str()).collect();
    assert_eq!(numbers, vec!["478758"]);

    let result = view.choose_account("225487");
    assert!(matches!(
        result,
        Err(ConsoleError::Validation(ValidationError::InactiveAccount(ref number))) if number == "225487"
    ));
    assert_eq!(
        last_message(&notifications),
        (NotificationKind::Error, "Account 225487 is not an active account".to_string())
    );
    assert_eq!(view.form.account_number, "");

    view.choose_account(" 478758 ")?;
    assert_eq!(view.form.account_number, "478758");
    assert_eq!(transport.requests().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_movement_backend_rejection_keeps_form() {
    let (transport, api, notifications) = setup();
    transport.fail(Method::Post, "/movimientos", 400, json!({"message": "Saldo no disponible"}));
    let mut view = MovementsView::new(api, notifications.clone());

    view.form.account_number = "225487".into();
    view.form.value = dec!(540);
    view.form.select_type(Some(MovementType::Debit));
    let form = view.form.clone();

    assert!(view.submit().await.is_err());
    assert_eq!(
        last_message(&notifications),
        (NotificationKind::Error, "Error: Saldo no disponible".to_string())
    );
    assert_eq!(view.form, form);
    assert_eq!(transport.count(Method::Get, "/movimientos"), 0);
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

fn report_json() -> Value {
    json!([
        {"fecha": "2026-02-10T09:30:00", "cliente": "Jose Lema", "numeroCuenta": "478758", "tipo": "Ahorros", "saldoInicial": 2000, "estado": true, "movimiento": 100, "saldoDisponible": 2100},
        {"fecha": "2026-02-11T09:30:00", "cliente": "Jose Lema", "numeroCuenta": "478758", "tipo": "Ahorros", "saldoInicial": 2100, "estado": true, "movimiento": -40, "saldoDisponible": 2060},
        {"fecha": "2026-02-12T09:30:00", "cliente": "Jose Lema", "numeroCuenta": "478758", "tipo": "Ahorros", "saldoInicial": 2060, "estado": true, "movimiento": 25, "saldoDisponible": 2085},
        {"fecha": "2026-02-13T09:30:00", "cliente": "Jose Lema", "numeroCuenta": "478758", "tipo": "Ahorros", "saldoInicial": 2085, "estado": true, "movimiento": -10, "saldoDisponible": 2075}
    ])
}

#[tokio::test]
async fn test_report_defaults_to_trailing_month() {
    let (_, api, notifications) = setup();
    let view = ReportsView::new(api, notifications, today());

    assert_eq!(view.query.start, NaiveDate::from_ymd_opt(2026, 1, 30));
    assert_eq!(view.query.end, Some(today()));
    assert_eq!(view.query.customer_id, None);
}

#[tokio::test]
async fn test_report_validation_happens_before_request() {
    let (transport, api, notifications) = setup();
    let mut view = ReportsView::new(api, notifications.clone(), today());

    assert!(matches!(
        view.generate_in(today(), &Utc).await,
        Err(ConsoleError::Validation(ValidationError::MissingFields))
    ));

    view.query.customer_id = Some(1);
    view.query.start = NaiveDate::from_ymd_opt(2026, 2, 1);
    view.query.end = NaiveDate::from_ymd_opt(2026, 1, 1);
    assert!(matches!(
        view.generate_in(today(), &Utc).await,
        Err(ConsoleError::Validation(ValidationError::StartAfterEnd))
    ));

    view.query.end = NaiveDate::from_ymd_opt(2026, 3, 2);
    assert!(matches!(
        view.generate_in(today(), &Utc).await,
        Err(ConsoleError::Validation(ValidationError::FutureDate))
    ));
    assert_eq!(
        last_message(&notifications),
        (NotificationKind::Error, "Dates cannot be in the future".to_string())
    );

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_report_generation_and_totals() -> Result<()> {
    let (transport, api, notifications) = setup();
    transport
        .ok(Method::Get, "/clientes", customers_json())
        .ok(Method::Get, "/reportes", report_json());
    let mut view = ReportsView::new(api, notifications.clone(), today());
    view.load_customers().await?;
    assert_eq!(view.customers.len(), 1);

    view.query.customer_id = Some(1);
    view.query.start = NaiveDate::from_ymd_opt(2026, 2, 1);
    view.query.end = NaiveDate::from_ymd_opt(2026, 2, 28);
    let summary = view.generate_in(today(), &Utc).await?;

    assert_eq!(summary.total_credits(), dec!(125));
    assert_eq!(summary.total_debits(), dec!(50));
    assert_eq!(summary.balance(), dec!(75));
    assert_eq!(view.rows().len(), 4);
    assert_eq!(view.customer_name(), "Jose Lema");
    assert_eq!(
        last_message(&notifications),
        (NotificationKind::Success, "Report generated successfully".to_string())
    );

    let request = transport.last(Method::Get, "/reportes").unwrap();
    assert_eq!(
        request.query,
        vec![
            ("clienteId".to_string(), "1".to_string()),
            ("fechaInicio".to_string(), "2026-02-01T00:00:00.000Z".to_string()),
            ("fechaFin".to_string(), "2026-02-28T23:59:59.000Z".to_string()),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_empty_report_is_informational_and_not_exportable() -> Result<()> {
    let (transport, api, notifications) = setup();
    transport.ok(Method::Get, "/reportes", json!([]));
    let mut view = ReportsView::new(api, notifications.clone(), today());
    view.query.customer_id = Some(1);

    let summary = view.generate_in(today(), &Utc).await?;
    assert_eq!(summary.rows(), 0);
    assert_eq!(
        last_message(&notifications),
        (NotificationKind::Info, "No movements found in the selected date range".to_string())
    );

    let exporters: [Exporter; 2] = [PdfExporter.into(), JsonExporter.into()];
    for exporter in exporters {
        match view.export(exporter, &std::env::temp_dir()) {
            Err(ConsoleError::Export(ExportError::EmptyReport)) => {},
            other => bail!("empty report must not be exported, got {:?}", other),
        }
        assert_eq!(
            last_message(&notifications),
            (NotificationKind::Error, "No data to export".to_string())
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_report_backend_failure() {
    let (transport, api, notifications) = setup();
    transport.fail(Method::Get, "/reportes", 404, json!({"message": "Cliente no encontrado con id: 9"}));
    let mut view = ReportsView::new(api, notifications.clone(), today());
    view.query.customer_id = Some(9);

    assert!(view.generate_in(today(), &Utc).await.is_err());
    assert_eq!(view.customer_name(), "N/A");
    assert_eq!(
        last_message(&notifications),
        (
            NotificationKind::Error,
            "Error generating report: Cliente no encontrado con id: 9".to_string()
        )
    );
}

#[tokio::test]
async fn test_report_export_writes_file() -> Result<()> {
    let (transport, api, notifications) = setup();
    transport
        .ok(Method::Get, "/clientes", customers_json())
        .ok(Method::Get, "/reportes", report_json());
    let mut view = ReportsView::new(api, notifications.clone(), today());
    view.load_customers().await?;
    view.query.customer_id = Some(1);
    view.generate_in(today(), &Utc).await?;

    let dir = std::env::temp_dir().join(format!("bank-console-view-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let path = view.export(PdfExporter.into(), &dir)?;

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("report-jose-lema-"));
    assert!(name.ends_with(".pdf"));
    assert!(std::fs::read(&path)?.starts_with(b"%PDF-"));
    assert_eq!(
        last_message(&notifications),
        (NotificationKind::Success, "PDF downloaded successfully".to_string())
    );

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[tokio::test]
async fn test_report_export_names_the_customer_it_was_generated_for() -> Result<()> {
    let (transport, api, notifications) = setup();
    transport
        .ok(Method::Get, "/clientes", customers_json())
        .ok(Method::Get, "/reportes", report_json());
    let mut view = ReportsView::new(api, notifications, today());
    view.load_customers().await?;
    view.customers.push(Customer {
        id: Some(3),
        name: "Juan Osorio".into(),
        ..Customer::default()
    });

    view.query.customer_id = Some(1);
    view.generate_in(today(), &Utc).await?;
    view.query.customer_id = Some(3);
    assert_eq!(view.customer_name(), "Jose Lema");

    let dir = std::env::temp_dir().join(format!("bank-console-reselect-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let path = view.export(CsvExporter.into(), &dir)?;

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("report-jose-lema-"), "unexpected file name {}", name);

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
