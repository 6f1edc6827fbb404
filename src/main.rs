use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use rust_decimal::Decimal;

use bank_console::api::{ApiClient, HttpTransport};
use bank_console::config::ConsoleConfig;
use bank_console::console::{AccountForm, AccountsView, CustomerForm, CustomersView, MovementsView, ReportsView};
use bank_console::model::{AccountType, MovementType, GENDERS};
use bank_console::report::{CsvExporter, Exporter, JsonExporter, PdfExporter};
use bank_console::state::{LoadingState, NotificationKind, Notifications};

#[derive(Parser, Debug)]
#[command(name = "bank-console", version, about = "Back-office console for customers, accounts and movements")]
struct Cli {
    /// Backend base URL (overrides BANK_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Customer records
    #[command(subcommand)]
    Customers(CustomerCommand),
    /// Bank accounts
    #[command(subcommand)]
    Accounts(AccountCommand),
    /// Deposits, withdrawals, credits and debits
    #[command(subcommand)]
    Movements(MovementCommand),
    /// Statement of a customer's movements over a date range
    Report {
        #[arg(long)]
        customer: i64,
        /// First day, YYYY-MM-DD (default: 30 days ago)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day, YYYY-MM-DD (default: today)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Also write the report in this format
        #[arg(long, value_enum)]
        format: Option<Format>,
        /// Directory for the exported file
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum CustomerCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, value_parser = GENDERS)]
        gender: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        identification: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        inactive: bool,
    },
    /// Change selected fields; the password is kept unless a new one is given
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Create {
        #[arg(long)]
        number: String,
        #[arg(long, value_enum)]
        kind: Kind,
        #[arg(long, default_value = "0")]
        initial_balance: Decimal,
        #[arg(long)]
        customer: i64,
        #[arg(long)]
        inactive: bool,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum MovementCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Create {
        #[arg(long)]
        account: String,
        #[arg(long, value_enum)]
        kind: Movement,
        /// Amount; the sign is forced by the movement kind
        #[arg(long, allow_hyphen_values = true)]
        value: Decimal,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Kind {
    Savings,
    Checking,
}

impl From<Kind> for AccountType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Savings => AccountType::Savings,
            Kind::Checking => AccountType::Checking,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Movement {
    Deposit,
    Withdrawal,
    Credit,
    Debit,
}

impl From<Movement> for MovementType {
    fn from(kind: Movement) -> Self {
        match kind {
            Movement::Deposit => MovementType::Deposit,
            Movement::Withdrawal => MovementType::Withdrawal,
            Movement::Credit => MovementType::Credit,
            Movement::Debit => MovementType::Debit,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Pdf,
    Json,
    Csv,
}

impl From<Format> for Exporter {
    fn from(format: Format) -> Self {
        match format {
            Format::Pdf => PdfExporter.into(),
            Format::Json => JsonExporter.into(),
            Format::Csv => CsvExporter.into(),
        }
    }
}

fn print_notification(notifications: &Notifications) {
    if let Some(notification) = notifications.last() {
        let tag = match notification.kind() {
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
        };
        println!("[{}] {}", tag, notification.message());
    }
}

async fn customers(command: CustomerCommand, api: ApiClient, notifications: Notifications) -> Result<()> {
    let mut view = CustomersView::new(api, notifications);

    match command {
        CustomerCommand::List { search } => {
            view.load().await?;
            view.search = search;
            for c in view.filtered() {
                println!(
                    "{:>5}  {:<30} {:<12} {:<12} {:<3} {}",
                    c.id.unwrap_or_default(),
                    c.name,
                    c.identification,
                    c.phone,
                    c.age,
                    if c.active { "active" } else { "inactive" }
                );
            }
        },
        CustomerCommand::Create {
            name,
            gender,
            age,
            identification,
            address,
            phone,
            password,
            inactive,
        } => {
            view.form = CustomerForm {
                name,
                gender,
                age,
                identification,
                address,
                phone,
                password,
                active: !inactive,
            };
            view.save().await?;
        },
        CustomerCommand::Update {
            id,
            name,
            address,
            phone,
            password,
            active,
        } => {
            view.load().await?;
            let Some(customer) = view.customers.iter().find(|c| c.id == Some(id)).cloned() else {
                bail!("customer {} not found", id);
            };
            view.select(&customer);
            if let Some(name) = name {
                view.form.name = name;
            }
            if let Some(address) = address {
                view.form.address = address;
            }
            if let Some(phone) = phone {
                view.form.phone = phone;
            }
            if let Some(password) = password {
                view.form.password = password;
            }
            if let Some(active) = active {
                view.form.active = active;
            }
            view.save().await?;
        },
        CustomerCommand::Delete { id } => view.delete(id).await?,
    }

    Ok(())
}

async fn accounts(command: AccountCommand, api: ApiClient, notifications: Notifications) -> Result<()> {
    let mut view = AccountsView::new(api, notifications);

    match command {
        AccountCommand::List { search } => {
            view.load().await?;
            view.search = search;
            for a in view.filtered() {
                println!(
                    "{:>5}  {:<12} {:<10} {:>12.2} {:<30} {}",
                    a.id.unwrap_or_default(),
                    a.number,
                    a.account_type.label(),
                    a.initial_balance,
                    a.customer_name.as_deref().unwrap_or("-"),
                    if a.active { "active" } else { "inactive" }
                );
            }
        },
        AccountCommand::Create {
            number,
            kind,
            initial_balance,
            customer,
            inactive,
        } => {
            view.form = AccountForm {
                number,
                account_type: Some(kind.into()),
                initial_balance,
                active: !inactive,
                customer_id: Some(customer),
            };
            view.save().await?;
        },
        AccountCommand::Delete { id } => view.delete(id).await?,
    }

    Ok(())
}

async fn movements(command: MovementCommand, api: ApiClient, notifications: Notifications) -> Result<()> {
    let mut view = MovementsView::new(api, notifications);

    match command {
        MovementCommand::List { search } => {
            view.load().await?;
            view.search = search;
            for m in view.filtered() {
                println!(
                    "{:>5}  {:<19} {:<10} {:>12.2} {:>12} {}",
                    m.id.unwrap_or_default(),
                    m.timestamp.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()).unwrap_or_default(),
                    m.movement_type.label(),
                    m.value,
                    m.balance.map(|b| format!("{:.2}", b)).unwrap_or_default(),
                    m.account_number
                );
            }
        },
        MovementCommand::Create { account, kind, value } => {
            view.load_accounts().await?;
            view.choose_account(&account)?;
            view.form.value = value;
            view.form.select_type(Some(kind.into()));
            view.submit().await?;
        },
        MovementCommand::Delete { id } => view.delete(id).await?,
    }

    Ok(())
}

struct ReportArgs {
    customer: i64,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    format: Option<Format>,
    out: PathBuf,
}

async fn report(args: ReportArgs, api: ApiClient, notifications: Notifications) -> Result<()> {
    let today = Local::now().date_naive();
    let mut view = ReportsView::new(api, notifications.clone(), today);
    view.load_customers().await?;

    view.query.customer_id = Some(args.customer);
    if args.from.is_some() {
        view.query.start = args.from;
    }
    if args.to.is_some() {
        view.query.end = args.to;
    }

    let summary = view.generate(today).await?;
    for r in view.rows() {
        println!(
            "{}  {:<12} {:<10} {:>12.2} {:<8} {:>12.2} {:>12.2}",
            r.date.format("%Y-%m-%d"),
            r.account_number,
            r.account_type,
            r.balance_before,
            if r.active { "Active" } else { "Inactive" },
            r.movement,
            r.balance_after
        );
    }
    println!("Total credits: {:.2}", summary.total_credits());
    println!("Total debits:  {:.2}", summary.total_debits());
    println!("Balance:       {:.2}", summary.balance());

    if let Some(format) = args.format {
        let path = view.export(format.into(), &args.out)?;
        info!("report written to {}", path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConsoleConfig::from_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str())).init();

    let api_url = cli.api_url.unwrap_or(config.api_url);
    info!("using backend at {}", api_url);

    let loading = LoadingState::new();
    let notifications = Notifications::new(config.message_duration);
    let api = ApiClient::new(HttpTransport::new(&api_url), loading);

    let result = match cli.command {
        Command::Customers(command) => customers(command, api, notifications.clone()).await,
        Command::Accounts(command) => accounts(command, api, notifications.clone()).await,
        Command::Movements(command) => movements(command, api, notifications.clone()).await,
        Command::Report {
            customer,
            from,
            to,
            format,
            out,
        } => {
            let args = ReportArgs {
                customer,
                from,
                to,
                format,
                out,
            };
            report(args, api, notifications.clone()).await
        },
    };

    if let Err(err) = result {
        match notifications.last() {
            Some(_) => print_notification(&notifications),
            None => eprintln!("error: {:#}", err),
        }
        std::process::exit(1);
    }

    print_notification(&notifications);
    Ok(())
}
