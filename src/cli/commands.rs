//! Shell context and command dispatch.

use std::io;

use chrono::{NaiveDate, Utc};
use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{Config, ConfigManager};
use crate::core::services::{BatchService, DebtService, PaymentService, ServiceError, UserService};
use crate::core::OfficeManager;
use crate::dashboard::{DashboardService, Period};
use crate::domain::{Client, Debt, DebtFilters, DebtKind, Role, TreasuryAccount, User};
use crate::errors::BackofficeError;
use crate::office::BackOffice;
use crate::storage::JsonStore;

use super::output;

/// Fatal shell errors that abort the read loop.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Core(#[from] BackofficeError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

/// Per-command failures, reported and recovered from.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("no office loaded")]
    OfficeNotLoaded,
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Core(#[from] BackofficeError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

const COMMANDS: &[&str] = &[
    "help", "exit", "quit", "office", "client", "account", "user", "batch", "debt", "pay",
    "pay-internal", "dashboard",
];

pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    manager: OfficeManager,
    config_manager: ConfigManager,
    config: Config,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let store = JsonStore::new(None, None)?;
        let manager = OfficeManager::new(Box::new(store));
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let mut context = Self {
            mode,
            running: true,
            manager,
            config_manager,
            config,
        };
        context.auto_load_last();
        Ok(context)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        COMMANDS.to_vec()
    }

    pub fn prompt(&self) -> String {
        match self.manager.current_name() {
            Some(name) => format!("{name}> "),
            None => "backoffice> ".to_string(),
        }
    }

    fn auto_load_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(name) = self.config.last_opened_office.clone() else {
            return;
        };
        if self.manager.load(&name).is_ok() {
            output::success(format!("Automatically loaded last office `{name}`."));
        }
    }

    pub fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let result = match command {
            "help" => self.cmd_help(),
            "exit" | "quit" => Err(CommandError::ExitRequested),
            "office" => self.cmd_office(args),
            "client" => self.cmd_client(args),
            "account" => self.cmd_account(args),
            "user" => self.cmd_user(args),
            "batch" => self.cmd_batch(args),
            "debt" => self.cmd_debt(args),
            "pay" => self.cmd_pay(args),
            "pay-internal" => self.cmd_pay_internal(args),
            "dashboard" => self.cmd_dashboard(args),
            _ => {
                self.suggest_command(raw);
                return Ok(LoopControl::Continue);
            }
        };
        match result {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        let mut suggestions: Vec<_> = COMMANDS
            .iter()
            .map(|name| (levenshtein(name, input), *name))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);
        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{best}`?"));
            }
        }
    }

    pub fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Exit shell?")
            .default(false)
            .interact()?)
    }

    pub fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help` for usage details.");
                Ok(())
            }
            CommandError::OfficeNotLoaded => {
                output::error("No office loaded. Use `office new` or `office load` first.");
                Ok(())
            }
            other => {
                output::error(other.to_string());
                Ok(())
            }
        }
    }

    fn office(&self) -> Result<&BackOffice, CommandError> {
        self.manager.current.as_ref().ok_or(CommandError::OfficeNotLoaded)
    }

    fn office_mut(&mut self) -> Result<&mut BackOffice, CommandError> {
        self.manager.current.as_mut().ok_or(CommandError::OfficeNotLoaded)
    }

    fn cmd_help(&self) -> CommandResult {
        output::section("Commands");
        println!("office new <name> | load <name> | save [name] | list | backup [note]");
        println!("client add <name> <doc-type> <doc-number> | list");
        println!("account add <description> [--clearing] | list");
        println!("user add <name> <email> <admin|supervisor|vendor|collector> | list");
        println!("batch open | close | status");
        println!("debt add <external|internal> <total> <yyyy-mm-dd> [client-id] | list [filter] | summary");
        println!("pay <debt-id> <amount> <account-id> [description]");
        println!("pay-internal <debt-id> <amount> <account-id> <category-id> <user-id>");
        println!("dashboard summary | sales <week|month|quarter|year> | alerts");
        println!("exit");
        Ok(())
    }

    fn cmd_office(&mut self, args: &[&str]) -> CommandResult {
        match args {
            ["new", name] => {
                self.manager.set_current(BackOffice::new(*name), None, None);
                self.manager.save_as(name)?;
                self.record_last_opened(name)?;
                output::success(format!("Created office `{name}`."));
            }
            ["load", name] => {
                self.manager.load(name)?;
                self.record_last_opened(name)?;
                output::success(format!("Loaded office `{name}`."));
            }
            ["save"] => {
                let path = self.manager.save()?;
                output::success(format!("Saved to {}.", path.display()));
            }
            ["save", name] => {
                self.manager.save_as(name)?;
                self.record_last_opened(name)?;
                output::success(format!("Saved office as `{name}`."));
            }
            ["list"] => {
                for name in self.manager.list_offices()? {
                    println!("{name}");
                }
            }
            ["backup"] => {
                let path = self.manager.backup(None)?;
                output::success(format!("Backup written to {}.", path.display()));
            }
            ["backup", note] => {
                let path = self.manager.backup(Some(note))?;
                output::success(format!("Backup written to {}.", path.display()));
            }
            _ => {
                return Err(CommandError::InvalidArguments(
                    "Usage: office new|load|save|list|backup".into(),
                ))
            }
        }
        Ok(())
    }

    fn cmd_client(&mut self, args: &[&str]) -> CommandResult {
        match args {
            ["add", name, doc_type, doc_number] => {
                let office = self.office_mut()?;
                let id = office.add_client(Client::new(*name, *doc_type, *doc_number));
                output::success(format!("Client created: {id}"));
            }
            ["list"] => {
                let office = self.office()?;
                for client in &office.clients {
                    println!(
                        "{}  {}  {} {}",
                        client.id, client.legal_name, client.doc_type, client.doc_number
                    );
                }
            }
            _ => {
                return Err(CommandError::InvalidArguments(
                    "Usage: client add <name> <doc-type> <doc-number> | client list".into(),
                ))
            }
        }
        Ok(())
    }

    fn cmd_account(&mut self, args: &[&str]) -> CommandResult {
        match args {
            ["add", description] => {
                let office = self.office_mut()?;
                let id = office.add_treasury_account(TreasuryAccount::new(*description));
                output::success(format!("Treasury account created: {id}"));
            }
            ["add", description, "--clearing"] => {
                let office = self.office_mut()?;
                let id = office.add_treasury_account(TreasuryAccount::clearing(*description));
                output::success(format!("Clearing account created: {id}"));
            }
            ["list"] => {
                let office = self.office()?;
                for account in DebtService::payable_accounts(office) {
                    println!("{}  {}", account.id, account.description);
                }
            }
            _ => {
                return Err(CommandError::InvalidArguments(
                    "Usage: account add <description> [--clearing] | account list".into(),
                ))
            }
        }
        Ok(())
    }

    fn cmd_user(&mut self, args: &[&str]) -> CommandResult {
        match args {
            ["add", name, email, role] => {
                let role = parse_role(role)?;
                let office = self.office_mut()?;
                let id = UserService::create(office, User::new(*name, *email, role))?;
                output::success(format!("User created: {id}"));
            }
            ["list"] => {
                let office = self.office()?;
                for user in UserService::list(office) {
                    println!("{}  {}  {}  {}", user.id, user.name, user.email, user.role.label());
                }
            }
            _ => {
                return Err(CommandError::InvalidArguments(
                    "Usage: user add <name> <email> <role> | user list".into(),
                ))
            }
        }
        Ok(())
    }

    fn cmd_batch(&mut self, args: &[&str]) -> CommandResult {
        match args {
            ["open"] => {
                let office = self.office_mut()?;
                let id = BatchService::open(office)?;
                output::success(format!("Batch opened: {id}"));
            }
            ["close"] => {
                let office = self.office_mut()?;
                let id = BatchService::open_batch(office).ok_or_else(|| {
                    CommandError::InvalidArguments("No open batch to close".into())
                })?;
                BatchService::close(office, id)?;
                output::success("Batch closed.");
            }
            ["status"] => {
                let office = self.office()?;
                match BatchService::open_batch(office) {
                    Some(id) => output::info(format!("Open batch: {id}")),
                    None => output::info("No open batch."),
                }
            }
            _ => {
                return Err(CommandError::InvalidArguments(
                    "Usage: batch open|close|status".into(),
                ))
            }
        }
        Ok(())
    }

    fn cmd_debt(&mut self, args: &[&str]) -> CommandResult {
        match args {
            ["add", kind, total, date, rest @ ..] => {
                let kind = parse_debt_kind(kind)?;
                let total = parse_amount(total)?;
                let date = parse_date(date)?;
                let client_id = match rest {
                    [] => None,
                    [client] => Some(parse_uuid(client)?),
                    _ => {
                        return Err(CommandError::InvalidArguments(
                            "Usage: debt add <kind> <total> <yyyy-mm-dd> [client-id]".into(),
                        ))
                    }
                };
                let office = self.office_mut()?;
                let id = DebtService::create(office, Debt::new(kind, client_id, total, date))?;
                output::success(format!("Debt created: {id}"));
            }
            ["list", rest @ ..] => {
                let filters = DebtFilters {
                    client: rest.first().map(|s| s.to_string()),
                    ..DebtFilters::default()
                };
                let office = self.office()?;
                for row in DebtService::list(office, &filters) {
                    let client = row
                        .client
                        .as_ref()
                        .map(|c| c.legal_name.as_str())
                        .unwrap_or("-");
                    println!(
                        "{}  {}  {}  total {:.2}  balance {:.2}",
                        row.debt.id,
                        row.debt.kind.label(),
                        client,
                        row.debt.total,
                        row.debt.balance
                    );
                }
            }
            ["summary"] => {
                let office = self.office()?;
                let summary = DebtService::summary(office);
                output::section("Debt summary");
                println!(
                    "external: {} open, {:.2} outstanding",
                    summary.external_count, summary.external_outstanding
                );
                println!(
                    "internal: {} open, {:.2} outstanding",
                    summary.internal_count, summary.internal_outstanding
                );
            }
            _ => {
                return Err(CommandError::InvalidArguments(
                    "Usage: debt add|list|summary".into(),
                ))
            }
        }
        Ok(())
    }

    fn cmd_pay(&mut self, args: &[&str]) -> CommandResult {
        let (debt, amount, account, description) = match args {
            [debt, amount, account] => (debt, amount, account, None),
            [debt, amount, account, description @ ..] => {
                (debt, amount, account, Some(description.join(" ")))
            }
            _ => {
                return Err(CommandError::InvalidArguments(
                    "Usage: pay <debt-id> <amount> <account-id> [description]".into(),
                ))
            }
        };
        let debt_id = parse_uuid(debt)?;
        let amount = parse_amount(amount)?;
        let account_id = parse_uuid(account)?;
        let today = Utc::now().date_naive();

        let office = self.office_mut()?;
        let id =
            PaymentService::process_external(office, debt_id, amount, account_id, today, description)?;
        let balance = office.debt(debt_id).map(|d| d.balance).unwrap_or(0.0);
        output::success(format!("Payment {id} recorded; balance {balance:.2}."));
        Ok(())
    }

    fn cmd_pay_internal(&mut self, args: &[&str]) -> CommandResult {
        let [debt, amount, account, category, user] = args else {
            return Err(CommandError::InvalidArguments(
                "Usage: pay-internal <debt-id> <amount> <account-id> <category-id> <user-id>".into(),
            ));
        };
        let debt_id = parse_uuid(debt)?;
        let amount = parse_amount(amount)?;
        let account_id = parse_uuid(account)?;
        let category_id = parse_uuid(category)?;
        let user_id = parse_uuid(user)?;
        let today = Utc::now().date_naive();

        let office = self.office_mut()?;
        let id = PaymentService::process_internal(
            office, debt_id, amount, account_id, category_id, today, None, user_id,
        )?;
        let balance = office.debt(debt_id).map(|d| d.balance).unwrap_or(0.0);
        output::success(format!("Internal payment {id} recorded; balance {balance:.2}."));
        Ok(())
    }

    fn cmd_dashboard(&mut self, args: &[&str]) -> CommandResult {
        match args {
            ["summary"] => {
                let office = self.office()?;
                let summary = DashboardService::summary(office);
                output::section("Dashboard");
                println!("total sales:    {:.2} {}", summary.total_sales, self.config.currency);
                println!("total clients:  {}", summary.total_clients);
                println!("total products: {}", summary.total_products);
            }
            ["sales", period] => {
                let period = parse_period(period)?;
                let office = self.office()?;
                for bucket in DashboardService::sales_by_period(office, period) {
                    println!("{:<8} {:.2}", bucket.label, bucket.value);
                }
            }
            ["alerts"] => {
                let office = self.office()?;
                let alerts = DashboardService::alerts(office, Utc::now());
                if alerts.is_empty() {
                    output::info("No alerts.");
                }
                for alert in alerts {
                    println!("{}: {}", alert.title, alert.message);
                }
            }
            _ => {
                return Err(CommandError::InvalidArguments(
                    "Usage: dashboard summary | sales <period> | alerts".into(),
                ))
            }
        }
        Ok(())
    }

    fn record_last_opened(&mut self, name: &str) -> CommandResult {
        self.manager.record_last_opened(Some(name))?;
        self.config.last_opened_office = Some(name.to_string());
        self.config_manager.save(&self.config)?;
        Ok(())
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid, CommandError> {
    Uuid::parse_str(raw)
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid id")))
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid amount")))
}

fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid date")))
}

fn parse_debt_kind(raw: &str) -> Result<DebtKind, CommandError> {
    match raw {
        "external" => Ok(DebtKind::External),
        "internal" => Ok(DebtKind::Internal),
        other => Err(CommandError::InvalidArguments(format!(
            "`{other}` is not a debt kind (external|internal)"
        ))),
    }
}

fn parse_role(raw: &str) -> Result<Role, CommandError> {
    match raw {
        "admin" => Ok(Role::Admin),
        "supervisor" => Ok(Role::Supervisor),
        "vendor" => Ok(Role::Vendor),
        "collector" => Ok(Role::Collector),
        other => Err(CommandError::InvalidArguments(format!(
            "`{other}` is not a role (admin|supervisor|vendor|collector)"
        ))),
    }
}

fn parse_period(raw: &str) -> Result<Period, CommandError> {
    match raw {
        "week" => Ok(Period::Week),
        "month" => Ok(Period::Month),
        "quarter" => Ok(Period::Quarter),
        "year" => Ok(Period::Year),
        other => Err(CommandError::InvalidArguments(format!(
            "`{other}` is not a period (week|month|quarter|year)"
        ))),
    }
}
