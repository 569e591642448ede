use clap::Parser;
use package_gate::adapters::relay::{handle_form_submission, FormRelay, FormStatus};
use package_gate::adapters::terminal::TerminalDialog;
use package_gate::core::Clock;
use package_gate::utils::error::ErrorSeverity;
use package_gate::utils::{logger, validation::Validate};
use package_gate::{
    CliConfig, Command, FixedClock, MountedGate, Page, PackagesError, PurchaseOutcome,
    RegistrationGate, SiteConfig, SystemClock,
};
use rust_decimal::Decimal;
use url::Url;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting packages CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match cli.load_site_config().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0, // 使用者已看過通知
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn clock_for(cli: &CliConfig) -> Box<dyn Clock> {
    match cli.today {
        Some(date) => {
            tracing::info!("🕒 Using fixed date {}", date);
            Box::new(FixedClock::at_start_of(date))
        }
        None => Box::new(SystemClock),
    }
}

fn mount_page(
    cli: &CliConfig,
    config: &SiteConfig,
) -> package_gate::Result<(MountedGate<Box<dyn Clock>>, Page)> {
    let gate_config = config.gate_config()?;
    let mut page = Page::for_catalog(&gate_config.catalog);
    let gate = RegistrationGate::new(gate_config, clock_for(cli)).mount(&mut page);
    Ok((gate, page))
}

async fn run(cli: &CliConfig, config: &SiteConfig) -> package_gate::Result<()> {
    match &cli.command {
        Command::Status => {
            let (gate, page) = mount_page(cli, config)?;
            let state = if gate.is_registration_open() { "OPEN" } else { "CLOSED" };
            println!("Registration: {}", state);
            print!("{}", page);
        }

        Command::Buy {
            package,
            price,
            yes,
        } => {
            let (gate, page) = mount_page(cli, config)?;
            let displayed_price = price
                .or_else(|| page.button(package).and_then(|b| b.displayed_price()))
                .unwrap_or(Decimal::ZERO);

            let mut dialog = TerminalDialog::stdio(*yes);
            match gate.on_purchase_button_activated(package, displayed_price, &mut dialog)? {
                PurchaseOutcome::Declined => println!("Purchase cancelled."),
                PurchaseOutcome::Prepared(record) => {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }
            }
        }

        Command::Return { url } => {
            let mut location = Url::parse(url)?;
            let (gate, _page) = mount_page(cli, config)?;
            let mut dialog = TerminalDialog::stdio(false);

            if gate.on_page_load(&mut location, &mut dialog).is_none() {
                tracing::info!("No payment status in {}", url);
            }
            println!("{}", location);
        }

        Command::Chat { number, message } => {
            let message = message.as_deref().unwrap_or(&config.chat.default_message);
            let link = config.chat.compose_link(number.as_deref(), Some(message));
            println!("{}", link);
        }

        Command::Contact { fields } => {
            let contact = config
                .contact
                .clone()
                .ok_or_else(|| PackagesError::MissingConfigError {
                    field: "contact".to_string(),
                })?;
            let relay = FormRelay::new(contact)?;

            println!("Sending...");
            let status = handle_form_submission(&relay, fields).await;
            println!("{}", status.message());
            if let FormStatus::Failed { reason } = status {
                tracing::debug!("Relay failure reason: {}", reason);
            }
        }
    }

    Ok(())
}
