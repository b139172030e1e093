use clap::Parser;
use qrbill_tools::config::toml_config::LogFormat;
use qrbill_tools::config::{Command, ReferenceType};
use qrbill_tools::core::payments::{create_iso_reference, create_qr_reference};
use qrbill_tools::core::PostalCodeSource;
use qrbill_tools::utils::error::ErrorSeverity;
use qrbill_tools::utils::{logger, validation::Validate};
use qrbill_tools::{
    update_bill_field_from_text, validate_bill, AppConfig, CliConfig, FilePostalCodeSource,
    HttpPostalCodeSource, LocalStorage, PostalCodeService, QrBill, QrBillError, ReferenceKind,
    Result,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 載入配置，未指定檔案時使用預設值
    let config = match &cli.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    match config.logging.format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose, &config.logging.level),
        LogFormat::Json => logger::init_json_logger(cli.verbose, &config.logging.level),
    }
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2, // 網路錯誤，可重試
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Format(args) => {
            println!("{}", args.field.formatter().formatted_value(Some(args.value.as_str())));
        }
        Command::Parse(args) => {
            println!("{}", args.field.formatter().raw_value(&args.value));
        }
        Command::Classify { reference } => {
            let kind = ReferenceKind::classify(Some(reference.as_str()));
            println!("{}", serde_json::to_string(&kind)?.trim_matches('"'));
        }
        Command::CreateReference { kind, value } => {
            let reference = match kind {
                ReferenceType::Qr => create_qr_reference(&value),
                ReferenceType::Iso => create_iso_reference(&value),
            };
            let reference = reference.ok_or_else(|| QrBillError::PaymentValidation {
                field: "reference".to_string(),
                message: format!("cannot create a {:?} reference from '{}'", kind, value),
            })?;
            println!("{}", reference);
        }
        Command::Validate { bill } => {
            let bill = read_bill(&bill).await?;
            let result = validate_bill(&bill);
            println!("{}", serde_json::to_string_pretty(&result)?);
            bill.validate()?;
            tracing::info!("✅ Bill is valid");
        }
        Command::Update { bill, path, value } => {
            let bill = read_bill(&bill).await?;
            let updated = update_bill_field_from_text(&bill, &path, &value)?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        Command::Suggest {
            substring,
            country,
            archive,
        } => {
            let suggestions = match archive {
                Some(path) => suggest(FilePostalCodeSource::new(path), config, &country, &substring).await?,
                None => {
                    let source = HttpPostalCodeSource::new(
                        config.postal_codes.source_url.clone(),
                        config.request_timeout(),
                    )?;
                    suggest(source, config, &country, &substring).await?
                }
            };
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
    }
    Ok(())
}

async fn read_bill(path: &str) -> Result<QrBill> {
    tracing::debug!("Reading bill from {}", path);
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

async fn suggest<P: PostalCodeSource>(
    source: P,
    config: &AppConfig,
    country: &str,
    substring: &str,
) -> Result<Vec<qrbill_tools::PostalCode>> {
    let cache = config.postal_codes.cache_dir.as_ref().map(LocalStorage::new);
    let service = PostalCodeService::new(source, cache, config.postal_codes.max_suggestions);
    service.suggest(Some(country), substring).await
}
