pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "qrbill")]
#[command(about = "Formats, validates and completes Swiss QR bill payment data")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Format a field value for display
    Format(FieldArgs),
    /// Convert a displayed field value back to its raw form
    Parse(FieldArgs),
    /// Classify a payment reference (empty, iso, qr, unstructured)
    Classify { reference: String },
    /// Create a QR reference or ISO 11649 creditor reference
    CreateReference {
        #[arg(value_enum)]
        kind: ReferenceType,
        value: String,
    },
    /// Validate a bill stored as JSON
    Validate { bill: String },
    /// Print a bill with one field changed
    Update {
        bill: String,
        /// Dot-separated field path, e.g. creditor.name
        #[arg(long)]
        path: String,
        /// New value as JSON; plain text, or a number the field rejects, is taken as a string
        #[arg(long)]
        value: String,
    },
    /// Suggest postal codes or towns for a substring
    Suggest {
        substring: String,
        #[arg(long, default_value = "")]
        country: String,
        /// Read the postal code archive from a local zip file instead of downloading it
        #[arg(long)]
        archive: Option<String>,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct FieldArgs {
    #[arg(value_enum)]
    pub field: FieldKind,
    pub value: String,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldKind {
    Iban,
    Reference,
    Amount,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReferenceType {
    Qr,
    Iso,
}

#[cfg(feature = "cli")]
impl FieldKind {
    pub fn formatter(self) -> &'static dyn crate::core::FieldFormatter {
        use crate::core::formatters::{AMOUNT_FORMATTER, IBAN_FORMATTER, REFERENCE_FORMATTER};
        match self {
            FieldKind::Iban => &IBAN_FORMATTER,
            FieldKind::Reference => &REFERENCE_FORMATTER,
            FieldKind::Amount => &AMOUNT_FORMATTER,
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suggest_command() {
        let config = CliConfig::parse_from(["qrbill", "-v", "suggest", "Zür", "--country", "CH"]);
        assert!(config.verbose);
        match config.command {
            Command::Suggest {
                substring,
                country,
                archive,
            } => {
                assert_eq!(substring, "Zür");
                assert_eq!(country, "CH");
                assert!(archive.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_format_command() {
        let config = CliConfig::parse_from(["qrbill", "format", "iban", "CH9300762011623852957"]);
        match config.command {
            Command::Format(args) => {
                assert_eq!(args.field, FieldKind::Iban);
                assert_eq!(
                    args.field.formatter().formatted_value(Some(args.value.as_str())),
                    "CH93 0076 2011 6238 5295 7"
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_update_command() {
        let config = CliConfig::parse_from([
            "qrbill",
            "update",
            "bill.json",
            "--path",
            "creditor.name",
            "--value",
            "Pia",
            "--config",
            "qrbill.toml",
        ]);
        assert_eq!(config.config.as_deref(), Some("qrbill.toml"));
        assert!(matches!(config.command, Command::Update { .. }));
    }
}
