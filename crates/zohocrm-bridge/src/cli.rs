//! Command-line interface definition.

use clap::{Args, Parser, Subcommand, ValueEnum};
use zohocrm_core::{ContactDraft, PhoneLabel, PhoneNumber, TracingConfig, TracingOutputFormat};

use crate::adapter::CallContext;

/// zohocrm - Zoho CRM contacts from the command line
#[derive(Debug, Parser)]
#[command(name = "zohocrm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Picks the logging preset from the global flags. JSON output uses the
    /// service preset unless `--debug` is set.
    pub fn tracing_config(&self) -> TracingConfig {
        let config = match (self.debug, self.log_format) {
            (true, _) => TracingConfig::cli_debug(),
            (false, LogFormat::Json) => TracingConfig::service(),
            (false, _) => TracingConfig::cli(),
        };
        config.with_format(self.log_format.into())
    }
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
            LogFormat::Json => Self::Json,
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Contact operations
    Contacts {
        #[command(flatten)]
        account: AccountArgs,

        #[command(subcommand)]
        action: ContactsAction,
    },

    /// OAuth 2.0 flow helpers
    Oauth {
        #[command(subcommand)]
        action: OAuthAction,
    },
}

/// The stored credential of the account to operate on.
#[derive(Debug, Args)]
pub struct AccountArgs {
    /// API key returned by the OAuth callback (`access:refresh`)
    #[arg(long, env = "ZOHO_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Accounts server returned by the OAuth callback
    #[arg(long, env = "ZOHO_API_URL")]
    pub api_url: Option<String>,
}

impl From<AccountArgs> for CallContext {
    fn from(args: AccountArgs) -> Self {
        Self {
            api_key: args.api_key,
            api_url: args.api_url,
        }
    }
}

/// Contact actions.
#[derive(Debug, Subcommand)]
pub enum ContactsAction {
    /// List every contact
    List,

    /// Create a contact
    Create {
        #[command(flatten)]
        fields: ContactFields,
    },

    /// Update the given fields of a contact
    Update {
        /// Zoho record id
        id: String,

        #[command(flatten)]
        fields: ContactFields,
    },

    /// Delete a contact
    Delete {
        /// Zoho record id
        id: String,
    },
}

/// Writable contact fields. Fields not given are left untouched.
#[derive(Debug, Args)]
pub struct ContactFields {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Accepted but not stored by Zoho
    #[arg(long)]
    pub organization: Option<String>,

    /// Phone number as LABEL=NUMBER, e.g. MOBILE=+44 7700 900123 (can be repeated)
    #[arg(long = "phone", value_parser = parse_phone, action = clap::ArgAction::Append)]
    pub phones: Vec<PhoneNumber>,
}

impl From<ContactFields> for ContactDraft {
    fn from(fields: ContactFields) -> Self {
        Self {
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            organization: fields.organization,
            phone_numbers: fields.phones,
        }
    }
}

/// OAuth actions.
#[derive(Debug, Subcommand)]
pub enum OAuthAction {
    /// Print the consent page URL
    Url {
        /// Also open it in the default browser
        #[arg(long)]
        open: bool,
    },

    /// Exchange the parameters Zoho redirected back with for an API key
    Callback {
        /// The `code` query parameter
        #[arg(long)]
        code: Option<String>,

        /// The `accounts-server` query parameter
        #[arg(long)]
        accounts_server: Option<String>,

        /// The `error` query parameter, if Zoho sent one
        #[arg(long)]
        error: Option<String>,
    },
}

/// Parses `LABEL=NUMBER`.
fn parse_phone(value: &str) -> Result<PhoneNumber, String> {
    let (label, number) = value
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=NUMBER, got {:?}", value))?;

    let number = number.trim();
    if number.is_empty() {
        return Err("phone number is empty".to_string());
    }

    let label = PhoneLabel::parse(label);
    if !label.is_mapped() {
        return Err(format!(
            "unknown phone label, expected one of {}",
            PhoneLabel::MAPPED.map(|l| l.as_str()).join(", ")
        ));
    }

    Ok(PhoneNumber::new(label, number))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn logging_preset_follows_flags() {
        let cli = Cli::parse_from(["zohocrm", "--log-format", "json", "oauth", "url"]);
        let config = cli.tracing_config();
        assert_eq!(config.format, TracingOutputFormat::Json);
        assert!(config.spans);

        let cli = Cli::parse_from(["zohocrm", "-v", "--log-format", "json", "oauth", "url"]);
        let config = cli.tracing_config();
        assert_eq!(config.format, TracingOutputFormat::Json);
        assert!(!config.spans);
        assert!(config.verbose);

        let cli = Cli::parse_from(["zohocrm", "oauth", "url"]);
        assert_eq!(cli.tracing_config().format, TracingOutputFormat::Compact);
        assert!(!cli.tracing_config().verbose);
    }

    #[test]
    fn phone_argument() {
        assert_eq!(
            parse_phone("mobile= +44 7700 900123").unwrap(),
            PhoneNumber::new(PhoneLabel::Mobile, "+44 7700 900123")
        );
        assert!(parse_phone("555").is_err());
        assert!(parse_phone("HOME=").is_err());
        assert!(parse_phone("PAGER=555").unwrap_err().contains("HOME, WORK"));
    }

    #[test]
    fn update_arguments() {
        let cli = Cli::parse_from([
            "zohocrm",
            "contacts",
            "--api-key",
            "x:1000.rt",
            "--api-url",
            "https://accounts.zoho.eu",
            "update",
            "42",
            "--email",
            "ada@example.com",
            "--phone",
            "WORK=222",
            "--phone",
            "work=333",
        ]);

        let Command::Contacts { account, action } = cli.command else {
            panic!("expected contacts command");
        };
        assert_eq!(account.api_key.as_deref(), Some("x:1000.rt"));

        let ContactsAction::Update { id, fields } = action else {
            panic!("expected update action");
        };
        assert_eq!(id, "42");
        let draft = ContactDraft::from(fields);
        assert_eq!(draft.email.as_deref(), Some("ada@example.com"));
        assert_eq!(draft.phone_numbers.len(), 2);
        assert!(draft.first_name.is_none());
    }

    #[test]
    fn callback_arguments() {
        let cli = Cli::parse_from([
            "zohocrm",
            "oauth",
            "callback",
            "--code",
            "1000.code",
            "--accounts-server",
            "https://accounts.zoho.com",
        ]);
        let Command::Oauth { action } = cli.command else {
            panic!("expected oauth command");
        };
        let OAuthAction::Callback { code, error, .. } = action else {
            panic!("expected callback action");
        };
        assert_eq!(code.as_deref(), Some("1000.code"));
        assert!(error.is_none());
    }
}
