//! Command-line argument parsing.

use anyhow::{anyhow, bail, Result};
use crm_archive_core::IdentifierType;

pub const USAGE: &str = "\
Usage: crm-archive <command>

Commands:
  search <query...>
  archive --message-id <id> --account-id <id> --account-name <name>
  archive-by --message-id <id> (--domain <domain> | --account-name <name>)
  config show
  config set-base-url <url>
  config set-email <email>

Environment:
  CRM_ARCHIVE_TOKEN       bearer token to use instead of prompting
  CRM_ARCHIVE_BASE_URL    webhook base URL
  CRM_ARCHIVE_USER_EMAIL  email address of the signed-in user
  RUST_LOG                log filter (default: warn)";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search {
        query: String,
    },
    Archive {
        message_id: String,
        account_id: String,
        account_name: String,
    },
    ArchiveBy {
        message_id: String,
        identifier: String,
        identifier_type: IdentifierType,
    },
    ConfigShow,
    ConfigSetBaseUrl(String),
    ConfigSetEmail(String),
    Help,
}

/// Parse arguments, excluding the program name.
pub fn parse(args: &[String]) -> Result<Command> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };

    match command.as_str() {
        "search" => {
            let query = rest.join(" ");
            if query.trim().is_empty() {
                bail!("search needs a query");
            }
            Ok(Command::Search { query })
        }
        "archive" => {
            let flags = Flags::parse(rest)?;
            Ok(Command::Archive {
                message_id: flags.require("--message-id")?,
                account_id: flags.require("--account-id")?,
                account_name: flags.require("--account-name")?,
            })
        }
        "archive-by" => {
            let flags = Flags::parse(rest)?;
            let message_id = flags.require("--message-id")?;
            let (identifier, identifier_type) = match (flags.get("--domain"), flags.get("--account-name")) {
                (Some(domain), None) => (domain, IdentifierType::Domain),
                (None, Some(name)) => (name, IdentifierType::AccountName),
                _ => bail!("archive-by needs exactly one of --domain or --account-name"),
            };
            Ok(Command::ArchiveBy {
                message_id,
                identifier,
                identifier_type,
            })
        }
        "config" => match rest {
            [sub] if sub == "show" => Ok(Command::ConfigShow),
            [sub, url] if sub == "set-base-url" => Ok(Command::ConfigSetBaseUrl(url.clone())),
            [sub, email] if sub == "set-email" => Ok(Command::ConfigSetEmail(email.clone())),
            _ => bail!("unknown config command"),
        },
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => bail!("unknown command: {}", other),
    }
}

/// `--flag value` pairs in the order given.
struct Flags(Vec<(String, String)>);

impl Flags {
    fn parse(args: &[String]) -> Result<Self> {
        let mut pairs = Vec::new();
        let mut iter = args.iter();
        while let Some(flag) = iter.next() {
            if !flag.starts_with("--") {
                bail!("unexpected argument: {}", flag);
            }
            let value = iter
                .next()
                .ok_or_else(|| anyhow!("{} needs a value", flag))?;
            pairs.push((flag.clone(), value.clone()));
        }
        Ok(Self(pairs))
    }

    fn get(&self, flag: &str) -> Option<String> {
        self.0
            .iter()
            .rev()
            .find(|(name, _)| name == flag)
            .map(|(_, value)| value.clone())
    }

    fn require(&self, flag: &str) -> Result<String> {
        self.get(flag).ok_or_else(|| anyhow!("missing {}", flag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_search_joins_words() {
        assert_eq!(
            parse(&args("search acme corp")).unwrap(),
            Command::Search {
                query: "acme corp".to_string()
            }
        );
        assert!(parse(&args("search")).is_err());
    }

    #[test]
    fn test_archive_flags() {
        let cmd = parse(&args("archive --account-id a1 --message-id m1 --account-name Acme")).unwrap();
        assert_eq!(
            cmd,
            Command::Archive {
                message_id: "m1".to_string(),
                account_id: "a1".to_string(),
                account_name: "Acme".to_string(),
            }
        );
        assert!(parse(&args("archive --account-id a1")).is_err());
        assert!(parse(&args("archive --account-id")).is_err());
    }

    #[test]
    fn test_archive_by_needs_one_identifier() {
        let cmd = parse(&args("archive-by --message-id m1 --domain example.com")).unwrap();
        assert_eq!(
            cmd,
            Command::ArchiveBy {
                message_id: "m1".to_string(),
                identifier: "example.com".to_string(),
                identifier_type: IdentifierType::Domain,
            }
        );
        assert!(parse(&args("archive-by --message-id m1")).is_err());
        assert!(parse(&args("archive-by --message-id m1 --domain a --account-name b")).is_err());
    }

    #[test]
    fn test_config_and_help() {
        assert_eq!(parse(&[]).unwrap(), Command::Help);
        assert_eq!(parse(&args("config show")).unwrap(), Command::ConfigShow);
        assert_eq!(
            parse(&args("config set-email me@example.com")).unwrap(),
            Command::ConfigSetEmail("me@example.com".to_string())
        );
        assert!(parse(&args("config delete")).is_err());
        assert!(parse(&args("frobnicate")).is_err());
    }
}
