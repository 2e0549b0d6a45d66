//! Argument parsing and command-surface types.
//!
//! Slot records are passed as JSON objects using the stored field names, e.g.
//! `reelbase movie add '{"movieId":"10","title":"T","releaseDate":"1999-01-01","director":2}'`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use reelbase_core::person::PersonKind;
use reelbase_core::types::PersonId;

#[derive(Parser, Debug)]
#[command(name = "reelbase", version)]
#[command(about = "Manage people and movies in a reelbase store")]
pub struct Cli {
    /// Store directory; overrides `REELBASE_DATA_DIR`.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Person {
        #[command(subcommand)]
        command: PersonCommand,
    },
    Movie {
        #[command(subcommand)]
        command: MovieCommand,
    },
    /// Remove every stored collection.
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum PersonCommand {
    Add {
        #[arg(long, value_enum, default_value_t = KindArg::Person)]
        kind: KindArg,
        /// JSON slot record: `{"personId":..,"name":..,"agent":..}`.
        slots: String,
    },
    Update {
        slots: String,
    },
    Destroy {
        id: PersonId,
    },
    List {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MovieCommand {
    Add {
        slots: String,
    },
    Update {
        slots: String,
    },
    Destroy {
        id: String,
    },
    List,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    Person,
    Director,
    Actor,
}

impl From<KindArg> for PersonKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Person => PersonKind::Person,
            KindArg::Director => PersonKind::Director,
            KindArg::Actor => PersonKind::Actor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_person_add_with_kind() {
        let cli = Cli::try_parse_from([
            "reelbase",
            "--data-dir",
            "/tmp/x",
            "person",
            "add",
            "--kind",
            "director",
            r#"{"personId":2,"name":"D"}"#,
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        match cli.command {
            Command::Person {
                command: PersonCommand::Add { kind, slots },
            } => {
                assert_eq!(PersonKind::from(kind), PersonKind::Director);
                assert!(slots.contains("personId"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn person_kind_defaults_to_plain_person() {
        let cli = Cli::try_parse_from(["reelbase", "person", "add", "{}"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Person {
                command: PersonCommand::Add {
                    kind: KindArg::Person,
                    ..
                }
            }
        ));
    }

    #[test]
    fn destroy_person_requires_integer_id() {
        assert!(Cli::try_parse_from(["reelbase", "person", "destroy", "abc"]).is_err());
        assert!(Cli::try_parse_from(["reelbase", "movie", "destroy", "abc"]).is_ok());
    }
}
