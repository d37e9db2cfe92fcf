//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "medqr", version, about = "Emergency medical QR code generator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a QR code or themed wallpaper from a JSON field mapping
    Generate(GenerateArgs),

    /// View or change saved settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// JSON object of form field names to values
    #[arg(long)]
    pub fields: PathBuf,

    /// Output image; the format follows the extension
    #[arg(long, short)]
    pub output: PathBuf,

    /// Write the undecorated black-and-white symbol
    #[arg(long)]
    pub plain: bool,

    /// JSON theme overriding the default composition settings
    #[arg(long)]
    pub theme: Option<PathBuf>,

    /// Seed for the decoration layout
    #[arg(long, env = "MEDQR_SEED")]
    pub seed: Option<u64>,

    /// Font file to try before system fonts (repeatable)
    #[arg(long = "font")]
    pub fonts: Vec<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings as JSON
    Show,

    /// Update and persist settings
    Set {
        /// Caption printed under the wallpaper
        #[arg(long)]
        message: Option<String>,

        /// Local emergency services number
        #[arg(long)]
        number: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate() {
        let cli = Cli::try_parse_from([
            "medqr", "generate", "--fields", "me.json", "-o", "out.jpg", "--seed", "7", "--font",
            "a.ttf", "--font", "b.ttf",
        ])
        .unwrap();

        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.fields, PathBuf::from("me.json"));
        assert_eq!(args.output, PathBuf::from("out.jpg"));
        assert_eq!(args.seed, Some(7));
        assert!(!args.plain);
        assert_eq!(args.fonts, vec![PathBuf::from("a.ttf"), PathBuf::from("b.ttf")]);
    }

    #[test]
    fn parses_settings_set() {
        let cli = Cli::try_parse_from(["medqr", "settings", "set", "--number", "112"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Settings(SettingsCommand::Set { message: None, number: Some(ref n) }) if n == "112"
        ));
    }

    #[test]
    fn generate_requires_output() {
        assert!(Cli::try_parse_from(["medqr", "generate", "--fields", "me.json"]).is_err());
    }
}
