pub mod cli;
pub mod settings;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::Rgb;
use rand::SeedableRng;
use rand::rngs::StdRng;

use emergency_record::EmergencyRecord;
use symbol_engine::QrEncoder;
use wallpaper::{CompositionConfig, FontFace, render_plain, render_themed};

use cli::{Cli, Command, GenerateArgs, SettingsCommand};
use settings::Settings;

/// Resolve the data directory: `MEDQR_DATA_DIR` if set, else `~/.medqr`.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MEDQR_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".medqr")
}

/// Load .env from multiple candidate paths.
pub fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}

/// Settings from the data directory with environment overrides applied.
pub fn load_settings(dir: &Path) -> Settings {
    let mut settings = Settings::load(dir);
    settings.apply_overrides(|key| std::env::var(key).ok());
    settings
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let dir = data_dir();
    match cli.command {
        Command::Generate(args) => {
            let settings = load_settings(&dir);
            let written = generate(&args, &settings)?;
            println!("Saved to: {}", written.display());
        }
        Command::Settings(SettingsCommand::Show) => {
            let settings = load_settings(&dir);
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Command::Settings(SettingsCommand::Set { message, number }) => {
            // Persist only what is stored on disk, not env overrides.
            let mut settings = Settings::load(&dir);
            if let Some(message) = message {
                settings.info_message = message.trim().to_string();
            }
            if let Some(number) = number {
                settings.emergency_number = number.trim().to_string();
            }
            settings.save(&dir)?;
        }
    }
    Ok(())
}

/// Read the field mapping, render the requested variant and write it out.
pub fn generate(args: &GenerateArgs, settings: &Settings) -> anyhow::Result<PathBuf> {
    let data = std::fs::read(&args.fields)
        .with_context(|| format!("Failed to read {}", args.fields.display()))?;
    let mut fields: HashMap<String, String> = serde_json::from_slice(&data)
        .with_context(|| format!("{} is not a JSON object of strings", args.fields.display()))?;
    merge_emergency_number(&mut fields, &settings.emergency_number);
    let record = EmergencyRecord::from_fields(&fields);

    let mut config = match &args.theme {
        Some(path) => load_theme(path)?,
        None => CompositionConfig::default(),
    };
    // Fonts given on the command line win over the theme's.
    let mut fonts = args.fonts.clone();
    fonts.append(&mut config.fonts);
    config.fonts = fonts;

    let encoder = QrEncoder::default();
    let image = if args.plain {
        render_plain(&record, &encoder, &config).context("Failed to generate QR code")?
    } else {
        let font = FontFace::resolve(&config.fonts);
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        render_themed(
            &record,
            &encoder,
            &config,
            &font,
            Some(&settings.info_message),
            &mut rng,
        )
        .context("Failed to generate wallpaper")?
    };

    wallpaper::save(&image, &args.output, Rgb(config.flatten_color))
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    Ok(args.output.clone())
}

fn load_theme(path: &Path) -> anyhow::Result<CompositionConfig> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read theme {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("Invalid theme {}", path.display()))
}

/// Fill in the saved dial number when the mapping has none.
fn merge_emergency_number(fields: &mut HashMap<String, String>, number: &str) {
    let number = number.trim();
    if number.is_empty() {
        return;
    }
    let entry = fields.entry("emergency_number".into()).or_default();
    if entry.trim().is_empty() {
        *entry = number.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("medqr-app-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_fields(dir: &Path, extra: &[(&str, &str)]) -> PathBuf {
        let mut fields: HashMap<&str, &str> = HashMap::from([
            ("full_name", "Jane Doe"),
            ("blood_group", "O+"),
            ("emergency_contact_name", "John Doe"),
            ("emergency_contact_phone", "555-0100"),
        ]);
        fields.extend(extra.iter().copied());
        let path = dir.join("fields.json");
        std::fs::write(&path, serde_json::to_vec(&fields).unwrap()).unwrap();
        path
    }

    fn args(fields: PathBuf, output: PathBuf) -> GenerateArgs {
        GenerateArgs {
            fields,
            output,
            plain: false,
            theme: None,
            seed: Some(1),
            fonts: Vec::new(),
        }
    }

    #[test]
    fn merge_fills_only_blank_number() {
        let mut fields = HashMap::new();
        merge_emergency_number(&mut fields, "911");
        assert_eq!(fields["emergency_number"], "911");

        let mut fields = HashMap::from([("emergency_number".to_string(), "112".to_string())]);
        merge_emergency_number(&mut fields, "911");
        assert_eq!(fields["emergency_number"], "112");

        let mut fields = HashMap::new();
        merge_emergency_number(&mut fields, "  ");
        assert!(!fields.contains_key("emergency_number"));
    }

    #[test]
    fn generate_plain_png() {
        let dir = temp_dir("plain");
        let output = dir.join("qr.png");
        let args = GenerateArgs {
            plain: true,
            ..args(write_fields(&dir, &[]), output.clone())
        };
        generate(&args, &Settings::default()).unwrap();

        let image = image::open(&output).unwrap().to_rgba8();
        assert_eq!(image.width(), image.height());
        assert_eq!(*image.get_pixel(0, 0), image::Rgba([255, 255, 255, 255]));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn generate_themed_with_small_theme() {
        let dir = temp_dir("themed");
        let theme = dir.join("theme.json");
        std::fs::write(
            &theme,
            r#"{"layout": {"canvas_width": 270, "canvas_height": 480}, "decorations": null}"#,
        )
        .unwrap();
        let output = dir.join("wallpaper.jpg");
        let args = GenerateArgs {
            theme: Some(theme),
            ..args(write_fields(&dir, &[]), output.clone())
        };
        generate(&args, &Settings::default()).unwrap();

        let image = image::open(&output).unwrap();
        assert_eq!((image.width(), image.height()), (270, 480));
        assert!(!image.color().has_alpha());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn generate_reports_missing_field() {
        let dir = temp_dir("missing");
        let fields = write_fields(&dir, &[("blood_group", " ")]);
        let err = generate(&args(fields, dir.join("out.png")), &Settings::default()).unwrap_err();
        assert!(format!("{err:#}").contains("blood group"), "{err:#}");
        assert!(!dir.join("out.png").exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn generate_rejects_bad_theme() {
        let dir = temp_dir("badtheme");
        let theme = dir.join("theme.json");
        std::fs::write(&theme, "[1, 2]").unwrap();
        let args = GenerateArgs {
            theme: Some(theme),
            ..args(write_fields(&dir, &[]), dir.join("out.png"))
        };
        assert!(generate(&args, &Settings::default()).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
