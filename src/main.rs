use clap::Parser;
use postergen::logger::{self, LogLevel, LoggerConfig};
use postergen::{FormState, GeminiConfig, ImageAsset, PosterClient, PosterError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "poster-prompt",
    version,
    about = "Turn a style reference image into a poster prompt for image generators"
)]
struct Cli {
    /// Style reference image (JPEG or PNG)
    #[arg(long)]
    style: PathBuf,

    /// What the poster should show
    #[arg(long, short)]
    description: String,

    /// Person image to composite; repeat with --group for several people
    #[arg(long = "person")]
    people: Vec<PathBuf>,

    /// Composite every --person image together as one group
    #[arg(long)]
    group: bool,

    /// Gemini model id (defaults to GEMINI_MODEL or gemini-1.5-flash)
    #[arg(long)]
    model: Option<String>,

    /// Emit debug logs
    #[arg(long, short)]
    verbose: bool,
}

fn load_form(cli: &Cli) -> Result<FormState, PosterError> {
    let mut form = FormState::new();
    form.select_style(ImageAsset::from_path(&cli.style)?);
    form.set_description(cli.description.clone());

    if !cli.people.is_empty() || cli.group {
        form.toggle_composite();
    }

    if cli.group {
        form.toggle_group();
        form.select_group(load_people(&cli.people)?);
    } else if let Some(first) = cli.people.first() {
        if cli.people.len() > 1 {
            log::warn!(
                "{} person images given without --group, using only {}",
                cli.people.len(),
                first.display()
            );
        }
        form.select_person(ImageAsset::from_path(first)?);
    }

    Ok(form)
}

/// Loads every readable JPEG/PNG in `paths`, skipping the rest with a
/// warning. Fails only when none of them could be used.
fn load_people(paths: &[PathBuf]) -> Result<Vec<ImageAsset>, PosterError> {
    let mut people = Vec::with_capacity(paths.len());
    let mut last_error = None;

    for path in paths {
        match ImageAsset::from_path(path) {
            Ok(asset) => people.push(asset),
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if people.is_empty() => Err(e),
        _ => Ok(people),
    }
}

async fn run(cli: Cli) -> Result<String, PosterError> {
    let mut config = GeminiConfig::from_env();
    if let Some(model) = &cli.model {
        config = config.with_model(model.as_str());
    }

    let client = PosterClient::new(config);
    let mut form = load_form(&cli)?;
    client.submit(&mut form).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let cli = Cli::parse();
    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    if let Err(e) = logger::init_with_config(LoggerConfig::new().with_level(level)) {
        eprintln!("{}", e);
    }

    if dotenv_loaded {
        log::debug!(".env file loaded");
    } else {
        log::debug!("No .env file found, using process environment");
    }

    match run(cli).await {
        Ok(prompt) => {
            println!("{}", prompt);
            ExitCode::SUCCESS
        }
        Err(PosterError::Validation(e)) => {
            log::error!("{}: {}", e.title(), e);
            ExitCode::from(2)
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postergen::{MediaType, ValidationError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    fn png_file() -> NamedTempFile {
        file_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0])
    }

    #[test]
    fn test_invalid_group_member_is_skipped() {
        let first = png_file();
        let notes = file_with(b"meeting notes, not a photo");
        let second = png_file();
        let paths = vec![
            first.path().to_path_buf(),
            notes.path().to_path_buf(),
            second.path().to_path_buf(),
        ];

        let people = load_people(&paths).unwrap();
        assert_eq!(people.len(), 2);
        assert!(people.iter().all(|p| p.media_type() == MediaType::Png));
    }

    #[test]
    fn test_group_with_no_usable_images_fails() {
        let notes = file_with(b"plain text");
        let paths = vec![
            notes.path().to_path_buf(),
            PathBuf::from("/nonexistent/person.png"),
        ];

        assert!(load_people(&paths).is_err());
    }

    #[test]
    fn test_group_of_unsupported_files_reports_media_type() {
        let notes = file_with(b"plain text");
        let err = load_people(&[notes.path().to_path_buf()]).unwrap_err();
        assert!(matches!(
            err,
            PosterError::Validation(ValidationError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn test_empty_group_loads_nothing() {
        assert!(load_people(&[]).unwrap().is_empty());
    }
}
