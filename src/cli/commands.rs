//! Command implementations

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{info, warn};

use crate::cli::args::{
    BatchArgs, CheckNameArgs, ClassifyArgs, FileKeyArgs, GenerateArgs, ParseArgs,
};
use crate::config::AppConfig;
use crate::domain::model::{Style, StyleType};
use crate::domain::rules::{StyleBatch, StyleClassifier, StyleForm};
use crate::error::{MediaStyleError, MediaStyleResult};
use crate::utils::name::{get_styled_file_key, validate_style_name};

/// Name given to styles built from a bare command string
const ANONYMOUS_STYLE: &str = "cli";

/// Execute the classify command
pub fn classify(args: ClassifyArgs) -> Result<()> {
    let style = Style::new(ANONYMOUS_STYLE, args.commands);
    let form = StyleClassifier::new().parse(&style);
    info!(style_type = %form.style_type(), "classified style");

    if args.json {
        let summary = json!({
            "type": form.style_type(),
            "output_format": form.output_format(),
            "source_format": style.source_format(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", form.style_type());
    }
    Ok(())
}

/// Execute the parse command
pub fn parse(args: ParseArgs) -> Result<()> {
    let style = Style::new(ANONYMOUS_STYLE, args.commands);
    let classifier = StyleClassifier::new();
    let form = match args.style_type {
        Some(raw) => {
            let style_type = StyleType::parse(&raw)?;
            classifier
                .parse_as(style_type, &style)
                .with_context(|| format!("Failed to parse commands as {}", style_type))?
        }
        None => classifier.parse(&style),
    };

    let json = serde_json::to_string_pretty(&form).context("Failed to serialize form to JSON")?;
    println!("{}", json);
    Ok(())
}

/// Execute the generate command
pub fn generate(args: GenerateArgs) -> Result<()> {
    let form: StyleForm = read_structured(&args.form)
        .with_context(|| format!("Failed to read form file {}", args.form.display()))?;

    match args.name {
        Some(name) => {
            let style = form.generate(&name);
            println!("{}", serde_json::to_string_pretty(&style)?);
        }
        None => println!("{}", form.commands()),
    }
    Ok(())
}

/// Execute the file-key command
pub fn file_key(args: FileKeyArgs, config: &AppConfig) -> Result<()> {
    let style = Style::new(args.style, args.commands);
    println!(
        "{}",
        get_styled_file_key(&args.raw_name, &style, &config.separator)
    );
    Ok(())
}

/// Execute the check-name command
pub fn check_name(args: CheckNameArgs, config: &AppConfig) -> Result<()> {
    let output_format = args.commands.map(|commands| {
        StyleClassifier::new()
            .parse(&Style::new(args.name.as_str(), commands))
            .output_format()
    });
    let output_format = output_format.flatten();

    let parsed = validate_style_name(
        &args.name,
        output_format.as_deref(),
        config.allowed_suffixes.as_deref(),
    )?;
    match parsed.suffix {
        Some(suffix) => println!("{}: ok (base: {}, suffix: {})", args.name, parsed.base, suffix),
        None => println!("{}: ok (no suffix)", args.name),
    }
    Ok(())
}

/// Execute the batch command
pub fn batch(args: BatchArgs, config: &AppConfig) -> Result<()> {
    let styles = load_styles(&args.input)
        .with_context(|| format!("Failed to load style list {}", args.input.display()))?;
    info!(count = styles.len(), "loaded styles");

    let entries = StyleBatch::new().classify_all(&styles, config.allowed_suffixes.as_deref());
    let duplicates = StyleBatch::duplicate_names(&styles);
    for name in &duplicates {
        warn!(name = %name, "style name used more than once");
    }

    if args.json {
        let report = json!({
            "styles": entries,
            "duplicates": duplicates,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for entry in &entries {
        let mut line = format!(
            "{}\t{}\t{}",
            entry.name,
            entry.style_type,
            entry.output_format.as_deref().unwrap_or("-")
        );
        if entry.persistence_enabled {
            line.push_str("\tpersistent");
        }
        if let Some(err) = &entry.name_error {
            line.push_str(&format!("\t{}", err));
        }
        println!("{}", line);
    }
    if !duplicates.is_empty() {
        println!("Duplicate names: {}", duplicates.join(", "));
    }
    Ok(())
}

/// Read a list of styles from a JSON or YAML file
pub fn load_styles(path: &Path) -> MediaStyleResult<Vec<Style>> {
    read_structured(path)
}

fn read_structured<T: DeserializeOwned>(path: &Path) -> MediaStyleResult<T> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let content = match extension.as_str() {
        "json" | "yaml" | "yml" => fs::read_to_string(path)?,
        _ => {
            return Err(MediaStyleError::UnsupportedListFormat {
                path: path.display().to_string(),
            })
        }
    };

    if extension == "json" {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}
