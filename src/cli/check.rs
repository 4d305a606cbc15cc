//! Check command implementation.
//!
//! Runs the image gate and the colour table coverage checks without a save
//! document, so a sprite can be vetted before it is built.

use std::path::PathBuf;

use clap::Args;

use crate::config::SpriteMode;
use crate::error::{BaseError, Result};
use crate::output::{display_path, plural, Printer};
use crate::validation::{check_sprite_coverage, check_table_coverage, Severity, ValidationResult};

use super::{prepare_sprite, SpriteArgs};

/// Check a sprite against the palette and colour table
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Sprite images to check
    #[arg(required = true)]
    pub sprites: Vec<PathBuf>,

    #[command(flatten)]
    pub sprite_args: SpriteArgs,
}

pub fn run(args: CheckArgs, printer: &Printer) -> Result<()> {
    let config = args.sprite_args.load_config()?;
    let mut failed = 0usize;

    for path in &args.sprites {
        let prepared = prepare_sprite(path, &config, printer)?;

        let mut result = ValidationResult::new();
        if config.mode == SpriteMode::Indexed {
            result.merge(check_table_coverage(&prepared.table, &prepared.palette));
        }
        result.merge(check_sprite_coverage(
            &prepared.sprite,
            &prepared.table,
            prepared.mask.as_ref(),
        ));

        report(printer, &result);

        if result.has_errors() {
            failed += 1;
            printer.error(
                "Failed",
                &format!(
                    "{}: {}, {}",
                    display_path(path),
                    plural(result.error_count(), "error", "errors"),
                    plural(result.warning_count(), "warning", "warnings")
                ),
            );
        } else {
            printer.success(
                "Checked",
                &format!(
                    "{} ({}x{}, {})",
                    display_path(path),
                    prepared.sprite.width(),
                    prepared.sprite.height(),
                    plural(result.warning_count(), "warning", "warnings")
                ),
            );
        }
    }

    if failed > 0 {
        return Err(BaseError::CheckFailed {
            message: format!("{} did not pass", plural(failed, "sprite", "sprites")),
            help: Some("Fix the colour table or the sprite and run check again".to_string()),
        });
    }

    Ok(())
}

fn report(printer: &Printer, result: &ValidationResult) {
    for diagnostic in result.iter() {
        let is_error = diagnostic.severity == Severity::Error;
        let label = printer.severity(&diagnostic.severity.to_string(), is_error);
        eprintln!("{}[{}]: {}", label, diagnostic.code, diagnostic.message);
        if let Some(help) = &diagnostic.help {
            eprintln!("  {} {}", printer.dim("help:"), help);
        }
    }
}
