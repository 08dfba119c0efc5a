//! Translation command.

use clap::Args;

use crate::output;
use campus_client::TranslationService;
use campus_core::error::AppError;
use campus_service::AppContext;

/// Arguments for the translate command
#[derive(Debug, Args)]
pub struct TranslateArgs {
    /// Text to translate
    pub text: Option<String>,
    /// Target language (defaults to the preferred language)
    #[arg(long)]
    pub to: Option<String>,
    /// Store a new preferred language
    #[arg(long)]
    pub set_language: Option<String>,
}

/// Execute the translate command
pub async fn execute(args: &TranslateArgs, ctx: &AppContext) -> Result<(), AppError> {
    let service = TranslationService::from_context(ctx)?;

    if let Some(lang) = &args.set_language {
        let stored = service.set_preferred_language(lang).await?;
        output::print_success(&format!("Preferred language set to {}", stored));
    }

    let Some(text) = &args.text else {
        if args.set_language.is_none() {
            output::print_kv("Preferred language", &service.preferred_language().await);
        }
        return Ok(());
    };

    let translated = match &args.to {
        Some(target) => service.translate(text, target).await,
        None => service.translate_for_user(text).await,
    };
    println!("{}", translated);
    Ok(())
}
