//! Interactive prompts.
//!
//! Prompts only run when both stdin and stdout are terminals. With the
//! `interactive` feature they use `dialoguer`; without it, library
//! selection is unavailable and confirmation falls back to a plain
//! `[Y/n]` line.

use std::io::{self, IsTerminal};

use seedling_core::domain::{NONE_SELECTION, Registry};

use crate::error::{CliError, CliResult};

/// `true` when a human can answer prompts.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// Entries offered by the library picker: `none` first, then every id.
pub fn library_choices(registry: &Registry) -> Vec<(String, String)> {
    let mut choices = vec![(
        NONE_SELECTION.to_owned(),
        format!("{NONE_SELECTION:<12} no library"),
    )];
    choices.extend(registry.iter().map(|def| {
        (
            def.id.to_string(),
            format!("{:<12} {}", def.id.as_str(), def.label()),
        )
    }));
    choices
}

/// Ask the user to pick a library. `None` means the prompt was skipped.
#[cfg(feature = "interactive")]
pub fn select_library(registry: &Registry) -> CliResult<Option<String>> {
    let choices = library_choices(registry);
    let labels: Vec<&str> = choices.iter().map(|(_, label)| label.as_str()).collect();

    let picked = dialoguer::FuzzySelect::new()
        .with_prompt("Library to include")
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(prompt_error)?;

    match picked {
        Some(index) => Ok(choices.into_iter().nth(index).map(|(id, _)| id)),
        None => Err(CliError::Cancelled),
    }
}

#[cfg(not(feature = "interactive"))]
pub fn select_library(_registry: &Registry) -> CliResult<Option<String>> {
    Ok(None)
}

/// Yes/no confirmation defaulting to yes.
#[cfg(feature = "interactive")]
pub fn confirm(prompt: &str) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(true)
        .interact()
        .map_err(prompt_error)
}

#[cfg(not(feature = "interactive"))]
pub fn confirm(prompt: &str) -> CliResult<bool> {
    use std::io::Write;

    use crate::error::IntoCli;

    print!("{prompt} [Y/n] ");
    io::stdout()
        .flush()
        .with_cli_context(|| "failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_cli_context(|| "failed to read confirmation input")?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

#[cfg(feature = "interactive")]
fn prompt_error(e: dialoguer::Error) -> CliError {
    CliError::IoError {
        message: "prompt failed".into(),
        source: io::Error::other(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedling_core::domain::{LibraryDefinition, LibraryId};

    #[test]
    fn choices_start_with_none_then_ids_in_order() {
        let registry = Registry::new()
            .with_library(LibraryDefinition::new(LibraryId::new("bulma").unwrap()).name("Bulma"))
            .with_library(LibraryDefinition::new(LibraryId::new("alpine").unwrap()));

        let ids: Vec<String> = library_choices(&registry)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["none", "alpine", "bulma"]);
    }

    #[test]
    fn choice_labels_use_display_name() {
        let registry = Registry::new()
            .with_library(LibraryDefinition::new(LibraryId::new("bulma").unwrap()).name("Bulma"));
        let choices = library_choices(&registry);
        assert!(choices[1].1.contains("Bulma"));
    }
}
