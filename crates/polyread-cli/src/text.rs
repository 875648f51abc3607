//! Input text: positional argument, file, or the built-in lesson.

use std::fs;
use std::path::Path;

use crate::error::CliError;

/// Family-vocabulary lesson: Portuguese prose with French words.
pub const DEMO_TEXT: &str = "Hoje vamos aprender os nomes da família em francês. \
É um vocabulário fundamental e muito útil para qualquer conversa.

Os parentes mais próximos:

Pai: Père

Mãe: Mère

Filho: Fils

Filha: Fille

Irmão: Frère

Irmã: Sœur

Avô: Grand-père

Avó: Grand-mère

Neto: Petit-fils

Neta: Petite-fille";

/// Pick the text to work on.
pub fn resolve_text(text: Option<&str>, file: Option<&Path>) -> Result<String, CliError> {
    if let Some(path) = file {
        return fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display())));
    }
    Ok(text.map_or_else(|| DEMO_TEXT.to_string(), str::to_string))
}
