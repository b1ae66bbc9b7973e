//! Flujos de errores del compilador.
//!
//! Los diagnósticos de compilación no son fatales: cada una de las
//! tres fases acumula sus errores en un flujo indexado por línea y
//! las tres corren siempre hasta completarse.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// Categoría de un flujo de errores, en el orden en que las fases
/// escriben al archivo de salida.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Category {
    Lexical,
    Parsing,
    Semantic,
}

impl Display for Category {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = match self {
            Category::Lexical => "Lexical",
            Category::Parsing => "Parsing",
            Category::Semantic => "Semantic",
        };

        fmt.write_str(string)
    }
}

/// Flujo de errores indexado por línea.
///
/// Las líneas se cuentan desde cero internamente; la numeración
/// 1-indexada pertenece a la frontera de salida. El orden de
/// inserción se preserva dentro de cada línea.
#[derive(Debug, Default)]
pub struct ErrorStream {
    by_line: BTreeMap<usize, Vec<String>>,
}

impl ErrorStream {
    pub fn new() -> Self {
        ErrorStream::default()
    }

    /// Anexa un error a la línea indicada.
    pub fn record(&mut self, line: usize, message: impl Into<String>) {
        self.by_line.entry(line).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    /// Cantidad total de errores registrados.
    pub fn len(&self) -> usize {
        self.by_line.values().map(Vec::len).sum()
    }

    /// Itera `(línea, mensaje)` por línea ascendente, preservando el
    /// orden de inserción dentro de cada línea.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.by_line
            .iter()
            .flat_map(|(&line, messages)| {
                messages.iter().map(move |message| (line, message.as_str()))
            })
    }

    /// Mensajes registrados para una línea.
    pub fn line(&self, line: usize) -> &[String] {
        self.by_line
            .get(&line)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
